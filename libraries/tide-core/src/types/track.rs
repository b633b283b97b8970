/// Playable unit domain types
use serde::{Deserialize, Serialize};

/// A song in the catalog
///
/// Identity is the name; durations are whole simulated seconds.
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Track name
    pub name: String,

    /// Duration in simulated seconds (always positive)
    pub duration: u64,

    /// Album name
    pub album: String,

    /// Artist name
    pub artist: String,

    /// Genre
    pub genre: String,

    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Release year
    #[serde(default, rename = "releaseYear")]
    pub release_year: u32,
}

/// One episode of a podcast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    /// Episode name
    pub name: String,

    /// Duration in simulated seconds (always positive)
    pub duration: u64,

    /// Episode description
    #[serde(default)]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_fields() {
        let track = Track {
            name: "Test Song".to_string(),
            duration: 180,
            album: "Test Album".to_string(),
            artist: "Test Artist".to_string(),
            genre: "pop".to_string(),
            tags: vec!["#test".to_string()],
            release_year: 2020,
        };
        assert_eq!(track.name, "Test Song");
        assert_eq!(track.duration, 180);
    }

    #[test]
    fn episode_deserializes_without_description() {
        let episode: Episode =
            serde_json::from_str(r#"{"name": "Ep 1", "duration": 900}"#).unwrap();
        assert_eq!(episode.name, "Ep 1");
        assert!(episode.description.is_empty());
    }
}
