//! Core types for playback management

use serde::{Deserialize, Serialize};

/// Track information for playback bookkeeping
///
/// A value description of one playable unit: a standalone song or one entry
/// inside an ordered collection. Eagerly copied out of the catalog so the
/// engine owns everything it plays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRef {
    /// Track name
    pub name: String,

    /// Duration in simulated seconds (always positive)
    pub duration: u64,

    /// Artist name, when the unit is a song
    pub artist: Option<String>,
}

impl TrackRef {
    /// Create a song reference
    pub fn song(name: impl Into<String>, duration: u64, artist: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            duration,
            artist: Some(artist.into()),
        }
    }

    /// Create an episode reference
    pub fn episode(name: impl Into<String>, duration: u64) -> Self {
        Self {
            name: name.into(),
            duration,
            artist: None,
        }
    }
}

/// What kind of source is loaded
///
/// Determines repeat semantics (single vs. collection cycle), shuffle
/// eligibility (playlist/album only), and skip eligibility (podcast only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A standalone song
    Song,
    /// A playlist of songs
    Playlist,
    /// An album of songs
    Album,
    /// A podcast of episodes
    Podcast,
}

impl SourceKind {
    /// Collections carry a cursor; singles do not
    pub fn is_collection(self) -> bool {
        !matches!(self, SourceKind::Song)
    }

    /// Lowercase display label
    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Song => "song",
            SourceKind::Playlist => "playlist",
            SourceKind::Album => "album",
            SourceKind::Podcast => "podcast",
        }
    }
}

/// Repeat mode
///
/// Five states, cycled three at a time: collection sources walk
/// `Off -> Once -> All -> Off`, single sources walk
/// `Off -> CurrentSong -> Infinite -> Off`. The ordinal positions match;
/// the semantics differ per source type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepeatMode {
    /// Stop advancing past the source's end
    Off,

    /// The current track replays exactly one extra time, then reverts to Off
    Once,

    /// The collection restarts from its beginning, indefinitely
    All,

    /// The single track loops until the mode changes
    CurrentSong,

    /// The single track loops; distinct from CurrentSong only for reporting
    Infinite,
}

impl RepeatMode {
    /// Advance the mode one step in the cycle for the loaded source type
    pub fn cycled(self, collection: bool) -> RepeatMode {
        if collection {
            match self {
                RepeatMode::Off => RepeatMode::Once,
                RepeatMode::Once => RepeatMode::All,
                _ => RepeatMode::Off,
            }
        } else {
            match self {
                RepeatMode::Off => RepeatMode::CurrentSong,
                RepeatMode::CurrentSong => RepeatMode::Infinite,
                _ => RepeatMode::Off,
            }
        }
    }

    /// Does this mode loop a single track forever
    pub fn loops_current(self) -> bool {
        matches!(self, RepeatMode::CurrentSong | RepeatMode::Infinite)
    }

    /// Lowercase display label
    pub fn label(self) -> &'static str {
        match self {
            RepeatMode::Off => "no repeat",
            RepeatMode::Once => "repeat once",
            RepeatMode::All => "repeat all",
            RepeatMode::CurrentSong => "repeat current song",
            RepeatMode::Infinite => "repeat infinite",
        }
    }
}

/// Snapshot of an engine's externally visible state
///
/// This is the whole statistics surface: collaborators read it, never the
/// engine internals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineStatus {
    /// Current track name, empty when nothing is playing
    pub name: String,

    /// Seconds left in the current track
    #[serde(rename = "remainedTime")]
    pub remained_time: u64,

    /// Repeat mode label
    pub repeat: String,

    /// Whether shuffle is active
    pub shuffle: bool,

    /// Whether playback is paused
    pub paused: bool,
}
