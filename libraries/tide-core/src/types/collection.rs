/// Ordered collection domain types
use serde::{Deserialize, Serialize};

use super::{Episode, Track};

/// Kind of an ordered collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    /// User-assembled list of songs
    Playlist,
    /// Artist-owned list of songs
    Album,
    /// Host-owned list of episodes
    Podcast,
}

/// Playlist visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Visible to everyone
    Public,
    /// Visible to the owner only
    Private,
}

/// A user-owned playlist of songs
///
/// The stored track order never changes at playback time; shuffle only
/// alters the iteration order inside a playback engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Playlist name
    pub name: String,

    /// Owner username
    pub owner: String,

    /// Ordered songs
    pub tracks: Vec<Track>,

    /// Visibility
    pub visibility: Visibility,

    /// Creation time on the simulated clock
    pub created_at: u64,
}

impl Playlist {
    /// Create a new, empty public playlist
    pub fn new(name: impl Into<String>, owner: impl Into<String>, created_at: u64) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
            tracks: Vec::new(),
            visibility: Visibility::Public,
            created_at,
        }
    }

    /// Flip between public and private
    pub fn switch_visibility(&mut self) {
        self.visibility = match self.visibility {
            Visibility::Public => Visibility::Private,
            Visibility::Private => Visibility::Public,
        };
    }
}

/// An artist-owned album
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    /// Album name
    pub name: String,

    /// Owning artist username
    pub owner: String,

    /// Release year
    #[serde(default, rename = "releaseYear")]
    pub release_year: u32,

    /// Ordered songs
    pub tracks: Vec<Track>,
}

/// A host-owned podcast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Podcast {
    /// Podcast name
    pub name: String,

    /// Owning host username
    pub owner: String,

    /// Ordered episodes
    pub episodes: Vec<Episode>,
}
