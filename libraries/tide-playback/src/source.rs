//! Playable sources
//!
//! A source is either a standalone song or a collection plus a cursor. The
//! cursor indexes into an iteration order (identity or shuffled); the
//! stored track order is never rearranged.

use crate::error::{PlaybackError, Result};
use crate::shuffle::{identity_order, shuffled_order};
use crate::types::{SourceKind, TrackRef};

/// A collection bound for playback: tracks, iteration order, cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSource {
    kind: SourceKind,
    name: String,
    owner: String,
    tracks: Vec<TrackRef>,
    order: Vec<usize>,
    cursor: usize,
}

impl CollectionSource {
    fn new(
        kind: SourceKind,
        name: impl Into<String>,
        owner: impl Into<String>,
        tracks: Vec<TrackRef>,
    ) -> Result<Self> {
        if tracks.is_empty() {
            return Err(PlaybackError::EmptySource);
        }
        let order = identity_order(tracks.len());
        Ok(Self {
            kind,
            name: name.into(),
            owner: owner.into(),
            tracks,
            order,
            cursor: 0,
        })
    }

    /// Collection kind (playlist, album, or podcast)
    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Collection name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owner username
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Always false: empty collections are rejected at construction
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// The track the cursor points at
    pub fn current(&self) -> &TrackRef {
        &self.tracks[self.order[self.cursor]]
    }

    /// Cursor position within the iteration order
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Index of the current track in storage order
    pub fn storage_index(&self) -> usize {
        self.order[self.cursor]
    }

    /// Is the cursor on the final position of the iteration order
    pub fn at_end(&self) -> bool {
        self.cursor + 1 == self.order.len()
    }

    /// Move the cursor one position forward; false when already at the end
    pub fn advance(&mut self) -> bool {
        if self.at_end() {
            false
        } else {
            self.cursor += 1;
            true
        }
    }

    /// Move the cursor one position back; false when already at the start
    pub fn retreat(&mut self) -> bool {
        if self.cursor == 0 {
            false
        } else {
            self.cursor -= 1;
            true
        }
    }

    /// Rewind the cursor to the first position of the iteration order
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Place the cursor at `index` in the iteration order
    pub fn seek_to(&mut self, index: usize) -> Result<()> {
        if index >= self.order.len() {
            return Err(PlaybackError::OutOfRange(index));
        }
        self.cursor = index;
        Ok(())
    }

    /// Sum of all track durations, in iteration-order-independent seconds
    pub fn total_duration(&self) -> u64 {
        self.tracks.iter().map(|t| t.duration).sum()
    }

    /// Replace the iteration order with a seeded shuffle
    ///
    /// The currently playing track stays current; it becomes position 0 of
    /// the new order.
    pub fn shuffle(&mut self, seed: u64) {
        let current = self.order[self.cursor];
        self.order = shuffled_order(self.tracks.len(), seed, current);
        self.cursor = 0;
    }

    /// Restore the identity iteration order
    ///
    /// The currently playing track stays current; the cursor lands on its
    /// absolute position.
    pub fn unshuffle(&mut self) {
        let current = self.order[self.cursor];
        self.order = identity_order(self.tracks.len());
        self.cursor = current;
    }
}

/// What a playback engine has loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayableSource {
    /// A standalone song; no cursor
    Single(TrackRef),

    /// A collection plus cursor into its iteration order
    Collection(CollectionSource),
}

impl PlayableSource {
    /// Wrap a standalone song
    pub fn song(track: TrackRef) -> Self {
        PlayableSource::Single(track)
    }

    /// Bind a playlist for playback
    pub fn playlist(
        name: impl Into<String>,
        owner: impl Into<String>,
        tracks: Vec<TrackRef>,
    ) -> Result<Self> {
        Ok(PlayableSource::Collection(CollectionSource::new(
            SourceKind::Playlist,
            name,
            owner,
            tracks,
        )?))
    }

    /// Bind an album for playback
    pub fn album(
        name: impl Into<String>,
        owner: impl Into<String>,
        tracks: Vec<TrackRef>,
    ) -> Result<Self> {
        Ok(PlayableSource::Collection(CollectionSource::new(
            SourceKind::Album,
            name,
            owner,
            tracks,
        )?))
    }

    /// Bind a podcast for playback
    pub fn podcast(
        name: impl Into<String>,
        owner: impl Into<String>,
        episodes: Vec<TrackRef>,
    ) -> Result<Self> {
        Ok(PlayableSource::Collection(CollectionSource::new(
            SourceKind::Podcast,
            name,
            owner,
            episodes,
        )?))
    }

    /// The track the source currently points at
    pub fn current_track(&self) -> &TrackRef {
        match self {
            PlayableSource::Single(track) => track,
            PlayableSource::Collection(collection) => collection.current(),
        }
    }

    /// Source kind
    pub fn kind(&self) -> SourceKind {
        match self {
            PlayableSource::Single(_) => SourceKind::Song,
            PlayableSource::Collection(collection) => collection.kind(),
        }
    }

    /// Identity of the loaded source (song name or collection name)
    pub fn name(&self) -> &str {
        match self {
            PlayableSource::Single(track) => &track.name,
            PlayableSource::Collection(collection) => collection.name(),
        }
    }

    /// Owner of the loaded content, when there is one
    pub fn owner(&self) -> Option<&str> {
        match self {
            PlayableSource::Single(track) => track.artist.as_deref(),
            PlayableSource::Collection(collection) => Some(collection.owner()),
        }
    }

    /// Collections carry a cursor; singles do not
    pub fn is_collection(&self) -> bool {
        matches!(self, PlayableSource::Collection(_))
    }

    /// Borrow the collection, if this source is one
    pub fn as_collection(&self) -> Option<&CollectionSource> {
        match self {
            PlayableSource::Collection(collection) => Some(collection),
            PlayableSource::Single(_) => None,
        }
    }

    /// Borrow the collection mutably, if this source is one
    pub fn as_collection_mut(&mut self) -> Option<&mut CollectionSource> {
        match self {
            PlayableSource::Collection(collection) => Some(collection),
            PlayableSource::Single(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracks(n: usize) -> Vec<TrackRef> {
        (0..n)
            .map(|i| TrackRef::song(format!("t{i}"), 100 + i as u64, "artist"))
            .collect()
    }

    #[test]
    fn empty_collection_rejected() {
        let result = PlayableSource::playlist("mix", "alice", Vec::new());
        assert_eq!(result.unwrap_err(), PlaybackError::EmptySource);
    }

    #[test]
    fn cursor_starts_at_zero() {
        let source = PlayableSource::album("a", "band", tracks(3)).unwrap();
        assert_eq!(source.current_track().name, "t0");
    }

    #[test]
    fn advance_stops_at_end() {
        let mut source = PlayableSource::playlist("mix", "alice", tracks(2)).unwrap();
        let collection = source.as_collection_mut().unwrap();
        assert!(collection.advance());
        assert!(collection.at_end());
        assert!(!collection.advance());
        assert_eq!(collection.cursor(), 1);
    }

    #[test]
    fn shuffle_keeps_current_track() {
        let mut source = PlayableSource::playlist("mix", "alice", tracks(6)).unwrap();
        let collection = source.as_collection_mut().unwrap();
        collection.seek_to(3).unwrap();
        let before = collection.current().clone();

        collection.shuffle(1234);
        assert_eq!(collection.current(), &before);
        assert_eq!(collection.cursor(), 0);

        collection.unshuffle();
        assert_eq!(collection.current(), &before);
        assert_eq!(collection.cursor(), 3);
    }

    #[test]
    fn seek_out_of_range() {
        let mut source = PlayableSource::podcast("show", "host", tracks(2)).unwrap();
        let collection = source.as_collection_mut().unwrap();
        assert_eq!(
            collection.seek_to(2).unwrap_err(),
            PlaybackError::OutOfRange(2)
        );
    }

    #[test]
    fn single_has_no_cursor() {
        let source = PlayableSource::song(TrackRef::song("solo", 200, "artist"));
        assert!(!source.is_collection());
        assert!(source.as_collection().is_none());
        assert_eq!(source.name(), "solo");
        assert_eq!(source.owner(), Some("artist"));
    }

    #[test]
    fn total_duration_sums_tracks() {
        let source = PlayableSource::album("a", "band", tracks(3)).unwrap();
        // 100 + 101 + 102
        assert_eq!(source.as_collection().unwrap().total_duration(), 303);
    }
}
