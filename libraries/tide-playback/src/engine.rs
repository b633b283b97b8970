//! Per-user playback engine
//!
//! Owns what one user has loaded and how far into it they are. All time is
//! the simulated clock: `tick` distributes an elapsed delta across track
//! boundaries, honoring the repeat mode of the loaded source.
//!
//! Invariant: while a source is loaded, `0 <= offset < current track
//! duration`. Rejected operations leave the engine untouched.

use crate::bookmark::{Bookmark, BookmarkStore};
use crate::error::{PlaybackError, Result};
use crate::source::PlayableSource;
use crate::types::{EngineStatus, RepeatMode, SourceKind, TrackRef};

/// One user's playback state machine
#[derive(Debug, Clone)]
pub struct PlaybackEngine {
    username: String,
    online: bool,
    source: Option<PlayableSource>,
    paused: bool,
    repeat: RepeatMode,
    shuffle: bool,
    offset: u64,
}

impl PlaybackEngine {
    /// Create an idle engine for a user
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            online: true,
            source: None,
            paused: true,
            repeat: RepeatMode::Off,
            shuffle: false,
            offset: 0,
        }
    }

    /// The owning username
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Connection status; the clock skips offline engines
    pub fn online(&self) -> bool {
        self.online
    }

    /// Set the connection status
    pub fn set_online(&mut self, online: bool) {
        self.online = online;
    }

    // ===== Loading =====

    /// Replace the source wholesale
    ///
    /// The outgoing podcast's position is written back first; the incoming
    /// podcast resumes from its bookmark if this user has one. Playback
    /// starts immediately, with repeat and shuffle reset.
    pub fn load(&mut self, mut source: PlayableSource, bookmarks: &mut BookmarkStore) {
        self.save_bookmark(bookmarks);

        self.offset = 0;
        if let PlayableSource::Collection(collection) = &mut source {
            if collection.kind() == SourceKind::Podcast {
                if let Some(bookmark) = bookmarks.get(&self.username, collection.name()) {
                    if collection.seek_to(bookmark.episode).is_ok() {
                        self.offset = bookmark.offset;
                    }
                }
            }
        }

        tracing::debug!(user = %self.username, source = %source.name(), "source loaded");
        self.source = Some(source);
        self.paused = false;
        self.repeat = RepeatMode::Off;
        self.shuffle = false;
    }

    /// Write the podcast position back and drop the source
    pub fn unload(&mut self, bookmarks: &mut BookmarkStore) {
        self.save_bookmark(bookmarks);
        self.clear();
    }

    /// Drop the source without touching bookmarks
    ///
    /// Used when the loaded content itself was deleted from the catalog.
    pub fn force_unload(&mut self) {
        self.clear();
    }

    // ===== Playback control =====

    /// Toggle the pause flag; returns the new paused state
    pub fn pause_toggle(&mut self, bookmarks: &mut BookmarkStore) -> Result<bool> {
        if self.source.is_none() {
            return Err(PlaybackError::NoSourceLoaded);
        }
        self.paused = !self.paused;
        if self.paused {
            self.save_bookmark(bookmarks);
        }
        Ok(self.paused)
    }

    /// Advance the repeat mode one step in its cycle
    pub fn cycle_repeat(&mut self) -> Result<RepeatMode> {
        let is_collection = match &self.source {
            Some(source) => source.is_collection(),
            None => return Err(PlaybackError::NoSourceLoaded),
        };
        self.repeat = self.repeat.cycled(is_collection);
        Ok(self.repeat)
    }

    /// Toggle shuffle with a seed; returns the new shuffle state
    ///
    /// Only playlists and albums shuffle. The currently playing track never
    /// changes at the moment of the toggle.
    pub fn toggle_shuffle(&mut self, seed: u64) -> Result<bool> {
        let source = self
            .source
            .as_mut()
            .ok_or(PlaybackError::NoSourceLoaded)?;
        let collection = match source.kind() {
            SourceKind::Playlist | SourceKind::Album => source
                .as_collection_mut()
                .ok_or(PlaybackError::NoSourceLoaded)?,
            _ => {
                return Err(PlaybackError::invalid_mode(
                    "The loaded source is not a playlist or an album.",
                ))
            }
        };

        if self.shuffle {
            collection.unshuffle();
            self.shuffle = false;
        } else {
            collection.shuffle(seed);
            self.shuffle = true;
        }
        Ok(self.shuffle)
    }

    /// Move one episode forward, clamped at the last episode
    pub fn skip_forward(&mut self, bookmarks: &mut BookmarkStore) -> Result<()> {
        let collection = self.podcast_collection_mut()?;
        collection.advance();
        self.offset = 0;
        self.paused = false;
        self.save_bookmark(bookmarks);
        Ok(())
    }

    /// Move one episode back, clamped at the first episode
    pub fn skip_backward(&mut self, bookmarks: &mut BookmarkStore) -> Result<()> {
        let collection = self.podcast_collection_mut()?;
        collection.retreat();
        self.offset = 0;
        self.paused = false;
        self.save_bookmark(bookmarks);
        Ok(())
    }

    /// Jump to the next track in iteration order, irrespective of elapsed time
    ///
    /// Wraps only under repeat-all; at the end of anything else the source
    /// finishes and `None` is returned. Resumes playback on success.
    pub fn next(&mut self, bookmarks: &mut BookmarkStore) -> Result<Option<String>> {
        let loops_current = self.repeat.loops_current();
        let repeat_all = self.repeat == RepeatMode::All;

        let finished = match self.source.as_mut() {
            None => return Err(PlaybackError::NoSourceLoaded),
            Some(PlayableSource::Single(_)) => !loops_current,
            Some(PlayableSource::Collection(collection)) => {
                if collection.advance() {
                    false
                } else if repeat_all {
                    collection.rewind();
                    false
                } else {
                    true
                }
            }
        };
        if finished {
            self.finish(bookmarks);
            return Ok(None);
        }

        self.offset = 0;
        self.paused = false;
        self.save_bookmark(bookmarks);
        Ok(self.current_track().map(|track| track.name.clone()))
    }

    /// Jump back: restart the current track, or step to the previous one
    /// when already at its start. Resumes playback.
    pub fn prev(&mut self, bookmarks: &mut BookmarkStore) -> Result<String> {
        if self.source.is_none() {
            return Err(PlaybackError::NoSourceLoaded);
        }
        if self.offset == 0 {
            if let Some(PlayableSource::Collection(collection)) = self.source.as_mut() {
                collection.retreat();
            }
        }
        self.offset = 0;
        self.paused = false;
        self.save_bookmark(bookmarks);
        self.current_track()
            .map(|track| track.name.clone())
            .ok_or(PlaybackError::NoSourceLoaded)
    }

    // ===== The tick-advance algorithm =====

    /// Consume `delta` seconds of simulated time
    ///
    /// Crosses as many track boundaries as the delta covers. Full loops of
    /// a repeating track or collection are collapsed with a modulo, so one
    /// call is bounded no matter how large the delta is. A paused or idle
    /// engine is untouched.
    pub fn tick(&mut self, delta: u64, bookmarks: &mut BookmarkStore) {
        if self.paused || delta == 0 || self.source.is_none() {
            return;
        }

        let mut remaining_delta = delta;
        while remaining_delta > 0 {
            let Some(source) = self.source.as_mut() else {
                break;
            };
            let track_remaining = source.current_track().duration - self.offset;
            if remaining_delta < track_remaining {
                self.offset += remaining_delta;
                break;
            }

            // the current track is exhausted; decide what plays next
            remaining_delta -= track_remaining;
            self.offset = 0;
            let mut stopped = false;
            match source {
                PlayableSource::Single(track) => {
                    if self.repeat.loops_current() {
                        remaining_delta %= track.duration;
                    } else {
                        stopped = true;
                    }
                }
                PlayableSource::Collection(collection) => {
                    if self.repeat == RepeatMode::Once {
                        // one free replay of the same track, then normal advance
                        self.repeat = RepeatMode::Off;
                    } else if collection.advance() {
                        // moved to the next track in iteration order
                    } else if self.repeat == RepeatMode::All {
                        collection.rewind();
                        remaining_delta %= collection.total_duration();
                    } else {
                        stopped = true;
                    }
                }
            }
            if stopped {
                // leftover delta is discarded
                self.finish(bookmarks);
                break;
            }
        }

        self.save_bookmark(bookmarks);
    }

    // ===== State queries =====

    /// The track currently pointed at, if any
    pub fn current_track(&self) -> Option<&TrackRef> {
        self.source.as_ref().map(PlayableSource::current_track)
    }

    /// Loaded and not paused
    pub fn is_active(&self) -> bool {
        self.source.is_some() && !self.paused
    }

    /// Identity and kind of the loaded source
    pub fn active_source(&self) -> Option<(String, SourceKind)> {
        self.source
            .as_ref()
            .map(|source| (source.name().to_string(), source.kind()))
    }

    /// Is this engine actively playing content owned by `owner`
    ///
    /// True for a song by that artist or a collection owned by that user.
    /// Read-only: deletion guards never mutate engine state.
    pub fn plays_content_of(&self, owner: &str) -> bool {
        if !self.is_active() {
            return false;
        }
        let Some(source) = &self.source else {
            return false;
        };
        source.owner() == Some(owner)
            || source.current_track().artist.as_deref() == Some(owner)
    }

    /// Snapshot for the statistics boundary
    pub fn status(&self) -> EngineStatus {
        match &self.source {
            Some(source) => {
                let track = source.current_track();
                EngineStatus {
                    name: track.name.clone(),
                    remained_time: track.duration - self.offset,
                    repeat: self.repeat.label().to_string(),
                    shuffle: self.shuffle,
                    paused: self.paused,
                }
            }
            None => EngineStatus {
                name: String::new(),
                remained_time: 0,
                repeat: RepeatMode::Off.label().to_string(),
                shuffle: false,
                paused: true,
            },
        }
    }

    /// Current repeat mode
    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    /// Whether shuffle is active
    pub fn shuffle_enabled(&self) -> bool {
        self.shuffle
    }

    /// Whether playback is paused
    pub fn paused(&self) -> bool {
        self.paused
    }

    /// Elapsed seconds inside the current track
    pub fn offset(&self) -> u64 {
        self.offset
    }

    // ===== Internals =====

    fn podcast_collection_mut(&mut self) -> Result<&mut crate::source::CollectionSource> {
        let source = self
            .source
            .as_mut()
            .ok_or(PlaybackError::NoSourceLoaded)?;
        if source.kind() != SourceKind::Podcast {
            return Err(PlaybackError::invalid_mode(
                "The loaded source is not a podcast.",
            ));
        }
        source
            .as_collection_mut()
            .ok_or(PlaybackError::NoSourceLoaded)
    }

    /// Playback ran off the end of the source
    fn finish(&mut self, bookmarks: &mut BookmarkStore) {
        if let Some(PlayableSource::Collection(collection)) = &self.source {
            if collection.kind() == SourceKind::Podcast {
                // a finished podcast restarts from the top on the next load
                bookmarks.set(&self.username, collection.name(), Bookmark::default());
            }
        }
        tracing::debug!(user = %self.username, "playback finished");
        self.clear();
    }

    fn clear(&mut self) {
        self.source = None;
        self.offset = 0;
        self.paused = true;
        self.repeat = RepeatMode::Off;
        self.shuffle = false;
    }

    /// Write the current podcast position back to the store
    fn save_bookmark(&self, bookmarks: &mut BookmarkStore) {
        if let Some(PlayableSource::Collection(collection)) = &self.source {
            if collection.kind() == SourceKind::Podcast {
                bookmarks.set(
                    &self.username,
                    collection.name(),
                    Bookmark {
                        episode: collection.storage_index(),
                        offset: self.offset,
                    },
                );
            }
        }
    }
}
