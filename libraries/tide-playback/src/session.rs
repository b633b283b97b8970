//! Session: all engines, the bookmark store, and the clock
//!
//! The session is the boundary collaborators talk to. Each user owns one
//! engine; engines share nothing except the bookmark store, and each
//! bookmark entry is written only by its own user's engine. A clock update
//! computes the elapsed delta once and ticks every online engine exactly
//! once, in any order.

use std::collections::BTreeMap;

use crate::bookmark::BookmarkStore;
use crate::clock::SimulationClock;
use crate::engine::PlaybackEngine;
use crate::error::{PlaybackError, Result};
use crate::source::PlayableSource;
use crate::types::{EngineStatus, RepeatMode, SourceKind};

/// Every user's playback state plus the shared clock and bookmarks
#[derive(Debug, Default)]
pub struct PlaybackSession {
    engines: BTreeMap<String, PlaybackEngine>,
    bookmarks: BookmarkStore,
    clock: SimulationClock,
}

impl PlaybackSession {
    /// Create an empty session at timestamp zero
    pub fn new() -> Self {
        Self::default()
    }

    // ===== User lifecycle =====

    /// Create an engine for a new user
    pub fn add_user(&mut self, username: impl Into<String>) {
        let username = username.into();
        self.engines
            .entry(username.clone())
            .or_insert_with(|| PlaybackEngine::new(username));
    }

    /// Destroy a user's engine and their bookmarks
    pub fn remove_user(&mut self, username: &str) {
        self.engines.remove(username);
        self.bookmarks.remove_user(username);
    }

    /// Does this user have an engine
    pub fn has_user(&self, username: &str) -> bool {
        self.engines.contains_key(username)
    }

    /// Mark a user online or offline; offline engines are frozen in place
    pub fn set_online(&mut self, username: &str, online: bool) -> Result<()> {
        self.engine_mut(username)?.set_online(online);
        Ok(())
    }

    // ===== The clock =====

    /// Current simulated timestamp
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    /// Advance the clock, ticking every online engine exactly once
    ///
    /// Returns the elapsed delta. Engines are independent, so the order in
    /// which they tick is irrelevant.
    pub fn advance_to(&mut self, timestamp: u64) -> Result<u64> {
        let elapsed = self.clock.advance_to(timestamp)?;
        if elapsed == 0 {
            return Ok(0);
        }
        tracing::debug!(timestamp, elapsed, "clock advanced");
        let Self {
            engines, bookmarks, ..
        } = self;
        for engine in engines.values_mut() {
            if engine.online() {
                engine.tick(elapsed, bookmarks);
            }
        }
        Ok(elapsed)
    }

    // ===== Per-user operations =====

    /// Load a source into a user's engine
    pub fn load(&mut self, username: &str, source: PlayableSource) -> Result<()> {
        let Self {
            engines, bookmarks, ..
        } = self;
        let engine = engines
            .get_mut(username)
            .ok_or_else(|| PlaybackError::UnknownUser(username.to_string()))?;
        engine.load(source, bookmarks);
        Ok(())
    }

    /// Toggle pause; returns the new paused state
    pub fn pause_toggle(&mut self, username: &str) -> Result<bool> {
        let Self {
            engines, bookmarks, ..
        } = self;
        let engine = engines
            .get_mut(username)
            .ok_or_else(|| PlaybackError::UnknownUser(username.to_string()))?;
        engine.pause_toggle(bookmarks)
    }

    /// Cycle the repeat mode; returns the new mode
    pub fn cycle_repeat(&mut self, username: &str) -> Result<RepeatMode> {
        self.engine_mut(username)?.cycle_repeat()
    }

    /// Toggle shuffle with a seed; returns the new shuffle state
    pub fn toggle_shuffle(&mut self, username: &str, seed: u64) -> Result<bool> {
        self.engine_mut(username)?.toggle_shuffle(seed)
    }

    /// Skip one podcast episode forward
    pub fn skip_forward(&mut self, username: &str) -> Result<()> {
        let Self {
            engines, bookmarks, ..
        } = self;
        let engine = engines
            .get_mut(username)
            .ok_or_else(|| PlaybackError::UnknownUser(username.to_string()))?;
        engine.skip_forward(bookmarks)
    }

    /// Skip one podcast episode back
    pub fn skip_backward(&mut self, username: &str) -> Result<()> {
        let Self {
            engines, bookmarks, ..
        } = self;
        let engine = engines
            .get_mut(username)
            .ok_or_else(|| PlaybackError::UnknownUser(username.to_string()))?;
        engine.skip_backward(bookmarks)
    }

    /// Jump to the next track; `None` when the source finished instead
    pub fn next(&mut self, username: &str) -> Result<Option<String>> {
        let Self {
            engines, bookmarks, ..
        } = self;
        let engine = engines
            .get_mut(username)
            .ok_or_else(|| PlaybackError::UnknownUser(username.to_string()))?;
        engine.next(bookmarks)
    }

    /// Jump back to the previous track (or the current track's start)
    pub fn prev(&mut self, username: &str) -> Result<String> {
        let Self {
            engines, bookmarks, ..
        } = self;
        let engine = engines
            .get_mut(username)
            .ok_or_else(|| PlaybackError::UnknownUser(username.to_string()))?;
        engine.prev(bookmarks)
    }

    // ===== Boundary queries =====

    /// Statistics snapshot of a user's engine
    pub fn status(&self, username: &str) -> Result<EngineStatus> {
        Ok(self.engine(username)?.status())
    }

    /// Name of the track a user is on, if any
    pub fn current_track(&self, username: &str) -> Result<Option<String>> {
        Ok(self
            .engine(username)?
            .current_track()
            .map(|track| track.name.clone()))
    }

    /// Identity and kind of the user's loaded source, active or not
    pub fn active_source(&self, username: &str) -> Result<Option<(String, SourceKind)>> {
        Ok(self.engine(username)?.active_source())
    }

    /// Loaded and not paused
    pub fn is_actively_playing(&self, username: &str) -> Result<bool> {
        Ok(self.engine(username)?.is_active())
    }

    /// Deletion guard: is any engine actively playing content owned by `owner`
    pub fn owner_content_active(&self, owner: &str) -> bool {
        self.engines
            .values()
            .any(|engine| engine.plays_content_of(owner))
    }

    /// Deletion guard: is any engine actively playing this collection
    pub fn collection_active(&self, name: &str, kind: SourceKind) -> bool {
        self.engines.values().any(|engine| {
            engine.is_active()
                && engine.active_source() == Some((name.to_string(), kind))
        })
    }

    // ===== Catalog removal notifications =====

    /// A podcast no longer exists: unload it everywhere, drop its bookmarks
    pub fn podcast_removed(&mut self, name: &str) {
        for engine in self.engines.values_mut() {
            if engine.active_source() == Some((name.to_string(), SourceKind::Podcast)) {
                engine.force_unload();
            }
        }
        self.bookmarks.remove_podcast(name);
        tracing::debug!(podcast = name, "podcast removed from all engines");
    }

    /// An album no longer exists: unload it everywhere
    pub fn album_removed(&mut self, name: &str) {
        for engine in self.engines.values_mut() {
            if engine.active_source() == Some((name.to_string(), SourceKind::Album)) {
                engine.force_unload();
            }
        }
    }

    /// A user no longer exists: drop their engine and bookmarks, plus any
    /// podcasts that were removed with the account
    pub fn user_removed(&mut self, username: &str, removed_podcasts: &[String]) {
        self.remove_user(username);
        for podcast in removed_podcasts {
            self.podcast_removed(podcast);
        }
    }

    // ===== Internals =====

    fn engine(&self, username: &str) -> Result<&PlaybackEngine> {
        self.engines
            .get(username)
            .ok_or_else(|| PlaybackError::UnknownUser(username.to_string()))
    }

    fn engine_mut(&mut self, username: &str) -> Result<&mut PlaybackEngine> {
        self.engines
            .get_mut(username)
            .ok_or_else(|| PlaybackError::UnknownUser(username.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrackRef;

    fn playlist_source() -> PlayableSource {
        PlayableSource::playlist(
            "mix",
            "alice",
            vec![
                TrackRef::song("a", 100, "artist"),
                TrackRef::song("b", 50, "artist"),
            ],
        )
        .unwrap()
    }

    fn podcast_source() -> PlayableSource {
        PlayableSource::podcast(
            "show",
            "host",
            vec![
                TrackRef::episode("e0", 600),
                TrackRef::episode("e1", 900),
            ],
        )
        .unwrap()
    }

    #[test]
    fn unknown_user_rejected() {
        let mut session = PlaybackSession::new();
        assert_eq!(
            session.pause_toggle("ghost").unwrap_err(),
            PlaybackError::UnknownUser("ghost".to_string())
        );
    }

    #[test]
    fn clock_ticks_every_engine_once() {
        let mut session = PlaybackSession::new();
        session.add_user("alice");
        session.add_user("bob");
        session.load("alice", playlist_source()).unwrap();
        session.load("bob", playlist_source()).unwrap();

        session.advance_to(30).unwrap();
        assert_eq!(session.status("alice").unwrap().remained_time, 70);
        assert_eq!(session.status("bob").unwrap().remained_time, 70);
    }

    #[test]
    fn offline_engine_is_frozen() {
        let mut session = PlaybackSession::new();
        session.add_user("alice");
        session.load("alice", playlist_source()).unwrap();
        session.set_online("alice", false).unwrap();

        session.advance_to(30).unwrap();
        assert_eq!(session.status("alice").unwrap().remained_time, 100);

        session.set_online("alice", true).unwrap();
        session.advance_to(60).unwrap();
        assert_eq!(session.status("alice").unwrap().remained_time, 70);
    }

    #[test]
    fn paused_engine_ignores_clock() {
        let mut session = PlaybackSession::new();
        session.add_user("alice");
        session.load("alice", playlist_source()).unwrap();
        session.pause_toggle("alice").unwrap();

        session.advance_to(500).unwrap();
        assert_eq!(session.status("alice").unwrap().remained_time, 100);
    }

    #[test]
    fn guard_sees_active_content_owner() {
        let mut session = PlaybackSession::new();
        session.add_user("alice");
        session.load("alice", playlist_source()).unwrap();

        assert!(session.owner_content_active("artist"));
        assert!(session.owner_content_active("alice"));
        assert!(!session.owner_content_active("host"));

        // pausing releases the guard: the check reads, never mutates
        session.pause_toggle("alice").unwrap();
        assert!(!session.owner_content_active("artist"));
        assert!(!session.is_actively_playing("alice").unwrap());
    }

    #[test]
    fn podcast_removal_unloads_and_forgets() {
        let mut session = PlaybackSession::new();
        session.add_user("alice");
        session.add_user("bob");
        session.load("alice", podcast_source()).unwrap();
        session.load("bob", podcast_source()).unwrap();
        session.advance_to(100).unwrap();

        session.podcast_removed("show");
        assert_eq!(session.current_track("alice").unwrap(), None);
        assert_eq!(session.current_track("bob").unwrap(), None);

        // a reload after re-adding starts fresh: no bookmark survived
        session.load("alice", podcast_source()).unwrap();
        assert_eq!(session.status("alice").unwrap().name, "e0");
        assert_eq!(session.status("alice").unwrap().remained_time, 600);
    }

    #[test]
    fn bookmarks_are_per_user() {
        let mut session = PlaybackSession::new();
        session.add_user("alice");
        session.add_user("bob");
        session.load("alice", podcast_source()).unwrap();
        session.load("bob", podcast_source()).unwrap();

        session.advance_to(650).unwrap(); // both on e1, offset 50
        session.load("alice", playlist_source()).unwrap(); // alice moves on

        session.advance_to(700).unwrap();
        // bob kept advancing; alice's bookmark froze at 650
        session.load("alice", podcast_source()).unwrap();
        let status = session.status("alice").unwrap();
        assert_eq!(status.name, "e1");
        assert_eq!(status.remained_time, 900 - 50);
    }

    #[test]
    fn user_removal_drops_engine_and_their_podcasts() {
        let mut session = PlaybackSession::new();
        session.add_user("alice");
        session.add_user("bob");
        session.load("alice", podcast_source()).unwrap();
        session.load("bob", podcast_source()).unwrap();

        session.user_removed("alice", &["show".to_string()]);
        assert!(!session.has_user("alice"));
        // bob was listening to the removed host's show: unloaded too
        assert_eq!(session.current_track("bob").unwrap(), None);
    }
}
