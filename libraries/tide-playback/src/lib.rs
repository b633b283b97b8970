//! Tide Player - Playback Management
//!
//! Deterministic playback engines for the Tide Player simulation.
//!
//! This crate provides:
//! - Playable sources (standalone song, or collection + cursor)
//! - Repeat modes (five states, two cycles: single vs. collection)
//! - Seeded shuffle (deterministic, current track stays put)
//! - Podcast bookmarks (per user, per podcast resume positions)
//! - Per-user playback engines with the tick-advance algorithm
//! - The simulated clock and the session that drives every engine
//!
//! # Architecture
//!
//! `tide-playback` is completely catalog-agnostic: callers copy tracks out
//! of whatever library they manage into [`TrackRef`] lists and bind them as
//! a [`PlayableSource`]. There is no real time here — every duration and
//! timestamp is a value on the simulated clock, and every operation runs to
//! completion before the next one is processed.
//!
//! # Example: driving two users
//!
//! ```rust
//! use tide_playback::{PlaybackSession, PlayableSource, TrackRef};
//!
//! let mut session = PlaybackSession::new();
//! session.add_user("alice");
//! session.add_user("bob");
//!
//! let mix = PlayableSource::playlist(
//!     "mix",
//!     "alice",
//!     vec![
//!         TrackRef::song("First", 100, "Band"),
//!         TrackRef::song("Second", 50, "Band"),
//!     ],
//! )
//! .unwrap();
//! session.load("alice", mix).unwrap();
//!
//! // one clock update drives every engine
//! session.advance_to(120).unwrap();
//! assert_eq!(session.current_track("alice").unwrap().as_deref(), Some("Second"));
//! ```

mod bookmark;
mod clock;
mod engine;
mod error;
mod session;
mod shuffle;
mod source;
pub mod types;

// Public exports
pub use bookmark::{Bookmark, BookmarkStore};
pub use clock::SimulationClock;
pub use engine::PlaybackEngine;
pub use error::{PlaybackError, Result};
pub use session::PlaybackSession;
pub use source::{CollectionSource, PlayableSource};
pub use types::{EngineStatus, RepeatMode, SourceKind, TrackRef};
