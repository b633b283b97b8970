//! Tide Player Core
//!
//! Domain types and the shared catalog for the Tide Player simulation.
//!
//! This crate defines:
//! - **Domain Types**: `Track`, `Episode`, `Playlist`, `Album`, `Podcast`, `User`
//! - **Catalog**: the owned application context holding every library entity
//! - **Error Handling**: unified `CoreError` and `Result` types
//!
//! The catalog replaces the global registries of a classic jukebox design
//! with an explicitly owned struct passed by reference: readers borrow it,
//! and the only writers are the catalog's own add/remove operations.

#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use catalog::Catalog;
pub use error::{CoreError, Result};
pub use types::{
    Album, CollectionKind, Episode, Playlist, Podcast, Track, User, UserRole, Visibility,
};
