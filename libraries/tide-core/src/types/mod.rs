mod collection;
mod track;
mod user;

pub use collection::{Album, CollectionKind, Playlist, Podcast, Visibility};
pub use track::{Episode, Track};
pub use user::{User, UserRole};
