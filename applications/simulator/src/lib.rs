//! Tide Player simulator
//!
//! Replays a command trace against a library of songs, podcasts, albums,
//! playlists, and users. Every command carries a timestamp; the runner
//! advances the shared simulated clock to it (ticking every engine) before
//! dispatching, and produces one outcome record per command.

pub mod input;
pub mod runner;

pub use input::{Command, Library};
pub use runner::{Outcome, Runner};
