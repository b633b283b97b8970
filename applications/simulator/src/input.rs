//! Wire models for the library file and the command trace
//!
//! Field names follow the JSON the original trace format uses: camelCase,
//! with `username` and `timestamp` on every command record.

use serde::Deserialize;
use tide_core::{Album, Podcast, Track};

/// The full library description loaded at startup
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    /// Standalone songs
    #[serde(default)]
    pub songs: Vec<Track>,

    /// Podcasts with their episodes
    #[serde(default)]
    pub podcasts: Vec<Podcast>,

    /// Albums with their tracks
    #[serde(default)]
    pub albums: Vec<Album>,

    /// Playlists referencing songs by name
    #[serde(default)]
    pub playlists: Vec<PlaylistInput>,

    /// User accounts
    #[serde(default)]
    pub users: Vec<UserInput>,
}

/// A playlist in the library file; songs are referenced by name
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistInput {
    pub name: String,
    pub owner: String,
    #[serde(default)]
    pub songs: Vec<String>,
}

/// A user account in the library file
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    pub username: String,
    pub age: u32,
    pub city: String,
    /// "user" (default), "artist", or "host"
    #[serde(default, rename = "type")]
    pub user_type: Option<String>,
}

/// What a load command points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Song,
    Playlist,
    Album,
    Podcast,
}

/// One record of the command trace
#[derive(Debug, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Command {
    /// Load a source into the user's engine
    Load {
        username: String,
        timestamp: u64,
        #[serde(rename = "type")]
        item_type: ItemType,
        name: String,
    },

    /// Toggle pause
    PlayPause { username: String, timestamp: u64 },

    /// Cycle the repeat mode
    Repeat { username: String, timestamp: u64 },

    /// Toggle shuffle with a seed
    Shuffle {
        username: String,
        timestamp: u64,
        seed: u64,
    },

    /// Skip one podcast episode forward
    Forward { username: String, timestamp: u64 },

    /// Skip one podcast episode back
    Backward { username: String, timestamp: u64 },

    /// Jump to the next track
    Next { username: String, timestamp: u64 },

    /// Jump to the previous track
    Prev { username: String, timestamp: u64 },

    /// Engine status snapshot
    Status { username: String, timestamp: u64 },

    /// Flip a user's online status
    SwitchConnectionStatus { username: String, timestamp: u64 },

    /// List users currently online
    GetOnlineUsers { timestamp: u64 },

    /// Create a user account
    AddUser {
        username: String,
        timestamp: u64,
        age: u32,
        city: String,
        #[serde(default, rename = "type")]
        user_type: Option<String>,
    },

    /// Delete a user account (guarded by playback activity)
    DeleteUser { username: String, timestamp: u64 },

    /// A host removes one of their podcasts (guarded)
    RemovePodcast {
        username: String,
        timestamp: u64,
        name: String,
    },

    /// An artist removes one of their albums (guarded)
    RemoveAlbum {
        username: String,
        timestamp: u64,
        name: String,
    },

    /// Advance the simulated clock with no other effect
    AdvanceTime { timestamp: u64 },
}

impl Command {
    /// The command keyword as it appeared in the trace
    pub fn keyword(&self) -> &'static str {
        match self {
            Command::Load { .. } => "load",
            Command::PlayPause { .. } => "playPause",
            Command::Repeat { .. } => "repeat",
            Command::Shuffle { .. } => "shuffle",
            Command::Forward { .. } => "forward",
            Command::Backward { .. } => "backward",
            Command::Next { .. } => "next",
            Command::Prev { .. } => "prev",
            Command::Status { .. } => "status",
            Command::SwitchConnectionStatus { .. } => "switchConnectionStatus",
            Command::GetOnlineUsers { .. } => "getOnlineUsers",
            Command::AddUser { .. } => "addUser",
            Command::DeleteUser { .. } => "deleteUser",
            Command::RemovePodcast { .. } => "removePodcast",
            Command::RemoveAlbum { .. } => "removeAlbum",
            Command::AdvanceTime { .. } => "advanceTime",
        }
    }

    /// Timestamp the clock must reach before this command runs
    pub fn timestamp(&self) -> u64 {
        match self {
            Command::Load { timestamp, .. }
            | Command::PlayPause { timestamp, .. }
            | Command::Repeat { timestamp, .. }
            | Command::Shuffle { timestamp, .. }
            | Command::Forward { timestamp, .. }
            | Command::Backward { timestamp, .. }
            | Command::Next { timestamp, .. }
            | Command::Prev { timestamp, .. }
            | Command::Status { timestamp, .. }
            | Command::SwitchConnectionStatus { timestamp, .. }
            | Command::GetOnlineUsers { timestamp }
            | Command::AddUser { timestamp, .. }
            | Command::DeleteUser { timestamp, .. }
            | Command::RemovePodcast { timestamp, .. }
            | Command::RemoveAlbum { timestamp, .. }
            | Command::AdvanceTime { timestamp } => *timestamp,
        }
    }

    /// The acting user, when the command has one
    pub fn username(&self) -> Option<&str> {
        match self {
            Command::Load { username, .. }
            | Command::PlayPause { username, .. }
            | Command::Repeat { username, .. }
            | Command::Shuffle { username, .. }
            | Command::Forward { username, .. }
            | Command::Backward { username, .. }
            | Command::Next { username, .. }
            | Command::Prev { username, .. }
            | Command::Status { username, .. }
            | Command::SwitchConnectionStatus { username, .. }
            | Command::AddUser { username, .. }
            | Command::DeleteUser { username, .. }
            | Command::RemovePodcast { username, .. }
            | Command::RemoveAlbum { username, .. } => Some(username),
            Command::GetOnlineUsers { .. } | Command::AdvanceTime { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_command_parses() {
        let json = r#"{
            "command": "load",
            "username": "alice",
            "timestamp": 30,
            "type": "playlist",
            "name": "mix"
        }"#;
        let command: Command = serde_json::from_str(json).unwrap();
        assert_eq!(command.keyword(), "load");
        assert_eq!(command.timestamp(), 30);
        assert_eq!(command.username(), Some("alice"));
        assert!(matches!(
            command,
            Command::Load {
                item_type: ItemType::Playlist,
                ..
            }
        ));
    }

    #[test]
    fn shuffle_carries_seed() {
        let json = r#"{"command": "shuffle", "username": "bob", "timestamp": 5, "seed": 42}"#;
        let command: Command = serde_json::from_str(json).unwrap();
        assert!(matches!(command, Command::Shuffle { seed: 42, .. }));
    }

    #[test]
    fn trace_parses_as_array() {
        let json = r#"[
            {"command": "load", "username": "a", "timestamp": 1, "type": "song", "name": "x"},
            {"command": "playPause", "username": "a", "timestamp": 2},
            {"command": "advanceTime", "timestamp": 10}
        ]"#;
        let commands: Vec<Command> = serde_json::from_str(json).unwrap();
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[2].username(), None);
    }

    #[test]
    fn library_defaults_to_empty_sections() {
        let library: Library = serde_json::from_str(r#"{"songs": []}"#).unwrap();
        assert!(library.podcasts.is_empty());
        assert!(library.users.is_empty());
    }
}
