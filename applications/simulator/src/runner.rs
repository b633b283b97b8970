//! Trace replay
//!
//! Builds the catalog and the playback session from a library description,
//! then executes commands one at a time. The clock is advanced to each
//! command's timestamp before dispatch, so every engine is up to date when
//! the command runs.

use anyhow::{bail, Context};
use serde::Serialize;

use tide_core::{Catalog, Playlist, User, UserRole, Visibility};
use tide_playback::{
    EngineStatus, PlaybackError, PlaybackSession, PlayableSource, SourceKind, TrackRef,
};

use crate::input::{Command, ItemType, Library};

/// One output record per executed command
#[derive(Debug, Serialize)]
pub struct Outcome {
    /// The command keyword
    pub command: String,

    /// The acting user, when the command had one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// The trace timestamp the command ran at
    pub timestamp: u64,

    /// Human-readable result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Engine snapshot, for status commands
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<EngineStatus>,

    /// Name listing, for query commands
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Vec<String>>,
}

impl Outcome {
    fn message(
        command: &str,
        user: Option<String>,
        timestamp: u64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            command: command.to_string(),
            user,
            timestamp,
            message: Some(message.into()),
            stats: None,
            result: None,
        }
    }

    fn stats(command: &str, user: Option<String>, timestamp: u64, stats: EngineStatus) -> Self {
        Self {
            command: command.to_string(),
            user,
            timestamp,
            message: None,
            stats: Some(stats),
            result: None,
        }
    }

    fn listing(command: &str, timestamp: u64, result: Vec<String>) -> Self {
        Self {
            command: command.to_string(),
            user: None,
            timestamp,
            message: None,
            stats: None,
            result: Some(result),
        }
    }
}

/// Replays a command trace against one catalog and one session
pub struct Runner {
    catalog: Catalog,
    session: PlaybackSession,
}

impl Runner {
    /// Build the catalog and per-user engines from a library description
    pub fn new(library: Library) -> anyhow::Result<Self> {
        let mut catalog = Catalog::new();
        let mut session = PlaybackSession::new();

        for song in library.songs {
            catalog.add_song(song);
        }
        for podcast in library.podcasts {
            let name = podcast.name.clone();
            catalog
                .add_podcast(podcast)
                .with_context(|| format!("library podcast {name}"))?;
        }
        for album in library.albums {
            let name = album.name.clone();
            catalog
                .add_album(album)
                .with_context(|| format!("library album {name}"))?;
        }
        for user in library.users {
            let role = parse_role(user.user_type.as_deref());
            catalog
                .add_user(User::with_role(
                    user.username.clone(),
                    user.age,
                    user.city,
                    role,
                ))
                .with_context(|| format!("library user {}", user.username))?;
            session.add_user(user.username);
        }
        for playlist in library.playlists {
            let mut tracks = Vec::with_capacity(playlist.songs.len());
            for song_name in &playlist.songs {
                match catalog.song(song_name) {
                    Some(song) => tracks.push(song.clone()),
                    None => bail!(
                        "playlist {} references unknown song {song_name}",
                        playlist.name
                    ),
                }
            }
            catalog
                .add_playlist(Playlist {
                    name: playlist.name.clone(),
                    owner: playlist.owner,
                    tracks,
                    visibility: Visibility::Public,
                    created_at: 0,
                })
                .with_context(|| format!("library playlist {}", playlist.name))?;
        }

        Ok(Self { catalog, session })
    }

    /// Execute every command in order
    pub fn run(&mut self, commands: Vec<Command>) -> Vec<Outcome> {
        commands
            .into_iter()
            .map(|command| self.execute(command))
            .collect()
    }

    /// Advance the clock to the command's timestamp, then dispatch it
    pub fn execute(&mut self, command: Command) -> Outcome {
        let keyword = command.keyword();
        let timestamp = command.timestamp();
        let user = command.username().map(str::to_string);

        if let Err(err) = self.session.advance_to(timestamp) {
            return Outcome::message(keyword, user, timestamp, err.to_string());
        }
        tracing::debug!(command = keyword, timestamp, "executing");

        match command {
            Command::Load {
                username,
                item_type,
                name,
                ..
            } => {
                let message = self.load(&username, item_type, &name);
                Outcome::message(keyword, Some(username), timestamp, message)
            }

            Command::PlayPause { username, .. } => {
                let message = match self.session.pause_toggle(&username) {
                    Ok(true) => "Playback paused successfully.".to_string(),
                    Ok(false) => "Playback resumed successfully.".to_string(),
                    Err(PlaybackError::NoSourceLoaded) => {
                        "Please load a source before attempting to pause or resume playback."
                            .to_string()
                    }
                    Err(err) => unknown_user_or(err),
                };
                Outcome::message(keyword, Some(username), timestamp, message)
            }

            Command::Repeat { username, .. } => {
                let message = match self.session.cycle_repeat(&username) {
                    Ok(mode) => format!("Repeat mode changed to {}.", mode.label()),
                    Err(PlaybackError::NoSourceLoaded) => {
                        "Please load a source before setting the repeat status.".to_string()
                    }
                    Err(err) => unknown_user_or(err),
                };
                Outcome::message(keyword, Some(username), timestamp, message)
            }

            Command::Shuffle { username, seed, .. } => {
                let message = match self.session.toggle_shuffle(&username, seed) {
                    Ok(true) => "Shuffle function activated successfully.".to_string(),
                    Ok(false) => "Shuffle function deactivated successfully.".to_string(),
                    Err(PlaybackError::NoSourceLoaded) => {
                        "Please load a source before using the shuffle function.".to_string()
                    }
                    Err(PlaybackError::InvalidModeForSourceType(message)) => message,
                    Err(err) => unknown_user_or(err),
                };
                Outcome::message(keyword, Some(username), timestamp, message)
            }

            Command::Forward { username, .. } => {
                let message = match self.session.skip_forward(&username) {
                    Ok(()) => "Skipped forward successfully.".to_string(),
                    Err(PlaybackError::NoSourceLoaded) => {
                        "Please load a source before attempting to forward.".to_string()
                    }
                    Err(PlaybackError::InvalidModeForSourceType(message)) => message,
                    Err(err) => unknown_user_or(err),
                };
                Outcome::message(keyword, Some(username), timestamp, message)
            }

            Command::Backward { username, .. } => {
                let message = match self.session.skip_backward(&username) {
                    Ok(()) => "Rewound successfully.".to_string(),
                    Err(PlaybackError::NoSourceLoaded) => {
                        "Please select a source before rewinding.".to_string()
                    }
                    Err(PlaybackError::InvalidModeForSourceType(message)) => message,
                    Err(err) => unknown_user_or(err),
                };
                Outcome::message(keyword, Some(username), timestamp, message)
            }

            Command::Next { username, .. } => {
                let message = match self.session.next(&username) {
                    Ok(Some(track)) => format!(
                        "Skipped to next track successfully. The current track is {track}."
                    ),
                    Ok(None) | Err(PlaybackError::NoSourceLoaded) => {
                        "Please load a source before skipping to the next track.".to_string()
                    }
                    Err(err) => unknown_user_or(err),
                };
                Outcome::message(keyword, Some(username), timestamp, message)
            }

            Command::Prev { username, .. } => {
                let message = match self.session.prev(&username) {
                    Ok(track) => format!(
                        "Returned to previous track successfully. The current track is {track}."
                    ),
                    Err(PlaybackError::NoSourceLoaded) => {
                        "Please load a source before returning to the previous track.".to_string()
                    }
                    Err(err) => unknown_user_or(err),
                };
                Outcome::message(keyword, Some(username), timestamp, message)
            }

            Command::Status { username, .. } => match self.session.status(&username) {
                Ok(stats) => Outcome::stats(keyword, Some(username), timestamp, stats),
                Err(err) => {
                    let message = unknown_user_or(err);
                    Outcome::message(keyword, Some(username), timestamp, message)
                }
            },

            Command::SwitchConnectionStatus { username, .. } => {
                let message = self.switch_connection_status(&username);
                Outcome::message(keyword, Some(username), timestamp, message)
            }

            Command::GetOnlineUsers { .. } => {
                Outcome::listing(keyword, timestamp, self.catalog.online_usernames())
            }

            Command::AddUser {
                username,
                age,
                city,
                user_type,
                ..
            } => {
                let role = parse_role(user_type.as_deref());
                let message = match self
                    .catalog
                    .add_user(User::with_role(username.clone(), age, city, role))
                {
                    Ok(()) => {
                        self.session.add_user(username.clone());
                        format!("The username {username} has been added successfully.")
                    }
                    Err(_) => format!("The username {username} is already taken."),
                };
                Outcome::message(keyword, Some(username), timestamp, message)
            }

            Command::DeleteUser { username, .. } => {
                let message = self.delete_user(&username);
                Outcome::message(keyword, Some(username), timestamp, message)
            }

            Command::RemovePodcast { username, name, .. } => {
                let message = self.remove_podcast(&username, &name);
                Outcome::message(keyword, Some(username), timestamp, message)
            }

            Command::RemoveAlbum { username, name, .. } => {
                let message = self.remove_album(&username, &name);
                Outcome::message(keyword, Some(username), timestamp, message)
            }

            Command::AdvanceTime { .. } => {
                Outcome::message(keyword, None, timestamp, "Time advanced successfully.")
            }
        }
    }

    // ===== Command bodies =====

    fn load(&mut self, username: &str, item_type: ItemType, name: &str) -> String {
        if self.catalog.user(username).is_none() {
            return format!("The username {username} doesn't exist.");
        }
        let source = match self.resolve_source(item_type, name) {
            Ok(source) => source,
            Err(message) => return message,
        };
        match self.session.load(username, source) {
            Ok(()) => "Playback loaded successfully.".to_string(),
            Err(err) => unknown_user_or(err),
        }
    }

    /// Copy a catalog entry into an engine-owned playable source
    fn resolve_source(&self, item_type: ItemType, name: &str) -> Result<PlayableSource, String> {
        const MISSING: &str = "The specified source does not exist.";
        const EMPTY: &str = "You can't load an empty audio collection!";

        let empty = |_: PlaybackError| EMPTY.to_string();
        match item_type {
            ItemType::Song => self
                .catalog
                .song(name)
                .map(|song| {
                    PlayableSource::song(TrackRef::song(
                        song.name.clone(),
                        song.duration,
                        song.artist.clone(),
                    ))
                })
                .ok_or_else(|| MISSING.to_string()),
            ItemType::Playlist => {
                let playlist = self.catalog.playlist(name).ok_or(MISSING)?;
                let tracks = playlist
                    .tracks
                    .iter()
                    .map(|t| TrackRef::song(t.name.clone(), t.duration, t.artist.clone()))
                    .collect();
                PlayableSource::playlist(playlist.name.as_str(), playlist.owner.as_str(), tracks)
                    .map_err(empty)
            }
            ItemType::Album => {
                let album = self.catalog.album(name).ok_or(MISSING)?;
                let tracks = album
                    .tracks
                    .iter()
                    .map(|t| TrackRef::song(t.name.clone(), t.duration, t.artist.clone()))
                    .collect();
                PlayableSource::album(album.name.as_str(), album.owner.as_str(), tracks)
                    .map_err(empty)
            }
            ItemType::Podcast => {
                let podcast = self.catalog.podcast(name).ok_or(MISSING)?;
                let episodes = podcast
                    .episodes
                    .iter()
                    .map(|e| TrackRef::episode(e.name.clone(), e.duration))
                    .collect();
                PlayableSource::podcast(podcast.name.as_str(), podcast.owner.as_str(), episodes)
                    .map_err(empty)
            }
        }
    }

    fn switch_connection_status(&mut self, username: &str) -> String {
        match self.catalog.user_mut(username) {
            None => format!("The username {username} doesn't exist."),
            Some(user) if user.role != UserRole::Regular => {
                format!("{username} is not a normal user.")
            }
            Some(user) => {
                user.switch_connection_status();
                let online = user.online;
                let _ = self.session.set_online(username, online);
                format!("{username} has changed status successfully.")
            }
        }
    }

    fn delete_user(&mut self, username: &str) -> String {
        if self.catalog.user(username).is_none() {
            return format!("The username {username} doesn't exist.");
        }
        // the playback-activity guard reads engine state, never mutates it
        if self.session.owner_content_active(username) {
            return format!("{username} can't be deleted.");
        }
        match self.catalog.remove_user(username) {
            Ok(removal) => {
                self.session.user_removed(username, &removal.podcasts);
                format!("{username} was successfully deleted.")
            }
            Err(err) => err.to_string(),
        }
    }

    fn remove_podcast(&mut self, username: &str, name: &str) -> String {
        match self.catalog.user(username) {
            None => return format!("The username {username} doesn't exist."),
            Some(user) if user.role != UserRole::Host => {
                return format!("{username} is not a host.");
            }
            Some(_) => {}
        }
        if self
            .catalog
            .podcast(name)
            .map_or(true, |podcast| podcast.owner != username)
        {
            return format!("{username} doesn't have a podcast with the given name.");
        }
        if self.session.collection_active(name, SourceKind::Podcast) {
            return format!("{username} can't delete this podcast.");
        }
        match self.catalog.remove_podcast(name) {
            Ok(_) => {
                self.session.podcast_removed(name);
                format!("{username} deleted the podcast successfully.")
            }
            Err(err) => err.to_string(),
        }
    }

    fn remove_album(&mut self, username: &str, name: &str) -> String {
        match self.catalog.user(username) {
            None => return format!("The username {username} doesn't exist."),
            Some(user) if user.role != UserRole::Artist => {
                return format!("{username} is not an artist.");
            }
            Some(_) => {}
        }
        if self
            .catalog
            .album(name)
            .map_or(true, |album| album.owner != username)
        {
            return format!("{username} doesn't have an album with the given name.");
        }
        // blocked while the album, or any song by its artist, is playing
        if self.session.collection_active(name, SourceKind::Album)
            || self.session.owner_content_active(username)
        {
            return format!("{username} can't delete this album.");
        }
        match self.catalog.remove_album(name) {
            Ok(_) => {
                self.session.album_removed(name);
                format!("{username} deleted the album successfully.")
            }
            Err(err) => err.to_string(),
        }
    }
}

fn parse_role(user_type: Option<&str>) -> UserRole {
    match user_type {
        Some("artist") => UserRole::Artist,
        Some("host") => UserRole::Host,
        _ => UserRole::Regular,
    }
}

/// Map the cross-cutting errors a session can return from any operation
fn unknown_user_or(err: PlaybackError) -> String {
    match err {
        PlaybackError::UnknownUser(username) => {
            format!("The username {username} doesn't exist.")
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Library;

    fn library() -> Library {
        serde_json::from_str(
            r#"{
                "songs": [
                    {"name": "First", "duration": 100, "album": "Debut",
                     "artist": "Band", "genre": "pop"},
                    {"name": "Second", "duration": 50, "album": "Debut",
                     "artist": "Band", "genre": "pop"}
                ],
                "podcasts": [
                    {"name": "Deep Dive", "owner": "carol", "episodes": [
                        {"name": "Ep 0", "duration": 600},
                        {"name": "Ep 1", "duration": 900}
                    ]}
                ],
                "playlists": [
                    {"name": "mix", "owner": "alice", "songs": ["First", "Second"]}
                ],
                "users": [
                    {"username": "alice", "age": 25, "city": "Lisbon"},
                    {"username": "carol", "age": 40, "city": "Oslo", "type": "host"}
                ]
            }"#,
        )
        .unwrap()
    }

    fn trace(json: &str) -> Vec<Command> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn load_and_advance_produces_expected_track() {
        let mut runner = Runner::new(library()).unwrap();
        let outcomes = runner.run(trace(
            r#"[
                {"command": "load", "username": "alice", "timestamp": 10,
                 "type": "playlist", "name": "mix"},
                {"command": "status", "username": "alice", "timestamp": 130}
            ]"#,
        ));

        assert_eq!(
            outcomes[0].message.as_deref(),
            Some("Playback loaded successfully.")
        );
        let stats = outcomes[1].stats.as_ref().unwrap();
        assert_eq!(stats.name, "Second");
        assert_eq!(stats.remained_time, 30); // 120 elapsed into [100, 50]
    }

    #[test]
    fn pause_freezes_between_commands() {
        let mut runner = Runner::new(library()).unwrap();
        let outcomes = runner.run(trace(
            r#"[
                {"command": "load", "username": "alice", "timestamp": 0,
                 "type": "song", "name": "First"},
                {"command": "playPause", "username": "alice", "timestamp": 40},
                {"command": "status", "username": "alice", "timestamp": 90}
            ]"#,
        ));

        assert_eq!(
            outcomes[1].message.as_deref(),
            Some("Playback paused successfully.")
        );
        let stats = outcomes[2].stats.as_ref().unwrap();
        assert_eq!(stats.remained_time, 60); // frozen at offset 40
        assert!(stats.paused);
    }

    #[test]
    fn guarded_podcast_removal() {
        let mut runner = Runner::new(library()).unwrap();
        let outcomes = runner.run(trace(
            r#"[
                {"command": "load", "username": "alice", "timestamp": 0,
                 "type": "podcast", "name": "Deep Dive"},
                {"command": "removePodcast", "username": "carol", "timestamp": 5,
                 "name": "Deep Dive"},
                {"command": "playPause", "username": "alice", "timestamp": 10},
                {"command": "removePodcast", "username": "carol", "timestamp": 15,
                 "name": "Deep Dive"}
            ]"#,
        ));

        assert_eq!(
            outcomes[1].message.as_deref(),
            Some("carol can't delete this podcast.")
        );
        // once alice pauses, the guard releases
        assert_eq!(
            outcomes[3].message.as_deref(),
            Some("carol deleted the podcast successfully.")
        );
    }

    #[test]
    fn role_checks_use_match_dispatch() {
        let mut runner = Runner::new(library()).unwrap();
        let outcomes = runner.run(trace(
            r#"[
                {"command": "removePodcast", "username": "alice", "timestamp": 0,
                 "name": "Deep Dive"},
                {"command": "switchConnectionStatus", "username": "carol", "timestamp": 1}
            ]"#,
        ));

        assert_eq!(outcomes[0].message.as_deref(), Some("alice is not a host."));
        assert_eq!(
            outcomes[1].message.as_deref(),
            Some("carol is not a normal user.")
        );
    }

    #[test]
    fn offline_user_freezes_and_listing_reflects_it() {
        let mut runner = Runner::new(library()).unwrap();
        let outcomes = runner.run(trace(
            r#"[
                {"command": "load", "username": "alice", "timestamp": 0,
                 "type": "song", "name": "First"},
                {"command": "switchConnectionStatus", "username": "alice", "timestamp": 20},
                {"command": "getOnlineUsers", "timestamp": 30},
                {"command": "switchConnectionStatus", "username": "alice", "timestamp": 60},
                {"command": "status", "username": "alice", "timestamp": 70}
            ]"#,
        ));

        let online = outcomes[2].result.as_ref().unwrap();
        assert_eq!(online, &["carol".to_string()]);
        // 20 online + 40 offline (frozen) + 10 online = offset 30
        let stats = outcomes[4].stats.as_ref().unwrap();
        assert_eq!(stats.remained_time, 70);
    }

    #[test]
    fn backwards_trace_timestamp_is_rejected() {
        let mut runner = Runner::new(library()).unwrap();
        let outcomes = runner.run(trace(
            r#"[
                {"command": "advanceTime", "timestamp": 100},
                {"command": "status", "username": "alice", "timestamp": 50}
            ]"#,
        ));
        assert!(outcomes[1]
            .message
            .as_deref()
            .unwrap()
            .contains("timestamp moved backwards"));
    }

    #[test]
    fn empty_collection_load_rejected() {
        let mut library = library();
        library.playlists.push(crate::input::PlaylistInput {
            name: "empty".to_string(),
            owner: "alice".to_string(),
            songs: Vec::new(),
        });
        let mut runner = Runner::new(library).unwrap();
        let outcomes = runner.run(trace(
            r#"[{"command": "load", "username": "alice", "timestamp": 0,
                 "type": "playlist", "name": "empty"}]"#,
        ));
        assert_eq!(
            outcomes[0].message.as_deref(),
            Some("You can't load an empty audio collection!")
        );
    }

    #[test]
    fn delete_user_guarded_by_owned_content() {
        let mut runner = Runner::new(library()).unwrap();
        let outcomes = runner.run(trace(
            r#"[
                {"command": "load", "username": "alice", "timestamp": 0,
                 "type": "podcast", "name": "Deep Dive"},
                {"command": "deleteUser", "username": "carol", "timestamp": 5},
                {"command": "playPause", "username": "alice", "timestamp": 10},
                {"command": "deleteUser", "username": "carol", "timestamp": 15},
                {"command": "deleteUser", "username": "carol", "timestamp": 20}
            ]"#,
        ));

        assert_eq!(
            outcomes[1].message.as_deref(),
            Some("carol can't be deleted.")
        );
        assert_eq!(
            outcomes[3].message.as_deref(),
            Some("carol was successfully deleted.")
        );
        assert_eq!(
            outcomes[4].message.as_deref(),
            Some("The username carol doesn't exist.")
        );
    }
}
