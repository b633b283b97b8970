//! The catalog: every library entity, owned in one place
//!
//! The catalog is the application context of the simulation. It is created
//! once, passed by reference, and mutated only through its own add/remove
//! operations. It performs no playback checks itself: callers that need a
//! deletion guard ask the playback layer first and only then notify the
//! catalog.

use crate::error::{CoreError, Result};
use crate::types::{Album, Playlist, Podcast, Track, User, UserRole};

/// Everything removed alongside a user
///
/// Removing a host tears down their podcasts; the playback layer needs the
/// names to invalidate bookmarks.
#[derive(Debug)]
pub struct UserRemoval {
    /// The removed account
    pub user: User,

    /// Names of podcasts removed with a host account
    pub podcasts: Vec<String>,
}

/// Owned registry of songs, albums, podcasts, playlists, and users
#[derive(Debug, Default)]
pub struct Catalog {
    songs: Vec<Track>,
    albums: Vec<Album>,
    podcasts: Vec<Podcast>,
    playlists: Vec<Playlist>,
    users: Vec<User>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Lookups =====

    /// Find a song by name
    pub fn song(&self, name: &str) -> Option<&Track> {
        self.songs.iter().find(|s| s.name == name)
    }

    /// Find an album by name
    pub fn album(&self, name: &str) -> Option<&Album> {
        self.albums.iter().find(|a| a.name == name)
    }

    /// Find a podcast by name
    pub fn podcast(&self, name: &str) -> Option<&Podcast> {
        self.podcasts.iter().find(|p| p.name == name)
    }

    /// Find a playlist by name
    pub fn playlist(&self, name: &str) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.name == name)
    }

    /// Find a user by username
    pub fn user(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    /// Find a user by username, mutably
    pub fn user_mut(&mut self, username: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.username == username)
    }

    /// All usernames, regular accounts first, then artists, then hosts
    pub fn all_usernames(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.users.len());
        for role in [UserRole::Regular, UserRole::Artist, UserRole::Host] {
            names.extend(
                self.users
                    .iter()
                    .filter(|u| u.role == role)
                    .map(|u| u.username.clone()),
            );
        }
        names
    }

    /// Usernames of users currently online
    pub fn online_usernames(&self) -> Vec<String> {
        self.users
            .iter()
            .filter(|u| u.online)
            .map(|u| u.username.clone())
            .collect()
    }

    /// All users, in insertion order
    pub fn users(&self) -> &[User] {
        &self.users
    }

    // ===== Additions =====

    /// Add a standalone song
    ///
    /// Duplicate names are allowed: distinct albums may reuse a title.
    pub fn add_song(&mut self, song: Track) {
        self.songs.push(song);
    }

    /// Add an album; its tracks also become loadable as standalone songs
    pub fn add_album(&mut self, album: Album) -> Result<()> {
        if self.album(&album.name).is_some() {
            return Err(CoreError::duplicate(format!("album {}", album.name)));
        }
        self.songs.extend(album.tracks.iter().cloned());
        self.albums.push(album);
        Ok(())
    }

    /// Add a podcast
    pub fn add_podcast(&mut self, podcast: Podcast) -> Result<()> {
        if self.podcast(&podcast.name).is_some() {
            return Err(CoreError::duplicate(format!("podcast {}", podcast.name)));
        }
        self.podcasts.push(podcast);
        Ok(())
    }

    /// Add a playlist assembled ahead of time (library load)
    pub fn add_playlist(&mut self, playlist: Playlist) -> Result<()> {
        if self
            .playlists
            .iter()
            .any(|p| p.name == playlist.name && p.owner == playlist.owner)
        {
            return Err(CoreError::duplicate(format!("playlist {}", playlist.name)));
        }
        self.playlists.push(playlist);
        Ok(())
    }

    /// Create an empty playlist owned by `owner`
    pub fn create_playlist(
        &mut self,
        name: impl Into<String>,
        owner: impl Into<String>,
        created_at: u64,
    ) -> Result<()> {
        self.add_playlist(Playlist::new(name, owner, created_at))
    }

    /// Add a user account
    pub fn add_user(&mut self, user: User) -> Result<()> {
        if self.user(&user.username).is_some() {
            return Err(CoreError::duplicate(format!("user {}", user.username)));
        }
        self.users.push(user);
        Ok(())
    }

    // ===== Removal notifications =====

    /// Remove a podcast by name
    pub fn remove_podcast(&mut self, name: &str) -> Result<Podcast> {
        let index = self
            .podcasts
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| CoreError::not_found("podcast", name))?;
        Ok(self.podcasts.remove(index))
    }

    /// Remove an album by name, along with its standalone song entries
    pub fn remove_album(&mut self, name: &str) -> Result<Album> {
        let index = self
            .albums
            .iter()
            .position(|a| a.name == name)
            .ok_or_else(|| CoreError::not_found("album", name))?;
        let album = self.albums.remove(index);
        self.songs
            .retain(|s| !(s.album == album.name && s.artist == album.owner));
        Ok(album)
    }

    /// Remove a user, cascading to everything the account owns
    ///
    /// Artists take their albums and songs with them, hosts their podcasts,
    /// regular users their playlists.
    pub fn remove_user(&mut self, username: &str) -> Result<UserRemoval> {
        let index = self
            .users
            .iter()
            .position(|u| u.username == username)
            .ok_or_else(|| CoreError::not_found("user", username))?;
        let user = self.users.remove(index);

        let mut podcasts = Vec::new();
        match user.role {
            UserRole::Artist => {
                self.albums.retain(|a| a.owner != user.username);
                self.songs.retain(|s| s.artist != user.username);
            }
            UserRole::Host => {
                let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.podcasts)
                    .into_iter()
                    .partition(|p| p.owner == user.username);
                self.podcasts = kept;
                podcasts = removed.into_iter().map(|p| p.name).collect();
            }
            UserRole::Regular => {
                self.playlists.retain(|p| p.owner != user.username);
            }
        }

        Ok(UserRemoval { user, podcasts })
    }
}
