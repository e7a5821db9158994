use crate::core::{FavoriteUniversity, KeyValueStore, University, UniversityKey};
use crate::utils::error::{Result, UnifinderError};
use chrono::Utc;
use serde_json::Value;
use std::collections::HashSet;
use tokio::sync::Mutex;
use uuid::Uuid;

pub const FAVORITES_KEY: &str = "unifinder_favorites";

/// The user's favorite universities, persisted as one JSON array under a
/// single storage key.
///
/// Every mutation loads the whole list, changes it and writes it back.
/// Mutations are serialized by an internal lock so overlapping calls on
/// the same store cannot lose each other's updates.
///
/// Read failures are logged and treated as an empty list; write failures
/// are returned to the caller.
pub struct FavoritesStore<S: KeyValueStore> {
    storage: S,
    key: String,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, FAVORITES_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the persisted list, surfacing `StorageReadError` when the
    /// stored value cannot be read or is not a JSON array. An absent key is
    /// an empty list. Individual records that cannot be decoded are skipped
    /// so one bad entry never hides the others.
    pub async fn try_list(&self) -> Result<Vec<FavoriteUniversity>> {
        let Some(json) = self.storage.get(&self.key).await? else {
            return Ok(Vec::new());
        };

        let items: Vec<Value> =
            serde_json::from_str(&json).map_err(|e| UnifinderError::StorageReadError {
                key: self.key.clone(),
                message: format!("stored favorites are corrupt: {}", e),
            })?;

        let mut favorites = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<FavoriteUniversity>(item) {
                Ok(favorite) => favorites.push(favorite),
                Err(e) => tracing::warn!(
                    "Skipping unreadable favorite {} in '{}': {}",
                    index,
                    self.key,
                    e
                ),
            }
        }
        Ok(favorites)
    }

    pub async fn list(&self) -> Vec<FavoriteUniversity> {
        match self.try_list().await {
            Ok(favorites) => favorites,
            Err(e) => {
                tracing::warn!("Error getting favorites, using an empty list: {}", e);
                Vec::new()
            }
        }
    }

    /// Appends a new favorite for `university`.
    ///
    /// No duplicate check is made: adding the same university twice yields
    /// two entries with different ids. Use [`is_favorite`](Self::is_favorite)
    /// or [`toggle`](Self::toggle) for idempotent behavior.
    pub async fn add(&self, university: &University) -> Result<FavoriteUniversity> {
        let _guard = self.write_lock.lock().await;

        let mut favorites = self.list().await;
        let favorite = new_favorite(university);
        favorites.push(favorite.clone());
        self.save(&favorites).await?;

        tracing::info!("Added favorite {} as {}", university.key(), favorite.id);
        Ok(favorite)
    }

    /// Adds `university` unless a favorite with the same name and country
    /// already exists. The check and the insert happen under one lock.
    /// Returns the new favorite, or `None` when it was already present.
    pub async fn add_if_absent(
        &self,
        university: &University,
    ) -> Result<Option<FavoriteUniversity>> {
        let _guard = self.write_lock.lock().await;

        let mut favorites = self.list().await;
        if favorites.iter().any(|fav| fav.matches(university)) {
            tracing::debug!("{} is already a favorite", university.key());
            return Ok(None);
        }

        let favorite = new_favorite(university);
        favorites.push(favorite.clone());
        self.save(&favorites).await?;

        tracing::info!("Added favorite {} as {}", university.key(), favorite.id);
        Ok(Some(favorite))
    }

    /// Removes every entry with `id`. Returns whether anything was removed;
    /// an unknown id is not an error.
    pub async fn remove(&self, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;

        let mut favorites = self.list().await;
        let before = favorites.len();
        favorites.retain(|fav| fav.id != id);
        let removed = favorites.len() != before;
        self.save(&favorites).await?;

        if removed {
            tracing::info!("Removed favorite {}", id);
        } else {
            tracing::debug!("No favorite with id {} to remove", id);
        }
        Ok(removed)
    }

    /// Whether any favorite has the same name and country as `university`.
    pub async fn is_favorite(&self, university: &University) -> bool {
        self.list().await.iter().any(|fav| fav.matches(university))
    }

    /// First favorite with the same name and country as `university`.
    pub async fn find(&self, university: &University) -> Option<FavoriteUniversity> {
        self.list()
            .await
            .into_iter()
            .find(|fav| fav.matches(university))
    }

    pub async fn favorite_keys(&self) -> HashSet<UniversityKey> {
        self.list().await.iter().map(|fav| fav.key()).collect()
    }

    /// Removes the favorite matching `university` if there is one, otherwise
    /// adds it. Returns whether the university is a favorite afterwards.
    pub async fn toggle(&self, university: &University) -> Result<bool> {
        let _guard = self.write_lock.lock().await;

        let mut favorites = self.list().await;
        let existing = favorites
            .iter()
            .find(|fav| fav.matches(university))
            .map(|fav| fav.id.clone());

        let now_favorite = match existing {
            Some(id) => {
                favorites.retain(|fav| fav.id != id);
                tracing::info!("Removed favorite {} ({})", university.key(), id);
                false
            }
            None => {
                let favorite = new_favorite(university);
                tracing::info!("Added favorite {} as {}", university.key(), favorite.id);
                favorites.push(favorite);
                true
            }
        };

        self.save(&favorites).await?;
        Ok(now_favorite)
    }

    async fn save(&self, favorites: &[FavoriteUniversity]) -> Result<()> {
        let json =
            serde_json::to_string(favorites).map_err(|e| UnifinderError::StorageWriteError {
                key: self.key.clone(),
                message: e.to_string(),
            })?;

        self.storage.set(&self.key, &json).await.map_err(|e| {
            tracing::error!("Error saving favorites: {}", e);
            e
        })
    }
}

fn new_favorite(university: &University) -> FavoriteUniversity {
    // The random suffix keeps ids unique even for rapid repeated adds.
    let id = format!(
        "{}-{}-{}",
        university.name,
        university.country,
        Uuid::new_v4().simple()
    );
    FavoriteUniversity::new(university.clone(), id, Utc::now())
}
