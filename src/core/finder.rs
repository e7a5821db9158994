use crate::core::favorites::FavoritesStore;
use crate::core::{KeyValueStore, SearchHit, University, UniversityDirectory};
use crate::utils::error::{Result, UnifinderError};
use crate::utils::validation::validate_country;

/// Search results and favorites side by side, the way the screens use them.
pub struct UniFinder<D: UniversityDirectory, S: KeyValueStore> {
    directory: D,
    favorites: FavoritesStore<S>,
}

impl<D: UniversityDirectory, S: KeyValueStore> UniFinder<D, S> {
    pub fn new(directory: D, favorites: FavoritesStore<S>) -> Self {
        Self {
            directory,
            favorites,
        }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn favorites(&self) -> &FavoritesStore<S> {
        &self.favorites
    }

    /// Searches a country and marks results that are already favorites.
    /// A blank country is rejected before any request is made.
    pub async fn search(&self, country: &str) -> Result<Vec<SearchHit>> {
        let country = validate_country(country)?;
        let universities = self.directory.search_by_country(country).await?;
        if universities.is_empty() {
            tracing::info!("No universities found for {}", country);
        }
        Ok(self.annotate(universities).await)
    }

    pub async fn search_all(&self) -> Result<Vec<SearchHit>> {
        let universities = self.directory.fetch_all().await?;
        Ok(self.annotate(universities).await)
    }

    /// Finds the university called `name` in `country`'s results.
    pub async fn lookup(&self, country: &str, name: &str) -> Result<University> {
        let country = validate_country(country)?;
        self.directory
            .search_by_country(country)
            .await?
            .into_iter()
            .find(|uni| uni.name == name)
            .ok_or_else(|| UnifinderError::NotFound {
                message: format!("No university named '{}' in {}", name, country),
            })
    }

    /// Looks the university up and adds it unless it is already a favorite.
    /// Returns the university and whether a new favorite was created.
    pub async fn favorite_by_name(&self, country: &str, name: &str) -> Result<(University, bool)> {
        let university = self.lookup(country, name).await?;
        let created = self.favorites.add_if_absent(&university).await?.is_some();
        Ok((university, created))
    }

    /// Whether `name` in `country` is a favorite. Only the identity pair is
    /// compared, so no directory request is made.
    pub async fn is_favorite_by_name(&self, country: &str, name: &str) -> Result<bool> {
        let country = validate_country(country)?;
        Ok(self
            .favorites
            .is_favorite(&University::new(name, country, ""))
            .await)
    }

    /// Flips the favorite state of a university by its identity pair.
    /// Only adding needs the full record, so the directory is consulted
    /// only when the pair is not yet a favorite.
    pub async fn toggle_by_name(&self, country: &str, name: &str) -> Result<bool> {
        let country = validate_country(country)?;
        let pair = University::new(name, country, "");
        if let Some(existing) = self.favorites.find(&pair).await {
            self.favorites.remove(&existing.id).await?;
            return Ok(false);
        }
        let university = self.lookup(country, name).await?;
        self.favorites.toggle(&university).await
    }

    async fn annotate(&self, universities: Vec<University>) -> Vec<SearchHit> {
        let keys = self.favorites.favorite_keys().await;
        universities
            .into_iter()
            .map(|university| SearchHit {
                is_favorite: keys.contains(&university.key()),
                university,
            })
            .collect()
    }
}
