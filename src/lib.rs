pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{FileStore, MemoryStore};
pub use config::AppConfig;
pub use core::{
    directory::DirectoryClient, favorites::FavoritesStore, finder::UniFinder, FavoriteUniversity,
    KeyValueStore, SearchHit, University, UniversityDirectory, UniversityKey,
};
pub use utils::error::{Result, UnifinderError};
