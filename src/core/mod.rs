pub mod directory;
pub mod favorites;
pub mod finder;

pub use crate::domain::model::{FavoriteUniversity, SearchHit, University, UniversityKey};
pub use crate::domain::ports::{KeyValueStore, UniversityDirectory};
pub use crate::utils::error::Result;
