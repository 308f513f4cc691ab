//! Track catalog: data model and JSON document loading.
//!
//! The catalog is a flat JSON array of track records; each track points at
//! its own JSON lyric document. `CatalogLoader` resolves the root-relative
//! asset paths those records carry.

mod load;
mod model;

pub use load::CatalogLoader;
pub use model::{LyricLine, Track};
