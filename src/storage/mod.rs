//! Storage module for downloaded assets
//!
//! Cover images are written under a date-partitioned upload tree,
//! `<root>/<year>/<month>/<id><ext>`. Callers resolve
//! `cover_image_local_path` against this layout, so it must not change.

mod assets;

pub use assets::{cover_extension, AssetStore};
