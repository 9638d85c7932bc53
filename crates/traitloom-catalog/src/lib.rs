//! Traitloom Catalog - asset-store scanning
//!
//! Scans a folder hierarchy of layered character art into a read-only
//! [`TraitCatalog`]. Character-specific folders take precedence over the
//! tier's shared folder for the same layer; missing folders simply contribute
//! nothing.
//!
//! ```text
//! assets/
//! ├── common/
//! │   ├── bear/base/brown_fur.png
//! │   └── shared/background/sky.png
//! └── legendary/
//!     └── shared/clothes/royal_cape.png
//! ```

pub mod catalog;
pub mod loader;

pub use catalog::{CatalogEntryStats, TraitCatalog};
pub use loader::{CatalogLoader, LoaderConfig};
