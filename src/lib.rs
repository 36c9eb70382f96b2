//! STAC metadata for the North American Land Change Monitoring System (NALCMS)
//! land cover rasters.
//!
//! The library is organized into several modules:
//!
//! - [`tables`]: lookup tables keyed by [`DatasetKey`] (extents, projections, archives)
//! - [`classes`]: land cover classification values for the file and label extensions
//! - [`extent`]: bounding-box union and footprint polygons
//! - [`item`]: one [`StacItem`] per published dataset
//! - [`collection`]: root, per-region and per-period collections, catalog assembly
//! - [`catalog`]: STAC document types and the on-disk layout
//! - [`validate`]: structural checks over built or written catalogs
//!
//! ```no_run
//! use nalcms_stac::{create_item, Tables};
//!
//! let tables = Tables::builtin();
//! if let Some(item) = create_item(&tables, "NA", 30, "2010-2015", Some("cog.tif"))? {
//!     println!("{}", item.id);
//! }
//! # Ok::<(), nalcms_stac::Error>(())
//! ```

pub mod assets;
pub mod catalog;
pub mod classes;
pub mod collection;
pub mod constants;
pub mod error;
pub mod extent;
pub mod item;
pub mod tables;
pub mod validate;

pub use catalog::{StacCatalog, StacCollection, StacItem};
pub use collection::{build_catalog, create_collection, CollectionKind, Grouping, Period};
pub use error::{Error, Result};
pub use extent::bounding_extent;
pub use item::{create_item, create_item_for_key};
pub use tables::{DatasetKey, Tables, YearSpan};
pub use validate::{validate_catalog, Severity, ValidationIssue};
