//! Bulk-loaded block k-d tree for latitude/longitude points.
//!
//! Points are buffered in a [`PointStore`], sealed, and partitioned once into
//! an immutable [`PointIndex`] that answers rectangle and polygon
//! containment queries. [`GeoIndex`] wraps the whole lifecycle.
//!
//! ```rust
//! use spatio_bkd::{GeoIndex, LatLon, LatLonPolygon, LatLonRect};
//!
//! let mut index = GeoIndex::new();
//! index.insert(51.5074, -0.1278, Some(1))?;
//! index.insert(51.4545, -2.5879, Some(2))?;
//! index.insert(40.7128, -74.0060, Some(3))?;
//! index.seal()?;
//!
//! let england = LatLonRect::new(50.0, 55.8, -6.0, 1.8);
//! assert_eq!(index.ids_in_rect(&england)?.len(), 2);
//!
//! let triangle = LatLonPolygon::new(vec![
//!     LatLon::new(51.0, -1.0),
//!     LatLon::new(52.0, 0.5),
//!     LatLon::new(51.0, 0.5),
//! ]);
//! assert_eq!(index.ids_in_polygon(&triangle)?, vec![1]);
//! # Ok::<(), spatio_bkd::BkdError>(())
//! ```

pub mod builder;
pub mod config;
pub mod encoding;
pub mod error;
pub mod index;
pub mod ingest;
pub mod query;
pub mod store;
pub mod tree;
pub mod types;

#[cfg(feature = "snapshot")]
pub mod persistence;

pub use builder::{PartitionBuilder, build};
pub use config::IndexConfig;
pub use error::{BkdError, Result};
pub use index::{GeoIndex, IndexState};
pub use ingest::{IngestReport, ParsedLine, load_lines, parse_line};
pub use query::{PolygonQuery, QueryIter, QueryShape, Relation};
pub use store::{PointStore, SealedStore, SharedPointStore};
pub use tree::{IndexStats, Node, NodeId, PointIndex};
pub use types::{BoundingBox, Dimension, Point};

pub use spatio_bkd_types::{LatLon, LatLonPolygon, LatLonRect};

#[cfg(feature = "snapshot")]
pub use persistence::IndexSnapshot;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{BkdError, GeoIndex, IndexConfig, Result};

    pub use crate::{LatLon, LatLonPolygon, LatLonRect};

    pub use crate::{BoundingBox, PointIndex, PointStore, PolygonQuery, QueryShape};

    #[cfg(feature = "snapshot")]
    pub use crate::IndexSnapshot;
}
