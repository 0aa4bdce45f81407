//! # spatio-bkd-types
//!
//! Latitude/longitude types accepted by the `spatio-bkd` point index.
//!
//! - **Point types**: `LatLon`
//! - **Query types**: `LatLonRect`, `LatLonPolygon`
//!
//! All types are serializable with Serde and convert from the `geo` crate's
//! primitives. Note that `geo` stores longitude in `x` and latitude in `y`;
//! the conversions below take care of the swap.
//!
//! ## Examples
//!
//! ```rust
//! use spatio_bkd_types::{LatLon, LatLonRect};
//!
//! let london = LatLon::new(51.5074, -0.1278);
//! let greater_london = LatLonRect::new(51.28, 51.70, -0.51, 0.33);
//! assert!(greater_london.contains(&london));
//! ```

pub mod point;
pub mod polygon;
pub mod rect;

pub use point::LatLon;
pub use polygon::LatLonPolygon;
pub use rect::LatLonRect;
