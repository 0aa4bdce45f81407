//! Two-phase latitude/longitude index.
//!
//! [`GeoIndex`] starts out `Building`, accepting points, and becomes `Sealed`
//! (immutable and queryable) on [`GeoIndex::seal`]. The transition is one
//! way. Queries while building fail with [`BkdError::NotReady`]; inserts after
//! sealing fail with [`BkdError::Sealed`].

use crate::builder::PartitionBuilder;
use crate::config::IndexConfig;
use crate::encoding::encode_rect;
use crate::error::{BkdError, Result};
use crate::ingest::parse_line;
use crate::query::PolygonQuery;
use crate::store::PointStore;
use crate::tree::PointIndex;
use spatio_bkd_types::{LatLonPolygon, LatLonRect};

/// Lifecycle state of a [`GeoIndex`].
#[derive(Debug)]
pub enum IndexState {
    Building(PointStore),
    Sealed(PointIndex),
}

/// Latitude/longitude point index with an explicit build/seal lifecycle.
///
/// ```rust
/// use spatio_bkd::{GeoIndex, LatLonRect};
///
/// let mut index = GeoIndex::new();
/// index.insert(51.5074, -0.1278, None)?;
/// index.insert(48.8566, 2.3522, None)?;
/// index.seal()?;
///
/// let uk = LatLonRect::new(49.9, 58.7, -8.2, 1.8);
/// assert_eq!(index.count_in_rect(&uk)?, 1);
/// # Ok::<(), spatio_bkd::BkdError>(())
/// ```
#[derive(Debug)]
pub struct GeoIndex {
    state: IndexState,
    config: IndexConfig,
}

impl GeoIndex {
    pub fn new() -> Self {
        Self::build_state(IndexConfig::default())
    }

    pub fn with_config(config: IndexConfig) -> Result<Self> {
        config.validate().map_err(BkdError::InvalidInput)?;
        Ok(Self::build_state(config))
    }

    /// Wrap an already sealed index, e.g. one loaded from a snapshot.
    pub fn from_sealed(index: PointIndex) -> Self {
        let config = IndexConfig {
            leaf_size: index.leaf_size(),
            expected_points: None,
        };
        Self {
            state: IndexState::Sealed(index),
            config,
        }
    }

    fn build_state(config: IndexConfig) -> Self {
        let store = match config.expected_points {
            Some(n) => PointStore::with_capacity(n),
            None => PointStore::new(),
        };
        Self {
            state: IndexState::Building(store),
            config,
        }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn state(&self) -> &IndexState {
        &self.state
    }

    pub fn is_sealed(&self) -> bool {
        matches!(self.state, IndexState::Sealed(_))
    }

    /// Points buffered (while building) or indexed (once sealed).
    pub fn len(&self) -> usize {
        match &self.state {
            IndexState::Building(store) => store.len(),
            IndexState::Sealed(index) => index.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add a point. Without an explicit id the point's insertion ordinal is
    /// used. Returns the id stored.
    pub fn insert(&mut self, lat: f64, lon: f64, id: Option<u64>) -> Result<u64> {
        let store = self.store_mut()?;
        match id {
            Some(id) => store.append_with_id(lat, lon, id).map(|()| id),
            None => store.append(lat, lon),
        }
    }

    /// Parse and add one `id,lat,lon` line.
    pub fn insert_line(&mut self, line: &str) -> Result<u64> {
        let store = self.store_mut()?;
        let parsed = parse_line(line)?;
        store.append_with_id(parsed.lat, parsed.lon, parsed.id)?;
        Ok(parsed.id)
    }

    /// Build the tree and switch to the sealed state.
    pub fn seal(&mut self) -> Result<&PointIndex> {
        let sealed = self.store_mut()?.seal()?;
        let index = PartitionBuilder::new(self.config.clone()).build(sealed)?;
        self.state = IndexState::Sealed(index);
        self.index()
    }

    /// The sealed tree, or [`BkdError::NotReady`] while building.
    pub fn index(&self) -> Result<&PointIndex> {
        match &self.state {
            IndexState::Sealed(index) => Ok(index),
            IndexState::Building(_) => Err(BkdError::NotReady),
        }
    }

    pub fn into_index(self) -> Result<PointIndex> {
        match self.state {
            IndexState::Sealed(index) => Ok(index),
            IndexState::Building(_) => Err(BkdError::NotReady),
        }
    }

    pub fn count_in_rect(&self, rect: &LatLonRect) -> Result<usize> {
        let index = self.index()?;
        Ok(index.range_count(&encode_rect(rect)?))
    }

    pub fn ids_in_rect(&self, rect: &LatLonRect) -> Result<Vec<u64>> {
        let index = self.index()?;
        Ok(index.range_ids(&encode_rect(rect)?))
    }

    pub fn count_in_polygon(&self, polygon: &LatLonPolygon) -> Result<usize> {
        let index = self.index()?;
        Ok(index.polygon_count(&PolygonQuery::from_lat_lon(polygon)?))
    }

    pub fn ids_in_polygon(&self, polygon: &LatLonPolygon) -> Result<Vec<u64>> {
        let index = self.index()?;
        Ok(index.polygon_ids(&PolygonQuery::from_lat_lon(polygon)?))
    }

    fn store_mut(&mut self) -> Result<&mut PointStore> {
        match &mut self.state {
            IndexState::Building(store) => Ok(store),
            IndexState::Sealed(_) => Err(BkdError::Sealed),
        }
    }
}

impl Default for GeoIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spatio_bkd_types::LatLon;

    #[test]
    fn test_query_before_seal_is_not_ready() {
        let mut index = GeoIndex::new();
        index.insert(1.0, 1.0, None).unwrap();
        assert!(matches!(
            index.count_in_rect(&LatLonRect::world()),
            Err(BkdError::NotReady)
        ));
        assert!(matches!(index.index(), Err(BkdError::NotReady)));
        assert!(!index.is_sealed());
    }

    #[test]
    fn test_insert_after_seal_fails() {
        let mut index = GeoIndex::new();
        index.insert(1.0, 1.0, Some(77)).unwrap();
        index.seal().unwrap();
        assert!(index.is_sealed());
        assert!(matches!(index.insert(2.0, 2.0, None), Err(BkdError::Sealed)));
        assert!(matches!(index.insert_line("1,2.0,2.0"), Err(BkdError::Sealed)));
        assert!(matches!(index.seal(), Err(BkdError::Sealed)));
        assert_eq!(index.ids_in_rect(&LatLonRect::world()).unwrap(), vec![77]);
    }

    #[test]
    fn test_bad_point_does_not_poison_batch() {
        let mut index = GeoIndex::new();
        index.insert(10.0, 10.0, None).unwrap();
        assert!(index.insert(100.0, 10.0, None).is_err());
        assert!(index.insert_line("x,y,z").is_err());
        index.insert_line("9,20.0,20.0").unwrap();
        index.seal().unwrap();
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_polygon_through_facade() {
        let mut index = GeoIndex::with_config(IndexConfig::default().with_leaf_size(2)).unwrap();
        for lat in 0..12 {
            for lon in 0..12 {
                index.insert(lat as f64, lon as f64, None).unwrap();
            }
        }
        index.seal().unwrap();

        let square = LatLonPolygon::new(vec![
            LatLon::new(0.0, 0.0),
            LatLon::new(0.0, 10.0),
            LatLon::new(10.0, 10.0),
            LatLon::new(10.0, 0.0),
        ]);
        assert_eq!(index.count_in_polygon(&square).unwrap(), 100);
        assert_eq!(index.ids_in_polygon(&square).unwrap().len(), 100);
    }

    #[test]
    fn test_invalid_query_rect() {
        let mut index = GeoIndex::new();
        index.seal().unwrap();
        let bad = LatLonRect::new(f64::NAN, 1.0, 0.0, 1.0);
        assert!(matches!(index.count_in_rect(&bad), Err(BkdError::Encoding(_))));
    }
}
