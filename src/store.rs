//! Append-only ingestion buffer.
//!
//! A [`PointStore`] accepts points until it is sealed. Sealing hands the
//! buffered points to a [`SealedStore`], which [`crate::PartitionBuilder`]
//! consumes; the store itself rejects every later append.

use crate::encoding::{encode_lat_lon, validate_encoded};
use crate::error::{BkdError, Result};
use crate::types::Point;
use parking_lot::Mutex;
use std::sync::Arc;

/// Buffer of encoded points waiting to be indexed.
#[derive(Debug, Default)]
pub struct PointStore {
    points: Vec<Point>,
    sealed: bool,
    rejected: usize,
}

impl PointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preallocate room for `capacity` points.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Append a point and return its id, the point's ordinal in this store.
    ///
    /// # Examples
    ///
    /// ```
    /// use spatio_bkd::PointStore;
    ///
    /// let mut store = PointStore::new();
    /// assert_eq!(store.append(51.5074, -0.1278).unwrap(), 0);
    /// assert_eq!(store.append(48.8566, 2.3522).unwrap(), 1);
    /// assert!(store.append(f64::NAN, 0.0).is_err());
    /// assert_eq!(store.len(), 2);
    /// ```
    pub fn append(&mut self, lat: f64, lon: f64) -> Result<u64> {
        let id = self.points.len() as u64;
        self.append_with_id(lat, lon, id)?;
        Ok(id)
    }

    /// Append a point with a caller-chosen id. Ids are not checked for
    /// uniqueness.
    pub fn append_with_id(&mut self, lat: f64, lon: f64, id: u64) -> Result<()> {
        self.ensure_open()?;
        let (x, y) = encode_lat_lon(lat, lon).inspect_err(|_| self.rejected += 1)?;
        self.points.push(Point::new(x, y, id));
        Ok(())
    }

    /// Append a point that is already in encoded space.
    pub fn append_encoded(&mut self, point: Point) -> Result<()> {
        self.ensure_open()?;
        validate_encoded(point.x, point.y).inspect_err(|_| self.rejected += 1)?;
        self.points.push(point);
        Ok(())
    }

    /// Freeze the store and take its points.
    ///
    /// Fails with [`BkdError::Sealed`] if the store was already sealed.
    pub fn seal(&mut self) -> Result<SealedStore> {
        self.ensure_open()?;
        self.sealed = true;
        let points = std::mem::take(&mut self.points);
        log::debug!(
            "Sealed point store with {} points ({} rejected)",
            points.len(),
            self.rejected
        );
        Ok(SealedStore { points })
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Points currently buffered. Zero once sealed.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of appends rejected for invalid coordinates.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    fn ensure_open(&self) -> Result<()> {
        if self.sealed {
            return Err(BkdError::Sealed);
        }
        Ok(())
    }
}

/// Immutable batch of points produced by [`PointStore::seal`].
#[derive(Debug)]
pub struct SealedStore {
    points: Vec<Point>,
}

impl SealedStore {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub(crate) fn into_points(self) -> Vec<Point> {
        self.points
    }
}

/// Clonable handle letting several producer threads fill one store.
///
/// Each append takes the store's mutex for the duration of a single push.
///
/// ```rust
/// use spatio_bkd::SharedPointStore;
/// use std::thread;
///
/// let store = SharedPointStore::new();
/// let producer = store.clone();
/// let handle = thread::spawn(move || producer.append_with_id(10.0, 20.0, 7).unwrap());
/// store.append_with_id(-10.0, -20.0, 8).unwrap();
/// handle.join().unwrap();
/// assert_eq!(store.seal().unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedPointStore {
    inner: Arc<Mutex<PointStore>>,
}

impl SharedPointStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(PointStore::with_capacity(capacity))),
        }
    }

    pub fn append(&self, lat: f64, lon: f64) -> Result<u64> {
        self.inner.lock().append(lat, lon)
    }

    pub fn append_with_id(&self, lat: f64, lon: f64, id: u64) -> Result<()> {
        self.inner.lock().append_with_id(lat, lon, id)
    }

    pub fn append_encoded(&self, point: Point) -> Result<()> {
        self.inner.lock().append_encoded(point)
    }

    /// Seal the shared store. Every clone observes the sealed state.
    pub fn seal(&self) -> Result<SealedStore> {
        self.inner.lock().seal()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn rejected(&self) -> usize {
        self.inner.lock().rejected()
    }
}
