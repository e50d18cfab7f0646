//! The immutable, process-wide feature set.
//!
//! A [`FeatureStore`] is built once at startup and then shared by every call.
//! Its contents live behind an `Arc<[_]>`, so cloning the store is cheap and
//! concurrent readers need no synchronization.

use crate::{
    Error, Result,
    geo::Bounds,
    proto::{Feature, Point},
};
use std::sync::Arc;

/// A stored feature together with its resolved location.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    pub location: Point,
    pub feature: Feature,
}

impl Entry {
    pub fn new(name: impl Into<String>, location: Point) -> Self {
        Self {
            feature: Feature {
                name: name.into(),
                location: Some(location),
            },
            location,
        }
    }
}

/// Ordered, read-only collection of named features.
///
/// Store order is preserved by every query and decides recommendation ties.
#[derive(Clone, Debug, Default)]
pub struct FeatureStore {
    entries: Arc<[Entry]>,
}

impl FeatureStore {
    /// Builds a store from features in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFeature`] if any feature has no location.
    pub fn new(features: impl IntoIterator<Item = Feature>) -> Result<Self> {
        let entries = features
            .into_iter()
            .enumerate()
            .map(|(index, feature)| match feature.location {
                Some(location) => Ok(Entry { location, feature }),
                None => Err(Error::InvalidFeature {
                    index,
                    reason: "missing `location`".to_string(),
                }),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            entries: entries.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.entries.iter().map(|e| &e.feature)
    }

    /// Finds the first feature located exactly at `point`.
    pub fn lookup(&self, point: &Point) -> Option<&Feature> {
        self.entries
            .iter()
            .find(|e| e.location == *point)
            .map(|e| &e.feature)
    }

    /// Like [`lookup`](Self::lookup), but a miss is an error.
    pub fn get(&self, point: &Point) -> Result<&Feature> {
        self.lookup(point).ok_or(Error::FeatureNotFound {
            latitude: point.latitude,
            longitude: point.longitude,
        })
    }

    /// Lazily yields the features strictly inside `bounds`, in store order.
    pub fn list_in_range(&self, bounds: Bounds) -> impl Iterator<Item = &Feature> + '_ {
        self.entries
            .iter()
            .filter(move |e| bounds.contains(&e.location))
            .map(|e| &e.feature)
    }
}

impl FromIterator<Entry> for FeatureStore {
    fn from_iter<I: IntoIterator<Item = Entry>>(entries: I) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::Rectangle;

    fn feature(name: &str, latitude: i32, longitude: i32) -> Feature {
        Feature {
            name: name.to_string(),
            location: Some(Point {
                latitude,
                longitude,
            }),
        }
    }

    fn fixture() -> FeatureStore {
        FeatureStore::new([
            feature("edge", 312_000_000, 121_358_540),
            feature("inside", 312_000_000, 121_437_403),
            feature("outside", 300_000_000, 121_437_403),
            feature("also inside", 313_000_000, 121_500_000),
            feature("", 312_500_000, 121_400_000),
        ])
        .unwrap()
    }

    #[test]
    fn lookup_is_exact() {
        let store = fixture();

        let hit = store.lookup(&Point {
            latitude: 312_000_000,
            longitude: 121_437_403,
        });
        assert_eq!(hit.map(|f| f.name.as_str()), Some("inside"));

        // Off by one unit on either axis is a miss.
        for (lat, lng) in [(312_000_001, 121_437_403), (312_000_000, 121_437_402)] {
            let p = Point {
                latitude: lat,
                longitude: lng,
            };
            assert!(store.lookup(&p).is_none());
            assert_eq!(
                store.get(&p),
                Err(Error::FeatureNotFound {
                    latitude: lat,
                    longitude: lng
                })
            );
        }
    }

    #[test]
    fn range_query_excludes_edges_and_keeps_order() {
        let store = fixture();
        let rect = Rectangle {
            lo: Some(Point {
                latitude: 310_235_000,
                longitude: 121_358_540,
            }),
            hi: Some(Point {
                latitude: 313_374_060,
                longitude: 121_598_790,
            }),
        };

        let names: Vec<_> = store
            .list_in_range(Bounds::try_from(&rect).unwrap())
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, ["inside", "also inside", ""]);
    }

    #[test]
    fn range_query_on_empty_store() {
        let store = FeatureStore::default();
        let bounds = Bounds {
            left: i32::MIN,
            right: i32::MAX,
            bottom: i32::MIN,
            top: i32::MAX,
        };
        assert_eq!(store.list_in_range(bounds).count(), 0);
    }

    #[test]
    fn rejects_feature_without_location() {
        let err = FeatureStore::new([
            feature("ok", 1, 1),
            Feature {
                name: "nowhere".into(),
                location: None,
            },
        ])
        .unwrap_err();
        assert_eq!(
            err,
            Error::InvalidFeature {
                index: 1,
                reason: "missing `location`".into()
            }
        );
    }

    #[test]
    fn clones_share_storage() {
        let a = fixture();
        let b = a.clone();
        assert!(core::ptr::eq(a.entries(), b.entries()));
        assert_eq!(b.len(), 5);
        assert!(!b.is_empty());
    }
}
