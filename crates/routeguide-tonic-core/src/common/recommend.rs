//! Nearest / farthest feature selection.

use crate::{
    Error, Result,
    geo::distance,
    proto::{Feature, Point, RecommendationRequest},
    store::FeatureStore,
    types::Mode,
};

/// Extremes found by a single pass over the store.
#[derive(Clone, Copy, Debug)]
pub struct Extremes<'a> {
    pub nearest: &'a Feature,
    pub nearest_distance: i32,
    pub farthest: &'a Feature,
    pub farthest_distance: i32,
}

impl<'a> Extremes<'a> {
    pub fn pick(&self, mode: Mode) -> &'a Feature {
        match mode {
            Mode::Nearest => self.nearest,
            Mode::Farthest => self.farthest,
        }
    }
}

/// Scans the store once and records the nearest and farthest features from
/// `point`. Comparisons are strict, so on equal distances the feature that
/// comes first in store order is kept.
///
/// Returns `None` when the store is empty.
pub fn scan<'a>(store: &'a FeatureStore, point: &Point) -> Option<Extremes<'a>> {
    let mut entries = store.entries().iter();
    let first = entries.next()?;
    let d = distance(&first.location, point);

    let mut best = Extremes {
        nearest: &first.feature,
        nearest_distance: d,
        farthest: &first.feature,
        farthest_distance: d,
    };

    for entry in entries {
        let d = distance(&entry.location, point);
        if d < best.nearest_distance {
            best.nearest = &entry.feature;
            best.nearest_distance = d;
        }
        if d > best.farthest_distance {
            best.farthest = &entry.feature;
            best.farthest_distance = d;
        }
    }

    Some(best)
}

/// Picks the nearest or farthest feature from `point`.
///
/// # Errors
///
/// Returns [`Error::EmptyFeatureSet`] if there is nothing to pick from.
pub fn recommend<'a>(store: &'a FeatureStore, point: &Point, mode: Mode) -> Result<&'a Feature> {
    scan(store, point)
        .map(|extremes| extremes.pick(mode))
        .ok_or(Error::EmptyFeatureSet)
}

/// Answers a single wire-level recommendation request.
///
/// # Errors
///
/// Returns [`Error::InvalidRequest`] if the request carries no point, or
/// [`Error::EmptyFeatureSet`] if the store is empty.
pub fn recommend_once<'a>(
    store: &'a FeatureStore,
    request: &RecommendationRequest,
) -> Result<&'a Feature> {
    let point = request
        .point
        .as_ref()
        .ok_or_else(|| Error::missing("point"))?;
    recommend(store, point, Mode::from(request.mode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::RecommendationMode;

    fn feature(name: &str, latitude: i32, longitude: i32) -> Feature {
        Feature {
            name: name.to_string(),
            location: Some(Point {
                latitude,
                longitude,
            }),
        }
    }

    fn a_then_b() -> FeatureStore {
        FeatureStore::new([feature("a", 10_000_000, 0), feature("b", 20_000_000, 0)])
            .unwrap()
    }

    const ORIGIN: Point = Point {
        latitude: 0,
        longitude: 0,
    };

    #[test]
    fn nearest_tie_goes_to_first_in_store_order() {
        // North and south of the origin by the same amount.
        let store = FeatureStore::new([
            feature("far", 50_000_000, 0),
            feature("north", 10_000_000, 0),
            feature("south", -10_000_000, 0),
        ])
        .unwrap();

        let nearest = recommend(&store, &ORIGIN, Mode::Nearest).unwrap();
        assert_eq!(nearest.name, "north");

        // Same pair in the opposite order flips the winner.
        let store = FeatureStore::new([
            feature("south", -10_000_000, 0),
            feature("north", 10_000_000, 0),
        ])
        .unwrap();
        let nearest = recommend(&store, &ORIGIN, Mode::Nearest).unwrap();
        assert_eq!(nearest.name, "south");
    }

    #[test]
    fn farthest_tie_goes_to_first_in_store_order() {
        let store = FeatureStore::new([
            feature("near", 1_000_000, 0),
            feature("east", 0, 30_000_000),
            feature("west", 0, -30_000_000),
        ])
        .unwrap();

        let farthest = recommend(&store, &ORIGIN, Mode::Farthest).unwrap();
        assert_eq!(farthest.name, "east");
    }

    #[test]
    fn extremes_report_distances() {
        let store = a_then_b();

        let e = scan(&store, &ORIGIN).unwrap();
        assert_eq!(e.nearest.name, "a");
        assert_eq!(e.farthest.name, "b");
        assert_eq!(
            e.nearest_distance,
            distance(&ORIGIN, &store.entries()[0].location)
        );
        assert!(e.farthest_distance > e.nearest_distance);
    }

    #[test]
    fn single_feature_is_both_extremes() {
        let store = FeatureStore::new([feature("only", 5, 5)]).unwrap();
        for mode in [Mode::Nearest, Mode::Farthest] {
            assert_eq!(recommend(&store, &ORIGIN, mode).unwrap().name, "only");
        }
    }

    #[test]
    fn empty_store_is_not_found() {
        let store = FeatureStore::default();
        assert!(scan(&store, &ORIGIN).is_none());
        for mode in [Mode::Nearest, Mode::Farthest] {
            assert_eq!(
                recommend(&store, &ORIGIN, mode),
                Err(Error::EmptyFeatureSet)
            );
        }
    }

    #[test]
    fn wire_request() {
        let store = a_then_b();

        let farthest = RecommendationRequest {
            mode: RecommendationMode::GetFarthest as i32,
            point: Some(ORIGIN),
        };
        assert_eq!(recommend_once(&store, &farthest).unwrap().name, "b");

        let nearest = RecommendationRequest {
            mode: RecommendationMode::GetNearest as i32,
            point: Some(ORIGIN),
        };
        assert_eq!(recommend_once(&store, &nearest).unwrap().name, "a");

        let missing = RecommendationRequest {
            mode: RecommendationMode::GetNearest as i32,
            point: None,
        };
        assert_eq!(
            recommend_once(&store, &missing),
            Err(Error::InvalidRequest {
                reason: "missing `point`".into()
            })
        );
    }
}
