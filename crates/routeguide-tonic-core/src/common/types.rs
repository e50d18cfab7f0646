//! # Common Coordinate Types and Constants
//!
//! Coordinates cross the wire as signed 32-bit integers holding degrees scaled
//! by [`COORD_FACTOR`]. Geometry converts them to floating-point radians
//! internally and always converts results back to integers by truncation.
//!
//! ## Call shapes
//!
//! [`CallKind`] names each RPC of the `RouteGuide` service and [`CallShape`]
//! describes its streaming arity. Both are used to label spans and metrics.

use crate::proto::{Point, RecommendationMode};
use core::fmt;

/// Scale between degrees and the integer coordinates carried on the wire.
pub const COORD_FACTOR: f64 = 1e7;

/// Mean Earth radius used by the haversine formula, in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

impl Point {
    pub fn latitude_degrees(&self) -> f64 {
        f64::from(self.latitude) / COORD_FACTOR
    }

    pub fn longitude_degrees(&self) -> f64 {
        f64::from(self.longitude) / COORD_FACTOR
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.7}, {:.7})",
            self.latitude_degrees(),
            self.longitude_degrees()
        )
    }
}

/// Which end of the distance ordering a recommendation should pick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Nearest,
    Farthest,
}

impl From<i32> for Mode {
    /// Only an explicit `GetFarthest` selects [`Mode::Farthest`]; every other
    /// value, including ones this build does not know, means nearest.
    fn from(raw: i32) -> Self {
        match RecommendationMode::try_from(raw) {
            Ok(RecommendationMode::GetFarthest) => Mode::Farthest,
            _ => Mode::Nearest,
        }
    }
}

/// Streaming arity of an RPC.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallShape {
    /// One request, one response.
    Unary,
    /// One request, many responses.
    ServerStream,
    /// Many requests, one response.
    ClientStream,
    /// Many requests and many responses, flowing independently.
    BidiStream,
}

impl CallShape {
    /// Label used for the `rpc.shape` span field and metric attribute.
    pub const fn as_str(self) -> &'static str {
        match self {
            CallShape::Unary => "unary",
            CallShape::ServerStream => "server_stream",
            CallShape::ClientStream => "client_stream",
            CallShape::BidiStream => "bidi_stream",
        }
    }
}

impl fmt::Display for CallShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four RPCs of the `RouteGuide` service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallKind {
    GetFeature,
    ListFeatures,
    RecordRoute,
    Recommend,
}

impl CallKind {
    pub const ALL: [CallKind; 4] = [
        CallKind::GetFeature,
        CallKind::ListFeatures,
        CallKind::RecordRoute,
        CallKind::Recommend,
    ];

    pub const fn shape(self) -> CallShape {
        match self {
            CallKind::GetFeature => CallShape::Unary,
            CallKind::ListFeatures => CallShape::ServerStream,
            CallKind::RecordRoute => CallShape::ClientStream,
            CallKind::Recommend => CallShape::BidiStream,
        }
    }

    /// gRPC method name, as it appears on the wire.
    pub const fn method(self) -> &'static str {
        match self {
            CallKind::GetFeature => "GetFeature",
            CallKind::ListFeatures => "ListFeatures",
            CallKind::RecordRoute => "RecordRoute",
            CallKind::Recommend => "Recommend",
        }
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_from_wire() {
        assert_eq!(
            Mode::from(RecommendationMode::GetFarthest as i32),
            Mode::Farthest
        );
        assert_eq!(
            Mode::from(RecommendationMode::GetNearest as i32),
            Mode::Nearest
        );
        // Unknown values fall back to nearest.
        assert_eq!(Mode::from(42), Mode::Nearest);
        assert_eq!(Mode::from(-1), Mode::Nearest);
    }

    #[test]
    fn every_call_has_a_distinct_shape() {
        let shapes: Vec<_> = CallKind::ALL.iter().map(|k| k.shape()).collect();
        assert_eq!(
            shapes,
            [
                CallShape::Unary,
                CallShape::ServerStream,
                CallShape::ClientStream,
                CallShape::BidiStream
            ]
        );
    }

    #[test]
    fn shape_labels() {
        let labels: Vec<_> = CallKind::ALL
            .iter()
            .map(|k| k.shape().to_string())
            .collect();
        assert_eq!(
            labels,
            ["unary", "server_stream", "client_stream", "bidi_stream"]
        );
    }

    #[test]
    fn point_displays_in_degrees() {
        let p = Point {
            latitude: 310_235_000,
            longitude: 121_437_403,
        };
        assert_eq!(p.to_string(), "(31.0235000, 12.1437403)");
    }

    #[test]
    fn points_are_plain_copyable_keys() {
        use std::collections::HashSet;

        let p = Point {
            latitude: 1,
            longitude: 2,
        };
        let copy = p;
        let set: HashSet<Point> = [p, copy, Point { latitude: 2, longitude: 1 }]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&p));
    }
}
