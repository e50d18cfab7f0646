//! Great-circle distance and bounding-box containment over wire coordinates.

use crate::{
    Error, Result,
    proto::{Point, Rectangle},
    types::EARTH_RADIUS_M,
};

/// Distance between two points in whole metres, using the haversine formula.
///
/// The result is truncated, never rounded. It is symmetric in its arguments
/// and zero for identical points. Half the Earth's circumference is about
/// 20,015 km, so the result always fits in an `i32`.
pub fn distance(p1: &Point, p2: &Point) -> i32 {
    let lat1 = p1.latitude_degrees().to_radians();
    let lat2 = p2.latitude_degrees().to_radians();
    let lng1 = p1.longitude_degrees().to_radians();
    let lng2 = p2.longitude_degrees().to_radians();
    let dlat = lat2 - lat1;
    let dlng = lng2 - lng1;

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    (EARTH_RADIUS_M * c) as i32
}

/// A rectangle with its corners normalized per axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub left: i32,
    pub right: i32,
    pub bottom: i32,
    pub top: i32,
}

impl Bounds {
    /// Builds bounds from two opposite corners given in any order.
    pub fn from_corners(lo: &Point, hi: &Point) -> Self {
        Self {
            left: lo.longitude.min(hi.longitude),
            right: lo.longitude.max(hi.longitude),
            bottom: lo.latitude.min(hi.latitude),
            top: lo.latitude.max(hi.latitude),
        }
    }

    /// Strict containment: a point lying exactly on any edge is outside.
    pub fn contains(&self, point: &Point) -> bool {
        point.longitude > self.left
            && point.longitude < self.right
            && point.latitude > self.bottom
            && point.latitude < self.top
    }
}

impl TryFrom<&Rectangle> for Bounds {
    type Error = Error;

    fn try_from(rect: &Rectangle) -> Result<Self> {
        let lo = rect.lo.as_ref().ok_or_else(|| Error::missing("lo"))?;
        let hi = rect.hi.as_ref().ok_or_else(|| Error::missing("hi"))?;
        Ok(Self::from_corners(lo, hi))
    }
}
