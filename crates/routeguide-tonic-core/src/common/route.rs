//! Route accumulation for the client-streaming `RecordRoute` call.
//!
//! A [`RouteAccumulator`] lives for exactly one call. Points are pushed in
//! arrival order and [`RouteAccumulator::finish`] consumes the accumulator to
//! produce the single [`RouteSummary`] of that call. Dropping it instead
//! discards everything, which is what happens when the call fails.

use crate::{
    geo::distance,
    proto::{Point, RouteSummary},
};
use std::time::{Duration, Instant};

/// Where an accumulator is in its lifecycle. `Finalized` is represented by
/// the accumulator having been consumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteState {
    Empty,
    Accumulating,
}

#[derive(Clone, Debug)]
pub struct RouteAccumulator {
    started: Instant,
    point_count: u64,
    distance: u64,
    previous: Option<Point>,
}

impl RouteAccumulator {
    /// Starts a route now.
    pub fn new() -> Self {
        Self::started_at(Instant::now())
    }

    /// Starts a route at an explicit instant; elapsed time is measured from it.
    pub fn started_at(started: Instant) -> Self {
        Self {
            started,
            point_count: 0,
            distance: 0,
            previous: None,
        }
    }

    pub fn state(&self) -> RouteState {
        if self.previous.is_some() {
            RouteState::Accumulating
        } else {
            RouteState::Empty
        }
    }

    pub fn point_count(&self) -> u64 {
        self.point_count
    }

    /// Cumulative distance so far, in metres.
    pub fn distance(&self) -> u64 {
        self.distance
    }

    /// Records the next point of the route.
    pub fn push(&mut self, point: Point) {
        self.point_count += 1;
        if let Some(previous) = &self.previous {
            // Segment distances are never negative.
            self.distance += u64::from(distance(previous, &point).unsigned_abs());
        }
        self.previous = Some(point);
    }

    /// Finalizes the route, measuring elapsed time up to `now`.
    pub fn finish_at(self, now: Instant) -> RouteSummary {
        let elapsed = now.saturating_duration_since(self.started);
        summary(self.point_count, self.distance, elapsed)
    }

    /// Finalizes the route, measuring elapsed time up to the present.
    pub fn finish(self) -> RouteSummary {
        self.finish_at(Instant::now())
    }
}

impl Default for RouteAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Extend<Point> for RouteAccumulator {
    fn extend<I: IntoIterator<Item = Point>>(&mut self, points: I) {
        for point in points {
            self.push(point);
        }
    }
}

fn saturate(value: u64) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn summary(point_count: u64, distance: u64, elapsed: Duration) -> RouteSummary {
    RouteSummary {
        point_count: saturate(point_count),
        distance: saturate(distance),
        // Whole seconds; the fractional part is dropped.
        elapsed_time: saturate(elapsed.as_secs()),
    }
}
