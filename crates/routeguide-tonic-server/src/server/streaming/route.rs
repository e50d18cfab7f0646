use super::channel::next_message;
use crate::server::telemetry::increment_route_points;
use routeguide_tonic_core::{
    Result,
    proto::{Point, RouteSummary},
    route::RouteAccumulator,
};
use tokio_stream::Stream;
use tokio_util::sync::CancellationToken;
use tonic::Status;

/// Drives one [`RouteAccumulator`] over the inbound points of a
/// `RecordRoute` call.
///
/// Points are folded strictly in arrival order. The summary is produced only
/// when the client closes its side of the stream; any receive failure or
/// shutdown returns the error instead and the partial route is discarded.
pub async fn record_route<S>(mut points: S, shutdown: &CancellationToken) -> Result<RouteSummary>
where
    S: Stream<Item = core::result::Result<Point, Status>> + Unpin,
{
    let mut route = RouteAccumulator::new();

    while let Some(point) = next_message(&mut points, shutdown).await? {
        route.push(point);
    }

    increment_route_points(route.point_count());

    #[cfg(feature = "tracing")]
    tracing::debug!(
        points = route.point_count(),
        distance = route.distance(),
        "Route complete"
    );

    Ok(route.finish())
}
