use super::channel::{ResponseTx, next_message, send_message, surface_error};
use routeguide_tonic_core::{
    Error, Result,
    proto::{Feature, RecommendationRequest},
    recommend::recommend_once,
    store::FeatureStore,
};
use tokio_stream::Stream;
use tokio_util::sync::CancellationToken;
use tonic::Status;

/// Answers each inbound recommendation request with exactly one feature.
///
/// Runs as its own task: it reads requests, scans the store and queues the
/// answer on `resp_tx`, while the transport drains that channel to the
/// client independently. Answers therefore go out while later requests are
/// still being received, and their order always matches request order.
///
/// Returns the number of requests answered once the client closes its side.
/// A request that cannot be answered (missing point, empty store) is reported
/// to the client and ends the call.
pub async fn serve_recommendations<S>(
    store: &FeatureStore,
    mut requests: S,
    resp_tx: &ResponseTx<Feature>,
    shutdown: &CancellationToken,
) -> Result<u64>
where
    S: Stream<Item = core::result::Result<RecommendationRequest, Status>> + Unpin,
{
    let mut answered = 0;

    loop {
        let next = tokio::select! {
            // Stop waiting for input as soon as nobody reads the output.
            () = resp_tx.closed() => Err(Error::RequestCancelled),
            next = next_message(&mut requests, shutdown) => next,
        };

        let result = match next {
            Ok(Some(request)) => recommend_once(store, &request).cloned(),
            Ok(None) => return Ok(answered),
            Err(e) => Err(e),
        };

        let sent = match result {
            Ok(feature) => send_message(resp_tx, feature, shutdown).await,
            Err(e) => Err(e),
        };

        if let Err(e) = sent {
            surface_error(resp_tx, &e).await;
            return Err(e);
        }
        answered += 1;
    }
}
