use super::channel::{ResponseTx, send_message, surface_error};
use routeguide_tonic_core::{Result, geo::Bounds, proto::Feature, store::FeatureStore};
use tokio_util::sync::CancellationToken;

/// Streams every feature inside `bounds` to the client, in store order.
///
/// The range query is evaluated lazily: each matching feature is cloned and
/// queued only once the previous one has been accepted by the response
/// channel, so a slow client applies backpressure to the scan itself.
///
/// Returns the number of features sent once the scan completes. If the client
/// disconnects the scan stops at the next send and
/// [`Error::RequestCancelled`](routeguide_tonic_core::Error::RequestCancelled)
/// is returned. On service shutdown the client is told so before the scan
/// stops.
pub async fn feed_features(
    store: &FeatureStore,
    bounds: Bounds,
    resp_tx: &ResponseTx<Feature>,
    shutdown: &CancellationToken,
) -> Result<u64> {
    let mut sent = 0;

    for feature in store.list_in_range(bounds) {
        if let Err(e) = send_message(resp_tx, feature.clone(), shutdown).await {
            surface_error(resp_tx, &e).await;
            return Err(e);
        }
        sent += 1;
    }

    Ok(sent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use routeguide_tonic_core::{Error, proto::Point, store::Entry};
    use tokio::sync::mpsc;

    fn bounds() -> Bounds {
        Bounds::from_corners(
            &Point {
                latitude: 310_235_000,
                longitude: 121_358_540,
            },
            &Point {
                latitude: 313_374_060,
                longitude: 121_598_790,
            },
        )
    }

    fn inside(n: i32) -> FeatureStore {
        (0..n)
            .map(|i| {
                Entry::new(
                    format!("feature-{i}"),
                    Point {
                        latitude: 312_000_000 + i,
                        longitude: 121_437_403,
                    },
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn streams_matches_then_ends() {
        let store: FeatureStore = [
            Entry::new(
                "on the edge",
                Point {
                    latitude: 312_000_000,
                    longitude: 121_358_540,
                },
            ),
            Entry::new(
                "inside",
                Point {
                    latitude: 312_000_000,
                    longitude: 121_437_403,
                },
            ),
        ]
        .into_iter()
        .collect();

        let (tx, mut rx) = mpsc::channel(8);
        let sent = feed_features(&store, bounds(), &tx, &CancellationToken::new())
            .await
            .unwrap();
        drop(tx);

        assert_eq!(sent, 1);
        let first = rx.recv().await.unwrap().unwrap();
        assert_eq!(first.name, "inside");
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn client_disconnect_stops_the_scan() {
        let store = inside(100);
        let (tx, mut rx) = mpsc::channel(1);

        let feed = tokio::spawn(async move {
            feed_features(&store, bounds(), &tx, &CancellationToken::new()).await
        });

        // Read a couple of features, then hang up mid-stream.
        assert_eq!(rx.recv().await.unwrap().unwrap().name, "feature-0");
        assert_eq!(rx.recv().await.unwrap().unwrap().name, "feature-1");
        drop(rx);

        assert_eq!(feed.await.unwrap(), Err(Error::RequestCancelled));
    }

    #[tokio::test]
    async fn shutdown_mid_stream_is_reported_to_the_client() {
        let store = inside(100);
        let shutdown = CancellationToken::new();
        let (tx, mut rx) = mpsc::channel(1);

        let feed = {
            let shutdown = shutdown.clone();
            tokio::spawn(async move { feed_features(&store, bounds(), &tx, &shutdown).await })
        };

        assert!(rx.recv().await.unwrap().is_ok());
        shutdown.cancel();

        // Whatever was already queued is followed by the shutdown status.
        let mut last = None;
        while let Some(item) = rx.recv().await {
            last = Some(item);
        }
        let status = last.unwrap().unwrap_err();
        assert_eq!(status.code(), tonic::Code::Unavailable);
        assert_eq!(feed.await.unwrap(), Err(Error::ServiceShutdown));
    }
}
