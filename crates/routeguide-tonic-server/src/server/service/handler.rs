//! gRPC service implementation for geospatial queries over a feature set.
//!
//! This module defines [`RouteGuideService`], the concrete implementation of
//! the [`RouteGuide`] gRPC service defined in the protobuf schema. It exposes
//! one RPC of each call shape over a read-only [`FeatureStore`].
//!
//! ## Responsibilities
//!
//! - Register every call with the shared [`Lifecycle`] and refuse calls once
//!   shutdown has begun.
//! - Validate requests and map failures to gRPC status codes.
//! - Spawn a coordinator task per streaming response and forward its output
//!   through a bounded channel.
//! - Handle backpressure, cancellation, and graceful shutdown.

use super::lifecycle::{CallGuard, Lifecycle};
use crate::server::{
    config::ServerConfig,
    streaming::{
        channel::ResponseTx, features::feed_features, recommend::serve_recommendations,
        route::record_route,
    },
    telemetry::increment_features_sent,
};
use core::{pin::Pin, time::Duration};
use futures::TryStreamExt;
use routeguide_tonic_core::{
    geo::Bounds,
    proto::{
        Feature, Point, RecommendationRequest, Rectangle, RouteSummary,
        route_guide_server::RouteGuide,
    },
    store::FeatureStore,
    types::CallKind,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::{Stream, wrappers::ReceiverStream};
use tokio_util::sync::CancellationToken;
use tonic::{Request, Response, Status, Streaming};

type FeatureStream = Pin<Box<dyn Stream<Item = Result<Feature, Status>> + Send>>;

/// gRPC service answering point lookups, range queries, route summaries and
/// nearest/farthest recommendations.
///
/// Cloning is cheap: clones share the same store and lifecycle, so shutting
/// down any clone shuts down all of them.
#[derive(Clone)]
pub struct RouteGuideService {
    store: FeatureStore,
    config: ServerConfig,
    lifecycle: Arc<Lifecycle>,
}

impl RouteGuideService {
    pub fn new(store: FeatureStore, config: ServerConfig) -> Self {
        let lifecycle = Lifecycle::new(Duration::from_secs(config.shutdown_timeout));
        Self {
            store,
            config,
            lifecycle: Arc::new(lifecycle),
        }
    }

    /// Refuses new calls, drains in-flight calls and cancels any that
    /// outlive the configured shutdown timeout.
    pub async fn shutdown(&self) {
        self.lifecycle.shutdown().await;
    }

    /// Number of calls currently being served.
    #[cfg(test)]
    pub fn inflight(&self) -> usize {
        self.lifecycle.inflight()
    }

    /// Runs `coordinate` on its own task, handing it the sender half of a
    /// response channel, and returns the receiving half as the response
    /// stream.
    fn spawn_stream<F, Fut>(&self, guard: CallGuard, coordinate: F) -> FeatureStream
    where
        F: FnOnce(FeatureStore, ResponseTx<Feature>, CancellationToken) -> Fut,
        Fut: Future<Output = routeguide_tonic_core::Result<u64>> + Send + 'static,
    {
        let kind = guard.kind();
        let (resp_tx, resp_rx) =
            mpsc::channel::<Result<Feature, Status>>(self.config.stream_buffer_size);

        let work = coordinate(self.store.clone(), resp_tx, self.lifecycle.token().clone());

        let fut = async move {
            if let Ok(_sent) = guard.check(work.await) {
                #[cfg(feature = "tracing")]
                tracing::debug!(rpc.method = %kind, sent = _sent, "Stream complete");
            }
        };
        #[cfg(feature = "tracing")]
        let fut = {
            use tracing::Instrument;
            let span = tracing::info_span!(
                "streaming",
                rpc.method = %kind,
                rpc.shape = %kind.shape()
            );
            fut.instrument(span)
        };

        tokio::spawn(fut);

        let stream = ReceiverStream::new(resp_rx).inspect_ok(move |_| {
            increment_features_sent(kind, 1);
        });

        Box::pin(stream)
    }
}

#[tonic::async_trait]
impl RouteGuide for RouteGuideService {
    type ListFeaturesStream = FeatureStream;
    type RecommendStream = FeatureStream;

    /// Returns the feature stored at exactly the requested point, or
    /// `NOT_FOUND` if there is none.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, fields(point = %req.get_ref())))]
    async fn get_feature(&self, req: Request<Point>) -> Result<Response<Feature>, Status> {
        let guard = self.lifecycle.begin(CallKind::GetFeature)?;
        let feature = guard.check(self.store.get(req.get_ref()).cloned())?;
        increment_features_sent(CallKind::GetFeature, 1);
        Ok(Response::new(feature))
    }

    /// Streams every feature strictly inside the requested rectangle, in
    /// store order.
    ///
    /// A rectangle missing either corner is rejected with
    /// `INVALID_ARGUMENT` before any response is sent.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    async fn list_features(
        &self,
        req: Request<Rectangle>,
    ) -> Result<Response<Self::ListFeaturesStream>, Status> {
        let guard = self.lifecycle.begin(CallKind::ListFeatures)?;
        let bounds = guard.check(Bounds::try_from(req.get_ref()))?;

        let stream = self.spawn_stream(guard, move |store, resp_tx, shutdown| async move {
            feed_features(&store, bounds, &resp_tx, &shutdown).await
        });

        Ok(Response::new(stream))
    }

    /// Consumes a stream of points and answers with a summary of the route
    /// once the client closes its side.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    async fn record_route(
        &self,
        req: Request<Streaming<Point>>,
    ) -> Result<Response<RouteSummary>, Status> {
        let guard = self.lifecycle.begin(CallKind::RecordRoute)?;
        let summary = guard.check(record_route(req.into_inner(), self.lifecycle.token()).await)?;
        Ok(Response::new(summary))
    }

    /// Answers each recommendation request with one feature, as requests
    /// arrive.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    async fn recommend(
        &self,
        req: Request<Streaming<RecommendationRequest>>,
    ) -> Result<Response<Self::RecommendStream>, Status> {
        let guard = self.lifecycle.begin(CallKind::Recommend)?;
        let requests = req.into_inner();

        let stream = self.spawn_stream(guard, move |store, resp_tx, shutdown| async move {
            serve_recommendations(&store, requests, &resp_tx, &shutdown).await
        });

        Ok(Response::new(stream))
    }
}
