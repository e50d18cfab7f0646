//! gRPC service implementation and call lifecycle tracking.
//!
//! ## Structure
//!
//! - [`handler`] - gRPC service entry point (`RouteGuideService`).
//! - [`lifecycle`] - in-flight call accounting and graceful shutdown.

pub mod handler;
pub mod lifecycle;
