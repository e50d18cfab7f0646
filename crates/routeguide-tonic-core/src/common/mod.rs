//! Shared types, geometry and feature storage for the RouteGuide service.
//!
//! ## Submodules
//!
//! - [`error`] - Centralized service error type and its mapping to
//!   [`tonic::Status`].
//! - [`types`] - Coordinate constants and call-shape metadata.
//! - [`geo`] - Great-circle distance and bounding-box containment.
//! - [`store`] - The immutable feature set and its queries.
//! - [`recommend`] - Nearest / farthest selection over the store.
//! - [`route`] - Per-call route accumulation for `RecordRoute`.
//! - [`data`] - The built-in feature set.
//! - [`proto`] - Generated protobuf messages and gRPC bindings.

pub mod data;
pub mod error;
pub mod geo;
pub mod recommend;
pub mod route;
pub mod store;
pub mod types;

pub use error::{Error, Result};

pub mod proto {
    tonic::include_proto!("routeguide");
    pub const FILE_DESCRIPTOR_SET: &[u8] =
        tonic::include_file_descriptor_set!("routeguide_descriptor");
}
