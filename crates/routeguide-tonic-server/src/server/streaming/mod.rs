//! Per-call coordinators for the three streaming RPCs.
//!
//! Each coordinator owns one call's state and talks to the transport only
//! through the receive and send primitives in [`channel`]:
//!
//! - [`features`] - server-streaming range query (`ListFeatures`).
//! - [`route`] - client-streaming route summary (`RecordRoute`).
//! - [`recommend`] - bidirectional request/answer pairing (`Recommend`).

pub mod channel;
pub mod features;
pub mod recommend;
pub mod route;
