//! Domain model for the incubation dashboard.
//!
//! Value types for the backend payloads, the fetch/promotion error taxonomy,
//! and the stage-track model. Everything here is plain data plus
//! invariant-preserving methods; I/O lives in `gateways` and orchestration
//! in `dashboard`.

pub mod errors;
pub mod stage;
pub mod types;
