//! Project cockpit decisions for HandwerkOS: traffic-light project health,
//! the single recommended next action, and the billing workflow choice
//! between direct invoicing and delivery-note-first.
//!
//! The engines only see caller-supplied snapshots. The cockpit service
//! reads them through source traits and never writes anything back.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
