//! Read-only project cockpit: fetches snapshots from the data layer and
//! recomputes health and billing decisions on every request.

pub mod router;
pub mod service;
pub mod sources;


pub use router::cockpit_router;
pub use service::{CockpitError, ProjectCockpitService, WorkflowOutcome};
pub use sources::{ProjectSnapshotSource, SourceError, WorkflowSource};
