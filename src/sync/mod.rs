//! Boundary synchronisation: produce a neighbour ring that matches an
//! edited boundary.
//!
//! Displacement is preferred whenever the old edited geometry was captured
//! before mutation: it is insensitive to vertex counts, leaves
//! off-boundary vertices untouched, and preserves the neighbour's vertex
//! density. Projection is the fallback when only the edited polyline is
//! known. Splicing copies a polyline in verbatim and destroys density, so
//! it stays off the default path.

mod displace;
mod project;
mod proposal;
mod quality;
mod splice;

pub use displace::{sync_boundary_by_displacement, DisplacementOutcome};
pub use project::sync_boundary_by_projection;
pub use proposal::{generate_boundary_proposals, sync_boundary_exact_copy, BoundaryProposal};
pub use quality::{assess_connection, ConnectionPoints};
pub use splice::splice_ring;
