#![doc = "Geometry-edit engine for geographic patch sets"]

//! A patch set covers a territory with non-overlapping MultiPolygons.
//! When one patch's boundary is reshaped, this crate simplifies the
//! candidate geometry, detects which other patches share the boundary,
//! classifies how each neighbour is affected (overlap, gap, aligned,
//! duplicate), and proposes a synchronised boundary for each without
//! destroying the neighbour's vertex density.
//!
//! All coordinates are lon/lat degrees; tolerances are planar in degree
//! space, user-facing measures geodesic. The engine is synchronous and
//! deterministic; it never raises on geometry issues, degrading to a
//! consistent but possibly smaller result instead.

mod adjacency;
mod analysis;
pub mod consts;
mod geom;
mod io;
pub mod ring;
mod session;
mod simplify;
mod sync;
mod types;

#[doc(inline)]
pub use types::{Patch, PatchSet, Relationship, SnapQuality};

#[doc(inline)]
pub use adjacency::{find_adjacent_patches, shared_segments, AdjacencyRecord, SharedSegment};

#[doc(inline)]
pub use analysis::{analyse_post_edit, GapGeometry, NeighbourInfo, PostEditAnalysis};

#[doc(inline)]
pub use simplify::{compute_stats, find_tolerance_for_target, simplify, vertex_count, SimplifyStats};

#[doc(inline)]
pub use sync::{
    assess_connection, generate_boundary_proposals, splice_ring, sync_boundary_by_displacement,
    sync_boundary_by_projection, sync_boundary_exact_copy, BoundaryProposal, ConnectionPoints,
    DisplacementOutcome,
};

#[doc(inline)]
pub use session::{ApplyEditOutcome, EditMode, EditSession};

#[doc(inline)]
pub use geom::{
    distance_m, geodesic_area_sqm, polygon_area_sqm, ring_at, rings_of, try_difference,
    try_intersection, try_union, with_ring_replaced, PatchIndex,
};

#[doc(inline)]
pub use io::{
    multipolygon_to_wkt, patch_color, read_patches_from_geojson_bytes,
    write_patches_to_geojson_bytes, Rgb,
};
