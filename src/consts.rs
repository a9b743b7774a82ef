//! Tolerance constants, single-sourced.
//!
//! All planar comparisons are in squared degrees (no `sqrt` on hot paths);
//! user-facing thresholds are in metres or square metres. Deployment
//! contexts at other latitudes may need retuning, which is why everything
//! here is public.

/// Squared proximity tolerance for shared-boundary detection, deg².
/// 4e-8 deg² ≈ (22 m)² at mid latitudes.
pub const SHARED_EDGE_TOL_DEG_SQ: f64 = 4e-8;

/// Padding applied to bounding boxes before overlap tests, degrees (~110 m).
pub const BBOX_PAD_DEG: f64 = 0.001;

/// Minimum number of neighbour vertices a shared segment must contain.
pub const MIN_SHARED_VERTICES: usize = 3;

/// Squared displacement below which a vertex move is a no-op, deg² (~1 mm).
pub const MIN_DISPLACEMENT_DEG_SQ: f64 = 1e-14;

/// Squared displacement above which a vertex move is spurious, deg² (~35 km).
pub const MAX_DISPLACEMENT_DEG_SQ: f64 = 0.1;

/// Squared distance under which two positions are geometrically identical, deg².
pub const GEOMETRIC_TOLERANCE_DEG_SQ: f64 = 1e-14;

/// Minimum area for reporting a gap or classifying an overlap, m².
pub const MIN_AREA_SQM: f64 = 100.0;

/// Fraction of the smaller geometry's area that must be covered for a
/// patch to count as a duplicate of another.
pub const DUPLICATE_OVERLAP_RATIO: f64 = 0.95;

/// Interior angle below which a proposed connection is flagged poor, degrees.
pub const MIN_CONNECTION_ANGLE_DEG: f64 = 30.0;

/// Joint distance above which a proposed connection is flagged poor, metres.
pub const MAX_CONNECTION_DIST_M: f64 = 5.0;

/// Anchor vertices kept on each side of a narrowed edit range.
pub const NARROW_PAD_VERTICES: usize = 3;

/// Maximum winding samples taken along a shared segment walk.
pub const MAX_WINDING_SAMPLES: usize = 20;

/// Maximum original vertices sampled for the deviation statistic.
pub const MAX_DEVIATION_SAMPLES: usize = 500;

/// Tolerance search domain (degrees) and iteration cap.
pub const TOLERANCE_SEARCH_MIN_DEG: f64 = 1e-7;
pub const TOLERANCE_SEARCH_MAX_DEG: f64 = 1e-2;
pub const TOLERANCE_SEARCH_MAX_ITERS: usize = 20;

/// Early-exit slack for the tolerance search: within ±10% of the target.
pub const TOLERANCE_TARGET_SLACK: f64 = 0.10;
