//! Guarded boolean operations.
//!
//! Boolean ops can panic on degenerate input; a single bad polygon must
//! skip its contribution rather than abort a whole analysis, so every
//! call goes through `catch_unwind` and surfaces as a `Result`.

use std::panic::{catch_unwind, AssertUnwindSafe};

use anyhow::{anyhow, Result};
use geo::{BooleanOps, MultiPolygon};

fn guarded<F>(op: &'static str, f: F) -> Result<MultiPolygon<f64>>
where
    F: FnOnce() -> MultiPolygon<f64>,
{
    catch_unwind(AssertUnwindSafe(f)).map_err(|_| anyhow!("[geom] {op} failed on degenerate input"))
}

pub fn try_intersection(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>> {
    guarded("intersection", || a.intersection(b))
}

pub fn try_difference(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>> {
    guarded("difference", || a.difference(b))
}

pub fn try_union(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>> {
    guarded("union", || a.union(b))
}
