use serde::{Deserialize, Serialize};

/// How a neighbour relates to the edited patch after an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    /// Intersection with the new geometry exceeds the reporting threshold.
    Overlap,
    /// The edited boundary retracted away from the shared segment.
    Gap,
    /// Boundaries still coincide within tolerance.
    Aligned,
}

/// Verdict on how cleanly a proposed segment joins the unedited remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapQuality {
    Good,
    Poor,
}
