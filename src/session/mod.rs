//! Edit session: owns the working patch set, stages and applies edits.
//!
//! The session never mutates the original snapshot. The working set is
//! derived on demand: `(original − deleted)` with modifications applied,
//! then new patches appended. Dirty ids accumulate across modifications
//! and are cleared only on commit.

use ahash::{AHashMap, AHashSet};
use anyhow::{bail, Result};
use geo::MultiPolygon;

use crate::analysis::{analyse_post_edit, PostEditAnalysis};
use crate::sync::{generate_boundary_proposals, BoundaryProposal};
use crate::types::{Patch, PatchSet, Relationship, SnapQuality};

/// Interaction state of the edit workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    View,
    Draw,
    SimplifyPreview,
    SimplifyRefine,
}

/// What an applied edit produced: the analysis, the proposals that were
/// auto-applied to linked neighbours, and the ones stashed for review.
#[derive(Debug)]
pub struct ApplyEditOutcome {
    pub analysis: PostEditAnalysis,
    pub applied: Vec<BoundaryProposal>,
    pub needs_review: Vec<BoundaryProposal>,
}

#[derive(Debug, Clone)]
pub struct EditSession {
    original: PatchSet,
    modified: AHashMap<String, MultiPolygon<f64>>,
    new_patches: Vec<Patch>,
    deleted: AHashSet<String>,
    dirty: AHashSet<String>,
    mode: EditMode,
    selected: Option<String>,
    simplified_preview: Option<MultiPolygon<f64>>,
    verbose: bool,
}

impl EditSession {
    /// Start a session over a snapshot of the patch store.
    pub fn new(original: PatchSet) -> Self {
        Self {
            original,
            modified: AHashMap::new(),
            new_patches: Vec::new(),
            deleted: AHashSet::new(),
            dirty: AHashSet::new(),
            mode: EditMode::View,
            selected: None,
            simplified_preview: None,
            verbose: false,
        }
    }

    /// Enable `[session]` progress diagnostics on stderr.
    pub fn verbose(mut self, on: bool) -> Self {
        self.verbose = on;
        self
    }

    #[inline] pub fn mode(&self) -> EditMode { self.mode }

    #[inline] pub fn selected(&self) -> Option<&str> { self.selected.as_deref() }

    #[inline] pub fn simplified_preview(&self) -> Option<&MultiPolygon<f64>> {
        self.simplified_preview.as_ref()
    }

    /// Select a patch (or clear the selection). Unknown ids clear it.
    pub fn select_patch(&mut self, id: Option<&str>) {
        self.selected = id
            .filter(|id| self.exists(id))
            .map(str::to_string);
    }

    pub fn enter_draw_mode(&mut self) {
        self.mode = EditMode::Draw;
        self.selected = None;
        self.simplified_preview = None;
    }

    /// Start the simplify workflow on the selected patch.
    pub fn enter_edit_boundary_mode(&mut self) -> Result<()> {
        if self.selected.is_none() {
            bail!("[session] no patch selected");
        }
        self.mode = EditMode::SimplifyPreview;
        Ok(())
    }

    /// Move from preview into hand refinement of `simplified`.
    pub fn enter_refine_mode(&mut self, simplified: MultiPolygon<f64>) -> Result<()> {
        if self.selected.is_none() {
            bail!("[session] no patch selected");
        }
        self.simplified_preview = Some(simplified);
        self.mode = EditMode::SimplifyRefine;
        Ok(())
    }

    pub fn exit_edit_mode(&mut self) {
        self.mode = EditMode::View;
        self.simplified_preview = None;
    }

    /// Stage a new geometry for an existing patch.
    pub fn update_geometry(&mut self, id: &str, geometry: MultiPolygon<f64>) -> Result<()> {
        if !self.exists(id) {
            bail!("[session] unknown patch id: {id}");
        }
        if let Some(patch) = self.new_patches.iter_mut().find(|p| p.id == id) {
            patch.geometry = geometry;
        } else {
            self.modified.insert(id.to_string(), geometry);
        }
        self.dirty.insert(id.to_string());
        Ok(())
    }

    /// Register a patch created in this session (e.g. to fill a gap).
    pub fn add_new_patch(&mut self, patch: Patch) -> Result<()> {
        if self.exists(&patch.id) {
            bail!("[session] patch id already in use: {}", patch.id);
        }
        self.dirty.insert(patch.id.clone());
        self.new_patches.push(patch);
        Ok(())
    }

    pub fn mark_deleted(&mut self, id: &str) {
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        self.new_patches.retain(|p| p.id != id);
        self.modified.remove(id);
        if self.original.contains(id) {
            self.deleted.insert(id.to_string());
        }
        self.dirty.insert(id.to_string());
    }

    /// Ids with staged, uncommitted changes, sorted.
    pub fn dirty_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.dirty.iter().cloned().collect();
        ids.sort_unstable();
        ids
    }

    /// Forget staged-change markers, either for `ids` or for everything.
    /// Called after the host has persisted.
    pub fn clear_dirty(&mut self, ids: Option<&[String]>) {
        match ids {
            Some(ids) => {
                for id in ids {
                    self.dirty.remove(id);
                }
            }
            None => self.dirty.clear(),
        }
    }

    fn exists(&self, id: &str) -> bool {
        (self.original.contains(id) && !self.deleted.contains(id))
            || self.new_patches.iter().any(|p| p.id == id)
    }

    /// The derived working set: `(original − deleted)` with modifications
    /// applied, then session-created patches.
    pub fn working_patches(&self) -> PatchSet {
        let mut out = PatchSet::new();
        for patch in self.original.iter() {
            if self.deleted.contains(&patch.id) {
                continue;
            }
            let mut patch = patch.clone();
            if let Some(geometry) = self.modified.get(&patch.id) {
                patch.geometry = geometry.clone();
            }
            out.insert(patch);
        }
        for patch in &self.new_patches {
            out.insert(patch.clone());
        }
        out
    }

    /// Apply a user-approved geometry to `patch_id` and reconcile the
    /// neighbourhood.
    ///
    /// Proposals for patches in `linked` are applied when their snap
    /// quality is good and stashed for manual review otherwise; everything
    /// else (duplicates, remaining neighbours, the gap) is left in the
    /// returned analysis for the host to surface.
    pub fn apply_edit(
        &mut self,
        patch_id: &str,
        new_geometry: MultiPolygon<f64>,
        linked: &[String],
    ) -> Result<ApplyEditOutcome> {
        // Capture the pre-edit state before any mutation.
        let pre_edit = self.working_patches();
        let Some(old_patch) = pre_edit.get(patch_id) else {
            bail!("[session] unknown patch id: {patch_id}");
        };
        let old_geometry = old_patch.geometry.clone();
        let pre_simplified = if self.mode == EditMode::SimplifyRefine {
            self.simplified_preview.clone()
        } else {
            None
        };

        self.update_geometry(patch_id, new_geometry.clone())?;
        self.exit_edit_mode();

        if self.verbose {
            eprintln!("[session] analysing edit of {patch_id}");
        }
        let mut analysis = analyse_post_edit(
            patch_id,
            &old_geometry,
            &new_geometry,
            &pre_edit,
            pre_simplified.as_ref(),
        );

        let mut applied = Vec::new();
        let mut needs_review = Vec::new();
        if !linked.is_empty() {
            let proposals =
                generate_boundary_proposals(&analysis, &new_geometry, &pre_edit, Some(&old_geometry));
            for proposal in proposals {
                if !linked.iter().any(|id| id == &proposal.patch_id) {
                    continue;
                }
                match proposal.snap_quality {
                    SnapQuality::Good => {
                        if self.verbose {
                            eprintln!("[session] aligning linked neighbour {}", proposal.patch_id);
                        }
                        self.update_geometry(&proposal.patch_id, proposal.proposed_geometry.clone())?;
                        applied.push(proposal);
                    }
                    SnapQuality::Poor => {
                        if self.verbose {
                            eprintln!(
                                "[session] stashing poor alignment for {} for review",
                                proposal.patch_id
                            );
                        }
                        needs_review.push(proposal);
                    }
                }
            }
        }

        // Auto-aligned neighbours are settled.
        for info in &mut analysis.neighbours {
            if applied.iter().any(|p| p.patch_id == info.adjacency.patch_id) {
                info.relationship = Relationship::Aligned;
            }
        }

        Ok(ApplyEditOutcome { analysis, applied, needs_review })
    }
}
