// End-to-end scenarios over the full edit pipeline:
//   detection -> post-edit analysis -> boundary proposals -> session.

use geo::{Coord, LineString, MultiPolygon, Polygon};

use mapmend::{
    analyse_post_edit, find_adjacent_patches, generate_boundary_proposals, geodesic_area_sqm,
    ring_at, sync_boundary_by_projection, try_difference, EditSession, Patch, PatchSet,
    Relationship,
};

fn c(x: f64, y: f64) -> Coord<f64> {
    Coord { x, y }
}

fn ring_to_multipolygon(open: &[Coord<f64>]) -> MultiPolygon<f64> {
    let mut coords = open.to_vec();
    coords.push(coords[0]);
    MultiPolygon(vec![Polygon::new(LineString(coords), vec![])])
}

/// Rectangle spanning [x0, x1] x [y0, y1] with `steps` segments on its
/// west edge, walked downward (counter-clockwise overall).
fn rect_dense_west(x0: f64, x1: f64, y0: f64, y1: f64, steps: usize) -> MultiPolygon<f64> {
    let mut coords = vec![c(x1, y0), c(x1, y1)];
    coords.extend((0..=steps).map(|i| c(x0, y1 - (y1 - y0) * i as f64 / steps as f64)));
    ring_to_multipolygon(&coords)
}

/// Rectangle with `steps` segments on its east edge, walked upward.
fn rect_dense_east(x0: f64, x1: f64, y0: f64, y1: f64, steps: usize) -> MultiPolygon<f64> {
    let mut coords = vec![c(x0, y0)];
    coords.extend((0..=steps).map(|i| c(x1, y0 + (y1 - y0) * i as f64 / steps as f64)));
    coords.push(c(x0, y1));
    ring_to_multipolygon(&coords)
}

// --- S1: shared edge detection after simplification ---------------------

#[test]
fn s1_simplified_ring_still_matches_dense_neighbour() {
    // The edited ring was simplified down to plain corners; the neighbour
    // keeps a dense western edge with 9 vertices at shared y-values.
    let edited = vec![c(0.0, 0.0), c(2.0, 0.0), c(2.0, 4.0), c(0.0, 4.0)];
    let mut nb = Vec::new();
    nb.extend((0..=8).map(|i| c(2.0, i as f64 * 0.5)));
    nb.push(c(4.0, 4.0));
    nb.push(c(4.0, 0.0));

    let patches = PatchSet::from_patches(vec![
        Patch::new("edited", "E", ring_to_multipolygon(&edited)),
        Patch::new("nb", "N", ring_to_multipolygon(&nb)),
    ]);

    let records = find_adjacent_patches("edited", &edited, &patches, 0, 0);
    assert_eq!(records.len(), 1);
    assert!(records[0].matched_vertex_count >= 3);
    assert_eq!(records[0].patch_id, "nb");
}

// --- S2: retracted boundary --------------------------------------------

#[test]
fn s2_retraction_reports_gap_and_gap_polygon() {
    let old = rect_dense_east(0.0, 2.0, 0.0, 2.0, 8);
    let new = rect_dense_east(0.0, 1.5, 0.0, 2.0, 8);
    let nb = rect_dense_west(2.0, 4.0, 0.0, 2.0, 8);
    let patches = PatchSet::from_patches(vec![
        Patch::new("edited", "E", old.clone()),
        Patch::new("nb", "N", nb),
    ]);

    let analysis = analyse_post_edit("edited", &old, &new, &patches, None);
    assert_eq!(analysis.neighbours.len(), 1);
    assert_eq!(analysis.neighbours[0].relationship, Relationship::Gap);

    let lost = try_difference(&old, &new).unwrap();
    let expected = geodesic_area_sqm(&lost);
    assert!(analysis.gap_geometry.is_some());
    assert!(
        (analysis.gap_area_sqm - expected).abs() / expected < 0.01,
        "gap {} vs lost strip {expected}",
        analysis.gap_area_sqm
    );
}

// --- S3 / S4: displacement preserves density, projection fallback -------

fn s3_fixture() -> (MultiPolygon<f64>, MultiPolygon<f64>, PatchSet) {
    // Old east boundary: 5 vertices at x=2.002. New: 3 vertices at
    // x=2.001 (the user pulled the edge ~100 m west). The neighbour keeps
    // 5 vertices along the shared edge.
    let old = ring_to_multipolygon(&[
        c(2.0, 0.0),
        c(2.002, 0.0),
        c(2.002, 0.001),
        c(2.002, 0.002),
        c(2.002, 0.003),
        c(2.002, 0.004),
        c(2.0, 0.004),
    ]);
    let new = ring_to_multipolygon(&[
        c(2.0, 0.0),
        c(2.001, 0.0),
        c(2.001, 0.002),
        c(2.001, 0.004),
        c(2.0, 0.004),
    ]);
    let nb = ring_to_multipolygon(&[
        c(2.006, 0.0),
        c(2.006, 0.004),
        c(2.002, 0.004),
        c(2.002, 0.003),
        c(2.002, 0.002),
        c(2.002, 0.001),
        c(2.002, 0.0),
    ]);
    let patches = PatchSet::from_patches(vec![
        Patch::new("edited", "E", old.clone()),
        Patch::new("nb", "N", nb),
    ]);
    (old, new, patches)
}

#[test]
fn s3_displacement_preserves_neighbour_density() {
    let (old, new, patches) = s3_fixture();
    let analysis = analyse_post_edit("edited", &old, &new, &patches, None);
    assert_eq!(analysis.neighbours.len(), 1);

    let proposals = generate_boundary_proposals(&analysis, &new, &patches, Some(&old));
    assert_eq!(proposals.len(), 1);
    let ring = ring_at(&proposals[0].proposed_geometry, 0, 0).unwrap();
    let original = ring_at(&patches.get("nb").unwrap().geometry, 0, 0).unwrap();
    assert_eq!(ring.0.len(), original.0.len());
    // the 5 formerly shared vertices cluster at the new boundary
    let moved: Vec<&Coord<f64>> =
        ring.0.iter().filter(|v| (v.x - 2.001).abs() < 1e-4).collect();
    assert_eq!(moved.len(), 5, "shared vertices not displaced: {:?}", ring.0);
}

#[test]
fn s4_projection_fallback_preserves_vertex_count() {
    let (old, new, patches) = s3_fixture();
    let analysis = analyse_post_edit("edited", &old, &new, &patches, None);
    let proposals = generate_boundary_proposals(&analysis, &new, &patches, None);
    assert_eq!(proposals.len(), 1);
    let ring = ring_at(&proposals[0].proposed_geometry, 0, 0).unwrap();
    let original = ring_at(&patches.get("nb").unwrap().geometry, 0, 0).unwrap();
    assert_eq!(ring.0.len(), original.0.len());
    for v in ring.0.iter().filter(|v| v.x < 2.0015) {
        assert!((v.x - 2.001).abs() < 1e-9, "vertex off the edited polyline: {v:?}");
    }
}

// --- S5: narrowing keeps the untouched shared edge intact ----------------

#[test]
fn s5_west_edit_leaves_east_neighbour_vertices_in_place() {
    // The user refined the simplified geometry on the west side only; the
    // eastern shared edge must not be overwritten with coarse vertices.
    let simplified = rect_dense_east(0.0, 2.0, 0.0, 0.004, 4);
    let mut new = simplified.clone();
    // push the two western corners outward
    {
        let poly = &mut new.0[0];
        let mut coords = poly.exterior().0.clone();
        for v in coords.iter_mut() {
            if v.x == 0.0 {
                v.x = -0.001;
            }
        }
        *poly = Polygon::new(LineString(coords), vec![]);
    }
    let nb = rect_dense_west(2.0, 2.004, 0.0, 0.004, 4);
    let patches = PatchSet::from_patches(vec![
        Patch::new("edited", "E", simplified.clone()),
        Patch::new("nb", "N", nb),
    ]);

    let analysis = analyse_post_edit("edited", &simplified, &new, &patches, Some(&simplified));
    let proposals = generate_boundary_proposals(&analysis, &new, &patches, Some(&simplified));
    for proposal in proposals {
        let ring = ring_at(&proposal.proposed_geometry, 0, 0).unwrap();
        for v in ring.0.iter().filter(|v| v.x > 1.9) {
            assert!((v.x - 2.0).abs() < 1e-2, "shared vertex dragged: {v:?}");
        }
    }
}

// --- S6: duplicate detection --------------------------------------------

#[test]
fn s6_identical_patch_listed_as_duplicate_and_updatable() {
    let geom = rect_dense_east(0.0, 0.02, 0.0, 0.02, 6);
    let new = rect_dense_east(0.0, 0.019, 0.0, 0.02, 6);
    let mut session = EditSession::new(PatchSet::from_patches(vec![
        Patch::new("edited", "E", geom.clone()),
        Patch::new("twin", "T", geom.clone()),
    ]));

    let outcome = session.apply_edit("edited", new.clone(), &[]).unwrap();
    assert_eq!(outcome.analysis.duplicates.len(), 1);
    assert_eq!(outcome.analysis.duplicates[0].adjacency.patch_id, "twin");

    // the user consents: the duplicate takes the new geometry verbatim
    session.update_geometry("twin", new.clone()).unwrap();
    assert_eq!(session.working_patches().get("twin").unwrap().geometry, new);
}

// --- S7: gap cleanup against an occupying patch --------------------------

#[test]
fn s7_gap_excludes_area_already_covered() {
    let old = rect_dense_east(0.0, 0.02, 0.0, 0.02, 4);
    let new = rect_dense_east(0.0, 0.01, 0.0, 0.02, 4);
    // patch C already covers the northern half of the lost strip
    let cover = rect_dense_west(0.01, 0.02, 0.01, 0.02, 2);
    let patches = PatchSet::from_patches(vec![
        Patch::new("edited", "E", old.clone()),
        Patch::new("c", "C", cover.clone()),
    ]);

    let analysis = analyse_post_edit("edited", &old, &new, &patches, None);
    let lost = try_difference(&old, &new).unwrap();
    let uncovered = try_difference(&lost, &cover).unwrap();
    let expected = geodesic_area_sqm(&uncovered);
    assert!(expected > 100.0);
    assert!(
        (analysis.gap_area_sqm - expected).abs() / expected < 0.01,
        "gap {} vs uncovered {expected}",
        analysis.gap_area_sqm
    );
}

// --- S8: reversed winding ------------------------------------------------

#[test]
fn s8_opposing_windings_detected_and_projected() {
    // Both patches counter-clockwise, so they traverse the shared edge in
    // opposite directions.
    let edited = vec![c(0.0, 0.0), c(2.0, 0.0), c(2.0, 4.0), c(0.0, 4.0)];
    let mut nb = vec![c(4.0, 0.0), c(4.0, 4.0)];
    nb.extend((0..=8).rev().map(|i| c(2.0, i as f64 * 0.5)));

    let patches = PatchSet::from_patches(vec![
        Patch::new("edited", "E", ring_to_multipolygon(&edited)),
        Patch::new("nb", "N", ring_to_multipolygon(&nb)),
    ]);

    let records = find_adjacent_patches("edited", &edited, &patches, 0, 0);
    assert_eq!(records.len(), 1);
    let rec = &records[0];
    assert!(rec.is_reversed);

    // projection respects the neighbour's winding: index order of the
    // shared range is untouched, values land on the replacement polyline
    let replacement = [c(2.001, 0.0), c(2.001, 4.0)];
    let out = sync_boundary_by_projection(&nb, rec.start_index, rec.end_index, &replacement, rec.is_reversed);
    assert_eq!(out.len(), nb.len());
    for (i, v) in out.iter().enumerate().skip(2) {
        assert!((v.x - 2.001).abs() < 1e-9);
        // still walking downward
        if i > 2 {
            assert!(v.y < out[i - 1].y);
        }
    }
}
