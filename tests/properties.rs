// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Property tests over generated polygons.

mod helpers;

use std::f32::consts::PI;

use polytess::{ContourOrientation, ElementType, TessOption, Tessellator, WindingRule};
use proptest::collection::vec;
use proptest::prelude::*;

/// Star-shaped simple polygons around the origin: one vertex per angular
/// slot, jittered inside the slot, at a random radius. Gaps between
/// neighbours stay under half a turn so the origin is in the kernel.
fn star_polygons() -> impl Strategy<Value = Vec<f32>> {
    (3usize..40).prop_flat_map(|n| {
        vec((0.0f32..0.4, 1.0f32..10.0), n).prop_map(move |pts| {
            pts.iter()
                .enumerate()
                .flat_map(|(i, &(jitter, r))| {
                    let a = 2.0 * PI * (i as f32 + jitter) / n as f32;
                    [r * a.cos(), r * a.sin()]
                })
                .collect()
        })
    })
}

/// Arbitrary closed polylines; usually self-intersecting.
fn scribbles() -> impl Strategy<Value = Vec<Vec<f32>>> {
    vec(vec(-100.0f32..100.0, 6..24), 1..4).prop_map(|contours| {
        contours
            .into_iter()
            .map(|mut c| {
                c.truncate(c.len() / 2 * 2);
                c
            })
            .collect()
    })
}

fn tessellate(contours: &[Vec<f32>], rule: WindingRule, element_type: ElementType) -> Tessellator {
    let mut tess = Tessellator::new();
    tess.set_option(TessOption::CheckMesh, true);
    for c in contours {
        tess.add_contour_flat(2, c, ContourOrientation::Original)
            .expect("coordinates in range");
    }
    tess.tessellate(rule, element_type, 3)
        .expect("consistent mesh");
    tess
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn simple_polygon_gives_n_minus_two_triangles(poly in star_polygons()) {
        let n = poly.len() / 2;
        let tess = tessellate(&[poly.clone()], WindingRule::NonZero, ElementType::Polygons);
        helpers::verify_valid_output(&tess);
        prop_assert_eq!(tess.element_count(), n - 2);
        prop_assert_eq!(tess.vertex_count(), n);

        let sign = helpers::polygon_signed_area(&poly).signum();
        for tri in helpers::triangles(&tess) {
            prop_assert!(helpers::triangle_area(tri[0], tri[1], tri[2]) * sign > 0.0);
        }
        let expected = helpers::polygon_signed_area(&poly).abs();
        let area = helpers::total_tessellation_area(&tess);
        prop_assert!((area - expected).abs() <= expected * 1e-3);
    }

    #[test]
    fn winding_rules_partition_the_covered_area(contours in scribbles()) {
        let area = |rule| {
            let tess = tessellate(&contours, rule, ElementType::Polygons);
            helpers::verify_valid_output(&tess);
            helpers::total_tessellation_area(&tess)
        };
        let nonzero = area(WindingRule::NonZero);
        let positive = area(WindingRule::Positive);
        let negative = area(WindingRule::Negative);
        let odd = area(WindingRule::EvenOdd);
        let odd_pos = area(WindingRule::OddPositive);
        let odd_neg = area(WindingRule::OddNegative);

        let tol = 1e-3 * nonzero.max(1.0);
        prop_assert!((positive + negative - nonzero).abs() <= tol);
        prop_assert!((odd_pos + odd_neg - odd).abs() <= tol);
        prop_assert!(odd <= nonzero + tol);
    }

    #[test]
    fn boundary_loops_enclose_the_triangulated_area(contours in scribbles()) {
        let polys = tessellate(&contours, WindingRule::NonZero, ElementType::Polygons);
        let loops = tessellate(&contours, WindingRule::NonZero, ElementType::BoundaryContours);
        helpers::verify_valid_output(&loops);

        let loop_area: f32 = loops
            .elements()
            .chunks_exact(2)
            .map(|pair| {
                let (start, count) = (pair[0] as usize, pair[1] as usize);
                let flat: Vec<f32> = loops.vertices()[start..start + count]
                    .iter()
                    .flat_map(|v| [v.position[0], v.position[1]])
                    .collect();
                helpers::polygon_signed_area(&flat)
            })
            .sum();
        let tri_area = helpers::total_tessellation_signed_area(&polys);
        prop_assert!((loop_area - tri_area).abs() <= 1e-3 * tri_area.abs().max(1.0));
    }

    #[test]
    fn neighbours_are_mutual(poly in star_polygons()) {
        let tess = tessellate(&[poly], WindingRule::NonZero, ElementType::ConnectedPolygons);
        helpers::verify_valid_output(&tess);
        let elems = tess.elements();
        for i in 0..tess.element_count() {
            for &n in &elems[i * 6 + 3..i * 6 + 6] {
                if n != polytess::TESS_UNDEF {
                    let back = &elems[n as usize * 6 + 3..n as usize * 6 + 6];
                    prop_assert!(back.contains(&(i as u32)));
                }
            }
        }
    }
}
