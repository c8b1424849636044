// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Larger generated shapes: spirals, combs, perforated plates, overlapping
// and self-intersecting outlines.

mod helpers;

use std::f32::consts::PI;

use polytess::{ContourOrientation, ElementType, Tessellator, WindingRule, TESS_UNDEF};

/// Tessellate, verify output, and check the triangle count and area.
fn check_shape(
    contours: &[Vec<f32>],
    winding: WindingRule,
    triangles: usize,
    area: f32,
    label: &str,
) -> Tessellator {
    let tess = helpers::tessellate_contours(contours, winding);
    helpers::verify_valid_output(&tess);
    assert_eq!(tess.element_count(), triangles, "{}: triangle count", label);

    let got = helpers::total_tessellation_area(&tess);
    assert!(
        (got - area).abs() <= area * 1e-3,
        "{}: expected area {}, got {}",
        label,
        area,
        got
    );
    tess
}

fn circle(cx: f32, cy: f32, r: f32, n: usize, ccw: bool) -> Vec<f32> {
    let mut pts: Vec<f32> = (0..n)
        .flat_map(|i| {
            let a = 2.0 * PI * i as f32 / n as f32;
            [cx + r * a.cos(), cy + r * a.sin()]
        })
        .collect();
    if !ccw {
        let reversed: Vec<f32> = pts.chunks_exact(2).rev().flatten().copied().collect();
        pts = reversed;
    }
    pts
}

fn rect(x0: f32, y0: f32, x1: f32, y1: f32, ccw: bool) -> Vec<f32> {
    if ccw {
        vec![x0, y0, x1, y0, x1, y1, x0, y1]
    } else {
        vec![x0, y0, x0, y1, x1, y1, x1, y0]
    }
}

/// A thick spiral arm: outer edge out, inner edge back.
fn spiral(turns: f32, steps: usize) -> Vec<f32> {
    let point = |t: f32, r: f32| {
        let a = t * turns * 2.0 * PI;
        [r * a.cos(), r * a.sin()]
    };
    let mut outer = Vec::new();
    let mut inner = Vec::new();
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let r = 2.0 + 10.0 * t;
        outer.extend(point(t, r + 0.8));
        inner.extend(point(t, r));
    }
    // Outer edge runs outward; inner edge comes back.
    let mut pts = inner;
    pts.extend(outer.chunks_exact(2).rev().flatten());
    pts
}

#[test]
fn spiral_is_simple() {
    let shape = spiral(2.5, 150);
    let n = shape.len() / 2;
    let area = helpers::polygon_signed_area(&shape).abs();
    check_shape(&[shape], WindingRule::NonZero, n - 2, area, "spiral");
}

#[test]
fn comb_with_many_reflex_vertices() {
    let mut shape = vec![0.0f32, 0.0, 41.0, 0.0];
    // Teeth along the top, walked right to left.
    for k in (0..20).rev() {
        let x = 2.0 * k as f32 + 1.0;
        shape.extend([x + 1.0, 2.0, x + 1.0, 10.0, x, 10.0, x, 2.0]);
    }
    shape.extend([0.0, 2.0]);
    let n = shape.len() / 2;
    let area = helpers::polygon_signed_area(&shape).abs();
    check_shape(&[shape], WindingRule::Positive, n - 2, area, "comb");
}

#[test]
fn perforated_plate() {
    let mut contours = vec![rect(0.0, 0.0, 10.0, 10.0, true)];
    for i in 0..3 {
        for j in 0..3 {
            let (x, y) = (1.0 + 3.0 * i as f32, 1.0 + 3.0 * j as f32);
            contours.push(rect(x, y, x + 2.0, y + 2.0, false));
        }
    }
    // n + 2h - 2 triangles for a polygon with h holes.
    let (n, h) = (40, 9);
    check_shape(
        &contours,
        WindingRule::EvenOdd,
        n + 2 * h - 2,
        100.0 - 36.0,
        "plate",
    );
    // Same answer whatever the hole orientation under EvenOdd.
    for c in contours.iter_mut().skip(1) {
        let reversed: Vec<f32> = c.chunks_exact(2).rev().flatten().copied().collect();
        *c = reversed;
    }
    check_shape(&contours, WindingRule::EvenOdd, n + 2 * h - 2, 64.0, "plate ccw holes");
}

#[test]
fn annulus_from_circles() {
    let contours = vec![
        circle(0.0, 0.0, 10.0, 64, true),
        circle(0.0, 0.0, 5.0, 48, false),
    ];
    let area = helpers::polygon_signed_area(&contours[0]) + helpers::polygon_signed_area(&contours[1]);
    check_shape(&contours, WindingRule::Positive, 64 + 48, area, "annulus");
}

#[test]
fn bowtie_creates_intersection_vertex() {
    let bowtie = vec![0.0f32, 0.0, 2.0, 2.0, 2.0, 0.0, 0.0, 2.0];
    let tess = check_shape(&[bowtie], WindingRule::NonZero, 2, 2.0, "bowtie");
    assert_eq!(tess.vertex_count(), 5);
    let created: Vec<usize> = tess
        .vertex_indices()
        .iter()
        .enumerate()
        .filter(|(_, &i)| i == TESS_UNDEF)
        .map(|(k, _)| k)
        .collect();
    assert_eq!(created.len(), 1);
    let centre = tess.vertices()[created[0]].position;
    assert!((centre[0] - 1.0).abs() < 1e-5 && (centre[1] - 1.0).abs() < 1e-5);
}

#[test]
fn overlapping_squares_union() {
    // A ring of squares, each overlapping the next.
    let contours: Vec<Vec<f32>> = (0..12)
        .map(|k| {
            let a = 2.0 * PI * k as f32 / 12.0;
            let (cx, cy) = (6.0 * a.cos(), 6.0 * a.sin());
            rect(cx - 2.0, cy - 2.0, cx + 2.0, cy + 2.0, true)
        })
        .collect();

    let nonzero = helpers::tessellate_contours(&contours, WindingRule::NonZero);
    let odd = helpers::tessellate_contours(&contours, WindingRule::EvenOdd);
    let twice = helpers::tessellate_contours(&contours, WindingRule::AbsGeqTwo);
    for tess in [&nonzero, &odd, &twice] {
        helpers::verify_valid_output(tess);
    }

    // Covered once plus covered at least twice is the union.
    let union = helpers::total_tessellation_area(&nonzero);
    let once = helpers::total_tessellation_area(&odd);
    let multi = helpers::total_tessellation_area(&twice);
    assert!(union < 12.0 * 16.0);
    assert!(multi > 0.0);
    assert!((once + multi - union).abs() < 0.05, "{} + {} != {}", once, multi, union);
    // Total coverage counted with multiplicity.
    assert!((once + 2.0 * multi - 12.0 * 16.0).abs() < 0.05);
}

#[test]
fn dat_text_shape_with_duplicate_points() {
    // Repeated vertices and a zero-length edge.
    let data = "\
        0, 0\n 4, 0\n 4, 0\n 4, 4\n 2, 6\n 0, 4\n 0, 4\n\n\
        1 1\n 1 2\n 2 2\n 2 1\n";
    let contours = helpers::parse_contours(data);
    assert_eq!(contours.len(), 2);
    let tess = helpers::tessellate_contours(&contours, WindingRule::EvenOdd);
    helpers::verify_valid_output(&tess);
    let area = helpers::total_tessellation_area(&tess);
    assert!((area - (16.0 + 4.0 - 1.0)).abs() < 1e-3, "area {}", area);
}

#[test]
fn all_rules_on_concentric_circles() {
    // Alternating orientation: windings 1, 0, 1, 0 from the outside in.
    let contours = vec![
        circle(0.0, 0.0, 8.0, 40, true),
        circle(0.0, 0.0, 6.0, 40, false),
        circle(0.0, 0.0, 4.0, 40, true),
        circle(0.0, 0.0, 2.0, 40, false),
    ];
    let ring = |i: usize| {
        helpers::polygon_signed_area(&contours[i]).abs()
            - helpers::polygon_signed_area(&contours[i + 1]).abs()
    };
    let filled = ring(0) + ring(2);

    for rule in WindingRule::ALL {
        let mut tess: Tessellator = Tessellator::new();
        for c in &contours {
            tess.add_contour_flat(2, c, ContourOrientation::Original)
                .expect("circle");
        }
        tess.tessellate(rule, ElementType::Polygons, 3)
            .expect("tessellation");
        helpers::verify_valid_output(&tess);
        let area = helpers::total_tessellation_area(&tess);
        let expected = if rule.is_inside(1) { filled } else { 0.0 };
        assert!(
            (area - expected).abs() < 0.05,
            "{:?}: area {} expected {}",
            rule,
            area,
            expected
        );
    }
}
