// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Tests for 3D input, custom normals and the sweep direction option.

mod helpers;

use std::f32::consts::PI;

use polytess::{ContourOrientation, ElementType, TessOptions, Tessellator, WindingRule};

fn tessellate_3d(points: &[[f32; 3]], options: TessOptions, rule: WindingRule) -> Tessellator {
    let mut tess = Tessellator::with_options(options);
    tess.add_contour(&helpers::contour3(points), ContourOrientation::Original)
        .expect("valid contour");
    tess.tessellate(rule, ElementType::Polygons, 3)
        .expect("tessellation");
    tess
}

fn with_normal(normal: [f32; 3]) -> TessOptions {
    TessOptions {
        normal,
        ..TessOptions::default()
    }
}

#[test]
fn xy_plane_keeps_positions() {
    let tess = tessellate_3d(
        &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
        TessOptions::default(),
        WindingRule::Positive,
    );
    assert_eq!(tess.element_count(), 2);
    assert_eq!(tess.vertex_count(), 4);
    for v in tess.vertices() {
        let [x, y, z] = v.position;
        assert!((0.0..=1.0).contains(&x) && (0.0..=1.0).contains(&y));
        assert_eq!(z, 0.0);
    }
    let n = tess.normal();
    assert_eq!((n[0], n[1]), (0.0, 0.0));
    assert!(n[2] != 0.0);
}

#[test]
fn xz_plane_with_normal() {
    // Seen along +y this quad runs clockwise.
    let quad = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]];
    let tess = tessellate_3d(&quad, with_normal([0.0, 1.0, 0.0]), WindingRule::Positive);
    assert_eq!(tess.element_count(), 0);

    let tess = tessellate_3d(&quad, with_normal([0.0, 1.0, 0.0]), WindingRule::Negative);
    assert_eq!(tess.element_count(), 2);
    assert!(tess.vertices().iter().all(|v| v.position[1] == 0.0));
}

#[test]
fn xz_plane_auto_normal() {
    let tess = tessellate_3d(
        &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
        TessOptions::default(),
        WindingRule::Positive,
    );
    assert_eq!(tess.element_count(), 2);
    let n = tess.normal();
    assert_eq!((n[0], n[2]), (0.0, 0.0));
}

#[test]
fn tilted_plane_triangle() {
    // z = x + y
    let s = 1.0 / 3.0f32.sqrt();
    let points = [[0.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]];
    let tess = tessellate_3d(&points, with_normal([-s, -s, s]), WindingRule::Positive);
    assert_eq!(tess.element_count(), 1);
    for v in tess.vertices() {
        let [x, y, z] = v.position;
        assert!((z - (x + y)).abs() < 1e-6);
    }
}

#[test]
fn pentagon_3d_gives_three_triangles() {
    let pent: Vec<[f32; 3]> = (0..5)
        .map(|i| {
            let angle = 2.0 * PI * i as f32 / 5.0 - PI / 2.0;
            [angle.cos(), angle.sin(), 2.0]
        })
        .collect();
    let tess = tessellate_3d(&pent, TessOptions::default(), WindingRule::Positive);
    assert_eq!(tess.element_count(), 3);
    helpers::verify_no_degenerate_triangles(&tess, 1e-3);
}

#[test]
fn flat_2d_and_3d_input_agree() {
    let mut tess2d: Tessellator = Tessellator::new();
    tess2d
        .add_contour_flat(
            2,
            &[0.0, 0.0, 5.0, 0.0, 5.0, 5.0, 0.0, 5.0],
            ContourOrientation::Original,
        )
        .expect("2d");
    tess2d
        .tessellate(WindingRule::Positive, ElementType::Polygons, 3)
        .expect("2d");

    let mut tess3d: Tessellator = Tessellator::new();
    tess3d
        .add_contour_flat(
            3,
            &[0.0, 0.0, 0.0, 5.0, 0.0, 0.0, 5.0, 5.0, 0.0, 0.0, 5.0, 0.0],
            ContourOrientation::Original,
        )
        .expect("3d");
    tess3d
        .tessellate(WindingRule::Positive, ElementType::Polygons, 3)
        .expect("3d");

    assert_eq!(tess2d.elements(), tess3d.elements());
    assert_eq!(tess2d.vertices(), tess3d.vertices());
}

#[test]
fn negative_normal_reverses_winding() {
    let quad = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]];

    let up = tessellate_3d(&quad, with_normal([0.0, 0.0, 1.0]), WindingRule::Positive);
    assert_eq!(up.element_count(), 2);
    let (s_unit, t_unit) = up.sweep_axes();
    assert_eq!(s_unit, [1.0, 0.0, 0.0]);
    assert_eq!(t_unit, [0.0, 1.0, 0.0]);

    let down = tessellate_3d(&quad, with_normal([0.0, 0.0, -1.0]), WindingRule::Positive);
    assert_eq!(down.element_count(), 0);

    let down = tessellate_3d(&quad, with_normal([0.0, 0.0, -1.0]), WindingRule::Negative);
    assert_eq!(down.element_count(), 2);
    assert_eq!(down.normal(), [0.0, 0.0, -1.0]);
}

#[test]
fn rotated_sweep_direction_gives_same_area() {
    let star = [
        [0.0f32, 3.0],
        [1.0, 1.0],
        [3.0, 0.0],
        [1.0, -1.0],
        [0.0, -3.0],
        [-1.0, -1.0],
        [-3.0, 0.0],
        [-1.0, 1.0],
    ];
    let contour = helpers::contour2(&star);
    for (sx, sy) in [(1.0, 0.0), (0.0, 1.0), (0.6, 0.8)] {
        let mut tess = Tessellator::with_options(TessOptions {
            s_unit_x: sx,
            s_unit_y: sy,
            ..TessOptions::default()
        });
        tess.add_contour(&contour, ContourOrientation::Original)
            .expect("star");
        tess.tessellate(WindingRule::NonZero, ElementType::Polygons, 3)
            .expect("star");
        assert_eq!(tess.element_count(), 6, "s_unit ({}, {})", sx, sy);
        let area = helpers::total_tessellation_area(&tess);
        assert!((area - 12.0).abs() < 1e-3, "area {} for ({}, {})", area, sx, sy);
    }
}
