// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Shared test utilities for the polytess integration tests.

#![allow(dead_code)]

use polytess::{
    ContourOrientation, ContourVertex, ElementType, Tessellator, WindingRule, TESS_UNDEF,
};

/// Parse the `.dat` contour format: one vertex per line as `x y` or `x, y`.
/// Blank lines separate contours. Each contour comes back as a flat array.
pub fn parse_contours(data: &str) -> Vec<Vec<f32>> {
    let mut contours: Vec<Vec<f32>> = Vec::new();
    let mut current: Vec<f32> = Vec::new();

    for line in data.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !current.is_empty() {
                contours.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.extend(
            trimmed
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .filter_map(|s| s.parse::<f32>().ok()),
        );
    }
    if !current.is_empty() {
        contours.push(current);
    }
    contours
}

/// Build 3D contour vertices from `(x, y, z)` triples.
pub fn contour3(points: &[[f32; 3]]) -> Vec<ContourVertex> {
    points
        .iter()
        .map(|p| ContourVertex::new(p[0], p[1], p[2]))
        .collect()
}

/// Build contour vertices in the z = 0 plane from `(x, y)` pairs.
pub fn contour2(points: &[[f32; 2]]) -> Vec<ContourVertex> {
    points
        .iter()
        .map(|p| ContourVertex::new(p[0], p[1], 0.0))
        .collect()
}

/// Signed area of a triangle (2D, counter-clockwise positive).
pub fn triangle_area(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> f32 {
    0.5 * ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1]))
}

/// Triangles of a `Polygons` / poly_size 3 result, as positions.
pub fn triangles<T: Clone>(tess: &Tessellator<T>) -> Vec<[[f32; 3]; 3]> {
    let verts = tess.vertices();
    tess.elements()
        .chunks_exact(3)
        .map(|tri| {
            [
                verts[tri[0] as usize].position,
                verts[tri[1] as usize].position,
                verts[tri[2] as usize].position,
            ]
        })
        .collect()
}

/// Sum of the unsigned areas of the output triangles.
pub fn total_tessellation_area<T: Clone>(tess: &Tessellator<T>) -> f32 {
    triangles(tess)
        .iter()
        .map(|t| triangle_area(t[0], t[1], t[2]).abs())
        .sum()
}

/// Sum of the signed areas of the output triangles.
pub fn total_tessellation_signed_area<T: Clone>(tess: &Tessellator<T>) -> f32 {
    triangles(tess)
        .iter()
        .map(|t| triangle_area(t[0], t[1], t[2]))
        .sum()
}

/// Check indices are in range, positions finite and the bookkeeping arrays
/// agree with each other.
pub fn verify_valid_output<T: Clone>(tess: &Tessellator<T>) {
    let vert_count = tess.vertex_count();
    assert_eq!(tess.vertices().len(), vert_count);
    assert_eq!(tess.vertex_indices().len(), vert_count);

    for (i, v) in tess.vertices().iter().enumerate() {
        assert!(
            v.position.iter().all(|c| c.is_finite()),
            "vertex {} = {:?} is not finite",
            i,
            v.position
        );
    }

    let stride = match tess.element_type() {
        ElementType::Polygons => tess.poly_size(),
        ElementType::ConnectedPolygons => tess.poly_size() * 2,
        ElementType::BoundaryContours => 2,
    };
    assert_eq!(tess.elements().len(), tess.element_count() * stride);

    if tess.element_type() == ElementType::BoundaryContours {
        for pair in tess.elements().chunks_exact(2) {
            assert!((pair[0] + pair[1]) as usize <= vert_count);
        }
        return;
    }
    for (i, &idx) in tess.elements().iter().enumerate() {
        if idx == TESS_UNDEF {
            continue;
        }
        let in_neighbours = tess.element_type() == ElementType::ConnectedPolygons
            && (i % stride) >= tess.poly_size();
        let limit = if in_neighbours {
            tess.element_count()
        } else {
            vert_count
        };
        assert!(
            (idx as usize) < limit,
            "element[{}] = {} out of range (limit={})",
            i,
            idx,
            limit
        );
    }
}

/// Check that no output triangle has an area at or below `epsilon`.
pub fn verify_no_degenerate_triangles<T: Clone>(tess: &Tessellator<T>, epsilon: f32) {
    for (i, t) in triangles(tess).iter().enumerate() {
        let area = triangle_area(t[0], t[1], t[2]).abs();
        assert!(
            area > epsilon,
            "triangle {} is degenerate (area={}, vertices={:?})",
            i,
            area,
            t
        );
    }
}

/// Add flat 2D contours and tessellate into triangles.
pub fn tessellate_contours(contours: &[Vec<f32>], winding_rule: WindingRule) -> Tessellator {
    let mut tess = Tessellator::new();
    for contour in contours {
        tess.add_contour_flat(2, contour, ContourOrientation::Original)
            .expect("valid contour");
    }
    tess.tessellate(winding_rule, ElementType::Polygons, 3)
        .unwrap_or_else(|e| panic!("tessellation failed for {:?}: {}", winding_rule, e));
    tess
}

/// Signed area of a simple polygon given as flat `[x0, y0, x1, y1, ...]`.
pub fn polygon_signed_area(verts: &[f32]) -> f32 {
    let n = verts.len() / 2;
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0f32;
    for i in 0..n {
        let j = (i + 1) % n;
        area += verts[i * 2] * verts[j * 2 + 1];
        area -= verts[j * 2] * verts[i * 2 + 1];
    }
    area * 0.5
}

/// Polygons of a `Polygons` or `ConnectedPolygons` result, as positions,
/// with the `TESS_UNDEF` padding dropped.
pub fn polygons<T: Clone>(tess: &Tessellator<T>) -> Vec<Vec<[f32; 3]>> {
    let n = tess.poly_size();
    let stride = match tess.element_type() {
        ElementType::ConnectedPolygons => n * 2,
        _ => n,
    };
    tess.elements()
        .chunks_exact(stride)
        .map(|poly| {
            poly[..n]
                .iter()
                .take_while(|&&i| i != TESS_UNDEF)
                .map(|&i| tess.vertices()[i as usize].position)
                .collect()
        })
        .collect()
}

/// Signed area of a polygon given as positions, using x and y.
pub fn positions_signed_area(poly: &[[f32; 3]]) -> f32 {
    let flat: Vec<f32> = poly.iter().flat_map(|p| [p[0], p[1]]).collect();
    polygon_signed_area(&flat)
}
