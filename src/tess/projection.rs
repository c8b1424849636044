// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Projection of the input vertices onto the sweep plane.

use crate::geom::{cross, dot, long_axis, sub, Real, Vec3};
use crate::mesh::{Mesh, VertId};

/// Result of projecting a mesh: the plane used and the bounds of the
/// projected vertices.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(super) struct Plane {
    pub normal: Vec3,
    pub s_unit: Vec3,
    pub t_unit: Vec3,
    pub bmin: [Real; 2],
    pub bmax: [Real; 2],
}

/// Set `s`/`t` on every vertex. A zero `normal` is replaced by one computed
/// from the vertices, oriented so the contours have non-negative total area.
pub(super) fn project(mesh: &mut Mesh, normal: Vec3, s_unit_x: Real, s_unit_y: Real) -> Plane {
    let computed = normal == [0.0; 3];
    let norm = if computed { compute_normal(mesh) } else { normal };

    let i = long_axis(norm);
    let mut s_unit = [0.0; 3];
    let mut t_unit = [0.0; 3];
    s_unit[(i + 1) % 3] = s_unit_x;
    s_unit[(i + 2) % 3] = s_unit_y;
    if norm[i] > 0.0 {
        t_unit[(i + 1) % 3] = -s_unit_y;
        t_unit[(i + 2) % 3] = s_unit_x;
    } else {
        t_unit[(i + 1) % 3] = s_unit_y;
        t_unit[(i + 2) % 3] = -s_unit_x;
    }

    let vertices: Vec<VertId> = mesh.vertices().collect();
    for &v in &vertices {
        let vert = mesh.vert_mut(v);
        vert.s = dot(vert.coords, s_unit);
        vert.t = dot(vert.coords, t_unit);
    }
    if computed && total_area(mesh) < 0.0 {
        // Reverse the orientation by flipping t.
        for &v in &vertices {
            let vert = mesh.vert_mut(v);
            vert.t = -vert.t;
        }
        t_unit = t_unit.map(|c| -c);
    }

    let mut bmin = [0.0; 2];
    let mut bmax = [0.0; 2];
    for (k, &v) in vertices.iter().enumerate() {
        let p = mesh.point(v);
        if k == 0 {
            bmin = [p.s, p.t];
            bmax = [p.s, p.t];
            continue;
        }
        if p.s < bmin[0] {
            bmin[0] = p.s;
        } else if p.s > bmax[0] {
            bmax[0] = p.s;
        }
        if p.t < bmin[1] {
            bmin[1] = p.t;
        } else if p.t > bmax[1] {
            bmax[1] = p.t;
        }
    }

    Plane {
        normal: norm,
        s_unit,
        t_unit,
        bmin,
        bmax,
    }
}

/// Normal of the triangle with the largest area among the vertex pair that
/// spans the widest axis and any third vertex.
pub(super) fn compute_normal(mesh: &Mesh) -> Vec3 {
    let mut verts = mesh.vertices();
    let Some(first) = verts.next() else {
        return [0.0, 0.0, 1.0];
    };
    let c = mesh.vert(first).coords;
    let mut min_val = c;
    let mut max_val = c;
    let mut min_vert = [first; 3];
    let mut max_vert = [first; 3];
    for v in verts {
        let c = mesh.vert(v).coords;
        for i in 0..3 {
            if c[i] < min_val[i] {
                min_val[i] = c[i];
                min_vert[i] = v;
            }
            if c[i] > max_val[i] {
                max_val[i] = c[i];
                max_vert[i] = v;
            }
        }
    }

    // Two vertices at least 1/sqrt(3) of the diameter apart.
    let mut i = 0;
    if max_val[1] - min_val[1] > max_val[0] - min_val[0] {
        i = 1;
    }
    if max_val[2] - min_val[2] > max_val[i] - min_val[i] {
        i = 2;
    }
    if min_val[i] >= max_val[i] {
        // Every vertex is the same point.
        return [0.0, 0.0, 1.0];
    }

    let v2 = mesh.vert(max_vert[i]).coords;
    let d1 = sub(mesh.vert(min_vert[i]).coords, v2);
    let mut norm = [0.0; 3];
    let mut max_len2 = 0.0;
    for v in mesh.vertices() {
        let d2 = sub(mesh.vert(v).coords, v2);
        let n = cross(d1, d2);
        let len2 = dot(n, n);
        if len2 > max_len2 {
            max_len2 = len2;
            norm = n;
        }
    }

    if max_len2 <= 0.0 {
        // All points on one line: any normal will do.
        norm = [0.0; 3];
        norm[long_axis(d1)] = 1.0;
    }
    norm
}

/// Sum of the projected areas of the contours, each counted from an edge
/// with positive winding.
fn total_area(mesh: &Mesh) -> Real {
    mesh.faces()
        .filter(|&f| mesh.winding(mesh.face(f).an_edge) > 0)
        .map(|f| mesh.face_area(f))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contour(mesh: &mut Mesh, points: &[Vec3]) {
        let mut e = None;
        for &p in points {
            let edge = match e {
                None => {
                    let edge = mesh.make_edge();
                    mesh.splice(edge, edge.sym());
                    edge
                }
                Some(prev) => {
                    mesh.split_edge(prev);
                    mesh.lnext(prev)
                }
            };
            let org = mesh.org(edge);
            mesh.vert_mut(org).coords = p;
            mesh.edge_mut(edge).winding = 1;
            mesh.edge_mut(edge.sym()).winding = -1;
            e = Some(edge);
        }
    }

    #[test]
    fn normal_of_xy_square_is_z() {
        let mut mesh = Mesh::new();
        contour(
            &mut mesh,
            &[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [2.0, 2.0, 0.0], [0.0, 2.0, 0.0]],
        );
        let n = compute_normal(&mesh);
        assert_eq!(n[0], 0.0);
        assert_eq!(n[1], 0.0);
        assert!(n[2] != 0.0);
    }

    #[test]
    fn coincident_points_default_to_z() {
        let mut mesh = Mesh::new();
        contour(&mut mesh, &[[1.0, 1.0, 1.0]; 3]);
        assert_eq!(compute_normal(&mesh), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn collinear_points_use_long_axis() {
        let mut mesh = Mesh::new();
        contour(&mut mesh, &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [3.0, 0.0, 0.0]]);
        assert_eq!(compute_normal(&mesh), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn projection_orients_contours_positively() {
        for points in [
            [[0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [4.0, 3.0, 0.0], [0.0, 3.0, 0.0]],
            [[0.0, 0.0, 0.0], [0.0, 3.0, 0.0], [4.0, 3.0, 0.0], [4.0, 0.0, 0.0]],
        ] {
            let mut mesh = Mesh::new();
            contour(&mut mesh, &points);
            let plane = project(&mut mesh, [0.0; 3], 1.0, 0.0);
            assert!(total_area(&mesh) > 0.0);
            assert_eq!(plane.bmax[0] - plane.bmin[0], 4.0);
            assert_eq!(plane.bmax[1] - plane.bmin[1], 3.0);
        }
    }

    #[test]
    fn explicit_normal_skips_orientation_fix() {
        let mut mesh = Mesh::new();
        contour(
            &mut mesh,
            &[[0.0, 0.0, 0.0], [0.0, 3.0, 0.0], [4.0, 3.0, 0.0], [4.0, 0.0, 0.0]],
        );
        let plane = project(&mut mesh, [0.0, 0.0, 1.0], 1.0, 0.0);
        assert_eq!(plane.s_unit, [1.0, 0.0, 0.0]);
        assert_eq!(plane.t_unit, [0.0, 1.0, 0.0]);
        // Clockwise input stays clockwise.
        assert!(total_area(&mesh) < 0.0);
    }

    #[test]
    fn projection_follows_dominant_axis() {
        let mut mesh = Mesh::new();
        contour(
            &mut mesh,
            &[[0.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 2.0, 5.0], [0.0, 0.0, 5.0]],
        );
        let plane = project(&mut mesh, [0.0; 3], 1.0, 0.0);
        assert_eq!(long_axis(plane.normal), 0);
        assert_eq!(plane.s_unit, [0.0, 1.0, 0.0]);
        assert_eq!(plane.bmax[0] - plane.bmin[0], 2.0);
    }
}
