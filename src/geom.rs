// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Geometric predicates over projected (s, t) sweep coordinates, plus the few
// 3-vector helpers used by projection and output.
//
// Every ordering decision in the sweep routes through `vert_leq`. The
// evaluation functions keep the branch structure that makes them stable for
// nearly vertical edges, so small changes in operand order change results.

pub type Real = f32;
pub type Vec3 = [Real; 3];

/// Largest magnitude accepted for input coordinates.
pub const MAX_COORD: Real = (1u32 << 23) as Real;

/// Distance below which two projected vertices are merged. Vertices are
/// coalesced only on exact equality; see `vert_eq`.
pub const MERGE_TOLERANCE: Real = 0.0;

/// A position in the sweep plane.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SweepPoint {
    pub s: Real,
    pub t: Real,
}

impl SweepPoint {
    #[inline]
    pub const fn new(s: Real, t: Real) -> Self {
        SweepPoint { s, t }
    }
}

/// Sweep order: `s` first, then `t`.
#[inline]
pub fn vert_leq(u: SweepPoint, v: SweepPoint) -> bool {
    u.s < v.s || (u.s == v.s && u.t <= v.t)
}

#[inline]
pub fn vert_eq(u: SweepPoint, v: SweepPoint) -> bool {
    (u.s - v.s).abs() <= MERGE_TOLERANCE && (u.t - v.t).abs() <= MERGE_TOLERANCE
}

/// `vert_leq` with the axes transposed.
#[inline]
pub fn trans_leq(u: SweepPoint, v: SweepPoint) -> bool {
    u.t < v.t || (u.t == v.t && u.s <= v.s)
}

/// Given `u <= v <= w`, evaluates the t-coordinate of edge uw at `v.s` and
/// returns `v.t - uw(v.s)`: the signed distance from uw to v. Zero when uw is
/// vertical.
pub fn edge_eval(u: SweepPoint, v: SweepPoint, w: SweepPoint) -> Real {
    debug_assert!(vert_leq(u, v) && vert_leq(v, w));
    let gap_l = v.s - u.s;
    let gap_r = w.s - v.s;
    if gap_l + gap_r > 0.0 {
        if gap_l < gap_r {
            (v.t - u.t) + (u.t - w.t) * (gap_l / (gap_l + gap_r))
        } else {
            (v.t - w.t) + (w.t - u.t) * (gap_r / (gap_l + gap_r))
        }
    } else {
        0.0
    }
}

/// Same sign as `edge_eval(u, v, w)` without the division.
pub fn edge_sign(u: SweepPoint, v: SweepPoint, w: SweepPoint) -> Real {
    debug_assert!(vert_leq(u, v) && vert_leq(v, w));
    let gap_l = v.s - u.s;
    let gap_r = w.s - v.s;
    if gap_l + gap_r > 0.0 {
        (v.t - w.t) * gap_l + (v.t - u.t) * gap_r
    } else {
        0.0
    }
}

pub fn trans_eval(u: SweepPoint, v: SweepPoint, w: SweepPoint) -> Real {
    debug_assert!(trans_leq(u, v) && trans_leq(v, w));
    let gap_l = v.t - u.t;
    let gap_r = w.t - v.t;
    if gap_l + gap_r > 0.0 {
        if gap_l < gap_r {
            (v.s - u.s) + (u.s - w.s) * (gap_l / (gap_l + gap_r))
        } else {
            (v.s - w.s) + (w.s - u.s) * (gap_r / (gap_l + gap_r))
        }
    } else {
        0.0
    }
}

pub fn trans_sign(u: SweepPoint, v: SweepPoint, w: SweepPoint) -> Real {
    debug_assert!(trans_leq(u, v) && trans_leq(v, w));
    let gap_l = v.t - u.t;
    let gap_r = w.t - v.t;
    if gap_l + gap_r > 0.0 {
        (v.s - w.s) * gap_l + (v.s - u.s) * gap_r
    } else {
        0.0
    }
}

/// True when u, v, w turn counter-clockwise (or are collinear).
#[inline]
pub fn vert_ccw(u: SweepPoint, v: SweepPoint, w: SweepPoint) -> bool {
    u.s * (v.t - w.t) + v.s * (w.t - u.t) + w.s * (u.t - v.t) >= 0.0
}

#[inline]
pub fn vert_l1_dist(u: SweepPoint, v: SweepPoint) -> Real {
    (u.s - v.s).abs() + (u.t - v.t).abs()
}

/// Returns `(b*x + a*y) / (a + b)`, or the midpoint when both weights are
/// zero. Negative weights are clamped to zero, so the result always lies
/// between `x` and `y`.
#[inline]
pub fn interpolate(a: Real, x: Real, b: Real, y: Real) -> Real {
    let a = if a < 0.0 { 0.0 } else { a };
    let b = if b < 0.0 { 0.0 } else { b };
    if a <= b {
        if b == 0.0 {
            x / 2.0 + y / 2.0
        } else {
            x + (y - x) * (a / (a + b))
        }
    } else {
        y + (x - y) * (b / (a + b))
    }
}

/// Intersection of edges (o1, d1) and (o2, d2). The result lies inside the
/// bounding rectangle of both edges even when they do not cross exactly.
pub fn edge_intersect(
    o1: SweepPoint,
    d1: SweepPoint,
    o2: SweepPoint,
    d2: SweepPoint,
) -> SweepPoint {
    let (mut o1, mut d1, mut o2, mut d2) = (o1, d1, o2, d2);

    // s: sort both edges left to right, then the edges by their origins.
    if !vert_leq(o1, d1) {
        std::mem::swap(&mut o1, &mut d1);
    }
    if !vert_leq(o2, d2) {
        std::mem::swap(&mut o2, &mut d2);
    }
    if !vert_leq(o1, o2) {
        std::mem::swap(&mut o1, &mut o2);
        std::mem::swap(&mut d1, &mut d2);
    }
    let s = if !vert_leq(o2, d1) {
        // No overlap in s.
        o2.s / 2.0 + d1.s / 2.0
    } else if vert_leq(d1, d2) {
        let mut z1 = edge_eval(o1, o2, d1);
        let mut z2 = edge_eval(o2, d1, d2);
        if z1 + z2 < 0.0 {
            z1 = -z1;
            z2 = -z2;
        }
        interpolate(z1, o2.s, z2, d1.s)
    } else {
        // Edge 2 lies inside edge 1 in s.
        let mut z1 = edge_sign(o1, o2, d1);
        let mut z2 = -edge_sign(o1, d2, d1);
        if z1 + z2 < 0.0 {
            z1 = -z1;
            z2 = -z2;
        }
        interpolate(z1, o2.s, z2, d2.s)
    };

    // t: the same with the axes transposed, continuing from the sorted order.
    if !trans_leq(o1, d1) {
        std::mem::swap(&mut o1, &mut d1);
    }
    if !trans_leq(o2, d2) {
        std::mem::swap(&mut o2, &mut d2);
    }
    if !trans_leq(o1, o2) {
        std::mem::swap(&mut o1, &mut o2);
        std::mem::swap(&mut d1, &mut d2);
    }
    let t = if !trans_leq(o2, d1) {
        o2.t / 2.0 + d1.t / 2.0
    } else if trans_leq(d1, d2) {
        let mut z1 = trans_eval(o1, o2, d1);
        let mut z2 = trans_eval(o2, d1, d2);
        if z1 + z2 < 0.0 {
            z1 = -z1;
            z2 = -z2;
        }
        interpolate(z1, o2.t, z2, d1.t)
    } else {
        let mut z1 = trans_sign(o1, o2, d1);
        let mut z2 = -trans_sign(o1, d2, d1);
        if z1 + z2 < 0.0 {
            z1 = -z1;
            z2 = -z2;
        }
        interpolate(z1, o2.t, z2, d2.t)
    };

    SweepPoint { s, t }
}

// ─── 3-vector helpers ───

#[inline]
pub fn dot(u: Vec3, v: Vec3) -> Real {
    u[0] * v[0] + u[1] * v[1] + u[2] * v[2]
}

#[inline]
pub fn sub(u: Vec3, v: Vec3) -> Vec3 {
    [u[0] - v[0], u[1] - v[1], u[2] - v[2]]
}

#[inline]
pub fn cross(u: Vec3, v: Vec3) -> Vec3 {
    [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ]
}

/// Index of the component with the largest magnitude; ties keep the lower axis.
pub fn long_axis(v: Vec3) -> usize {
    let mut i = 0;
    if v[1].abs() > v[0].abs() {
        i = 1;
    }
    if v[2].abs() > v[i].abs() {
        i = 2;
    }
    i
}

#[inline]
pub fn is_valid_coord(x: Real) -> bool {
    x.is_finite() && (-MAX_COORD..=MAX_COORD).contains(&x)
}
