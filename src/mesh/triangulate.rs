// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Face-level passes run after the sweep: monotone triangulation, convex
// merging, winding normalisation for boundary output and exterior removal.

use super::{FaceId, Mesh};
use crate::geom::{edge_sign, vert_ccw, vert_leq, Real};

impl Mesh {
    /// Triangulate a monotone face by adding diagonals.
    ///
    /// The loop is split into an upper and a lower chain running from the
    /// rightmost vertex to the leftmost. At each step the chain whose next
    /// vertex lies further left is advanced, fanning triangles back along
    /// the other chain while the new diagonal stays inside the face. What is
    /// left at the end is a fan from the leftmost vertex.
    pub fn tessellate_mono_region(&mut self, face: FaceId) {
        let mut up = self.face(face).an_edge;
        debug_assert!(self.lnext(up) != up && self.lnext(self.lnext(up)) != up);

        // Find the rightmost vertex, whose outgoing edge starts the upper chain.
        while vert_leq(self.point(self.dst(up)), self.point(self.org(up))) {
            up = self.lprev(up);
        }
        while vert_leq(self.point(self.org(up)), self.point(self.dst(up))) {
            up = self.lnext(up);
        }
        let mut lo = self.lprev(up);

        while self.lnext(up) != lo {
            if vert_leq(self.point(self.dst(up)), self.point(self.org(lo))) {
                // up.dst is further left: connect lo.org to the upper chain.
                while self.lnext(lo) != up {
                    let lo_next = self.lnext(lo);
                    let reflex = !self.edge_goes_left(lo_next)
                        && edge_sign(
                            self.point(self.org(lo)),
                            self.point(self.dst(lo)),
                            self.point(self.dst(lo_next)),
                        ) > 0.0;
                    if reflex {
                        break;
                    }
                    lo = self.connect(lo_next, lo).sym();
                }
                lo = self.lprev(lo);
            } else {
                // lo.org is further left: connect up.dst to the lower chain.
                while self.lnext(lo) != up {
                    let up_prev = self.lprev(up);
                    let reflex = !self.edge_goes_right(up_prev)
                        && edge_sign(
                            self.point(self.dst(up)),
                            self.point(self.org(up)),
                            self.point(self.org(up_prev)),
                        ) < 0.0;
                    if reflex {
                        break;
                    }
                    up = self.connect(up, up_prev).sym();
                }
                up = self.lnext(up);
            }
        }

        debug_assert!(self.lnext(lo) != up);
        while self.lnext(self.lnext(lo)) != up {
            let lo_next = self.lnext(lo);
            lo = self.connect(lo_next, lo).sym();
        }
    }

    /// Triangulate every face marked inside.
    pub fn tessellate_interior(&mut self) {
        let f_head = self.f_head;
        let mut f = self.face(f_head).next;
        while f != f_head {
            // Triangulation adds faces before f; remember the successor first.
            let next = self.face(f).next;
            if self.face(f).inside {
                self.tessellate_mono_region(f);
            }
            f = next;
        }
    }

    /// Zap every face not marked inside.
    pub fn discard_exterior(&mut self) {
        let f_head = self.f_head;
        let mut f = self.face(f_head).next;
        while f != f_head {
            let next = self.face(f).next;
            if !self.face(f).inside {
                self.zap_face(f);
            }
            f = next;
        }
    }

    /// Normalise windings so every edge separating an inside face from an
    /// outside one carries `value` (positive with the inside on its left).
    /// Other edges get winding zero, or are deleted when
    /// `keep_only_boundary` is set.
    pub fn set_winding_number(&mut self, value: i32, keep_only_boundary: bool) {
        let e_head = self.e_head;
        let mut e = self.edge(e_head).next;
        while e != e_head {
            let e_next = self.edge(e).next;
            let left_inside = self.face(self.lface(e)).inside;
            let right_inside = self.face(self.rface(e)).inside;
            if left_inside != right_inside {
                let winding = if left_inside { value } else { -value };
                self.edge_mut(e).winding = winding;
                self.edge_mut(e.sym()).winding = -winding;
            } else if !keep_only_boundary {
                self.edge_mut(e).winding = 0;
                self.edge_mut(e.sym()).winding = 0;
            } else {
                self.delete_edge(e);
            }
            e = e_next;
        }
    }

    /// Delete interior edges between inside faces while the merged face stays
    /// convex and has at most `max_verts` vertices.
    pub fn merge_convex_faces(&mut self, max_verts: usize) {
        let e_head = self.e_head;
        let mut e = self.edge(e_head).next;
        while e != e_head {
            let mut e_next = self.edge(e).next;
            let e_sym = e.sym();

            let lface = self.lface(e);
            let rface = self.rface(e);
            if !self.face(lface).inside || !self.face(rface).inside {
                e = e_next;
                continue;
            }

            let left_nv = self.count_face_verts(lface);
            let right_nv = self.count_face_verts(rface);
            if left_nv + right_nv - 2 > max_verts {
                e = e_next;
                continue;
            }

            let va = self.point(self.org(self.lprev(e)));
            let vb = self.point(self.org(e));
            let vc = self.point(self.dst(self.lnext(e_sym)));
            let vd = self.point(self.org(self.lprev(e_sym)));
            let ve = self.point(self.org(e_sym));
            let vf = self.point(self.dst(self.lnext(e)));

            if vert_ccw(va, vb, vc) && vert_ccw(vd, ve, vf) {
                if e == e_next || e == e_next.sym() {
                    e_next = self.edge(e_next).next;
                }
                self.delete_edge(e);
            }
            e = e_next;
        }
    }

    /// Twice the signed area of face `f` in the sweep plane; positive for
    /// counter-clockwise loops.
    pub fn face_area(&self, f: FaceId) -> Real {
        self.face_loop(self.face(f).an_edge)
            .map(|e| {
                let org = self.point(self.org(e));
                let dst = self.point(self.dst(e));
                (org.s - dst.s) * (org.t + dst.t)
            })
            .sum()
    }
}
