// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Keeping neighbouring active edges consistent: splices where the
// dictionary order disagrees with the geometry at an endpoint, and new
// vertices where two edges cross.

use tracing::trace;

use super::{RegionId, Sweep};
use crate::error::TessError;
use crate::geom::{edge_intersect, edge_sign, vert_eq, vert_l1_dist, vert_leq, Real, SweepPoint, Vec3};
use crate::mesh::{VertId, UNDEF};

impl Sweep<'_> {
    /// Check the upper edge of `reg_up` against the one below at their right
    /// endpoints (origins). When the origin of one lies on the wrong side of
    /// the other it is spliced into it. Returns whether the mesh changed.
    pub(super) fn check_for_right_splice(&mut self, reg_up: RegionId) -> Result<bool, TessError> {
        let reg_lo = self.below(reg_up)?;
        let e_up = self.e_up(reg_up);
        let e_lo = self.e_up(reg_lo);
        let org_up = self.mesh.point(self.mesh.org(e_up));
        let org_lo = self.mesh.point(self.mesh.org(e_lo));

        if vert_leq(org_up, org_lo) {
            if edge_sign(self.mesh.point(self.mesh.dst(e_lo)), org_up, org_lo) > 0.0 {
                return Ok(false);
            }
            // e_up.org is below e_lo.
            if !vert_eq(org_up, org_lo) {
                self.mesh.split_edge(e_lo.sym());
                let oprev = self.mesh.oprev(e_lo);
                self.mesh.splice(e_up, oprev);
                self.reg_mut(reg_up).dirty = true;
                self.reg_mut(reg_lo).dirty = true;
            } else if self.mesh.org(e_up) != self.mesh.org(e_lo) {
                // Same position: merge, dropping e_up.org from the queue.
                let org = self.mesh.org(e_up);
                self.pq_remove(org);
                let oprev = self.mesh.oprev(e_lo);
                self.mesh.splice(oprev, e_up);
            }
        } else {
            if edge_sign(self.mesh.point(self.mesh.dst(e_up)), org_lo, org_up) < 0.0 {
                return Ok(false);
            }
            // e_lo.org is above e_up.
            let above = self.above(reg_up)?;
            self.reg_mut(above).dirty = true;
            self.reg_mut(reg_up).dirty = true;
            self.mesh.split_edge(e_up.sym());
            let oprev = self.mesh.oprev(e_lo);
            self.mesh.splice(oprev, e_up);
        }
        Ok(true)
    }

    /// As `check_for_right_splice`, at the left endpoints (destinations),
    /// which must differ.
    pub(super) fn check_for_left_splice(&mut self, reg_up: RegionId) -> Result<bool, TessError> {
        let reg_lo = self.below(reg_up)?;
        let e_up = self.e_up(reg_up);
        let e_lo = self.e_up(reg_lo);
        let dst_up = self.mesh.point(self.mesh.dst(e_up));
        let dst_lo = self.mesh.point(self.mesh.dst(e_lo));
        debug_assert!(!vert_eq(dst_up, dst_lo));

        let inside = self.reg(reg_up).inside;
        if vert_leq(dst_up, dst_lo) {
            if edge_sign(dst_up, dst_lo, self.mesh.point(self.mesh.org(e_up))) < 0.0 {
                return Ok(false);
            }
            // e_lo.dst is above e_up.
            let above = self.above(reg_up)?;
            self.reg_mut(above).dirty = true;
            self.reg_mut(reg_up).dirty = true;
            let e = self.mesh.split_edge(e_up);
            self.mesh.splice(e_lo.sym(), e);
            let f = self.mesh.lface(e);
            self.mesh.face_mut(f).inside = inside;
        } else {
            if edge_sign(dst_lo, dst_up, self.mesh.point(self.mesh.org(e_lo))) > 0.0 {
                return Ok(false);
            }
            // e_up.dst is below e_lo.
            self.reg_mut(reg_up).dirty = true;
            self.reg_mut(reg_lo).dirty = true;
            let e = self.mesh.split_edge(e_lo);
            let lnext = self.mesh.lnext(e_up);
            self.mesh.splice(lnext, e_lo.sym());
            let f = self.mesh.rface(e);
            self.mesh.face_mut(f).inside = inside;
        }
        Ok(true)
    }

    /// Check the upper edge of `reg_up` and the one below for a crossing and
    /// split both at a new vertex when they do. Returns true when the
    /// dirty regions were already walked by a nested call.
    pub(super) fn check_for_intersect(&mut self, reg_up: RegionId) -> Result<bool, TessError> {
        let mut reg_up = reg_up;
        let mut reg_lo = self.below(reg_up)?;
        let e_up = self.e_up(reg_up);
        let mut e_lo = self.e_up(reg_lo);
        let (org_up_v, org_lo_v) = (self.mesh.org(e_up), self.mesh.org(e_lo));
        let (dst_up_v, dst_lo_v) = (self.mesh.dst(e_up), self.mesh.dst(e_lo));
        let org_up = self.mesh.point(org_up_v);
        let org_lo = self.mesh.point(org_lo_v);
        let dst_up = self.mesh.point(dst_up_v);
        let dst_lo = self.mesh.point(dst_lo_v);
        let event_v = self.event;
        let event = self.mesh.point(event_v);

        debug_assert!(!vert_eq(dst_lo, dst_up));
        debug_assert!(org_up_v != event_v && org_lo_v != event_v);
        debug_assert!(!self.reg(reg_up).fix_upper_edge && !self.reg(reg_lo).fix_upper_edge);

        if org_up_v == org_lo_v {
            // Shared right endpoint.
            return Ok(false);
        }

        let t_min_up = org_up.t.min(dst_up.t);
        let t_max_lo = org_lo.t.max(dst_lo.t);
        if t_min_up > t_max_lo {
            return Ok(false);
        }

        if vert_leq(org_up, org_lo) {
            if edge_sign(dst_lo, org_up, org_lo) > 0.0 {
                return Ok(false);
            }
        } else if edge_sign(dst_up, org_lo, org_up) < 0.0 {
            return Ok(false);
        }

        // The edges intersect, at least marginally.
        let mut isect = edge_intersect(dst_up, org_up, dst_lo, org_lo);
        if vert_leq(isect, event) {
            // Rounding put the crossing left of the sweep line.
            isect = event;
        }
        let org_min = if vert_leq(org_up, org_lo) { org_up } else { org_lo };
        if vert_leq(org_min, isect) {
            isect = org_min;
        }

        if vert_eq(isect, org_up) || vert_eq(isect, org_lo) {
            // Crossing at a right endpoint.
            self.check_for_right_splice(reg_up)?;
            return Ok(false);
        }

        let up_wrong_side = !vert_eq(dst_up, event) && edge_sign(dst_up, event, isect) >= 0.0;
        let lo_wrong_side = !vert_eq(dst_lo, event) && edge_sign(dst_lo, event, isect) <= 0.0;
        if up_wrong_side || lo_wrong_side {
            // A new edge would pass on the wrong side of the event, or through
            // it. Only rounding gets here.
            trace!(?isect, "intersection beyond the sweep event");
            if dst_lo_v == event_v {
                // Splice the event into e_up and process the new regions.
                self.mesh.split_edge(e_up.sym());
                self.mesh.splice(e_lo.sym(), e_up);
                reg_up = self.top_left_region(reg_up)?;
                let below = self.below(reg_up)?;
                let e = self.e_up(below);
                self.finish_left_regions(below, Some(reg_lo))?;
                let oprev = self.mesh.oprev(e);
                self.add_right_edges(reg_up, oprev, e, Some(e), true)?;
                return Ok(true);
            }
            if dst_up_v == event_v {
                // Splice the event into e_lo and process the new regions.
                self.mesh.split_edge(e_lo.sym());
                let lnext = self.mesh.lnext(e_up);
                let oprev = self.mesh.oprev(e_lo);
                self.mesh.splice(lnext, oprev);
                reg_lo = reg_up;
                reg_up = self.top_right_region(reg_up)?;
                let below = self.below(reg_up)?;
                let e = self.mesh.rprev(self.e_up(below));
                let new_lo = self.mesh.oprev(e_lo);
                let stale = self.e_up(reg_lo);
                if self.mesh.edge(stale).active_region == Some(reg_lo) {
                    self.mesh.edge_mut(stale).active_region = None;
                }
                self.reg_mut(reg_lo).e_up = new_lo;
                self.mesh.edge_mut(new_lo).active_region = Some(reg_lo);
                e_lo = self.finish_left_regions(reg_lo, None)?;
                let first = self.mesh.onext(e_lo);
                let last = self.mesh.rprev(e_up);
                self.add_right_edges(reg_up, first, last, Some(e), true)?;
                return Ok(true);
            }

            // Called from connect_right_vertex: split whichever edge passes on
            // the wrong side and leave the splice to the caller.
            if edge_sign(dst_up, event, isect) >= 0.0 {
                let above = self.above(reg_up)?;
                self.reg_mut(above).dirty = true;
                self.reg_mut(reg_up).dirty = true;
                self.mesh.split_edge(e_up.sym());
                let org = self.mesh.org(e_up);
                self.place_at_event(org);
            }
            if edge_sign(dst_lo, event, isect) <= 0.0 {
                self.reg_mut(reg_up).dirty = true;
                self.reg_mut(reg_lo).dirty = true;
                self.mesh.split_edge(e_lo.sym());
                let org = self.mesh.org(e_lo);
                self.place_at_event(org);
            }
            return Ok(false);
        }

        // General case: split both edges and join them at a new vertex. The
        // splice order keeps the work proportional to the smaller face.
        self.mesh.split_edge(e_up.sym());
        self.mesh.split_edge(e_lo.sym());
        let oprev = self.mesh.oprev(e_lo);
        self.mesh.splice(oprev, e_up);
        let v = self.mesh.org(e_up);
        {
            let vert = self.mesh.vert_mut(v);
            vert.s = isect.s;
            vert.t = isect.t;
        }
        self.pq_insert(v);
        trace!(?v, s = isect.s, t = isect.t, "intersection vertex");
        self.intersect_data(v, [org_up_v, dst_up_v, org_lo_v, dst_lo_v]);

        let above = self.above(reg_up)?;
        self.reg_mut(above).dirty = true;
        self.reg_mut(reg_up).dirty = true;
        self.reg_mut(reg_lo).dirty = true;
        Ok(false)
    }

    /// Move a vertex produced by splitting an edge onto the current event.
    fn place_at_event(&mut self, v: VertId) {
        let (s, t, coords) = {
            let event = self.mesh.vert(self.event);
            (event.s, event.t, event.coords)
        };
        let vert = self.mesh.vert_mut(v);
        vert.s = s;
        vert.t = t;
        vert.coords = coords;
    }

    /// Position and payload of an intersection vertex, interpolated from the
    /// endpoints of the two crossing edges `[org_up, dst_up, org_lo, dst_lo]`.
    fn intersect_data(&mut self, isect: VertId, sources: [VertId; 4]) {
        let at = self.mesh.point(isect);
        let mut coords: Vec3 = [0.0; 3];
        let mut weights: [Real; 4] = [0.0; 4];
        for k in [0, 2] {
            let (org, dst) = (sources[k], sources[k + 1]);
            let [w0, w1] = vertex_weights(at, self.mesh.point(org), self.mesh.point(dst));
            weights[k] = w0;
            weights[k + 1] = w1;
            let (a, b) = (self.mesh.vert(org).coords, self.mesh.vert(dst).coords);
            for i in 0..3 {
                coords[i] += w0 * a[i] + w1 * b[i];
            }
        }
        let data = sources.map(|v| self.mesh.vert(v).data);
        let combined = self.combiner.combine(coords, data, weights);

        let vert = self.mesh.vert_mut(isect);
        vert.coords = coords;
        vert.data = combined;
        vert.input_index = UNDEF;
    }
}

/// Weights of `org` and `dst` for a point on their edge, inversely
/// proportional to L1 distance and summing to one half.
fn vertex_weights(isect: SweepPoint, org: SweepPoint, dst: SweepPoint) -> [Real; 2] {
    let t1 = vert_l1_dist(org, isect);
    let t2 = vert_l1_dist(dst, isect);
    let sum = t1 + t2;
    if sum <= 0.0 {
        return [0.25, 0.25];
    }
    [0.5 * t2 / sum, 0.5 * t1 / sum]
}
