// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Event processing: what happens when the sweep line reaches a vertex.

use tracing::trace;

use super::{edge_leq, RegionId, Sweep};
use crate::error::TessError;
use crate::geom::{edge_sign, vert_eq, vert_leq};
use crate::mesh::{EdgeId, VertId};

impl Sweep<'_> {
    /// Process one vertex. Regions whose edges end here are closed first,
    /// then regions are opened for every edge leaving to the right.
    pub(super) fn sweep_event(&mut self, v_event: VertId) -> Result<(), TessError> {
        self.event = v_event;
        trace!(?v_event, "sweep event");

        // Is this the right endpoint of an edge already in the dictionary?
        let start = self.mesh.vert(v_event).an_edge;
        let mut e = start;
        let reg = loop {
            if let Some(r) = self.mesh.edge(e).active_region {
                break r;
            }
            e = self.mesh.onext(e);
            if e == start {
                // Every edge goes right: nothing processed touches this vertex.
                return self.connect_left_vertex(v_event);
            }
        };

        let reg_up = self.top_left_region(reg)?;
        let reg = self.below(reg_up)?;
        let e_top_left = self.e_up(reg);
        let e_bottom_left = self.finish_left_regions(reg, None)?;

        if self.mesh.onext(e_bottom_left) == e_top_left {
            // No right-going edges: add a temporary one.
            self.connect_right_vertex(reg_up, e_bottom_left)
        } else {
            let first = self.mesh.onext(e_bottom_left);
            self.add_right_edges(reg_up, first, e_top_left, Some(e_top_left), true)
        }
    }

    /// The event has left-going edges only. To keep every face monotone it is
    /// connected to the closer right endpoint of the edges above and below,
    /// with a temporary edge that later events may replace.
    fn connect_right_vertex(
        &mut self,
        reg_up: RegionId,
        e_bottom_left: EdgeId,
    ) -> Result<(), TessError> {
        let mut reg_up = reg_up;
        let mut e_bottom_left = e_bottom_left;
        let mut e_top_left = self.mesh.onext(e_bottom_left);
        let reg_lo = self.below(reg_up)?;
        let e_up = self.e_up(reg_up);
        let e_lo = self.e_up(reg_lo);
        let mut degenerate = false;

        if self.mesh.dst(e_up) != self.mesh.dst(e_lo) {
            self.check_for_intersect(reg_up)?;
        }

        // The edges above or below may now pass through the event.
        let event = self.mesh.point(self.event);
        if vert_eq(self.mesh.point(self.mesh.org(e_up)), event) {
            let oprev = self.mesh.oprev(e_top_left);
            self.mesh.splice(oprev, e_up);
            reg_up = self.top_left_region(reg_up)?;
            let below = self.below(reg_up)?;
            e_top_left = self.e_up(below);
            self.finish_left_regions(below, Some(reg_lo))?;
            degenerate = true;
        }
        if vert_eq(self.mesh.point(self.mesh.org(e_lo)), event) {
            let oprev = self.mesh.oprev(e_lo);
            self.mesh.splice(e_bottom_left, oprev);
            e_bottom_left = self.finish_left_regions(reg_lo, None)?;
            degenerate = true;
        }
        if degenerate {
            let first = self.mesh.onext(e_bottom_left);
            return self.add_right_edges(reg_up, first, e_top_left, Some(e_top_left), true);
        }

        let target = if vert_leq(
            self.mesh.point(self.mesh.org(e_lo)),
            self.mesh.point(self.mesh.org(e_up)),
        ) {
            self.mesh.oprev(e_lo)
        } else {
            e_up
        };
        let lprev = self.mesh.lprev(e_bottom_left);
        let e_new = self.mesh.connect(lprev, target);

        // No cleanup yet: e_new must be marked temporary before the walk.
        let onext = self.mesh.onext(e_new);
        self.add_right_edges(reg_up, e_new, onext, Some(onext), false)?;
        let reg_new = self
            .mesh
            .edge(e_new.sym())
            .active_region
            .ok_or(TessError::Sweep("temporary edge region"))?;
        self.reg_mut(reg_new).fix_upper_edge = true;
        self.walk_dirty_regions(reg_up)
    }

    /// The event lies on the upper edge of `reg_up`, or on one of its
    /// endpoints.
    fn connect_left_degenerate(
        &mut self,
        reg_up: RegionId,
        v_event: VertId,
    ) -> Result<(), TessError> {
        let e = self.e_up(reg_up);
        let ev = self.mesh.point(v_event);

        if vert_eq(self.mesh.point(self.mesh.org(e)), ev) {
            // An unprocessed vertex at the same place: merge and wait for it
            // to come off the queue.
            trace!(?v_event, "merging event into unprocessed vertex");
            let an_edge = self.mesh.vert(v_event).an_edge;
            self.mesh.splice(e, an_edge);
            return Ok(());
        }

        if !vert_eq(self.mesh.point(self.mesh.dst(e)), ev) {
            // The event lies in the interior of e: split e there.
            self.mesh.split_edge(e.sym());
            if self.reg(reg_up).fix_upper_edge {
                // The rest of a temporary edge is no longer needed.
                let onext = self.mesh.onext(e);
                self.mesh.delete_edge(onext);
                self.reg_mut(reg_up).fix_upper_edge = false;
            }
            let an_edge = self.mesh.vert(v_event).an_edge;
            self.mesh.splice(an_edge, e);
            return self.sweep_event(v_event);
        }

        // The event coincides with e.dst, which was already processed:
        // splice in the extra right-going edges.
        let reg_up = self.top_right_region(reg_up)?;
        let reg = self.below(reg_up)?;
        let mut e_top_right = self.e_up(reg).sym();
        let e_last = self.mesh.onext(e_top_right);
        let mut e_top_left = Some(e_last);
        if self.reg(reg).fix_upper_edge {
            // e.dst has only a temporary right-going edge; drop it now that
            // real ones exist.
            debug_assert!(e_last != e_top_right);
            self.delete_region(reg);
            self.mesh.delete_edge(e_top_right);
            e_top_right = self.mesh.oprev(e_last);
        }
        let an_edge = self.mesh.vert(v_event).an_edge;
        self.mesh.splice(an_edge, e_top_right);
        if !self.mesh.edge_goes_left(e_last) {
            // No left-going edges at e.dst.
            e_top_left = None;
        }
        let first = self.mesh.onext(e_top_right);
        self.add_right_edges(reg_up, first, e_last, e_top_left, true)
    }

    /// The event has no left-going edges: locate the region containing it
    /// and link it to the processed part of the mesh when that region is
    /// inside the polygon.
    fn connect_left_vertex(&mut self, v_event: VertId) -> Result<(), TessError> {
        let e_tmp = self.mesh.vert(v_event).an_edge.sym();
        let node = {
            let mesh = &*self.mesh;
            let regions = &*self.regions;
            let event = self.event;
            self.dict
                .search(|r| edge_leq(mesh, event, e_tmp, regions[r.0].e_up))
        };
        let reg_up = self.dict.key(node).ok_or(TessError::Sweep("region above"))?;
        let Some(reg_lo) = self.below_opt(reg_up) else {
            // Happens only when every input point is coplanar with the
            // sweep direction.
            return Ok(());
        };
        let e_up = self.e_up(reg_up);
        let e_lo = self.e_up(reg_lo);
        let ev = self.mesh.point(v_event);

        // Try merging with the edge above first.
        if edge_sign(
            self.mesh.point(self.mesh.dst(e_up)),
            ev,
            self.mesh.point(self.mesh.org(e_up)),
        ) == 0.0
        {
            return self.connect_left_degenerate(reg_up, v_event);
        }

        // Connect to the rightmost processed vertex of either chain.
        let reg = if vert_leq(
            self.mesh.point(self.mesh.dst(e_lo)),
            self.mesh.point(self.mesh.dst(e_up)),
        ) {
            reg_up
        } else {
            reg_lo
        };

        if self.reg(reg_up).inside || self.reg(reg).fix_upper_edge {
            let an_edge = self.mesh.vert(v_event).an_edge;
            let e_new = if reg == reg_up {
                let lnext = self.mesh.lnext(e_up);
                self.mesh.connect(an_edge.sym(), lnext)
            } else {
                let dnext = self.mesh.dnext(e_lo);
                self.mesh.connect(dnext, an_edge).sym()
            };
            if self.reg(reg).fix_upper_edge {
                self.fix_upper_edge(reg, e_new);
            } else {
                let r = self.add_region_below(reg_up, e_new);
                self.compute_winding(r)?;
            }
            self.sweep_event(v_event)
        } else {
            // Outside the polygon: no need to link it to the rest of the mesh.
            let an_edge = self.mesh.vert(v_event).an_edge;
            self.add_right_edges(reg_up, an_edge, an_edge, None, true)
        }
    }

    /// Restore the dictionary invariants for every dirty region, from the
    /// lowest dirty one upward: ordering at shared endpoints, intersections
    /// and two-edge loops.
    pub(super) fn walk_dirty_regions(&mut self, reg_up: RegionId) -> Result<(), TessError> {
        let mut reg_up = reg_up;
        let mut reg_lo = self.below(reg_up)?;

        loop {
            while self.reg(reg_lo).dirty {
                reg_up = reg_lo;
                reg_lo = self.below(reg_lo)?;
            }
            if !self.reg(reg_up).dirty {
                reg_lo = reg_up;
                match self.above_opt(reg_up) {
                    Some(r) if self.reg(r).dirty => reg_up = r,
                    _ => return Ok(()),
                }
            }
            self.reg_mut(reg_up).dirty = false;
            let mut e_up = self.e_up(reg_up);
            let mut e_lo = self.e_up(reg_lo);

            if self.mesh.dst(e_up) != self.mesh.dst(e_lo) && self.check_for_left_splice(reg_up)? {
                // A temporary edge is no longer needed once the vertex it
                // served has a real right-going edge.
                if self.reg(reg_lo).fix_upper_edge {
                    self.delete_region(reg_lo);
                    self.mesh.delete_edge(e_lo);
                    reg_lo = self.below(reg_up)?;
                    e_lo = self.e_up(reg_lo);
                } else if self.reg(reg_up).fix_upper_edge {
                    self.delete_region(reg_up);
                    self.mesh.delete_edge(e_up);
                    reg_up = self.above(reg_lo)?;
                    e_up = self.e_up(reg_up);
                }
            }

            if self.mesh.org(e_up) != self.mesh.org(e_lo) {
                let event = self.event;
                if self.mesh.dst(e_up) != self.mesh.dst(e_lo)
                    && !self.reg(reg_up).fix_upper_edge
                    && !self.reg(reg_lo).fix_upper_edge
                    && (self.mesh.dst(e_up) == event || self.mesh.dst(e_lo) == event)
                {
                    // The event lies between the edges, so it can stand in
                    // for a badly computed intersection.
                    if self.check_for_intersect(reg_up)? {
                        // Already walked recursively.
                        return Ok(());
                    }
                } else {
                    self.check_for_right_splice(reg_up)?;
                }
            }

            if self.mesh.org(e_up) == self.mesh.org(e_lo) && self.mesh.dst(e_up) == self.mesh.dst(e_lo)
            {
                // Two edges forming a degenerate loop.
                trace!("removing two-edge loop");
                super::add_winding(self.mesh, e_lo, e_up);
                self.delete_region(reg_up);
                self.mesh.delete_edge(e_up);
                reg_up = self.above(reg_lo)?;
            }
        }
    }
}
