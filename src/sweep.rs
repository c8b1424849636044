// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Sweep-line pass over the projected mesh (libtess2 sweep.c).
//
// Vertices are visited in `vert_leq` order. The edges crossing the sweep
// line are kept in a dictionary of active regions, each region being the
// area just above one edge. When a vertex is processed the regions ending
// there are closed (their faces classified by the winding rule) and regions
// for the edges leaving it are opened. Edge crossings become new vertices,
// so every face of the result is monotone and tagged inside or outside.

mod events;
mod intersect;

use tracing::{debug, trace};

use crate::dict::{Dict, NodeId};
use crate::error::TessError;
use crate::geom::{edge_eval, edge_sign, vert_eq, vert_leq, Real, Vec3};
use crate::mesh::{EdgeId, Mesh, VertId};
use crate::pool::{Handle, Pool};
use crate::priorityq::PriorityQ;
use crate::tess::WindingRule;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct RegionId(Handle);

/// The area between two adjacent edges crossing the sweep line. Only the
/// upper edge is stored; the lower one is `e_up` of the region below.
#[derive(Clone, Debug, Default)]
pub struct ActiveRegion {
    /// Upper edge, directed right to left.
    pub e_up: EdgeId,
    pub node_up: NodeId,
    pub winding_number: i32,
    pub inside: bool,
    /// One of the two edges bracketing everything at t = +/-infinity.
    pub sentinel: bool,
    /// The upper or lower edge changed; intersections need re-checking.
    pub dirty: bool,
    /// `e_up` is a temporary edge added for a right vertex and will be
    /// replaced once a better one is known.
    pub fix_upper_edge: bool,
}

/// Produces the payload of a vertex synthesized where two edges cross.
pub trait Combiner {
    /// `data` holds the payloads of the crossing edges' endpoints (origin
    /// and destination of the upper edge, then of the lower edge), with
    /// matching `weights` that sum to one.
    fn combine(&mut self, position: Vec3, data: [Option<u32>; 4], weights: [Real; 4])
        -> Option<u32>;
}

/// Combiner for callers without payloads.
pub struct NoCombine;

impl Combiner for NoCombine {
    fn combine(&mut self, _: Vec3, _: [Option<u32>; 4], _: [Real; 4]) -> Option<u32> {
        None
    }
}

/// Storage reused by every pass of one tessellator.
#[derive(Default)]
pub struct SweepBuffers {
    dict: Dict<RegionId>,
    regions: Pool<ActiveRegion>,
    pq: PriorityQ<VertId>,
}

impl SweepBuffers {
    pub fn reset(&mut self) {
        self.dict.reset();
        self.regions.reset();
        self.pq.reset();
    }
}

/// Run the sweep: merge coincident vertices, split crossing edges and
/// classify every face of `mesh` with `rule`. `bmin`/`bmax` bound the
/// projected vertices.
pub fn compute_interior(
    mesh: &mut Mesh,
    buffers: &mut SweepBuffers,
    combiner: &mut dyn Combiner,
    rule: WindingRule,
    bmin: [Real; 2],
    bmax: [Real; 2],
) -> Result<(), TessError> {
    let mut sweep = Sweep {
        mesh,
        dict: &mut buffers.dict,
        regions: &mut buffers.regions,
        pq: &mut buffers.pq,
        combiner,
        rule,
        event: VertId::default(),
    };
    sweep.run(bmin, bmax)
}

/// `e1 <= e2` at the current event: is e1 below e2 where the sweep line
/// crosses them? Both edges run right to left.
fn edge_leq(mesh: &Mesh, event: VertId, e1: EdgeId, e2: EdgeId) -> bool {
    let ev = mesh.point(event);
    let (o1, d1) = (mesh.org(e1), mesh.dst(e1));
    let (o2, d2) = (mesh.org(e2), mesh.dst(e2));

    if d1 == event {
        if d2 == event {
            // Both edges end at the event: order them by slope.
            let (p1, p2) = (mesh.point(o1), mesh.point(o2));
            if vert_leq(p1, p2) {
                return edge_sign(mesh.point(d2), p1, p2) <= 0.0;
            }
            return edge_sign(mesh.point(d1), p2, p1) >= 0.0;
        }
        return edge_sign(mesh.point(d2), ev, mesh.point(o2)) <= 0.0;
    }
    if d2 == event {
        return edge_sign(mesh.point(d1), ev, mesh.point(o1)) >= 0.0;
    }

    let t1 = edge_eval(mesh.point(d1), ev, mesh.point(o1));
    let t2 = edge_eval(mesh.point(d2), ev, mesh.point(o2));
    t1 >= t2
}

fn vertex_leq(mesh: &Mesh, a: VertId, b: VertId) -> bool {
    vert_leq(mesh.point(a), mesh.point(b))
}

struct Sweep<'a> {
    mesh: &'a mut Mesh,
    dict: &'a mut Dict<RegionId>,
    regions: &'a mut Pool<ActiveRegion>,
    pq: &'a mut PriorityQ<VertId>,
    combiner: &'a mut dyn Combiner,
    rule: WindingRule,
    event: VertId,
}

impl Sweep<'_> {
    fn run(&mut self, bmin: [Real; 2], bmax: [Real; 2]) -> Result<(), TessError> {
        self.remove_degenerate_edges();
        self.init_priority_q();
        self.init_edge_dict(bmin, bmax);
        debug!(events = self.pq.len(), "sweep started");

        while let Some(v) = self.pq_extract_min() {
            loop {
                let Some(v_next) = self.pq_minimum() else {
                    break;
                };
                if !vert_eq(self.mesh.point(v_next), self.mesh.point(v)) {
                    break;
                }
                // Coincident events become one vertex.
                self.pq_extract_min();
                trace!(?v, ?v_next, "merging coincident vertices");
                let (a, b) = (self.mesh.vert(v).an_edge, self.mesh.vert(v_next).an_edge);
                self.mesh.splice(a, b);
            }
            self.sweep_event(v)?;
        }

        self.done_edge_dict();
        self.remove_degenerate_faces();
        debug!(faces = self.mesh.face_count(), "sweep finished");
        Ok(())
    }

    // ─── Region access ───

    #[inline]
    fn reg(&self, r: RegionId) -> &ActiveRegion {
        &self.regions[r.0]
    }

    #[inline]
    fn reg_mut(&mut self, r: RegionId) -> &mut ActiveRegion {
        &mut self.regions[r.0]
    }

    #[inline]
    fn e_up(&self, r: RegionId) -> EdgeId {
        self.regions[r.0].e_up
    }

    fn below_opt(&self, r: RegionId) -> Option<RegionId> {
        self.dict.key(self.dict.pred(self.reg(r).node_up))
    }

    fn above_opt(&self, r: RegionId) -> Option<RegionId> {
        self.dict.key(self.dict.succ(self.reg(r).node_up))
    }

    /// The region below `r`. The bottom sentinel guarantees one exists for
    /// every region the sweep walks down from.
    fn below(&self, r: RegionId) -> Result<RegionId, TessError> {
        self.below_opt(r).ok_or(TessError::Sweep("region below"))
    }

    fn above(&self, r: RegionId) -> Result<RegionId, TessError> {
        self.above_opt(r).ok_or(TessError::Sweep("region above"))
    }

    // ─── Event queue ───

    fn pq_extract_min(&mut self) -> Option<VertId> {
        let mesh = &*self.mesh;
        let v = self.pq.extract_min(|a, b| vertex_leq(mesh, a, b))?;
        self.mesh.vert_mut(v).pq_handle = None;
        Some(v)
    }

    fn pq_minimum(&self) -> Option<VertId> {
        let mesh = &*self.mesh;
        self.pq.minimum(|a, b| vertex_leq(mesh, a, b))
    }

    fn pq_insert(&mut self, v: VertId) {
        let mesh = &*self.mesh;
        let handle = self.pq.insert(v, |a, b| vertex_leq(mesh, a, b));
        self.mesh.vert_mut(v).pq_handle = Some(handle);
    }

    fn pq_remove(&mut self, v: VertId) {
        let Some(handle) = self.mesh.vert(v).pq_handle else {
            return;
        };
        let mesh = &*self.mesh;
        self.pq.remove(handle, |a, b| vertex_leq(mesh, a, b));
        self.mesh.vert_mut(v).pq_handle = None;
    }

    fn init_priority_q(&mut self) {
        self.pq.reset();
        let vertices: Vec<VertId> = self.mesh.vertices().collect();
        for v in vertices {
            self.pq_insert(v);
        }
        let mesh = &*self.mesh;
        self.pq.init(|a, b| vertex_leq(mesh, a, b));
    }

    // ─── Region bookkeeping ───

    /// Open a region for `e_new_up` directly below `reg_above`.
    fn add_region_below(&mut self, reg_above: RegionId, e_new_up: EdgeId) -> RegionId {
        let r = RegionId(self.regions.insert(ActiveRegion {
            e_up: e_new_up,
            ..ActiveRegion::default()
        }));
        let hint = self.reg(reg_above).node_up;
        let mesh = &*self.mesh;
        let regions = &*self.regions;
        let event = self.event;
        let node = self.dict.insert_before(hint, r, |a, b| {
            edge_leq(mesh, event, regions[a.0].e_up, regions[b.0].e_up)
        });
        self.reg_mut(r).node_up = node;
        self.mesh.edge_mut(e_new_up).active_region = Some(r);
        r
    }

    fn delete_region(&mut self, r: RegionId) {
        let (e_up, node, fix) = {
            let reg = self.reg(r);
            (reg.e_up, reg.node_up, reg.fix_upper_edge)
        };
        if fix {
            // A temporary edge is only dropped once nothing crosses it.
            debug_assert_eq!(self.mesh.winding(e_up), 0);
        }
        if self.mesh.edge(e_up).active_region == Some(r) {
            self.mesh.edge_mut(e_up).active_region = None;
        }
        self.dict.delete(node);
        self.regions.remove(r.0);
    }

    /// Replace the temporary upper edge of `reg` with `new_edge`.
    fn fix_upper_edge(&mut self, reg: RegionId, new_edge: EdgeId) {
        debug_assert!(self.reg(reg).fix_upper_edge);
        let old = self.e_up(reg);
        self.mesh.delete_edge(old);
        let r = self.reg_mut(reg);
        r.fix_upper_edge = false;
        r.e_up = new_edge;
        self.mesh.edge_mut(new_edge).active_region = Some(reg);
    }

    /// Highest region whose upper edge shares the origin of `reg`'s.
    fn top_left_region(&mut self, reg: RegionId) -> Result<RegionId, TessError> {
        let org = self.mesh.org(self.e_up(reg));
        let mut reg = reg;
        loop {
            reg = self.above(reg)?;
            if self.mesh.org(self.e_up(reg)) != org {
                break;
            }
        }

        // The region above may still have a temporary upper edge ending at
        // `org`; replace it with a real one now.
        if self.reg(reg).fix_upper_edge {
            let below = self.below(reg)?;
            let from = self.e_up(below).sym();
            let to = self.mesh.lnext(self.e_up(reg));
            let e = self.mesh.connect(from, to);
            trace!("replacing temporary upper edge");
            self.fix_upper_edge(reg, e);
            reg = self.above(reg)?;
        }
        Ok(reg)
    }

    /// Highest region whose upper edge shares the destination of `reg`'s.
    fn top_right_region(&self, reg: RegionId) -> Result<RegionId, TessError> {
        let dst = self.mesh.dst(self.e_up(reg));
        let mut reg = reg;
        loop {
            reg = self.above(reg)?;
            if self.mesh.dst(self.e_up(reg)) != dst {
                return Ok(reg);
            }
        }
    }

    fn compute_winding(&mut self, reg: RegionId) -> Result<(), TessError> {
        let above = self.above(reg)?;
        let n = self.reg(above).winding_number + self.mesh.winding(self.e_up(reg));
        let inside = self.rule.is_inside(n);
        let r = self.reg_mut(reg);
        r.winding_number = n;
        r.inside = inside;
        Ok(())
    }

    /// Close `reg`: its face is complete, so record the classification.
    fn finish_region(&mut self, reg: RegionId) {
        let e = self.e_up(reg);
        let f = self.mesh.lface(e);
        let inside = self.reg(reg).inside;
        let face = self.mesh.face_mut(f);
        face.inside = inside;
        face.an_edge = e;
        self.delete_region(reg);
    }

    /// Close the regions from `reg_first` down to (not including) `reg_last`,
    /// all of whose upper edges end at the event, linking the edges into the
    /// event's origin ring. With `reg_last == None` the walk continues while
    /// the edges share an origin. Returns the lowest edge processed.
    fn finish_left_regions(
        &mut self,
        reg_first: RegionId,
        reg_last: Option<RegionId>,
    ) -> Result<EdgeId, TessError> {
        let mut reg_prev = reg_first;
        let mut e_prev = self.e_up(reg_first);
        while Some(reg_prev) != reg_last {
            self.reg_mut(reg_prev).fix_upper_edge = false;
            let reg = self.below(reg_prev)?;
            let mut e = self.e_up(reg);
            if self.mesh.org(e) != self.mesh.org(e_prev) {
                if !self.reg(reg).fix_upper_edge {
                    // Not a left-going edge of the event.
                    self.finish_region(reg_prev);
                    break;
                }
                // The temporary upper edge of `reg` should really start here.
                let lprev = self.mesh.lprev(e_prev);
                e = self.mesh.connect(lprev, e.sym());
                self.fix_upper_edge(reg, e);
            }

            if self.mesh.onext(e_prev) != e {
                let oprev = self.mesh.oprev(e);
                self.mesh.splice(oprev, e);
                self.mesh.splice(e_prev, e);
            }
            self.finish_region(reg_prev);
            e_prev = self.e_up(reg);
            reg_prev = reg;
        }
        Ok(e_prev)
    }

    /// Open regions for the right-going edges from `e_first` up to (not
    /// including) `e_last`, all leaving the event, below `reg_up`. Windings
    /// are propagated downward and newly adjacent edges with the same
    /// origin checked for splices.
    fn add_right_edges(
        &mut self,
        reg_up: RegionId,
        e_first: EdgeId,
        e_last: EdgeId,
        e_top_left: Option<EdgeId>,
        clean_up: bool,
    ) -> Result<(), TessError> {
        let mut e = e_first;
        loop {
            debug_assert!(self.mesh.edge_goes_right(e));
            self.add_region_below(reg_up, e.sym());
            e = self.mesh.onext(e);
            if e == e_last {
                break;
            }
        }

        let e_top_left = match e_top_left {
            Some(e) => e,
            None => {
                let below = self.below(reg_up)?;
                self.mesh.rprev(self.e_up(below))
            }
        };

        let mut reg_prev = reg_up;
        let mut e_prev = e_top_left;
        let mut first_time = true;
        loop {
            let reg = self.below(reg_prev)?;
            let e = self.e_up(reg).sym();
            if self.mesh.org(e) != self.mesh.org(e_prev) {
                break;
            }

            if self.mesh.onext(e) != e_prev {
                // Put e into the origin ring just after e_prev.
                let oprev = self.mesh.oprev(e);
                self.mesh.splice(oprev, e);
                let prev_oprev = self.mesh.oprev(e_prev);
                self.mesh.splice(prev_oprev, e);
            }

            let n = self.reg(reg_prev).winding_number - self.mesh.winding(e);
            let inside = self.rule.is_inside(n);
            {
                let r = self.reg_mut(reg);
                r.winding_number = n;
                r.inside = inside;
            }

            // The region above gets a new lower edge: check for splices.
            self.reg_mut(reg_prev).dirty = true;
            if !first_time && self.check_for_right_splice(reg_prev)? {
                add_winding(self.mesh, e, e_prev);
                self.delete_region(reg_prev);
                self.mesh.delete_edge(e_prev);
            }
            first_time = false;
            reg_prev = reg;
            e_prev = e;
        }
        self.reg_mut(reg_prev).dirty = true;

        if clean_up {
            self.walk_dirty_regions(reg_prev)?;
        }
        Ok(())
    }

    // ─── Setup and teardown ───

    /// Remove zero-length edges and contours with fewer than three vertices.
    fn remove_degenerate_edges(&mut self) {
        let e_head = self.mesh.e_head();
        let mut e = self.mesh.edge(e_head).next;
        while e != e_head {
            let mut e_next = self.mesh.edge(e).next;
            let mut e_lnext = self.mesh.lnext(e);

            if vert_eq(self.mesh.point(self.mesh.org(e)), self.mesh.point(self.mesh.dst(e)))
                && self.mesh.lnext(e_lnext) != e
            {
                // Zero-length edge in a contour with at least three edges.
                self.mesh.splice(e_lnext, e);
                self.mesh.delete_edge(e);
                e = e_lnext;
                e_lnext = self.mesh.lnext(e);
            }
            if self.mesh.lnext(e_lnext) == e {
                // A contour of one or two edges.
                if e_lnext != e {
                    if e_lnext == e_next || e_lnext == e_next.sym() {
                        e_next = self.mesh.edge(e_next).next;
                    }
                    self.mesh.delete_edge(e_lnext);
                }
                if e == e_next || e == e_next.sym() {
                    e_next = self.mesh.edge(e_next).next;
                }
                self.mesh.delete_edge(e);
            }
            e = e_next;
        }
    }

    /// Two sentinel edges, above and below everything, keep every region's
    /// neighbours defined.
    fn init_edge_dict(&mut self, bmin: [Real; 2], bmax: [Real; 2]) {
        self.dict.reset();
        self.regions.reset();

        let w = (bmax[0] - bmin[0]) + 0.01;
        let h = (bmax[1] - bmin[1]) + 0.01;
        let smin = bmin[0] - w;
        let smax = bmax[0] + w;
        let tmin = bmin[1] - h;
        let tmax = bmax[1] + h;

        self.add_sentinel(smin, smax, tmin);
        self.add_sentinel(smin, smax, tmax);
    }

    fn add_sentinel(&mut self, smin: Real, smax: Real, t: Real) {
        let e = self.mesh.make_edge();
        let (org, dst) = (self.mesh.org(e), self.mesh.dst(e));
        {
            let v = self.mesh.vert_mut(org);
            v.s = smax;
            v.t = t;
        }
        {
            let v = self.mesh.vert_mut(dst);
            v.s = smin;
            v.t = t;
        }
        self.event = dst;

        let r = RegionId(self.regions.insert(ActiveRegion {
            e_up: e,
            sentinel: true,
            ..ActiveRegion::default()
        }));
        let mesh = &*self.mesh;
        let regions = &*self.regions;
        let event = self.event;
        let node = self.dict.insert(r, |a, b| {
            edge_leq(mesh, event, regions[a.0].e_up, regions[b.0].e_up)
        });
        self.reg_mut(r).node_up = node;
    }

    fn done_edge_dict(&mut self) {
        let mut fixed_edges = 0;
        while let Some(reg) = self.dict.key(self.dict.min()) {
            // At the end only the sentinels remain, plus possibly one
            // temporary edge left by the final right vertex.
            if !self.reg(reg).sentinel {
                debug_assert!(self.reg(reg).fix_upper_edge);
                fixed_edges += 1;
                debug_assert_eq!(fixed_edges, 1);
            }
            debug_assert_eq!(self.reg(reg).winding_number, 0);
            self.delete_region(reg);
        }
    }

    /// Delete faces with only two edges, folding their windings into the
    /// surviving edge.
    fn remove_degenerate_faces(&mut self) {
        let f_head = self.mesh.f_head();
        let mut f = self.mesh.face(f_head).next;
        while f != f_head {
            let f_next = self.mesh.face(f).next;
            let e = self.mesh.face(f).an_edge;
            debug_assert!(self.mesh.lnext(e) != e);
            if self.mesh.lnext(self.mesh.lnext(e)) == e {
                let onext = self.mesh.onext(e);
                add_winding(self.mesh, onext, e);
                self.mesh.delete_edge(e);
            }
            f = f_next;
        }
    }
}

/// Fold the windings of `src` into `dst` before `src` is deleted.
fn add_winding(mesh: &mut Mesh, dst: EdgeId, src: EdgeId) {
    let (w, w_sym) = (mesh.winding(src), mesh.winding(src.sym()));
    mesh.edge_mut(dst).winding += w;
    mesh.edge_mut(dst.sym()).winding += w_sym;
}
