// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Half-edge mesh with the libtess2 mesh.c topology operators.
//
// Edges live in pairs; an `EdgeId` names one half and `sym()` flips to the
// other. The three entity rings (vertices, faces, edge pairs) are circular
// lists anchored at head sentinels that never carry geometry. The face head
// also stands for "no face": a half-edge whose left face was zapped points
// at it. Likewise the vertex head stands for "no origin".

mod check;
mod nav;
mod triangulate;

use crate::geom::{Real, Vec3};
use crate::pool::{Handle, Pool};
use crate::priorityq::PqHandle;
use crate::sweep::RegionId;

/// Output index of an entity that takes no part in the result.
pub const UNDEF: u32 = u32::MAX;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct VertId(Handle);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FaceId(Handle);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct EdgeId {
    pair: Handle,
    side: u8,
}

impl EdgeId {
    /// The twin half-edge, running the other way.
    #[inline]
    pub fn sym(self) -> EdgeId {
        EdgeId {
            pair: self.pair,
            side: self.side ^ 1,
        }
    }

    /// The half that represents its pair in the edge ring.
    #[inline]
    fn canonical(self) -> EdgeId {
        EdgeId {
            pair: self.pair,
            side: 0,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Vertex {
    pub next: VertId,
    pub prev: VertId,
    /// An edge with this vertex as origin.
    pub an_edge: EdgeId,
    pub coords: Vec3,
    pub s: Real,
    pub t: Real,
    pub pq_handle: Option<PqHandle>,
    /// Output index, assigned during extraction.
    pub n: u32,
    /// Index into the tessellator's payload store.
    pub data: Option<u32>,
    /// Position among all contour vertices added, or `UNDEF` when the vertex
    /// was synthesized at an intersection.
    pub input_index: u32,
}

#[derive(Clone, Debug, Default)]
pub struct Face {
    pub next: FaceId,
    pub prev: FaceId,
    /// An edge with this face on its left.
    pub an_edge: EdgeId,
    pub n: u32,
    pub inside: bool,
}

#[derive(Clone, Debug, Default)]
pub struct HalfEdge {
    /// Edge ring link. On the canonical half it names the next pair, on the
    /// twin it names the previous pair's twin.
    pub next: EdgeId,
    pub onext: EdgeId,
    pub lnext: EdgeId,
    pub org: VertId,
    pub lface: FaceId,
    pub active_region: Option<RegionId>,
    /// Change in winding number when crossing from the right face to the left.
    pub winding: i32,
}

#[derive(Clone, Debug, Default)]
struct EdgePair {
    halves: [HalfEdge; 2],
}

pub struct Mesh {
    verts: Pool<Vertex>,
    faces: Pool<Face>,
    edges: Pool<EdgePair>,
    v_head: VertId,
    f_head: FaceId,
    e_head: EdgeId,
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

impl Mesh {
    pub fn new() -> Self {
        let mut mesh = Mesh {
            verts: Pool::new(),
            faces: Pool::new(),
            edges: Pool::new(),
            v_head: VertId::default(),
            f_head: FaceId::default(),
            e_head: EdgeId::default(),
        };
        mesh.init_heads();
        mesh
    }

    fn init_heads(&mut self) {
        let v_head = VertId(self.verts.insert(Vertex::default()));
        let f_head = FaceId(self.faces.insert(Face::default()));
        let e_head = EdgeId {
            pair: self.edges.insert(EdgePair::default()),
            side: 0,
        };
        self.v_head = v_head;
        self.f_head = f_head;
        self.e_head = e_head;

        let v = self.vert_mut(v_head);
        v.next = v_head;
        v.prev = v_head;
        v.an_edge = e_head;
        v.n = UNDEF;
        v.input_index = UNDEF;

        let f = self.face_mut(f_head);
        f.next = f_head;
        f.prev = f_head;
        f.an_edge = e_head;
        f.n = UNDEF;
        f.inside = false;

        for e in [e_head, e_head.sym()] {
            let he = self.edge_mut(e);
            he.next = e;
            he.onext = e;
            he.lnext = e;
            he.org = v_head;
            he.lface = f_head;
        }
    }

    /// Drop every vertex, face and edge, keeping the allocated storage.
    pub fn reset(&mut self) {
        self.verts.reset();
        self.faces.reset();
        self.edges.reset();
        self.init_heads();
    }

    /// True when no contour has been added since the last reset.
    pub fn is_empty(&self) -> bool {
        self.vert(self.v_head).next == self.v_head
    }

    // ─── Accessors ───

    #[inline]
    pub fn v_head(&self) -> VertId {
        self.v_head
    }

    #[inline]
    pub fn f_head(&self) -> FaceId {
        self.f_head
    }

    #[inline]
    pub fn e_head(&self) -> EdgeId {
        self.e_head
    }

    #[inline]
    pub fn vert(&self, v: VertId) -> &Vertex {
        &self.verts[v.0]
    }

    #[inline]
    pub fn vert_mut(&mut self, v: VertId) -> &mut Vertex {
        &mut self.verts[v.0]
    }

    #[inline]
    pub fn face(&self, f: FaceId) -> &Face {
        &self.faces[f.0]
    }

    #[inline]
    pub fn face_mut(&mut self, f: FaceId) -> &mut Face {
        &mut self.faces[f.0]
    }

    #[inline]
    pub fn edge(&self, e: EdgeId) -> &HalfEdge {
        &self.edges[e.pair].halves[e.side as usize]
    }

    #[inline]
    pub fn edge_mut(&mut self, e: EdgeId) -> &mut HalfEdge {
        &mut self.edges[e.pair].halves[e.side as usize]
    }

    pub fn vertex_count(&self) -> usize {
        self.verts.len() - 1
    }

    pub fn face_count(&self) -> usize {
        self.faces.len() - 1
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len() - 1
    }

    // ─── Primitive links ───

    /// Allocate an edge pair and insert it into the edge ring before `e_next`.
    fn make_edge_pair(&mut self, e_next: EdgeId) -> EdgeId {
        let e_next = e_next.canonical();
        let pair = self.edges.insert(EdgePair::default());
        let e = EdgeId { pair, side: 0 };
        let e_sym = e.sym();

        // The twin's `next` stores the predecessor.
        let e_prev = self.edge(e_next.sym()).next;
        self.edge_mut(e_sym).next = e_prev;
        self.edge_mut(e_prev.sym()).next = e;
        self.edge_mut(e).next = e_next;
        self.edge_mut(e_next.sym()).next = e_sym;

        let v_head = self.v_head;
        let f_head = self.f_head;
        {
            let he = self.edge_mut(e);
            he.onext = e;
            he.lnext = e_sym;
            he.org = v_head;
            he.lface = f_head;
        }
        {
            let he = self.edge_mut(e_sym);
            he.onext = e_sym;
            he.lnext = e;
            he.org = v_head;
            he.lface = f_head;
        }
        e
    }

    /// Exchange `a.onext` and `b.onext`, the primitive that merges or splits
    /// origin rings and left-face loops.
    fn splice_rings(&mut self, a: EdgeId, b: EdgeId) {
        let a_onext = self.onext(a);
        let b_onext = self.onext(b);
        self.edge_mut(a_onext.sym()).lnext = b;
        self.edge_mut(b_onext.sym()).lnext = a;
        self.edge_mut(a).onext = b_onext;
        self.edge_mut(b).onext = a_onext;
    }

    /// New vertex inserted before `v_next`, becoming the origin of every edge
    /// around `e_orig`.
    fn make_vertex(&mut self, e_orig: EdgeId, v_next: VertId) -> VertId {
        let v_prev = self.vert(v_next).prev;
        let v_new = VertId(self.verts.insert(Vertex {
            next: v_next,
            prev: v_prev,
            an_edge: e_orig,
            n: UNDEF,
            input_index: UNDEF,
            ..Vertex::default()
        }));
        self.vert_mut(v_prev).next = v_new;
        self.vert_mut(v_next).prev = v_new;

        let mut e = e_orig;
        loop {
            self.edge_mut(e).org = v_new;
            e = self.onext(e);
            if e == e_orig {
                break;
            }
        }
        v_new
    }

    /// New face inserted before `f_next`, becoming the left face of the loop
    /// through `e_orig`.
    fn make_face(&mut self, e_orig: EdgeId, f_next: FaceId) -> FaceId {
        let f_prev = self.face(f_next).prev;
        // A new face inherits the classification of the face it was split from.
        let inside = self.face(f_next).inside;
        let f_new = FaceId(self.faces.insert(Face {
            next: f_next,
            prev: f_prev,
            an_edge: e_orig,
            n: UNDEF,
            inside,
        }));
        self.face_mut(f_prev).next = f_new;
        self.face_mut(f_next).prev = f_new;

        let mut e = e_orig;
        loop {
            self.edge_mut(e).lface = f_new;
            e = self.lnext(e);
            if e == e_orig {
                break;
            }
        }
        f_new
    }

    fn kill_edge(&mut self, e_del: EdgeId) {
        let e_del = e_del.canonical();
        let e_next = self.edge(e_del).next;
        let e_prev = self.edge(e_del.sym()).next;
        self.edge_mut(e_next.sym()).next = e_prev;
        self.edge_mut(e_prev.sym()).next = e_next;
        self.edges.remove(e_del.pair);
    }

    /// Remove `v_del`, handing its edges to `new_org`.
    fn kill_vertex(&mut self, v_del: VertId, new_org: VertId) {
        let e_start = self.vert(v_del).an_edge;
        let mut e = e_start;
        loop {
            self.edge_mut(e).org = new_org;
            e = self.onext(e);
            if e == e_start {
                break;
            }
        }
        let (v_prev, v_next) = {
            let v = self.vert(v_del);
            (v.prev, v.next)
        };
        self.vert_mut(v_next).prev = v_prev;
        self.vert_mut(v_prev).next = v_next;
        self.verts.remove(v_del.0);
    }

    /// Remove `f_del`, handing its loop to `new_lface`.
    fn kill_face(&mut self, f_del: FaceId, new_lface: FaceId) {
        let e_start = self.face(f_del).an_edge;
        let mut e = e_start;
        loop {
            self.edge_mut(e).lface = new_lface;
            e = self.lnext(e);
            if e == e_start {
                break;
            }
        }
        let (f_prev, f_next) = {
            let f = self.face(f_del);
            (f.prev, f.next)
        };
        self.face_mut(f_next).prev = f_prev;
        self.face_mut(f_prev).next = f_next;
        self.faces.remove(f_del.0);
    }

    // ─── Topology operators ───

    /// An isolated edge with two new vertices and a single new face on both
    /// sides.
    pub fn make_edge(&mut self) -> EdgeId {
        let e = self.make_edge_pair(self.e_head);
        let v_head = self.v_head;
        let f_head = self.f_head;
        self.make_vertex(e, v_head);
        self.make_vertex(e.sym(), v_head);
        self.make_face(e, f_head);
        e
    }

    /// The basic operation for changing mesh connectivity.
    ///
    /// When `e_org.org != e_dst.org` the two vertices are merged into
    /// `e_org.org` and `e_dst.org` is destroyed; otherwise the shared vertex
    /// is split in two. Independently, when the left faces differ they are
    /// merged into `e_org.lface`; otherwise the face is split in two.
    pub fn splice(&mut self, e_org: EdgeId, e_dst: EdgeId) {
        if e_org == e_dst {
            return;
        }

        let mut joining_vertices = false;
        if self.org(e_dst) != self.org(e_org) {
            joining_vertices = true;
            let (dead, keep) = (self.org(e_dst), self.org(e_org));
            self.kill_vertex(dead, keep);
        }
        let mut joining_loops = false;
        if self.lface(e_dst) != self.lface(e_org) {
            joining_loops = true;
            let (dead, keep) = (self.lface(e_dst), self.lface(e_org));
            self.kill_face(dead, keep);
        }

        self.splice_rings(e_dst, e_org);

        if !joining_vertices {
            let v_next = self.org(e_org);
            self.make_vertex(e_dst, v_next);
            self.vert_mut(v_next).an_edge = e_org;
        }
        if !joining_loops {
            let f_next = self.lface(e_org);
            self.make_face(e_dst, f_next);
            self.face_mut(f_next).an_edge = e_org;
        }
    }

    /// Remove edge `e_del`. Faces on either side are merged, a loop is split
    /// in two when the edge was its only link, and vertices left without
    /// edges are destroyed.
    pub fn delete_edge(&mut self, e_del: EdgeId) {
        let e_del_sym = e_del.sym();
        let f_head = self.f_head;
        let v_head = self.v_head;

        let mut joining_loops = false;
        if self.lface(e_del) != self.rface(e_del) {
            joining_loops = true;
            let (dead, keep) = (self.lface(e_del), self.rface(e_del));
            self.kill_face(dead, keep);
        }

        if self.onext(e_del) == e_del {
            let org = self.org(e_del);
            self.kill_vertex(org, v_head);
        } else {
            let rface = self.rface(e_del);
            let oprev = self.oprev(e_del);
            self.face_mut(rface).an_edge = oprev;
            let org = self.org(e_del);
            let onext = self.onext(e_del);
            self.vert_mut(org).an_edge = onext;

            self.splice_rings(e_del, oprev);
            if !joining_loops {
                let lface = self.lface(e_del);
                self.make_face(e_del, lface);
            }
        }

        if self.onext(e_del_sym) == e_del_sym {
            let org = self.org(e_del_sym);
            self.kill_vertex(org, v_head);
            let lface = self.lface(e_del_sym);
            self.kill_face(lface, f_head);
        } else {
            let lface = self.lface(e_del);
            let sym_oprev = self.oprev(e_del_sym);
            self.face_mut(lface).an_edge = sym_oprev;
            let sym_org = self.org(e_del_sym);
            let sym_onext = self.onext(e_del_sym);
            self.vert_mut(sym_org).an_edge = sym_onext;
            self.splice_rings(e_del_sym, sym_oprev);
        }

        self.kill_edge(e_del);
    }

    /// New edge `e_new` with `e_new.org == e_org.dst` and a fresh destination
    /// vertex, placed so that `e_new` follows `e_org` around the left face.
    pub fn add_edge_vertex(&mut self, e_org: EdgeId) -> EdgeId {
        let e_new = self.make_edge_pair(e_org);
        let e_new_sym = e_new.sym();

        let lnext = self.lnext(e_org);
        self.splice_rings(e_new, lnext);

        let dst = self.dst(e_org);
        self.edge_mut(e_new).org = dst;
        self.make_vertex(e_new_sym, dst);

        let lface = self.lface(e_org);
        self.edge_mut(e_new).lface = lface;
        self.edge_mut(e_new_sym).lface = lface;
        e_new
    }

    /// Split `e_org` at a new vertex. Afterwards `e_org` ends at the new
    /// vertex and the returned edge runs from it to the old destination.
    pub fn split_edge(&mut self, e_org: EdgeId) -> EdgeId {
        let temp = self.add_edge_vertex(e_org);
        let e_new = temp.sym();
        let e_org_sym = e_org.sym();

        // Detach e_org.dst and reattach it at e_new.org.
        let oprev = self.oprev(e_org_sym);
        self.splice_rings(e_org_sym, oprev);
        self.splice_rings(e_org_sym, e_new);

        let new_org = self.org(e_new);
        self.edge_mut(e_org_sym).org = new_org;
        let new_dst = self.dst(e_new);
        self.vert_mut(new_dst).an_edge = e_new.sym();
        let rface = self.rface(e_org);
        self.edge_mut(e_new.sym()).lface = rface;

        let winding = self.winding(e_org);
        let sym_winding = self.winding(e_org_sym);
        self.edge_mut(e_new).winding = winding;
        self.edge_mut(e_new.sym()).winding = sym_winding;
        e_new
    }

    /// New edge from `e_org.dst` to `e_dst.org`. When both edges bound the
    /// same face it is split in two, otherwise the two loops are joined.
    pub fn connect(&mut self, e_org: EdgeId, e_dst: EdgeId) -> EdgeId {
        let e_new = self.make_edge_pair(e_org);
        let e_new_sym = e_new.sym();

        let mut joining_loops = false;
        if self.lface(e_dst) != self.lface(e_org) {
            joining_loops = true;
            let (dead, keep) = (self.lface(e_dst), self.lface(e_org));
            self.kill_face(dead, keep);
        }

        let lnext = self.lnext(e_org);
        self.splice_rings(e_new, lnext);
        self.splice_rings(e_new_sym, e_dst);

        let org = self.dst(e_org);
        self.edge_mut(e_new).org = org;
        let sym_org = self.org(e_dst);
        self.edge_mut(e_new_sym).org = sym_org;
        let lface = self.lface(e_org);
        self.edge_mut(e_new).lface = lface;
        self.edge_mut(e_new_sym).lface = lface;

        self.face_mut(lface).an_edge = e_new_sym;

        if !joining_loops {
            self.make_face(e_new, lface);
        }
        e_new
    }

    /// Destroy face `f_zap`. Its boundary edges lose their left face; edges
    /// with no face on either side are removed together with any vertices
    /// they leave isolated.
    pub fn zap_face(&mut self, f_zap: FaceId) {
        let f_head = self.f_head;
        let v_head = self.v_head;
        let e_start = self.face(f_zap).an_edge;

        let mut e_next = self.lnext(e_start);
        loop {
            let e = e_next;
            e_next = self.lnext(e);

            self.edge_mut(e).lface = f_head;
            if self.rface(e) == f_head {
                // The edge now has no face on either side.
                if self.onext(e) == e {
                    let org = self.org(e);
                    self.kill_vertex(org, v_head);
                } else {
                    let org = self.org(e);
                    let onext = self.onext(e);
                    self.vert_mut(org).an_edge = onext;
                    let oprev = self.oprev(e);
                    self.splice_rings(e, oprev);
                }
                let e_sym = e.sym();
                if self.onext(e_sym) == e_sym {
                    let org = self.org(e_sym);
                    self.kill_vertex(org, v_head);
                } else {
                    let org = self.org(e_sym);
                    let onext = self.onext(e_sym);
                    self.vert_mut(org).an_edge = onext;
                    let oprev = self.oprev(e_sym);
                    self.splice_rings(e_sym, oprev);
                }
                self.kill_edge(e);
            }
            if e == e_start {
                break;
            }
        }

        let (f_prev, f_next) = {
            let f = self.face(f_zap);
            (f.prev, f.next)
        };
        self.face_mut(f_next).prev = f_prev;
        self.face_mut(f_prev).next = f_next;
        self.faces.remove(f_zap.0);
    }

    /// Number of edges around face `f`.
    pub fn count_face_verts(&self, f: FaceId) -> usize {
        self.face_loop(self.face(f).an_edge).count()
    }
}
