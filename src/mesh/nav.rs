// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Read-only navigation: the derived half-edge operators and ring iterators.

use super::{EdgeId, FaceId, Mesh, VertId};
use crate::geom::{vert_leq, SweepPoint};

impl Mesh {
    #[inline]
    pub fn onext(&self, e: EdgeId) -> EdgeId {
        self.edge(e).onext
    }

    #[inline]
    pub fn lnext(&self, e: EdgeId) -> EdgeId {
        self.edge(e).lnext
    }

    #[inline]
    pub fn org(&self, e: EdgeId) -> VertId {
        self.edge(e).org
    }

    #[inline]
    pub fn dst(&self, e: EdgeId) -> VertId {
        self.edge(e.sym()).org
    }

    #[inline]
    pub fn lface(&self, e: EdgeId) -> FaceId {
        self.edge(e).lface
    }

    #[inline]
    pub fn rface(&self, e: EdgeId) -> FaceId {
        self.edge(e.sym()).lface
    }

    #[inline]
    pub fn oprev(&self, e: EdgeId) -> EdgeId {
        self.edge(e.sym()).lnext
    }

    #[inline]
    pub fn lprev(&self, e: EdgeId) -> EdgeId {
        self.edge(e).onext.sym()
    }

    #[inline]
    pub fn rprev(&self, e: EdgeId) -> EdgeId {
        self.edge(e.sym()).onext
    }

    #[inline]
    pub fn dnext(&self, e: EdgeId) -> EdgeId {
        self.rprev(e).sym()
    }

    #[inline]
    pub fn winding(&self, e: EdgeId) -> i32 {
        self.edge(e).winding
    }

    /// Projected position of a vertex.
    #[inline]
    pub fn point(&self, v: VertId) -> SweepPoint {
        let v = self.vert(v);
        SweepPoint { s: v.s, t: v.t }
    }

    #[inline]
    pub fn edge_goes_left(&self, e: EdgeId) -> bool {
        vert_leq(self.point(self.dst(e)), self.point(self.org(e)))
    }

    #[inline]
    pub fn edge_goes_right(&self, e: EdgeId) -> bool {
        vert_leq(self.point(self.org(e)), self.point(self.dst(e)))
    }

    /// Live vertices in ring order.
    pub fn vertices(&self) -> impl Iterator<Item = VertId> + '_ {
        let head = self.v_head;
        let mut v = self.vert(head).next;
        std::iter::from_fn(move || {
            if v == head {
                return None;
            }
            let current = v;
            v = self.vert(v).next;
            Some(current)
        })
    }

    /// Live faces in ring order.
    pub fn faces(&self) -> impl Iterator<Item = FaceId> + '_ {
        let head = self.f_head;
        let mut f = self.face(head).next;
        std::iter::from_fn(move || {
            if f == head {
                return None;
            }
            let current = f;
            f = self.face(f).next;
            Some(current)
        })
    }

    /// Half-edges around the left face of `start`, beginning with `start`.
    pub fn face_loop(&self, start: EdgeId) -> impl Iterator<Item = EdgeId> + '_ {
        let mut e = Some(start);
        std::iter::from_fn(move || {
            let current = e?;
            let next = self.lnext(current);
            e = if next == start { None } else { Some(next) };
            Some(current)
        })
    }
}
