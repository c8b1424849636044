// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Consistency walker for the half-edge mesh. Reports the first broken
// invariant instead of asserting, so it can run in release builds too.

use super::{EdgeId, FaceId, HalfEdge, Mesh, VertId};
use crate::error::{MeshError, Ring};

impl Mesh {
    /// Verify ring closure, twin/next/onext consistency, back references and
    /// that the rings account for every allocated entity.
    pub fn check(&self) -> Result<(), MeshError> {
        self.check_faces()?;
        self.check_vertices()?;
        self.check_edges()
    }

    fn half(&self, e: EdgeId, ring: Ring) -> Result<&HalfEdge, MeshError> {
        self.edges
            .get(e.pair)
            .map(|pair| &pair.halves[e.side as usize])
            .ok_or(MeshError::StaleHandle(ring))
    }

    fn check_half_edge(&self, e: EdgeId, ring: Ring) -> Result<(), MeshError> {
        let he = self.half(e, ring)?;
        ensure(e.sym() != e && e.sym().sym() == e, ring, "e.Sym != e && e.Sym.Sym == e")?;
        let lnext = self.half(he.lnext, ring)?;
        ensure(
            self.half(lnext.onext, ring).is_ok() && lnext.onext.sym() == e,
            ring,
            "e.Lnext.Onext.Sym == e",
        )?;
        let onext_sym = self.half(he.onext.sym(), ring)?;
        ensure(onext_sym.lnext == e, ring, "e.Onext.Sym.Lnext == e")
    }

    fn check_faces(&self) -> Result<(), MeshError> {
        let ring = Ring::Face;
        let f_head = self.f_head;
        let limit = self.faces.len();
        let mut f_prev = f_head;
        let mut visited = 0usize;
        loop {
            let f = self.faces.get(f_prev.0).ok_or(MeshError::StaleHandle(ring))?.next;
            if f == f_head {
                break;
            }
            visited += 1;
            ensure(visited < limit, ring, "ring closes at the head")?;
            let face = self.faces.get(f.0).ok_or(MeshError::StaleHandle(ring))?;
            ensure(face.prev == f_prev, ring, "f.prev == fPrev")?;

            let e_start = face.an_edge;
            let mut e = e_start;
            let mut steps = 0usize;
            loop {
                self.check_half_edge(e, ring)?;
                ensure(self.half(e, ring)?.lface == f, ring, "e.Lface == f")?;
                e = self.half(e, ring)?.lnext;
                steps += 1;
                ensure(steps <= 2 * self.edges.len(), ring, "face loop closes")?;
                if e == e_start {
                    break;
                }
            }
            f_prev = f;
        }
        let head = self.face(f_head);
        ensure(head.prev == f_prev, ring, "head.prev closes the ring")?;
        ensure(head.an_edge == self.e_head, ring, "head has no real edge")?;
        if visited != self.face_count() {
            return Err(MeshError::CountMismatch {
                ring,
                found: visited,
                expected: self.face_count(),
            });
        }
        Ok(())
    }

    fn check_vertices(&self) -> Result<(), MeshError> {
        let ring = Ring::Vertex;
        let v_head = self.v_head;
        let limit = self.verts.len();
        let mut v_prev = v_head;
        let mut visited = 0usize;
        loop {
            let v = self.verts.get(v_prev.0).ok_or(MeshError::StaleHandle(ring))?.next;
            if v == v_head {
                break;
            }
            visited += 1;
            ensure(visited < limit, ring, "ring closes at the head")?;
            let vert = self.verts.get(v.0).ok_or(MeshError::StaleHandle(ring))?;
            ensure(vert.prev == v_prev, ring, "v.prev == vPrev")?;

            let e_start = vert.an_edge;
            let mut e = e_start;
            let mut steps = 0usize;
            loop {
                self.check_half_edge(e, ring)?;
                ensure(self.half(e, ring)?.org == v, ring, "e.Org == v")?;
                e = self.half(e, ring)?.onext;
                steps += 1;
                ensure(steps <= 2 * self.edges.len(), ring, "origin ring closes")?;
                if e == e_start {
                    break;
                }
            }
            v_prev = v;
        }
        let head = self.vert(v_head);
        ensure(head.prev == v_prev, ring, "head.prev closes the ring")?;
        ensure(head.an_edge == self.e_head, ring, "head has no real edge")?;
        if visited != self.vertex_count() {
            return Err(MeshError::CountMismatch {
                ring,
                found: visited,
                expected: self.vertex_count(),
            });
        }
        Ok(())
    }

    fn check_edges(&self) -> Result<(), MeshError> {
        let ring = Ring::Edge;
        let e_head = self.e_head;
        let limit = self.edges.len();
        let mut e_prev = e_head;
        let mut visited = 0usize;
        loop {
            let e = self.half(e_prev, ring)?.next;
            if e == e_head {
                break;
            }
            visited += 1;
            ensure(visited < limit, ring, "ring closes at the head")?;
            let he = self.half(e, ring)?;
            let sym = self.half(e.sym(), ring)?;
            ensure(sym.next == e_prev.sym(), ring, "e.Sym.next == ePrev.Sym")?;
            self.check_half_edge(e, ring)?;
            self.check_half_edge(e.sym(), ring)?;
            ensure(he.org != self.v_head, ring, "e.Org != NULL")?;
            ensure(sym.org != self.v_head, ring, "e.Dst != NULL")?;
            self.check_vertex_ref(he.org, ring)?;
            self.check_vertex_ref(sym.org, ring)?;
            self.check_face_ref(he.lface, ring)?;
            self.check_face_ref(sym.lface, ring)?;
            e_prev = e;
        }
        let head = self.half(e_head, ring)?;
        let head_sym = self.half(e_head.sym(), ring)?;
        ensure(head_sym.next == e_prev.sym(), ring, "head.Sym.next closes the ring")?;
        ensure(
            head.org == self.v_head && head_sym.org == self.v_head,
            ring,
            "head has no origin",
        )?;
        ensure(
            head.lface == self.f_head && head_sym.lface == self.f_head,
            ring,
            "head has no face",
        )?;
        if visited != self.edge_count() {
            return Err(MeshError::CountMismatch {
                ring,
                found: visited,
                expected: self.edge_count(),
            });
        }
        Ok(())
    }

    fn check_vertex_ref(&self, v: VertId, ring: Ring) -> Result<(), MeshError> {
        if self.verts.contains(v.0) {
            Ok(())
        } else {
            Err(MeshError::StaleHandle(ring))
        }
    }

    fn check_face_ref(&self, f: FaceId, ring: Ring) -> Result<(), MeshError> {
        if self.faces.contains(f.0) {
            Ok(())
        } else {
            Err(MeshError::StaleHandle(ring))
        }
    }
}

#[inline]
fn ensure(cond: bool, ring: Ring, invariant: &'static str) -> Result<(), MeshError> {
    if cond {
        Ok(())
    } else {
        Err(MeshError::Invariant { ring, invariant })
    }
}
