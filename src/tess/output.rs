// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Flattening the finished mesh into the output arrays.

use super::{ContourVertex, ElementType, Tessellator, TESS_UNDEF};
use crate::mesh::{EdgeId, FaceId, Mesh, VertId};

impl<T: Clone> Tessellator<T> {
    /// Emit inside faces as polygons of at most `poly_size` vertices,
    /// followed by neighbour indices for `ConnectedPolygons`.
    pub(super) fn output_polymesh(&mut self, element_type: ElementType, poly_size: usize) {
        let poly_size = poly_size.max(3);
        if poly_size > 3 {
            self.mesh.merge_convex_faces(poly_size);
        }

        let vertices: Vec<VertId> = self.mesh.vertices().collect();
        for &v in &vertices {
            self.mesh.vert_mut(v).n = TESS_UNDEF;
        }

        // Number the vertices and faces that take part, in ring order.
        let faces: Vec<FaceId> = self.mesh.faces().collect();
        let mut vertex_count = 0u32;
        let mut face_count = 0u32;
        for &f in &faces {
            self.mesh.face_mut(f).n = TESS_UNDEF;
            if !self.emits_face(f) {
                continue;
            }
            let loop_edges: Vec<EdgeId> = self.mesh.face_loop(self.mesh.face(f).an_edge).collect();
            debug_assert!(loop_edges.len() <= poly_size);
            for e in loop_edges {
                let org = self.mesh.org(e);
                let v = self.mesh.vert_mut(org);
                if v.n == TESS_UNDEF {
                    v.n = vertex_count;
                    vertex_count += 1;
                }
            }
            self.mesh.face_mut(f).n = face_count;
            face_count += 1;
        }

        self.element_count = face_count as usize;
        let stride = if element_type == ElementType::ConnectedPolygons {
            poly_size * 2
        } else {
            poly_size
        };
        self.out_elements.reserve(self.element_count * stride);

        let mut out = vec![None; vertex_count as usize];
        for &v in &vertices {
            let vert = self.mesh.vert(v);
            if vert.n != TESS_UNDEF {
                out[vert.n as usize] = Some(v);
            }
        }
        for v in out.into_iter().flatten() {
            self.push_vertex(v);
        }

        let mesh = &self.mesh;
        for &f in &faces {
            if mesh.face(f).n == TESS_UNDEF {
                continue;
            }
            let an_edge = mesh.face(f).an_edge;
            let start = self.out_elements.len();
            self.out_elements
                .extend(mesh.face_loop(an_edge).map(|e| mesh.vert(mesh.org(e)).n));
            self.out_elements.resize(start + poly_size, TESS_UNDEF);

            if element_type == ElementType::ConnectedPolygons {
                let start = self.out_elements.len();
                self.out_elements
                    .extend(mesh.face_loop(an_edge).map(|e| neighbour_face(mesh, e)));
                self.out_elements.resize(start + poly_size, TESS_UNDEF);
            }
        }
    }

    /// Emit each inside face as a boundary loop: its vertices in order and a
    /// `(first vertex, vertex count)` element.
    pub(super) fn output_contours(&mut self) {
        let faces: Vec<FaceId> = self.mesh.faces().filter(|&f| self.mesh.face(f).inside).collect();
        self.element_count = faces.len();
        self.out_elements.reserve(faces.len() * 2);

        for f in faces {
            let loop_verts: Vec<VertId> = self
                .mesh
                .face_loop(self.mesh.face(f).an_edge)
                .map(|e| self.mesh.org(e))
                .collect();
            let start = self.out_vertices.len() as u32;
            self.out_elements.push(start);
            self.out_elements.push(loop_verts.len() as u32);
            for v in loop_verts {
                self.push_vertex(v);
            }
        }
    }

    fn emits_face(&self, f: FaceId) -> bool {
        let face = self.mesh.face(f);
        if !face.inside {
            return false;
        }
        !(self.options.no_empty_polygons && self.mesh.face_area(f).abs() < f32::MIN_POSITIVE)
    }

    fn push_vertex(&mut self, v: VertId) {
        let vert = self.mesh.vert(v);
        let data = vert
            .data
            .and_then(|i| self.user_data.get(i as usize))
            .cloned();
        self.out_vertices.push(ContourVertex {
            position: vert.coords,
            data,
        });
        self.out_vertex_indices.push(vert.input_index);
    }
}

/// Output index of the face across `e`, or `TESS_UNDEF` when that face is
/// outside or was not emitted.
fn neighbour_face(mesh: &Mesh, e: EdgeId) -> u32 {
    let rface = mesh.rface(e);
    if rface == mesh.f_head() {
        return TESS_UNDEF;
    }
    let face = mesh.face(rface);
    if face.inside {
        face.n
    } else {
        TESS_UNDEF
    }
}
