// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Public tessellator: contours in, polygons or boundary contours out.
//
// A pass runs projection, the sweep, then triangulation or boundary
// extraction, and finally flattens the mesh into the output arrays. The
// mesh and sweep buffers belong to the instance and are reset, not freed,
// after every pass.

mod output;
mod projection;

use tracing::{debug, warn};

use crate::error::TessError;
use crate::geom::{is_valid_coord, Real, Vec3};
use crate::mesh::{EdgeId, Mesh, UNDEF};
use crate::sweep::{self, Combiner, NoCombine, SweepBuffers};

/// Output index meaning "no vertex" or "no neighbour".
pub const TESS_UNDEF: u32 = UNDEF;

/// Which regions count as inside, from the winding number of the region.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WindingRule {
    #[default]
    EvenOdd,
    NonZero,
    Positive,
    Negative,
    AbsGeqTwo,
    OddPositive,
    OddNegative,
    EvenPositive,
    EvenNegative,
}

impl WindingRule {
    pub const ALL: [WindingRule; 9] = [
        WindingRule::EvenOdd,
        WindingRule::NonZero,
        WindingRule::Positive,
        WindingRule::Negative,
        WindingRule::AbsGeqTwo,
        WindingRule::OddPositive,
        WindingRule::OddNegative,
        WindingRule::EvenPositive,
        WindingRule::EvenNegative,
    ];

    pub fn is_inside(self, n: i32) -> bool {
        let odd = n & 1 == 1;
        match self {
            WindingRule::EvenOdd => odd,
            WindingRule::NonZero => n != 0,
            WindingRule::Positive => n > 0,
            WindingRule::Negative => n < 0,
            WindingRule::AbsGeqTwo => n >= 2 || n <= -2,
            WindingRule::OddPositive => n > 0 && odd,
            WindingRule::OddNegative => n < 0 && odd,
            WindingRule::EvenPositive => n > 0 && !odd,
            WindingRule::EvenNegative => n < 0 && !odd,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementType {
    /// Polygons of at most `poly_size` vertices.
    #[default]
    Polygons,
    /// Polygons followed by the index of the neighbouring polygon across
    /// each edge.
    ConnectedPolygons,
    /// `(first vertex, vertex count)` per boundary loop.
    BoundaryContours,
}

/// Orientation forced on a contour as it is added. Counter-clockwise
/// means a negative x/y shoelace area, clockwise a positive one.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContourOrientation {
    #[default]
    Original,
    Clockwise,
    CounterClockwise,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TessOption {
    NoEmptyPolygons,
    CheckMesh,
}

/// Tunables kept across passes.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TessOptions {
    /// Drop output polygons with zero area.
    pub no_empty_polygons: bool,
    /// In-plane direction of the sweep, relative to the projection axes.
    pub s_unit_x: Real,
    pub s_unit_y: Real,
    /// Plane normal; all zero means "compute from the input".
    pub normal: Vec3,
    /// Verify the mesh after each stage and fail with `TessError::Mesh`.
    pub check_mesh: bool,
}

impl Default for TessOptions {
    fn default() -> Self {
        TessOptions {
            no_empty_polygons: false,
            s_unit_x: 1.0,
            s_unit_y: 0.0,
            normal: [0.0; 3],
            check_mesh: false,
        }
    }
}

/// A contour point, or an output vertex, with an optional user payload.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContourVertex<T = ()> {
    pub position: Vec3,
    pub data: Option<T>,
}

impl<T> ContourVertex<T> {
    pub fn new(x: Real, y: Real, z: Real) -> Self {
        ContourVertex {
            position: [x, y, z],
            data: None,
        }
    }

    pub fn with_data(position: Vec3, data: T) -> Self {
        ContourVertex {
            position,
            data: Some(data),
        }
    }
}

/// Hands the user's combine closure the payloads of an intersection's
/// contributors and stores what it returns.
struct DataCombiner<'a, T> {
    user_data: &'a mut Vec<T>,
    callback: &'a mut dyn FnMut(Vec3, [Option<&T>; 4], [Real; 4]) -> T,
}

impl<T> Combiner for DataCombiner<'_, T> {
    fn combine(
        &mut self,
        position: Vec3,
        data: [Option<u32>; 4],
        weights: [Real; 4],
    ) -> Option<u32> {
        let value = {
            let user_data = &*self.user_data;
            let sources = data.map(|d| d.and_then(|i| user_data.get(i as usize)));
            (self.callback)(position, sources, weights)
        };
        let index = self.user_data.len() as u32;
        self.user_data.push(value);
        Some(index)
    }
}

pub struct Tessellator<T = ()> {
    options: TessOptions,
    mesh: Mesh,
    buffers: SweepBuffers,
    /// Payloads of input and synthesized vertices, indexed by `Vertex::data`.
    user_data: Vec<T>,
    next_input_index: u32,

    normal: Vec3,
    s_unit: Vec3,
    t_unit: Vec3,
    bmin: [Real; 2],
    bmax: [Real; 2],

    out_vertices: Vec<ContourVertex<T>>,
    out_vertex_indices: Vec<u32>,
    out_elements: Vec<u32>,
    element_count: usize,
    element_type: ElementType,
    poly_size: usize,
}

impl<T: Clone> Default for Tessellator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Tessellator<T> {
    pub fn new() -> Self {
        Self::with_options(TessOptions::default())
    }

    pub fn with_options(options: TessOptions) -> Self {
        Tessellator {
            options,
            mesh: Mesh::new(),
            buffers: SweepBuffers::default(),
            user_data: Vec::new(),
            next_input_index: 0,
            normal: [0.0; 3],
            s_unit: [0.0; 3],
            t_unit: [0.0; 3],
            bmin: [0.0; 2],
            bmax: [0.0; 2],
            out_vertices: Vec::new(),
            out_vertex_indices: Vec::new(),
            out_elements: Vec::new(),
            element_count: 0,
            element_type: ElementType::Polygons,
            poly_size: 3,
        }
    }

    pub fn options(&self) -> &TessOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut TessOptions {
        &mut self.options
    }

    pub fn set_option(&mut self, option: TessOption, value: bool) {
        match option {
            TessOption::NoEmptyPolygons => self.options.no_empty_polygons = value,
            TessOption::CheckMesh => self.options.check_mesh = value,
        }
    }

    /// Add a closed contour. Every coordinate is validated before the mesh
    /// is touched, so a rejected contour leaves earlier ones intact.
    pub fn add_contour(
        &mut self,
        vertices: &[ContourVertex<T>],
        orientation: ContourOrientation,
    ) -> Result<(), TessError> {
        if let Some(&value) = vertices
            .iter()
            .flat_map(|v| v.position.iter())
            .find(|&&c| !is_valid_coord(c))
        {
            return Err(TessError::InvalidCoordinate { value });
        }

        let count = vertices.len();
        let reverse = match orientation {
            ContourOrientation::Original => false,
            ContourOrientation::Clockwise => signed_area(vertices) < 0.0,
            ContourOrientation::CounterClockwise => signed_area(vertices) > 0.0,
        };

        let base = self.next_input_index;
        let mut e: Option<EdgeId> = None;
        for i in 0..count {
            let edge = match e {
                None => {
                    let edge = self.mesh.make_edge();
                    self.mesh.splice(edge, edge.sym());
                    edge
                }
                Some(prev) => {
                    // The new vertex and edge follow `prev` around the left face.
                    self.mesh.split_edge(prev);
                    self.mesh.lnext(prev)
                }
            };
            e = Some(edge);

            let index = if reverse { count - 1 - i } else { i };
            let source = &vertices[index];
            let data = source.data.clone().map(|d| {
                self.user_data.push(d);
                (self.user_data.len() - 1) as u32
            });
            let org = self.mesh.org(edge);
            let v = self.mesh.vert_mut(org);
            v.coords = source.position;
            v.data = data;
            v.input_index = base + index as u32;

            // Contour edges carry +1 on their own side, -1 on the twin.
            self.mesh.edge_mut(edge).winding = 1;
            self.mesh.edge_mut(edge.sym()).winding = -1;
        }
        self.next_input_index = base + count as u32;
        Ok(())
    }

    /// Add a contour from packed coordinates, `size` (2 or 3) per vertex.
    pub fn add_contour_flat(
        &mut self,
        size: usize,
        coords: &[f32],
        orientation: ContourOrientation,
    ) -> Result<(), TessError> {
        if size != 2 && size != 3 {
            return Err(TessError::InvalidVertexSize(size));
        }
        if coords.len() % size != 0 {
            return Err(TessError::PartialVertex {
                len: coords.len(),
                size,
            });
        }
        let vertices: Vec<ContourVertex<T>> = coords
            .chunks_exact(size)
            .map(|c| ContourVertex::new(c[0], c[1], if size == 3 { c[2] } else { 0.0 }))
            .collect();
        self.add_contour(&vertices, orientation)
    }

    /// Tessellate the contours added so far. Vertices created where edges
    /// cross carry no payload.
    pub fn tessellate(
        &mut self,
        winding_rule: WindingRule,
        element_type: ElementType,
        poly_size: usize,
    ) -> Result<(), TessError> {
        self.run(winding_rule, element_type, poly_size, None)
    }

    /// As `tessellate`, calling `combine` for every vertex created where two
    /// edges cross. It receives the new position, the payloads of the four
    /// endpoints of the crossing edges and their weights, and returns the
    /// payload of the new vertex.
    pub fn tessellate_with_combine<F>(
        &mut self,
        winding_rule: WindingRule,
        element_type: ElementType,
        poly_size: usize,
        mut combine: F,
    ) -> Result<(), TessError>
    where
        F: FnMut(Vec3, [Option<&T>; 4], [Real; 4]) -> T,
    {
        self.run(winding_rule, element_type, poly_size, Some(&mut combine))
    }

    fn run(
        &mut self,
        winding_rule: WindingRule,
        element_type: ElementType,
        poly_size: usize,
        combine: Option<&mut dyn FnMut(Vec3, [Option<&T>; 4], [Real; 4]) -> T>,
    ) -> Result<(), TessError> {
        let result = self.process(winding_rule, element_type, poly_size, combine);

        // The contours are consumed whatever the outcome.
        self.mesh.reset();
        self.buffers.reset();
        self.user_data.clear();
        self.next_input_index = 0;
        result
    }

    fn process(
        &mut self,
        winding_rule: WindingRule,
        element_type: ElementType,
        poly_size: usize,
        combine: Option<&mut dyn FnMut(Vec3, [Option<&T>; 4], [Real; 4]) -> T>,
    ) -> Result<(), TessError> {
        self.out_vertices.clear();
        self.out_vertex_indices.clear();
        self.out_elements.clear();
        self.element_count = 0;
        self.element_type = element_type;
        self.poly_size = poly_size.max(3);

        if self.mesh.is_empty() {
            return Ok(());
        }
        debug!(
            vertices = self.mesh.vertex_count(),
            ?winding_rule,
            ?element_type,
            "tessellation started"
        );

        let plane = projection::project(
            &mut self.mesh,
            self.options.normal,
            self.options.s_unit_x,
            self.options.s_unit_y,
        );
        self.normal = plane.normal;
        self.s_unit = plane.s_unit;
        self.t_unit = plane.t_unit;
        self.bmin = plane.bmin;
        self.bmax = plane.bmax;

        let (bmin, bmax) = (self.bmin, self.bmax);
        match combine {
            Some(callback) => {
                let mut combiner = DataCombiner {
                    user_data: &mut self.user_data,
                    callback,
                };
                sweep::compute_interior(
                    &mut self.mesh,
                    &mut self.buffers,
                    &mut combiner,
                    winding_rule,
                    bmin,
                    bmax,
                )?;
            }
            None => sweep::compute_interior(
                &mut self.mesh,
                &mut self.buffers,
                &mut NoCombine,
                winding_rule,
                bmin,
                bmax,
            )?,
        }
        self.verify_mesh("sweep")?;

        if element_type == ElementType::BoundaryContours {
            self.mesh.set_winding_number(1, true);
        } else {
            self.mesh.tessellate_interior();
        }
        self.verify_mesh("triangulation")?;

        if element_type == ElementType::BoundaryContours {
            self.output_contours();
        } else {
            self.output_polymesh(element_type, self.poly_size);
        }
        debug!(
            vertices = self.out_vertices.len(),
            elements = self.element_count,
            "tessellation finished"
        );
        Ok(())
    }

    /// With `check_mesh` a broken mesh is an error; otherwise debug builds
    /// treat it as a bug.
    fn verify_mesh(&self, stage: &'static str) -> Result<(), TessError> {
        if self.options.check_mesh {
            if let Err(err) = self.mesh.check() {
                warn!(stage, %err, "mesh check failed");
                return Err(err.into());
            }
        } else if cfg!(debug_assertions) {
            if let Err(err) = self.mesh.check() {
                panic!("mesh check failed after {}: {}", stage, err);
            }
        }
        Ok(())
    }

    // ─── Results ───

    pub fn vertices(&self) -> &[ContourVertex<T>] {
        &self.out_vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.out_vertices.len()
    }

    /// For each output vertex, its position among all input vertices, or
    /// `TESS_UNDEF` when it was created at an intersection.
    pub fn vertex_indices(&self) -> &[u32] {
        &self.out_vertex_indices
    }

    pub fn elements(&self) -> &[u32] {
        &self.out_elements
    }

    pub fn element_count(&self) -> usize {
        self.element_count
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    pub fn poly_size(&self) -> usize {
        self.poly_size
    }

    /// Plane normal used by the last pass.
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Sweep direction of the last pass, in input coordinates.
    pub fn sweep_axes(&self) -> (Vec3, Vec3) {
        (self.s_unit, self.t_unit)
    }
}

/// Signed area of a contour in the xy plane; positive when counter-clockwise.
fn signed_area<T>(vertices: &[ContourVertex<T>]) -> Real {
    let n = vertices.len();
    let twice: Real = (0..n)
        .map(|i| {
            let p0 = vertices[i].position;
            let p1 = vertices[(i + 1) % n].position;
            p0[0] * p1[1] - p0[1] * p1[0]
        })
        .sum();
    twice * 0.5
}
