// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// WASM bindings for polytess.

use polytess::{ContourOrientation, ElementType, TessOption, Tessellator, WindingRule};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main_js() {
    console_error_panic_hook::set_once();
}

/// A stateful tessellator that accumulates contours, then tessellates.
#[wasm_bindgen]
pub struct TessellatorJs {
    inner: Tessellator,
}

impl Default for TessellatorJs {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl TessellatorJs {
    #[wasm_bindgen(constructor)]
    pub fn new() -> TessellatorJs {
        TessellatorJs {
            inner: Tessellator::new(),
        }
    }

    /// Add a contour from a flat [x0,y0, x1,y1, ...] Float32Array.
    /// orientation: 0=Original 1=Clockwise 2=CounterClockwise
    pub fn add_contour(&mut self, vertices: &[f32], orientation: u32) -> Result<(), JsError> {
        let orientation = match orientation {
            1 => ContourOrientation::Clockwise,
            2 => ContourOrientation::CounterClockwise,
            _ => ContourOrientation::Original,
        };
        self.inner.add_contour_flat(2, vertices, orientation)?;
        Ok(())
    }

    /// Set an option (0 = NoEmptyPolygons, 1 = CheckMesh).
    pub fn set_option(&mut self, option: u32, value: bool) {
        let opt = match option {
            0 => TessOption::NoEmptyPolygons,
            1 => TessOption::CheckMesh,
            _ => return,
        };
        self.inner.set_option(opt, value);
    }

    /// Triangulate the pending contours.
    pub fn tessellate(&mut self, winding: u32) -> Result<(), JsError> {
        self.tessellate_full(winding, 0, 3)
    }

    /// element_type: 0=Polygons 1=ConnectedPolygons 2=BoundaryContours
    pub fn tessellate_full(
        &mut self,
        winding: u32,
        element_type: u32,
        poly_size: u32,
    ) -> Result<(), JsError> {
        let et = match element_type {
            1 => ElementType::ConnectedPolygons,
            2 => ElementType::BoundaryContours,
            _ => ElementType::Polygons,
        };
        self.inner
            .tessellate(winding_rule(winding), et, poly_size as usize)?;
        Ok(())
    }

    pub fn element_count(&self) -> u32 {
        self.inner.element_count() as u32
    }

    pub fn vertex_count(&self) -> u32 {
        self.inner.vertex_count() as u32
    }

    /// Flat element array; layout depends on the element type.
    pub fn get_elements(&self) -> Vec<u32> {
        self.inner.elements().to_vec()
    }

    /// Flat output positions [x0,y0, x1,y1, ...].
    pub fn get_vertices(&self) -> Vec<f32> {
        self.inner
            .vertices()
            .iter()
            .flat_map(|v| [v.position[0], v.position[1]])
            .collect()
    }

    /// Input index of each output vertex; u32::MAX for created vertices.
    pub fn get_vertex_indices(&self) -> Vec<u32> {
        self.inner.vertex_indices().to_vec()
    }
}

/// 0=EvenOdd 1=NonZero 2=Positive 3=Negative 4=AbsGeqTwo, then the
/// odd/even signed rules in declaration order.
fn winding_rule(winding: u32) -> WindingRule {
    WindingRule::ALL
        .get(winding as usize)
        .copied()
        .unwrap_or(WindingRule::EvenOdd)
}

/// Tessellate one closed 2D contour and return the flat vertex array.
#[wasm_bindgen]
pub fn tessellate_polygon(vertices: &[f32], winding: u32) -> Result<Vec<f32>, JsError> {
    let mut t = TessellatorJs::new();
    t.add_contour(vertices, 0)?;
    t.tessellate(winding)?;
    Ok(t.get_vertices())
}

/// Same as `tessellate_polygon` but returns the triangle indices.
#[wasm_bindgen]
pub fn tessellate_polygon_elements(vertices: &[f32], winding: u32) -> Result<Vec<u32>, JsError> {
    let mut t = TessellatorJs::new();
    t.add_contour(vertices, 0)?;
    t.tessellate(winding)?;
    Ok(t.get_elements())
}
