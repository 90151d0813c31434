// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fragment geometry - the coarse renderable representation of a model part

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in model space
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Aabb {
    /// An empty (inverted) box, ready to be grown with [`Aabb::grow`]
    pub fn empty() -> Self {
        Self {
            min: [f64::INFINITY; 3],
            max: [f64::NEG_INFINITY; 3],
        }
    }

    /// Grow to include a point
    pub fn grow(&mut self, p: [f64; 3]) {
        for axis in 0..3 {
            self.min[axis] = self.min[axis].min(p[axis]);
            self.max[axis] = self.max[axis].max(p[axis]);
        }
    }

    /// Whether any point was ever added
    pub fn is_valid(&self) -> bool {
        self.min[0].is_finite() && self.max[0].is_finite()
    }

    pub fn center(&self) -> [f64; 3] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
            (self.min[2] + self.max[2]) * 0.5,
        ]
    }

    pub fn size(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

/// Triangle-soup geometry for one fragment
///
/// Positions are flattened `[x0,y0,z0, x1,y1,z1, ...]`, normals match the
/// positions layout, indices form a triangle list. An empty mesh means the
/// object carries metadata only and is never spawned in the scene.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FragmentMesh {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub indices: Vec<u32>,
}

impl FragmentMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Build a box mesh spanning the given bounds
    ///
    /// Used for coarse AABB proxy fragments: 8 vertices, 12 triangles,
    /// per-vertex normals pointing outward from the box center.
    pub fn from_aabb(aabb: &Aabb) -> Self {
        if !aabb.is_valid() {
            return Self::default();
        }

        let min = aabb.min;
        let max = aabb.max;
        let center = aabb.center();

        let corners: [[f64; 3]; 8] = [
            [min[0], min[1], min[2]],
            [max[0], min[1], min[2]],
            [max[0], max[1], min[2]],
            [min[0], max[1], min[2]],
            [min[0], min[1], max[2]],
            [max[0], min[1], max[2]],
            [max[0], max[1], max[2]],
            [min[0], max[1], max[2]],
        ];

        let mut positions = Vec::with_capacity(24);
        let mut normals = Vec::with_capacity(24);
        for corner in &corners {
            positions.extend([corner[0] as f32, corner[1] as f32, corner[2] as f32]);
            let d = [
                corner[0] - center[0],
                corner[1] - center[1],
                corner[2] - center[2],
            ];
            let len = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt().max(1e-9);
            normals.extend([(d[0] / len) as f32, (d[1] / len) as f32, (d[2] / len) as f32]);
        }

        // 12 triangles, CCW when viewed from outside
        let indices: Vec<u32> = vec![
            0, 2, 1, 0, 3, 2, // -Z
            4, 5, 6, 4, 6, 7, // +Z
            0, 1, 5, 0, 5, 4, // -Y
            3, 7, 6, 3, 6, 2, // +Y
            0, 4, 7, 0, 7, 3, // -X
            1, 2, 6, 1, 6, 5, // +X
        ];

        Self {
            positions,
            normals,
            indices,
        }
    }

    /// Bounds of this mesh
    pub fn aabb(&self) -> Aabb {
        let mut aabb = Aabb::empty();
        for chunk in self.positions.chunks_exact(3) {
            aabb.grow([chunk[0] as f64, chunk[1] as f64, chunk[2] as f64]);
        }
        aabb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_aabb_is_invalid() {
        assert!(!Aabb::empty().is_valid());
    }

    #[test]
    fn grow_tracks_extents() {
        let mut aabb = Aabb::empty();
        aabb.grow([1.0, 2.0, 3.0]);
        aabb.grow([-1.0, 0.0, 5.0]);
        assert!(aabb.is_valid());
        assert_eq!(aabb.min, [-1.0, 0.0, 3.0]);
        assert_eq!(aabb.max, [1.0, 2.0, 5.0]);
    }

    #[test]
    fn box_mesh_has_twelve_triangles() {
        let mut aabb = Aabb::empty();
        aabb.grow([0.0, 0.0, 0.0]);
        aabb.grow([1.0, 1.0, 1.0]);
        let mesh = FragmentMesh::from_aabb(&aabb);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 12);

        let bounds = mesh.aabb();
        assert_eq!(bounds.min, [0.0, 0.0, 0.0]);
        assert_eq!(bounds.max, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn invalid_aabb_yields_empty_mesh() {
        let mesh = FragmentMesh::from_aabb(&Aabb::empty());
        assert!(mesh.is_empty());
    }
}
