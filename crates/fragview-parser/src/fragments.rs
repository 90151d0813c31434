// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coarse fragment extraction
//!
//! Walks the reference graph below a product entity, gathers every
//! cartesian point it can reach, and builds a proxy box spanning them.
//! Cheap to compute, good enough for hover picking and scene framing.

use crate::decoder::EntityDecoder;
use fragview_model::{Aabb, DecodedEntity, EntityId, FragmentMesh};
use rustc_hash::FxHashSet;

/// Extract a coarse fragment for one product.
///
/// The walk is breadth-first and depth-limited so cyclic or very deep
/// reference chains cannot run away. Products that reach no points
/// produce an empty mesh.
pub fn extract_fragment(
    entity: &DecodedEntity,
    decoder: &mut EntityDecoder,
    max_depth: usize,
) -> FragmentMesh {
    let mut bounds = Aabb::empty();
    let mut visited: FxHashSet<EntityId> = FxHashSet::default();
    let mut queue: Vec<(EntityId, usize)> = Vec::new();

    visited.insert(entity.id);
    for id in entity.all_refs() {
        if visited.insert(id) {
            queue.push((id, 1));
        }
    }

    let mut head = 0;
    while head < queue.len() {
        let (id, depth) = queue[head];
        head += 1;

        let child = match decoder.decode_by_id(id) {
            Ok(e) => e,
            // Dangling references are common in real exports; skip them.
            Err(_) => continue,
        };

        if child.type_name == "IFCCARTESIANPOINT" {
            if let Some(point) = cartesian_point(&child) {
                bounds.grow(point);
            }
            continue;
        }

        if depth >= max_depth {
            continue;
        }

        for next in child.all_refs() {
            if visited.insert(next) {
                queue.push((next, depth + 1));
            }
        }
    }

    if bounds.is_valid() {
        FragmentMesh::from_aabb(&bounds)
    } else {
        FragmentMesh::default()
    }
}

/// Read the coordinate list of an IFCCARTESIANPOINT.
///
/// 2D points are lifted to z=0.
fn cartesian_point(entity: &DecodedEntity) -> Option<[f64; 3]> {
    let coords = entity.get(0)?.as_list()?;
    let x = coords.first()?.as_float()?;
    let y = coords.get(1)?.as_float()?;
    let z = coords.get(2).and_then(|v| v.as_float()).unwrap_or(0.0);
    Some([x, y, z])
}
