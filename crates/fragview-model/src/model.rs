// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Loaded-model types: what the parser hands the viewer

use crate::{EntityId, FragmentMesh};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Metadata from the STEP header section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ModelHeader {
    pub schema_version: String,
    pub file_name: Option<String>,
    pub timestamp: Option<String>,
    pub author: Option<String>,
    pub organization: Option<String>,
}

/// One product in the loaded model
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelObject {
    /// Source entity ID
    pub id: EntityId,
    /// Category label (e.g. "IFCWALL")
    pub category: String,
    /// Optional display name
    pub name: Option<String>,
    /// Coarse fragment geometry; empty when no coordinates were reachable
    pub fragment: FragmentMesh,
}

impl ModelObject {
    /// Whether this object has renderable geometry
    pub fn is_renderable(&self) -> bool {
        !self.fragment.is_empty()
    }
}

/// A fully loaded model, one at a time in the viewer
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LoadedModel {
    /// Display name (usually the selected file name)
    pub name: String,
    /// Header metadata
    pub header: ModelHeader,
    /// All products found in the file
    pub objects: Vec<ModelObject>,
}

impl LoadedModel {
    /// Number of objects in the model
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Sorted, distinct category labels across all objects
    pub fn categories(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.objects.iter().map(|o| o.category.as_str()).collect();
        set.into_iter().map(String::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(id: u32, category: &str) -> ModelObject {
        ModelObject {
            id: EntityId(id),
            category: category.into(),
            name: None,
            fragment: FragmentMesh::default(),
        }
    }

    #[test]
    fn categories_are_distinct_and_sorted() {
        let model = LoadedModel {
            name: "test.ifc".into(),
            header: ModelHeader::default(),
            objects: vec![
                object(1, "IFCWALL"),
                object(2, "IFCDOOR"),
                object(3, "IFCWALL"),
            ],
        };
        assert_eq!(model.object_count(), 3);
        assert_eq!(model.categories(), vec!["IFCDOOR", "IFCWALL"]);
    }

    #[test]
    fn empty_model_has_no_categories() {
        let model = LoadedModel::default();
        assert!(model.categories().is_empty());
    }
}
