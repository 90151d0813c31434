// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fragview Parser - STEP/IFC scanning and coarse fragment extraction
//!
//! This crate turns raw STEP physical-file content into a
//! [`fragview_model::LoadedModel`]: a flat list of products with category
//! labels, optional names, and coarse AABB proxy fragments. Full geometry
//! decoding (extrusions, BReps, CSG) is deliberately not here; the proxy
//! volumes are built from the cartesian points each product references.
//!
//! # Example
//!
//! ```ignore
//! use fragview_model::ModelSource;
//! use fragview_parser::StepSource;
//!
//! let source = StepSource::new();
//! let model = source.load("office.ifc", content)?;
//! println!("{} objects, categories: {:?}", model.object_count(), model.categories());
//! ```

mod decoder;
mod fragments;
mod header;
mod scanner;
mod tokenizer;

pub use decoder::EntityDecoder;
pub use header::parse_header;
pub use scanner::EntityScanner;
pub use tokenizer::{parse_entity, Token};

use fragview_model::{
    LoadedModel, ModelObject, ModelSource, ParseError, Result,
};

/// Type names treated as products (objects the viewer lists and renders)
const PRODUCT_TYPES: &[&str] = &[
    "IFCWALL",
    "IFCWALLSTANDARDCASE",
    "IFCCURTAINWALL",
    "IFCSLAB",
    "IFCROOF",
    "IFCBEAM",
    "IFCCOLUMN",
    "IFCDOOR",
    "IFCWINDOW",
    "IFCSTAIR",
    "IFCSTAIRFLIGHT",
    "IFCRAMP",
    "IFCRAMPFLIGHT",
    "IFCRAILING",
    "IFCCOVERING",
    "IFCPLATE",
    "IFCMEMBER",
    "IFCFOOTING",
    "IFCPILE",
    "IFCBUILDINGELEMENTPROXY",
    "IFCFURNISHINGELEMENT",
    "IFCFURNITURE",
    "IFCDISTRIBUTIONELEMENT",
    "IFCFLOWTERMINAL",
    "IFCFLOWSEGMENT",
    "IFCFLOWFITTING",
];

/// Whether a type name is a product the viewer should pick up
pub fn is_product_type(type_name: &str) -> bool {
    PRODUCT_TYPES
        .iter()
        .any(|t| type_name.eq_ignore_ascii_case(t))
}

/// STEP-file backed [`ModelSource`] implementation
///
/// This is the production model loader: validates the STEP leader, scans
/// the DATA section for products, and attaches coarse fragments.
#[derive(Default)]
pub struct StepSource {
    /// Maximum reference depth walked when gathering fragment points
    pub max_ref_depth: usize,
}

impl StepSource {
    pub fn new() -> Self {
        Self { max_ref_depth: 8 }
    }
}

impl ModelSource for StepSource {
    fn load(&self, name: &str, content: &str) -> Result<LoadedModel> {
        if !content.trim_start().starts_with("ISO-10303-21") {
            return Err(ParseError::format("missing ISO-10303-21 leader"));
        }

        let header = header::parse_header(content)?;

        // Collect product ids first, then decode lazily
        let mut scanner = EntityScanner::new(content);
        let mut product_ids = Vec::new();
        while let Some((id, type_name, _, _)) = scanner.next_entity() {
            if is_product_type(type_name) {
                product_ids.push(id);
            }
        }

        let mut decoder = EntityDecoder::new(content);
        let mut objects = Vec::with_capacity(product_ids.len());

        for id in product_ids {
            let entity = match decoder.decode_by_id(id.into()) {
                Ok(e) => e,
                // A malformed product is skipped, not fatal: the rest of
                // the model is still coherent and complete.
                Err(_) => continue,
            };

            // Attribute 2 is Name for IfcRoot subtypes
            let object_name = entity.get_string(2).map(str::to_string);
            let category = entity.type_name.clone();
            let fragment =
                fragments::extract_fragment(&entity, &mut decoder, self.max_ref_depth);

            objects.push(ModelObject {
                id: entity.id,
                category,
                name: object_name,
                fragment,
            });
        }

        Ok(LoadedModel {
            name: name.to_string(),
            header,
            objects,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_IFC: &str = r#"ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');
FILE_NAME('test.ifc','2024-01-01T00:00:00',('Author'),('Org'),'Preprocessor','App','');
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#1=IFCPROJECT('guid0',$,'Project',$,$,$,$,$,$);
#2=IFCCARTESIANPOINT((0.,0.,0.));
#3=IFCCARTESIANPOINT((2000.,100.,3000.));
#4=IFCPOLYLINE((#2,#3));
#5=IFCWALL('guid1',$,'Wall 1',$,$,$,#4,$);
#6=IFCDOOR('guid2',$,$,$,$,$,$,$);
ENDSEC;
END-ISO-10303-21;
"#;

    #[test]
    fn loads_products_with_metadata() {
        let model = StepSource::new().load("test.ifc", TEST_IFC).unwrap();
        assert_eq!(model.name, "test.ifc");
        assert_eq!(model.header.schema_version, "IFC4");
        assert_eq!(model.object_count(), 2);
        assert_eq!(model.categories(), vec!["IFCDOOR", "IFCWALL"]);

        let wall = &model.objects[0];
        assert_eq!(wall.category, "IFCWALL");
        assert_eq!(wall.name.as_deref(), Some("Wall 1"));
        assert!(wall.is_renderable());

        // The door references no points, so it stays metadata-only
        let door = &model.objects[1];
        assert!(!door.is_renderable());
    }

    #[test]
    fn wall_fragment_spans_referenced_points() {
        let model = StepSource::new().load("test.ifc", TEST_IFC).unwrap();
        let bounds = model.objects[0].fragment.aabb();
        assert_eq!(bounds.min, [0.0, 0.0, 0.0]);
        assert_eq!(bounds.max, [2000.0, 100.0, 3000.0]);
    }

    #[test]
    fn rejects_non_step_input() {
        let err = StepSource::new().load("x.ifc", "not an ifc file").unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat(_)));
    }

    #[test]
    fn product_type_check_is_case_insensitive() {
        assert!(is_product_type("IfcWall"));
        assert!(is_product_type("IFCWINDOW"));
        assert!(!is_product_type("IFCPROJECT"));
    }
}
