// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lazy entity decoder with caching

use crate::scanner::{EntityIndex, EntityScanner};
use crate::tokenizer::parse_entity_at;
use fragview_model::{DecodedEntity, EntityId, ParseError, Result};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Lazy entity decoder
///
/// Decodes entities on demand and caches them for reuse. Lookup is O(1)
/// through a scanner-built byte-offset index.
pub struct EntityDecoder<'a> {
    content: &'a str,
    index: EntityIndex,
    cache: FxHashMap<u32, Arc<DecodedEntity>>,
}

impl<'a> EntityDecoder<'a> {
    /// Create a decoder for the given content
    pub fn new(content: &'a str) -> Self {
        let index = EntityScanner::build_index(content);
        Self {
            content,
            index,
            cache: FxHashMap::default(),
        }
    }

    /// Entity count in the index
    pub fn entity_count(&self) -> usize {
        self.index.len()
    }

    /// Whether an entity exists
    pub fn exists(&self, id: EntityId) -> bool {
        self.index.contains_key(&id.0)
    }

    /// Decode entity by ID, caching the result
    pub fn decode_by_id(&mut self, id: EntityId) -> Result<Arc<DecodedEntity>> {
        if let Some(cached) = self.cache.get(&id.0) {
            return Ok(Arc::clone(cached));
        }

        let (start, end) = self
            .index
            .get(&id.0)
            .copied()
            .ok_or(ParseError::EntityNotFound(id))?;

        let entity = parse_entity_at(self.content, start, end)
            .map_err(|e| ParseError::EntityParse(id, e))?;

        let arc = Arc::new(entity);
        self.cache.insert(id.0, Arc::clone(&arc));
        Ok(arc)
    }

    /// Cached entity count (test hook)
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_IFC: &str = r#"ISO-10303-21;
HEADER;
FILE_SCHEMA(('IFC2X3'));
ENDSEC;
DATA;
#1=IFCPROJECT('guid',$,'Project',$,$,$,$,$,#2);
#2=IFCUNITASSIGNMENT((#3));
#3=IFCSIUNIT(*,.LENGTHUNIT.,.MILLI.,.METRE.);
ENDSEC;
END-ISO-10303-21;
"#;

    #[test]
    fn decodes_by_id() {
        let mut decoder = EntityDecoder::new(TEST_IFC);
        let entity = decoder.decode_by_id(EntityId(1)).unwrap();
        assert_eq!(entity.id, EntityId(1));
        assert_eq!(entity.type_name, "IFCPROJECT");
    }

    #[test]
    fn second_decode_hits_cache() {
        let mut decoder = EntityDecoder::new(TEST_IFC);
        let first = decoder.decode_by_id(EntityId(1)).unwrap();
        assert_eq!(decoder.cache_size(), 1);
        let second = decoder.decode_by_id(EntityId(1)).unwrap();
        assert_eq!(decoder.cache_size(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn missing_entity_is_an_error() {
        let mut decoder = EntityDecoder::new(TEST_IFC);
        assert!(decoder.decode_by_id(EntityId(999)).is_err());
    }
}
