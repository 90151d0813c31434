// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fast entity scanner
//!
//! Walks the DATA section and yields entity boundaries without decoding
//! attributes. Uses memchr for the `#` search so large files stay cheap.

use memchr::memchr;
use rustc_hash::FxHashMap;

/// Entity index mapping ID to byte offsets
pub type EntityIndex = FxHashMap<u32, (usize, usize)>;

/// Streaming scanner over STEP entity definitions
pub struct EntityScanner<'a> {
    content: &'a str,
    pos: usize,
}

impl<'a> EntityScanner<'a> {
    /// Create a scanner positioned at the start of the DATA section
    pub fn new(content: &'a str) -> Self {
        let pos = content.find("DATA;").map(|p| p + 5).unwrap_or(0);
        Self { content, pos }
    }

    /// Advance to the next entity definition
    ///
    /// Returns `(id, type_name, start_byte, end_byte)`. Entity definitions
    /// start at the beginning of a line; `#` occurrences inside attribute
    /// lists are references and are skipped.
    pub fn next_entity(&mut self) -> Option<(u32, &'a str, usize, usize)> {
        let bytes = self.content.as_bytes();

        while self.pos < bytes.len() {
            let hash_pos = memchr(b'#', &bytes[self.pos..])?;
            self.pos += hash_pos;

            let at_line_start = self.pos == 0
                || matches!(bytes[self.pos - 1], b'\n' | b'\r' | b';');
            if !at_line_start {
                self.pos += 1;
                continue;
            }

            let start = self.pos;
            self.pos += 1;

            let id_start = self.pos;
            while self.pos < bytes.len() && bytes[self.pos].is_ascii_digit() {
                self.pos += 1;
            }
            if self.pos == id_start {
                continue;
            }
            let id: u32 = self.content[id_start..self.pos].parse().ok()?;

            self.skip_blank();
            if self.pos >= bytes.len() || bytes[self.pos] != b'=' {
                continue;
            }
            self.pos += 1;
            self.skip_blank();

            let type_start = self.pos;
            while self.pos < bytes.len()
                && (bytes[self.pos].is_ascii_alphanumeric() || bytes[self.pos] == b'_')
            {
                self.pos += 1;
            }
            if self.pos == type_start {
                continue;
            }
            let type_name = &self.content[type_start..self.pos];

            let end = self.find_entity_end()?;
            return Some((id, type_name, start, end));
        }

        None
    }

    fn skip_blank(&mut self) {
        let bytes = self.content.as_bytes();
        while self.pos < bytes.len() && matches!(bytes[self.pos], b' ' | b'\t') {
            self.pos += 1;
        }
    }

    /// Find the terminating semicolon, honoring quoted strings
    fn find_entity_end(&mut self) -> Option<usize> {
        let bytes = self.content.as_bytes();
        let mut in_string = false;

        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b'\'' => {
                    // '' inside a string is an escaped quote
                    if in_string && self.pos + 1 < bytes.len() && bytes[self.pos + 1] == b'\'' {
                        self.pos += 2;
                        continue;
                    }
                    in_string = !in_string;
                }
                b';' if !in_string => {
                    self.pos += 1;
                    return Some(self.pos);
                }
                _ => {}
            }
            self.pos += 1;
        }

        None
    }

    /// Build an index of all entities (ID -> byte offsets)
    pub fn build_index(content: &'a str) -> EntityIndex {
        let mut scanner = Self::new(content);
        let mut index = FxHashMap::default();
        while let Some((id, _, start, end)) = scanner.next_entity() {
            index.insert(id, (start, end));
        }
        index
    }

    /// Count entities grouped by uppercased type name
    pub fn count_by_type(content: &'a str) -> FxHashMap<String, usize> {
        let mut scanner = Self::new(content);
        let mut counts: FxHashMap<String, usize> = FxHashMap::default();
        while let Some((_, type_name, _, _)) = scanner.next_entity() {
            *counts.entry(type_name.to_uppercase()).or_insert(0) += 1;
        }
        counts
    }

    /// Total entity count
    pub fn entity_count(content: &'a str) -> usize {
        let mut scanner = Self::new(content);
        let mut count = 0;
        while scanner.next_entity().is_some() {
            count += 1;
        }
        count
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
#4=IFCWALL('guid',$,'Wall; with ''semicolon''',$,$,#5,#6,$);
ENDSEC;
END-ISO-10303-21;
"#;

    #[test]
    fn finds_all_entities() {
        let mut scanner = EntityScanner::new(TEST_IFC);
        let mut entities = Vec::new();
        while let Some((id, type_name, _, _)) = scanner.next_entity() {
            entities.push((id, type_name.to_string()));
        }
        assert_eq!(entities.len(), 4);
        assert_eq!(entities[0], (1, "IFCPROJECT".to_string()));
        assert_eq!(entities[3], (4, "IFCWALL".to_string()));
    }

    #[test]
    fn semicolons_inside_strings_do_not_end_entities() {
        let index = EntityScanner::build_index(TEST_IFC);
        let (start, end) = index[&4];
        assert!(TEST_IFC[start..end].contains("semicolon"));
        assert!(TEST_IFC[start..end].ends_with(';'));
    }

    #[test]
    fn counts_by_type() {
        let counts = EntityScanner::count_by_type(TEST_IFC);
        assert_eq!(counts.get("IFCPROJECT"), Some(&1));
        assert_eq!(counts.get("IFCWALL"), Some(&1));
        assert_eq!(EntityScanner::entity_count(TEST_IFC), 4);
    }
}
