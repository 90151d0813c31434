// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HEADER section parsing

use fragview_model::{ModelHeader, ParseError, Result};

/// Parse the header section and extract file metadata.
///
/// Requires a FILE_SCHEMA record; FILE_NAME fields are best-effort and
/// missing values stay `None`.
pub fn parse_header(content: &str) -> Result<ModelHeader> {
    let header_start = content
        .find("HEADER;")
        .ok_or_else(|| ParseError::InvalidHeader("missing HEADER section".into()))?;
    let header_end = content[header_start..]
        .find("ENDSEC;")
        .map(|p| header_start + p)
        .unwrap_or(content.len());
    let header = &content[header_start..header_end];

    let mut info = ModelHeader::default();

    // FILE_SCHEMA(('IFC4'))
    let schema_start = header
        .find("FILE_SCHEMA")
        .ok_or_else(|| ParseError::InvalidHeader("missing FILE_SCHEMA".into()))?;
    if let Some(paren_start) = header[schema_start..].find("((") {
        let start = schema_start + paren_start + 2;
        if let Some(paren_end) = header[start..].find("))") {
            let schema_list = &header[start..start + paren_end];
            if let Some((schema, _)) = parse_header_string(schema_list) {
                info.schema_version = schema;
            }
        }
    }
    if info.schema_version.is_empty() {
        return Err(ParseError::InvalidHeader("empty FILE_SCHEMA".into()));
    }

    // FILE_NAME(name, timestamp, author, organization, ...)
    if let Some(name_start) = header.find("FILE_NAME") {
        if let Some(paren_start) = header[name_start..].find('(') {
            let start = name_start + paren_start + 1;
            if let Some((file_name, rest)) = parse_header_string(&header[start..]) {
                if !file_name.is_empty() {
                    info.file_name = Some(file_name);
                }

                if let Some(comma) = rest.find(',') {
                    if let Some((timestamp, rest2)) = parse_header_string(&rest[comma + 1..]) {
                        if !timestamp.is_empty() {
                            info.timestamp = Some(timestamp);
                        }

                        if let Some(comma2) = rest2.find(',') {
                            if let Some((authors, rest3)) =
                                parse_header_list(&rest2[comma2 + 1..])
                            {
                                info.author = authors.first().cloned();

                                if let Some(comma3) = rest3.find(',') {
                                    if let Some((orgs, _)) =
                                        parse_header_list(&rest3[comma3 + 1..])
                                    {
                                        info.organization = orgs.first().cloned();
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    Ok(info)
}

/// Parse a quoted header string ('value'), honoring '' escapes
fn parse_header_string(s: &str) -> Option<(String, &str)> {
    let s = s.trim_start();
    if !s.starts_with('\'') {
        if s.starts_with('$') {
            return Some((String::new(), &s[1..]));
        }
        return None;
    }

    let bytes = s.as_bytes();
    let mut end = 1;
    while end < bytes.len() {
        if bytes[end] == b'\'' {
            if end + 1 < bytes.len() && bytes[end + 1] == b'\'' {
                end += 2;
                continue;
            }
            break;
        }
        end += 1;
    }
    // no closing quote before the end of the slice
    if end >= bytes.len() {
        return None;
    }

    let value = s[1..end].replace("''", "'");
    Some((value, &s[end + 1..]))
}

/// Parse a header list (('a','b')), skipping unparseable items
fn parse_header_list(s: &str) -> Option<(Vec<String>, &str)> {
    let s = s.trim_start();
    if !s.starts_with('(') {
        return Some((Vec::new(), s));
    }

    let mut items = Vec::new();
    let mut current = &s[1..];

    loop {
        current = current.trim_start();
        if current.starts_with(')') {
            return Some((items, &current[1..]));
        }

        if let Some((item, rest)) = parse_header_string(current) {
            if !item.is_empty() {
                items.push(item);
            }
            current = rest.trim_start();
            if current.starts_with(',') {
                current = &current[1..];
            }
        } else if let Some(pos) = current.find(|c| c == ',' || c == ')') {
            current = &current[pos..];
            if current.starts_with(',') {
                current = &current[1..];
            }
        } else {
            break;
        }
    }

    Some((items, current))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = r#"ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');
FILE_NAME('building.ifc','2024-03-15T10:30:00',('Jane Doe'),('Acme Corp'),'Preproc 1.0','App 2.0','');
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
ENDSEC;
END-ISO-10303-21;
"#;

    #[test]
    fn extracts_schema_and_file_metadata() {
        let header = parse_header(HEADER).unwrap();
        assert_eq!(header.schema_version, "IFC4");
        assert_eq!(header.file_name.as_deref(), Some("building.ifc"));
        assert_eq!(header.timestamp.as_deref(), Some("2024-03-15T10:30:00"));
        assert_eq!(header.author.as_deref(), Some("Jane Doe"));
        assert_eq!(header.organization.as_deref(), Some("Acme Corp"));
    }

    #[test]
    fn missing_schema_is_an_error() {
        let err = parse_header("ISO-10303-21;\nHEADER;\nENDSEC;\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidHeader(_)));
    }

    #[test]
    fn empty_file_name_fields_become_none() {
        let content = "HEADER;\nFILE_NAME('','',(),());\nFILE_SCHEMA(('IFC2X3'));\nENDSEC;";
        let header = parse_header(content).unwrap();
        assert_eq!(header.schema_version, "IFC2X3");
        assert!(header.file_name.is_none());
        assert!(header.author.is_none());
    }

    #[test]
    fn escaped_quote_in_header_string() {
        let (value, _) = parse_header_string("'it''s here',rest").unwrap();
        assert_eq!(value, "it's here");
    }

    #[test]
    fn unterminated_header_string_is_not_a_value() {
        assert!(parse_header_string("'unterminated").is_none());
        assert!(parse_header_string("'trailing escape''").is_none());
    }

    #[test]
    fn unterminated_file_name_leaves_metadata_empty() {
        let content = "HEADER;\nFILE_SCHEMA(('IFC4'));\nFILE_NAME('unterminated\nENDSEC;";
        let header = parse_header(content).unwrap();
        assert_eq!(header.schema_version, "IFC4");
        assert!(header.file_name.is_none());
        assert!(header.timestamp.is_none());
    }
}
