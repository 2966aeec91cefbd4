//! ROM definition XML parser.
//!
//! Parses definition files mapping table names to ROM addresses.
//! Extraction is permissive: elements missing a name or address are
//! skipped outright, entries with an unparsable address or storage
//! type are skipped with a recorded warning, and unrecognized
//! elements and attributes are ignored.

use super::error::{DefError, DefWarning};
use super::types::{DataType, Endianness, Scaling, TableDescriptor};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

/// Result of a definition parse: the extracted tables plus any
/// warnings recorded along the way.
#[derive(Debug, Default)]
pub(super) struct ParsedDefs {
    pub tables: HashMap<String, TableDescriptor>,
    pub warnings: Vec<DefWarning>,
}

/// Parse a definition document from a string.
pub(super) fn parse_defs(xml: &str) -> Result<ParsedDefs, DefError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut parsed = ParsedDefs::default();
    // Descriptor under construction while inside a <table> element
    let mut current: Option<TableDescriptor> = None;
    let mut table_depth = 0usize;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "table" {
                    table_depth += 1;
                    if table_depth == 1 {
                        current = start_table(e, &mut parsed)?;
                    }
                } else if name == "scaling" {
                    if let Some(ref mut desc) = current {
                        apply_scaling_attributes(e, desc)?;
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "table" && table_depth > 0 {
                    table_depth -= 1;
                    if table_depth == 0 {
                        if let Some(desc) = current.take() {
                            finish_table(desc, &mut parsed);
                        }
                    }
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "table" && table_depth == 0 {
                    if let Some(desc) = start_table(e, &mut parsed)? {
                        finish_table(desc, &mut parsed);
                    }
                } else if name == "scaling" {
                    if let Some(ref mut desc) = current {
                        apply_scaling_attributes(e, desc)?;
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(DefError::Malformed(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(parsed)
}

/// Build a descriptor from a `<table>` element's attributes.
///
/// Returns `Ok(None)` when the element is skipped (missing or bad
/// name/address/type); a skip for a bad value records a warning.
fn start_table(
    e: &BytesStart,
    parsed: &mut ParsedDefs,
) -> Result<Option<TableDescriptor>, DefError> {
    let name = match get_attribute(e, "name")? {
        Some(n) if !n.is_empty() => n,
        _ => return Ok(None),
    };
    let address_str = match get_attribute(e, "address")? {
        Some(a) => a,
        None => return Ok(None),
    };

    let address = match parse_hex_address(&address_str) {
        Some(a) => a,
        None => {
            tracing::warn!(table = %name, address = %address_str, "skipping table with bad address");
            parsed.warnings.push(DefWarning::BadAddress {
                name,
                address: address_str,
            });
            return Ok(None);
        }
    };

    let mut desc = TableDescriptor::new(name, address);

    if let Some(type_str) = get_attribute(e, "type")? {
        match DataType::from_attr(&type_str) {
            Some(dt) => desc.data_type = dt,
            None => {
                tracing::warn!(table = %desc.name, data_type = %type_str, "skipping table with unknown type");
                parsed.warnings.push(DefWarning::BadDataType {
                    name: desc.name,
                    data_type: type_str,
                });
                return Ok(None);
            }
        }
    }
    if let Some(val) = get_attribute(e, "elements")? {
        desc.elements = val.trim().parse().unwrap_or(1);
    }
    if let Some(val) = get_attribute(e, "endian")? {
        if let Some(endian) = Endianness::from_attr(&val) {
            desc.endianness = endian;
        }
    }
    // Inline scaling attributes; a nested <scaling> element overrides these
    apply_scaling_parts(
        &mut desc.scaling,
        get_attribute(e, "multiplier")?,
        get_attribute(e, "offset")?,
        get_attribute(e, "units")?,
    );

    Ok(Some(desc))
}

/// Record a completed descriptor, last-wins on duplicate names.
fn finish_table(desc: TableDescriptor, parsed: &mut ParsedDefs) {
    if parsed.tables.contains_key(&desc.name) {
        parsed.warnings.push(DefWarning::DuplicateName {
            name: desc.name.clone(),
        });
    }
    parsed.tables.insert(desc.name.clone(), desc);
}

fn apply_scaling_attributes(e: &BytesStart, desc: &mut TableDescriptor) -> Result<(), DefError> {
    let mut scaling = Scaling::identity();
    apply_scaling_parts(
        &mut scaling,
        get_attribute(e, "multiplier")?,
        get_attribute(e, "offset")?,
        get_attribute(e, "units")?,
    );
    desc.scaling = scaling;
    Ok(())
}

fn apply_scaling_parts(
    scaling: &mut Scaling,
    multiplier: Option<String>,
    offset: Option<String>,
    units: Option<String>,
) {
    if let Some(val) = multiplier {
        scaling.multiplier = val.trim().parse().unwrap_or(1.0);
    }
    if let Some(val) = offset {
        scaling.offset = val.trim().parse().unwrap_or(0.0);
    }
    if let Some(val) = units {
        scaling.units = val;
    }
}

fn get_attribute(e: &BytesStart, name: &str) -> Result<Option<String>, DefError> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == name.as_bytes() {
            return Ok(Some(String::from_utf8_lossy(&attr.value).to_string()));
        }
    }
    Ok(None)
}

/// Parse a hexadecimal address, with or without a `0x` prefix, any case.
fn parse_hex_address(s: &str) -> Option<u32> {
    let s = s.trim();
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u32::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_hex_address_forms() {
        assert_eq!(parse_hex_address("1A2B"), Some(0x1A2B));
        assert_eq!(parse_hex_address("0x1a2b"), Some(0x1A2B));
        assert_eq!(parse_hex_address("0X1A2B"), Some(0x1A2B));
        assert_eq!(parse_hex_address(" ff "), Some(0xFF));
        assert_eq!(parse_hex_address("xyz"), None);
        assert_eq!(parse_hex_address(""), None);
    }

    #[test]
    fn test_parse_minimal_table() {
        let parsed = parse_defs(r#"<rom><table name="Boost Target" address="0x1A2B"/></rom>"#)
            .expect("parse failed");
        assert_eq!(parsed.tables.len(), 1);
        let desc = &parsed.tables["Boost Target"];
        assert_eq!(desc.address, 0x1A2B);
        assert_eq!(desc.data_type, DataType::U08);
        assert_eq!(desc.elements, 1);
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_missing_attributes_skipped_silently() {
        let xml = r#"<rom>
            <table name="No Address"/>
            <table address="1000"/>
            <table name="Good" address="2000"/>
        </rom>"#;
        let parsed = parse_defs(xml).expect("parse failed");
        assert_eq!(parsed.tables.len(), 1);
        assert!(parsed.tables.contains_key("Good"));
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_bad_hex_skipped_with_warning() {
        let xml = r#"<rom>
            <table name="Bad" address="not-hex"/>
            <table name="Good" address="10"/>
        </rom>"#;
        let parsed = parse_defs(xml).expect("parse failed");
        assert_eq!(parsed.tables.len(), 1);
        assert_eq!(
            parsed.warnings,
            vec![DefWarning::BadAddress {
                name: "Bad".into(),
                address: "not-hex".into()
            }]
        );
    }

    #[test]
    fn test_duplicate_name_last_wins() {
        let xml = r#"<rom>
            <table name="Boost Target" address="1000"/>
            <table name="Boost Target" address="2000"/>
        </rom>"#;
        let parsed = parse_defs(xml).expect("parse failed");
        assert_eq!(parsed.tables["Boost Target"].address, 0x2000);
        assert_eq!(
            parsed.warnings,
            vec![DefWarning::DuplicateName {
                name: "Boost Target".into()
            }]
        );
    }

    #[test]
    fn test_extension_attributes() {
        let xml = r#"<rom>
            <table name="Target Boost" address="0x4000" type="u16" elements="16"
                   endian="little" multiplier="0.01" offset="-14.7" units="psi"/>
        </rom>"#;
        let parsed = parse_defs(xml).expect("parse failed");
        let desc = &parsed.tables["Target Boost"];
        assert_eq!(desc.data_type, DataType::U16);
        assert_eq!(desc.elements, 16);
        assert_eq!(desc.endianness, Endianness::Little);
        assert_eq!(desc.scaling.multiplier, 0.01);
        assert_eq!(desc.scaling.offset, -14.7);
        assert_eq!(desc.scaling.units, "psi");
    }

    #[test]
    fn test_nested_scaling_overrides_inline() {
        let xml = r#"<rom>
            <table name="IAM" address="0x8000" multiplier="2.0">
                <scaling multiplier="0.0625" units="ratio"/>
            </table>
        </rom>"#;
        let parsed = parse_defs(xml).expect("parse failed");
        let desc = &parsed.tables["IAM"];
        assert_eq!(desc.scaling.multiplier, 0.0625);
        assert_eq!(desc.scaling.units, "ratio");
    }

    #[test]
    fn test_unknown_elements_ignored() {
        let xml = r#"<roms><rom id="A">
            <romid><xmlid>USDM</xmlid></romid>
            <table name="Fine Correction" address="0xC0" type="s8"/>
        </rom></roms>"#;
        let parsed = parse_defs(xml).expect("parse failed");
        assert_eq!(parsed.tables.len(), 1);
        assert_eq!(parsed.tables["Fine Correction"].data_type, DataType::S08);
    }

    #[test]
    fn test_malformed_document_fails() {
        assert!(parse_defs("<rom><table name=").is_err());
    }

    #[test]
    fn test_empty_document() {
        let parsed = parse_defs("<rom/>").expect("parse failed");
        assert!(parsed.tables.is_empty());
    }
}
