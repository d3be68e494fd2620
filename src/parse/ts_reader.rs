use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs;
use std::path::Path;

use crate::catalog::{Catalog, Location, Message, TranslationStatus, TsContext};
use crate::error::{CatalogError, Result};

/// Reader for Qt Linguist .ts catalog files
pub struct TsReader;

impl TsReader {
    /// Parse a .ts file from disk
    pub fn parse_file(path: &Path) -> Result<Catalog> {
        let content = fs::read_to_string(path)?;
        Self::parse_str(&content).map_err(|e| match e {
            CatalogError::Generic(reason) => CatalogError::ts_parse(path, reason),
            CatalogError::MalformedMessage {
                context, reason, ..
            } => CatalogError::malformed_message(path, context, reason),
            other => other,
        })
    }

    /// Parse a .ts document from a string
    pub fn parse_str(content: &str) -> Result<Catalog> {
        // Whitespace is significant: source strings like "Azimuth " carry
        // trailing spaces that must survive parsing.
        let mut reader = Reader::from_str(content);
        reader.trim_text(false);

        let mut catalog: Option<Catalog> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"TS" => {
                        catalog = Some(read_ts_attributes(&e)?);
                    }
                    b"context" => {
                        let catalog = catalog.as_mut().ok_or_else(|| {
                            CatalogError::Generic(
                                "found <context> outside of <TS> root".to_string(),
                            )
                        })?;
                        let ctx = read_context(&mut reader)?;
                        catalog.contexts.push(ctx);
                    }
                    other => {
                        let name = String::from_utf8_lossy(other).into_owned();
                        // Unknown top-level elements are skipped wholesale
                        reader
                            .read_to_end(quick_xml::name::QName(name.as_bytes()))
                            .map_err(|e| CatalogError::Generic(e.to_string()))?;
                    }
                },
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(CatalogError::Generic(format!(
                        "XML error at position {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
            }
        }

        catalog.ok_or_else(|| CatalogError::Generic("document has no <TS> root".to_string()))
    }
}

fn read_ts_attributes(e: &BytesStart) -> Result<Catalog> {
    let mut catalog = Catalog::new("");
    catalog.version = String::new();

    for attr in e.attributes() {
        let attr = attr.map_err(|e| CatalogError::Generic(format!("bad TS attribute: {e}")))?;
        let value = attr
            .unescape_value()
            .map_err(|e| CatalogError::Generic(format!("bad TS attribute value: {e}")))?
            .into_owned();
        match attr.key.as_ref() {
            b"version" => catalog.version = value,
            b"language" => catalog.language = value,
            b"sourcelanguage" => catalog.source_language = value,
            _ => {}
        }
    }

    Ok(catalog)
}

fn read_context(reader: &mut Reader<&[u8]>) -> Result<TsContext> {
    let mut ctx = TsContext::new("");

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"name" => {
                    ctx.name = read_element_text(reader, b"name")?;
                }
                b"message" => {
                    let msg = read_message(reader, &ctx.name)?;
                    ctx.messages.push(msg);
                }
                other => {
                    let name = String::from_utf8_lossy(other).into_owned();
                    reader
                        .read_to_end(quick_xml::name::QName(name.as_bytes()))
                        .map_err(|e| CatalogError::Generic(e.to_string()))?;
                }
            },
            Ok(Event::End(e)) if e.name().as_ref() == b"context" => break,
            Ok(Event::Eof) => {
                return Err(CatalogError::Generic(
                    "unexpected end of document inside <context>".to_string(),
                ))
            }
            Ok(_) => {}
            Err(e) => return Err(CatalogError::Generic(e.to_string())),
        }
    }

    Ok(ctx)
}

fn read_message(reader: &mut Reader<&[u8]>, context: &str) -> Result<Message> {
    let mut sources: Vec<String> = Vec::new();
    let mut translation = String::new();
    let mut status: Option<TranslationStatus> = None;
    let mut locations = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"source" => {
                    sources.push(read_element_text(reader, b"source")?);
                }
                b"translation" => {
                    status = Some(read_status(&e, context)?);
                    translation = read_element_text(reader, b"translation")?;
                }
                b"location" => {
                    // Start/End form of an element usually written empty
                    locations.push(read_location(&e, context)?);
                    reader
                        .read_to_end(quick_xml::name::QName(b"location"))
                        .map_err(|e| CatalogError::Generic(e.to_string()))?;
                }
                other => {
                    let name = String::from_utf8_lossy(other).into_owned();
                    reader
                        .read_to_end(quick_xml::name::QName(name.as_bytes()))
                        .map_err(|e| CatalogError::Generic(e.to_string()))?;
                }
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"location" => locations.push(read_location(&e, context)?),
                b"translation" => {
                    status = Some(read_status(&e, context)?);
                }
                b"source" => sources.push(String::new()),
                _ => {}
            },
            Ok(Event::End(e)) if e.name().as_ref() == b"message" => break,
            Ok(Event::Eof) => {
                return Err(CatalogError::Generic(
                    "unexpected end of document inside <message>".to_string(),
                ))
            }
            Ok(_) => {}
            Err(e) => return Err(CatalogError::Generic(e.to_string())),
        }
    }

    if sources.len() != 1 {
        return Err(CatalogError::malformed_message(
            "<memory>",
            context,
            format!("expected exactly one <source>, found {}", sources.len()),
        ));
    }

    // A message with no <translation> element at all is awaiting translation
    let status = status.unwrap_or(TranslationStatus::Unfinished);

    Ok(Message {
        source: sources.remove(0),
        translation,
        status,
        locations,
    })
}

fn read_status(e: &BytesStart, context: &str) -> Result<TranslationStatus> {
    let type_attr = e
        .try_get_attribute("type")
        .map_err(|e| CatalogError::Generic(format!("bad translation attribute: {e}")))?;

    let value: Option<String> = match &type_attr {
        Some(attr) => Some(
            attr.unescape_value()
                .map_err(|e| CatalogError::Generic(e.to_string()))?
                .into_owned(),
        ),
        None => None,
    };

    TranslationStatus::from_type_attr(value.as_deref())
        .ok_or_else(|| CatalogError::unknown_status(context, value.unwrap_or_default()))
}

fn read_location(e: &BytesStart, context: &str) -> Result<Location> {
    let mut filename = None;
    let mut line = None;

    for attr in e.attributes() {
        let attr = attr.map_err(|e| CatalogError::Generic(format!("bad location: {e}")))?;
        let value = attr
            .unescape_value()
            .map_err(|e| CatalogError::Generic(e.to_string()))?;
        match attr.key.as_ref() {
            b"filename" => filename = Some(value.into_owned()),
            b"line" => {
                line = Some(value.parse::<u32>().map_err(|_| {
                    CatalogError::malformed_message(
                        "<memory>",
                        context,
                        format!("location line '{value}' is not a number"),
                    )
                })?);
            }
            _ => {}
        }
    }

    match (filename, line) {
        (Some(filename), Some(line)) => Ok(Location::new(filename, line)),
        _ => Err(CatalogError::malformed_message(
            "<memory>",
            context,
            "location needs filename and line attributes",
        )),
    }
}

/// Read the text content of the element just opened, up to its end tag
fn read_element_text(reader: &mut Reader<&[u8]>, end: &[u8]) -> Result<String> {
    let mut text = String::new();
    loop {
        match reader.read_event() {
            Ok(Event::Text(t)) => {
                text.push_str(
                    &t.unescape()
                        .map_err(|e| CatalogError::Generic(e.to_string()))?,
                );
            }
            Ok(Event::CData(c)) => {
                text.push_str(&String::from_utf8_lossy(&c.into_inner()));
            }
            Ok(Event::End(e)) if e.name().as_ref() == end => break,
            Ok(Event::Eof) => {
                return Err(CatalogError::Generic(format!(
                    "unexpected end of document inside <{}>",
                    String::from_utf8_lossy(end)
                )))
            }
            Ok(_) => {}
            Err(e) => return Err(CatalogError::Generic(e.to_string())),
        }
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS><TS version="2.0" language="zh" sourcelanguage="eo">
<context>
    <name>@default</name>
    <message>
        <location filename="../createArc.py" line="312"/>
        <source>Create arc wedge</source>
        <translation>半圆环形</translation>
    </message>
    <message>
        <location filename="../createGear.py" line="101"/>
        <source>Create gear</source>
        <translation type="unfinished"></translation>
    </message>
    <message>
        <source>Create ring</source>
        <translation type="obsolete">圆环</translation>
    </message>
</context>
<context>
    <name>Dialog</name>
    <message>
        <location filename="../ui/azDistDigitizer.ui" line="25"/>
        <source>Azimuth </source>
        <translation>方位角</translation>
    </message>
</context>
</TS>
"#;

    #[test]
    fn test_parse_sample_structure() {
        let catalog = TsReader::parse_str(SAMPLE).unwrap();

        assert_eq!(catalog.version, "2.0");
        assert_eq!(catalog.language, "zh");
        assert_eq!(catalog.source_language, "eo");
        assert_eq!(catalog.contexts.len(), 2);
        assert_eq!(catalog.contexts[0].name, "@default");
        assert_eq!(catalog.contexts[1].name, "Dialog");
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_parse_statuses() {
        let catalog = TsReader::parse_str(SAMPLE).unwrap();

        let arc = catalog.lookup("@default", "Create arc wedge").unwrap();
        assert_eq!(arc.status, TranslationStatus::Finished);
        assert_eq!(arc.translation, "半圆环形");

        let gear = catalog.lookup("@default", "Create gear").unwrap();
        assert_eq!(gear.status, TranslationStatus::Unfinished);
        assert_eq!(gear.translation, "");

        let ring = catalog.lookup("@default", "Create ring").unwrap();
        assert_eq!(ring.status, TranslationStatus::Obsolete);
        assert_eq!(ring.translation, "圆环");
        assert!(ring.locations.is_empty());
    }

    #[test]
    fn test_parse_location_hints() {
        let catalog = TsReader::parse_str(SAMPLE).unwrap();
        let arc = catalog.lookup("@default", "Create arc wedge").unwrap();
        assert_eq!(
            arc.locations,
            vec![Location::new("../createArc.py", 312)]
        );
    }

    #[test]
    fn test_parse_entity_escapes() {
        let doc = r#"<?xml version="1.0" encoding="utf-8"?>
<TS version="2.0" language="zh">
<context>
    <name>@default</name>
    <message>
        <source>Rotate 180&#xb0;</source>
        <translation>旋转180°</translation>
    </message>
    <message>
        <source>Save &amp; close</source>
        <translation type="unfinished"></translation>
    </message>
</context>
</TS>"#;
        let catalog = TsReader::parse_str(doc).unwrap();
        assert!(catalog.lookup("@default", "Rotate 180°").is_some());
        assert!(catalog.lookup("@default", "Save & close").is_some());
    }

    #[test]
    fn test_parse_multiple_locations() {
        let doc = r#"<TS version="2.0" language="zh">
<context>
    <name>@default</name>
    <message>
        <location filename="../createArc.py" line="106"/>
        <location filename="../createDonut.py" line="60"/>
        <source>Radius units</source>
        <translation>半径单位</translation>
    </message>
</context>
</TS>"#;
        let catalog = TsReader::parse_str(doc).unwrap();
        let m = catalog.lookup("@default", "Radius units").unwrap();
        assert_eq!(m.locations.len(), 2);
    }

    #[test]
    fn test_message_without_source_is_error() {
        let doc = r#"<TS version="2.0" language="zh">
<context>
    <name>@default</name>
    <message>
        <translation>孤儿</translation>
    </message>
</context>
</TS>"#;
        let err = TsReader::parse_str(doc).unwrap_err();
        assert!(err.to_string().contains("exactly one <source>"));
    }

    #[test]
    fn test_unknown_status_is_error() {
        let doc = r#"<TS version="2.0" language="zh">
<context>
    <name>@default</name>
    <message>
        <source>Close</source>
        <translation type="vanished">关闭</translation>
    </message>
</context>
</TS>"#;
        let err = TsReader::parse_str(doc).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownStatus { .. }));
    }

    #[test]
    fn test_not_a_ts_document() {
        let err = TsReader::parse_str("<html><body/></html>").unwrap_err();
        assert!(err.to_string().contains("no <TS> root"));
    }

    #[test]
    fn test_unknown_elements_skipped() {
        let doc = r#"<TS version="2.0" language="zh">
<context>
    <name>@default</name>
    <message>
        <comment>ignored</comment>
        <source>Close</source>
        <translation>关闭</translation>
    </message>
</context>
</TS>"#;
        let catalog = TsReader::parse_str(doc).unwrap();
        assert_eq!(catalog.translate("@default", "Close"), "关闭");
    }

    #[test]
    fn test_parse_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{SAMPLE}").unwrap();

        let catalog = TsReader::parse_file(file.path()).unwrap();
        assert_eq!(catalog.language, "zh");
    }

    #[test]
    fn test_parse_file_error_names_the_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not xml at all").unwrap();

        let err = TsReader::parse_file(file.path()).unwrap_err();
        assert!(err
            .to_string()
            .contains(&file.path().display().to_string()));
    }
}
