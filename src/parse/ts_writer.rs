use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs;
use std::path::Path;

use crate::catalog::{Catalog, Message};
use crate::error::{CatalogError, Result};

/// Writer emitting the canonical Qt Linguist .ts layout: XML declaration,
/// `TS` doctype, 4-space indent, location before source before translation
pub struct TsWriter;

impl TsWriter {
    /// Serialize a catalog and write it to disk
    pub fn write_file(catalog: &Catalog, path: &Path) -> Result<()> {
        let content = Self::to_string(catalog)?;
        fs::write(path, content).map_err(|e| CatalogError::WriteError {
            file: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Serialize a catalog to a .ts document string
    pub fn to_string(catalog: &Catalog) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);

        write_event(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        write_event(&mut writer, Event::DocType(BytesText::from_escaped("TS")))?;

        let mut ts = BytesStart::new("TS");
        if !catalog.version.is_empty() {
            ts.push_attribute(("version", catalog.version.as_str()));
        }
        if !catalog.language.is_empty() {
            ts.push_attribute(("language", catalog.language.as_str()));
        }
        if !catalog.source_language.is_empty() {
            ts.push_attribute(("sourcelanguage", catalog.source_language.as_str()));
        }
        write_event(&mut writer, Event::Start(ts))?;

        for ctx in &catalog.contexts {
            write_event(&mut writer, Event::Start(BytesStart::new("context")))?;

            write_event(&mut writer, Event::Start(BytesStart::new("name")))?;
            write_event(&mut writer, Event::Text(BytesText::new(&ctx.name)))?;
            write_event(&mut writer, Event::End(BytesEnd::new("name")))?;

            for msg in &ctx.messages {
                write_message(&mut writer, msg)?;
            }

            write_event(&mut writer, Event::End(BytesEnd::new("context")))?;
        }

        write_event(&mut writer, Event::End(BytesEnd::new("TS")))?;

        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        Ok(String::from_utf8(bytes)?)
    }
}

fn write_message(writer: &mut Writer<Vec<u8>>, msg: &Message) -> Result<()> {
    write_event(writer, Event::Start(BytesStart::new("message")))?;

    for loc in &msg.locations {
        let mut location = BytesStart::new("location");
        location.push_attribute(("filename", loc.filename.to_string_lossy().as_ref()));
        location.push_attribute(("line", loc.line.to_string().as_str()));
        write_event(writer, Event::Empty(location))?;
    }

    write_event(writer, Event::Start(BytesStart::new("source")))?;
    write_event(writer, Event::Text(BytesText::new(&msg.source)))?;
    write_event(writer, Event::End(BytesEnd::new("source")))?;

    let mut translation = BytesStart::new("translation");
    if let Some(type_attr) = msg.status.type_attr() {
        translation.push_attribute(("type", type_attr));
    }
    if msg.translation.is_empty() {
        write_event(writer, Event::Empty(translation))?;
    } else {
        write_event(writer, Event::Start(translation))?;
        write_event(writer, Event::Text(BytesText::new(&msg.translation)))?;
        write_event(writer, Event::End(BytesEnd::new("translation")))?;
    }

    write_event(writer, Event::End(BytesEnd::new("message")))?;
    Ok(())
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| CatalogError::Generic(format!("Failed to serialize catalog: {e}")))
}
