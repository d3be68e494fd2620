use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

use super::SourceString;
use crate::catalog::Location;

/// Scanner for Qt Designer .ui files.
///
/// Every `<string>` element is a translatable UI string unless marked
/// `notr="true"`. The context is the root widget's `name` attribute, which
/// is where a catalog's dialog contexts (e.g. `Dialog`) come from.
pub struct UiParser;

impl UiParser {
    /// Scan a .ui file. `rel_path` is the path recorded in location hints.
    pub fn parse_file(path: &Path, rel_path: &Path) -> Result<Vec<SourceString>> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        Self::parse_str(&content, rel_path)
    }

    /// Scan .ui XML text
    pub fn parse_str(content: &str, rel_path: &Path) -> Result<Vec<SourceString>> {
        let mut reader = Reader::from_str(content);
        reader.trim_text(false);

        let mut context: Option<String> = None;
        let mut strings = Vec::new();

        loop {
            let event_start = reader.buffer_position();
            match reader.read_event() {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"widget" if context.is_none() => {
                        // The first widget is the root; its object name is
                        // the translation context for the whole file
                        if let Some(attr) = e
                            .try_get_attribute("name")
                            .map_err(|e| anyhow!("bad widget attribute: {e}"))?
                        {
                            context = Some(
                                attr.unescape_value()
                                    .map_err(|e| anyhow!("bad widget name: {e}"))?
                                    .into_owned(),
                            );
                        }
                    }
                    b"string" => {
                        let notr = e
                            .try_get_attribute("notr")
                            .map_err(|e| anyhow!("bad string attribute: {e}"))?
                            .map(|attr| attr.value.as_ref() == b"true")
                            .unwrap_or(false);

                        let line = line_of(content, event_start);
                        let text = read_string_text(&mut reader)?;

                        if !notr && !text.is_empty() {
                            let context = context
                                .clone()
                                .unwrap_or_else(|| fallback_context(rel_path));
                            strings.push(SourceString {
                                context,
                                text,
                                location: Location::new(rel_path, line),
                            });
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(anyhow!(
                        "XML error in {} at position {}: {}",
                        rel_path.display(),
                        reader.buffer_position(),
                        e
                    ))
                }
            }
        }

        Ok(strings)
    }
}

fn read_string_text(reader: &mut Reader<&[u8]>) -> Result<String> {
    let mut text = String::new();
    loop {
        match reader.read_event() {
            Ok(Event::Text(t)) => {
                text.push_str(&t.unescape().map_err(|e| anyhow!("bad text: {e}"))?);
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"string" => break,
            Ok(Event::Eof) => return Err(anyhow!("unexpected end of document in <string>")),
            Ok(_) => {}
            Err(e) => return Err(anyhow!("bad <string> element: {e}")),
        }
    }
    Ok(text)
}

/// 1-indexed line of the byte offset `pos` in `content`
fn line_of(content: &str, pos: usize) -> u32 {
    let clamped = pos.min(content.len());
    (content.as_bytes()[..clamped].iter().filter(|&&b| b == b'\n').count() + 1) as u32
}

fn fallback_context(rel_path: &Path) -> String {
    rel_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Form".to_string())
}
