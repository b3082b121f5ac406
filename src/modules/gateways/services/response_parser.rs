use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::modules::gateways::models::GatewayFields;

/// Root element names the gateway uses for otherwise identical payloads
pub const ACCEPTED_ROOTS: [&str; 2] = ["mwResponse", "Response"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("response body is not valid UTF-8")]
    InvalidEncoding,

    #[error("malformed XML: {0}")]
    Malformed(String),

    #[error("response has no root element")]
    MissingRoot,

    #[error("unexpected root element <{0}>")]
    UnexpectedRoot(String),
}

struct OpenElement {
    name: String,
    text: String,
    has_children: bool,
}

/// Decode a gateway response body into a flat field map.
///
/// Leaf elements below the root become `name -> text`; attributes of the
/// root and of every child are merged into the same map. Container
/// elements below the root are flattened, their leaves keep their own
/// names. Later duplicates overwrite earlier ones.
pub fn parse(raw_body: &[u8]) -> Result<GatewayFields, ParseError> {
    let body = std::str::from_utf8(raw_body).map_err(|_| ParseError::InvalidEncoding)?;
    let mut reader = Reader::from_str(body);

    let mut fields = GatewayFields::new();
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root_seen = false;
    let mut root_closed = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ParseError::Malformed(e.to_string()))?;

        match event {
            Event::Start(start) => {
                let name = element_name(&start)?;
                if stack.is_empty() {
                    open_root(&name, root_closed)?;
                    root_seen = true;
                } else if let Some(parent) = stack.last_mut() {
                    parent.has_children = true;
                }
                merge_attributes(&start, &mut fields)?;
                stack.push(OpenElement {
                    name,
                    text: String::new(),
                    has_children: false,
                });
            }
            Event::Empty(start) => {
                let name = element_name(&start)?;
                merge_attributes(&start, &mut fields)?;
                match stack.last_mut() {
                    None => {
                        open_root(&name, root_closed)?;
                        root_seen = true;
                        root_closed = true;
                    }
                    Some(parent) => {
                        parent.has_children = true;
                        fields.insert(name, String::new());
                    }
                }
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| ParseError::Malformed(e.to_string()))?;
                match stack.last_mut() {
                    Some(open) => open.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => {
                        return Err(ParseError::Malformed(
                            "text outside of the root element".to_string(),
                        ))
                    }
                }
            }
            Event::CData(data) => {
                let data = data.into_inner();
                let text = std::str::from_utf8(&data).map_err(|_| ParseError::InvalidEncoding)?;
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(text);
                }
            }
            Event::End(_) => {
                let closed = stack.pop().ok_or_else(|| {
                    ParseError::Malformed("closing tag without opening tag".to_string())
                })?;
                if stack.is_empty() {
                    root_closed = true;
                } else if !closed.has_children {
                    fields.insert(closed.name, closed.text.trim().to_string());
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::Malformed(format!(
            "element <{}> is never closed",
            open.name
        )));
    }

    if !root_seen {
        return Err(ParseError::MissingRoot);
    }

    Ok(fields)
}

fn open_root(name: &str, root_closed: bool) -> Result<(), ParseError> {
    if root_closed {
        return Err(ParseError::Malformed(
            "more than one root element".to_string(),
        ));
    }
    if !ACCEPTED_ROOTS.contains(&name) {
        return Err(ParseError::UnexpectedRoot(name.to_string()));
    }
    Ok(())
}

fn element_name(start: &BytesStart<'_>) -> Result<String, ParseError> {
    std::str::from_utf8(start.name().as_ref())
        .map(str::to_string)
        .map_err(|_| ParseError::InvalidEncoding)
}

fn merge_attributes(start: &BytesStart<'_>, fields: &mut GatewayFields) -> Result<(), ParseError> {
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| ParseError::Malformed(e.to_string()))?;
        let key = std::str::from_utf8(attribute.key.as_ref())
            .map_err(|_| ParseError::InvalidEncoding)?
            .to_string();
        let value = attribute
            .unescape_value()
            .map_err(|e| ParseError::Malformed(e.to_string()))?;
        fields.insert(key, value.into_owned());
    }
    Ok(())
}
