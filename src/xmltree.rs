//! A small namespace-aware element tree built on `quick_xml`.
//!
//! Building the tree is the well-formedness check for an upload: anything
//! the reader rejects, plus unclosed elements, stray top-level text and
//! missing or duplicate roots, comes back as [`TcxError::Parse`].

use crate::TcxError;
use quick_xml::NsReader;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    namespace: Option<String>,
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    fn open(
        namespace: Option<String>,
        start: &BytesStart<'_>,
        position: u64,
    ) -> Result<Self, TcxError> {
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| TcxError::parse(position, e.to_string()))?;
            let key = attr.key.as_ref();
            if key == b"xmlns" || key.starts_with(b"xmlns:") {
                continue;
            }
            let raw = std::str::from_utf8(&attr.value)
                .map_err(|e| TcxError::parse(position, e.to_string()))?;
            let value = unescape(raw)
                .map_err(|e| TcxError::parse(position, e.to_string()))?;
            attributes.push((
                String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned(),
                value.into_owned(),
            ));
        }

        Ok(Element {
            namespace,
            name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            attributes,
            children: Vec::new(),
            text: String::new(),
        })
    }

    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.name == name
    }

    /// Looks up an attribute by local name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Character data directly inside this element, trimmed.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// First direct child with the given qualified name.
    pub fn child(&self, namespace: &str, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.is(namespace, name))
    }

    /// All matching elements below this one, in document order.
    pub fn descendants<'a>(
        &'a self,
        namespace: &'a str,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        walk(self.children.iter().rev().collect(), namespace, name)
    }
}

/// Pre-order traversal over `pending`, which is consumed from the back.
fn walk<'a>(
    mut pending: Vec<&'a Element>,
    namespace: &'a str,
    name: &'a str,
) -> impl Iterator<Item = &'a Element> + 'a {
    std::iter::from_fn(move || {
        while let Some(element) = pending.pop() {
            pending.extend(element.children.iter().rev());
            if element.is(namespace, name) {
                return Some(element);
            }
        }
        None
    })
}

/// Deepest element nesting accepted by [`Document::parse`].
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn parse(input: &[u8]) -> Result<Self, TcxError> {
        let mut reader = NsReader::from_reader(input);
        let mut buf = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let result = reader
                .read_resolved_event_into(&mut buf)
                .map(|(ns, event)| (resolved_namespace(ns), event.into_owned()));
            let position = reader.buffer_position() as u64;
            let (namespace, event) = match result {
                Ok(resolved) => resolved,
                Err(e) => return Err(TcxError::parse(position, e.to_string())),
            };

            match event {
                Event::Start(ref e) => {
                    if stack.len() >= MAX_DEPTH {
                        return Err(TcxError::parse(position, "elements nested too deeply"));
                    }
                    let namespace = namespace.map_err(|msg| TcxError::parse(position, msg))?;
                    stack.push(Element::open(namespace, e, position)?);
                }

                Event::Empty(ref e) => {
                    let namespace = namespace.map_err(|msg| TcxError::parse(position, msg))?;
                    let element = Element::open(namespace, e, position)?;
                    attach(&mut stack, &mut root, element, position)?;
                }

                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| TcxError::parse(position, "unexpected closing tag"))?;
                    attach(&mut stack, &mut root, element, position)?;
                }

                Event::Text(ref e) => {
                    let text = std::str::from_utf8(e)
                        .map_err(|e| TcxError::parse(position, e.to_string()))?;
                    append_text(&mut stack, text, position)?;
                }

                Event::CData(ref e) => {
                    let text = std::str::from_utf8(e)
                        .map_err(|e| TcxError::parse(position, e.to_string()))?;
                    append_text(&mut stack, text, position)?;
                }

                Event::GeneralRef(ref e) => {
                    let name = std::str::from_utf8(e)
                        .map_err(|e| TcxError::parse(position, e.to_string()))?;
                    let resolved = resolve_reference(name).ok_or_else(|| {
                        TcxError::parse(position, format!("unknown entity reference &{name};"))
                    })?;
                    append_text(&mut stack, &resolved, position)?;
                }

                Event::Eof => break,

                _ => {}
            }

            buf.clear();
        }

        let position = reader.buffer_position() as u64;
        if let Some(open) = stack.last() {
            return Err(TcxError::parse(
                position,
                format!("unexpected end of input inside <{}>", open.name),
            ));
        }

        let root = root.ok_or_else(|| TcxError::parse(position, "no root element found"))?;
        debug!(root = %root.name, "parsed XML document");
        Ok(Document { root })
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// All matching elements in the document, the root included, in document order.
    pub fn descendants<'a>(
        &'a self,
        namespace: &'a str,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        walk(vec![&self.root], namespace, name)
    }
}

fn resolved_namespace(ns: ResolveResult<'_>) -> Result<Option<String>, String> {
    match ns {
        ResolveResult::Bound(Namespace(uri)) => Ok(Some(String::from_utf8_lossy(uri).into_owned())),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(format!(
            "unknown namespace prefix '{}'",
            String::from_utf8_lossy(&prefix)
        )),
    }
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
    position: u64,
) -> Result<(), TcxError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(TcxError::parse(position, "multiple root elements"));
    }
    *root = Some(element);
    Ok(())
}

fn append_text(stack: &mut [Element], text: &str, position: u64) -> Result<(), TcxError> {
    match stack.last_mut() {
        Some(current) => {
            current.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(TcxError::parse(position, "text outside the root element")),
    }
}

fn resolve_reference(name: &str) -> Option<String> {
    if let Some(code) = name.strip_prefix('#') {
        let value = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => code.parse().ok()?,
        };
        return char::from_u32(value).map(String::from);
    }
    resolve_predefined_entity(name).map(str::to_owned)
}
