//! Substitution engine for `.docx` templates.
//!
//! Tags are `{{ name }}` where `name` is an identifier; the value is looked up
//! by exact, case-sensitive key. Case and prefix variants are handled before
//! this point by alias expansion, not here.
//!
//! Substitution works on the flattened text of each paragraph. When Word has
//! split a tag over several runs, the value is written into the run where the
//! tag starts and the rest of the tag is cut from the runs that follow, so
//! every other run keeps its formatting.

use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::docx::{DOCUMENT_PART, DocxError, DocxPackage};
use crate::vars::ExpandedAnswerMap;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\{([^{}]*)\}\}").unwrap());

static IDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Document(#[from] DocxError),

    #[error("undefined variable '{name}' in {part}")]
    UndefinedVariable { name: String, part: String },

    #[error("malformed tag '{tag}' in {part}")]
    MalformedTag { tag: String, part: String },
}

fn xml_error(part: &str, err: &dyn std::fmt::Display) -> RenderError {
    RenderError::Document(DocxError::Xml { part: part.to_string(), message: err.to_string() })
}

/// How tags without a matching answer are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedPolicy {
    /// Leave the tag text in the output.
    #[default]
    Keep,
    /// Replace the tag with nothing.
    Blank,
    /// Fail the render. Malformed tags fail too.
    Strict,
}

/// Renders a template file with a set of answers into new document bytes.
pub trait TemplateRenderer {
    fn render(
        &self,
        template: &Path,
        answers: &ExpandedAnswerMap,
    ) -> Result<Vec<u8>, RenderError>;
}

/// Built-in renderer for WordprocessingML packages.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxRenderer {
    pub undefined: UndefinedPolicy,
}

impl DocxRenderer {
    pub fn new(undefined: UndefinedPolicy) -> Self {
        Self { undefined }
    }

    /// Render one XML part.
    pub fn render_part(
        &self,
        part: &str,
        xml: &[u8],
        answers: &ExpandedAnswerMap,
    ) -> Result<Vec<u8>, RenderError> {
        let xml = std::str::from_utf8(xml).map_err(|e| xml_error(part, &e))?;
        let xml_err = |e: &dyn std::fmt::Display| xml_error(part, e);

        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;
        let mut writer = Writer::new(Vec::with_capacity(xml.len()));

        // One entry per paragraph currently open; nested paragraphs (text
        // boxes) are rendered first and kept opaque inside their host.
        let mut open: Vec<Vec<Item<'_>>> = Vec::new();

        let is_paragraph = |name: &[u8]| name == b"w:p";
        loop {
            let event = reader.read_event().map_err(|e| xml_err(&e))?;
            let step = match &event {
                Event::Eof => break,
                Event::Start(e) if is_paragraph(e.name().as_ref()) => Step::Open,
                Event::End(e) if is_paragraph(e.name().as_ref()) => Step::Close,
                _ => Step::Pass,
            };

            match step {
                Step::Open => open.push(vec![Item::Event(event)]),
                Step::Close => {
                    let mut items = open
                        .pop()
                        .ok_or_else(|| xml_err(&"closing w:p without opening tag"))?;
                    items.push(Item::Event(event));
                    let rendered = self.render_paragraph(items, part, answers)?;
                    match open.last_mut() {
                        Some(host) => host.push(Item::Nested(rendered)),
                        None => {
                            for e in rendered {
                                writer.write_event(e).map_err(|e| xml_err(&e))?;
                            }
                        }
                    }
                }
                Step::Pass => match open.last_mut() {
                    Some(paragraph) => paragraph.push(Item::Event(event)),
                    None => writer.write_event(event).map_err(|e| xml_err(&e))?,
                },
            }
        }

        if !open.is_empty() {
            return Err(xml_err(&"unclosed w:p at end of part"));
        }
        Ok(writer.into_inner())
    }

    fn render_paragraph<'a>(
        &self,
        items: Vec<Item<'a>>,
        part: &str,
        answers: &ExpandedAnswerMap,
    ) -> Result<Vec<Event<'a>>, RenderError> {
        let elements = text_elements(&items, part)?;
        let original: Vec<String> = elements.iter().map(|t| t.text.clone()).collect();
        let mut segments = original.clone();

        if !substitute_segments(&mut segments, answers, self.undefined, part)? {
            return Ok(flatten(items));
        }

        let mut out = Vec::with_capacity(items.len());
        let mut next = 0;
        for (index, item) in items.into_iter().enumerate() {
            if let Some(element) = elements.get(next)
                && index >= element.start
            {
                let changed = segments[next] != original[next];
                if index == element.start && changed {
                    out.push(Event::Start(preserved_text_start()));
                    if !segments[next].is_empty() {
                        out.push(Event::Text(BytesText::new(&segments[next]).into_owned()));
                    }
                    out.push(Event::End(BytesEnd::new("w:t")));
                }
                if index == element.end {
                    next += 1;
                }
                if changed {
                    continue;
                }
            }
            match item {
                Item::Event(e) => out.push(e),
                Item::Nested(events) => out.extend(events),
            }
        }
        Ok(out)
    }
}

impl TemplateRenderer for DocxRenderer {
    fn render(
        &self,
        template: &Path,
        answers: &ExpandedAnswerMap,
    ) -> Result<Vec<u8>, RenderError> {
        let mut package = DocxPackage::open(template)?;
        debug!("Rendering {} with {} answers", template.display(), answers.len());
        package.rewrite(is_renderable_part, |name, xml| self.render_part(name, xml, answers))
    }
}

/// Parts whose text is rendered: the body, headers and footers.
pub fn is_renderable_part(name: &str) -> bool {
    name == DOCUMENT_PART
        || ((name.starts_with("word/header") || name.starts_with("word/footer"))
            && name.ends_with(".xml"))
}

/// Render the tags of a single string.
pub fn render_string(
    text: &str,
    answers: &ExpandedAnswerMap,
    undefined: UndefinedPolicy,
) -> Result<String, RenderError> {
    let mut segments = vec![text.to_string()];
    substitute_segments(&mut segments, answers, undefined, "text")?;
    Ok(segments.remove(0))
}

enum Step {
    Open,
    Close,
    Pass,
}

enum Item<'a> {
    Event(Event<'a>),
    /// An already-rendered nested paragraph.
    Nested(Vec<Event<'a>>),
}

/// A `w:t` element directly inside the paragraph being rendered.
struct TextElement {
    /// Item index of the opening (or empty) tag.
    start: usize,
    /// Item index of the closing tag; equals `start` for `<w:t/>`.
    end: usize,
    text: String,
}

fn text_elements(items: &[Item<'_>], part: &str) -> Result<Vec<TextElement>, RenderError> {
    let mut elements = Vec::new();
    let mut current: Option<TextElement> = None;

    for (index, item) in items.iter().enumerate() {
        let Item::Event(event) = item else { continue };
        match event {
            Event::Start(e) if e.name().as_ref() == b"w:t" => {
                current = Some(TextElement { start: index, end: index, text: String::new() });
            }
            Event::Empty(e) if e.name().as_ref() == b"w:t" => {
                elements.push(TextElement { start: index, end: index, text: String::new() });
            }
            Event::Text(e) => {
                if let Some(element) = current.as_mut() {
                    let text = e.unescape().map_err(|err| xml_error(part, &err))?;
                    element.text.push_str(&text);
                }
            }
            Event::End(e) if e.name().as_ref() == b"w:t" => {
                if let Some(mut element) = current.take() {
                    element.end = index;
                    elements.push(element);
                }
            }
            _ => {}
        }
    }
    Ok(elements)
}

fn preserved_text_start() -> BytesStart<'static> {
    let mut start = BytesStart::new("w:t");
    start.push_attribute(("xml:space", "preserve"));
    start
}

fn flatten(items: Vec<Item<'_>>) -> Vec<Event<'_>> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Item::Event(e) => out.push(e),
            Item::Nested(events) => out.extend(events),
        }
    }
    out
}

/// Replace tags across consecutive text segments.
///
/// Returns whether any segment changed.
fn substitute_segments(
    segments: &mut [String],
    answers: &ExpandedAnswerMap,
    undefined: UndefinedPolicy,
    part: &str,
) -> Result<bool, RenderError> {
    let full = segments.concat();
    if !full.contains("{{") {
        return Ok(false);
    }

    let mut replacements: Vec<(Range<usize>, String)> = Vec::new();
    for caps in TAG_RE.captures_iter(&full) {
        let Some(whole) = caps.get(0) else { continue };
        let name = caps[1].trim();

        if !IDENT_RE.is_match(name) {
            if undefined == UndefinedPolicy::Strict {
                return Err(RenderError::MalformedTag {
                    tag: whole.as_str().to_string(),
                    part: part.to_string(),
                });
            }
            continue;
        }

        let value = match (answers.get(name), undefined) {
            (Some(value), _) => value.clone(),
            (None, UndefinedPolicy::Keep) => {
                warn!("No answer for '{name}' in {part}, leaving tag in place");
                continue;
            }
            (None, UndefinedPolicy::Blank) => {
                warn!("No answer for '{name}' in {part}, leaving it blank");
                String::new()
            }
            (None, UndefinedPolicy::Strict) => {
                return Err(RenderError::UndefinedVariable {
                    name: name.to_string(),
                    part: part.to_string(),
                });
            }
        };
        replacements.push((whole.range(), value));
    }

    if undefined == UndefinedPolicy::Strict {
        let stripped = TAG_RE.replace_all(&full, "");
        if let Some(pos) = stripped.find("{{") {
            let tag: String = stripped[pos..].chars().take(24).collect();
            return Err(RenderError::MalformedTag { tag, part: part.to_string() });
        }
    }

    if replacements.is_empty() {
        return Ok(false);
    }

    let mut starts = Vec::with_capacity(segments.len());
    let mut offset = 0;
    for segment in segments.iter() {
        starts.push(offset);
        offset += segment.len();
    }
    let lens: Vec<usize> = segments.iter().map(String::len).collect();
    let count = segments.len();
    let locate = |pos: usize| {
        (0..count).find(|&i| starts[i] <= pos && pos < starts[i] + lens[i]).unwrap_or(0)
    };

    // Back to front, so earlier offsets stay valid.
    for (range, value) in replacements.into_iter().rev() {
        let first = locate(range.start);
        let last = locate(range.end - 1);
        let head = range.start - starts[first];
        let tail = range.end - starts[last];

        if first == last {
            segments[first].replace_range(head..tail, &value);
        } else {
            segments[last].replace_range(..tail, "");
            for segment in &mut segments[first + 1..last] {
                segment.clear();
            }
            segments[first].truncate(head);
            segments[first].push_str(&value);
        }
    }

    Ok(true)
}
