//! Canonical pretty-printing for XHTML, SVG, OPF, and NCX files
//!
//! The layout rules are deliberately small:
//!
//! - the XML declaration, doctype, and root-level comments each get a line
//! - an element whose children are only block-level elements (no text, no
//!   phrasing elements) puts each child on its own line, indented with tabs
//! - anything with text or phrasing content is written inline; whitespace
//!   runs collapse to one space, or to a newline plus indentation when the
//!   run contained a line break and hard wrapping is kept
//! - block-level elements written inline have their edges trimmed
//! - `pre`, `script`, and `style` content is copied verbatim
//!
//! Running the formatter on its own output returns the same bytes.

use crate::error::SeError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::path::Path;

/// Elements that flow inline with text
const PHRASING_ELEMENTS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "br", "cite", "code", "data", "del", "dfn", "em", "i", "img",
    "ins", "kbd", "mark", "q", "rp", "rt", "ruby", "s", "samp", "small", "span", "strong", "sub",
    "sup", "time", "tspan", "u", "var", "wbr",
];

/// Elements whose content is never reformatted
const PRESERVED_ELEMENTS: &[&str] = &["pre", "script", "style"];

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Decl(String),
    Doctype(String),
    Pi(String),
    Comment(String),
    CData(String),
    Text(String),
    Element(Element),
}

#[derive(Debug, Clone, PartialEq)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
    self_closing: bool,
}

impl Element {
    fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    fn is_phrasing(&self) -> bool {
        PHRASING_ELEMENTS.contains(&self.local_name())
    }

    fn is_preserved(&self) -> bool {
        PRESERVED_ELEMENTS.contains(&self.local_name())
    }

    /// Whether children go one per line
    fn is_container(&self) -> bool {
        if self.is_preserved() {
            return false;
        }

        let mut has_structure = false;
        for child in &self.children {
            match child {
                Node::Text(text) if text.trim().is_empty() => {}
                Node::Element(element) if !element.is_phrasing() => has_structure = true,
                Node::Comment(_) | Node::Pi(_) => has_structure = true,
                _ => return false,
            }
        }
        has_structure
    }
}

/// Formatting switches
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Collapse hard-wrapped text onto single lines
    pub single_lines: bool,
}

fn utf8(bytes: &[u8]) -> Result<String, SeError> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| SeError::InvalidXhtml(format!("invalid UTF-8: {}", e)))
}

fn parse_start(start: &BytesStart<'_>, self_closing: bool) -> Result<Element, SeError> {
    let name = utf8(start.name().as_ref())?;
    let mut attributes = Vec::new();

    for attribute in start.attributes() {
        let attribute = attribute
            .map_err(|e| SeError::InvalidXhtml(format!("bad attribute in <{}>: {}", name, e)))?;
        let key = utf8(attribute.key.as_ref())?;
        // Single-quoted values may contain a raw double quote
        let value = utf8(&attribute.value)?.replace('"', "&quot;");
        attributes.push((key, value));
    }

    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
        self_closing,
    })
}

fn push_node(stack: &mut [Element], top_level: &mut Vec<Node>, node: Node) -> Result<(), SeError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => match node {
            Node::Text(text) if text.trim().is_empty() => {}
            Node::Text(text) | Node::CData(text) => {
                return Err(SeError::InvalidXhtml(format!(
                    "text outside of the root element: {}",
                    text.trim()
                )));
            }
            other => top_level.push(other),
        },
    }
    Ok(())
}

fn parse(xml: &str) -> Result<Vec<Node>, SeError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut top_level = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            SeError::InvalidXhtml(format!("{} at byte {}", e, reader.buffer_position()))
        })?;

        match event {
            Event::Start(start) => stack.push(parse_start(&start, false)?),
            Event::Empty(start) => {
                let element = parse_start(&start, true)?;
                push_node(&mut stack, &mut top_level, Node::Element(element))?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| SeError::InvalidXhtml("unexpected closing tag".to_string()))?;
                push_node(&mut stack, &mut top_level, Node::Element(element))?;
            }
            Event::Text(text) => push_node(&mut stack, &mut top_level, Node::Text(utf8(&text)?))?,
            Event::CData(data) => push_node(&mut stack, &mut top_level, Node::CData(utf8(&data)?))?,
            Event::Comment(comment) => {
                push_node(&mut stack, &mut top_level, Node::Comment(utf8(&comment)?))?
            }
            Event::Decl(decl) => top_level.push(Node::Decl(utf8(&decl)?)),
            Event::PI(pi) => push_node(&mut stack, &mut top_level, Node::Pi(utf8(&pi)?))?,
            Event::DocType(doctype) => top_level.push(Node::Doctype(utf8(&doctype)?)),
            Event::Eof => break,
        }
    }

    if let Some(open) = stack.last() {
        return Err(SeError::InvalidXhtml(format!("unclosed element <{}>", open.name)));
    }
    if !top_level.iter().any(|node| matches!(node, Node::Element(_))) {
        return Err(SeError::InvalidXhtml("no root element".to_string()));
    }

    Ok(top_level)
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push('\t');
    }
}

fn write_start_tag(out: &mut String, element: &Element) {
    out.push('<');
    out.push_str(&element.name);
    for (key, value) in &element.attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(value);
        out.push('"');
    }
    if element.self_closing {
        out.push_str("/>");
    } else {
        out.push('>');
    }
}

fn write_end_tag(out: &mut String, element: &Element) {
    if !element.self_closing {
        out.push_str("</");
        out.push_str(&element.name);
        out.push('>');
    }
}

fn normalize_whitespace(out: &mut String, text: &str, depth: usize, options: FormatOptions) {
    let mut run = String::new();

    let flush = |out: &mut String, run: &mut String| {
        if run.is_empty() {
            return;
        }
        if options.single_lines || !run.contains('\n') {
            out.push(' ');
        } else {
            out.push('\n');
            indent(out, depth + 1);
        }
        run.clear();
    };

    for c in text.chars() {
        if matches!(c, ' ' | '\t' | '\n' | '\r') {
            run.push(c);
        } else {
            flush(out, &mut run);
            out.push(c);
        }
    }
    flush(out, &mut run);
}

fn write_inline_node(out: &mut String, node: &Node, depth: usize, options: FormatOptions, verbatim: bool) {
    match node {
        Node::Text(text) if verbatim => out.push_str(text),
        Node::Text(text) => normalize_whitespace(out, text, depth, options),
        Node::Element(element) => {
            let verbatim = verbatim || element.is_preserved();
            write_start_tag(out, element);
            for child in &element.children {
                write_inline_node(out, child, depth, options, verbatim);
            }
            write_end_tag(out, element);
        }
        other => write_markup(out, other),
    }
}

fn write_markup(out: &mut String, node: &Node) {
    match node {
        Node::Decl(decl) => {
            out.push_str("<?");
            out.push_str(decl);
            out.push_str("?>");
        }
        Node::Pi(pi) => {
            out.push_str("<?");
            out.push_str(pi);
            out.push_str("?>");
        }
        Node::Doctype(doctype) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(doctype.trim());
            out.push('>');
        }
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
        Node::CData(data) => {
            out.push_str("<![CDATA[");
            out.push_str(data);
            out.push_str("]]>");
        }
        Node::Text(text) => out.push_str(text),
        Node::Element(_) => {}
    }
}

fn write_block(out: &mut String, element: &Element, depth: usize, options: FormatOptions) {
    indent(out, depth);
    write_start_tag(out, element);
    if element.self_closing {
        return;
    }

    if element.is_container() {
        out.push('\n');
        for child in &element.children {
            match child {
                Node::Text(_) => {}
                Node::Element(child) => {
                    write_block(out, child, depth + 1, options);
                    out.push('\n');
                }
                other => {
                    indent(out, depth + 1);
                    write_markup(out, other);
                    out.push('\n');
                }
            }
        }
        indent(out, depth);
    } else {
        let verbatim = element.is_preserved();
        let mut inline = String::new();
        for child in &element.children {
            write_inline_node(&mut inline, child, depth, options, verbatim);
        }
        if verbatim || element.is_phrasing() {
            out.push_str(&inline);
        } else {
            out.push_str(inline.trim_matches(|c| matches!(c, ' ' | '\t' | '\n' | '\r')));
        }
    }

    write_end_tag(out, element);
}

/// Pretty-print an XML document in canonical form
pub fn format_xhtml(xml: &str, options: FormatOptions) -> Result<String, SeError> {
    let nodes = parse(xml)?;
    let mut out = String::with_capacity(xml.len());

    for node in &nodes {
        match node {
            Node::Element(element) => write_block(&mut out, element, 0, options),
            other => write_markup(&mut out, other),
        }
        out.push('\n');
    }

    Ok(out)
}

/// Format a file in place, returning whether it changed
pub fn format_xhtml_file(path: &Path, options: FormatOptions) -> Result<bool, SeError> {
    let xml = crate::files::read_text(path)?;
    let formatted = format_xhtml(&xml, options).map_err(|e| match e {
        SeError::InvalidXhtml(message) => {
            SeError::InvalidXhtml(format!("{}: {}", path.display(), message))
        }
        other => other,
    })?;
    crate::files::write_if_changed(path, &xml, &formatted)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESSY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="en-US"><head><title>Chapter 1</title>
<link href="../css/core.css" rel="stylesheet" type="text/css"/></head>
<body><section id='chapter-1'>
  <p>   It was a   bright cold day in April, <i>and</i> the clocks
        were striking thirteen.  </p>
<p/>
<pre>  keep
   this </pre>
</section></body></html>"#;

    #[test]
    fn test_layout() {
        let formatted = format_xhtml(MESSY, FormatOptions::default()).unwrap();
        let expected = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
<html xmlns=\"http://www.w3.org/1999/xhtml\" xml:lang=\"en-US\">\n\
\t<head>\n\
\t\t<title>Chapter 1</title>\n\
\t\t<link href=\"../css/core.css\" rel=\"stylesheet\" type=\"text/css\"/>\n\
\t</head>\n\
\t<body>\n\
\t\t<section id=\"chapter-1\">\n\
\t\t\t<p>It was a bright cold day in April, <i>and</i> the clocks\n\
\t\t\t\twere striking thirteen.</p>\n\
\t\t\t<p/>\n\
\t\t\t<pre>  keep\n   this </pre>\n\
\t\t</section>\n\
\t</body>\n\
</html>\n";
        assert_eq!(formatted, expected);
    }

    #[test]
    fn test_fixed_point() {
        let once = format_xhtml(MESSY, FormatOptions::default()).unwrap();
        let twice = format_xhtml(&once, FormatOptions::default()).unwrap();
        assert_eq!(once, twice);

        let options = FormatOptions { single_lines: true };
        let once = format_xhtml(MESSY, options).unwrap();
        let twice = format_xhtml(&once, options).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_single_lines() {
        let formatted =
            format_xhtml(MESSY, FormatOptions { single_lines: true }).unwrap();
        assert!(formatted.contains("<i>and</i> the clocks were striking thirteen.</p>"));
    }

    #[test]
    fn test_phrasing_children_stay_inline() {
        let formatted =
            format_xhtml("<p><i>a</i><b>b</b></p>", FormatOptions::default()).unwrap();
        assert_eq!(formatted, "<p><i>a</i><b>b</b></p>\n");
    }

    #[test]
    fn test_doctype_and_comments() {
        let formatted = format_xhtml(
            "<!DOCTYPE html><!-- top --><html><body><!-- note --><p>x</p></body></html>",
            FormatOptions::default(),
        )
        .unwrap();
        assert_eq!(
            formatted,
            "<!DOCTYPE html>\n<!-- top -->\n<html>\n\t<body>\n\t\t<!-- note -->\n\t\t<p>x</p>\n\t</body>\n</html>\n"
        );
    }

    #[test]
    fn test_entities_are_untouched() {
        let formatted =
            format_xhtml("<p>Fish &amp; chips&#160;now</p>", FormatOptions::default()).unwrap();
        assert_eq!(formatted, "<p>Fish &amp; chips&#160;now</p>\n");
    }

    #[test]
    fn test_malformed_input() {
        let err = format_xhtml("<html><p>open</html>", FormatOptions::default()).unwrap_err();
        assert_eq!(err.code(), 1);

        assert!(format_xhtml("<html>", FormatOptions::default()).is_err());
        assert!(format_xhtml("just text", FormatOptions::default()).is_err());
    }
}
