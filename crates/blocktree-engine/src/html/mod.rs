//! HTML bridge: export of the document tree and import of pasted
//! fragments.
//!
//! Export nests mark tags in a fixed order (code innermost, then bold,
//! italic, strikethrough, underline) so equal mark sets always serialize
//! identically. Import maps the common clipboard tags and passes unknown
//! elements through transparently; `<b>` is deliberately not mapped to
//! bold because Google Docs wraps whole documents in a normal-weight
//! `<b>`.

pub mod dom;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::model::{
    ElementKind, ElementNode, HeadingLevel, ListKind, Mark, MarkSet, Node, TextNode,
};
use dom::DomNode;

// Export

pub fn serialize(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        serialize_node(node, &mut out);
    }
    out
}

fn serialize_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(t) => out.push_str(&text_html(t)),
        Node::Element(el) => element_html(el, out),
    }
}

fn text_html(t: &TextNode) -> String {
    let mut html = encode_text(&t.text).to_string();
    for mark in Mark::ALL {
        if !t.marks.contains(mark) {
            continue;
        }
        html = match mark {
            Mark::Code => format!("<code>{html}</code>"),
            Mark::Bold => format!("<strong>{html}</strong>"),
            Mark::Italic => format!("<em>{html}</em>"),
            Mark::Strikethrough => {
                format!("<span style=\"text-decoration: line-through\">{html}</span>")
            }
            Mark::Underline => format!("<u>{html}</u>"),
        };
    }
    html
}

fn children_html(el: &ElementNode) -> String {
    let mut out = String::new();
    for child in &el.children {
        serialize_node(child, &mut out);
    }
    out
}

fn element_html(el: &ElementNode, out: &mut String) {
    match &el.kind {
        ElementKind::Paragraph => {
            out.push_str(&format!("<p>{}</p>", children_html(el)));
        }
        ElementKind::Heading { level } => {
            let rank = level.rank();
            out.push_str(&format!("<h{rank}>{}</h{rank}>", children_html(el)));
        }
        ElementKind::CodeBlock { lang } => {
            if lang.is_empty() {
                out.push_str("<pre>");
            } else {
                out.push_str(&format!(
                    "<pre lang=\"{}\">",
                    encode_double_quoted_attribute(lang)
                ));
            }
            for line in &el.children {
                out.push_str(&format!("<code>{}</code>", encode_text(&line.string())));
            }
            out.push_str("</pre>");
        }
        ElementKind::CodeLine => {
            let flat: String = el.children.iter().map(Node::string).collect();
            out.push_str(&format!("<code>{}</code>", encode_text(&flat)));
        }
        ElementKind::Note { .. } | ElementKind::BlockQuote => {
            out.push_str(&format!("<blockquote>{}</blockquote>", children_html(el)));
        }
        ElementKind::List { kind } => {
            let tag = match kind {
                ListKind::Bulleted => "ul",
                ListKind::Numbered => "ol",
            };
            out.push_str(&format!("<{tag}>"));
            for item in &el.children {
                match item {
                    Node::Element(item_el) => {
                        out.push_str(&format!("<li>{}</li>", children_html(item_el)));
                    }
                    Node::Text(t) => out.push_str(&format!("<li>{}</li>", text_html(t))),
                }
            }
            out.push_str(&format!("</{tag}>"));
        }
        ElementKind::ListItem { .. } => {
            out.push_str(&format!("<li>{}</li>", children_html(el)));
        }
        ElementKind::Hr => out.push_str("<hr />"),
        ElementKind::Image { url } => {
            out.push_str(&format!(
                "<img src=\"{}\" alt=\"\" />",
                encode_double_quoted_attribute(url)
            ));
        }
        ElementKind::Link { url } => {
            out.push_str(&format!(
                "<a href=\"{}\">{}</a>",
                encode_double_quoted_attribute(url),
                children_html(el)
            ));
        }
    }
}

// Import

/// Converts an HTML fragment into document nodes ready for
/// `insert_fragment`.
pub fn deserialize(input: &str) -> Vec<Node> {
    let dom = dom::parse_fragment(input);
    let mut out = Vec::new();
    for node in &dom {
        convert(node, MarkSet::default(), &mut out);
    }
    out
}

fn convert(node: &DomNode, marks: MarkSet, out: &mut Vec<Node>) {
    match node {
        DomNode::Text(text) => {
            if !text.is_empty() {
                out.push(Node::marked_text(text.clone(), marks));
            }
        }
        DomNode::Element { name, children, .. } => {
            convert_element(node, name, children, marks, out)
        }
    }
}

fn convert_element(
    node: &DomNode,
    name: &str,
    children: &[DomNode],
    marks: MarkSet,
    out: &mut Vec<Node>,
) {
    match name {
        "strong" => convert_marked(children, marks.with(Mark::Bold), out),
        "em" | "i" => convert_marked(children, marks.with(Mark::Italic), out),
        "code" => convert_marked(children, marks.with(Mark::Code), out),
        "s" | "del" | "strike" => convert_marked(children, marks.with(Mark::Strikethrough), out),
        "u" => convert_marked(children, marks.with(Mark::Underline), out),
        "span" => {
            let style = node.attr("style").unwrap_or_default();
            let mut marks = marks;
            if style.contains("line-through") {
                marks.insert(Mark::Strikethrough);
            }
            if style.contains("underline") {
                marks.insert(Mark::Underline);
            }
            convert_marked(children, marks, out);
        }
        "a" => {
            let url = node.attr("href").unwrap_or_default().to_string();
            let mut inner = Vec::new();
            convert_marked(children, marks, &mut inner);
            let texts: Vec<Node> = inner.into_iter().filter(Node::is_text).collect();
            out.push(Node::element(
                ElementKind::Link { url },
                ensure_text(texts),
            ));
        }
        "p" | "div" => {
            let inner = convert_children(children, marks);
            if inner.iter().any(is_block) {
                // a block nested in a paragraph flattens to its blocks
                out.extend(group_blocks(inner));
            } else {
                out.push(Node::paragraph(ensure_text(inner)));
            }
        }
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = match name {
                "h1" => HeadingLevel::H1,
                "h2" => HeadingLevel::H2,
                "h3" => HeadingLevel::H3,
                "h4" => HeadingLevel::H4,
                _ => HeadingLevel::H5,
            };
            let inner = convert_children(children, marks);
            let texts = inner.into_iter().filter(|n| !is_block(n)).collect();
            out.push(Node::element(
                ElementKind::Heading { level },
                ensure_text(texts),
            ));
        }
        "br" => out.push(Node::empty_paragraph()),
        "hr" => out.push(Node::element(ElementKind::Hr, vec![Node::text("")])),
        "img" => {
            let url = node.attr("src").unwrap_or_default().to_string();
            out.push(Node::element(
                ElementKind::Image { url },
                vec![Node::text("")],
            ));
        }
        "pre" => out.push(convert_pre(node, children)),
        "blockquote" => {
            let inner = convert_children(children, marks);
            let blocks = group_blocks(inner);
            let blocks = if blocks.is_empty() {
                vec![Node::empty_paragraph()]
            } else {
                blocks
            };
            out.push(Node::element(ElementKind::BlockQuote, blocks));
        }
        "ul" | "ol" => {
            let kind = if name == "ul" {
                ListKind::Bulleted
            } else {
                ListKind::Numbered
            };
            let mut items = Vec::new();
            collect_items(children, 0, kind, &mut items);
            if !items.is_empty() {
                out.push(Node::element(ElementKind::List { kind }, items));
            }
        }
        // <b> stays unmapped: Google Docs wraps entire documents in a
        // normal-weight <b>
        _ => convert_marked(children, marks, out),
    }
}

fn convert_marked(children: &[DomNode], marks: MarkSet, out: &mut Vec<Node>) {
    for child in children {
        convert(child, marks, out);
    }
}

fn convert_children(children: &[DomNode], marks: MarkSet) -> Vec<Node> {
    let mut out = Vec::new();
    convert_marked(children, marks, &mut out);
    out
}

fn is_block(node: &Node) -> bool {
    node.kind().map(|kind| !kind.is_inline()).unwrap_or(false)
}

fn ensure_text(nodes: Vec<Node>) -> Vec<Node> {
    if nodes.is_empty() {
        vec![Node::text("")]
    } else {
        nodes
    }
}

/// Splits a mixed child list into blocks, wrapping runs of loose inline
/// content in paragraphs.
fn group_blocks(nodes: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::new();
    let mut run: Vec<Node> = Vec::new();
    for node in nodes {
        if is_block(&node) {
            if run.iter().any(|n| !n.string().is_empty()) {
                out.push(Node::paragraph(std::mem::take(&mut run)));
            } else {
                run.clear();
            }
            out.push(node);
        } else {
            run.push(node);
        }
    }
    if run.iter().any(|n| !n.string().is_empty()) {
        out.push(Node::paragraph(run));
    }
    out
}

fn convert_pre(node: &DomNode, children: &[DomNode]) -> Node {
    let mut lang = node
        .attr("lang")
        .or_else(|| node.attr("data-lang"))
        .unwrap_or_default()
        .to_string();
    let code_children: Vec<&DomNode> = children
        .iter()
        .filter(|child| matches!(child, DomNode::Element { name, .. } if name == "code"))
        .collect();
    if lang.is_empty() {
        if let Some(class) = code_children.first().and_then(|c| c.attr("class")) {
            if let Some(tag) = class
                .split_whitespace()
                .find_map(|c| c.strip_prefix("language-"))
            {
                lang = tag.to_string();
            }
        }
    }
    let lines: Vec<String> = if code_children.len() > 1 {
        code_children.iter().map(|c| c.text_content()).collect()
    } else {
        node.text_content().split('\n').map(str::to_string).collect()
    };
    let line_nodes = lines
        .into_iter()
        .map(|line| Node::element(ElementKind::CodeLine, vec![Node::text(line)]))
        .collect();
    Node::element(ElementKind::CodeBlock { lang }, line_nodes)
}

fn collect_items(children: &[DomNode], level: usize, kind: ListKind, items: &mut Vec<Node>) {
    for child in children {
        let DomNode::Element {
            name,
            children: li_children,
            ..
        } = child
        else {
            continue;
        };
        match name.as_str() {
            "li" => {
                let mut inline = Vec::new();
                let mut nested: Vec<&DomNode> = Vec::new();
                for c in li_children {
                    match c {
                        DomNode::Element { name, .. } if name == "ul" || name == "ol" => {
                            nested.push(c);
                        }
                        _ => convert(c, MarkSet::default(), &mut inline),
                    }
                }
                let inline = inline.into_iter().filter(|n| !is_block(n)).collect();
                items.push(Node::element(
                    ElementKind::ListItem {
                        level,
                        list: kind,
                        number: None,
                    },
                    ensure_text(inline),
                ));
                for list in nested {
                    if let DomNode::Element { children, .. } = list {
                        collect_items(children, level + 1, kind, items);
                    }
                }
            }
            // a nested list not inside an <li>
            "ul" | "ol" => collect_items(li_children, level + 1, kind, items),
            _ => {}
        }
    }
}
