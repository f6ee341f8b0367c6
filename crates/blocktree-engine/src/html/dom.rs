//! Small HTML fragment parser for paste import.
//!
//! This is not a conforming HTML parser: it tokenizes tags, keeps a stack
//! of open elements, and recovers from the usual clipboard sloppiness
//! (unclosed tags, stray closers, doctype and comment noise). Script and
//! style content is dropped wholesale.

use html_escape::decode_html_entities;

#[derive(Debug, Clone, PartialEq)]
pub enum DomNode {
    Element {
        name: String,
        attrs: Vec<(String, String)>,
        children: Vec<DomNode>,
    },
    Text(String),
}

impl DomNode {
    pub fn attr(&self, key: &str) -> Option<&str> {
        match self {
            DomNode::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            DomNode::Text(_) => None,
        }
    }

    /// Concatenated text of the subtree.
    pub fn text_content(&self) -> String {
        match self {
            DomNode::Text(text) => text.clone(),
            DomNode::Element { children, .. } => {
                children.iter().map(DomNode::text_content).collect()
            }
        }
    }
}

const VOID_TAGS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const RAW_TEXT_TAGS: [&str; 2] = ["script", "style"];

struct OpenElement {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<DomNode>,
}

pub fn parse_fragment(input: &str) -> Vec<DomNode> {
    let mut roots: Vec<DomNode> = Vec::new();
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        let rest = &input[pos..];
        if !rest.starts_with('<') {
            let next = rest.find('<').map(|i| pos + i).unwrap_or(input.len());
            let raw = &input[pos..next];
            // inter-tag indentation noise; meaningful whitespace never
            // spans lines
            let keep = !(raw.trim().is_empty() && raw.contains('\n'));
            if keep && !raw.is_empty() {
                let text = decode_html_entities(raw).to_string();
                push_node(&mut stack, &mut roots, DomNode::Text(text));
            }
            pos = next;
            continue;
        }
        if rest.starts_with("<!--") {
            pos = rest
                .find("-->")
                .map(|i| pos + i + 3)
                .unwrap_or(input.len());
            continue;
        }
        if rest.starts_with("<!") || rest.starts_with("<?") {
            pos = rest.find('>').map(|i| pos + i + 1).unwrap_or(input.len());
            continue;
        }
        if rest.starts_with("</") {
            let Some(end) = rest.find('>') else {
                break;
            };
            let name = rest[2..end].trim().to_ascii_lowercase();
            close_tag(&mut stack, &mut roots, &name);
            pos += end + 1;
            continue;
        }
        let Some(end) = rest.find('>') else {
            break;
        };
        let raw_tag = rest[1..end].trim();
        let self_closing = raw_tag.ends_with('/');
        let (name, attrs) = parse_tag(raw_tag.trim_end_matches('/'));
        pos += end + 1;
        if name.is_empty() {
            continue;
        }
        if RAW_TEXT_TAGS.contains(&name.as_str()) {
            pos = skip_raw_text(input, pos, &name);
            continue;
        }
        if self_closing || VOID_TAGS.contains(&name.as_str()) {
            push_node(
                &mut stack,
                &mut roots,
                DomNode::Element {
                    name,
                    attrs,
                    children: Vec::new(),
                },
            );
        } else {
            stack.push(OpenElement {
                name,
                attrs,
                children: Vec::new(),
            });
        }
    }

    // anything still open at the end closes implicitly
    while let Some(open) = stack.pop() {
        let node = DomNode::Element {
            name: open.name,
            attrs: open.attrs,
            children: open.children,
        };
        push_node(&mut stack, &mut roots, node);
    }
    roots
}

fn push_node(stack: &mut Vec<OpenElement>, roots: &mut Vec<DomNode>, node: DomNode) {
    match stack.last_mut() {
        Some(open) => open.children.push(node),
        None => roots.push(node),
    }
}

/// Pops to the matching open element; everything above it closes
/// implicitly. A closer with no matching open tag is ignored.
fn close_tag(stack: &mut Vec<OpenElement>, roots: &mut Vec<DomNode>, name: &str) {
    let Some(index) = stack.iter().rposition(|open| open.name == name) else {
        return;
    };
    while stack.len() > index {
        let open = stack.pop().expect("stack is non-empty");
        let node = DomNode::Element {
            name: open.name,
            attrs: open.attrs,
            children: open.children,
        };
        push_node(stack, roots, node);
    }
}

fn skip_raw_text(input: &str, pos: usize, name: &str) -> usize {
    let closer = format!("</{name}");
    let lower = input[pos..].to_ascii_lowercase();
    let Some(i) = lower.find(&closer) else {
        return input.len();
    };
    let after = pos + i;
    input[after..]
        .find('>')
        .map(|j| after + j + 1)
        .unwrap_or(input.len())
}

fn parse_tag(raw: &str) -> (String, Vec<(String, String)>) {
    let raw = raw.trim();
    let name_end = raw
        .find(|c: char| c.is_whitespace())
        .unwrap_or(raw.len());
    let name = raw[..name_end].to_ascii_lowercase();
    let mut attrs = Vec::new();
    let mut rest = raw[name_end..].trim_start();
    while !rest.is_empty() {
        let key_end = rest
            .find(|c: char| c.is_whitespace() || c == '=')
            .unwrap_or(rest.len());
        let key = rest[..key_end].to_ascii_lowercase();
        rest = rest[key_end..].trim_start();
        let mut value = String::new();
        if let Some(eq) = rest.strip_prefix('=') {
            let v = eq.trim_start();
            if let Some(q) = v.strip_prefix('"') {
                let end = q.find('"').unwrap_or(q.len());
                value = decode_html_entities(&q[..end]).to_string();
                rest = &q[(end + 1).min(q.len())..];
            } else if let Some(q) = v.strip_prefix('\'') {
                let end = q.find('\'').unwrap_or(q.len());
                value = decode_html_entities(&q[..end]).to_string();
                rest = &q[(end + 1).min(q.len())..];
            } else {
                let end = v
                    .find(|c: char| c.is_whitespace())
                    .unwrap_or(v.len());
                value = decode_html_entities(&v[..end]).to_string();
                rest = &v[end..];
            }
        }
        rest = rest.trim_start();
        if !key.is_empty() {
            attrs.push((key, value));
        }
    }
    (name, attrs)
}
