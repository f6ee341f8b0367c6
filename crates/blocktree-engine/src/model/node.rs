use serde::{Deserialize, Serialize};

/// Boolean inline formatting attribute carried by a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mark {
    Bold,
    Italic,
    Code,
    Strikethrough,
    Underline,
}

impl Mark {
    pub const ALL: [Mark; 5] = [
        Mark::Code,
        Mark::Bold,
        Mark::Italic,
        Mark::Strikethrough,
        Mark::Underline,
    ];
}

/// Set of boolean inline marks on a text run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkSet {
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub code: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub strikethrough: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

impl MarkSet {
    pub fn contains(&self, mark: Mark) -> bool {
        match mark {
            Mark::Bold => self.bold,
            Mark::Italic => self.italic,
            Mark::Code => self.code,
            Mark::Strikethrough => self.strikethrough,
            Mark::Underline => self.underline,
        }
    }

    pub fn insert(&mut self, mark: Mark) {
        self.set(mark, true);
    }

    pub fn remove(&mut self, mark: Mark) {
        self.set(mark, false);
    }

    pub fn toggle(&mut self, mark: Mark) {
        let active = self.contains(mark);
        self.set(mark, !active);
    }

    pub fn set(&mut self, mark: Mark, value: bool) {
        match mark {
            Mark::Bold => self.bold = value,
            Mark::Italic => self.italic = value,
            Mark::Code => self.code = value,
            Mark::Strikethrough => self.strikethrough = value,
            Mark::Underline => self.underline = value,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == MarkSet::default()
    }

    pub fn with(mut self, mark: Mark) -> Self {
        self.insert(mark);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Bulleted,
    Numbered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
    H5,
}

impl HeadingLevel {
    pub fn rank(&self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
            HeadingLevel::H4 => 4,
            HeadingLevel::H5 => 5,
        }
    }
}

/// Closed set of element types, with per-type attributes in the variant.
///
/// Adding or removing a block type is a compile-time-visible change; every
/// dispatch over element types is an exhaustive match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
    Paragraph,
    Heading {
        level: HeadingLevel,
    },
    CodeBlock {
        lang: String,
    },
    CodeLine,
    Note {
        level: String,
    },
    BlockQuote,
    List {
        kind: ListKind,
    },
    /// List item. `level`, `list` and `number` are derived fields,
    /// recomputed on every normalization pass; plugins may at most leave
    /// a `level` hint behind.
    ListItem {
        level: usize,
        list: ListKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        number: Option<usize>,
    },
    Hr,
    Image {
        url: String,
    },
    Link {
        url: String,
    },
}

impl ElementKind {
    pub fn format(&self) -> BlockFormat {
        match self {
            ElementKind::Paragraph => BlockFormat::Paragraph,
            ElementKind::Heading { .. } => BlockFormat::Heading,
            ElementKind::CodeBlock { .. } => BlockFormat::CodeBlock,
            ElementKind::CodeLine => BlockFormat::CodeLine,
            ElementKind::Note { .. } => BlockFormat::Note,
            ElementKind::BlockQuote => BlockFormat::BlockQuote,
            ElementKind::List {
                kind: ListKind::Bulleted,
            } => BlockFormat::BulletedList,
            ElementKind::List {
                kind: ListKind::Numbered,
            } => BlockFormat::NumberedList,
            ElementKind::ListItem { .. } => BlockFormat::ListItem,
            ElementKind::Hr => BlockFormat::Hr,
            ElementKind::Image { .. } => BlockFormat::Image,
            ElementKind::Link { .. } => BlockFormat::Link,
        }
    }

    /// Void elements carry no user-editable text. They keep exactly one
    /// empty text child to satisfy the non-empty-children invariant.
    pub fn is_void(&self) -> bool {
        matches!(self, ElementKind::Hr | ElementKind::Image { .. })
    }

    /// Inline elements behave like decorated text and sit beside text
    /// runs inside a block.
    pub fn is_inline(&self) -> bool {
        matches!(self, ElementKind::Link { .. })
    }

    /// Container elements hold block children rather than text runs.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            ElementKind::CodeBlock { .. }
                | ElementKind::Note { .. }
                | ElementKind::BlockQuote
                | ElementKind::List { .. }
        )
    }
}

/// Fieldless discriminant of [`ElementKind`], for active-state queries and
/// toggles where the attributes are irrelevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockFormat {
    Paragraph,
    Heading,
    CodeBlock,
    CodeLine,
    Note,
    BlockQuote,
    BulletedList,
    NumberedList,
    ListItem,
    Hr,
    Image,
    Link,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextNode {
    pub text: String,
    #[serde(default, skip_serializing_if = "MarkSet::is_empty")]
    pub marks: MarkSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementNode {
    #[serde(flatten)]
    pub kind: ElementKind,
    pub children: Vec<Node>,
}

/// A node in the document tree: a text run or a typed container.
///
/// Elements are never both text and container, and every element has at
/// least one child once normalization has run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Element(ElementNode),
    Text(TextNode),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Node {
        Node::Text(TextNode {
            text: text.into(),
            marks: MarkSet::default(),
        })
    }

    pub fn marked_text(text: impl Into<String>, marks: MarkSet) -> Node {
        Node::Text(TextNode {
            text: text.into(),
            marks,
        })
    }

    pub fn element(kind: ElementKind, children: Vec<Node>) -> Node {
        Node::Element(ElementNode { kind, children })
    }

    pub fn paragraph(children: Vec<Node>) -> Node {
        Node::element(ElementKind::Paragraph, children)
    }

    pub fn empty_paragraph() -> Node {
        Node::paragraph(vec![Node::text("")])
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    pub fn as_text(&self) -> Option<&TextNode> {
        match self {
            Node::Text(t) => Some(t),
            Node::Element(_) => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextNode> {
        match self {
            Node::Text(t) => Some(t),
            Node::Element(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut ElementNode> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    pub fn kind(&self) -> Option<&ElementKind> {
        self.as_element().map(|e| &e.kind)
    }

    /// Flattened text content of this subtree.
    pub fn string(&self) -> String {
        match self {
            Node::Text(t) => t.text.clone(),
            Node::Element(e) => e.children.iter().map(Node::string).collect(),
        }
    }
}
