//! Editor core: the document tree, the selection, and the primitive
//! operations everything else is built on.
//!
//! The [`Editor`] owns the only shared mutable state in the engine (tree,
//! selection, pending mark set). All primitive mutations re-derive the
//! selection so no dangling path or point survives a structural change.

pub mod normalize;
pub mod queries;
pub mod transforms;

use serde::{Deserialize, Serialize};

use crate::model::{Edge, ElementKind, MarkSet, Node, Path, Point, Range};

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("invalid document JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// One editing session's document state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Editor {
    pub(crate) children: Vec<Node>,
    pub(crate) selection: Option<Range>,
    /// Marks applied to subsequently typed text, when they differ from the
    /// marks at the caret.
    #[serde(skip)]
    pub(crate) pending_marks: Option<MarkSet>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Empty document: a single paragraph with the caret at its start.
    pub fn new() -> Editor {
        Editor {
            children: vec![Node::empty_paragraph()],
            selection: Some(Range::collapsed(Point::new([0, 0], 0))),
            pending_marks: None,
        }
    }

    /// Document from existing root nodes. The caret lands on the first
    /// text position, if any.
    pub fn with_children(children: Vec<Node>) -> Editor {
        let mut editor = Editor {
            children,
            selection: None,
            pending_marks: None,
        };
        editor.selection = editor
            .first_text_point(&Path::root())
            .map(Range::collapsed);
        editor
    }

    pub fn from_json(json: &str) -> Result<Editor, DocumentError> {
        let children: Vec<Node> = serde_json::from_str(json)?;
        Ok(Editor::with_children(children))
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string(&self.children)?)
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn selection(&self) -> Option<&Range> {
        self.selection.as_ref()
    }

    pub fn select(&mut self, range: Range) {
        self.pending_marks = None;
        self.selection = Some(range);
    }

    pub fn collapse(&mut self, edge: Edge) {
        if let Some(sel) = &self.selection {
            let point = match edge {
                Edge::Start => sel.start().clone(),
                Edge::End => sel.end().clone(),
            };
            self.selection = Some(Range::collapsed(point));
        }
    }

    // Tree access

    pub fn node(&self, path: &Path) -> Option<&Node> {
        let mut children = &self.children;
        let indices = path.indices();
        for (depth, &index) in indices.iter().enumerate() {
            let node = children.get(index)?;
            if depth + 1 == indices.len() {
                return Some(node);
            }
            children = &node.as_element()?.children;
        }
        None
    }

    pub(crate) fn node_mut(&mut self, path: &Path) -> Option<&mut Node> {
        let mut children = &mut self.children;
        let indices = path.indices();
        for (depth, &index) in indices.iter().enumerate() {
            let node = children.get_mut(index)?;
            if depth + 1 == indices.len() {
                return Some(node);
            }
            children = &mut node.as_element_mut()?.children;
        }
        None
    }

    /// Child list of the element at `parent`; the root path yields the
    /// document's top-level nodes.
    pub(crate) fn child_list(&self, parent: &Path) -> Option<&Vec<Node>> {
        if parent.is_empty() {
            Some(&self.children)
        } else {
            Some(&self.node(parent)?.as_element()?.children)
        }
    }

    pub(crate) fn child_list_mut(&mut self, parent: &Path) -> Option<&mut Vec<Node>> {
        if parent.is_empty() {
            Some(&mut self.children)
        } else {
            Some(&mut self.node_mut(parent)?.as_element_mut()?.children)
        }
    }

    pub fn kind_at(&self, path: &Path) -> Option<&ElementKind> {
        self.node(path).and_then(Node::kind)
    }

    /// Flattened text content of the subtree at `path`.
    pub fn node_string(&self, path: &Path) -> String {
        if path.is_empty() {
            return self.children.iter().map(Node::string).collect();
        }
        self.node(path).map(Node::string).unwrap_or_default()
    }

    // Text-point geometry

    /// First text position inside the subtree at `path` (document order).
    pub fn first_text_point(&self, path: &Path) -> Option<Point> {
        match self.node(path) {
            Some(Node::Text(_)) => Some(Point::new(path.clone(), 0)),
            Some(Node::Element(el)) => {
                for index in 0..el.children.len() {
                    if let Some(point) = self.first_text_point(&path.child(index)) {
                        return Some(point);
                    }
                }
                None
            }
            None if path.is_empty() => {
                for index in 0..self.children.len() {
                    if let Some(point) = self.first_text_point(&Path::root().child(index)) {
                        return Some(point);
                    }
                }
                None
            }
            None => None,
        }
    }

    /// Last text position inside the subtree at `path`.
    pub fn last_text_point(&self, path: &Path) -> Option<Point> {
        match self.node(path) {
            Some(Node::Text(t)) => Some(Point::new(path.clone(), t.text.len())),
            Some(Node::Element(el)) => {
                for index in (0..el.children.len()).rev() {
                    if let Some(point) = self.last_text_point(&path.child(index)) {
                        return Some(point);
                    }
                }
                None
            }
            None if path.is_empty() => {
                for index in (0..self.children.len()).rev() {
                    if let Some(point) = self.last_text_point(&Path::root().child(index)) {
                        return Some(point);
                    }
                }
                None
            }
            None => None,
        }
    }

    /// Start of the node at `path`, as a point.
    pub fn start(&self, path: &Path) -> Option<Point> {
        self.first_text_point(path)
    }

    /// End of the node at `path`, as a point.
    pub fn end(&self, path: &Path) -> Option<Point> {
        self.last_text_point(path)
    }

    /// Paths of every text node, in document order.
    pub(crate) fn all_text_paths(&self) -> Vec<Path> {
        fn walk(children: &[Node], base: &Path, out: &mut Vec<Path>) {
            for (index, child) in children.iter().enumerate() {
                let path = base.child(index);
                match child {
                    Node::Text(_) => out.push(path),
                    Node::Element(el) => walk(&el.children, &path, out),
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.children, &Path::root(), &mut out);
        out
    }

    /// End of the text node immediately before `point` in document order.
    pub(crate) fn previous_text_point(&self, point: &Point) -> Option<Point> {
        let paths = self.all_text_paths();
        let index = paths.iter().position(|p| *p == point.path)?;
        if index == 0 {
            return None;
        }
        let prev = paths[index - 1].clone();
        let len = self.node(&prev)?.as_text()?.text.len();
        Some(Point::new(prev, len))
    }

    /// Innermost non-inline element containing `path`.
    pub fn block_above(&self, path: &Path) -> Option<Path> {
        let mut current = path.parent()?;
        loop {
            match self.kind_at(&current) {
                Some(kind) if kind.is_inline() => current = current.parent()?,
                Some(_) => return Some(current),
                None => return None,
            }
        }
    }

    /// True when `point` sits inside a void element's subtree.
    pub(crate) fn in_void(&self, point: &Point) -> bool {
        let mut current = point.path.parent();
        while let Some(path) = current {
            if let Some(kind) = self.kind_at(&path) {
                if kind.is_void() {
                    return true;
                }
            }
            current = path.parent();
        }
        false
    }

    /// Text intervals `(path, start, end)` intersecting `range`, in
    /// document order. Edge texts are trimmed to the range's offsets.
    pub(crate) fn texts_in(&self, range: &Range) -> Vec<(Path, usize, usize)> {
        let s = range.start().clone();
        let e = range.end().clone();
        let mut out = Vec::new();
        collect_texts(&self.children, &Path::root(), &s, &e, &mut out);
        out
    }

    /// Snaps the selection back onto valid text positions, dropping it if
    /// the document holds no text at all.
    pub(crate) fn clamp_selection(&mut self) {
        let Some(sel) = self.selection.clone() else {
            return;
        };
        let anchor = self.clamp_point(sel.anchor);
        let focus = self.clamp_point(sel.focus);
        self.selection = match (anchor, focus) {
            (Some(anchor), Some(focus)) => Some(Range { anchor, focus }),
            (Some(point), None) | (None, Some(point)) => Some(Range::collapsed(point)),
            (None, None) => None,
        };
    }

    fn clamp_point(&self, point: Point) -> Option<Point> {
        if let Some(text) = self.node(&point.path).and_then(Node::as_text) {
            let mut offset = point.offset.min(text.text.len());
            while offset > 0 && !text.text.is_char_boundary(offset) {
                offset -= 1;
            }
            return Some(Point::new(point.path, offset));
        }
        // Dangling: land on the nearest text position in document order.
        let paths = self.all_text_paths();
        if let Some(next) = paths.iter().find(|p| **p >= point.path) {
            return Some(Point::new(next.clone(), 0));
        }
        let last = paths.last()?;
        let len = self.node(last)?.as_text()?.text.len();
        Some(Point::new(last.clone(), len))
    }
}

fn collect_texts(
    children: &[Node],
    base: &Path,
    s: &Point,
    e: &Point,
    out: &mut Vec<(Path, usize, usize)>,
) {
    for (index, child) in children.iter().enumerate() {
        let path = base.child(index);
        // Entire subtree before the range start or after its end.
        if (path < s.path && !path.is_ancestor_of(&s.path)) || path > e.path {
            continue;
        }
        match child {
            Node::Text(t) => {
                let from = if path == s.path { s.offset } else { 0 };
                let to = if path == e.path { e.offset } else { t.text.len() };
                if from <= to {
                    out.push((path, from, to));
                }
            }
            Node::Element(el) => collect_texts(&el.children, &path, s, e, out),
        }
    }
}
