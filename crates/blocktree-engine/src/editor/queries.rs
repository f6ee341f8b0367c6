//! Read-only queries over the tree and the selection.

use crate::model::{ElementKind, ElementNode, Node, Path, Range};

use super::Editor;

impl Editor {
    /// Innermost element above the selection anchor matching `pred`.
    pub fn above(&self, pred: impl Fn(&ElementKind) -> bool) -> Option<(Path, &ElementNode)> {
        let sel = self.selection.as_ref()?;
        let mut current = sel.anchor.path.parent()?;
        loop {
            if let Some(el) = self.node(&current).and_then(Node::as_element) {
                if pred(&el.kind) {
                    return Some((current.clone(), el));
                }
            }
            current = current.parent()?;
        }
    }

    /// Every `(path, node)` entry in the document, depth first.
    pub fn node_entries(&self) -> Vec<(Path, &Node)> {
        fn walk<'a>(children: &'a [Node], base: &Path, out: &mut Vec<(Path, &'a Node)>) {
            for (index, child) in children.iter().enumerate() {
                let path = base.child(index);
                out.push((path.clone(), child));
                if let Node::Element(el) = child {
                    walk(&el.children, &path, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.children, &Path::root(), &mut out);
        out
    }

    /// Entries whose subtree intersects the current selection.
    pub fn selected_entries(&self) -> Vec<(Path, &Node)> {
        let Some(sel) = self.selection.as_ref() else {
            return Vec::new();
        };
        let s = sel.start();
        let e = sel.end();
        self.node_entries()
            .into_iter()
            .filter(|(path, _)| {
                !(*path < s.path && !path.is_ancestor_of(&s.path)) && !(*path > e.path)
            })
            .collect()
    }

    /// Flattened text content of `range`.
    pub fn string(&self, range: &Range) -> String {
        let mut out = String::new();
        for (path, from, to) in self.texts_in(range) {
            if let Some(t) = self.node(&path).and_then(Node::as_text) {
                let from = from.min(t.text.len());
                let to = to.min(t.text.len());
                out.push_str(&t.text[from..to]);
            }
        }
        out
    }

    /// Text between the enclosing block's start and the selection anchor,
    /// with the range it covers. This is the line prefix the shortcut
    /// patterns match against.
    pub fn before_text(&self) -> Option<(String, Range)> {
        let sel = self.selection.as_ref()?;
        let anchor = sel.anchor.clone();
        let block = self.block_above(&anchor.path)?;
        let start = self.start(&block)?;
        let range = Range::new(start, anchor);
        Some((self.string(&range), range))
    }

    /// Full text of the block under the selection anchor.
    pub fn line_text(&self) -> Option<(String, Range)> {
        let sel = self.selection.as_ref()?;
        let block = self.block_above(&sel.anchor.path)?;
        let start = self.start(&block)?;
        let end = self.end(&block)?;
        let range = Range::new(start, end);
        Some((self.string(&range), range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ListKind, Point};

    fn list_doc() -> Editor {
        Editor::with_children(vec![Node::element(
            ElementKind::List {
                kind: ListKind::Bulleted,
            },
            vec![Node::element(
                ElementKind::ListItem {
                    level: 0,
                    list: ListKind::Bulleted,
                    number: None,
                },
                vec![Node::text("item")],
            )],
        )])
    }

    #[test]
    fn test_above_finds_enclosing_list() {
        let mut editor = list_doc();
        editor.select(Range::collapsed(Point::new([0, 0, 0], 2)));
        let (path, el) = editor
            .above(|kind| matches!(kind, ElementKind::List { .. }))
            .unwrap();
        assert_eq!(path, Path::from([0]));
        assert_eq!(el.children.len(), 1);
        assert!(
            editor
                .above(|kind| matches!(kind, ElementKind::CodeBlock { .. }))
                .is_none()
        );
    }

    #[test]
    fn test_before_text_stops_at_anchor() {
        let mut editor = Editor::with_children(vec![Node::paragraph(vec![Node::text("## head")])]);
        editor.select(Range::collapsed(Point::new([0, 0], 3)));
        let (before, range) = editor.before_text().unwrap();
        assert_eq!(before, "## ");
        assert_eq!(range.start(), &Point::new([0, 0], 0));
        assert_eq!(range.end(), &Point::new([0, 0], 3));
    }

    #[test]
    fn test_selected_entries_covers_range() {
        let mut editor = Editor::with_children(vec![
            Node::paragraph(vec![Node::text("one")]),
            Node::paragraph(vec![Node::text("two")]),
            Node::paragraph(vec![Node::text("three")]),
        ]);
        editor.select(Range::new(Point::new([0, 0], 1), Point::new([1, 0], 2)));
        let paths: Vec<Path> = editor
            .selected_entries()
            .into_iter()
            .map(|(path, _)| path)
            .collect();
        assert_eq!(
            paths,
            vec![
                Path::from([0]),
                Path::from([0, 0]),
                Path::from([1]),
                Path::from([1, 0]),
            ]
        );
    }

    #[test]
    fn test_string_spans_blocks() {
        let mut editor = Editor::with_children(vec![
            Node::paragraph(vec![Node::text("abc")]),
            Node::paragraph(vec![Node::text("def")]),
        ]);
        editor.select(Range::new(Point::new([0, 0], 1), Point::new([1, 0], 2)));
        let sel = editor.selection().unwrap().clone();
        assert_eq!(editor.string(&sel), "bcde");
    }
}
