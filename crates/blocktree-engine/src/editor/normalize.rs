//! Base structural repair.
//!
//! Each pass finds the first violated invariant in document order, fixes
//! it, and reports whether anything changed. Callers loop until a pass
//! comes back clean, so a fix never has to reason about the paths of
//! later violations.

use crate::model::{Node, Path};

use super::Editor;

#[derive(Debug)]
enum Fix {
    /// Empty document: restore the single empty paragraph.
    FillRoot,
    /// Bare text at the root: wrap it in a paragraph.
    WrapRootText(Path),
    /// Element with no children: give it an empty text run.
    FillEmptyElement(Path),
    /// Container with no children: drop it.
    RemoveEmptyContainer(Path),
    /// Void element whose children drifted: reset to one empty text.
    ResetVoidChildren(Path),
    /// Inline element with no text content: drop it.
    RemoveEmptyInline(Path),
    /// Adjacent text runs with compatible marks: merge the second into
    /// the first.
    MergeTexts(Path),
    /// Adjacent lists of the same kind: merge the second into the first.
    MergeLists(Path),
}

impl Editor {
    /// Applies the first violated base rule. Returns false when the tree
    /// already satisfies all of them.
    pub(crate) fn normalize_base_once(&mut self) -> bool {
        let Some(fix) = self.find_violation() else {
            return false;
        };
        match fix {
            Fix::FillRoot => {
                self.children.push(Node::empty_paragraph());
                self.selection = self.first_text_point(&Path::root()).map(crate::model::Range::collapsed);
            }
            Fix::WrapRootText(path) => self.wrap_node(&path, crate::model::ElementKind::Paragraph),
            Fix::FillEmptyElement(path) => {
                if let Some(el) = self.node_mut(&path).and_then(Node::as_element_mut) {
                    el.children.push(Node::text(""));
                }
            }
            Fix::RemoveEmptyContainer(path) => {
                self.remove_node(&path);
            }
            Fix::ResetVoidChildren(path) => {
                if let Some(el) = self.node_mut(&path).and_then(Node::as_element_mut) {
                    el.children = vec![Node::text("")];
                }
                self.clamp_selection();
            }
            Fix::RemoveEmptyInline(path) => {
                self.remove_node(&path);
            }
            Fix::MergeTexts(path) => self.merge_text_into_previous(&path),
            Fix::MergeLists(path) => self.merge_node(&path),
        }
        true
    }

    fn find_violation(&self) -> Option<Fix> {
        if self.children.is_empty() {
            return Some(Fix::FillRoot);
        }
        for (path, node) in self.node_entries() {
            match node {
                Node::Text(t) => {
                    if path.len() == 1 {
                        return Some(Fix::WrapRootText(path));
                    }
                    if let Some(prev_path) = path.previous_sibling() {
                        if let Some(prev) = self.node(&prev_path).and_then(Node::as_text) {
                            if prev.marks == t.marks || prev.text.is_empty() || t.text.is_empty() {
                                return Some(Fix::MergeTexts(path));
                            }
                        }
                    }
                }
                Node::Element(el) => {
                    if el.children.is_empty() {
                        return if el.kind.is_container() {
                            Some(Fix::RemoveEmptyContainer(path))
                        } else {
                            Some(Fix::FillEmptyElement(path))
                        };
                    }
                    if el.kind.is_void() {
                        let clean = el.children.len() == 1
                            && el.children[0]
                                .as_text()
                                .map(|t| t.text.is_empty() && t.marks.is_empty())
                                .unwrap_or(false);
                        if !clean {
                            return Some(Fix::ResetVoidChildren(path));
                        }
                    }
                    if el.kind.is_inline() && node.string().is_empty() {
                        return Some(Fix::RemoveEmptyInline(path));
                    }
                    if let crate::model::ElementKind::List { kind } = &el.kind {
                        if let Some(prev_path) = path.previous_sibling() {
                            if let Some(crate::model::ElementKind::List { kind: prev_kind }) =
                                self.kind_at(&prev_path)
                            {
                                if prev_kind == kind {
                                    return Some(Fix::MergeLists(path));
                                }
                            }
                        }
                    }
                }
            }
        }
        None
    }

    /// Appends the text at `path` onto its previous text sibling, carrying
    /// selection offsets across the join.
    fn merge_text_into_previous(&mut self, path: &Path) {
        let Some(prev_path) = path.previous_sibling() else {
            return;
        };
        let Some(Node::Text(cur)) = self.remove_node_raw(path) else {
            return;
        };
        let prev_len = {
            let Some(prev) = self.node_mut(&prev_path).and_then(Node::as_text_mut) else {
                return;
            };
            let prev_len = prev.text.len();
            if prev.text.is_empty() {
                prev.marks = cur.marks;
            }
            prev.text.push_str(&cur.text);
            prev_len
        };
        if let Some(sel) = &mut self.selection {
            for p in [&mut sel.anchor, &mut sel.focus] {
                if p.path == *path {
                    p.path = prev_path.clone();
                    p.offset += prev_len;
                } else if let Some(shifted) = p.path.transform_remove(path) {
                    p.path = shifted;
                }
            }
        }
    }
}
