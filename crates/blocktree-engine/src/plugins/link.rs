//! Inline links: bare-URL detection on insert, wrap/unwrap commands.

use crate::editor::Editor;
use crate::model::{Edge, ElementKind, Node, Point, Range};
use crate::shortcuts::url_re;

use super::{Intercept, Plugin};

pub struct LinkPlugin;

impl Plugin for LinkPlugin {
    fn name(&self) -> &'static str {
        "link"
    }

    /// An inserted chunk that is exactly a URL becomes a link whose text
    /// is the URL itself. Typing text that merely contains a URL is left
    /// alone.
    fn insert_text(&self, editor: &mut Editor, text: &str) -> Intercept {
        if !url_re().is_match(text) {
            return Intercept::Pass;
        }
        if editor
            .above(|kind| matches!(kind, ElementKind::CodeBlock { .. }))
            .is_some()
        {
            return Intercept::Pass;
        }
        wrap_link(editor, text);
        Intercept::Done
    }
}

/// Wraps the selection in a link. A collapsed selection gets a new link
/// node whose text is the URL; a non-collapsed one wraps the covered
/// text runs and collapses to the end.
pub fn wrap_link(editor: &mut Editor, url: &str) {
    let Some(sel) = editor.selection().cloned() else {
        return;
    };
    let kind = ElementKind::Link { url: url.into() };
    if sel.is_collapsed() {
        let caret = sel.anchor;
        let at = if caret.offset == 0 {
            caret.path.clone()
        } else {
            editor.split_text(&caret);
            caret
                .path
                .next_sibling()
                .expect("text node has a sibling position")
        };
        editor.insert_node(&at, Node::element(kind, vec![Node::text(url)]));
        // an empty run after the link keeps the caret outside it
        let after = at.next_sibling().expect("sibling position");
        editor.insert_node(&after, Node::text(""));
        editor.select(Range::collapsed(Point::new(after, 0)));
        return;
    }
    let aligned = editor.align_range(&sel);
    let s = aligned.start().clone();
    let e = aligned.end().clone();
    if s.path.parent() != e.path.parent() {
        // cross-block selections are not wrapped
        return;
    }
    let Some(parent) = s.path.parent() else {
        return;
    };
    let (Some(start), Some(mut end)) = (s.path.last(), e.path.last()) else {
        return;
    };
    if e.offset == 0 && end > start {
        end -= 1;
    }
    editor.select(aligned);
    editor.wrap_siblings(&parent, start, end + 1, kind);
    editor.collapse(Edge::End);
}

/// Removes the link element around the selection, splicing its children
/// back inline.
pub fn unwrap_link(editor: &mut Editor) {
    if let Some((path, _)) = editor.above(|kind| matches!(kind, ElementKind::Link { .. })) {
        editor.unwrap_node(&path);
    }
}
