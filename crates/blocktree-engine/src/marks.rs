//! Inline mark commands.
//!
//! A collapsed selection toggles a pending mark set that the next
//! `insert_text` picks up; a non-collapsed selection aligns the range to
//! node boundaries and rewrites the marks on every covered text run.

use crate::editor::Editor;
use crate::model::{ElementKind, Mark, MarkSet, Node};

/// Marks in effect at the caret: the pending set if one exists, else the
/// marks of the anchor's text run.
pub fn marks_at(editor: &Editor) -> MarkSet {
    if let Some(pending) = editor.pending_marks {
        return pending;
    }
    editor
        .selection()
        .and_then(|sel| editor.node(&sel.anchor.path))
        .and_then(Node::as_text)
        .map(|t| t.marks)
        .unwrap_or_default()
}

/// True when every text run covered by the selection carries `mark`.
pub fn is_mark_active(editor: &Editor, mark: Mark) -> bool {
    let Some(sel) = editor.selection() else {
        return false;
    };
    if sel.is_collapsed() {
        return marks_at(editor).contains(mark);
    }
    let texts = editor.texts_in(sel);
    let mut any = false;
    for (path, from, to) in texts {
        if from == to {
            continue;
        }
        any = true;
        let has = editor
            .node(&path)
            .and_then(Node::as_text)
            .map(|t| t.marks.contains(mark))
            .unwrap_or(false);
        if !has {
            return false;
        }
    }
    any
}

/// Toggles `mark` at the selection. No-op inside a code block, where
/// text stays plain.
pub fn toggle_mark(editor: &mut Editor, mark: Mark) {
    if editor
        .above(|kind| matches!(kind, ElementKind::CodeBlock { .. }))
        .is_some()
    {
        return;
    }
    let Some(sel) = editor.selection().cloned() else {
        return;
    };
    let active = is_mark_active(editor, mark);
    if sel.is_collapsed() {
        let mut marks = marks_at(editor);
        marks.set(mark, !active);
        editor.pending_marks = Some(marks);
        return;
    }
    let aligned = editor.align_range(&sel);
    for (path, from, to) in editor.texts_in(&aligned) {
        if from == to {
            continue;
        }
        if let Some(t) = editor.node_mut(&path).and_then(Node::as_text_mut) {
            t.marks.set(mark, !active);
        }
    }
    editor.selection = Some(aligned);
}

pub fn add_mark(editor: &mut Editor, mark: Mark) {
    if !is_mark_active(editor, mark) {
        toggle_mark(editor, mark);
    }
}

pub fn remove_mark(editor: &mut Editor, mark: Mark) {
    if is_mark_active(editor, mark) {
        toggle_mark(editor, mark);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Path, Point, Range};

    fn doc(text: &str) -> Editor {
        Editor::with_children(vec![Node::paragraph(vec![Node::text(text)])])
    }

    #[test]
    fn test_toggle_over_range_splits_and_marks() {
        let mut editor = doc("hello world");
        editor.select(Range::new(Point::new([0, 0], 0), Point::new([0, 0], 5)));
        toggle_mark(&mut editor, Mark::Bold);

        let el = editor.node(&Path::from([0])).unwrap().as_element().unwrap();
        assert_eq!(el.children.len(), 2);
        let head = el.children[0].as_text().unwrap();
        assert_eq!(head.text, "hello");
        assert!(head.marks.bold);
        let tail = el.children[1].as_text().unwrap();
        assert_eq!(tail.text, " world");
        assert!(!tail.marks.bold);
        assert!(is_mark_active(&editor, Mark::Bold));
    }

    #[test]
    fn test_toggle_off_over_range() {
        let mut editor = doc("hello");
        editor.select(Range::new(Point::new([0, 0], 0), Point::new([0, 0], 5)));
        toggle_mark(&mut editor, Mark::Italic);
        assert!(is_mark_active(&editor, Mark::Italic));
        toggle_mark(&mut editor, Mark::Italic);
        assert!(!is_mark_active(&editor, Mark::Italic));
    }

    #[test]
    fn test_collapsed_toggle_sets_pending_marks() {
        let mut editor = doc("ab");
        editor.select(Range::collapsed(Point::new([0, 0], 1)));
        toggle_mark(&mut editor, Mark::Bold);
        assert!(marks_at(&editor).bold);

        editor.insert_text("X");
        let el = editor.node(&Path::from([0])).unwrap().as_element().unwrap();
        // the bold run was spliced in between the halves
        assert_eq!(el.children.len(), 3);
        let mid = el.children[1].as_text().unwrap();
        assert_eq!(mid.text, "X");
        assert!(mid.marks.bold);
    }

    #[test]
    fn test_moving_the_caret_clears_pending_marks() {
        let mut editor = doc("ab");
        editor.select(Range::collapsed(Point::new([0, 0], 1)));
        toggle_mark(&mut editor, Mark::Bold);
        editor.select(Range::collapsed(Point::new([0, 0], 2)));
        assert!(!marks_at(&editor).bold);
    }

    #[test]
    fn test_partial_coverage_is_not_active() {
        let mut editor = doc("hello");
        editor.select(Range::new(Point::new([0, 0], 0), Point::new([0, 0], 3)));
        toggle_mark(&mut editor, Mark::Bold);
        editor.select(Range::new(Point::new([0, 0], 0), Point::new([0, 1], 2)));
        assert!(!is_mark_active(&editor, Mark::Bold));
    }

    #[test]
    fn test_no_marks_inside_code_block() {
        let mut editor = Editor::with_children(vec![Node::element(
            ElementKind::CodeBlock { lang: String::new() },
            vec![Node::element(
                ElementKind::CodeLine,
                vec![Node::text("code")],
            )],
        )]);
        editor.select(Range::new(Point::new([0, 0, 0], 0), Point::new([0, 0, 0], 4)));
        toggle_mark(&mut editor, Mark::Bold);
        let line = editor.node(&Path::from([0, 0, 0])).unwrap().as_text().unwrap();
        assert!(line.marks.is_empty());
    }
}
