//! Code block behavior: fenced entry, literal text, line-based repair.

use crate::editor::Editor;
use crate::model::{ElementKind, Node, Path};
use crate::shortcuts::{code_fence_re, detect_shortcut};

use super::{DeleteUnit, Intercept, Plugin};

pub struct CodeBlockPlugin;

fn in_code_block(editor: &Editor) -> bool {
    editor
        .above(|kind| matches!(kind, ElementKind::CodeBlock { .. }))
        .is_some()
}

impl Plugin for CodeBlockPlugin {
    fn name(&self) -> &'static str {
        "code-block"
    }

    /// Inside a code block all typed text is literal; intercepting here
    /// keeps the rest of the chain (URL detection in particular) away
    /// from it.
    fn insert_text(&self, editor: &mut Editor, text: &str) -> Intercept {
        if in_code_block(editor) {
            editor.insert_text(text);
            return Intercept::Done;
        }
        Intercept::Pass
    }

    fn insert_break(&self, editor: &mut Editor) -> Intercept {
        if in_code_block(editor) {
            // base split produces the next code line
            return Intercept::Pass;
        }
        let Some(m) = detect_shortcut(editor, code_fence_re()) else {
            return Intercept::Pass;
        };
        let lang = m.groups.first().cloned().unwrap_or_default();
        editor.delete_range(&m.range);
        let Some(sel) = editor.selection().cloned() else {
            return Intercept::Done;
        };
        let Some(block) = editor.block_above(&sel.anchor.path) else {
            return Intercept::Done;
        };
        editor.set_kind(&block, ElementKind::CodeLine);
        editor.wrap_node(&block, ElementKind::CodeBlock { lang });
        Intercept::Done
    }

    fn delete_backward(&self, editor: &mut Editor, _unit: DeleteUnit) -> Intercept {
        let Some((block_path, el)) =
            editor.above(|kind| matches!(kind, ElementKind::CodeBlock { .. }))
        else {
            return Intercept::Pass;
        };
        let lines = el.children.len();
        let Some((before, _)) = editor.before_text() else {
            return Intercept::Pass;
        };
        if !before.is_empty() {
            return Intercept::Pass;
        }
        let Some(sel) = editor.selection().cloned() else {
            return Intercept::Pass;
        };
        let Some(line) = editor.block_above(&sel.anchor.path) else {
            return Intercept::Pass;
        };
        let Some(index) = line.last() else {
            return Intercept::Pass;
        };
        if index > 0 {
            // base merges this line into the previous one
            return Intercept::Pass;
        }
        if lines == 1 && editor.node_string(&line).is_empty() {
            editor.set_kind(&line, ElementKind::Paragraph);
            editor.unwrap_node(&block_path);
            return Intercept::Done;
        }
        // start of a non-empty block: code never merges into the block
        // above it
        Intercept::Done
    }

    fn normalize_node(&self, editor: &mut Editor, path: &Path) -> bool {
        match editor.kind_at(path) {
            Some(ElementKind::CodeBlock { .. }) => normalize_block(editor, path),
            Some(ElementKind::CodeLine) => normalize_line(editor, path),
            _ => false,
        }
    }
}

/// Every child of a code block is a code line.
fn normalize_block(editor: &mut Editor, path: &Path) -> bool {
    enum Repair {
        Wrap(usize),
        Retype(usize),
    }
    let repair = {
        let Some(children) = editor.child_list(path) else {
            return false;
        };
        children.iter().enumerate().find_map(|(index, child)| match child {
            Node::Text(_) => Some(Repair::Wrap(index)),
            Node::Element(el) if el.kind != ElementKind::CodeLine => Some(Repair::Retype(index)),
            Node::Element(_) => None,
        })
    };
    match repair {
        Some(Repair::Wrap(index)) => {
            editor.wrap_node(&path.child(index), ElementKind::CodeLine);
            true
        }
        Some(Repair::Retype(index)) => {
            editor.set_kind(&path.child(index), ElementKind::CodeLine);
            true
        }
        None => false,
    }
}

/// A code line holds exactly one unmarked text run; anything richer is
/// flattened to its plain text.
fn normalize_line(editor: &mut Editor, path: &Path) -> bool {
    let clean = editor
        .child_list(path)
        .map(|children| {
            children.len() == 1
                && children[0]
                    .as_text()
                    .map(|t| t.marks.is_empty())
                    .unwrap_or(false)
        })
        .unwrap_or(true);
    if clean {
        return false;
    }
    let flat = editor.node_string(path);
    if let Some(el) = editor.node_mut(path).and_then(Node::as_element_mut) {
        el.children = vec![Node::text(flat)];
    }
    editor.clamp_selection();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Mark, MarkSet, Point, Range};

    fn code_doc(lines: &[&str]) -> Editor {
        Editor::with_children(vec![Node::element(
            ElementKind::CodeBlock { lang: "rust".into() },
            lines
                .iter()
                .map(|l| Node::element(ElementKind::CodeLine, vec![Node::text(*l)]))
                .collect(),
        )])
    }

    #[test]
    fn test_fence_converts_paragraph() {
        let mut editor = Editor::with_children(vec![Node::paragraph(vec![Node::text("```rust")])]);
        editor.select(Range::collapsed(Point::new([0, 0], 7)));
        assert_eq!(CodeBlockPlugin.insert_break(&mut editor), Intercept::Done);
        assert_eq!(
            editor.kind_at(&Path::from([0])),
            Some(&ElementKind::CodeBlock {
                lang: "rust".into()
            })
        );
        assert_eq!(editor.kind_at(&Path::from([0, 0])), Some(&ElementKind::CodeLine));
        assert_eq!(editor.node_string(&Path::from([0])), "");
    }

    #[test]
    fn test_delete_at_start_of_single_empty_line_unwraps() {
        let mut editor = code_doc(&[""]);
        editor.select(Range::collapsed(Point::new([0, 0, 0], 0)));
        assert_eq!(
            CodeBlockPlugin.delete_backward(&mut editor, DeleteUnit::Character),
            Intercept::Done
        );
        assert_eq!(
            editor.kind_at(&Path::from([0])),
            Some(&ElementKind::Paragraph)
        );
    }

    #[test]
    fn test_delete_at_start_of_non_empty_block_is_swallowed() {
        let mut editor = Editor::with_children(vec![
            Node::paragraph(vec![Node::text("above")]),
            Node::element(
                ElementKind::CodeBlock { lang: String::new() },
                vec![Node::element(
                    ElementKind::CodeLine,
                    vec![Node::text("code")],
                )],
            ),
        ]);
        editor.select(Range::collapsed(Point::new([1, 0, 0], 0)));
        assert_eq!(
            CodeBlockPlugin.delete_backward(&mut editor, DeleteUnit::Character),
            Intercept::Done
        );
        assert_eq!(editor.children().len(), 2);
        assert_eq!(editor.node_string(&Path::from([1])), "code");
    }

    #[test]
    fn test_delete_at_later_line_start_passes_to_base() {
        let mut editor = code_doc(&["one", "two"]);
        editor.select(Range::collapsed(Point::new([0, 1, 0], 0)));
        assert_eq!(
            CodeBlockPlugin.delete_backward(&mut editor, DeleteUnit::Character),
            Intercept::Pass
        );
    }

    #[test]
    fn test_normalize_flattens_marked_line() {
        let mut editor = Editor::with_children(vec![Node::element(
            ElementKind::CodeBlock { lang: String::new() },
            vec![Node::element(
                ElementKind::CodeLine,
                vec![
                    Node::text("let "),
                    Node::marked_text("x", MarkSet::default().with(Mark::Bold)),
                ],
            )],
        )]);
        assert!(CodeBlockPlugin.normalize_node(&mut editor, &Path::from([0, 0])));
        let line = editor.node(&Path::from([0, 0])).unwrap().as_element().unwrap();
        assert_eq!(line.children, vec![Node::text("let x")]);
    }

    #[test]
    fn test_normalize_retypes_stray_paragraph() {
        let mut editor = Editor::with_children(vec![Node::element(
            ElementKind::CodeBlock { lang: String::new() },
            vec![Node::paragraph(vec![Node::text("stray")])],
        )]);
        assert!(CodeBlockPlugin.normalize_node(&mut editor, &Path::from([0])));
        assert_eq!(editor.kind_at(&Path::from([0, 0])), Some(&ElementKind::CodeLine));
    }
}
