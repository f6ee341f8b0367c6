//! Note and quote containers: fenced entry, break-on-empty-line exit,
//! delete-at-start exit.

use crate::editor::Editor;
use crate::model::{ElementKind, Node, Path};
use crate::shortcuts::{detect_shortcut, note_fence_re};

use super::{DeleteUnit, Intercept, Plugin};

pub struct NotePlugin;

fn is_wrapper(kind: &ElementKind) -> bool {
    matches!(kind, ElementKind::Note { .. } | ElementKind::BlockQuote)
}

impl Plugin for NotePlugin {
    fn name(&self) -> &'static str {
        "note"
    }

    fn insert_break(&self, editor: &mut Editor) -> Intercept {
        if let Some((container, _)) = editor.above(is_wrapper) {
            // a break on an empty line steps out of the container; the
            // fence text is literal in here
            let empty_line = editor
                .line_text()
                .map(|(line, _)| line.is_empty())
                .unwrap_or(false);
            if !empty_line {
                return Intercept::Pass;
            }
            let Some(sel) = editor.selection().cloned() else {
                return Intercept::Pass;
            };
            let Some(block) = editor.block_above(&sel.anchor.path) else {
                return Intercept::Pass;
            };
            if block.parent().as_ref() != Some(&container) {
                return Intercept::Pass;
            }
            let Some(index) = block.last() else {
                return Intercept::Pass;
            };
            if let Some(lifted) = editor.lift_block_out(&container, index) {
                editor.set_kind(&lifted, ElementKind::Paragraph);
            }
            return Intercept::Done;
        }
        let Some(m) = detect_shortcut(editor, note_fence_re()) else {
            return Intercept::Pass;
        };
        // a bare fence leaves the level empty
        let level = m.groups.first().cloned().unwrap_or_default();
        editor.delete_range(&m.range);
        let Some(sel) = editor.selection().cloned() else {
            return Intercept::Done;
        };
        let Some(block) = editor.block_above(&sel.anchor.path) else {
            return Intercept::Done;
        };
        editor.wrap_node(&block, ElementKind::Note { level });
        Intercept::Done
    }

    /// Backspace at the start of the container's first block leaves the
    /// container: a lone empty block unwraps it in place, anything else
    /// lifts the first block out.
    fn delete_backward(&self, editor: &mut Editor, _unit: DeleteUnit) -> Intercept {
        let Some((container, el)) = editor.above(is_wrapper) else {
            return Intercept::Pass;
        };
        let single_child = el.children.len() == 1;
        let Some((before, _)) = editor.before_text() else {
            return Intercept::Pass;
        };
        if !before.is_empty() {
            return Intercept::Pass;
        }
        let Some(sel) = editor.selection().cloned() else {
            return Intercept::Pass;
        };
        let Some(block) = editor.block_above(&sel.anchor.path) else {
            return Intercept::Pass;
        };
        if block.parent().as_ref() != Some(&container) {
            return Intercept::Pass;
        }
        if block.last() != Some(0) {
            // base merges inner blocks
            return Intercept::Pass;
        }
        if single_child && editor.node_string(&block).is_empty() {
            editor.unwrap_node(&container);
        } else if let Some(lifted) = editor.lift_block_out(&container, 0) {
            editor.set_kind(&lifted, ElementKind::Paragraph);
        }
        Intercept::Done
    }

    /// Wrapper children are blocks; loose text or inline children get a
    /// paragraph around them.
    fn normalize_node(&self, editor: &mut Editor, path: &Path) -> bool {
        if !editor.kind_at(path).map(is_wrapper).unwrap_or(false) {
            return false;
        }
        let loose = {
            let Some(children) = editor.child_list(path) else {
                return false;
            };
            children.iter().position(|child| match child {
                Node::Text(_) => true,
                Node::Element(el) => el.kind.is_inline(),
            })
        };
        match loose {
            Some(index) => {
                editor.wrap_node(&path.child(index), ElementKind::Paragraph);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Point, Range};

    fn note(children: Vec<Node>) -> Node {
        Node::element(
            ElementKind::Note {
                level: "warning".into(),
            },
            children,
        )
    }

    #[test]
    fn test_fence_wraps_block_in_note() {
        let mut editor =
            Editor::with_children(vec![Node::paragraph(vec![Node::text("::: warning")])]);
        editor.select(Range::collapsed(Point::new([0, 0], 11)));
        assert_eq!(NotePlugin.insert_break(&mut editor), Intercept::Done);
        assert_eq!(
            editor.kind_at(&Path::from([0])),
            Some(&ElementKind::Note {
                level: "warning".into()
            })
        );
        assert_eq!(
            editor.kind_at(&Path::from([0, 0])),
            Some(&ElementKind::Paragraph)
        );
        assert_eq!(editor.node_string(&Path::from([0])), "");
    }

    #[test]
    fn test_bare_fence_leaves_level_empty() {
        let mut editor = Editor::with_children(vec![Node::paragraph(vec![Node::text(":::")])]);
        editor.select(Range::collapsed(Point::new([0, 0], 3)));
        NotePlugin.insert_break(&mut editor);
        assert_eq!(
            editor.kind_at(&Path::from([0])),
            Some(&ElementKind::Note {
                level: String::new()
            })
        );
    }

    #[test]
    fn test_fence_inside_note_is_literal() {
        let mut editor = Editor::with_children(vec![note(vec![Node::paragraph(vec![
            Node::text(":::"),
        ])])]);
        editor.select(Range::collapsed(Point::new([0, 0, 0], 3)));
        assert_eq!(NotePlugin.insert_break(&mut editor), Intercept::Pass);
    }

    #[test]
    fn test_break_on_empty_line_exits_note() {
        let mut editor = Editor::with_children(vec![note(vec![
            Node::paragraph(vec![Node::text("kept")]),
            Node::empty_paragraph(),
        ])]);
        editor.select(Range::collapsed(Point::new([0, 1, 0], 0)));
        assert_eq!(NotePlugin.insert_break(&mut editor), Intercept::Done);
        assert_eq!(editor.children().len(), 2);
        assert_eq!(editor.node_string(&Path::from([0])), "kept");
        assert_eq!(
            editor.kind_at(&Path::from([1])),
            Some(&ElementKind::Paragraph)
        );
        assert_eq!(
            editor.selection(),
            Some(&Range::collapsed(Point::new([1, 0], 0)))
        );
    }

    #[test]
    fn test_delete_unwraps_lone_empty_note() {
        let mut editor = Editor::with_children(vec![note(vec![Node::empty_paragraph()])]);
        editor.select(Range::collapsed(Point::new([0, 0, 0], 0)));
        assert_eq!(
            NotePlugin.delete_backward(&mut editor, DeleteUnit::Character),
            Intercept::Done
        );
        assert_eq!(
            editor.kind_at(&Path::from([0])),
            Some(&ElementKind::Paragraph)
        );
    }

    #[test]
    fn test_delete_at_start_lifts_first_block_out() {
        let mut editor = Editor::with_children(vec![note(vec![
            Node::paragraph(vec![Node::text("first")]),
            Node::paragraph(vec![Node::text("second")]),
        ])]);
        editor.select(Range::collapsed(Point::new([0, 0, 0], 0)));
        assert_eq!(
            NotePlugin.delete_backward(&mut editor, DeleteUnit::Character),
            Intercept::Done
        );
        assert_eq!(editor.children().len(), 2);
        assert_eq!(
            editor.kind_at(&Path::from([0])),
            Some(&ElementKind::Paragraph)
        );
        assert_eq!(editor.node_string(&Path::from([0])), "first");
        assert!(matches!(
            editor.kind_at(&Path::from([1])),
            Some(ElementKind::Note { .. })
        ));
    }

    #[test]
    fn test_delete_in_middle_of_text_passes() {
        let mut editor = Editor::with_children(vec![note(vec![Node::paragraph(vec![
            Node::text("text"),
        ])])]);
        editor.select(Range::collapsed(Point::new([0, 0, 0], 2)));
        assert_eq!(
            NotePlugin.delete_backward(&mut editor, DeleteUnit::Character),
            Intercept::Pass
        );
    }

    #[test]
    fn test_normalize_wraps_loose_text() {
        let mut editor = Editor::with_children(vec![note(vec![Node::text("loose")])]);
        assert!(NotePlugin.normalize_node(&mut editor, &Path::from([0])));
        assert_eq!(
            editor.kind_at(&Path::from([0, 0])),
            Some(&ElementKind::Paragraph)
        );
    }
}
