//! List behavior: boundary deletes outdent, normalization re-derives the
//! item metadata.

use crate::editor::Editor;
use crate::model::{ElementKind, ListKind, Node, Path};

use super::{DeleteUnit, Intercept, Plugin};

pub struct ListPlugin;

impl Plugin for ListPlugin {
    fn name(&self) -> &'static str {
        "list"
    }

    /// Backspace at the start of an item outdents it one level; at level
    /// zero the item leaves the list as a paragraph.
    fn delete_backward(&self, editor: &mut Editor, _unit: DeleteUnit) -> Intercept {
        let Some((item_path, el)) =
            editor.above(|kind| matches!(kind, ElementKind::ListItem { .. }))
        else {
            return Intercept::Pass;
        };
        let ElementKind::ListItem { level, list, .. } = el.kind.clone() else {
            return Intercept::Pass;
        };
        let Some((before, _)) = editor.before_text() else {
            return Intercept::Pass;
        };
        if !before.is_empty() {
            return Intercept::Pass;
        }
        if level == 0 {
            let Some(list_path) = item_path.parent() else {
                return Intercept::Pass;
            };
            let Some(index) = item_path.last() else {
                return Intercept::Pass;
            };
            if let Some(lifted) = editor.lift_block_out(&list_path, index) {
                editor.set_kind(&lifted, ElementKind::Paragraph);
            }
        } else {
            editor.set_kind(
                &item_path,
                ElementKind::ListItem {
                    level: level - 1,
                    list,
                    number: None,
                },
            );
        }
        Intercept::Done
    }

    fn normalize_node(&self, editor: &mut Editor, path: &Path) -> bool {
        let Some(ElementKind::List { kind }) = editor.kind_at(path).cloned() else {
            return false;
        };
        if let Some(changed) = repair_children(editor, path, kind) {
            return changed;
        }
        renumber(editor, path, kind)
    }
}

enum ChildRepair {
    Wrap(usize),
    Retype(usize),
    UnwrapSoleBlock(usize),
}

/// Structural repair of one list's children. `Some(true)` means a fix was
/// applied, `None` means the children are structurally sound and
/// renumbering can proceed.
fn repair_children(editor: &mut Editor, path: &Path, kind: ListKind) -> Option<bool> {
    let repair = {
        let children = editor.child_list(path)?;
        children.iter().enumerate().find_map(|(index, child)| match child {
            Node::Text(_) => Some(ChildRepair::Wrap(index)),
            Node::Element(el) => {
                if !matches!(el.kind, ElementKind::ListItem { .. }) {
                    return Some(ChildRepair::Retype(index));
                }
                match el.children.as_slice() {
                    [Node::Element(inner)]
                        if !inner.kind.is_inline() && !inner.kind.is_void() =>
                    {
                        Some(ChildRepair::UnwrapSoleBlock(index))
                    }
                    _ => None,
                }
            }
        })
    };
    let item = |level| ElementKind::ListItem {
        level,
        list: kind,
        number: None,
    };
    match repair? {
        ChildRepair::Wrap(index) => {
            editor.wrap_node(&path.child(index), item(0));
        }
        ChildRepair::Retype(index) => {
            editor.set_kind(&path.child(index), item(0));
        }
        ChildRepair::UnwrapSoleBlock(index) => {
            editor.unwrap_node(&path.child(index).child(0));
        }
    }
    Some(true)
}

/// Stack-based renumbering: walking the items in order, a deeper item
/// opens a fresh counter, a shallower one pops back and increments, a
/// sibling increments in place. Indent jumps are clamped to one level.
fn renumber(editor: &mut Editor, path: &Path, kind: ListKind) -> bool {
    let current: Vec<ElementKind> = {
        let Some(children) = editor.child_list(path) else {
            return false;
        };
        children
            .iter()
            .filter_map(|child| child.kind().cloned())
            .collect()
    };
    let mut counters: Vec<usize> = Vec::new();
    for (index, item_kind) in current.iter().enumerate() {
        let ElementKind::ListItem { level, .. } = item_kind else {
            continue;
        };
        let level = (*level).min(counters.len());
        while counters.len() > level + 1 {
            counters.pop();
        }
        if counters.len() == level + 1 {
            *counters.last_mut().expect("non-empty counter stack") += 1;
        } else {
            counters.push(1);
        }
        let number = match kind {
            ListKind::Numbered => Some(*counters.last().expect("non-empty counter stack")),
            ListKind::Bulleted => None,
        };
        let expected = ElementKind::ListItem {
            level,
            list: kind,
            number,
        };
        if *item_kind != expected {
            editor.set_kind(&path.child(index), expected);
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Point, Range};

    fn item(level: usize, text: &str) -> Node {
        Node::element(
            ElementKind::ListItem {
                level,
                list: ListKind::Numbered,
                number: None,
            },
            vec![Node::text(text)],
        )
    }

    fn numbered(items: Vec<Node>) -> Editor {
        Editor::with_children(vec![Node::element(
            ElementKind::List {
                kind: ListKind::Numbered,
            },
            items,
        )])
    }

    fn numbers(editor: &Editor) -> Vec<Option<usize>> {
        let list = editor.node(&Path::from([0])).unwrap().as_element().unwrap();
        list.children
            .iter()
            .map(|child| match child.kind() {
                Some(ElementKind::ListItem { number, .. }) => *number,
                _ => panic!("not an item"),
            })
            .collect()
    }

    #[test]
    fn test_renumber_nested_levels() {
        let mut editor = numbered(vec![
            item(0, "a"),
            item(0, "b"),
            item(1, "b1"),
            item(1, "b2"),
            item(0, "c"),
        ]);
        while ListPlugin.normalize_node(&mut editor, &Path::from([0])) {}
        assert_eq!(
            numbers(&editor),
            vec![Some(1), Some(2), Some(1), Some(2), Some(3)]
        );
    }

    #[test]
    fn test_indent_jump_is_clamped() {
        let mut editor = numbered(vec![item(0, "a"), item(4, "deep")]);
        while ListPlugin.normalize_node(&mut editor, &Path::from([0])) {}
        let list = editor.node(&Path::from([0])).unwrap().as_element().unwrap();
        assert_eq!(
            list.children[1].kind(),
            Some(&ElementKind::ListItem {
                level: 1,
                list: ListKind::Numbered,
                number: Some(1),
            })
        );
    }

    #[test]
    fn test_stray_paragraph_becomes_item() {
        let mut editor = numbered(vec![
            item(0, "a"),
            Node::paragraph(vec![Node::text("stray")]),
        ]);
        while ListPlugin.normalize_node(&mut editor, &Path::from([0])) {}
        assert!(matches!(
            editor.kind_at(&Path::from([0, 1])),
            Some(ElementKind::ListItem { .. })
        ));
        assert_eq!(numbers(&editor), vec![Some(1), Some(2)]);
    }

    #[test]
    fn test_sole_block_child_of_item_unwraps() {
        let mut editor = numbered(vec![Node::element(
            ElementKind::ListItem {
                level: 0,
                list: ListKind::Numbered,
                number: None,
            },
            vec![Node::paragraph(vec![Node::text("inner")])],
        )]);
        while ListPlugin.normalize_node(&mut editor, &Path::from([0])) {}
        let item = editor.node(&Path::from([0, 0])).unwrap().as_element().unwrap();
        assert_eq!(item.children, vec![Node::text("inner")]);
    }

    #[test]
    fn test_delete_at_item_start_outdents_then_exits() {
        let mut editor = numbered(vec![item(0, "a"), item(1, "b")]);
        // settle the derived fields first
        while ListPlugin.normalize_node(&mut editor, &Path::from([0])) {}
        editor.select(Range::collapsed(Point::new([0, 1, 0], 0)));

        assert_eq!(
            ListPlugin.delete_backward(&mut editor, DeleteUnit::Character),
            Intercept::Done
        );
        assert_eq!(
            editor.kind_at(&Path::from([0, 1])),
            Some(&ElementKind::ListItem {
                level: 0,
                list: ListKind::Numbered,
                number: None,
            })
        );

        assert_eq!(
            ListPlugin.delete_backward(&mut editor, DeleteUnit::Character),
            Intercept::Done
        );
        assert_eq!(
            editor.kind_at(&Path::from([1])),
            Some(&ElementKind::Paragraph)
        );
        assert_eq!(editor.node_string(&Path::from([1])), "b");
    }

    #[test]
    fn test_delete_inside_item_text_passes() {
        let mut editor = numbered(vec![item(0, "ab")]);
        editor.select(Range::collapsed(Point::new([0, 0, 0], 1)));
        assert_eq!(
            ListPlugin.delete_backward(&mut editor, DeleteUnit::Character),
            Intercept::Pass
        );
    }
}
