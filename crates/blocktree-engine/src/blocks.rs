//! Block-level commands: toggling element types, querying the active
//! format, and inserting void blocks.

use crate::editor::Editor;
use crate::model::{BlockFormat, ElementKind, ListKind, Node, Path, Range};

/// Recognized note levels, in display order. A note created from a bare
/// fence carries an empty level.
pub const NOTE_LEVELS: [&str; 6] = [
    "default", "primary", "success", "info", "warning", "danger",
];

/// True when any element intersecting the selection has the given format.
pub fn is_block_active(editor: &Editor, format: BlockFormat) -> bool {
    editor
        .selected_entries()
        .iter()
        .any(|(_, node)| node.kind().map(ElementKind::format) == Some(format))
}

/// Resolves which of the candidate formats applies at the selection: the
/// deepest matching element wins, so a code block nested in a quote
/// reports as a code block when both are candidates.
pub fn detect_block_format(editor: &Editor, formats: &[BlockFormat]) -> Option<BlockFormat> {
    editor
        .selected_entries()
        .into_iter()
        .filter_map(|(path, node)| node.kind().map(|kind| (path, kind.format())))
        .filter(|(_, format)| formats.contains(format))
        .max_by_key(|(path, _)| path.len())
        .map(|(_, format)| format)
}

/// Paths of the distinct blocks holding text inside the selection, in
/// document order.
fn selected_blocks(editor: &Editor) -> Vec<Path> {
    let Some(sel) = editor.selection() else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for (path, _, _) in editor.texts_in(sel) {
        if let Some(block) = editor.block_above(&path) {
            if !out.contains(&block) {
                out.push(block);
            }
        }
    }
    out
}

/// Applies or removes a block format at the selection. Wrapping formats
/// wrap or unwrap, leaf formats retype the block, void formats insert a
/// fresh node.
pub fn toggle_block(editor: &mut Editor, kind: ElementKind) {
    match kind {
        ElementKind::List { kind: list_kind } => toggle_list(editor, list_kind),
        ElementKind::CodeBlock { lang } => toggle_code_block(editor, lang),
        kind @ (ElementKind::Note { .. } | ElementKind::BlockQuote) => {
            toggle_wrapper(editor, kind)
        }
        kind @ (ElementKind::Hr | ElementKind::Image { .. }) => insert_void(editor, kind),
        // structural-only types, never toggled directly
        ElementKind::Link { .. } | ElementKind::CodeLine | ElementKind::ListItem { .. } => {}
        kind => toggle_leaf(editor, kind),
    }
}

/// Updates the attributes of the active block of the same format, e.g. a
/// heading's level or a code block's language.
pub fn update_block(editor: &mut Editor, kind: ElementKind) {
    let format = kind.format();
    if let Some((path, _)) = editor.above(|k| k.format() == format) {
        editor.set_kind(&path, kind);
    }
}

fn toggle_leaf(editor: &mut Editor, kind: ElementKind) {
    let active = editor
        .selection()
        .and_then(|sel| editor.block_above(&sel.anchor.path))
        .and_then(|block| editor.kind_at(&block).cloned())
        .map(|k| k == kind)
        .unwrap_or(false);
    for block in selected_blocks(editor) {
        let new_kind = if active {
            ElementKind::Paragraph
        } else {
            kind.clone()
        };
        editor.set_kind(&block, new_kind);
    }
}

fn toggle_list(editor: &mut Editor, list_kind: ListKind) {
    if let Some((list_path, el)) = editor.above(|k| matches!(k, ElementKind::List { .. })) {
        let same = matches!(&el.kind, ElementKind::List { kind } if *kind == list_kind);
        if !same {
            editor.set_kind(&list_path, ElementKind::List { kind: list_kind });
            return;
        }
        // toggling off: lift the anchor's item out and retype it
        let Some(sel) = editor.selection().cloned() else {
            return;
        };
        let Some(item) = editor.block_above(&sel.anchor.path) else {
            return;
        };
        let Some(index) = item.last() else {
            return;
        };
        if let Some(lifted) = editor.lift_block_out(&list_path, index) {
            editor.set_kind(&lifted, ElementKind::Paragraph);
        }
        return;
    }
    let blocks = selected_blocks(editor);
    for block in &blocks {
        editor.set_kind(
            block,
            ElementKind::ListItem {
                level: 0,
                list: list_kind,
                number: None,
            },
        );
    }
    wrap_block_run(editor, &blocks, ElementKind::List { kind: list_kind });
}

fn toggle_code_block(editor: &mut Editor, lang: String) {
    if let Some((block_path, el)) =
        editor.above(|k| matches!(k, ElementKind::CodeBlock { .. }))
    {
        let lines = el.children.len();
        for index in 0..lines {
            editor.set_kind(&block_path.child(index), ElementKind::Paragraph);
        }
        editor.unwrap_node(&block_path);
        return;
    }
    let blocks = selected_blocks(editor);
    for block in &blocks {
        editor.set_kind(block, ElementKind::CodeLine);
    }
    wrap_block_run(editor, &blocks, ElementKind::CodeBlock { lang });
}

fn toggle_wrapper(editor: &mut Editor, kind: ElementKind) {
    let format = kind.format();
    if let Some((path, _)) = editor.above(|k| k.format() == format) {
        editor.unwrap_node(&path);
        return;
    }
    let blocks = selected_blocks(editor);
    wrap_block_run(editor, &blocks, kind);
}

/// Wraps a contiguous run of sibling blocks in one new element.
fn wrap_block_run(editor: &mut Editor, blocks: &[Path], kind: ElementKind) {
    let (Some(first), Some(last)) = (blocks.first(), blocks.last()) else {
        return;
    };
    let (Some(parent), Some(start), Some(end)) = (first.parent(), first.last(), last.last())
    else {
        return;
    };
    if blocks.iter().any(|b| b.parent().as_ref() != Some(&parent)) {
        // mixed parents: wrap only the anchor's block
        editor.wrap_node(first, kind);
        return;
    }
    editor.wrap_siblings(&parent, start, end + 1, kind);
}

/// Inserts a void block at the selection, followed by an empty paragraph
/// holding the caret. An empty current block is replaced outright.
pub fn insert_void(editor: &mut Editor, kind: ElementKind) {
    editor.delete_selection();
    let Some(sel) = editor.selection().cloned() else {
        return;
    };
    let Some(block) = editor.block_above(&sel.anchor.path) else {
        return;
    };
    let void = Node::element(kind, vec![Node::text("")]);
    if editor.node_string(&block).is_empty() {
        editor.remove_node(&block);
        editor.insert_node(&block, void);
        let after = block.next_sibling().expect("block has a sibling position");
        editor.insert_node(&after, Node::empty_paragraph());
        if let Some(pt) = editor.first_text_point(&after) {
            editor.select(Range::collapsed(pt));
        }
    } else {
        editor.split_block();
        let Some(sel) = editor.selection().cloned() else {
            return;
        };
        let Some(second) = editor.block_above(&sel.anchor.path) else {
            return;
        };
        editor.insert_node(&second, void);
        let after = second.next_sibling().expect("block has a sibling position");
        if let Some(pt) = editor.first_text_point(&after) {
            editor.select(Range::collapsed(pt));
        }
    }
}
