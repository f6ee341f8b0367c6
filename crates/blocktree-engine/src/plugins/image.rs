//! Image insertion. Images are void blocks, so everything interesting
//! (the single empty text child, caret placement) falls out of the void
//! rules; there is nothing for the chain to intercept.

use crate::blocks;
use crate::editor::Editor;
use crate::model::ElementKind;

pub fn insert_image(editor: &mut Editor, url: impl Into<String>) {
    blocks::insert_void(editor, ElementKind::Image { url: url.into() });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Node, Path, Point, Range};

    #[test]
    fn test_insert_image_replaces_empty_block() {
        let mut editor = Editor::new();
        insert_image(&mut editor, "https://example.com/cat.png");
        assert_eq!(
            editor.kind_at(&Path::from([0])),
            Some(&ElementKind::Image {
                url: "https://example.com/cat.png".into()
            })
        );
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
    fn test_insert_image_after_text_block() {
        let mut editor = Editor::with_children(vec![Node::paragraph(vec![Node::text("caption")])]);
        editor.select(Range::collapsed(Point::new([0, 0], 7)));
        insert_image(&mut editor, "https://example.com/dog.png");
        assert_eq!(editor.node_string(&Path::from([0])), "caption");
        assert!(matches!(
            editor.kind_at(&Path::from([1])),
            Some(ElementKind::Image { .. })
        ));
    }
}
