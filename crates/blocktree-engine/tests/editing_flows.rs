//! End-to-end editing scenarios driven through a `Session`, typing
//! character by character the way a front end would.

use pretty_assertions::assert_eq;
use rstest::rstest;

use blocktree_engine::model::{ElementKind, ListKind, Mark, Node, Path, Point, Range};
use blocktree_engine::plugins::DeleteUnit;
use blocktree_engine::{Session, html};

/// Types `text` one character at a time; `\n` becomes a break.
fn type_text(session: &mut Session, text: &str) {
    for ch in text.chars() {
        if ch == '\n' {
            session.insert_break();
        } else {
            session.insert_text(&ch.to_string());
        }
    }
}

/// Structural invariants that must hold after any command sequence.
fn check_invariants(nodes: &[Node]) {
    assert!(!nodes.is_empty(), "document must keep at least one block");
    for node in nodes {
        assert!(node.is_element(), "no loose text at the root");
        check_node(node);
    }
}

fn check_node(node: &Node) {
    let Node::Element(el) = node else {
        return;
    };
    assert!(!el.children.is_empty(), "elements are never childless");
    if el.kind.is_void() {
        assert_eq!(el.children.len(), 1);
        assert_eq!(el.children[0], Node::text(""));
    }
    for child in &el.children {
        check_node(child);
    }
}

#[test]
fn typing_paragraphs() {
    let mut session = Session::new();
    type_text(&mut session, "first line\nsecond line");
    assert_eq!(session.children().len(), 2);
    assert_eq!(session.editor().node_string(&Path::from([0])), "first line");
    assert_eq!(
        session.editor().node_string(&Path::from([1])),
        "second line"
    );
    check_invariants(session.children());
}

#[test]
fn code_fence_enters_code_block_and_text_stays_literal() {
    let mut session = Session::new();
    type_text(&mut session, "```rust\n");
    assert_eq!(
        session.editor().kind_at(&Path::from([0])),
        Some(&ElementKind::CodeBlock {
            lang: "rust".into()
        })
    );

    type_text(&mut session, "let x = 1;\n--- not a rule");
    let block = session.children()[0].as_element().unwrap();
    assert_eq!(block.children.len(), 2);
    assert_eq!(
        session.editor().node_string(&Path::from([0, 1])),
        "--- not a rule"
    );
    assert_eq!(
        session.editor().kind_at(&Path::from([0, 1])),
        Some(&ElementKind::CodeLine)
    );
    check_invariants(session.children());
}

#[test]
fn code_block_delete_flow() {
    let mut session = Session::new();
    type_text(&mut session, "```\nonly");
    // caret at start refuses to merge code into whatever precedes it
    session.select(Range::collapsed(Point::new([0, 0, 0], 0)));
    session.delete_backward(DeleteUnit::Character);
    assert!(matches!(
        session.editor().kind_at(&Path::from([0])),
        Some(ElementKind::CodeBlock { .. })
    ));

    // clearing the line and deleting again unwraps to a paragraph
    session.select(Range::new(Point::new([0, 0, 0], 0), Point::new([0, 0, 0], 4)));
    session.delete_backward(DeleteUnit::Character);
    session.delete_backward(DeleteUnit::Character);
    assert_eq!(
        session.editor().kind_at(&Path::from([0])),
        Some(&ElementKind::Paragraph)
    );
    check_invariants(session.children());
}

#[rstest]
#[case("::: warning\n", "warning")]
#[case(":::\n", "")]
#[case("  :::\n", "")]
fn note_fence_opens_note(#[case] typed: &str, #[case] level: &str) {
    let mut session = Session::new();
    type_text(&mut session, typed);
    assert_eq!(
        session.editor().kind_at(&Path::from([0])),
        Some(&ElementKind::Note {
            level: level.into()
        })
    );
    assert_eq!(
        session.editor().kind_at(&Path::from([0, 0])),
        Some(&ElementKind::Paragraph)
    );
    check_invariants(session.children());
}

#[test]
fn bare_fence_note_keeps_empty_level_through_typing() {
    let mut session = Session::new();
    type_text(&mut session, ":::\nfoo\nbar");
    assert_eq!(
        session.editor().kind_at(&Path::from([0])),
        Some(&ElementKind::Note {
            level: String::new()
        })
    );
    assert_eq!(session.editor().node_string(&Path::from([0, 0])), "foo");
    assert_eq!(session.editor().node_string(&Path::from([0, 1])), "bar");
    check_invariants(session.children());
}

#[test]
fn note_fence_is_literal_inside_a_note() {
    let mut session = Session::new();
    type_text(&mut session, ":::\nbody\n:::\n");
    let notes = session
        .children()
        .iter()
        .filter(|n| matches!(n.kind(), Some(ElementKind::Note { .. })))
        .count();
    assert_eq!(notes, 1);
    assert_eq!(session.editor().node_string(&Path::from([0, 1])), ":::");
    check_invariants(session.children());
}

#[test]
fn note_fence_ignored_for_non_collapsed_selection() {
    let mut session = Session::new();
    type_text(&mut session, ":::");
    session.select(Range::new(Point::new([0, 0], 0), Point::new([0, 0], 3)));
    session.insert_break();
    assert!(
        !session
            .children()
            .iter()
            .any(|n| matches!(n.kind(), Some(ElementKind::Note { .. })))
    );
    check_invariants(session.children());
}

#[test]
fn break_on_empty_line_exits_note() {
    let mut session = Session::new();
    type_text(&mut session, "::: info\ninside\n\nafter");
    assert_eq!(session.children().len(), 2);
    assert!(matches!(
        session.editor().kind_at(&Path::from([0])),
        Some(ElementKind::Note { .. })
    ));
    assert_eq!(session.editor().node_string(&Path::from([0])), "inside");
    assert_eq!(
        session.editor().kind_at(&Path::from([1])),
        Some(&ElementKind::Paragraph)
    );
    assert_eq!(session.editor().node_string(&Path::from([1])), "after");
    check_invariants(session.children());
}

#[test]
fn line_delete_inside_note_clears_text_but_stays() {
    let mut session = Session::new();
    type_text(&mut session, "::: danger\nsome text");
    session.delete_backward(DeleteUnit::Line);
    assert!(matches!(
        session.editor().kind_at(&Path::from([0])),
        Some(ElementKind::Note { .. })
    ));
    assert_eq!(session.editor().node_string(&Path::from([0])), "");

    // a second delete on the now-empty line leaves the note
    session.delete_backward(DeleteUnit::Line);
    assert_eq!(
        session.editor().kind_at(&Path::from([0])),
        Some(&ElementKind::Paragraph)
    );
    check_invariants(session.children());
}

#[test]
fn hr_shortcut_inserts_rule() {
    let mut session = Session::new();
    type_text(&mut session, "---\n");
    assert_eq!(
        session.editor().kind_at(&Path::from([0])),
        Some(&ElementKind::Hr)
    );
    assert_eq!(
        session.editor().kind_at(&Path::from([1])),
        Some(&ElementKind::Paragraph)
    );
    type_text(&mut session, "after the rule");
    assert_eq!(
        session.editor().node_string(&Path::from([1])),
        "after the rule"
    );
    check_invariants(session.children());
}

#[test]
fn numbered_list_keeps_numbers_in_sync() {
    let mut session = Session::new();
    type_text(&mut session, "one");
    session.toggle_block(ElementKind::List {
        kind: ListKind::Numbered,
    });
    type_text(&mut session, "\ntwo\nthree");
    let list = session.children()[0].as_element().unwrap();
    let numbers: Vec<Option<usize>> = list
        .children
        .iter()
        .map(|item| match item.kind() {
            Some(ElementKind::ListItem { number, .. }) => *number,
            other => panic!("unexpected child {other:?}"),
        })
        .collect();
    assert_eq!(numbers, vec![Some(1), Some(2), Some(3)]);

    // deleting at an item boundary pulls it out and renumbers the rest
    session.select(Range::collapsed(Point::new([0, 1, 0], 0)));
    session.delete_backward(DeleteUnit::Character);
    check_invariants(session.children());
    let first = session.children()[0].as_element().unwrap();
    assert!(matches!(first.kind, ElementKind::List { .. }));
}

#[test]
fn pasted_url_becomes_a_link() {
    let mut session = Session::new();
    type_text(&mut session, "docs: ");
    session.insert_text("https://example.com/guide");
    let paragraph = session.children()[0].as_element().unwrap();
    let link = paragraph
        .children
        .iter()
        .find(|n| matches!(n.kind(), Some(ElementKind::Link { .. })))
        .expect("link node");
    assert_eq!(link.string(), "https://example.com/guide");
    check_invariants(session.children());
}

#[test]
fn delete_across_blocks_merges_them() {
    let mut session = Session::new();
    type_text(&mut session, "hello\nworld");
    session.select(Range::new(Point::new([0, 0], 3), Point::new([1, 0], 3)));
    session.delete_backward(DeleteUnit::Character);
    assert_eq!(session.children().len(), 1);
    assert_eq!(session.editor().node_string(&Path::from([0])), "helld");
    check_invariants(session.children());
}

#[test]
fn bold_italic_survives_html_round_trip() {
    let mut session = Session::new();
    type_text(&mut session, "plain rich");
    session.select(Range::new(Point::new([0, 0], 6), Point::new([0, 0], 10)));
    session.toggle_mark(Mark::Bold);
    session.toggle_mark(Mark::Italic);

    let exported = session.serialize_html();
    assert_eq!(
        exported,
        "<p>plain <em><strong>rich</strong></em></p>"
    );
    assert_eq!(html::deserialize(&exported), session.children().to_vec());
}

#[test]
fn pasting_html_blocks_lands_after_current_block() {
    let mut session = Session::new();
    type_text(&mut session, "intro");
    session.insert_html("<h2>Title</h2><ul><li>a</li><li>b</li></ul>");
    assert_eq!(session.editor().node_string(&Path::from([0])), "intro");
    assert!(matches!(
        session.editor().kind_at(&Path::from([1])),
        Some(ElementKind::Heading { .. })
    ));
    assert!(matches!(
        session.editor().kind_at(&Path::from([2])),
        Some(ElementKind::List { .. })
    ));
    check_invariants(session.children());
}

#[test]
fn random_walk_preserves_invariants() {
    let mut session = Session::new();
    type_text(&mut session, "seed text\n```js\ncode\n");
    session.select(Range::collapsed(Point::new([0, 0], 4)));
    type_text(&mut session, "\n---\n::: warning\nnote body\n\n");
    for _ in 0..20 {
        session.delete_backward(DeleteUnit::Character);
        check_invariants(session.children());
    }
    for _ in 0..10 {
        session.delete_backward(DeleteUnit::Line);
        check_invariants(session.children());
    }
}
