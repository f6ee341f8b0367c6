//! Markdown fence shortcuts.
//!
//! Each shortcut is a pattern matched against the text between the start
//! of the enclosing block and a collapsed caret, at the moment a break is
//! inserted. The table is ordered; the first pattern that matches wins.

use std::sync::OnceLock;

use regex::Regex;

use crate::editor::Editor;
use crate::model::{ElementKind, Range};

/// Opening fence of a code block, with an optional language tag:
/// ```` ``` ````, ```` ```rust ````.
pub(crate) fn code_fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*```\s*([a-zA-Z]*)$").expect("valid pattern"))
}

/// Horizontal rule markers: `---`, `***`, `___`.
pub(crate) fn hr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(?:---|\*\*\*|___)$").expect("valid pattern"))
}

/// Opening fence of a note block, with an optional level: `:::`,
/// `::: warning`.
pub(crate) fn note_fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*:::\s*(\w*)$").expect("valid pattern"))
}

/// Bare URL, matched against a whole inserted chunk.
pub(crate) fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^https?://[^\s<>\[\]]+$").expect("valid pattern"))
}

/// A fired shortcut: the capture groups and the marker text's range,
/// which the caller deletes before applying the block change.
#[derive(Debug, Clone)]
pub struct ShortcutMatch {
    pub groups: Vec<String>,
    pub range: Range,
}

/// Matches `pattern` against the caret's line prefix. Returns `None`
/// for non-collapsed selections and anywhere inside a code block, where
/// fence text is literal.
pub fn detect_shortcut(editor: &Editor, pattern: &Regex) -> Option<ShortcutMatch> {
    let sel = editor.selection()?;
    if !sel.is_collapsed() {
        return None;
    }
    if editor
        .above(|kind| matches!(kind, ElementKind::CodeBlock { .. }))
        .is_some()
    {
        return None;
    }
    let (before, range) = editor.before_text()?;
    let caps = pattern.captures(&before)?;
    let groups = caps
        .iter()
        .skip(1)
        .map(|g| g.map(|m| m.as_str().to_string()).unwrap_or_default())
        .collect();
    Some(ShortcutMatch { groups, range })
}
