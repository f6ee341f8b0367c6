//! Per-block-type behavior.
//!
//! Plugins form an ordered chain in front of the editor's base
//! operations. For each editing command the session walks the chain; a
//! plugin either handles the command ([`Intercept::Done`]) or lets it
//! fall through ([`Intercept::Pass`]) to the next plugin and finally to
//! the base behavior.

pub mod code_block;
pub mod hr;
pub mod image;
pub mod link;
pub mod list;
pub mod note;

use crate::editor::Editor;
use crate::model::Path;

pub use crate::editor::transforms::DeleteUnit;
pub use code_block::CodeBlockPlugin;
pub use hr::HrPlugin;
pub use link::LinkPlugin;
pub use list::ListPlugin;
pub use note::NotePlugin;

/// Outcome of a plugin hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intercept {
    /// The plugin handled the command; stop walking the chain.
    Done,
    /// Not this plugin's business; try the next one.
    Pass,
}

pub trait Plugin {
    fn name(&self) -> &'static str;

    fn insert_text(&self, editor: &mut Editor, text: &str) -> Intercept {
        let _ = (editor, text);
        Intercept::Pass
    }

    fn insert_break(&self, editor: &mut Editor) -> Intercept {
        let _ = editor;
        Intercept::Pass
    }

    fn delete_backward(&self, editor: &mut Editor, unit: DeleteUnit) -> Intercept {
        let _ = (editor, unit);
        Intercept::Pass
    }

    /// One repair step for the element at `path`. Returns true when the
    /// tree changed; the normalization loop then restarts.
    fn normalize_node(&self, editor: &mut Editor, path: &Path) -> bool {
        let _ = (editor, path);
        false
    }
}

/// The standard chain, in precedence order. Code-block behavior comes
/// first so that fence text inside code stays literal for everyone after
/// it.
pub fn default_plugins() -> Vec<Box<dyn Plugin>> {
    vec![
        Box::new(CodeBlockPlugin),
        Box::new(ListPlugin),
        Box::new(HrPlugin),
        Box::new(NotePlugin),
        Box::new(LinkPlugin),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chain_order() {
        let names: Vec<&str> = default_plugins().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["code-block", "list", "hr", "note", "link"]);
    }
}
