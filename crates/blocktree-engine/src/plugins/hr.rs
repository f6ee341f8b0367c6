//! Horizontal rule: `---`, `***` or `___` on its own line, then a break.

use crate::blocks;
use crate::editor::Editor;
use crate::model::ElementKind;
use crate::shortcuts::{detect_shortcut, hr_re};

use super::{Intercept, Plugin};

pub struct HrPlugin;

impl Plugin for HrPlugin {
    fn name(&self) -> &'static str {
        "hr"
    }

    fn insert_break(&self, editor: &mut Editor) -> Intercept {
        let Some(m) = detect_shortcut(editor, hr_re()) else {
            return Intercept::Pass;
        };
        editor.delete_range(&m.range);
        blocks::insert_void(editor, ElementKind::Hr);
        Intercept::Done
    }
}
