//! An editing session: one editor plus the plugin chain.
//!
//! Commands walk the chain in order until a plugin reports
//! [`Intercept::Done`], then fall through to the editor's base behavior.
//! After every command the session normalizes to a fixed point, so
//! callers only ever observe trees that satisfy the structural
//! invariants.

use tracing::{debug, warn};

use crate::editor::{DocumentError, Editor};
use crate::html;
use crate::model::{BlockFormat, ElementKind, Mark, MarkSet, Node, Path, Range};
use crate::plugins::{DeleteUnit, Intercept, Plugin, default_plugins};
use crate::{blocks, marks, plugins};

/// Hard stop for a normalization that fails to settle; hitting it means
/// two rules keep undoing each other.
const MAX_NORMALIZE_PASSES: usize = 1000;

pub struct Session {
    editor: Editor,
    plugins: Vec<Box<dyn Plugin>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Session {
        Session::with_editor(Editor::new())
    }

    /// Wraps an existing document, normalizing it immediately.
    pub fn with_editor(editor: Editor) -> Session {
        Session::with_plugins(editor, default_plugins())
    }

    pub fn with_plugins(editor: Editor, plugins: Vec<Box<dyn Plugin>>) -> Session {
        let mut session = Session { editor, plugins };
        session.normalize();
        session
    }

    pub fn from_json(json: &str) -> Result<Session, DocumentError> {
        Ok(Session::with_editor(Editor::from_json(json)?))
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        self.editor.to_json()
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn children(&self) -> &[Node] {
        self.editor.children()
    }

    pub fn select(&mut self, range: Range) {
        self.editor.select(range);
    }

    // Editing commands

    pub fn insert_text(&mut self, text: &str) {
        let mut handled = false;
        for plugin in &self.plugins {
            if plugin.insert_text(&mut self.editor, text) == Intercept::Done {
                handled = true;
                break;
            }
        }
        if !handled {
            self.editor.insert_text(text);
        }
        self.normalize();
    }

    pub fn insert_break(&mut self) {
        let mut handled = false;
        for plugin in &self.plugins {
            if plugin.insert_break(&mut self.editor) == Intercept::Done {
                handled = true;
                break;
            }
        }
        if !handled {
            self.editor.split_block();
        }
        self.normalize();
    }

    pub fn delete_backward(&mut self, unit: DeleteUnit) {
        // a non-collapsed selection deletes as a range, no plugin gets a
        // say
        let collapsed = self
            .editor
            .selection()
            .map(Range::is_collapsed)
            .unwrap_or(false);
        let mut handled = false;
        if collapsed {
            for plugin in &self.plugins {
                if plugin.delete_backward(&mut self.editor, unit) == Intercept::Done {
                    handled = true;
                    break;
                }
            }
        }
        if !handled {
            self.editor.delete_backward(unit);
        }
        self.normalize();
    }

    pub fn insert_fragment(&mut self, nodes: Vec<Node>) {
        self.editor.insert_fragment(nodes);
        self.normalize();
    }

    // Formatting commands

    pub fn toggle_mark(&mut self, mark: Mark) {
        marks::toggle_mark(&mut self.editor, mark);
        self.normalize();
    }

    pub fn is_mark_active(&self, mark: Mark) -> bool {
        marks::is_mark_active(&self.editor, mark)
    }

    pub fn marks_at(&self) -> MarkSet {
        marks::marks_at(&self.editor)
    }

    pub fn toggle_block(&mut self, kind: ElementKind) {
        blocks::toggle_block(&mut self.editor, kind);
        self.normalize();
    }

    pub fn update_block(&mut self, kind: ElementKind) {
        blocks::update_block(&mut self.editor, kind);
        self.normalize();
    }

    pub fn is_block_active(&self, format: BlockFormat) -> bool {
        blocks::is_block_active(&self.editor, format)
    }

    pub fn detect_block_format(&self, formats: &[BlockFormat]) -> Option<BlockFormat> {
        blocks::detect_block_format(&self.editor, formats)
    }

    pub fn insert_image(&mut self, url: impl Into<String>) {
        plugins::image::insert_image(&mut self.editor, url);
        self.normalize();
    }

    pub fn wrap_link(&mut self, url: &str) {
        plugins::link::wrap_link(&mut self.editor, url);
        self.normalize();
    }

    pub fn unwrap_link(&mut self) {
        plugins::link::unwrap_link(&mut self.editor);
        self.normalize();
    }

    // HTML bridge

    /// Pastes an HTML fragment at the selection.
    pub fn insert_html(&mut self, input: &str) {
        let nodes = html::deserialize(input);
        self.editor.insert_fragment(nodes);
        self.normalize();
    }

    /// Whole document as an HTML fragment.
    pub fn serialize_html(&self) -> String {
        html::serialize(self.editor.children())
    }

    /// Runs base rules and plugin repairs to a fixed point. Each fix
    /// restarts the pass so later rules always see fresh paths.
    fn normalize(&mut self) {
        for pass in 0..MAX_NORMALIZE_PASSES {
            if self.editor.normalize_base_once() {
                continue;
            }
            let element_paths: Vec<Path> = self
                .editor
                .node_entries()
                .into_iter()
                .filter(|(_, node)| node.is_element())
                .map(|(path, _)| path)
                .collect();
            let mut changed = false;
            'scan: for path in &element_paths {
                for plugin in &self.plugins {
                    if plugin.normalize_node(&mut self.editor, path) {
                        changed = true;
                        break 'scan;
                    }
                }
            }
            if !changed {
                debug!(passes = pass + 1, "normalization settled");
                self.editor.clamp_selection();
                return;
            }
        }
        warn!(
            passes = MAX_NORMALIZE_PASSES,
            "normalization did not settle; giving up"
        );
        self.editor.clamp_selection();
    }
}
