pub mod blocks;
pub mod editor;
pub mod html;
pub mod marks;
pub mod model;
pub mod plugins;
pub mod session;
pub mod shortcuts;

// Re-export key types for easier usage
pub use editor::{DocumentError, Editor};
pub use model::{
    BlockFormat, Edge, ElementKind, ElementNode, HeadingLevel, ListKind, Mark, MarkSet, Node,
    Path, Point, Range, TextNode,
};
pub use plugins::{DeleteUnit, Intercept, Plugin, default_plugins};
pub use session::Session;
