//! Document tree primitives: nodes, paths, points and ranges.

pub mod node;
pub mod path;
pub mod point;

pub use node::{
    BlockFormat, ElementKind, ElementNode, HeadingLevel, ListKind, Mark, MarkSet, Node, TextNode,
};
pub use path::Path;
pub use point::{Edge, Point, Range};
