//! Primitive structural mutations.
//!
//! Every operation here keeps the selection attached to real text
//! positions: points inside a moved or merged subtree are rebased onto the
//! destination, points elsewhere are shifted by the usual path
//! transforms, and anything left dangling is snapped by
//! [`Editor::clamp_selection`].

use crate::model::{ElementKind, Node, Path, Point, Range};

use super::Editor;

/// Granularity of a backward deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteUnit {
    Character,
    Line,
}

impl Editor {
    // Node insertion / removal

    /// Inserts `node` as a sibling at `at`, shifting following paths.
    pub fn insert_node(&mut self, at: &Path, node: Node) {
        if !self.insert_node_raw(at, node) {
            return;
        }
        if let Some(sel) = &mut self.selection {
            sel.anchor.path = sel.anchor.path.transform_insert(at);
            sel.focus.path = sel.focus.path.transform_insert(at);
        }
    }

    pub(crate) fn insert_node_raw(&mut self, at: &Path, node: Node) -> bool {
        let Some(parent) = at.parent() else {
            return false;
        };
        let Some(index) = at.last() else {
            return false;
        };
        let Some(children) = self.child_list_mut(&parent) else {
            return false;
        };
        let index = index.min(children.len());
        children.insert(index, node);
        true
    }

    /// Removes the node at `at`. Selection points inside the removed
    /// subtree land on the nearest surviving text position.
    pub fn remove_node(&mut self, at: &Path) -> Option<Node> {
        let removed = self.remove_node_raw(at)?;
        if let Some(sel) = self.selection.clone() {
            let fix = |point: Point, ed: &Editor| -> Option<Point> {
                match point.path.transform_remove(at) {
                    Some(path) => Some(Point::new(path, point.offset)),
                    None => {
                        if let Some(prev) = at.previous_sibling() {
                            if let Some(pt) = ed.last_text_point(&prev) {
                                return Some(pt);
                            }
                        }
                        if let Some(pt) = ed.first_text_point(at) {
                            return Some(pt);
                        }
                        ed.last_text_point(&Path::root())
                    }
                }
            };
            let anchor = fix(sel.anchor, self);
            let focus = fix(sel.focus, self);
            self.selection = match (anchor, focus) {
                (Some(anchor), Some(focus)) => Some(Range::new(anchor, focus)),
                _ => None,
            };
        }
        Some(removed)
    }

    pub(crate) fn remove_node_raw(&mut self, at: &Path) -> Option<Node> {
        let parent = at.parent()?;
        let index = at.last()?;
        let children = self.child_list_mut(&parent)?;
        if index >= children.len() {
            return None;
        }
        Some(children.remove(index))
    }

    /// Replaces the element type (and with it the per-type attributes) of
    /// the node at `at`.
    pub fn set_kind(&mut self, at: &Path, kind: ElementKind) {
        if let Some(el) = self.node_mut(at).and_then(Node::as_element_mut) {
            el.kind = kind;
        }
    }

    // Splitting and merging

    /// Splits the text node under `point` in two at its offset. Returns
    /// false when the offset already sits on a node boundary.
    pub(crate) fn split_text(&mut self, point: &Point) -> bool {
        let (right_text, marks) = {
            let Some(t) = self.node_mut(&point.path).and_then(Node::as_text_mut) else {
                return false;
            };
            if point.offset == 0 || point.offset >= t.text.len() {
                return false;
            }
            (t.text.split_off(point.offset), t.marks)
        };
        let right_path = point
            .path
            .next_sibling()
            .expect("text node has a sibling position");
        self.insert_node_raw(&right_path, Node::marked_text(right_text, marks));
        if let Some(sel) = &mut self.selection {
            for p in [&mut sel.anchor, &mut sel.focus] {
                if p.path == point.path && p.offset > point.offset {
                    p.path = right_path.clone();
                    p.offset -= point.offset;
                } else {
                    p.path = p.path.transform_insert(&right_path);
                }
            }
        }
        true
    }

    /// Splits the element at `at` into two siblings, moving
    /// `children[index..]` into the new right-hand element.
    pub fn split_element_at(&mut self, at: &Path, index: usize) {
        let Some(next) = at.next_sibling() else {
            return;
        };
        let (kind, tail) = {
            let Some(el) = self.node_mut(at).and_then(Node::as_element_mut) else {
                return;
            };
            if index == 0 || index >= el.children.len() {
                return;
            }
            (el.kind.clone(), el.children.split_off(index))
        };
        self.insert_node_raw(&next, Node::element(kind, tail));
        if let Some(sel) = &mut self.selection {
            for p in [&mut sel.anchor, &mut sel.focus] {
                let idx = p.path.indices().to_vec();
                if idx.len() > at.len()
                    && idx[..at.len()] == at.indices()[..]
                    && idx[at.len()] >= index
                {
                    let mut v = next.indices().to_vec();
                    v.push(idx[at.len()] - index);
                    v.extend_from_slice(&idx[at.len() + 1..]);
                    p.path = Path::new(v);
                } else {
                    p.path = p.path.transform_insert(&next);
                }
            }
        }
    }

    /// Merges the element at `at` into its previous sibling, appending its
    /// children.
    pub fn merge_node(&mut self, at: &Path) {
        let Some(prev) = at.previous_sibling() else {
            return;
        };
        self.merge_block_into(at, &prev);
    }

    /// Appends the children of the element at `from` to the element at
    /// `to` (which must precede it in document order) and removes `from`.
    pub(crate) fn merge_block_into(&mut self, from: &Path, to: &Path) {
        if from.is_ancestor_or_self_of(to) || to.is_ancestor_or_self_of(from) {
            return;
        }
        let Some(Node::Element(el)) = self.remove_node_raw(from) else {
            return;
        };
        let to = to.transform_remove(from).unwrap_or_else(|| to.clone());
        let base_len = {
            let Some(to_el) = self.node_mut(&to).and_then(Node::as_element_mut) else {
                return;
            };
            let base_len = to_el.children.len();
            to_el.children.extend(el.children);
            base_len
        };
        if let Some(sel) = &mut self.selection {
            for p in [&mut sel.anchor, &mut sel.focus] {
                let old = p.path.clone();
                if let Some(rest) = old.relative_to(from) {
                    let mut idx = rest.to_vec();
                    if let Some(first) = idx.first_mut() {
                        *first += base_len;
                    }
                    p.path = to.join(&idx);
                } else if let Some(shifted) = p.path.transform_remove(from) {
                    p.path = shifted;
                }
            }
        }
    }

    // Wrapping and unwrapping

    /// Wraps the node at `at` in a fresh element of the given kind.
    pub fn wrap_node(&mut self, at: &Path, kind: ElementKind) {
        let Some(node) = self.remove_node_raw(at) else {
            return;
        };
        self.insert_node_raw(at, Node::element(kind, vec![node]));
        if let Some(sel) = &mut self.selection {
            for p in [&mut sel.anchor, &mut sel.focus] {
                let old = p.path.clone();
                if let Some(rest) = old.relative_to(at) {
                    let mut idx = vec![0];
                    idx.extend_from_slice(rest);
                    p.path = at.join(&idx);
                }
            }
        }
    }

    /// Wraps `children[start..end]` of `parent` into one new element at
    /// index `start`.
    pub fn wrap_siblings(&mut self, parent: &Path, start: usize, end: usize, kind: ElementKind) {
        {
            let Some(children) = self.child_list_mut(parent) else {
                return;
            };
            if start >= end || end > children.len() {
                return;
            }
            let wrapped: Vec<Node> = children.drain(start..end).collect();
            children.insert(start, Node::element(kind, wrapped));
        }
        let count = end - start;
        if let Some(sel) = &mut self.selection {
            for p in [&mut sel.anchor, &mut sel.focus] {
                let idx = p.path.indices().to_vec();
                if idx.len() > parent.len() && idx[..parent.len()] == parent.indices()[..] {
                    let j = idx[parent.len()];
                    if j >= start && j < end {
                        let mut v = parent.indices().to_vec();
                        v.push(start);
                        v.push(j - start);
                        v.extend_from_slice(&idx[parent.len() + 1..]);
                        p.path = Path::new(v);
                    } else if j >= end {
                        let mut v = idx;
                        v[parent.len()] = j - count + 1;
                        p.path = Path::new(v);
                    }
                }
            }
        }
    }

    /// Replaces the element at `at` with its own children.
    pub fn unwrap_node(&mut self, at: &Path) {
        let Some(parent) = at.parent() else {
            return;
        };
        let Some(index) = at.last() else {
            return;
        };
        let Some(Node::Element(el)) = self.remove_node_raw(at) else {
            return;
        };
        let count = el.children.len();
        {
            let Some(children) = self.child_list_mut(&parent) else {
                return;
            };
            let mut insert_at = index.min(children.len());
            for child in el.children {
                children.insert(insert_at, child);
                insert_at += 1;
            }
        }
        if let Some(sel) = &mut self.selection {
            for p in [&mut sel.anchor, &mut sel.focus] {
                let idx = p.path.indices().to_vec();
                if idx.len() > at.len() && idx[..at.len()] == at.indices()[..] {
                    let mut v = at.indices().to_vec();
                    let last = v.len() - 1;
                    v[last] = index + idx[at.len()];
                    v.extend_from_slice(&idx[at.len() + 1..]);
                    p.path = Path::new(v);
                } else if idx.len() >= at.len()
                    && idx[..at.len() - 1] == at.indices()[..at.len() - 1]
                    && idx[at.len() - 1] > index
                {
                    let mut v = idx;
                    v[at.len() - 1] += count - 1;
                    p.path = Path::new(v);
                }
            }
        }
    }

    /// Moves the node at `from` to the sibling position `to`, carrying any
    /// selection inside it along.
    pub fn move_node(&mut self, from: &Path, to: &Path) {
        if from.is_ancestor_or_self_of(to) {
            return;
        }
        let Some(node) = self.remove_node_raw(from) else {
            return;
        };
        let dest = to.transform_remove(from).unwrap_or_else(|| to.clone());
        self.insert_node_raw(&dest, node);
        if let Some(sel) = &mut self.selection {
            for p in [&mut sel.anchor, &mut sel.focus] {
                let old = p.path.clone();
                if let Some(rest) = old.relative_to(from) {
                    p.path = dest.join(rest);
                } else if let Some(shifted) = p.path.transform_remove(from) {
                    p.path = shifted.transform_insert(&dest);
                }
            }
        }
    }

    /// Lifts `children[index]` of a container element out to the
    /// container's level, splitting the container when the child sits in
    /// the middle. Returns the lifted node's new path.
    pub(crate) fn lift_block_out(&mut self, container: &Path, index: usize) -> Option<Path> {
        let len = self.child_list(container)?.len();
        if index >= len {
            return None;
        }
        if len == 1 {
            self.unwrap_node(container);
            return Some(container.clone());
        }
        if index + 1 < len {
            self.split_element_at(container, index + 1);
        }
        let dest = container.next_sibling()?;
        self.move_node(&container.child(index), &dest);
        if index == 0 {
            // the left half is now childless
            self.remove_node(container);
            return Some(container.clone());
        }
        Some(dest)
    }

    // Text edits

    /// Inserts text at the collapsed selection, honoring pending marks.
    /// No-op without a selection, or in void context.
    pub fn insert_text(&mut self, text: &str) {
        let Some(sel) = self.selection.clone() else {
            return;
        };
        if !sel.is_collapsed() {
            if self.in_void(sel.start()) || self.in_void(sel.end()) {
                return;
            }
            self.delete_range(&sel);
        }
        let Some(sel) = self.selection.clone() else {
            return;
        };
        let caret = sel.anchor;
        if self.in_void(&caret) {
            return;
        }
        let Some(current_marks) = self.node(&caret.path).and_then(Node::as_text).map(|t| t.marks)
        else {
            return;
        };
        let marks = self.pending_marks.unwrap_or(current_marks);
        if marks == current_marks {
            self.splice_text(&caret, text);
            self.selection = Some(Range::collapsed(Point::new(
                caret.path,
                caret.offset + text.len(),
            )));
        } else {
            let insert_at = if caret.offset == 0 {
                caret.path.clone()
            } else {
                // middle splits; at the end split_text declines and we
                // insert after either way
                self.split_text(&caret);
                caret.path.next_sibling().expect("text node has a sibling position")
            };
            self.insert_node(&insert_at, Node::marked_text(text, marks));
            self.selection = Some(Range::collapsed(Point::new(insert_at, text.len())));
        }
    }

    fn splice_text(&mut self, point: &Point, text: &str) {
        let added = text.len();
        let offset = {
            let Some(t) = self.node_mut(&point.path).and_then(Node::as_text_mut) else {
                return;
            };
            let offset = point.offset.min(t.text.len());
            t.text.insert_str(offset, text);
            offset
        };
        if let Some(sel) = &mut self.selection {
            for p in [&mut sel.anchor, &mut sel.focus] {
                if p.path == point.path && p.offset >= offset {
                    p.offset += added;
                }
            }
        }
    }

    /// Deletes everything between the range's edges and collapses the
    /// selection to its start. Blocks that straddle the range are merged.
    pub fn delete_range(&mut self, range: &Range) {
        if range.is_collapsed() {
            self.selection = Some(range.clone());
            return;
        }
        let s = range.start().clone();
        let e = range.end().clone();

        if s.path == e.path {
            if let Some(t) = self.node_mut(&s.path).and_then(Node::as_text_mut) {
                let from = s.offset.min(t.text.len());
                let to = e.offset.min(t.text.len());
                t.text.replace_range(from..to, "");
            }
            self.selection = Some(Range::collapsed(s));
            return;
        }

        let sb = self.block_above(&s.path);
        let eb = self.block_above(&e.path);

        if let Some(t) = self.node_mut(&s.path).and_then(Node::as_text_mut) {
            t.text.truncate(s.offset.min(t.text.len()));
        }
        if let Some(t) = self.node_mut(&e.path).and_then(Node::as_text_mut) {
            let to = e.offset.min(t.text.len());
            t.text.replace_range(..to, "");
        }

        let covered: Vec<Path> = self
            .texts_in(range)
            .into_iter()
            .map(|(path, _, _)| path)
            .filter(|path| *path != s.path && *path != e.path)
            .collect();

        let mut s_pt = Point::new(s.path.clone(), s.offset);
        let mut e_pt = Point::new(e.path.clone(), 0);
        for path in covered.iter().rev() {
            self.remove_node_raw(path);
            for p in [&mut s_pt, &mut e_pt] {
                if let Some(shifted) = p.path.transform_remove(path) {
                    p.path = shifted;
                }
            }
        }
        self.purge_childless(&mut s_pt, &mut e_pt);

        if sb.is_some() && sb != eb {
            let sb2 = self.block_above(&s_pt.path);
            let eb2 = self.block_above(&e_pt.path);
            if let (Some(sb2), Some(eb2)) = (sb2, eb2) {
                if sb2 != eb2 {
                    // remap through the merge by temporarily making the
                    // points the selection
                    let saved = self.selection.take();
                    self.selection = Some(Range::new(s_pt.clone(), e_pt.clone()));
                    self.merge_block_into(&eb2, &sb2);
                    if let Some(sel) = self.selection.take() {
                        s_pt = sel.anchor;
                        e_pt = sel.focus;
                    }
                    self.selection = saved;
                    self.prune_empty_ancestors(eb2.parent());
                }
            }
        }
        let _ = e_pt;
        self.selection = Some(Range::collapsed(s_pt));
        self.clamp_selection();
    }

    /// Deletes the current selection when it is non-collapsed.
    pub fn delete_selection(&mut self) {
        if let Some(sel) = self.selection.clone() {
            if !sel.is_collapsed() {
                self.delete_range(&sel);
            }
        }
    }

    fn purge_childless(&mut self, s_pt: &mut Point, e_pt: &mut Point) {
        loop {
            let Some(path) = self.find_childless_element() else {
                break;
            };
            self.remove_node_raw(&path);
            for p in [&mut *s_pt, &mut *e_pt] {
                if let Some(shifted) = p.path.transform_remove(&path) {
                    p.path = shifted;
                }
            }
        }
    }

    fn find_childless_element(&self) -> Option<Path> {
        fn walk(children: &[Node], base: &Path) -> Option<Path> {
            for (index, child) in children.iter().enumerate() {
                if let Node::Element(el) = child {
                    let path = base.child(index);
                    if el.children.is_empty() {
                        return Some(path);
                    }
                    if let Some(found) = walk(&el.children, &path) {
                        return Some(found);
                    }
                }
            }
            None
        }
        walk(&self.children, &Path::root())
    }

    /// Removes childless ancestors starting at `from`, walking upward
    /// until a non-empty element (or the root) is reached.
    pub(crate) fn prune_empty_ancestors(&mut self, from: Option<Path>) {
        let mut current = from;
        while let Some(path) = current {
            if path.is_empty() {
                break;
            }
            let empty = self
                .child_list(&path)
                .map(|children| children.is_empty())
                .unwrap_or(false);
            if !empty {
                break;
            }
            let parent = path.parent();
            self.remove_node(&path);
            current = parent;
        }
    }

    /// Splits text nodes at the range edges so both edges sit on node
    /// boundaries; returns the aligned range.
    pub(crate) fn align_range(&mut self, range: &Range) -> Range {
        let s = range.start().clone();
        let mut e = range.end().clone();
        self.split_text(&e);
        let mut start = s.clone();
        if self.split_text(&s) {
            let right = s.path.next_sibling().expect("split produced a sibling");
            if e.path == s.path {
                e = Point::new(right.clone(), e.offset - s.offset);
            } else {
                e = Point::new(e.path.transform_insert(&right), e.offset);
            }
            start = Point::new(right, 0);
        }
        Range::new(start, e)
    }

    // Block-level behavior

    /// Base `insertBreak`: splits the enclosing block at the caret into
    /// two blocks of the same kind and moves the caret to the second.
    pub fn split_block(&mut self) {
        let Some(sel) = self.selection.clone() else {
            return;
        };
        if !sel.is_collapsed() {
            self.delete_range(&sel);
        }
        let Some(sel) = self.selection.clone() else {
            return;
        };
        let caret = sel.anchor;
        let Some(block_path) = self.block_above(&caret.path) else {
            return;
        };
        if self
            .kind_at(&block_path)
            .map(|k| k.is_void())
            .unwrap_or(false)
        {
            let after = block_path.next_sibling().expect("block has a sibling position");
            self.insert_node(&after, Node::empty_paragraph());
            if let Some(pt) = self.first_text_point(&after) {
                self.selection = Some(Range::collapsed(pt));
            }
            return;
        }

        let depth = block_path.len();
        let child_idx = caret.path.indices()[depth];
        let split_idx = if caret.path.len() == depth + 1 {
            self.block_split_index(&caret, child_idx)
        } else {
            self.inline_split_index(&block_path, &caret, child_idx)
        };

        let Some(kind) = self.kind_at(&block_path).cloned() else {
            return;
        };
        let next = block_path.next_sibling().expect("block has a sibling position");
        let len = self
            .child_list(&block_path)
            .map(|children| children.len())
            .unwrap_or(0);
        if split_idx >= len {
            self.insert_node(&next, Node::element(kind, vec![Node::text("")]));
        } else if split_idx == 0 {
            self.insert_node(&block_path, Node::element(kind, vec![Node::text("")]));
        } else {
            self.split_element_at(&block_path, split_idx);
        }
        if let Some(pt) = self.first_text_point(&next) {
            self.selection = Some(Range::collapsed(pt));
        }
    }

    fn block_split_index(&mut self, caret: &Point, child_idx: usize) -> usize {
        let len = self
            .node(&caret.path)
            .and_then(Node::as_text)
            .map(|t| t.text.len())
            .unwrap_or(0);
        if caret.offset >= len {
            child_idx + 1
        } else if caret.offset == 0 {
            child_idx
        } else {
            self.split_text(caret);
            child_idx + 1
        }
    }

    fn inline_split_index(&mut self, block_path: &Path, caret: &Point, child_idx: usize) -> usize {
        let depth = block_path.len();
        let inline_path = Path::new(caret.path.indices()[..depth + 1].to_vec());
        let inner_idx = caret.path.indices()[depth + 1];
        let len = self
            .node(&caret.path)
            .and_then(Node::as_text)
            .map(|t| t.text.len())
            .unwrap_or(0);
        let inline_len = self
            .child_list(&inline_path)
            .map(|children| children.len())
            .unwrap_or(0);
        if caret.offset == 0 && inner_idx == 0 {
            child_idx
        } else if caret.offset >= len && inner_idx + 1 == inline_len {
            child_idx + 1
        } else {
            self.split_text(caret);
            let boundary = inner_idx + if caret.offset > 0 { 1 } else { 0 };
            self.split_element_at(&inline_path, boundary);
            child_idx + 1
        }
    }

    /// Base `deleteBackward`: removes the previous character, or merges
    /// the block with what precedes it when the caret sits at a block
    /// boundary.
    pub fn delete_backward(&mut self, unit: DeleteUnit) {
        let Some(sel) = self.selection.clone() else {
            return;
        };
        if !sel.is_collapsed() {
            self.delete_range(&sel);
            return;
        }
        let caret = sel.anchor;
        match unit {
            DeleteUnit::Line => {
                if let Some((before, range)) = self.before_text() {
                    if !before.is_empty() {
                        self.delete_range(&range);
                        return;
                    }
                }
                self.merge_block_backward();
            }
            DeleteUnit::Character => {
                if caret.offset > 0 {
                    let Some(t) = self.node(&caret.path).and_then(Node::as_text) else {
                        return;
                    };
                    let ch = t.text[..caret.offset]
                        .chars()
                        .last()
                        .map(|c| c.len_utf8())
                        .unwrap_or(1);
                    let from = Point::new(caret.path.clone(), caret.offset - ch);
                    self.delete_range(&Range::new(from, caret));
                } else if let Some(prev) = self.previous_text_point(&caret) {
                    if self.block_above(&prev.path) == self.block_above(&caret.path) {
                        self.selection = Some(Range::collapsed(prev.clone()));
                        if prev.offset > 0 {
                            self.delete_backward(DeleteUnit::Character);
                        }
                    } else {
                        self.merge_block_backward();
                    }
                } else {
                    self.merge_block_backward();
                }
            }
        }
    }

    fn merge_block_backward(&mut self) {
        let Some(sel) = self.selection.clone() else {
            return;
        };
        let Some(block) = self.block_above(&sel.anchor.path) else {
            return;
        };
        let Some(prev) = block.previous_sibling() else {
            // first child of its parent: boundary behavior belongs to the
            // per-type plugins
            return;
        };
        let Some(prev_kind) = self.kind_at(&prev).cloned() else {
            return;
        };
        if prev_kind.is_void() {
            self.remove_node(&prev);
        } else if prev_kind.is_container() {
            let target = self.deepest_last_block(&prev);
            self.merge_block_into(&block, &target);
        } else {
            self.merge_block_into(&block, &prev);
        }
    }

    /// Innermost non-container element reachable by walking last
    /// children down from `path`.
    pub(crate) fn deepest_last_block(&self, path: &Path) -> Path {
        let mut current = path.clone();
        loop {
            let Some(children) = self.child_list(&current) else {
                return current;
            };
            let Some(last) = children.last() else {
                return current;
            };
            match last {
                Node::Element(el) if !el.kind.is_inline() && !el.kind.is_void() => {
                    current = current.child(children.len() - 1);
                }
                _ => return current,
            }
        }
    }

    /// Inserts a pasted fragment at the selection: inline fragments splice
    /// into the current block, block fragments land after it (replacing it
    /// when it is empty).
    pub fn insert_fragment(&mut self, nodes: Vec<Node>) {
        if nodes.is_empty() {
            return;
        }
        self.delete_selection();
        let Some(sel) = self.selection.clone() else {
            return;
        };
        let caret = sel.anchor;
        let all_inline = nodes.iter().all(|n| match n {
            Node::Text(_) => true,
            Node::Element(el) => el.kind.is_inline(),
        });
        if all_inline {
            let at = if caret.offset == 0 {
                caret.path.clone()
            } else {
                self.split_text(&caret);
                caret.path.next_sibling().expect("text node has a sibling position")
            };
            let count = nodes.len();
            let mut insert_at = at.clone();
            for node in nodes {
                self.insert_node(&insert_at, node);
                insert_at = insert_at.next_sibling().expect("sibling position");
            }
            let last = at.with_last(at.last().unwrap_or(0) + count - 1);
            if let Some(pt) = self.last_text_point(&last) {
                self.selection = Some(Range::collapsed(pt));
            }
        } else {
            let Some(block) = self.block_above(&caret.path) else {
                return;
            };
            let mut at = if self.node_string(&block).is_empty() {
                self.remove_node(&block);
                block
            } else {
                block.next_sibling().expect("block has a sibling position")
            };
            let mut last = at.clone();
            for node in nodes {
                self.insert_node(&at, node);
                last = at.clone();
                at = at.next_sibling().expect("sibling position");
            }
            if let Some(pt) = self.last_text_point(&last) {
                self.selection = Some(Range::collapsed(pt));
            }
        }
    }
}
