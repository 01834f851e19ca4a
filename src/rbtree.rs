//! Red-black tree of case-insensitive strings.
//!
//! Each bucket of a [`StrMap`](crate::StrMap) resolves collisions with one of
//! these trees. Nodes live in a per-tree arena and refer to each other by
//! [`NodeId`]. The `left`/`right` links describe the ownership tree; the
//! `parent` link is a back-reference used only to climb during rebalancing
//! and by [`RbTree::current_root`]. Nodes are never removed, so the arena
//! only grows and is released in one piece when the tree is dropped or
//! cleared.
//!
//! Insertion and repair are iterative, so neither pathological insertion
//! order nor a long chain of recolorings grows the call stack.

use std::cmp::Ordering;
use std::fmt;

use smallvec::SmallVec;

// =============================================================================
// Ordering
// =============================================================================

/// Lexicographic comparison ignoring ASCII case (`strcasecmp` order).
#[inline]
pub fn cmp_ignore_ascii_case(a: &str, b: &str) -> Ordering {
    let a = a.bytes().map(|c| c.to_ascii_lowercase());
    let b = b.bytes().map(|c| c.to_ascii_lowercase());
    a.cmp(b)
}

// =============================================================================
// Nodes
// =============================================================================

/// Node color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// Handle to a node inside one [`RbTree`].
///
/// Only meaningful for the tree that returned it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    fn idx(self) -> usize {
        self.0 as usize
    }
}

struct Node {
    value: Box<str>,
    color: Color,
    left: Option<NodeId>,
    right: Option<NodeId>,
    /// Back-reference; never followed for deallocation.
    parent: Option<NodeId>,
}

// Traversal stacks stay inline up to this depth, which covers trees of
// roughly 2^16 entries.
type Stack<T> = SmallVec<[T; 32]>;

// =============================================================================
// Tree
// =============================================================================

/// An ordered set of strings compared without regard to ASCII case.
///
/// The first spelling inserted is the one kept; later case-insensitive
/// duplicates leave the tree unchanged.
///
/// A tree holds at most `u32::MAX - 1` nodes; inserting beyond that panics.
#[derive(Default)]
pub struct RbTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl RbTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Creates a one-node tree holding `value`. The root is black.
    pub fn with_value(value: &str) -> Self {
        let mut tree = Self::new();
        tree.insert(value);
        tree
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The tracked root, kept current across rotations.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Finds the root by following back-references up from `from`.
    ///
    /// Always agrees with [`RbTree::root`]; offered for callers that hold a
    /// node handle and want the top of its tree.
    pub fn current_root(&self, from: NodeId) -> NodeId {
        let mut n = from;
        while let Some(p) = self.node(n).parent {
            n = p;
        }
        n
    }

    pub fn value(&self, id: NodeId) -> &str {
        &self.node(id).value
    }

    pub fn color(&self, id: NodeId) -> Color {
        self.node(id).color
    }

    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).left
    }

    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).right
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Looks up `value` ignoring ASCII case.
    pub fn find(&self, value: &str) -> Option<NodeId> {
        let mut cur = self.root;
        while let Some(id) = cur {
            let node = self.node(id);
            cur = match cmp_ignore_ascii_case(value, &node.value) {
                Ordering::Equal => return Some(id),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        None
    }

    pub fn contains(&self, value: &str) -> bool {
        self.find(value).is_some()
    }

    /// Inserts `value`, rebalancing as needed.
    ///
    /// Returns the node holding the value and whether it was newly
    /// inserted. A case-insensitive duplicate is a no-op: the existing
    /// node is returned with `false` and the tree shape is untouched.
    pub fn insert(&mut self, value: &str) -> (NodeId, bool) {
        let mut parent = None;
        let mut goes_left = false;
        let mut cur = self.root;
        while let Some(id) = cur {
            let node = self.node(id);
            match cmp_ignore_ascii_case(value, &node.value) {
                Ordering::Equal => return (id, false),
                Ordering::Less => {
                    goes_left = true;
                    cur = node.left;
                }
                Ordering::Greater => {
                    goes_left = false;
                    cur = node.right;
                }
            }
            parent = Some(id);
        }

        let id = self.alloc(value, parent);
        match parent {
            None => self.root = Some(id),
            Some(p) if goes_left => self.node_mut(p).left = Some(id),
            Some(p) => self.node_mut(p).right = Some(id),
        }
        self.repair_after_insert(id);
        (id, true)
    }

    /// Height of the tree in nodes (0 when empty).
    pub fn height(&self) -> usize {
        let mut max = 0;
        let mut stack: Stack<(NodeId, usize)> = SmallVec::new();
        if let Some(root) = self.root {
            stack.push((root, 1));
        }
        while let Some((id, depth)) = stack.pop() {
            max = max.max(depth);
            let node = self.node(id);
            if let Some(l) = node.left {
                stack.push((l, depth + 1));
            }
            if let Some(r) = node.right {
                stack.push((r, depth + 1));
            }
        }
        max
    }

    /// In-order iteration, i.e. case-insensitive ascending order.
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter {
            tree: self,
            stack: SmallVec::new(),
        };
        iter.push_left_spine(self.root);
        iter
    }

    /// Writes the tree sideways in order, one node per line, indented two
    /// spaces per level. Red nodes are wrapped in parentheses; black nodes
    /// are prefixed with a space.
    pub fn write_tree(&self, out: &mut impl fmt::Write) -> fmt::Result {
        let mut stack: Stack<(NodeId, usize)> = SmallVec::new();
        let mut cur = self.root.map(|r| (r, 0));
        loop {
            while let Some((id, depth)) = cur {
                stack.push((id, depth));
                cur = self.left(id).map(|l| (l, depth + 1));
            }
            let Some((id, depth)) = stack.pop() else {
                return Ok(());
            };
            let node = self.node(id);
            let indent = "  ".repeat(depth);
            match node.color {
                Color::Red => writeln!(out, "{indent}({})", node.value)?,
                Color::Black => writeln!(out, "{indent} {}", node.value)?,
            }
            cur = node.right.map(|r| (r, depth + 1));
        }
    }

    /// The output of [`RbTree::write_tree`] as a string.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_tree(&mut out);
        out
    }

    /// Print the tree structure for debugging.
    pub fn debug_print(&self) {
        println!("=== RbTree Debug ===");
        println!("Size: {}", self.len());
        if self.is_empty() {
            println!("(empty)");
        } else {
            print!("{}", self.dump());
        }
        println!("====================");
    }

    /// Releases every node.
    pub fn clear(&mut self) {
        self.nodes = Vec::new();
        self.root = None;
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    #[inline]
    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.idx()]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.idx()]
    }

    #[inline]
    fn set_color(&mut self, id: NodeId, color: Color) {
        self.node_mut(id).color = color;
    }

    fn alloc(&mut self, value: &str, parent: Option<NodeId>) -> NodeId {
        assert!(self.nodes.len() < u32::MAX as usize, "RbTree node limit reached");
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            value: value.into(),
            color: Color::Red,
            left: None,
            right: None,
            parent,
        });
        id
    }

    /// Restores the red-black properties after `n` was attached as a red
    /// leaf.
    fn repair_after_insert(&mut self, mut n: NodeId) {
        loop {
            let Some(mut p) = self.parent(n) else {
                self.set_color(n, Color::Black);
                return;
            };
            if self.color(p) == Color::Black {
                return;
            }
            // A red parent is never the root.
            let Some(g) = self.parent(p) else {
                self.set_color(p, Color::Black);
                return;
            };

            let parent_is_left = self.left(g) == Some(p);
            let uncle = if parent_is_left {
                self.right(g)
            } else {
                self.left(g)
            };

            if let Some(u) = uncle.filter(|&u| self.color(u) == Color::Red) {
                self.set_color(p, Color::Black);
                self.set_color(u, Color::Black);
                self.set_color(g, Color::Red);
                n = g;
                continue;
            }

            // Straighten a zig-zag so that n, p and g lie on one line.
            if parent_is_left && self.right(p) == Some(n) {
                self.rotate_left(p);
                std::mem::swap(&mut n, &mut p);
            } else if !parent_is_left && self.left(p) == Some(n) {
                self.rotate_right(p);
                std::mem::swap(&mut n, &mut p);
            }

            self.set_color(p, Color::Black);
            self.set_color(g, Color::Red);
            if parent_is_left {
                self.rotate_right(g);
            } else {
                self.rotate_left(g);
            }
            return;
        }
    }

    /// Replaces `old` with `new` in the child slot of `old`'s parent, or
    /// as the root.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: NodeId) {
        match parent {
            None => self.root = Some(new),
            Some(p) => {
                let pn = self.node_mut(p);
                if pn.left == Some(old) {
                    pn.left = Some(new);
                } else {
                    debug_assert_eq!(pn.right, Some(old));
                    pn.right = Some(new);
                }
            }
        }
    }

    /// ```text
    ///     x                y
    ///    / \              / \
    ///   a   y     =>     x   c
    ///      / \          / \
    ///     b   c        a   b
    /// ```
    /// Re-links the back-references of `x`, `y` and `b`.
    fn rotate_left(&mut self, x: NodeId) {
        let Some(y) = self.right(x) else {
            unreachable!("rotate_left requires a right child");
        };
        let b = self.left(y);
        let xp = self.parent(x);

        self.node_mut(x).right = b;
        if let Some(b) = b {
            self.node_mut(b).parent = Some(x);
        }
        self.node_mut(y).parent = xp;
        self.replace_child(xp, x, y);
        self.node_mut(y).left = Some(x);
        self.node_mut(x).parent = Some(y);
    }

    /// Mirror of [`RbTree::rotate_left`].
    fn rotate_right(&mut self, x: NodeId) {
        let Some(y) = self.left(x) else {
            unreachable!("rotate_right requires a left child");
        };
        let b = self.right(y);
        let xp = self.parent(x);

        self.node_mut(x).left = b;
        if let Some(b) = b {
            self.node_mut(b).parent = Some(x);
        }
        self.node_mut(y).parent = xp;
        self.replace_child(xp, x, y);
        self.node_mut(y).right = Some(x);
        self.node_mut(x).parent = Some(y);
    }
}

impl fmt::Debug for RbTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a RbTree {
    type Item = &'a str;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over an [`RbTree`].
pub struct Iter<'a> {
    tree: &'a RbTree,
    stack: Stack<NodeId>,
}

impl<'a> Iter<'a> {
    fn push_left_spine(&mut self, mut cur: Option<NodeId>) {
        while let Some(id) = cur {
            self.stack.push(id);
            cur = self.tree.left(id);
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.push_left_spine(self.tree.right(id));
        Some(self.tree.value(id))
    }
}

// =============================================================================
// Validation
// =============================================================================

#[cfg(test)]
impl RbTree {
    fn is_red(&self, id: Option<NodeId>) -> bool {
        id.is_some_and(|id| self.node(id).color == Color::Red)
    }

    /// Asserts every structural and coloring invariant and returns the
    /// black-height of the tree.
    pub(crate) fn validate(&self) -> usize {
        fn walk(t: &RbTree, id: NodeId, parent: Option<NodeId>) -> usize {
            let node = t.node(id);
            assert_eq!(node.parent, parent, "stale back-reference at {:?}", node.value);
            if node.color == Color::Red {
                assert!(!t.is_red(node.left), "red node {:?} has red left child", node.value);
                assert!(!t.is_red(node.right), "red node {:?} has red right child", node.value);
            }
            let lh = node.left.map_or(1, |l| walk(t, l, Some(id)));
            let rh = node.right.map_or(1, |r| walk(t, r, Some(id)));
            assert_eq!(lh, rh, "black-height mismatch under {:?}", node.value);
            lh + usize::from(node.color == Color::Black)
        }

        let Some(root) = self.root else {
            assert!(self.nodes.is_empty());
            return 0;
        };
        assert_eq!(self.color(root), Color::Black, "root must be black");
        assert_eq!(self.parent(root), None);

        let values: Vec<&str> = self.iter().collect();
        assert_eq!(values.len(), self.len(), "unreachable nodes in arena");
        for w in values.windows(2) {
            assert_eq!(
                cmp_ignore_ascii_case(w[0], w[1]),
                Ordering::Less,
                "in-order values out of order: {:?} then {:?}",
                w[0],
                w[1]
            );
        }

        walk(self, root, None)
    }
}
