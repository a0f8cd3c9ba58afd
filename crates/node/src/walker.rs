//! Iterator-based tree walks
//!
//! Where [`Visitor`](crate::Visitor) suits emitters that need container
//! boundaries, a [`Walk`] is a plain iterator over every node in a subtree,
//! paired with its path.

use crate::node::ConfigNode;
use cfgtree_core::NodePath;
use std::collections::VecDeque;

/// Order in which [`ConfigNode::walk`] yields nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WalkOrder {
    /// Level by level, starting at the walk root
    BreadthFirst,
    /// Each node before its children
    #[default]
    DepthFirstPreOrder,
    /// Each node after its children
    DepthFirstPostOrder,
}

/// A node reached during a walk, with its path
#[derive(Debug, Clone)]
pub struct VisitedNode {
    path: NodePath,
    node: ConfigNode,
}

impl VisitedNode {
    /// Path from the tree root to the node
    pub fn path(&self) -> &NodePath {
        &self.path
    }

    /// The node itself
    pub fn node(&self) -> &ConfigNode {
        &self.node
    }

    /// Split into path and node
    pub fn into_parts(self) -> (NodePath, ConfigNode) {
        (self.path, self.node)
    }

    fn children(&self) -> impl DoubleEndedIterator<Item = VisitedNode> + '_ {
        self.node.children().into_iter().map(move |child| {
            let mut path = self.path.clone();
            if let Some(key) = child.key() {
                path.push(key);
            }
            VisitedNode { path, node: child }
        })
    }
}

/// Iterator returned by [`ConfigNode::walk`]
///
/// Children are read when their parent is expanded.
pub struct Walk {
    order: WalkOrder,
    queue: VecDeque<VisitedNode>,
    stack: Vec<(VisitedNode, bool)>,
}

impl Iterator for Walk {
    type Item = VisitedNode;

    fn next(&mut self) -> Option<VisitedNode> {
        match self.order {
            WalkOrder::BreadthFirst => {
                let current = self.queue.pop_front()?;
                let children: Vec<_> = current.children().collect();
                self.queue.extend(children);
                Some(current)
            }
            WalkOrder::DepthFirstPreOrder => {
                let (current, _) = self.stack.pop()?;
                let children: Vec<_> = current.children().rev().map(|c| (c, false)).collect();
                self.stack.extend(children);
                Some(current)
            }
            WalkOrder::DepthFirstPostOrder => loop {
                let (current, expanded) = self.stack.pop()?;
                if expanded {
                    return Some(current);
                }
                let children: Vec<_> = current.children().rev().map(|c| (c, false)).collect();
                self.stack.push((current, true));
                self.stack.extend(children);
            },
        }
    }
}

impl ConfigNode {
    /// Iterate over this node and every descendant in the given order
    ///
    /// The walk starts with this node itself, reported with its full path.
    pub fn walk(&self, order: WalkOrder) -> Walk {
        let start = VisitedNode {
            path: self.path(),
            node: self.clone(),
        };
        let mut walk = Walk {
            order,
            queue: VecDeque::new(),
            stack: Vec::new(),
        };
        match order {
            WalkOrder::BreadthFirst => walk.queue.push_back(start),
            WalkOrder::DepthFirstPreOrder | WalkOrder::DepthFirstPostOrder => {
                walk.stack.push((start, false))
            }
        }
        walk
    }
}
