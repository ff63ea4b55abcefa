//! The comment tree and the operations that derive new versions of it.
//!
//! A [`Tree`] is immutable once built. Submitting a comment or a reply
//! produces a new `Tree` that shares every untouched subtree with the old
//! one, so previous snapshots stay valid and cheap to keep around.

mod mutation;
mod store;

pub use mutation::{add_reply, submit_comment, MutationContext, ReplyOutcome, SubmitOutcome};
pub use store::TreeStore;

use crate::error::{Result, ThreadError};
use crate::types::{Node, NodeId};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

/// Ordered sequence of top-level comments, newest first once the session
/// starts submitting.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tree {
    comments: Vec<Arc<Node>>,
}

impl Tree {
    /// An empty tree.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a tree from seed nodes, checking id uniqueness, parent links
    /// and nesting depth.
    pub fn from_nodes(nodes: Vec<Node>, max_depth: usize) -> Result<Self> {
        let tree = Self {
            comments: nodes.into_iter().map(Arc::new).collect(),
        };
        tree.validate(max_depth)?;
        Ok(tree)
    }

    pub(crate) fn from_shared(comments: Vec<Arc<Node>>) -> Self {
        Self { comments }
    }

    /// Check the structural invariants over the whole tree.
    pub fn validate(&self, max_depth: usize) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in self.walk() {
            let node = entry.node;
            if !seen.insert(&node.id) {
                return Err(ThreadError::DuplicateId(node.id.clone()));
            }
            if node.parent_id.as_ref() != entry.parent {
                return Err(ThreadError::BrokenLinkage {
                    node: node.id.clone(),
                    expected: entry.parent.cloned(),
                    got: node.parent_id.clone(),
                });
            }
            if entry.depth > max_depth {
                return Err(ThreadError::DepthExceeded {
                    node: node.id.clone(),
                    depth: entry.depth,
                    max: max_depth,
                });
            }
        }
        Ok(())
    }

    /// Top-level comments in order.
    pub fn comments(&self) -> &[Arc<Node>] {
        &self.comments
    }

    /// Number of top-level comments.
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Number of nodes at every depth.
    pub fn total_nodes(&self) -> usize {
        self.walk().count()
    }

    /// Pre-order walk over every node, top-level first, replies in arrival
    /// order.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: self
                .comments
                .iter()
                .rev()
                .map(|node| WalkEntry {
                    node,
                    parent: None,
                    depth: 0,
                })
                .collect(),
        }
    }

    /// Find a node anywhere in the tree.
    pub fn find(&self, id: &NodeId) -> Option<&Arc<Node>> {
        self.walk().find(|e| &e.node.id == id).map(|e| e.node)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.find(id).is_some()
    }

    /// Depth of a node; top-level comments are at depth 0.
    pub fn depth_of(&self, id: &NodeId) -> Option<usize> {
        self.walk().find(|e| &e.node.id == id).map(|e| e.depth)
    }

    /// Index path from the top-level sequence down to `id`, restricted to
    /// the first `levels` levels.
    pub(crate) fn path_to(&self, id: &NodeId, levels: usize) -> Option<Vec<usize>> {
        let mut stack: Vec<(&Arc<Node>, Vec<usize>)> = self
            .comments
            .iter()
            .enumerate()
            .rev()
            .map(|(i, node)| (node, vec![i]))
            .collect();

        while let Some((node, path)) = stack.pop() {
            if &node.id == id {
                return Some(path);
            }
            if path.len() >= levels {
                continue;
            }
            for (i, reply) in node.replies.iter().enumerate().rev() {
                let mut child_path = path.clone();
                child_path.push(i);
                stack.push((reply, child_path));
            }
        }
        None
    }
}

/// A node visited by [`Tree::walk`].
#[derive(Clone, Copy, Debug)]
pub struct WalkEntry<'a> {
    pub node: &'a Arc<Node>,
    /// Id of the node whose replies contain this one.
    pub parent: Option<&'a NodeId>,
    pub depth: usize,
}

/// Explicit-stack pre-order traversal.
pub struct Walk<'a> {
    stack: Vec<WalkEntry<'a>>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = WalkEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.stack.pop()?;
        for reply in entry.node.replies.iter().rev() {
            self.stack.push(WalkEntry {
                node: reply,
                parent: Some(&entry.node.id),
                depth: entry.depth + 1,
            });
        }
        Some(entry)
    }
}
