//! Pure tree transitions: new top-level comments and replies.
//!
//! Both functions take the current tree and return the next one together
//! with an outcome. When nothing happens the returned tree is a clone of the
//! input that shares every node with it.

use super::Tree;
use crate::collab::{Clock, IdSource};
use crate::types::{Author, Node, NodeId, ReplyScope};
use std::sync::Arc;

/// What the mutation engine needs besides the tree itself.
#[derive(Clone, Copy)]
pub struct MutationContext<'a> {
    pub ids: &'a dyn IdSource,
    pub clock: &'a dyn Clock,
    pub scope: ReplyScope,
    /// Deepest allowed depth for a new node (top-level is 0).
    pub max_depth: usize,
}

/// Result of submitting a top-level comment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Added(NodeId),
    EmptyContent,
    NoAuthor,
    /// The id source produced an id already in the tree.
    IdCollision(NodeId),
}

impl SubmitOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, SubmitOutcome::Added(_))
    }

    pub fn node_id(&self) -> Option<&NodeId> {
        match self {
            SubmitOutcome::Added(id) => Some(id),
            _ => None,
        }
    }
}

/// Result of submitting a reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReplyOutcome {
    Added { id: NodeId, parent: NodeId },
    EmptyContent,
    NoAuthor,
    ParentNotFound,
    DepthLimitReached,
    /// The id source produced an id already in the tree.
    IdCollision(NodeId),
}

impl ReplyOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ReplyOutcome::Added { .. })
    }

    pub fn node_id(&self) -> Option<&NodeId> {
        match self {
            ReplyOutcome::Added { id, .. } => Some(id),
            _ => None,
        }
    }
}

/// Trimmed content, or `None` if nothing is left.
fn normalize(content: &str) -> Option<&str> {
    let trimmed = content.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Prepend a new comment to the top-level sequence.
pub fn submit_comment(
    tree: &Tree,
    ctx: MutationContext<'_>,
    content: &str,
    author: Option<&Author>,
) -> (Tree, SubmitOutcome) {
    let Some(content) = normalize(content) else {
        return (tree.clone(), SubmitOutcome::EmptyContent);
    };
    let Some(author) = author else {
        return (tree.clone(), SubmitOutcome::NoAuthor);
    };

    let id = ctx.ids.new_id();
    if tree.contains(&id) {
        return (tree.clone(), SubmitOutcome::IdCollision(id));
    }
    let node = Node::comment(id.clone(), author.clone(), content, ctx.clock.now());

    let mut comments = Vec::with_capacity(tree.len() + 1);
    comments.push(Arc::new(node));
    comments.extend(tree.comments().iter().cloned());

    (Tree::from_shared(comments), SubmitOutcome::Added(id))
}

/// Append a reply to the end of `parent_id`'s replies.
///
/// Only the ancestor chain of the parent is rebuilt; every other node in the
/// returned tree is the same `Arc` as in `tree`.
pub fn add_reply(
    tree: &Tree,
    ctx: MutationContext<'_>,
    parent_id: &NodeId,
    content: &str,
    author: Option<&Author>,
) -> (Tree, ReplyOutcome) {
    let Some(content) = normalize(content) else {
        return (tree.clone(), ReplyOutcome::EmptyContent);
    };
    let Some(author) = author else {
        return (tree.clone(), ReplyOutcome::NoAuthor);
    };

    let levels = match ctx.scope {
        ReplyScope::TopLevel => 1,
        ReplyScope::AnyDepth => usize::MAX,
    };
    let Some(path) = tree.path_to(parent_id, levels) else {
        return (tree.clone(), ReplyOutcome::ParentNotFound);
    };
    // The new reply sits one level below its parent, at depth path.len().
    if path.len() > ctx.max_depth {
        return (tree.clone(), ReplyOutcome::DepthLimitReached);
    }

    let id = ctx.ids.new_id();
    if tree.contains(&id) {
        return (tree.clone(), ReplyOutcome::IdCollision(id));
    }
    let reply = Node::reply(
        id.clone(),
        parent_id.clone(),
        author.clone(),
        content,
        ctx.clock.now(),
    );

    // Collect the ancestor chain, root first.
    let mut chain: Vec<&Arc<Node>> = Vec::with_capacity(path.len());
    let mut level = tree.comments();
    for &i in &path {
        let node = &level[i];
        chain.push(node);
        level = node.replies.as_slice();
    }

    // Rebuild bottom-up: the parent gains the reply, each ancestor swaps in
    // its rebuilt child.
    let mut rebuilt = {
        let parent = chain[chain.len() - 1];
        let mut node = Node::clone(parent);
        node.replies.push(Arc::new(reply));
        Arc::new(node)
    };
    for depth in (0..chain.len() - 1).rev() {
        let mut node = Node::clone(chain[depth]);
        node.replies[path[depth + 1]] = rebuilt;
        rebuilt = Arc::new(node);
    }

    let mut comments = tree.comments().to_vec();
    comments[path[0]] = rebuilt;

    (
        Tree::from_shared(comments),
        ReplyOutcome::Added {
            id,
            parent: parent_id.clone(),
        },
    )
}
