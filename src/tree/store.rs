//! Owner of the current tree version.

use super::mutation::{add_reply, submit_comment, MutationContext, ReplyOutcome, SubmitOutcome};
use super::Tree;
use crate::types::{Author, NodeId};
use tracing::{debug, trace};

/// Holds the canonical tree and swaps in new versions as content arrives.
#[derive(Clone, Debug, Default)]
pub struct TreeStore {
    tree: Tree,
    /// Bumped on every applied mutation.
    revision: u64,
}

impl TreeStore {
    /// Start from a seed tree.
    pub fn new(tree: Tree) -> Self {
        Self { tree, revision: 0 }
    }

    /// Current tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Number of applied mutations since construction.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Prepend a new top-level comment.
    pub fn submit_comment(
        &mut self,
        ctx: MutationContext<'_>,
        content: &str,
        author: Option<&Author>,
    ) -> SubmitOutcome {
        let (next, outcome) = submit_comment(&self.tree, ctx, content, author);
        match outcome.node_id() {
            Some(id) => {
                self.tree = next;
                self.revision += 1;
                debug!(node = %id, revision = self.revision, "comment added");
            }
            None => trace!(?outcome, "comment ignored"),
        }
        outcome
    }

    /// Append a reply under `parent_id`.
    pub fn add_reply(
        &mut self,
        ctx: MutationContext<'_>,
        parent_id: &NodeId,
        content: &str,
        author: Option<&Author>,
    ) -> ReplyOutcome {
        let (next, outcome) = add_reply(&self.tree, ctx, parent_id, content, author);
        match outcome.node_id() {
            Some(id) => {
                self.tree = next;
                self.revision += 1;
                debug!(node = %id, parent = %parent_id, revision = self.revision, "reply added");
            }
            None => trace!(parent = %parent_id, ?outcome, "reply ignored"),
        }
        outcome
    }
}
