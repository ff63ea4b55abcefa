//! Per-node UI flags kept outside the tree.
//!
//! Nothing here is persisted. Entries are created the first time a node is
//! touched and read back as all-false until then.

use crate::types::NodeId;
use serde::Serialize;
use std::collections::HashMap;

/// Flags for one node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeFlags {
    pub liked: bool,
    pub replies_visible: bool,
    pub thread_expanded: bool,
}

/// Session-only interaction state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionState {
    flags: HashMap<NodeId, NodeFlags>,
    /// At most one reply box is open at a time.
    active_reply_target: Option<NodeId>,
    reply_draft: String,
    comment_draft: String,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags for a node, all false if it was never touched.
    pub fn flags(&self, id: &NodeId) -> NodeFlags {
        self.flags.get(id).copied().unwrap_or_default()
    }

    pub fn is_liked(&self, id: &NodeId) -> bool {
        self.flags(id).liked
    }

    pub fn replies_visible(&self, id: &NodeId) -> bool {
        self.flags(id).replies_visible
    }

    pub fn thread_expanded(&self, id: &NodeId) -> bool {
        self.flags(id).thread_expanded
    }

    /// Flip the like flag. Returns the new value.
    pub fn toggle_like(&mut self, id: &NodeId) -> bool {
        let entry = self.flags.entry(id.clone()).or_default();
        entry.liked = !entry.liked;
        entry.liked
    }

    /// Flip reply visibility. Returns the new value.
    pub fn toggle_replies_visible(&mut self, id: &NodeId) -> bool {
        let entry = self.flags.entry(id.clone()).or_default();
        entry.replies_visible = !entry.replies_visible;
        entry.replies_visible
    }

    /// Lift (or restore) reply truncation for a node.
    pub fn set_thread_expanded(&mut self, id: &NodeId, expanded: bool) {
        self.flags.entry(id.clone()).or_default().thread_expanded = expanded;
    }

    pub fn active_reply_target(&self) -> Option<&NodeId> {
        self.active_reply_target.as_ref()
    }

    /// Open the reply box on `target`, replacing any other open box.
    /// Targeting the node whose box is already open closes it.
    /// Returns the target after the change.
    pub fn set_active_reply_target(&mut self, target: Option<&NodeId>) -> Option<&NodeId> {
        self.active_reply_target = match target {
            Some(id) if self.active_reply_target.as_ref() == Some(id) => None,
            other => other.cloned(),
        };
        self.active_reply_target.as_ref()
    }

    pub fn reply_draft(&self) -> &str {
        &self.reply_draft
    }

    pub fn set_reply_draft(&mut self, text: impl Into<String>) {
        self.reply_draft = text.into();
    }

    /// Drop the reply text and close the reply box.
    pub fn clear_reply_draft(&mut self) {
        self.reply_draft.clear();
        self.active_reply_target = None;
    }

    pub fn comment_draft(&self) -> &str {
        &self.comment_draft
    }

    pub fn set_comment_draft(&mut self, text: impl Into<String>) {
        self.comment_draft = text.into();
    }

    pub fn clear_comment_draft(&mut self) {
        self.comment_draft.clear();
    }

    /// Number of nodes with an entry.
    pub fn tracked_nodes(&self) -> usize {
        self.flags.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    #[test]
    fn test_unknown_node_defaults_to_false() {
        let state = InteractionState::new();
        assert_eq!(state.flags(&id("x")), NodeFlags::default());
        assert_eq!(state.tracked_nodes(), 0);
    }

    #[test]
    fn test_toggle_like_flips() {
        let mut state = InteractionState::new();
        assert!(state.toggle_like(&id("a")));
        assert!(state.is_liked(&id("a")));
        assert!(!state.toggle_like(&id("a")));
        assert!(!state.is_liked(&id("a")));
        assert_eq!(state.tracked_nodes(), 1);
    }

    #[test]
    fn test_visibility_is_per_node() {
        let mut state = InteractionState::new();
        state.toggle_replies_visible(&id("a"));
        assert!(state.replies_visible(&id("a")));
        assert!(!state.replies_visible(&id("b")));
        assert!(!state.is_liked(&id("a")));
    }

    #[test]
    fn test_single_active_reply_target() {
        let mut state = InteractionState::new();
        assert_eq!(state.set_active_reply_target(Some(&id("a"))), Some(&id("a")));
        assert_eq!(state.set_active_reply_target(Some(&id("b"))), Some(&id("b")));
        // Same target again closes the box.
        assert_eq!(state.set_active_reply_target(Some(&id("b"))), None);
        state.set_active_reply_target(Some(&id("c")));
        assert_eq!(state.set_active_reply_target(None), None);
    }

    #[test]
    fn test_clear_reply_draft() {
        let mut state = InteractionState::new();
        state.set_active_reply_target(Some(&id("a")));
        state.set_reply_draft("half a thought");
        state.set_comment_draft("keep me");
        state.clear_reply_draft();
        assert_eq!(state.reply_draft(), "");
        assert!(state.active_reply_target().is_none());
        assert_eq!(state.comment_draft(), "keep me");
    }
}
