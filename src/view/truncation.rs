//! Per-node reply truncation and the flattened render of a page.
//!
//! Each node decides on its own how many replies to show, from its own
//! flags. The render walks the tree with an explicit stack, so nesting depth
//! never grows the call stack.

use crate::interaction::{InteractionState, NodeFlags};
use crate::types::{Node, NodeId};
use serde::Serialize;
use std::sync::Arc;

/// Default number of replies shown before "continue thread".
pub const DEFAULT_REPLY_PREVIEW: usize = 2;

/// How many of a node's replies are rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ReplyWindow {
    /// Replies are collapsed.
    Hidden,
    /// First `shown` replies, with a continue-thread affordance for the rest.
    Preview { shown: usize, hidden: usize },
    /// Every reply.
    Full,
}

impl ReplyWindow {
    /// Decide the window for a node with `reply_count` replies.
    pub fn for_node(reply_count: usize, flags: NodeFlags, preview: usize) -> Self {
        if !flags.replies_visible {
            ReplyWindow::Hidden
        } else if reply_count > preview && !flags.thread_expanded {
            ReplyWindow::Preview {
                shown: preview,
                hidden: reply_count - preview,
            }
        } else {
            ReplyWindow::Full
        }
    }

    /// Number of replies rendered out of `reply_count`.
    pub fn visible_count(&self, reply_count: usize) -> usize {
        match self {
            ReplyWindow::Hidden => 0,
            ReplyWindow::Preview { shown, .. } => (*shown).min(reply_count),
            ReplyWindow::Full => reply_count,
        }
    }

    pub fn continues_thread(&self) -> bool {
        matches!(self, ReplyWindow::Preview { .. })
    }
}

/// Label for the show/hide replies control.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityLabel {
    /// No replies; the control is disabled.
    NoReplies,
    ViewReplies,
    HideReplies,
}

impl VisibilityLabel {
    pub fn for_node(reply_count: usize, replies_visible: bool) -> Self {
        match (reply_count, replies_visible) {
            (0, _) => VisibilityLabel::NoReplies,
            (_, true) => VisibilityLabel::HideReplies,
            (_, false) => VisibilityLabel::ViewReplies,
        }
    }
}

/// Replies of `node` to render under the given window.
pub fn visible_replies(node: &Node, window: ReplyWindow) -> &[Arc<Node>] {
    &node.replies[..window.visible_count(node.replies.len())]
}

/// Render settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Replies shown before truncation kicks in.
    pub preview: usize,
    /// Nodes at this depth are rendered without descending further.
    pub max_depth: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            preview: DEFAULT_REPLY_PREVIEW,
            max_depth: 64,
        }
    }
}

/// A node as the presentation layer should draw it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedNode {
    pub node: Arc<Node>,
    /// Indentation level; top-level comments are 0.
    pub depth: usize,
    pub flags: NodeFlags,
    pub reply_count: usize,
    pub window: ReplyWindow,
    pub visibility_label: VisibilityLabel,
    /// Whether this node's reply box is open.
    pub reply_box_open: bool,
}

/// One line of the flattened render.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "row")]
pub enum RenderRow {
    Node(RenderedNode),
    /// Shown after the previewed replies of `parent`.
    ContinueThread {
        parent: NodeId,
        depth: usize,
        hidden: usize,
    },
}

impl RenderRow {
    pub fn as_node(&self) -> Option<&RenderedNode> {
        match self {
            RenderRow::Node(n) => Some(n),
            RenderRow::ContinueThread { .. } => None,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            RenderRow::Node(n) => n.depth,
            RenderRow::ContinueThread { depth, .. } => *depth,
        }
    }
}

enum Work<'a> {
    Visit(&'a Arc<Node>, usize),
    Continue(&'a NodeId, usize, usize),
}

/// Flatten `roots` and their visible replies into render order.
pub fn render(
    roots: &[Arc<Node>],
    state: &InteractionState,
    options: RenderOptions,
) -> Vec<RenderRow> {
    let mut rows = Vec::with_capacity(roots.len());
    let mut stack: Vec<Work<'_>> = roots.iter().rev().map(|n| Work::Visit(n, 0)).collect();

    while let Some(work) = stack.pop() {
        let (node, depth) = match work {
            Work::Visit(node, depth) => (node, depth),
            Work::Continue(parent, depth, hidden) => {
                rows.push(RenderRow::ContinueThread {
                    parent: parent.clone(),
                    depth,
                    hidden,
                });
                continue;
            }
        };

        let flags = state.flags(&node.id);
        let reply_count = node.replies.len();
        let window = ReplyWindow::for_node(reply_count, flags, options.preview);

        rows.push(RenderRow::Node(RenderedNode {
            node: Arc::clone(node),
            depth,
            flags,
            reply_count,
            window,
            visibility_label: VisibilityLabel::for_node(reply_count, flags.replies_visible),
            reply_box_open: state.active_reply_target() == Some(&node.id),
        }));

        if depth >= options.max_depth {
            continue;
        }
        // Pushed first so it pops after the previewed replies.
        if let ReplyWindow::Preview { hidden, .. } = window {
            stack.push(Work::Continue(&node.id, depth + 1, hidden));
        }
        for reply in visible_replies(node, window).iter().rev() {
            stack.push(Work::Visit(reply, depth + 1));
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Author, Timestamp};

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    fn with_replies(name: &str, n: usize) -> Node {
        let author = Author::new("u", "ada");
        let mut node = Node::comment(id(name), author.clone(), name, Timestamp(0));
        for i in 1..=n {
            node = node.with_reply(Node::reply(
                id(&format!("{name}{i}")),
                id(name),
                author.clone(),
                "r",
                Timestamp(i as i64),
            ));
        }
        node
    }

    fn visible() -> NodeFlags {
        NodeFlags {
            replies_visible: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_window_threshold() {
        assert_eq!(
            ReplyWindow::for_node(3, visible(), 2),
            ReplyWindow::Preview {
                shown: 2,
                hidden: 1,
            }
        );
        assert_eq!(ReplyWindow::for_node(2, visible(), 2), ReplyWindow::Full);
        assert_eq!(ReplyWindow::for_node(0, visible(), 2), ReplyWindow::Full);
        assert_eq!(ReplyWindow::for_node(10, NodeFlags::default(), 2), ReplyWindow::Hidden);

        let expanded = NodeFlags {
            thread_expanded: true,
            ..visible()
        };
        assert_eq!(ReplyWindow::for_node(10, expanded, 2), ReplyWindow::Full);
    }

    #[test]
    fn test_visibility_label() {
        assert_eq!(VisibilityLabel::for_node(0, true), VisibilityLabel::NoReplies);
        assert_eq!(VisibilityLabel::for_node(2, false), VisibilityLabel::ViewReplies);
        assert_eq!(VisibilityLabel::for_node(2, true), VisibilityLabel::HideReplies);
    }

    #[test]
    fn test_render_preview_then_continue() {
        let root = Arc::new(with_replies("a", 3));
        let mut state = InteractionState::new();
        state.toggle_replies_visible(&id("a"));

        let rows = render(&[root], &state, RenderOptions::default());
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].as_node().unwrap().node.id, id("a"));
        assert_eq!(rows[1].as_node().unwrap().node.id, id("a1"));
        assert_eq!(rows[2].as_node().unwrap().node.id, id("a2"));
        assert_eq!(
            rows[3],
            RenderRow::ContinueThread {
                parent: id("a"),
                depth: 1,
                hidden: 1,
            }
        );
    }

    #[test]
    fn test_render_hidden_replies() {
        let root = Arc::new(with_replies("a", 5));
        let rows = render(&[root], &InteractionState::new(), RenderOptions::default());
        assert_eq!(rows.len(), 1);
        let node = rows[0].as_node().unwrap();
        assert_eq!(node.window, ReplyWindow::Hidden);
        assert_eq!(node.visibility_label, VisibilityLabel::ViewReplies);
    }

    #[test]
    fn test_nested_nodes_decide_independently() {
        let author = Author::new("u", "ada");
        let mut inner = with_replies("b", 4);
        inner.parent_id = Some(id("a"));
        let root = Node::comment(id("a"), author, "a", Timestamp(0)).with_reply(inner);

        let mut state = InteractionState::new();
        state.toggle_replies_visible(&id("a"));
        state.toggle_replies_visible(&id("b"));
        state.set_thread_expanded(&id("b"), true);

        let rows = render(&[Arc::new(root)], &state, RenderOptions::default());
        let depths: Vec<_> = rows.iter().map(RenderRow::depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 2, 2, 2]);
        assert!(rows.iter().all(|r| r.as_node().is_some()));
    }

    #[test]
    fn test_max_depth_stops_descent() {
        let root = Arc::new(with_replies("a", 1));
        let mut state = InteractionState::new();
        state.toggle_replies_visible(&id("a"));
        let options = RenderOptions {
            max_depth: 0,
            ..Default::default()
        };
        assert_eq!(render(&[root], &state, options).len(), 1);
    }

    #[test]
    fn test_reply_box_marker() {
        let root = Arc::new(with_replies("a", 0));
        let mut state = InteractionState::new();
        state.set_active_reply_target(Some(&id("a")));
        let rows = render(&[root], &state, RenderOptions::default());
        assert!(rows[0].as_node().unwrap().reply_box_open);
    }
}
