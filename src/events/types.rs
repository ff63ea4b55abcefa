//! Event and subscription types.

use crate::types::NodeId;
use crate::view::PageInfo;
use serde::Serialize;

/// Default number of buffered events per subscriber.
pub const DEFAULT_BUFFER_SIZE: usize = 256;

/// Configuration for a subscription.
#[derive(Clone, Debug)]
pub struct SubscriptionConfig {
    /// Max buffered events before the subscriber is dropped.
    pub buffer_size: usize,

    /// Filter criteria.
    pub filter: SubscriptionFilter,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            filter: SubscriptionFilter::default(),
        }
    }
}

/// Broad category of an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// The tree gained a node.
    Content,
    /// A session-only flag changed.
    Interaction,
    /// Page changes and expanded-thread requests.
    Navigation,
}

/// Filter criteria for subscriptions. Empty means everything.
#[derive(Clone, Debug, Default)]
pub struct SubscriptionFilter {
    /// Only these kinds (None = all kinds).
    pub kinds: Option<Vec<EventKind>>,

    /// Only events about these nodes (None = all nodes). Events without a
    /// node, such as page changes, always pass.
    pub node_ids: Option<Vec<NodeId>>,
}

impl SubscriptionFilter {
    /// Subscribe to everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Subscribe to specific kinds.
    pub fn kinds(kinds: Vec<EventKind>) -> Self {
        Self {
            kinds: Some(kinds),
            ..Default::default()
        }
    }

    /// Subscribe to events about specific nodes.
    pub fn nodes(node_ids: Vec<NodeId>) -> Self {
        Self {
            node_ids: Some(node_ids),
            ..Default::default()
        }
    }

    pub fn matches(&self, event: &ThreadEvent) -> bool {
        if let Some(ref kinds) = self.kinds {
            if !kinds.contains(&event.kind()) {
                return false;
            }
        }

        match (&self.node_ids, event.node_id()) {
            (Some(ids), Some(id)) => ids.contains(id),
            _ => true,
        }
    }
}

/// Events emitted by a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ThreadEvent {
    // --- Content ---
    /// A top-level comment was prepended.
    CommentAdded { id: NodeId, revision: u64 },

    /// A reply was appended under `parent`.
    ReplyAdded {
        id: NodeId,
        parent: NodeId,
        revision: u64,
    },

    // --- Interaction ---
    LikeToggled { id: NodeId, liked: bool },

    RepliesVisibilityToggled { id: NodeId, visible: bool },

    ThreadExpanded { id: NodeId, expanded: bool },

    /// The open reply box moved (or closed when `target` is None).
    ReplyTargetChanged { target: Option<NodeId> },

    // --- Navigation ---
    PageChanged { page: PageInfo },

    /// "Continue thread" was activated on `id`.
    ThreadRequested { id: NodeId },

    // --- Lifecycle ---
    /// Subscription was dropped.
    Dropped { reason: DropReason },
}

impl ThreadEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ThreadEvent::CommentAdded { .. } | ThreadEvent::ReplyAdded { .. } => EventKind::Content,
            ThreadEvent::LikeToggled { .. }
            | ThreadEvent::RepliesVisibilityToggled { .. }
            | ThreadEvent::ThreadExpanded { .. }
            | ThreadEvent::ReplyTargetChanged { .. } => EventKind::Interaction,
            ThreadEvent::PageChanged { .. }
            | ThreadEvent::ThreadRequested { .. }
            | ThreadEvent::Dropped { .. } => EventKind::Navigation,
        }
    }

    /// The node this event is about, if any.
    pub fn node_id(&self) -> Option<&NodeId> {
        match self {
            ThreadEvent::CommentAdded { id, .. }
            | ThreadEvent::ReplyAdded { id, .. }
            | ThreadEvent::LikeToggled { id, .. }
            | ThreadEvent::RepliesVisibilityToggled { id, .. }
            | ThreadEvent::ThreadExpanded { id, .. }
            | ThreadEvent::ThreadRequested { id } => Some(id),
            ThreadEvent::ReplyTargetChanged { target } => target.as_ref(),
            ThreadEvent::PageChanged { .. } | ThreadEvent::Dropped { .. } => None,
        }
    }
}

/// Why a subscription was dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Send buffer overflowed (slow consumer).
    BufferOverflow,
    /// Explicitly unsubscribed.
    Unsubscribed,
}

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Handle to receive a subscription's events.
pub struct SubscriptionHandle {
    pub id: SubscriptionId,
    /// Channel to receive events.
    pub receiver: crossbeam_channel::Receiver<ThreadEvent>,
}

impl SubscriptionHandle {
    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<ThreadEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<ThreadEvent, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Everything buffered right now.
    pub fn drain(&self) -> Vec<ThreadEvent> {
        self.receiver.try_iter().collect()
    }
}
