//! External collaborators: id generation, time and navigation.
//!
//! The core never decides these itself. Production code uses
//! [`Collaborators::default`]; tests swap in the deterministic variants.

use crate::types::{NodeId, Timestamp};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

/// Produces node ids. Must never repeat within a session.
pub trait IdSource: Send + Sync {
    fn new_id(&self) -> NodeId;
}

/// Produces creation timestamps. Used for display only.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Receives fire-and-forget requests to open the expanded view of a thread.
pub trait Navigator: Send + Sync {
    fn go_to_thread(&self, node_id: &NodeId);
}

/// Random v4 UUIDs.
#[derive(Debug, Default)]
pub struct UuidIdSource;

impl IdSource for UuidIdSource {
    fn new_id(&self) -> NodeId {
        NodeId(uuid::Uuid::new_v4().to_string())
    }
}

/// `prefix-1`, `prefix-2`, ...
///
/// Ids are not checked against existing ones here. A mutation that draws an
/// id already in the tree is refused with an `IdCollision` outcome.
#[derive(Debug)]
pub struct SequentialIdSource {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdSource {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdSource for SequentialIdSource {
    fn new_id(&self) -> NodeId {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        NodeId(format!("{}-{}", self.prefix, n))
    }
}

/// Wall clock.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Clock that starts at a fixed instant and advances by one microsecond per
/// reading.
#[derive(Debug)]
pub struct FixedClock {
    next: AtomicI64,
}

impl FixedClock {
    pub fn starting_at(start: Timestamp) -> Self {
        Self {
            next: AtomicI64::new(start.0),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.next.fetch_add(1, Ordering::SeqCst))
    }
}

/// Drops navigation requests.
#[derive(Debug, Default)]
pub struct NullNavigator;

impl Navigator for NullNavigator {
    fn go_to_thread(&self, _node_id: &NodeId) {}
}

/// Remembers every navigation request in order.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    requests: Mutex<Vec<NodeId>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<NodeId> {
        self.requests.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn go_to_thread(&self, node_id: &NodeId) {
        self.requests.lock().push(node_id.clone());
    }
}

/// The set of collaborators a session talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub ids: Arc<dyn IdSource>,
    pub clock: Arc<dyn Clock>,
    pub navigator: Arc<dyn Navigator>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            ids: Arc::new(UuidIdSource),
            clock: Arc::new(SystemClock),
            navigator: Arc::new(NullNavigator),
        }
    }
}

impl Collaborators {
    pub fn with_ids(mut self, ids: Arc<dyn IdSource>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
