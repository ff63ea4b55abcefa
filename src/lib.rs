//! # Comment Tree
//!
//! State management for a nested comment thread attached to some entity:
//! the tree of comments and replies, the page being shown, how much of each
//! thread is visible, and the per-user flags (likes, open reply box) that
//! never belong in the stored tree.
//!
//! ## Core Concepts
//!
//! - **Tree**: Immutable versions; a reply rebuilds only its ancestor chain
//! - **Interaction State**: Session-only flags keyed by node id
//! - **Views**: Paging over top-level comments and per-node reply truncation
//! - **Events**: Bounded channels notifying the presentation layer
//!
//! User actions never fail. Each one reports whether it had an effect.
//!
//! ## Example
//!
//! ```ignore
//! use comment_tree::{Author, Seed, ThreadSession};
//!
//! let mut session = ThreadSession::with_defaults(Seed::new(
//!     Vec::new(),
//!     Some(Author::new("u1", "ada")),
//! ))?;
//!
//! let id = session.submit_comment_text("Hello").node_id().cloned().unwrap();
//! session.submit_reply_text(&id, "Hi back");
//! session.toggle_replies_visible(&id);
//!
//! for row in session.snapshot().rows {
//!     println!("{:?}", row);
//! }
//! ```

pub mod collab;
pub mod error;
pub mod events;
pub mod interaction;
pub mod session;
pub mod tree;
pub mod types;
pub mod view;

// Re-exports
pub use collab::{
    Clock, Collaborators, FixedClock, IdSource, Navigator, NullNavigator, RecordingNavigator,
    SequentialIdSource, SystemClock, UuidIdSource,
};
pub use error::{Result, ThreadError};
pub use events::{
    DropReason, EventBus, EventKind, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId, ThreadEvent,
};
pub use interaction::{InteractionState, NodeFlags};
pub use session::{Seed, SessionSnapshot, ThreadConfig, ThreadSession, MAX_DEPTH_LIMIT};
pub use tree::{
    add_reply, submit_comment, MutationContext, ReplyOutcome, SubmitOutcome, Tree, TreeStore,
};
pub use types::*;
pub use view::{
    page_count, render, visible_page, visible_replies, PageInfo, RenderOptions, RenderRow,
    RenderedNode, ReplyWindow, VisibilityLabel,
};
