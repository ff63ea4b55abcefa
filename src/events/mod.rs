//! Change notifications for the presentation layer.
//!
//! Every applied action on a session is broadcast as a [`ThreadEvent`] to
//! in-process subscribers. Subscribers get bounded channels; one that stops
//! draining is dropped rather than stalling the session.
//!
//! # Example
//!
//! ```ignore
//! let handle = session.subscribe(SubscriptionFilter::kinds(vec![EventKind::Content]));
//!
//! session.submit_comment_text("hello");
//!
//! match handle.try_recv() {
//!     Ok(ThreadEvent::CommentAdded { id, .. }) => println!("new comment {id}"),
//!     Ok(ThreadEvent::Dropped { .. }) | Err(_) => {}
//!     Ok(_) => {}
//! }
//! ```

mod bus;
mod types;

pub use bus::EventBus;
pub use types::{
    DropReason, EventKind, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId, ThreadEvent, DEFAULT_BUFFER_SIZE,
};
