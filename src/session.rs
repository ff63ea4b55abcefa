//! Main session struct tying all components together.

use crate::collab::Collaborators;
use crate::error::{Result, ThreadError};
use crate::events::{
    EventBus, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle, ThreadEvent,
    DEFAULT_BUFFER_SIZE,
};
use crate::interaction::InteractionState;
use crate::tree::{MutationContext, ReplyOutcome, SubmitOutcome, Tree, TreeStore};
use crate::types::{Author, Node, NodeId, ReplyScope};
use crate::view::{self, PageInfo, RenderOptions, RenderRow, DEFAULT_REPLY_PREVIEW};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, trace};

/// Upper bound on `ThreadConfig::max_depth`. Dropping, comparing and
/// serializing a node recurse through its replies.
pub const MAX_DEPTH_LIMIT: usize = 1024;

/// Session configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadConfig {
    /// Top-level comments per page.
    pub page_size: usize,

    /// Replies shown before a thread is truncated.
    pub reply_preview: usize,

    /// Deepest allowed nesting (top-level comments are depth 0).
    pub max_depth: usize,

    /// Where replies may be attached.
    pub reply_scope: ReplyScope,

    /// Buffered events per subscriber.
    pub event_buffer_size: usize,
}

impl Default for ThreadConfig {
    fn default() -> Self {
        Self {
            page_size: 2,
            reply_preview: DEFAULT_REPLY_PREVIEW,
            max_depth: 64,
            reply_scope: ReplyScope::TopLevel,
            event_buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl ThreadConfig {
    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let zero = [
            ("page_size", self.page_size),
            ("reply_preview", self.reply_preview),
            ("max_depth", self.max_depth),
            ("event_buffer_size", self.event_buffer_size),
        ]
        .into_iter()
        .find(|(_, v)| *v == 0);

        if let Some((name, _)) = zero {
            return Err(ThreadError::InvalidConfig(format!("{name} must be at least 1")));
        }
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(ThreadError::InvalidConfig(format!(
                "max_depth must be at most {MAX_DEPTH_LIMIT}"
            )));
        }
        Ok(())
    }
}

/// Data supplied once at construction.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Seed {
    /// Initial top-level comments with their replies.
    #[serde(default)]
    pub comments: Vec<Node>,

    /// The user who will write new comments. Without one, submissions are
    /// ignored.
    #[serde(default)]
    pub author: Option<Author>,
}

impl Seed {
    pub fn new(comments: Vec<Node>, author: Option<Author>) -> Self {
        Self { comments, author }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// What the presentation layer draws after each action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub page: PageInfo,
    /// Current page flattened with per-node truncation applied.
    pub rows: Vec<RenderRow>,
    pub interaction: InteractionState,
    pub revision: u64,
}

/// A single user's comment thread session.
///
/// Provides a unified interface for:
/// - Submitting comments and replies
/// - Toggling likes, reply visibility and the reply box
/// - Paging through top-level comments
/// - Requesting the expanded view of a thread
pub struct ThreadSession {
    config: ThreadConfig,
    store: TreeStore,
    interaction: InteractionState,
    /// 1-based.
    page_index: usize,
    author: Option<Author>,
    collab: Collaborators,
    events: EventBus,
}

fn mutation_ctx<'a>(config: &ThreadConfig, collab: &'a Collaborators) -> MutationContext<'a> {
    MutationContext {
        ids: collab.ids.as_ref(),
        clock: collab.clock.as_ref(),
        scope: config.reply_scope,
        max_depth: config.max_depth,
    }
}

impl ThreadSession {
    /// Start a session from seed data.
    pub fn new(seed: Seed, config: ThreadConfig, collab: Collaborators) -> Result<Self> {
        config.validate()?;
        let tree = Tree::from_nodes(seed.comments, config.max_depth)?;
        debug!(
            comments = tree.len(),
            nodes = tree.total_nodes(),
            has_author = seed.author.is_some(),
            "session started"
        );

        Ok(Self {
            config,
            store: TreeStore::new(tree),
            interaction: InteractionState::new(),
            page_index: 1,
            author: seed.author,
            collab,
            events: EventBus::new(),
        })
    }

    /// Start a session with default config and collaborators.
    pub fn with_defaults(seed: Seed) -> Result<Self> {
        Self::new(seed, ThreadConfig::default(), Collaborators::default())
    }

    // --- Accessors ---

    pub fn config(&self) -> &ThreadConfig {
        &self.config
    }

    pub fn tree(&self) -> &Tree {
        self.store.tree()
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn author(&self) -> Option<&Author> {
        self.author.as_ref()
    }

    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    // --- Content ---

    pub fn set_comment_draft(&mut self, text: impl Into<String>) {
        self.interaction.set_comment_draft(text);
    }

    pub fn set_reply_draft(&mut self, text: impl Into<String>) {
        self.interaction.set_reply_draft(text);
    }

    /// Submit the comment draft. The draft is cleared only on success.
    pub fn submit_comment(&mut self) -> SubmitOutcome {
        let draft = self.interaction.comment_draft().to_string();
        let outcome = self.submit_comment_text(&draft);
        if outcome.is_applied() {
            self.interaction.clear_comment_draft();
        }
        outcome
    }

    /// Submit `text` as a new top-level comment.
    pub fn submit_comment_text(&mut self, text: &str) -> SubmitOutcome {
        let ctx = mutation_ctx(&self.config, &self.collab);
        let outcome = self.store.submit_comment(ctx, text, self.author.as_ref());
        if let Some(id) = outcome.node_id() {
            self.events.broadcast(ThreadEvent::CommentAdded {
                id: id.clone(),
                revision: self.store.revision(),
            });
        }
        outcome
    }

    /// Submit the reply draft under `parent_id`. On success the draft and
    /// the reply box are cleared.
    pub fn submit_reply(&mut self, parent_id: &NodeId) -> ReplyOutcome {
        let draft = self.interaction.reply_draft().to_string();
        self.submit_reply_text(parent_id, &draft)
    }

    /// Submit `text` as a reply under `parent_id`.
    pub fn submit_reply_text(&mut self, parent_id: &NodeId, text: &str) -> ReplyOutcome {
        let ctx = mutation_ctx(&self.config, &self.collab);
        let outcome = self
            .store
            .add_reply(ctx, parent_id, text, self.author.as_ref());

        if let Some(id) = outcome.node_id() {
            self.events.broadcast(ThreadEvent::ReplyAdded {
                id: id.clone(),
                parent: parent_id.clone(),
                revision: self.store.revision(),
            });
            let had_target = self.interaction.active_reply_target().is_some();
            self.interaction.clear_reply_draft();
            if had_target {
                self.events
                    .broadcast(ThreadEvent::ReplyTargetChanged { target: None });
            }
        }
        outcome
    }

    // --- Interaction ---

    /// Flip the session like on a node. The stored like count is untouched.
    pub fn toggle_like(&mut self, id: &NodeId) -> bool {
        let liked = self.interaction.toggle_like(id);
        trace!(node = %id, liked, "like toggled");
        self.events.broadcast(ThreadEvent::LikeToggled {
            id: id.clone(),
            liked,
        });
        liked
    }

    pub fn toggle_replies_visible(&mut self, id: &NodeId) -> bool {
        let visible = self.interaction.toggle_replies_visible(id);
        trace!(node = %id, visible, "reply visibility toggled");
        self.events.broadcast(ThreadEvent::RepliesVisibilityToggled {
            id: id.clone(),
            visible,
        });
        visible
    }

    /// Open, move or close the reply box. See
    /// [`InteractionState::set_active_reply_target`].
    pub fn set_active_reply_target(&mut self, target: Option<&NodeId>) -> Option<NodeId> {
        let target = self.interaction.set_active_reply_target(target).cloned();
        trace!(target = ?target, "reply target changed");
        self.events.broadcast(ThreadEvent::ReplyTargetChanged {
            target: target.clone(),
        });
        target
    }

    /// Lift or restore truncation in place. Used by the expanded-thread view.
    pub fn set_thread_expanded(&mut self, id: &NodeId, expanded: bool) {
        self.interaction.set_thread_expanded(id, expanded);
        self.events.broadcast(ThreadEvent::ThreadExpanded {
            id: id.clone(),
            expanded,
        });
    }

    /// Activate "continue thread" on `id`: ask the navigator for the
    /// expanded view. Truncation state is left alone. Returns false, without
    /// navigating, if the node is not in the tree.
    pub fn continue_thread(&self, id: &NodeId) -> bool {
        if !self.store.tree().contains(id) {
            trace!(node = %id, "continue thread on unknown node ignored");
            return false;
        }
        debug!(node = %id, "thread requested");
        self.collab.navigator.go_to_thread(id);
        self.events
            .broadcast(ThreadEvent::ThreadRequested { id: id.clone() });
        true
    }

    // --- Paging ---

    /// Move to a 1-based page. Out-of-range pages render empty.
    pub fn set_page(&mut self, index: usize) -> PageInfo {
        self.page_index = index;
        let page = self.page_info();
        if !page.in_range() {
            trace!(index, count = page.count, "page out of range");
        }
        self.events.broadcast(ThreadEvent::PageChanged { page });
        page
    }

    pub fn page_info(&self) -> PageInfo {
        PageInfo::new(self.tree().len(), self.page_index, self.config.page_size)
    }

    /// Top-level comments on the current page.
    pub fn visible_page(&self) -> &[Arc<Node>] {
        view::visible_page(self.tree(), self.page_index, self.config.page_size)
    }

    /// Current page flattened for drawing.
    pub fn render_page(&self) -> Vec<RenderRow> {
        view::render(
            self.visible_page(),
            &self.interaction,
            RenderOptions {
                preview: self.config.reply_preview,
                max_depth: self.config.max_depth,
            },
        )
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            page: self.page_info(),
            rows: self.render_page(),
            interaction: self.interaction.clone(),
            revision: self.revision(),
        }
    }

    // --- Events ---

    pub fn subscribe(&self, filter: SubscriptionFilter) -> SubscriptionHandle {
        self.events.subscribe(SubscriptionConfig {
            buffer_size: self.config.event_buffer_size,
            filter,
        })
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }
}

impl std::fmt::Debug for ThreadSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadSession")
            .field("config", &self.config)
            .field("comments", &self.tree().len())
            .field("page_index", &self.page_index)
            .field("revision", &self.revision())
            .finish_non_exhaustive()
    }
}
