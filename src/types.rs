//! Core types for the comment tree.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Unique identifier for a comment or reply.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

/// Identifier of a user, owned by whoever supplies the seed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorId(pub String);

/// A user who writes comments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
    /// Avatar resource reference, passed through to the presentation layer.
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl Author {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: AuthorId(id.into()),
            name: name.into(),
            avatar_url: None,
        }
    }

    pub fn with_avatar(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = Some(url.into());
        self
    }
}

/// Microseconds since Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Current time. A clock set before the epoch reads as zero.
    pub fn now() -> Self {
        let micros = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as i64)
            .unwrap_or_default();
        Timestamp(micros)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

/// A comment or a reply. Both share this shape; replies carry a parent.
///
/// Replies are held behind `Arc` so that rebuilding one branch of the tree
/// leaves every other subtree shared with the previous version.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier (assigned at creation, never reassigned).
    pub id: NodeId,

    /// Who wrote it.
    pub author: Author,

    /// Trimmed, non-empty text body.
    pub content: String,

    /// When it was created.
    pub created_at: Timestamp,

    /// Like counter as loaded. Session likes never touch it.
    #[serde(default)]
    pub like_count: u64,

    /// Immediate parent, `None` for top-level comments.
    #[serde(default)]
    pub parent_id: Option<NodeId>,

    /// Nested replies in arrival order.
    #[serde(default)]
    pub replies: Vec<Arc<Node>>,
}

impl Node {
    /// Create a top-level comment with no likes and no replies.
    pub fn comment(
        id: NodeId,
        author: Author,
        content: impl Into<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            author,
            content: content.into(),
            created_at,
            like_count: 0,
            parent_id: None,
            replies: Vec::new(),
        }
    }

    /// Create a reply to `parent_id` with no likes and no replies.
    pub fn reply(
        id: NodeId,
        parent_id: NodeId,
        author: Author,
        content: impl Into<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::comment(id, author, content, created_at)
        }
    }

    /// Add an existing reply (used when building seed data).
    pub fn with_reply(mut self, reply: Node) -> Self {
        self.replies.push(Arc::new(reply));
        self
    }

    pub fn with_like_count(mut self, count: u64) -> Self {
        self.like_count = count;
        self
    }

    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    pub fn reply_count(&self) -> usize {
        self.replies.len()
    }
}

/// Where the mutation engine looks for a reply's parent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyScope {
    /// Only top-level comments can receive replies.
    #[default]
    TopLevel,
    /// Any node at any depth can receive replies.
    AnyDepth,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_carries_parent() {
        let author = Author::new("u1", "ada");
        let reply = Node::reply(
            NodeId::from("r1"),
            NodeId::from("c1"),
            author,
            "hi",
            Timestamp(5),
        );
        assert!(reply.is_reply());
        assert_eq!(reply.parent_id, Some(NodeId::from("c1")));
        assert_eq!(reply.like_count, 0);
        assert!(reply.replies.is_empty());
    }

    #[test]
    fn test_node_json_shape() {
        let json = r#"{
            "id": "c1",
            "author": {"id": "u1", "name": "ada", "avatarUrl": "a.png"},
            "content": "hello",
            "createdAt": 10,
            "likeCount": 3,
            "replies": [{
                "id": "r1",
                "author": {"id": "u2", "name": "bob"},
                "content": "yo",
                "createdAt": 11,
                "parentId": "c1"
            }]
        }"#;

        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node.id.as_str(), "c1");
        assert_eq!(node.like_count, 3);
        assert_eq!(node.author.avatar_url.as_deref(), Some("a.png"));
        assert_eq!(node.replies[0].parent_id, Some(NodeId::from("c1")));
        assert_eq!(node.replies[0].like_count, 0);
    }

    #[test]
    fn test_timestamp_now_is_positive() {
        assert!(Timestamp::now().0 > 0);
    }
}
