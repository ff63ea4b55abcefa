//! Read-only views over the tree: which top-level comments are on the
//! current page, and which replies each of them shows.

mod pagination;
mod truncation;

pub use pagination::{page_count, visible_page, PageInfo};
pub use truncation::{
    render, visible_replies, RenderOptions, RenderRow, RenderedNode, ReplyWindow,
    VisibilityLabel, DEFAULT_REPLY_PREVIEW,
};
