//! Page-range resolution and pagination discovery
//!
//! `spec` turns a user page-selection expression into a concrete page list;
//! `pagination` maps page numbers to forum URLs and discovers how many pages
//! a board or topic has.

mod pagination;
mod spec;

pub use pagination::{
    board_page_url, count_pages_in_document, topic_base_url, topic_page_url,
    topics_on_board_page, total_pages, ResourceKind,
};
pub use spec::resolve_page_spec;
