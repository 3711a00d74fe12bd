//! Fact extraction from free text: copyright attribution and hyperlinks.

pub mod attribution;
pub mod links;

pub use attribution::{attribution_line, holder_accepted};
pub use links::{after_marker, extract_links, first_inline_link, link_after_marker};
