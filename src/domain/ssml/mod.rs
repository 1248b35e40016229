//! Speech markup (SSML) handling.
//!
//! - `tag_filter` - Platform capability filtering
//! - `document` - Incremental speech document builder

mod document;
mod tag_filter;

pub use document::{escape_text, EmphasisLevel, SsmlDocumentBuilder, MAX_BREAK};
pub use tag_filter::{TagFilter, TagFilterError};
