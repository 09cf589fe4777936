//! Discord length limits and truncation
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.1.0: Single UTF-8 safe `truncate_to` shared by embed and message variants
//! - 1.0.0: Initial limits

/// Discord embed description limit
pub const EMBED_LIMIT: usize = 4096;
/// Discord message content limit
pub const MESSAGE_LIMIT: usize = 2000;

/// Truncate to at most `limit` bytes on a char boundary, ending with `...` when cut.
pub fn truncate_to(text: &str, limit: usize) -> String {
    if text.len() <= limit {
        return text.to_string();
    }
    let mut end = limit.saturating_sub(3);
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

pub fn truncate_for_embed(text: &str) -> String {
    truncate_to(text, EMBED_LIMIT)
}

pub fn truncate_for_message(text: &str) -> String {
    truncate_to(text, MESSAGE_LIMIT)
}
