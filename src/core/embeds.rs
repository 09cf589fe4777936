//! Embed builders for Discord responses
//!
//! Converts transport-neutral `EmbedBlock`s into serenity embeds.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.1.0: Build from `EmbedBlock` instead of ad-hoc title/colour arguments
//! - 1.0.0: Initial status block embed

use crate::core::outbound::EmbedBlock;
use crate::core::truncate_for_embed;
use serenity::builder::CreateEmbed;

/// Build a status embed: title, accent color, truncated description.
pub fn block_embed(block: &EmbedBlock) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed.title(&block.title);
    embed.color(block.color);
    embed.description(truncate_for_embed(&block.description));
    embed
}

/// Build every embed of a payload, preserving order.
pub fn payload_embeds(blocks: &[EmbedBlock]) -> Vec<CreateEmbed> {
    blocks.iter().map(block_embed).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::outbound::{COLOR_DOWN, COLOR_OK};
    use crate::core::EMBED_LIMIT;

    fn block(title: &str, description: &str, color: u32) -> EmbedBlock {
        EmbedBlock {
            title: title.to_string(),
            description: description.to_string(),
            color,
        }
    }

    fn field<'a>(embed: &'a CreateEmbed, key: &str) -> &'a str {
        embed.0.get(key).and_then(|v| v.as_str()).unwrap_or_default()
    }

    #[test]
    fn test_block_embed_builds() {
        let embed = block_embed(&block("Island", "- alice", COLOR_OK));
        assert_eq!(field(&embed, "title"), "Island");
        assert_eq!(field(&embed, "description"), "- alice");
        assert_eq!(embed.0.get("color").and_then(|v| v.as_u64()), Some(COLOR_OK as u64));
    }

    #[test]
    fn test_block_embed_truncates_long_description() {
        let long = "- player\n".repeat(1000);
        assert!(long.len() > EMBED_LIMIT);

        let embed = block_embed(&block("Island", &long, COLOR_DOWN));
        let description = field(&embed, "description");

        assert!(description.len() <= EMBED_LIMIT);
        assert!(description.ends_with("..."));
        assert_eq!(truncate_for_embed(&long).len(), description.len());
    }

    #[test]
    fn test_payload_embeds_keeps_count() {
        let blocks = vec![
            block("A", "No players online", COLOR_OK),
            block("B", "Server unreachable", COLOR_DOWN),
        ];
        assert_eq!(payload_embeds(&blocks).len(), 2);
    }
}
