use poise::serenity_prelude as serenity;

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0x00_E5_84;
/// Color for failures and refusals.
pub const ERROR_EMBED_COLOR: u32 = 0xEE_28_1F;

/// Plain confirmation embed in the default color.
pub fn confirm_embed(description: impl Into<String>) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .color(DEFAULT_EMBED_COLOR)
        .description(description)
}

/// Plain error embed.
pub fn error_embed(description: impl Into<String>) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .color(ERROR_EMBED_COLOR)
        .description(description)
}

/// Embed with a title and description in the default color.
pub fn titled_embed(title: &str, description: impl Into<String>) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title.to_owned())
        .color(DEFAULT_EMBED_COLOR)
        .description(description)
}

/// Break user and role mentions so echoed text never pings anyone.
pub fn sanitize_mentions(text: &str) -> String {
    text.replace('@', "@\u{200B}")
}

#[cfg(test)]
mod tests {
    use super::sanitize_mentions;

    #[test]
    fn mentions_are_broken_up() {
        assert_eq!(sanitize_mentions("hi @everyone"), "hi @\u{200B}everyone");
        assert_eq!(sanitize_mentions("plain"), "plain");
    }
}
