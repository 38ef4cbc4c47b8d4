use crate::CommandMeta;
use crate::moderation::embeds::usage_message;
use mewdeko_core::{Context, Error};
use mewdeko_utils::embed::{confirm_embed, error_embed, sanitize_mentions};

pub const META: CommandMeta = CommandMeta {
    name: "convert",
    desc: "Convert a value between two units of the same kind.",
    category: "utility",
    usage: "!convert <from> <to> <value>",
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn convert(
    ctx: Context<'_>,
    #[description = "Unit to convert from"] from: Option<String>,
    #[description = "Unit to convert to"] to: Option<String>,
    #[description = "Value to convert"] value: Option<f64>,
) -> Result<(), Error> {
    let (Some(from), Some(to), Some(value)) = (from, to, value) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    if !value.is_finite() {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    }

    let embed = match ctx.data().converter.convert(&from, &to, value).await {
        Ok(converted) => confirm_embed(conversion_line(value, &from, converted, &to)),
        Err(rejection) => error_embed(sanitize_mentions(&rejection.to_string())),
    };
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

fn conversion_line(value: f64, from: &str, converted: f64, to: &str) -> String {
    format!(
        "**{} {}** is **{} {}**",
        value,
        sanitize_mentions(from),
        converted,
        sanitize_mentions(to)
    )
}

#[cfg(test)]
mod tests {
    use super::conversion_line;

    #[test]
    fn formats_both_sides() {
        assert_eq!(conversion_line(2.0, "km", 2000.0, "m"), "**2 km** is **2000 m**");
        assert_eq!(conversion_line(1.5, "h", 90.0, "min"), "**1.5 h** is **90 min**");
    }
}
