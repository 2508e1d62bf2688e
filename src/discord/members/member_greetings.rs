// Welcome and goodbye embeds for members joining or leaving a server.

use poise::serenity_prelude as serenity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Greeting {
    Welcome,
    Goodbye,
}

impl Greeting {
    fn title(self, member_name: &str) -> String {
        match self {
            Greeting::Welcome => format!("Welcome {}!", member_name),
            Greeting::Goodbye => format!("Goodbye {}!", member_name),
        }
    }

    fn description(self, guild_name: &str) -> String {
        match self {
            Greeting::Welcome => format!("Thanks for joining {}!", guild_name),
            Greeting::Goodbye => format!("Thanks for staying in {}!", guild_name),
        }
    }

    fn colour(self) -> serenity::Colour {
        match self {
            Greeting::Welcome => serenity::Colour::PURPLE,
            Greeting::Goodbye => serenity::Colour::RED,
        }
    }
}

fn greeting_embed(
    greeting: Greeting,
    member_name: &str,
    guild_name: &str,
    avatar_url: String,
) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(greeting.title(member_name))
        .description(greeting.description(guild_name))
        .color(greeting.colour())
        .thumbnail(avatar_url)
        .timestamp(serenity::Timestamp::now())
}

/// Handle `GuildMemberAddition`.
pub async fn on_member_join(
    ctx: &serenity::Context,
    channel_id: Option<u64>,
    member: &serenity::Member,
) {
    let guild_name = guild_name_of(ctx, member.guild_id);
    let embed = greeting_embed(
        Greeting::Welcome,
        member.display_name(),
        &guild_name,
        member.face(),
    );
    send(ctx, channel_id, embed, member.user.id.get()).await;
}

/// Handle `GuildMemberRemoval`. The member data is only there when the
/// member was cached, so fall back to the bare user.
pub async fn on_member_leave(
    ctx: &serenity::Context,
    channel_id: Option<u64>,
    guild_id: serenity::GuildId,
    user: &serenity::User,
    member: Option<&serenity::Member>,
) {
    let guild_name = guild_name_of(ctx, guild_id);
    let (name, avatar) = match member {
        Some(member) => (member.display_name().to_string(), member.face()),
        None => (user.display_name().to_string(), user.face()),
    };
    let embed = greeting_embed(Greeting::Goodbye, &name, &guild_name, avatar);
    send(ctx, channel_id, embed, user.id.get()).await;
}

fn guild_name_of(ctx: &serenity::Context, guild_id: serenity::GuildId) -> String {
    ctx.cache
        .guild(guild_id)
        .map(|guild| guild.name.clone())
        .unwrap_or_else(|| "the server".to_string())
}

async fn send(
    ctx: &serenity::Context,
    channel_id: Option<u64>,
    embed: serenity::CreateEmbed,
    user_id: u64,
) {
    let Some(channel_id) = channel_id else {
        tracing::debug!(user_id, "No welcome channel configured; skipping greeting");
        return;
    };

    if let Err(err) = serenity::ChannelId::new(channel_id)
        .send_message(&ctx.http, serenity::CreateMessage::new().embed(embed))
        .await
    {
        tracing::warn!(channel_id, user_id, error = %err, "Failed to send member greeting");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welcome_wording() {
        assert_eq!(Greeting::Welcome.title("Ferris"), "Welcome Ferris!");
        assert_eq!(
            Greeting::Welcome.description("Rustaceans"),
            "Thanks for joining Rustaceans!"
        );
        assert_eq!(Greeting::Welcome.colour(), serenity::Colour::PURPLE);
    }

    #[test]
    fn goodbye_wording() {
        assert_eq!(Greeting::Goodbye.title("Ferris"), "Goodbye Ferris!");
        assert_eq!(
            Greeting::Goodbye.description("Rustaceans"),
            "Thanks for staying in Rustaceans!"
        );
        assert_eq!(Greeting::Goodbye.colour(), serenity::Colour::RED);
    }
}
