// Picks the name a user is shown as, the way Discord's own client does:
// server nickname, then global display name, then username.

use crate::discord::Context;
use poise::serenity_prelude as serenity;

/// Display name for `user`, preferring their nickname in the current guild.
pub async fn display_name(ctx: Context<'_>, user: &serenity::User) -> String {
    let nick = match ctx.guild_id() {
        Some(guild_id) => user.nick_in(ctx.serenity_context(), guild_id).await,
        None => None,
    };
    preferred_name(nick.as_deref(), user.global_name.as_deref(), &user.name)
}

fn preferred_name(nick: Option<&str>, global_name: Option<&str>, username: &str) -> String {
    [nick, global_name]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|name| !name.is_empty())
        .unwrap_or(username)
        .to_string()
}
