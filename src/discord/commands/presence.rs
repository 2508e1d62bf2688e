// This module handles bot presence and lifecycle status messages.
//
// Everything here is Discord-layer glue: presence text on ready and the
// status embeds posted to the configured status channel.

use poise::serenity_prelude as serenity;

/// Point people at the help command once the bot is ready.
pub fn on_ready(ctx: &serenity::Context, prefix: &str) {
    let activity = serenity::ActivityData::watching(format!(
        "Need any Help with the bot? Just Use {}help",
        prefix
    ));
    ctx.set_presence(Some(activity), serenity::OnlineStatus::Online);
}

/// Post a status embed. A missing or unreachable channel is logged and
/// otherwise ignored.
pub async fn send_status(
    http: &serenity::Http,
    channel_id: Option<u64>,
    status: &str,
    colour: serenity::Colour,
) {
    let Some(channel_id) = channel_id else {
        tracing::debug!(status, "No status channel configured");
        return;
    };

    let embed = serenity::CreateEmbed::new()
        .title("Bot Status Update")
        .description(status)
        .color(colour)
        .timestamp(serenity::Timestamp::now());

    if let Err(err) = serenity::ChannelId::new(channel_id)
        .send_message(http, serenity::CreateMessage::new().embed(embed))
        .await
    {
        tracing::warn!(channel_id, error = %err, "Failed to send status update");
    }
}
