use crate::core::progression::LevelUpNotice;
use poise::serenity_prelude::{self as serenity, builder::CreateMessage};

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("no level-up channel is configured")]
    NotConfigured,

    /// The channel id doesn't resolve to a text channel we can post in.
    #[error("level-up channel {0} is unavailable")]
    TargetUnavailable(u64),

    #[error("failed to send level-up announcement: {0}")]
    Send(#[from] serenity::Error),
}

/// Post a level-up notice to the configured announcements channel.
pub async fn send_level_up_embed(
    ctx: &serenity::Context,
    channel_id: Option<u64>,
    notice: &LevelUpNotice,
) -> Result<(), NotificationError> {
    let channel_id = channel_id
        .map(serenity::ChannelId::new)
        .ok_or(NotificationError::NotConfigured)?;

    let channel = channel_id
        .to_channel(ctx)
        .await
        .ok()
        .and_then(|channel| channel.guild())
        .filter(|channel| channel.is_text_based())
        .ok_or(NotificationError::TargetUnavailable(channel_id.get()))?;

    let embed = serenity::CreateEmbed::new()
        .title(&notice.title)
        .description(&notice.body)
        .color(serenity::Colour::PURPLE);

    channel
        .send_message(ctx, CreateMessage::new().embed(embed))
        .await?;
    Ok(())
}
