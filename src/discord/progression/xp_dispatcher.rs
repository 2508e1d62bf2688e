// Turns chat messages into XP.
//
// Progress is saved by the service before any announcement goes out, so a
// missing or broken announcement channel never costs anyone their XP.

use super::level_announcements::{send_level_up_embed, NotificationError};
use crate::discord::Data;
use poise::serenity_prelude as serenity;

pub async fn handle_message(ctx: &serenity::Context, data: &Data, message: &serenity::Message) {
    // Ignore bot messages (including our own)
    if message.author.bot || message.author.id == ctx.cache.current_user().id {
        return;
    }

    let user_id = message.author.id.get();
    let outcome = match data.progression.process_message(user_id).await {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::error!(user_id, error = %err, "Failed to award message XP");
            return;
        }
    };

    for notice in &outcome.notices {
        tracing::info!(
            user_id,
            level = notice.level,
            total_xp = outcome.award.progress.total_xp,
            "User leveled up"
        );

        match send_level_up_embed(ctx, data.config.level_channel_id, notice).await {
            Ok(()) => {}
            Err(NotificationError::NotConfigured) => {
                tracing::debug!(user_id, "No level-up channel configured; skipping announcement");
            }
            Err(err) => {
                tracing::warn!(user_id, level = notice.level, error = %err, "Skipping level-up announcement");
            }
        }
    }
}
