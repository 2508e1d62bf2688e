// Discord commands for the progression system.
//
// **Notice the pattern:**
// 1. Extract primitive data from Discord types
// 2. Call core service
// 3. Format the response based on the result
//
// This layer is THIN - no business logic, just translation.

use crate::core::progression::ProgressionError;
use crate::discord::display_names::display_name;
use crate::discord::{Context, Data, Error};
use poise::serenity_prelude as serenity;

pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![level(), addlevel(), removelevel()]
}

/// Check your or another member's level and XP.
#[poise::command(slash_command, prefix_command, aliases("rank"))]
pub async fn level(
    ctx: Context<'_>,
    #[description = "User to check (defaults to you)"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let target_user = user.as_ref().unwrap_or_else(|| ctx.author());
    if target_user.bot {
        ctx.say("Bots don't have levels! 🤖").await?;
        return Ok(());
    }

    let report = ctx
        .data()
        .progression
        .get_progress(target_user.id.get())
        .await?;

    let name = display_name(ctx, target_user).await;
    let embed = serenity::CreateEmbed::new()
        .title(format!("{}'s Level", name))
        .description(format!(
            "**Level {}**\n`{}` {} / {} XP\nTotal XP: {}",
            report.level, report.progress_bar, report.xp, report.xp_needed, report.total_xp
        ))
        .color(serenity::Colour::PURPLE)
        .thumbnail(target_user.face());

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Add levels to a user (admin only).
#[poise::command(
    slash_command,
    prefix_command,
    aliases("addrank"),
    guild_only,
    required_permissions = "ADMINISTRATOR"
)]
pub async fn addlevel(
    ctx: Context<'_>,
    #[description = "User to promote"] user: serenity::User,
    #[description = "How many levels to add (default: 1)"]
    #[min = 1]
    levels: Option<u32>,
) -> Result<(), Error> {
    let levels = levels.unwrap_or(1);
    let result = ctx
        .data()
        .progression
        .grant_levels(user.id.get(), levels)
        .await;

    match result {
        Ok(updated) => {
            let embed = serenity::CreateEmbed::new()
                .title("✅ Levels Added")
                .description(format!(
                    "<@{}> gained {} level(s) and is now **Level {}**.",
                    user.id, levels, updated.level
                ))
                .color(serenity::Colour::DARK_GREEN);
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Err(err) => reply_with_refusal(ctx, err, "❌ Resulting level is out of range.").await?,
    }

    Ok(())
}

/// Remove levels from a user (admin only).
#[poise::command(
    slash_command,
    prefix_command,
    aliases("removerank"),
    guild_only,
    required_permissions = "ADMINISTRATOR"
)]
pub async fn removelevel(
    ctx: Context<'_>,
    #[description = "User to demote"] user: serenity::User,
    #[description = "How many levels to remove (default: 1)"]
    #[min = 1]
    levels: Option<u32>,
) -> Result<(), Error> {
    let levels = levels.unwrap_or(1);
    let result = ctx
        .data()
        .progression
        .revoke_levels(user.id.get(), levels)
        .await;

    match result {
        Ok(updated) => {
            let embed = serenity::CreateEmbed::new()
                .title("✅ Levels Removed")
                .description(format!(
                    "<@{}> lost {} level(s) and is now **Level {}**.",
                    user.id, levels, updated.level
                ))
                .color(serenity::Colour::RED);
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Err(err) => {
            reply_with_refusal(
                ctx,
                err,
                "❌ Cannot remove more levels than the user currently has.",
            )
            .await?
        }
    }

    Ok(())
}

/// Validation failures become a reply; anything else goes to the error hook.
async fn reply_with_refusal(
    ctx: Context<'_>,
    err: ProgressionError,
    invalid_level_message: &str,
) -> Result<(), Error> {
    match err {
        ProgressionError::InvalidLevel { .. } => {
            ctx.say(invalid_level_message).await?;
            Ok(())
        }
        ProgressionError::InvalidDelta => {
            ctx.say("❌ Level changes must be at least 1.").await?;
            Ok(())
        }
        other => Err(other.into()),
    }
}
