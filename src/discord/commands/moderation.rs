// Moderation commands. Permission checks are enforced by poise before the
// body runs; these handlers only validate arguments and report back.

use crate::discord::{Context, Data, Error};
use poise::serenity_prelude as serenity;
use std::time::Duration;

/// Largest purge we accept, leaving room for the invoking message.
const MAX_PURGE: u32 = 99;

pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![kick(), ban(), purge()]
}

/// The two ways of removing a member. They share every check and only
/// differ in the API call and wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Removal {
    Kick,
    Ban,
}

impl Removal {
    fn verb(self) -> &'static str {
        match self {
            Removal::Kick => "kick",
            Removal::Ban => "ban",
        }
    }

    fn past_tense(self) -> &'static str {
        match self {
            Removal::Kick => "kicked",
            Removal::Ban => "banned",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Removal::Kick => "✅ Member Kicked",
            Removal::Ban => "🔨 Member Banned",
        }
    }

    fn colour(self) -> serenity::Colour {
        match self {
            Removal::Kick => serenity::Colour::ORANGE,
            Removal::Ban => serenity::Colour::RED,
        }
    }
}

/// Moderators may only act on members whose top role sits strictly below
/// their own. `None` means the member only has @everyone.
fn blocked_by_hierarchy(target_top: Option<u16>, moderator_top: Option<u16>) -> bool {
    target_top.unwrap_or(0) >= moderator_top.unwrap_or(0)
}

fn is_forbidden(err: &serenity::Error) -> bool {
    matches!(
        err,
        ::serenity::Error::Http(::serenity::http::HttpError::UnsuccessfulRequest(response))
            if response.status_code.as_u16() == 403
    )
}

/// Kicks a member from the server.
#[poise::command(
    slash_command,
    prefix_command,
    aliases("kickmember"),
    guild_only,
    required_permissions = "KICK_MEMBERS",
    required_bot_permissions = "KICK_MEMBERS"
)]
pub async fn kick(
    ctx: Context<'_>,
    #[description = "Member to kick"] member: serenity::Member,
    #[description = "Reason for the kick"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    remove_member(ctx, member, reason, Removal::Kick).await
}

/// Bans a member from the server.
#[poise::command(
    slash_command,
    prefix_command,
    aliases("banmember"),
    guild_only,
    required_permissions = "BAN_MEMBERS",
    required_bot_permissions = "BAN_MEMBERS"
)]
pub async fn ban(
    ctx: Context<'_>,
    #[description = "Member to ban"] member: serenity::Member,
    #[description = "Reason for the ban"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    remove_member(ctx, member, reason, Removal::Ban).await
}

async fn remove_member(
    ctx: Context<'_>,
    member: serenity::Member,
    reason: Option<String>,
    removal: Removal,
) -> Result<(), Error> {
    if member.user.id == ctx.author().id {
        ctx.say(format!("You cannot {} yourself!", removal.verb()))
            .await?;
        return Ok(());
    }

    let moderator = ctx
        .author_member()
        .await
        .ok_or("Could not look up your server membership.")?;
    let blocked = {
        let guild = ctx
            .guild()
            .ok_or("This server isn't cached yet, try again in a moment.")?;
        let top_role = |m: &serenity::Member| guild.member_highest_role(m).map(|role| role.position);
        blocked_by_hierarchy(top_role(&member), top_role(&*moderator))
    };
    if blocked {
        ctx.say(format!(
            "You cannot {} someone with a higher or equal role!",
            removal.verb()
        ))
        .await?;
        return Ok(());
    }

    let result = match (removal, reason.as_deref()) {
        (Removal::Kick, Some(reason)) => member.kick_with_reason(ctx.http(), reason).await,
        (Removal::Kick, None) => member.kick(ctx.http()).await,
        (Removal::Ban, Some(reason)) => member.ban_with_reason(ctx.http(), 0, reason).await,
        (Removal::Ban, None) => member.ban(ctx.http(), 0).await,
    };

    if let Err(err) = result {
        tracing::warn!(
            user_id = member.user.id.get(),
            action = removal.verb(),
            error = %err,
            "Failed to remove member"
        );
        let reply = if is_forbidden(&err) {
            format!("I don't have permission to {} that member!", removal.verb())
        } else {
            format!(
                "An error occurred while trying to {} that member.",
                removal.verb()
            )
        };
        ctx.say(reply).await?;
        return Ok(());
    }

    let mut embed = serenity::CreateEmbed::new()
        .title(removal.title())
        .description(format!(
            "<@{}> has been {} by <@{}>",
            member.user.id,
            removal.past_tense(),
            ctx.author().id
        ))
        .color(removal.colour());
    if let Some(reason) = reason {
        embed = embed.field("Reason", reason, false);
    }

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Purges a specified number of messages from the channel.
#[poise::command(
    slash_command,
    prefix_command,
    aliases("clear"),
    guild_only,
    required_permissions = "MANAGE_MESSAGES",
    required_bot_permissions = "MANAGE_MESSAGES"
)]
pub async fn purge(
    ctx: Context<'_>,
    #[description = "How many messages to delete (1-99)"]
    #[min = 1]
    #[max = 99]
    amount: u32,
) -> Result<(), Error> {
    if amount == 0 || amount > MAX_PURGE {
        ctx.say(format!(
            "Please specify a number of messages between 1 and {}!",
            MAX_PURGE
        ))
        .await?;
        return Ok(());
    }

    // A prefix invocation is itself a message in the channel; take it too.
    let includes_invocation = matches!(ctx, poise::Context::Prefix(_));
    let limit = amount + u32::from(includes_invocation);

    let channel_id = ctx.channel_id();
    let messages = channel_id
        .messages(ctx.http(), serenity::GetMessages::new().limit(limit as u8))
        .await?;

    let mut deleted = 0usize;
    for message in &messages {
        match channel_id.delete_message(ctx.http(), message.id).await {
            Ok(()) => deleted += 1,
            Err(err) => {
                tracing::warn!(message_id = message.id.get(), error = %err, "Failed to delete message");
            }
        }
    }
    if includes_invocation {
        deleted = deleted.saturating_sub(1);
    }

    let embed = serenity::CreateEmbed::new()
        .title("Messages Purged")
        .description(format!("Successfully deleted {} messages.", deleted))
        .color(serenity::Colour::PURPLE);

    let confirmation = ctx.send(poise::CreateReply::default().embed(embed)).await?;
    tokio::time::sleep(Duration::from_secs(5)).await;
    if let Err(err) = confirmation.delete(ctx).await {
        tracing::debug!(error = %err, "Purge confirmation already gone");
    }

    Ok(())
}
