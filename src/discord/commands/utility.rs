use crate::discord::display_names::display_name;
use crate::discord::{Context, Data, Error};
use poise::serenity_prelude as serenity;

pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![ping(), uptime(), avatar(), serverinfo(), botinfo(), help()]
}

/// How many guild features `serverinfo` lists before trailing off.
const MAX_LISTED_FEATURES: usize = 10;

/// Reply with the gateway latency.
#[poise::command(slash_command, prefix_command, aliases("latency"))]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let latency = ctx.ping().await;

    let embed = serenity::CreateEmbed::new()
        .title("🏓 Pong!")
        .description(format!("Latency is {}ms", latency.as_millis()))
        .color(serenity::Colour::PURPLE);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Displays the bot's uptime.
#[poise::command(slash_command, prefix_command, aliases("up"))]
pub async fn uptime(ctx: Context<'_>) -> Result<(), Error> {
    let embed = serenity::CreateEmbed::new()
        .title("⏰ Bot Uptime")
        .description(format!(
            "I have been online for **{}**",
            ctx.data().uptime.describe()
        ))
        .color(serenity::Colour::DARK_GREEN);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Displays the avatar of a user.
#[poise::command(slash_command, prefix_command, aliases("ava"))]
pub async fn avatar(
    ctx: Context<'_>,
    #[description = "User whose avatar to show (defaults to you)"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let user = user.as_ref().unwrap_or_else(|| ctx.author());
    let name = display_name(ctx, user).await;

    let embed = serenity::CreateEmbed::new()
        .title(format!("{}'s Avatar", name))
        .image(user.face())
        .color(serenity::Colour::PURPLE);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// What `serverinfo` shows, copied out of the cached guild so the cache
/// guard is released before anything is awaited.
#[derive(Debug, Clone, PartialEq)]
struct ServerSummary {
    name: String,
    id: u64,
    owner_id: u64,
    icon_url: Option<String>,
    boost_tier: String,
    boosters: u64,
    members: u64,
    bots: usize,
    text_channels: usize,
    voice_channels: usize,
    categories: usize,
    total_channels: usize,
    roles: usize,
    emojis: usize,
    stickers: usize,
    verification: String,
    features: Vec<String>,
    created_unix: i64,
}

impl ServerSummary {
    fn from_guild(guild: &serenity::Guild) -> Self {
        let count_kind = |kind: serenity::ChannelType| {
            guild.channels.values().filter(|c| c.kind == kind).count()
        };

        Self {
            name: guild.name.clone(),
            id: guild.id.get(),
            owner_id: guild.owner_id.get(),
            icon_url: guild.icon_url(),
            boost_tier: format!("{:?}", guild.premium_tier),
            boosters: guild.premium_subscription_count.unwrap_or(0),
            members: guild.member_count,
            bots: guild.members.values().filter(|m| m.user.bot).count(),
            text_channels: count_kind(serenity::ChannelType::Text),
            voice_channels: count_kind(serenity::ChannelType::Voice),
            categories: count_kind(serenity::ChannelType::Category),
            total_channels: guild.channels.len(),
            roles: guild.roles.len(),
            emojis: guild.emojis.len(),
            stickers: guild.stickers.len(),
            verification: format!("{:?}", guild.verification_level),
            features: guild.features.clone(),
            created_unix: guild.id.created_at().unix_timestamp(),
        }
    }

    /// Embed fields as (name, value, inline).
    fn fields(&self) -> Vec<(&'static str, String, bool)> {
        // Only cached members can be told apart; the rest count as humans.
        let humans = self.members.saturating_sub(self.bots as u64);
        let mut fields = vec![
            ("Owner", format!("<@{}>", self.owner_id), true),
            ("Boost Tier", self.boost_tier.clone(), true),
            (
                "Members",
                format!("{} total\n{} humans\n{} bots", self.members, humans, self.bots),
                true,
            ),
            (
                "Channels",
                format!(
                    "{} total\n{} text\n{} voice\n{} categories",
                    self.total_channels, self.text_channels, self.voice_channels, self.categories
                ),
                true,
            ),
            ("Roles", self.roles.to_string(), true),
            ("Emojis", self.emojis.to_string(), true),
            ("Stickers", self.stickers.to_string(), true),
            ("Boosters", self.boosters.to_string(), true),
            ("Verification", self.verification.clone(), true),
        ];

        if !self.features.is_empty() {
            let mut listed = self
                .features
                .iter()
                .take(MAX_LISTED_FEATURES)
                .map(|feature| title_case(feature))
                .collect::<Vec<_>>()
                .join(", ");
            if self.features.len() > MAX_LISTED_FEATURES {
                listed.push_str(" ...");
            }
            fields.push(("Features", listed, false));
        }

        fields
    }
}

/// `ANIMATED_ICON` -> `Animated Icon`
fn title_case(raw: &str) -> String {
    raw.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// `Created on 05 Mar 2021 • 1200 days ago`
fn created_footer(created_unix: i64, now: chrono::DateTime<chrono::Utc>) -> String {
    match chrono::DateTime::from_timestamp(created_unix, 0) {
        Some(created) => format!(
            "Created on {} • {} days ago",
            created.format("%d %b %Y"),
            (now - created).num_days().max(0)
        ),
        None => "Creation date unknown".to_string(),
    }
}

/// Display detailed information about the current server.
#[poise::command(slash_command, prefix_command, aliases("guildinfo"), guild_only)]
pub async fn serverinfo(ctx: Context<'_>) -> Result<(), Error> {
    let summary = {
        let guild = ctx
            .guild()
            .ok_or("This server isn't cached yet, try again in a moment.")?;
        ServerSummary::from_guild(&guild)
    };

    let mut embed = serenity::CreateEmbed::new()
        .title(&summary.name)
        .description(format!("ID: {}", summary.id))
        .color(serenity::Colour::PURPLE)
        .footer(serenity::CreateEmbedFooter::new(created_footer(
            summary.created_unix,
            chrono::Utc::now(),
        )));
    if let Some(icon_url) = &summary.icon_url {
        embed = embed.thumbnail(icon_url);
    }
    for (name, value, inline) in summary.fields() {
        embed = embed.field(name, value, inline);
    }

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Displays information about the bot.
#[poise::command(slash_command, prefix_command, aliases("botstats"), guild_only)]
pub async fn botinfo(ctx: Context<'_>) -> Result<(), Error> {
    let (bot_id, bot_name, bot_face) = {
        let me = ctx.cache().current_user();
        (me.id, me.name.clone(), me.face())
    };
    let servers = ctx.cache().guild_count();
    let latency = ctx.ping().await;
    let requester = display_name(ctx, ctx.author()).await;

    let details = format!(
        "**Bot:** {} ({})\n\
         **Created:** <t:{}:F>\n\
         **Ping:** {} ms\n\
         **Uptime:** {}\n\
         **Servers:** {}\n\
         **Version:** {}\n\
         **Library:** poise + serenity",
        bot_name,
        bot_id,
        bot_id.created_at().unix_timestamp(),
        latency.as_millis(),
        ctx.data().uptime.describe(),
        servers,
        env!("CARGO_PKG_VERSION"),
    );

    let embed = serenity::CreateEmbed::new()
        .title(format!("{}'s Info", bot_name))
        .color(serenity::Colour::PURPLE)
        .thumbnail(&bot_face)
        .field("Bot Info", details, false)
        .field(
            "Bot Avatar",
            format!("[Click Here to see my avatar!]({})", bot_face),
            false,
        )
        .field(
            "Bot Profile",
            format!(
                "[Click Here to see my profile!](https://discord.com/users/{})",
                bot_id
            ),
            false,
        )
        .footer(serenity::CreateEmbedFooter::new(format!(
            "Requested by {}",
            requester
        )));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Show every available command.
#[poise::command(slash_command, prefix_command)]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let prefix = &ctx.data().config.prefix;

    let mut commands: Vec<_> = ctx
        .framework()
        .options()
        .commands
        .iter()
        .filter(|command| !command.hide_in_help)
        .collect();
    commands.sort_by(|a, b| a.name.cmp(&b.name));

    let mut embed = serenity::CreateEmbed::new()
        .title("Bot Commands")
        .description("Here are the available commands:")
        .color(serenity::Colour::PURPLE);

    // Embeds cap out at 25 fields
    for command in commands.into_iter().take(25) {
        let description = command
            .description
            .clone()
            .unwrap_or_else(|| "No description.".to_string());
        let aliases: Vec<String> = command.aliases.iter().map(|a| a.to_string()).collect();
        let value = if aliases.is_empty() {
            description
        } else {
            format!("{}\n_Aliases: {}_", description, aliases.join(", "))
        };
        embed = embed.field(format!("{}{}", prefix, command.name), value, false);
    }

    embed = embed.footer(serenity::CreateEmbedFooter::new(format!(
        "Every command also works as a slash command. Prefix: {}",
        prefix
    )));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
