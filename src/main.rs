// This is the entry point of the Discord bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (JSON file, SQLite, in-memory)
// - `discord/` = Discord-specific adapters (commands, events)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Register cogs and event handlers

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

mod config;

use crate::config::{BotConfig, StorageBackend};
use crate::core::progression::{ProgressionEngine, ProgressionService};
use crate::core::uptime::UptimeTracker;
use crate::discord::cogs::{load_cogs, COGS};
use crate::discord::commands::presence;
use crate::discord::{command_errors, member_greetings, xp_dispatcher};
use crate::discord::{Data, DynProgressionStore, Error};
use crate::infra::progression::{InMemoryProgressStore, JsonProgressStore, SqliteProgressStore};
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Event handler for non-command Discord events.
/// Chat messages feed the progression system, member joins and leaves get
/// greeted, and shard stage changes feed the status channel.
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Message { new_message } => {
            xp_dispatcher::handle_message(ctx, data, new_message).await;
        }
        serenity::FullEvent::GuildMemberAddition { new_member } => {
            member_greetings::on_member_join(ctx, data.config.welcome_channel_id, new_member)
                .await;
        }
        serenity::FullEvent::GuildMemberRemoval {
            guild_id,
            user,
            member_data_if_available,
        } => {
            member_greetings::on_member_leave(
                ctx,
                data.config.welcome_channel_id,
                *guild_id,
                user,
                member_data_if_available.as_ref(),
            )
            .await;
        }
        serenity::FullEvent::ShardStageUpdate { event } => {
            if matches!(event.new, serenity::ConnectionStage::Disconnected) {
                tracing::warn!(shard_id = ?event.shard_id, "Shard disconnected");
                presence::send_status(
                    &ctx.http,
                    data.config.status_channel_id,
                    "Bot has disconnected! 🔴",
                    serenity::Colour::RED,
                )
                .await;
            }
        }
        _ => {}
    }

    Ok(())
}

/// Open whichever progression backend the config asks for.
async fn build_store(backend: &StorageBackend) -> anyhow::Result<DynProgressionStore> {
    let store: DynProgressionStore = match backend {
        StorageBackend::Json(path) => {
            tracing::info!(path = %path.display(), "Using JSON progression store");
            Box::new(JsonProgressStore::new(path.clone())?)
        }
        StorageBackend::Sqlite(path) => {
            tracing::info!(path = %path.display(), "Using SQLite progression store");
            Box::new(SqliteProgressStore::new(path).await?)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory progression store; progress is lost on restart");
            Box::new(InMemoryProgressStore::new())
        }
    };
    Ok(store)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let config = BotConfig::from_env()?;

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // This is the "composition root" where we wire everything together.

    let store = build_store(&config.storage).await?;
    let progression = Arc::new(ProgressionService::with_settings(
        store,
        ProgressionEngine::new(config.curve),
        config.xp_per_message.clone(),
    )?);

    let token = config.token.clone();
    let prefix = config.prefix.clone();
    let config = Arc::new(config);

    let data = Data {
        progression,
        config: Arc::clone(&config),
        uptime: Arc::new(UptimeTracker::new()),
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    let (commands, cog_report) = load_cogs(COGS, &config.disabled_cogs);
    cog_report.log();

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT // Required to read prefix commands
        | serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands,
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(prefix),
                ..Default::default()
            },
            on_error: |error| Box::pin(command_errors::on_error(error)),
            // Event handler for messages and other events
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                tracing::info!("Bot is starting up...");

                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                tracing::info!(
                    commands = framework.options().commands.len(),
                    "Commands registered"
                );

                presence::on_ready(ctx, &data.config.prefix);
                presence::send_status(
                    &ctx.http,
                    data.config.status_channel_id,
                    "Bot is now online! 🟢",
                    serenity::Colour::DARK_GREEN,
                )
                .await;
                for line in cog_report.failure_lines() {
                    presence::send_status(
                        &ctx.http,
                        data.config.status_channel_id,
                        &line,
                        serenity::Colour::ORANGE,
                    )
                    .await;
                }

                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    client.start().await?;
    Ok(())
}
