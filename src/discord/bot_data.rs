// Types shared by every command and event handler.

use crate::config::BotConfig;
use crate::core::progression::{ProgressionService, ProgressionStore};
use crate::core::uptime::UptimeTracker;
use std::sync::Arc;

/// Type alias for our bot's context.
/// This is what every command receives as its first parameter.
pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// The backend is picked from config at startup, so the service holds a
/// boxed store.
pub type DynProgressionStore = Box<dyn ProgressionStore>;

/// Data that's shared across all commands.
pub struct Data {
    pub progression: Arc<ProgressionService<DynProgressionStore>>,
    pub config: Arc<BotConfig>,
    pub uptime: Arc<UptimeTracker>,
}
