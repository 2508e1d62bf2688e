// Discord layer - commands and event handlers.

#[path = "bot_data.rs"]
mod bot_data;

#[path = "commands/command_catalog.rs"]
pub mod commands;

#[path = "cogs/cog_registry.rs"]
pub mod cogs;

#[path = "progression/xp_dispatcher.rs"]
pub mod xp_dispatcher;

#[path = "progression/level_announcements.rs"]
pub mod level_announcements;

#[path = "command_errors.rs"]
pub mod command_errors;

#[path = "display_names.rs"]
pub mod display_names;

#[path = "members/member_greetings.rs"]
pub mod member_greetings;

// Re-export shared types for convenience
pub use bot_data::{Context, Data, DynProgressionStore, Error};
