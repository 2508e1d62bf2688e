// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "progression/mod.rs"]
pub mod progression;

#[path = "uptime/uptime_service.rs"]
pub mod uptime;

#[path = "games/games_service.rs"]
pub mod games;
