// Discord commands module.
// Each cog gets its own command file.

pub mod fun;
pub mod moderation;
pub mod progression;
pub mod utility;

// Presence and status channel updates
pub mod presence;
