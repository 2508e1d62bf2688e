// Static cog registry.
//
// A cog is a named group of commands. Instead of scanning a directory at
// runtime, every cog is listed in `COGS` and loaded at startup. Each entry
// is reported as loaded, skipped (disabled in config) or failed.

use crate::discord::commands::{fun, moderation, progression, utility};
use crate::discord::{Data, Error};
use std::collections::HashMap;

pub type CommandList = Vec<poise::Command<Data, Error>>;

pub struct CogEntry {
    pub name: &'static str,
    pub commands: fn() -> CommandList,
}

pub const COGS: &[CogEntry] = &[
    CogEntry {
        name: "progression",
        commands: progression::commands,
    },
    CogEntry {
        name: "utility",
        commands: utility::commands,
    },
    CogEntry {
        name: "fun",
        commands: fun::commands,
    },
    CogEntry {
        name: "moderation",
        commands: moderation::commands,
    },
];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CogLoadError {
    #[error("`{name}` is already registered by cog `{owner}`")]
    DuplicateName { name: String, owner: String },

    #[error("cog provides no commands")]
    Empty,
}

#[derive(Debug, Default)]
pub struct CogLoadReport {
    pub loaded: Vec<&'static str>,
    pub skipped: Vec<&'static str>,
    pub failed: Vec<(&'static str, CogLoadError)>,
    /// Names in the disabled list that match no cog.
    pub unknown_disabled: Vec<String>,
}

impl CogLoadReport {
    pub fn log(&self) {
        for name in &self.loaded {
            tracing::info!(cog = name, "Loaded cog");
        }
        for name in &self.skipped {
            tracing::info!(cog = name, "Cog disabled by config");
        }
        for (name, err) in &self.failed {
            tracing::error!(cog = name, error = %err, "Failed to load cog");
        }
        for name in &self.unknown_disabled {
            tracing::warn!(cog = %name, "Disabled cog does not exist");
        }
    }

    /// One line per failed cog, for the status channel.
    pub fn failure_lines(&self) -> Vec<String> {
        self.failed
            .iter()
            .map(|(name, err)| format!("Error loading cog {}: {} ⚠️", name, err))
            .collect()
    }
}

/// Build every enabled cog and collect their commands.
///
/// A cog whose command names or aliases collide with an already loaded
/// command fails as a whole and contributes nothing.
pub fn load_cogs(entries: &[CogEntry], disabled: &[String]) -> (CommandList, CogLoadReport) {
    let mut report = CogLoadReport::default();
    let mut commands = CommandList::new();
    // name or alias -> owning cog
    let mut owners: HashMap<String, &'static str> = HashMap::new();

    for entry in entries {
        if disabled.iter().any(|d| d.eq_ignore_ascii_case(entry.name)) {
            report.skipped.push(entry.name);
            continue;
        }

        let cog_commands = (entry.commands)();
        match claim_names(entry.name, &cog_commands, &owners) {
            Ok(names) => {
                for name in names {
                    owners.insert(name, entry.name);
                }
                commands.extend(cog_commands);
                report.loaded.push(entry.name);
            }
            Err(err) => report.failed.push((entry.name, err)),
        }
    }

    report.unknown_disabled = disabled
        .iter()
        .filter(|d| !entries.iter().any(|e| e.name.eq_ignore_ascii_case(d)))
        .cloned()
        .collect();

    (commands, report)
}

fn claim_names(
    cog: &'static str,
    commands: &CommandList,
    owners: &HashMap<String, &'static str>,
) -> Result<Vec<String>, CogLoadError> {
    if commands.is_empty() {
        return Err(CogLoadError::Empty);
    }

    let mut claimed: Vec<String> = Vec::new();
    for command in commands {
        let names = std::iter::once(command.name.to_lowercase())
            .chain(command.aliases.iter().map(|a| a.to_lowercase()));
        for name in names {
            if let Some(owner) = owners.get(&name) {
                return Err(CogLoadError::DuplicateName {
                    name,
                    owner: owner.to_string(),
                });
            }
            if claimed.contains(&name) {
                return Err(CogLoadError::DuplicateName {
                    name,
                    owner: cog.to_string(),
                });
            }
            claimed.push(name);
        }
    }
    Ok(claimed)
}
