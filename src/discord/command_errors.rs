// Framework error hook: turns command failures into friendly replies.

use crate::discord::{Data, Error};

/// The failures users get a tailored reply for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandFailure {
    NotFound,
    MissingPermissions,
    MissingArgument,
    BadArgument,
    Other(String),
}

impl CommandFailure {
    pub fn reply(&self, prefix: &str) -> String {
        match self {
            CommandFailure::NotFound => format!(
                "❌ Command not found! Use {}help to see available commands.",
                prefix
            ),
            CommandFailure::MissingPermissions => format!(
                "❌ You don't have permission to use this command! Use {}help to see available commands.",
                prefix
            ),
            CommandFailure::MissingArgument => format!(
                "❌ Missing required argument! Please check command usage with {}help.",
                prefix
            ),
            CommandFailure::BadArgument => format!(
                "❌ Invalid argument provided! Please check command usage with {}help.",
                prefix
            ),
            CommandFailure::Other(error) => format!("❌ An error occurred: {}", error),
        }
    }
}

pub async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    let result = match error {
        poise::FrameworkError::UnknownCommand {
            ctx, msg, prefix, ..
        } => msg
            .channel_id
            .say(ctx, CommandFailure::NotFound.reply(prefix))
            .await
            .map(|_| ()),
        poise::FrameworkError::MissingUserPermissions { ctx, .. } => {
            let prefix = &ctx.data().config.prefix;
            ctx.say(CommandFailure::MissingPermissions.reply(prefix))
                .await
                .map(|_| ())
        }
        poise::FrameworkError::ArgumentParse { ctx, input, .. } => {
            let failure = if input.is_none() {
                CommandFailure::MissingArgument
            } else {
                CommandFailure::BadArgument
            };
            ctx.say(failure.reply(&ctx.data().config.prefix))
                .await
                .map(|_| ())
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!(
                command = %ctx.command().qualified_name,
                error = %error,
                "Unhandled command error"
            );
            let failure = CommandFailure::Other(error.to_string());
            ctx.say(failure.reply(&ctx.data().config.prefix))
                .await
                .map(|_| ())
        }
        other => poise::builtins::on_error(other).await,
    };

    if let Err(err) = result {
        tracing::error!(error = %err, "Failed to report command error");
    }
}
