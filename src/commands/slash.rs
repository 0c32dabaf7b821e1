//! # Slash Command Menu
//!
//! Registers the text commands with Discord so the client lists them, and
//! turns a slash invocation back into the `/name args` text the registry parses.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.3.0

use anyhow::Result;
use log::info;
use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::{Command, CommandOptionType};
use serenity::model::application::interaction::application_command::CommandDataOption;
use serenity::prelude::Context;

/// One free-text argument of a slash command
#[derive(Debug, Clone, Copy)]
pub struct SlashArgument {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct SlashCommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub argument: Option<SlashArgument>,
}

const fn plain(name: &'static str, description: &'static str) -> SlashCommandSpec {
    SlashCommandSpec {
        name,
        description,
        argument: None,
    }
}

pub const SLASH_COMMANDS: &[SlashCommandSpec] = &[
    plain("start", "Start a conversation"),
    plain("help", "Show commands and your usage today"),
    plain("info", "Show the model settings"),
    plain("limit", "Show how many messages you have left today"),
    plain("reset", "Forget our conversation so far"),
    plain("save", "Download our conversation as a text file"),
    SlashCommandSpec {
        name: "persona",
        description: "Show or change the persona I use with you",
        argument: Some(SlashArgument {
            name: "text",
            description: "New persona, leave empty to show the current one",
            required: false,
        }),
    },
    SlashCommandSpec {
        name: "ask",
        description: "Ask a single question without our history",
        argument: Some(SlashArgument {
            name: "question",
            description: "Your question",
            required: true,
        }),
    },
    SlashCommandSpec {
        name: "purge",
        description: "Delete a user's conversation (administrators only)",
        argument: Some(SlashArgument {
            name: "user_id",
            description: "Id of the user whose conversation is deleted",
            required: true,
        }),
    },
];

pub fn create_slash_commands() -> Vec<CreateApplicationCommand> {
    SLASH_COMMANDS
        .iter()
        .map(|spec| {
            let mut command = CreateApplicationCommand::default();
            command.name(spec.name).description(spec.description);
            if let Some(argument) = spec.argument {
                command.create_option(|option| {
                    option
                        .name(argument.name)
                        .description(argument.description)
                        .kind(CommandOptionType::String)
                        .required(argument.required)
                        .max_length(2000)
                });
            }
            command
        })
        .collect()
}

/// Registers all slash commands globally
pub async fn register_global_commands(ctx: &Context) -> Result<()> {
    let slash_commands = create_slash_commands();
    let count = slash_commands.len();

    Command::set_global_application_commands(&ctx.http, |commands| {
        for command in slash_commands {
            commands.add_application_command(command);
        }
        commands
    })
    .await?;

    info!("Global slash commands registered successfully ({count} commands)");
    Ok(())
}

/// Utility function to get string option from slash command
pub fn get_string_option(options: &[CommandDataOption], name: &str) -> Option<String> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

/// Chat text equivalent of a slash invocation
pub fn command_text(name: &str, argument: Option<&str>) -> String {
    match argument.map(str::trim).filter(|arg| !arg.is_empty()) {
        Some(arg) => format!("/{name} {arg}"),
        None => format!("/{name}"),
    }
}

/// Chat text for an interaction, reading the declared argument if any
pub fn interaction_text(name: &str, options: &[CommandDataOption]) -> String {
    let argument = SLASH_COMMANDS
        .iter()
        .find(|spec| spec.name == name)
        .and_then(|spec| spec.argument)
        .and_then(|argument| get_string_option(options, argument.name));
    command_text(name, argument.as_deref())
}
