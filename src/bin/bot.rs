use anyhow::Result;
use dotenvy::dotenv;
use log::{debug, error, info, warn};
use serenity::async_trait;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::{Interaction, InteractionResponseType};
use serenity::model::channel::{AttachmentType, Message};
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use std::sync::Arc;
use tokio::sync::watch;

use duckbot::commands::{
    interaction_text, register_global_commands, CommandContext, CommandHandler, Reply,
};
use duckbot::core::Config;
use duckbot::database::Database;
use duckbot::features::conversation::{ChatType, ConversationPipeline, InboundEvent};
use duckbot::features::prompting::{CompletionConfig, OpenAiBackend};
use duckbot::features::quota::{DailyQuotaResetter, ResetSchedule};
use duckbot::features::sessions::SessionStore;
use duckbot::features::transcript::discard_transcript;

struct Handler {
    command_handler: Arc<CommandHandler>,
    shutdown: watch::Receiver<bool>,
}

impl Handler {
    fn new(command_handler: CommandHandler, shutdown: watch::Receiver<bool>) -> Self {
        Handler {
            command_handler: Arc::new(command_handler),
            shutdown,
        }
    }

    /// Discord DMs are private chats; anything in a guild is a group chat
    fn to_inbound_event(msg: &Message) -> InboundEvent {
        let chat_type = if msg.guild_id.is_none() {
            ChatType::Private
        } else {
            ChatType::Group
        };
        InboundEvent::new(msg.author.id.0, chat_type, msg.content.clone())
    }

    async fn deliver(ctx: &Context, msg: &Message, reply: Reply) -> Result<()> {
        match reply {
            Reply::Text(text) => {
                msg.channel_id.say(&ctx.http, text).await?;
            }
            Reply::File { path, caption } => {
                let sent = msg
                    .channel_id
                    .send_message(&ctx.http, |m| {
                        m.content(&caption).add_file(AttachmentType::Path(&path))
                    })
                    .await;
                discard_transcript(&path).await;
                sent?;
            }
        }
        Ok(())
    }

    /// Answer a slash command: defer, then send every reply as a followup
    async fn handle_slash_command(
        &self,
        ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        command
            .create_interaction_response(&ctx.http, |r| {
                r.kind(InteractionResponseType::DeferredChannelMessageWithSource)
            })
            .await?;

        let chat_type = if command.guild_id.is_none() {
            ChatType::Private
        } else {
            ChatType::Group
        };
        let text = interaction_text(&command.data.name, &command.data.options);
        let event = InboundEvent::new(command.user.id.0, chat_type, text);

        for reply in self.command_handler.handle_message(&event).await {
            match reply {
                Reply::Text(text) => {
                    command
                        .create_followup_message(&ctx.http, |m| m.content(text))
                        .await?;
                }
                Reply::File { path, caption } => {
                    let sent = command
                        .create_followup_message(&ctx.http, |m| {
                            m.content(&caption).add_file(AttachmentType::Path(&path))
                        })
                        .await;
                    discard_transcript(&path).await;
                    sent?;
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        if *self.shutdown.borrow() {
            debug!("Shutting down, ignoring message from {}", msg.author.id);
            return;
        }

        let event = Self::to_inbound_event(&msg);
        if event.chat_type.is_private() && !event.is_command() {
            if let Err(e) = msg.channel_id.broadcast_typing(&ctx.http).await {
                debug!("Failed to send typing indicator: {e}");
            }
        }

        for reply in self.command_handler.handle_message(&event).await {
            if let Err(e) = Self::deliver(&ctx, &msg, reply).await {
                error!("Failed to deliver reply to {}: {e}", msg.author.id);
                break;
            }
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::ApplicationCommand(command) = interaction {
            if *self.shutdown.borrow() {
                debug!("Shutting down, ignoring /{}", command.data.name);
                return;
            }
            if let Err(e) = self.handle_slash_command(&ctx, &command).await {
                error!("Error handling slash command '{}': {e}", command.data.name);
            }
        }
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());
        info!("🤖 Bot ID: {}", ready.user.id);

        if let Some(shard) = ready.shard {
            info!("⚡ Shard: {}/{}", shard[0] + 1, shard[1]);
        }

        if let Err(e) = register_global_commands(&ctx).await {
            error!("❌ Failed to register global slash commands: {e}");
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    // The openai crate reads its key from the environment, not from our config
    std::env::set_var("OPENAI_API_KEY", &config.openai_api_key);
    std::env::set_var("OPENAI_KEY", &config.openai_api_key);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting duckbot v{}...", env!("CARGO_PKG_VERSION"));

    let database = Database::new(&config.database_path).await?;
    let store = SessionStore::new(database, config.default_persona.clone());
    info!("💾 Session store ready at {}", config.database_path);

    let pipeline = ConversationPipeline::new(
        store.clone(),
        Arc::new(OpenAiBackend::new(config.request_timeout)),
        CompletionConfig::from_config(&config),
        config.daily_message_limit,
    );
    info!(
        "🧠 Model {} | max tokens {} | daily limit {}",
        config.openai_model, config.max_tokens, config.daily_message_limit
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let shutdown_seen = shutdown_rx.clone();

    let resetter = DailyQuotaResetter::new(store, ResetSchedule::daily_at(config.quota_reset_time));
    let resetter_task = tokio::spawn(resetter.run(shutdown_rx.clone()));

    let command_handler = CommandHandler::new(CommandContext::new(pipeline, config.clone()));
    let handler = Handler::new(command_handler, shutdown_rx);

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {e}");
            return;
        }
        info!("🛑 Ctrl-C received, shutting down");
        if shutdown_tx.send(true).is_err() {
            warn!("No shutdown listeners left");
        }
        shard_manager.lock().await.shutdown_all().await;
    });

    info!("Establishing WebSocket connection to Discord gateway...");
    info!("Gateway intents: {intents:?}");

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {why:?}");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    // Gateway can also stop on its own; the resetter only drains on a requested shutdown
    if *shutdown_seen.borrow() {
        if let Err(e) = resetter_task.await {
            warn!("Quota resetter task ended abnormally: {e}");
        }
    } else {
        resetter_task.abort();
    }
    info!("👋 Shutdown complete");
    Ok(())
}
