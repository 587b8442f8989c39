//! Demo bot running the Discord adapter with a minimal in-process runtime.
//!
//! Set `DISCORD_BOT_TOKEN` (or put it in `.env`), optionally provide a
//! `config.toml`, then type `.echo Hello`, `.hello`, `.description`, `.greet`,
//! `.help` or `.abort` in a channel the bot can read.

use discord_bridge::framework::{
    Adapter, BotError, BotInput, BoxFuture, CommandHelp, CommandHelps, CommandResponse,
    ContextualFn, EnqueueInput, Input, NotifyError, Output, OutputContent, UserContext,
};
use discord_bridge::{Config, DiscordAdapter, Result, load_config, new_response, resp_with_next};
use dotenvy::dotenv;
use serenity::all::{CreateEmbed, CreateEmbedFooter, CreateMessage};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "config.toml";
const QUEUE_SIZE: usize = 100;

type CommandFn = fn(&dyn Input) -> Result<CommandResponse>;

struct Command {
    identifier: &'static str,
    prefix: &'static str,
    instruction: &'static str,
    func: CommandFn,
}

const COMMANDS: &[Command] = &[
    Command {
        identifier: "echo",
        prefix: ".echo",
        instruction: "Input .echo <message> to have the bot echo your message back.",
        func: echo,
    },
    Command {
        identifier: "hello",
        prefix: ".hello",
        instruction: "Input .hello to receive a greeting.",
        func: hello,
    },
    Command {
        identifier: "description",
        prefix: ".description",
        instruction: "Input .description to display a rich embed message.",
        func: description,
    },
    Command {
        identifier: "greet",
        prefix: ".greet",
        instruction: "Input .greet and the bot asks for your name.",
        func: greet,
    },
];

fn echo(input: &dyn Input) -> Result<CommandResponse> {
    let message = input
        .message()
        .trim()
        .strip_prefix(".echo")
        .map(str::trim)
        .unwrap_or_default();
    let reply = if message.is_empty() {
        "Usage: .echo <message>".to_string()
    } else {
        message.to_string()
    };
    new_response(input, reply, [])
}

fn hello(input: &dyn Input) -> Result<CommandResponse> {
    new_response(input, "Hello, World!", [])
}

fn description(input: &dyn Input) -> Result<CommandResponse> {
    let embed = CreateEmbed::new()
        .title("discord-bridge")
        .description("A Discord adapter for a generic chat-bot runtime.")
        .colour(0x0058_65f2_u32)
        .field("Echo", "`.echo <message>` echoes your message back", false)
        .field("Hello", "`.hello` sends a greeting", false)
        .field("Description", "`.description` displays this embed", false)
        .footer(CreateEmbedFooter::new("Powered by serenity"));
    new_response(input, OutputContent::custom(CreateMessage::new().embed(embed)), [])
}

fn greet(input: &dyn Input) -> Result<CommandResponse> {
    let next: ContextualFn = Arc::new(
        |input: Arc<dyn Input>| -> BoxFuture<'static, std::result::Result<CommandResponse, BotError>> {
            Box::pin(async move {
                let name = input.message().trim().to_string();
                new_response(input.as_ref(), format!("Nice to meet you, {name}!"), [])
                    .map_err(|e| BotError::Command(e.to_string()))
            })
        },
    );
    new_response(input, "What is your name?", [resp_with_next(next)])
}

fn command_helps() -> CommandHelps {
    COMMANDS
        .iter()
        .map(|c| CommandHelp::new(c.identifier, c.instruction))
        .collect::<Vec<_>>()
        .into()
}

/// Runs one input through continuations and commands, then replies.
async fn dispatch(
    adapter: &DiscordAdapter,
    contexts: &mut HashMap<String, UserContext>,
    input: BotInput,
) {
    let sender = input.input().sender_key().to_string();
    let response = match input {
        BotInput::Help(help) => {
            let output = Output::new(help.reply_to(), command_helps().into());
            adapter.send_message(output).await;
            return;
        }
        BotInput::Abort(_) => {
            if contexts.remove(&sender).is_some() {
                info!("Dropped conversation context for {}", sender);
            }
            return;
        }
        BotInput::Message(input) => {
            let result = match contexts.remove(&sender) {
                Some(UserContext::Next(next)) => next(Arc::clone(&input)).await,
                Some(UserContext::Serializable(argument)) => {
                    warn!("No continuation registered for {}", argument.func_identifier);
                    return;
                }
                None => {
                    let text = input.message().trim();
                    let Some(command) = COMMANDS.iter().find(|c| text.starts_with(c.prefix)) else {
                        return;
                    };
                    (command.func)(input.as_ref()).map_err(|e| BotError::Command(e.to_string()))
                }
            };
            result.map(|response| (response, input.reply_to()))
        }
    };

    match response {
        Ok((response, destination)) => {
            let (output, context) = response.into_output(destination);
            adapter.send_message(output).await;
            if let Some(context) = context {
                contexts.insert(sender, context);
            }
        }
        Err(e) => error!("Command failed for {}: {}", sender, e),
    }
}

fn load_configuration() -> Result<Config> {
    let config = if Path::new(CONFIG_PATH).exists() {
        load_config(CONFIG_PATH)?
    } else {
        info!("No {} found, using defaults.", CONFIG_PATH);
        Config::new()
    };
    Ok(config.with_env_token())
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Build the adapter
    let config = load_configuration()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    let adapter = Arc::new(
        DiscordAdapter::new(config, [])
            .inspect_err(|e| error!("Failed to create adapter: {}", e))?,
    );

    // 4. Wire the runtime callbacks
    let (tx, mut rx) = mpsc::channel::<BotInput>(QUEUE_SIZE);
    let enqueue: EnqueueInput = Arc::new(move |input: BotInput| {
        tx.try_send(input)
            .map_err(|e| BotError::Enqueue(e.to_string()))
    });
    let cancel = CancellationToken::new();
    let notify: NotifyError = {
        let cancel = cancel.clone();
        Arc::new(move |err: BotError| {
            error!("Adapter error: {}", err);
            if err.is_non_continuable() {
                cancel.cancel();
            }
        })
    };

    let runner = {
        let adapter = Arc::clone(&adapter);
        let cancel = cancel.clone();
        tokio::spawn(async move { adapter.run(cancel, enqueue, notify).await })
    };

    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutting down...");
            cancel.cancel();
        });
    }

    // 5. Serve inputs until shutdown
    info!("Bot is running. Press Ctrl+C to stop.");
    let mut contexts = HashMap::new();
    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            received = rx.recv() => match received {
                Some(input) => dispatch(&adapter, &mut contexts, input).await,
                None => break,
            },
        }
    }

    if let Err(e) = runner.await {
        error!("Adapter task failed: {}", e);
    }
    Ok(())
}
