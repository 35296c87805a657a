mod render;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chatzen_chats::{RealtimeChannel, SessionState, ThreadUpdate};
use chatzen_config::load as load_config;
use chatzen_runtime::{shutdown_signal, telemetry, ClientServices};
use chatzen_users::User;
use clap::{Parser, Subcommand};
use colored::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "chatzen")]
#[command(about = "Chat-Zen command line client")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Store the logged-in user returned by the backend's login endpoint
    Login {
        /// JSON file holding the user record (`_id`, `name`, `token`, ...)
        #[arg(long, conflicts_with_all = ["id", "name", "token"])]
        file: Option<PathBuf>,
        #[arg(long, requires_all = ["name", "token"])]
        id: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        token: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Forget the stored user
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List my chats (default)
    Chats,
    /// Search users by name or email
    Search { query: String },
    /// Open or create the one-to-one chat with a user
    Access { user_id: String },
    /// Open a chat and follow it live
    Open { chat_id: String },
    /// Rename a group chat
    Rename { chat_id: String, name: String },
    /// Add a user to a group chat; the query must match exactly one user
    Add { chat_id: String, query: String },
    /// Remove a member from a group chat
    Remove { chat_id: String, user_id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    telemetry::init_tracing().context("failed to initialise tracing")?;
    let config = load_config().context("failed to load configuration")?;
    let services =
        ClientServices::initialise(&config).context("failed to initialise client services")?;

    let outcome = match cli.command.unwrap_or(Commands::Chats) {
        Commands::Login {
            file,
            id,
            name,
            token,
            email,
        } => login(&services, file, id, name, token, email).await,
        Commands::Logout => logout(&services).await,
        Commands::Whoami => whoami(&services).await,
        Commands::Chats => list_chats(&services).await,
        Commands::Search { query } => search(&services, &query).await,
        Commands::Access { user_id } => access(&services, &user_id).await,
        Commands::Open { chat_id } => open(&services, &chat_id).await,
        Commands::Rename { chat_id, name } => rename(&services, &chat_id, &name).await,
        Commands::Add { chat_id, query } => add_member(&services, &chat_id, &query).await,
        Commands::Remove { chat_id, user_id } => {
            remove_member(&services, &chat_id, &user_id).await
        }
    };

    render::notices(&services.notices);
    outcome
}

async fn login(
    services: &ClientServices,
    file: Option<PathBuf>,
    id: Option<String>,
    name: Option<String>,
    token: Option<String>,
    email: Option<String>,
) -> Result<()> {
    let user = match (file, id, name, token) {
        (Some(path), ..) => {
            let raw = tokio::fs::read(&path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_slice::<User>(&raw)
                .with_context(|| format!("{} is not a user record", path.display()))?
        }
        (None, Some(id), Some(name), Some(token)) => {
            let user = User::new(id, name).with_token(token);
            match email {
                Some(email) => user.with_email(email),
                None => user,
            }
        }
        _ => bail!("pass --file, or --id together with --name and --token"),
    };

    let state = services.login(user).await?;
    println!("Logged in as {}", state.user().name.green());
    Ok(())
}

async fn logout(services: &ClientServices) -> Result<()> {
    services.logout().await?;
    println!("Logged out");
    Ok(())
}

async fn whoami(services: &ClientServices) -> Result<()> {
    match services.restore_session().await? {
        Some(state) => {
            let user = state.user();
            println!("{} {}", user.name.bold(), user.id.dimmed());
            if let Some(email) = &user.email {
                println!("{email}");
            }
        }
        None => println!("Not logged in"),
    }
    Ok(())
}

async fn list_chats(services: &ClientServices) -> Result<()> {
    let mut state = services.require_session().await?;
    let user_id = state.user().id.clone();
    let chats = services.chat_list().refresh(&mut state).await?;

    if chats.is_empty() {
        println!("No chats yet. Use `chatzen search` and `chatzen access` to start one.");
        return Ok(());
    }
    println!("My Chats ({})", chats.len().to_string().yellow());
    for chat in chats {
        println!("{}", render::chat_row(chat, &user_id, false));
    }
    Ok(())
}

async fn search(services: &ClientServices, query: &str) -> Result<()> {
    let state = services.require_session().await?;
    let users = services.search().search(&state, query).await?;

    if users.is_empty() && !query.trim().is_empty() {
        println!("No users found");
    }
    for user in &users {
        println!("{}", render::user_row(user));
    }
    Ok(())
}

async fn access(services: &ClientServices, user_id: &str) -> Result<()> {
    let mut state = services.require_session().await?;
    services
        .chat_list()
        .refresh(&mut state)
        .await
        .context("failed to load chats")?;
    let chat = services.chat_list().access_chat(&mut state, user_id).await?;

    println!("{}", render::chat_row(&chat, &state.user().id, true));
    println!("Open it with `chatzen open {}`", chat.id);
    Ok(())
}

/// Session with the chat list loaded, failing when `chat_id` is not among it
async fn session_with_chat(services: &ClientServices, chat_id: &str) -> Result<SessionState> {
    let mut state = services.require_session().await?;
    services
        .chat_list()
        .refresh(&mut state)
        .await
        .context("failed to load chats")?;
    if state.chat(chat_id).is_none() {
        bail!("chat {chat_id} is not in your chat list");
    }
    Ok(state)
}

async fn rename(services: &ClientServices, chat_id: &str, name: &str) -> Result<()> {
    let mut state = session_with_chat(services, chat_id).await?;
    let chat = services.groups().rename(&mut state, chat_id, name).await?;
    println!("Renamed to {}", chat.title(&state.user().id).green());
    Ok(())
}

async fn add_member(services: &ClientServices, chat_id: &str, query: &str) -> Result<()> {
    let mut state = session_with_chat(services, chat_id).await?;
    let candidates = services.search().search(&state, query).await?;

    let user = match candidates.iter().find(|user| user.is(query)) {
        Some(exact) => exact.clone(),
        None => match candidates.as_slice() {
            [only] => only.clone(),
            [] => bail!("no user matches {query:?}"),
            several => {
                for user in several {
                    println!("{}", render::user_row(user));
                }
                bail!("{} users match {query:?}, pass a user id", several.len());
            }
        },
    };

    let chat = services.groups().add_member(&mut state, chat_id, &user).await?;
    println!(
        "Added {} to {} ({} members)",
        user.name.green(),
        chat.title(&state.user().id),
        chat.users.len()
    );
    Ok(())
}

async fn remove_member(services: &ClientServices, chat_id: &str, user_id: &str) -> Result<()> {
    let mut state = session_with_chat(services, chat_id).await?;
    let member = state
        .chat(chat_id)
        .and_then(|chat| chat.users.iter().find(|user| user.is(user_id)))
        .cloned()
        .with_context(|| format!("{user_id} is not a member of {chat_id}"))?;

    let leaving = member.is(&state.user().id);
    services
        .groups()
        .remove_member(&mut state, chat_id, &member)
        .await?;
    if leaving {
        println!("Left the group");
    } else {
        println!("Removed {}", member.name.green());
    }
    Ok(())
}

/// Follow a chat live.
///
/// Lines are sent as messages. A line ending in `\` is kept as a draft and
/// continued on the next line, which also shows the typing indicator to the
/// other participants. `/quit` or end of input leaves.
async fn open(services: &ClientServices, chat_id: &str) -> Result<()> {
    let state = session_with_chat(services, chat_id).await?;
    let chat = state
        .chat(chat_id)
        .cloned()
        .with_context(|| format!("chat {chat_id} disappeared"))?;
    let auth = state.auth().clone();
    let user_id = auth.user_id().to_string();

    let channel = services.connect_realtime(&auth).await?;
    let mut thread = services.thread(channel, auth.user());

    println!("{}", chat.title(&user_id).bold().underline());
    if !thread.open_chat(services.api.as_ref(), auth.token(), &chat).await {
        warn!(chat_id, "history was superseded");
    }
    render::thread(thread.messages(), &user_id);
    render::notices(&services.notices);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        let deadline = thread.typing_deadline();
        tokio::select! {
            _ = &mut shutdown => break,
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read input")? else {
                    break;
                };
                if line.trim() == "/quit" {
                    break;
                }
                if let Some(partial) = line.strip_suffix('\\') {
                    let draft = format!("{}{partial}\n", thread.input());
                    thread.set_input(draft, Instant::now());
                    continue;
                }

                let text = format!("{}{line}", thread.input());
                thread.set_input(text, Instant::now());
                match thread.send(services.api.as_ref(), auth.token()).await {
                    Ok(true) => {
                        let messages = thread.messages();
                        println!("{}", render::message(messages, messages.len() - 1, &user_id));
                    }
                    Ok(false) => {}
                    Err(err) => println!("{}", err.user_message().red()),
                }
            }
            event = thread.next_event() => {
                let Some(event) = event else {
                    println!("{}", "Connection lost".red());
                    break;
                };
                match thread.handle_event(event) {
                    Some(ThreadUpdate::Appended(_)) => {
                        let messages = thread.messages();
                        println!("{}", render::message(messages, messages.len() - 1, &user_id));
                    }
                    Some(ThreadUpdate::RemoteTyping(true)) => println!("{}", "typing...".dimmed()),
                    Some(ThreadUpdate::Connected) => info!("connected"),
                    Some(ThreadUpdate::RemoteTyping(false)) | None => {}
                }
            }
            _ = async {
                match deadline {
                    Some(deadline) => tokio::time::sleep_until(deadline).await,
                    None => std::future::pending().await,
                }
            } => {
                thread.poll_typing(Instant::now());
            }
        }
        render::notices(&services.notices);
    }

    let channel = thread.into_channel();
    if channel.is_connected() {
        info!(chat_id, "leaving chat");
    }
    channel.disconnect().await;
    Ok(())
}
