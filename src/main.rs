use clap::{Parser, Subcommand, ValueEnum};
use dialoguer::{Input, Password};

use taskdeck::api::{ApiClient, ApiError};
use taskdeck::auth::{AuthError, AuthFlow};
use taskdeck::config::AppConfig;
use taskdeck::prefs::Preferences;
use taskdeck::session::SessionStore;
use taskdeck::tasks::{Redirect, TaskError, TaskList};

#[derive(Parser)]
#[command(name = "taskdeck", version, about = "Command-line client for a hosted task list")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account and sign in
    Register {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Sign in with an existing account
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// List your tasks
    List,
    /// Add a task
    Add {
        #[arg(required = true)]
        title: Vec<String>,
    },
    /// Toggle a task's completed flag
    Done { id: String },
    /// Rename a task
    Rename {
        id: String,
        #[arg(required = true)]
        title: Vec<String>,
    },
    /// Delete a task
    Rm { id: String },
    /// Show or set the dark-mode preference
    Dark { state: Option<Toggle> },
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run().await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = AppConfig::load();
    config.ensure_dirs()?;

    let mut session = SessionStore::load(config.token_path());
    let api = ApiClient::new(&config.api_base_url)?;

    match cli.command {
        Command::Register { name, email } => {
            let mut flow = AuthFlow::new();
            flow.toggle_mode();
            flow.name = prompt_or("Name", name)?;
            flow.email = prompt_or("Email", email)?;
            flow.password = Password::new().with_prompt("Password").interact()?;
            submit(&flow, &api, &mut session).await?;
            println!("Registered and logged in.");
        }
        Command::Login { email } => {
            let mut flow = AuthFlow::new();
            flow.email = prompt_or("Email", email)?;
            flow.password = Password::new().with_prompt("Password").interact()?;
            submit(&flow, &api, &mut session).await?;
            println!("Logged in.");
        }
        Command::Logout => {
            session.clear()?;
            println!("Logged out.");
        }
        Command::List => {
            let list = load_tasks(&api, &mut session).await?;
            let prefs = Preferences::load(config.prefs_path());
            print_tasks(&list, prefs.dark_mode());
        }
        Command::Add { title } => {
            let mut list = load_tasks(&api, &mut session).await?;
            list.set_draft_title(title.join(" "));
            let token = require_token(&session)?.to_string();
            match list.add_task(&api, &token).await {
                Ok(true) => {
                    if let Some(task) = list.tasks().last() {
                        println!("Added {} ({})", task.title, task.id);
                    }
                }
                Ok(false) => eprintln!("nothing to add: title is empty"),
                Err(e) => return Err(expire_if_auth(e, &mut session)?),
            }
        }
        Command::Done { id } => {
            let mut list = load_tasks(&api, &mut session).await?;
            let token = require_token(&session)?.to_string();
            if let Err(e) = list.toggle_complete(&api, &token, &id).await {
                return Err(task_error(e, &mut session)?);
            }
            let task = list.tasks().iter().find(|t| t.id == id);
            match task {
                Some(t) if t.completed => println!("Done: {}", t.title),
                Some(t) => println!("Reopened: {}", t.title),
                None => {}
            }
        }
        Command::Rename { id, title } => {
            let mut list = load_tasks(&api, &mut session).await?;
            let token = require_token(&session)?.to_string();
            if !list.begin_edit(&id) {
                return Err(format!("no task with id {}", id).into());
            }
            list.set_edit_draft(title.join(" "));
            match list.rename_task(&api, &token).await {
                Ok(true) => println!("Renamed {}", id),
                Ok(false) => eprintln!("nothing to rename: title is empty"),
                Err(e) => return Err(task_error(e, &mut session)?),
            }
        }
        Command::Rm { id } => {
            let mut list = load_tasks(&api, &mut session).await?;
            let token = require_token(&session)?.to_string();
            if let Err(e) = list.delete_task(&api, &token, &id).await {
                return Err(task_error(e, &mut session)?);
            }
            println!("Deleted {}", id);
        }
        Command::Dark { state } => {
            let mut prefs = Preferences::load(config.prefs_path());
            match state {
                Some(Toggle::On) => prefs.set_dark_mode(true)?,
                Some(Toggle::Off) => prefs.set_dark_mode(false)?,
                None => {}
            }
            println!("dark mode: {}", if prefs.dark_mode() { "on" } else { "off" });
        }
    }

    Ok(())
}

fn prompt_or(label: &str, value: Option<String>) -> Result<String, dialoguer::Error> {
    match value {
        Some(v) => Ok(v),
        None => Input::new().with_prompt(label).interact_text(),
    }
}

async fn submit(
    flow: &AuthFlow,
    api: &ApiClient,
    session: &mut SessionStore,
) -> Result<(), Box<dyn std::error::Error>> {
    flow.submit(api, session).await.map_err(|e| match e {
        AuthError::Api(ApiError::Auth { message, .. }) => message.into(),
        other => Box::<dyn std::error::Error>::from(other),
    })
}

fn require_token(session: &SessionStore) -> Result<&str, Box<dyn std::error::Error>> {
    session
        .token()
        .ok_or_else(|| "not logged in; run `taskdeck login`".into())
}

/// Fetch the collection up front; an absent session redirects to auth, which
/// for a CLI means telling the user to log in.
async fn load_tasks(
    api: &ApiClient,
    session: &mut SessionStore,
) -> Result<TaskList, Box<dyn std::error::Error>> {
    let mut list = TaskList::new();
    match list.load(api, session).await {
        Ok(None) => Ok(list),
        Ok(Some(Redirect::Auth)) => Err("not logged in; run `taskdeck login`".into()),
        Err(e) => Err(expire_if_auth(e, session)?),
    }
}

fn task_error(
    err: TaskError,
    session: &mut SessionStore,
) -> Result<Box<dyn std::error::Error>, std::io::Error> {
    match err {
        TaskError::Api(e) => expire_if_auth(e, session),
        other => Ok(other.into()),
    }
}

/// A rejected token means the session is over: forget it so the next command
/// goes straight to the login hint.
fn expire_if_auth(
    err: ApiError,
    session: &mut SessionStore,
) -> Result<Box<dyn std::error::Error>, std::io::Error> {
    if err.is_auth() {
        session.clear()?;
        log::warn!("session rejected by server, clearing stored token");
        return Ok("session expired; run `taskdeck login`".into());
    }
    Ok(err.into())
}

fn print_tasks(list: &TaskList, dark_mode: bool) {
    if list.tasks().is_empty() {
        println!("No tasks yet. Add one with `taskdeck add <title>`.");
        return;
    }
    let (done, open) = if dark_mode { ("●", "○") } else { ("[x]", "[ ]") };
    for task in list.tasks() {
        let mark = if task.completed { done } else { open };
        println!("{} {}  {}", mark, task.id, task.title);
    }
}
