use clap::{Parser, Subcommand};
use log::error;
use std::process::ExitCode;
use std::sync::Arc;

use todo_client::models::TaskStatus;
use todo_client::routes::LogNavigator;
use todo_client::utils::format_date_time;
use todo_client::{AppError, Config, CreateTaskRequest, SessionStore, Task, TodoClient, UpdateTaskRequest};

/// Command-line front end for the Todo API.
#[derive(Parser, Debug)]
#[command(name = "todo-client")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Use the in-memory mock services regardless of USE_MOCK_API
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an account and sign in
    Signup {
        email: String,
        password: String,
        name: String,
    },
    /// Sign in with an existing account
    Signin { email: String, password: String },
    /// Sign out and forget the stored session
    Signout,
    /// Show the signed-in user
    Whoami,
    /// List tasks
    #[command(alias = "ls")]
    List,
    /// Show one task
    Show { id: String },
    /// Create a task
    Add {
        title: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Change a task's title, description or status
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// `--done true` marks the task completed, `--done false` pending
        #[arg(long)]
        done: Option<bool>,
    },
    /// Delete a task
    #[command(alias = "rm")]
    Delete { id: String },
    /// Flip a task between pending and completed
    Toggle { id: String },
}

fn print_task(task: &Task) {
    let mark = if task.is_completed() { "x" } else { " " };
    println!("[{}] {}  {}", mark, task.id, task.title);
    if let Some(description) = &task.description {
        println!("      {}", description);
    }
    println!(
        "      created {}",
        format_date_time(&task.created_at.to_rfc3339())
    );
    if let Some(completed_at) = task.completed_at {
        println!("      completed {}", format_date_time(&completed_at.to_rfc3339()));
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = Config::from_env()?;
    let config = if cli.mock {
        config.with_mock_api(true)
    } else {
        config
    };

    let session = SessionStore::file(&config.session_file);
    let client = TodoClient::from_config(&config, session, Arc::new(LogNavigator))?;

    match cli.command {
        Commands::Signup {
            email,
            password,
            name,
        } => {
            let user = client.auth().sign_up(&email, &password, &name).await?;
            println!("Signed up as {} <{}>", user.name, user.email);
        }
        Commands::Signin { email, password } => {
            let user = client.auth().sign_in(&email, &password).await?;
            println!("Signed in as {} <{}>", user.name, user.email);
        }
        Commands::Signout => {
            client.auth().sign_out().await?;
            println!("Signed out");
        }
        Commands::Whoami => {
            let user = client.auth().current_user().await?;
            println!("{} <{}> (id {})", user.name, user.email, user.id);
        }
        Commands::List => {
            let tasks = client.tasks().list_tasks().await?;
            if tasks.is_empty() {
                println!("No tasks");
            }
            tasks.iter().for_each(print_task);
        }
        Commands::Show { id } => print_task(&client.tasks().get_task(&id).await?),
        Commands::Add { title, description } => {
            let mut input = CreateTaskRequest::new(title);
            input.description = description;
            print_task(&client.tasks().create_task(input).await?);
        }
        Commands::Edit {
            id,
            title,
            description,
            done,
        } => {
            let update = UpdateTaskRequest {
                title,
                description,
                status: done.map(|d| {
                    if d {
                        TaskStatus::Completed
                    } else {
                        TaskStatus::Pending
                    }
                }),
            };
            print_task(&client.tasks().update_task(&id, update).await?);
        }
        Commands::Delete { id } => {
            client.tasks().delete_task(&id).await?;
            println!("Deleted {}", id);
        }
        Commands::Toggle { id } => print_task(&client.tasks().toggle_task(&id).await?),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    env_logger::init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
