use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::{ArgGroup, Parser, Subcommand};
use inventory_api::client::views::{CreateForm, DeleteOutcome, EditForm, HealthView, ListView};
use inventory_api::client::{ApiClient, ClientError};
use inventory_api::config::ClientConfig;

#[derive(Debug, Parser)]
#[command(name = "inventory-cli", version, about = "Terminal client for the inventory API")]
struct Cli {
    /// API base URL (defaults to INVENTORY_API_URL, then http://localhost:8001/api)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show every item, newest first, with totals
    List,
    /// Create an item, then show the list
    Add {
        #[arg(long)]
        name: String,
        /// Whole, non-negative number
        #[arg(long)]
        quantity: String,
    },
    /// Change an item's name and/or quantity, then show the list
    #[command(group(ArgGroup::new("changes").required(true).multiple(true).args(["name", "quantity"])))]
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        quantity: Option<String>,
    },
    /// Delete an item after confirmation
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Check whether the backend is reachable
    Health {
        /// Keep the view open: Enter refreshes, `q` quits
        #[arg(long)]
        watch: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config = ClientConfig {
            timeout: config.timeout,
            ..ClientConfig::new(url)
        };
    }
    let api = ApiClient::new(&config)?;

    let code = match cli.command {
        Command::List => list(&api).await,
        Command::Add { name, quantity } => add(&api, name, quantity).await,
        Command::Edit { id, name, quantity } => edit(&api, id, name, quantity).await,
        Command::Delete { id, yes } => delete(&api, id, yes).await,
        Command::Health { watch } => health(&api, watch).await?,
    };
    Ok(code)
}

async fn list(api: &ApiClient) -> ExitCode {
    let mut view = ListView::new();
    view.load(api).await;
    print!("{}", view.render());
    if view.error().is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn add(api: &ApiClient, name: String, quantity: String) -> ExitCode {
    let mut form = CreateForm::new();
    form.set_name(name);
    form.set_quantity(quantity);

    match form.submit(api).await {
        Some(item) => {
            println!("Created item #{} ({} × {})\n", item.id, item.name, item.quantity);
            list(api).await
        }
        None => {
            for (field, message) in form.errors() {
                eprintln!("{field}: {message}");
            }
            if let Some(alert) = form.alert() {
                eprintln!("{alert}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn edit(
    api: &ApiClient,
    id: i64,
    name: Option<String>,
    quantity: Option<String>,
) -> ExitCode {
    let mut form = match EditForm::load(api, id).await {
        Ok(form) => form,
        Err(ClientError::NotFound(_)) => {
            eprintln!("Item not found. It may have already been deleted.");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("Error loading item: {}", e.user_message());
            return ExitCode::FAILURE;
        }
    };
    if let Some(name) = name {
        form.set_name(name);
    }
    if let Some(quantity) = quantity {
        form.set_quantity(quantity);
    }

    match form.submit(api).await {
        Some(item) => {
            println!("Updated item #{} ({} × {})\n", item.id, item.name, item.quantity);
            list(api).await
        }
        None => {
            for (field, message) in form.errors() {
                eprintln!("{field}: {message}");
            }
            if let Some(alert) = form.alert() {
                eprintln!("{alert}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn delete(api: &ApiClient, id: i64, yes: bool) -> ExitCode {
    let mut view = ListView::new();
    view.load(api).await;

    let outcome = view
        .delete(api, id, |item| {
            yes || confirm(item.map(|i| i.name.as_str()), id).unwrap_or(false)
        })
        .await;

    if let Some(notice) = view.notice() {
        println!("{notice}\n");
    }
    match outcome {
        DeleteOutcome::Cancelled => ExitCode::SUCCESS,
        DeleteOutcome::Failed(_) => ExitCode::FAILURE,
        DeleteOutcome::Deleted | DeleteOutcome::AlreadyGone => {
            print!("{}", view.render());
            ExitCode::SUCCESS
        }
    }
}

fn confirm(name: Option<&str>, id: i64) -> io::Result<bool> {
    let label = name.map_or_else(|| format!("item #{id}"), |n| format!("\"{n}\" (#{id})"));
    print!("Are you sure you want to delete {label}? You won't be able to revert this! [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

async fn health(api: &ApiClient, watch: bool) -> anyhow::Result<ExitCode> {
    let mut view = HealthView::new();
    loop {
        view.refresh(api).await;
        print!("{}", view.render(api.base_url()));

        if !watch {
            break;
        }
        print!("\n[Enter] refresh  [q] quit > ");
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 || line.trim().eq_ignore_ascii_case("q") {
            break;
        }
        println!();
    }

    Ok(if view.is_connected() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
