use std::io::Write;
use std::path::PathBuf;

use carousel_cli::CliContext;
use carousel_cli::commands;
use carousel_cli::logging;
use carousel_cli::readline;
use carousel_core::Command;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version, about = "Drive the carousel page scheduler from a terminal")]
struct Args {
    /// TOML configuration file. Defaults to the platform config location.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log notifications instead of printing them
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let args = Args::parse();
    let _log_guard = logging::init();

    let ctx = CliContext::start(args.config.as_deref(), args.quiet).map_err(|e| e.to_string())?;
    commands::send(&ctx, Command::Ready).await?;

    while let Some(line) = readline()? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &ctx).await {
            Ok(true) => break,
            Ok(false) => {}
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    ctx.shutdown().await;
    Ok(())
}

#[derive(Parser)]
#[command(version, about = "carousel")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Go forward, one page by default
    Next {
        #[arg(allow_negative_numbers = true)]
        amount: Option<i64>,
    },
    /// Go back, one page by default
    Prev {
        #[arg(allow_negative_numbers = true)]
        amount: Option<i64>,
    },
    Select {
        #[arg(allow_negative_numbers = true)]
        page: i64,
    },
    Home,
    Pause,
    Resume,
    /// Show a hidden page
    Show { name: String },
    /// Leave the hidden page
    Leave,
    Query,
    Status,
    Widgets,
    /// Send a raw notification, e.g. `notify PAGE_SELECT 2`
    Notify {
        name: String,
        payload: Option<String>,
    },
    Exit,
}

async fn respond(line: &str, ctx: &CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "carousel".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match cli.command {
        Some(Commands::Next { amount }) => commands::send(ctx, Command::Increment(amount)).await?,
        Some(Commands::Prev { amount }) => commands::send(ctx, Command::Decrement(amount)).await?,
        Some(Commands::Select { page }) => commands::send(ctx, Command::Select(page)).await?,
        Some(Commands::Home) => commands::send(ctx, Command::Home).await?,
        Some(Commands::Pause) => commands::send(ctx, Command::Pause).await?,
        Some(Commands::Resume) => commands::send(ctx, Command::Resume).await?,
        Some(Commands::Show { name }) => commands::send(ctx, Command::EnterOverlay(name)).await?,
        Some(Commands::Leave) => commands::send(ctx, Command::LeaveOverlay).await?,
        Some(Commands::Query) => commands::send(ctx, Command::Query).await?,
        Some(Commands::Status) => commands::show_status(ctx).await?,
        Some(Commands::Widgets) => commands::show_widgets(ctx),
        Some(Commands::Notify { name, payload }) => {
            commands::notify(ctx, &name, payload.as_deref()).await?
        }
        Some(Commands::Exit) => {
            commands::exit()?;
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
