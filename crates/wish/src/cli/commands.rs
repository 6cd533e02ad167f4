use super::render::{print_list, print_messages, print_result};
use super::setup::{Cli, Commands, FilterArg, SyncAction};
use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use wishapp::init::{initialize, AppApi, WishContext};
use wishapp::model::WishFilter;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(run_async(cli))
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run_async(cli: Cli) -> Result<()> {
    let mut ctx = initialize(cli.data_dir).context("failed to initialize")?;
    tracing::debug!(data_dir = %ctx.data_dir.display(), command = ?cli.command, "dispatching");
    ctx.api.load().await;

    let outcome = dispatch(&mut ctx, cli.command).await;
    // Background pushes must land before the process exits.
    ctx.api.flush().await;
    outcome
}

async fn dispatch(ctx: &mut WishContext, command: Option<Commands>) -> Result<()> {
    let api = &ctx.api;
    match command {
        None => handle_list(api, FilterArg::All),
        Some(Commands::List { filter }) => handle_list(api, filter),
        Some(Commands::Add { category, text }) => {
            print_result(&api.add_wish(&text.join(" "), category.as_deref())?);
            Ok(())
        }
        Some(Commands::Done { selector }) => {
            print_result(&api.toggle_completed(&selector)?);
            Ok(())
        }
        Some(Commands::Star { selector }) => {
            print_result(&api.toggle_priority(&selector)?);
            Ok(())
        }
        Some(Commands::Remove { selector }) => {
            print_result(&api.remove_wish(&selector)?);
            Ok(())
        }
        Some(Commands::Categories) => {
            print_result(&api.categories()?);
            Ok(())
        }
        Some(Commands::Sync { action }) => handle_sync(api, action).await,
        Some(Commands::Watch { filter }) => {
            let period = ctx.config.poll_interval();
            handle_watch(&mut ctx.api, filter, period).await
        }
    }
}

fn handle_list(api: &AppApi, filter: FilterArg) -> Result<()> {
    let filter = WishFilter::from(filter);
    print_list(&api.wishes(filter)?, filter);
    Ok(())
}

async fn handle_sync(api: &AppApi, action: SyncAction) -> Result<()> {
    let result = match action {
        SyncAction::Create => api.create_sync_code().await?,
        SyncAction::Join { code } => api.join_sync_code(&code).await?,
        SyncAction::Pull => api.pull().await?,
        SyncAction::Push => api.push().await?,
        SyncAction::Status => api.sync_status()?,
        SyncAction::Leave => api.leave_sync()?,
    };
    print_messages(&result.messages);
    Ok(())
}

/// Re-renders whenever a poll changes the list, until Ctrl-C.
async fn handle_watch(
    api: &mut AppApi,
    filter: FilterArg,
    period: std::time::Duration,
) -> Result<()> {
    let filter = WishFilter::from(filter);
    api.start_polling(period)?;

    let mut shown = api.store().snapshot();
    let mut shown_issue = api.last_error();
    print_list(&api.wishes(filter)?, filter);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut ticker = tokio::time::interval(std::time::Duration::from_millis(500));
    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            _ = ticker.tick() => {
                let current = api.store().snapshot();
                let issue = api.last_error();
                if current != shown || issue != shown_issue {
                    println!();
                    print_list(&api.wishes(filter)?, filter);
                    shown = current;
                    shown_issue = issue;
                }
            }
        }
    }

    api.stop_polling();
    Ok(())
}
