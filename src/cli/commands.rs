//! Command implementations

use anyhow::{anyhow, Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::app::{ConversionOutcome, ConversionSession, DefaultAppContainer, SubmitOutcome};
use crate::cli::args::ConvertArgs;
use crate::cli::session_input::{SessionCommand, SESSION_HELP};
use crate::utils::path::load_media_file;
use crate::utils::Utils;

/// Execute the convert command
pub async fn convert(container: &DefaultAppContainer, args: ConvertArgs) -> Result<()> {
    info!("Starting convert operation");
    info!("Input: {}", args.input.display());
    info!("Kind: {}", args.kind());

    let file = load_media_file(&args.input)
        .await
        .with_context(|| format!("Failed to open {}", args.input.display()))?;

    let mut session = container.session();
    {
        let form = session.form_mut();
        form.select_file(file)?;
        form.select_kind(args.kind());
        form.set_name(args.name.clone());
        form.set_start(args.start.to_string());
        form.set_time(args.time.to_string());
    }

    container
        .lifecycle()
        .initialize()
        .await
        .context("Media engine is unavailable")?;

    match session.submit().await {
        SubmitOutcome::Saved(outcome) => {
            print_outcome(&outcome, args.json)?;
            info!("Convert operation completed successfully");
            Ok(())
        }
        // the notifier has already shown the alert; report the cause
        SubmitOutcome::Failed(e) => Err(e.into()),
        SubmitOutcome::Rejected(e) => Err(e.into()),
        SubmitOutcome::Disabled => Err(anyhow!("No video selected")),
    }
}

/// Execute the session command: read form actions from stdin until EOF or `quit`
pub async fn session(container: &DefaultAppContainer) -> Result<()> {
    info!("Starting interactive session");

    let mut session = container.session();
    println!("{}", session.render());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        let command = match SessionCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        match command {
            SessionCommand::Quit => break,
            SessionCommand::Help => {
                println!("{}", SESSION_HELP);
                continue;
            }
            SessionCommand::Submit => submit(container, &mut session).await?,
            other => apply(&mut session, other).await,
        }
        println!("{}", session.render());
    }

    info!("Session ended");
    Ok(())
}

/// Apply one form edit
async fn apply(session: &mut ConversionSession, command: SessionCommand) {
    let form = session.form_mut();
    match command {
        SessionCommand::Open(path) => match load_media_file(&path).await {
            Ok(file) => {
                if let Err(e) = form.select_file(file) {
                    eprintln!("{}", e);
                }
            }
            Err(e) => eprintln!("{}", e),
        },
        SessionCommand::Close => form.close(),
        SessionCommand::Kind(kind) => form.select_kind(kind),
        SessionCommand::Name(name) => form.set_name(name),
        SessionCommand::Start(start) => form.set_start(start),
        SessionCommand::Time(time) => form.set_time(time),
        SessionCommand::Submit
        | SessionCommand::Show
        | SessionCommand::Help
        | SessionCommand::Quit => {}
    }
}

/// Submit from the session; waits for the engine first when the control is enabled
async fn submit(container: &DefaultAppContainer, session: &mut ConversionSession) -> Result<()> {
    if session.submit_enabled() {
        if let Err(e) = container.lifecycle().initialize().await {
            eprintln!("{}", e);
            return Ok(());
        }
    }

    match session.submit().await {
        SubmitOutcome::Saved(outcome) => print_outcome(&outcome, false)?,
        SubmitOutcome::Rejected(e) => eprintln!("{}", e),
        SubmitOutcome::Disabled => eprintln!("Select a video first"),
        // the notifier has already alerted the user
        SubmitOutcome::Failed(_) => {}
    }
    Ok(())
}

/// Execute the engine-check command
pub async fn engine_check(container: &DefaultAppContainer) -> Result<()> {
    let lifecycle = container.lifecycle();
    lifecycle
        .initialize()
        .await
        .context("Media engine is unavailable")?;

    let version = lifecycle
        .engine()?
        .version()
        .unwrap_or_else(|| "unknown version".to_string());
    println!("Media engine ready: {}", version);
    Ok(())
}

/// Display a finished conversion
fn print_outcome(outcome: &ConversionOutcome, json: bool) -> Result<()> {
    if json {
        let json = serde_json::to_string_pretty(outcome)
            .context("Failed to serialize conversion result to JSON")?;
        println!("{}", json);
        return Ok(());
    }

    println!("Saved: {}", outcome.saved.path.display());
    println!("Kind: {} ({})", outcome.kind, outcome.saved.mime);
    println!("Size: {}", Utils::format_file_size(outcome.saved.size));
    println!(
        "Elapsed: {}",
        Utils::format_duration(std::time::Duration::from_millis(outcome.elapsed_ms))
    );
    println!("Finished: {}", outcome.finished_at.to_rfc3339());
    Ok(())
}
