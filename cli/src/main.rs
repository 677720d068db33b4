//! CLI entrypoint for naomi
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use chrono_tz::Tz;
use clap::Parser;
use naomi_application::{
    CalendarPort, ConversationLogger, NoTurnProgress, RespondInput, RespondUseCase,
    SpreadsheetPort, TurnProgressNotifier,
};
use naomi_domain::TimeResolver;
use naomi_infrastructure::{
    CalendarBackend, ConfigLoader, FileConfig, GeminiGateway, GoogleApiClient, GoogleCalendar,
    GoogleSheet, InMemoryCalendar, InMemorySheet, JsonSchemaToolConverter,
    JsonlConversationLogger, ScheduleServices, ScheduleToolExecutor, SmtpNotifier,
};
use naomi_presentation::{
    ChatRepl, Cli, ConsoleFormatter, OutputFormat, ProgressReporter, SimpleProgress,
};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Expand a leading `~/` against the home directory.
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Console logging by verbosity, plus daily-rolling files when a log
/// directory is configured. The returned guard must outlive the program.
fn init_tracing(verbose: u8, directory: Option<&str>) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file, guard) = match directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(expand_home(dir), "naomi.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .init();

    guard
}

/// Google adapters when a token is available, in-memory ones otherwise.
fn build_backends(
    config: &FileConfig,
    tz: Tz,
    offline: bool,
) -> Result<(Arc<dyn CalendarPort>, Arc<dyn SpreadsheetPort>)> {
    let (backend, _) = config.calendar.parse_backend();
    let token = config.calendar.access_token(env_var);

    let token = match (offline, backend, token) {
        (false, CalendarBackend::Google, Some(token)) => token,
        _ => {
            info!("Using in-memory calendar and sheet");
            return Ok((
                Arc::new(InMemoryCalendar::new()),
                Arc::new(InMemorySheet::new()),
            ));
        }
    };

    let client = GoogleApiClient::new(token).context("Failed to create Google API client")?;
    let calendar = GoogleCalendar::new(client.clone(), &config.calendar.calendar_id, tz)
        .with_base_url(&config.calendar.base_url);

    let sheet: Arc<dyn SpreadsheetPort> = match &config.sheets.spreadsheet_id {
        Some(id) => Arc::new(
            GoogleSheet::new(client, id)
                .with_range(&config.sheets.range)
                .with_base_url(&config.sheets.base_url),
        ),
        None => {
            warn!("sheets.spreadsheet_id is not set, tracking rows are kept in memory");
            Arc::new(InMemorySheet::new())
        }
    };

    info!(calendar = %config.calendar.calendar_id, "Using Google Calendar");
    Ok((Arc::new(calendar), sheet))
}

fn build_use_case(config: &FileConfig, offline: bool) -> Result<(RespondUseCase, String)> {
    let (tz, _) = config.assistant.parse_timezone();
    let (params, _) = config.assistant.to_orchestrator_params();

    let credentials = Arc::new(
        config
            .gemini
            .credential_pool(env_var)
            .context("No Gemini API key configured")?,
    );
    info!(keys = credentials.len(), "Credential pool ready");

    let gateway = Arc::new(GeminiGateway::with_base_url(
        &config.gemini.base_url,
        &config.gemini.model,
        credentials.clone(),
    )?);

    let resolver = TimeResolver::new(tz);
    let (calendar, sheet) = build_backends(config, tz, offline)?;
    let notifier = Arc::new(SmtpNotifier::new(config.email.to_smtp_settings(env_var)));

    let executor = Arc::new(ScheduleToolExecutor::new(ScheduleServices {
        calendar,
        sheet,
        notifier,
        resolver: resolver.clone(),
    }));

    let mut use_case = RespondUseCase::new(
        gateway,
        executor,
        Arc::new(JsonSchemaToolConverter),
        credentials,
        resolver,
    )
    .with_params(params);

    if let Some(path) = &config.logging.conversation_log {
        let path = expand_home(path);
        match JsonlConversationLogger::new(&path) {
            Some(logger) => {
                info!(path = %path.display(), "Conversation log enabled");
                let logger: Arc<dyn ConversationLogger> = Arc::new(logger);
                use_case = use_case.with_conversation_logger(logger);
            }
            None => warn!(path = %path.display(), "Could not open conversation log"),
        }
    }

    Ok((use_case, config.gemini.model.clone()))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    ConfigLoader::load_dotenv();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()?
    } else {
        ConfigLoader::load(cli.config.as_ref())?
    };

    let _log_guard = init_tracing(cli.verbose, config.logging.directory.as_deref());
    info!("Starting naomi");

    let issues = config.validate();
    for issue in &issues {
        if issue.is_error() {
            eprintln!("{}", issue);
        } else {
            warn!("{}", issue);
        }
    }
    if issues.iter().any(|i| i.is_error()) {
        bail!("Invalid configuration");
    }

    // === Dependency Injection ===
    let (use_case, model) = build_use_case(&config, cli.offline)?;
    let name = config.assistant.name.clone();

    // Chat mode
    if cli.chat {
        let mut repl = ChatRepl::new(use_case, name, model)
            .with_progress(!cli.quiet)
            .with_tool_output(cli.output == OutputFormat::Full);
        repl.run().await?;
        return Ok(ExitCode::SUCCESS);
    }

    // Single message mode - message is required
    let message = match cli.message {
        Some(m) => m,
        None => bail!("A message is required. Use --chat for interactive mode."),
    };

    let progress: Box<dyn TurnProgressNotifier> =
        if cli.quiet || cli.output == OutputFormat::Json {
            Box::new(NoTurnProgress)
        } else if std::io::stderr().is_terminal() {
            Box::new(ProgressReporter::new())
        } else {
            Box::new(SimpleProgress)
        };

    let output = use_case
        .execute(RespondInput::new(&message, &[]), progress.as_ref())
        .await;

    let rendered = match cli.output {
        OutputFormat::Text => ConsoleFormatter::format_reply(&name, &output),
        OutputFormat::Full => ConsoleFormatter::format_full(&name, &output),
        OutputFormat::Json => ConsoleFormatter::format_json(&output),
    };
    println!("{}", rendered);

    Ok(if output.error.is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
