//! `qpoll` - CLI for quickpoll
//!
//! This binary drives the quickpoll view-models from the command line:
//! creating polls, voting, and watching results.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use tracing::{debug, warn};

use quickpoll::cli::{
    Cli, Command, ConfigCommand, CreateCommand, LegacyCreateCommand, LoginCommand,
    OutputFormat, RegisterCommand, ResultsCommand, ShowCommand, VoteCommand, VotedCommand,
};
use quickpoll::model::{LoginRequest, RegisterRequest};
use quickpoll::render::{render_results_view, render_vote_view};
use quickpoll::route::{link_from_arg, route_url};
use quickpoll::share::copy_to_clipboard;
use quickpoll::views::{CREATE_FAILED, LOAD_FAILED, RESULTS_FAILED, VOTE_FAILED};
use quickpoll::{
    init_logging, share_url, Config, CreatePollView, Error, HttpPollClient, LegacyClient,
    PollApi, PollResultsView, PollVoteView, QuestionForm, ResultsWatcher, Route, VoteLedger,
    WatchEvent,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    let format = cli.format;

    // Config commands load (or fail to load) configuration themselves
    if let Command::Config(config_cmd) = cli.command {
        return handle_config(cli.config, config_cmd, format);
    }

    let config = Config::load_from(cli.config.clone()).context("Failed to load configuration")?;

    match cli.command {
        Command::Create(cmd) => handle_create(&config, cmd, format).await,
        Command::LegacyCreate(cmd) => handle_legacy_create(&config, cmd).await,
        Command::Show(cmd) => handle_show(&config, &cmd, format).await,
        Command::Vote(cmd) => handle_vote(&config, &cmd, format).await,
        Command::Results(cmd) => handle_results(&config, &cmd, format).await,
        Command::Register(cmd) => handle_register(&config, cmd, format).await,
        Command::Login(cmd) => handle_login(&config, cmd, format).await,
        Command::Voted(cmd) => handle_voted(&config, cmd, format),
        Command::Config(_) => Ok(()),
    }
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn open_ledger(config: &Config) -> anyhow::Result<VoteLedger> {
    let path = config.ledger_path();
    debug!("Opening vote ledger at {}", path.display());
    Ok(VoteLedger::open(&path)?)
}

async fn handle_create(
    config: &Config,
    cmd: CreateCommand,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let api = HttpPollClient::from_config(config)?;
    let mut view = CreatePollView::new().with_creator(cmd.creator_id);

    let form = view.form_mut();
    if !form.set_question(cmd.question) {
        bail!(
            "Question is limited to {} characters",
            quickpoll::form::MAX_QUESTION_LENGTH
        );
    }
    for (index, option) in cmd.options.into_iter().enumerate() {
        if index >= form.options().len() {
            form.add_choice();
        }
        form.set_option(index, option)?;
    }

    let Some(route) = view.submit(&api).await else {
        let errors = view.form().errors();
        if !errors.is_empty() {
            bail!("{errors}");
        }
        bail!("{}", view.submit_error().unwrap_or(CREATE_FAILED));
    };
    let link = route
        .link()
        .cloned()
        .ok_or_else(|| anyhow!("server did not return a poll link"))?;

    let url = share_url(&config.share.origin, &link);
    let results_url = route_url(&config.share.origin, &Route::Results(link.clone()));

    match format {
        OutputFormat::Plain => {
            println!("Poll created!");
            println!("Share this poll: {url}");
            println!("Results:         {results_url}");
        }
        OutputFormat::Json => print_json(&serde_json::json!({
            "poll_link": link,
            "share_url": url,
            "results_url": results_url,
        }))?,
    }

    if cmd.copy {
        copy_share_link(&url, format);
    }
    Ok(())
}

fn copy_share_link(url: &str, format: OutputFormat) {
    match copy_to_clipboard(url) {
        Ok(()) if format == OutputFormat::Plain => println!("Link copied to clipboard!"),
        Ok(()) => debug!("Copied {} to clipboard", url),
        Err(e) => warn!("Could not copy link: {}", e),
    }
}

async fn handle_legacy_create(config: &Config, cmd: LegacyCreateCommand) -> anyhow::Result<()> {
    let mut form = QuestionForm::new();
    form.set_question(cmd.question);

    let client = LegacyClient::from_config(config)?;
    let response = client.submit_form(&mut form).await.map_err(|m| anyhow!(m))?;
    match response.poll_id {
        Some(id) => println!("Poll created! ID: {id}"),
        None => println!("Poll created!"),
    }
    Ok(())
}

async fn handle_show(config: &Config, cmd: &ShowCommand, format: OutputFormat) -> anyhow::Result<()> {
    let link = link_from_arg(&cmd.link)?;
    let api = HttpPollClient::from_config(config)?;
    let ledger = open_ledger(config)?;

    let mut view = PollVoteView::new(link);
    if !view.load(&api, &ledger).await {
        bail!("{}", view.error().unwrap_or(LOAD_FAILED));
    }

    let url = share_url(&config.share.origin, view.link());
    match format {
        OutputFormat::Plain => println!("{}", render_vote_view(&view, &url)),
        OutputFormat::Json => print_json(&serde_json::json!({
            "poll": view.poll(),
            "has_voted": view.has_voted(),
            "selected_option": view.selected_option(),
            "share_url": url,
        }))?,
    }
    if cmd.copy {
        copy_share_link(&url, format);
    }
    Ok(())
}

async fn handle_vote(config: &Config, cmd: &VoteCommand, format: OutputFormat) -> anyhow::Result<()> {
    let link = link_from_arg(&cmd.link)?;
    let api = HttpPollClient::from_config(config)?;
    let ledger = open_ledger(config)?;

    let mut view = PollVoteView::new(link.clone()).with_voter(cmd.voter_id);
    if !view.load(&api, &ledger).await {
        bail!("{}", view.error().unwrap_or(LOAD_FAILED));
    }

    match (cmd.option_id, cmd.choice) {
        (Some(option_id), _) => view.select(option_id)?,
        (None, Some(choice)) => view.select_choice(choice)?,
        (None, None) => bail!("{}", Error::NoSelection),
    };

    if view.submit(&api, &ledger).await.is_none() {
        bail!("{}", view.error().unwrap_or(VOTE_FAILED));
    }

    let mut results = PollResultsView::new(link);
    results.refresh(&api).await;
    match format {
        OutputFormat::Plain => {
            println!("Vote submitted!");
            println!();
            print_results(config, &results);
        }
        OutputFormat::Json => print_json(&serde_json::json!({
            "voted": view.selected_option(),
            "results": results.results(),
        }))?,
    }
    Ok(())
}

fn print_results(config: &Config, view: &PollResultsView) {
    let url = share_url(&config.share.origin, view.link());
    println!(
        "{}",
        render_results_view(view, &url, config.results.bar_width)
    );
}

async fn handle_results(
    config: &Config,
    cmd: &ResultsCommand,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let link = link_from_arg(&cmd.link)?;
    let api = Arc::new(HttpPollClient::from_config(config)?);
    let mut view = PollResultsView::new(link.clone());

    if !cmd.watch {
        view.refresh(api.as_ref()).await;
        if view.is_failed() {
            bail!("{}", view.error().unwrap_or(RESULTS_FAILED));
        }
        match format {
            OutputFormat::Plain => print_results(config, &view),
            OutputFormat::Json => print_json(&view.results())?,
        }
        if cmd.copy {
            copy_share_link(&share_url(&config.share.origin, &link), format);
        }
        return Ok(());
    }

    let interval = cmd
        .interval
        .map_or_else(|| config.refresh_interval(), Duration::from_secs);
    if interval.is_zero() {
        bail!("Refresh interval must be greater than 0");
    }

    if cmd.copy {
        copy_share_link(&share_url(&config.share.origin, &link), format);
    }

    let (handle, mut events) = ResultsWatcher::spawn(api, link, interval);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                print_watch_event(config, &mut view, event, format)?;
            }
            _ = &mut ctrl_c => {
                debug!("Interrupted, stopping results watcher");
                handle.stop();
                break;
            }
        }
    }
    Ok(())
}

fn print_watch_event(
    config: &Config,
    view: &mut PollResultsView,
    event: WatchEvent,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let had_results = view.results().is_some();
    let failure = match &event {
        WatchEvent::Failed(message) => Some(message.clone()),
        WatchEvent::Updated(_) => None,
    };
    view.apply_event(event);

    match (format, failure) {
        (OutputFormat::Json, None) => {
            println!("{}", serde_json::to_string(&view.results())?);
        }
        (OutputFormat::Json, Some(message)) => {
            println!("{}", serde_json::json!({ "error": message }));
        }
        (OutputFormat::Plain, Some(message)) if had_results => {
            eprintln!("Refresh failed: {message}");
        }
        (OutputFormat::Plain, _) => {
            println!(
                "--- {} ---",
                chrono::Local::now().format("%H:%M:%S")
            );
            print_results(config, view);
            println!();
        }
    }
    Ok(())
}

async fn handle_register(
    config: &Config,
    cmd: RegisterCommand,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let api = HttpPollClient::from_config(config)?;
    let request = RegisterRequest {
        username: cmd.username,
        email: cmd.email,
        password: cmd.password,
    };
    let response = api
        .register_user(&request)
        .await
        .map_err(|e| anyhow!(e.user_message("Registration failed.")))?;

    match format {
        OutputFormat::Plain => {
            println!(
                "{}",
                response
                    .message
                    .as_deref()
                    .unwrap_or("User registered successfully")
            );
            println!("User id: {}", response.user_id);
        }
        OutputFormat::Json => print_json(&response)?,
    }
    Ok(())
}

async fn handle_login(
    config: &Config,
    cmd: LoginCommand,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let api = HttpPollClient::from_config(config)?;
    let request = LoginRequest {
        email: cmd.email,
        password: cmd.password,
    };
    let response = api
        .login_user(&request)
        .await
        .map_err(|e| anyhow!(e.user_message("Login failed.")))?;

    match format {
        OutputFormat::Plain => {
            let user = &response.user;
            println!(
                "Logged in as {} <{}> (user id {})",
                user.username, user.email, user.user_id
            );
        }
        OutputFormat::Json => print_json(&response)?,
    }
    Ok(())
}

fn handle_voted(config: &Config, cmd: VotedCommand, format: OutputFormat) -> anyhow::Result<()> {
    let ledger = open_ledger(config)?;
    match cmd {
        VotedCommand::List => {
            let records = ledger.list()?;
            if format == OutputFormat::Json {
                return print_json(&records);
            }
            if records.is_empty() {
                println!("No votes recorded.");
                return Ok(());
            }
            for record in records {
                println!(
                    "{:<24} option {:<6} {}  {}",
                    record.poll_link,
                    record.option_id,
                    record.voted_at.map_or_else(
                        || "unknown time".to_string(),
                        |at| at.format("%Y-%m-%d %H:%M").to_string()
                    ),
                    record.question.as_deref().unwrap_or("")
                );
            }
        }
        VotedCommand::Forget { link } => {
            let link = link_from_arg(&link)?;
            if ledger.forget(&link)? {
                println!("Forgot vote on {link}");
            } else {
                println!("No vote recorded for {link}");
            }
        }
        VotedCommand::Clear { yes } => {
            if yes {
                let removed = ledger.clear()?;
                println!("Cleared {removed} recorded votes.");
            } else {
                println!(
                    "This will forget {} recorded votes in {}.",
                    ledger.count()?,
                    ledger.path().display()
                );
                println!("Use --yes to confirm.");
            }
        }
    }
    Ok(())
}

fn handle_config(
    config_path: Option<PathBuf>,
    cmd: ConfigCommand,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path)?;
            if json || format == OutputFormat::Json {
                return print_json(&config);
            }
            println!("Current Configuration");
            println!("=====================");
            println!();
            println!("[API]");
            println!("  Base URL:           {}", config.api.base_url);
            println!("  Legacy base URL:    {}", config.api.legacy_base_url);
            println!("  Timeout (secs):     {}", config.api.timeout_secs);
            println!();
            println!("[Storage]");
            println!("  Ledger path:        {}", config.ledger_path().display());
            println!();
            println!("[Results]");
            println!(
                "  Refresh (secs):     {}",
                config.results.refresh_interval_secs
            );
            println!("  Bar width:          {}", config.results.bar_width);
            println!();
            println!("[Share]");
            println!("  Origin:             {}", config.share.origin);
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => bail!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
