use std::collections::VecDeque;
use std::io::{self, Write};
use std::path::Path;

use anyhow::Context;
use hippo_core::{update, AppState, Msg, RunMode};
use hippo_engine::{EngineConfig, IntranetSession, ScrapeEngine, SessionSettings};
use hippo_logging::{hippo_debug, hippo_info};
use url::Url;

use crate::cli::{Cli, Command, ConfigArgs, ProjectArgs};
use crate::config::{self, Credentials};
use crate::effects::EffectRunner;
use crate::progress::Console;

/// Feed messages through the state machine until no effect produces a new
/// one. Returns the final state.
pub fn run_batch<W: Write>(
    mode: RunMode,
    urls: Vec<String>,
    runner: &mut EffectRunner<W>,
) -> AppState {
    let mut inbox = VecDeque::from([Msg::UrlsSubmitted(urls)]);
    let mut state = AppState::new(mode);

    while let Some(msg) = inbox.pop_front() {
        let (next, effects) = update(state, msg);
        state = next;
        if state.consume_dirty() {
            hippo_debug!("state changed, active job {:?}", state.active_job());
        }
        inbox.extend(effects.into_iter().filter_map(|effect| runner.run(effect)));
    }

    runner.console().summary(&state.view());
    state
}

/// Entry point behind `main`: returns the process exit code.
pub fn run(cli: Cli) -> anyhow::Result<u8> {
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => config::default_path()?,
    };

    match cli.command {
        Command::Config(ref args) => {
            configure(&config_path, args)?;
            Ok(0)
        }
        Command::Run(ref args) | Command::Dir(ref args) | Command::Doc(ref args) => {
            let mode = cli.command.run_mode().unwrap_or_default();
            scrape(&cli.host, &config_path, mode, args)
        }
    }
}

fn configure(path: &Path, args: &ConfigArgs) -> anyhow::Result<()> {
    let mut credentials = config::load(path)?.unwrap_or_default();
    if args.is_empty() {
        credentials = config::prompt(&credentials, &mut io::stdin().lock(), &mut io::stdout())?;
    } else {
        credentials.apply(args);
    }
    let saved = config::save(path, &credentials)?;
    println!("Credentials saved to {}", saved.display());
    Ok(())
}

fn load_or_create_credentials(path: &Path) -> anyhow::Result<Credentials> {
    if let Some(credentials) = config::load(path)? {
        return Ok(credentials);
    }
    println!("No credentials found at {}, let's create them.", path.display());
    let credentials =
        config::prompt(&Credentials::default(), &mut io::stdin().lock(), &mut io::stdout())?;
    config::save(path, &credentials)?;
    Ok(credentials)
}

fn scrape(host: &str, config_path: &Path, mode: RunMode, args: &ProjectArgs) -> anyhow::Result<u8> {
    let credentials = load_or_create_credentials(config_path)?;
    credentials.ensure_complete()?;

    let settings = SessionSettings::with_host(host);
    let resource_host =
        Url::parse(&settings.host).with_context(|| format!("invalid host {host:?}"))?;
    let session = IntranetSession::new(settings, credentials.login())?;

    let mut engine_config = EngineConfig::new(args.output.clone(), resource_host);
    engine_config.write_checker = args.checker;
    let engine = ScrapeEngine::new(Box::new(session), engine_config)
        .with_context(|| format!("cannot use output directory {}", args.output.display()))?;
    hippo_info!(
        "Scraping {} project(s) into {} ({mode:?})",
        args.urls.len(),
        args.output.display()
    );

    let mut runner = EffectRunner::new(engine, credentials.author(), Console::stdout());
    let state = run_batch(mode, args.urls.clone(), &mut runner);
    Ok(u8::try_from(state.exit_code()).unwrap_or(1))
}
