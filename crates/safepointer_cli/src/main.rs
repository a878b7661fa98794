//! CLI driver for the self-destructing entity demo.
//!
//! # Responsibility
//! - Wire config, logging and the demo component together.
//! - Replay scripted trigger presses on the event loop, in virtual or real
//!   time, and print what the callbacks report.

use clap::Parser;
use log::warn;
use safepointer_core::{
    check_for_leaks, default_log_level, init_logging, init_stderr_logging, log_project_info,
    plugin_name, project_info, ComponentError, ConfigError, DemoComponent, DemoConfig,
    DiagnosticSink, EntitySnapshot, EntityStore, EventLoop, LeakEntry, LogSink, MemorySink,
    ProjectInfo, StdoutSink, Trigger,
};
use safepointer_core::walkthrough::scoped_weak_reference;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(
    name = "safepointer",
    version,
    about = "Reads a self-destructing entity through weak (and optionally raw) handles"
)]
struct Cli {
    /// JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Display name of the tracked entity.
    #[arg(long)]
    name: Option<String>,
    /// Exclusive upper bound of the self-destruct delay.
    #[arg(long)]
    max_delay_ms: Option<u64>,
    /// Seed for a reproducible self-destruct delay.
    #[arg(long)]
    seed: Option<u64>,
    /// Times (ms) at which `check` is pressed.
    #[arg(long, value_delimiter = ',', default_values_t = [0u64, 1_000, 2_000, 3_000])]
    check_at: Vec<u64>,
    /// Time (ms) at which `delete object` is pressed.
    #[arg(long)]
    delete_at: Option<u64>,
    /// Times (ms) at which `crash` is pressed. Undefined behavior after deletion.
    #[cfg(feature = "hazard-demo")]
    #[arg(long, value_delimiter = ',')]
    crash_at: Vec<u64>,
    /// Sleep between events instead of running on a virtual clock.
    #[arg(long)]
    realtime: bool,
    /// Print a JSON report instead of plain lines.
    #[arg(long)]
    json: bool,
    /// Run the scoped weak-reference walkthrough before the demo.
    #[arg(long)]
    walkthrough: bool,
    #[arg(long)]
    log_level: Option<String>,
    /// Absolute directory for rolling log files; logs go to stderr otherwise.
    #[arg(long)]
    log_dir: Option<String>,
}

#[derive(Debug)]
enum CliError {
    Logging(String),
    Config(ConfigError),
    Report(serde_json::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(message) => write!(f, "logging init failed: {message}"),
            Self::Config(err) => write!(f, "{err}"),
            Self::Report(err) => write!(f, "failed to encode report: {err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(_) => None,
            Self::Config(err) => Some(err),
            Self::Report(err) => Some(err),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

/// Captures every line and optionally echoes it to stdout.
struct EchoSink {
    memory: MemorySink,
    echo: bool,
}

impl DiagnosticSink for EchoSink {
    fn emit(&self, line: &str) {
        self.memory.emit(line);
        if self.echo {
            StdoutSink.emit(line);
        } else {
            LogSink.emit(line);
        }
    }
}

#[derive(Debug, Serialize)]
struct Report {
    project: ProjectInfo,
    flavour: &'static str,
    delay_ms: u64,
    deadline_ms: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    walkthrough: Vec<String>,
    lines: Vec<String>,
    survivors: Vec<EntitySnapshot>,
    leaks: Vec<LeakEntry>,
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("safepointer: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    init_cli_logging(&cli)?;
    log_project_info();

    let report = execute(&cli)?;
    if cli.json {
        let encoded = serde_json::to_string_pretty(&report).map_err(CliError::Report)?;
        println!("{encoded}");
    }
    Ok(())
}

/// Runs the walkthrough and the demo. With `--json` nothing reaches stdout
/// here; every line ends up in the returned report instead.
fn execute(cli: &Cli) -> Result<Report, CliError> {
    let walkthrough = if cli.walkthrough {
        run_walkthrough(cli.json)
    } else {
        Vec::new()
    };

    let config = load_config(cli)?;
    let mut delays = config.delay_source()?;

    let store = Rc::new(EntityStore::new());
    let event_loop = EventLoop::new();
    let memory = MemorySink::new();
    let sink: Rc<dyn DiagnosticSink> = Rc::new(EchoSink {
        memory: memory.clone(),
        echo: !cli.json,
    });

    let component = Rc::new(DemoComponent::new(
        &store,
        &event_loop,
        delays.as_mut(),
        sink,
        &config,
    ));
    let ticket = component.ticket().clone();
    if !cli.json {
        println!(
            "{} {}: `{}` self-destructs at {} ms",
            plugin_name(),
            project_info().version,
            config.entity_name,
            ticket.deadline_ms
        );
    }

    for at_ms in &cli.check_at {
        schedule_press(&event_loop, &component, Trigger::Check, *at_ms);
    }
    if let Some(at_ms) = cli.delete_at {
        schedule_press(&event_loop, &component, Trigger::DeleteObject, at_ms);
    }
    #[cfg(feature = "hazard-demo")]
    for at_ms in &cli.crash_at {
        schedule_press(&event_loop, &component, Trigger::Crash, *at_ms);
    }

    if cli.realtime {
        drive_realtime(&event_loop);
    } else {
        event_loop.run_to_completion();
    }
    drop(component);

    let survivors = store.snapshot();
    store.clear();
    let leaks = check_for_leaks();

    Ok(Report {
        project: project_info(),
        flavour: plugin_name(),
        delay_ms: ticket.delay_ms,
        deadline_ms: ticket.deadline_ms,
        walkthrough,
        lines: memory.lines(),
        survivors,
        leaks,
    })
}

fn run_walkthrough(json: bool) -> Vec<String> {
    let memory = MemorySink::new();
    let sink = EchoSink {
        memory: memory.clone(),
        echo: !json,
    };
    let leaked_read = scoped_weak_reference(&sink);
    sink.emit(&format!("read after scope reached the sink: {leaked_read}"));
    memory.lines()
}

fn init_cli_logging(cli: &Cli) -> Result<(), CliError> {
    match &cli.log_dir {
        Some(dir) => {
            let level = cli.log_level.as_deref().unwrap_or(default_log_level());
            init_logging(level, dir)
        }
        // Keep stderr quiet by default so stdout stays readable.
        None => init_stderr_logging(cli.log_level.as_deref().unwrap_or("warn")),
    }
    .map_err(CliError::Logging)
}

fn load_config(cli: &Cli) -> Result<DemoConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => DemoConfig::from_json_file(path)?,
        None => DemoConfig::default(),
    };
    if let Some(name) = &cli.name {
        config.entity_name = name.clone();
    }
    if let Some(max_delay_ms) = cli.max_delay_ms {
        config.max_delay_ms = max_delay_ms;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    config.validate()?;
    Ok(config)
}

fn schedule_press(
    event_loop: &EventLoop,
    component: &Rc<DemoComponent>,
    trigger: Trigger,
    at_ms: u64,
) {
    let component = Rc::clone(component);
    event_loop.call_after_delay(at_ms, move || {
        if let Err(err) = component.click(trigger) {
            report_press_error(&err);
        }
    });
}

fn report_press_error(err: &ComponentError) {
    warn!("event=trigger_failed module=cli status=error error={err}");
    eprintln!("safepointer: {err}");
}

fn drive_realtime(event_loop: &EventLoop) {
    while let Some(deadline_ms) = event_loop.next_deadline() {
        let wait_ms = deadline_ms.saturating_sub(event_loop.now_ms());
        if wait_ms > 0 {
            std::thread::sleep(Duration::from_millis(wait_ms));
        }
        event_loop.run_until(deadline_ms);
    }
}
