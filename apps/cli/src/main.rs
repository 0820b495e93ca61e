use std::{
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
    process::ExitCode,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use sessionize_core::{
    Event, GAP_THRESHOLD_ENV, GenerateConfig, Session, SessionConfig, Sessionizer, benchmark,
    generate_events, load_events, parse_events_str, save_events,
};

use crate::format::{format_count, format_duration, format_megabytes, format_session_line};

mod demo;
mod format;

#[derive(Parser)]
#[command(name = "sessionize")]
#[command(about = "Merge timestamped user events into gap-bounded sessions")]
struct Cli {
    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Merge an events JSON array into sessions
    Merge {
        /// Events file; reads stdin when omitted or "-"
        input: Option<PathBuf>,

        /// Write sessions JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print one summary line per session instead of JSON
        #[arg(long)]
        summary: bool,

        #[command(flatten)]
        gap: GapArgs,
    },

    /// Generate a synthetic events dataset
    Generate {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Output file
        #[arg(short, long, default_value = "test_data.json")]
        output: PathBuf,
    },

    /// Time repeated merges over a dataset
    Bench {
        /// Dataset to load
        #[arg(short, long, default_value = "test_data.json")]
        input: PathBuf,

        /// Generate fresh data (and save it to --input) before benchmarking
        #[arg(long)]
        generate: bool,

        #[command(flatten)]
        dataset: DatasetArgs,

        /// Untimed runs before measuring
        #[arg(long, default_value_t = 1)]
        warmup: usize,

        /// Number of timed runs
        #[arg(long, default_value_t = 5)]
        runs: usize,

        #[command(flatten)]
        gap: GapArgs,
    },

    /// Run and print the example scenarios
    Demo,
}

#[derive(Args)]
struct GapArgs {
    /// Maximum gap inside a session (default: $SESSIONIZE_GAP_THRESHOLD or 600)
    #[arg(long = "gap")]
    gap_threshold: Option<i64>,
}

impl GapArgs {
    fn config(&self) -> Result<SessionConfig> {
        match self.gap_threshold {
            Some(gap_threshold) => SessionConfig::new(gap_threshold).context("invalid --gap"),
            None => SessionConfig::from_env()
                .with_context(|| format!("invalid {}", GAP_THRESHOLD_ENV)),
        }
    }
}

#[derive(Args)]
struct DatasetArgs {
    /// Number of users
    #[arg(long, default_value_t = 50)]
    users: usize,

    /// Average events per user
    #[arg(long, default_value_t = 200)]
    events: usize,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

impl From<&DatasetArgs> for GenerateConfig {
    fn from(args: &DatasetArgs) -> Self {
        GenerateConfig {
            num_users: args.users,
            events_per_user: args.events,
            seed: args.seed,
        }
    }
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.cyan} {msg}")
    {
        pb.set_style(spinner_style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("SESSIONIZE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.quiet, cli.verbose) {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        return ExitCode::FAILURE;
    }

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", style("Error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<ExitCode> {
    match command {
        Command::Merge {
            input,
            output,
            summary,
            gap,
        } => merge(input.as_deref(), output.as_deref(), summary, gap.config()?),
        Command::Generate { dataset, output } => generate(&dataset, &output),
        Command::Bench {
            input,
            generate: regenerate,
            dataset,
            warmup,
            runs,
            gap,
        } => bench(&input, regenerate, &dataset, warmup, runs, gap.config()?),
        Command::Demo => {
            if demo::run_demo()? {
                println!("{} All scenarios passed", style("✓").green().bold());
                Ok(ExitCode::SUCCESS)
            } else {
                println!("{} Some scenarios failed", style("✗").red().bold());
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read events from stdin")?;
            Ok(buf)
        }
    }
}

fn merge(
    input: Option<&Path>,
    output: Option<&Path>,
    summary: bool,
    config: SessionConfig,
) -> Result<ExitCode> {
    let raw = read_input(input)?;
    let events = parse_events_str(&raw).context("invalid events input")?;
    let sessions = Sessionizer::new(config).merge(&events)?;
    info!(
        events = events.len(),
        sessions = sessions.len(),
        gap_threshold = config.gap_threshold,
        "merged events"
    );

    let rendered = if summary {
        let mut lines: Vec<String> = sessions.iter().map(format_session_line).collect();
        lines.push(String::new());
        lines.join("\n")
    } else {
        let mut json = serde_json::to_string_pretty(&sessions)?;
        json.push('\n');
        json
    };

    match output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!(
                "{} {} sessions from {} events → {}",
                style("✓").green().bold(),
                format_count(sessions.len() as u64),
                format_count(events.len() as u64),
                style(path.display()).cyan()
            );
        }
        None => {
            io::stdout()
                .lock()
                .write_all(rendered.as_bytes())
                .context("failed to write sessions to stdout")?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn generate(dataset: &DatasetArgs, output: &Path) -> Result<ExitCode> {
    let spinner = create_spinner(&format!(
        "Generating {} users × ~{} events each...",
        dataset.users, dataset.events
    ));
    let start = Instant::now();
    let events = generate_events(&dataset.into());
    let gen_time = start.elapsed();

    save_events(&events, output).with_context(|| format!("failed to write {}", output.display()))?;
    let file_size = fs::metadata(output).map(|m| m.len()).unwrap_or(0);

    spinner.finish_with_message(format!(
        "{} Generated {} events {}",
        style("✓").green().bold(),
        format_count(events.len() as u64),
        style(format!("[{}]", format_duration(gen_time))).dim()
    ));
    println!("   Users:  {}", format_count(dataset.users as u64));
    println!(
        "   Output: {} ({})",
        style(output.display()).cyan(),
        format_megabytes(file_size)
    );

    Ok(ExitCode::SUCCESS)
}

fn bench(
    input: &Path,
    regenerate: bool,
    dataset: &DatasetArgs,
    warmup: usize,
    runs: usize,
    config: SessionConfig,
) -> Result<ExitCode> {
    println!(
        "\n{}  {}\n",
        style("sessionize").cyan().bold(),
        style("Benchmark").dim()
    );

    let events = if regenerate || !input.exists() {
        let spinner = create_spinner(&format!(
            "Generating data: {} users × {} events...",
            dataset.users, dataset.events
        ));
        let events = generate_events(&dataset.into());
        save_events(&events, input)
            .with_context(|| format!("failed to write {}", input.display()))?;
        spinner.finish_with_message(format!(
            "{} Generated data, saved to {}",
            style("✓").green().bold(),
            style(input.display()).cyan()
        ));
        events
    } else {
        let spinner = create_spinner(&format!("Loading data from {}...", input.display()));
        let events =
            load_events(input).with_context(|| format!("failed to load {}", input.display()))?;
        spinner.finish_with_message(format!(
            "{} Loaded {}",
            style("✓").green().bold(),
            style(input.display()).cyan()
        ));
        events
    };

    let mut users: Vec<&str> = events.iter().map(|e| e.user_id.as_str()).collect();
    users.sort_unstable();
    users.dedup();
    println!("   Total events: {}", format_count(events.len() as u64));
    println!("   Unique users: {}", format_count(users.len() as u64));

    let spinner = create_spinner(&format!("Benchmarking ({} runs)...", runs.max(1)));
    let stats = benchmark(&events, &config, warmup, runs)?;
    spinner.finish_with_message(format!("{} Benchmark complete", style("✓").green().bold()));
    debug!(?stats, "benchmark finished");

    println!("{}", style("─".repeat(40)).dim());
    println!("  Input events:    {}", format_count(stats.events as u64));
    println!("  Output sessions: {}", format_count(stats.sessions as u64));
    println!("  Avg time:        {:.2} ms", stats.avg_ms);
    println!("  Min time:        {:.2} ms", stats.min_ms);
    println!("  Max time:        {:.2} ms", stats.max_ms);
    println!(
        "  Throughput:      {} events/sec",
        format_count(stats.throughput().round() as u64)
    );
    println!("{}", style("─".repeat(40)).dim());

    let sessions = Sessionizer::new(config).merge(&events)?;
    let sorted = sessions.windows(2).all(|w| w[0].start_ts <= w[1].start_ts);
    let covered = sessions_cover_events(&sessions, &events);
    println!("  Sorted by start_ts: {}", check_mark(sorted));
    println!("  Every event covered: {}", check_mark(covered));
    println!();

    Ok(if sorted && covered {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Each event falls inside exactly one of its user's session spans.
fn sessions_cover_events(sessions: &[Session], events: &[Event]) -> bool {
    let mut spans: Vec<(&str, i64, i64)> = sessions
        .iter()
        .map(|s| (s.user_id.as_str(), s.start_ts, s.end_ts))
        .collect();
    spans.sort_unstable();

    events.iter().all(|event| {
        let user = event.user_id.as_str();
        let first = spans.partition_point(|&(u, _, _)| u < user);
        spans[first..]
            .iter()
            .take_while(|&&(u, _, _)| u == user)
            .filter(|&&(_, start, end)| (start..=end).contains(&event.ts))
            .count()
            == 1
    })
}

fn check_mark(ok: bool) -> console::StyledObject<&'static str> {
    if ok {
        style("✓").green().bold()
    } else {
        style("✗").red().bold()
    }
}
