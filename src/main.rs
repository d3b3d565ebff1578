//! Domain Scout - bounded-concurrency domain availability checking
//!
//! Checks short domain names against an RDAP registry without ever exceeding
//! a fixed number of simultaneous requests, and generates candidate lists
//! worth checking.

use std::path::PathBuf;
use std::process;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use futures::{Stream, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use domain_scout::config::ENV_RDAP_BASE;
use domain_scout::domain::{prepare_keys, qualify, read_key_file};
use domain_scout::generate::{self, CandidateGenerator, ExclusionList, GeneratorConfig};
use domain_scout::rdap::group_by_registry;
use domain_scout::{
    report, BoundedBatchFetcher, FetchConfig, MetricsSnapshot, Outcome, ResultSet, ScoutError,
};

/// Seed for the console sample of generated candidates
const SAMPLE_SEED: u64 = 42;

#[derive(Parser, Debug)]
#[command(name = "domain-scout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check short domain names against RDAP with bounded concurrency")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check domain names given on the command line or in a file
    Check {
        /// Domain names (bare labels get --tld appended)
        #[arg(value_name = "KEYS")]
        keys: Vec<String>,

        /// File with one domain per line (# comments allowed)
        #[arg(short = 'f', long = "file", value_name = "FILE")]
        file: Option<PathBuf>,

        #[arg(long = "tld", default_value = "ai")]
        tld: String,

        #[command(flatten)]
        fetch: FetchArgs,
    },
    /// Check the curated list of meaningful short .ai names
    Targeted {
        #[command(flatten)]
        fetch: FetchArgs,
    },
    /// Check every two-letter name aa..zz
    TwoLetter {
        #[arg(long = "tld", default_value = "ai")]
        tld: String,

        #[command(flatten)]
        fetch: FetchArgs,
    },
    /// Generate candidate name lists (offline)
    Generate(GenerateArgs),
}

/// Flags shared by every command that talks to the registry
#[derive(Args, Debug, Clone)]
struct FetchArgs {
    /// Max requests in flight (overrides SCOUT_CONCURRENCY)
    #[arg(short = 'c', long = "concurrency", help_heading = "Fetching")]
    concurrency: Option<usize>,

    /// Per-request timeout in seconds (overrides SCOUT_TIMEOUT_SECS)
    #[arg(short = 't', long = "timeout", value_name = "SECS", help_heading = "Fetching")]
    timeout: Option<f64>,

    /// RDAP base URL the domain is appended to (overrides SCOUT_RDAP_BASE)
    #[arg(long = "base-url", value_name = "URL", help_heading = "Fetching")]
    base_url: Option<String>,

    /// Delay before each request, in milliseconds (overrides SCOUT_PACING_MS)
    #[arg(long = "pacing-ms", value_name = "MS", help_heading = "Fetching")]
    pacing_ms: Option<u64>,

    /// Total passes; later passes recheck domains left unknown
    #[arg(
        long = "passes",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..),
        help_heading = "Fetching"
    )]
    passes: u32,

    /// Write `domain,available` CSV
    #[arg(long = "csv", value_name = "FILE", help_heading = "Output")]
    csv: Option<PathBuf>,

    /// Write a sectioned text report
    #[arg(long = "report", value_name = "FILE", help_heading = "Output")]
    report: Option<PathBuf>,

    /// Write every record as JSON
    #[arg(long = "json", value_name = "FILE", help_heading = "Output")]
    json: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(long = "no-progress", help_heading = "Output")]
    no_progress: bool,
}

impl FetchArgs {
    /// Environment configuration with command-line overrides applied
    fn to_config(&self) -> anyhow::Result<FetchConfig> {
        let mut config = FetchConfig::from_env()?;

        if let Some(concurrency) = self.concurrency {
            config = config.with_concurrency(concurrency);
        }
        if let Some(secs) = self.timeout {
            let timeout = Duration::try_from_secs_f64(secs)
                .with_context(|| format!("invalid --timeout {secs}"))?;
            config = config.with_timeout(timeout);
        }
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.clone());
        }
        if let Some(ms) = self.pacing_ms {
            config = config.with_pacing(Duration::from_millis(ms));
        }

        config.validate()?;
        Ok(config)
    }

    /// Base URL set by `--base-url` or `SCOUT_RDAP_BASE`
    fn has_explicit_base(&self) -> bool {
        self.base_url.is_some()
            || std::env::var(ENV_RDAP_BASE).is_ok_and(|v| !v.trim().is_empty())
    }
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Maximum number of candidates to keep
    #[arg(long = "limit", default_value_t = 5000)]
    limit: usize,

    /// Letter that marks a candidate as priority
    #[arg(long = "seed-letter", default_value_t = 'j')]
    seed_letter: char,

    /// Directory for the candidate files
    #[arg(long = "out-dir", default_value = ".")]
    out_dir: PathBuf,

    #[arg(long = "tld", default_value = "ai")]
    tld: String,

    /// Number of candidates to print as a sample
    #[arg(long = "sample", default_value_t = 100)]
    sample: usize,

    /// Extra words to exclude (comma-separated)
    #[arg(long = "exclude", value_delimiter = ',')]
    exclude: Vec<String>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = domain_scout::init() {
        eprintln!("❌ Failed to initialize: {}", e);
        process::exit(1);
    }
    init_logging();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command).await {
        match e.downcast_ref::<ScoutError>() {
            Some(scout) => eprintln!("{}", scout.user_message()),
            None => eprintln!("❌ Error: {:#}", e),
        }
        process::exit(1);
    }
}

async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Check {
            keys,
            file,
            tld,
            fetch,
        } => {
            let mut domains: Vec<String> = keys.iter().map(|k| qualify(k, &tld)).collect();
            if let Some(path) = &file {
                domains.extend(read_key_file(path, &tld)?);
            }
            if domains.is_empty() {
                return Err(ScoutError::cli("no domains to check: pass names or --file").into());
            }
            run_batch(domains, &fetch).await
        }
        Command::Targeted { fetch } => run_batch(generate::targeted(), &fetch).await,
        Command::TwoLetter { tld, fetch } => run_batch(generate::two_letter(&tld), &fetch).await,
        Command::Generate(args) => run_generate(&args),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("domain_scout=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Check `domains`, recheck unknowns for the remaining passes, then report
async fn run_batch(domains: Vec<String>, args: &FetchArgs) -> anyhow::Result<()> {
    let config = args.to_config()?;
    let concurrency = config.concurrency;
    let (domains, duplicates) = prepare_keys(domains)?;
    if duplicates > 0 {
        println!("ℹ️  Skipping {duplicates} duplicate domain(s)");
    }
    let total = domains.len();
    let batches = plan_batches(config, args.has_explicit_base(), domains)?;

    let token = CancellationToken::new();
    tokio::spawn(handle_interrupts(ctrl_c_signals(), token.clone(), || {
        eprintln!("❌ Aborted");
        process::exit(130);
    }));

    println!("🔍 Checking {total} domain(s), {concurrency} at a time...");
    println!("═══════════════════════════════════");

    let show_progress = !args.no_progress;
    let check_start = Instant::now();
    let mut results = ResultSet::default();
    let mut snapshots = Vec::new();

    for (config, keys) in batches {
        println!("🌐 {} ({} domain(s))", config.base_url, keys.len());
        let fetcher = BoundedBatchFetcher::new(config)?.with_cancellation(token.clone());
        let group = check_with_passes(&fetcher, keys, args.passes, &token, show_progress).await?;
        snapshots.push(fetcher.get_metrics_snapshot());
        results = results.merge(group);
    }
    let check_duration = check_start.elapsed();

    if token.is_cancelled() {
        println!("⏸️  Interrupted: partial results below");
    }
    print_summary(&results, check_duration, &snapshots, concurrency);
    write_sinks(&results, args)?;

    Ok(())
}

/// Pair keys with the registry that serves them.
///
/// An explicit base URL takes every key; otherwise each key goes to the
/// registry for its own TLD, and a TLD without one fails the whole run.
fn plan_batches(
    config: FetchConfig,
    explicit_base: bool,
    domains: Vec<String>,
) -> domain_scout::Result<Vec<(FetchConfig, Vec<String>)>> {
    if explicit_base {
        return Ok(vec![(config, domains)]);
    }

    Ok(group_by_registry(domains)?
        .into_iter()
        .map(|(base, keys)| (config.clone().with_base_url(base), keys))
        .collect())
}

/// First pass plus rechecks of whatever is still unknown
async fn check_with_passes(
    fetcher: &BoundedBatchFetcher,
    keys: Vec<String>,
    passes: u32,
    token: &CancellationToken,
    show_progress: bool,
) -> anyhow::Result<ResultSet> {
    let batch_start = Instant::now();
    let mut results = check_pass(fetcher, keys, show_progress).await?;

    for pass in 2..=passes {
        let retry = results.unknown_keys();
        if retry.is_empty() || token.is_cancelled() {
            break;
        }
        println!("🔁 Pass {pass}: rechecking {} unknown domain(s)", retry.len());
        let rechecked = check_pass(fetcher, retry, show_progress).await?;
        results = results.merge(rechecked);
    }

    fetcher
        .get_metrics()
        .record_batch(results.summary(), batch_start.elapsed());
    Ok(results)
}

/// Cancel the batch on the first interrupt, call `abort` on the second
async fn handle_interrupts<S, A>(mut signals: S, token: CancellationToken, abort: A)
where
    S: Stream<Item = ()> + Unpin,
    A: FnOnce(),
{
    if signals.next().await.is_none() {
        return;
    }
    tracing::warn!("Interrupted, letting in-flight requests finish (Ctrl-C again to abort)");
    token.cancel();

    if signals.next().await.is_some() {
        abort();
    }
}

fn ctrl_c_signals() -> impl Stream<Item = ()> + Send + Unpin {
    Box::pin(futures::stream::unfold((), |()| async {
        tokio::signal::ctrl_c().await.ok().map(|()| ((), ()))
    }))
}

/// One pass over `domains`, printing available ones as they arrive
async fn check_pass(
    fetcher: &BoundedBatchFetcher,
    domains: Vec<String>,
    show_progress: bool,
) -> anyhow::Result<ResultSet> {
    let bar = if show_progress {
        let bar = ProgressBar::new(domains.len() as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            )?
            .progress_chars("#>-"),
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    let mut stream = fetcher.fetch_stream(domains)?;
    let mut records = Vec::new();
    while let Some(record) = stream.next().await {
        if record.outcome == Outcome::Available {
            let line = format!("[AVAILABLE] {}", record.key);
            if show_progress {
                bar.println(line);
            } else {
                println!("{line}");
            }
        }
        bar.set_message(record.key.clone());
        bar.inc(1);
        records.push(record);
    }
    bar.finish_and_clear();

    Ok(records.into_iter().collect())
}

fn print_summary(
    results: &ResultSet,
    duration: Duration,
    snapshots: &[MetricsSnapshot],
    concurrency: usize,
) {
    let summary = results.summary();
    let available = results.available();
    let metrics = snapshots.iter().fold(
        MetricsSnapshot {
            domains_checked: 0,
            errors_encountered: 0,
            total_check_time_ms: 0,
            peak_in_flight: 0,
            last_batch: None,
        },
        |acc, m| MetricsSnapshot {
            domains_checked: acc.domains_checked + m.domains_checked,
            errors_encountered: acc.errors_encountered + m.errors_encountered,
            total_check_time_ms: acc.total_check_time_ms + m.total_check_time_ms,
            peak_in_flight: acc.peak_in_flight.max(m.peak_in_flight),
            last_batch: None,
        },
    );

    println!();
    if !available.is_empty() {
        println!("🎉 Available Domains ({}):", available.len());
        println!("─────────────────────────");
        for domain in &available {
            println!("✅ {domain}");
        }
        println!();
    }

    let unknown: Vec<_> = results.with_outcome(Outcome::Unknown).collect();
    if !unknown.is_empty() {
        println!("⚠️  Checking Issues ({}):", unknown.len());
        println!("───────────────────────");
        for record in unknown {
            let kind = record.failure.map(|k| k.to_string()).unwrap_or_default();
            println!("⚠️  {} - {}", record.key, kind);
        }
        println!();
    }

    println!("📈 Summary:");
    println!("   ✅ Available: {}", summary.available);
    println!("   ❌ Taken: {}", summary.taken);
    if summary.unknown > 0 {
        println!("   ⚠️  Unknown: {}", summary.unknown);
    }
    if summary.not_attempted > 0 {
        println!("   ⏸️  Not attempted: {}", summary.not_attempted);
    }
    println!("   📊 Total: {}", summary.total);
    println!("   ⏱️  Total time: {:.2}s", duration.as_secs_f32());
    if metrics.domains_checked + metrics.errors_encountered > 0 {
        println!("   📊 Average check time: {:.1}ms", metrics.avg_check_time_ms());
    }
    println!("   🚦 Peak in flight: {}/{}", metrics.peak_in_flight, concurrency);
}

fn write_sinks(results: &ResultSet, args: &FetchArgs) -> anyhow::Result<()> {
    if let Some(path) = &args.csv {
        report::write_csv(path, results)?;
        println!("💾 CSV saved to: {}", path.display());
    }
    if let Some(path) = &args.report {
        report::write_text_report(path, results)?;
        println!("💾 Report saved to: {}", path.display());
    }
    if let Some(path) = &args.json {
        report::write_json(path, results)?;
        println!("💾 JSON saved to: {}", path.display());
    }
    Ok(())
}

fn run_generate(args: &GenerateArgs) -> anyhow::Result<()> {
    if !args.seed_letter.is_ascii_lowercase() {
        return Err(ScoutError::cli(format!(
            "--seed-letter must be a lowercase letter, got '{}'",
            args.seed_letter
        ))
        .into());
    }

    let generator = CandidateGenerator::new(GeneratorConfig {
        seed_letter: args.seed_letter,
        limit: args.limit,
        exclusions: ExclusionList::builtin().with_words(&args.exclude),
        ..Default::default()
    });

    println!("📝 Generating candidate names...");
    let set = generator.generate();
    println!("   Priority: {}", set.priority.len());
    println!("   Regular: {}", set.regular.len());

    let candidates = set.ranked(args.limit);
    let (bare, qualified) = report::write_candidates(&args.out_dir, &candidates, &args.tld)?;

    println!("✅ Saved {} candidates", candidates.len());
    println!("   {}", bare.display());
    println!("   {}", qualified.display());

    if args.sample > 0 && !candidates.is_empty() {
        let picked = generate::sample(&candidates, args.sample, SAMPLE_SEED);
        println!();
        println!("🎲 Sample ({}):", picked.len());
        for row in picked.chunks(10) {
            println!("   {}", row.join("  "));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use domain_scout::rdap::DEFAULT_RDAP_BASE;
    use futures::stream;

    fn domains(list: &[&str]) -> Vec<String> {
        list.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn test_plan_routes_keys_to_their_registry() {
        let batches = plan_batches(
            FetchConfig::default().with_concurrency(4),
            false,
            domains(&["jax.ai", "example.com", "lab.io"]),
        )
        .unwrap();

        assert_eq!(batches.len(), 2);
        let (ai, ai_keys) = &batches[0];
        assert_eq!(ai.base_url, DEFAULT_RDAP_BASE);
        assert_eq!(ai_keys, &domains(&["jax.ai", "lab.io"]));

        let (com, com_keys) = &batches[1];
        assert_eq!(com.base_url, "https://rdap.verisign.com/com/v1/domain/");
        assert_eq!(com_keys, &domains(&["example.com"]));
        assert_eq!(com.concurrency, 4);
    }

    #[test]
    fn test_plan_rejects_tld_without_registry() {
        let err = plan_batches(FetchConfig::default(), false, domains(&["foo.zz"])).unwrap_err();
        assert!(matches!(err, ScoutError::Config { .. }));
    }

    #[test]
    fn test_plan_with_explicit_base_keeps_one_batch() {
        let config = FetchConfig::default().with_base_url("http://127.0.0.1:9/rdap/domain/");
        let batches =
            plan_batches(config.clone(), true, domains(&["foo.zz", "example.com"])).unwrap();

        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].0, config);
        assert_eq!(batches[0].1, domains(&["foo.zz", "example.com"]));
    }

    #[test]
    fn test_passes_must_be_positive() {
        assert!(Cli::try_parse_from(["domain-scout", "check", "ab", "--passes", "0"]).is_err());
        assert!(Cli::try_parse_from(["domain-scout", "check", "ab", "--passes", "3"]).is_ok());
    }

    #[tokio::test]
    async fn test_first_interrupt_cancels() {
        let token = CancellationToken::new();
        let aborted = AtomicBool::new(false);

        handle_interrupts(stream::iter([()]), token.clone(), || {
            aborted.store(true, Ordering::SeqCst)
        })
        .await;

        assert!(token.is_cancelled());
        assert!(!aborted.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_second_interrupt_aborts() {
        let token = CancellationToken::new();
        let aborted = AtomicBool::new(false);

        handle_interrupts(stream::iter([(), ()]), token.clone(), || {
            aborted.store(true, Ordering::SeqCst)
        })
        .await;

        assert!(token.is_cancelled());
        assert!(aborted.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_no_interrupt_leaves_batch_running() {
        let token = CancellationToken::new();
        handle_interrupts(stream::empty::<()>(), token.clone(), || {}).await;
        assert!(!token.is_cancelled());
    }
}
