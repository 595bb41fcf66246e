//! procscope - samples `/proc` for a set of processes.
//!
//! Prints host CPU and memory counters followed by one record per requested
//! PID, either as text or as one JSON document per round.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use procscope::collector::{Collector, LoopbackPolicy, ProcParser, RealFs, Snapshot};
use procscope::config::{DEFAULT_PROC_PATH, HostConfig};

/// Samples per-process and host statistics from /proc.
#[derive(Parser)]
#[command(name = "procscope", about = "Samples process statistics from /proc", version)]
struct Args {
    /// Process IDs to sample.
    #[arg(required = true, value_name = "PID")]
    pids: Vec<u32>,

    /// Sampling interval in seconds.
    #[arg(short, long, default_value = "1")]
    interval: u64,

    /// Number of rounds to take. 0 samples until interrupted.
    #[arg(short, long, default_value = "1")]
    count: u64,

    /// Print one JSON document per round instead of text.
    #[arg(long)]
    json: bool,

    /// Path to the proc filesystem (e.g. a host /proc mounted into a container).
    #[arg(long, env = "PROCSCOPE_PROC_PATH", default_value = DEFAULT_PROC_PATH)]
    proc_path: PathBuf,

    /// Count the "lo" interface in network totals.
    #[arg(long)]
    include_loopback: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is warn level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Initializes the tracing subscriber on stderr.
/// RUST_LOG directives are applied on top of the level chosen by flags.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::ERROR
    } else {
        match verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Formats bytes as human-readable size string.
fn format_size(bytes: u64) -> String {
    const GB: u64 = 1024 * 1024 * 1024;
    const MB: u64 = 1024 * 1024;
    const KB: u64 = 1024;

    if bytes >= GB {
        format!("{:.1}G", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1}M", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1}K", bytes as f64 / KB as f64)
    } else {
        format!("{}B", bytes)
    }
}

fn ns_to_secs(ns: u64) -> f64 {
    ns as f64 / 1_000_000_000.0
}

fn print_text(snapshot: &Snapshot) {
    if let Some(system) = &snapshot.system {
        println!(
            "host: cpu user {:.2}s sys {:.2}s | mem total {} free {} avail {} buffers {} cached {}",
            ns_to_secs(system.cpu_utime_ns),
            ns_to_secs(system.cpu_ktime_ns),
            format_size(system.mem_total_bytes),
            format_size(system.mem_free_bytes),
            format_size(system.mem_available_bytes),
            format_size(system.mem_buffer_bytes),
            format_size(system.mem_cached_bytes),
        );
    }

    for sample in &snapshot.processes {
        let stats = &sample.stats;
        println!(
            "{:>7} {:<16} user {:.2}s sys {:.2}s thr {} rss {} vsz {} flt {}/{} io r {} w {}",
            sample.pid,
            stats.process_name,
            ns_to_secs(stats.utime_ns),
            ns_to_secs(stats.ktime_ns),
            stats.num_threads,
            format_size(stats.rss_bytes),
            format_size(stats.vsize_bytes),
            stats.major_faults,
            stats.minor_faults,
            format_size(stats.read_bytes),
            format_size(stats.write_bytes),
        );
        if let Some(net) = &sample.network {
            println!(
                "        net rx {} ({} pkts) tx {} ({} pkts)",
                format_size(net.rx_bytes),
                net.rx_packets,
                format_size(net.tx_bytes),
                net.tx_packets,
            );
        }
        if !sample.cmdline.is_empty() {
            println!("        {}", sample.cmdline);
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    let config = match HostConfig::detect() {
        Ok(config) => config.with_proc_path(args.proc_path.clone()),
        Err(e) => {
            error!("Failed to read host configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let loopback = if args.include_loopback {
        LoopbackPolicy::Include
    } else {
        LoopbackPolicy::Exclude
    };

    let parser = match ProcParser::new(RealFs::new(), config) {
        Ok(parser) => parser.with_loopback_policy(loopback),
        Err(e) => {
            error!("Failed to create parser: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(
        "procscope {} sampling {} pids from {}",
        env!("CARGO_PKG_VERSION"),
        args.pids.len(),
        args.proc_path.display()
    );

    let mut collector = Collector::new(parser);
    let interval = Duration::from_secs(args.interval);

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    }) {
        warn!("Failed to set Ctrl-C handler: {}", e);
    }

    let mut round: u64 = 0;
    while running.load(Ordering::SeqCst) {
        let snapshot = collector.collect_snapshot(&args.pids);
        round += 1;

        if let Some(timing) = collector.last_timing() {
            debug!(
                "Round #{}: system {:?}, processes {:?}, total {:?}",
                round, timing.system, timing.processes, timing.total
            );
        }

        if args.json {
            match serde_json::to_string(&snapshot) {
                Ok(line) => println!("{}", line),
                Err(e) => error!("Failed to serialize snapshot: {}", e),
            }
        } else {
            print_text(&snapshot);
        }

        if snapshot.processes.is_empty() {
            warn!("None of the requested processes could be sampled");
        }

        if args.count != 0 && round >= args.count {
            break;
        }

        // Sleep with periodic checks for shutdown signal
        let sleep_interval = Duration::from_millis(100);
        let mut remaining = interval;
        while remaining > Duration::ZERO && running.load(Ordering::SeqCst) {
            let sleep_time = remaining.min(sleep_interval);
            std::thread::sleep(sleep_time);
            remaining = remaining.saturating_sub(sleep_time);
        }
    }

    ExitCode::SUCCESS
}
