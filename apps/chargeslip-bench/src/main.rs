use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chargeslip-bench")]
#[command(about = "Synthetic charge-engine benchmark for Chargeslip (dev)")]
struct Args {
    /// Synthetic trades per category (default: 200_000).
    #[arg(long, default_value_t = 200_000)]
    iterations: usize,

    /// Print a single JSON line instead of human output.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Prometheus metrics listen addr (e.g. 127.0.0.1:9898). Optional.
    #[arg(long)]
    metrics_addr: Option<String>,

    /// Write a CPU profile as an SVG flamegraph to this path (requires feature `pprof`).
    #[arg(long)]
    profile_svg: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    if let Err(err) = init_tracing() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
    if let Err(err) = init_metrics(args.metrics_addr.as_deref()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }

    if let Err(err) = run_bench(args.iterations, args.json, args.profile_svg) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() -> Result<(), String> {
    let filter = std::env::var("CHARGESLIP_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(filter)
        .map_err(|err| format!("invalid log filter: {err}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[cfg(feature = "prometheus")]
fn init_metrics(metrics_addr: Option<&str>) -> Result<Option<SocketAddr>, String> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let Some(raw) = metrics_addr else {
        return Ok(None);
    };
    let addr: SocketAddr = raw
        .parse()
        .map_err(|err| format!("invalid --metrics-addr (expected host:port): {err}"))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|err| format!("failed to install prometheus exporter: {err}"))?;

    tracing::info!(metrics_addr = %addr, "prometheus metrics exporter enabled");
    Ok(Some(addr))
}

#[cfg(not(feature = "prometheus"))]
fn init_metrics(metrics_addr: Option<&str>) -> Result<Option<SocketAddr>, String> {
    if metrics_addr.is_some() {
        return Err("metrics exporter requires chargeslip-bench feature `prometheus`".to_string());
    }
    Ok(None)
}

fn run_bench(iterations: usize, json: bool, profile_svg: Option<PathBuf>) -> Result<(), String> {
    #[cfg(feature = "pprof")]
    let guard = if let Some(path) = &profile_svg {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|err| format!("failed to create dir {}: {err}", parent.display()))?;
        }
        Some(
            pprof::ProfilerGuard::new(100)
                .map_err(|err| format!("failed to start profiler: {err}"))?,
        )
    } else {
        None
    };

    #[cfg(not(feature = "pprof"))]
    if profile_svg.is_some() {
        return Err("profiling requires chargeslip-bench feature `pprof`".to_string());
    }

    let bench = chargeslip_application::benchmarking::run_bench(iterations)?;

    metrics::histogram!("chargeslip.bench.elapsed_ms").record(bench.elapsed_ms as f64);
    metrics::gauge!("chargeslip.bench.calls_per_sec").set(bench.calls_per_sec);
    metrics::gauge!("chargeslip.bench.calls").set(bench.calls as f64);

    #[cfg(feature = "pprof")]
    if let (Some(guard), Some(path)) = (guard, &profile_svg) {
        let report = guard
            .report()
            .build()
            .map_err(|err| format!("failed to build profile report: {err}"))?;
        let file = std::fs::File::create(path)
            .map_err(|err| format!("failed to create {}: {err}", path.display()))?;
        report
            .flamegraph(file)
            .map_err(|err| format!("failed to write flamegraph: {err}"))?;
        tracing::info!(profile_svg = %path.display(), "wrote cpu profile flamegraph");
    }

    if json {
        let line = serde_json::json!({
            "iterations": bench.iterations,
            "calls": bench.calls,
            "elapsed_ms": bench.elapsed_ms as u64,
            "calls_per_sec": bench.calls_per_sec,
            "checksum": bench.checksum,
        });
        println!("{}", line);
    } else {
        println!(
            "bench: iterations={} calls={} elapsed_ms={} calls_per_sec={:.2}",
            bench.iterations, bench.calls, bench.elapsed_ms, bench.calls_per_sec
        );
        println!("bench: checksum={:.4}", bench.checksum);
    }

    Ok(())
}
