use chargeslip::headless::{HeadlessArgs, OutputFormat};
use chargeslip::{bootstrap, logging, TuiOpts};
use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chargeslip")]
#[command(about = "Brokerage and statutory charge calculator (TUI + headless).", version)]
struct Cli {
    /// Print a quote and exit instead of starting the TUI.
    #[arg(long)]
    headless: bool,

    /// Instrument category, e.g. intraday_equity, currency_options, comm_fut.
    #[arg(long)]
    category: Option<String>,

    /// Quote every category for the same numbers (headless only).
    #[arg(long)]
    all: bool,

    /// Buy price.
    #[arg(long, default_value = "")]
    buy: String,

    /// Sell price.
    #[arg(long, default_value = "")]
    sell: String,

    /// Quantity (units, or lots for commodity).
    #[arg(long, conflicts_with = "amount")]
    qty: Option<String>,

    /// Capital to deploy; quantity becomes floor(amount / buy).
    #[arg(long)]
    amount: Option<String>,

    /// Equity venue: nse | bse.
    #[arg(long)]
    venue: Option<String>,

    /// MCX contract symbol, e.g. GOLD, CRUDEOIL.
    #[arg(long)]
    commodity: Option<String>,

    /// Option strike price (currency/commodity options).
    #[arg(long)]
    strike: Option<String>,

    /// Headless output format.
    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Config file path (TOML). If omitted, uses env CHARGESLIP_CONFIG.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Snapshot file path (overrides config and CHARGESLIP_STATE_HOME).
    #[arg(long)]
    state: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Format {
    Json,
    Csv,
    Table,
}

fn main() {
    let cli = Cli::parse();

    let log_store = logging::LogStore::shared(5000);
    if let Err(err) = init_tracing(cli.headless, log_store.clone()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
    if let Err(err) = init_metrics() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }

    let config_path = bootstrap::resolve_config_path(cli.config);
    let config = match bootstrap::load_startup_config(config_path.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    if cli.headless {
        let format = match cli.format {
            Format::Json => OutputFormat::Json,
            Format::Csv => OutputFormat::Csv,
            Format::Table => OutputFormat::Table,
        };
        let args = HeadlessArgs {
            category: cli.category,
            all: cli.all,
            buy: cli.buy,
            sell: cli.sell,
            qty: cli.qty,
            amount: cli.amount,
            venue: cli.venue,
            commodity: cli.commodity,
            strike: cli.strike,
        };
        match chargeslip::headless::run_headless(&args, &config, format) {
            Ok(out) => {
                print!("{out}");
                if !out.ends_with('\n') {
                    println!();
                }
                std::process::exit(0);
            }
            Err(err) => {
                eprintln!("error: {err}");
                std::process::exit(1);
            }
        }
    }

    let opts = TuiOpts {
        config,
        state_path: cli.state,
        log_store,
    };

    if let Err(err) = chargeslip::run(opts) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(headless: bool, log_store: logging::SharedLogStore) -> Result<(), String> {
    let filter = std::env::var("CHARGESLIP_LOG").unwrap_or_else(|_| {
        if headless {
            "warn".to_string()
        } else {
            "info".to_string()
        }
    });
    let env_filter = tracing_subscriber::EnvFilter::try_new(filter)
        .map_err(|err| format!("invalid log filter: {err}"))?;

    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);
    if headless {
        builder.with_writer(std::io::stderr).init();
    } else {
        builder
            .with_writer(logging::LogMakeWriter::new(log_store))
            .with_ansi(false)
            .init();
    }

    Ok(())
}

#[cfg(feature = "prometheus")]
fn init_metrics() -> Result<Option<SocketAddr>, String> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let Some(raw) = std::env::var("CHARGESLIP_METRICS_ADDR").ok() else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }

    let addr: SocketAddr = raw
        .parse()
        .map_err(|err| format!("invalid CHARGESLIP_METRICS_ADDR (expected host:port): {err}"))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|err| format!("failed to install prometheus exporter: {err}"))?;

    tracing::info!(metrics_addr = %addr, "prometheus metrics exporter enabled");
    Ok(Some(addr))
}

#[cfg(not(feature = "prometheus"))]
fn init_metrics() -> Result<Option<SocketAddr>, String> {
    Ok(None)
}
