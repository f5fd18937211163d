use chargeslip_application::config::Config;
use chargeslip_application::export::quote_csv_string;
use chargeslip_application::quote::{quote, quote_all, Quote};
use chargeslip_domain::value_objects::commodity::Commodity;
use chargeslip_domain::value_objects::instrument::InstrumentCategory;
use chargeslip_domain::value_objects::snapshot::{FormFields, InputMode};
use chargeslip_domain::value_objects::venue::Venue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Csv,
    Table,
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessArgs {
    pub category: Option<String>,
    pub all: bool,
    pub buy: String,
    pub sell: String,
    pub qty: Option<String>,
    pub amount: Option<String>,
    pub venue: Option<String>,
    pub commodity: Option<String>,
    pub strike: Option<String>,
}

/// Computes the requested quote(s) and renders them in `format`.
pub fn run_headless(
    args: &HeadlessArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<String, String> {
    let fields = build_fields(args, config)?;
    let quotes = if args.all {
        quote_all(&fields, config)
    } else {
        let category = match args.category.as_deref() {
            Some(raw) => InstrumentCategory::parse(raw)?,
            None => config.defaults.category,
        };
        vec![quote(category, &fields, config)]
    };
    tracing::info!(quotes = quotes.len(), format = ?format, "headless quote");
    render(&quotes, args.all, format)
}

fn build_fields(args: &HeadlessArgs, config: &Config) -> Result<FormFields, String> {
    if args.qty.is_some() && args.amount.is_some() {
        return Err("--qty and --amount are mutually exclusive".to_string());
    }
    let venue = match args.venue.as_deref() {
        Some(raw) => Venue::parse(raw)?,
        None => config.defaults.venue,
    };
    let commodity = match args.commodity.as_deref() {
        Some(raw) => Commodity::parse(raw)?,
        None => config.defaults.commodity,
    };
    Ok(FormFields {
        buy_price: args.buy.clone(),
        sell_price: args.sell.clone(),
        quantity: args.qty.clone().unwrap_or_default(),
        amount: args.amount.clone().unwrap_or_default(),
        strike_price: args.strike.clone().unwrap_or_default(),
        input_mode: if args.amount.is_some() {
            InputMode::Amount
        } else {
            InputMode::Quantity
        },
        venue,
        commodity,
    })
}

fn render(quotes: &[Quote], many: bool, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => {
            let rendered = if many {
                serde_json::to_string_pretty(quotes)
            } else {
                serde_json::to_string_pretty(&quotes[0])
            };
            rendered.map_err(|err| format!("failed to serialize quote json: {err}"))
        }
        OutputFormat::Csv => quote_csv_string(quotes),
        OutputFormat::Table => Ok(render_table(quotes)),
    }
}

fn render_table(quotes: &[Quote]) -> String {
    let mut out = String::new();
    for (idx, q) in quotes.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(&format!(
            "{} / {}\n",
            q.category.segment().label(),
            q.category.label()
        ));
        let width = q.rows.iter().map(|r| r.label.len()).max().unwrap_or(0);
        let value_width = q.rows.iter().map(|r| r.display.chars().count()).max().unwrap_or(0);
        for row in &q.rows {
            out.push_str(&format!(
                "  {:<width$}  {:>value_width$}\n",
                row.label,
                row.display,
                width = width,
                value_width = value_width
            ));
        }
    }
    out
}
