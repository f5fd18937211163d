use crate::quote::Quote;
use std::io::Write;

pub const CSV_HEADER: [&str; 4] = ["category", "key", "label", "amount"];

/// Writes one CSV row per (category, component) with the raw amount.
pub fn write_quote_csv<W: Write>(writer: W, quotes: &[Quote]) -> Result<(), String> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(CSV_HEADER)
        .map_err(|err| format!("failed to write csv header: {err}"))?;
    for quote in quotes {
        for row in &quote.rows {
            let amount = format!("{:.2}", row.amount);
            out.write_record([quote.category.key(), row.key, row.label, amount.as_str()])
                .map_err(|err| format!("failed to write csv row: {err}"))?;
        }
    }
    out.flush()
        .map_err(|err| format!("failed to flush csv output: {err}"))
}

pub fn quote_csv_string(quotes: &[Quote]) -> Result<String, String> {
    let mut buf = Vec::new();
    write_quote_csv(&mut buf, quotes)?;
    String::from_utf8(buf).map_err(|err| format!("csv output is not utf-8: {err}"))
}
