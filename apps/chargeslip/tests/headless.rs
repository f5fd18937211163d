use chargeslip::bootstrap::load_startup_config;
use chargeslip::headless::{run_headless, HeadlessArgs, OutputFormat};
use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_suffix() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    format!("{}_{}", std::process::id(), now)
}

#[test]
fn config_defaults_drive_headless_selectors() {
    let dir = std::env::temp_dir().join(format!("chargeslip_headless_{}", unique_suffix()));
    fs::create_dir_all(&dir).expect("mkdir");
    let path = dir.join("chargeslip.toml");
    fs::write(
        &path,
        r#"
[defaults]
category = "commodity_futures"
commodity = "CRUDEOIL"

[display]
grouping = "western"
"#,
    )
    .expect("write config");

    let config = load_startup_config(Some(path.as_path())).expect("config");
    let args = HeadlessArgs {
        buy: "6500".to_string(),
        sell: "6550".to_string(),
        qty: Some("1".to_string()),
        ..HeadlessArgs::default()
    };
    let out = run_headless(&args, &config, OutputFormat::Json).expect("headless");
    let value: serde_json::Value = serde_json::from_str(&out).expect("json");

    assert_eq!(value["category"], "commodity_futures");
    assert_eq!(value["input"]["lot_multiplier"], 100);
    assert_eq!(value["breakdown"]["turnover"], 1_305_000.0);
    let turnover = value["rows"][0]["display"].as_str().unwrap_or_default();
    assert_eq!(turnover, "₹1,305,000.00");

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn garbage_numbers_still_produce_a_zero_quote() {
    let args = HeadlessArgs {
        category: Some("delivery".to_string()),
        buy: "abc".to_string(),
        sell: "".to_string(),
        qty: Some("NaN".to_string()),
        ..HeadlessArgs::default()
    };
    let config = load_startup_config(None).expect("defaults");
    let out = run_headless(&args, &config, OutputFormat::Csv).expect("headless");
    for line in out.lines().skip(1) {
        assert!(line.ends_with(",0.00"), "unexpected row: {line}");
    }
}
