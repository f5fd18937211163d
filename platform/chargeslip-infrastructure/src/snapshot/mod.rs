use chargeslip_domain::repositories::snapshot::SnapshotStore;
use chargeslip_domain::value_objects::snapshot::FormSnapshot;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub const STATE_FILE_NAME: &str = "state.json";
const APP_DIR: &str = "chargeslip";

/// JSON snapshot file on local disk.
#[derive(Debug, Clone)]
pub struct FilesystemSnapshotStore {
    path: PathBuf,
}

impl FilesystemSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn record_write_metrics(start: Instant, result: &Result<(), String>) {
    let result_label = if result.is_ok() { "ok" } else { "err" };
    metrics::counter!(
        "chargeslip.infra.snapshot.write.calls_total",
        "result" => result_label
    )
    .increment(1);
    metrics::histogram!("chargeslip.infra.snapshot.write_ms", "result" => result_label)
        .record(start.elapsed().as_millis() as f64);
}

fn record_read_metrics<T>(start: Instant, result: &Result<T, String>) {
    let result_label = if result.is_ok() { "ok" } else { "err" };
    metrics::counter!(
        "chargeslip.infra.snapshot.read.calls_total",
        "result" => result_label
    )
    .increment(1);
    metrics::histogram!("chargeslip.infra.snapshot.read_ms", "result" => result_label)
        .record(start.elapsed().as_millis() as f64);
}

impl FilesystemSnapshotStore {
    fn read(&self) -> Result<Option<FormSnapshot>, String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(format!(
                    "failed to read snapshot {}: {}",
                    self.path.display(),
                    err
                ))
            }
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| format!("failed to parse snapshot {}: {}", self.path.display(), err))
    }

    fn write(&self, snapshot: &FormSnapshot) -> Result<(), String> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|err| format!("failed to create dir {}: {}", parent.display(), err))?;
        }
        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|err| format!("failed to serialize snapshot: {err}"))?;

        // Readers see either the old file or the new one.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .map_err(|err| format!("failed to write snapshot {}: {}", tmp.display(), err))?;
        fs::rename(&tmp, &self.path).map_err(|err| {
            format!(
                "failed to move snapshot into place {}: {}",
                self.path.display(),
                err
            )
        })
    }
}

impl SnapshotStore for FilesystemSnapshotStore {
    fn load(&self) -> Result<Option<FormSnapshot>, String> {
        let start = Instant::now();
        let result = self.read();
        record_read_metrics(start, &result);
        result
    }

    fn save(&self, snapshot: &FormSnapshot) -> Result<(), String> {
        let start = Instant::now();
        let result = self.write(snapshot);
        record_write_metrics(start, &result);
        if result.is_ok() {
            tracing::debug!(path = %self.path.display(), "snapshot saved");
        }
        result
    }
}

/// Snapshot location from the process environment.
pub fn default_snapshot_path() -> Option<PathBuf> {
    let override_dir = std::env::var("CHARGESLIP_STATE_HOME").ok();
    let xdg = std::env::var("XDG_STATE_HOME").ok();
    let home = std::env::var("HOME").ok();
    snapshot_path_from(override_dir.as_deref(), xdg.as_deref(), home.as_deref())
}

pub fn snapshot_path_from(
    state_home_override: Option<&str>,
    xdg_state_home: Option<&str>,
    home: Option<&str>,
) -> Option<PathBuf> {
    let non_empty = |v: Option<&str>| v.filter(|s| !s.trim().is_empty()).map(PathBuf::from);

    if let Some(dir) = non_empty(state_home_override) {
        return Some(dir.join(STATE_FILE_NAME));
    }
    if let Some(xdg) = non_empty(xdg_state_home) {
        return Some(xdg.join(APP_DIR).join(STATE_FILE_NAME));
    }
    non_empty(home).map(|home| {
        home.join(".local")
            .join("state")
            .join(APP_DIR)
            .join(STATE_FILE_NAME)
    })
}

#[cfg(test)]
mod tests {
    use super::{snapshot_path_from, FilesystemSnapshotStore};
    use chargeslip_domain::repositories::snapshot::SnapshotStore;
    use chargeslip_domain::value_objects::instrument::InstrumentCategory;
    use chargeslip_domain::value_objects::snapshot::{FormFields, FormSnapshot, Theme};
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_dir(prefix: &str) -> PathBuf {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!("chargeslip_{prefix}_{}_{}", std::process::id(), now))
    }

    #[test]
    fn snapshot_path_prefers_override_then_xdg_then_home() {
        let path = snapshot_path_from(Some("/tmp/cs"), Some("/xdg"), Some("/home/u")).expect("path");
        assert_eq!(path, PathBuf::from("/tmp/cs").join("state.json"));

        let path = snapshot_path_from(Some("  "), Some("/xdg"), Some("/home/u")).expect("path");
        assert_eq!(path, PathBuf::from("/xdg").join("chargeslip").join("state.json"));

        let path = snapshot_path_from(None, None, Some("/home/u")).expect("path");
        assert_eq!(
            path,
            PathBuf::from("/home/u")
                .join(".local")
                .join("state")
                .join("chargeslip")
                .join("state.json")
        );

        assert!(snapshot_path_from(None, None, None).is_none());
    }

    #[test]
    fn missing_file_loads_as_none() {
        let store = FilesystemSnapshotStore::new(unique_dir("missing").join("state.json"));
        assert_eq!(store.load().expect("load"), None);
    }

    #[test]
    fn save_and_load_roundtrip_creates_parent_dirs() {
        let dir = unique_dir("roundtrip");
        let store = FilesystemSnapshotStore::new(dir.join("nested").join("state.json"));

        let mut snapshot = FormSnapshot {
            theme: Theme::Light,
            active_category: InstrumentCategory::CommodityFutures,
            ..FormSnapshot::default()
        };
        snapshot.forms.insert(
            InstrumentCategory::CommodityFutures,
            FormFields {
                buy_price: "71000".to_string(),
                sell_price: "71250.5".to_string(),
                quantity: "2".to_string(),
                ..FormFields::default()
            },
        );
        store.save(&snapshot).expect("save");

        let loaded = store.load().expect("load").expect("snapshot present");
        assert_eq!(loaded, snapshot);
        assert!(!store.path().with_extension("json.tmp").exists());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = unique_dir("corrupt");
        std::fs::create_dir_all(&dir).expect("mkdir");
        let path = dir.join("state.json");
        std::fs::write(&path, "{ not json").expect("write");

        let err = FilesystemSnapshotStore::new(&path).load().expect_err("should fail");
        assert!(err.contains("failed to parse snapshot"));

        let _ = std::fs::remove_dir_all(dir);
    }
}
