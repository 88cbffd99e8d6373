use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{error, warn};

pub const APP_DISK_LABEL: &str = "App (Internal)";
pub const DISK_READ_ERROR: &str = "Error reading path";

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

fn format_free_space(bytes: u64) -> String {
    format!("{:.2} GB", bytes as f64 / BYTES_PER_GB)
}

fn probe_path(path: &Path) -> String {
    match fs2::available_space(path) {
        Ok(bytes) => format_free_space(bytes),
        Err(err) => {
            warn!("Could not read free space of {:?}: {}", path, err);
            DISK_READ_ERROR.to_string()
        }
    }
}

/// Free space for the working directory plus each named path.
///
/// A failure on one path only marks that entry; the others are still read.
pub async fn disk_space_report(paths: Vec<(String, PathBuf)>) -> BTreeMap<String, String> {
    let names: Vec<String> = paths.iter().map(|(name, _)| name.clone()).collect();

    let result = tokio::task::spawn_blocking(move || {
        let mut report = BTreeMap::new();
        let app_space = match std::env::current_dir() {
            Ok(cwd) => probe_path(&cwd),
            Err(err) => {
                warn!("Could not resolve working directory: {}", err);
                DISK_READ_ERROR.to_string()
            }
        };
        report.insert(APP_DISK_LABEL.to_string(), app_space);
        for (name, path) in paths {
            if name == APP_DISK_LABEL {
                warn!("Path {:?} uses the reserved name {:?}, skipped", path, name);
                continue;
            }
            report.insert(name, probe_path(&path));
        }
        report
    })
    .await;

    match result {
        Ok(report) => report,
        Err(err) => {
            error!("Disk space probe task failed: {}", err);
            std::iter::once(APP_DISK_LABEL.to_string())
                .chain(names)
                .map(|name| (name, DISK_READ_ERROR.to_string()))
                .collect()
        }
    }
}
