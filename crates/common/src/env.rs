//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::warn;

/// Ensure the directory holding the markers file exists; warn when the
/// frontend assets directory is missing since the map page will 404.
pub async fn ensure_env(frontend_dir: &str, markers_file: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(frontend_dir).await.is_err() {
        warn!(%frontend_dir, "frontend assets directory not found; map page may 404");
    }
    if let Some(data_dir) = Path::new(markers_file).parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(data_dir)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", data_dir.display()))?;
    }
    Ok(())
}
