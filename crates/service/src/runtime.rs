//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime::ensure_env` without depending directly on `common`.

/// Ensure the markers file directory exists; warn on a missing frontend.
pub async fn ensure_env(frontend_dir: &str, markers_file: &str) -> anyhow::Result<()> {
    common::env::ensure_env(frontend_dir, markers_file).await
}
