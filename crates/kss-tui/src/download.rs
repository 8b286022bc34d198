//! Saving event images to disk.
//!
//! Mirrors the product behavior: an image is written under a
//! `YYYYMMDDHHMMSS.jpg` timestamp name into the configured images
//! directory. Success/failure is the caller's concern to report.

use std::path::{Path, PathBuf};

use chrono::Local;
use kss_proto::client::KssClient;
use tracing::info;

pub async fn save_event_image(
    client: &KssClient,
    image_id: i64,
    dir: &Path,
) -> anyhow::Result<PathBuf> {
    let bytes = client.fetch_image(image_id).await?;
    tokio::fs::create_dir_all(dir).await?;
    let stamp = Local::now().format("%Y%m%d%H%M%S");
    let path = dir.join(format!("{stamp}.jpg"));
    tokio::fs::write(&path, &bytes).await?;
    info!("[image] saved {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}
