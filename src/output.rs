use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use crate::error::Result;
use crate::types::ForecastSnapshot;

pub const PAGE_FILE: &str = "index.html";
pub const SNAPSHOT_FILE: &str = "forecast.json";
pub const STYLESHEET_FILE: &str = "forecast.css";

const DEFAULT_STYLESHEET: &str = include_str!("../assets/forecast.css");

/// Persists rendered pages and snapshots under the output directory.
/// Every write goes to a sibling temp file first and is renamed into place,
/// so readers see either the old file or the new one.
#[derive(Debug, Clone)]
pub struct OutputStore {
    dir: PathBuf,
}

impl OutputStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn page_path(&self) -> PathBuf {
        self.dir.join(PAGE_FILE)
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.dir.join(SNAPSHOT_FILE)
    }

    /// Create the directory and seed the stylesheet if it is missing.
    pub async fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;
        let css = self.dir.join(STYLESHEET_FILE);
        if !fs::try_exists(&css).await? {
            self.write_atomic(&css, DEFAULT_STYLESHEET.as_bytes()).await?;
            info!("Seeded stylesheet at {}", css.display());
        }
        Ok(())
    }

    pub async fn write_page(&self, html: &str) -> Result<()> {
        self.write_atomic(&self.page_path(), html.as_bytes()).await
    }

    pub async fn write_snapshot(&self, snapshot: &ForecastSnapshot) -> Result<()> {
        let json = serde_json::to_vec_pretty(snapshot)?;
        self.write_atomic(&self.snapshot_path(), &json).await
    }

    /// Last written page, if any.
    pub async fn read_page(&self) -> Result<Option<String>> {
        match fs::read_to_string(self.page_path()).await {
            Ok(html) => Ok(Some(html)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn read_snapshot(&self) -> Result<Option<ForecastSnapshot>> {
        match fs::read(self.snapshot_path()).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn has_page(&self) -> Result<bool> {
        Ok(fs::try_exists(self.page_path()).await?)
    }

    async fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, bytes).await?;
        if let Err(e) = fs::rename(&tmp, path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        debug!(path = %path.display(), bytes = bytes.len(), "Wrote output file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnitSystem;
    use chrono::{FixedOffset, TimeZone};

    fn snapshot() -> ForecastSnapshot {
        ForecastSnapshot {
            city_name: "Oslo".into(),
            sunrise: "4am".into(),
            sunset: "10pm".into(),
            units: UnitSystem::Metric,
            days: Vec::new(),
            generated_at: FixedOffset::east_opt(2 * 3600)
                .unwrap()
                .with_ymd_and_hms(2025, 6, 21, 12, 0, 0)
                .unwrap(),
        }
    }

    #[tokio::test]
    async fn page_replaces_previous_version() {
        let dir = tempfile::tempdir().unwrap();
        let store = OutputStore::new(dir.path().join("public"));
        assert_eq!(store.read_page().await.unwrap(), None);

        store.write_page("<p>one</p>").await.unwrap();
        store.write_page("<p>two</p>").await.unwrap();
        assert_eq!(store.read_page().await.unwrap().as_deref(), Some("<p>two</p>"));
        assert!(!dir.path().join("public/index.html.tmp").exists());
    }

    #[tokio::test]
    async fn snapshot_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = OutputStore::new(dir.path());
        let snap = snapshot();
        store.write_snapshot(&snap).await.unwrap();
        assert_eq!(store.read_snapshot().await.unwrap(), Some(snap));
    }

    #[tokio::test]
    async fn prepare_seeds_stylesheet_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = OutputStore::new(dir.path());
        store.prepare().await.unwrap();
        let css = dir.path().join(STYLESHEET_FILE);
        assert!(css.exists());

        std::fs::write(&css, "body{}").unwrap();
        store.prepare().await.unwrap();
        assert_eq!(std::fs::read_to_string(&css).unwrap(), "body{}");
    }

    #[tokio::test]
    async fn unwritable_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let store = OutputStore::new(blocker.join("nested"));
        let err = store.write_page("x").await.unwrap_err();
        assert!(matches!(err, crate::error::AppError::Io(_)));
    }
}
