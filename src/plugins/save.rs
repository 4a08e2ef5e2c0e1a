use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use clap::{Arg, ArgMatches, Command};
use sanitize_filename::sanitize;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::core::content_disposition::DEFAULT_FILENAME;
use crate::plugins::registry::{CliPlugin, FrontendCliConfig, SaveTarget};

/// Saves finished downloads into one directory, like a browser's download folder.
pub struct DirSaveTarget {
    dir: PathBuf,
}

impl DirSaveTarget {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// `name.ext`, then `name (1).ext`, `name (2).ext`, ...
    async fn free_path(&self, filename: &str) -> PathBuf {
        let candidate = self.dir.join(filename);
        if !exists(&candidate).await {
            return candidate;
        }
        let p = Path::new(filename);
        let stem = p.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
        let ext = p.extension().map(|e| format!(".{}", e.to_string_lossy())).unwrap_or_default();
        let mut n = 1u32;
        loop {
            let candidate = self.dir.join(format!("{} ({}){}", stem, n, ext));
            if !exists(&candidate).await {
                return candidate;
            }
            n += 1;
        }
    }
}

async fn exists(p: &Path) -> bool {
    tokio::fs::metadata(p).await.is_ok()
}

#[async_trait]
impl SaveTarget for DirSaveTarget {
    async fn save(&self, filename: &str, blob: Bytes) -> anyhow::Result<String> {
        tokio::fs::create_dir_all(&self.dir).await
            .with_context(|| format!("create download dir {}", self.dir.display()))?;

        let mut name = sanitize(filename);
        if name.is_empty() {
            name = DEFAULT_FILENAME.to_string();
        }
        let target = self.free_path(&name).await;
        let tmp_path = target.with_file_name(format!(
            "{}.partial",
            target.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default()
        ));

        let mut f = tokio::fs::File::create(&tmp_path).await
            .with_context(|| format!("create {}", tmp_path.display()))?;
        f.write_all(&blob).await?;
        f.flush().await?;
        drop(f);

        tokio::fs::rename(&tmp_path, &target).await
            .with_context(|| format!("rename {} -> {}", tmp_path.display(), target.display()))?;

        info!(path = %target.display(), bytes = blob.len(), "download saved");
        Ok(target.display().to_string())
    }
}

pub struct SaveCliPlugin;

impl SaveCliPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl CliPlugin for SaveCliPlugin {
    fn name(&self) -> &'static str {
        "save"
    }

    fn augment_command(&self, cmd: Command) -> Command {
        cmd.arg(
            Arg::new("out_dir")
                .long("out-dir")
                .help("Output directory")
                .default_value("./downloads")
                .num_args(1),
        )
    }

    fn apply_matches(&self, matches: &ArgMatches, cfg: &mut FrontendCliConfig) -> anyhow::Result<()> {
        if let Some(d) = matches.get_one::<String>("out_dir") {
            cfg.out_dir = PathBuf::from(d);
        }
        Ok(())
    }
}
