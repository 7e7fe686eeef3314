use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::pipeline::persistence::drumkit_dir;

const DEFAULT_FILTER: &str = "drumkit=info";

pub fn log_file_path(data_dir: &Path) -> PathBuf {
    drumkit_dir(data_dir).join("drumkit.log")
}

/// Initialize logging with env_logger.
///
/// The terminal belongs to the tui, so everything goes to
/// `<data_dir>/.drumkit/drumkit.log`. `level` (from `--log-level`) wins over
/// `RUST_LOG`, which wins over the default of `drumkit=info`.
pub fn init_logging(data_dir: &Path, level: Option<&str>) -> anyhow::Result<PathBuf> {
    let path = log_file_path(data_dir);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_FILTER));
    if let Some(level) = level {
        builder.parse_filters(level);
    }
    builder
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .context("logger already initialized")?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_lives_next_to_settings() {
        let path = log_file_path(Path::new("/tmp/kit"));
        assert_eq!(path, Path::new("/tmp/kit/.drumkit/drumkit.log"));
    }
}
