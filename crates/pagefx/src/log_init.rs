//! File logging for hosts without their own `log` backend.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{Level, LevelFilter, Metadata, Record};

use crate::error::Result;

struct FileLogger {
    file_path: PathBuf,
}

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            if let Ok(mut file) = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)
            {
                let _ = writeln!(
                    file,
                    "[{}] {}: {}",
                    record.level(),
                    record.target(),
                    record.args()
                );
            }
        }
    }

    fn flush(&self) {}
}

/// Installs a logger appending `debug` and above to `path`.
///
/// Fails if the file cannot be opened or another logger is already set.
pub fn init_logger(path: impl AsRef<Path>) -> Result<()> {
    let file_path = path.as_ref().to_path_buf();
    OpenOptions::new().create(true).append(true).open(&file_path)?;
    log::set_boxed_logger(Box::new(FileLogger { file_path }))?;
    log::set_max_level(LevelFilter::Debug);
    Ok(())
}
