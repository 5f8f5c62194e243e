use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use echonote_core::model::Mode;

pub const REPORT_EXTENSION: &str = "md";

/// Give up after this many same-second reports for one source and mode.
const MAX_SEQUENCE: u32 = 999;

/// `{base}_{mode}_{YYYY-MM-DD_HH-MM-SS}.md`, with `_{sequence}` before the
/// extension for every sequence after the first.
pub fn report_file_name(base: &str, mode: Mode, at: NaiveDateTime, sequence: u32) -> String {
    let stamp = at.format("%Y-%m-%d_%H-%M-%S");
    if sequence <= 1 {
        format!("{base}_{mode}_{stamp}.{REPORT_EXTENSION}")
    } else {
        format!("{base}_{mode}_{stamp}_{sequence}.{REPORT_EXTENSION}")
    }
}

/// Create a fresh report file in `dir`, never reusing an existing name.
///
/// Creation uses create-new semantics, so two runs racing for the same name
/// end up with different files.
pub fn create_report_file(
    dir: &Path,
    base: &str,
    mode: Mode,
    at: NaiveDateTime,
) -> io::Result<(PathBuf, File)> {
    fs::create_dir_all(dir)?;
    for sequence in 1..=MAX_SEQUENCE {
        let path = dir.join(report_file_name(base, mode, at, sequence));
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                tracing::debug!("Report name taken, trying next: {}", path.display());
            }
            Err(e) => return Err(e),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("more than {MAX_SEQUENCE} reports named {base}_{mode} in one second"),
    ))
}
