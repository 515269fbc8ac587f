//! Raw JSON side channel.
//!
//! The fetched payload is written to `{dir}/ecgroups_{fetched_at}.json` the first
//! time somebody asks for it, and never again during the run.

use crate::error::{Error, Result};
use crate::processing::RawPayload;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct DebugOutput {
    dir: PathBuf,
    written: Option<PathBuf>,
}

impl DebugOutput {
    pub fn new(dir: impl Into<PathBuf>) -> DebugOutput {
        DebugOutput {
            dir: dir.into(),
            written: None,
        }
    }

    /// Path of the file once written.
    pub fn written(&self) -> Option<&Path> {
        self.written.as_deref()
    }

    /// Write `payload` unless already done, return the file path either way.
    pub fn ensure_written(&mut self, payload: &RawPayload) -> Result<PathBuf> {
        if let Some(path) = &self.written {
            return Ok(path.clone());
        }
        std::fs::create_dir_all(&self.dir).map_err(|e| Error::Io {
            path: self.dir.clone(),
            source: e,
        })?;
        let path = self.dir.join(format!("ecgroups_{}.json", payload.fetched_at));
        std::fs::write(&path, &payload.bytes).map_err(|e| Error::Io {
            path: path.clone(),
            source: e,
        })?;
        log::info!("Raw JSON output written to: {}", path.display());
        self.written = Some(path.clone());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_written_once() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("zscc-json-output");
        let mut debug = DebugOutput::new(&dir);
        assert!(debug.written().is_none());
        assert!(!dir.exists(), "directory is created lazily");

        let first = RawPayload {
            bytes: b"[{\"id\":1}]".to_vec(),
            fetched_at: 1_700_000_000,
        };
        let path = debug.ensure_written(&first).unwrap();
        assert_eq!(path, dir.join("ecgroups_1700000000.json"));
        assert_eq!(std::fs::read(&path).unwrap(), first.bytes);

        let second = RawPayload {
            bytes: b"[]".to_vec(),
            fetched_at: 1_700_000_999,
        };
        assert_eq!(debug.ensure_written(&second).unwrap(), path);
        assert_eq!(std::fs::read(&path).unwrap(), first.bytes);
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 1);
    }

    #[test]
    fn test_unwritable_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let mut debug = DebugOutput::new(blocker.join("sub"));
        let payload = RawPayload {
            bytes: vec![],
            fetched_at: 1,
        };
        assert!(matches!(debug.ensure_written(&payload), Err(Error::Io { .. })));
    }
}
