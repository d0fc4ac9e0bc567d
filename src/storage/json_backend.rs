use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::Local;
use tracing::{debug, warn};

use super::{Result, StateStore};
use crate::{ledger::LedgerState, utils::paths};

pub const STATE_FILE_NAME: &str = "streak_state.json";
const TMP_SUFFIX: &str = "tmp";
const BACKUP_SUFFIX: &str = "bak";
const UNREADABLE_SUFFIX: &str = "unreadable";

/// Stores the ledger record as a single pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    /// Store rooted at `root`, or at the resolved application data directory.
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let base = paths::resolve_base(root);
        paths::ensure_dir(&base)?;
        Ok(Self {
            path: base.join(STATE_FILE_NAME),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> PathBuf {
        suffixed(&self.path, BACKUP_SUFFIX)
    }
}

impl StateStore for JsonStateStore {
    fn load(&self) -> Result<Option<LedgerState>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no stored state");
            return Ok(None);
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    fn save(&self, state: &LedgerState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            paths::ensure_dir(parent)?;
        }
        if self.path.exists() {
            fs::copy(&self.path, self.backup_path())?;
        }
        let json = serde_json::to_string_pretty(state)?;
        let tmp = suffixed(&self.path, TMP_SUFFIX);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "state saved");
        Ok(())
    }

    fn set_aside(&self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        let stamp = Local::now().format("%Y%m%dT%H%M%S").to_string();
        let mut target = suffixed(&self.path, &format!("{UNREADABLE_SUFFIX}-{stamp}"));
        let mut attempt = 1;
        while target.exists() {
            target = suffixed(&self.path, &format!("{UNREADABLE_SUFFIX}-{stamp}-{attempt}"));
            attempt += 1;
        }
        fs::rename(&self.path, &target)?;
        warn!(path = %target.display(), "unreadable state moved aside");
        Ok(())
    }
}

fn suffixed(path: &Path, suffix: &str) -> PathBuf {
    let mut target = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, suffix),
        None => suffix.to_string(),
    };
    target.set_extension(ext);
    target
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    file.sync_all()?;
    Ok(())
}
