use std::sync::{Arc, Mutex, MutexGuard};

use super::{Result, StateStore};
use crate::{errors::LedgerError, ledger::LedgerState};

/// In-process store; clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    slot: Arc<Mutex<Option<LedgerState>>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: LedgerState) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(state))),
        }
    }

    /// Last saved state, or `None` when nothing was saved or the slot is poisoned.
    pub fn snapshot(&self) -> Option<LedgerState> {
        self.lock().ok().and_then(|guard| guard.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<LedgerState>>> {
        self.slot
            .lock()
            .map_err(|_| LedgerError::Io(std::io::Error::other("state store lock poisoned")))
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<Option<LedgerState>> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, state: &LedgerState) -> Result<()> {
        *self.lock()? = Some(state.clone());
        Ok(())
    }
}
