pub mod json_backend;
pub mod memory;

use crate::{errors::LedgerError, ledger::LedgerState};

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Abstraction over backends that hold the single serialized ledger record.
pub trait StateStore: Send + Sync {
    /// Returns `None` when nothing has been stored yet.
    fn load(&self) -> Result<Option<LedgerState>>;
    fn save(&self, state: &LedgerState) -> Result<()>;

    /// Moves a record that failed to load out of the way, so later saves
    /// start a new record instead of overwriting it.
    fn set_aside(&self) -> Result<()> {
        Ok(())
    }
}

pub use json_backend::{JsonStateStore, STATE_FILE_NAME};
pub use memory::MemoryStateStore;
