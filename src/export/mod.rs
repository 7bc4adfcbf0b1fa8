//! Saving finished paintings.
//!
//! Exports are handed to a background worker as copied pixel snapshots,
//! encoded to PNG on tokio's blocking pool, and written under the configured
//! save directory with a timestamped file name.

pub mod file;
pub mod types;

mod dependencies;
mod manager;
mod pipeline;
#[cfg(test)]
mod tests;

pub use dependencies::{ImageEncoder, ImageSaver, SaveDependencies, SaveNotifier};
pub use file::FileSaveConfig;
pub use manager::SaveManager;
#[allow(unused_imports)]
pub use types::{ExportError, SaveOutcome, SaveResult, SaveStatus, SaveTicket};
