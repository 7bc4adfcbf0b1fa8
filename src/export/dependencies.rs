use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;

use crate::config::ExportFormat;
use crate::draw::PixelBuffer;
use crate::export::{
    file::{self, FileSaveConfig},
    types::{ExportError, SaveOutcome},
};

/// Abstraction over turning pixels into file bytes.
pub trait ImageEncoder: Send + Sync {
    fn encode(&self, pixels: &PixelBuffer, format: ExportFormat) -> Result<Vec<u8>, ExportError>;
}

/// Abstraction over writing encoded bytes to disk.
pub trait ImageSaver: Send + Sync {
    fn save(&self, image_data: &[u8], config: &FileSaveConfig) -> Result<PathBuf, ExportError>;
}

/// Told about every finished request, after the status has been updated.
#[async_trait]
pub trait SaveNotifier: Send + Sync {
    async fn notify(&self, outcome: &SaveOutcome);
}

/// Bundle of dependencies used by the save pipeline. Each component can be mocked in tests.
#[derive(Clone)]
pub struct SaveDependencies {
    pub encoder: Arc<dyn ImageEncoder>,
    pub saver: Arc<dyn ImageSaver>,
    pub notifier: Arc<dyn SaveNotifier>,
}

impl Default for SaveDependencies {
    fn default() -> Self {
        Self {
            encoder: Arc::new(DefaultEncoder),
            saver: Arc::new(DefaultFileSaver),
            notifier: Arc::new(LogNotifier),
        }
    }
}

struct DefaultEncoder;
struct DefaultFileSaver;
struct LogNotifier;

impl ImageEncoder for DefaultEncoder {
    fn encode(&self, pixels: &PixelBuffer, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
        file::encode_image(pixels, format)
    }
}

impl ImageSaver for DefaultFileSaver {
    fn save(&self, image_data: &[u8], config: &FileSaveConfig) -> Result<PathBuf, ExportError> {
        file::save_image(image_data, config)
    }
}

#[async_trait]
impl SaveNotifier for LogNotifier {
    async fn notify(&self, outcome: &SaveOutcome) {
        match outcome {
            SaveOutcome::Success(result) => {
                log::info!("Painting saved: {}", result.path.display())
            }
            SaveOutcome::Failed(ticket, message) => {
                log::error!("Save {} failed: {}", ticket, message)
            }
            SaveOutcome::Cancelled(ticket) => log::info!("Save {} cancelled", ticket),
        }
    }
}
