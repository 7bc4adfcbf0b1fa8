use std::{fmt, sync::Arc};

use crate::draw::PixelBuffer;
use crate::export::{
    dependencies::SaveDependencies,
    file::FileSaveConfig,
    types::{ExportError, SaveResult, SaveTicket},
};
use tokio::task;

#[derive(Clone)]
pub(crate) struct SaveRequest {
    pub(crate) ticket: SaveTicket,
    pub(crate) pixels: PixelBuffer,
    pub(crate) config: FileSaveConfig,
}

impl fmt::Debug for SaveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaveRequest")
            .field("ticket", &self.ticket)
            .field("size", &(self.pixels.width(), self.pixels.height()))
            .field("directory", &self.config.save_directory)
            .finish()
    }
}

/// Encodes and writes one snapshot on the blocking pool.
pub(crate) async fn perform_save(
    request: SaveRequest,
    dependencies: Arc<SaveDependencies>,
) -> Result<SaveResult, ExportError> {
    log::info!(
        "Starting save {} ({}x{})",
        request.ticket,
        request.pixels.width(),
        request.pixels.height()
    );

    let SaveRequest {
        ticket,
        pixels,
        config,
    } = request;
    let encoder = Arc::clone(&dependencies.encoder);
    let saver = Arc::clone(&dependencies.saver);

    task::spawn_blocking(move || -> Result<SaveResult, ExportError> {
        let image_data = encoder.encode(&pixels, config.format)?;
        log::debug!("Encoded save {} to {} bytes", ticket, image_data.len());
        let path = saver.save(&image_data, &config)?;
        Ok(SaveResult {
            ticket,
            path,
            bytes_written: image_data.len(),
        })
    })
    .await
    .map_err(|e| ExportError::TaskFailed(e.to_string()))?
}
