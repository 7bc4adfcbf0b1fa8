//! PNG encoding and file saving for finished paintings.

use super::types::ExportError;
use crate::config::{ExportFormat, ExportSection};
use crate::draw::PixelBuffer;
use chrono::Local;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Configuration for file saving.
#[derive(Debug, Clone)]
pub struct FileSaveConfig {
    /// Directory to save paintings to.
    pub save_directory: PathBuf,
    /// Filename template (supports chrono format specifiers).
    pub filename_template: String,
    /// Fixed file name; bypasses the template when set.
    pub file_name: Option<String>,
    /// Encoded image format.
    pub format: ExportFormat,
}

impl Default for FileSaveConfig {
    fn default() -> Self {
        Self {
            save_directory: dirs::picture_dir()
                .unwrap_or_else(|| PathBuf::from("~"))
                .join("Impressionist"),
            filename_template: "impressionist_%Y-%m-%d_%H%M%S".to_string(),
            file_name: None,
            format: ExportFormat::Png,
        }
    }
}

impl From<&ExportSection> for FileSaveConfig {
    fn from(section: &ExportSection) -> Self {
        Self {
            save_directory: expand_tilde(&section.save_directory),
            filename_template: section.filename_template.clone(),
            file_name: None,
            format: section.format,
        }
    }
}

impl FileSaveConfig {
    /// Saves to exactly `path` instead of a generated name.
    pub fn for_path(path: &Path) -> Self {
        let save_directory = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            save_directory,
            file_name: path.file_name().map(|n| n.to_string_lossy().into_owned()),
            ..Self::default()
        }
    }
}

/// Generate a filename based on the template and current time.
///
/// # Arguments
/// * `template` - Template string with chrono format specifiers
/// * `format` - File extension (e.g., "png")
pub fn generate_filename(template: &str, format: &str) -> String {
    let now = Local::now();
    let filename = now.format(template).to_string();
    format!("{}.{}", filename, format)
}

/// Ensure the save directory exists, creating it if necessary.
pub fn ensure_directory_exists(directory: &Path) -> Result<PathBuf, ExportError> {
    if !directory.exists() {
        log::info!("Creating save directory: {}", directory.display());
        fs::create_dir_all(directory)?;
    }

    let canonical = directory
        .canonicalize()
        .unwrap_or_else(|_| directory.to_path_buf());

    Ok(canonical)
}

/// Encodes RGBA pixels into the requested format.
pub fn encode_image(pixels: &PixelBuffer, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    let image = image::RgbaImage::from_raw(
        pixels.width(),
        pixels.height(),
        pixels.as_rgba().to_vec(),
    )
    .ok_or_else(|| {
        ExportError::Encode(format!(
            "pixel data does not match {}x{}",
            pixels.width(),
            pixels.height()
        ))
    })?;

    let image_format = match format {
        ExportFormat::Png => image::ImageFormat::Png,
    };
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), image_format)
        .map_err(|e| ExportError::Encode(e.to_string()))?;
    Ok(buffer)
}

/// Decodes an image file's bytes into RGBA pixels.
pub fn decode_image(bytes: &[u8]) -> Result<PixelBuffer, ExportError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| ExportError::Encode(e.to_string()))?
        .to_rgba8();
    let (width, height) = decoded.dimensions();
    PixelBuffer::from_rgba(width, height, decoded.into_raw())
        .map_err(|e| ExportError::Encode(e.to_string()))
}

/// Save encoded image data to a file.
///
/// # Returns
/// Path to the saved file
pub fn save_image(image_data: &[u8], config: &FileSaveConfig) -> Result<PathBuf, ExportError> {
    let directory = ensure_directory_exists(&config.save_directory)?;

    let filename = match &config.file_name {
        Some(name) => name.clone(),
        None => generate_filename(&config.filename_template, config.format.extension()),
    };
    let file_path = directory.join(&filename);

    log::info!(
        "Saving painting to: {} ({} bytes)",
        file_path.display(),
        image_data.len()
    );

    fs::write(&file_path, image_data)?;

    let written_size = fs::metadata(&file_path)?.len();
    log::debug!("File written: {} bytes", written_size);

    // User read/write only
    #[cfg(unix)]
    {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&file_path, Permissions::from_mode(0o600))?;
    }

    Ok(file_path)
}

/// Expand tilde (~) in path strings.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{BLUE, TRANSPARENT};
    use tempfile::TempDir;

    #[test]
    fn test_generate_filename() {
        let filename = generate_filename("painting_%Y%m%d", "png");
        assert!(filename.starts_with("painting_"));
        assert!(filename.ends_with(".png"));
        assert_eq!(filename.len(), "painting_".len() + 8 + ".png".len());
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_tilde("~/Pictures");
        assert!(!expanded.to_string_lossy().starts_with("~"));

        let no_tilde = expand_tilde("/absolute/path");
        assert_eq!(no_tilde, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_default_config() {
        let config = FileSaveConfig::default();
        assert_eq!(config.format, ExportFormat::Png);
        assert!(
            config
                .save_directory
                .to_string_lossy()
                .contains("Impressionist")
        );
    }

    #[test]
    fn for_path_splits_directory_and_name() {
        let config = FileSaveConfig::for_path(Path::new("/tmp/out/final.png"));
        assert_eq!(config.save_directory, PathBuf::from("/tmp/out"));
        assert_eq!(config.file_name.as_deref(), Some("final.png"));

        let bare = FileSaveConfig::for_path(Path::new("final.png"));
        assert_eq!(bare.save_directory, PathBuf::from("."));
    }

    #[test]
    fn encoded_png_decodes_to_same_pixels() {
        let mut pixels = PixelBuffer::new(4, 3);
        pixels.set(1, 1, BLUE.with_alpha(128));

        let bytes = encode_image(&pixels, ExportFormat::Png).unwrap();
        assert_eq!(&bytes[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);

        let decoded = decode_image(&bytes).unwrap();
        assert_eq!(decoded, pixels);
        assert_eq!(decoded.get(0, 0), Some(TRANSPARENT));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            decode_image(b"not an image"),
            Err(ExportError::Encode(_))
        ));
    }

    #[test]
    fn save_creates_directory_and_restricts_permissions() {
        let dir = TempDir::new().unwrap();
        let config = FileSaveConfig {
            save_directory: dir.path().join("paintings"),
            filename_template: "fixed".to_string(),
            file_name: None,
            format: ExportFormat::Png,
        };

        let path = save_image(&[1, 2, 3], &config).unwrap();
        assert!(path.ends_with("fixed.png"));
        assert_eq!(fs::read(&path).unwrap(), vec![1, 2, 3]);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }
}
