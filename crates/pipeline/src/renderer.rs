//! QR image rendering.
//!
//! Rendering is split in two: [`QrEncoder`] turns content into PNG bytes
//! (error-correction level H, fixed square size) and an [`ImageSink`]
//! persists the bytes under the QR code's ID. [`QrImageRenderer`] chains
//! them behind the [`ImageRenderer`] trait, which is the single rendering
//! entrypoint for both batch generation and standalone QR codes.

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use office_db::models::qr_code::QrCode;
use office_db::ItemStore;
use qrcode::{EcLevel, QrCode as QrSymbol};

/// Default edge length of rendered images, in pixels.
pub const DEFAULT_IMAGE_SIZE: u32 = 256;

/// Default directory for rendered images.
pub const DEFAULT_IMAGE_DIR: &str = "/tmp/qrcodes";

/// Light border around the symbol, in modules, on each side.
const QUIET_ZONE_MODULES: u32 = 4;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("QR encoding failed: {0}")]
    Encode(String),

    #[error("Invalid image id '{0}'")]
    InvalidId(String),

    #[error("Image write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render task failed: {0}")]
    Task(String),
}

// ---------------------------------------------------------------------------
// Encoder
// ---------------------------------------------------------------------------

/// Encodes content strings into square PNG QR images.
#[derive(Debug, Clone, Copy)]
pub struct QrEncoder {
    size: u32,
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_SIZE)
    }
}

impl QrEncoder {
    pub fn new(size: u32) -> Self {
        Self { size: size.max(1) }
    }

    /// Encode `content` at error-correction level H into a `size x size` PNG.
    ///
    /// Every module is the same whole number of pixels wide; the symbol and
    /// its quiet zone are centred on a white canvas to reach `size`.
    pub fn encode_png(&self, content: &str) -> Result<Vec<u8>, RenderError> {
        if content.is_empty() {
            return Err(RenderError::Encode("content is empty".to_string()));
        }

        let symbol = QrSymbol::with_error_correction_level(content.as_bytes(), EcLevel::H)
            .map_err(|e| RenderError::Encode(e.to_string()))?;

        let modules = symbol.width() as u32 + 2 * QUIET_ZONE_MODULES;
        let module_px = self.size / modules;
        if module_px == 0 {
            return Err(RenderError::Encode(format!(
                "{modules} modules do not fit in {size}px",
                size = self.size
            )));
        }

        let symbol_img = symbol
            .render::<Luma<u8>>()
            .quiet_zone(true)
            .module_dimensions(module_px, module_px)
            .build();

        let mut canvas = GrayImage::from_pixel(self.size, self.size, Luma([255]));
        let offset = i64::from((self.size - symbol_img.width()) / 2);
        image::imageops::overlay(&mut canvas, &symbol_img, offset, offset);

        let mut png = Vec::new();
        DynamicImage::ImageLuma8(canvas)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| RenderError::Encode(e.to_string()))?;
        Ok(png)
    }
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Destination for rendered images.
#[async_trait]
pub trait ImageSink: Send + Sync {
    /// Persist `png` for QR code `id`, returning its addressable path.
    async fn store(&self, id: &str, png: &[u8]) -> Result<String, RenderError>;
}

/// Writes `<dir>/<id>.png` on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalImageSink {
    dir: PathBuf,
}

impl LocalImageSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ImageSink for LocalImageSink {
    async fn store(&self, id: &str, png: &[u8]) -> Result<String, RenderError> {
        if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
            return Err(RenderError::InvalidId(id.to_string()));
        }
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(format!("{id}.png"));
        tokio::fs::write(&path, png).await?;
        Ok(path.to_string_lossy().into_owned())
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Renders a QR code's content to an image and returns where it was stored.
#[async_trait]
pub trait ImageRenderer: Send + Sync {
    async fn render(&self, qr_code: &QrCode) -> Result<String, RenderError>;
}

/// [`QrEncoder`] followed by an [`ImageSink`].
pub struct QrImageRenderer {
    encoder: QrEncoder,
    sink: Arc<dyn ImageSink>,
}

impl QrImageRenderer {
    pub fn new(encoder: QrEncoder, sink: Arc<dyn ImageSink>) -> Self {
        Self { encoder, sink }
    }
}

#[async_trait]
impl ImageRenderer for QrImageRenderer {
    async fn render(&self, qr_code: &QrCode) -> Result<String, RenderError> {
        let encoder = self.encoder;
        let content = qr_code.content.clone();
        let png = tokio::task::spawn_blocking(move || encoder.encode_png(&content))
            .await
            .map_err(|e| RenderError::Task(e.to_string()))??;
        self.sink.store(&qr_code.id, &png).await
    }
}

/// Why rendering and recording an image for one QR code failed.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ImageStepError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("failed to record image path: {0}")]
    Record(#[from] office_db::StoreError),

    #[error("QR code no longer exists")]
    Missing,
}

/// Render `qr_code` and save the resulting path on its record.
pub(crate) async fn render_and_record(
    renderer: &dyn ImageRenderer,
    items: &dyn ItemStore,
    qr_code: &QrCode,
) -> Result<QrCode, ImageStepError> {
    let path = renderer.render(qr_code).await?;
    items
        .set_image_path(&qr_code.id, &path)
        .await?
        .ok_or(ImageStepError::Missing)
}
