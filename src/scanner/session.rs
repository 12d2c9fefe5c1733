use std::future::Future;
use std::path::Path;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::scanner::extract_baggage_code;

/// Why a scan produced no code.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The camera or other frame source failed.
    #[error("Unable to access camera: {0}")]
    Source(String),

    /// The selected file is not an image.
    #[error("Please select a valid image file")]
    NotAnImage,

    /// The image decoded, but holds no QR code.
    #[error("No QR code found in the image")]
    NoCodeFound,

    /// The decoder failed on the image.
    #[error("Failed to scan QR code from image: {0}")]
    Decode(String),

    /// The scan was cancelled before a code was found.
    #[error("Scan cancelled")]
    Cancelled,

    /// The session was already stopped.
    #[error("Capture already stopped")]
    Stopped,

    /// The image file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Decodes the QR code contained in an encoded image, if any.
pub trait QrDecoder: Send + Sync {
    fn decode(&self, image: &[u8]) -> Result<Option<String>, ScanError>;
}

/// A stream of captured frames, e.g. a camera.
pub trait FrameSource: Send {
    /// Waits for the next frame, as encoded image bytes.
    fn next_frame(&mut self) -> impl Future<Output = Result<Vec<u8>, ScanError>> + Send;

    /// Releases the device. Called exactly once by [`ScanSession`].
    fn stop(&mut self);
}

/// An open capture. The source is stopped when a scan finishes, fails or
/// is cancelled, and at the latest when the session is dropped.
pub struct ScanSession<F: FrameSource> {
    source: F,
    stopped: bool,
}

impl<F: FrameSource> ScanSession<F> {
    /// Takes ownership of a started frame source.
    pub fn start(source: F) -> Self {
        tracing::debug!("📷 Capture started");
        Self {
            source,
            stopped: false,
        }
    }

    /// Whether the source is still running.
    pub fn is_active(&self) -> bool {
        !self.stopped
    }

    /// Reads frames until one holds a QR code or `cancel` fires.
    ///
    /// Frames without a code, or that fail to decode, are skipped. The
    /// source is stopped before this returns, whatever the outcome.
    pub async fn scan<D: QrDecoder + ?Sized>(
        &mut self,
        decoder: &D,
        cancel: &CancellationToken,
    ) -> Result<String, ScanError> {
        if self.stopped {
            return Err(ScanError::Stopped);
        }

        let outcome = loop {
            let frame = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                frame = self.source.next_frame() => Some(frame),
            };

            let Some(frame) = frame else {
                tracing::debug!("Scan cancelled");
                break Err(ScanError::Cancelled);
            };

            let frame = match frame {
                Ok(frame) => frame,
                Err(e) => break Err(e),
            };

            match decoder.decode(&frame) {
                Ok(Some(raw)) => break Ok(extract_baggage_code(&raw)),
                Ok(None) => continue,
                Err(e) => {
                    tracing::debug!("Frame skipped: {}", e);
                    continue;
                }
            }
        };

        self.stop();
        outcome
    }

    /// Stops the source. Further calls do nothing.
    pub fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.source.stop();
            tracing::debug!("📷 Capture stopped");
        }
    }
}

impl<F: FrameSource> Drop for ScanSession<F> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Scans an uploaded image. The content is sniffed; the file name is not
/// trusted.
pub fn scan_image<D: QrDecoder + ?Sized>(image: &[u8], decoder: &D) -> Result<String, ScanError> {
    if !infer::is_image(image) {
        return Err(ScanError::NotAnImage);
    }

    match decoder.decode(image)? {
        Some(raw) => Ok(extract_baggage_code(&raw)),
        None => Err(ScanError::NoCodeFound),
    }
}

/// Reads and scans an image file.
pub async fn scan_image_file<D: QrDecoder + ?Sized>(
    path: impl AsRef<Path>,
    decoder: &D,
) -> Result<String, ScanError> {
    let image = tokio::fs::read(path.as_ref()).await?;
    scan_image(&image, decoder)
}
