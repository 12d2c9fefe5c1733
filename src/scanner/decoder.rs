use crate::scanner::session::{QrDecoder, ScanError};

/// Decodes QR codes from PNG or JPEG bytes with `rqrr`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RqrrDecoder;

impl QrDecoder for RqrrDecoder {
    fn decode(&self, image: &[u8]) -> Result<Option<String>, ScanError> {
        let luma = image::load_from_memory(image)
            .map_err(|e| ScanError::Decode(e.to_string()))?
            .to_luma8();
        let (width, height) = luma.dimensions();

        let mut prepared =
            rqrr::PreparedImage::prepare_from_greyscale(width as usize, height as usize, |x, y| {
                luma.get_pixel(x as u32, y as u32).0[0]
            });

        for grid in prepared.detect_grids() {
            match grid.decode() {
                Ok((_, content)) => return Ok(Some(content)),
                Err(e) => tracing::debug!("QR grid skipped: {:?}", e),
            }
        }

        Ok(None)
    }
}
