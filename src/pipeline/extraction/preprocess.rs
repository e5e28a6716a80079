//! Image preparation before OCR.
//!
//! The only transform is grayscale conversion. No resizing, deskewing or
//! denoising; tesseract binarises on its own.

use std::io::Cursor;

use image::{DynamicImage, GenericImageView, GrayImage, ImageOutputFormat};
use tracing::debug;

use crate::pipeline::RecognitionError;

/// Maximum input image size (in bytes) before rejecting.
const MAX_IMAGE_BYTES: usize = 50 * 1024 * 1024; // 50 MB

/// Minimum valid image size in bytes (smallest valid PNG is ~67 bytes).
const MIN_IMAGE_BYTES: usize = 67;

/// Size bounds check, run before decoding.
pub fn validate_image_bytes(bytes: &[u8]) -> Result<(), RecognitionError> {
    if bytes.len() < MIN_IMAGE_BYTES {
        return Err(RecognitionError::ImageDecode(
            "Image data too small to be valid".into(),
        ));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(RecognitionError::ImageDecode(format!(
            "Image data exceeds {}MB limit",
            MAX_IMAGE_BYTES / (1024 * 1024)
        )));
    }
    Ok(())
}

/// Decode any supported format into a single-channel raster.
pub fn decode_grayscale(bytes: &[u8]) -> Result<GrayImage, RecognitionError> {
    validate_image_bytes(bytes)?;
    let img = image::load_from_memory(bytes)
        .map_err(|e| RecognitionError::ImageDecode(format!("Failed to decode image: {e}")))?;
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Err(RecognitionError::ImageDecode("Image has no pixels".into()));
    }
    Ok(img.to_luma8())
}

/// Encode a grayscale raster as PNG (lossless, what the OCR engines read).
pub fn encode_png(img: &GrayImage) -> Result<Vec<u8>, RecognitionError> {
    let dynamic = DynamicImage::ImageLuma8(img.clone());
    let mut cursor = Cursor::new(Vec::new());
    dynamic
        .write_to(&mut cursor, ImageOutputFormat::Png)
        .map_err(|e| RecognitionError::Extraction(format!("PNG encoding failed: {e}")))?;
    Ok(cursor.into_inner())
}

/// Decode, convert to grayscale and re-encode as PNG.
pub fn prepare_for_ocr(bytes: &[u8]) -> Result<Vec<u8>, RecognitionError> {
    let gray = decode_grayscale(bytes)?;
    let png = encode_png(&gray)?;
    debug!(
        width = gray.width(),
        height = gray.height(),
        input_bytes = bytes.len(),
        png_bytes = png.len(),
        "Image converted to grayscale"
    );
    Ok(png)
}
