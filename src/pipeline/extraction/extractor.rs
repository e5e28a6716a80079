use super::preprocess::prepare_for_ocr;
use super::types::OcrEngine;
use crate::pipeline::language::LanguageRegistry;
use crate::pipeline::RecognitionError;

/// Recognize the raw text of a menu photo.
///
/// The language is resolved before the image is touched, so an unknown
/// language fails without decoding anything. The returned text is the
/// engine output as-is, line breaks and noise included.
pub fn extract_text(
    engine: &dyn OcrEngine,
    registry: &LanguageRegistry,
    image_bytes: &[u8],
    lang: &str,
) -> Result<String, RecognitionError> {
    let profile = registry.profile(lang)?;
    let png = prepare_for_ocr(image_bytes)?;
    let result = engine.ocr_image_with_lang(&png, &profile.ocr_pack)?;

    tracing::debug!(
        engine = engine.name(),
        ocr_pack = %profile.ocr_pack,
        text_length = result.text.len(),
        confidence = ?result.confidence,
        "OCR complete"
    );

    Ok(result.text)
}
