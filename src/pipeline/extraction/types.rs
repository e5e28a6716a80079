use serde::{Deserialize, Serialize};

use crate::pipeline::RecognitionError;

/// Raw OCR result from the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrPageResult {
    pub text: String,
    /// Mean confidence in 0.0-1.0, when the engine reports one.
    pub confidence: Option<f32>,
}

/// OCR engine abstraction (allows mocking for tests)
pub trait OcrEngine: Send + Sync {
    /// Recognize text in an encoded image using the given language pack (e.g. "deu").
    fn ocr_image_with_lang(
        &self,
        image_bytes: &[u8],
        lang: &str,
    ) -> Result<OcrPageResult, RecognitionError>;

    /// Short engine name for logs.
    fn name(&self) -> &'static str;
}
