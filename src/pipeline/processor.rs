//! Menu recognition orchestrator: image → raw text → filtered text → menu.
//!
//! Synchronous and stateless per call. The registry and OCR engine are
//! shared read-only, so one recognizer can serve concurrent callers.

use std::sync::Arc;

use uuid::Uuid;

use super::extraction::{extract_text, OcrEngine};
use super::filter::filter_raw_text;
use super::language::LanguageRegistry;
use super::segmenter::segment_text;
use super::source::{ImageSource, StagedImage};
use super::tokenizer::Tokenizer;
use super::RecognitionError;
use crate::models::Menu;

pub struct MenuRecognizer {
    registry: Arc<LanguageRegistry>,
    ocr_engine: Box<dyn OcrEngine>,
}

impl MenuRecognizer {
    pub fn new(registry: Arc<LanguageRegistry>, ocr_engine: Box<dyn OcrEngine>) -> Self {
        Self {
            registry,
            ocr_engine,
        }
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    /// OCR the photo with the language's pack. Output is unfiltered.
    pub fn extract_text(&self, image_bytes: &[u8], lang: &str) -> Result<String, RecognitionError> {
        extract_text(&*self.ocr_engine, &self.registry, image_bytes, lang)
    }

    /// Strip the language's boilerplate substrings.
    pub fn filter_text(&self, raw: &str, lang: &str) -> Result<String, RecognitionError> {
        let filters = self.registry.filters(lang)?;
        Ok(filter_raw_text(raw, filters))
    }

    /// Segment already-filtered text into a menu.
    pub fn segment(&self, filtered: &str, lang: &str) -> Result<Menu, RecognitionError> {
        let entry = self.registry.get(lang)?;
        let kind = entry
            .tokenizer_kind()
            .ok_or_else(|| RecognitionError::UnsupportedLanguage(lang.to_string()))?;
        let tokenizer = kind.build();
        Ok(segment_text(
            filtered,
            &tokenizer as &dyn Tokenizer,
            &entry.weekdays,
        ))
    }

    /// Filter + segment raw OCR text.
    pub fn recognize_text(&self, raw: &str, lang: &str) -> Result<Menu, RecognitionError> {
        let filtered = self.filter_text(raw, lang)?;
        self.segment(&filtered, lang)
    }

    /// Full pipeline on in-memory image bytes.
    pub fn recognize_image(&self, image_bytes: &[u8], lang: &str) -> Result<Menu, RecognitionError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("recognize", %run_id, language = lang);
        let _guard = span.enter();

        let raw = self.extract_text(image_bytes, lang)?;
        let menu = self.recognize_text(&raw, lang)?;

        tracing::info!(
            engine = self.ocr_engine.name(),
            text_length = raw.len(),
            days_filled = menu.iter().filter(|(_, food)| !food.is_empty()).count(),
            "Menu recognized"
        );
        Ok(menu)
    }

    /// Fetch `bucket/name` into a scoped temp dir and run the full pipeline.
    /// The temp dir is removed before this returns, whatever the outcome.
    pub fn recognize_source(
        &self,
        source: &dyn ImageSource,
        bucket: &str,
        name: &str,
        lang: &str,
    ) -> Result<Menu, RecognitionError> {
        // Reject before downloading anything.
        self.registry.get(lang)?;

        let bytes = {
            let staged = StagedImage::stage(source, bucket, name)?;
            staged.read()?
        };
        self.recognize_image(&bytes, lang)
    }
}
