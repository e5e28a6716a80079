pub mod language;
pub mod tokenizer;
pub mod filter;
pub mod segmenter;
pub mod extraction;
pub mod source;
pub mod processor;

pub use filter::filter_raw_text;
pub use language::{LanguageProfile, LanguageRegistry, WeekdaySet};
pub use processor::MenuRecognizer;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecognitionError {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Cannot decode image: {0}")]
    ImageDecode(String),

    #[error("OCR failed: {0}")]
    Extraction(String),

    #[error("Image source error: {0}")]
    Source(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
