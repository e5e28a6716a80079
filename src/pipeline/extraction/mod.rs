pub mod types;
pub mod preprocess;
pub mod ocr;
pub mod extractor;

pub use types::*;
pub use ocr::*;
pub use extractor::extract_text;
