use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;

use super::types::{OcrEngine, OcrPageResult};
use crate::pipeline::RecognitionError;

/// Tesseract via its command-line binary.
///
/// Each call writes the image to a private temp file, runs
/// `tesseract <file> stdout -l <lang>` and removes the file on return.
pub struct TesseractCli {
    binary: PathBuf,
    tessdata_dir: Option<PathBuf>,
}

impl TesseractCli {
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
            tessdata_dir: None,
        }
    }

    /// Use a specific tesseract executable.
    pub fn with_binary(mut self, binary: &Path) -> Self {
        self.binary = binary.to_path_buf();
        self
    }

    /// Directory holding `<lang>.traineddata` files.
    pub fn with_tessdata_dir(mut self, dir: &Path) -> Self {
        if dir.exists() {
            self.tessdata_dir = Some(dir.to_path_buf());
        } else {
            tracing::warn!(
                path = %dir.display(),
                "Tessdata directory not found, using tesseract default"
            );
        }
        self
    }

    /// Run `tesseract --version` and return the first line.
    pub fn probe(&self) -> Result<String, RecognitionError> {
        let output = Command::new(&self.binary)
            .arg("--version")
            .output()
            .map_err(|e| spawn_error(&self.binary, e))?;
        // Older releases print the version banner on stderr.
        let banner = if output.stdout.is_empty() {
            output.stderr
        } else {
            output.stdout
        };
        Ok(String::from_utf8_lossy(&banner)
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_string())
    }
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrEngine for TesseractCli {
    fn ocr_image_with_lang(
        &self,
        image_bytes: &[u8],
        lang: &str,
    ) -> Result<OcrPageResult, RecognitionError> {
        let mut input = tempfile::Builder::new()
            .prefix("menu-ocr-")
            .suffix(".png")
            .tempfile()?;
        input.write_all(image_bytes)?;
        input.flush()?;

        let mut cmd = Command::new(&self.binary);
        cmd.arg(input.path()).arg("stdout").arg("-l").arg(lang);
        if let Some(ref dir) = self.tessdata_dir {
            cmd.arg("--tessdata-dir").arg(dir);
        }

        let output = cmd.output().map_err(|e| spawn_error(&self.binary, e))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RecognitionError::Extraction(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(OcrPageResult {
            text: String::from_utf8_lossy(&output.stdout).into_owned(),
            confidence: None,
        })
    }

    fn name(&self) -> &'static str {
        "tesseract-cli"
    }
}

fn spawn_error(binary: &Path, e: std::io::Error) -> RecognitionError {
    RecognitionError::Extraction(format!("cannot run {}: {e}", binary.display()))
}

/// Bundled Tesseract OCR engine.
/// Only available when compiled with the `ocr` feature flag.
#[cfg(feature = "ocr")]
pub struct BundledTesseract {
    tessdata_dir: Option<PathBuf>,
}

#[cfg(feature = "ocr")]
impl BundledTesseract {
    /// `None` lets libtesseract use `TESSDATA_PREFIX` / its compiled-in path.
    pub fn new(tessdata_dir: Option<&Path>) -> Self {
        Self {
            tessdata_dir: tessdata_dir.map(Path::to_path_buf),
        }
    }
}

#[cfg(feature = "ocr")]
impl OcrEngine for BundledTesseract {
    fn ocr_image_with_lang(
        &self,
        image_bytes: &[u8],
        lang: &str,
    ) -> Result<OcrPageResult, RecognitionError> {
        let tessdata_str = match self.tessdata_dir {
            Some(ref dir) => Some(dir.to_str().ok_or_else(|| {
                RecognitionError::Extraction("Invalid tessdata path".into())
            })?),
            None => None,
        };

        let tess = tesseract::Tesseract::new(tessdata_str, Some(lang))
            .map_err(|e| RecognitionError::Extraction(format!("{e:?}")))?;

        let mut tess = tess
            .set_image_from_mem(image_bytes)
            .map_err(|e| RecognitionError::Extraction(format!("{e:?}")))?;

        let text = tess
            .get_text()
            .map_err(|e| RecognitionError::Extraction(format!("{e:?}")))?;

        let confidence = tess.mean_text_conf().max(0) as f32 / 100.0;

        Ok(OcrPageResult {
            text,
            confidence: Some(confidence),
        })
    }

    fn name(&self) -> &'static str {
        "tesseract-lib"
    }
}

/// Mock OCR engine for unit testing without Tesseract.
pub struct MockOcrEngine {
    pub text: String,
    fail: bool,
    langs_seen: Mutex<Vec<String>>,
}

impl MockOcrEngine {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            fail: false,
            langs_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new("")
        }
    }

    /// Language packs requested so far, in call order.
    pub fn langs_seen(&self) -> Vec<String> {
        self.langs_seen
            .lock()
            .map(|l| l.clone())
            .unwrap_or_default()
    }
}

impl OcrEngine for MockOcrEngine {
    fn ocr_image_with_lang(
        &self,
        _image_bytes: &[u8],
        lang: &str,
    ) -> Result<OcrPageResult, RecognitionError> {
        if let Ok(mut seen) = self.langs_seen.lock() {
            seen.push(lang.to_string());
        }
        if self.fail {
            return Err(RecognitionError::Extraction("Mock OCR failure".into()));
        }
        Ok(OcrPageResult {
            text: self.text.clone(),
            confidence: None,
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_ocr_returns_configured_text() {
        let engine = MockOcrEngine::new("Montag Suppe");
        let result = engine.ocr_image_with_lang(b"fake_image_bytes", "deu").unwrap();
        assert_eq!(result.text, "Montag Suppe");
        assert!(result.confidence.is_none());
    }

    #[test]
    fn mock_ocr_records_language_pack() {
        let engine = MockOcrEngine::new("x");
        engine.ocr_image_with_lang(b"fake", "deu").unwrap();
        engine.ocr_image_with_lang(b"fake", "eng").unwrap();
        assert_eq!(engine.langs_seen(), ["deu", "eng"]);
    }

    #[test]
    fn failing_mock_reports_extraction_error() {
        let engine = MockOcrEngine::failing();
        assert!(matches!(
            engine.ocr_image_with_lang(b"fake", "deu"),
            Err(RecognitionError::Extraction(_))
        ));
    }

    #[test]
    fn missing_binary_is_extraction_error() {
        let engine = TesseractCli::new().with_binary(Path::new("/nonexistent/tesseract-bin"));
        let err = engine.ocr_image_with_lang(b"fake", "deu").unwrap_err();
        assert!(matches!(err, RecognitionError::Extraction(ref m) if m.contains("cannot run")));
        assert!(matches!(engine.probe(), Err(RecognitionError::Extraction(_))));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_extraction_error() {
        // `false` ignores its arguments and exits 1.
        let engine = TesseractCli::new().with_binary(Path::new("false"));
        let err = engine.ocr_image_with_lang(b"fake", "deu").unwrap_err();
        assert!(matches!(err, RecognitionError::Extraction(ref m) if m.contains("exited")));
    }

    #[cfg(unix)]
    #[test]
    fn stdout_becomes_text() {
        // `echo` prints its arguments: the temp file path, "stdout", "-l", "deu".
        let engine = TesseractCli::new().with_binary(Path::new("echo"));
        let result = engine.ocr_image_with_lang(b"fake", "deu").unwrap();
        assert!(result.text.contains("menu-ocr-"));
        assert!(result.text.trim_end().ends_with("stdout -l deu"));
    }

    #[cfg(unix)]
    #[test]
    fn temp_input_is_removed_after_call() {
        let engine = TesseractCli::new().with_binary(Path::new("echo"));
        let result = engine.ocr_image_with_lang(b"fake", "deu").unwrap();
        let path = result.text.split_whitespace().next().unwrap().to_string();
        assert!(!Path::new(&path).exists());
    }

    #[test]
    fn missing_tessdata_dir_is_ignored() {
        let engine = TesseractCli::new().with_tessdata_dir(Path::new("/nonexistent/tessdata"));
        assert!(engine.tessdata_dir.is_none());
    }

    #[test]
    fn existing_tessdata_dir_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let engine = TesseractCli::new().with_tessdata_dir(dir.path());
        assert_eq!(engine.tessdata_dir.as_deref(), Some(dir.path()));
    }

    #[cfg(feature = "ocr")]
    #[test]
    fn bundled_tesseract_rejects_unknown_pack() {
        let dir = tempfile::tempdir().unwrap();
        let engine = BundledTesseract::new(Some(dir.path()));
        assert!(matches!(
            engine.ocr_image_with_lang(b"fake", "deu"),
            Err(RecognitionError::Extraction(_))
        ));
    }
}
