//! Extraction domain - uploaded files, OCR and PDF decoding seams

mod file;
mod ocr;
mod pdf;

pub use file::{ExtractedText, UploadedFile};
pub use ocr::{OcrEngine, OcrLauncher};
pub use pdf::PdfTextDecoder;

#[cfg(test)]
pub use ocr::mock::{MockOcrEngine, MockOcrLauncher};
#[cfg(test)]
pub use pdf::mock::FixedPdfDecoder;
