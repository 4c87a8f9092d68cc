//! Extraction infrastructure - PDF decoding, OCR and upload dispatch

mod extractor;
mod ocr;
mod pdf;
mod tesseract;

pub use extractor::ContentExtractor;
pub use ocr::SharedOcrEngine;
pub use pdf::LopdfDecoder;
pub use tesseract::{TesseractEngine, TesseractLauncher};
