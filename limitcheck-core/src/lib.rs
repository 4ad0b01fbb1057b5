pub mod analysis;
pub mod consts;
pub mod error;
pub mod layout;
pub mod limits;
pub mod ocr;
pub mod parse;

// Re-export commonly used types
pub use analysis::classify::{Bound, MeasurementKind, Verdict};
pub use error::LimitCheckError;
pub use layout::{element::TextBox, page::PageReport};
pub use limits::{LimitEntry, LimitMapping, PrefixBinding, TemperatureRange};
pub use ocr::{OcrConfig, OcrEngine, TesseractCli};
pub use parse::{CheckerConfig, DiagramChecker, PdfRasterizer};
