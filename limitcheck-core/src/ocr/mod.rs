//! Text recognition backends.
//!
//! Recognition runs in two passes: a layout pass that locates words on the
//! whole page, and a refine pass that re-reads each merged block with a
//! restricted alphabet.

pub mod tesseract;

use image::GrayImage;

use crate::{consts::REFINE_WHITELIST, error::LimitCheckError, layout::element::TextBox};

pub use tesseract::TesseractCli;

/// A text recognition backend.
pub trait OcrEngine {
    /// Locate words on a full page. Boxes are in the pixel space of `image`;
    /// boxes whose text is empty are not returned.
    fn locate(&self, image: &GrayImage) -> Result<Vec<TextBox>, LimitCheckError>;

    /// Read the text of a single cropped block.
    fn recognize(&self, image: &GrayImage) -> Result<String, LimitCheckError>;
}

/// Settings of the tesseract backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrConfig {
    /// Executable name or path.
    pub program: String,
    /// OCR engine mode (`--oem`).
    pub engine_mode: u8,
    /// Page segmentation mode (`--psm`).
    pub segmentation_mode: u8,
    /// Characters the refine pass may produce.
    pub refine_whitelist: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            program: "tesseract".to_string(),
            engine_mode: 3,
            segmentation_mode: 6,
            refine_whitelist: REFINE_WHITELIST.to_string(),
        }
    }
}
