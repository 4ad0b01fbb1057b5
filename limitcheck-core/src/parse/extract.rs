use image::{
    DynamicImage, GrayImage,
    imageops::{self, FilterType},
};
use tracing::*;

use crate::{
    analysis::{
        bbox::Bbox,
        cluster::{ClusterConfig, cluster_boxes},
    },
    consts::*,
    error::LimitCheckError,
    layout::element::TextBox,
    ocr::OcrEngine,
};

/// Crop geometry and filtering of the refine pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefineConfig {
    /// Padding added on every side of a block before cropping.
    pub padding: i32,
    /// Additional padding above the block.
    pub padding_top_extra: i32,
    /// Refined texts with fewer characters are dropped.
    pub min_chars: usize,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            padding: BOX_PADDING,
            padding_top_extra: BOX_PADDING_TOP_EXTRA,
            min_chars: MIN_REFINED_TEXT_CHARS,
        }
    }
}

/// Upscale a page with cubic interpolation. All downstream pixel thresholds
/// refer to the scaled image.
pub fn scale_page(image: &DynamicImage, scale: f32) -> DynamicImage {
    let width = (image.width() as f32 * scale) as u32;
    let height = (image.height() as f32 * scale) as u32;
    image.resize_exact(width.max(1), height.max(1), FilterType::CatmullRom)
}

/// Layout stage: locate words on the page and merge them into blocks,
/// ordered left to right.
pub fn locate_text_blocks(
    engine: &impl OcrEngine,
    page: &GrayImage,
    config: &ClusterConfig,
) -> Result<Vec<TextBox>, LimitCheckError> {
    let words = engine.locate(page)?;
    let word_count = words.len();

    let mut blocks = cluster_boxes(words, config);
    blocks.sort_by_key(|block| block.bbox.x());

    info!("{word_count} words merged into {} blocks", blocks.len());
    Ok(blocks)
}

/// Refine stage: re-read every block from a padded crop of the page.
///
/// The returned boxes keep the geometry of the merged block and carry the
/// refined text. Blocks whose refined text is too short are dropped.
pub fn refine_blocks(
    engine: &impl OcrEngine,
    page: &GrayImage,
    blocks: &[TextBox],
    config: &RefineConfig,
) -> Result<Vec<TextBox>, LimitCheckError> {
    let mut refined = Vec::with_capacity(blocks.len());

    for block in blocks {
        let Some(crop) = refine_crop(page, &block.bbox, config) else {
            debug!("block {:?} lies outside the page", block.bbox);
            continue;
        };

        let text = engine.recognize(&crop)?;
        if text.chars().count() < config.min_chars {
            debug!("drop block {:?}: refined text `{}`", block.bbox, text);
            continue;
        }

        refined.push(TextBox::new(block.bbox, text));
    }

    info!("{} of {} blocks kept after refinement", refined.len(), blocks.len());
    Ok(refined)
}

/// Padded crop of `bbox`, clamped to the page. Crops taller than wide are
/// rotated clockwise so vertical labels read horizontally.
pub fn refine_crop(page: &GrayImage, bbox: &Bbox, config: &RefineConfig) -> Option<GrayImage> {
    let x = (bbox.x() - config.padding).max(0);
    let y = (bbox.y() - config.padding - config.padding_top_extra).max(0);
    let padded = Bbox::from_xywh(
        x,
        y,
        bbox.width() + 2 * config.padding,
        bbox.height() + 2 * config.padding,
    );

    let page_bounds = Bbox::from_xywh(0, 0, page.width() as i32, page.height() as i32);
    let clamped = padded.clamp(page_bounds.min, page_bounds.max);
    if clamped.width() <= 0 || clamped.height() <= 0 {
        return None;
    }

    let crop = imageops::crop_imm(
        page,
        clamped.x() as u32,
        clamped.y() as u32,
        clamped.width() as u32,
        clamped.height() as u32,
    )
    .to_image();

    if crop.height() > crop.width() {
        Some(imageops::rotate90(&crop))
    } else {
        Some(crop)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use image::Luma;

    use super::*;

    /// Returns scripted words and records the size of every crop it reads.
    struct ScriptedOcr {
        words: Vec<TextBox>,
        texts: RefCell<Vec<&'static str>>,
        crops: RefCell<Vec<(u32, u32)>>,
    }

    impl OcrEngine for ScriptedOcr {
        fn locate(&self, _image: &GrayImage) -> Result<Vec<TextBox>, LimitCheckError> {
            Ok(self.words.clone())
        }

        fn recognize(&self, image: &GrayImage) -> Result<String, LimitCheckError> {
            self.crops.borrow_mut().push(image.dimensions());
            Ok(self.texts.borrow_mut().remove(0).to_string())
        }
    }

    fn blank(width: u32, height: u32) -> GrayImage {
        GrayImage::from_pixel(width, height, Luma([255]))
    }

    #[test]
    fn test_scale_page() {
        let page = DynamicImage::ImageLuma8(blank(30, 20));
        let scaled = scale_page(&page, SCALE_FACTOR);
        assert_eq!((scaled.width(), scaled.height()), (120, 80));
    }

    #[test]
    fn test_crop_is_padded_and_clamped() {
        let page = blank(1000, 1000);
        let config = RefineConfig::default();

        let crop = refine_crop(&page, &Bbox::from_xywh(100, 100, 200, 40), &config).unwrap();
        assert_eq!(crop.dimensions(), (214, 54));

        // clamped at the top-left corner; the height start moves but the size does not
        let crop = refine_crop(&page, &Bbox::from_xywh(2, 3, 200, 40), &config).unwrap();
        assert_eq!(crop.dimensions(), (214, 54));

        // clamped at the bottom-right corner
        let crop = refine_crop(&page, &Bbox::from_xywh(900, 980, 100, 20), &config).unwrap();
        assert_eq!(crop.dimensions(), (107, 32));
    }

    #[test]
    fn test_tall_crop_is_rotated() {
        let page = blank(1000, 1000);
        let crop = refine_crop(&page, &Bbox::from_xywh(100, 100, 20, 200), &RefineConfig::default())
            .unwrap();
        assert_eq!(crop.dimensions(), (214, 34));
    }

    #[test]
    fn test_crop_outside_page() {
        let page = blank(100, 100);
        assert!(refine_crop(&page, &Bbox::from_xywh(500, 500, 10, 10), &RefineConfig::default()).is_none());
    }

    #[test]
    fn test_two_stage_extraction() {
        let page = blank(2000, 2000);
        let engine = ScriptedOcr {
            words: vec![
                TextBox::from_xywh(900, 1200, 60, 30, "PSIG"),
                TextBox::from_xywh(820, 1200, 70, 30, "150"),
                TextBox::from_xywh(100, 1500, 40, 30, "|"),
            ],
            texts: RefCell::new(vec!["I", "150 PSIG"]),
            crops: RefCell::new(Vec::new()),
        };

        let blocks = locate_text_blocks(&engine, &page, &ClusterConfig::default()).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].bbox.x(), 100);
        assert_eq!(blocks[1].bbox, Bbox::from_xywh(820, 1200, 140, 30));

        let refined = refine_blocks(&engine, &page, &blocks, &RefineConfig::default()).unwrap();
        assert_eq!(refined, vec![TextBox::from_xywh(820, 1200, 140, 30, "150 PSIG")]);
        assert_eq!(engine.crops.borrow().len(), 2);
    }
}
