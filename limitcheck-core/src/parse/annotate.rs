use std::{fs, path::Path};

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::{
    drawing::{draw_hollow_rect_mut, draw_text_mut},
    rect::Rect,
};
use snafu::ResultExt;
use tracing::*;

use crate::{
    analysis::{bbox::Bbox, classify::Verdict},
    consts::*,
    error::*,
    layout::element::{HeaderGroup, TextBox},
    parse::output::ensure_parent,
};

pub const HEADER_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
pub const PASS_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const FAIL_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const REFINE_COLOR: Rgb<u8> = Rgb([0, 0, 255]);

/// Label distance (px) above the top edge of a box.
const LABEL_OFFSET: i32 = 10;

/// Draws outlined boxes, and their labels when a font was loaded.
pub struct Annotator {
    font: Option<FontVec>,
    scale: PxScale,
}

impl Default for Annotator {
    fn default() -> Self {
        Self::without_labels()
    }
}

impl Annotator {
    /// Outlines only.
    pub fn without_labels() -> Self {
        Self {
            font: None,
            scale: PxScale::from(LABEL_FONT_SIZE),
        }
    }

    /// Outlines labelled with the TrueType/OpenType font at `path`.
    pub fn with_font_file(path: impl AsRef<Path>) -> Result<Self, LimitCheckError> {
        let path = path.as_ref();
        let data = fs::read(path).context(IoReadSnafu {
            path: path.to_string_lossy(),
        })?;
        let font = FontVec::try_from_vec(data).context(FontSnafu {})?;

        Ok(Self {
            font: Some(font),
            scale: PxScale::from(LABEL_FONT_SIZE),
        })
    }

    pub fn draw_box(&self, img: &mut RgbImage, bbox: &Bbox, label: &str, color: Rgb<u8>, thickness: i32) {
        let (x, y) = (bbox.x(), bbox.y());
        let (width, height) = (bbox.width(), bbox.height());

        if width <= 0 || height <= 0 {
            return;
        }

        for offset in 0..thickness {
            let thick_rect = Rect::at(x - offset, y - offset)
                .of_size((width + offset * 2) as u32, (height + offset * 2) as u32);
            draw_hollow_rect_mut(img, thick_rect, color);
        }

        if let Some(font) = &self.font {
            draw_text_mut(img, color, x, y - LABEL_OFFSET, self.scale, font, label);
        }
    }

    /// Outline every refined block with its text.
    pub fn draw_refined(&self, img: &mut RgbImage, blocks: &[TextBox]) {
        for block in blocks {
            self.draw_box(img, &block.bbox, &block.text, REFINE_COLOR, DEBUG_THICKNESS);
        }
    }

    /// Outline header groups and checked measurements.
    pub fn draw_verdicts(&self, img: &mut RgbImage, headers: &[HeaderGroup], verdicts: &[Verdict]) {
        for header in headers {
            self.draw_box(img, &header.bbox, &header.text, HEADER_COLOR, ANNOTATION_THICKNESS);
        }

        for verdict in verdicts {
            let color = if verdict.passed { PASS_COLOR } else { FAIL_COLOR };
            self.draw_box(img, &verdict.bbox, &verdict.text, color, ANNOTATION_THICKNESS);
        }
    }
}

/// Save `img`, creating its directory first.
pub fn save_image(img: &RgbImage, path: &Path) -> Result<(), LimitCheckError> {
    ensure_parent(path)?;
    img.save(path).context(ImageWriteSnafu {
        path: path.to_string_lossy(),
    })?;
    info!("saved {}", path.display());
    Ok(())
}
