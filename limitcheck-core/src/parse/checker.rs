use std::{path::Path, time::Instant};

use snafu::ResultExt;
use tracing::*;

use crate::{
    analysis::{
        classify::{CheckConfig, classify_boxes},
        cluster::ClusterConfig,
        header::{HeaderConfig, group_headers},
    },
    consts::*,
    error::*,
    layout::page::PageReport,
    limits::LimitMapping,
    ocr::OcrEngine,
    parse::{
        annotate::{Annotator, save_image},
        extract::{RefineConfig, locate_text_blocks, refine_blocks, scale_page},
        output::{analyzed_path, boxes_path},
    },
};

#[derive(Debug, Clone, PartialEq)]
pub struct CheckerConfig {
    /// Upscale factor applied to the page before OCR.
    pub scale: f32,
    /// Line in scaled pixels separating the header band from the diagram.
    /// Header grouping and the measurement check both read it.
    pub header_cutoff: i32,
    pub cluster: ClusterConfig,
    pub refine: RefineConfig,
    pub header: HeaderConfig,
    pub check: CheckConfig,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            scale: SCALE_FACTOR,
            header_cutoff: HEADER_Y_CUTOFF,
            cluster: ClusterConfig::default(),
            refine: RefineConfig::default(),
            header: HeaderConfig::default(),
            check: CheckConfig::default(),
        }
    }
}

impl CheckerConfig {
    /// Move the line separating the header band from the diagram.
    pub fn with_header_cutoff(mut self, cutoff_y: i32) -> Self {
        self.header_cutoff = cutoff_y;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

/// Checks rasterized diagram pages against a limit mapping.
pub struct DiagramChecker<E> {
    engine: E,
    mapping: LimitMapping,
    annotator: Annotator,
    config: CheckerConfig,
}

impl<E: OcrEngine> DiagramChecker<E> {
    pub fn new(engine: E, mapping: LimitMapping, annotator: Annotator, config: CheckerConfig) -> Self {
        Self {
            engine,
            mapping,
            annotator,
            config,
        }
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Run both OCR stages on one page, check its measurements and write the
    /// refine-pass debug image and the annotated page.
    pub fn check_page(&self, page: &Path) -> Result<PageReport, LimitCheckError> {
        let start = Instant::now();
        info!("start processing `{}`", page.display());

        let image = image::open(page).context(UnreadableImageSnafu {
            path: page.to_string_lossy(),
        })?;
        let scaled = scale_page(&image, self.config.scale);
        let gray = scaled.to_luma8();

        info!("locating text blocks");
        let blocks = locate_text_blocks(&self.engine, &gray, &self.config.cluster)?;
        let refined = refine_blocks(&self.engine, &gray, &blocks, &self.config.refine)?;

        let mut boxes_img = scaled.to_rgb8();
        self.annotator.draw_refined(&mut boxes_img, &refined);
        save_image(&boxes_img, &boxes_path(page))?;

        info!("comparing with limits");
        let cutoff_y = self.config.header_cutoff;
        let headers = group_headers(&refined, cutoff_y, &self.config.header);
        let header_texts: Vec<&str> = headers.iter().map(|h| h.text.as_str()).collect();
        for header in &header_texts {
            debug!("header `{header}`");
        }

        let verdicts = classify_boxes(
            &header_texts,
            &self.mapping,
            &refined,
            cutoff_y,
            &self.config.check,
        );

        let mut annotated_img = scaled.to_rgb8();
        self.annotator
            .draw_verdicts(&mut annotated_img, &headers, &verdicts);
        let annotated = analyzed_path(page);
        save_image(&annotated_img, &annotated)?;

        let report = PageReport {
            page: page.to_path_buf(),
            headers,
            verdicts,
            annotated,
        };

        info!(
            "finished `{}`: {} passed, {} failed in {}ms",
            page.display(),
            report.passed(),
            report.failed(),
            start.elapsed().as_millis()
        );
        Ok(report)
    }
}
