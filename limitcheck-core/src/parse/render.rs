use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use pdfium_render::prelude::{PdfRenderConfig, Pdfium};
use snafu::ResultExt;
use tracing::*;

use crate::{consts::*, error::*, parse::output::raw_images_dir};

/// Points per inch of PDF user space.
const PDF_POINTS_PER_INCH: f32 = 72.0;

/// Renders PDF pages to PNG files.
pub struct PdfRasterizer {
    pdfium: Pdfium,
    dpi: f32,
}

impl PdfRasterizer {
    /// Bind the pdfium library named by `PDFIUM_DYNAMIC_LIB_PATH`.
    pub fn from_env() -> Result<Self, LimitCheckError> {
        let pdfium_lib_path = std::env::var(PDFIUM_LIB_PATH_ENV_NAME).context(EnvNotFoundSnafu {
            name: PDFIUM_LIB_PATH_ENV_NAME,
        })?;

        let pdfium = Pdfium::new(
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                &pdfium_lib_path,
            ))
            .context(PdfiumSnafu {
                stage: "load-dyn-lib",
            })?,
        );

        Ok(Self {
            pdfium,
            dpi: RASTER_DPI,
        })
    }

    /// Render every page of `pdf` to `<out>/<stem>/<stem>_raw_images/page_<n>.png`
    /// (1-based) and return the written paths in page order.
    pub fn rasterize(&self, pdf: &Path, out: &Path) -> Result<Vec<PathBuf>, LimitCheckError> {
        let dir = raw_images_dir(pdf, out);
        fs::create_dir_all(&dir).context(IoWriteSnafu {
            path: dir.to_string_lossy(),
        })?;

        let document = self
            .pdfium
            .load_pdf_from_file(pdf, None)
            .context(PdfiumSnafu { stage: "load-pdf" })?;

        let render_config =
            PdfRenderConfig::new().scale_page_by_factor(self.dpi / PDF_POINTS_PER_INCH);

        let render_start = Instant::now();
        let mut pages = Vec::new();
        for (page_no, page) in document.pages().iter().enumerate() {
            let image = page
                .render_with_config(&render_config)
                .context(PdfiumSnafu { stage: "render" })?
                .as_image();

            let path = dir.join(format!("page_{}.png", page_no + 1));
            image.save(&path).context(ImageWriteSnafu {
                path: path.to_string_lossy(),
            })?;

            debug!("rendered page {} to {}", page_no + 1, path.display());
            pages.push(path);
        }

        info!(
            "rendered {} pages of {} in {}ms",
            pages.len(),
            pdf.display(),
            render_start.elapsed().as_millis()
        );
        Ok(pages)
    }
}
