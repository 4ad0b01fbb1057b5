use std::{
    io::{Cursor, Write},
    process::{Command, Stdio},
    time::Instant,
};

use image::{GrayImage, ImageFormat};
use snafu::ResultExt;
use tracing::*;

use super::{OcrConfig, OcrEngine};
use crate::{error::*, layout::element::TextBox};

/// TSV level of word rows.
const WORD_LEVEL: &str = "5";
/// Columns: level page block par line word left top width height conf text.
const TSV_COLUMNS: usize = 12;

/// Runs the `tesseract` executable, feeding images through stdin.
#[derive(Debug, Clone, Default)]
pub struct TesseractCli {
    config: OcrConfig,
}

impl TesseractCli {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OcrConfig {
        &self.config
    }

    fn run(&self, pass: &str, image: &GrayImage, extra: &[String]) -> Result<String, LimitCheckError> {
        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .context(ImageEncodeSnafu { stage: pass })?;

        let start = Instant::now();
        let mut child = Command::new(&self.config.program)
            .args(["stdin", "stdout"])
            .arg("--oem")
            .arg(self.config.engine_mode.to_string())
            .arg("--psm")
            .arg(self.config.segmentation_mode.to_string())
            .args(extra)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .context(OcrSpawnSnafu {
                program: self.config.program.clone(),
                pass,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&png).context(OcrSpawnSnafu {
                program: self.config.program.clone(),
                pass,
            })?;
        }

        let output = child.wait_with_output().context(OcrSpawnSnafu {
            program: self.config.program.clone(),
            pass,
        })?;

        if !output.status.success() {
            return Err(LimitCheckError::OcrFailed {
                pass: pass.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        debug!(
            "tesseract {pass} pass on {}x{} in {}ms",
            image.width(),
            image.height(),
            start.elapsed().as_millis()
        );

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl OcrEngine for TesseractCli {
    fn locate(&self, image: &GrayImage) -> Result<Vec<TextBox>, LimitCheckError> {
        let tsv = self.run("layout", image, &["tsv".to_string()])?;
        parse_tsv_words(&tsv)
    }

    fn recognize(&self, image: &GrayImage) -> Result<String, LimitCheckError> {
        let extra = [
            "-c".to_string(),
            format!("tessedit_char_whitelist={}", self.config.refine_whitelist),
            "-c".to_string(),
            "preserve_interword_spaces=1".to_string(),
        ];
        let text = self.run("refine", image, &extra)?;
        Ok(text.trim().to_string())
    }
}

/// Word boxes of a tesseract TSV report, skipping words with no text.
pub fn parse_tsv_words(tsv: &str) -> Result<Vec<TextBox>, LimitCheckError> {
    let mut words = Vec::new();

    for (idx, row) in tsv.lines().enumerate().skip(1) {
        let cols: Vec<&str> = row.split('\t').collect();
        if cols.len() < TSV_COLUMNS || cols[0] != WORD_LEVEL {
            continue;
        }

        let text = cols[11].trim();
        if text.is_empty() {
            continue;
        }

        let column = |col: usize| {
            cols[col]
                .trim()
                .parse::<i32>()
                .map_err(|e| LimitCheckError::OcrOutput {
                    pass: "layout".to_string(),
                    message: format!("line {}: column {} `{}`: {}", idx + 1, col, cols[col], e),
                })
        };

        words.push(TextBox::from_xywh(column(6)?, column(7)?, column(8)?, column(9)?, text));
    }

    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    #[test]
    fn test_parse_word_rows() {
        let tsv = format!(
            "{HEADER}\n\
             1\t1\t0\t0\t0\t0\t0\t0\t4000\t3000\t-1\t\n\
             5\t1\t1\t1\t1\t1\t120\t1500\t80\t30\t91.5\t150\n\
             5\t1\t1\t1\t1\t2\t210\t1500\t110\t30\t88.0\tPSIG\n\
             5\t1\t1\t1\t1\t3\t400\t1500\t10\t30\t12.0\t \n"
        );

        let words = parse_tsv_words(&tsv).unwrap();
        assert_eq!(
            words,
            vec![
                TextBox::from_xywh(120, 1500, 80, 30, "150"),
                TextBox::from_xywh(210, 1500, 110, 30, "PSIG"),
            ]
        );
    }

    #[test]
    fn test_bad_geometry_is_reported() {
        let tsv = format!("{HEADER}\n5\t1\t1\t1\t1\t1\tx\t0\t1\t1\t90\tA\n");
        assert!(matches!(
            parse_tsv_words(&tsv),
            Err(LimitCheckError::OcrOutput { .. })
        ));
    }

    #[test]
    fn test_empty_report() {
        assert!(parse_tsv_words("").unwrap().is_empty());
        assert!(parse_tsv_words(HEADER).unwrap().is_empty());
    }

    #[test]
    #[ignore = "requires the tesseract executable"]
    fn test_tesseract_reads_blank_page() {
        let engine = TesseractCli::default();
        let page = GrayImage::from_pixel(200, 100, image::Luma([255]));
        assert!(engine.locate(&page).unwrap().is_empty());
    }
}
