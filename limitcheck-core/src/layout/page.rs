use std::path::PathBuf;

use serde::Serialize;

use crate::{analysis::classify::Verdict, layout::element::HeaderGroup};

/// Everything checked on one rasterized page.
#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    pub page: PathBuf,
    pub headers: Vec<HeaderGroup>,
    pub verdicts: Vec<Verdict>,
    pub annotated: PathBuf,
}

impl PageReport {
    pub fn passed(&self) -> usize {
        self.verdicts.iter().filter(|v| v.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.verdicts.len() - self.passed()
    }
}
