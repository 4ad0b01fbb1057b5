use tracing::*;

use crate::{analysis::bbox::Bbox, consts::*, layout::element::TextBox};

/// Thresholds controlling when two text boxes are merged.
///
/// All distances are in pixels of the (upscaled) raster the boxes were
/// detected on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterConfig {
    /// Margin by which the current box is grown before the proximity test.
    ///
    /// Fragments closer than this on both axes are merged unconditionally.
    pub block_margin: i32,

    /// Maximum y/height difference for a same-line merge, and maximum
    /// x/width difference for a same-column merge.
    pub align_tolerance: i32,

    /// Maximum distance between facing edges of two aligned boxes.
    ///
    /// Measured horizontally for same-line merges and vertically for
    /// same-column merges.
    pub edge_gap: i32,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            block_margin: MIN_BLOCK_DISTANCE,
            align_tolerance: MIN_HEIGHT_DIFF,
            edge_gap: MIN_HORI_DIFF_SAME_HEIGHT,
        }
    }
}

impl ClusterConfig {
    /// Whether `a` and `b` belong to the same text block under any predicate.
    pub fn should_merge(&self, a: &Bbox, b: &Bbox) -> bool {
        a.overlaps_or_close(b, self.block_margin) || self.same_line(a, b) || self.same_column(a, b)
    }

    /// Similar top and height, with facing left/right edges close together.
    pub fn same_line(&self, a: &Bbox, b: &Bbox) -> bool {
        let edges_close =
            (a.right() - b.x()).abs() < self.edge_gap || (b.right() - a.x()).abs() < self.edge_gap;

        edges_close
            && (a.y() - b.y()).abs() < self.align_tolerance
            && (a.height() - b.height()).abs() < self.align_tolerance
    }

    /// Similar left and width, with facing top/bottom edges close together.
    pub fn same_column(&self, a: &Bbox, b: &Bbox) -> bool {
        let edges_close = (a.bottom() - b.y()).abs() < self.edge_gap
            || (b.bottom() - a.y()).abs() < self.edge_gap;

        edges_close
            && (a.x() - b.x()).abs() < self.align_tolerance
            && (a.width() - b.width()).abs() < self.align_tolerance
    }
}

/// Merge OCR fragments into text blocks until no two blocks qualify for a
/// merge.
///
/// Each pass walks the current generation in index order. The working box of
/// an unconsumed entry absorbs every later unconsumed entry that satisfies
/// [`ClusterConfig::should_merge`] against the box as it has grown so far;
/// absorbed entries are consumed. Survivors form the next generation. A pass
/// that performs no merge ends the loop, so at most `n` passes run.
///
/// Texts are joined with a space in absorption order.
pub fn cluster_boxes(boxes: Vec<TextBox>, config: &ClusterConfig) -> Vec<TextBox> {
    let mut generation = boxes;
    let mut passes = 0usize;

    loop {
        passes += 1;
        let (next, merges) = merge_pass(generation, config);
        generation = next;

        debug!("cluster pass {passes}: {merges} merges, {} boxes", generation.len());
        if merges == 0 {
            break;
        }
    }

    generation
}

fn merge_pass(boxes: Vec<TextBox>, config: &ClusterConfig) -> (Vec<TextBox>, usize) {
    let mut pending: Vec<Option<TextBox>> = boxes.into_iter().map(Some).collect();
    let mut survivors = Vec::with_capacity(pending.len());
    let mut merges = 0;

    for i in 0..pending.len() {
        let Some(mut current) = pending[i].take() else {
            continue;
        };

        for slot in pending.iter_mut().skip(i + 1) {
            if let Some(candidate) =
                slot.take_if(|candidate| config.should_merge(&current.bbox, &candidate.bbox))
            {
                current = absorb_box(current, candidate);
                merges += 1;
            }
        }

        survivors.push(current);
    }

    (survivors, merges)
}

fn absorb_box(current: TextBox, other: TextBox) -> TextBox {
    let text = match (current.text.is_empty(), other.text.is_empty()) {
        (_, true) => current.text,
        (true, false) => other.text,
        (false, false) => format!("{} {}", current.text, other.text),
    };

    TextBox {
        bbox: current.bbox.union(&other.bbox),
        text,
    }
}
