use serde::Serialize;

use crate::analysis::bbox::Bbox;

/// A detected text region with the text recognized inside it.
#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct TextBox {
    pub bbox: Bbox,
    pub text: String,
}

impl TextBox {
    pub fn new(bbox: Bbox, text: impl Into<String>) -> Self {
        Self {
            bbox,
            text: text.into(),
        }
    }

    pub fn from_xywh(x: i32, y: i32, w: i32, h: i32, text: impl Into<String>) -> Self {
        Self::new(Bbox::from_xywh(x, y, w, h), text)
    }
}

/// A wrapped multi-line header label, collapsed into one box.
#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct HeaderGroup {
    pub bbox: Bbox,
    /// Member texts joined by a single space, top to bottom.
    pub text: String,
    pub members: usize,
}
