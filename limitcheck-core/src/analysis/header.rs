use crate::{
    consts::*,
    layout::element::{HeaderGroup, TextBox},
};

/// Configuration of header grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderConfig {
    /// Groups whose joined text is shorter than this are discarded.
    pub min_chars: usize,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            min_chars: MIN_HEADER_CHARS,
        }
    }
}

impl HeaderConfig {
    /// A header candidate sits above `cutoff_y` and is not a bare number
    /// (sheet numbers and grid references are purely numeric).
    pub fn is_header(&self, text_box: &TextBox, cutoff_y: i32) -> bool {
        text_box.bbox.y() < cutoff_y && !is_numeric(&text_box.text)
    }
}

fn is_numeric(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit())
}

/// Group the boxes above `cutoff_y` into wrapped multi-line labels.
///
/// Boxes are visited top to bottom. A box joins the first group whose first
/// member has its horizontal midpoint strictly inside the box's horizontal
/// span, so continuation lines hang under the column of the label's first
/// line. Groups shorter than `min_chars` are dropped.
pub fn group_headers<'a>(
    boxes: impl IntoIterator<Item = &'a TextBox>,
    cutoff_y: i32,
    config: &HeaderConfig,
) -> Vec<HeaderGroup> {
    let mut sorted: Vec<&TextBox> = boxes
        .into_iter()
        .filter(|b| config.is_header(b, cutoff_y))
        .collect();
    sorted.sort_by_key(|b| b.bbox.y());

    let mut groups: Vec<Vec<&TextBox>> = Vec::new();
    for text_box in sorted {
        let span = (2 * text_box.bbox.x() as i64, 2 * text_box.bbox.right() as i64);

        let anchored = groups.iter_mut().find(|group| {
            let mid = group[0].bbox.double_center_x();
            span.0 < mid && mid < span.1
        });

        match anchored {
            Some(group) => group.push(text_box),
            None => groups.push(vec![text_box]),
        }
    }

    groups
        .into_iter()
        .map(|members| collapse(&members))
        .filter(|group| group.text.chars().count() >= config.min_chars)
        .collect()
}

fn collapse(members: &[&TextBox]) -> HeaderGroup {
    let bbox = members
        .iter()
        .skip(1)
        .fold(members[0].bbox, |acc, b| acc.union(&b.bbox));
    let text = members
        .iter()
        .map(|b| b.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    HeaderGroup {
        bbox,
        text,
        members: members.len(),
    }
}
