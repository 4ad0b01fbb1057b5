//! Locations of the artifacts written next to a rasterized page.
//!
//! Pages live at `<root>/<root_name>_raw_images/page_<n>.png`; annotated and
//! debug images are written to sibling directories of `_raw_images`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use snafu::ResultExt;

use crate::{consts::*, error::*};

/// Directory receiving the rasters of `pdf`: `<out>/<stem>/<stem>_raw_images`.
pub fn raw_images_dir(pdf: &Path, out: &Path) -> PathBuf {
    let stem = file_stem(pdf);
    out.join(&stem).join(format!("{stem}{RAW_IMAGES_SUFFIX}"))
}

/// `<root>/<root_name>_analyzed/<stem>_analyzed.<ext>` for a page at
/// `<root>/<dir>/<stem>.<ext>`.
pub fn analyzed_path(page: &Path) -> PathBuf {
    let mut name = format!("{}{ANALYZED_SUFFIX}", file_stem(page));
    if let Some(ext) = page.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    sibling_dir(page, ANALYZED_SUFFIX).join(name)
}

/// `<root>/<root_name>_boxes/<file>` for a page at `<root>/<dir>/<file>`.
pub fn boxes_path(page: &Path) -> PathBuf {
    let name = page.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    sibling_dir(page, BOXES_SUFFIX).join(name)
}

/// Create the parent directory of `path` if needed.
pub fn ensure_parent(path: &Path) -> Result<(), LimitCheckError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).context(IoWriteSnafu {
                path: parent.to_string_lossy(),
            })
        }
        _ => Ok(()),
    }
}

fn sibling_dir(page: &Path, suffix: &str) -> PathBuf {
    let root = page
        .parent()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new(""));
    let root_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    root.join(format!("{root_name}{suffix}"))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_layout() {
        let dir = raw_images_dir(Path::new("/data/p&id/diagram.pdf"), Path::new("out"));
        assert_eq!(dir, PathBuf::from("out/diagram/diagram_raw_images"));
    }

    #[test]
    fn test_artifact_paths() {
        let page = Path::new("out/diagram/diagram_raw_images/page_1.png");

        assert_eq!(
            analyzed_path(page),
            PathBuf::from("out/diagram/diagram_analyzed/page_1_analyzed.png")
        );
        assert_eq!(
            boxes_path(page),
            PathBuf::from("out/diagram/diagram_boxes/page_1.png")
        );
    }

    #[test]
    fn test_shallow_page_path() {
        // no grandparent: artifacts land in the working directory
        let page = Path::new("page_2.png");
        assert_eq!(analyzed_path(page), PathBuf::from("_analyzed/page_2_analyzed.png"));
        assert_eq!(boxes_path(page), PathBuf::from("_boxes/page_2.png"));
    }
}
