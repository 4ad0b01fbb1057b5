/// Environment variable holding the path of the pdfium dynamic library.
pub const PDFIUM_LIB_PATH_ENV_NAME: &str = "PDFIUM_DYNAMIC_LIB_PATH";

/// Resolution at which PDF pages are rasterized.
pub const RASTER_DPI: f32 = 200.0;

/// Upscale factor applied to every page before OCR and before annotation.
///
/// Tesseract recognizes the small stencil text of P&ID drawings far better
/// at 4x. All pixel thresholds below are expressed in this scaled space.
pub const SCALE_FACTOR: f32 = 4.0;

/// Margin (px) by which a box is grown before the proximity test.
pub const MIN_BLOCK_DISTANCE: i32 = 10;

/// Padding (px) around a merged box when cropping it for the refine pass.
pub const BOX_PADDING: i32 = 7;

/// Extra upward padding (px) for the refine crop; OCR tends to clip ascenders.
pub const BOX_PADDING_TOP_EXTRA: i32 = 5;

/// Maximum difference (px) in y/height (same line) or x/width (same column)
/// for two boxes to be considered aligned.
pub const MIN_HEIGHT_DIFF: i32 = 7;

/// Maximum gap (px) between facing edges of two aligned boxes.
///
/// Used on the x axis for same-line merges and reused on the y axis for
/// same-column merges.
pub const MIN_HORI_DIFF_SAME_HEIGHT: i32 = 90;

/// Boxes whose top lies above this line (scaled px) are header candidates.
pub const HEADER_Y_CUTOFF: i32 = 1000;

/// Header groups with fewer characters than this are treated as noise.
pub const MIN_HEADER_CHARS: usize = 10;

/// Top-left corner of the region (title block / legend) excluded from checks.
pub const EXCLUSION_ORIGIN: (i32, i32) = (7000, 6500);

/// Ceiling used when no header on the page maps to a limit entry.
pub const DEFAULT_PSIG_CEILING: i64 = 10_000;

/// Refined texts shorter than this are dropped.
pub const MIN_REFINED_TEXT_CHARS: usize = 2;

/// Marker that identifies a pressure reading.
pub const PRESSURE_MARKER: &str = "PSIG";

/// Marker that identifies a temperature reading.
pub const TEMPERATURE_MARKER: &str = "F";

/// Character whitelist of the refine OCR pass.
pub const REFINE_WHITELIST: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-&.' ";

/// Suffix of the directory and file stem of annotated pages.
pub const ANALYZED_SUFFIX: &str = "_analyzed";

/// Suffix of the directory holding refine-pass debug images.
pub const BOXES_SUFFIX: &str = "_boxes";

/// Suffix of the directory holding rasterized pages.
pub const RAW_IMAGES_SUFFIX: &str = "_raw_images";

/// Rectangle stroke width (px) on annotated pages.
pub const ANNOTATION_THICKNESS: i32 = 6;

/// Rectangle stroke width (px) on refine-pass debug images.
pub const DEBUG_THICKNESS: i32 = 3;

/// Font size of annotation labels.
pub const LABEL_FONT_SIZE: f32 = 16.0;

/// Default prefix bindings: prefix and the limit-table row it reads.
pub const DEFAULT_PREFIX_BINDINGS: [(&str, usize); 4] = [("F-", 0), ("V-", 1), ("E-", 3), ("AC", 4)];
