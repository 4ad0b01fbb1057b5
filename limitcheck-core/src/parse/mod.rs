pub mod annotate;
pub mod checker;
pub mod extract;
pub mod output;
pub mod render;

pub use checker::{CheckerConfig, DiagramChecker};
pub use render::PdfRasterizer;
