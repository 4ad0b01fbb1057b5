use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum LimitCheckError {
    #[snafu(display("Could not open or read image `{}`: {}", path, source))]
    UnreadableImage {
        source: image::ImageError,
        path: String,
    },
    #[snafu(display("Image Write error for `{}`: {}", path, source))]
    ImageWrite {
        source: image::ImageError,
        path: String,
    },
    #[snafu(display("Image Encode error at stage `{}`: {}", stage, source))]
    ImageEncode {
        source: image::ImageError,
        stage: String,
    },
    #[snafu(display("Write `{}` error: {}", path, source))]
    IoWrite {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Read `{}` error: {}", path, source))]
    IoRead {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Load Font error: {}", source))]
    Font { source: ab_glyph::InvalidFont },
    #[snafu(display("Environment `{}` Not Found, error {}", name, source))]
    EnvNotFound {
        source: std::env::VarError,
        name: String,
    },
    #[snafu(display("Pdfium `{}` error {}", stage, source))]
    Pdfium {
        source: pdfium_render::prelude::PdfiumError,
        stage: String,
    },
    #[snafu(display("Failed to invoke `{}` for the {} pass: {}", program, pass, source))]
    OcrSpawn {
        source: std::io::Error,
        program: String,
        pass: String,
    },
    #[snafu(display("OCR {} pass failed with {}: {}", pass, status, stderr))]
    OcrFailed {
        pass: String,
        status: String,
        stderr: String,
    },
    #[snafu(display("OCR {} pass produced unusable output: {}", pass, message))]
    OcrOutput { pass: String, message: String },
    #[snafu(display("Parse limits document `{}` error: {}", path, message))]
    Document { path: String, message: String },
    #[snafu(display(
        "Malformed limit row {} of table {}: {} cell `{}` {}",
        row,
        table,
        column,
        cell,
        message
    ))]
    MalformedLimitRow {
        table: usize,
        row: usize,
        column: String,
        cell: String,
        message: String,
    },
    #[snafu(display("Prefix `{}` is bound to {}, which is not in the limits document", prefix, selector))]
    MissingLimitEntry { prefix: String, selector: String },
    #[snafu(display("Invalid prefix binding `{}`: {}", binding, message))]
    InvalidBinding { binding: String, message: String },
    #[snafu(display("No number found before marker `{}`", marker))]
    NoNumberFound { marker: String },
}
