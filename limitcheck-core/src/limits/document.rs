use std::{fs, io::Cursor, path::Path};

use snafu::ResultExt;
use tracing::*;

use super::{LimitEntry, TemperatureRange};
use crate::error::*;

const NAME_COLUMN: usize = 0;
const PSIG_COLUMN: usize = 1;
const TEMPERATURE_COLUMN: usize = 2;

const RANGE_SEPARATOR: &str = " to ";

/// Read every limits table of a `.docx` document, in document order.
///
/// The first row of each table is its header and is skipped.
pub fn extract_limits_from_docx(path: impl AsRef<Path>) -> Result<Vec<LimitEntry>, LimitCheckError> {
    let path = path.as_ref();
    let path_str = path.display().to_string();

    let bytes = fs::read(path).context(IoReadSnafu {
        path: path_str.clone(),
    })?;

    let doc = docx_lite::parse_document(Cursor::new(bytes)).map_err(|e| LimitCheckError::Document {
        path: path_str.clone(),
        message: e.to_string(),
    })?;

    let tables: Vec<Vec<Vec<String>>> = doc.tables.iter().map(table_cells).collect();
    info!("limits document `{}`: {} tables", path_str, tables.len());

    let mut limits = Vec::new();
    for (idx, table) in tables.iter().enumerate() {
        limits.extend(parse_limit_table(idx, table)?);
    }

    Ok(limits)
}

fn table_cells(table: &docx_lite::Table) -> Vec<Vec<String>> {
    table
        .rows
        .iter()
        .map(|row| {
            row.cells
                .iter()
                .map(|cell| {
                    cell.paragraphs
                        .iter()
                        .map(|para| para.to_text())
                        .collect::<Vec<_>>()
                        .join(" ")
                        .trim()
                        .to_string()
                })
                .collect()
        })
        .collect()
}

/// Parse the body rows of one limits table.
///
/// Column 0 holds the entry name, column 1 the pressure rating in psig and
/// column 2 the temperature, written either as `<high>` or `<low> to <high>`.
/// Any body row that does not parse, blank rows included, is an error.
pub fn parse_limit_table(
    table: usize,
    rows: &[Vec<String>],
) -> Result<Vec<LimitEntry>, LimitCheckError> {
    let mut limits = Vec::with_capacity(rows.len().saturating_sub(1));

    for (row, cells) in rows.iter().enumerate().skip(1) {
        let cell = |column: usize, label: &str| {
            cells.get(column).ok_or_else(|| LimitCheckError::MalformedLimitRow {
                table,
                row,
                column: label.to_string(),
                cell: String::new(),
                message: format!("row has only {} cells", cells.len()),
            })
        };

        let name = cell(NAME_COLUMN, "name")?.trim().to_string();

        let psig_cell = cell(PSIG_COLUMN, "psig")?;
        let psig = psig_cell
            .trim()
            .parse::<i64>()
            .map_err(|e| LimitCheckError::MalformedLimitRow {
                table,
                row,
                column: "psig".to_string(),
                cell: psig_cell.clone(),
                message: e.to_string(),
            })?;

        let temperature_cell = cell(TEMPERATURE_COLUMN, "temperature")?;
        let temperature =
            parse_temperature(temperature_cell).map_err(|message| LimitCheckError::MalformedLimitRow {
                table,
                row,
                column: "temperature".to_string(),
                cell: temperature_cell.clone(),
                message,
            })?;

        limits.push(LimitEntry {
            name,
            psig,
            temperature,
        });
    }

    Ok(limits)
}

/// `"150"` is an upper bound only; `"-20 to 150"` is a closed range.
pub fn parse_temperature(cell: &str) -> Result<TemperatureRange, String> {
    let bound = |text: &str| -> Result<f64, String> {
        let text = text.trim();
        let value = text.parse::<f64>().map_err(|e| format!("`{text}`: {e}"))?;
        if !value.is_finite() {
            return Err(format!("`{text}` is not a finite temperature"));
        }
        Ok(value)
    };

    let parts: Vec<&str> = cell.split(RANGE_SEPARATOR).collect();
    match parts.as_slice() {
        [high] => Ok(TemperatureRange::at_most(bound(high)?)),
        [low, high] => {
            let (low, high) = (bound(low)?, bound(high)?);
            if low > high {
                return Err(format!("lower bound {low} exceeds upper bound {high}"));
            }
            Ok(TemperatureRange::new(low, high))
        }
        _ => Err(format!("expected at most one `{}`", RANGE_SEPARATOR.trim())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_parse_table_skips_header_row() {
        let table = rows(&[
            &["Service", "Design Pressure (psig)", "Design Temperature (F)"],
            &["Flare", "200", "-20 to 150"],
            &["Vessel", " 150 ", "100"],
        ]);

        let limits = parse_limit_table(0, &table).unwrap();
        assert_eq!(limits.len(), 2);
        assert_eq!(limits[0].name, "Flare");
        assert_eq!(limits[0].psig, 200);
        assert_eq!(limits[0].temperature, TemperatureRange::new(-20.0, 150.0));
        assert_eq!(limits[1].psig, 150);
        assert_eq!(limits[1].temperature, TemperatureRange::at_most(100.0));
    }

    #[test]
    fn test_blank_row_is_malformed() {
        let table = rows(&[&["h", "h", "h"], &["", " ", ""], &["Piping", "300", "400"]]);
        assert!(matches!(
            parse_limit_table(1, &table),
            Err(LimitCheckError::MalformedLimitRow { table: 1, row: 1, ref column, .. }) if column == "psig"
        ));
    }

    #[test]
    fn test_malformed_cells() {
        let bad_psig = rows(&[&["h", "h", "h"], &["Flare", "two hundred", "150"]]);
        assert!(matches!(
            parse_limit_table(2, &bad_psig),
            Err(LimitCheckError::MalformedLimitRow { table: 2, row: 1, ref column, .. }) if column == "psig"
        ));

        let short_row = rows(&[&["h", "h", "h"], &["Flare", "200"]]);
        assert!(matches!(
            parse_limit_table(0, &short_row),
            Err(LimitCheckError::MalformedLimitRow { ref column, .. }) if column == "temperature"
        ));
    }

    #[test]
    fn test_parse_temperature() {
        assert_eq!(
            parse_temperature("0 to 100").unwrap(),
            TemperatureRange::new(0.0, 100.0)
        );
        assert_eq!(
            parse_temperature("650.5").unwrap(),
            TemperatureRange::at_most(650.5)
        );
        assert!(parse_temperature("100 to 0").is_err());
        assert!(parse_temperature("1 to 2 to 3").is_err());
        assert!(parse_temperature("hot").is_err());
        assert!(parse_temperature("inf").is_err());
        assert!(parse_temperature("").is_err());
    }

    #[test]
    fn test_missing_document_names_path() {
        let path = Path::new("no-such-dir").join("limits.docx");
        match extract_limits_from_docx(&path) {
            Err(LimitCheckError::IoRead { path: reported, .. }) => {
                assert_eq!(reported, path.display().to_string())
            }
            other => panic!("expected IoRead, got {other:?}"),
        }
    }

    #[test]
    fn test_header_only_table() {
        let table = rows(&[&["Service", "psig", "F"]]);
        assert!(parse_limit_table(0, &table).unwrap().is_empty());
        assert!(parse_limit_table(0, &[]).unwrap().is_empty());
    }
}
