use std::fmt;

use glam::IVec2;
use serde::Serialize;
use tracing::*;

use crate::{
    analysis::{bbox::Bbox, number::extract_number},
    consts::*,
    error::LimitCheckError,
    layout::element::TextBox,
    limits::{LimitMapping, TemperatureRange, resolve_pressure_ceiling, resolve_temperature_range},
};

/// Placement rules of the measurement check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckConfig {
    /// Top-left corner of the bottom-right region (title block) that is
    /// never checked.
    pub exclusion_origin: IVec2,
    /// Pressure ceiling applied when no header maps to a limit entry.
    pub default_psig_ceiling: i64,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            exclusion_origin: IVec2::new(EXCLUSION_ORIGIN.0, EXCLUSION_ORIGIN.1),
            default_psig_ceiling: DEFAULT_PSIG_CEILING,
        }
    }
}

impl CheckConfig {
    /// Diagram boxes lie on or below `cutoff_y` and outside the title block.
    pub fn is_diagram_box(&self, bbox: &Bbox, cutoff_y: i32) -> bool {
        let excluded = bbox.y() >= self.exclusion_origin.y && bbox.x() >= self.exclusion_origin.x;
        bbox.y() >= cutoff_y && !excluded
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementKind {
    Pressure,
    Temperature,
}

/// The limit a measurement was compared against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Bound {
    Ceiling { psig: i64 },
    Range(TemperatureRange),
}

impl Bound {
    pub fn admits(&self, measured: i64) -> bool {
        match self {
            Bound::Ceiling { psig } => measured <= *psig,
            Bound::Range(range) => range.contains(measured as f64),
        }
    }
}

/// Outcome of checking one diagram box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub kind: MeasurementKind,
    pub measured: i64,
    pub bound: Bound,
    pub passed: bool,
    pub bbox: Bbox,
    pub text: String,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=======================")?;
        match self.bound {
            Bound::Ceiling { psig } => {
                writeln!(f, "Comparing PSIG:")?;
                writeln!(f, "Standard PSIG: {psig}")?;
                writeln!(f, "Actual PSIG: {}", self.measured)?;
            }
            Bound::Range(range) => {
                writeln!(f, "Comparing Temperature:")?;
                writeln!(f, "Standard Temperature Range: {range}")?;
                writeln!(f, "Actual Temperature: {}", self.measured)?;
            }
        }
        writeln!(f, "{}", if self.passed { "PASSED" } else { "FAILED" })?;
        write!(f, "=======================")
    }
}

/// Check every diagram box below `cutoff_y` carrying a pressure or
/// temperature reading.
///
/// A box whose uppercased text contains `PSIG` is a pressure reading;
/// otherwise one containing `F` is a temperature reading. Boxes with neither
/// marker, or whose number cannot be read, are skipped.
pub fn classify_boxes<S: AsRef<str>>(
    headers: &[S],
    mapping: &LimitMapping,
    boxes: &[TextBox],
    cutoff_y: i32,
    config: &CheckConfig,
) -> Vec<Verdict> {
    let ceiling = resolve_pressure_ceiling(headers, mapping, config.default_psig_ceiling);
    let range = resolve_temperature_range(headers, mapping);

    boxes
        .iter()
        .filter(|text_box| config.is_diagram_box(&text_box.bbox, cutoff_y))
        .filter_map(|text_box| match classify_box(text_box, ceiling, range) {
            Ok(verdict) => verdict,
            Err(e) => {
                debug!("skip `{}` at {:?}: {}", text_box.text, text_box.bbox, e);
                None
            }
        })
        .collect()
}

fn classify_box(
    text_box: &TextBox,
    ceiling: i64,
    range: TemperatureRange,
) -> Result<Option<Verdict>, LimitCheckError> {
    let upper = text_box.text.to_uppercase();

    let (kind, marker, bound) = if upper.contains(PRESSURE_MARKER) {
        (
            MeasurementKind::Pressure,
            PRESSURE_MARKER,
            Bound::Ceiling { psig: ceiling },
        )
    } else if upper.contains(TEMPERATURE_MARKER) {
        (
            MeasurementKind::Temperature,
            TEMPERATURE_MARKER,
            Bound::Range(range),
        )
    } else {
        return Ok(None);
    };

    let measured = extract_number(&text_box.text, marker)?;

    Ok(Some(Verdict {
        kind,
        measured,
        bound,
        passed: bound.admits(measured),
        bbox: text_box.bbox,
        text: text_box.text.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::tests::entry;

    fn mapping() -> LimitMapping {
        let mut mapping = LimitMapping::default();
        mapping.insert("F-", entry("Flare", 200, -20.0, 150.0));
        mapping.insert("V-", entry("Vessel", 150, 0.0, 100.0));
        mapping
    }

    const HEADERS: [&str; 2] = ["F-101 Vessel", "V-200 Valve"];

    fn check(headers: &[&str], boxes: &[TextBox]) -> Vec<Verdict> {
        classify_boxes(headers, &mapping(), boxes, HEADER_Y_CUTOFF, &CheckConfig::default())
    }

    #[test]
    fn test_pressure_against_tightest_ceiling() {
        let boxes = vec![
            TextBox::from_xywh(1200, 1500, 200, 40, "145 PSIG"),
            TextBox::from_xywh(1200, 1800, 200, 40, "160 PSIG"),
        ];

        let verdicts = check(&HEADERS, &boxes);
        assert_eq!(verdicts.len(), 2);
        assert_eq!(verdicts[0].kind, MeasurementKind::Pressure);
        assert_eq!(verdicts[0].measured, 145);
        assert_eq!(verdicts[0].bound, Bound::Ceiling { psig: 150 });
        assert!(verdicts[0].passed);
        assert_eq!(verdicts[1].measured, 160);
        assert!(!verdicts[1].passed);
    }

    #[test]
    fn test_temperature_against_intersected_range() {
        let boxes = vec![
            TextBox::from_xywh(1200, 1500, 200, 40, "80F"),
            TextBox::from_xywh(1200, 1800, 200, 40, "120 F"),
        ];

        let verdicts = check(&HEADERS, &boxes);
        assert_eq!(verdicts.len(), 2);
        assert_eq!(verdicts[0].kind, MeasurementKind::Temperature);
        assert_eq!(verdicts[0].bound, Bound::Range(TemperatureRange::new(0.0, 100.0)));
        assert!(verdicts[0].passed);
        assert_eq!(verdicts[1].measured, 120);
        assert!(!verdicts[1].passed);
    }

    #[test]
    fn test_pressure_takes_precedence() {
        let boxes = vec![TextBox::from_xywh(1200, 1500, 300, 40, "150PSIG @ 650F")];

        let verdicts = check(&HEADERS, &boxes);
        assert_eq!(verdicts.len(), 1);
        assert_eq!(verdicts[0].kind, MeasurementKind::Pressure);
        assert_eq!(verdicts[0].measured, 150);
        assert!(verdicts[0].passed);
    }

    #[test]
    fn test_lowercase_marker_is_detected_but_not_extracted() {
        // detection is case-insensitive, extraction is not
        let boxes = vec![TextBox::from_xywh(1200, 1500, 200, 40, "145 psig")];
        assert!(check(&HEADERS, &boxes).is_empty());
    }

    #[test]
    fn test_skipped_boxes() {
        let boxes = vec![
            // header band
            TextBox::from_xywh(1200, 500, 200, 40, "145 PSIG"),
            // title block
            TextBox::from_xywh(7000, 6500, 200, 40, "9999 PSIG"),
            // no marker
            TextBox::from_xywh(1200, 1500, 200, 40, "6-P-1001-A1A"),
            // marker without a number
            TextBox::from_xywh(1200, 1600, 200, 40, "FLOW"),
        ];

        assert!(check(&HEADERS, &boxes).is_empty());
    }

    #[test]
    fn test_exclusion_needs_both_coordinates() {
        let config = CheckConfig::default();
        assert!(config.is_diagram_box(&Bbox::from_xywh(6999, 6500, 10, 10), HEADER_Y_CUTOFF));
        assert!(config.is_diagram_box(&Bbox::from_xywh(7000, 6499, 10, 10), HEADER_Y_CUTOFF));
        assert!(!config.is_diagram_box(&Bbox::from_xywh(7000, 6500, 10, 10), HEADER_Y_CUTOFF));
        assert!(!config.is_diagram_box(&Bbox::from_xywh(10, 999, 10, 10), HEADER_Y_CUTOFF));
        assert!(config.is_diagram_box(&Bbox::from_xywh(10, 1000, 0, 0), HEADER_Y_CUTOFF));
    }

    #[test]
    fn test_default_ceiling_without_headers() {
        let headers: [&str; 0] = [];
        let boxes = vec![TextBox::from_xywh(1200, 1500, 200, 40, "9000 PSIG")];

        let verdicts = check(&headers, &boxes);
        assert_eq!(verdicts[0].bound, Bound::Ceiling { psig: DEFAULT_PSIG_CEILING });
        assert!(verdicts[0].passed);
    }

    #[test]
    fn test_report_block() {
        let verdict = Verdict {
            kind: MeasurementKind::Temperature,
            measured: 120,
            bound: Bound::Range(TemperatureRange::new(0.0, 100.0)),
            passed: false,
            bbox: Bbox::from_xywh(0, 0, 1, 1),
            text: "120F".to_string(),
        };

        assert_eq!(
            verdict.to_string(),
            "=======================\n\
             Comparing Temperature:\n\
             Standard Temperature Range: [0, 100]\n\
             Actual Temperature: 120\n\
             FAILED\n\
             ======================="
        );
    }
}
