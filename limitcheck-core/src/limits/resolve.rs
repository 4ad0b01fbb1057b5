use super::{LimitMapping, TemperatureRange};

/// Tightest pressure ceiling among the entries the headers map to.
///
/// `default` applies when no header matches any prefix.
pub fn resolve_pressure_ceiling<S: AsRef<str>>(
    headers: &[S],
    mapping: &LimitMapping,
    default: i64,
) -> i64 {
    headers
        .iter()
        .filter_map(|header| mapping.lookup(header.as_ref()))
        .fold(default, |ceiling, entry| ceiling.min(entry.psig))
}

/// Intersection of the temperature ranges of the entries the headers map to.
///
/// Unbounded on both sides when nothing matches.
pub fn resolve_temperature_range<S: AsRef<str>>(
    headers: &[S],
    mapping: &LimitMapping,
) -> TemperatureRange {
    headers
        .iter()
        .filter_map(|header| mapping.lookup(header.as_ref()))
        .fold(TemperatureRange::UNBOUNDED, |range, entry| {
            range.intersect(&entry.temperature)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{consts::DEFAULT_PSIG_CEILING, limits::tests::entry};

    fn mapping() -> LimitMapping {
        let mut mapping = LimitMapping::default();
        mapping.insert("F-", entry("Flare", 200, -20.0, 150.0));
        mapping.insert("V-", entry("Vessel", 150, 0.0, 100.0));
        mapping
    }

    #[test]
    fn test_tightest_limits_win() {
        let headers = ["F-101 Vessel", "V-200 Valve"];

        assert_eq!(
            resolve_pressure_ceiling(&headers, &mapping(), DEFAULT_PSIG_CEILING),
            150
        );
        assert_eq!(
            resolve_temperature_range(&headers, &mapping()),
            TemperatureRange::new(0.0, 100.0)
        );
    }

    #[test]
    fn test_no_matching_header() {
        let headers = vec!["P-100 PUMP".to_string(), "X".to_string(), String::new()];

        assert_eq!(
            resolve_pressure_ceiling(&headers, &mapping(), DEFAULT_PSIG_CEILING),
            DEFAULT_PSIG_CEILING
        );
        assert_eq!(
            resolve_temperature_range(&headers, &mapping()),
            TemperatureRange::UNBOUNDED
        );
    }

    #[test]
    fn test_one_sided_range_keeps_other_bound() {
        let mut mapping = mapping();
        mapping.insert("AC", entry("Air Cooler", 120, f64::NEG_INFINITY, 80.0));

        let range = resolve_temperature_range(&["AC-4 COOLER", "F-1 DRUM"], &mapping);
        assert_eq!(range, TemperatureRange::new(-20.0, 80.0));
        assert_eq!(
            resolve_pressure_ceiling(&["AC-4 COOLER", "F-1 DRUM"], &mapping, 100),
            100
        );
    }
}
