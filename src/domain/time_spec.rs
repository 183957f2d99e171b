// Relative time spec resolution ("now", "now-6h", "now-30m")
use super::error::{DashboardError, Result};
use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use std::sync::LazyLock;

static RELATIVE_SPEC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^now-(\d+)([A-Za-z]+)$").expect("valid time spec pattern"));

/// Resolve a dashboard time spec against a fixed `now`.
///
/// Only `now` and `now-<N>h` / `now-<N>m` are understood; everything else,
/// including trailing characters, is rejected.
pub fn resolve(spec: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    if spec == "now" {
        return Ok(now);
    }

    let captures = RELATIVE_SPEC.captures(spec).ok_or_else(|| unsupported(spec, None))?;
    let quantity: i64 = captures[1]
        .parse()
        .map_err(|_| unsupported(spec, None))?;
    let unit = &captures[2];

    let offset = match unit {
        "h" => Duration::try_hours(quantity),
        "m" => Duration::try_minutes(quantity),
        other => return Err(unsupported(spec, Some(other))),
    }
    .ok_or_else(|| unsupported(spec, None))?;

    now.checked_sub_signed(offset)
        .ok_or_else(|| unsupported(spec, None))
}

fn unsupported(spec: &str, unit: Option<&str>) -> DashboardError {
    DashboardError::UnsupportedTimeSpec {
        spec: spec.to_string(),
        unit: unit.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_now_resolves_to_reference() {
        assert_eq!(resolve("now", fixed_now()).unwrap(), fixed_now());
    }

    #[test]
    fn test_hours_and_minutes_shift_backwards() {
        let now = fixed_now();
        assert_eq!(resolve("now-6h", now).unwrap(), now - Duration::hours(6));
        assert_eq!(resolve("now-15m", now).unwrap(), now - Duration::minutes(15));
        assert_eq!(resolve("now-0h", now).unwrap(), now);
    }

    #[test]
    fn test_unsupported_unit_is_named() {
        match resolve("now-5d", fixed_now()) {
            Err(DashboardError::UnsupportedTimeSpec { spec, unit }) => {
                assert_eq!(spec, "now-5d");
                assert_eq!(unit.as_deref(), Some("d"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_other_grammar() {
        for spec in ["now+5h", "now-5hx", "now-h", "now-", " now", "now-1h ", "2024-01-01", ""] {
            assert!(
                matches!(
                    resolve(spec, fixed_now()),
                    Err(DashboardError::UnsupportedTimeSpec { .. })
                ),
                "{} should be rejected",
                spec
            );
        }
    }

    #[test]
    fn test_overflowing_quantity_is_rejected() {
        assert!(matches!(
            resolve("now-99999999999999999999h", fixed_now()),
            Err(DashboardError::UnsupportedTimeSpec { .. })
        ));
        assert!(matches!(
            resolve("now-9999999999999999h", fixed_now()),
            Err(DashboardError::UnsupportedTimeSpec { .. })
        ));
    }
}
