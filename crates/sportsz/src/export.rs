//! CSV exports of history and the athlete report.
//!
//! Columns are fixed per export, so records with optional or missing fields
//! can't shift the layout.

use std::fmt::Write as _;

use crate::athletes::AthleteProfile;
use crate::history::TimedActivityRecord;

/// Header row of the history export.
pub const HISTORY_HEADER: &str = "kind,distance,elapsed_time,speed,timestamp";

/// Header row of the athlete report.
pub const REPORT_HEADER: &str = "name,age,sport,top_speed_m_s";

/// Quote a field if it contains a separator, quote, or line break.
#[must_use]
pub fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Export every history record, one row each.
///
/// Returns `None` when there is nothing to export.
#[must_use]
pub fn history_csv(records: &[TimedActivityRecord]) -> Option<String> {
    if records.is_empty() {
        return None;
    }
    let mut csv = String::from(HISTORY_HEADER);
    for record in records {
        let speed = record.speed().map(|s| s.to_string()).unwrap_or_default();
        let _ = write!(
            csv,
            "\n{},{},{},{},{}",
            record.kind(),
            record.distance(),
            record.elapsed_time(),
            speed,
            record.timestamp().to_rfc3339()
        );
    }
    Some(csv)
}

/// Export the athlete report.
///
/// Profiles are not linked to history records, so every row carries the same
/// overall top speed, rounded to two decimals (empty when there is no speed
/// data).
#[must_use]
pub fn report_csv(users: &[AthleteProfile], history: &[TimedActivityRecord]) -> String {
    let top = history
        .iter()
        .filter_map(TimedActivityRecord::speed)
        .reduce(f64::max)
        .map(|s| format!("{s:.2}"))
        .unwrap_or_default();

    let mut csv = format!("{REPORT_HEADER}\n");
    for user in users {
        let _ = writeln!(
            csv,
            "{},{},{},{}",
            escape(&user.name),
            user.age,
            escape(&user.sport),
            top
        );
    }
    csv
}

/// Default export file name, stamped with milliseconds since the epoch.
#[must_use]
pub fn default_file_name(kind: &str, millis: i64) -> String {
    format!("sportsz_{kind}_{millis}.csv")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::athletes::NewAthlete;
    use crate::history::ActivityKind;
    use chrono::{TimeZone, Utc};

    fn record(distance: f64, elapsed: f64) -> TimedActivityRecord {
        TimedActivityRecord::with_timestamp(
            ActivityKind::Run,
            distance,
            elapsed,
            Utc.with_ymd_and_hms(2025, 8, 28, 10, 0, 0).unwrap(),
        )
        .unwrap()
    }

    fn athlete(name: &str, sport: &str) -> AthleteProfile {
        NewAthlete {
            name: name.to_string(),
            age: 14,
            sport: sport.to_string(),
            consent: true,
            ..NewAthlete::default()
        }
        .into_profile()
        .unwrap()
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_history_csv_empty() {
        assert!(history_csv(&[]).is_none());
    }

    #[test]
    fn test_history_csv_rows() {
        let csv = history_csv(&[record(100.0, 20.0)]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], HISTORY_HEADER);
        assert_eq!(lines[1], "run,100,20,5,2025-08-28T10:00:00+00:00");
    }

    #[test]
    fn test_report_uses_global_top_speed() {
        let users = vec![athlete("Asha", "archery"), athlete("Rao, K", "boxing")];
        let history = vec![record(100.0, 20.0), record(100.0, 10.0)];

        let csv = report_csv(&users, &history);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], REPORT_HEADER);
        assert_eq!(lines[1], "Asha,14,archery,10.00");
        assert_eq!(lines[2], "\"Rao, K\",14,boxing,10.00");
    }

    #[test]
    fn test_report_top_speed_two_decimals() {
        let csv = report_csv(&[athlete("Asha", "archery")], &[record(100.0, 12.0)]);
        assert_eq!(csv.lines().nth(1), Some("Asha,14,archery,8.33"));
    }

    #[test]
    fn test_report_without_history() {
        let csv = report_csv(&[athlete("Asha", "archery")], &[]);
        assert_eq!(csv, format!("{REPORT_HEADER}\nAsha,14,archery,\n"));
    }

    #[test]
    fn test_default_file_name() {
        assert_eq!(default_file_name("history", 42), "sportsz_history_42.csv");
    }
}
