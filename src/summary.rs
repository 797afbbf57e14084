//! Attendance aggregation for a single course.

use crate::models::{AttendanceRecord, Course, Status};
use serde::Serialize;

/// Present/absent counts for one course and the resulting percentage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceSummary {
    pub present: u32,
    pub absent: u32,
    /// `floor(present / (present + absent) * 100)`, or 0 with no records.
    pub percentage: u32,
}

impl AttendanceSummary {
    pub fn from_counts(present: u32, absent: u32) -> Self {
        let total = present + absent;
        let percentage = if total == 0 { 0 } else { present * 100 / total };

        Self {
            present,
            absent,
            percentage,
        }
    }

    pub fn total(&self) -> u32 {
        self.present + self.absent
    }

    pub fn standing(&self) -> Standing {
        Standing::from_percentage(self.percentage)
    }
}

/// Tallies the records that belong to `user_id` and `subject_code`.
///
/// Records for any other user or subject are ignored, so callers can pass the
/// full attendance history without pre-filtering it.
pub fn summarize<'a, I>(user_id: &str, subject_code: &str, records: I) -> AttendanceSummary
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let (present, absent) = records
        .into_iter()
        .filter(|record| record.user_id == user_id && record.subject_code == subject_code)
        .fold((0, 0), |(present, absent), record| match record.status {
            Status::Present => (present + 1, absent),
            Status::Absent => (present, absent + 1),
        });

    AttendanceSummary::from_counts(present, absent)
}

/// Summarizes `records` for the owner and subject of `course`.
pub fn summarize_course<'a, I>(course: &Course, records: I) -> AttendanceSummary
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    summarize(&course.user_id, &course.subject_code, records)
}

/// How healthy a course's attendance percentage is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Standing {
    /// Above 85%.
    Good,
    /// Between 75% and 85% inclusive.
    Warning,
    /// Below 75%.
    AtRisk,
}

impl Standing {
    pub const GOOD_ABOVE: u32 = 85;
    pub const WARNING_FROM: u32 = 75;

    pub fn from_percentage(percentage: u32) -> Self {
        if percentage > Self::GOOD_ABOVE {
            Standing::Good
        } else if percentage >= Self::WARNING_FROM {
            Standing::Warning
        } else {
            Standing::AtRisk
        }
    }
}

impl std::fmt::Display for Standing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Standing::Good => write!(f, "good"),
            Standing::Warning => write!(f, "warning"),
            Standing::AtRisk => write!(f, "at risk"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(user_id: &str, subject_code: &str, day: u32, status: Status) -> AttendanceRecord {
        AttendanceRecord {
            id: day as i32,
            user_id: user_id.to_string(),
            subject_code: subject_code.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            status,
        }
    }

    #[test]
    fn no_records_is_zero_percent() {
        let records: Vec<AttendanceRecord> = Vec::new();
        let summary = summarize("u1", "CS101", &records);
        assert_eq!(summary, AttendanceSummary::from_counts(0, 0));
        assert_eq!(summary.percentage, 0);
    }

    #[test]
    fn three_present_one_absent_is_75() {
        let records = vec![
            record("u1", "CS101", 1, Status::Present),
            record("u1", "CS101", 2, Status::Present),
            record("u1", "CS101", 3, Status::Absent),
            record("u1", "CS101", 4, Status::Present),
        ];

        let summary = summarize("u1", "CS101", &records);
        assert_eq!(summary.present, 3);
        assert_eq!(summary.absent, 1);
        assert_eq!(summary.percentage, 75);
        assert_eq!(summary.standing(), Standing::Warning);
    }

    #[test]
    fn all_absent_is_zero_percent() {
        let records: Vec<_> = (1..=5)
            .map(|day| record("u1", "CS101", day, Status::Absent))
            .collect();

        let summary = summarize("u1", "CS101", &records);
        assert_eq!(summary.absent, 5);
        assert_eq!(summary.percentage, 0);
    }

    #[test]
    fn percentage_is_floored() {
        // 2 / 3 = 66.67%
        assert_eq!(AttendanceSummary::from_counts(2, 1).percentage, 66);
        // 6 / 7 = 85.71%
        assert_eq!(AttendanceSummary::from_counts(6, 1).percentage, 85);
    }

    #[test]
    fn ignores_other_subjects_and_users() {
        let records = vec![
            record("u1", "CS101", 1, Status::Present),
            record("u1", "MA201", 1, Status::Absent),
            record("u2", "CS101", 1, Status::Absent),
            record("u2", "CS101", 2, Status::Absent),
        ];

        let summary = summarize("u1", "CS101", &records);
        assert_eq!(summary, AttendanceSummary::from_counts(1, 0));
        assert_eq!(summary.percentage, 100);
    }

    #[test]
    fn standing_bands() {
        assert_eq!(Standing::from_percentage(100), Standing::Good);
        assert_eq!(Standing::from_percentage(86), Standing::Good);
        assert_eq!(Standing::from_percentage(85), Standing::Warning);
        assert_eq!(Standing::from_percentage(75), Standing::Warning);
        assert_eq!(Standing::from_percentage(74), Standing::AtRisk);
        assert_eq!(Standing::from_percentage(0), Standing::AtRisk);
    }
}
