//! Bulk course import from a `code,name` CSV file.
//!
//! Courses already on the user's list are reported and left alone; the import
//! never removes anything.

use serde::Deserialize;
use std::fs::File;
use std::io;
use std::path::Path;

use crate::Result;
use crate::manager::AttendanceManager;
use crate::models::{Course, NewCourse};
use crate::pages::View;
use crate::pages::signup::SubjectEntry;
use crate::routes::Route;
use crate::session::SessionContext;

#[derive(Debug, Deserialize)]
struct CourseRow {
    code: String,
    name: String,
}

/// What an import did.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub added: Vec<Course>,
    /// Subject codes that were already registered.
    pub existing: Vec<String>,
    /// Rows with a blank code or name.
    pub skipped: usize,
}

/// Reads course rows from CSV with a `code,name` header.
pub fn read_courses<R: io::Read>(reader: R) -> Result<Vec<SubjectEntry>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    reader
        .deserialize::<CourseRow>()
        .map(|row| {
            let row = row?;
            Ok(SubjectEntry::new(row.code, row.name))
        })
        .collect()
}

pub fn read_courses_file(path: &Path) -> Result<Vec<SubjectEntry>> {
    read_courses(File::open(path)?)
}

/// Adds every entry that is not already one of the signed-in user's courses.
pub fn import_courses(
    context: &SessionContext,
    manager: &mut AttendanceManager,
    entries: &[SubjectEntry],
) -> Result<View<ImportReport>> {
    let Some(session) = context.current() else {
        return Ok(View::Redirect(Route::Login));
    };

    let mut report = ImportReport::default();

    for entry in entries {
        let code = entry.code.trim();
        let name = entry.name.trim();
        if code.is_empty() || name.is_empty() {
            report.skipped += 1;
            continue;
        }

        if manager.get_course(&session.user_id, code)?.is_some() {
            report.existing.push(code.to_string());
            continue;
        }

        let course = manager.add_course(&NewCourse {
            user_id: &session.user_id,
            subject_code: code,
            subject_name: name,
        })?;
        report.added.push(course);
    }

    tracing::info!(
        added = report.added.len(),
        existing = report.existing.len(),
        skipped = report.skipped,
        "imported courses"
    );

    Ok(View::Render(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_trimmed_rows() {
        let csv = "code,name\nCS101, Intro to Computing\n MA201 ,Calculus\n";
        let entries = read_courses(csv.as_bytes()).unwrap();

        assert_eq!(
            entries,
            vec![
                SubjectEntry::new("CS101", "Intro to Computing"),
                SubjectEntry::new("MA201", "Calculus"),
            ]
        );
    }

    #[test]
    fn missing_column_is_an_error() {
        assert!(read_courses("code\nCS101\n".as_bytes()).is_err());
    }
}
