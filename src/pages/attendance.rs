use crate::Result;
use crate::date_key::DateKey;
use crate::manager::AttendanceManager;
use crate::models::{Course, DesiredStatus, Status};
use crate::pages::View;
use crate::routes::Route;
use crate::session::SessionContext;

/// A course and how it was marked on the sheet's day.
#[derive(Debug, Clone)]
pub struct SheetRow {
    pub course: Course,
    /// `None` means "not marked".
    pub status: Option<Status>,
}

/// The attendance page: every course of the user with its status for one day.
#[derive(Debug, Clone)]
pub struct AttendanceSheet {
    pub day: Option<DateKey>,
    pub rows: Vec<SheetRow>,
}

impl AttendanceSheet {
    pub fn load(
        context: &SessionContext,
        manager: &mut AttendanceManager,
        day: Option<DateKey>,
    ) -> Result<View<Self>> {
        let Some(session) = context.current() else {
            return Ok(View::Redirect(Route::Login));
        };

        let courses = manager.get_courses(&session.user_id)?;
        let records = match day {
            Some(day) => manager.get_day_attendance(&session.user_id, day)?,
            None => Vec::new(),
        };

        let rows = courses
            .into_iter()
            .map(|course| {
                let status = records
                    .iter()
                    .find(|record| record.subject_code == course.subject_code)
                    .map(|record| record.status);
                SheetRow { course, status }
            })
            .collect();

        Ok(View::Render(Self { day, rows }))
    }

    /// Marks or clears `subject` on `day`, then reloads the sheet.
    ///
    /// Without a day nothing is written. A subject that is not one of the user's
    /// courses is logged and ignored.
    pub fn mark(
        context: &SessionContext,
        manager: &mut AttendanceManager,
        day: Option<DateKey>,
        subject: &str,
        desired: DesiredStatus,
    ) -> Result<View<Self>> {
        let Some(session) = context.current() else {
            return Ok(View::Redirect(Route::Login));
        };

        match day {
            None => tracing::debug!(subject, "no day selected, nothing to mark"),
            Some(day) => {
                if manager.get_course(&session.user_id, subject)?.is_some() {
                    manager.resolve(&session.user_id, subject, day, desired)?;
                } else {
                    tracing::warn!(subject, "tried to mark an unknown course");
                }
            }
        }

        Self::load(context, manager, day)
    }

    pub fn status_of(&self, subject: &str) -> Option<Status> {
        self.rows
            .iter()
            .find(|row| row.course.subject_code == subject)
            .and_then(|row| row.status)
    }
}
