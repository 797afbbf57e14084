use crate::Result;
use crate::date_key::DateKey;
use crate::manager::AttendanceManager;
use crate::models::{AttendanceRecord, Course, Profile};
use crate::pages::View;
use crate::routes::Route;
use crate::session::SessionContext;
use crate::summary::{AttendanceSummary, Standing, summarize_course};

/// One course's attendance so far.
#[derive(Debug, Clone)]
pub struct CourseProgress {
    pub course: Course,
    pub summary: AttendanceSummary,
}

impl CourseProgress {
    pub fn standing(&self) -> Standing {
        self.summary.standing()
    }
}

/// The signed-in user's overview: progress per course and the marks of one day.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub profile: Profile,
    /// Sorted by subject code.
    pub progress: Vec<CourseProgress>,
    pub day: Option<DateKey>,
    pub day_records: Vec<AttendanceRecord>,
}

impl Dashboard {
    /// Loads the dashboard for the current session.
    ///
    /// A session whose user never finished creating a profile is signed out and
    /// sent back to the login page.
    pub fn load(
        context: &SessionContext,
        manager: &mut AttendanceManager,
        day: Option<DateKey>,
    ) -> Result<View<Self>> {
        let Some(session) = context.current() else {
            return Ok(View::Redirect(Route::Login));
        };

        let Some(profile) = manager.get_profile(&session.user_id)? else {
            tracing::warn!(user_id = %session.user_id, "session has no profile, signing out");
            manager.sign_out(&session.token)?;
            context.clear();
            return Ok(View::Redirect(Route::Login));
        };

        let courses = manager.get_courses(&session.user_id)?;
        let history = manager.get_attendance(&session.user_id)?;

        let progress = courses
            .into_iter()
            .map(|course| {
                let summary = summarize_course(&course, &history);
                CourseProgress { course, summary }
            })
            .collect();

        let day_records = match day {
            Some(day) => manager.get_day_attendance(&session.user_id, day)?,
            None => Vec::new(),
        };

        Ok(View::Render(Self {
            profile,
            progress,
            day,
            day_records,
        }))
    }

    pub fn greeting_name(&self) -> &str {
        &self.profile.first_name
    }

    /// Courses with at least one record whose standing is [`Standing::AtRisk`].
    pub fn at_risk(&self) -> impl Iterator<Item = &CourseProgress> {
        self.progress
            .iter()
            .filter(|p| p.summary.total() > 0 && p.standing() == Standing::AtRisk)
    }
}
