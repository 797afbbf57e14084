use crate::manager::AttendanceManager;
use crate::models::{Course, CourseUpdate, NewCourse, Profile, ProfileUpdate};
use crate::pages::View;
use crate::routes::Route;
use crate::session::SessionContext;
use crate::{Error, Result};

/// Profile settings: personal information and the list of courses.
#[derive(Debug, Clone)]
pub struct ProfilePage {
    pub profile: Option<Profile>,
    /// Sorted by subject code.
    pub courses: Vec<Course>,
}

fn required(value: &str, message: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(Error::Validation(message.to_string()))
    } else {
        Ok(value.to_string())
    }
}

impl ProfilePage {
    pub fn load(context: &SessionContext, manager: &mut AttendanceManager) -> Result<View<Self>> {
        let Some(session) = context.current() else {
            return Ok(View::Redirect(Route::Login));
        };

        let profile = manager.get_profile(&session.user_id)?;
        let courses = manager.get_courses(&session.user_id)?;

        Ok(View::Render(Self { profile, courses }))
    }

    /// Saves a new first and last name.
    pub fn update_names(
        context: &SessionContext,
        manager: &mut AttendanceManager,
        first_name: &str,
        last_name: &str,
    ) -> Result<View<Self>> {
        let Some(session) = context.current() else {
            return Ok(View::Redirect(Route::Login));
        };

        let message = "First Name and Last Name cannot be empty.";
        let first_name = required(first_name, message)?;
        let last_name = required(last_name, message)?;

        let changes = ProfileUpdate {
            first_name: &first_name,
            last_name: &last_name,
        };
        if manager.update_profile(&session.user_id, &changes)?.is_none() {
            return Err(Error::Validation("No profile to update.".to_string()));
        }

        Self::load(context, manager)
    }

    /// Adds a course. Both the subject code and name are required.
    pub fn add_course(
        context: &SessionContext,
        manager: &mut AttendanceManager,
        subject_code: &str,
        subject_name: &str,
    ) -> Result<View<Self>> {
        let Some(session) = context.current() else {
            return Ok(View::Redirect(Route::Login));
        };

        let message = "Subject code and subject name are required.";
        let subject_code = required(subject_code, message)?;
        let subject_name = required(subject_name, message)?;

        if manager.get_course(&session.user_id, &subject_code)?.is_some() {
            return Err(Error::Validation(format!(
                "Course {subject_code} already exists."
            )));
        }

        let course = manager.add_course(&NewCourse {
            user_id: &session.user_id,
            subject_code: &subject_code,
            subject_name: &subject_name,
        })?;
        tracing::info!(course_id = course.id, subject_code = %course.subject_code, "added course");

        Self::load(context, manager)
    }

    /// Renames the course with id `course_id`.
    pub fn edit_course(
        context: &SessionContext,
        manager: &mut AttendanceManager,
        course_id: i32,
        subject_code: &str,
        subject_name: &str,
    ) -> Result<View<Self>> {
        let Some(session) = context.current() else {
            return Ok(View::Redirect(Route::Login));
        };

        let message = "Subject code and subject name are required.";
        let subject_code = required(subject_code, message)?;
        let subject_name = required(subject_name, message)?;

        if let Some(other) = manager.get_course(&session.user_id, &subject_code)?
            && other.id != course_id
        {
            return Err(Error::Validation(format!(
                "Course {subject_code} already exists."
            )));
        }

        let changes = CourseUpdate {
            subject_code: &subject_code,
            subject_name: &subject_name,
        };
        if manager
            .edit_course(&session.user_id, course_id, &changes)?
            .is_none()
        {
            return Err(Error::Validation(format!("No course with id {course_id}.")));
        }

        Self::load(context, manager)
    }
}
