use crate::date_key::DateKey;
use crate::models::{
    AttendanceRecord, Course, CourseUpdate, DesiredStatus, NewAttendanceRecord, NewCourse,
    NewProfile, Profile, ProfileUpdate,
};
use crate::{Error, Result, db, schema};
use diesel::connection::{AnsiTransactionManager, TransactionManager};
use diesel::prelude::*;
use diesel::upsert::excluded;

/// The manager for recording, modifying, and retrieving attendance data.
///
/// Every query is scoped to a user identifier; nothing here reads another user's rows.
pub struct AttendanceManager {
    pub(crate) db: SqliteConnection,
}

impl AttendanceManager {
    /// Creates a new `AttendanceManager` by connecting to the `sqlite3` database at
    /// `database_url`, creating the schema if it does not exist yet.
    pub fn connect(database_url: &str) -> Result<Self> {
        Ok(Self {
            db: db::establish(database_url)?,
        })
    }

    /// Opens a private in-memory database. Useful for testing.
    pub fn open_in_memory() -> Result<Self> {
        Self::connect(":memory:")
    }

    /// Runs `f` inside a transaction spanning every manager call it makes.
    ///
    /// Nothing `f` wrote is kept unless it returns `Ok`.
    pub fn in_transaction<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        AnsiTransactionManager::begin_transaction(&mut self.db)?;
        match f(self) {
            Ok(value) => {
                AnsiTransactionManager::commit_transaction(&mut self.db)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = AnsiTransactionManager::rollback_transaction(&mut self.db) {
                    tracing::error!(error = %rollback, "failed to roll back transaction");
                }
                Err(err)
            }
        }
    }

    /// Retrieves the profile belonging to `user`, if one has been created.
    pub fn get_profile(&mut self, user: &str) -> Result<Option<Profile>> {
        use schema::profiles::dsl::*;

        Ok(profiles
            .filter(user_id.eq(user))
            .select(Profile::as_select())
            .first(&mut self.db)
            .optional()?)
    }

    /// Creates a profile together with its initial courses.
    ///
    /// Both writes happen in a single transaction, so a failure while adding the
    /// courses leaves no half-created profile behind.
    pub fn create_profile(
        &mut self,
        new_profile: &NewProfile<'_>,
        new_courses: &[NewCourse<'_>],
    ) -> Result<Profile> {
        self.db.transaction::<_, Error, _>(|conn| {
            let profile = diesel::insert_into(schema::profiles::table)
                .values(new_profile)
                .returning(Profile::as_returning())
                .get_result(conn)?;

            if !new_courses.is_empty() {
                let courses_inserted = diesel::insert_into(schema::courses::table)
                    .values(new_courses)
                    .execute(conn)?;

                assert_eq!(courses_inserted, new_courses.len());
            }

            Ok(profile)
        })
    }

    /// Changes the first and last name on `user`'s profile.
    ///
    /// Returns `None` if the user has no profile.
    pub fn update_profile(
        &mut self,
        user: &str,
        changes: &ProfileUpdate<'_>,
    ) -> Result<Option<Profile>> {
        use schema::profiles::dsl::*;

        Ok(diesel::update(profiles.filter(user_id.eq(user)))
            .set(changes)
            .returning(Profile::as_returning())
            .get_result(&mut self.db)
            .optional()?)
    }

    /// Retrieves all of `user`'s courses, sorted by subject code.
    pub fn get_courses(&mut self, user: &str) -> Result<Vec<Course>> {
        use schema::courses::dsl::*;

        Ok(courses
            .filter(user_id.eq(user))
            .order(subject_code.asc())
            .select(Course::as_select())
            .load(&mut self.db)?)
    }

    /// Retrieves one of `user`'s courses by its subject code.
    pub fn get_course(&mut self, user: &str, code: &str) -> Result<Option<Course>> {
        use schema::courses::dsl::*;

        Ok(courses
            .filter(user_id.eq(user))
            .filter(subject_code.eq(code))
            .select(Course::as_select())
            .first(&mut self.db)
            .optional()?)
    }

    /// Adds a course and returns the stored row.
    pub fn add_course(&mut self, new_course: &NewCourse<'_>) -> Result<Course> {
        Ok(diesel::insert_into(schema::courses::table)
            .values(new_course)
            .returning(Course::as_returning())
            .get_result(&mut self.db)?)
    }

    /// Changes the subject code and name of one of `user`'s courses.
    ///
    /// Returns `None` if no course with `course_id` belongs to `user`. Existing
    /// attendance records keep the subject code they were recorded under.
    pub fn edit_course(
        &mut self,
        user: &str,
        course_id: i32,
        changes: &CourseUpdate<'_>,
    ) -> Result<Option<Course>> {
        use schema::courses::dsl::*;

        Ok(diesel::update(courses.filter(id.eq(course_id)).filter(user_id.eq(user)))
            .set(changes)
            .returning(Course::as_returning())
            .get_result(&mut self.db)
            .optional()?)
    }

    /// Retrieves `user`'s entire attendance history.
    pub fn get_attendance(&mut self, user: &str) -> Result<Vec<AttendanceRecord>> {
        use schema::attendance::dsl::*;

        Ok(attendance
            .filter(user_id.eq(user))
            .order((date.asc(), subject_code.asc()))
            .select(AttendanceRecord::as_select())
            .load(&mut self.db)?)
    }

    /// Retrieves every record `user` has for the day `day`.
    pub fn get_day_attendance(
        &mut self,
        user: &str,
        day: DateKey,
    ) -> Result<Vec<AttendanceRecord>> {
        use schema::attendance::dsl::*;

        Ok(attendance
            .filter(user_id.eq(user))
            .filter(date.eq(day.as_date()))
            .order(subject_code.asc())
            .select(AttendanceRecord::as_select())
            .load(&mut self.db)?)
    }

    /// Retrieves the record for a single (user, subject, day) key.
    pub fn get_record(
        &mut self,
        user: &str,
        subject: &str,
        day: DateKey,
    ) -> Result<Option<AttendanceRecord>> {
        use schema::attendance::dsl::*;

        Ok(attendance
            .filter(user_id.eq(user))
            .filter(subject_code.eq(subject))
            .filter(date.eq(day.as_date()))
            .select(AttendanceRecord::as_select())
            .first(&mut self.db)
            .optional()?)
    }

    /// Applies `desired` to the record for (`user`, `subject`, `day`).
    ///
    /// Marking is a single `INSERT ... ON CONFLICT DO UPDATE` keyed on the unique
    /// (user, subject, date) index: a new record is inserted, or the existing one has
    /// its status replaced and keeps its id. Clearing deletes the record, and is a
    /// no-op if there is none.
    ///
    /// Returns the record as it stands afterwards, or `None` if it was cleared.
    pub fn resolve(
        &mut self,
        user: &str,
        subject: &str,
        day: DateKey,
        desired: DesiredStatus,
    ) -> Result<Option<AttendanceRecord>> {
        use schema::attendance;

        match desired {
            DesiredStatus::Clear => {
                let deleted = diesel::delete(
                    attendance::table
                        .filter(attendance::user_id.eq(user))
                        .filter(attendance::subject_code.eq(subject))
                        .filter(attendance::date.eq(day.as_date())),
                )
                .execute(&mut self.db)?;

                tracing::debug!(user, subject, %day, deleted, "cleared attendance");
                Ok(None)
            }
            DesiredStatus::Mark(status) => {
                let record = NewAttendanceRecord {
                    user_id: user,
                    subject_code: subject,
                    date: day.as_date(),
                    status,
                };

                diesel::insert_into(attendance::table)
                    .values(&record)
                    .on_conflict((
                        attendance::user_id,
                        attendance::subject_code,
                        attendance::date,
                    ))
                    .do_update()
                    .set(attendance::status.eq(excluded(attendance::status)))
                    .execute(&mut self.db)?;

                tracing::debug!(user, subject, %day, status = status.as_str(), "marked attendance");
                self.get_record(user, subject, day)
            }
        }
    }
}
