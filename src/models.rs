use crate::Error;
use crate::schema::{accounts, attendance, courses, profiles, sessions};
use chrono::{NaiveDate, NaiveDateTime};
use clap::ValueEnum;
use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The attendance status of a single course on a single day.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsExpression,
    FromSqlRow,
    ValueEnum,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Present,
    Absent,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Present => "present",
            Status::Absent => "absent",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Present => write!(f, "Present"),
            Status::Absent => write!(f, "Absent"),
        }
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(Status::Present),
            "absent" => Ok(Status::Absent),
            other => Err(Error::InvalidStatus(other.to_string())),
        }
    }
}

impl ToSql<Text, Sqlite> for Status {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for Status {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let value = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
        value
            .parse()
            .map_err(|_| format!("unrecognized attendance status {value:?}").into())
    }
}

/// What the user asked a day's record to become.
///
/// The empty string is the "clear" sentinel: it removes the record instead of
/// marking it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesiredStatus {
    Mark(Status),
    Clear,
}

impl FromStr for DesiredStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            Ok(DesiredStatus::Clear)
        } else {
            s.parse().map(DesiredStatus::Mark)
        }
    }
}

impl From<Status> for DesiredStatus {
    fn from(status: Status) -> Self {
        DesiredStatus::Mark(status)
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Account {
    pub user_id: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = accounts)]
pub struct NewAccount<'a> {
    pub user_id: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// An authenticated session. The token is opaque to everything but the account store.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = sessions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub email: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = sessions)]
pub struct NewSession<'a> {
    pub token: &'a str,
    pub user_id: &'a str,
    pub email: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Profile {
    pub id: i32,
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = profiles)]
pub struct NewProfile<'a> {
    pub user_id: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = profiles)]
pub struct ProfileUpdate<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = courses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Course {
    pub id: i32,
    pub user_id: String,
    pub subject_code: String,
    pub subject_name: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = courses)]
pub struct NewCourse<'a> {
    pub user_id: &'a str,
    pub subject_code: &'a str,
    pub subject_name: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = courses)]
pub struct CourseUpdate<'a> {
    pub subject_code: &'a str,
    pub subject_name: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = attendance)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AttendanceRecord {
    pub id: i32,
    pub user_id: String,
    pub subject_code: String,
    pub date: NaiveDate,
    pub status: Status,
}

#[derive(Insertable)]
#[diesel(table_name = attendance)]
pub struct NewAttendanceRecord<'a> {
    pub user_id: &'a str,
    pub subject_code: &'a str,
    pub date: NaiveDate,
    pub status: Status,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_clears() {
        assert_eq!("".parse::<DesiredStatus>().unwrap(), DesiredStatus::Clear);
        assert_eq!(
            "present".parse::<DesiredStatus>().unwrap(),
            DesiredStatus::Mark(Status::Present)
        );
        assert_eq!(
            "absent".parse::<DesiredStatus>().unwrap(),
            DesiredStatus::Mark(Status::Absent)
        );
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(matches!(
            "excused".parse::<DesiredStatus>(),
            Err(Error::InvalidStatus(s)) if s == "excused"
        ));
    }
}
