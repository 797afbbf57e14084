//! Two-step signup: register an account, then create the profile and its courses.

use std::collections::HashSet;
use std::str::FromStr;

use crate::manager::AttendanceManager;
use crate::models::{Account, NewCourse, NewProfile, Profile};
use crate::{Error, Result};

/// A subject row from the signup form. Rows with a blank code or name are skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectEntry {
    pub code: String,
    pub name: String,
}

impl SubjectEntry {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    fn is_valid(&self) -> bool {
        !self.code.trim().is_empty() && !self.name.trim().is_empty()
    }
}

/// Parses `CODE:NAME`, as passed on the command line.
impl FromStr for SubjectEntry {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (code, name) = s
            .split_once(':')
            .ok_or_else(|| Error::Validation(format!("expected CODE:NAME, got {s:?}")))?;
        Ok(Self::new(code, name))
    }
}

/// The second signup step.
#[derive(Debug, Clone)]
pub struct ProfileDetails {
    pub first_name: String,
    pub last_name: String,
    pub subjects: Vec<SubjectEntry>,
}

/// Checked and trimmed profile details, ready to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDetails {
    pub first_name: String,
    pub last_name: String,
    pub subjects: Vec<SubjectEntry>,
}

impl ProfileDetails {
    pub fn validate(&self) -> Result<ValidDetails> {
        let first_name = self.first_name.trim();
        let last_name = self.last_name.trim();
        if first_name.is_empty() || last_name.is_empty() {
            return Err(Error::Validation(
                "First Name and Last Name cannot be empty.".to_string(),
            ));
        }

        let subjects: Vec<SubjectEntry> = self
            .subjects
            .iter()
            .filter(|subject| subject.is_valid())
            .map(|subject| SubjectEntry::new(subject.code.trim(), subject.name.trim()))
            .collect();
        if subjects.is_empty() {
            return Err(Error::Validation(
                "Please add at least one valid subject.".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        if let Some(repeated) = subjects
            .iter()
            .find(|subject| !seen.insert(subject.code.clone()))
        {
            return Err(Error::Validation(format!(
                "Subject {} is listed more than once.",
                repeated.code
            )));
        }

        Ok(ValidDetails {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            subjects,
        })
    }
}

/// Step one: registers the account.
pub fn register(manager: &mut AttendanceManager, email: &str, password: &str) -> Result<Account> {
    manager.sign_up(email, password)
}

/// Step two: creates the profile and initial courses for `account`.
pub fn complete_profile(
    manager: &mut AttendanceManager,
    account: &Account,
    details: &ProfileDetails,
) -> Result<Profile> {
    let details = details.validate()?;

    let new_profile = NewProfile {
        user_id: &account.user_id,
        first_name: &details.first_name,
        last_name: &details.last_name,
        email: &account.email,
    };
    let new_courses: Vec<NewCourse> = details
        .subjects
        .iter()
        .map(|subject| NewCourse {
            user_id: &account.user_id,
            subject_code: &subject.code,
            subject_name: &subject.name,
        })
        .collect();

    let profile = manager.create_profile(&new_profile, &new_courses)?;
    tracing::info!(
        user_id = %profile.user_id,
        courses = new_courses.len(),
        "created profile"
    );

    Ok(profile)
}

/// Runs both steps in one transaction, so a rejected form leaves nothing behind.
pub fn sign_up(
    manager: &mut AttendanceManager,
    email: &str,
    password: &str,
    details: &ProfileDetails,
) -> Result<Profile> {
    details.validate()?;
    manager.in_transaction(|manager| {
        let account = register(manager, email, password)?;
        complete_profile(manager, &account, details)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(first: &str, last: &str, subjects: &[(&str, &str)]) -> ProfileDetails {
        ProfileDetails {
            first_name: first.to_string(),
            last_name: last.to_string(),
            subjects: subjects
                .iter()
                .map(|(code, name)| SubjectEntry::new(*code, *name))
                .collect(),
        }
    }

    #[test]
    fn blank_names_are_rejected() {
        let err = details(" ", "Crab", &[("CS101", "Intro")])
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Validation(m) if m.contains("First Name")));
    }

    #[test]
    fn blank_subject_rows_are_dropped() {
        let valid = details(
            " Ferris ",
            "Crab",
            &[(" CS101 ", " Intro "), ("", "Nameless"), ("MA201", "  ")],
        )
        .validate()
        .unwrap();

        assert_eq!(valid.first_name, "Ferris");
        assert_eq!(valid.subjects, vec![SubjectEntry::new("CS101", "Intro")]);
    }

    #[test]
    fn at_least_one_subject_is_required() {
        let err = details("Ferris", "Crab", &[("", "")]).validate().unwrap_err();
        assert!(matches!(err, Error::Validation(m) if m.contains("at least one")));
    }

    #[test]
    fn parses_code_and_name() {
        let entry: SubjectEntry = "CS101:Intro to Computing".parse().unwrap();
        assert_eq!(entry, SubjectEntry::new("CS101", "Intro to Computing"));
        assert!("CS101".parse::<SubjectEntry>().is_err());
    }

    #[test]
    fn creates_profile_and_courses() {
        let mut manager = AttendanceManager::open_in_memory().unwrap();
        let profile = sign_up(
            &mut manager,
            "ferris@example.com",
            "hunter2",
            &details("Ferris", "Crab", &[("MA201", "Calculus"), ("CS101", "Intro")]),
        )
        .unwrap();

        assert_eq!(profile.email, "ferris@example.com");
        let codes: Vec<_> = manager
            .get_courses(&profile.user_id)
            .unwrap()
            .into_iter()
            .map(|c| c.subject_code)
            .collect();
        assert_eq!(codes, vec!["CS101", "MA201"]);
    }

    #[test]
    fn invalid_form_creates_no_account() {
        let mut manager = AttendanceManager::open_in_memory().unwrap();
        assert!(sign_up(&mut manager, "ferris@example.com", "pw", &details("", "", &[])).is_err());

        // The email is still free.
        manager.sign_up("ferris@example.com", "pw").unwrap();
    }

    #[test]
    fn repeated_subject_code_is_rejected() {
        let mut manager = AttendanceManager::open_in_memory().unwrap();
        let form = details(
            "Ferris",
            "Crab",
            &[("CS101", "Intro"), (" CS101 ", "Intro again")],
        );

        let err = sign_up(&mut manager, "dup@example.com", "pw", &form).unwrap_err();
        assert!(matches!(err, Error::Validation(m) if m.contains("CS101")));

        // A corrected form goes through with the same email.
        let form = details("Ferris", "Crab", &[("CS101", "Intro")]);
        let profile = sign_up(&mut manager, "dup@example.com", "pw", &form).unwrap();
        assert_eq!(manager.get_courses(&profile.user_id).unwrap().len(), 1);
    }

    #[test]
    fn failed_profile_step_rolls_back_the_account() {
        let mut manager = AttendanceManager::open_in_memory().unwrap();

        let result = manager.in_transaction(|manager| {
            let account = register(manager, "ferris@example.com", "pw")?;
            let profile = details("Ferris", "Crab", &[("CS101", "Intro")]);
            complete_profile(manager, &account, &profile)?;
            // A second profile for the same account violates the unique user_id.
            complete_profile(manager, &account, &profile)
        });
        assert!(matches!(result, Err(Error::Database(_))));

        assert!(matches!(
            manager.sign_in("ferris@example.com", "pw"),
            Err(Error::InvalidCredentials)
        ));
        manager.sign_up("ferris@example.com", "pw").unwrap();
    }
}
