//! This module contains the command-line interface [`Cli`] parser for tracking course
//! attendance.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::date_key::DateKey;
use crate::models::Status;
use crate::pages::signup::SubjectEntry;

/// The command line configuration struct, where the command-line interface parser is automatically
/// derived by [`clap::Parser`].
#[derive(Parser, Debug)]
#[command(author, version, about = "Track daily attendance for your courses")]
pub struct Cli {
    /// Name of the configuration file, without extension.
    #[arg(long, default_value = "config", global = true)]
    pub config: String,

    /// The different commands available for tracking attendance.
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account, a profile and its first courses.
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        /// A course as `CODE:NAME`. May be repeated.
        #[arg(long = "subject", required = true)]
        subjects: Vec<SubjectEntry>,
    },

    /// Sign in and remember the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Sign out of the current session.
    Logout,

    /// Show attendance progress for every course and the marks of one day.
    Dashboard {
        /// The day to show, as `YYYY-MM-DD`. Defaults to today.
        #[arg(long)]
        date: Option<DateKey>,
    },

    /// Show how each course is marked on one day.
    Attendance {
        #[arg(long)]
        date: Option<DateKey>,
    },

    /// Mark a course present or absent.
    Mark {
        subject: String,
        #[arg(value_enum)]
        status: Status,
        #[arg(long)]
        date: Option<DateKey>,
    },

    /// Remove the mark of a course.
    Clear {
        subject: String,
        #[arg(long)]
        date: Option<DateKey>,
    },

    /// Show the profile and its courses.
    Profile,

    /// Change the name on the profile.
    UpdateProfile {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },

    /// Add a course.
    AddCourse { code: String, name: String },

    /// Change a course's subject code and name.
    EditCourse {
        id: i32,
        #[arg(long)]
        code: String,
        #[arg(long)]
        name: String,
    },

    /// Add every course listed in a `code,name` CSV file.
    ImportCourses { file_path: PathBuf },

    /// List courses whose attendance is below 75%.
    FlagAtRisk,
}
