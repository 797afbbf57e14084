use crate::pages::attendance::AttendanceSheet;
use crate::pages::dashboard::{CourseProgress, Dashboard};
use crate::pages::profile::ProfilePage;
use tabled::{Table, Tabled, settings::Style};

#[derive(Tabled)]
struct ProgressRow<'a> {
    code: &'a str,
    name: &'a str,
    present: u32,
    absent: u32,
    attendance: String,
    standing: String,
}

impl<'a> From<&'a CourseProgress> for ProgressRow<'a> {
    fn from(progress: &'a CourseProgress) -> Self {
        Self {
            code: &progress.course.subject_code,
            name: &progress.course.subject_name,
            present: progress.summary.present,
            absent: progress.summary.absent,
            attendance: format!("{}%", progress.summary.percentage),
            standing: progress.standing().to_string(),
        }
    }
}

fn progress_table<'a>(progress: impl IntoIterator<Item = &'a CourseProgress>) -> Table {
    let mut table = Table::new(progress.into_iter().map(ProgressRow::from));
    table.with(Style::modern());
    table
}

/// Pretty prints the dashboard: course progress and the selected day's marks.
pub fn show_dashboard(dashboard: &Dashboard) {
    println!("Hello, {}", dashboard.greeting_name());

    if dashboard.progress.is_empty() {
        println!("No courses found. Add some courses to track your attendance.");
    } else {
        println!("Course progress:\n{}", progress_table(&dashboard.progress));
    }

    let Some(day) = dashboard.day else {
        return;
    };

    if dashboard.day_records.is_empty() {
        println!("{day}: no classes marked");
        return;
    }

    #[derive(Tabled)]
    struct DayRow<'a> {
        code: &'a str,
        status: String,
    }

    let mut table = Table::new(dashboard.day_records.iter().map(|record| DayRow {
        code: &record.subject_code,
        status: record.status.to_string(),
    }));
    table.with(Style::modern());
    println!("{day}:\n{table}");
}

/// Pretty prints only the courses whose attendance is at risk.
pub fn show_at_risk(dashboard: &Dashboard) {
    let at_risk: Vec<&CourseProgress> = dashboard.at_risk().collect();

    if at_risk.is_empty() {
        println!("No courses are at risk.");
    } else {
        println!("Courses at risk:\n{}", progress_table(at_risk));
    }
}

/// Pretty prints the attendance sheet for a day.
pub fn show_attendance_sheet(sheet: &AttendanceSheet) {
    if sheet.rows.is_empty() {
        println!("No courses found. Add some courses to start marking attendance.");
        return;
    }

    #[derive(Tabled)]
    struct SheetRow<'a> {
        code: &'a str,
        name: &'a str,
        status: String,
    }

    let mut table = Table::new(sheet.rows.iter().map(|row| SheetRow {
        code: &row.course.subject_code,
        name: &row.course.subject_name,
        status: row
            .status
            .map_or_else(|| "Not Marked".to_string(), |status| status.to_string()),
    }));
    table.with(Style::modern());

    match sheet.day {
        Some(day) => println!("Attendance for {day}:\n{table}"),
        None => println!("Attendance:\n{table}"),
    }
}

/// Pretty prints the profile settings page.
pub fn show_profile(page: &ProfilePage) {
    match &page.profile {
        Some(profile) => println!(
            "Profile:\n  name:  {} {}\n  email: {}",
            profile.first_name, profile.last_name, profile.email
        ),
        None => println!("No profile found."),
    }

    if page.courses.is_empty() {
        println!("No courses.");
        return;
    }

    #[derive(Tabled)]
    struct CourseRow<'a> {
        id: i32,
        code: &'a str,
        name: &'a str,
    }

    let mut table = Table::new(page.courses.iter().map(|course| CourseRow {
        id: course.id,
        code: &course.subject_code,
        name: &course.subject_name,
    }));
    table.with(Style::modern());
    println!("Courses:\n{table}");
}
