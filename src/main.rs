use anyhow::Context as _;
use attendance_tracker::cli::{Cli, Command};
use attendance_tracker::date_key::DateKey;
use attendance_tracker::manager::AttendanceManager;
use attendance_tracker::models::DesiredStatus;
use attendance_tracker::pages::View;
use attendance_tracker::pages::attendance::AttendanceSheet;
use attendance_tracker::pages::dashboard::Dashboard;
use attendance_tracker::pages::login;
use attendance_tracker::pages::profile::ProfilePage;
use attendance_tracker::pages::signup::{self, ProfileDetails};
use attendance_tracker::routes::{self, Route};
use attendance_tracker::session::SessionContext;
use attendance_tracker::settings::Settings;
use attendance_tracker::{Error, Result, display, import, session_file};
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();

    let settings = Settings::load_from(&cli.config).context("failed to load settings")?;
    let mut manager = AttendanceManager::connect(&settings.database_url)
        .with_context(|| format!("failed to open database {:?}", settings.database_url))?;

    let context = session_file::restore(&mut manager, &settings.session_file)
        .context("failed to restore session")?;
    let _saved_session = session_file::persist(&context, &settings.session_file);

    if let Err(err) = run(cli.command, &context, &mut manager) {
        tracing::error!(error = %err, "command failed");
        return Err(err.into());
    }

    Ok(())
}

/// The page a command belongs to, used to gate commands on the session.
fn route_of(command: &Command) -> Route {
    match command {
        Command::Signup { .. } => Route::Signup,
        Command::Login { .. } | Command::Logout => Route::Login,
        Command::Dashboard { .. } | Command::FlagAtRisk => Route::Dashboard,
        Command::Attendance { .. } | Command::Mark { .. } | Command::Clear { .. } => {
            Route::Attendance
        }
        Command::Profile
        | Command::UpdateProfile { .. }
        | Command::AddCourse { .. }
        | Command::EditCourse { .. }
        | Command::ImportCourses { .. } => Route::Profile,
    }
}

/// Unwraps a rendered page, turning a redirect into an error for the command line.
fn rendered<T>(view: View<T>) -> Result<T> {
    match view {
        View::Render(page) => Ok(page),
        View::Redirect(route) => {
            println!("Please log in first (redirected to {route}).");
            Err(Error::Unauthenticated)
        }
    }
}

fn run(command: Command, context: &SessionContext, manager: &mut AttendanceManager) -> Result<()> {
    let requested = route_of(&command);
    if routes::resolve(requested, context) != requested {
        return rendered::<()>(View::Redirect(Route::Login));
    }

    match command {
        Command::Signup {
            email,
            password,
            first_name,
            last_name,
            subjects,
        } => {
            let details = ProfileDetails {
                first_name,
                last_name,
                subjects,
            };
            let profile = signup::sign_up(manager, &email, &password, &details)?;
            println!(
                "Created profile for {} {}. Run `login` to sign in.",
                profile.first_name, profile.last_name
            );
        }
        Command::Login { email, password } => {
            let session = login::sign_in(context, manager, &email, &password)?;
            println!("Signed in as {}.", session.email);
        }
        Command::Logout => match login::sign_out(context, manager)? {
            Some(_) => println!("Signed out."),
            None => println!("Not signed in."),
        },
        Command::Dashboard { date } => {
            let day = date.unwrap_or_else(DateKey::today);
            let dashboard = rendered(Dashboard::load(context, manager, Some(day))?)?;
            display::show_dashboard(&dashboard);
        }
        Command::FlagAtRisk => {
            let dashboard = rendered(Dashboard::load(context, manager, None)?)?;
            display::show_at_risk(&dashboard);
        }
        Command::Attendance { date } => {
            let day = date.unwrap_or_else(DateKey::today);
            let sheet = rendered(AttendanceSheet::load(context, manager, Some(day))?)?;
            display::show_attendance_sheet(&sheet);
        }
        Command::Mark {
            subject,
            status,
            date,
        } => {
            let day = date.unwrap_or_else(DateKey::today);
            let sheet = rendered(AttendanceSheet::mark(
                context,
                manager,
                Some(day),
                &subject,
                DesiredStatus::Mark(status),
            )?)?;
            display::show_attendance_sheet(&sheet);
        }
        Command::Clear { subject, date } => {
            let day = date.unwrap_or_else(DateKey::today);
            let sheet = rendered(AttendanceSheet::mark(
                context,
                manager,
                Some(day),
                &subject,
                DesiredStatus::Clear,
            )?)?;
            display::show_attendance_sheet(&sheet);
        }
        Command::Profile => {
            let page = rendered(ProfilePage::load(context, manager)?)?;
            display::show_profile(&page);
        }
        Command::UpdateProfile {
            first_name,
            last_name,
        } => {
            let page = rendered(ProfilePage::update_names(
                context,
                manager,
                &first_name,
                &last_name,
            )?)?;
            display::show_profile(&page);
        }
        Command::AddCourse { code, name } => {
            let page = rendered(ProfilePage::add_course(context, manager, &code, &name)?)?;
            display::show_profile(&page);
        }
        Command::EditCourse { id, code, name } => {
            let page = rendered(ProfilePage::edit_course(
                context, manager, id, &code, &name,
            )?)?;
            display::show_profile(&page);
        }
        Command::ImportCourses { file_path } => {
            let entries = import::read_courses_file(&file_path)?;
            let report = rendered(import::import_courses(context, manager, &entries)?)?;

            for course in &report.added {
                println!("Added {} ({})", course.subject_code, course.subject_name);
            }
            for code in &report.existing {
                println!("Already registered: {code}");
            }
            if report.skipped > 0 {
                println!("Skipped {} incomplete rows", report.skipped);
            }
        }
    }

    Ok(())
}
