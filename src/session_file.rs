//! Persists the CLI's session between invocations.
//!
//! Only the session itself is written; on startup the token is checked against
//! the account store so a revoked session is not restored.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::Result;
use crate::manager::AttendanceManager;
use crate::models::Session;
use crate::session::{SessionContext, Subscription};

/// Builds a [`SessionContext`] from the session saved at `path`, if it is still live.
pub fn restore(manager: &mut AttendanceManager, path: &Path) -> Result<SessionContext> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(SessionContext::new()),
        Err(e) => return Err(e.into()),
    };

    let saved: Session = match serde_json::from_str(&contents) {
        Ok(saved) => saved,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "saved session is unreadable, discarding it"
            );
            fs::remove_file(path)?;
            return Ok(SessionContext::new());
        }
    };
    match manager.session_for_token(&saved.token)? {
        Some(session) => Ok(SessionContext::with_session(session)),
        None => {
            tracing::info!(path = %path.display(), "saved session was revoked, discarding it");
            fs::remove_file(path)?;
            Ok(SessionContext::new())
        }
    }
}

fn write(path: &Path, session: Option<&Session>) -> Result<()> {
    match session {
        Some(session) => fs::write(path, serde_json::to_string_pretty(session)?)?,
        None => match fs::remove_file(path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        },
    }
    Ok(())
}

/// Keeps the file at `path` in sync with `context` for as long as the
/// subscription lives.
pub fn persist(context: &SessionContext, path: impl Into<PathBuf>) -> Subscription {
    let path = path.into();
    context.subscribe(move |session| {
        if let Err(e) = write(&path, session) {
            tracing::error!(path = %path.display(), error = %e, "failed to save session");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    /// A path in the temp directory that is removed again on drop.
    struct TempPath(PathBuf);

    impl TempPath {
        fn new() -> Self {
            Self(std::env::temp_dir().join(format!("attendance-session-{}", Uuid::new_v4())))
        }
    }

    impl Drop for TempPath {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
        }
    }

    fn signed_up() -> AttendanceManager {
        let mut manager = AttendanceManager::open_in_memory().unwrap();
        manager.sign_up("ferris@example.com", "hunter2").unwrap();
        manager
    }

    #[test]
    fn missing_file_starts_signed_out() {
        let mut m = signed_up();
        let path = TempPath::new();

        assert!(!restore(&mut m, &path.0).unwrap().is_authenticated());
    }

    #[test]
    fn saved_session_is_restored_and_cleared() {
        let mut m = signed_up();
        let path = TempPath::new();

        let context = SessionContext::new();
        let _saved = persist(&context, &path.0);
        let session = m.sign_in("ferris@example.com", "hunter2").unwrap();
        context.set(session.clone());
        assert!(path.0.exists());

        let restored = restore(&mut m, &path.0).unwrap();
        assert_eq!(restored.current(), Some(session));

        context.clear();
        assert!(!path.0.exists());
    }

    #[test]
    fn revoked_session_is_discarded() {
        let mut m = signed_up();
        let path = TempPath::new();

        let context = SessionContext::new();
        let _saved = persist(&context, &path.0);
        let session = m.sign_in("ferris@example.com", "hunter2").unwrap();
        context.set(session.clone());
        m.sign_out(&session.token).unwrap();

        assert!(!restore(&mut m, &path.0).unwrap().is_authenticated());
        assert!(!path.0.exists());
    }

    #[test]
    fn unreadable_file_is_discarded() {
        let mut m = signed_up();
        let path = TempPath::new();
        fs::write(&path.0, "{\"token\": \"trunc").unwrap();

        assert!(!restore(&mut m, &path.0).unwrap().is_authenticated());
        assert!(!path.0.exists());
    }

    #[test]
    fn nothing_is_written_after_unsubscribing() {
        let mut m = signed_up();
        let path = TempPath::new();

        let context = SessionContext::new();
        persist(&context, &path.0).unsubscribe();
        context.set(m.sign_in("ferris@example.com", "hunter2").unwrap());

        assert!(!path.0.exists());
    }
}
