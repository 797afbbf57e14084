//! Signing in and out of the shared session.

use crate::Result;
use crate::manager::AttendanceManager;
use crate::models::Session;
use crate::session::SessionContext;

/// Signs in and makes the new session current. A session the context already
/// held is revoked first.
pub fn sign_in(
    context: &SessionContext,
    manager: &mut AttendanceManager,
    email: &str,
    password: &str,
) -> Result<Session> {
    let session = manager.sign_in(email, password)?;

    if let Some(previous) = context.current()
        && previous.token != session.token
    {
        manager.sign_out(&previous.token)?;
        tracing::debug!(user_id = %previous.user_id, "revoked replaced session");
    }

    context.set(session.clone());
    Ok(session)
}

/// Clears the current session and revokes its token. Returns the session that
/// was signed out, if any.
pub fn sign_out(
    context: &SessionContext,
    manager: &mut AttendanceManager,
) -> Result<Option<Session>> {
    let Some(session) = context.clear() else {
        return Ok(None);
    };
    manager.sign_out(&session.token)?;
    Ok(Some(session))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager_with(emails: &[&str]) -> AttendanceManager {
        let mut manager = AttendanceManager::open_in_memory().unwrap();
        for email in emails {
            manager.sign_up(email, "hunter2").unwrap();
        }
        manager
    }

    #[test]
    fn signing_in_again_revokes_the_previous_session() {
        let mut m = manager_with(&["ferris@example.com", "corro@example.com"]);
        let context = SessionContext::new();

        let first = sign_in(&context, &mut m, "ferris@example.com", "hunter2").unwrap();
        let second = sign_in(&context, &mut m, "corro@example.com", "hunter2").unwrap();

        assert_eq!(context.current(), Some(second.clone()));
        assert_eq!(m.session_for_token(&first.token).unwrap(), None);
        assert_eq!(m.session_for_token(&second.token).unwrap(), Some(second));
    }

    #[test]
    fn failed_sign_in_keeps_the_current_session() {
        let mut m = manager_with(&["ferris@example.com"]);
        let context = SessionContext::new();
        let session = sign_in(&context, &mut m, "ferris@example.com", "hunter2").unwrap();

        assert!(sign_in(&context, &mut m, "ferris@example.com", "wrong").is_err());

        assert_eq!(context.current(), Some(session.clone()));
        assert!(m.session_for_token(&session.token).unwrap().is_some());
    }

    #[test]
    fn sign_out_revokes_and_clears() {
        let mut m = manager_with(&["ferris@example.com"]);
        let context = SessionContext::new();
        let session = sign_in(&context, &mut m, "ferris@example.com", "hunter2").unwrap();

        assert_eq!(sign_out(&context, &mut m).unwrap(), Some(session.clone()));
        assert!(!context.is_authenticated());
        assert_eq!(m.session_for_token(&session.token).unwrap(), None);

        assert_eq!(sign_out(&context, &mut m).unwrap(), None);
    }
}
