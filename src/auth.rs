//! Local account store: sign-up, sign-in and session tokens.
//!
//! Passwords are stored as argon2 PHC strings. Sessions are identified by an
//! opaque random token that is handed to the caller at sign-in.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use diesel::prelude::*;
use rand_core::OsRng;
use uuid::Uuid;

use crate::manager::AttendanceManager;
use crate::models::{Account, NewAccount, NewSession, Session};
use crate::{Error, Result, schema};

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, stored: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| Error::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

impl AttendanceManager {
    /// Registers a new account. The stored email is trimmed and lowercased.
    pub fn sign_up(&mut self, email: &str, password: &str) -> Result<Account> {
        use schema::accounts;

        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(Error::Validation(
                "Email and password cannot be empty.".to_string(),
            ));
        }

        let existing: i64 = accounts::table
            .filter(accounts::email.eq(email.as_str()))
            .count()
            .get_result(&mut self.db)?;
        if existing > 0 {
            return Err(Error::EmailTaken(email));
        }

        let user_id = Uuid::new_v4().to_string();
        let password_hash = hash_password(password)?;

        let account = diesel::insert_into(accounts::table)
            .values(NewAccount {
                user_id: &user_id,
                email: &email,
                password_hash: &password_hash,
            })
            .returning(Account::as_returning())
            .get_result(&mut self.db)?;

        tracing::info!(%user_id, "registered account");

        Ok(account)
    }

    /// Checks `email` and `password` and issues a new session.
    pub fn sign_in(&mut self, email: &str, password: &str) -> Result<Session> {
        use schema::{accounts, sessions};

        let email = normalize_email(email);
        let account = accounts::table
            .filter(accounts::email.eq(email.as_str()))
            .select(Account::as_select())
            .first(&mut self.db)
            .optional()?
            .ok_or(Error::InvalidCredentials)?;

        if !verify_password(password, &account.password_hash)? {
            tracing::warn!(user_id = %account.user_id, "rejected sign-in");
            return Err(Error::InvalidCredentials);
        }

        let token = Uuid::new_v4().to_string();
        let session = diesel::insert_into(sessions::table)
            .values(NewSession {
                token: &token,
                user_id: &account.user_id,
                email: &account.email,
            })
            .returning(Session::as_returning())
            .get_result(&mut self.db)?;

        tracing::info!(user_id = %session.user_id, "signed in");

        Ok(session)
    }

    /// Revokes the session identified by `token`. Returns whether it existed.
    pub fn sign_out(&mut self, token: &str) -> Result<bool> {
        use schema::sessions;

        let deleted = diesel::delete(sessions::table.filter(sessions::token.eq(token)))
            .execute(&mut self.db)?;

        Ok(deleted > 0)
    }

    /// Looks up a live session by its token.
    pub fn session_for_token(&mut self, token: &str) -> Result<Option<Session>> {
        use schema::sessions;

        Ok(sessions::table
            .filter(sessions::token.eq(token))
            .select(Session::as_select())
            .first(&mut self.db)
            .optional()?)
    }
}
