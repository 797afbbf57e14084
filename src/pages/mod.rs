//! Page models for the application's views.
//!
//! Each protected page loads its data for the user in the shared
//! [`SessionContext`](crate::session::SessionContext) and either renders or
//! redirects.

pub mod attendance;
pub mod dashboard;
pub mod login;
pub mod profile;
pub mod signup;

use crate::routes::Route;

/// The outcome of loading a page.
#[derive(Debug)]
pub enum View<T> {
    Render(T),
    Redirect(Route),
}

impl<T> View<T> {
    pub fn into_render(self) -> Option<T> {
        match self {
            View::Render(page) => Some(page),
            View::Redirect(_) => None,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, View::Redirect(_))
    }
}
