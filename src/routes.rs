//! The static path table and its session gate.

use std::fmt;
use std::str::FromStr;

use crate::Error;
use crate::session::SessionContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Signup,
    Attendance,
    Profile,
}

impl Route {
    pub const ALL: [Route; 5] = [
        Route::Login,
        Route::Dashboard,
        Route::Signup,
        Route::Attendance,
        Route::Profile,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Dashboard => "/dashboard",
            Route::Signup => "/signup",
            Route::Attendance => "/attendance",
            Route::Profile => "/profile",
        }
    }

    /// Whether the route may only be shown to a signed-in user.
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Dashboard | Route::Attendance | Route::Profile)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::ALL
            .into_iter()
            .find(|route| route.path() == s)
            .ok_or_else(|| Error::Validation(format!("unknown route {s:?}")))
    }
}

/// Returns the route that should actually be shown for `requested`.
///
/// Protected routes fall back to [`Route::Login`] when nobody is signed in.
pub fn resolve(requested: Route, context: &SessionContext) -> Route {
    if requested.is_protected() && !context.is_authenticated() {
        tracing::debug!(%requested, "no session, redirecting to login");
        Route::Login
    } else {
        requested
    }
}
