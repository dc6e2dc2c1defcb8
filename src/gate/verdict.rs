use std::fmt;

/// Login entry point unauthenticated callers are sent to
pub const LOGIN_PATH: &str = "/api/auth/login";

/// Why the gate refused a request
///
/// `Forbidden` deliberately carries nothing: the caller is never told which
/// permission or role was missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    Unauthenticated {
        login_path: String,
        /// Target to return to after a successful login
        resume_to: Option<String>,
    },
    Forbidden,
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denial::Unauthenticated { .. } => write!(f, "Please log in to access this page."),
            Denial::Forbidden => write!(f, "You do not have permission to access this page."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Deny(Denial),
}

impl Verdict {
    pub fn unauthenticated(login_path: &str, resume_to: Option<String>) -> Self {
        Verdict::Deny(Denial::Unauthenticated {
            login_path: login_path.to_owned(),
            resume_to,
        })
    }

    pub fn forbidden() -> Self {
        Verdict::Deny(Denial::Forbidden)
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Verdict::Allow)
    }
}
