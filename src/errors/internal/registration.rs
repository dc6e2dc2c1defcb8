use thiserror::Error;

/// Input rejected before any user row is written
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("Registration rejected: {}", .0.join(" "))]
    Invalid(Vec<String>),
}

impl RegistrationError {
    pub fn messages(&self) -> &[String] {
        match self {
            RegistrationError::Invalid(messages) => messages,
        }
    }
}
