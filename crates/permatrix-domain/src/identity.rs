use crate::roles::Role;

/// A verified caller: canonical role plus the subject the credential belongs to.
///
/// Anonymous callers are `Guest` with no subject.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub role: Role,
    pub subject_id: Option<String>,
}

impl Identity {
    pub fn new(role: Role, subject_id: impl Into<String>) -> Self {
        Self {
            role,
            subject_id: Some(subject_id.into()),
        }
    }

    pub fn guest() -> Self {
        Self {
            role: Role::guest(),
            subject_id: None,
        }
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject_id.as_deref()
    }
}
