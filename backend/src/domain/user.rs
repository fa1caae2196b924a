//! User record model and field-level validation.
//!
//! A [`User`] is only ever built from a [`UserDraft`], and a draft only exists
//! once its fields passed [`validate_fields`] and [`validate_email_format`].
//! Cross-record rules (email uniqueness, id allocation) live with the
//! registry service because they need the full record set.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Record field names, in the order presence is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    /// The `name` field.
    Name,
    /// The `email` field.
    Email,
    /// The `role` field.
    Role,
}

impl UserField {
    /// Field name as it appears on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Role => "role",
        }
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failures for submitted user fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// A required field was absent or blank.
    MissingField {
        /// First missing field in presence-check order.
        field: UserField,
    },
    /// The email does not look like `local@domain.tld`.
    InvalidEmailFormat,
    /// Another record already uses this email, ignoring case.
    DuplicateEmail,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { .. } => write!(f, "Name, email, and role are required"),
            Self::InvalidEmailFormat => write!(f, "Invalid email format"),
            Self::DuplicateEmail => write!(f, "User with this email already exists"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Positive integer identifier assigned by the registry on creation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Wrap a raw identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw integer value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The identifier following this one, or `None` once the id space is spent.
    pub const fn checked_next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(next) => Some(Self(next)),
            None => None,
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Reject submissions where any of `name`, `email` or `role` is blank.
///
/// Fields are checked in declaration order; the first blank one is reported.
///
/// # Examples
/// ```
/// use user_registry::domain::{UserField, UserValidationError, validate_fields};
///
/// assert_eq!(
///     validate_fields("Ann", "  ", "admin"),
///     Err(UserValidationError::MissingField { field: UserField::Email })
/// );
/// ```
pub fn validate_fields(name: &str, email: &str, role: &str) -> Result<(), UserValidationError> {
    [
        (UserField::Name, name),
        (UserField::Email, email),
        (UserField::Role, role),
    ]
    .into_iter()
    .find(|(_, value)| value.trim().is_empty())
    .map_or(Ok(()), |(field, _)| {
        Err(UserValidationError::MissingField { field })
    })
}

/// Reject emails that do not match `local@domain.tld`.
///
/// The raw value is matched, so surrounding whitespace is rejected too.
pub fn validate_email_format(email: &str) -> Result<(), UserValidationError> {
    if email_regex().is_match(email) {
        Ok(())
    } else {
        Err(UserValidationError::InvalidEmailFormat)
    }
}

/// Field values that passed presence and format validation.
///
/// ## Invariants
/// - `name` is trimmed and non-empty.
/// - `email` is trimmed, lower-cased and well formed.
/// - `role` is kept as submitted and is not blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    name: String,
    email: String,
    role: String,
}

impl UserDraft {
    /// Validate raw submitted fields and normalise them for storage.
    ///
    /// # Examples
    /// ```
    /// use user_registry::domain::UserDraft;
    ///
    /// let draft = UserDraft::try_from_parts(" Ann ", "Ann@X.com", "admin").expect("valid draft");
    /// assert_eq!(draft.name(), "Ann");
    /// assert_eq!(draft.email(), "ann@x.com");
    /// ```
    pub fn try_from_parts(name: &str, email: &str, role: &str) -> Result<Self, UserValidationError> {
        validate_fields(name, email, role)?;
        validate_email_format(email)?;
        Ok(Self {
            name: name.trim().to_owned(),
            email: email.trim().to_lowercase(),
            role: role.to_owned(),
        })
    }

    /// Trimmed display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Normalised email address.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Role as submitted.
    pub fn role(&self) -> &str {
        self.role.as_str()
    }
}

/// Persisted user record.
///
/// Serialises as `{"id", "name", "email", "role"}`, which is both the API
/// representation and the on-disk layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    role: String,
}

impl User {
    /// Assemble a record from an allocated id and validated fields.
    pub fn new(id: UserId, draft: UserDraft) -> Self {
        let UserDraft { name, email, role } = draft;
        Self {
            id,
            name,
            email,
            role,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Stored email address.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Whether this record's email matches `email`, ignoring case.
    pub fn has_email(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.to_lowercase()
    }

    /// Opaque role label.
    pub fn role(&self) -> &str {
        self.role.as_str()
    }
}
