//! Cross-record rules: email uniqueness and identifier allocation.
//!
//! Both functions work on a snapshot loaded inside the registry's writer
//! critical section, so their answers stay valid until the save completes.

use crate::domain::{User, UserId, UserValidationError};

/// Reject `email` when another record already uses it, ignoring case.
///
/// `excluding` names the record being updated, which may keep its own email.
///
/// # Examples
/// ```
/// use user_registry::domain::{User, UserDraft, UserId, UserValidationError};
/// use user_registry::domain::validate_unique_email;
///
/// let draft = UserDraft::try_from_parts("Ann", "ann@x.com", "admin").expect("draft");
/// let users = vec![User::new(UserId::new(1), draft)];
/// assert_eq!(
///     validate_unique_email("ANN@X.COM", &users, None),
///     Err(UserValidationError::DuplicateEmail)
/// );
/// assert_eq!(validate_unique_email("ann@x.com", &users, Some(UserId::new(1))), Ok(()));
/// ```
pub fn validate_unique_email(
    email: &str,
    users: &[User],
    excluding: Option<UserId>,
) -> Result<(), UserValidationError> {
    let taken = users
        .iter()
        .filter(|user| Some(user.id()) != excluding)
        .any(|user| user.has_email(email));
    if taken {
        Err(UserValidationError::DuplicateEmail)
    } else {
        Ok(())
    }
}

/// Allocate `max(existing ids, 0) + 1`.
///
/// Returns `None` when the largest id is already `u64::MAX`.
///
/// # Examples
/// ```
/// use user_registry::domain::{next_user_id, UserId};
///
/// assert_eq!(next_user_id(&[]), Some(UserId::new(1)));
/// ```
pub fn next_user_id(users: &[User]) -> Option<UserId> {
    users
        .iter()
        .map(User::id)
        .max()
        .unwrap_or(UserId::new(0))
        .checked_next()
}
