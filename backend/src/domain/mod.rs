//! Domain primitives, ports and the registry service.
//!
//! Purpose: define the user record, its validation rules, and the
//! load-validate-apply-save cycles, independent of HTTP or file formats.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.
//! - `User`, `UserId`, `UserDraft`: the record and its validated input.
//! - `UserRegistryService`: implementation of the driving ports.
//! - `ports`: driving (`UsersQuery`, `UsersCommand`) and driven (`UserStore`)
//!   traits.

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_registry;

pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::trace_id::TraceId;
pub use self::user::{
    User, UserDraft, UserField, UserId, UserValidationError, validate_email_format,
    validate_fields,
};
pub use self::user_registry::{UserRegistryService, next_user_id, validate_unique_email};
