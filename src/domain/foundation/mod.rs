//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, the clock abstraction and error types
//! that form the vocabulary of the specification domain.

mod clock;
mod errors;
mod ids;
mod timestamp;

pub use clock::{Clock, FixedClock, SystemClock};
pub(crate) use errors::panic_message;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::SectionId;
pub use timestamp::Timestamp;
