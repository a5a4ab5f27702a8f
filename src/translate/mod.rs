//! Translation of the peer's loosely-typed JSON into domain messages.
//!
//! The peer returns partially populated documents whose fields may be
//! missing, `null`, or of an unexpected type. This module turns them into
//! [`crate::models`] values under a lossy-tolerant contract:
//!
//! - [`FieldReader`] reads one typed field at a time and reports, but never
//!   raises, absence or mismatch.
//! - [`ResponseTranslator`] composes those reads into whole messages.
//! - [`BytesEncoding`] decides how string fields become raw bytes.
//!
//! Whether skipped fields are reported is controlled by a single alert flag.
//! With alerts on, each skipped field is logged at `warn` level and collected
//! as a [`FieldIssue`]; with alerts off nothing is emitted. The built values
//! are identical either way.

mod builders;
mod bytes;
mod reader;

pub use builders::ResponseTranslator;
pub use bytes::BytesEncoding;
pub use reader::{FieldIssue, FieldReader, IssueKind};
