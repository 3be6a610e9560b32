//! Core protocol types for the Tiny Tiny RSS JSON API.
//!
//! This crate holds everything about the protocol that does not touch the
//! network, and is shared by the client (`ttrss-rpc-client`) and by tests
//! that stand in for the server.
//!
//! ## Modules
//!
//! - [`value`]: Parameter values (scalars and comma-joined lists)
//! - [`session`]: The opaque session token
//! - [`envelope`]: Request envelope building
//! - [`classify`]: Response decoding and success/error classification
//! - [`error`]: Service error codes and decode errors
//!
//! ## Wire format
//!
//! Every request is a single JSON object posted to the API endpoint:
//!
//! ```text
//! {"op": "getHeadlines", "sid": "<session>", "feed_id": -4, "limit": 20}
//! ```
//!
//! Every response is a single JSON object. An object carrying an `error` key
//! is a service-level error, anything else is an operation-specific payload:
//!
//! ```text
//! {"session_id": "abc123", "api_level": 15}
//! {"error": "NOT_LOGGED_IN"}
//! ```

mod classify;
mod envelope;
mod error;
mod session;
mod value;

pub use classify::*;
pub use envelope::*;
pub use error::*;
pub use session::*;
pub use value::*;
