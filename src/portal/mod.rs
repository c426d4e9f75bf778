//! Enedis customer portal client
//!
//! The portal has no public API. The client replays what a browser does:
//! submit the login form, keep the session cookies, then call the
//! consumption portlet's resource endpoint which answers with JSON.
//!
//! - `session`: cookie-backed HTTP session and the login handshake
//! - `types`: resolution selector and wire-format types
//! - `protocol`: data request, decoding and sample-to-measurement mapping
//! - `client`: validated, logged-in facade

pub mod client;
pub mod protocol;
pub mod session;
pub mod types;

pub use client::{ClientConfig, PortalClient};
pub use session::{Credentials, PortalSession};
pub use types::{DataResponse, RawSample, Resolution};
