//! HTTP layer of the portal.
//!
//! HTML for the form and its response pages, JSON envelopes for the upload
//! endpoints.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
