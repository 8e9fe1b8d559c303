//! Request handlers for the portal endpoints.

pub mod action;
pub mod form;
pub mod upload;
