//! # Web Middleware
//!
//! - [`auth`] - token validation against live sessions, injects `SecurityContext`
//! - [`request_id`] - per-request UUID for log correlation

pub mod auth;
pub mod request_id;
