//! Shared domain for the tutoring dashboard's AI-backed operations.
//!
//! Request flow: [`validation`] → provider (outside this crate) →
//! [`fallback`] on provider failure → [`envelope`].

pub mod dataset;
pub mod envelope;
pub mod error;
pub mod fallback;
pub mod notifications;
pub mod operations;
pub mod validation;
