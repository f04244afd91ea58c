//! Signed trivia-question client.
//!
//! This crate validates request parameters, signs a canonical message with a
//! caller's P-256 private key, sends the signed GET request and decodes the
//! service's JSON envelope.
//!
//! # Modules
//!
//! - [`client`]: Orchestrator and public entry points
//! - [`constants`]: Wire names and sentinel values
//! - [`error`]: Error types and pipeline stages
//! - [`request`]: Signed request stages and query encoding
//! - [`request_signing`]: Canonical message, PEM decoding and ECDSA signing
//! - [`response`]: Response envelope decoding
//! - [`settings`]: Configuration management and validation
//! - [`test_support`]: Testing utilities and mocks
//! - [`transport`]: Blocking HTTP transport
//! - [`validation`]: Request parameter checks

pub mod client;
pub mod constants;
pub mod error;
pub mod request;
pub mod request_signing;
pub mod response;
pub mod settings;
pub mod transport;
pub mod validation;

pub use client::{get_question, get_question_by_path, QuestionClient};
pub use error::{ErrorStage, QuestionError};
pub use response::QuestionData;
pub use settings::Settings;
