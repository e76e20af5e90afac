// SPDX-FileCopyrightText: 2026 Brokersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types shared by the gateway, the orchestrator, and the binary.

use thiserror::Error;

/// The primary error type used across the brokersync workspace.
///
/// Non-2xx HTTP statuses are not errors: the gateway maps them onto empty,
/// `false`, or `None` results. Only transport failures, undecodable bodies,
/// and caller bugs surface here.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// Missing or invalid configuration (tenant id, group id, token header).
    #[error("configuration error: {0}")]
    Config(String),

    /// The request never produced a response (connect, TLS, timeout).
    #[error("http error: {message}")]
    Http {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A response arrived but its body could not be decoded.
    #[error("invalid response: {message}")]
    InvalidResponse {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BrokerError {
    /// Returns true for the caller-bug class that must abort a run.
    pub fn is_config(&self) -> bool {
        matches!(self, BrokerError::Config(_))
    }
}
