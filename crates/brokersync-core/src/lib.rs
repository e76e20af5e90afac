// SPDX-FileCopyrightText: 2026 Brokersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for brokersync.
//!
//! Holds the domain records, the outcome and report types handed to the
//! console layer, the shared error type, and the [`BrokerPlatform`] trait
//! that separates the API gateway from the bulk orchestrator.

pub mod error;
pub mod report;
pub mod traits;
pub mod types;

pub use error::BrokerError;
pub use report::{ConfigurePreview, ConfigureReport, OperationResult, OutcomeStatus, RemovalReport};
pub use traits::BrokerPlatform;
pub use types::{BrokerConnection, BrokerIntegration, Integration, Organization, Project, Target};
