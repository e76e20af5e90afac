// SPDX-FileCopyrightText: 2026 Brokersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for brokersync workflow tests.
//!
//! Provides an in-memory [`BrokerPlatform`](brokersync_core::BrokerPlatform)
//! so the bulk workflows can be exercised deterministically without a
//! remote API.
//!
//! # Components
//!
//! - [`MockPlatform`] - in-memory organizations, connections and bindings with call capture
//! - [`PlatformCall`] - one recorded trait call

pub mod mock_platform;

pub use mock_platform::{MockPlatform, MockPlatformBuilder, PlatformCall};
