// SPDX-FileCopyrightText: 2026 Brokersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions at the gateway/orchestrator seam.

pub mod platform;

pub use platform::BrokerPlatform;
