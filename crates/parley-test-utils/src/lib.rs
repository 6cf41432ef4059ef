// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Parley integration tests.
//!
//! Provides a scripted agent runtime and a harness that wires a
//! [`parley_agent::ChatSession`] over it, so chat turns can be driven in
//! tests without network access.
//!
//! # Components
//!
//! - [`MockRuntime`] - Agent runtime with scripted event turns and call counters
//! - [`TestHarness`] - Builder-configured chat session over a `MockRuntime`

pub mod harness;
pub mod mock_runtime;

pub use harness::TestHarness;
pub use mock_runtime::{MockRuntime, MockTurn, final_text_event, partial_text_event};
