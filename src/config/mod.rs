// ABOUTME: Configuration management for the pantry depletion engine
// ABOUTME: Environment-driven settings with centralized defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Intelligence

/// Environment-based configuration loading
pub mod environment;

pub use environment::DepletionConfig;
