//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural
//! principles:
//! - The core crate stays headless (no UI-framework imports)
//! - No blocking sleeps in async production code
//! - Timed behavior goes through the async runtime
//!
//! These tests are designed to catch violations early in the development
//! cycle.

#![allow(dead_code)]

pub fn placeholder() {
    // Placeholder to make this a valid library
}
