//! Common test utilities and fixtures for adtopo-core tests.
//!
//! This module provides reusable test infrastructure including:
//! - An in-memory fixture forest implementing the directory view traits
//! - An always-failing site for exercising fatal traversal errors
//! - Helper constructors for hosts and servers
