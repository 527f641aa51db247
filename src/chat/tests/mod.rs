//! Unit tests for the chat module.
//!
//! Service tests run against the scripted in-memory platform, with mockall
//! doubles where call order or absence matters. The REST adapter is tested
//! against a local mock server.

mod aggregator_tests;
mod domain_tests;
