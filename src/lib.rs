//! dca: a Discord command-line client for agentic workflows.
//!
//! The crate reads recent activity, direct conversations, and search results
//! from the chat platform and performs single-message actions on behalf of
//! the account owner. Every command emits one JSON envelope so scripts and
//! language models can consume the output directly.
//!
//! # Architecture
//!
//! The chat context follows hexagonal architecture principles:
//!
//! - **Domain**: value objects for identifiers, messages, and search queries
//! - **Ports**: transport traits the services depend on
//! - **Adapters**: the REST client and a scripted in-memory platform
//! - **Services**: aggregation, enumeration, identity resolution, and search
//!
//! # Modules
//!
//! - [`chat`]: domain, ports, adapters, and services
//! - [`config`]: configuration file and token resolution
//! - [`output`]: the JSON result envelope
//! - [`telemetry`]: diagnostic logging to stderr
//! - [`cli`]: argument model, approval prompt, and command dispatch

pub mod chat;
pub mod cli;
pub mod config;
pub mod output;
pub mod telemetry;
