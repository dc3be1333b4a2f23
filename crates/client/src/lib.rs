//! Reconstruction service client.
//!
//! Ties the `twin-core` components to the remote service: encodes the
//! photo roster, builds the verify/generate request bodies, makes the
//! single HTTP call per user action and fans the reply out to the QA panel
//! and the model viewer. [`orchestrator::Orchestrator`] is the entry
//! point; [`handlers::handle`] maps named UI events onto it.

pub mod config;
pub mod download;
pub mod encoding;
pub mod events;
pub mod files;
pub mod handlers;
pub mod orchestrator;
pub mod request;
pub mod response;
pub mod session;
pub mod transport;
