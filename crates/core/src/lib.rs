//! Domain logic for the digital twin capture client.
//!
//! Everything here is synchronous and free of network access: role and
//! preset vocabularies, the measurement registry and capture, photo
//! intake, QA report rendering, model artifact handling and the status
//! board. The async workflow that ties these to the reconstruction
//! service lives in `twin-client`.

pub mod artifact;
pub mod capture;
pub mod error;
pub mod intake;
pub mod naming;
pub mod preset;
pub mod qa;
pub mod registry;
pub mod roles;
pub mod status;
pub mod types;
