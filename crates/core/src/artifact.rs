//! Generated model handling: storage, viewer wiring and download.
//!
//! At most one [`Artifact`] is live at a time. It is replaced by every
//! successful generation and is the only source for downloads.

use base64::{engine::general_purpose, Engine as _};
use serde::Serialize;

use crate::error::CoreError;
use crate::naming::artifact_filename;
use crate::preset::Preset;
use crate::types::{LocalRef, Timestamp};

/// Media type of the downloaded model.
pub const MODEL_MEDIA_TYPE: &str = "model/gltf-binary";

/// Camera orbit the viewer is reset to.
pub const DEFAULT_CAMERA_ORBIT: &str = "0deg 75deg 105%";

// ---------------------------------------------------------------------------
// Artifact
// ---------------------------------------------------------------------------

/// A generated model: the decoded GLB plus the base64 form it arrived in.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    bytes: Vec<u8>,
    encoded: String,
}

impl Artifact {
    /// Decode a base64 model payload. Empty payloads are rejected.
    pub fn from_base64(encoded: &str) -> Result<Self, CoreError> {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(CoreError::InvalidArtifact("empty model payload".into()));
        }
        let bytes = general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| CoreError::InvalidArtifact(e.to_string()))?;
        Ok(Self {
            bytes,
            encoded: encoded.to_string(),
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A file ready to be handed to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadFile {
    pub filename: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Viewer surface
// ---------------------------------------------------------------------------

/// The small property surface of the 3D viewer widget.
pub trait ViewerSurface {
    fn set_source(&mut self, source: Option<&LocalRef>);
    fn set_camera_orbit(&mut self, orbit: &str);
    /// Turntable rotation in degrees.
    fn set_rotation(&mut self, degrees: f64);
}

/// Property values currently applied to the viewer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewerState {
    pub source: Option<LocalRef>,
    pub camera_orbit: String,
    pub rotation: f64,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            source: None,
            camera_orbit: DEFAULT_CAMERA_ORBIT.to_string(),
            rotation: 0.0,
        }
    }
}

impl ViewerSurface for ViewerState {
    fn set_source(&mut self, source: Option<&LocalRef>) {
        self.source = source.cloned();
    }

    fn set_camera_orbit(&mut self, orbit: &str) {
        self.camera_orbit = orbit.to_string();
    }

    fn set_rotation(&mut self, degrees: f64) {
        self.rotation = degrees;
    }
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// Holds the last generated model and drives the viewer and downloads.
#[derive(Debug, Default)]
pub struct ArtifactHandler {
    current: Option<Artifact>,
    source: Option<LocalRef>,
}

impl ArtifactHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new model, replacing any previous one, and show it.
    pub fn accept(&mut self, artifact: Artifact, viewer: &mut dyn ViewerSurface) -> &LocalRef {
        tracing::info!(bytes = artifact.len(), "Model ready");
        self.current = Some(artifact);

        if let Some(old) = self.source.take() {
            tracing::debug!(source = %old, "Released previous model reference");
        }
        let source = self.source.insert(LocalRef::blob());
        viewer.set_source(Some(&*source));
        source
    }

    pub fn current(&self) -> Option<&Artifact> {
        self.current.as_ref()
    }

    pub fn source(&self) -> Option<&LocalRef> {
        self.source.as_ref()
    }

    pub fn download_available(&self) -> bool {
        self.current.is_some()
    }

    /// Produce the download for the stored model.
    pub fn download(&self, preset: Preset, now: Timestamp) -> Result<DownloadFile, CoreError> {
        let Some(artifact) = &self.current else {
            tracing::warn!("Download requested with no generated model");
            return Err(CoreError::NoArtifact);
        };
        Ok(DownloadFile {
            filename: artifact_filename(preset, now),
            media_type: MODEL_MEDIA_TYPE,
            bytes: artifact.bytes().to_vec(),
        })
    }

    /// Put the camera back to its default orbit and zero the rotation.
    pub fn reset_viewer(&self, viewer: &mut dyn ViewerSurface) {
        viewer.set_camera_orbit(DEFAULT_CAMERA_ORBIT);
        viewer.set_rotation(0.0);
    }

    pub fn clear(&mut self, viewer: &mut dyn ViewerSurface) {
        self.current = None;
        self.source = None;
        viewer.set_source(None);
    }
}
