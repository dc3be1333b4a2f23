//! Photo intake: validation and per-role storage of selected images.
//!
//! Intake never touches the network or the disk. A [`PhotoFile`] only
//! carries a handle to its content; the bytes are read later, one photo
//! at a time, when the roster is encoded for transmission.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::error::CoreError;
use crate::roles::{Role, REQUIRED_ROLES};
use crate::types::LocalRef;

/// Largest accepted upload: 10 MiB.
pub const MAX_PHOTO_BYTES: u64 = 10 * 1024 * 1024;

/// Where a photo's bytes live until they are encoded.
#[derive(Debug, Clone)]
pub enum PhotoContent {
    /// Bytes already held in memory (e.g. dropped or pasted).
    Memory(Arc<[u8]>),
    /// A file on disk, read lazily.
    Path(PathBuf),
}

impl PhotoContent {
    /// Read the full content. This is the only suspension point per photo.
    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        match self {
            PhotoContent::Memory(bytes) => Ok(bytes.to_vec()),
            PhotoContent::Path(path) => tokio::fs::read(path).await,
        }
    }
}

/// A file the user selected or dropped, before validation.
#[derive(Debug, Clone)]
pub struct PhotoFile {
    pub name: String,
    /// Declared media type, e.g. `image/jpeg`.
    pub media_type: String,
    pub size: u64,
    pub content: PhotoContent,
}

impl PhotoFile {
    /// Build an in-memory file; the size is taken from the buffer.
    pub fn from_bytes(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            media_type: media_type.into(),
            size: bytes.len() as u64,
            content: PhotoContent::Memory(bytes),
        }
    }
}

/// A validated photo assigned to a role.
#[derive(Debug, Clone, Serialize)]
pub struct UploadedPhoto {
    pub role: Role,
    pub name: String,
    pub media_type: String,
    pub size: u64,
    pub preview: LocalRef,
    #[serde(skip)]
    pub content: PhotoContent,
}

/// Role → photo, iterated in canonical role order.
pub type Roster = BTreeMap<Role, UploadedPhoto>;

/// Check a file against the intake rules without storing it.
pub fn validate(file: &PhotoFile) -> Result<(), CoreError> {
    let is_image = file
        .media_type
        .split_once('/')
        .is_some_and(|(top, sub)| top.trim().eq_ignore_ascii_case("image") && !sub.trim().is_empty());
    if !is_image {
        return Err(CoreError::InvalidMediaType {
            file: file.name.clone(),
            media_type: file.media_type.clone(),
        });
    }
    if file.size > MAX_PHOTO_BYTES {
        return Err(CoreError::FileTooLarge {
            file: file.name.clone(),
            size: file.size,
            limit: MAX_PHOTO_BYTES,
        });
    }
    Ok(())
}

/// At most one photo per role; replaced wholesale on re-upload.
#[derive(Debug, Default)]
pub struct PhotoIntake {
    roster: Roster,
}

impl PhotoIntake {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a photo for `role`.
    ///
    /// On rejection the existing photo for that role is left untouched.
    /// On success any previous photo is replaced and its preview handle
    /// released.
    pub fn submit(&mut self, role: Role, file: PhotoFile) -> Result<&UploadedPhoto, CoreError> {
        validate(&file)?;

        let photo = UploadedPhoto {
            role,
            name: file.name,
            media_type: file.media_type,
            size: file.size,
            preview: LocalRef::preview(),
            content: file.content,
        };

        if let Some(old) = self.roster.insert(role, photo) {
            tracing::debug!(role = %role, preview = %old.preview, "Released replaced preview");
        }

        let stored = &self.roster[&role];
        tracing::info!(role = %role, size = stored.size, "Photo accepted");
        Ok(stored)
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn get(&self, role: Role) -> Option<&UploadedPhoto> {
        self.roster.get(&role)
    }

    /// Required roles with no photo yet, in canonical order.
    pub fn missing_required(&self) -> Vec<Role> {
        REQUIRED_ROLES
            .iter()
            .copied()
            .filter(|r| !self.roster.contains_key(r))
            .collect()
    }

    /// True iff front, side and back are all present. Not cached.
    pub fn required_roles_satisfied(&self) -> bool {
        self.missing_required().is_empty()
    }

    pub fn clear(&mut self) {
        self.roster.clear();
    }
}
