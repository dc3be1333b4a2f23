//! Encoding pipeline: roster → base64 strings ready for the request body.

use base64::{engine::general_purpose, Engine as _};
use twin_core::intake::{Roster, MAX_PHOTO_BYTES};
use twin_core::roles::Role;

/// One photo's content, base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPhoto {
    pub role: Role,
    pub data: String,
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to read {role} photo '{name}': {source}")]
pub struct EncodeError {
    pub role: Role,
    pub name: String,
    #[source]
    pub source: std::io::Error,
}

/// Encode every present photo, one at a time, in role order.
///
/// Reads are strictly sequential. If any read fails, or a file has grown
/// past the upload limit since it was accepted, the whole call fails and
/// nothing is returned for the photos already encoded.
pub async fn encode_roster(roster: &Roster) -> Result<Vec<EncodedPhoto>, EncodeError> {
    let mut encoded = Vec::with_capacity(roster.len());

    // BTreeMap<Role, _> iterates front, side, back, foot.
    for (&role, photo) in roster {
        let bytes = photo.content.read().await.map_err(|source| EncodeError {
            role,
            name: photo.name.clone(),
            source,
        })?;
        if bytes.len() as u64 > MAX_PHOTO_BYTES {
            return Err(EncodeError {
                role,
                name: photo.name.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("{} bytes exceeds the {MAX_PHOTO_BYTES} byte limit", bytes.len()),
                ),
            });
        }
        tracing::debug!(role = %role, bytes = bytes.len(), "Encoded photo");
        encoded.push(EncodedPhoto {
            role,
            data: general_purpose::STANDARD.encode(&bytes),
        });
    }

    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use twin_core::intake::{PhotoContent, PhotoFile, PhotoIntake};

    use super::*;

    #[tokio::test]
    async fn encodes_in_role_order() {
        let mut intake = PhotoIntake::new();
        intake
            .submit(Role::Back, PhotoFile::from_bytes("b.jpg", "image/jpeg", b"back".to_vec()))
            .unwrap();
        intake
            .submit(Role::Front, PhotoFile::from_bytes("f.jpg", "image/jpeg", b"front".to_vec()))
            .unwrap();

        let encoded = encode_roster(intake.roster()).await.unwrap();
        assert_eq!(encoded.len(), 2);
        assert_eq!(encoded[0].role, Role::Front);
        assert_eq!(encoded[0].data, "ZnJvbnQ=");
        assert_eq!(encoded[1].role, Role::Back);
        assert_eq!(encoded[1].data, "YmFjaw==");
    }

    #[tokio::test]
    async fn one_failed_read_fails_everything() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("front.jpg");
        std::fs::write(&present, b"front").unwrap();

        let mut intake = PhotoIntake::new();
        for (role, path) in [(Role::Front, present), (Role::Side, dir.path().join("missing.jpg"))] {
            let file = PhotoFile {
                name: path.file_name().unwrap().to_string_lossy().into_owned(),
                media_type: "image/jpeg".into(),
                size: 5,
                content: PhotoContent::Path(path),
            };
            intake.submit(role, file).unwrap();
        }

        let err = encode_roster(intake.roster()).await.unwrap_err();
        assert_eq!(err.role, Role::Side);
        assert_eq!(err.name, "missing.jpg");
        assert_matches!(err.source.kind(), std::io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn content_grown_past_limit_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("front.jpg");
        std::fs::write(&path, b"small").unwrap();

        let mut intake = PhotoIntake::new();
        let file = PhotoFile {
            name: "front.jpg".into(),
            media_type: "image/jpeg".into(),
            size: 5,
            content: PhotoContent::Path(path.clone()),
        };
        intake.submit(Role::Front, file).unwrap();

        // Replaced on disk after it passed intake.
        std::fs::write(&path, vec![0u8; MAX_PHOTO_BYTES as usize + 1]).unwrap();

        let err = encode_roster(intake.roster()).await.unwrap_err();
        assert_eq!(err.role, Role::Front);
        assert_matches!(err.source.kind(), std::io::ErrorKind::InvalidData);
    }
}
