//! Building [`PhotoFile`]s from paths on disk.

use std::path::Path;

use twin_core::intake::{PhotoContent, PhotoFile};

/// Media type reported for files whose format cannot be determined.
const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// Describe a file on disk as a selected photo.
///
/// Only metadata is read here: the size comes from the filesystem and the
/// media type from the extension. The content itself is read when the
/// roster is encoded.
pub async fn load_photo(path: &Path) -> std::io::Result<PhotoFile> {
    let metadata = tokio::fs::metadata(path).await?;
    if !metadata.is_file() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{} is not a file", path.display()),
        ));
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(PhotoFile {
        name,
        media_type: media_type_for(path),
        size: metadata.len(),
        content: PhotoContent::Path(path.to_path_buf()),
    })
}

/// Declared media type for a path, from its extension.
pub fn media_type_for(path: &Path) -> String {
    image::ImageFormat::from_path(path)
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| UNKNOWN_MEDIA_TYPE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_from_extension() {
        assert_eq!(media_type_for(Path::new("a/front.jpg")), "image/jpeg");
        assert_eq!(media_type_for(Path::new("side.png")), "image/png");
        assert_eq!(media_type_for(Path::new("back.webp")), "image/webp");
        assert_eq!(media_type_for(Path::new("notes.txt")), UNKNOWN_MEDIA_TYPE);
        assert_eq!(media_type_for(Path::new("noext")), UNKNOWN_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn load_reads_metadata_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("front.jpg");
        std::fs::write(&path, vec![7u8; 42]).unwrap();

        let file = load_photo(&path).await.unwrap();
        assert_eq!(file.name, "front.jpg");
        assert_eq!(file.size, 42);
        assert_eq!(file.media_type, "image/jpeg");
    }

    #[tokio::test]
    async fn load_rejects_directories_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_photo(dir.path()).await.is_err());
        assert!(load_photo(&dir.path().join("nope.jpg")).await.is_err());
    }
}
