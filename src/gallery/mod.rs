//! Gallery folder scanning.

pub mod loader;

use std::path::PathBuf;

use walkdir::WalkDir;

use crate::error::Error;

/// Raster formats the gallery will pick up.
const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff",
];

/// Scan `folder` recursively for gallery images.
///
/// Runs as a background task so a large folder never blocks the UI. The
/// returned list is sorted by path; that order is the gallery sequence the
/// navigator walks.
pub async fn scan_folder(folder: PathBuf) -> Result<Vec<PathBuf>, Error> {
    println!("🔍 Scanning gallery folder: {}", folder.display());

    if !folder.is_dir() {
        return Err(Error::Io {
            path: folder.display().to_string(),
            reason: "not a directory".into(),
        });
    }

    let mut images = Vec::new();
    for entry in WalkDir::new(&folder)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(extension) = path.extension() {
            let ext = extension.to_string_lossy().to_lowercase();
            if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
                images.push(path.to_path_buf());
            }
        }
    }

    images.sort();
    println!("📁 Found {} images", images.len());
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_list_covers_common_formats() {
        for ext in ["jpg", "jpeg", "png", "webp"] {
            assert!(IMAGE_EXTENSIONS.contains(&ext));
        }
        assert!(!IMAGE_EXTENSIONS.contains(&"mp4"));
    }

    #[tokio::test]
    async fn scanning_a_missing_folder_fails() {
        let result = scan_folder(PathBuf::from("/definitely/not/a/folder")).await;
        assert!(result.is_err());
    }
}
