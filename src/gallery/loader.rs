//! Background image loading.
//!
//! Both loaders run as `Task::perform` futures and report back through
//! messages; the UI never blocks on decoding.

use std::path::PathBuf;

use iced::widget::image::Handle;
use image::imageops::FilterType;

use crate::error::Error;
use crate::pile::ThumbImage;
use crate::viewer::Photo;

/// Load and downscale a pile thumbnail.
///
/// The decode and resize run on a blocking thread; Lanczos gives the small
/// rotated thumbnails clean edges.
pub async fn load_thumbnail(path: PathBuf, box_size: u32) -> Result<ThumbImage, Error> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| Error::io(&path, &e))?;

    let decode_path = path.clone();
    let result = tokio::task::spawn_blocking(move || -> Result<(u32, u32, Vec<u8>), Error> {
        let decoded =
            image::load_from_memory(&bytes).map_err(|e| Error::decode(&decode_path, &e))?;
        let thumb = decoded.resize(box_size, box_size, FilterType::Lanczos3);
        let rgba = thumb.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok((width, height, rgba.into_raw()))
    })
    .await
    .map_err(|e| Error::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let (width, height, pixels) = result?;
    Ok(ThumbImage {
        handle: Handle::from_rgba(width, height, pixels),
        width,
        height,
    })
}

/// Load the full-size photo behind a thumbnail.
///
/// The natural dimensions are needed up front for the fit computation, so
/// the file is decoded here rather than lazily by the renderer.
pub async fn load_photo(path: PathBuf) -> Result<Photo, Error> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| Error::io(&path, &e))?;

    let decode_path = path.clone();
    let (width, height, pixels) =
        tokio::task::spawn_blocking(move || -> Result<(u32, u32, Vec<u8>), Error> {
            let decoded =
                image::load_from_memory(&bytes).map_err(|e| Error::decode(&decode_path, &e))?;
            let rgba = decoded.to_rgba8();
            let (width, height) = rgba.dimensions();
            Ok((width, height, rgba.into_raw()))
        })
        .await
        .map_err(|e| Error::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })??;

    Ok(Photo {
        handle: Handle::from_rgba(width, height, pixels),
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn loading_a_missing_file_reports_io_error() {
        let result = load_photo(PathBuf::from("/no/such/photo.jpg")).await;
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[tokio::test]
    async fn load_errors_name_the_failing_file() {
        let message = load_photo(PathBuf::from("/no/such/photo.jpg"))
            .await
            .unwrap_err()
            .to_string();
        assert!(message.contains("/no/such/photo.jpg"));

        let dir = std::env::temp_dir();
        let path = dir.join("photopile-truncated.png");
        tokio::fs::write(&path, b"\x89PNG").await.unwrap();
        let message = load_thumbnail(path.clone(), 160)
            .await
            .unwrap_err()
            .to_string();
        assert!(message.contains("photopile-truncated.png"));

        let _ = tokio::fs::remove_file(path).await;
    }

    #[tokio::test]
    async fn loading_garbage_reports_decode_error() {
        let dir = std::env::temp_dir();
        let path = dir.join("photopile-not-an-image.jpg");
        tokio::fs::write(&path, b"definitely not a jpeg").await.unwrap();

        let result = load_thumbnail(path.clone(), 160).await;
        assert!(matches!(result, Err(Error::Decode { .. })));

        let _ = tokio::fs::remove_file(path).await;
    }
}
