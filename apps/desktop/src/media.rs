use std::path::Path;

use anyhow::Context;
use client_core::ImageData;
use image::GenericImageView;

const PREVIEW_MAX_DIMENSION: u32 = 480;

/// Decodes an image file into an RGBA preview no larger than
/// `PREVIEW_MAX_DIMENSION` on either side.
pub fn load_preview(path: &Path) -> anyhow::Result<ImageData> {
    let decoded = image::open(path)
        .with_context(|| format!("failed to decode image '{}'", path.display()))?;

    let (orig_w, orig_h) = decoded.dimensions();
    let scale = (PREVIEW_MAX_DIMENSION as f32 / (orig_w.max(orig_h).max(1) as f32)).min(1.0);
    let resized = if scale < 1.0 {
        decoded.resize(
            (orig_w as f32 * scale).max(1.0) as u32,
            (orig_h as f32 * scale).max(1.0) as u32,
            image::imageops::FilterType::Triangle,
        )
    } else {
        decoded
    };

    let rgba = resized.to_rgba8();
    Ok(ImageData {
        width: rgba.width() as usize,
        height: rgba.height() as usize,
        rgba: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use std::{
        env, fs,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        env::temp_dir().join(format!("auction_media_{suffix}_{name}"))
    }

    #[test]
    fn small_png_keeps_its_size() {
        let path = temp_path("small.png");
        image::RgbaImage::new(4, 3).save(&path).expect("write png");

        let preview = load_preview(&path).expect("preview");
        assert_eq!((preview.width, preview.height), (4, 3));
        assert_eq!(preview.rgba.len(), 4 * 3 * 4);

        fs::remove_file(path).expect("cleanup");
    }

    #[test]
    fn large_png_is_downscaled() {
        let path = temp_path("large.png");
        image::RgbaImage::new(960, 240).save(&path).expect("write png");

        let preview = load_preview(&path).expect("preview");
        assert_eq!((preview.width, preview.height), (480, 120));

        fs::remove_file(path).expect("cleanup");
    }

    #[test]
    fn undecodable_file_is_an_error() {
        let path = temp_path("broken.png");
        fs::write(&path, b"not an image").expect("write");

        assert!(load_preview(&path).is_err());

        fs::remove_file(path).expect("cleanup");
    }
}
