//! Writing composites to disk.
//!
//! | Output | Format | Name |
//! |---|---|---|
//! | Export | JPEG, configurable quality | [`naming::export_filename`](crate::naming::export_filename) |
//! | Preview | PNG | chosen by the caller |
//!
//! An export of four empty slots writes nothing.

use crate::imaging::{OutputSize, Quality};
use crate::naming::export_filename;
use crate::store::SlotStore;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, RgbImage};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Name the export of `store` at `size` would be written under.
pub fn export_name(store: &SlotStore, size: OutputSize) -> String {
    export_filename(
        store
            .slots()
            .iter()
            .map(|slot| (!slot.is_empty()).then(|| slot.source())),
        size,
    )
}

/// Compose `store` at `size` and write it as JPEG into `output_dir`.
///
/// Returns the written path, or `None` when every slot is empty.
pub fn export(
    store: &SlotStore,
    size: OutputSize,
    output_dir: &Path,
    quality: Quality,
) -> Result<Option<PathBuf>, ExportError> {
    if store.is_empty() {
        log::info!("all slots empty, skipping export");
        return Ok(None);
    }

    let composite = store.compose(size);
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(export_name(store, size));
    save_jpeg(&composite, &path, quality)?;

    log::info!("exported {}", path.display());
    Ok(Some(path))
}

/// Encode as JPEG at the given quality.
pub fn save_jpeg(image: &RgbImage, path: &Path, quality: Quality) -> Result<(), ExportError> {
    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut writer, quality.value()).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgb8,
    )?;
    writer.flush()?;
    Ok(())
}

/// Lossless PNG, used for previews and paste temp files.
pub fn save_png(image: &RgbImage, path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::SlotId;
    use crate::test_helpers::{gradient_image, solid_image};
    use tempfile::TempDir;

    fn id(i: usize) -> SlotId {
        SlotId::new(i).unwrap()
    }

    #[test]
    fn empty_store_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("exports");

        let result = export(&SlotStore::default(), OutputSize::FULL_HD, &out, Quality::default());

        assert!(result.unwrap().is_none());
        assert!(!out.exists());
    }

    #[test]
    fn export_writes_named_jpeg_at_requested_size() {
        let tmp = TempDir::new().unwrap();
        let mut store = SlotStore::default();
        store.load_image(id(0), gradient_image(64, 36), "shots/left.png");
        store.load_image(id(3), solid_image(32, 18, [250, 250, 250]), "right.jpg");

        let path = export(&store, OutputSize::new(128, 72), tmp.path(), Quality::new(85))
            .unwrap()
            .unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "left_none_none_right_128x72.jpg"
        );
        let written = image::open(&path).unwrap();
        assert_eq!((written.width(), written.height()), (128, 72));
    }

    #[test]
    fn export_name_tracks_swaps() {
        let mut store = SlotStore::default();
        store.load_image(id(0), gradient_image(16, 9), "a.png");
        store.load_image(id(1), gradient_image(16, 9), "b.png");
        store.swap(id(1), 0).unwrap();

        assert_eq!(
            export_name(&store, OutputSize::FULL_HD),
            "b_a_none_none_1920x1080.jpg"
        );
    }

    #[test]
    fn png_preview_is_lossless() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/preview.png");
        let img = gradient_image(40, 20);

        save_png(&img, &path).unwrap();

        assert_eq!(image::open(&path).unwrap().to_rgb8(), img);
    }
}
