//! Directory replay source
//!
//! Replays previously captured images (JPEG or PNG) in file name order, so
//! a collection run can be rehearsed against a recorded stream. Frames that
//! do not match the configured resolution are resized.
//!
//! A source without looping fails with [`CollectError::SourceExhausted`]
//! once every file has been handed out, which ends the capture session.

use super::{FramePacer, FrameSource};
use crate::error::{CollectError, Result, ResultExt};
use crate::types::Frame;
use image::imageops::FilterType;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Frame source that reads image files from a directory
#[derive(Debug)]
pub struct DirectorySource {
    directory: PathBuf,
    width: u32,
    height: u32,
    looping: bool,
    pacer: FramePacer,
    files: Vec<PathBuf>,
    position: usize,
    sequence: u64,
}

impl DirectorySource {
    /// Create a new directory source
    pub fn new(directory: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            directory: directory.into(),
            width,
            height,
            looping: false,
            pacer: FramePacer::default(),
            files: Vec::new(),
            position: 0,
            sequence: 0,
        }
    }

    /// Start over from the first file when the directory runs out
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Pace frame delivery
    pub fn with_pacer(mut self, pacer: FramePacer) -> Self {
        self.pacer = pacer;
        self
    }

    /// Files queued for replay (populated by `start`)
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    fn scan(directory: &Path) -> Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(directory)
            .with_context(|| format!("Failed to read replay directory {:?}", directory))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && is_image_file(&path) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn load(&self, path: &Path) -> Result<image::RgbImage> {
        let image = image::open(path)
            .map_err(|e| CollectError::Source(format!("Failed to decode {:?}: {}", path, e)))?
            .to_rgb8();

        if image.dimensions() == (self.width, self.height) {
            Ok(image)
        } else {
            Ok(image::imageops::resize(
                &image,
                self.width,
                self.height,
                FilterType::Triangle,
            ))
        }
    }
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

impl FrameSource for DirectorySource {
    fn start(&mut self) -> Result<()> {
        self.files = Self::scan(&self.directory)?;
        if self.files.is_empty() {
            return Err(CollectError::Source(format!(
                "no images found in {:?}",
                self.directory
            )));
        }
        self.position = 0;
        self.sequence = 0;
        self.pacer.reset();
        tracing::debug!(
            "Replaying {} images from {:?}",
            self.files.len(),
            self.directory
        );
        Ok(())
    }

    fn capture(&mut self) -> Result<Frame> {
        if self.files.is_empty() {
            return Err(CollectError::Source("directory source not started".to_string()));
        }
        if self.position >= self.files.len() {
            if !self.looping {
                return Err(CollectError::SourceExhausted(format!(
                    "replayed all {} images from {:?}",
                    self.files.len(),
                    self.directory
                )));
            }
            self.position = 0;
        }

        self.pacer.wait();
        let path = self.files[self.position].clone();
        let image = self.load(&path)?;
        self.position += 1;

        let frame = Frame::new(image, self.sequence);
        self.sequence += 1;
        Ok(frame)
    }

    fn stop(&mut self) {
        self.files.clear();
        self.position = 0;
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn describe(&self) -> String {
        format!(
            "directory {} ({}x{}{})",
            self.directory.display(),
            self.width,
            self.height,
            if self.looping { ", looping" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn write_frames(dir: &Path, count: usize, size: (u32, u32)) {
        for i in 0..count {
            let img = RgbImage::from_pixel(size.0, size.1, Rgb([i as u8 * 40, 0, 0]));
            img.save(dir.join(format!("frame_{:03}.png", i))).unwrap();
        }
    }

    #[test]
    fn test_replays_in_name_order_then_exhausts() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path(), 3, (8, 6));
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut source = DirectorySource::new(dir.path(), 8, 6);
        source.start().unwrap();
        assert_eq!(source.files().len(), 3);

        for i in 0..3u64 {
            let frame = source.capture().unwrap();
            assert_eq!(frame.sequence, i);
            assert_eq!(frame.image.get_pixel(0, 0)[0], i as u8 * 40);
        }

        let err = source.capture().unwrap_err();
        assert!(matches!(err, CollectError::SourceExhausted(_)));
        assert!(err.is_source_failure());
    }

    #[test]
    fn test_looping_wraps_around() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path(), 2, (4, 4));

        let mut source = DirectorySource::new(dir.path(), 4, 4).looping(true);
        source.start().unwrap();
        for _ in 0..5 {
            source.capture().unwrap();
        }
    }

    #[test]
    fn test_resizes_to_configured_resolution() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path(), 1, (16, 16));

        let mut source = DirectorySource::new(dir.path(), 8, 4);
        source.start().unwrap();
        let frame = source.capture().unwrap();
        assert_eq!((frame.width(), frame.height()), (8, 4));
    }

    #[test]
    fn test_empty_directory_fails_to_start() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = DirectorySource::new(dir.path(), 8, 8);
        assert!(source.start().is_err());
    }

    #[test]
    fn test_missing_directory_fails_to_start() {
        let mut source = DirectorySource::new("/definitely/not/here", 8, 8);
        assert!(source.start().is_err());
    }
}
