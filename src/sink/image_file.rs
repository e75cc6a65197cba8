//! Image file sink backed by the `image` crate

use super::PersistenceSink;
use crate::config::OutputFormat;
use crate::error::{Result, ResultExt};
use crate::types::Frame;
use image::codecs::jpeg::JpegEncoder;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes frames as JPEG or PNG files
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageFileSink {
    format: OutputFormat,
}

impl ImageFileSink {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

impl PersistenceSink for ImageFileSink {
    fn write(&mut self, frame: &Frame, path: &Path, quality: u8) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
        let mut writer = BufWriter::new(file);

        match self.format {
            OutputFormat::Jpeg => {
                // The encoder's scale starts at 1
                let quality = quality.clamp(1, 100);
                let mut encoder = JpegEncoder::new_with_quality(&mut writer, quality);
                encoder.encode_image(&frame.image)?;
            }
            OutputFormat::Png => {
                frame.image.write_to(&mut writer, image::ImageFormat::Png)?;
            }
        }

        writer
            .flush()
            .with_context(|| format!("Failed to flush {:?}", path))
    }
}
