use std::path::{Path, PathBuf};

use desc_opponent::convert_to_opponent;
use image::GrayImage;
use log::info;

use crate::{color_image_from_rgb, RunError, RunResult};

/// Converts an image file to opponent color space and writes `<prefix>_o1.png` .. `<prefix>_o3.png`
pub fn write_opponent_channels<P: AsRef<Path>>(input: P, prefix: &str) -> RunResult<Vec<PathBuf>> {
    let rgb = image::open(input.as_ref())?.to_rgb8();
    let channels = convert_to_opponent(&color_image_from_rgb(&rgb)?)?;
    let (w, h) = (channels.width as u32, channels.height as u32);

    let mut written = Vec::with_capacity(3);
    for (i, plane) in channels.into_channels().into_iter().enumerate() {
        let path = PathBuf::from(format!("{}_o{}.png", prefix, i + 1));
        let gray = GrayImage::from_raw(w, h, plane)
            .ok_or_else(|| RunError::Config(format!("channel {} has the wrong size", i + 1)))?;
        gray.save(&path)?;
        written.push(path);
    }

    info!("wrote opponent channels for {}", input.as_ref().display());
    Ok(written)
}
