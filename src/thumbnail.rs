use anyhow::{Context, Result};
use base64::{Engine, engine::general_purpose::STANDARD};
use image::{DynamicImage, GenericImageView, imageops::FilterType};
use tracing::{error, info};

use crate::models::MetadataRecord;

/// Downloads poster art.
pub trait PosterSource {
    fn fetch_poster(&self, url: &str) -> Result<Vec<u8>>;
}

/// Decode `bytes` and shrink the image to fit in a `max_edge` square.
///
/// Aspect ratio is kept and smaller images are returned unchanged.
pub fn make_thumbnail(bytes: &[u8], max_edge: u32) -> Result<DynamicImage> {
    let img = image::load_from_memory(bytes).context("Failed to decode poster image")?;

    let (width, height) = img.dimensions();
    if width <= max_edge && height <= max_edge {
        return Ok(img);
    }

    Ok(img.resize(max_edge, max_edge, FilterType::Lanczos3))
}

/// Raw pixel bytes of `img`, base64 encoded.
pub fn encode_pixels(img: &DynamicImage) -> String {
    STANDARD.encode(img.as_bytes())
}

fn build_thumbnail<S: PosterSource + ?Sized>(
    source: &S,
    url: &str,
    max_edge: u32,
) -> Result<String> {
    let bytes = source.fetch_poster(url)?;
    let img = make_thumbnail(&bytes, max_edge)?;
    Ok(encode_pixels(&img))
}

/// Download the record's poster and store its thumbnail on the record.
///
/// Posters marked "N/A" are left alone. Failures are logged and leave the
/// record without a thumbnail.
pub fn attach_thumbnail<S: PosterSource + ?Sized>(
    record: &mut MetadataRecord,
    source: &S,
    max_edge: u32,
) {
    if !record.has_poster() {
        return;
    }

    match build_thumbnail(source, &record.poster, max_edge) {
        Ok(thumbnail) => {
            record.thumbnail = Some(thumbnail);
            info!("Downloaded cover art and resized it to a thumbnail");
        }
        Err(e) => {
            error!("Failed to download cover art for {}: {:#}", record.filename, e);
        }
    }
}
