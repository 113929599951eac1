use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbaImage};
use log::{debug, warn};

use crate::scryfall_client::ScryfallClient;

/// Fetch a card image and decode it. Failures are logged and reported as
/// `None` so that a single bad download does not abort the whole print run.
pub fn fetch_image(uri: &str, client: &ScryfallClient) -> Option<DynamicImage> {
    debug!("card image uri: {}", uri);
    match client.call(uri) {
        Ok(response) => match response.bytes() {
            Ok(b) => match image::load_from_memory_with_format(&b, ImageFormat::Png) {
                Ok(im) => Some(im),
                Err(e) => {
                    warn!("error decoding image from {}: {}", uri, e);
                    None
                }
            },
            Err(e) => {
                warn!("error getting bytes of image from {}: {}", uri, e);
                None
            }
        },
        Err(e) => {
            warn!("error in image request for {}: {}", uri, e);
            None
        }
    }
}

/// All png/jpg images directly inside `dir`, sorted so runs are
/// reproducible.
pub fn folder_image_paths(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| {
                    matches!(e.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg")
                })
        })
        .collect();
    paths.sort();
    Ok(paths)
}

/// Lazy sequence of card images for the sheet packer: queued remote uris
/// first, then images from a local folder, each normalized to the card pixel
/// size. Unreadable sources are skipped, the packer never sees them.
pub struct CardImageSource<'a> {
    client: &'a ScryfallClient,
    uris: std::vec::IntoIter<String>,
    files: std::vec::IntoIter<PathBuf>,
    card_px: (u32, u32),
}

impl<'a> CardImageSource<'a> {
    pub fn new(
        uris: Vec<String>,
        files: Vec<PathBuf>,
        card_px: (u32, u32),
        client: &'a ScryfallClient,
    ) -> CardImageSource<'a> {
        CardImageSource {
            client,
            uris: uris.into_iter(),
            files: files.into_iter(),
            card_px,
        }
    }

    fn normalize(&self, im: DynamicImage) -> RgbaImage {
        im.resize_exact(self.card_px.0, self.card_px.1, FilterType::Lanczos3)
            .into_rgba8()
    }
}

impl Iterator for CardImageSource<'_> {
    type Item = RgbaImage;

    fn next(&mut self) -> Option<RgbaImage> {
        while let Some(uri) = self.uris.next() {
            // fetch_image has already logged the reason for a skip
            if let Some(im) = fetch_image(&uri, self.client) {
                return Some(self.normalize(im));
            }
        }
        while let Some(path) = self.files.next() {
            match image::open(&path) {
                Ok(im) => return Some(self.normalize(im)),
                Err(e) => warn!("skipping card image {}: {}", path.display(), e),
            }
        }
        None
    }
}
