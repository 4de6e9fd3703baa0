//! Image lookup and sizing for embedded question images.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use crate::error::{QbankError, Result};

/// EMU per pixel at 96 DPI (914400 EMU per inch)
pub const EMU_PER_PIXEL: u64 = 9_525;
/// Widest an embedded image may be rendered: 6 inches
pub const MAX_IMAGE_WIDTH_EMU: u64 = 6 * 914_400;

/// Resolves the relative paths stored on questions to image bytes
pub trait ImageSource: Send + Sync {
    fn load(&self, relative_path: &str) -> Result<Vec<u8>>;
}

/// Reads images from a directory on disk, normally `media.root_dir`
#[derive(Debug, Clone)]
pub struct FsImageSource {
    root: PathBuf,
}

impl FsImageSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join `relative_path` under the root, refusing absolute paths and `..`
    pub fn resolve(&self, relative_path: &str) -> Result<PathBuf> {
        let relative = Path::new(relative_path.trim_start_matches("/media/"));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || relative_path.is_empty() {
            return Err(QbankError::validation(format!(
                "Image path '{relative_path}' is outside the media directory"
            )));
        }
        Ok(self.root.join(relative))
    }
}

impl ImageSource for FsImageSource {
    fn load(&self, relative_path: &str) -> Result<Vec<u8>> {
        let path = self.resolve(relative_path)?;
        Ok(std::fs::read(path)?)
    }
}

/// Images held in memory, keyed by relative path
#[derive(Debug, Clone, Default)]
pub struct InMemoryImageSource {
    images: HashMap<String, Vec<u8>>,
}

impl InMemoryImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, bytes: Vec<u8>) {
        self.images.insert(path.into(), bytes);
    }
}

impl ImageSource for InMemoryImageSource {
    fn load(&self, relative_path: &str) -> Result<Vec<u8>> {
        self.images
            .get(relative_path)
            .cloned()
            .ok_or_else(|| QbankError::not_found(format!("Image '{relative_path}'")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Gif => "gif",
        }
    }
}

/// Format and pixel dimensions of an embeddable image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub format: ImageFormat,
    pub width_px: u64,
    pub height_px: u64,
}

impl ImageInfo {
    /// Rendered size in EMU, scaled down proportionally to the maximum width
    pub fn display_size_emu(&self) -> (u64, u64) {
        let width = self.width_px * EMU_PER_PIXEL;
        let height = self.height_px * EMU_PER_PIXEL;
        if width <= MAX_IMAGE_WIDTH_EMU || width == 0 {
            return (width, height);
        }
        let scaled_height = (height as u128 * MAX_IMAGE_WIDTH_EMU as u128 / width as u128) as u64;
        (MAX_IMAGE_WIDTH_EMU, scaled_height)
    }
}

/// Identify a PNG, JPEG or GIF and read its dimensions; anything else is `None`
pub fn inspect_image(bytes: &[u8]) -> Option<ImageInfo> {
    let format = match imagesize::image_type(bytes).ok()? {
        imagesize::ImageType::Png => ImageFormat::Png,
        imagesize::ImageType::Jpeg => ImageFormat::Jpeg,
        imagesize::ImageType::Gif => ImageFormat::Gif,
        _ => return None,
    };
    let size = imagesize::blob_size(bytes).ok()?;
    if size.width == 0 || size.height == 0 {
        return None;
    }
    Some(ImageInfo {
        format,
        width_px: size.width as u64,
        height_px: size.height as u64,
    })
}
