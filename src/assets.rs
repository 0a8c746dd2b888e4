//! Image loading
//!
//! Images are read as raw file bytes; decoding is the host window's business.
//! Sprite indices used by bodies are positions in [`ImageStore`].

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use log::info;

/// Player sprite, index 0
pub const PLAYER_IMAGE: &str = "babytux.png";
/// Background tile
pub const BACKGROUND_TILE: &str = "startile-300px.png";

/// Images the game cannot start without, in sprite-index order
pub const REQUIRED_IMAGES: [&str; 2] = [PLAYER_IMAGE, BACKGROUND_TILE];

#[derive(Debug)]
pub enum AssetError {
    Missing(PathBuf),
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Missing(path) => write!(f, "missing image {}", path.display()),
            AssetError::Io { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Missing(_) => None,
            AssetError::Io { source, .. } => Some(source),
        }
    }
}

/// A loaded image file
#[derive(Debug, Clone)]
pub struct Image {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Named images in load order
#[derive(Debug, Clone, Default)]
pub struct ImageStore {
    images: Vec<Image>,
}

impl ImageStore {
    /// Load every image in `names` from `dir`, failing on the first problem
    pub fn load(dir: &Path, names: &[&str]) -> Result<Self, AssetError> {
        let mut images = Vec::with_capacity(names.len());
        for name in names {
            let path = dir.join(name);
            if !path.is_file() {
                return Err(AssetError::Missing(path));
            }
            let bytes = std::fs::read(&path).map_err(|source| AssetError::Io {
                path: path.clone(),
                source,
            })?;
            info!("loaded {} ({} bytes)", path.display(), bytes.len());
            images.push(Image {
                name: (*name).to_string(),
                bytes,
            });
        }
        Ok(Self { images })
    }

    /// Load the game's required images from `dir`
    pub fn load_required(dir: &Path) -> Result<Self, AssetError> {
        Self::load(dir, &REQUIRED_IMAGES)
    }

    /// Sprite index of the image called `name`
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.images.iter().position(|image| image.name == name)
    }

    /// Images in sprite-index order
    pub fn iter(&self) -> impl Iterator<Item = &Image> {
        self.images.iter()
    }
}
