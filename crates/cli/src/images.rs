//! Resolves image sources against a directory on disk.

use canvas::{ImageData, ImageError};
use std::path::{Path, PathBuf};

pub struct ImageResolver {
    root: PathBuf,
}

impl ImageResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Read the image header for `src`. Only local relative paths are supported.
    pub fn resolve(&self, src: &str) -> Result<ImageData, ImageError> {
        if src.contains("://") || Path::new(src).is_absolute() {
            return Err(ImageError::Unsupported(src.to_string()));
        }
        let path = self.root.join(src);
        if !path.is_file() {
            return Err(ImageError::NotFound(src.to_string()));
        }
        let (width, height) = image::image_dimensions(&path).map_err(|err| ImageError::Decode {
            src: src.to_string(),
            reason: err.to_string(),
        })?;
        log::debug!("resolved {src} to {width}x{height}");
        Ok(ImageData {
            src: src.to_string(),
            width,
            height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_remote_and_missing_sources() {
        let resolver = ImageResolver::new(std::env::temp_dir());
        assert!(matches!(
            resolver.resolve("https://example.com/a.png"),
            Err(ImageError::Unsupported(_))
        ));
        assert!(matches!(
            resolver.resolve("storyboard-cli-missing-image.png"),
            Err(ImageError::NotFound(_))
        ));
    }

    #[test]
    fn reports_undecodable_files() {
        let dir = std::env::temp_dir().join(format!("storyboard-cli-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("broken.png"), b"not a png").unwrap();

        let resolver = ImageResolver::new(&dir);
        let result = resolver.resolve("broken.png");
        std::fs::remove_dir_all(&dir).unwrap();
        assert!(matches!(result, Err(ImageError::Decode { .. })));
    }
}
