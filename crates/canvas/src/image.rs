//! The image-resolution seam.
//!
//! The adapter asks an [`ImageLoader`] for a source and later receives the
//! result through `RenderAdapter::complete_image_load`. The loader never
//! touches the surface itself.

use node::ObjectId;
use std::collections::VecDeque;

/// Decoded image metadata handed to the surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageData {
    pub src: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("image not found: {0}")]
    NotFound(String),

    #[error("could not decode {src}: {reason}")]
    Decode { src: String, reason: String },

    #[error("unsupported image source: {0}")]
    Unsupported(String),
}

/// Starts resolving an image source for an object.
pub trait ImageLoader {
    fn request(&mut self, id: ObjectId, src: &str);
}

/// A pending image request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageRequest {
    pub id: ObjectId,
    pub src: String,
}

/// Loader that just queues requests for the host to resolve.
#[derive(Debug, Default)]
pub struct QueuedImageLoader {
    queue: VecDeque<ImageRequest>,
}

impl QueuedImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&mut self) -> Vec<ImageRequest> {
        self.queue.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl ImageLoader for QueuedImageLoader {
    fn request(&mut self, id: ObjectId, src: &str) {
        self.queue.push_back(ImageRequest {
            id,
            src: src.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_drains_in_request_order() {
        let mut loader = QueuedImageLoader::new();
        let a = ObjectId::from_u128(1);
        let b = ObjectId::from_u128(2);
        loader.request(a, "a.png");
        loader.request(b, "b.png");
        let drained = loader.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].id, a);
        assert_eq!(drained[1].src, "b.png");
        assert!(loader.is_empty());
    }
}
