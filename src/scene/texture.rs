//! Cube map texture handle
//!
//! A [`CubeTexture`] exists as soon as a load is started and can be attached
//! to materials right away. The decoded faces arrive later from the loader
//! thread; until then [`CubeTexture::image`] returns `None` and the renderer
//! uses its neutral fallback environment.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use once_cell::sync::OnceCell;

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

/// Six square RGBA8 faces in +X, -X, +Y, -Y, +Z, -Z order
#[derive(Debug, Clone, PartialEq)]
pub struct CubeMapImage {
    pub size: u32,
    pub faces: [Vec<u8>; 6],
}

impl CubeMapImage {
    /// Single-texel cube with every face set to `rgba`
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            size: 1,
            faces: std::array::from_fn(|_| rgba.to_vec()),
        }
    }

    pub fn bytes_per_face(&self) -> usize {
        (self.size as usize) * (self.size as usize) * 4
    }
}

#[derive(Debug)]
struct CubeTextureInner {
    id: u64,
    sources: Vec<String>,
    image: OnceCell<CubeMapImage>,
}

/// Shared, write-once cube map
#[derive(Debug, Clone)]
pub struct CubeTexture {
    inner: Arc<CubeTextureInner>,
}

impl CubeTexture {
    /// Create an empty texture that will be filled from `sources`
    pub fn pending(sources: Vec<String>) -> Self {
        Self {
            inner: Arc::new(CubeTextureInner {
                id: NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed),
                sources,
                image: OnceCell::new(),
            }),
        }
    }

    /// Create a texture whose image is already available
    pub fn from_image(image: CubeMapImage) -> Self {
        let texture = Self::pending(Vec::new());
        let _ = texture.inner.image.set(image);
        texture
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn sources(&self) -> &[String] {
        &self.inner.sources
    }

    pub fn image(&self) -> Option<&CubeMapImage> {
        self.inner.image.get()
    }

    pub fn is_ready(&self) -> bool {
        self.inner.image.get().is_some()
    }

    /// Publish the decoded faces. Returns `false` if an image was already set.
    pub fn set_image(&self, image: CubeMapImage) -> bool {
        self.inner.image.set(image).is_ok()
    }

    /// Whether two handles refer to the same texture
    pub fn same_as(&self, other: &CubeTexture) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
