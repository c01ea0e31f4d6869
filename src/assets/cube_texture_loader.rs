//! Cube map loader
//!
//! Fetches six face images (over HTTP(S), or from disk for plain paths),
//! decodes them to RGBA8 and publishes them into a [`CubeTexture`].

use std::thread;
use std::time::Duration;

use crate::constants;
use crate::error::{Result, ViewerError};
use crate::scene::{CubeMapImage, CubeTexture};

#[derive(Debug, Clone)]
pub struct CubeTextureLoader {
    base: String,
    timeout: Duration,
}

impl Default for CubeTextureLoader {
    fn default() -> Self {
        Self {
            base: String::new(),
            timeout: Duration::from_secs(constants::environment::FETCH_TIMEOUT_SECS),
        }
    }
}

impl CubeTextureLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// URL prefix or directory the face names are resolved against
    pub fn with_path(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn resolve(&self, face: &str) -> String {
        if self.base.is_empty() || self.base.ends_with('/') {
            format!("{}{}", self.base, face)
        } else {
            format!("{}/{}", self.base, face)
        }
    }

    /// Start loading the faces in the background.
    ///
    /// The texture is returned immediately and becomes ready once all six
    /// faces are decoded. A failed load is logged and leaves it empty.
    pub fn load<S: AsRef<str>>(&self, faces: &[S; 6]) -> CubeTexture {
        let sources: Vec<String> = faces.iter().map(|face| self.resolve(face.as_ref())).collect();
        let texture = CubeTexture::pending(sources.clone());
        let target = texture.clone();
        let timeout = self.timeout;

        let spawned = thread::Builder::new()
            .name("load:environment".to_string())
            .spawn(move || match fetch_cube_map(&sources, timeout) {
                Ok(image) => {
                    log::info!("Environment map loaded ({}px faces)", image.size);
                    target.set_image(image);
                }
                Err(e) => log::error!("Environment map failed to load: {}", e),
            });
        if let Err(e) = spawned {
            log::error!("Could not start environment map load: {}", e);
        }

        texture
    }
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Fetch and decode six faces synchronously
pub fn fetch_cube_map(sources: &[String], timeout: Duration) -> Result<CubeMapImage> {
    let client = if sources.iter().any(|s| is_remote(s)) {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ViewerError::Fetch {
                url: sources.first().cloned().unwrap_or_default(),
                source,
            })?;
        Some(client)
    } else {
        None
    };

    let mut encoded = Vec::with_capacity(sources.len());
    for source in sources {
        let bytes = match &client {
            Some(client) if is_remote(source) => fetch_remote(client, source)?,
            _ => std::fs::read(source)?,
        };
        log::debug!("Fetched {} ({} bytes)", source, bytes.len());
        encoded.push(bytes);
    }

    decode_faces(&encoded)
}

fn fetch_remote(client: &reqwest::blocking::Client, url: &str) -> Result<Vec<u8>> {
    let fetch_error = |source: reqwest::Error| ViewerError::Fetch {
        url: url.to_string(),
        source,
    };

    let response = client.get(url).send().map_err(fetch_error)?;
    let status = response.status();
    if !status.is_success() {
        return Err(ViewerError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response.bytes().map_err(fetch_error)?.to_vec())
}

/// Decode six encoded images into a cube map. Faces must be square and share
/// one size.
pub fn decode_faces(encoded: &[Vec<u8>]) -> Result<CubeMapImage> {
    let mut size = None;
    let mut faces: [Vec<u8>; 6] = Default::default();

    for (index, slot) in faces.iter_mut().enumerate() {
        let bytes = encoded.get(index).ok_or(ViewerError::CubeFaceSize {
            face: index,
            width: 0,
            height: 0,
            expected: size.unwrap_or(0),
        })?;
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        let expected = *size.get_or_insert(width);

        if width != expected || height != expected {
            return Err(ViewerError::CubeFaceSize {
                face: index,
                width,
                height,
                expected,
            });
        }
        *slot = rgba.into_raw();
    }

    Ok(CubeMapImage {
        size: size.unwrap_or(0),
        faces,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::time::Instant;

    fn png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_resolve() {
        let loader = CubeTextureLoader::new().with_path("https://example.com/cube/");
        assert_eq!(loader.resolve("posx.jpg"), "https://example.com/cube/posx.jpg");

        let loader = CubeTextureLoader::new().with_path("textures");
        assert_eq!(loader.resolve("negz.jpg"), "textures/negz.jpg");

        assert_eq!(CubeTextureLoader::new().resolve("a.png"), "a.png");
    }

    #[test]
    fn test_decode_faces() {
        let encoded: Vec<Vec<u8>> = (0..6).map(|i| png(2, 2, [i as u8, 0, 0, 255])).collect();
        let cube = decode_faces(&encoded).unwrap();

        assert_eq!(cube.size, 2);
        assert_eq!(cube.bytes_per_face(), 16);
        assert_eq!(&cube.faces[4][..4], &[4, 0, 0, 255]);
    }

    #[test]
    fn test_decode_rejects_mismatched_faces() {
        let mut encoded: Vec<Vec<u8>> = (0..6).map(|_| png(4, 4, [0, 0, 0, 255])).collect();
        encoded[3] = png(4, 2, [0, 0, 0, 255]);

        match decode_faces(&encoded) {
            Err(ViewerError::CubeFaceSize { face, width, height, expected }) => {
                assert_eq!((face, width, height, expected), (3, 4, 2, 4));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_missing_faces() {
        let encoded: Vec<Vec<u8>> = (0..5).map(|_| png(1, 1, [0, 0, 0, 255])).collect();
        assert!(decode_faces(&encoded).is_err());
    }

    #[test]
    fn test_load_from_directory() {
        let dir = std::env::temp_dir().join(format!("cage-viewer-cube-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for face in constants::environment::FACES {
            std::fs::write(dir.join(face.replace(".jpg", ".png")), png(2, 2, [9, 9, 9, 255])).unwrap();
        }
        let faces = constants::environment::FACES.map(|face| face.replace(".jpg", ".png"));

        let loader = CubeTextureLoader::new().with_path(dir.to_string_lossy().into_owned());
        let texture = loader.load(&faces);
        assert_eq!(texture.sources().len(), 6);

        let deadline = Instant::now() + Duration::from_secs(5);
        while !texture.is_ready() {
            assert!(Instant::now() < deadline, "cube map never became ready");
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(texture.image().unwrap().size, 2);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_local_face_leaves_texture_empty() {
        let sources: Vec<String> = (0..6).map(|i| format!("/nonexistent/cage-viewer/{i}.png")).collect();
        assert!(matches!(
            fetch_cube_map(&sources, Duration::from_secs(1)),
            Err(ViewerError::Io(_))
        ));
    }
}
