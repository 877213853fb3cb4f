use std::io::ErrorKind;
use std::path::Path;

use image::{ImageError, RgbImage};

use crate::error::FractalError;

/// Collaborateur de lecture/écriture d'images.
pub trait ImageCodec {
    fn read(&self, path: &Path) -> Result<RgbImage, FractalError>;
    fn write(&self, path: &Path, image: &RgbImage) -> Result<(), FractalError>;
}

/// Codec basé sur le crate `image` ; le format est déduit de l'extension.
#[derive(Clone, Copy, Debug, Default)]
pub struct PngCodec;

impl ImageCodec for PngCodec {
    fn read(&self, path: &Path) -> Result<RgbImage, FractalError> {
        match image::open(path) {
            Ok(img) => Ok(img.to_rgb8()),
            Err(ImageError::IoError(e)) if e.kind() == ErrorKind::NotFound => {
                Err(FractalError::NotFound { path: path.to_path_buf() })
            }
            Err(ImageError::IoError(e)) => Err(FractalError::io(path, e)),
            Err(source) => Err(FractalError::Decode { path: path.to_path_buf(), source }),
        }
    }

    fn write(&self, path: &Path, image: &RgbImage) -> Result<(), FractalError> {
        // Avec image 0.25, save() détecte le format depuis l'extension
        image.save(path).map_err(|e| match e {
            ImageError::IoError(io) => FractalError::io(path, io),
            other => FractalError::io(path, std::io::Error::new(ErrorKind::Other, other)),
        })
    }
}

/// Enregistre une image au format PNG.
pub fn save_png(image: &RgbImage, output: &Path) -> Result<(), FractalError> {
    PngCodec.write(output, image)
}
