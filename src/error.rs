use std::path::PathBuf;

use image::ImageError;
use thiserror::Error;

/// Erreurs remontées par le moteur de fractales et ses collaborateurs I/O.
///
/// Les noyaux numériques (mapping, escape-time, échantillonneurs) sont
/// infaillibles : seules la configuration et les entrées/sorties échouent.
#[derive(Debug, Error)]
pub enum FractalError {
    /// Paramètres invalides (viewport dégénéré, IFS mal pondéré...).
    #[error("configuration invalide: {0}")]
    Configuration(String),

    #[error("fichier introuvable: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("impossible de décoder {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: ImageError,
    },

    #[error("erreur d'E/S sur {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Aucune image trouvée lors de l'assemblage d'une vidéo.
    #[error("aucune image trouvée dans {}", dir.display())]
    EmptyInput { dir: PathBuf },

    #[error("échec de l'encodage vidéo: {0}")]
    Video(String),

    /// Impossible d'ouvrir la fenêtre d'affichage.
    #[error("échec de l'affichage: {0}")]
    Viewer(String),
}

impl FractalError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FractalError::Io { path: path.into(), source }
    }
}
