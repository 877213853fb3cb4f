//! Nommage et inventaire des frames persistées (`0000.png`, `0001.png`, ...).

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::FractalError;

pub const FRAME_EXTENSION: &str = "png";

/// Nom de fichier d'une frame : index décimal sur 4 chiffres minimum.
pub fn frame_file_name(index: u32) -> String {
    format!("{index:04}.{FRAME_EXTENSION}")
}

/// Index d'un nom de frame, `None` pour tout autre fichier.
pub fn parse_frame_index(name: &str) -> Option<u32> {
    let stem = name.strip_suffix(FRAME_EXTENSION)?.strip_suffix('.')?;
    if stem.len() < 4 || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}

/// Répertoire de frames d'un type de fractale.
#[derive(Clone, Debug)]
pub struct FrameStore {
    dir: PathBuf,
}

impl FrameStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, index: u32) -> PathBuf {
        self.dir.join(frame_file_name(index))
    }

    pub fn create_dir(&self) -> Result<(), FractalError> {
        fs::create_dir_all(&self.dir).map_err(|e| FractalError::io(&self.dir, e))
    }

    /// Frames présentes, triées par index numérique.
    ///
    /// Un répertoire absent est traité comme vide.
    pub fn list(&self) -> Result<Vec<(u32, PathBuf)>, FractalError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(FractalError::io(&self.dir, e)),
        };
        let mut frames = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FractalError::io(&self.dir, e))?;
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }
            if let Some(index) = entry.file_name().to_str().and_then(parse_frame_index) {
                frames.push((index, entry.path()));
            }
        }
        frames.sort_by_key(|(index, _)| *index);
        Ok(frames)
    }

    /// Instantané des index déjà persistés.
    pub fn scan(&self) -> Result<PersistedFrames, FractalError> {
        Ok(PersistedFrames {
            indices: self.list()?.into_iter().map(|(index, _)| index).collect(),
        })
    }
}

/// Ensemble des frames présentes sur disque au début d'un export.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PersistedFrames {
    indices: BTreeSet<u32>,
}

impl PersistedFrames {
    pub fn contains(&self, index: u32) -> bool {
        self.indices.contains(&index)
    }

    /// Index de `first..first + count` absents.
    pub fn missing(&self, first: u32, count: u32) -> Vec<u32> {
        (first..first + count).filter(|i| !self.contains(*i)).collect()
    }

    pub fn insert(&mut self, index: u32) {
        self.indices.insert(index);
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
