use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::RgbImage;
use log::{debug, error, info};

use crate::error::FractalError;
use crate::fractal::FractalParams;
use crate::io::{FrameStore, ImageCodec, PersistedFrames};
use crate::render::{blank_canvas, render_onto};

use super::schedule::{SweepSchedule, SweepStep};

/// Résultat d'un pas du balayage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Toutes les copies existaient déjà : aucun rendu.
    Skipped,
    /// Frame calculée ; seules les copies absentes ont été écrites.
    Rendered { written: Vec<u32>, failed: Vec<u32> },
}

/// Bilan d'un export complet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepSummary {
    /// Nombre total de frames de la séquence (déjà présentes incluses).
    pub frame_count: u32,
    pub rendered_steps: u32,
    pub skipped_steps: u32,
    pub written: Vec<u32>,
    pub failed: Vec<u32>,
}

/// Exporte une séquence de frames numérotées pour un balayage de `max_iter`.
///
/// L'état des frames déjà présentes est lu une fois à la construction puis
/// tenu à jour au fil des écritures ; relancer un export interrompu ne
/// recalcule que les frames manquantes.
pub struct SweepExporter<'a> {
    params: FractalParams,
    store: FrameStore,
    codec: &'a dyn ImageCodec,
    background: Option<RgbImage>,
    persisted: PersistedFrames,
}

impl<'a> SweepExporter<'a> {
    pub fn new(
        params: FractalParams,
        store: FrameStore,
        codec: &'a dyn ImageCodec,
    ) -> Result<Self, FractalError> {
        if !params.kind.is_escape_time() {
            return Err(FractalError::Configuration(format!(
                "le balayage d'itérations ne s'applique pas à {}",
                params.kind.name()
            )));
        }
        store.create_dir()?;
        let persisted = store.scan()?;
        debug!("{} frame(s) déjà présentes dans {}", persisted.len(), store.dir().display());
        Ok(Self { params, store, codec, background: None, persisted })
    }

    /// Charge une image de fond, redimensionnée (bicubique) à la taille du rendu.
    ///
    /// Une image absente ou illisible est une erreur fatale : aucune frame
    /// n'est écrite.
    pub fn with_background(mut self, path: &Path) -> Result<Self, FractalError> {
        let image = self.codec.read(path)?;
        let resized =
            imageops::resize(&image, self.params.width, self.params.height, FilterType::CatmullRom);
        info!(
            "Fond {} chargé ({}x{} -> {}x{})",
            path.display(),
            image.width(),
            image.height(),
            self.params.width,
            self.params.height
        );
        self.background = Some(resized);
        Ok(self)
    }

    pub fn frames_dir(&self) -> &Path {
        self.store.dir()
    }

    /// Calcule la frame d'un plafond donné, sur le fond s'il y en a un.
    pub fn render_frame(&self, cap: u32) -> RgbImage {
        let params = self.params.with_max_iter(cap);
        let mut canvas = match &self.background {
            Some(background) => background.clone(),
            None => blank_canvas(&params),
        };
        render_onto(&params, &mut canvas);
        canvas
    }

    /// Rend la frame du pas si au moins une de ses copies manque, et écrit
    /// uniquement les copies manquantes.
    ///
    /// Un échec d'écriture est journalisé puis ignoré ; l'index concerné
    /// reste absent et sera retenté au prochain export.
    pub fn render_or_skip(&mut self, step: SweepStep) -> FrameOutcome {
        let missing = self.persisted.missing(step.first_index, step.repeat);
        if missing.is_empty() {
            debug!("max_iter={} : frames {:?} déjà présentes", step.cap, step.indices());
            return FrameOutcome::Skipped;
        }

        let frame = self.render_frame(step.cap);
        let mut written = Vec::with_capacity(missing.len());
        let mut failed = Vec::new();
        for index in missing {
            let path = self.store.path_for(index);
            match self.codec.write(&path, &frame) {
                Ok(()) => {
                    self.persisted.insert(index);
                    written.push(index);
                }
                Err(e) => {
                    error!("Frame {} non écrite : {}", index, e);
                    failed.push(index);
                }
            }
        }
        FrameOutcome::Rendered { written, failed }
    }

    /// Déroule tout le calendrier.
    pub fn export(&mut self, schedule: &SweepSchedule) -> SweepSummary {
        let mut summary = SweepSummary::default();
        for step in schedule.steps() {
            summary.frame_count += step.repeat;
            match self.render_or_skip(step) {
                FrameOutcome::Skipped => summary.skipped_steps += 1,
                FrameOutcome::Rendered { written, failed } => {
                    info!(
                        "max_iter={} -> frames {:?} ({} écrite(s))",
                        step.cap,
                        step.indices(),
                        written.len()
                    );
                    summary.rendered_steps += 1;
                    summary.written.extend(written);
                    summary.failed.extend(failed);
                }
            }
        }
        summary
    }
}

/// Dossier des frames d'une fractale sous `base`.
pub fn frames_dir_for(base: &Path, params: &FractalParams) -> PathBuf {
    base.join(params.kind.cli_name())
}

/// Exporte le balayage complet sous `base/<fractale>/NNNN.png`.
pub fn export_sweep(
    params: FractalParams,
    schedule: &SweepSchedule,
    base: &Path,
    background: Option<&Path>,
    codec: &dyn ImageCodec,
) -> Result<SweepSummary, FractalError> {
    let store = FrameStore::new(frames_dir_for(base, &params));
    let mut exporter = SweepExporter::new(params, store, codec)?;
    if let Some(path) = background {
        exporter = exporter.with_background(path)?;
    }
    info!("Export du balayage vers {}", exporter.frames_dir().display());
    let summary = exporter.export(schedule);
    info!(
        "{} frame(s) au total : {} pas calculés, {} sautés, {} échec(s)",
        summary.frame_count,
        summary.rendered_steps,
        summary.skipped_steps,
        summary.failed.len()
    );
    Ok(summary)
}
