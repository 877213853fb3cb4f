//! Pilote de rendu progressif.
//!
//! Le générateur remplit le canevas pas à pas ; à chaque point de contrôle
//! un instantané est présenté à l'affichage et le jeton d'annulation est
//! consulté. L'annulation est coopérative : le pas en cours se termine
//! toujours avant la vérification.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use image::RgbImage;
use log::info;

use crate::render::generators::{Generator, Step};

/// Jeton d'annulation partagé entre l'affichage (qui le déclenche) et le
/// pilote (qui le consulte). La transition est à sens unique.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Collaborateur d'affichage.
pub trait Display {
    /// Présente un instantané en lecture seule du canevas partiel.
    fn present(&mut self, title: &str, frame: &RgbImage);

    /// Présente l'image finale, conservée jusqu'à ce que l'utilisateur la ferme.
    fn hold(&mut self, title: &str, frame: &RgbImage);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderState {
    Running,
    Cancelled,
    Complete,
}

#[derive(Debug)]
pub enum RenderOutcome {
    Complete(RgbImage),
    /// Le canevas partiel est abandonné.
    Cancelled,
    /// Pilote déjà dans l'état terminal indiqué : rien n'a été généré.
    Terminated(RenderState),
}

pub struct ProgressiveRenderer {
    title: String,
    state: RenderState,
    snapshots: u64,
}

impl ProgressiveRenderer {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), state: RenderState::Running, snapshots: 0 }
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Nombre d'instantanés présentés (hors image finale).
    pub fn snapshots(&self) -> u64 {
        self.snapshots
    }

    /// Pilote `generator` jusqu'à épuisement ou annulation.
    ///
    /// Un pilote terminé (Cancelled ou Complete) ne relance rien et renvoie
    /// `Terminated` avec son état.
    pub fn run(
        &mut self,
        generator: &mut dyn Generator,
        mut canvas: RgbImage,
        display: &mut dyn Display,
        cancel: &CancelToken,
    ) -> RenderOutcome {
        if self.state != RenderState::Running {
            return RenderOutcome::Terminated(self.state);
        }
        info!("Rendu progressif: {}", self.title);

        loop {
            match generator.step(&mut canvas) {
                Step::Continue => {}
                Step::Checkpoint => {
                    display.present(&self.title, &canvas);
                    self.snapshots += 1;
                    if cancel.is_cancelled() {
                        return self.cancelled();
                    }
                }
                Step::Exhausted => break,
            }
        }

        if cancel.is_cancelled() {
            return self.cancelled();
        }
        self.state = RenderState::Complete;
        info!("{} terminé après {} instantanés", self.title, self.snapshots);
        display.hold(&self.title, &canvas);
        RenderOutcome::Complete(canvas)
    }

    fn cancelled(&mut self) -> RenderOutcome {
        self.state = RenderState::Cancelled;
        info!("{} annulé après {} instantanés", self.title, self.snapshots);
        RenderOutcome::Cancelled
    }
}
