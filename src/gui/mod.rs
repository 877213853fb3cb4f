//! Affichage interactif (egui/eframe).

pub mod app;
pub mod display;

pub use app::ViewerApp;
pub use display::{ChannelDisplay, RenderMessage};

use crate::error::FractalError;
use crate::fractal::FractalParams;

/// Ouvre une fenêtre et y affiche la fractale, progressivement si `animate`.
///
/// Bloque jusqu'à la fermeture de la fenêtre.
pub fn run_viewer(params: FractalParams, animate: bool) -> Result<(), FractalError> {
    let title = params.kind.name();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(title)
            .with_inner_size([params.width as f32, params.height as f32]),
        renderer: eframe::Renderer::Glow,
        ..Default::default()
    };

    eframe::run_native(
        title,
        options,
        Box::new(move |cc| Box::new(ViewerApp::new(cc, params, animate))),
    )
    .map_err(|e| FractalError::Viewer(e.to_string()))
}
