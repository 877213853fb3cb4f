use std::sync::mpsc::{Receiver, TryRecvError};
use std::thread;

use egui::{Color32, Context, Key, TextureHandle, TextureOptions, ViewportCommand};
use image::RgbImage;
use log::{debug, info};

use crate::fractal::FractalParams;
use crate::gui::display::{frame_to_color_image, ChannelDisplay, RenderMessage};
use crate::render::{
    blank_canvas, generator_for, render_still, CancelToken, ProgressiveRenderer, RenderOutcome,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ViewerState {
    Rendering,
    Complete,
    Cancelled,
}

/// Fenêtre d'affichage d'une fractale.
///
/// Le calcul tourne dans un thread dédié ; l'interface ne fait que recevoir
/// les images et relayer la touche Échap vers le jeton d'annulation.
pub struct ViewerApp {
    title: String,
    state: ViewerState,
    texture: Option<TextureHandle>,
    receiver: Receiver<RenderMessage>,
    cancel: CancelToken,
}

impl ViewerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, params: FractalParams, animate: bool) -> Self {
        let cancel = CancelToken::new();
        let title = params.kind.name().to_string();
        let receiver = spawn_render(params, animate, cc.egui_ctx.clone(), cancel.clone());
        Self { title, state: ViewerState::Rendering, texture: None, receiver, cancel }
    }

    /// Vide le canal ; seule la dernière image reçue est affichée.
    fn poll_render(&mut self, ctx: &Context) {
        let mut latest: Option<RgbImage> = None;
        loop {
            match self.receiver.try_recv() {
                Ok(RenderMessage::Snapshot(frame)) => latest = Some(frame),
                Ok(RenderMessage::Complete(frame)) => {
                    latest = Some(frame);
                    self.state = ViewerState::Complete;
                }
                Ok(RenderMessage::Cancelled) => self.state = ViewerState::Cancelled,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        if let Some(frame) = latest {
            self.update_texture(ctx, &frame);
        }
    }

    fn update_texture(&mut self, ctx: &Context, frame: &RgbImage) {
        let image = frame_to_color_image(frame);
        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::NEAREST),
            None => self.texture = Some(ctx.load_texture("fractal", image, TextureOptions::NEAREST)),
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.poll_render(ctx);

        let (escape, confirm) = ctx.input(|i| {
            (i.key_pressed(Key::Escape), i.key_pressed(Key::Enter) || i.key_pressed(Key::Space))
        });
        match self.state {
            ViewerState::Rendering if escape => {
                info!("Annulation de {}", self.title);
                self.cancel.cancel();
            }
            ViewerState::Complete if escape || confirm => {
                ctx.send_viewport_cmd(ViewportCommand::Close);
            }
            ViewerState::Cancelled => ctx.send_viewport_cmd(ViewportCommand::Close),
            _ => {}
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::BLACK))
            .show(ctx, |ui| match &self.texture {
                Some(texture) => {
                    let size = ui.available_size();
                    ui.centered_and_justified(|ui| {
                        ui.add(egui::Image::new(texture).fit_to_exact_size(size));
                    });
                }
                None => {
                    ui.centered_and_justified(|ui| {
                        ui.colored_label(Color32::GRAY, "Rendu en cours...");
                    });
                }
            });
    }
}

impl Drop for ViewerApp {
    fn drop(&mut self) {
        // Fenêtre fermée : le thread de rendu s'arrête au prochain point de contrôle
        self.cancel.cancel();
    }
}

fn spawn_render(
    params: FractalParams,
    animate: bool,
    ctx: Context,
    cancel: CancelToken,
) -> Receiver<RenderMessage> {
    let (mut display, receiver) = ChannelDisplay::new(ctx);
    thread::spawn(move || {
        let title = params.kind.name();
        if animate {
            let mut generator = generator_for(&params);
            let mut renderer = ProgressiveRenderer::new(title);
            let canvas = blank_canvas(&params);
            match renderer.run(generator.as_mut(), canvas, &mut display, &cancel) {
                RenderOutcome::Cancelled => display.cancelled(),
                RenderOutcome::Complete(_) | RenderOutcome::Terminated(_) => {}
            }
        } else {
            let image = render_still(&params);
            debug!("{} calculé, affichage de l'image finale", title);
            crate::render::Display::hold(&mut display, title, &image);
        }
    });
    receiver
}
