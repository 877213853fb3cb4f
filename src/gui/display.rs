//! Pont entre le thread de rendu et l'interface egui.

use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};

use egui::{ColorImage, Context};
use image::RgbImage;
use log::{debug, warn};

use crate::render::Display;

/// Messages émis par le thread de rendu.
#[derive(Debug)]
pub enum RenderMessage {
    /// Instantané partiel ; peut être abandonné si l'interface est en retard.
    Snapshot(RgbImage),
    /// Image finale, toujours livrée.
    Complete(RgbImage),
    Cancelled,
}

/// Affichage côté thread de rendu : pousse les images dans un canal borné et
/// réveille l'interface.
pub struct ChannelDisplay {
    sender: SyncSender<RenderMessage>,
    ctx: Context,
}

impl ChannelDisplay {
    pub fn new(ctx: Context) -> (Self, Receiver<RenderMessage>) {
        // Une seule place : un instantané en attente suffit
        let (sender, receiver) = mpsc::sync_channel(1);
        (Self { sender, ctx }, receiver)
    }

    pub fn cancelled(&self) {
        if self.sender.send(RenderMessage::Cancelled).is_ok() {
            self.ctx.request_repaint();
        }
    }
}

impl Display for ChannelDisplay {
    fn present(&mut self, _title: &str, frame: &RgbImage) {
        match self.sender.try_send(RenderMessage::Snapshot(frame.clone())) {
            Ok(()) => self.ctx.request_repaint(),
            Err(TrySendError::Full(_)) => debug!("Instantané ignoré, affichage en retard"),
            Err(TrySendError::Disconnected(_)) => {}
        }
    }

    fn hold(&mut self, _title: &str, frame: &RgbImage) {
        match self.sender.send(RenderMessage::Complete(frame.clone())) {
            Ok(()) => self.ctx.request_repaint(),
            Err(_) => warn!("Fenêtre fermée avant la fin du rendu"),
        }
    }
}

/// Convertit une RgbImage en ColorImage egui.
pub fn frame_to_color_image(frame: &RgbImage) -> ColorImage {
    let size = [frame.width() as usize, frame.height() as usize];
    ColorImage::from_rgb(size, frame.as_raw())
}
