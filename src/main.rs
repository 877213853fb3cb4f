use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use log::{error, info};

mod color;
mod error;
mod export;
mod fractal;
mod gui;
mod io;
mod render;

use error::FractalError;
use export::{export_sweep, SweepSchedule, DEFAULT_CEILING, DEFAULT_START};
use fractal::{default_params_for_kind, FractalKind, FractalParams};
use io::png::save_png;
use io::video::DEFAULT_FPS;
use io::{assemble_video, PngCodec};
use render::render_still;

/// Affichage, rendu et animation de fractales classiques.
///
/// Exemples :
///   fractanim show mandelbrot --animate
///   fractanim render fern --output fougere.png
///   fractanim sweep julia --dir frames --background logo.png
///   fractanim video --dir frames/julia --output julia.mp4
#[derive(Parser, Debug)]
#[command(
    name = "fractanim",
    about = "Mandelbrot, Julia, Sierpinski, Koch et fougère de Barnsley : affichage et export",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Affiche une fractale dans une fenêtre
    Show {
        /// mandelbrot, julia, sierpinski, koch ou fern (ou 1 à 5)
        #[arg(value_parser = parse_kind)]
        kind: FractalKind,

        /// Montre le calcul au fil de l'eau (Échap pour annuler)
        #[arg(long)]
        animate: bool,

        #[command(flatten)]
        raster: RasterArgs,
    },

    /// Calcule une fractale et l'enregistre en PNG
    Render {
        #[arg(value_parser = parse_kind)]
        kind: FractalKind,

        /// Fichier de sortie PNG
        #[arg(long, value_name = "FICHIER")]
        output: PathBuf,

        #[command(flatten)]
        raster: RasterArgs,
    },

    /// Exporte une frame par plafond d'itérations dans DIR/<fractale>/NNNN.png
    Sweep {
        /// mandelbrot ou julia
        #[arg(value_parser = parse_kind)]
        kind: FractalKind,

        /// Dossier de base des frames
        #[arg(long, value_name = "DOSSIER")]
        dir: PathBuf,

        /// Premier plafond d'itérations
        #[arg(long, default_value_t = DEFAULT_START)]
        start: u32,

        /// Plafond (exclu) à ne pas atteindre
        #[arg(long, default_value_t = DEFAULT_CEILING)]
        ceiling: u32,

        /// Image de fond, visible là où la suite ne s'échappe pas
        #[arg(long, value_name = "IMAGE")]
        background: Option<PathBuf>,

        /// Largeur des frames en pixels
        #[arg(long, default_value_t = 1080)]
        width: u32,

        /// Hauteur des frames en pixels
        #[arg(long, default_value_t = 1080)]
        height: u32,
    },

    /// Assemble les frames NNNN.png d'un dossier en vidéo (mp4 via ffmpeg, ou gif)
    Video {
        #[arg(long, value_name = "DOSSIER")]
        dir: PathBuf,

        #[arg(long, value_name = "FICHIER")]
        output: PathBuf,

        /// Images par seconde
        #[arg(long, default_value_t = DEFAULT_FPS)]
        fps: u32,
    },
}

#[derive(Args, Debug)]
struct RasterArgs {
    /// Largeur en pixels
    #[arg(long, default_value_t = fractal::definitions::DEFAULT_WIDTH)]
    width: u32,

    /// Hauteur en pixels
    #[arg(long, default_value_t = fractal::definitions::DEFAULT_HEIGHT)]
    height: u32,

    /// Graine du générateur aléatoire (Sierpinski, fougère)
    #[arg(long)]
    seed: Option<u64>,
}

impl RasterArgs {
    fn params(&self, kind: FractalKind) -> Result<FractalParams, FractalError> {
        let mut params = default_params_for_kind(kind, self.width, self.height)?;
        params.rng_seed = self.seed;
        Ok(params)
    }
}

fn parse_kind(value: &str) -> Result<FractalKind, String> {
    FractalKind::from_cli_name(value).ok_or_else(|| {
        format!(
            "fractale inconnue: {} (attendu: {})",
            value,
            FractalKind::all()
                .iter()
                .map(|k| format!("{} ou {}", k.cli_name(), k.id()))
                .collect::<Vec<_>>()
                .join(", ")
        )
    })
}

fn run(command: Command) -> Result<(), FractalError> {
    match command {
        Command::Show { kind, animate, raster } => {
            let params = raster.params(kind)?;
            gui::run_viewer(params, animate)
        }
        Command::Render { kind, output, raster } => {
            let params = raster.params(kind)?;
            info!("Rendu de {} ({}x{})", kind.name(), params.width, params.height);
            let image = render_still(&params);
            save_png(&image, &output)?;
            info!("Image enregistrée dans {}", output.display());
            Ok(())
        }
        Command::Sweep { kind, dir, start, ceiling, background, width, height } => {
            let params = default_params_for_kind(kind, width, height)?;
            let schedule = SweepSchedule::new(start, ceiling)?;
            let summary =
                export_sweep(params, &schedule, &dir, background.as_deref(), &PngCodec)?;
            println!("{}", summary.frame_count);
            Ok(())
        }
        Command::Video { dir, output, fps } => {
            let summary = assemble_video(&dir, &output, fps, &PngCodec)?;
            info!(
                "Vidéo {} : {} frame(s) {}x{} ({} ignorée(s))",
                output.display(),
                summary.frames_written,
                summary.width,
                summary.height,
                summary.frames_skipped
            );
            Ok(())
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        error!("{}", e);
        std::process::exit(1);
    }
}
