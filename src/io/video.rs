//! Assemblage d'une séquence de frames en vidéo.
//!
//! Deux conteneurs : MP4 (et autres extensions ffmpeg) via un processus
//! `ffmpeg` alimenté en RGB brut sur stdin, et GIF animé via le crate `image`.

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::rc::Rc;

use image::codecs::gif::{GifEncoder, Repeat};
use image::imageops::{self, FilterType};
use image::{Delay, DynamicImage, Frame, RgbImage};
use log::{debug, info, warn};

use crate::error::FractalError;
use crate::io::frames::FrameStore;
use crate::io::png::ImageCodec;

/// Cadence par défaut de la vidéo assemblée.
pub const DEFAULT_FPS: u32 = 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VideoFormat {
    /// Conteneur écrit par ffmpeg (mp4, mkv, avi, mov, webm).
    Ffmpeg,
    Gif,
}

impl VideoFormat {
    pub fn from_path(path: &Path) -> Result<Self, FractalError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "mp4" | "mkv" | "avi" | "mov" | "webm" => Ok(VideoFormat::Ffmpeg),
            "gif" => Ok(VideoFormat::Gif),
            _ => Err(FractalError::Configuration(format!(
                "extension vidéo non prise en charge: {}",
                path.display()
            ))),
        }
    }
}

/// Collaborateur d'encodage : reçoit des images de taille identique dans
/// l'ordre de lecture.
pub trait VideoSink {
    fn push_frame(&mut self, frame: &RgbImage) -> Result<(), FractalError>;
    fn finish(self: Box<Self>) -> Result<(), FractalError>;
}

struct FfmpegSink {
    child: Child,
    stdin: Option<ChildStdin>,
    output: PathBuf,
}

impl FfmpegSink {
    fn spawn(output: &Path, width: u32, height: u32, fps: u32) -> Result<Self, FractalError> {
        let mut child = Command::new("ffmpeg")
            .args(["-y", "-loglevel", "error", "-f", "rawvideo", "-pix_fmt", "rgb24"])
            .args(["-s", &format!("{width}x{height}"), "-r", &fps.to_string(), "-i", "-"])
            .args(["-vf", "pad=ceil(iw/2)*2:ceil(ih/2)*2", "-c:v", "libx264", "-pix_fmt", "yuv420p"])
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|e| FractalError::Video(format!("impossible de lancer ffmpeg: {e}")))?;
        let stdin = child.stdin.take();
        Ok(Self { child, stdin, output: output.to_path_buf() })
    }
}

impl VideoSink for FfmpegSink {
    fn push_frame(&mut self, frame: &RgbImage) -> Result<(), FractalError> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| FractalError::Video("flux ffmpeg déjà fermé".into()))?;
        stdin
            .write_all(frame.as_raw())
            .map_err(|e| FractalError::Video(format!("écriture vers ffmpeg: {e}")))
    }

    fn finish(mut self: Box<Self>) -> Result<(), FractalError> {
        // Fermer stdin signale la fin du flux.
        drop(self.stdin.take());
        let status = self
            .child
            .wait()
            .map_err(|e| FractalError::io(&self.output, e))?;
        if status.success() {
            Ok(())
        } else {
            Err(FractalError::Video(format!("ffmpeg a échoué ({status})")))
        }
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        if self.stdin.take().is_some() {
            // Abandon en cours de route : ne pas laisser de processus orphelin.
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

/// Écrivain qui conserve la première erreur d'E/S, y compris celles que
/// l'encodeur GIF ignore en écrivant le trailer à sa destruction.
struct CheckedWriter<W: Write> {
    inner: W,
    error: Rc<RefCell<Option<io::Error>>>,
}

impl<W: Write> CheckedWriter<W> {
    fn new(inner: W, error: Rc<RefCell<Option<io::Error>>>) -> Self {
        Self { inner, error }
    }

    fn record<T>(&self, result: io::Result<T>) -> io::Result<T> {
        if let Err(e) = &result {
            let mut slot = self.error.borrow_mut();
            if slot.is_none() {
                *slot = Some(io::Error::new(e.kind(), e.to_string()));
            }
        }
        result
    }
}

impl<W: Write> Write for CheckedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let result = self.inner.write(buf);
        self.record(result)
    }

    fn flush(&mut self) -> io::Result<()> {
        let result = self.inner.flush();
        self.record(result)
    }
}

impl<W: Write> Drop for CheckedWriter<W> {
    fn drop(&mut self) {
        let result = self.inner.flush();
        let _ = self.record(result);
    }
}

struct GifSink<W: Write> {
    encoder: GifEncoder<CheckedWriter<W>>,
    error: Rc<RefCell<Option<io::Error>>>,
    delay: Delay,
    output: PathBuf,
}

impl GifSink<BufWriter<File>> {
    fn create(output: &Path, fps: u32) -> Result<Self, FractalError> {
        let file = File::create(output).map_err(|e| FractalError::io(output, e))?;
        Self::from_writer(BufWriter::new(file), output, fps)
    }
}

impl<W: Write> GifSink<W> {
    fn from_writer(writer: W, output: &Path, fps: u32) -> Result<Self, FractalError> {
        let error = Rc::new(RefCell::new(None));
        let mut encoder =
            GifEncoder::new_with_speed(CheckedWriter::new(writer, Rc::clone(&error)), 10);
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| FractalError::Video(e.to_string()))?;
        Ok(Self {
            encoder,
            error,
            delay: Delay::from_numer_denom_ms(1000, fps),
            output: output.to_path_buf(),
        })
    }
}

impl<W: Write> VideoSink for GifSink<W> {
    fn push_frame(&mut self, frame: &RgbImage) -> Result<(), FractalError> {
        let rgba = DynamicImage::ImageRgb8(frame.clone()).into_rgba8();
        self.encoder
            .encode_frame(Frame::from_parts(rgba, 0, 0, self.delay))
            .map_err(|e| FractalError::Video(e.to_string()))
    }

    fn finish(self: Box<Self>) -> Result<(), FractalError> {
        let GifSink { encoder, error, output, .. } = *self;
        // Écrit le trailer puis vide le tampon vers le fichier.
        drop(encoder);
        let failure = error.borrow_mut().take();
        match failure {
            Some(e) => Err(FractalError::io(output, e)),
            None => Ok(()),
        }
    }
}

/// Ouvre l'encodeur correspondant au format.
pub fn open_sink(
    format: VideoFormat,
    output: &Path,
    width: u32,
    height: u32,
    fps: u32,
) -> Result<Box<dyn VideoSink>, FractalError> {
    let sink: Box<dyn VideoSink> = match format {
        VideoFormat::Ffmpeg => Box::new(FfmpegSink::spawn(output, width, height, fps)?),
        VideoFormat::Gif => Box::new(GifSink::create(output, fps)?),
    };
    Ok(sink)
}

/// Bilan d'un assemblage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VideoSummary {
    pub frames_written: usize,
    pub frames_skipped: usize,
    pub width: u32,
    pub height: u32,
}

/// Assemble les frames `NNNN.png` de `frames_dir` en une vidéo.
///
/// Aucun fichier n'est produit si le répertoire ne contient pas de frame ;
/// une vidéo partielle est supprimée si l'encodage échoue.
pub fn assemble_video(
    frames_dir: &Path,
    output: &Path,
    fps: u32,
    codec: &dyn ImageCodec,
) -> Result<VideoSummary, FractalError> {
    let format = VideoFormat::from_path(output)?;
    if fps == 0 {
        return Err(FractalError::Configuration("la cadence vidéo doit être > 0".into()));
    }
    // Seul un fichier ouvert par cet assemblage peut être supprimé en cas d'échec.
    let mut created = false;
    let result = assemble_into(frames_dir, codec, |w, h| {
        let sink = open_sink(format, output, w, h, fps)?;
        created = true;
        Ok(sink)
    });
    match result {
        Ok(summary) => {
            info!(
                "Vidéo {} : {} frames ({} ignorées), {}x{} à {} fps",
                output.display(),
                summary.frames_written,
                summary.frames_skipped,
                summary.width,
                summary.height,
                fps
            );
            Ok(summary)
        }
        Err(e) => {
            if created && output.exists() {
                warn!("Vidéo partielle supprimée: {}", output.display());
                let _ = fs::remove_file(output);
            }
            Err(e)
        }
    }
}

/// Lit les frames dans l'ordre numérique et les pousse dans l'encodeur
/// ouvert par `open` aux dimensions de la première frame lisible.
pub fn assemble_into<F>(
    frames_dir: &Path,
    codec: &dyn ImageCodec,
    open: F,
) -> Result<VideoSummary, FractalError>
where
    F: FnOnce(u32, u32) -> Result<Box<dyn VideoSink>, FractalError>,
{
    let frames = FrameStore::new(frames_dir).list()?;
    if frames.is_empty() {
        return Err(FractalError::EmptyInput { dir: frames_dir.to_path_buf() });
    }

    let mut skipped = 0usize;
    let mut remaining = frames.iter();
    // Première frame lisible : elle fixe la taille de la vidéo.
    let first = loop {
        let Some((_, path)) = remaining.next() else {
            return Err(FractalError::EmptyInput { dir: frames_dir.to_path_buf() });
        };
        match codec.read(path) {
            Ok(img) => break img,
            Err(e) => {
                warn!("Frame ignorée: {e}");
                skipped += 1;
            }
        }
    };
    let (width, height) = first.dimensions();

    let mut sink = open(width, height)?;
    sink.push_frame(&first)?;
    let mut written = 1usize;

    for (index, path) in remaining {
        let frame = match codec.read(path) {
            Ok(img) => img,
            Err(e) => {
                warn!("Frame ignorée: {e}");
                skipped += 1;
                continue;
            }
        };
        let frame = if frame.dimensions() == (width, height) {
            frame
        } else {
            debug!("Frame {index} redimensionnée en {width}x{height}");
            imageops::resize(&frame, width, height, FilterType::Triangle)
        };
        sink.push_frame(&frame)?;
        written += 1;
    }
    sink.finish()?;

    Ok(VideoSummary { frames_written: written, frames_skipped: skipped, width, height })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::frames::frame_file_name;
    use crate::io::png::PngCodec;
    use image::Rgb;

    struct RecordingSink {
        frames: Rc<RefCell<Vec<RgbImage>>>,
    }

    impl VideoSink for RecordingSink {
        fn push_frame(&mut self, frame: &RgbImage) -> Result<(), FractalError> {
            self.frames.borrow_mut().push(frame.clone());
            Ok(())
        }

        fn finish(self: Box<Self>) -> Result<(), FractalError> {
            Ok(())
        }
    }

    fn write_frame(dir: &Path, index: u32, value: u8, size: u32) {
        let img = RgbImage::from_pixel(size, size, Rgb([value, 0, 0]));
        PngCodec.write(&dir.join(frame_file_name(index)), &img).unwrap();
    }

    #[test]
    fn test_frames_are_pushed_in_numeric_order() {
        let dir = tempfile::tempdir().unwrap();
        write_frame(dir.path(), 10000, 4, 8);
        write_frame(dir.path(), 2, 2, 8);
        write_frame(dir.path(), 0, 1, 8);
        write_frame(dir.path(), 9, 3, 8);
        let frames = Rc::new(RefCell::new(Vec::new()));
        let sink_frames = Rc::clone(&frames);
        let summary = assemble_into(dir.path(), &PngCodec, |w, h| {
            assert_eq!((w, h), (8, 8));
            Ok(Box::new(RecordingSink { frames: sink_frames }) as Box<dyn VideoSink>)
        })
        .unwrap();
        assert_eq!(summary.frames_written, 4);
        let order: Vec<u8> = frames.borrow().iter().map(|f| f.get_pixel(0, 0)[0]).collect();
        assert_eq!(order, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_mismatched_frames_resized_and_unreadable_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_frame(dir.path(), 0, 1, 8);
        write_frame(dir.path(), 1, 2, 16);
        fs::write(dir.path().join("0002.png"), b"corrupt").unwrap();
        let frames = Rc::new(RefCell::new(Vec::new()));
        let sink_frames = Rc::clone(&frames);
        let summary = assemble_into(dir.path(), &PngCodec, |_, _| {
            Ok(Box::new(RecordingSink { frames: sink_frames }) as Box<dyn VideoSink>)
        })
        .unwrap();
        assert_eq!(summary.frames_written, 2);
        assert_eq!(summary.frames_skipped, 1);
        assert!(frames.borrow().iter().all(|f| f.dimensions() == (8, 8)));
    }

    #[test]
    fn test_empty_directory_produces_no_video() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("readme.txt"), b"x").unwrap();
        let output = dir.path().join("out.gif");
        let err = assemble_video(dir.path(), &output, 15, &PngCodec).unwrap_err();
        assert!(matches!(err, FractalError::EmptyInput { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn test_gif_assembly() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..3 {
            write_frame(dir.path(), i, 80 * i as u8, 6);
        }
        let output = dir.path().join("video.gif");
        let summary = assemble_video(dir.path(), &output, 15, &PngCodec).unwrap();
        assert_eq!(summary.frames_written, 3);
        let bytes = fs::read(&output).unwrap();
        assert!(bytes.starts_with(b"GIF89a"));
        assert_eq!(bytes.last(), Some(&0x3B));
    }

    #[test]
    fn test_failed_listing_keeps_existing_video() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_dir = dir.path().join("frames.txt");
        fs::write(&not_a_dir, b"x").unwrap();
        let output = dir.path().join("previous.gif");
        fs::write(&output, b"GIF89a-ancienne").unwrap();

        let err = assemble_video(&not_a_dir, &output, 15, &PngCodec).unwrap_err();
        assert!(matches!(err, FractalError::Io { .. }));
        assert_eq!(fs::read(&output).unwrap(), b"GIF89a-ancienne");
    }

    #[test]
    fn test_empty_input_keeps_existing_video() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("previous.gif");
        fs::write(&output, b"GIF89a-ancienne").unwrap();
        let frames = dir.path().join("frames");
        fs::create_dir(&frames).unwrap();

        let err = assemble_video(&frames, &output, 15, &PngCodec).unwrap_err();
        assert!(matches!(err, FractalError::EmptyInput { .. }));
        assert!(output.exists());
    }

    /// Refuse toute écriture.
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "fermé"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_gif_trailer_write_error_is_reported() {
        // Tampon assez grand : l'erreur n'apparaît qu'au vidage final.
        let writer = BufWriter::with_capacity(1 << 20, ClosedPipe);
        let mut sink = GifSink::from_writer(writer, Path::new("out.gif"), 15).unwrap();
        sink.push_frame(&RgbImage::new(4, 4)).unwrap();
        let err = (Box::new(sink) as Box<dyn VideoSink>).finish().unwrap_err();
        assert!(matches!(
            err,
            FractalError::Io { ref source, .. } if source.kind() == io::ErrorKind::BrokenPipe
        ));
    }

    #[test]
    fn test_unknown_extension_and_zero_fps_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_frame(dir.path(), 0, 1, 4);
        assert!(matches!(
            assemble_video(dir.path(), &dir.path().join("out.xyz"), 15, &PngCodec),
            Err(FractalError::Configuration(_))
        ));
        assert!(matches!(
            assemble_video(dir.path(), &dir.path().join("out.gif"), 0, &PngCodec),
            Err(FractalError::Configuration(_))
        ));
        assert_eq!(VideoFormat::from_path(Path::new("a/b.MP4")).unwrap(), VideoFormat::Ffmpeg);
    }
}
