//! Artifact assembly: animated GIF (primary) and best-effort MP4.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};

use rela_core::{Error, Result};

fn assembly_error(artifact: &Path, message: impl Into<String>) -> Error {
    Error::Assembly {
        artifact: artifact.display().to_string(),
        message: message.into(),
    }
}

/// Concatenate rasterized frames, in increasing frame order, into an
/// animated GIF at the given playback rate.
///
/// The GIF is the primary artifact: any failure here is fatal to the run.
pub fn assemble_gif(frames: &[PathBuf], out: &Path, playback_fps: f64) -> Result<()> {
    if frames.is_empty() {
        return Err(assembly_error(out, "no frames to assemble"));
    }
    if !(playback_fps > 0.0) {
        return Err(assembly_error(out, format!("invalid playback rate {playback_fps}")));
    }

    let delay_ms = (1000.0 / playback_fps).round().max(1.0) as u32;

    let file = File::create(out)?;
    let mut encoder = GifEncoder::new(file);
    encoder
        .set_repeat(Repeat::Infinite)
        .map_err(|e| assembly_error(out, e.to_string()))?;

    for path in frames {
        let raster = image::open(path)
            .map_err(|e| assembly_error(out, format!("{}: {e}", path.display())))?
            .to_rgba8();
        let frame = Frame::from_parts(raster, 0, 0, Delay::from_numer_denom_ms(delay_ms, 1));
        encoder
            .encode_frame(frame)
            .map_err(|e| assembly_error(out, e.to_string()))?;
    }
    Ok(())
}

/// Best-effort MP4 through the system `ffmpeg`.
///
/// The caller downgrades any error here to a warning: the primary artifact
/// is already on disk by the time this runs, and a missing encoder must not
/// abort the run.
pub fn assemble_video(frame_dir: &Path, out: &Path, playback_fps: f64) -> Result<()> {
    let pattern = frame_dir.join("frame_*.png");
    let status = Command::new("ffmpeg")
        .arg("-y")
        .arg("-framerate")
        .arg(playback_fps.to_string())
        .arg("-pattern_type")
        .arg("glob")
        .arg("-i")
        .arg(&pattern)
        .arg("-pix_fmt")
        .arg("yuv420p")
        .arg(out)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| assembly_error(out, format!("could not launch ffmpeg: {e}")))?;

    if !status.success() {
        return Err(assembly_error(out, format!("ffmpeg exited with {status}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_frame(dir: &Path, index: usize, shade: u8) -> PathBuf {
        let path = dir.join(format!("frame_{index:04}.png"));
        let img = RgbaImage::from_pixel(16, 16, Rgba([shade, 0, 255 - shade, 255]));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_gif_assembly() {
        let dir = tempfile::tempdir().unwrap();
        let frames = vec![
            write_frame(dir.path(), 0, 10),
            write_frame(dir.path(), 1, 120),
            write_frame(dir.path(), 2, 240),
        ];

        let out = dir.path().join("out.gif");
        assemble_gif(&frames, &out, 10.0).unwrap();

        let bytes = std::fs::read(&out).unwrap();
        assert!(bytes.starts_with(b"GIF8"), "output should be a GIF");
    }

    #[test]
    fn test_empty_frame_set_is_an_assembly_error() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.gif");
        let err = assemble_gif(&[], &out, 10.0).unwrap_err();
        assert!(matches!(err, Error::Assembly { .. }));
    }

    #[test]
    fn test_missing_frame_is_an_assembly_error() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.gif");
        let missing = dir.path().join("frame_0000.png");
        let err = assemble_gif(&[missing], &out, 10.0).unwrap_err();
        assert!(matches!(err, Error::Assembly { .. }));
    }
}
