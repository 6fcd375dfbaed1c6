use std::path::{Path, PathBuf};

use crate::batch::naming::{ArtifactKind, ArtifactName, METADATA_DIR};
use crate::foundation::error::{QuoteError, QuoteResult};
use crate::render::surface::FrameRGBA;

/// Destination for finished quote images.
///
/// Ordering contract: `begin` once, then any number of `write` calls, then `end` once. The two
/// exports of one record are written back to back, primary first.
pub trait ArtifactSink {
    /// Called once before the first record is written.
    fn begin(&mut self) -> QuoteResult<()>;
    /// Store one export of one record.
    fn write(
        &mut self,
        name: &ArtifactName,
        kind: ArtifactKind,
        frame: &FrameRGBA,
    ) -> QuoteResult<()>;
    /// Called once after the last record.
    fn end(&mut self) -> QuoteResult<()>;
}

/// Writes PNG files under a destination directory.
///
/// Primary exports land in `dst/`, credits exports in `dst/metadata/`. With `grayscale` set,
/// each file is reloaded after encoding and overwritten with its single-channel luminance.
#[derive(Debug, Clone)]
pub struct PngSink {
    dst: PathBuf,
    grayscale: bool,
    written: Vec<PathBuf>,
}

impl PngSink {
    pub fn new(dst: impl Into<PathBuf>, grayscale: bool) -> Self {
        Self {
            dst: dst.into(),
            grayscale,
            written: Vec::new(),
        }
    }

    pub fn dst(&self) -> &Path {
        &self.dst
    }

    /// Paths written so far, in write order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

fn write_png(path: &Path, frame: &FrameRGBA) -> QuoteResult<()> {
    if frame.premultiplied {
        return Err(QuoteError::validation(
            "png export expects straight alpha, got premultiplied frame",
        ));
    }
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )?;
    Ok(())
}

fn desaturate_in_place(path: &Path) -> QuoteResult<()> {
    let luma = image::open(path)?.to_luma8();
    luma.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

impl ArtifactSink for PngSink {
    fn begin(&mut self) -> QuoteResult<()> {
        std::fs::create_dir_all(self.dst.join(METADATA_DIR))?;
        self.written.clear();
        Ok(())
    }

    fn write(
        &mut self,
        name: &ArtifactName,
        kind: ArtifactKind,
        frame: &FrameRGBA,
    ) -> QuoteResult<()> {
        let path = self.dst.join(name.relative_path(kind));
        write_png(&path, frame)?;
        if self.grayscale {
            desaturate_in_place(&path)?;
        }
        tracing::debug!(path = %path.display(), "wrote png");
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> QuoteResult<()> {
        Ok(())
    }
}

/// In-memory sink for tests and dry runs.
#[derive(Debug, Default)]
pub struct InMemorySink {
    began: bool,
    ended: bool,
    /// Exports in write order.
    pub(crate) artifacts: Vec<(ArtifactName, ArtifactKind, FrameRGBA)>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the captured exports.
    pub fn artifacts(&self) -> &[(ArtifactName, ArtifactKind, FrameRGBA)] {
        &self.artifacts
    }

    /// `true` once both `begin` and `end` were called.
    pub fn is_closed(&self) -> bool {
        self.began && self.ended
    }
}

impl ArtifactSink for InMemorySink {
    fn begin(&mut self) -> QuoteResult<()> {
        self.began = true;
        self.ended = false;
        self.artifacts.clear();
        Ok(())
    }

    fn write(
        &mut self,
        name: &ArtifactName,
        kind: ArtifactKind,
        frame: &FrameRGBA,
    ) -> QuoteResult<()> {
        self.artifacts.push((*name, kind, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> QuoteResult<()> {
        self.ended = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/sink.rs"]
mod tests;
