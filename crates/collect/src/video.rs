//! Animated GIF export of collected episode frames.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

use crate::CollectError;

/// Collects frames for one episode and writes them out as a looping GIF.
#[derive(Default)]
pub struct VideoWriter {
    frames: Vec<RgbaImage>,
}

impl VideoWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: RgbaImage) {
        self.frames.push(frame);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Encode the collected frames and clear the buffer.
    pub fn save_gif(&mut self, path: &Path, frame_delay_ms: u32) -> Result<(), CollectError> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        let mut encoder = GifEncoder::new(writer);
        encoder.set_repeat(Repeat::Infinite)?;
        for frame in self.frames.drain(..) {
            let frame = Frame::from_parts(
                frame,
                0,
                0,
                Delay::from_numer_denom_ms(frame_delay_ms, 1),
            );
            encoder.encode_frame(frame)?;
        }
        tracing::info!(path = %path.display(), "wrote episode gif");
        Ok(())
    }
}
