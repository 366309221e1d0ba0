//! Line-oriented renderers for headless runs.

use std::io::{self, Write};

use crate::dashboard::render::{Renderer, Scene};

/// Writes one human-readable summary line per frame.
///
/// The line carries the clock, tick number, link label, active panel and the
/// snapshot summary.
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    type Error = io::Error;

    fn render(&mut self, scene: &Scene<'_>) -> io::Result<()> {
        writeln!(
            self.out,
            "[{}] #{:<4} {} | {} | {}",
            scene.clock, scene.tick, scene.snapshot, scene.connection, scene.panel
        )?;
        if let Some(prompt) = scene.emergency_prompt {
            writeln!(self.out, "  ! {prompt}")?;
        }
        self.out.flush()
    }
}

/// Writes each frame as one JSON object per line.
///
/// # Errors
///
/// Rendering fails with an `io::Error` if serialization or writing fails.
pub struct JsonLinesRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonLinesRenderer<W> {
    type Error = io::Error;

    fn render(&mut self, scene: &Scene<'_>) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, scene)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}
