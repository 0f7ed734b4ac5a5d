//! Output rendering for scan and config payloads
//!
//! Every payload the CLI prints implements [`Render`] for the text form
//! alongside `Serialize` for the JSON form. [`OutputWriter`] picks the
//! form once from `--output`, so command handlers never branch on format.

use std::io::Write;

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Where rendered output goes.
enum OutputTarget {
    /// Process stdout (the normal case).
    Stdout,
    /// Discard everything. Used by command handler tests so scan and
    /// config reports do not interleave with the test runner's output.
    Discard,
}

/// Renders CLI payloads as text or JSON.
pub struct OutputWriter {
    format: OutputFormat,
    target: OutputTarget,
}

impl OutputWriter {
    /// Writer that renders to stdout.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            target: OutputTarget::Stdout,
        }
    }

    /// Writer that renders nowhere.
    pub fn discard(format: OutputFormat) -> Self {
        Self {
            format,
            target: OutputTarget::Discard,
        }
    }

    /// Render a payload in the configured format.
    ///
    /// Text goes through [`Render::render_text`]; JSON through
    /// `serde_json::to_writer_pretty` with a trailing newline.
    pub fn render<T: Render + Serialize>(&self, payload: &T) -> Result<(), CliError> {
        match self.target {
            OutputTarget::Stdout => {
                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                self.render_into(payload, &mut handle)
            }
            OutputTarget::Discard => self.render_into(payload, &mut std::io::sink()),
        }
    }

    fn render_into<T: Render + Serialize>(
        &self,
        payload: &T,
        w: &mut dyn Write,
    ) -> Result<(), CliError> {
        match self.format {
            OutputFormat::Text => payload.render_text(w)?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *w, payload)?;
                writeln!(w)?;
            }
        }
        Ok(())
    }
}

/// Human-readable text rendering, implemented by every CLI payload
/// alongside `serde::Serialize`.
pub trait Render {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()>;
}
