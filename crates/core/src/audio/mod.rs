use std::{fs::File, io::BufReader, path::Path};

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

use crate::{BridgeError, Result};

/// Playback backend driven by the dispatcher.
///
/// `play` blocks until the sound has finished so consecutive commands never
/// overlap.
pub trait Player {
    fn play(&mut self, path: &Path) -> Result<()>;
}

impl<P: Player + ?Sized> Player for Box<P> {
    fn play(&mut self, path: &Path) -> Result<()> {
        (**self).play(path)
    }
}

/// Plays sound files on the default output device through rodio.
///
/// The output stream is opened on first use and kept for the rest of the
/// process lifetime.
#[derive(Default)]
pub struct RodioPlayer {
    output: Option<(OutputStream, OutputStreamHandle)>,
}

impl RodioPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&OutputStreamHandle> {
        if self.output.is_none() {
            self.output = Some(OutputStream::try_default()?);
        }
        let (_, handle) = self
            .output
            .as_ref()
            .ok_or_else(|| BridgeError::msg("audio output stream missing"))?;
        Ok(handle)
    }
}

impl Player for RodioPlayer {
    fn play(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path)?;
        let source = Decoder::new(BufReader::new(file))?;
        let sink = Sink::try_new(self.handle()?)?;

        sink.append(source);
        sink.sleep_until_end();
        Ok(())
    }
}

impl std::fmt::Debug for RodioPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioPlayer")
            .field("stream_open", &self.output.is_some())
            .finish()
    }
}

/// Player that only logs what it would have played. Used by
/// `replay --dry-run` to exercise mappings without audio hardware.
#[derive(Debug, Default)]
pub struct DryRunPlayer {
    skipped: u64,
}

impl DryRunPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of playbacks skipped so far.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

impl Player for DryRunPlayer {
    fn play(&mut self, path: &Path) -> Result<()> {
        self.skipped += 1;
        tracing::info!(
            file = %path.display(),
            skipped = self.skipped,
            "dry run, skipping playback"
        );
        Ok(())
    }
}
