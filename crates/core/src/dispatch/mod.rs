use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::{
    mapping::FALLBACK_SOUND, Category, Command, LineSource, Player, Result, SoundTables, Variant,
};

/// The category and normalised key a line resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundSource {
    pub category: Category,
    pub key: String,
}

impl fmt::Display for SoundSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.category, self.key)
    }
}

/// What happened to a single received line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Played { source: SoundSource, path: PathBuf },
    Unmapped { source: SoundSource },
    Ignored,
}

/// Reads lines, resolves them against the sound tables and plays the result.
#[derive(Debug)]
pub struct Dispatcher<P> {
    variant: Variant,
    tables: SoundTables,
    player: P,
}

impl<P: Player> Dispatcher<P> {
    /// Builds the sound tables for `variant` once, up front.
    pub fn new(variant: Variant, player: P) -> Self {
        Self {
            variant,
            tables: SoundTables::for_variant(variant),
            player,
        }
    }

    /// The playback backend, mostly useful for inspecting test doubles.
    pub fn player(&self) -> &P {
        &self.player
    }

    /// Runs until the source is exhausted or an error occurs. The serial
    /// source never ends on its own, so in practice this only returns on a
    /// fatal fault.
    pub fn run<S: LineSource + ?Sized>(&mut self, source: &mut S) -> Result<()> {
        while let Some(line) = source.next_line()? {
            self.dispatch_line(&line)?;
        }
        tracing::info!("line source exhausted");
        Ok(())
    }

    /// Dispatches one already-stripped line. Playback errors propagate.
    pub fn dispatch_line(&mut self, line: &str) -> Result<Dispatch> {
        tracing::info!(line, "received from serial");

        let Some(command) = Command::parse(line) else {
            return Ok(Dispatch::Ignored);
        };
        if !self.variant.handles(command.category) {
            return Ok(Dispatch::Ignored);
        }

        let source = SoundSource {
            category: command.category,
            key: self.variant.normalise_key(command.key),
        };

        match self.resolve(&source) {
            Some(path) => {
                tracing::info!(%source, file = %path.display(), "playing sound");
                self.player.play(&path)?;
                Ok(Dispatch::Played { source, path })
            }
            None => {
                tracing::info!(%source, "no sound mapped");
                Ok(Dispatch::Unmapped { source })
            }
        }
    }

    fn resolve(&self, source: &SoundSource) -> Option<PathBuf> {
        let mapped = self.tables.lookup(source.category, &source.key);
        match self.variant {
            Variant::Mapped => mapped.map(Path::to_path_buf),
            Variant::Fallback => {
                // The per-colour lookup is kept for its log line only.
                tracing::debug!(%source, hit = mapped.is_some(), "colour table lookup");
                Some(PathBuf::from(FALLBACK_SOUND))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::{BridgeError, ColorName, DryRunPlayer, LineReader, SerialSource};

    #[derive(Debug, Default)]
    struct RecordingPlayer {
        played: Vec<PathBuf>,
    }

    impl Player for RecordingPlayer {
        fn play(&mut self, path: &Path) -> Result<()> {
            self.played.push(path.to_path_buf());
            Ok(())
        }
    }

    struct FailingPlayer;

    impl Player for FailingPlayer {
        fn play(&mut self, path: &Path) -> Result<()> {
            Err(BridgeError::msg(format!("cannot play {}", path.display())))
        }
    }

    fn mapped() -> Dispatcher<RecordingPlayer> {
        Dispatcher::new(Variant::Mapped, RecordingPlayer::default())
    }

    fn fallback() -> Dispatcher<RecordingPlayer> {
        Dispatcher::new(Variant::Fallback, RecordingPlayer::default())
    }

    #[test]
    fn every_mapped_key_plays_exactly_its_file() {
        let tables = SoundTables::for_variant(Variant::Mapped);
        for (category, prefix) in [
            (Category::Color, "Play COLOR:"),
            (Category::Event, "Play EVENT:"),
        ] {
            let table = tables.table(category).unwrap();
            for key in table.keys() {
                let mut dispatcher = mapped();
                let outcome = dispatcher.dispatch_line(&format!("{prefix}{key}")).unwrap();
                let expected = table.get(key).unwrap().to_path_buf();
                assert_eq!(dispatcher.player().played, vec![expected.clone()]);
                assert!(matches!(outcome, Dispatch::Played { path, .. } if path == expected));
            }
        }
    }

    #[test]
    fn green_plays_yoda() {
        let mut dispatcher = mapped();
        let outcome = dispatcher.dispatch_line("Play COLOR:green").unwrap();
        assert_eq!(
            outcome,
            Dispatch::Played {
                source: SoundSource {
                    category: Category::Color,
                    key: "green".to_string()
                },
                path: PathBuf::from("media/yoda.mp3"),
            }
        );
    }

    #[test]
    fn activated_event_plays_lightspeed() {
        let mut dispatcher = mapped();
        dispatcher.dispatch_line("Play EVENT:activated").unwrap();
        assert_eq!(
            dispatcher.player().played,
            vec![PathBuf::from("media/lightspeed.mp3")]
        );
    }

    #[test]
    fn mapped_lookup_ignores_case() {
        let mut dispatcher = mapped();
        let upper = dispatcher.dispatch_line("Play COLOR:RED").unwrap();
        let lower = dispatcher.dispatch_line("Play COLOR:red").unwrap();
        assert_eq!(upper, lower);
        assert_eq!(dispatcher.player().played.len(), 2);
    }

    #[test]
    fn unmapped_keys_do_not_play() {
        let mut dispatcher = mapped();
        let colour = dispatcher.dispatch_line("Play COLOR:chartreuse").unwrap();
        let event = dispatcher.dispatch_line("Play EVENT:exploded").unwrap();
        assert_eq!(
            colour,
            Dispatch::Unmapped {
                source: SoundSource {
                    category: Category::Color,
                    key: "chartreuse".to_string()
                }
            }
        );
        assert!(matches!(event, Dispatch::Unmapped { .. }));
        assert!(dispatcher.player().played.is_empty());
    }

    #[test]
    fn unrecognised_lines_are_ignored() {
        let mut dispatcher = mapped();
        for line in ["Lightsaber activated!", "Color locked!", "", "COLOR:red"] {
            assert_eq!(dispatcher.dispatch_line(line).unwrap(), Dispatch::Ignored);
        }
        assert!(dispatcher.player().played.is_empty());
    }

    #[test]
    fn firmware_colour_lines_resolve() {
        let mut dispatcher = mapped();
        let line = ColorName::classify(0, 255, 0).command_line();
        dispatcher.dispatch_line(&line).unwrap();
        assert_eq!(dispatcher.player().played, vec![PathBuf::from("media/yoda.mp3")]);
    }

    // The fallback variant discards its colour lookup and has no event
    // handling. These tests pin that behaviour down.

    #[test]
    fn fallback_plays_the_same_sound_for_every_colour() {
        let mut dispatcher = fallback();
        for line in ["Play COLOR:green", "Play COLOR:Red", "Play COLOR:red", "Play COLOR:teal"] {
            let outcome = dispatcher.dispatch_line(line).unwrap();
            assert!(matches!(outcome, Dispatch::Played { path, .. } if path == Path::new(FALLBACK_SOUND)));
        }
        assert_eq!(dispatcher.player().played.len(), 4);
    }

    #[test]
    fn fallback_does_not_normalise_case() {
        let mut dispatcher = fallback();
        let outcome = dispatcher.dispatch_line("Play COLOR: Red").unwrap();
        let Dispatch::Played { source, .. } = outcome else {
            panic!("expected playback");
        };
        assert_eq!(source.key, "Red");

        let tables = SoundTables::for_variant(Variant::Fallback);
        assert!(tables.lookup(Category::Color, "Red").is_some());
        assert!(tables.lookup(Category::Color, "red").is_none());
    }

    #[test]
    fn fallback_ignores_events() {
        let mut dispatcher = fallback();
        let outcome = dispatcher.dispatch_line("Play EVENT:activated").unwrap();
        assert_eq!(outcome, Dispatch::Ignored);
        assert!(dispatcher.player().played.is_empty());
    }

    #[test]
    fn run_dispatches_until_the_source_ends() {
        let input = "Play COLOR: Blue\r\nhello\nPlay EVENT:deactivated\nPlay COLOR:mauve\n";
        let mut source = LineReader::new(Cursor::new(input));
        let mut dispatcher = mapped();
        dispatcher.run(&mut source).unwrap();
        assert_eq!(
            dispatcher.player().played,
            vec![
                PathBuf::from("media/luke-skywalker.mp3"),
                PathBuf::from("media/c3po.mp3"),
            ]
        );
    }

    #[test]
    fn dry_run_replay_skips_every_resolved_sound() {
        let mut source = LineReader::new(Cursor::new("Play COLOR:red\nPlay COLOR:teal\n"));
        let mut dispatcher = Dispatcher::new(Variant::Fallback, DryRunPlayer::new());
        dispatcher.run(&mut source).unwrap();
        assert_eq!(dispatcher.player().skipped(), 2);
    }

    #[test]
    fn closed_serial_port_stops_the_loop() {
        let input = Cursor::new("Play COLOR:green\nPlay EVENT:activated\n");
        let mut source = SerialSource::from_reader("/dev/ttyTEST", input);
        let mut dispatcher = mapped();

        let err = dispatcher.run(&mut source).unwrap_err();
        assert!(matches!(err, BridgeError::SerialClosed(ref port) if port == "/dev/ttyTEST"));
        assert_eq!(
            dispatcher.player().played,
            vec![
                PathBuf::from("media/yoda.mp3"),
                PathBuf::from("media/lightspeed.mp3"),
            ]
        );
    }

    #[test]
    fn doubled_colour_write_plays_the_first_colour() {
        let mut dispatcher = mapped();
        dispatcher.dispatch_line("Play COLOR:redPlay COLOR:blue").unwrap();
        assert_eq!(
            dispatcher.player().played,
            vec![PathBuf::from("media/darth-vader.mp3")]
        );
    }

    #[test]
    fn playback_failure_stops_the_loop() {
        let mut source = LineReader::new(Cursor::new("Play COLOR:red\nPlay COLOR:blue\n"));
        let mut dispatcher = Dispatcher::new(Variant::Mapped, FailingPlayer);
        let err = dispatcher.run(&mut source).unwrap_err();
        assert!(format!("{err}").contains("darth-vader"));
        assert_eq!(
            source.next_line().unwrap().as_deref(),
            Some("Play COLOR:blue")
        );
    }
}
