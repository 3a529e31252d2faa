//! Local narration playback for the terminal preview.
//!
//! Executes the controller's [`MediaCommand`]s against at most one rodio
//! [`Sink`], tagged with its year. An empty sink means the clip played to
//! the end; the caller feeds that back as `playback_ended`.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::debug;

use vday_core::controller::MediaCommand;

use crate::audio;

/// A failed `Play`, tagged with the year whose handle should reset.
#[derive(Debug)]
pub struct PlaybackError {
    pub year: u16,
    pub reason: String,
}

pub struct NarrationPlayer {
    // rodio OutputStream must outlive its sinks
    _stream: OutputStream,
    handle: OutputStreamHandle,
    current: Option<(u16, Sink)>,
    audio_dir: PathBuf,
}

impl NarrationPlayer {
    /// Open the default audio output. Fails when no output device exists.
    pub fn new(audio_dir: &Path) -> Result<Self, String> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| format!("failed to open audio output: {e}"))?;
        Ok(Self {
            _stream: stream,
            handle,
            current: None,
            audio_dir: audio_dir.to_path_buf(),
        })
    }

    /// Execute controller commands in order.
    pub fn run(&mut self, commands: &[MediaCommand]) -> Result<(), PlaybackError> {
        for command in commands {
            match command {
                MediaCommand::Play { year, source } => self.start(*year, source)?,
                MediaCommand::Pause => {
                    if let Some((year, sink)) = &self.current {
                        debug!("narration: pause {year}");
                        sink.pause();
                    }
                }
                MediaCommand::Resume => {
                    if let Some((year, sink)) = &self.current {
                        debug!("narration: resume {year}");
                        sink.play();
                    }
                }
                MediaCommand::Stop => {
                    if let Some((year, sink)) = self.current.take() {
                        debug!("narration: stop {year}");
                        sink.stop();
                    }
                }
            }
        }
        Ok(())
    }

    /// Year whose clip just finished: the sink drained on its own and the
    /// slot is cleared. Paused clips keep their source and never drain.
    pub fn finished_year(&mut self) -> Option<u16> {
        match &self.current {
            Some((year, sink)) if sink.empty() => {
                let year = *year;
                self.current = None;
                Some(year)
            }
            _ => None,
        }
    }

    fn start(&mut self, year: u16, source: &str) -> Result<(), PlaybackError> {
        // The page table records source paths like `audio/<year>_vday.mp3`;
        // only the file name matters here, resolved the same
        // case-insensitive way the server route resolves it.
        let name = source.rsplit('/').next().unwrap_or(source);
        let path = audio::resolve_clip(&self.audio_dir, name).ok_or_else(|| PlaybackError {
            year,
            reason: format!("no clip named {name} in {}", self.audio_dir.display()),
        })?;
        let bytes = std::fs::read(&path).map_err(|e| PlaybackError {
            year,
            reason: format!("cannot read {}: {e}", path.display()),
        })?;
        let source = Decoder::new(Cursor::new(bytes)).map_err(|e| PlaybackError {
            year,
            reason: format!("cannot decode {}: {e}", path.display()),
        })?;
        let sink = Sink::try_new(&self.handle).map_err(|e| PlaybackError {
            year,
            reason: format!("cannot open playback sink: {e}"),
        })?;
        sink.append(source);

        debug!("narration: play {year} from {}", path.display());
        if let Some((_, old)) = self.current.take() {
            old.stop();
        }
        self.current = Some((year, sink));
        Ok(())
    }
}
