//! `rodio`-backed implementation of the engine's `Decoder` capability.
//!
//! Seeking rebuilds the sink with `Source::skip_duration`, so elapsed time
//! is tracked manually from a start instant plus an accumulated offset.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rodio::{OutputStream, Sink, Source};

use crate::engine::{DecodeError, Decoder, VOLUME_NORMAL};

pub struct RodioDecoder {
    stream: OutputStream,
    sink: Option<Sink>,
    locator: Option<PathBuf>,

    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,
    paused: bool,
    volume: f32,
}

impl RodioDecoder {
    pub fn new(stream: OutputStream) -> Self {
        Self {
            stream,
            sink: None,
            locator: None,
            started_at: None,
            accumulated: Duration::ZERO,
            paused: true,
            volume: VOLUME_NORMAL,
        }
    }
}

/// Create a paused `Sink` for `locator` that starts playback at `start_at`.
fn create_sink_at(
    handle: &OutputStream,
    locator: &Path,
    start_at: Duration,
) -> Result<Sink, DecodeError> {
    let file = File::open(locator).map_err(|source| DecodeError::Unreadable {
        path: locator.to_path_buf(),
        source,
    })?;

    let source = rodio::Decoder::new(BufReader::new(file))
        .map_err(|e| DecodeError::Undecodable {
            path: locator.to_path_buf(),
            reason: e.to_string(),
        })?
        // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
        .skip_duration(start_at);

    let sink = Sink::connect_new(handle.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}

impl Decoder for RodioDecoder {
    fn load(&mut self, locator: &Path) -> Result<(), DecodeError> {
        if locator.as_os_str().is_empty() {
            return Err(DecodeError::EmptyLocator);
        }

        if let Some(s) = self.sink.take() {
            s.stop();
        }

        let sink = create_sink_at(&self.stream, locator, Duration::ZERO)?;
        sink.set_volume(self.volume);

        self.sink = Some(sink);
        self.locator = Some(locator.to_path_buf());
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        self.paused = true;
        Ok(())
    }

    fn start(&mut self) {
        let Some(s) = self.sink.as_ref() else {
            return;
        };
        s.play();
        if self.paused {
            self.started_at = Some(Instant::now());
            self.paused = false;
        }
    }

    fn pause(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
        self.paused = true;
    }

    fn seek_to(&mut self, position: Duration) {
        let Some(locator) = self.locator.clone() else {
            return;
        };

        // Scrubbing: rebuild the sink and skip into the file.
        if let Some(s) = self.sink.take() {
            s.stop();
        }

        match create_sink_at(&self.stream, &locator, position) {
            Ok(sink) => {
                sink.set_volume(self.volume);
                if self.paused {
                    self.started_at = None;
                } else {
                    sink.play();
                    self.started_at = Some(Instant::now());
                }
                self.sink = Some(sink);
                self.accumulated = position;
            }
            Err(err) => {
                // The file went away mid-session. Drop the source; the
                // session sees an inactive decoder from here on.
                eprintln!("encore: seek failed: {err}");
                self.locator = None;
                self.started_at = None;
                self.accumulated = Duration::ZERO;
                self.paused = true;
            }
        }
    }

    fn position(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn is_playing(&self) -> bool {
        self.sink.is_some() && !self.paused
    }

    fn is_finished(&self) -> bool {
        self.sink.as_ref().map(Sink::empty).unwrap_or(false)
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(volume);
        }
    }

    fn release(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.locator = None;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        self.paused = true;
    }

    fn is_active(&self) -> bool {
        self.sink.is_some()
    }
}
