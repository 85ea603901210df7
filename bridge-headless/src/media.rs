//! In-memory media element.

use crate::registry::{ListenerRegistry, Rejections};
use bridge_traits::{
    error::Result, ListenerId, MediaElement, MediaError, MediaEventKind, MediaListener,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::trace;

/// Command received by a [`HeadlessMediaElement`].
#[derive(Debug, Clone, PartialEq)]
pub enum MediaCommand {
    Play,
    Pause,
    SetSource(String),
    SetLoop(bool),
    SetCurrentTime(f64),
    SetVolume(f64),
}

impl MediaCommand {
    pub fn name(&self) -> &'static str {
        match self {
            MediaCommand::Play => "play",
            MediaCommand::Pause => "pause",
            MediaCommand::SetSource(_) => "src",
            MediaCommand::SetLoop(_) => "loop",
            MediaCommand::SetCurrentTime(_) => "currentTime",
            MediaCommand::SetVolume(_) => "volume",
        }
    }
}

#[derive(Debug)]
struct ElementState {
    source: Option<String>,
    looping: bool,
    paused: bool,
    current_time: f64,
    duration: f64,
    volume: f64,
    error: Option<MediaError>,
}

impl Default for ElementState {
    fn default() -> Self {
        Self {
            source: None,
            looping: false,
            paused: true,
            current_time: 0.0,
            duration: f64::NAN,
            volume: 1.0,
            error: None,
        }
    }
}

/// Media element that keeps attribute state in memory and fires only the
/// events it is told to (plus command echoes when enabled).
#[derive(Default)]
pub struct HeadlessMediaElement {
    state: Mutex<ElementState>,
    commands: Mutex<Vec<MediaCommand>>,
    listeners: ListenerRegistry<MediaEventKind, MediaListener>,
    rejections: Rejections,
    echo: AtomicBool,
}

impl HeadlessMediaElement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the matching event after each accepted command.
    pub fn with_echo(self, echo: bool) -> Self {
        self.echo.store(echo, Ordering::SeqCst);
        self
    }

    // ------------------------------------------------------------------
    // Scripting
    // ------------------------------------------------------------------

    /// Dispatch `kind` to every registered listener.
    pub fn emit(&self, kind: MediaEventKind) {
        let listeners = self.listeners.snapshot(kind);
        trace!(event = %kind, listeners = listeners.len(), "headless media event");
        for listener in listeners {
            listener(kind);
        }
    }

    /// Metadata arrived: the duration becomes known.
    pub fn load_metadata(&self, duration: f64) {
        self.state.lock().duration = duration;
        self.emit(MediaEventKind::LoadedMetadata);
    }

    /// Playback progressed to `position`.
    pub fn advance_to(&self, position: f64) {
        self.state.lock().current_time = position;
        self.emit(MediaEventKind::TimeUpdate);
    }

    /// Playback reached the end of the media.
    pub fn finish(&self) {
        {
            let mut state = self.state.lock();
            if state.duration.is_finite() {
                state.current_time = state.duration;
            }
            state.paused = true;
        }
        self.emit(MediaEventKind::Ended);
    }

    /// The element failed with `error`.
    pub fn fail(&self, error: MediaError) {
        self.state.lock().error = Some(error);
        self.emit(MediaEventKind::Error);
    }

    /// Make `command` (see [`MediaCommand::name`]) return an error.
    pub fn reject(&self, command: &str) {
        self.rejections.reject(command);
    }

    pub fn allow(&self, command: &str) {
        self.rejections.allow(command);
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    pub fn commands(&self) -> Vec<MediaCommand> {
        self.commands.lock().clone()
    }

    pub fn clear_commands(&self) {
        self.commands.lock().clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn source(&self) -> Option<String> {
        self.state.lock().source.clone()
    }

    pub fn is_paused(&self) -> bool {
        self.state.lock().paused
    }

    pub fn is_looping(&self) -> bool {
        self.state.lock().looping
    }

    fn record(&self, command: MediaCommand) -> Result<()> {
        self.rejections.check(command.name())?;
        trace!(?command, "headless media command");

        let echo = {
            let mut state = self.state.lock();
            match &command {
                MediaCommand::Play => {
                    state.paused = false;
                    Some(MediaEventKind::Play)
                }
                MediaCommand::Pause => {
                    state.paused = true;
                    Some(MediaEventKind::Pause)
                }
                MediaCommand::SetSource(src) => {
                    state.source = Some(src.clone());
                    state.current_time = 0.0;
                    state.duration = f64::NAN;
                    state.error = None;
                    None
                }
                MediaCommand::SetLoop(looping) => {
                    state.looping = *looping;
                    None
                }
                MediaCommand::SetCurrentTime(seconds) => {
                    state.current_time = *seconds;
                    Some(MediaEventKind::TimeUpdate)
                }
                MediaCommand::SetVolume(volume) => {
                    state.volume = *volume;
                    Some(MediaEventKind::VolumeChange)
                }
            }
        };

        self.commands.lock().push(command);

        if self.echo.load(Ordering::SeqCst) {
            if let Some(kind) = echo {
                self.emit(kind);
            }
        }
        Ok(())
    }
}

impl MediaElement for HeadlessMediaElement {
    fn add_listener(&self, kind: MediaEventKind, listener: MediaListener) -> ListenerId {
        self.listeners.add(kind, listener)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    fn play(&self) -> Result<()> {
        self.record(MediaCommand::Play)
    }

    fn pause(&self) -> Result<()> {
        self.record(MediaCommand::Pause)
    }

    fn set_source(&self, src: &str) -> Result<()> {
        self.record(MediaCommand::SetSource(src.to_string()))
    }

    fn set_loop(&self, looping: bool) -> Result<()> {
        self.record(MediaCommand::SetLoop(looping))
    }

    fn set_current_time(&self, seconds: f64) -> Result<()> {
        self.record(MediaCommand::SetCurrentTime(seconds))
    }

    fn set_volume(&self, volume: f64) -> Result<()> {
        self.record(MediaCommand::SetVolume(volume))
    }

    fn current_time(&self) -> f64 {
        self.state.lock().current_time
    }

    fn duration(&self) -> f64 {
        self.state.lock().duration
    }

    fn volume(&self) -> f64 {
        self.state.lock().volume
    }

    fn error(&self) -> Option<MediaError> {
        self.state.lock().error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_records_commands_and_state() {
        let element = HeadlessMediaElement::new();
        element.set_source("https://cdn.example.com/a.mp4").unwrap();
        element.set_volume(0.25).unwrap();
        element.play().unwrap();

        assert_eq!(
            element.commands(),
            vec![
                MediaCommand::SetSource("https://cdn.example.com/a.mp4".into()),
                MediaCommand::SetVolume(0.25),
                MediaCommand::Play,
            ]
        );
        assert_eq!(element.volume(), 0.25);
        assert!(!element.is_paused());
        assert!(element.duration().is_nan());
    }

    #[test]
    fn test_echo_fires_events() {
        let element = Arc::new(HeadlessMediaElement::new().with_echo(true));
        let seen = Arc::new(Mutex::new(Vec::new()));
        for kind in MediaEventKind::ALL {
            let seen = seen.clone();
            element.add_listener(kind, Arc::new(move |k: MediaEventKind| seen.lock().push(k)));
        }

        element.play().unwrap();
        element.set_loop(true).unwrap();
        element.set_volume(0.5).unwrap();

        assert_eq!(
            *seen.lock(),
            vec![MediaEventKind::Play, MediaEventKind::VolumeChange]
        );
    }

    #[test]
    fn test_listener_may_reenter_element() {
        let element = Arc::new(HeadlessMediaElement::new());
        let weak = Arc::downgrade(&element);
        element.add_listener(
            MediaEventKind::LoadedMetadata,
            Arc::new(move |_: MediaEventKind| {
                if let Some(element) = weak.upgrade() {
                    element.set_current_time(12.0).unwrap();
                }
            }),
        );

        element.load_metadata(90.0);
        assert_eq!(element.current_time(), 12.0);
        assert_eq!(element.duration(), 90.0);
    }

    #[test]
    fn test_rejected_command_is_not_recorded() {
        let element = HeadlessMediaElement::new();
        element.reject("play");

        assert!(element.play().is_err());
        assert!(element.commands().is_empty());
        assert!(element.is_paused());
    }

    #[test]
    fn test_removed_listener_is_silent() {
        let element = HeadlessMediaElement::new();
        let hits = Arc::new(Mutex::new(0));
        let counter = hits.clone();
        let id = element.add_listener(
            MediaEventKind::Ended,
            Arc::new(move |_: MediaEventKind| *counter.lock() += 1),
        );

        element.finish();
        assert!(element.remove_listener(id));
        element.finish();

        assert_eq!(*hits.lock(), 1);
        assert_eq!(element.listener_count(), 0);
    }
}
