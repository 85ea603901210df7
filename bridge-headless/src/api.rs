//! In-memory message-API embed.

use crate::registry::{ListenerRegistry, Rejections};
use bridge_traits::{
    error::Result, ApiEvent, ApiEventKind, ApiListener, ApiPlayerOptions, BridgeError,
    EmbedApiFactory, EmbedApiPlayer, ListenerId, SurfaceId,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

const STATE_PLAYING: i32 = 1;
const STATE_PAUSED: i32 = 2;

/// Command received by a [`HeadlessApiPlayer`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCommand {
    PlayVideo,
    PauseVideo,
    SeekTo(f64),
    /// Volume on the 0..100 scale.
    SetVolume(f64),
    SetLoop(bool),
}

impl ApiCommand {
    pub fn name(&self) -> &'static str {
        match self {
            ApiCommand::PlayVideo => "playVideo",
            ApiCommand::PauseVideo => "pauseVideo",
            ApiCommand::SeekTo(_) => "seekTo",
            ApiCommand::SetVolume(_) => "setVolume",
            ApiCommand::SetLoop(_) => "setLoop",
        }
    }
}

#[derive(Debug, Default)]
struct Clock {
    duration: f64,
    current_time: f64,
}

/// Message-API embed that reports a scripted clock.
pub struct HeadlessApiPlayer {
    surface: SurfaceId,
    options: ApiPlayerOptions,
    clock: Mutex<Clock>,
    commands: Mutex<Vec<ApiCommand>>,
    listeners: ListenerRegistry<ApiEventKind, ApiListener>,
    rejections: Rejections,
    echo: AtomicBool,
}

impl HeadlessApiPlayer {
    pub fn new(surface: SurfaceId, options: ApiPlayerOptions) -> Self {
        Self {
            surface,
            options,
            clock: Mutex::new(Clock::default()),
            commands: Mutex::new(Vec::new()),
            listeners: ListenerRegistry::new(),
            rejections: Rejections::default(),
            echo: AtomicBool::new(false),
        }
    }

    /// When on, `playVideo`/`pauseVideo` fire the matching state change.
    pub fn set_echo(&self, echo: bool) {
        self.echo.store(echo, Ordering::SeqCst);
    }

    pub fn options(&self) -> &ApiPlayerOptions {
        &self.options
    }

    pub fn surface(&self) -> &SurfaceId {
        &self.surface
    }

    // ------------------------------------------------------------------
    // Scripting
    // ------------------------------------------------------------------

    pub fn emit(&self, event: ApiEvent) {
        let listeners = self.listeners.snapshot(event.kind);
        trace!(event = event.kind.as_str(), data = ?event.data, "headless api event");
        for listener in listeners {
            listener(&event);
        }
    }

    pub fn fire_ready(&self) {
        self.emit(ApiEvent::ready());
    }

    pub fn change_state(&self, code: i32) {
        self.emit(ApiEvent::state_change(code));
    }

    pub fn fail(&self, code: i32) {
        self.emit(ApiEvent::error(code));
    }

    pub fn set_duration(&self, duration: f64) {
        self.clock.lock().duration = duration;
    }

    /// Move the reported position without firing anything; the API has no
    /// position event.
    pub fn set_current_time(&self, seconds: f64) {
        self.clock.lock().current_time = seconds;
    }

    pub fn reject(&self, command: &str) {
        self.rejections.reject(command);
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    pub fn commands(&self) -> Vec<ApiCommand> {
        self.commands.lock().clone()
    }

    pub fn clear_commands(&self) {
        self.commands.lock().clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn record(&self, command: ApiCommand) -> Result<()> {
        self.rejections.check(command.name())?;
        trace!(?command, "headless api command");

        let echo = match &command {
            ApiCommand::PlayVideo => Some(STATE_PLAYING),
            ApiCommand::PauseVideo => Some(STATE_PAUSED),
            ApiCommand::SeekTo(seconds) => {
                self.clock.lock().current_time = *seconds;
                None
            }
            ApiCommand::SetVolume(_) | ApiCommand::SetLoop(_) => None,
        };

        self.commands.lock().push(command);

        if self.echo.load(Ordering::SeqCst) {
            if let Some(code) = echo {
                self.change_state(code);
            }
        }
        Ok(())
    }
}

impl EmbedApiPlayer for HeadlessApiPlayer {
    fn on(&self, kind: ApiEventKind, listener: ApiListener) -> ListenerId {
        self.listeners.add(kind, listener)
    }

    fn off(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    fn play_video(&self) -> Result<()> {
        self.record(ApiCommand::PlayVideo)
    }

    fn pause_video(&self) -> Result<()> {
        self.record(ApiCommand::PauseVideo)
    }

    fn seek_to(&self, seconds: f64) -> Result<()> {
        self.record(ApiCommand::SeekTo(seconds))
    }

    fn set_volume(&self, volume: f64) -> Result<()> {
        self.record(ApiCommand::SetVolume(volume))
    }

    fn set_loop(&self, looping: bool) -> Result<()> {
        self.record(ApiCommand::SetLoop(looping))
    }

    fn get_duration(&self) -> f64 {
        self.clock.lock().duration
    }

    fn get_current_time(&self) -> f64 {
        self.clock.lock().current_time
    }
}

/// Factory producing [`HeadlessApiPlayer`]s and remembering each one.
#[derive(Default)]
pub struct HeadlessApiFactory {
    echo: bool,
    fail_next: Mutex<Option<String>>,
    created: Mutex<Vec<Arc<HeadlessApiPlayer>>>,
}

impl HeadlessApiFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn fail_next(&self, reason: impl Into<String>) {
        *self.fail_next.lock() = Some(reason.into());
    }

    pub fn players(&self) -> Vec<Arc<HeadlessApiPlayer>> {
        self.created.lock().clone()
    }

    pub fn last_player(&self) -> Option<Arc<HeadlessApiPlayer>> {
        self.created.lock().last().cloned()
    }
}

impl EmbedApiFactory for HeadlessApiFactory {
    fn create(
        &self,
        surface: &SurfaceId,
        options: ApiPlayerOptions,
    ) -> Result<Arc<dyn EmbedApiPlayer>> {
        if let Some(reason) = self.fail_next.lock().take() {
            return Err(BridgeError::ConstructionFailed(reason));
        }

        debug!(surface = %surface, video_id = ?options.video_id, "creating headless api embed");
        let player = Arc::new(HeadlessApiPlayer::new(surface.clone(), options));
        player.set_echo(self.echo);

        self.created.lock().push(player.clone());
        Ok(player as Arc<dyn EmbedApiPlayer>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echo_reports_state_codes() {
        let player = HeadlessApiPlayer::new("s".into(), ApiPlayerOptions::default());
        player.set_echo(true);
        let codes = Arc::new(Mutex::new(Vec::new()));
        let sink = codes.clone();
        player.on(
            ApiEventKind::StateChange,
            Arc::new(move |event: &ApiEvent| sink.lock().push(event.data)),
        );

        player.play_video().unwrap();
        player.seek_to(5.0).unwrap();
        player.pause_video().unwrap();

        assert_eq!(*codes.lock(), vec![Some(1), Some(2)]);
        assert_eq!(player.get_current_time(), 5.0);
    }

    #[test]
    fn test_factory_passes_options_through() {
        let factory = HeadlessApiFactory::new();
        let options = ApiPlayerOptions {
            video_id: Some("M7lc1UVf-VE".into()),
            width: "100%".into(),
            height: "100%".into(),
            ..ApiPlayerOptions::default()
        };
        factory.create(&"frame".into(), options.clone()).unwrap();

        let player = factory.last_player().unwrap();
        assert_eq!(player.options(), &options);
        assert_eq!(player.surface().as_str(), "frame");
    }

    #[test]
    fn test_rejected_commands_error() {
        let player = HeadlessApiPlayer::new("s".into(), ApiPlayerOptions::default());
        player.reject("seekTo");
        assert!(player.seek_to(1.0).is_err());
        assert!(player.play_video().is_ok());
        assert_eq!(player.commands(), vec![ApiCommand::PlayVideo]);
    }
}
