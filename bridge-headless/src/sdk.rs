//! In-memory SDK embed.

use crate::registry::{ListenerRegistry, Rejections};
use async_trait::async_trait;
use bridge_traits::{
    error::Result, BridgeError, EmbedOptions, EmbedSdkFactory, EmbedSdkPlayer, ListenerId,
    SdkEventData, SdkEventKind, SdkListener, SurfaceId,
};
use core_async::sync::watch;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Command received by a [`HeadlessSdkPlayer`].
#[derive(Debug, Clone, PartialEq)]
pub enum SdkCommand {
    Play,
    Pause,
    SetLoop(bool),
    SetCurrentTime(f64),
    SetVolume(f64),
    SetDimensions { width: String, height: String },
}

impl SdkCommand {
    pub fn name(&self) -> &'static str {
        match self {
            SdkCommand::Play => "play",
            SdkCommand::Pause => "pause",
            SdkCommand::SetLoop(_) => "setLoop",
            SdkCommand::SetCurrentTime(_) => "setCurrentTime",
            SdkCommand::SetVolume(_) => "setVolume",
            SdkCommand::SetDimensions { .. } => "setDimensions",
        }
    }
}

type ReadyState = Option<std::result::Result<(), BridgeError>>;

#[derive(Debug, Default)]
struct Timing {
    duration: f64,
    seconds: f64,
}

/// SDK embed whose readiness is resolved by the caller.
pub struct HeadlessSdkPlayer {
    surface: SurfaceId,
    options: EmbedOptions,
    ready_tx: watch::Sender<ReadyState>,
    timing: Mutex<Timing>,
    commands: Mutex<Vec<SdkCommand>>,
    listeners: ListenerRegistry<SdkEventKind, SdkListener>,
    rejections: Rejections,
    echo: AtomicBool,
}

impl HeadlessSdkPlayer {
    pub fn new(surface: SurfaceId, options: EmbedOptions) -> Self {
        let (ready_tx, _) = watch::channel(None);
        Self {
            surface,
            options,
            ready_tx,
            timing: Mutex::new(Timing::default()),
            commands: Mutex::new(Vec::new()),
            listeners: ListenerRegistry::new(),
            rejections: Rejections::default(),
            echo: AtomicBool::new(false),
        }
    }

    pub fn set_echo(&self, echo: bool) {
        self.echo.store(echo, Ordering::SeqCst);
    }

    /// Options the player was constructed with.
    pub fn options(&self) -> &EmbedOptions {
        &self.options
    }

    pub fn surface(&self) -> &SurfaceId {
        &self.surface
    }

    // ------------------------------------------------------------------
    // Readiness
    // ------------------------------------------------------------------

    /// Resolve every pending and future `ready()` call.
    pub fn resolve_ready(&self) {
        self.ready_tx.send_replace(Some(Ok(())));
    }

    /// Reject every pending and future `ready()` call.
    pub fn reject_ready(&self, reason: impl Into<String>) {
        self.ready_tx
            .send_replace(Some(Err(BridgeError::OperationFailed(reason.into()))));
    }

    // ------------------------------------------------------------------
    // Scripting
    // ------------------------------------------------------------------

    pub fn emit(&self, kind: SdkEventKind, data: SdkEventData) {
        let listeners = self.listeners.snapshot(kind);
        trace!(event = %kind, listeners = listeners.len(), "headless sdk event");
        for listener in listeners {
            listener(&data);
        }
    }

    /// Fire `kind` with a timing payload built from the current clock.
    pub fn emit_timing(&self, kind: SdkEventKind) {
        let data = self.timing_payload();
        self.emit(kind, data);
    }

    pub fn set_duration(&self, duration: f64) {
        self.timing.lock().duration = duration;
    }

    /// Playback progressed to `seconds`; fires `timeupdate`.
    pub fn advance_to(&self, seconds: f64) {
        self.timing.lock().seconds = seconds;
        self.emit_timing(SdkEventKind::TimeUpdate);
    }

    pub fn fail(&self, name: impl Into<String>, message: impl Into<String>) {
        self.emit(
            SdkEventKind::Error,
            SdkEventData::Error {
                name: name.into(),
                message: message.into(),
            },
        );
    }

    pub fn reject(&self, command: &str) {
        self.rejections.reject(command);
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    pub fn commands(&self) -> Vec<SdkCommand> {
        self.commands.lock().clone()
    }

    pub fn clear_commands(&self) {
        self.commands.lock().clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn timing_payload(&self) -> SdkEventData {
        let timing = self.timing.lock();
        let percent = if timing.duration > 0.0 {
            timing.seconds / timing.duration
        } else {
            0.0
        };
        SdkEventData::Timing {
            duration: timing.duration,
            seconds: timing.seconds,
            percent,
        }
    }

    fn record(&self, command: SdkCommand) -> Result<()> {
        self.rejections.check(command.name())?;
        trace!(?command, "headless sdk command");

        let echo = match &command {
            SdkCommand::Play => Some((SdkEventKind::Play, None)),
            SdkCommand::Pause => Some((SdkEventKind::Pause, None)),
            SdkCommand::SetCurrentTime(seconds) => {
                self.timing.lock().seconds = *seconds;
                Some((SdkEventKind::TimeUpdate, None))
            }
            SdkCommand::SetVolume(volume) => Some((
                SdkEventKind::VolumeChange,
                Some(SdkEventData::Volume { volume: *volume }),
            )),
            SdkCommand::SetLoop(_) | SdkCommand::SetDimensions { .. } => None,
        };

        self.commands.lock().push(command);

        if self.echo.load(Ordering::SeqCst) {
            if let Some((kind, data)) = echo {
                let data = data.unwrap_or_else(|| self.timing_payload());
                self.emit(kind, data);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl EmbedSdkPlayer for HeadlessSdkPlayer {
    fn on(&self, kind: SdkEventKind, listener: SdkListener) -> ListenerId {
        self.listeners.add(kind, listener)
    }

    fn off(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    async fn ready(&self) -> Result<()> {
        let mut rx = self.ready_tx.subscribe();
        loop {
            let current = rx.borrow_and_update().clone();
            if let Some(result) = current {
                return result;
            }
            rx.changed()
                .await
                .map_err(|_| BridgeError::OperationFailed("embed dropped".to_string()))?;
        }
    }

    fn play(&self) -> Result<()> {
        self.record(SdkCommand::Play)
    }

    fn pause(&self) -> Result<()> {
        self.record(SdkCommand::Pause)
    }

    fn set_loop(&self, looping: bool) -> Result<()> {
        self.record(SdkCommand::SetLoop(looping))
    }

    fn set_current_time(&self, seconds: f64) -> Result<()> {
        self.record(SdkCommand::SetCurrentTime(seconds))
    }

    fn set_volume(&self, volume: f64) -> Result<()> {
        self.record(SdkCommand::SetVolume(volume))
    }

    fn set_dimensions(&self, width: &str, height: &str) -> Result<()> {
        self.record(SdkCommand::SetDimensions {
            width: width.to_string(),
            height: height.to_string(),
        })
    }
}

/// Factory producing [`HeadlessSdkPlayer`]s and remembering each one.
#[derive(Default)]
pub struct HeadlessSdkFactory {
    auto_ready: bool,
    echo: bool,
    fail_next: Mutex<Option<String>>,
    created: Mutex<Vec<Arc<HeadlessSdkPlayer>>>,
}

impl HeadlessSdkFactory {
    /// Players must be resolved with [`HeadlessSdkPlayer::resolve_ready`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Players are ready as soon as they are constructed.
    pub fn auto_ready() -> Self {
        Self {
            auto_ready: true,
            ..Self::default()
        }
    }

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// The next `create` call fails with `reason`.
    pub fn fail_next(&self, reason: impl Into<String>) {
        *self.fail_next.lock() = Some(reason.into());
    }

    pub fn players(&self) -> Vec<Arc<HeadlessSdkPlayer>> {
        self.created.lock().clone()
    }

    pub fn last_player(&self) -> Option<Arc<HeadlessSdkPlayer>> {
        self.created.lock().last().cloned()
    }
}

impl EmbedSdkFactory for HeadlessSdkFactory {
    fn create(&self, surface: &SurfaceId, options: EmbedOptions) -> Result<Arc<dyn EmbedSdkPlayer>> {
        if let Some(reason) = self.fail_next.lock().take() {
            return Err(BridgeError::ConstructionFailed(reason));
        }

        debug!(surface = %surface, options = options.len(), "creating headless sdk embed");
        let player = Arc::new(HeadlessSdkPlayer::new(surface.clone(), options));
        player.set_echo(self.echo);
        if self.auto_ready {
            player.resolve_ready();
        }

        self.created.lock().push(player.clone());
        Ok(player as Arc<dyn EmbedSdkPlayer>)
    }
}
