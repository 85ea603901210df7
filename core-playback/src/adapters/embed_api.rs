//! Message-API embed adapter.
//!
//! The API reports numeric player states and numeric error codes and has no
//! position event. While the player is in [`PlayerState::Playing`] the adapter
//! polls position and duration every [`POLL_INTERVAL`] and synthesizes
//! `TimeUpdate` events.
//!
//! ```text
//!            PLAYING                       ENDED / PAUSED / detach
//!  ──────────────────────> [polling] ──────────────────────────────> [idle]
//!   (stop old, start new)   BUFFERING, CUED, UNSTARTED: unchanged
//! ```

use super::{report_command, PropsDiff};
use crate::error::{PlaybackError, Result};
use crate::polling::{PollingTask, POLL_INTERVAL};
use crate::traits::{AdapterProps, AttachContext, BackendKind, CommandPolicy, EventSink, PlayerAdapter};
use async_trait::async_trait;
use bridge_traits::{
    ApiEvent, ApiEventKind, ApiPlayerOptions, EmbedApiFactory, EmbedApiPlayer, ListenerId,
    SurfaceId,
};
use core_async::runtime::Handle;
use core_async::time::Duration;
use core_runtime::events::{PlaybackStatus, PlayerError, PlayerEvent};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::{Arc, Weak};
use tracing::{debug, info, trace, warn};

/// Player states reported through `stateChange`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerState {
    Unstarted,
    Ended,
    Playing,
    Paused,
    Buffering,
    VideoCued,
}

impl PlayerState {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(PlayerState::Unstarted),
            0 => Some(PlayerState::Ended),
            1 => Some(PlayerState::Playing),
            2 => Some(PlayerState::Paused),
            3 => Some(PlayerState::Buffering),
            5 => Some(PlayerState::VideoCued),
            _ => None,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            PlayerState::Unstarted => -1,
            PlayerState::Ended => 0,
            PlayerState::Playing => 1,
            PlayerState::Paused => 2,
            PlayerState::Buffering => 3,
            PlayerState::VideoCued => 5,
        }
    }
}

/// Translate an API error code. Codes outside the table are benign and
/// yield `None`.
pub fn translate_error_code(code: i32) -> Option<PlayerError> {
    let message = match code {
        2 => "invalid parameter",
        5 => "HTML5 playback error",
        100 => "video not found",
        101 | 150 => "embedding disallowed",
        _ => return None,
    };
    Some(PlayerError::Embed {
        code,
        message: message.to_string(),
    })
}

struct Shared {
    desired: Mutex<AdapterProps>,
    sink: Mutex<Option<EventSink>>,
    player: Mutex<Option<Weak<dyn EmbedApiPlayer>>>,
    poller: Mutex<Option<PollingTask>>,
    runtime: Handle,
    poll_interval: Duration,
}

impl Shared {
    fn sink(&self) -> Option<EventSink> {
        self.sink.lock().clone()
    }

    fn player(&self) -> Option<Arc<dyn EmbedApiPlayer>> {
        self.player.lock().as_ref().and_then(Weak::upgrade)
    }

    fn stop_polling(&self) {
        let previous = self.poller.lock().take();
        if let Some(mut task) = previous {
            task.stop();
            trace!("position polling stopped");
        }
    }

    fn start_polling(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        let task = PollingTask::start(&self.runtime, self.poll_interval, move || {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let (Some(sink), Some(player)) = (shared.sink(), shared.player()) else {
                return;
            };
            sink.emit(PlayerEvent::TimeUpdate(status_of(player.as_ref())));
        });

        let previous = self.poller.lock().replace(task);
        if let Some(mut previous) = previous {
            previous.stop();
        }
        trace!("position polling started");
    }
}

fn status_of(player: &dyn EmbedApiPlayer) -> PlaybackStatus {
    PlaybackStatus::from_raw(player.get_duration(), player.get_current_time())
}

/// Drives an [`EmbedApiPlayer`] created through an [`EmbedApiFactory`].
pub struct EmbedApiAdapter {
    factory: Arc<dyn EmbedApiFactory>,
    surface: SurfaceId,
    policy: CommandPolicy,
    playlist: Option<String>,
    poll_interval: Duration,
    player: Option<Arc<dyn EmbedApiPlayer>>,
    shared: Option<Arc<Shared>>,
    listeners: Vec<ListenerId>,
    previous: Option<AdapterProps>,
}

impl EmbedApiAdapter {
    pub fn new(factory: Arc<dyn EmbedApiFactory>, surface: impl Into<SurfaceId>) -> Self {
        Self {
            factory,
            surface: surface.into(),
            policy: CommandPolicy::default(),
            playlist: None,
            poll_interval: POLL_INTERVAL,
            player: None,
            shared: None,
            listeners: Vec::new(),
            previous: None,
        }
    }

    pub fn with_policy(mut self, policy: CommandPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Comma-separated video ids passed as the `playlist` player var.
    pub fn with_playlist(mut self, playlist: impl Into<String>) -> Self {
        self.playlist = Some(playlist.into());
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn player_options(&self, ctx: &AttachContext) -> ApiPlayerOptions {
        let mut player_vars = ctx.config.clone();
        player_vars.insert("autoplay".to_string(), Value::from(i32::from(ctx.props.play)));
        player_vars.insert("loop".to_string(), Value::from(i32::from(ctx.props.looping)));
        if let Some(playlist) = &self.playlist {
            player_vars.insert("playlist".to_string(), Value::from(playlist.as_str()));
        }

        ApiPlayerOptions {
            video_id: ctx.props.source.as_ref().map(|s| s.as_str().to_string()),
            width: ctx.width.clone(),
            height: ctx.height.clone(),
            player_vars,
        }
    }

    fn subscribe(&mut self, player: &Arc<dyn EmbedApiPlayer>, shared: &Arc<Shared>) {
        let weak = Arc::downgrade(shared);
        let ready = player.on(
            ApiEventKind::Ready,
            Arc::new(move |_: &ApiEvent| on_ready(&weak)),
        );

        let weak = Arc::downgrade(shared);
        let state_change = player.on(
            ApiEventKind::StateChange,
            Arc::new(move |event: &ApiEvent| on_state_change(&weak, event)),
        );

        let weak = Arc::downgrade(shared);
        let error = player.on(
            ApiEventKind::Error,
            Arc::new(move |event: &ApiEvent| on_error(&weak, event)),
        );

        self.listeners.extend([ready, state_change, error]);
    }
}

fn live(shared: &Weak<Shared>) -> Option<(Arc<Shared>, EventSink, Arc<dyn EmbedApiPlayer>)> {
    let shared = shared.upgrade()?;
    let sink = shared.sink()?;
    let player = shared.player()?;
    Some((shared, sink, player))
}

fn on_ready(shared: &Weak<Shared>) {
    let Some((shared, sink, player)) = live(shared) else {
        return;
    };

    let desired = shared.desired.lock().clone();
    debug!(play = desired.play, volume = desired.volume, "api embed ready");

    report_command(&sink, "setVolume", player.set_volume(desired.volume * 100.0));
    if desired.play {
        report_command(&sink, "playVideo", player.play_video());
        report_command(&sink, "seekTo", player.seek_to(desired.time));
    }

    sink.emit(PlayerEvent::Ready);
}

fn on_state_change(shared: &Weak<Shared>, event: &ApiEvent) {
    let Some((shared, sink, player)) = live(shared) else {
        return;
    };
    let Some(state) = event.data.and_then(PlayerState::from_code) else {
        debug!(data = ?event.data, "ignoring unknown player state");
        return;
    };
    trace!(?state, "api embed state change");

    match state {
        PlayerState::Playing => {
            sink.emit(PlayerEvent::Play(status_of(player.as_ref())));
            shared.start_polling();
        }
        PlayerState::Ended => {
            shared.stop_polling();
            sink.emit(PlayerEvent::Ended(status_of(player.as_ref())));
        }
        PlayerState::Paused => {
            shared.stop_polling();
            sink.emit(PlayerEvent::Pause(status_of(player.as_ref())));
        }
        PlayerState::Unstarted | PlayerState::Buffering | PlayerState::VideoCued => {}
    }
}

fn on_error(shared: &Weak<Shared>, event: &ApiEvent) {
    let Some((_, sink, _)) = live(shared) else {
        return;
    };
    let Some(code) = event.data else {
        debug!("api error event without code");
        return;
    };

    match translate_error_code(code) {
        Some(error) => {
            warn!(code, "api embed reported error");
            sink.emit(PlayerEvent::Error(error));
        }
        None => debug!(code, "ignoring unrecognized api error code"),
    }
}

#[async_trait]
impl PlayerAdapter for EmbedApiAdapter {
    fn backend(&self) -> BackendKind {
        BackendKind::EmbedApi
    }

    async fn attach(&mut self, ctx: AttachContext) -> Result<()> {
        let runtime = Handle::try_current()
            .map_err(|err| PlaybackError::construction(BackendKind::EmbedApi, err))?;

        let options = self.player_options(&ctx);
        let player = self
            .factory
            .create(&self.surface, options)
            .map_err(|err| PlaybackError::construction(BackendKind::EmbedApi, err))?;

        let shared = Arc::new(Shared {
            desired: Mutex::new(ctx.props.clone()),
            sink: Mutex::new(Some(ctx.sink)),
            player: Mutex::new(Some(Arc::downgrade(&player))),
            poller: Mutex::new(None),
            runtime,
            poll_interval: self.poll_interval,
        });
        self.subscribe(&player, &shared);

        info!(surface = %self.surface, listeners = self.listeners.len(), "api embed attached");
        self.player = Some(player);
        self.shared = Some(shared);
        self.previous = Some(ctx.props);
        Ok(())
    }

    fn apply(&mut self, props: &AdapterProps) {
        let (Some(player), Some(shared), Some(previous)) =
            (self.player.as_ref(), self.shared.as_ref(), self.previous.as_ref())
        else {
            return;
        };
        let Some(sink) = shared.sink() else {
            return;
        };

        let diff = PropsDiff::between(previous, props, self.policy);
        *shared.desired.lock() = props.clone();
        self.previous = Some(props.clone());

        if diff.is_empty() {
            return;
        }
        debug!(?diff, "applying api embed diff");

        if diff.source.is_some() {
            warn!("api embeds cannot switch video in place; swap the adapter instead");
        }
        if let Some(play) = diff.play {
            if play {
                report_command(&sink, "playVideo", player.play_video());
            } else {
                report_command(&sink, "pauseVideo", player.pause_video());
            }
        }
        if let Some(looping) = diff.looping {
            report_command(&sink, "setLoop", player.set_loop(looping));
        }
        if let Some(time) = diff.time {
            report_command(&sink, "seekTo", player.seek_to(time));
        }
        if let Some(volume) = diff.volume {
            report_command(&sink, "setVolume", player.set_volume(volume * 100.0));
        }
    }

    fn detach(&mut self) {
        if let Some(shared) = self.shared.take() {
            shared.sink.lock().take();
            shared.stop_polling();
        }
        if let Some(player) = self.player.take() {
            for id in self.listeners.drain(..) {
                player.off(id);
            }
        }
        self.listeners.clear();
        self.previous = None;
        info!(surface = %self.surface, "api embed detached");
    }

    fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn has_live_timer(&self) -> bool {
        self.shared
            .as_ref()
            .map_or(false, |shared| {
                shared.poller.lock().as_ref().map_or(false, PollingTask::is_running)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_codes_round_trip() {
        for code in [-1, 0, 1, 2, 3, 5] {
            assert_eq!(PlayerState::from_code(code).map(|s| s.code()), Some(code));
        }
        assert_eq!(PlayerState::from_code(4), None);
    }

    #[test]
    fn test_error_table_is_total_over_known_codes() {
        let messages: Vec<_> = [2, 5, 100, 101, 150]
            .into_iter()
            .map(|code| translate_error_code(code).map(|e| e.to_string()))
            .collect();

        assert_eq!(
            messages,
            vec![
                Some("embed error 2: invalid parameter".to_string()),
                Some("embed error 5: HTML5 playback error".to_string()),
                Some("embed error 100: video not found".to_string()),
                Some("embed error 101: embedding disallowed".to_string()),
                Some("embed error 150: embedding disallowed".to_string()),
            ]
        );
    }

    #[test]
    fn test_codes_101_and_150_share_a_message() {
        let message = |code| match translate_error_code(code) {
            Some(PlayerError::Embed { message, .. }) => message,
            other => panic!("unexpected translation {:?}", other),
        };
        assert_eq!(message(101), message(150));
    }

    #[test]
    fn test_unknown_codes_are_benign() {
        for code in [0, 1, 3, 99, 102, 999, -1] {
            assert_eq!(translate_error_code(code), None);
        }
    }
}
