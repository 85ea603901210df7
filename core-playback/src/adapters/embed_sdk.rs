//! SDK embed adapter.
//!
//! The SDK accepts listeners immediately but only honours commands once its
//! `ready()` promise resolves. Attach therefore subscribes eagerly and hands
//! the initial sync to a spawned continuation that is aborted on detach.

use super::{report_command, PropsDiff};
use crate::error::{PlaybackError, Result};
use crate::traits::{
    AdapterProps, AttachContext, BackendKind, CommandPolicy, EventSink, MediaSource, PlayerAdapter,
};
use async_trait::async_trait;
use bridge_traits::{
    EmbedOptions, EmbedSdkFactory, EmbedSdkPlayer, ListenerId, SdkEventData, SdkEventKind,
    SurfaceId,
};
use core_async::task::JoinHandle;
use core_runtime::events::{PlaybackStatus, PlayerError, PlayerEvent, VolumeChange};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

#[derive(Default)]
struct Shared {
    desired: Mutex<AdapterProps>,
    sink: Mutex<Option<EventSink>>,
}

impl Shared {
    fn sink(&self) -> Option<EventSink> {
        self.sink.lock().clone()
    }
}

/// Drives an [`EmbedSdkPlayer`] created through an [`EmbedSdkFactory`].
pub struct EmbedSdkAdapter {
    factory: Arc<dyn EmbedSdkFactory>,
    surface: SurfaceId,
    policy: CommandPolicy,
    player: Option<Arc<dyn EmbedSdkPlayer>>,
    shared: Arc<Shared>,
    listeners: Vec<ListenerId>,
    ready_task: Option<JoinHandle<()>>,
    previous: Option<AdapterProps>,
}

impl EmbedSdkAdapter {
    pub fn new(factory: Arc<dyn EmbedSdkFactory>, surface: impl Into<SurfaceId>) -> Self {
        Self {
            factory,
            surface: surface.into(),
            policy: CommandPolicy::default(),
            player: None,
            shared: Arc::new(Shared::default()),
            listeners: Vec::new(),
            ready_task: None,
            previous: None,
        }
    }

    pub fn with_policy(mut self, policy: CommandPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn subscribe(&mut self, player: &Arc<dyn EmbedSdkPlayer>) {
        for kind in SdkEventKind::ALL {
            let shared = Arc::downgrade(&self.shared);
            let id = player.on(
                kind,
                Arc::new(move |data: &SdkEventData| on_sdk_event(&shared, kind, data)),
            );
            self.listeners.push(id);
        }
    }
}

/// Caller config plus the computed `id`/`url`, `height` and `width`.
fn player_options(ctx: &AttachContext) -> EmbedOptions {
    let mut options = ctx.config.clone();
    match &ctx.props.source {
        Some(MediaSource::VideoId(id)) => {
            // Numeric ids are passed as numbers, as the SDK expects.
            let value = id
                .parse::<u64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::from(id.as_str()));
            options.insert("id".to_string(), value);
        }
        Some(MediaSource::Url(url)) => {
            options.insert("url".to_string(), Value::from(url.as_str()));
        }
        None => {}
    }
    options.insert("height".to_string(), Value::from(ctx.height.as_str()));
    options.insert("width".to_string(), Value::from(ctx.width.as_str()));
    options
}

fn timing_status(data: &SdkEventData) -> PlaybackStatus {
    match data {
        SdkEventData::Timing {
            duration, seconds, ..
        } => PlaybackStatus::from_raw(*duration, *seconds),
        _ => PlaybackStatus::default(),
    }
}

fn on_sdk_event(shared: &Weak<Shared>, kind: SdkEventKind, data: &SdkEventData) {
    let Some(sink) = shared.upgrade().and_then(|shared| shared.sink()) else {
        return;
    };

    let event = match kind {
        SdkEventKind::Play => PlayerEvent::Play(timing_status(data)),
        SdkEventKind::Pause => PlayerEvent::Pause(timing_status(data)),
        SdkEventKind::Ended => PlayerEvent::Ended(timing_status(data)),
        SdkEventKind::TimeUpdate => PlayerEvent::TimeUpdate(timing_status(data)),
        SdkEventKind::VolumeChange => match data {
            SdkEventData::Volume { volume } => PlayerEvent::VolumeChange(VolumeChange {
                volume: *volume,
            }),
            other => {
                debug!(payload = ?other, "volumechange without volume payload");
                return;
            }
        },
        SdkEventKind::Error => {
            let (name, message) = match data {
                SdkEventData::Error { name, message } => (name.clone(), message.clone()),
                other => ("Error".to_string(), format!("{:?}", other)),
            };
            PlayerEvent::Error(PlayerError::Sdk { name, message })
        }
    };

    sink.emit(event);
}

/// Initial sync once the embed accepts commands: size, volume, then play and
/// seek. Volume must precede the seek.
async fn on_ready(
    player: Arc<dyn EmbedSdkPlayer>,
    shared: Weak<Shared>,
    width: String,
    height: String,
) {
    let result = player.ready().await;

    let Some(shared) = shared.upgrade() else {
        return;
    };
    let Some(sink) = shared.sink() else {
        return;
    };

    if let Err(err) = result {
        warn!(error = %err, "sdk embed failed to become ready");
        sink.emit(PlayerEvent::Error(PlayerError::Sdk {
            name: "ReadyError".to_string(),
            message: err.to_string(),
        }));
        return;
    }

    let desired = shared.desired.lock().clone();
    debug!(play = desired.play, volume = desired.volume, "sdk embed ready");

    report_command(&sink, "setDimensions", player.set_dimensions(&width, &height));
    report_command(&sink, "setVolume", player.set_volume(desired.volume));
    if desired.play {
        report_command(&sink, "play", player.play());
        report_command(&sink, "setCurrentTime", player.set_current_time(desired.time));
    }

    sink.emit(PlayerEvent::Ready);
}

#[async_trait]
impl PlayerAdapter for EmbedSdkAdapter {
    fn backend(&self) -> BackendKind {
        BackendKind::EmbedSdk
    }

    async fn attach(&mut self, ctx: AttachContext) -> Result<()> {
        let options = player_options(&ctx);
        let player = self
            .factory
            .create(&self.surface, options)
            .map_err(|err| PlaybackError::construction(BackendKind::EmbedSdk, err))?;

        *self.shared.desired.lock() = ctx.props.clone();
        *self.shared.sink.lock() = Some(ctx.sink.clone());
        self.subscribe(&player);

        self.ready_task = Some(core_async::spawn(on_ready(
            player.clone(),
            Arc::downgrade(&self.shared),
            ctx.width,
            ctx.height,
        )));

        info!(surface = %self.surface, listeners = self.listeners.len(), "sdk embed attached");
        self.player = Some(player);
        self.previous = Some(ctx.props);
        Ok(())
    }

    fn apply(&mut self, props: &AdapterProps) {
        let (Some(player), Some(previous)) = (self.player.as_ref(), self.previous.as_ref()) else {
            return;
        };
        let Some(sink) = self.shared.sink() else {
            return;
        };

        let diff = PropsDiff::between(previous, props, self.policy);
        *self.shared.desired.lock() = props.clone();
        self.previous = Some(props.clone());

        if diff.is_empty() {
            return;
        }
        debug!(?diff, "applying sdk embed diff");

        if diff.source.is_some() {
            warn!("sdk embeds cannot switch source in place; swap the adapter instead");
        }
        if let Some(play) = diff.play {
            if play {
                report_command(&sink, "play", player.play());
            } else {
                report_command(&sink, "pause", player.pause());
            }
        }
        if let Some(looping) = diff.looping {
            report_command(&sink, "setLoop", player.set_loop(looping));
        }
        if let Some(time) = diff.time {
            report_command(&sink, "setCurrentTime", player.set_current_time(time));
        }
        if let Some(volume) = diff.volume {
            report_command(&sink, "setVolume", player.set_volume(volume));
        }
    }

    fn detach(&mut self) {
        self.shared.sink.lock().take();
        if let Some(task) = self.ready_task.take() {
            task.abort();
        }
        if let Some(player) = self.player.take() {
            for id in self.listeners.drain(..) {
                player.off(id);
            }
        }
        self.listeners.clear();
        self.previous = None;
        info!(surface = %self.surface, "sdk embed detached");
    }

    fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_headless::{HeadlessSdkFactory, SdkCommand};
    use core_async::task::yield_now;

    async fn settle() {
        for _ in 0..8 {
            yield_now().await;
        }
    }

    fn recorder() -> (Arc<Mutex<Vec<PlayerEvent>>>, EventSink) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let log = events.clone();
        (events, EventSink::new(move |event| log.lock().push(event)))
    }

    fn context(props: AdapterProps, sink: EventSink) -> AttachContext {
        let mut config = EmbedOptions::new();
        config.insert("byline".into(), Value::Bool(false));
        AttachContext {
            props,
            config,
            width: "640".into(),
            height: "360".into(),
            sink,
        }
    }

    #[tokio::test]
    async fn test_options_merge_config_and_source() {
        let factory = Arc::new(HeadlessSdkFactory::new());
        let mut adapter = EmbedSdkAdapter::new(factory.clone(), "frame");
        let (_events, sink) = recorder();

        let props = AdapterProps {
            source: Some(MediaSource::VideoId("76979871".into())),
            ..AdapterProps::default()
        };
        adapter.attach(context(props, sink)).await.unwrap();

        let player = factory.last_player().unwrap();
        let options = player.options();
        assert_eq!(options["id"], 76979871);
        assert_eq!(options["byline"], false);
        assert_eq!(options["width"], "640");
        assert_eq!(options["height"], "360");
        assert_eq!(player.listener_count(), 6);
    }

    #[tokio::test]
    async fn test_ready_applies_volume_before_play_and_seek() {
        let factory = Arc::new(HeadlessSdkFactory::new());
        let mut adapter = EmbedSdkAdapter::new(factory.clone(), "frame");
        let (events, sink) = recorder();

        let props = AdapterProps {
            play: true,
            time: 5.0,
            volume: 0.4,
            ..AdapterProps::default()
        };
        adapter.attach(context(props, sink)).await.unwrap();
        settle().await;

        let player = factory.last_player().unwrap();
        assert!(player.commands().is_empty());
        assert!(events.lock().is_empty());

        player.resolve_ready();
        settle().await;

        assert_eq!(
            player.commands(),
            vec![
                SdkCommand::SetDimensions {
                    width: "640".into(),
                    height: "360".into()
                },
                SdkCommand::SetVolume(0.4),
                SdkCommand::Play,
                SdkCommand::SetCurrentTime(5.0),
            ]
        );
        assert_eq!(*events.lock(), vec![PlayerEvent::Ready]);
    }

    #[tokio::test]
    async fn test_ready_rejection_is_reported() {
        let factory = Arc::new(HeadlessSdkFactory::new());
        let mut adapter = EmbedSdkAdapter::new(factory.clone(), "frame");
        let (events, sink) = recorder();
        adapter.attach(context(AdapterProps::default(), sink)).await.unwrap();

        factory.last_player().unwrap().reject_ready("privacy settings");
        settle().await;

        assert!(matches!(
            events.lock().as_slice(),
            [PlayerEvent::Error(PlayerError::Sdk { message, .. })] if message.contains("privacy settings")
        ));
    }

    #[tokio::test]
    async fn test_timing_payload_recomputes_fraction() {
        let factory = Arc::new(HeadlessSdkFactory::auto_ready());
        let mut adapter = EmbedSdkAdapter::new(factory.clone(), "frame");
        let (events, sink) = recorder();
        adapter.attach(context(AdapterProps::default(), sink)).await.unwrap();

        let player = factory.last_player().unwrap();
        player.emit(
            SdkEventKind::TimeUpdate,
            SdkEventData::Timing {
                duration: 0.0,
                seconds: 3.0,
                percent: f64::NAN,
            },
        );

        assert_eq!(
            events.lock().last(),
            Some(&PlayerEvent::TimeUpdate(PlaybackStatus::from_raw(0.0, 3.0)))
        );
    }

    #[tokio::test]
    async fn test_construction_failure_is_an_error() {
        let factory = Arc::new(HeadlessSdkFactory::new());
        factory.fail_next("surface missing");
        let mut adapter = EmbedSdkAdapter::new(factory.clone(), "frame");

        let result = adapter
            .attach(context(AdapterProps::default(), EventSink::noop()))
            .await;

        assert!(matches!(result, Err(PlaybackError::Construction { .. })));
        assert_eq!(adapter.listener_count(), 0);
    }

    #[tokio::test]
    async fn test_detach_aborts_pending_ready() {
        let factory = Arc::new(HeadlessSdkFactory::new());
        let mut adapter = EmbedSdkAdapter::new(factory.clone(), "frame");
        let (events, sink) = recorder();
        adapter.attach(context(AdapterProps::default(), sink)).await.unwrap();
        let player = factory.last_player().unwrap();

        adapter.detach();
        player.resolve_ready();
        settle().await;

        assert_eq!(player.listener_count(), 0);
        assert!(player.commands().is_empty());
        assert!(events.lock().is_empty());
    }
}
