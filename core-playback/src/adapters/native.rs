//! Native media element adapter.

use super::{report_command, PropsDiff};
use crate::error::Result;
use crate::traits::{AdapterProps, AttachContext, BackendKind, CommandPolicy, EventSink, PlayerAdapter};
use async_trait::async_trait;
use bridge_traits::{ListenerId, MediaElement, MediaError, MediaEventKind};
use core_runtime::events::{PlaybackStatus, PlayerError, PlayerEvent, VolumeChange};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tracing::{debug, info};

/// State shared with the element listeners.
#[derive(Default)]
struct Shared {
    desired: Mutex<AdapterProps>,
    /// `None` once detached; listeners that are mid-flight see it and stop.
    sink: Mutex<Option<EventSink>>,
}

impl Shared {
    fn sink(&self) -> Option<EventSink> {
        self.sink.lock().clone()
    }
}

/// Drives a [`MediaElement`] through attribute writes and DOM-style events.
pub struct NativeMediaAdapter {
    element: Arc<dyn MediaElement>,
    policy: CommandPolicy,
    shared: Arc<Shared>,
    listeners: Vec<ListenerId>,
    previous: Option<AdapterProps>,
}

impl NativeMediaAdapter {
    pub fn new(element: Arc<dyn MediaElement>) -> Self {
        Self {
            element,
            policy: CommandPolicy::default(),
            shared: Arc::new(Shared::default()),
            listeners: Vec::new(),
            previous: None,
        }
    }

    pub fn with_policy(mut self, policy: CommandPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn subscribe(&mut self) {
        for kind in MediaEventKind::ALL {
            let element = Arc::downgrade(&self.element);
            let shared = Arc::downgrade(&self.shared);
            let id = self.element.add_listener(
                kind,
                Arc::new(move |kind: MediaEventKind| on_element_event(&element, &shared, kind)),
            );
            self.listeners.push(id);
        }
    }
}

fn status_of(element: &dyn MediaElement) -> PlaybackStatus {
    PlaybackStatus::from_raw(element.duration(), element.current_time())
}

fn on_element_event(element: &Weak<dyn MediaElement>, shared: &Weak<Shared>, kind: MediaEventKind) {
    let (Some(element), Some(shared)) = (element.upgrade(), shared.upgrade()) else {
        return;
    };
    let Some(sink) = shared.sink() else {
        return;
    };

    let event = match kind {
        MediaEventKind::Ended => PlayerEvent::Ended(status_of(element.as_ref())),
        MediaEventKind::Error => {
            let error = element
                .error()
                .unwrap_or_else(|| MediaError::new(0, "unknown media error"));
            PlayerEvent::Error(PlayerError::Media(error))
        }
        MediaEventKind::LoadedMetadata => {
            // The element resets position and volume on every source load.
            let desired = shared.desired.lock().clone();
            debug!(time = desired.time, volume = desired.volume, "metadata loaded, syncing element");
            report_command(&sink, "currentTime", element.set_current_time(desired.time));
            report_command(&sink, "volume", element.set_volume(desired.volume));
            return;
        }
        MediaEventKind::Pause => PlayerEvent::Pause(status_of(element.as_ref())),
        MediaEventKind::Play => PlayerEvent::Play(status_of(element.as_ref())),
        MediaEventKind::TimeUpdate => PlayerEvent::TimeUpdate(status_of(element.as_ref())),
        MediaEventKind::VolumeChange => PlayerEvent::VolumeChange(VolumeChange {
            volume: element.volume(),
        }),
    };

    sink.emit(event);
}

#[async_trait]
impl PlayerAdapter for NativeMediaAdapter {
    fn backend(&self) -> BackendKind {
        BackendKind::Native
    }

    async fn attach(&mut self, ctx: AttachContext) -> Result<()> {
        let AttachContext {
            props,
            config,
            sink,
            ..
        } = ctx;

        if !config.is_empty() {
            debug!(keys = config.len(), "native element ignores embed config");
        }

        *self.shared.desired.lock() = props.clone();
        *self.shared.sink.lock() = Some(sink.clone());
        self.subscribe();

        if let Some(source) = &props.source {
            report_command(&sink, "src", self.element.set_source(source.as_str()));
        }
        report_command(&sink, "loop", self.element.set_loop(props.looping));
        if props.play {
            report_command(&sink, "play", self.element.play());
        }

        info!(listeners = self.listeners.len(), "native element attached");
        self.previous = Some(props);
        sink.emit(PlayerEvent::Ready);
        Ok(())
    }

    fn apply(&mut self, props: &AdapterProps) {
        let Some(previous) = self.previous.as_ref() else {
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
        debug!(?diff, "applying native element diff");

        if let Some(source) = diff.source {
            let src = source.as_ref().map(|s| s.as_str()).unwrap_or_default();
            report_command(&sink, "src", self.element.set_source(src));
        }
        if let Some(play) = diff.play {
            if play {
                report_command(&sink, "play", self.element.play());
            } else {
                report_command(&sink, "pause", self.element.pause());
            }
        }
        if let Some(looping) = diff.looping {
            report_command(&sink, "loop", self.element.set_loop(looping));
        }
        if let Some(time) = diff.time {
            report_command(&sink, "currentTime", self.element.set_current_time(time));
        }
        if let Some(volume) = diff.volume {
            report_command(&sink, "volume", self.element.set_volume(volume));
        }
    }

    fn detach(&mut self) {
        self.shared.sink.lock().take();
        for id in self.listeners.drain(..) {
            self.element.remove_listener(id);
        }
        self.previous = None;
        info!("native element detached");
    }

    fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_headless::{HeadlessMediaElement, MediaCommand};
    use bridge_traits::EmbedOptions;

    fn recorder() -> (Arc<Mutex<Vec<PlayerEvent>>>, EventSink) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let log = events.clone();
        (events, EventSink::new(move |event| log.lock().push(event)))
    }

    fn context(props: AdapterProps, sink: EventSink) -> AttachContext {
        AttachContext {
            props,
            config: EmbedOptions::new(),
            width: "100%".into(),
            height: "100%".into(),
            sink,
        }
    }

    #[tokio::test]
    async fn test_attach_plays_before_ready() {
        let element = Arc::new(HeadlessMediaElement::new());
        let mut adapter = NativeMediaAdapter::new(element.clone());
        let (events, sink) = recorder();

        let props = AdapterProps {
            play: true,
            ..AdapterProps::default()
        };
        adapter.attach(context(props, sink)).await.unwrap();

        assert_eq!(adapter.listener_count(), 7);
        assert_eq!(
            element.commands(),
            vec![MediaCommand::SetLoop(false), MediaCommand::Play]
        );
        assert_eq!(*events.lock(), vec![PlayerEvent::Ready]);
    }

    #[tokio::test]
    async fn test_nan_readings_produce_zero_status() {
        let element = Arc::new(HeadlessMediaElement::new());
        let mut adapter = NativeMediaAdapter::new(element.clone());
        let (events, sink) = recorder();
        adapter.attach(context(AdapterProps::default(), sink)).await.unwrap();

        element.advance_to(f64::NAN);

        assert_eq!(
            events.lock().last(),
            Some(&PlayerEvent::TimeUpdate(PlaybackStatus::default()))
        );
    }

    #[tokio::test]
    async fn test_error_forwards_platform_object() {
        let element = Arc::new(HeadlessMediaElement::new());
        let mut adapter = NativeMediaAdapter::new(element.clone());
        let (events, sink) = recorder();
        adapter.attach(context(AdapterProps::default(), sink)).await.unwrap();

        element.fail(MediaError::new(4, "source not supported"));

        assert_eq!(
            events.lock().last(),
            Some(&PlayerEvent::Error(PlayerError::Media(MediaError::new(
                4,
                "source not supported"
            ))))
        );
    }

    #[tokio::test]
    async fn test_diff_follows_field_order() {
        let element = Arc::new(HeadlessMediaElement::new());
        let mut adapter = NativeMediaAdapter::new(element.clone());
        let (_events, sink) = recorder();
        adapter.attach(context(AdapterProps::default(), sink)).await.unwrap();
        element.clear_commands();

        adapter.apply(&AdapterProps {
            source: Some(crate::traits::MediaSource::Url("https://cdn/b.mp4".into())),
            play: true,
            looping: true,
            time: 12.0,
            volume: 0.3,
            ..AdapterProps::default()
        });

        assert_eq!(
            element.commands(),
            vec![
                MediaCommand::SetSource("https://cdn/b.mp4".into()),
                MediaCommand::Play,
                MediaCommand::SetLoop(true),
                MediaCommand::SetCurrentTime(12.0),
                MediaCommand::SetVolume(0.3),
            ]
        );
    }

    #[tokio::test]
    async fn test_rejected_command_becomes_error_event() {
        let element = Arc::new(HeadlessMediaElement::new());
        element.reject("play");
        let mut adapter = NativeMediaAdapter::new(element.clone());
        let (events, sink) = recorder();
        adapter.attach(context(AdapterProps::default(), sink)).await.unwrap();

        adapter.apply(&AdapterProps {
            play: true,
            ..AdapterProps::default()
        });

        assert!(matches!(
            events.lock().last(),
            Some(PlayerEvent::Error(PlayerError::Command { command, .. })) if command == "play"
        ));
    }

    #[tokio::test]
    async fn test_detach_releases_listeners_and_silences_events() {
        let element = Arc::new(HeadlessMediaElement::new());
        let mut adapter = NativeMediaAdapter::new(element.clone());
        let (events, sink) = recorder();
        adapter.attach(context(AdapterProps::default(), sink)).await.unwrap();

        adapter.detach();
        element.emit(MediaEventKind::Play);
        adapter.apply(&AdapterProps {
            play: true,
            ..AdapterProps::default()
        });

        assert_eq!(adapter.listener_count(), 0);
        assert_eq!(element.listener_count(), 0);
        assert_eq!(*events.lock(), vec![PlayerEvent::Ready]);
        assert!(!element.commands().contains(&MediaCommand::Play));
    }
}
