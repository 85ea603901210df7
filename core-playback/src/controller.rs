//! # Playback Controller
//!
//! Owns the desired playback state of one mounted player and reconciles a
//! single backend adapter toward it.
//!
//! ## Overview
//!
//! Callers describe what they want ([`DesiredProps`], or single-field intents
//! from a controls surface). The controller records the intent and forwards a
//! complete [`AdapterProps`] snapshot to the active adapter, which turns it
//! into backend commands. Backend signals come back as [`PlayerEvent`]s and
//! are folded into the controller's observed state, dispatched to
//! [`PlayerCallbacks`], published on the optional [`EventBus`] and rendered by
//! the optional [`ControlsSurface`].
//!
//! ## Reentrancy
//!
//! Backends may raise events synchronously from inside a command. Events are
//! therefore queued and folded only once no controller operation is in
//! progress; every public operation folds whatever it caused before
//! returning. Folding never issues backend commands.
//!
//! Each attached adapter is tagged with a fresh [`HandleId`]. Events from a
//! handle that is no longer active are dropped.
//!
//! ## Usage
//!
//! ```no_run
//! use bridge_headless::HeadlessMediaElement;
//! use core_playback::adapters::NativeMediaAdapter;
//! use core_playback::callbacks::PlayerCallbacks;
//! use core_playback::config::PlayerOptions;
//! use core_playback::controller::PlayerController;
//! use std::sync::Arc;
//!
//! # async fn example() -> core_playback::Result<()> {
//! let element = Arc::new(HeadlessMediaElement::new());
//! let controller = PlayerController::builder(NativeMediaAdapter::new(element))
//!     .options(PlayerOptions::builder().volume(0.5).build()?)
//!     .callbacks(PlayerCallbacks::new().with_on_ready(|| println!("ready")))
//!     .mount()
//!     .await?;
//!
//! controller.request_play()?;
//! # Ok(())
//! # }
//! ```

use crate::callbacks::PlayerCallbacks;
use crate::config::PlayerOptions;
use crate::controls::{ControlIntents, ControlsSnapshot, ControlsSurface};
use crate::error::{validate_time, validate_volume, PlaybackError, Result};
use crate::layout::ContainerLayout;
use crate::traits::{AdapterProps, AttachContext, BackendKind, EventSink, MediaSource, PlayerAdapter};
use core_runtime::events::{CoreEvent, EventBus, LifecycleEvent, PlayerEvent};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

// ============================================================================
// Identifiers and State
// ============================================================================

/// Identity of one attached adapter instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandleId(Uuid);

impl HandleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for HandleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Desired and observed playback state held by a controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerState {
    pub looping: bool,
    pub play: bool,
    /// Active seek target handed to the backend.
    pub seek_to: f64,
    /// Last observed position.
    pub time: f64,
    pub volume: f64,
    pub source: Option<MediaSource>,
    transport_generation: u64,
    seek_generation: u64,
}

impl ControllerState {
    fn from_options(options: &PlayerOptions) -> Self {
        Self {
            looping: options.looping,
            play: options.play,
            seek_to: options.time,
            time: options.time,
            volume: options.volume,
            source: options.source.clone(),
            transport_generation: 0,
            seek_generation: 0,
        }
    }

    fn adapter_props(&self) -> AdapterProps {
        AdapterProps {
            source: self.source.clone(),
            play: self.play,
            looping: self.looping,
            time: self.seek_to,
            volume: self.volume,
            transport_generation: self.transport_generation,
            seek_generation: self.seek_generation,
        }
    }

    fn controls_snapshot(&self) -> ControlsSnapshot {
        ControlsSnapshot {
            looping: self.looping,
            play: self.play,
            time: self.time,
            volume: self.volume,
        }
    }
}

/// Full property set supplied by the caller on every update.
#[derive(Debug, Clone, PartialEq)]
pub struct DesiredProps {
    pub looping: bool,
    pub play: bool,
    /// Seek target in seconds.
    pub time: f64,
    pub volume: f64,
    pub source: Option<MediaSource>,
}

impl Default for DesiredProps {
    fn default() -> Self {
        Self::from(&PlayerOptions::default())
    }
}

impl From<&PlayerOptions> for DesiredProps {
    fn from(options: &PlayerOptions) -> Self {
        Self {
            looping: options.looping,
            play: options.play,
            time: options.time,
            volume: options.volume,
            source: options.source.clone(),
        }
    }
}

#[derive(Debug, Default)]
struct Lifecycle {
    mounted: bool,
    active: Option<HandleId>,
    backend: Option<BackendKind>,
    ready_fired: bool,
}

struct AdapterHandle {
    id: HandleId,
    adapter: Box<dyn PlayerAdapter>,
}

// ============================================================================
// Controller Core
// ============================================================================

pub(crate) struct ControllerInner {
    me: Weak<ControllerInner>,
    options: PlayerOptions,
    callbacks: PlayerCallbacks,
    controls: Option<Arc<dyn ControlsSurface>>,
    event_bus: Option<EventBus>,
    state: Mutex<ControllerState>,
    lifecycle: Mutex<Lifecycle>,
    slot: Mutex<Option<AdapterHandle>>,
    queue: Mutex<VecDeque<(HandleId, PlayerEvent)>>,
    busy: AtomicUsize,
    draining: AtomicBool,
}

/// Marks a controller operation in progress. Dropping it folds queued events.
struct OpGuard<'a> {
    inner: &'a ControllerInner,
}

impl<'a> OpGuard<'a> {
    fn enter(inner: &'a ControllerInner) -> Self {
        inner.busy.fetch_add(1, Ordering::SeqCst);
        Self { inner }
    }
}

impl Drop for OpGuard<'_> {
    fn drop(&mut self) {
        self.inner.busy.fetch_sub(1, Ordering::SeqCst);
        self.inner.drain();
    }
}

impl ControllerInner {
    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    pub(crate) fn set_props(&self, props: DesiredProps) -> Result<()> {
        validate_volume(props.volume)?;
        validate_time(props.time)?;
        self.update("props", move |state| {
            state.seek_to = props.time;
            state.looping = props.looping;
            state.play = props.play;
            state.volume = props.volume;
            state.source = props.source;
        })
    }

    // Intents advance a generation; the adapter re-issues the command even
    // when the desired value is unchanged.

    pub(crate) fn request_play(&self) -> Result<()> {
        self.update("play", |state| {
            state.play = true;
            state.transport_generation += 1;
        })
    }

    pub(crate) fn request_pause(&self) -> Result<()> {
        self.update("pause", |state| {
            state.play = false;
            state.transport_generation += 1;
        })
    }

    pub(crate) fn request_seek(&self, seconds: f64) -> Result<()> {
        let seconds = validate_time(seconds)?;
        self.update("seek", |state| {
            state.time = seconds;
            state.seek_to = seconds;
            state.seek_generation += 1;
        })
    }

    pub(crate) fn request_volume_change(&self, volume: f64) -> Result<()> {
        let volume = validate_volume(volume)?;
        self.update("volume", |state| state.volume = volume)
    }

    fn update(&self, operation: &'static str, mutate: impl FnOnce(&mut ControllerState)) -> Result<()> {
        let _guard = OpGuard::enter(self);
        self.ensure_mounted()?;

        let props = {
            let mut state = self.state.lock();
            mutate(&mut state);
            state.adapter_props()
        };
        debug!(operation, play = props.play, seek_to = props.time, volume = props.volume, "desired state updated");

        self.forward(&props);
        self.render();
        Ok(())
    }

    fn ensure_mounted(&self) -> Result<()> {
        if self.lifecycle.lock().mounted {
            Ok(())
        } else {
            Err(PlaybackError::NotMounted)
        }
    }

    fn forward(&self, props: &AdapterProps) {
        if let Some(handle) = self.slot.lock().as_mut() {
            handle.adapter.apply(props);
        }
    }

    // ------------------------------------------------------------------------
    // Adapter lifecycle
    // ------------------------------------------------------------------------

    async fn install(&self, mut adapter: Box<dyn PlayerAdapter>) -> Result<()> {
        let _guard = OpGuard::enter(self);
        let id = HandleId::new();
        let backend = adapter.backend();

        let props = self.state.lock().adapter_props();
        let ctx = AttachContext {
            props,
            config: self.options.config.clone(),
            width: self.options.width.clone(),
            height: self.options.height.clone(),
            sink: self.sink_for(id),
        };

        {
            let mut lifecycle = self.lifecycle.lock();
            lifecycle.mounted = true;
            lifecycle.active = Some(id);
            lifecycle.backend = Some(backend);
            lifecycle.ready_fired = false;
        }

        if let Err(err) = adapter.attach(ctx).await {
            warn!(%backend, error = %err, "adapter failed to attach");
            adapter.detach();
            *self.lifecycle.lock() = Lifecycle::default();
            self.queue.lock().clear();
            return Err(err);
        }

        *self.slot.lock() = Some(AdapterHandle { id, adapter });
        info!(handle = %id, %backend, "adapter mounted");
        self.publish(CoreEvent::Lifecycle(LifecycleEvent::Mounted {
            handle_id: id.to_string(),
            backend: backend.to_string(),
        }));
        self.render();
        Ok(())
    }

    /// Detach and drop the current adapter, if any.
    fn release(&self) {
        let handle = self.slot.lock().take();
        {
            let mut lifecycle = self.lifecycle.lock();
            lifecycle.active = None;
            lifecycle.backend = None;
        }
        self.queue.lock().clear();

        if let Some(AdapterHandle { id, mut adapter }) = handle {
            let backend = adapter.backend();
            adapter.detach();
            info!(handle = %id, %backend, "adapter unmounted");
            self.publish(CoreEvent::Lifecycle(LifecycleEvent::Unmounted {
                handle_id: id.to_string(),
                backend: backend.to_string(),
            }));
        }
    }

    async fn swap(&self, adapter: Box<dyn PlayerAdapter>) -> Result<()> {
        let _guard = OpGuard::enter(self);
        self.ensure_mounted()?;
        self.release();
        self.install(adapter).await
    }

    fn unmount(&self) {
        let _guard = OpGuard::enter(self);
        self.release();
        self.lifecycle.lock().mounted = false;
    }

    // ------------------------------------------------------------------------
    // Event folding
    // ------------------------------------------------------------------------

    fn sink_for(&self, id: HandleId) -> EventSink {
        let me = self.me.clone();
        EventSink::new(move |event| {
            if let Some(inner) = me.upgrade() {
                inner.enqueue(id, event);
            }
        })
    }

    fn enqueue(&self, id: HandleId, event: PlayerEvent) {
        trace!(handle = %id, event = event.description(), "event queued");
        self.queue.lock().push_back((id, event));
        self.drain();
    }

    fn drain(&self) {
        loop {
            if self.busy.load(Ordering::SeqCst) > 0 {
                return;
            }
            if self
                .draining
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                return;
            }

            loop {
                let next = self.queue.lock().pop_front();
                match next {
                    Some((id, event)) => self.fold(id, event),
                    None => break,
                }
            }

            self.draining.store(false, Ordering::SeqCst);
            // An event may have been queued between the last pop and the release.
            if self.queue.lock().is_empty() {
                return;
            }
        }
    }

    fn fold(&self, id: HandleId, event: PlayerEvent) {
        if self.lifecycle.lock().active != Some(id) {
            trace!(handle = %id, event = event.description(), "dropping event from stale handle");
            return;
        }

        let callbacks = &self.callbacks;
        let mut changed = false;
        match &event {
            PlayerEvent::Ready => {
                let first = !std::mem::replace(&mut self.lifecycle.lock().ready_fired, true);
                if !first {
                    debug!(handle = %id, "duplicate ready ignored");
                    return;
                }
                (callbacks.on_ready)();
            }
            PlayerEvent::Play(status) => (callbacks.on_play)(*status),
            PlayerEvent::Pause(_) => (callbacks.on_pause)(),
            PlayerEvent::Ended(status) => (callbacks.on_ended)(*status),
            PlayerEvent::TimeUpdate(status) => {
                self.state.lock().time = status.position_seconds;
                changed = true;
                (callbacks.on_time_update)(*status);
            }
            PlayerEvent::VolumeChange(change) => {
                self.state.lock().volume = change.volume;
                changed = true;
                (callbacks.on_volume_change)(*change);
            }
            PlayerEvent::Error(error) => {
                debug!(handle = %id, %error, "backend error");
                (callbacks.on_error)(error);
            }
        }

        self.publish(CoreEvent::Player(event));
        if changed {
            self.render();
        }
    }

    fn publish(&self, event: CoreEvent) {
        if let Some(bus) = &self.event_bus {
            // No subscribers is not an error.
            let _ = bus.emit(event);
        }
    }

    fn render(&self) {
        let Some(controls) = &self.controls else {
            return;
        };
        let snapshot = self.state.lock().controls_snapshot();
        controls.render(snapshot, ControlIntents::new(self.me.clone()));
    }
}

impl Drop for ControllerInner {
    fn drop(&mut self) {
        if let Some(mut handle) = self.slot.get_mut().take() {
            handle.adapter.detach();
        }
    }
}

// ============================================================================
// Public Handle
// ============================================================================

/// A mounted player.
///
/// Cloning yields another handle to the same player. The adapter is detached
/// on [`unmount`](PlayerController::unmount) or when the last handle drops.
#[derive(Clone)]
pub struct PlayerController {
    inner: Arc<ControllerInner>,
}

impl PlayerController {
    pub fn builder(adapter: impl PlayerAdapter + 'static) -> PlayerControllerBuilder {
        PlayerControllerBuilder {
            adapter: Box::new(adapter),
            options: PlayerOptions::default(),
            callbacks: PlayerCallbacks::default(),
            controls: None,
            event_bus: None,
        }
    }

    /// Full property sync.
    ///
    /// Replaces the seek target, loop flag, play flag, volume and source
    /// unconditionally, then forwards them to the adapter. The observed
    /// `time` is left alone.
    ///
    /// # Errors
    ///
    /// Invalid volume or time is rejected before any state changes;
    /// [`PlaybackError::NotMounted`] after [`unmount`](Self::unmount).
    pub fn set_props(&self, props: DesiredProps) -> Result<()> {
        self.inner.set_props(props)
    }

    pub fn request_play(&self) -> Result<()> {
        self.inner.request_play()
    }

    pub fn request_pause(&self) -> Result<()> {
        self.inner.request_pause()
    }

    /// Seek to `seconds`, updating both the seek target and the shown position.
    pub fn request_seek(&self, seconds: f64) -> Result<()> {
        self.inner.request_seek(seconds)
    }

    pub fn request_volume_change(&self, volume: f64) -> Result<()> {
        self.inner.request_volume_change(volume)
    }

    /// Detach the current adapter and attach `adapter` with the current
    /// desired state.
    ///
    /// If the new adapter fails to attach the player is left unmounted.
    pub async fn swap_adapter(&self, adapter: impl PlayerAdapter + 'static) -> Result<()> {
        self.inner.swap(Box::new(adapter)).await
    }

    /// Synchronously detach the adapter. Later events are dropped and later
    /// operations fail with [`PlaybackError::NotMounted`].
    pub fn unmount(&self) {
        self.inner.unmount();
    }

    pub fn snapshot(&self) -> ControllerState {
        self.inner.state.lock().clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.lifecycle.lock().mounted
    }

    pub fn backend(&self) -> Option<BackendKind> {
        self.inner.lifecycle.lock().backend
    }

    pub fn handle_id(&self) -> Option<HandleId> {
        self.inner.lifecycle.lock().active
    }

    /// Listeners the active adapter holds on its backend.
    pub fn listener_count(&self) -> usize {
        self.inner
            .slot
            .lock()
            .as_ref()
            .map_or(0, |handle| handle.adapter.listener_count())
    }

    pub fn has_live_timer(&self) -> bool {
        self.inner
            .slot
            .lock()
            .as_ref()
            .map_or(false, |handle| handle.adapter.has_live_timer())
    }

    /// Intents bound to this player, as handed to the controls surface.
    pub fn intents(&self) -> ControlIntents {
        ControlIntents::new(Arc::downgrade(&self.inner))
    }

    pub fn options(&self) -> &PlayerOptions {
        &self.inner.options
    }

    /// Container geometry for the configured aspect ratio.
    pub fn layout(&self) -> Result<ContainerLayout> {
        Ok(ContainerLayout::new(self.inner.options.aspect()?))
    }
}

impl fmt::Debug for PlayerController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lifecycle = self.inner.lifecycle.lock();
        f.debug_struct("PlayerController")
            .field("mounted", &lifecycle.mounted)
            .field("handle", &lifecycle.active)
            .field("backend", &lifecycle.backend)
            .finish_non_exhaustive()
    }
}

/// Builder for [`PlayerController`].
pub struct PlayerControllerBuilder {
    adapter: Box<dyn PlayerAdapter>,
    options: PlayerOptions,
    callbacks: PlayerCallbacks,
    controls: Option<Arc<dyn ControlsSurface>>,
    event_bus: Option<EventBus>,
}

impl PlayerControllerBuilder {
    pub fn options(mut self, options: PlayerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn callbacks(mut self, callbacks: PlayerCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn controls(mut self, controls: Arc<dyn ControlsSurface>) -> Self {
        self.controls = Some(controls);
        self
    }

    /// Publish every folded event and lifecycle change on `bus`.
    pub fn event_bus(mut self, bus: EventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    /// Validate the options and attach the adapter.
    ///
    /// # Errors
    ///
    /// Option validation errors, or [`PlaybackError::Construction`] when the
    /// backend cannot be created. Nothing stays mounted on error.
    pub async fn mount(self) -> Result<PlayerController> {
        let PlayerControllerBuilder {
            adapter,
            options,
            callbacks,
            controls,
            event_bus,
        } = self;
        options.validate()?;

        let inner = Arc::new_cyclic(|me| ControllerInner {
            me: me.clone(),
            state: Mutex::new(ControllerState::from_options(&options)),
            options,
            callbacks,
            controls,
            event_bus,
            lifecycle: Mutex::new(Lifecycle::default()),
            slot: Mutex::new(None),
            queue: Mutex::new(VecDeque::new()),
            busy: AtomicUsize::new(0),
            draining: AtomicBool::new(false),
        });

        inner.install(adapter).await?;
        Ok(PlayerController { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use core_runtime::events::{PlaybackStatus, VolumeChange};

    /// Adapter that records applied props and echoes events on demand.
    #[derive(Default)]
    struct ScriptedAdapter {
        applied: Arc<Mutex<Vec<AdapterProps>>>,
        sink: Option<EventSink>,
        echo_play: bool,
    }

    #[async_trait]
    impl PlayerAdapter for ScriptedAdapter {
        fn backend(&self) -> BackendKind {
            BackendKind::Native
        }

        async fn attach(&mut self, ctx: AttachContext) -> Result<()> {
            ctx.sink.emit(PlayerEvent::Ready);
            self.sink = Some(ctx.sink);
            Ok(())
        }

        fn apply(&mut self, props: &AdapterProps) {
            self.applied.lock().push(props.clone());
            if let (true, Some(sink)) = (self.echo_play, &self.sink) {
                let status = PlaybackStatus::from_raw(10.0, props.time);
                sink.emit(if props.play {
                    PlayerEvent::Play(status)
                } else {
                    PlayerEvent::Pause(status)
                });
            }
        }

        fn detach(&mut self) {
            self.sink = None;
        }

        fn listener_count(&self) -> usize {
            usize::from(self.sink.is_some())
        }
    }

    #[test]
    fn test_state_from_options_seeds_seek_target() {
        let options = PlayerOptions::builder().time(12.0).volume(0.4).build().unwrap();
        let state = ControllerState::from_options(&options);
        assert_eq!(state.seek_to, 12.0);
        assert_eq!(state.time, 12.0);
        assert_eq!(state.adapter_props().time, 12.0);
        assert_eq!(state.adapter_props().volume, 0.4);
    }

    #[tokio::test]
    async fn test_set_props_replaces_seek_target_not_position() {
        let adapter = ScriptedAdapter::default();
        let applied = adapter.applied.clone();
        let controller = PlayerController::builder(adapter).mount().await.unwrap();

        controller
            .set_props(DesiredProps {
                time: 45.0,
                play: true,
                ..DesiredProps::default()
            })
            .unwrap();

        let state = controller.snapshot();
        assert_eq!(state.seek_to, 45.0);
        assert_eq!(state.time, 0.0);
        assert!(state.play);
        assert_eq!(applied.lock().last().map(|p| p.time), Some(45.0));
    }

    #[tokio::test]
    async fn test_invalid_props_leave_state_untouched() {
        let adapter = ScriptedAdapter::default();
        let applied = adapter.applied.clone();
        let controller = PlayerController::builder(adapter).mount().await.unwrap();

        let result = controller.set_props(DesiredProps {
            volume: 1.5,
            play: true,
            ..DesiredProps::default()
        });

        assert_eq!(result, Err(PlaybackError::InvalidVolume(1.5)));
        assert!(!controller.snapshot().play);
        assert!(applied.lock().is_empty());
        assert!(controller.request_seek(f64::NAN).is_err());
    }

    #[tokio::test]
    async fn test_reentrant_events_fold_before_return() {
        let adapter = ScriptedAdapter {
            echo_play: true,
            ..ScriptedAdapter::default()
        };
        let plays = Arc::new(Mutex::new(0));
        let seen = plays.clone();
        let controller = PlayerController::builder(adapter)
            .callbacks(PlayerCallbacks::new().with_on_play(move |_| *seen.lock() += 1))
            .mount()
            .await
            .unwrap();

        controller.request_play().unwrap();

        assert_eq!(*plays.lock(), 1);
    }

    #[tokio::test]
    async fn test_ready_fires_once_per_handle() {
        let ready = Arc::new(Mutex::new(0));
        let seen = ready.clone();
        let adapter = ScriptedAdapter::default();
        let controller = PlayerController::builder(adapter)
            .callbacks(PlayerCallbacks::new().with_on_ready(move || *seen.lock() += 1))
            .mount()
            .await
            .unwrap();

        let id = controller.handle_id().unwrap();
        controller.inner.enqueue(id, PlayerEvent::Ready);
        assert_eq!(*ready.lock(), 1);

        controller.swap_adapter(ScriptedAdapter::default()).await.unwrap();
        assert_eq!(*ready.lock(), 2);
    }

    #[tokio::test]
    async fn test_stale_handle_events_are_dropped() {
        let volumes = Arc::new(Mutex::new(Vec::new()));
        let seen = volumes.clone();
        let controller = PlayerController::builder(ScriptedAdapter::default())
            .callbacks(PlayerCallbacks::new().with_on_volume_change(move |v| seen.lock().push(v)))
            .mount()
            .await
            .unwrap();

        controller
            .inner
            .enqueue(HandleId::new(), PlayerEvent::VolumeChange(VolumeChange { volume: 0.1 }));

        assert!(volumes.lock().is_empty());
        assert_eq!(controller.snapshot().volume, 1.0);
    }

    #[tokio::test]
    async fn test_unmount_rejects_later_operations() {
        let controller = PlayerController::builder(ScriptedAdapter::default())
            .mount()
            .await
            .unwrap();
        assert_eq!(controller.listener_count(), 1);

        controller.unmount();

        assert!(!controller.is_mounted());
        assert_eq!(controller.listener_count(), 0);
        assert_eq!(controller.backend(), None);
        assert_eq!(controller.request_play(), Err(PlaybackError::NotMounted));
    }

    #[test]
    fn test_handle_ids_are_unique() {
        assert_ne!(HandleId::new(), HandleId::new());
        assert_eq!(HandleId::default().to_string().len(), 36);
    }
}
