//! Drives one player across all three backends using the in-memory bridges.

use anyhow::Result;
use bridge_headless::{HeadlessApiFactory, HeadlessMediaElement, HeadlessSdkFactory};
use core_async::time::{sleep, Duration};
use core_playback::adapters::{EmbedApiAdapter, EmbedSdkAdapter, NativeMediaAdapter, PlayerState};
use core_playback::{MediaSource, PlayerCallbacks, PlayerController, PlayerOptions};
use core_runtime::events::{EventBus, EventStream};
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use std::sync::Arc;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_logging(
        LoggingConfig::default()
            .with_format(LogFormat::Compact)
            .with_filter("headless_demo=info,core_playback=debug,warn"),
    )?;

    let bus = EventBus::default();
    let mut events = EventStream::new(bus.subscribe());

    let callbacks = PlayerCallbacks::new()
        .with_on_ready(|| info!("ready"))
        .with_on_play(|status| info!(position = status.position_seconds, "playing"))
        .with_on_time_update(|status| info!(fraction = status.fraction_elapsed, "tick"))
        .with_on_error(|err| info!(%err, "player error"));

    let options = PlayerOptions::builder()
        .source(MediaSource::Url("https://cdn.example.com/intro.mp4".into()))
        .volume(0.8)
        .build()?;

    // Native element.
    let element = Arc::new(HeadlessMediaElement::new().with_echo(true));
    let controller = PlayerController::builder(NativeMediaAdapter::new(element.clone()))
        .options(options)
        .callbacks(callbacks)
        .event_bus(bus.clone())
        .mount()
        .await?;
    element.load_metadata(90.0);
    controller.request_play()?;
    element.advance_to(12.5);

    // SDK embed.
    let sdk = Arc::new(HeadlessSdkFactory::auto_ready().with_echo(true));
    controller
        .swap_adapter(EmbedSdkAdapter::new(sdk.clone(), "sdk-frame"))
        .await?;
    sleep(Duration::from_millis(10)).await;
    controller.request_seek(30.0)?;

    // API embed with emulated time updates.
    let api = Arc::new(HeadlessApiFactory::new().with_echo(true));
    controller
        .swap_adapter(EmbedApiAdapter::new(api.clone(), "api-frame"))
        .await?;
    if let Some(player) = api.last_player() {
        player.set_duration(60.0);
        player.set_current_time(6.0);
        player.fire_ready();
        player.change_state(PlayerState::Playing.code());
        sleep(Duration::from_millis(600)).await;
        player.fail(150);
    }

    controller.unmount();

    let mut published = 0;
    while let Some(Ok(event)) = events.try_recv() {
        published += 1;
        info!(event = event.description(), severity = ?event.severity(), "bus");
    }
    info!(published, "demo finished");
    Ok(())
}
