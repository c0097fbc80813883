//! Read-only web observer for a running round. The simulation advances on a
//! blocking task at the scenario frame cadence; browsers pull the latest
//! state as JSON or follow the SSE frame stream. Nothing here writes back
//! into the world.

mod assets;

use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use anyhow::Result;
use axum::{
    extract::State,
    response::{
        sse::{Event, KeepAlive, Sse},
        Html,
    },
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::{net::TcpListener, sync::broadcast};
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};

use crate::{
    config::Scenario,
    engine::{Engine, EngineSettings},
    world::WorldSnapshot,
};

#[derive(Clone, Serialize)]
pub struct UiFrame {
    pub snapshot: WorldSnapshot,
    pub completed: bool,
}

#[derive(Clone, Serialize)]
pub struct StateEnvelope {
    pub scenario: String,
    pub total_frames: u64,
    pub frame: Option<UiFrame>,
    pub completed: bool,
}

struct AppState {
    broadcaster: broadcast::Sender<String>,
    latest_frame: Mutex<Option<UiFrame>>,
    total_frames: u64,
    scenario_name: String,
    simulation_done: AtomicBool,
}

pub struct WebServerConfig {
    pub scenario: Scenario,
    pub frames: u64,
    pub snapshot_dir: std::path::PathBuf,
    pub snapshot_interval: u64,
    pub host: String,
    pub port: u16,
}

/// Broadcast roughly ten frames per second at the nominal 30 Hz cadence.
const BROADCAST_EVERY: u64 = 3;

pub async fn run(config: WebServerConfig) -> Result<()> {
    let WebServerConfig {
        scenario,
        frames,
        snapshot_dir,
        snapshot_interval,
        host,
        port,
    } = config;

    let scenario_name = scenario.name.clone();
    let frame_seconds = scenario.frame_seconds;
    let settings = EngineSettings {
        snapshot_interval_frames: snapshot_interval,
        snapshot_dir,
    };
    let mut engine = Engine::from_scenario(&scenario, settings);
    engine.start();

    let (tx, _) = broadcast::channel::<String>(512);
    let state = Arc::new(AppState {
        broadcaster: tx.clone(),
        latest_frame: Mutex::new(None),
        total_frames: frames,
        scenario_name: scenario_name.clone(),
        simulation_done: AtomicBool::new(false),
    });

    let sim_state = state.clone();
    let sim_handle = tokio::task::spawn_blocking(move || -> Result<()> {
        let mut frame_index = 0u64;
        engine.run_with_hook(frames, |snapshot: WorldSnapshot| {
            frame_index += 1;
            if frame_index % BROADCAST_EVERY != 0 {
                std::thread::sleep(Duration::from_secs_f64(frame_seconds));
                return;
            }
            let frame = UiFrame {
                snapshot,
                completed: false,
            };
            {
                let mut guard = sim_state
                    .latest_frame
                    .lock()
                    .expect("latest frame lock poisoned");
                *guard = Some(frame.clone());
            }
            if let Ok(payload) = serde_json::to_string(&frame) {
                let _ = sim_state.broadcaster.send(payload);
            }
            std::thread::sleep(Duration::from_secs_f64(frame_seconds));
        })?;

        sim_state.simulation_done.store(true, Ordering::SeqCst);
        let final_frame = {
            let guard = sim_state
                .latest_frame
                .lock()
                .expect("latest frame lock poisoned");
            guard.clone()
        };
        if let Some(mut frame) = final_frame {
            frame.completed = true;
            if let Ok(payload) = serde_json::to_string(&frame) {
                let _ = sim_state.broadcaster.send(payload);
            }
            let mut guard = sim_state
                .latest_frame
                .lock()
                .expect("latest frame lock poisoned");
            *guard = Some(frame);
        }
        Ok(())
    });

    let watch_label = scenario_name.clone();
    tokio::spawn(async move {
        match sim_handle.await {
            Ok(Ok(())) => tracing::info!(scenario = %watch_label, "observer run completed"),
            Ok(Err(err)) => tracing::error!(?err, "simulation error"),
            Err(err) => tracing::error!(?err, "simulation task failed"),
        }
    });

    let router = Router::new()
        .route("/", get(index))
        .route("/api/state", get(latest_state))
        .route("/api/stream", get(stream_frames))
        .with_state(state);

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    tracing::info!(%addr, scenario = %scenario_name, "observer listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutting down observer");
}

async fn index() -> Html<&'static str> {
    Html(assets::INDEX_HTML)
}

async fn latest_state(State(state): State<Arc<AppState>>) -> Json<StateEnvelope> {
    let frame = state
        .latest_frame
        .lock()
        .expect("latest frame lock poisoned")
        .clone();
    Json(StateEnvelope {
        scenario: state.scenario_name.clone(),
        total_frames: state.total_frames,
        frame,
        completed: state.simulation_done.load(Ordering::SeqCst),
    })
}

async fn stream_frames(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.broadcaster.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(payload) => Some(Ok(Event::default().data(payload))),
        Err(_) => None,
    });
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(2))
            .text("keep-alive"),
    )
}
