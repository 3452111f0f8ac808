//! Headless street scene replay
//!
//! Builds the scene over the recording context, runs a fixed number of frames
//! with the animation on and logs what the frames issued.
//!
//! Usage: `scene_replay [config.toml|config.ron] [frames]`

use std::path::PathBuf;
use std::time::Duration;

use street_scene::foundation::logging;
use street_scene::prelude::*;
use street_scene::render::recording::GlCall;

/// Host frame interval
const FRAME_TIME: Duration = Duration::from_millis(16);

/// Frames replayed when no count is given
const DEFAULT_FRAMES: u32 = 300;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            let path = PathBuf::from(path);
            log::info!("Loading scene configuration from {:?}", path);
            SceneConfig::load_from_file(&path)?
        }
        None => SceneConfig::default(),
    };
    let frames = match args.next() {
        Some(count) => count.parse::<u32>()?,
        None => DEFAULT_FRAMES,
    };

    let mut ctx = RecordingContext::new();
    let mut host = SceneHost::start(&mut ctx, &config, &ObjMeshProvider)?;
    log::info!("Scene ready after {} setup calls", ctx.calls().len());

    let scene = host.scene_mut();
    for command in [SceneCommand::PITCH_UP, SceneCommand::YAW_RIGHT, SceneCommand::DOLLY_IN] {
        scene.apply(&mut ctx, command);
    }
    scene.apply(&mut ctx, SceneCommand::ToggleAnimation);

    let mut ticks = 0;
    let mut calls_per_frame = 0;
    for frame in 0..frames {
        ctx.clear_calls();
        ticks += scene.advance(FRAME_TIME);
        scene.draw(&mut ctx);
        calls_per_frame = ctx.calls().len();

        if frame % 60 == 0 {
            let state = scene.animation().state();
            log::info!(
                "Frame {}: {:?} at x={:.1} z={:.1} heading {}",
                frame,
                scene.animation().phase(),
                state.x,
                state.z,
                state.rotation
            );
        }
    }

    let solids = ctx.count(|call| matches!(call, GlCall::DrawBox(_) | GlCall::DrawCylinder(_)));
    log::info!(
        "Replayed {} frames, {} animation ticks, {} calls and {} solids per frame",
        frames,
        ticks,
        calls_per_frame,
        solids
    );
    if let Some(bounds) = ctx.solid_bounds() {
        log::info!("Static geometry spans {:?} in view space", bounds.extent());
    }
    if ctx.underflows() > 0 {
        log::warn!("{} matrix stack underflows recorded", ctx.underflows());
    }

    host.shutdown(&mut ctx);
    Ok(())
}
