use std::{sync::Arc, time::Instant};
use thermolife::constants::{FPS_UPDATE_INTERVAL_SECS, WINDOW_HEIGHT, WINDOW_WIDTH};
use thermolife::{
    AppConfig, FieldRenderer, GpuSurface, PixelSurface, Simulation, ThermalEngine,
    VisualizationMode,
};
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

// --- Main Function ---
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let config = AppConfig::new();
    config.validate()?;

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Thermolife")
            .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
            .build(&event_loop)?,
    );
    let mut surface = pollster::block_on(GpuSurface::new(window.clone()))?;
    let mut simulation = Simulation::new(config.simulation.clone())?;
    let (display_width, display_height) = surface.dimensions();
    let mut thermal = ThermalEngine::new(config.thermal.clone(), display_width, display_height);
    let mut renderer = FieldRenderer::new(config.render.clone());

    let mut last_sim_update_time = Instant::now();
    let mut last_fps_update_time = Instant::now();
    let mut frames_since_last_fps_update = 0;
    let mut current_fps = 0.0;

    event_loop.run(move |event, elwt: &EventLoopWindowTarget<()>| {
        elwt.set_control_flow(ControlFlow::Poll);
        match event {
            Event::AboutToWait => {
                let now = Instant::now();
                let delta_time = now.duration_since(last_sim_update_time).as_secs_f32();
                last_sim_update_time = now;
                let changes = simulation.update(delta_time);
                if !changes.is_empty() {
                    log::debug!(
                        "{} births, {} deaths this frame",
                        changes.births.len(),
                        changes.deaths.len()
                    );
                    thermal.invalidate();
                }
                window.request_redraw();
            }
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => elwt.exit(),
                WindowEvent::Resized(physical_size) => {
                    surface.resize(physical_size);
                    let (w, h) = surface.dimensions();
                    thermal.resize_display(w, h);
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    surface.resize(window.inner_size());
                    let (w, h) = surface.dimensions();
                    thermal.resize_display(w, h);
                }
                WindowEvent::KeyboardInput {
                    event: key_event, ..
                } => {
                    if key_event.state == ElementState::Pressed && !key_event.repeat {
                        match key_event.physical_key {
                            PhysicalKey::Code(KeyCode::ArrowUp) => simulation.adjust_speed(true),
                            PhysicalKey::Code(KeyCode::ArrowDown) => simulation.adjust_speed(false),
                            PhysicalKey::Code(KeyCode::Space) => simulation.toggle_pause(),
                            PhysicalKey::Code(KeyCode::KeyR) => {
                                if let Err(e) = simulation.restart() {
                                    log::error!("Restart failed: {e}");
                                }
                                thermal.invalidate();
                            }
                            PhysicalKey::Code(KeyCode::KeyC) => {
                                simulation.clear();
                                thermal.invalidate();
                            }
                            PhysicalKey::Code(KeyCode::KeyV) => {
                                renderer.set_mode(renderer.mode().toggled());
                                thermal.invalidate();
                            }
                            PhysicalKey::Code(KeyCode::Escape) => elwt.exit(),
                            _ => {}
                        }
                    }
                }
                WindowEvent::RedrawRequested => {
                    let now = Instant::now();
                    if renderer.should_skip(now) {
                        return;
                    }
                    // The cells view never reads the field, so skip synthesis there.
                    let field = if renderer.mode() == VisualizationMode::Thermal {
                        thermal.update(simulation.grid(), now)
                    } else {
                        thermal.field()
                    };
                    renderer.draw(simulation.grid(), field, &mut surface, now);

                    match surface.take_error() {
                        None => {}
                        Some(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            surface.reconfigure()
                        }
                        Some(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("GPU out of memory, exiting");
                            elwt.exit();
                        }
                        Some(e) => log::warn!("Surface error: {:?}", e),
                    }

                    frames_since_last_fps_update += 1;
                    let elapsed_secs = now.duration_since(last_fps_update_time).as_secs_f64();
                    if elapsed_secs >= FPS_UPDATE_INTERVAL_SECS {
                        current_fps = frames_since_last_fps_update as f64 / elapsed_secs;
                        last_fps_update_time = now;
                        frames_since_last_fps_update = 0;
                    }
                    let paused_text = if simulation.is_paused() {
                        " [PAUSED]"
                    } else {
                        ""
                    };
                    window.set_title(&format!(
                        "Thermolife - Gen: {} - Pop: {} - {:.0} gen/s - {:?} - FPS: {:.1}{}",
                        simulation.generation(),
                        simulation.grid().population(),
                        simulation.generations_per_sec(),
                        renderer.mode(),
                        current_fps,
                        paused_text
                    ));
                }
                _ => {}
            },
            _ => {}
        }
    })?;
    Ok(())
}
