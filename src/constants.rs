// --- File: constants.rs ---
// --- Global Constants ---
pub const BACKGROUND_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};
pub const BACKGROUND_RGBA: [u8; 4] = [0, 0, 0, 255];

pub const WINDOW_WIDTH: u32 = 960;
pub const WINDOW_HEIGHT: u32 = 720;
pub const GRID_WIDTH: u32 = 96;
pub const GRID_HEIGHT: u32 = 72;
pub const INITIAL_DENSITY: f64 = 0.25;

// --- Generation Rate ---
pub const INITIAL_GENERATIONS_PER_SEC: f32 = 8.0;
pub const MIN_GENERATIONS_PER_SEC: f32 = 1.0;
pub const MAX_GENERATIONS_PER_SEC: f32 = 60.0;
pub const GENERATION_RATE_STEP: f32 = 2.0;

// --- Thermal Field Defaults ---
pub const DEFAULT_FIELD_RESOLUTION: u32 = 4;
pub const DEFAULT_SAMPLE_RADIUS_FACTOR: f32 = 1.5;
pub const GAUSSIAN_SIGMA_FACTOR: f32 = 0.3;
pub const DEFAULT_DIFFUSION_RATE: f32 = 0.08;
pub const DEFAULT_DECAY_FACTOR: f32 = 0.95;
pub const DEFAULT_BLUR_RADIUS: u32 = 3;
// Radii at or below this use the box filter.
pub const BOX_BLUR_MAX_RADIUS: u32 = 2;
pub const DEFAULT_CACHE_FRAMES: u32 = 3;
pub const DEFAULT_CACHE_MILLIS: u64 = 100;
// Applied when the field is flat so normalization never divides by zero.
pub const MIN_TEMPERATURE_RANGE: f32 = 0.1;

// --- Cell Heat ---
pub const BASE_CELL_HEAT: f32 = 1.0;
pub const MAX_AGE_HEAT_BONUS: f32 = 0.5;
pub const AGE_HEAT_CAP: u32 = 20;
pub const NEWBORN_HEAT_BONUS: f32 = 0.8;
pub const MAX_CELL_HEAT: f32 = 2.0;

// --- Rendering ---
pub const DEFAULT_RENDER_SCALE: f32 = 0.5;
pub const MIN_FRAME_INTERVAL_MILLIS: u64 = 33;
pub const AGE_COLOR_CAP: u32 = 50;
pub const FPS_UPDATE_INTERVAL_SECS: f64 = 1.0;

// --- End of File: constants.rs ---
