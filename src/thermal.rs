// --- File: thermal.rs ---
//! Continuous heat field synthesized from discrete cells.
//!
//! Each field sample takes a Gaussian-weighted average of the cell heat
//! around it, then the field gets one diffusion pass and a separable blur.
//! The result is cached for a few frames because accumulation costs
//! O(field samples x cells in the sample radius).

use crate::config::ThermalConfig;
use crate::constants::*;
use crate::grid::Grid;
use glam::Vec2;
use rayon::prelude::*;
use std::time::Instant;

/// Heat contributed by one living cell.
///
/// Base heat plus an age bonus that saturates at [`AGE_HEAT_CAP`]
/// generations, plus a flat bonus for newborns, capped at [`MAX_CELL_HEAT`].
pub fn calculate_cell_heat(age: u32, newborn: bool) -> f32 {
    let age_factor = (age as f32 / AGE_HEAT_CAP as f32).min(1.0);
    let mut heat = BASE_CELL_HEAT + MAX_AGE_HEAT_BONUS * age_factor;
    if newborn {
        heat += NEWBORN_HEAT_BONUS;
    }
    heat.min(MAX_CELL_HEAT)
}

#[inline]
pub fn gaussian_influence(distance_sq: f32, sigma: f32) -> f32 {
    (-distance_sq / (2.0 * sigma * sigma)).exp()
}

/// One synthesized field. Sample `(x, y)` sits at the center of a
/// `scale.x` by `scale.y` rectangle of display pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalField {
    width: u32,
    height: u32,
    scale: Vec2,
    temperature: Vec<f32>,
    activity: Vec<f32>,
}

impl ThermalField {
    /// Zero-filled field with the same scale on both axes. Zero dimensions
    /// are raised to 1.
    pub fn new(width: u32, height: u32, scale: f32) -> Self {
        Self::with_scale(width, height, Vec2::splat(scale))
    }

    pub fn with_scale(width: u32, height: u32, scale: Vec2) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            scale,
            temperature: vec![0.0; len],
            activity: vec![0.0; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Display pixels per field sample on each axis.
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn temperature(&self) -> &[f32] {
        &self.temperature
    }

    pub fn activity(&self) -> &[f32] {
        &self.activity
    }

    pub fn temperature_at(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.temperature[(y * self.width + x) as usize])
    }

    /// Observed `(min, max)`. A flat field reports a synthetic range of
    /// [`MIN_TEMPERATURE_RANGE`] so callers can always normalize.
    pub fn temperature_range(&self) -> (f32, f32) {
        let (min, max) = self
            .temperature
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &t| {
                (lo.min(t), hi.max(t))
            });
        if !min.is_finite() || !max.is_finite() {
            return (0.0, MIN_TEMPERATURE_RANGE);
        }
        if max <= min {
            (min, min + MIN_TEMPERATURE_RANGE)
        } else {
            (min, max)
        }
    }

    /// Bilinear sample at fractional field coordinates, clamped to the edges.
    pub fn sample_bilinear(&self, fx: f32, fy: f32) -> f32 {
        let max_x = (self.width - 1) as f32;
        let max_y = (self.height - 1) as f32;
        let fx = fx.clamp(0.0, max_x);
        let fy = fy.clamp(0.0, max_y);
        let x0 = fx.floor() as u32;
        let y0 = fy.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let tx = fx - x0 as f32;
        let ty = fy - y0 as f32;

        let at = |x: u32, y: u32| self.temperature[(y * self.width + x) as usize];
        let top = at(x0, y0) + (at(x1, y0) - at(x0, y0)) * tx;
        let bottom = at(x0, y1) + (at(x1, y1) - at(x0, y1)) * tx;
        top + (bottom - top) * ty
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct CacheState {
    built_at: Option<Instant>,
    frames_since_build: u32,
    dirty: bool,
}

/// Owns the field and every scratch buffer used to build it.
pub struct ThermalEngine {
    config: ThermalConfig,
    display_width: u32,
    display_height: u32,
    field: ThermalField,
    cell_heat_buffer: Vec<f32>,
    scratch: Vec<f32>,
    kernel: Vec<f32>,
    cache: CacheState,
}

impl ThermalEngine {
    pub fn new(config: ThermalConfig, display_width: u32, display_height: u32) -> Self {
        let kernel = build_blur_kernel(config.blur_radius);
        let mut engine = Self {
            config,
            display_width: 0,
            display_height: 0,
            field: ThermalField::new(1, 1, 1.0),
            cell_heat_buffer: Vec::new(),
            scratch: Vec::new(),
            kernel,
            cache: CacheState::default(),
        };
        engine.resize_display(display_width, display_height);
        engine
    }

    pub fn config(&self) -> &ThermalConfig {
        &self.config
    }

    pub fn field(&self) -> &ThermalField {
        &self.field
    }

    pub fn field_dimensions(&self) -> (u32, u32) {
        (self.field.width, self.field.height)
    }

    /// Reallocates the field for a new display size and drops the cache.
    pub fn resize_display(&mut self, display_width: u32, display_height: u32) {
        let display_width = display_width.max(1);
        let display_height = display_height.max(1);
        if display_width == self.display_width && display_height == self.display_height {
            return;
        }
        self.display_width = display_width;
        self.display_height = display_height;

        let resolution = self.config.field_resolution.max(1);
        let field_width = (display_width / resolution).max(1);
        let field_height = (display_height / resolution).max(1);
        let scale = Vec2::new(
            display_width as f32 / field_width as f32,
            display_height as f32 / field_height as f32,
        );
        self.field = ThermalField::with_scale(field_width, field_height, scale);
        self.scratch = vec![0.0; self.field.temperature.len()];
        self.invalidate();
        log::debug!(
            "Thermal field sized {}x{} for display {}x{}",
            field_width,
            field_height,
            display_width,
            display_height
        );
    }

    /// Forces the next [`update`](Self::update) to rebuild.
    pub fn invalidate(&mut self) {
        self.cache.dirty = true;
    }

    pub fn frames_since_build(&self) -> u32 {
        self.cache.frames_since_build
    }

    pub fn built_at(&self) -> Option<Instant> {
        self.cache.built_at
    }

    /// Whether the cached field may be reused at `now`.
    pub fn is_cache_fresh(&self, now: Instant) -> bool {
        let Some(built_at) = self.cache.built_at else {
            return false;
        };
        self.config.cache_enabled
            && !self.cache.dirty
            && self.cache.frames_since_build < self.config.cache_frames
            && now.saturating_duration_since(built_at) < self.config.cache_duration
    }

    /// Returns the field for this frame, rebuilding it from `grid` unless
    /// the cache is still fresh.
    pub fn update(&mut self, grid: &Grid, now: Instant) -> &ThermalField {
        if self.is_cache_fresh(now) {
            self.cache.frames_since_build += 1;
            return &self.field;
        }
        self.rebuild(grid);
        self.cache = CacheState {
            built_at: Some(now),
            frames_since_build: 0,
            dirty: false,
        };
        &self.field
    }

    fn rebuild(&mut self, grid: &Grid) {
        self.accumulate(grid);
        let (w, h) = (self.field.width as usize, self.field.height as usize);
        diffuse(
            &mut self.field.temperature,
            &mut self.scratch,
            w,
            h,
            self.config.diffusion_rate,
            self.config.decay_factor,
        );
        if self.config.blur_radius <= BOX_BLUR_MAX_RADIUS {
            box_blur(
                &mut self.field.temperature,
                &mut self.scratch,
                w,
                h,
                self.config.blur_radius as usize,
            );
        } else {
            gaussian_blur(
                &mut self.field.temperature,
                &mut self.scratch,
                w,
                h,
                &self.kernel,
            );
        }
    }

    fn accumulate(&mut self, grid: &Grid) {
        self.cell_heat_buffer.clear();
        self.cell_heat_buffer.extend(grid.cells().iter().map(|cell| {
            if cell.is_alive() {
                calculate_cell_heat(cell.age(), cell.is_newborn())
            } else {
                0.0
            }
        }));

        let grid_w = grid.width() as i32;
        let grid_h = grid.height() as i32;
        let cell_w = self.display_width as f32 / grid_w as f32;
        let cell_h = self.display_height as f32 / grid_h as f32;
        let radius = cell_w.min(cell_h) * self.config.sample_radius_factor;
        let radius_sq = radius * radius;
        let sigma = GAUSSIAN_SIGMA_FACTOR * radius;
        let scale = self.field.scale;
        let field_w = self.field.width as usize;
        let heat = &self.cell_heat_buffer;

        self.field
            .temperature
            .par_chunks_mut(field_w)
            .zip(self.field.activity.par_chunks_mut(field_w))
            .enumerate()
            .for_each(|(fy, (temp_row, activity_row))| {
                let world_y = (fy as f32 + 0.5) * scale.y;
                let gy_min = (((world_y - radius) / cell_h - 0.5).floor() as i32).max(0);
                let gy_max = (((world_y + radius) / cell_h - 0.5).ceil() as i32).min(grid_h - 1);

                for (fx, (temp, activity)) in
                    temp_row.iter_mut().zip(activity_row.iter_mut()).enumerate()
                {
                    let point = Vec2::new((fx as f32 + 0.5) * scale.x, world_y);
                    let gx_min = (((point.x - radius) / cell_w - 0.5).floor() as i32).max(0);
                    let gx_max =
                        (((point.x + radius) / cell_w - 0.5).ceil() as i32).min(grid_w - 1);

                    let mut heat_sum = 0.0;
                    let mut live_weight = 0.0;
                    let mut total_weight = 0.0;
                    for gy in gy_min..=gy_max {
                        for gx in gx_min..=gx_max {
                            let center =
                                Vec2::new((gx as f32 + 0.5) * cell_w, (gy as f32 + 0.5) * cell_h);
                            let distance_sq = center.distance_squared(point);
                            if distance_sq > radius_sq {
                                continue;
                            }
                            let influence = gaussian_influence(distance_sq, sigma);
                            total_weight += influence;
                            let cell_heat = heat[(gy * grid_w + gx) as usize];
                            if cell_heat > 0.0 {
                                heat_sum += cell_heat * influence;
                                live_weight += influence;
                            }
                        }
                    }
                    *temp = if total_weight > 0.0 {
                        heat_sum / total_weight
                    } else {
                        0.0
                    };
                    *activity = live_weight;
                }
            });
    }
}

/// One explicit Laplacian smoothing step over interior samples, with decay.
/// The one-sample border is left as is.
pub fn diffuse(
    values: &mut [f32],
    scratch: &mut Vec<f32>,
    width: usize,
    height: usize,
    rate: f32,
    decay: f32,
) {
    if width < 3 || height < 3 {
        return;
    }
    scratch.clear();
    scratch.extend_from_slice(values);
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let i = y * width + x;
            let center = scratch[i];
            let laplacian =
                scratch[i - width] + scratch[i + width] + scratch[i - 1] + scratch[i + 1]
                    - 4.0 * center;
            values[i] = (center + rate * laplacian) * decay;
        }
    }
}

/// Normalized Gaussian weights for offsets `-radius..=radius`.
pub fn build_blur_kernel(radius: u32) -> Vec<f32> {
    let r = radius as i32;
    let sigma = (radius as f32 / 2.0).max(0.5);
    let mut kernel: Vec<f32> = (-r..=r)
        .map(|i| gaussian_influence((i * i) as f32, sigma))
        .collect();
    let sum: f32 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }
    kernel
}

/// Separable blur, horizontal then vertical. Samples past the edge are left
/// out and the remaining weights renormalized, so edges do not darken.
pub fn gaussian_blur(
    values: &mut [f32],
    scratch: &mut Vec<f32>,
    width: usize,
    height: usize,
    kernel: &[f32],
) {
    if kernel.len() <= 1 {
        return;
    }
    let radius = (kernel.len() / 2) as isize;
    scratch.clear();
    scratch.resize(values.len(), 0.0);

    for y in 0..height {
        let row = &values[y * width..(y + 1) * width];
        for x in 0..width {
            let mut sum = 0.0;
            let mut weight = 0.0;
            for (k, &w) in kernel.iter().enumerate() {
                let sx = x as isize + k as isize - radius;
                if sx >= 0 && (sx as usize) < width {
                    sum += row[sx as usize] * w;
                    weight += w;
                }
            }
            scratch[y * width + x] = sum / weight;
        }
    }

    for y in 0..height {
        for x in 0..width {
            let mut sum = 0.0;
            let mut weight = 0.0;
            for (k, &w) in kernel.iter().enumerate() {
                let sy = y as isize + k as isize - radius;
                if sy >= 0 && (sy as usize) < height {
                    sum += scratch[sy as usize * width + x] * w;
                    weight += w;
                }
            }
            values[y * width + x] = sum / weight;
        }
    }
}

/// Unweighted separable box blur with the same edge handling.
pub fn box_blur(
    values: &mut [f32],
    scratch: &mut Vec<f32>,
    width: usize,
    height: usize,
    radius: usize,
) {
    if radius == 0 {
        return;
    }
    scratch.clear();
    scratch.resize(values.len(), 0.0);

    for y in 0..height {
        let row = &values[y * width..(y + 1) * width];
        for x in 0..width {
            let lo = x.saturating_sub(radius);
            let hi = (x + radius).min(width - 1);
            let sum: f32 = row[lo..=hi].iter().sum();
            scratch[y * width + x] = sum / (hi - lo + 1) as f32;
        }
    }

    for y in 0..height {
        let lo = y.saturating_sub(radius);
        let hi = (y + radius).min(height - 1);
        for x in 0..width {
            let sum: f32 = (lo..=hi).map(|sy| scratch[sy * width + x]).sum();
            values[y * width + x] = sum / (hi - lo + 1) as f32;
        }
    }
}

// --- End of File: thermal.rs ---
