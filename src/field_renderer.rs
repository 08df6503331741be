// --- File: field_renderer.rs ---
use crate::color::{AgeColorMap, ColorMap, ThermalColorMap};
use crate::config::{RenderConfig, VisualizationMode};
use crate::grid::Grid;
use crate::surface::{PixelSurface, RgbaImage};
use crate::thermal::ThermalField;
use rayon::prelude::*;
use std::time::Instant;

/// Rasterizes a thermal field (or the raw cells) to a pixel surface.
///
/// Draws at `render_scale` of the surface size into an off-screen image
/// and lets the surface upscale it with smoothing. Calls closer together
/// than `min_frame_interval` are dropped.
pub struct FieldRenderer<C: ColorMap = ThermalColorMap> {
    config: RenderConfig,
    color_map: C,
    age_colors: AgeColorMap,
    offscreen: RgbaImage,
    last_draw: Option<Instant>,
}

impl FieldRenderer<ThermalColorMap> {
    pub fn new(config: RenderConfig) -> Self {
        Self::with_color_map(config, ThermalColorMap)
    }
}

impl<C: ColorMap + Sync> FieldRenderer<C> {
    pub fn with_color_map(config: RenderConfig, color_map: C) -> Self {
        Self {
            config,
            color_map,
            age_colors: AgeColorMap::default(),
            offscreen: RgbaImage::new(1, 1),
            last_draw: None,
        }
    }

    pub fn mode(&self) -> VisualizationMode {
        self.config.mode
    }

    pub fn set_mode(&mut self, mode: VisualizationMode) {
        if self.config.mode != mode {
            log::info!("Visualization mode: {:?}", mode);
            self.config.mode = mode;
            // Draw the new mode on the next frame.
            self.last_draw = None;
        }
    }

    /// Whether a draw at `now` would be throttled.
    pub fn should_skip(&self, now: Instant) -> bool {
        self.last_draw.is_some_and(|last| {
            now.saturating_duration_since(last) < self.config.min_frame_interval
        })
    }

    /// Size the field is rasterized at for a given surface size.
    pub fn render_size(&self, surface_width: u32, surface_height: u32) -> (u32, u32) {
        let scale = self.config.render_scale.clamp(0.0, 1.0);
        (
            ((surface_width as f32 * scale) as u32).clamp(1, surface_width.max(1)),
            ((surface_height as f32 * scale) as u32).clamp(1, surface_height.max(1)),
        )
    }

    /// Draws the thermal field. Returns `false` when throttled.
    pub fn draw_field<S: PixelSurface>(
        &mut self,
        field: &ThermalField,
        surface: &mut S,
        now: Instant,
    ) -> bool {
        if self.should_skip(now) {
            return false;
        }
        let (surface_w, surface_h) = surface.dimensions();
        let (render_w, render_h) = self.render_size(surface_w, surface_h);
        self.offscreen.ensure_size(render_w, render_h);

        let (min, max) = field.temperature_range();
        let range = max - min;
        let field_x_ratio = field.width() as f32 / render_w as f32;
        let field_y_ratio = field.height() as f32 / render_h as f32;
        let color_map = &self.color_map;

        self.offscreen
            .pixels_mut()
            .par_chunks_mut(render_w as usize * 4)
            .enumerate()
            .for_each(|(y, row)| {
                let fy = (y as f32 + 0.5) * field_y_ratio - 0.5;
                for (x, px) in row.chunks_exact_mut(4).enumerate() {
                    let fx = (x as f32 + 0.5) * field_x_ratio - 0.5;
                    let value = field.sample_bilinear(fx, fy);
                    let normalized = ((value - min) / range).clamp(0.0, 1.0);
                    px.copy_from_slice(&color_map.color(normalized));
                }
            });

        self.present(surface, render_w, render_h);
        self.last_draw = Some(now);
        true
    }

    /// Draws the cells themselves, colored by age. Returns `false` when
    /// throttled.
    pub fn draw_cells<S: PixelSurface>(
        &mut self,
        grid: &Grid,
        surface: &mut S,
        now: Instant,
    ) -> bool {
        if self.should_skip(now) {
            return false;
        }
        let (surface_w, surface_h) = surface.dimensions();
        let (render_w, render_h) = self.render_size(surface_w, surface_h);
        self.offscreen.ensure_size(render_w, render_h);

        let grid_x_ratio = grid.width() as f32 / render_w as f32;
        let grid_y_ratio = grid.height() as f32 / render_h as f32;
        let age_colors = &self.age_colors;

        self.offscreen
            .pixels_mut()
            .par_chunks_mut(render_w as usize * 4)
            .enumerate()
            .for_each(|(y, row)| {
                let gy = ((y as f32 + 0.5) * grid_y_ratio) as i32;
                for (x, px) in row.chunks_exact_mut(4).enumerate() {
                    let gx = ((x as f32 + 0.5) * grid_x_ratio) as i32;
                    let age = grid.get_cell(gx, gy).map_or(0, |c| c.age());
                    px.copy_from_slice(&age_colors.cell_color(age));
                }
            });

        self.present(surface, render_w, render_h);
        self.last_draw = Some(now);
        true
    }

    /// Draws whichever view the current mode selects.
    pub fn draw<S: PixelSurface>(
        &mut self,
        grid: &Grid,
        field: &ThermalField,
        surface: &mut S,
        now: Instant,
    ) -> bool {
        match self.config.mode {
            VisualizationMode::Thermal => self.draw_field(field, surface, now),
            VisualizationMode::Cells => self.draw_cells(grid, surface, now),
        }
    }

    fn present<S: PixelSurface>(&self, surface: &mut S, render_w: u32, render_h: u32) {
        if (render_w, render_h) == surface.dimensions() {
            surface.put_image(&self.offscreen);
        } else {
            surface.blit_scaled(&self.offscreen, true);
        }
    }
}

// --- End of File: field_renderer.rs ---
