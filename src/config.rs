// --- File: config.rs ---
use crate::constants::*;
use crate::error::ConfigError;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub grid_width: u32,
    pub grid_height: u32,
    pub initial_density: f64,
    pub generations_per_sec: f32,
    // Fixed seed for reproducible runs; entropy when `None`.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,
            initial_density: INITIAL_DENSITY,
            generations_per_sec: INITIAL_GENERATIONS_PER_SEC,
            seed: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ThermalConfig {
    /// Display pixels per field sample along each axis.
    pub field_resolution: u32,
    /// Influence radius as a multiple of the cell size.
    pub sample_radius_factor: f32,
    pub diffusion_rate: f32,
    pub decay_factor: f32,
    pub blur_radius: u32,
    pub cache_enabled: bool,
    pub cache_frames: u32,
    pub cache_duration: Duration,
}

impl Default for ThermalConfig {
    fn default() -> Self {
        Self {
            field_resolution: DEFAULT_FIELD_RESOLUTION,
            sample_radius_factor: DEFAULT_SAMPLE_RADIUS_FACTOR,
            diffusion_rate: DEFAULT_DIFFUSION_RATE,
            decay_factor: DEFAULT_DECAY_FACTOR,
            blur_radius: DEFAULT_BLUR_RADIUS,
            cache_enabled: true,
            cache_frames: DEFAULT_CACHE_FRAMES,
            cache_duration: Duration::from_millis(DEFAULT_CACHE_MILLIS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisualizationMode {
    #[default]
    Thermal,
    Cells,
}

impl VisualizationMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Thermal => Self::Cells,
            Self::Cells => Self::Thermal,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Fraction of the display resolution the field is rasterized at.
    pub render_scale: f32,
    pub min_frame_interval: Duration,
    pub mode: VisualizationMode,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            render_scale: DEFAULT_RENDER_SCALE,
            min_frame_interval: Duration::from_millis(MIN_FRAME_INTERVAL_MILLIS),
            mode: VisualizationMode::Thermal,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub simulation: SimulationConfig,
    pub thermal: ThermalConfig,
    pub render: RenderConfig,
}

impl AppConfig {
    pub fn new() -> Self {
        let mut config = Self::default();

        // Coarser field on large windows keeps accumulation tractable.
        config.thermal.field_resolution = 6;
        config.thermal.blur_radius = 2;
        config.render.render_scale = 0.5;

        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        if sim.grid_width == 0 || sim.grid_height == 0 {
            return Err(crate::error::GridError::InvalidDimensions {
                width: sim.grid_width,
                height: sim.grid_height,
            }
            .into());
        }
        if !(0.0..=1.0).contains(&sim.initial_density) {
            return Err(crate::error::GridError::InvalidProbability(sim.initial_density).into());
        }
        positive("generations_per_sec", sim.generations_per_sec as f64)?;

        let thermal = &self.thermal;
        positive("field_resolution", thermal.field_resolution as f64)?;
        positive("sample_radius_factor", thermal.sample_radius_factor as f64)?;
        // Explicit Laplacian step is only stable for k <= 0.25.
        in_range("diffusion_rate", thermal.diffusion_rate as f64, 0.0, 0.25)?;
        in_range("decay_factor", thermal.decay_factor as f64, 0.0, 1.0)?;

        in_range("render_scale", self.render.render_scale as f64, 0.05, 1.0)?;
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn in_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

// --- End of File: config.rs ---

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(AppConfig::default().validate().is_ok());
        assert!(AppConfig::new().validate().is_ok());
    }

    #[test]
    fn degenerate_values_are_rejected() {
        let mut config = AppConfig::new();
        config.thermal.field_resolution = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                name: "field_resolution",
                ..
            })
        ));

        let mut config = AppConfig::new();
        config.simulation.initial_density = 2.0;
        assert!(matches!(config.validate(), Err(ConfigError::Grid(_))));

        let mut config = AppConfig::new();
        config.thermal.diffusion_rate = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn mode_toggles_back_and_forth() {
        let mode = VisualizationMode::default();
        assert_eq!(mode, VisualizationMode::Thermal);
        assert_eq!(mode.toggled().toggled(), mode);
    }
}
