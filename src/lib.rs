// --- File: lib.rs ---
//! Conway's Game of Life rendered as a continuous heat field.
//!
//! [`simulation`] advances a [`grid::Grid`] one generation at a time,
//! [`thermal`] turns the living cells into a smoothed temperature field and
//! [`field_renderer`] maps that field through a [`color::ColorMap`] onto a
//! [`surface::PixelSurface`].

pub mod color;
pub mod config;
pub mod constants;
pub mod error;
pub mod field_renderer;
pub mod grid;
pub mod renderer;
pub mod simulation;
pub mod surface;
pub mod thermal;

pub use color::{AgeColorMap, ColorMap, ThermalColorMap};
pub use config::{AppConfig, RenderConfig, SimulationConfig, ThermalConfig, VisualizationMode};
pub use error::{ConfigError, GridError, RenderError};
pub use field_renderer::FieldRenderer;
pub use grid::{Cell, Grid};
pub use renderer::GpuSurface;
pub use simulation::{GenerationDelta, Simulation, SimulationEngine};
pub use surface::{PixelSurface, RgbaImage};
pub use thermal::{ThermalEngine, ThermalField};

// --- End of File: lib.rs ---
