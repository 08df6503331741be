// --- File: error.rs ---
//! Error types for grid construction, configuration and GPU setup.
//!
//! Out-of-range coordinates are never errors; they read as absent cells.
//! Only boundary validation and resource acquisition can fail.

use std::error::Error;
use std::fmt;

/// Rejected grid construction or mutation input.
#[derive(Clone, Debug, PartialEq)]
pub enum GridError {
    /// Width or height was zero.
    InvalidDimensions { width: u32, height: u32 },
    /// Randomization probability outside `[0, 1]` (or NaN).
    InvalidProbability(f64),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => {
                write!(f, "grid dimensions must be positive, got {width}x{height}")
            }
            Self::InvalidProbability(p) => {
                write!(f, "probability must be within [0, 1], got {p}")
            }
        }
    }
}

impl Error for GridError {}

/// A tuning value that would make the field or renderer degenerate.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Named value must be strictly positive.
    NotPositive { name: &'static str, value: f64 },
    /// Named value must lie in the given inclusive range.
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    Grid(GridError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPositive { name, value } => {
                write!(f, "'{name}' must be positive, got {value}")
            }
            Self::OutOfRange {
                name,
                value,
                min,
                max,
            } => write!(f, "'{name}' must be within [{min}, {max}], got {value}"),
            Self::Grid(e) => write!(f, "invalid grid config: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for ConfigError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

/// Failure to acquire a drawing surface. Fatal to renderer construction.
#[derive(Debug)]
pub enum RenderError {
    CreateSurface(wgpu::CreateSurfaceError),
    NoAdapter,
    RequestDevice(wgpu::RequestDeviceError),
    /// The surface reported no supported texture formats for this adapter.
    UnsupportedSurface,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateSurface(e) => write!(f, "failed to create surface: {e}"),
            Self::NoAdapter => write!(f, "no suitable GPU adapter found"),
            Self::RequestDevice(e) => write!(f, "failed to create device: {e}"),
            Self::UnsupportedSurface => write!(f, "surface is not supported by the adapter"),
        }
    }
}

impl Error for RenderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateSurface(e) => Some(e),
            Self::RequestDevice(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for RenderError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        Self::CreateSurface(e)
    }
}

impl From<wgpu::RequestDeviceError> for RenderError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        Self::RequestDevice(e)
    }
}

// --- End of File: error.rs ---

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_error_messages_name_the_bad_value() {
        let e = GridError::InvalidDimensions {
            width: 0,
            height: 4,
        };
        assert_eq!(e.to_string(), "grid dimensions must be positive, got 0x4");
        let e = GridError::InvalidProbability(1.5);
        assert!(e.to_string().contains("1.5"));
    }

    #[test]
    fn config_error_wraps_grid_error_as_source() {
        let e: ConfigError = GridError::InvalidProbability(-0.1).into();
        assert!(e.source().is_some());
    }
}
