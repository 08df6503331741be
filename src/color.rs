// --- File: color.rs ---
//! Color lookup for the two visualization modes.
//!
//! Both maps are pure functions of their input: the same value always
//! yields the same RGBA bytes.

use crate::constants::{AGE_COLOR_CAP, BACKGROUND_RGBA};

/// Maps a normalized value in `[0, 1]` to RGBA. Inputs outside are clamped.
pub trait ColorMap {
    fn color(&self, t: f32) -> [u8; 4];
}

// Band boundaries of the thermal ramp. Each band interpolates linearly
// between its two anchors, so adjacent bands meet at the same color.
const THERMAL_ANCHORS: [(f32, [f32; 3]); 6] = [
    (0.0, [0.0, 0.0, 40.0]),       // cold: dark blue
    (0.2, [40.0, 60.0, 200.0]),    // cool: blue
    (0.4, [140.0, 30.0, 180.0]),   // moderate: purple
    (0.6, [220.0, 30.0, 60.0]),    // hot: red
    (0.8, [255.0, 140.0, 0.0]),    // very hot: orange
    (1.0, [255.0, 250.0, 230.0]), // white
];

/// Five-band thermal ramp from dark blue through purple and red to white.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThermalColorMap;

impl ColorMap for ThermalColorMap {
    fn color(&self, t: f32) -> [u8; 4] {
        thermal_color(t)
    }
}

pub fn thermal_color(t: f32) -> [u8; 4] {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let band = THERMAL_ANCHORS
        .windows(2)
        .position(|w| t <= w[1].0)
        .unwrap_or(THERMAL_ANCHORS.len() - 2);
    let (t0, c0) = THERMAL_ANCHORS[band];
    let (t1, c1) = THERMAL_ANCHORS[band + 1];
    let local = (t - t0) / (t1 - t0);
    [
        lerp_channel(c0[0], c1[0], local),
        lerp_channel(c0[1], c1[1], local),
        lerp_channel(c0[2], c1[2], local),
        255,
    ]
}

#[inline]
fn lerp_channel(a: f32, b: f32, t: f32) -> u8 {
    (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
}

/// Discrete-cell coloring: young cells are bright green, old ones fade to
/// deep teal.
#[derive(Debug, Clone, Copy)]
pub struct AgeColorMap {
    pub age_cap: u32,
}

impl Default for AgeColorMap {
    fn default() -> Self {
        Self {
            age_cap: AGE_COLOR_CAP,
        }
    }
}

impl AgeColorMap {
    /// Color of a cell by age; dead cells (age 0) take the background.
    pub fn cell_color(&self, age: u32) -> [u8; 4] {
        if age == 0 {
            return BACKGROUND_RGBA;
        }
        let capped = age.min(self.age_cap.max(1));
        let t = (capped - 1) as f32 / (self.age_cap.max(2) - 1) as f32;
        self.color(t)
    }
}

impl ColorMap for AgeColorMap {
    fn color(&self, t: f32) -> [u8; 4] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        [
            lerp_channel(170.0, 10.0, t),
            lerp_channel(255.0, 110.0, t),
            lerp_channel(120.0, 130.0, t),
            255,
        ]
    }
}

// --- End of File: color.rs ---

#[cfg(test)]
mod tests {
    use super::*;

    fn max_channel_delta(a: [u8; 4], b: [u8; 4]) -> i32 {
        a.iter()
            .zip(b.iter())
            .map(|(&x, &y)| (x as i32 - y as i32).abs())
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn endpoints_are_fixed() {
        assert_eq!(thermal_color(0.0), [0, 0, 40, 255]);
        assert_eq!(thermal_color(1.0), [255, 250, 230, 255]);
        assert_eq!(thermal_color(-3.0), thermal_color(0.0));
        assert_eq!(thermal_color(7.0), thermal_color(1.0));
        assert_eq!(thermal_color(f32::NAN), thermal_color(0.0));
    }

    #[test]
    fn ramp_is_continuous_across_band_boundaries() {
        for &(boundary, _) in &THERMAL_ANCHORS[1..THERMAL_ANCHORS.len() - 1] {
            let below = thermal_color(boundary - 1e-4);
            let above = thermal_color(boundary + 1e-4);
            assert!(max_channel_delta(below, above) <= 1, "jump at {boundary}");
        }
    }

    #[test]
    fn small_steps_never_jump_far() {
        let mut prev = thermal_color(0.0);
        for i in 1..=1000 {
            let next = thermal_color(i as f32 / 1000.0);
            assert!(max_channel_delta(prev, next) <= 3);
            prev = next;
        }
    }

    #[test]
    fn ramp_is_deterministic() {
        let map = ThermalColorMap;
        for i in 0..=20 {
            let t = i as f32 / 20.0;
            assert_eq!(map.color(t), map.color(t));
        }
    }

    #[test]
    fn age_colors_cap_and_background() {
        let map = AgeColorMap::default();
        assert_eq!(map.cell_color(0), BACKGROUND_RGBA);
        assert_eq!(map.cell_color(1), map.color(0.0));
        assert_eq!(map.cell_color(AGE_COLOR_CAP), map.color(1.0));
        assert_eq!(map.cell_color(AGE_COLOR_CAP * 10), map.color(1.0));
    }
}
