//! Density to color: a five-stop ramp blue, cyan, green, yellow, red.

use crate::heatmap::settings::HeatmapSettings;

fn channel(t: f32) -> u8 {
    (t.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Straight RGB for a density in `[0, 1]`. Values outside are clamped.
pub fn ramp_rgb(d: f32) -> [u8; 3] {
    let d = if d.is_finite() { d.clamp(0.0, 1.0) } else { 0.0 };
    if d < 0.25 {
        [0, channel(d / 0.25), 255]
    } else if d < 0.5 {
        [0, 255, channel(1.0 - (d - 0.25) / 0.25)]
    } else if d < 0.75 {
        [channel((d - 0.5) / 0.25), 255, 0]
    } else {
        [255, channel(1.0 - (d - 0.75) / 0.25), 0]
    }
}

/// Overlay alpha for a density: transparent below the haze threshold, capped at `max_alpha`.
pub fn alpha_for(d: f32, settings: &HeatmapSettings) -> u8 {
    if !d.is_finite() || d < settings.haze_threshold {
        return 0;
    }
    channel((d * settings.alpha_scale).min(settings.max_alpha))
}

pub fn colorize_density(d: f32, settings: &HeatmapSettings) -> [u8; 4] {
    let a = alpha_for(d, settings);
    if a == 0 {
        return [0; 4];
    }
    let [r, g, b] = ramp_rgb(d);
    [r, g, b, a]
}

#[cfg(test)]
#[path = "../../tests/unit/heatmap/ramp.rs"]
mod tests;
