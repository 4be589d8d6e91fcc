use crate::{
    foundation::error::{FlowlensError, FlowlensResult},
    model::annotation::Severity,
};

/// Shape of one point's contribution: linear falloff from `peak` to 0 at `radius_px`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FieldParams {
    pub radius_px: f64,
    pub peak: f64,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HeatmapThreading {
    /// Render rows on rayon workers. Output is identical either way.
    pub parallel: bool,
    /// Dedicated pool size; `None` uses the global rayon pool.
    pub threads: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HeatmapSettings {
    pub critical: FieldParams,
    pub minor: FieldParams,
    /// Densities below this are fully transparent.
    pub haze_threshold: f32,
    pub alpha_scale: f32,
    pub max_alpha: f32,
    pub threading: HeatmapThreading,
}

impl Default for HeatmapSettings {
    fn default() -> Self {
        Self {
            critical: FieldParams {
                radius_px: 100.0,
                peak: 1.0,
            },
            minor: FieldParams {
                radius_px: 70.0,
                peak: 0.6,
            },
            haze_threshold: 0.05,
            alpha_scale: 1.2,
            max_alpha: 0.75,
            threading: HeatmapThreading::default(),
        }
    }
}

impl HeatmapSettings {
    pub fn params_for(&self, severity: Severity) -> FieldParams {
        match severity {
            Severity::Critical => self.critical,
            Severity::Minor => self.minor,
        }
    }

    pub fn validate(&self) -> FlowlensResult<()> {
        for (name, p) in [("critical", self.critical), ("minor", self.minor)] {
            if !p.radius_px.is_finite() || p.radius_px <= 0.0 {
                return Err(FlowlensError::validation(format!(
                    "{name} radius_px must be > 0"
                )));
            }
            if !p.peak.is_finite() || !(0.0..=1.0).contains(&p.peak) {
                return Err(FlowlensError::validation(format!(
                    "{name} peak must be in [0, 1]"
                )));
            }
        }
        for (name, v) in [
            ("haze_threshold", self.haze_threshold),
            ("max_alpha", self.max_alpha),
        ] {
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return Err(FlowlensError::validation(format!("{name} must be in [0, 1]")));
            }
        }
        if !self.alpha_scale.is_finite() || self.alpha_scale < 0.0 {
            return Err(FlowlensError::validation("alpha_scale must be >= 0"));
        }
        if let Some(n) = self.threading.threads
            && n == 0
        {
            return Err(FlowlensError::validation(
                "heatmap threading 'threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/heatmap/settings.rs"]
mod tests;
