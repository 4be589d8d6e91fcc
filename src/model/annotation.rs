use crate::{
    compose::CompositeLayout,
    foundation::error::{FlowlensError, FlowlensResult},
};

/// Editorial weight of a finding. Drives heatmap radius and intensity.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Minor,
}

/// One finding in composite-percentage space, as produced by the analysis service.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnnotationPoint {
    pub id: u32,
    pub x: f64, // 0..100 of composite width
    pub y: f64, // 0..100 of composite height
    pub category: String,
    pub severity: Severity,
    pub tag: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub current: String,
    #[serde(default)]
    pub suggested: String,
    #[serde(default)]
    pub impact: String,
}

impl AnnotationPoint {
    pub fn validate(&self) -> FlowlensResult<()> {
        if self.id == 0 {
            return Err(FlowlensError::validation("annotation id must be >= 1"));
        }
        Ok(())
    }
}

/// An [`AnnotationPoint`] reprojected onto the slide that contains it.
///
/// Never persisted; rebuilt whenever the display needs it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideAnnotation {
    #[serde(flatten)]
    pub point: AnnotationPoint,
    pub slide_index: usize,
    pub slide_x: f64,
    pub slide_y: f64,
}

impl SlideAnnotation {
    pub fn severity(&self) -> Severity {
        self.point.severity
    }
}

/// What the persistence collaborator stores for one analysis run.
///
/// `layout` is either complete or absent; absent means legacy single-image data.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub slide_count: usize,
    pub annotations: Vec<AnnotationPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<CompositeLayout>,
}

impl AuditRecord {
    pub fn from_json(bytes: &[u8]) -> FlowlensResult<Self> {
        let record: Self = serde_json::from_slice(bytes)?;
        record.validate()?;
        Ok(record)
    }

    pub fn validate(&self) -> FlowlensResult<()> {
        for a in &self.annotations {
            a.validate()?;
        }
        Ok(())
    }
}

/// Parse the analysis service's annotation list.
pub fn parse_annotations(bytes: &[u8]) -> FlowlensResult<Vec<AnnotationPoint>> {
    let points: Vec<AnnotationPoint> = serde_json::from_slice(bytes)?;
    for p in &points {
        p.validate()?;
    }
    Ok(points)
}

#[cfg(test)]
#[path = "../../tests/unit/model/annotation.rs"]
mod tests;
