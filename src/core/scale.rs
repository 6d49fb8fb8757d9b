use crate::core::AxisTicks;
use crate::error::{ChartError, ChartResult};

/// Affine map from one calibrated axis onto a pixel span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start >= domain_end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and increasing".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
        })
    }

    /// Scale spanning the calibrated `[value_min, value_max]` of `ticks`.
    pub fn from_ticks(ticks: &AxisTicks) -> ChartResult<Self> {
        Self::new(ticks.value_min, ticks.value_max)
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    /// Left-to-right mapping: `domain_start` lands on 0, `domain_end` on `span_px`.
    #[must_use]
    pub fn to_pixel(self, value: f64, span_px: f64) -> f64 {
        (value - self.domain_start) * span_px / (self.domain_end - self.domain_start)
    }

    /// Bottom-up mapping for vertical axes: `domain_start` lands on `span_px`.
    #[must_use]
    pub fn to_pixel_inverted(self, value: f64, span_px: f64) -> f64 {
        span_px - self.to_pixel(value, span_px)
    }
}

#[cfg(test)]
mod tests {
    use super::LinearScale;
    use crate::core::AxisTicks;

    #[test]
    fn maps_domain_edges_onto_span() {
        let scale = LinearScale::new(0.0, 60.0).expect("valid scale");
        assert_eq!(scale.to_pixel(0.0, 600.0), 0.0);
        assert_eq!(scale.to_pixel(60.0, 600.0), 600.0);
        assert_eq!(scale.to_pixel(30.0, 600.0), 300.0);
    }

    #[test]
    fn inverted_mapping_puts_minimum_at_bottom() {
        let scale = LinearScale::new(0.0, 30.0).expect("valid scale");
        assert_eq!(scale.to_pixel_inverted(0.0, 300.0), 300.0);
        assert_eq!(scale.to_pixel_inverted(30.0, 300.0), 0.0);
    }

    #[test]
    fn uncalibrated_ticks_are_rejected() {
        assert!(LinearScale::from_ticks(&AxisTicks::default()).is_err());
    }
}
