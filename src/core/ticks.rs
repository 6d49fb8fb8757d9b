use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ChartError, ChartResult};

/// Upper bound on interval enlargement passes.
///
/// Every pass grows the applied interval by at least one requested interval,
/// and calibration gives up early once enlarging can no longer reduce the
/// tick count. Hitting the cap means the requested interval is tiny compared
/// to the data magnitude; the axis is then still aligned but may carry more
/// than `count_max` ticks.
const MAX_CALIBRATION_PASSES: usize = 64;

/// Relative slack used when counting ticks so that `5.999_999_999` intervals
/// still count as six.
const TICK_COUNT_EPSILON: f64 = 1e-9;

/// Tick configuration and calibrated result for one axis.
///
/// `interval`, `count_max` and the override flags are user input. The
/// calibrated `applied_interval`, `value_min` and `value_max` are written by
/// [`calibrate`] and read by the renderer and compositor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisTicks {
    pub enabled: bool,
    pub interval: f64,
    pub count_max: u32,
    pub override_value_min: bool,
    pub override_value_max: bool,
    pub value_min: f64,
    pub value_max: f64,
    applied_interval: f64,
}

impl Default for AxisTicks {
    fn default() -> Self {
        Self::new(10.0, 10)
    }
}

impl AxisTicks {
    #[must_use]
    pub fn new(interval: f64, count_max: u32) -> Self {
        Self {
            enabled: true,
            interval,
            count_max,
            override_value_min: false,
            override_value_max: false,
            value_min: 0.0,
            value_max: 0.0,
            applied_interval: interval,
        }
    }

    /// Pins the lower axis bound; calibration will not move it.
    #[must_use]
    pub fn with_value_min(mut self, value_min: f64) -> Self {
        self.override_value_min = true;
        self.value_min = value_min;
        self
    }

    /// Pins the upper axis bound; calibration will not move it.
    #[must_use]
    pub fn with_value_max(mut self, value_max: f64) -> Self {
        self.override_value_max = true;
        self.value_max = value_max;
        self
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Tick spacing actually used for drawing; an integer multiple of `interval`.
    #[must_use]
    pub fn applied_interval(&self) -> f64 {
        self.applied_interval
    }

    #[must_use]
    pub fn span(&self) -> f64 {
        self.value_max - self.value_min
    }

    /// Rejects configurations calibration cannot work with.
    pub fn validate(&self) -> ChartResult<()> {
        if !self.interval.is_finite() || self.interval <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "tick interval must be finite and > 0".to_owned(),
            ));
        }
        if self.count_max == 0 {
            return Err(ChartError::InvalidConfig(
                "tick countMax must be > 0".to_owned(),
            ));
        }
        if self.override_value_min && !self.value_min.is_finite() {
            return Err(ChartError::InvalidConfig(
                "overridden tick valueMin must be finite".to_owned(),
            ));
        }
        if self.override_value_max && !self.value_max.is_finite() {
            return Err(ChartError::InvalidConfig(
                "overridden tick valueMax must be finite".to_owned(),
            ));
        }
        if self.override_value_min && self.override_value_max && self.value_min >= self.value_max
        {
            return Err(ChartError::InvalidConfig(
                "overridden tick valueMin must be < valueMax".to_owned(),
            ));
        }
        Ok(())
    }

    /// Number of whole applied intervals between the calibrated bounds.
    #[must_use]
    pub fn tick_count(&self) -> usize {
        whole_interval_count(self.span(), self.applied_interval)
    }

    /// Calibrated tick positions from `value_min` up to `value_max`, inclusive.
    ///
    /// Positions are computed as `value_min + i * applied_interval` so long
    /// axes do not accumulate floating point drift.
    pub fn tick_values(&self) -> impl Iterator<Item = f64> + '_ {
        let count = if self.span() >= 0.0 && self.applied_interval > 0.0 {
            self.tick_count() + 1
        } else {
            0
        };
        (0..count).map(move |index| self.value_min + (index as f64) * self.applied_interval)
    }
}

/// Aligns `ticks` to the observed data extent.
///
/// Starting from the requested interval, unpinned bounds are aligned to the
/// applied interval, and the interval is enlarged (in whole multiples of the
/// requested one) until at most `count_max` intervals span the axis. When
/// both bounds are pinned only one enlargement pass runs, since nothing else
/// can change afterwards.
pub fn calibrate(
    ticks: AxisTicks,
    observed_min: f64,
    observed_max: f64,
) -> ChartResult<AxisTicks> {
    ticks.validate()?;
    if !observed_min.is_finite() || !observed_max.is_finite() || observed_min > observed_max {
        return Err(ChartError::InvalidData(format!(
            "observed axis range must be finite and ordered: [{observed_min}, {observed_max}]"
        )));
    }

    let mut out = ticks;
    let interval = ticks.interval;
    let count_max = ticks.count_max as usize;
    let both_pinned = ticks.override_value_min && ticks.override_value_max;
    // Past this interval every bound sits on -step, 0 or +step, so enlarging
    // further cannot change the tick count.
    let magnitude = [
        observed_min,
        observed_max,
        if ticks.override_value_min { ticks.value_min } else { 0.0 },
        if ticks.override_value_max { ticks.value_max } else { 0.0 },
    ]
    .into_iter()
    .fold(0.0_f64, |acc, value| acc.max(value.abs()));

    out.applied_interval = interval;
    let mut min_alignment = MinAlignment::Headroom;
    let mut previous_count = usize::MAX;
    let mut enlarged_once = false;

    for pass in 0..MAX_CALIBRATION_PASSES {
        align_bounds(&mut out, observed_min, observed_max, min_alignment);

        // The span is at least one applied interval unless both bounds are
        // pinned, which keeps degenerate single-value axes away from zero.
        let span = out.span().max(out.applied_interval);
        let count = whole_interval_count(span, out.applied_interval);
        if count <= count_max || (both_pinned && enlarged_once) {
            debug!(
                pass,
                value_min = out.value_min,
                value_max = out.value_max,
                applied_interval = out.applied_interval,
                tick_count = count,
                "calibrated axis ticks"
            );
            return Ok(out);
        }

        // The headroom rule keeps at least two intervals on the axis; once
        // the count stalls, restart from the requested interval with the
        // lower bound on the grid line at or below the data.
        if min_alignment == MinAlignment::Headroom
            && !out.override_value_min
            && count >= previous_count
        {
            debug!(pass, tick_count = count, "tick count stalled, aligning min to floor");
            min_alignment = MinAlignment::Floor;
            out.applied_interval = interval;
            previous_count = usize::MAX;
            continue;
        }
        if min_alignment == MinAlignment::Floor && out.applied_interval > magnitude {
            warn!(
                count_max = ticks.count_max,
                tick_count = count,
                applied_interval = out.applied_interval,
                "tick count cannot shrink further, keeping current axis"
            );
            return Ok(out);
        }

        previous_count = count;
        let enlarged = ((span / count_max as f64) / interval).ceil() * interval;
        out.applied_interval = enlarged.max(out.applied_interval + interval);
        enlarged_once = true;
    }

    warn!(
        count_max = ticks.count_max,
        applied_interval = out.applied_interval,
        "tick calibration pass cap reached"
    );
    align_bounds(&mut out, observed_min, observed_max, min_alignment);
    Ok(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MinAlignment {
    Headroom,
    Floor,
}

fn align_bounds(ticks: &mut AxisTicks, observed_min: f64, observed_max: f64, rule: MinAlignment) {
    let step = ticks.applied_interval;
    if !ticks.override_value_min {
        ticks.value_min = match rule {
            MinAlignment::Headroom => align_min(observed_min, step),
            MinAlignment::Floor => align_min_floor(observed_min, step),
        };
    }
    if !ticks.override_value_max {
        ticks.value_max = align_max(observed_max, step);
    }
}

/// Aligns the lower bound to a multiple of `step` at or below `min`.
///
/// When `min` sits in the lower half of its interval (or exactly on a grid
/// line) the bound drops one extra interval, leaving at least half an
/// interval of headroom under the data. `%` keeps the dividend's sign, so
/// negative values align downward too.
fn align_min(min: f64, step: f64) -> f64 {
    let rem = min % step;
    if rem / step > 0.5 {
        min - rem
    } else {
        min - (step + rem)
    }
}

/// Greatest multiple of `step` at or below `min`.
fn align_min_floor(min: f64, step: f64) -> f64 {
    let aligned = (min / step).floor() * step;
    // `min / step` can round up onto the next grid line.
    if aligned > min { aligned - step } else { aligned }
}

/// First multiple of `step` strictly above `max`.
fn align_max(max: f64, step: f64) -> f64 {
    let mut aligned = (max / step).floor() * step;
    // `max / step` can round down across a whole step.
    for _ in 0..2 {
        if aligned > max {
            break;
        }
        aligned += step;
    }
    aligned
}

fn whole_interval_count(span: f64, step: f64) -> usize {
    if !span.is_finite() || !step.is_finite() || step <= 0.0 || span <= 0.0 {
        return 0;
    }
    let ratio = span / step;
    (ratio + ratio.max(1.0) * TICK_COUNT_EPSILON).floor() as usize
}

#[cfg(test)]
mod tests {
    use super::{align_max, align_min, align_min_floor, whole_interval_count};

    #[test]
    fn align_min_keeps_half_interval_headroom() {
        assert_eq!(align_min(17.0, 10.0), 10.0);
        assert_eq!(align_min(13.0, 10.0), 0.0);
        assert_eq!(align_min(10.0, 10.0), 0.0);
        assert_eq!(align_min(15.0, 10.0), 0.0);
    }

    #[test]
    fn align_min_handles_negative_values() {
        assert_eq!(align_min(-3.0, 10.0), -10.0);
        assert_eq!(align_min(-7.0, 10.0), -10.0);
        assert_eq!(align_min(-10.0, 10.0), -20.0);
    }

    #[test]
    fn floor_alignment_lands_on_or_below_min() {
        assert_eq!(align_min_floor(10.0, 10.0), 10.0);
        assert_eq!(align_min_floor(17.0, 10.0), 10.0);
        assert_eq!(align_min_floor(-3.0, 10.0), -10.0);
        assert!(align_min_floor(0.3, 0.1) <= 0.3);
    }

    #[test]
    fn align_max_is_strictly_above() {
        assert_eq!(align_max(50.0, 10.0), 60.0);
        assert_eq!(align_max(25.0, 10.0), 30.0);
        assert_eq!(align_max(-5.0, 10.0), 0.0);
    }

    #[test]
    fn interval_count_tolerates_rounding_noise() {
        assert_eq!(whole_interval_count(0.6 - 1e-15, 0.1), 6);
        assert_eq!(whole_interval_count(100.0, 30.0), 3);
        assert_eq!(whole_interval_count(0.0, 10.0), 0);
    }
}
