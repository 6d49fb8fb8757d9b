use serde::Serialize;
use tracing::{debug, warn};

use crate::core::{DataPoint, ValueRange};
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// One named, colored line of the chart.
///
/// A series without a name keeps its slot so color-list indices stay aligned,
/// but is never drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    name: Option<String>,
    points: Vec<DataPoint>,
    color: Option<Color>,
}

impl Series {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Points sorted ascending by `x`.
    #[must_use]
    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    #[must_use]
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    #[must_use]
    pub fn is_drawable(&self) -> bool {
        self.name.is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Immutable result of one data update: sorted series plus global bounds.
///
/// Replaced wholesale on every update; never mutated in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SeriesSet {
    series: Vec<Series>,
    x_range: Option<ValueRange>,
    y_range: Option<ValueRange>,
}

impl SeriesSet {
    /// Normalizes parallel name / point / color lists into sorted series.
    ///
    /// Color strings are resolved before anything else so that one bad color
    /// rejects the whole update. Colors are looked up as
    /// `colors[index % colors.len()]`; a missing entry leaves the series on
    /// the default stroke color. Non-finite points are dropped.
    pub fn ingest(
        names: Vec<Option<String>>,
        raw_points: Vec<Vec<DataPoint>>,
        colors: &[Option<String>],
    ) -> ChartResult<Self> {
        if names.len() != raw_points.len() {
            return Err(ChartError::InvalidData(format!(
                "series name count ({}) does not match point list count ({})",
                names.len(),
                raw_points.len()
            )));
        }

        let parsed_colors = colors
            .iter()
            .map(|entry| entry.as_deref().map(Color::parse).transpose())
            .collect::<ChartResult<Vec<Option<Color>>>>()?;

        let mut x_range: Option<ValueRange> = None;
        let mut y_range: Option<ValueRange> = None;
        let mut series = Vec::with_capacity(names.len());

        for (index, (name, points)) in names.into_iter().zip(raw_points).enumerate() {
            let original_count = points.len();
            let (points, bounds) = canonicalize_points(points);
            if points.len() != original_count {
                warn!(
                    series = index,
                    dropped = original_count - points.len(),
                    "dropped non-finite points"
                );
            }
            if let Some((xs, ys)) = bounds {
                x_range = Some(x_range.map_or(xs, |range| range.union(xs)));
                y_range = Some(y_range.map_or(ys, |range| range.union(ys)));
            }

            let color = if parsed_colors.is_empty() {
                None
            } else {
                parsed_colors[index % parsed_colors.len()]
            };
            series.push(Series {
                name,
                points,
                color,
            });
        }

        debug!(
            series_count = series.len(),
            drawable = series.iter().filter(|s| s.is_drawable()).count(),
            x_range = ?x_range,
            y_range = ?y_range,
            "ingested series"
        );

        Ok(Self {
            series,
            x_range,
            y_range,
        })
    }

    #[must_use]
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    #[must_use]
    pub fn x_range(&self) -> Option<ValueRange> {
        self.x_range
    }

    #[must_use]
    pub fn y_range(&self) -> Option<ValueRange> {
        self.y_range
    }

    /// Length of the longest series, drawable or not.
    #[must_use]
    pub fn max_point_count(&self) -> usize {
        self.series.iter().map(Series::len).max().unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    #[must_use]
    pub fn has_points(&self) -> bool {
        self.x_range.is_some()
    }
}

/// Drops non-finite points, tracks the x/y extent in the same scan, then
/// stable-sorts by `x`. Equal `x` values keep their input order.
fn canonicalize_points(
    mut points: Vec<DataPoint>,
) -> (Vec<DataPoint>, Option<(ValueRange, ValueRange)>) {
    let mut bounds: Option<(ValueRange, ValueRange)> = None;
    points.retain(|point| {
        if !point.is_finite() {
            return false;
        }
        bounds = Some(match bounds {
            None => (ValueRange::single(point.x), ValueRange::single(point.y)),
            Some((xs, ys)) => (xs.include(point.x), ys.include(point.y)),
        });
        true
    });
    points.sort_by(|a, b| a.x.total_cmp(&b.x));
    (points, bounds)
}
