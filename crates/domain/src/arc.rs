//! Arc layout of the power meter donut.
//!
//! Angles are in radians, measured clockwise from 12 o'clock. The supply arc
//! runs counter-clockwise down the left half, the usage arc mirrors it down
//! the right half. Both leave [`CIRCLE_GAP`] free at the 12 and 6 o'clock
//! seams.

use std::f64::consts::PI;

use serde::Serialize;

use crate::power::PowerSummaryEntry;
use crate::theme::ColorToken;

/// Side length of the square view box.
pub const VIEW_SIZE: f64 = 500.0;
/// Space between the donut and the view box edge.
pub const MARGIN: f64 = 20.0;
pub const OUTER_RADIUS: f64 = VIEW_SIZE / 2.0 - MARGIN;
pub const INNER_RADIUS: f64 = OUTER_RADIUS / 6.0 * 5.0;
pub const CORNER_RADIUS: f64 = 1.0;
/// Angular margin left free at each seam.
pub const CIRCLE_GAP: f64 = PI / 40.0;

/// Which half of the donut an arc occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArcSide {
    /// Left half, where the power comes from.
    Supply,
    /// Right half, where the power goes.
    Usage,
}

impl ArcSide {
    #[must_use]
    pub fn start_angle(self) -> f64 {
        match self {
            Self::Supply => -CIRCLE_GAP,
            Self::Usage => CIRCLE_GAP,
        }
    }

    #[must_use]
    pub fn end_angle(self) -> f64 {
        match self {
            Self::Supply => -(PI - CIRCLE_GAP),
            Self::Usage => PI - CIRCLE_GAP,
        }
    }

    /// Angle covered by a completely filled arc.
    #[must_use]
    pub fn sweep(self) -> f64 {
        (self.end_angle() - self.start_angle()).abs()
    }
}

/// Synthetic segment padding an arc up to the configured maximum.
#[derive(Debug, Clone, PartialEq)]
pub struct Filler {
    pub power: f64,
    pub color: ColorToken,
}

/// One wedge of the donut.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArcSegment {
    /// Category name, `None` for the filler.
    pub name: Option<String>,
    pub power: f64,
    pub color: ColorToken,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl ArcSegment {
    /// Angle covered by the segment.
    #[must_use]
    pub fn span(&self) -> f64 {
        (self.end_angle - self.start_angle).abs()
    }

    #[must_use]
    pub fn is_filler(&self) -> bool {
        self.name.is_none()
    }
}

/// Segments of one half of the donut, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArcLayout {
    pub side: ArcSide,
    pub segments: Vec<ArcSegment>,
}

impl ArcLayout {
    /// Lay out `entries` (and an optional trailing `filler`) on `side`.
    ///
    /// Segments keep the input order. Each one spans a share of the half
    /// proportional to its power; when every value is zero all segments
    /// collapse onto the start angle.
    pub fn new<'a>(
        side: ArcSide,
        entries: impl IntoIterator<Item = &'a PowerSummaryEntry>,
        filler: Option<&Filler>,
    ) -> Self {
        let mut values: Vec<(Option<String>, f64, ColorToken)> = entries
            .into_iter()
            .map(|entry| (Some(entry.name.clone()), entry.power.max(0.0), entry.color.clone()))
            .collect();
        if let Some(filler) = filler {
            values.push((None, filler.power.max(0.0), filler.color.clone()));
        }

        let total: f64 = values.iter().map(|(_, power, _)| power).sum();
        let sweep = side.end_angle() - side.start_angle();
        let scale = if total > 0.0 { sweep / total } else { 0.0 };

        let mut cursor = side.start_angle();
        let segments = values
            .into_iter()
            .map(|(name, power, color)| {
                let start_angle = cursor;
                cursor += power * scale;
                ArcSegment {
                    name,
                    power,
                    color,
                    start_angle,
                    end_angle: cursor,
                }
            })
            .collect();

        Self { side, segments }
    }

    /// Sum of all segment spans.
    #[must_use]
    pub fn total_span(&self) -> f64 {
        self.segments.iter().map(ArcSegment::span).sum()
    }

    /// The filler segment, if one was laid out.
    #[must_use]
    pub fn filler(&self) -> Option<&ArcSegment> {
        self.segments.iter().find(|segment| segment.is_filler())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn entries(powers: &[f64]) -> Vec<PowerSummaryEntry> {
        powers
            .iter()
            .enumerate()
            .map(|(i, power)| PowerSummaryEntry::new(format!("e{i}"), *power, "white"))
            .collect()
    }

    #[test]
    fn should_fill_half_minus_gap_when_total_is_positive() {
        let entries = entries(&[1500.0, 200.0, 300.0]);
        for side in [ArcSide::Supply, ArcSide::Usage] {
            let layout = ArcLayout::new(side, &entries, None);
            assert!((layout.total_span() - (PI - 2.0 * CIRCLE_GAP)).abs() < EPS);
        }
    }

    #[test]
    fn should_keep_input_order() {
        let entries = entries(&[100.0, 900.0, 0.0, 500.0]);
        let layout = ArcLayout::new(ArcSide::Usage, &entries, None);
        let names: Vec<_> = layout
            .segments
            .iter()
            .map(|s| s.name.clone().unwrap())
            .collect();
        assert_eq!(names, ["e0", "e1", "e2", "e3"]);
        for pair in layout.segments.windows(2) {
            assert!((pair[0].end_angle - pair[1].start_angle).abs() < EPS);
        }
    }

    #[test]
    fn should_split_proportionally_to_power() {
        let entries = entries(&[300.0, 100.0]);
        let layout = ArcLayout::new(ArcSide::Usage, &entries, None);
        let ratio = layout.segments[0].span() / layout.segments[1].span();
        assert!((ratio - 3.0).abs() < EPS);
    }

    #[test]
    fn should_mirror_supply_and_usage() {
        let entries = entries(&[700.0, 300.0]);
        let supply = ArcLayout::new(ArcSide::Supply, &entries, None);
        let usage = ArcLayout::new(ArcSide::Usage, &entries, None);
        for (s, u) in supply.segments.iter().zip(&usage.segments) {
            assert!((s.start_angle + u.start_angle).abs() < EPS);
            assert!((s.end_angle + u.end_angle).abs() < EPS);
        }
    }

    #[test]
    fn should_stay_inside_left_half_for_supply() {
        let entries = entries(&[1.0, 2.0, 3.0]);
        let layout = ArcLayout::new(ArcSide::Supply, &entries, None);
        for segment in &layout.segments {
            assert!(segment.start_angle <= -CIRCLE_GAP + EPS);
            assert!(segment.end_angle >= -(PI - CIRCLE_GAP) - EPS);
        }
    }

    #[test]
    fn should_append_filler_last() {
        let entries = entries(&[1500.0, 0.0, 0.0]);
        let filler = Filler {
            power: 2500.0,
            color: ColorToken::new("black"),
        };
        let layout = ArcLayout::new(ArcSide::Supply, &entries, Some(&filler));
        let last = layout.segments.last().unwrap();
        assert!(last.is_filler());
        assert!((last.power - 2500.0).abs() < EPS);
        let share = layout.segments[0].span() / layout.total_span();
        assert!((share - 1500.0 / 4000.0).abs() < EPS);
    }

    #[test]
    fn should_collapse_segments_when_total_is_zero() {
        let entries = entries(&[0.0, 0.0]);
        let layout = ArcLayout::new(ArcSide::Usage, &entries, None);
        assert!(layout.total_span().abs() < EPS);
        assert!(layout.filler().is_none());
    }
}
