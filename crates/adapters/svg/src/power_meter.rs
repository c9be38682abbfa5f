//! Power meter drawn as inline SVG.

use askama::Template;

use powerhub_app::ports::PowerMeterCanvas;
use powerhub_app::views::power_meter::{Label, TextAnchor};
use powerhub_domain::arc::{ArcLayout, CORNER_RADIUS, INNER_RADIUS, OUTER_RADIUS, VIEW_SIZE};

const CENTER: f64 = VIEW_SIZE / 2.0;
const RESET_WIDTH: f64 = 90.0;
const RESET_HEIGHT: f64 = 30.0;
/// Spans below this are invisible and skipped.
const MIN_SPAN: f64 = 1e-6;

#[derive(Debug, Clone)]
struct Sector {
    class: &'static str,
    path: String,
    color: String,
}

#[derive(Debug, Clone)]
struct Text {
    x: String,
    y: String,
    anchor: &'static str,
    color: String,
    font_size: u16,
    text: String,
}

#[derive(Debug, Clone)]
struct ResetControl {
    x: String,
    y: String,
    color: String,
    font_size: u16,
    text: String,
}

/// [`PowerMeterCanvas`] collecting SVG elements for `power_meter.svg`.
///
/// Coordinates received from the view are relative to the centre of the
/// donut; the elements are emitted inside a group translated to the centre
/// of a `500 × 500` view box.
#[derive(Debug, Clone, Template)]
#[template(path = "power_meter.svg")]
pub struct SvgPowerMeter {
    reset_action: String,
    sectors: Vec<Sector>,
    texts: Vec<Text>,
    reset: Option<ResetControl>,
}

impl SvgPowerMeter {
    /// Create an empty meter whose reset control posts to `reset_action`.
    pub fn new(reset_action: impl Into<String>) -> Self {
        Self {
            reset_action: reset_action.into(),
            sectors: Vec::new(),
            texts: Vec::new(),
            reset: None,
        }
    }

    /// The complete `<svg>` element.
    #[must_use]
    pub fn to_markup(&self) -> String {
        self.to_string()
    }
}

/// Geometry read by the template.
#[allow(clippy::unused_self)]
impl SvgPowerMeter {
    fn view_size(&self) -> f64 {
        VIEW_SIZE
    }

    fn center(&self) -> f64 {
        CENTER
    }

    fn stroke_width(&self) -> f64 {
        2.0 * CORNER_RADIUS
    }

    fn reset_width(&self) -> f64 {
        RESET_WIDTH
    }

    fn reset_height(&self) -> f64 {
        RESET_HEIGHT
    }
}

impl Default for SvgPowerMeter {
    fn default() -> Self {
        Self::new("/power-meter/reset")
    }
}

/// Point on a circle of `radius` at `angle` clockwise from 12 o'clock.
fn polar(radius: f64, angle: f64) -> (f64, f64) {
    (radius * angle.sin(), -radius * angle.cos())
}

/// Path of the ring sector between `start` and `end`.
fn sector_path(start: f64, end: f64) -> String {
    let clockwise = end > start;
    let sweep = u8::from(clockwise);
    let back = u8::from(!clockwise);
    let large = u8::from((end - start).abs() > std::f64::consts::PI);
    let (ox0, oy0) = polar(OUTER_RADIUS, start);
    let (ox1, oy1) = polar(OUTER_RADIUS, end);
    let (ix1, iy1) = polar(INNER_RADIUS, end);
    let (ix0, iy0) = polar(INNER_RADIUS, start);
    format!(
        "M{ox0:.2},{oy0:.2}A{OUTER_RADIUS},{OUTER_RADIUS} 0 {large} {sweep} {ox1:.2},{oy1:.2}\
         L{ix1:.2},{iy1:.2}A{INNER_RADIUS:.2},{INNER_RADIUS:.2} 0 {large} {back} {ix0:.2},{iy0:.2}Z"
    )
}

impl PowerMeterCanvas for SvgPowerMeter {
    fn clear(&mut self) {
        self.sectors.clear();
        self.texts.clear();
        self.reset = None;
    }

    fn draw_arc(&mut self, arc: &ArcLayout) {
        let visible = arc
            .segments
            .iter()
            .filter(|segment| segment.span() >= MIN_SPAN)
            .map(|segment| Sector {
                class: if segment.is_filler() {
                    "segment filler"
                } else {
                    "segment"
                },
                path: sector_path(segment.start_angle, segment.end_angle),
                color: segment.color.as_str().to_string(),
            });
        self.sectors.extend(visible);
    }

    fn draw_label(&mut self, label: &Label) {
        self.texts.push(Text {
            x: format!("{:.2}", label.x),
            y: format!("{:.2}", label.y),
            anchor: label.anchor.as_str(),
            color: label.color.as_str().to_string(),
            font_size: label.font_size,
            text: label.text.clone(),
        });
    }

    fn draw_reset_control(&mut self, label: &Label) {
        let left = match label.anchor {
            TextAnchor::Start => label.x,
            TextAnchor::Middle => label.x - RESET_WIDTH / 2.0,
            TextAnchor::End => label.x - RESET_WIDTH,
        };
        self.reset = Some(ResetControl {
            x: format!("{left:.2}"),
            y: format!("{:.2}", label.y - RESET_HEIGHT),
            color: label.color.as_str().to_string(),
            font_size: label.font_size,
            text: label.text.clone(),
        });
    }
}
