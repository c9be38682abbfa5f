//! Power meter view: supply and usage donut with labels.
//!
//! Coordinates of labels are relative to the centre of the view box; they are
//! fixed per category rather than derived from the arc angles.

use serde::Serialize;

use powerhub_domain::arc::{ArcLayout, ArcSide, Filler, MARGIN, VIEW_SIZE};
use powerhub_domain::error::PowerHubError;
use powerhub_domain::format::format_watt;
use powerhub_domain::power::PowerSummaryEntry;
use powerhub_domain::preferences::{DisplayPreferences, validate_max_power};
use powerhub_domain::snapshot::EnergySnapshot;
use powerhub_domain::theme::{ColorToken, Theme};

use crate::ports::{PowerMeterCanvas, PreferenceStore, SnapshotSource};

const LABEL_FONT_SIZE: u16 = 22;
const HALF: f64 = VIEW_SIZE / 2.0;

/// Horizontal alignment of a label relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// A text drawn on the power meter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub anchor: TextAnchor,
    pub color: ColorToken,
    pub font_size: u16,
}

impl Label {
    fn new(text: String, (x, y): (f64, f64), anchor: TextAnchor, color: ColorToken) -> Self {
        Self {
            text,
            x,
            y,
            anchor,
            color,
            font_size: LABEL_FONT_SIZE,
        }
    }

    fn with_font_size(mut self, font_size: u16) -> Self {
        self.font_size = font_size;
        self
    }
}

/// Everything drawn by one update of the power meter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerMeterScene {
    pub supply: ArcLayout,
    pub usage: ArcLayout,
    pub labels: Vec<Label>,
    /// Present in relative mode only.
    pub reset: Option<Label>,
    pub preferences: DisplayPreferences,
}

impl PowerMeterScene {
    /// Lay out the meter for `snapshot` with already ratcheted `preferences`.
    #[must_use]
    pub fn layout(
        snapshot: &EnergySnapshot,
        preferences: DisplayPreferences,
        theme: &Theme,
    ) -> Self {
        let filler = preferences.relative_arc_mode.then(|| Filler {
            power: preferences.filler(snapshot.source.total()),
            color: theme.background.clone(),
        });

        let supply = ArcLayout::new(ArcSide::Supply, snapshot.source.entries(), filler.as_ref());
        let usage = ArcLayout::new(ArcSide::Usage, snapshot.usage.entries(), filler.as_ref());

        let mut labels = power_labels(snapshot);
        labels.extend(soc_labels(snapshot));
        labels.extend(summary_labels(snapshot, preferences, theme));

        let reset = preferences.relative_arc_mode.then(|| {
            Label::new(
                "RESET".to_string(),
                (HALF, HALF),
                TextAnchor::End,
                theme.axis.clone(),
            )
            .with_font_size(20)
        });

        Self {
            supply,
            usage,
            labels,
            reset,
            preferences,
        }
    }

    /// Power of the filler segment, zero in absolute mode.
    #[must_use]
    pub fn filler_power(&self) -> f64 {
        self.supply.filler().map_or(0.0, |segment| segment.power)
    }
}

fn power_label(
    entry: &PowerSummaryEntry,
    position: (f64, f64),
    anchor: TextAnchor,
) -> Option<Label> {
    entry.is_labelled().then(|| {
        Label::new(
            format!("{} : {}", entry.name, format_watt(entry.power)),
            position,
            anchor,
            entry.color.clone(),
        )
    })
}

fn power_labels(snapshot: &EnergySnapshot) -> Vec<Label> {
    let corner = (HALF - MARGIN / 4.0, HALF - MARGIN + 15.0);
    let source = &snapshot.source;
    let usage = &snapshot.usage;
    [
        power_label(&source.pv, (0.0, -HALF * 3.0 / 5.0), TextAnchor::Middle),
        power_label(&source.evu_in, (0.0, -HALF * 2.0 / 5.0), TextAnchor::Middle),
        power_label(&source.bat_out, corner, TextAnchor::End),
        power_label(&usage.export, (0.0, -HALF * 2.0 / 5.0), TextAnchor::Middle),
        power_label(&usage.charging, (0.0, HALF / 5.0), TextAnchor::Middle),
        power_label(&usage.devices, (0.0, HALF * 3.0 / 5.0), TextAnchor::Middle),
        power_label(&usage.bat_in, corner, TextAnchor::End),
        power_label(&usage.house, (0.0, HALF * 2.0 / 5.0), TextAnchor::Middle),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn soc_labels(snapshot: &EnergySnapshot) -> Vec<Label> {
    let top = -HALF + MARGIN + 5.0;
    let [left, right] = &snapshot.charge_points;
    let mut labels = Vec::new();

    if let Some(soc) = left.configured_soc() {
        labels.push(Label::new(
            format!("{}: {soc}%", left.name),
            (-HALF - MARGIN / 4.0 + 5.0, top),
            TextAnchor::Start,
            left.color.clone(),
        ));
    }
    if let Some(soc) = right.configured_soc() {
        labels.push(Label::new(
            format!("{}: {soc}%", right.name),
            (HALF + MARGIN / 4.0 - 5.0, top),
            TextAnchor::End,
            right.color.clone(),
        ));
    }
    if snapshot.battery_soc > 0 {
        labels.push(Label::new(
            format!("Speicher: {}%", snapshot.battery_soc),
            (-HALF - MARGIN / 4.0 + 5.0, HALF - MARGIN + 15.0),
            TextAnchor::Start,
            snapshot.usage.bat_in.color.clone(),
        ));
    }
    labels
}

fn summary_labels(
    snapshot: &EnergySnapshot,
    preferences: DisplayPreferences,
    theme: &Theme,
) -> Vec<Label> {
    let consumption = format_watt(snapshot.usage.consumption());
    let white = ColorToken::new("white");

    if preferences.relative_arc_mode {
        vec![
            Label::new(
                format!("Verbrauch: {consumption}"),
                (0.0, 5.0),
                TextAnchor::Middle,
                white,
            ),
            Label::new(
                format!("Max: {}", format_watt(preferences.max_power)),
                (HALF - 42.0, 2.0),
                TextAnchor::Middle,
                theme.axis.clone(),
            )
            .with_font_size(12),
        ]
    } else {
        vec![Label::new(
            format!("Aktueller Verbrauch: {consumption}"),
            (0.0, 0.0),
            TextAnchor::Middle,
            white,
        )]
    }
}

/// The power meter widget bound to its canvas.
pub struct PowerMeterView<C, S, P> {
    canvas: C,
    source: S,
    store: P,
    theme: Theme,
    preferences: DisplayPreferences,
}

impl<C, S, P> PowerMeterView<C, S, P>
where
    C: PowerMeterCanvas,
    S: SnapshotSource,
    P: PreferenceStore,
{
    /// Bind the view to `canvas` and its collaborators.
    ///
    /// The theme is resolved once here; the initial display preferences come
    /// from the current snapshot.
    pub fn init(canvas: C, source: S, store: P, theme: Theme) -> Self {
        let preferences = source.current().preferences;
        Self {
            canvas,
            source,
            store,
            theme,
            preferences,
        }
    }

    #[must_use]
    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    #[must_use]
    pub fn preferences(&self) -> DisplayPreferences {
        self.preferences
    }

    /// Layout for the current snapshot, without touching the canvas or the
    /// stored preferences.
    #[must_use]
    pub fn scene(&self) -> PowerMeterScene {
        let snapshot = self.source.current();
        let mut preferences = self.preferences;
        if preferences.relative_arc_mode {
            preferences.ratchet(snapshot.source.total());
        }
        PowerMeterScene::layout(&snapshot, preferences, &self.theme)
    }

    /// Recompute the display ratio and redraw.
    ///
    /// # Errors
    ///
    /// Returns the store's error when a raised maximum could not be
    /// persisted. The meter is drawn either way.
    #[tracing::instrument(skip(self))]
    pub async fn update(&mut self) -> Result<(), PowerHubError> {
        let snapshot = self.source.current();
        let raised = self.update_display_ratio(&snapshot);
        self.draw(&snapshot);
        if raised {
            tracing::info!(max_power = self.preferences.max_power, "raised maximum power");
            self.persist().await?;
        }
        Ok(())
    }

    /// Flip between absolute and relative arcs, persist, and redraw.
    ///
    /// # Errors
    ///
    /// Returns the store's error if persisting fails.
    #[tracing::instrument(skip(self))]
    pub async fn toggle_mode(&mut self) -> Result<(), PowerHubError> {
        self.preferences.relative_arc_mode = !self.preferences.relative_arc_mode;
        tracing::debug!(relative = self.preferences.relative_arc_mode, "toggled arc mode");
        self.persist().await?;
        self.update().await
    }

    /// Shrink the relative-mode maximum to the current supply total.
    ///
    /// Ignored in absolute mode, where the reset control is not shown.
    ///
    /// # Errors
    ///
    /// Returns the store's error if persisting fails.
    #[tracing::instrument(skip(self))]
    pub async fn reset(&mut self) -> Result<(), PowerHubError> {
        if !self.preferences.relative_arc_mode {
            tracing::debug!("reset ignored in absolute mode");
            return Ok(());
        }
        self.preferences.max_power = self.source.current().source.total();
        self.persist().await?;
        self.update().await
    }

    /// Configure the relative-mode maximum.
    ///
    /// # Errors
    ///
    /// Returns [`PowerHubError::Validation`] for a negative or non-finite
    /// value, or the store's error if persisting fails.
    #[tracing::instrument(skip(self))]
    pub async fn set_max_power(&mut self, max_power: f64) -> Result<(), PowerHubError> {
        validate_max_power(max_power)?;
        self.preferences.max_power = max_power;
        self.persist().await?;
        self.update().await
    }

    /// Apply the max-power ratchet. Returns `true` when the maximum was raised.
    fn update_display_ratio(&mut self, snapshot: &EnergySnapshot) -> bool {
        self.preferences.relative_arc_mode && self.preferences.ratchet(snapshot.source.total())
    }

    fn draw(&mut self, snapshot: &EnergySnapshot) {
        let scene = PowerMeterScene::layout(snapshot, self.preferences, &self.theme);
        self.canvas.clear();
        self.canvas.draw_arc(&scene.supply);
        self.canvas.draw_arc(&scene.usage);
        for label in &scene.labels {
            self.canvas.draw_label(label);
        }
        if let Some(reset) = &scene.reset {
            self.canvas.draw_reset_control(reset);
        }
    }

    async fn persist(&self) -> Result<(), PowerHubError> {
        self.store.save(self.preferences).await.inspect_err(|err| {
            tracing::warn!(error = %err, "failed to persist display preferences");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::{Arc, Mutex};

    use powerhub_domain::arc::CIRCLE_GAP;
    use powerhub_domain::theme::Theme;

    const EPS: f64 = 1e-9;

    struct FixedSource(Mutex<Arc<EnergySnapshot>>);

    impl FixedSource {
        fn new(snapshot: EnergySnapshot) -> Arc<Self> {
            Arc::new(Self(Mutex::new(Arc::new(snapshot))))
        }

        fn set(&self, snapshot: EnergySnapshot) {
            *self.0.lock().unwrap() = Arc::new(snapshot);
        }
    }

    impl SnapshotSource for FixedSource {
        fn current(&self) -> Arc<EnergySnapshot> {
            Arc::clone(&self.0.lock().unwrap())
        }
    }

    #[derive(Default)]
    struct RecordingStore {
        saved: Mutex<Vec<DisplayPreferences>>,
    }

    impl PreferenceStore for RecordingStore {
        fn load(
            &self,
        ) -> impl Future<Output = Result<Option<DisplayPreferences>, PowerHubError>> + Send
        {
            let last = self.saved.lock().unwrap().last().copied();
            async move { Ok(last) }
        }

        fn save(
            &self,
            preferences: DisplayPreferences,
        ) -> impl Future<Output = Result<(), PowerHubError>> + Send {
            self.saved.lock().unwrap().push(preferences);
            async { Ok(()) }
        }
    }

    #[derive(Debug, Default, PartialEq)]
    struct RecordingCanvas {
        clears: usize,
        arcs: Vec<ArcLayout>,
        labels: Vec<Label>,
        reset: Option<Label>,
    }

    impl PowerMeterCanvas for RecordingCanvas {
        fn clear(&mut self) {
            self.clears += 1;
            self.arcs.clear();
            self.labels.clear();
            self.reset = None;
        }

        fn draw_arc(&mut self, arc: &ArcLayout) {
            self.arcs.push(arc.clone());
        }

        fn draw_label(&mut self, label: &Label) {
            self.labels.push(label.clone());
        }

        fn draw_reset_control(&mut self, label: &Label) {
            self.reset = Some(label.clone());
        }
    }

    type TestView = PowerMeterView<RecordingCanvas, Arc<FixedSource>, Arc<RecordingStore>>;

    fn snapshot(pv: f64, evu_in: f64, bat_out: f64) -> EnergySnapshot {
        let mut snapshot = EnergySnapshot::empty(&Theme::default());
        snapshot.source.pv.power = pv;
        snapshot.source.evu_in.power = evu_in;
        snapshot.source.bat_out.power = bat_out;
        snapshot.usage.house.power = pv + evu_in + bat_out;
        snapshot
    }

    fn view_with(
        snapshot: EnergySnapshot,
        relative: bool,
        max_power: f64,
    ) -> (TestView, Arc<FixedSource>, Arc<RecordingStore>) {
        let mut snapshot = snapshot;
        snapshot.preferences = DisplayPreferences {
            relative_arc_mode: relative,
            max_power,
        };
        let source = FixedSource::new(snapshot);
        let store = Arc::new(RecordingStore::default());
        let view = PowerMeterView::init(
            RecordingCanvas::default(),
            Arc::clone(&source),
            Arc::clone(&store),
            Theme::default(),
        );
        (view, source, store)
    }

    fn text_of(canvas: &RecordingCanvas) -> Vec<&str> {
        canvas.labels.iter().map(|l| l.text.as_str()).collect()
    }

    #[tokio::test]
    async fn should_pad_relative_arc_with_filler() {
        let (mut view, _, store) = view_with(snapshot(1500.0, 0.0, 0.0), true, 4000.0);

        view.update().await.unwrap();

        let supply = &view.canvas().arcs[0];
        let filler = supply.filler().unwrap();
        assert!((filler.power - 2500.0).abs() < EPS);
        assert!(store.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_fill_half_circle_in_both_modes() {
        for relative in [false, true] {
            let (mut view, _, _) = view_with(snapshot(1000.0, 500.0, 250.0), relative, 4000.0);
            view.update().await.unwrap();
            for arc in &view.canvas().arcs {
                assert!((arc.total_span() - (std::f64::consts::PI - 2.0 * CIRCLE_GAP)).abs() < EPS);
            }
        }
    }

    #[tokio::test]
    async fn should_not_add_filler_in_absolute_mode() {
        let (mut view, _, _) = view_with(snapshot(1500.0, 0.0, 0.0), false, 4000.0);
        view.update().await.unwrap();
        assert!(view.canvas().arcs.iter().all(|arc| arc.filler().is_none()));
        assert!(view.canvas().reset.is_none());
    }

    #[tokio::test]
    async fn should_raise_and_persist_max_power_when_exceeded() {
        let (mut view, _, store) = view_with(snapshot(3000.0, 2000.0, 0.0), true, 4000.0);

        view.update().await.unwrap();

        assert!((view.preferences().max_power - 5000.0).abs() < EPS);
        assert!(view.canvas().arcs[0].filler().unwrap().power.abs() < EPS);
        let saved = store.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert!((saved[0].max_power - 5000.0).abs() < EPS);
    }

    #[tokio::test]
    async fn should_be_idempotent_on_repeated_updates() {
        let (mut view, _, store) = view_with(snapshot(3000.0, 2000.0, 0.0), true, 4000.0);

        view.update().await.unwrap();
        let first = view.scene();
        view.update().await.unwrap();

        assert_eq!(view.scene(), first);
        assert_eq!(store.saved.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_never_shrink_max_power_on_update() {
        let (mut view, source, _) = view_with(snapshot(3000.0, 2000.0, 0.0), true, 4000.0);
        view.update().await.unwrap();

        source.set(snapshot(100.0, 0.0, 0.0));
        view.update().await.unwrap();

        assert!((view.preferences().max_power - 5000.0).abs() < EPS);
        assert!((view.canvas().arcs[0].filler().unwrap().power - 4900.0).abs() < EPS);
    }

    #[tokio::test]
    async fn should_restore_layout_after_double_toggle() {
        let (mut view, _, store) = view_with(snapshot(1200.0, 300.0, 0.0), false, 4000.0);
        view.update().await.unwrap();
        let before = view.scene();

        view.toggle_mode().await.unwrap();
        assert!(view.preferences().relative_arc_mode);
        assert!(view.canvas().reset.is_some());

        view.toggle_mode().await.unwrap();
        assert_eq!(view.scene(), before);
        assert_eq!(store.saved.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn should_reset_max_power_to_current_total() {
        let (mut view, _, store) = view_with(snapshot(1500.0, 500.0, 0.0), true, 8000.0);

        view.reset().await.unwrap();

        assert!((view.preferences().max_power - 2000.0).abs() < EPS);
        assert!(view.canvas().arcs[0].filler().unwrap().power.abs() < EPS);
        assert_eq!(store.saved.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_ignore_reset_in_absolute_mode() {
        let (mut view, _, store) = view_with(snapshot(1500.0, 500.0, 0.0), false, 8000.0);

        view.reset().await.unwrap();

        assert!((view.preferences().max_power - 8000.0).abs() < EPS);
        assert!(store.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_reject_negative_max_power() {
        let (mut view, _, store) = view_with(snapshot(0.0, 0.0, 0.0), true, 4000.0);

        let result = view.set_max_power(-1.0).await;

        assert!(matches!(result, Err(PowerHubError::Validation(_))));
        assert!(store.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_persist_configured_max_power() {
        let (mut view, _, store) = view_with(snapshot(1000.0, 0.0, 0.0), true, 4000.0);

        view.set_max_power(10_000.0).await.unwrap();

        assert!((view.canvas().arcs[0].filler().unwrap().power - 9000.0).abs() < EPS);
        assert!((store.saved.lock().unwrap()[0].max_power - 10_000.0).abs() < EPS);
    }

    #[tokio::test]
    async fn should_label_only_positive_entries() {
        let (mut view, _, _) = view_with(snapshot(1500.0, 0.0, 0.0), false, 4000.0);
        view.update().await.unwrap();

        let texts = text_of(view.canvas());
        assert!(texts.contains(&"PV : 1.50 kW"));
        assert!(texts.contains(&"Haus : 1.50 kW"));
        assert!(!texts.iter().any(|t| t.starts_with("Netz")));
    }

    #[tokio::test]
    async fn should_sum_consumption_from_fixed_categories() {
        let mut snap = snapshot(0.0, 0.0, 0.0);
        snap.usage.house.power = 400.0;
        snap.usage.charging.power = 300.0;
        snap.usage.devices.power = 200.0;
        snap.usage.bat_in.power = 100.0;
        snap.usage.export.power = 5000.0;
        let (mut view, _, _) = view_with(snap, false, 4000.0);

        view.update().await.unwrap();

        assert!(text_of(view.canvas()).contains(&"Aktueller Verbrauch: 1.00 kW"));
    }

    #[tokio::test]
    async fn should_show_max_line_in_relative_mode() {
        let (mut view, _, _) = view_with(snapshot(200.0, 0.0, 0.0), true, 4000.0);
        view.update().await.unwrap();

        let texts = text_of(view.canvas());
        assert!(texts.contains(&"Verbrauch: 200 W"));
        assert!(texts.contains(&"Max: 4.00 kW"));
    }

    #[tokio::test]
    async fn should_show_soc_labels_when_configured() {
        let mut snap = snapshot(0.0, 0.0, 0.0);
        snap.charge_points[1].is_soc_configured = true;
        snap.charge_points[1].soc = 64;
        snap.battery_soc = 80;
        let (mut view, _, _) = view_with(snap, false, 4000.0);

        view.update().await.unwrap();

        let texts = text_of(view.canvas());
        assert!(texts.contains(&"LP2: 64%"));
        assert!(texts.contains(&"Speicher: 80%"));
        assert!(!texts.iter().any(|t| t.starts_with("LP1")));
    }

    #[tokio::test]
    async fn should_clear_canvas_before_each_redraw() {
        let (mut view, _, _) = view_with(snapshot(100.0, 0.0, 0.0), false, 4000.0);
        view.update().await.unwrap();
        view.update().await.unwrap();
        assert_eq!(view.canvas().clears, 2);
        assert_eq!(view.canvas().arcs.len(), 2);
    }
}
