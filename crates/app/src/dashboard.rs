//! Dashboard: both widgets of the energy page behind one handle.

use powerhub_domain::command::DeviceCommand;
use powerhub_domain::error::PowerHubError;
use powerhub_domain::theme::Theme;

use crate::ports::{
    CommandPublisher, DeviceTableCanvas, PowerMeterCanvas, PreferenceStore, SnapshotSource,
};
use crate::views::device_list::DeviceListView;
use crate::views::power_meter::PowerMeterView;

/// Power meter and device list sharing one snapshot source.
///
/// Driving adapters forward ticks and clicks here; every user action ends
/// with a redraw of the affected widget.
pub struct Dashboard<M, T, S, P, C> {
    power_meter: PowerMeterView<M, S, P>,
    device_list: DeviceListView<T, S, C>,
}

impl<M, T, S, P, C> Dashboard<M, T, S, P, C>
where
    M: PowerMeterCanvas,
    T: DeviceTableCanvas,
    S: SnapshotSource + Clone,
    P: PreferenceStore,
    C: CommandPublisher,
{
    pub fn new(
        meter_canvas: M,
        table_canvas: T,
        source: S,
        store: P,
        publisher: C,
        theme: Theme,
    ) -> Self {
        Self {
            power_meter: PowerMeterView::init(meter_canvas, source.clone(), store, theme),
            device_list: DeviceListView::init(table_canvas, source, publisher),
        }
    }

    #[must_use]
    pub fn power_meter(&self) -> &PowerMeterView<M, S, P> {
        &self.power_meter
    }

    #[must_use]
    pub fn device_list(&self) -> &DeviceListView<T, S, C> {
        &self.device_list
    }

    /// Redraw both widgets from the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns the preference store's error when a raised maximum could not
    /// be persisted. Both widgets are drawn either way.
    pub async fn update(&mut self) -> Result<(), PowerHubError> {
        self.device_list.update();
        self.power_meter.update().await
    }

    /// # Errors
    ///
    /// See [`PowerMeterView::toggle_mode`].
    pub async fn toggle_mode(&mut self) -> Result<(), PowerHubError> {
        self.power_meter.toggle_mode().await
    }

    /// # Errors
    ///
    /// See [`PowerMeterView::reset`].
    pub async fn reset(&mut self) -> Result<(), PowerHubError> {
        self.power_meter.reset().await
    }

    /// # Errors
    ///
    /// See [`PowerMeterView::set_max_power`].
    pub async fn set_max_power(&mut self, max_power: f64) -> Result<(), PowerHubError> {
        self.power_meter.set_max_power(max_power).await
    }

    /// # Errors
    ///
    /// See [`DeviceListView::device_clicked`].
    pub async fn device_clicked(
        &mut self,
        index: usize,
    ) -> Result<Option<DeviceCommand>, PowerHubError> {
        self.device_list.device_clicked(index).await
    }

    /// # Errors
    ///
    /// See [`DeviceListView::mode_clicked`].
    pub async fn mode_clicked(
        &mut self,
        index: usize,
    ) -> Result<Option<DeviceCommand>, PowerHubError> {
        self.device_list.mode_clicked(index).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::{Arc, Mutex};

    use powerhub_domain::arc::ArcLayout;
    use powerhub_domain::smart_home::SmartHomeDevice;
    use powerhub_domain::snapshot::EnergySnapshot;
    use powerhub_domain::theme::ColorToken;

    use crate::snapshot_store::InProcessSnapshotStore;
    use crate::views::device_list::DeviceRow;
    use crate::views::power_meter::Label;

    #[derive(Default)]
    struct MeterCanvas {
        arcs: usize,
        labels: Vec<String>,
    }

    impl PowerMeterCanvas for MeterCanvas {
        fn clear(&mut self) {
            self.arcs = 0;
            self.labels.clear();
        }

        fn draw_arc(&mut self, _arc: &ArcLayout) {
            self.arcs += 1;
        }

        fn draw_label(&mut self, label: &Label) {
            self.labels.push(label.text.clone());
        }

        fn draw_reset_control(&mut self, label: &Label) {
            self.labels.push(label.text.clone());
        }
    }

    #[derive(Default)]
    struct TableCanvas {
        visible: bool,
        rows: Vec<DeviceRow>,
    }

    impl DeviceTableCanvas for TableCanvas {
        fn clear(&mut self) {
            self.rows.clear();
        }

        fn set_visible(&mut self, visible: bool) {
            self.visible = visible;
        }

        fn draw_header(&mut self, _headers: &[&str]) {}

        fn draw_row(&mut self, row: &DeviceRow) {
            self.rows.push(row.clone());
        }
    }

    #[derive(Default)]
    struct Outbox(Mutex<Vec<String>>);

    impl CommandPublisher for Outbox {
        fn publish(
            &self,
            topic: &str,
            payload: &str,
        ) -> impl Future<Output = Result<(), PowerHubError>> + Send {
            self.0.lock().unwrap().push(format!("{topic}={payload}"));
            async { Ok(()) }
        }
    }

    type TestDashboard = Dashboard<
        MeterCanvas,
        TableCanvas,
        Arc<InProcessSnapshotStore>,
        Arc<InProcessSnapshotStore>,
        Arc<Outbox>,
    >;

    fn dashboard() -> (TestDashboard, Arc<InProcessSnapshotStore>, Arc<Outbox>) {
        let theme = Theme::default();
        let mut snapshot = EnergySnapshot::empty(&theme);
        snapshot.source.pv.power = 2000.0;
        snapshot.usage.house.power = 2000.0;
        snapshot.devices = vec![SmartHomeDevice {
            configured: true,
            is_on: false,
            is_automatic: false,
            name: "Pool".to_string(),
            power: 0.0,
            energy: 0.0,
            running_time: 0,
            color: ColorToken::new("#ffa726"),
        }];
        let store = Arc::new(InProcessSnapshotStore::new(snapshot));
        let outbox = Arc::new(Outbox::default());
        let dashboard = Dashboard::new(
            MeterCanvas::default(),
            TableCanvas::default(),
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&outbox),
            theme,
        );
        (dashboard, store, outbox)
    }

    #[tokio::test]
    async fn should_draw_both_widgets() {
        let (mut dashboard, _, _) = dashboard();

        dashboard.update().await.unwrap();

        assert_eq!(dashboard.power_meter().canvas().arcs, 2);
        assert!(dashboard.device_list().canvas().visible);
        assert_eq!(dashboard.device_list().canvas().rows.len(), 1);
    }

    #[tokio::test]
    async fn should_share_preferences_through_snapshot_store() {
        let (mut dashboard, store, _) = dashboard();

        dashboard.toggle_mode().await.unwrap();

        assert!(store.current().preferences.relative_arc_mode);
        assert!(
            dashboard
                .power_meter()
                .canvas()
                .labels
                .iter()
                .any(|text| text == "RESET")
        );
    }

    #[tokio::test]
    async fn should_forward_device_clicks() {
        let (mut dashboard, _, outbox) = dashboard();

        dashboard.device_clicked(0).await.unwrap();

        assert_eq!(
            *outbox.0.lock().unwrap(),
            ["config/set/SmartHome/Device1/device_manual_control=1"]
        );
        assert!(dashboard.device_list().canvas().rows[0].row_locked);
    }
}
