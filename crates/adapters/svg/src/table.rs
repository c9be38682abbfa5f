//! Smart-home device table drawn as HTML.

use askama::Template;

use powerhub_app::ports::DeviceTableCanvas;
use powerhub_app::views::device_list::DeviceRow;

#[derive(Debug, Clone)]
struct TableRow {
    index: usize,
    name: String,
    glyph: char,
    state: &'static str,
    color: String,
    consumption: String,
    running_time: String,
    mode: &'static str,
    row_locked: bool,
    toggle_disabled: bool,
    mode_locked: bool,
}

impl From<&DeviceRow> for TableRow {
    fn from(row: &DeviceRow) -> Self {
        Self {
            index: row.index,
            name: row.name.clone(),
            glyph: if row.is_on { '\u{25cf}' } else { '\u{25cb}' },
            state: if row.is_on { "on" } else { "off" },
            color: row.color.as_str().to_string(),
            consumption: row.consumption.clone(),
            running_time: row.running_time.clone(),
            mode: row.mode,
            row_locked: row.row_locked,
            // Automatic devices are switched by the energy manager only.
            toggle_disabled: row.row_locked || row.is_automatic,
            mode_locked: row.mode_locked,
        }
    }
}

/// [`DeviceTableCanvas`] collecting rows for `smart_home.html`.
///
/// Each row carries two forms posting to `{action_base}/{index}/toggle` and
/// `{action_base}/{index}/mode`. Locked controls are rendered `disabled`.
#[derive(Debug, Clone, Template)]
#[template(path = "smart_home.html")]
pub struct HtmlDeviceTable {
    action_base: String,
    visible: bool,
    headers: Vec<String>,
    rows: Vec<TableRow>,
}

impl HtmlDeviceTable {
    pub fn new(action_base: impl Into<String>) -> Self {
        Self {
            action_base: action_base.into().trim_end_matches('/').to_string(),
            visible: false,
            headers: Vec::new(),
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The complete widget; hidden while no device is configured.
    #[must_use]
    pub fn to_markup(&self) -> String {
        self.to_string()
    }
}

impl Default for HtmlDeviceTable {
    fn default() -> Self {
        Self::new("/smart-home")
    }
}

impl DeviceTableCanvas for HtmlDeviceTable {
    fn clear(&mut self) {
        self.headers.clear();
        self.rows.clear();
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn draw_header(&mut self, headers: &[&str]) {
        self.headers.extend(headers.iter().map(|header| (*header).to_string()));
    }

    fn draw_row(&mut self, row: &DeviceRow) {
        self.rows.push(TableRow::from(row));
    }
}
