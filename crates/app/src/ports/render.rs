//! Render ports: drawing surfaces the views are bound to.
//!
//! Every update starts with `clear` and redraws the whole widget.

use powerhub_domain::arc::ArcLayout;

use crate::views::device_list::DeviceRow;
use crate::views::power_meter::Label;

/// Drawing surface of the power meter donut.
pub trait PowerMeterCanvas {
    fn clear(&mut self);

    fn draw_arc(&mut self, arc: &ArcLayout);

    fn draw_label(&mut self, label: &Label);

    /// Draw the control resetting the relative-mode maximum.
    fn draw_reset_control(&mut self, label: &Label);
}

/// Drawing surface of the smart-home device table.
pub trait DeviceTableCanvas {
    fn clear(&mut self);

    /// Show or hide the whole widget.
    fn set_visible(&mut self, visible: bool);

    fn draw_header(&mut self, headers: &[&str]);

    fn draw_row(&mut self, row: &DeviceRow);
}
