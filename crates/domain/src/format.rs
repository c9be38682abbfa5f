//! Display formatting for power, energy and durations.

/// Format a power value in watts, switching to kilowatts from 1000 W.
#[must_use]
pub fn format_watt(watts: f64) -> String {
    if watts >= 1000.0 {
        format!("{:.2} kW", watts / 1000.0)
    } else {
        format!("{:.0} W", watts.round())
    }
}

/// Format an energy value in watt-hours, switching to kilowatt-hours from
/// 1000 Wh.
#[must_use]
pub fn format_watt_h(watt_hours: f64) -> String {
    if watt_hours >= 1000.0 {
        format!("{:.2} kWh", watt_hours / 1000.0)
    } else {
        format!("{:.0} Wh", watt_hours.round())
    }
}

/// Format an elapsed running time given in seconds.
#[must_use]
pub fn format_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{hours} h {minutes} min")
    } else {
        format!("{minutes} min")
    }
}
