use crate::config::Bounds;
use crate::models::{DeviceMode, Metric};
use crate::utils::round2;

/// A check run after every successful reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Throttled operator alert when the metric leaves its alert range.
    Alert(Metric),
    /// Relay on-check against the trigger bounds for the metric.
    SwitchOn(Metric),
    /// Relay off-check against the trigger bounds for the metric.
    SwitchOff(Metric),
}

const HEATER_TRIGGERS: [Trigger; 4] = [
    Trigger::Alert(Metric::Temperature),
    Trigger::Alert(Metric::Humidity),
    Trigger::SwitchOn(Metric::Temperature),
    Trigger::SwitchOff(Metric::Temperature),
];

const HUMIDIFIER_TRIGGERS: [Trigger; 4] = [
    Trigger::Alert(Metric::Temperature),
    Trigger::Alert(Metric::Humidity),
    Trigger::SwitchOn(Metric::Humidity),
    Trigger::SwitchOff(Metric::Humidity),
];

/// The fixed, ordered trigger set for a device mode.
pub fn triggers_for(mode: DeviceMode) -> &'static [Trigger] {
    match mode {
        DeviceMode::Heater => &HEATER_TRIGGERS,
        DeviceMode::Humidifier => &HUMIDIFIER_TRIGGERS,
    }
}

/// Alert text when `value` sits on or outside `bounds`.
pub fn alert_message(metric: Metric, value: f32, bounds: Bounds) -> Option<String> {
    let unit = match metric {
        Metric::Temperature => " F",
        Metric::Humidity => "%",
    };
    let direction = if value <= bounds.lower {
        "fallen BELOW"
    } else if value >= bounds.upper {
        "risen ABOVE"
    } else {
        return None;
    };

    Some(format!(
        "{} has {} threshold: {:.2}{}",
        metric.name(),
        direction,
        round2(value),
        unit
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_sets_follow_device_mode() {
        let heater = triggers_for(DeviceMode::Heater);
        assert_eq!(heater[2], Trigger::SwitchOn(Metric::Temperature));
        assert_eq!(heater[3], Trigger::SwitchOff(Metric::Temperature));

        let humidifier = triggers_for(DeviceMode::Humidifier);
        assert_eq!(humidifier[2], Trigger::SwitchOn(Metric::Humidity));
        assert_eq!(&humidifier[..2], &heater[..2]);
    }

    #[test]
    fn alert_messages_include_direction() {
        let bounds = Bounds { lower: 72.0, upper: 80.0 };
        assert_eq!(
            alert_message(Metric::Temperature, 70.0, bounds).as_deref(),
            Some("Temperature has fallen BELOW threshold: 70.00 F")
        );
        assert_eq!(
            alert_message(Metric::Temperature, 80.0, bounds).as_deref(),
            Some("Temperature has risen ABOVE threshold: 80.00 F")
        );
        assert_eq!(alert_message(Metric::Temperature, 75.0, bounds), None);

        let humidity = Bounds { lower: 70.0, upper: 99.0 };
        assert_eq!(
            alert_message(Metric::Humidity, 60.5, humidity).as_deref(),
            Some("Humidity has fallen BELOW threshold: 60.50%")
        );
    }
}
