// src/render/channel_groups.rs

/// Semantic groups a channel name can be routed to. The upstream scripts
/// tested names with nested truthy-string conditionals (`if 'Temp' or 'RH' in
/// val`), which always took the branch; here each keyword is an explicit
/// independent predicate, evaluated in a fixed order with first match winning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Current,
    Power,
    Voltage,
    Temp,
    Rh,
    Pressure,
    Pm,
    Gas,
    Co2,
}

/// Ordered (group, substring) predicates; a channel belongs to the first
/// keyword its name contains.
pub const GROUP_KEYWORDS: [(GroupKey, &str); 9] = [
    (GroupKey::Current, "Current"),
    (GroupKey::Power, "Power"),
    (GroupKey::Voltage, "Voltage"),
    (GroupKey::Temp, "Temp"),
    (GroupKey::Rh, "RH"),
    (GroupKey::Pressure, "Pressure"),
    (GroupKey::Pm, "PM"),
    (GroupKey::Gas, "Gas"),
    (GroupKey::Co2, "CO2"),
];

impl GroupKey {
    /// Y-axis label for the group's panel (or panel side).
    pub fn y_label(self) -> &'static str {
        match self {
            GroupKey::Current => "Current (mA)",
            GroupKey::Power => "Power (W)",
            GroupKey::Voltage => "Voltage (V)",
            GroupKey::Temp => "Temp (C)",
            GroupKey::Rh => "RH (%)",
            GroupKey::Pressure => "Pressure (hPa)",
            GroupKey::Pm => "PM Conc (ug/m3)",
            GroupKey::Gas => "BME Gas (ohms)",
            GroupKey::Co2 => "CO2 Conc (PPM)",
        }
    }
}

/// First group whose keyword appears in the channel name, if any.
pub fn classify(channel: &str) -> Option<GroupKey> {
    GROUP_KEYWORDS
        .iter()
        .find(|(_, keyword)| channel.contains(keyword))
        .map(|&(key, _)| key)
}

/// Panel shapes in top-to-bottom figure order. Temperature/RH share one
/// dual-axis panel (Temp owns the left axis, RH the right), as do Gas/CO2
/// (Gas left, CO2 right); this pairing is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    Single(GroupKey),
    Dual { left: GroupKey, right: GroupKey },
}

pub const PANEL_ORDER: [PanelKind; 7] = [
    PanelKind::Single(GroupKey::Current),
    PanelKind::Single(GroupKey::Power),
    PanelKind::Single(GroupKey::Voltage),
    PanelKind::Dual {
        left: GroupKey::Temp,
        right: GroupKey::Rh,
    },
    PanelKind::Single(GroupKey::Pressure),
    PanelKind::Single(GroupKey::Pm),
    PanelKind::Dual {
        left: GroupKey::Gas,
        right: GroupKey::Co2,
    },
];

/// One panel of the figure: which channels (by column index) land on each
/// axis. `right_channels` is empty for single-axis panels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelPlan {
    pub kind: PanelKind,
    pub left_channels: Vec<usize>,
    pub right_channels: Vec<usize>,
}

/// Routes every channel to its panel and drops panels with no matching
/// channel, so units lacking certain sensors never render empty axes.
/// Channels matching no keyword are ignored.
pub fn plan_panels(channels: &[String]) -> Vec<PanelPlan> {
    let classified: Vec<Option<GroupKey>> =
        channels.iter().map(|name| classify(name)).collect();

    let channels_in = |group: GroupKey| -> Vec<usize> {
        classified
            .iter()
            .enumerate()
            .filter(|(_, key)| **key == Some(group))
            .map(|(i, _)| i)
            .collect()
    };

    let mut panels = Vec::new();
    for kind in PANEL_ORDER {
        let plan = match kind {
            PanelKind::Single(group) => PanelPlan {
                kind,
                left_channels: channels_in(group),
                right_channels: Vec::new(),
            },
            PanelKind::Dual { left, right } => PanelPlan {
                kind,
                left_channels: channels_in(left),
                right_channels: channels_in(right),
            },
        };
        if !plan.left_channels.is_empty() || !plan.right_channels.is_empty() {
            panels.push(plan);
        }
    }
    panels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn classify_routes_to_first_matching_keyword() {
        assert_eq!(classify("PA Current"), Some(GroupKey::Current));
        assert_eq!(classify("WIFI Power"), Some(GroupKey::Power));
        assert_eq!(classify("Temp_1"), Some(GroupKey::Temp));
        assert_eq!(classify("RH_2"), Some(GroupKey::Rh));
        assert_eq!(classify("PM2.5"), Some(GroupKey::Pm));
        assert_eq!(classify("CO2"), Some(GroupKey::Co2));
        assert_eq!(classify("Uptime"), None);
    }

    #[test]
    fn current_and_voltage_only_yields_two_panels() {
        let panels = plan_panels(&names(&["PA Current", "PA Voltage", "WIFI Current"]));
        assert_eq!(panels.len(), 2);
        assert_eq!(panels[0].kind, PanelKind::Single(GroupKey::Current));
        assert_eq!(panels[0].left_channels, vec![0, 2]);
        assert_eq!(panels[1].kind, PanelKind::Single(GroupKey::Voltage));
        assert_eq!(panels[1].left_channels, vec![1]);
    }

    #[test]
    fn temp_and_rh_share_a_dual_panel() {
        let panels = plan_panels(&names(&["Temp_1", "RH_1", "Temp_2"]));
        assert_eq!(panels.len(), 1);
        assert_eq!(
            panels[0].kind,
            PanelKind::Dual {
                left: GroupKey::Temp,
                right: GroupKey::Rh
            }
        );
        assert_eq!(panels[0].left_channels, vec![0, 2]);
        assert_eq!(panels[0].right_channels, vec![1]);
    }

    #[test]
    fn dual_panel_appears_with_one_side_populated() {
        let panels = plan_panels(&names(&["Gas Resistance"]));
        assert_eq!(panels.len(), 1);
        assert!(panels[0].right_channels.is_empty());
    }

    #[test]
    fn full_sensor_set_fills_all_seven_panels() {
        let panels = plan_panels(&names(&[
            "PA Current",
            "PA Power",
            "PA Voltage",
            "Temp_1",
            "RH_1",
            "Pressure",
            "PM2.5",
            "Gas",
            "CO2",
        ]));
        assert_eq!(panels.len(), PANEL_ORDER.len());
    }

    #[test]
    fn unmatched_channels_are_ignored() {
        let panels = plan_panels(&names(&["Uptime", "Signal"]));
        assert!(panels.is_empty());
    }
}
