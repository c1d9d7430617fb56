//! Signal strength icon

use crate::markup::Element;

const LIT: &str = "#000000";
const UNLIT: &str = "#DDDDDD";

/// Every arc lights once the signal is strictly above its threshold, weakest first
pub const ARC_THRESHOLDS_DBM: [i32; 3] = [-80, -70, -67];

/// Auth mode of networks without encryption
pub const OPEN_AUTH_MODE: &str = "OPEN";

const ARC_PATHS: [&str; 3] = [
    "M 14.75,55.00 A 20,20 0 0 1 29.05,60.77 20,20 0 0 1 35,75",
    "M 14.63,45.00 A 30,30 0 0 1 36.0,53.66 30,30 0 0 1 45,75",
    "M 14.504453,35.00307 A 40,40 0 0 1 43.108523,46.541066 40,40 0 0 1 55,75",
];

pub fn arcs_lit(rssi: i32) -> [bool; 3] {
    ARC_THRESHOLDS_DBM.map(|threshold| rssi > threshold)
}

/// Render the wifi icon for a signal of `rssi` dBm
///
/// A lock is drawn for every `auth_mode` other than [`OPEN_AUTH_MODE`].
pub fn render_icon(width: u32, height: u32, rssi: i32, auth_mode: &str) -> Element {
    let arcs = arcs_lit(rssi)
        .into_iter()
        .zip(ARC_PATHS)
        .map(|(lit, path)| {
            let color = if lit { LIT } else { UNLIT };
            Element::new("path")
                .attr("style", format!("fill:none;stroke:{color};stroke-width:6"))
                .attr("d", path)
        });

    let mut glyph = Element::new("g")
        .child(
            Element::new("circle")
                .attr("style", format!("fill:{LIT};stroke:{LIT};stroke-width:1.5"))
                .attr("cx", "18.5")
                .attr("cy", "72")
                .attr("r", "7"),
        )
        .children(arcs);

    if auth_mode != OPEN_AUTH_MODE {
        glyph = glyph
            .child(
                Element::new("rect")
                    .attr("style", format!("fill:{LIT};stroke:{LIT};stroke-width:1"))
                    .attr("width", "20")
                    .attr("height", "14")
                    .attr("x", "51")
                    .attr("y", "32"),
            )
            .child(
                Element::new("ellipse")
                    .attr("style", format!("fill:none;stroke:{LIT};stroke-width:3"))
                    .attr("cx", "61")
                    .attr("cy", "31")
                    .attr("rx", "7.5")
                    .attr("ry", "9"),
            );
    }

    Element::new("svg")
        .attr("xmlns", "http://www.w3.org/2000/svg")
        .attr("width", width.to_string())
        .attr("height", height.to_string())
        .attr("viewBox", "0 -20 100 100")
        .attr("class", "wifi-icon")
        .child(glyph)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_arcs(icon: &Element) -> usize {
        icon.descendants()
            .iter()
            .filter(|e| e.tag() == "path")
            .filter(|e| e.attribute("style").is_some_and(|s| s.contains(LIT)))
            .count()
    }

    fn has_lock(icon: &Element) -> bool {
        icon.descendants()
            .iter()
            .any(|e| matches!(e.tag(), "rect" | "ellipse"))
    }

    #[test]
    fn strong_protected_signal_lights_everything_with_lock() {
        let icon = render_icon(100, 100, -65, "WPA2");
        assert_eq!(lit_arcs(&icon), 3);
        assert!(has_lock(&icon));
    }

    #[test]
    fn weak_open_signal_lights_nothing_without_lock() {
        let icon = render_icon(100, 100, -85, "OPEN");
        assert_eq!(lit_arcs(&icon), 0);
        assert!(!has_lock(&icon));
    }

    #[test]
    fn thresholds_are_strict() {
        assert_eq!(arcs_lit(-80), [false, false, false]);
        assert_eq!(arcs_lit(-79), [true, false, false]);
        assert_eq!(arcs_lit(-70), [true, false, false]);
        assert_eq!(arcs_lit(-69), [true, true, false]);
        assert_eq!(arcs_lit(-67), [true, true, false]);
        assert_eq!(arcs_lit(-66), [true, true, true]);
    }

    #[test]
    fn unknown_auth_mode_gets_lock() {
        assert!(has_lock(&render_icon(32, 32, -50, "??")));
    }

    #[test]
    fn svg_carries_size_and_view_box() {
        let svg = render_icon(48, 24, -60, "OPEN").to_string();
        assert!(svg.starts_with(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="48" height="24" viewBox="0 -20 100 100""#
        ));
        assert!(svg.contains(r#"<circle style="fill:#000000;stroke:#000000;stroke-width:1.5" cx="18.5" cy="72" r="7"/>"#));
        assert!(svg.ends_with("</g></svg>"));
    }
}
