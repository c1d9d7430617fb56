use super::icon::render_icon;
use crate::markup::Element;
use serde::Deserialize;

/// STA status the device reports while associated with an access point
pub const CONNECTED: &str = "connected";

const NOT_AVAILABLE: &str = "n/a";

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct IpInfo {
    pub ip: String,
    pub netmask: String,
    pub gw: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ApRecord {
    pub bssid: String,
    pub ssid: String,
    pub rssi: i32,
    pub authmode: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ApInfo {
    pub ip_info: Option<IpInfo>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct StaInfo {
    pub status: String,
    pub connection: Option<ApRecord>,
    pub ip_info: Option<IpInfo>,
}

/// Payload of the device `/info` endpoint
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct WifiInfo {
    pub ap: ApInfo,
    pub sta: StaInfo,
}

/// Payload of the device `/scan` endpoint
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ScanResult {
    pub scan: Vec<ApRecord>,
}

/// Last rendered access point and station sections
#[derive(Clone, Debug, PartialEq)]
pub struct StatusPanel {
    pub ap: Element,
    pub sta: Element,
}

impl Default for StatusPanel {
    fn default() -> Self {
        StatusPanel {
            ap: section("wifi-ap", "AP:", Vec::new()),
            sta: section("wifi-sta", "STA:", Vec::new()),
        }
    }
}

impl StatusPanel {
    pub fn from_info(info: &WifiInfo, icon_size: u32) -> Self {
        StatusPanel {
            ap: render_ap(&info.ap),
            sta: render_sta(&info.sta, icon_size),
        }
    }

    pub fn to_element(&self) -> Element {
        Element::new("div")
            .attr("id", "wifi-status")
            .attr("class", "row")
            .child(Element::new("div").attr("class", "column").child(self.ap.clone()))
            .child(Element::new("div").attr("class", "column").child(self.sta.clone()))
    }
}

fn render_ap(ap: &ApInfo) -> Element {
    section("wifi-ap", "AP:", address_lines(ap.ip_info.as_ref()))
}

fn render_sta(sta: &StaInfo, icon_size: u32) -> Element {
    let mut lines = vec![line("status:", &sta.status)];

    let connection = sta
        .connection
        .as_ref()
        .filter(|_| sta.status == CONNECTED);
    if let Some(connection) = connection {
        lines.push(line("SSID:", &connection.ssid));
        lines.push(line("RSSI:", &connection.rssi.to_string()));
        lines.push(line("AUTH:", &connection.authmode));
    }
    lines.push(Element::new("br"));
    lines.extend(address_lines(sta.ip_info.as_ref()));

    let sta_section = section("wifi-sta", "STA:", lines);
    match connection {
        Some(connection) => sta_section.child(render_icon(
            icon_size,
            icon_size,
            connection.rssi,
            &connection.authmode,
        )),
        None => sta_section,
    }
}

fn address_lines(ip_info: Option<&IpInfo>) -> Vec<Element> {
    let (ip, netmask, gw) = match ip_info {
        Some(info) => (info.ip.as_str(), info.netmask.as_str(), info.gw.as_str()),
        None => (NOT_AVAILABLE, NOT_AVAILABLE, NOT_AVAILABLE),
    };
    vec![
        line("address:", ip),
        line("netmask:", netmask),
        line("gateway:", gw),
    ]
}

fn line(label: &str, value: &str) -> Element {
    Element::new("span")
        .text(format!("{label}{value}"))
        .child(Element::new("br"))
}

fn section(id: &'static str, title: &str, lines: Vec<Element>) -> Element {
    Element::new("small")
        .attr("id", id)
        .text(title)
        .child(Element::new("br"))
        .children(lines)
}

/// Table of scanned access points, strongest first
pub fn render_scan(result: &ScanResult, icon_size: u32, connect_path: &str) -> Element {
    let mut records: Vec<&ApRecord> = result.scan.iter().collect();
    records.sort_by(|a, b| b.rssi.cmp(&a.rssi));

    let header = Element::new("tr").children(
        ["", "SSID", "BSSID", "RSSI", "AUTH", ""]
            .into_iter()
            .map(|title| Element::new("th").text(title)),
    );

    let rows = records.into_iter().map(|record| {
        Element::new("tr")
            .child(Element::new("td").child(render_icon(
                icon_size,
                icon_size,
                record.rssi,
                &record.authmode,
            )))
            .child(Element::new("td").text(record.ssid.as_str()))
            .child(Element::new("td").text(record.bssid.as_str()))
            .child(Element::new("td").text(record.rssi.to_string()))
            .child(Element::new("td").text(record.authmode.as_str()))
            .child(Element::new("td").child(connect_form(record, connect_path)))
    });

    Element::new("table")
        .attr("id", "wifi-scan")
        .child(Element::new("thead").child(header))
        .child(Element::new("tbody").children(rows))
}

fn connect_form(record: &ApRecord, connect_path: &str) -> Element {
    let form = Element::new("form")
        .attr("method", "post")
        .attr("action", connect_path)
        .child(
            Element::new("input")
                .attr("type", "hidden")
                .attr("name", "ssid")
                .attr("value", record.ssid.as_str()),
        );

    let form = if record.authmode == super::icon::OPEN_AUTH_MODE {
        form.child(
            Element::new("input")
                .attr("type", "hidden")
                .attr("name", "passwd")
                .attr("value", ""),
        )
    } else {
        form.child(
            Element::new("input")
                .attr("type", "password")
                .attr("name", "passwd")
                .attr("placeholder", "password")
                .attr("maxlength", "64"),
        )
    };

    form.child(
        Element::new("input")
            .attr("type", "submit")
            .attr("value", "connect"),
    )
}
