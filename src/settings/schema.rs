//! Settings schema as published by the device on `GET /settings`

use serde::Deserialize;
use serde_valid::Validate;
use std::fmt::{self, Display, Formatter};

/// Response envelope of the settings endpoint: `{ "data": { "groups": [...] } }`
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SettingsEnvelope {
    pub data: Schema,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Schema {
    #[serde(default)]
    pub groups: Vec<Group>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Group {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub settings: Vec<Setting>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Setting {
    pub id: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: SettingKind,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum SettingKind {
    #[serde(rename = "BOOL")]
    Bool { val: bool, def: Option<bool> },
    #[serde(rename = "NUM")]
    Num {
        val: i64,
        def: Option<i64>,
        min: i64,
        max: i64,
    },
    #[serde(rename = "ONEOF")]
    OneOf {
        val: usize,
        def: Option<usize>,
        options: Vec<String>,
    },
    #[serde(rename = "TEXT")]
    Text {
        val: String,
        def: Option<String>,
        len: usize,
    },
    #[serde(rename = "TIME")]
    Time(TimeOfDay),
    #[serde(rename = "DATE")]
    Date(CalendarDate),
    #[serde(rename = "DATETIME")]
    DateTime(DateTime),
    #[serde(rename = "TIMEZONE")]
    Timezone {
        val: String,
        def: Option<String>,
        len: Option<usize>,
    },
    #[serde(rename = "COLOR")]
    Color { val: String },
    /// Any `type` this client does not know; carries no control
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Validate)]
pub struct TimeOfDay {
    #[validate(maximum = 23)]
    pub hh: u32,
    #[validate(maximum = 59)]
    pub mm: u32,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Validate)]
pub struct CalendarDate {
    #[validate(maximum = 9999)]
    pub year: u32,
    #[validate(minimum = 1)]
    #[validate(maximum = 12)]
    pub month: u32,
    #[validate(minimum = 1)]
    #[validate(maximum = 31)]
    pub day: u32,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Validate)]
pub struct DateTime {
    #[validate(maximum = 9999)]
    pub year: u32,
    #[validate(minimum = 1)]
    #[validate(maximum = 12)]
    pub month: u32,
    #[validate(minimum = 1)]
    #[validate(maximum = 31)]
    pub day: u32,
    #[validate(maximum = 23)]
    pub hh: u32,
    #[validate(maximum = 59)]
    pub mm: u32,
}

impl DateTime {
    pub fn date(&self) -> CalendarDate {
        CalendarDate {
            year: self.year,
            month: self.month,
            day: self.day,
        }
    }

    pub fn time(&self) -> TimeOfDay {
        TimeOfDay {
            hh: self.hh,
            mm: self.mm,
        }
    }
}

/// `HH:MM` as expected by `<input type="time">`
impl Display for TimeOfDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hh, self.mm)
    }
}

/// `YYYY-MM-DD` as expected by `<input type="date">`
impl Display for CalendarDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// `YYYY-MM-DDTHH:MM` as expected by `<input type="datetime-local">`
impl Display for DateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}", self.date(), self.time())
    }
}

/// Wire name of a setting: `groupId:settingId`
pub fn control_name(group_id: &str, setting_id: &str) -> String {
    format!("{group_id}:{setting_id}")
}

/// A setting whose fields contradict its declared kind
#[derive(Clone, Debug, PartialEq)]
pub struct Inconsistency {
    pub name: String,
    pub reason: String,
}

impl Display for Inconsistency {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.reason)
    }
}

impl Schema {
    /// Report every setting that is not consistent with its kind
    pub fn check(&self) -> Vec<Inconsistency> {
        self.groups
            .iter()
            .flat_map(|group| {
                group.settings.iter().filter_map(|setting| {
                    setting.kind.check().err().map(|reason| Inconsistency {
                        name: control_name(&group.id, &setting.id),
                        reason,
                    })
                })
            })
            .collect()
    }
}

impl SettingKind {
    fn check(&self) -> Result<(), String> {
        match self {
            SettingKind::Num { val, min, max, .. } => {
                if min > max {
                    return Err(format!("min {min} is greater than max {max}"));
                }
                if val < min || val > max {
                    return Err(format!("value {val} is outside [{min}, {max}]"));
                }
                Ok(())
            }
            SettingKind::OneOf { val, options, .. } => {
                if *val >= options.len() {
                    return Err(format!(
                        "index {val} is out of range for {} options",
                        options.len()
                    ));
                }
                Ok(())
            }
            SettingKind::Text { val, len, .. } => {
                if val.chars().count() > *len {
                    return Err(format!("value is longer than {len} characters"));
                }
                Ok(())
            }
            SettingKind::Time(time) => time.validate().map_err(|e| e.to_string()),
            SettingKind::Date(date) => date.validate().map_err(|e| e.to_string()),
            SettingKind::DateTime(datetime) => datetime.validate().map_err(|e| e.to_string()),
            SettingKind::Color { val } => {
                if is_hex_color(val) {
                    Ok(())
                } else {
                    Err(format!("{val:?} is not a #rrggbb color"))
                }
            }
            SettingKind::Bool { .. } | SettingKind::Timezone { .. } | SettingKind::Unknown => {
                Ok(())
            }
        }
    }
}

fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
