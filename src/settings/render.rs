//! Schema driven settings form

use super::{
    form::{ControlKind, FormControl, FormSection, FormState, InputType, SelectOption},
    schema::{Schema, Setting, SettingKind, control_name},
};
use crate::markup::Element;
use log::debug;

/// Where the browser posts the edited form
pub const SUBMIT_PATH: &str = "/settings";
pub const DEFAULTS_PATH: &str = "/settings/defaults";
pub const RESTART_PATH: &str = "/settings/restart";

/// Renders a settings [`Schema`] into an editable form
#[derive(Clone, Debug)]
pub struct SettingsForm {
    timezones: Vec<String>,
}

impl SettingsForm {
    /// `timezones` are the IANA zone names offered for `TIMEZONE` settings
    pub fn new(timezones: Vec<String>) -> Self {
        SettingsForm { timezones }
    }

    /// Build the form state for `schema`, one section per group
    pub fn build(&self, schema: &Schema) -> FormState {
        let sections = schema
            .groups
            .iter()
            .map(|group| FormSection {
                label: group.label.clone(),
                controls: group
                    .settings
                    .iter()
                    .filter_map(|setting| self.control(&group.id, setting))
                    .collect(),
            })
            .collect();

        FormState { sections }
    }

    fn control(&self, group_id: &str, setting: &Setting) -> Option<FormControl> {
        let name = control_name(group_id, &setting.id);
        let label = setting.label.as_str();

        let control = match &setting.kind {
            SettingKind::Bool { val, def } => {
                FormControl::new(name, label, ControlKind::Checkbox { checked: *val })
                    .default_hint(def.map(|def| String::from(if def { "on" } else { "off" })))
            }
            SettingKind::Num { val, def, min, max } => {
                FormControl::new(name, label, input(InputType::Number, val))
                    .constraint("min", min)
                    .constraint("max", max)
                    .default_hint(def.map(|def| def.to_string()))
            }
            SettingKind::OneOf { val, def, options } => {
                let hint = def.and_then(|index| options.get(index).cloned());
                let options = options
                    .iter()
                    .enumerate()
                    .map(|(index, option)| SelectOption {
                        value: index.to_string(),
                        label: option.clone(),
                        selected: index == *val,
                    })
                    .collect();
                FormControl::new(
                    name,
                    label,
                    ControlKind::Select {
                        options,
                        multiple: false,
                    },
                )
                .default_hint(hint)
            }
            SettingKind::Text { val, def, len } => {
                FormControl::new(name, label, input(InputType::Text, val))
                    .constraint("maxlength", len)
                    .default_hint(def.clone())
            }
            SettingKind::Time(time) => FormControl::new(name, label, input(InputType::Time, time))
                .constraint("min", "00:00")
                .constraint("max", "23:59"),
            SettingKind::Date(date) => FormControl::new(name, label, input(InputType::Date, date)),
            SettingKind::DateTime(datetime) => {
                FormControl::new(name, label, input(InputType::DateTimeLocal, datetime))
            }
            SettingKind::Timezone { val, def, .. } => FormControl::new(
                name,
                label,
                ControlKind::Select {
                    options: self.timezone_options(val),
                    multiple: false,
                },
            )
            .default_hint(def.clone()),
            SettingKind::Color { val } => {
                FormControl::new(name, label, input(InputType::Color, val))
            }
            SettingKind::Unknown => {
                debug!("skipping setting {name} of unknown type");
                return None;
            }
        };

        Some(control)
    }

    fn timezone_options(&self, current: &str) -> Vec<SelectOption> {
        let option = |zone: &str| SelectOption {
            value: zone.to_string(),
            label: zone.to_string(),
            selected: zone == current,
        };

        let mut options = Vec::with_capacity(self.timezones.len() + 1);
        // keep a zone the list does not know, so that submitting unchanged round-trips it
        if !current.is_empty() && !self.timezones.iter().any(|zone| zone == current) {
            debug!("timezone {current} is not in the configured list");
            options.push(option(current));
        }
        options.extend(self.timezones.iter().map(|zone| option(zone)));
        options
    }

    /// Render `state` as the settings `<form>` including the action buttons
    pub fn render(&self, state: &FormState) -> Element {
        Element::new("form")
            .attr("id", "settings-form")
            .attr("method", "post")
            .attr("action", SUBMIT_PATH)
            .children(state.sections.iter().map(|section| {
                Element::new("fieldset")
                    .child(Element::new("legend").text(section.label.as_str()))
                    .children(section.controls.iter().map(FormControl::to_element))
            }))
            .child(
                Element::new("div")
                    .attr("class", "actions")
                    .child(
                        Element::new("input")
                            .attr("type", "submit")
                            .attr("value", "submit"),
                    )
                    .child(
                        Element::new("a")
                            .attr("class", "button button-outline")
                            .attr("href", DEFAULTS_PATH)
                            .text("defaults"),
                    )
                    .child(
                        Element::new("a")
                            .attr("class", "button")
                            .attr("href", RESTART_PATH)
                            .text("restart"),
                    ),
            )
    }
}

fn input(input_type: InputType, value: impl ToString) -> ControlKind {
    ControlKind::Input {
        input_type,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::schema::{CalendarDate, DateTime, Group, TimeOfDay};

    fn form() -> SettingsForm {
        SettingsForm::new(vec![
            "Europe/London".to_string(),
            "Europe/Berlin".to_string(),
            "Europe/Rome".to_string(),
        ])
    }

    fn setting(id: &str, kind: SettingKind) -> Setting {
        Setting {
            id: id.to_string(),
            label: format!("{id} label"),
            kind,
        }
    }

    fn schema(settings: Vec<Setting>) -> Schema {
        Schema {
            groups: vec![Group {
                id: "g".to_string(),
                label: "Group".to_string(),
                settings,
            }],
        }
    }

    fn round_trip(kind: SettingKind) -> String {
        let state = form().build(&schema(vec![setting("s", kind)]));
        state.serialize().encode()
    }

    mod round_trip {
        use super::*;

        #[test]
        fn bool_true_and_false() {
            assert_eq!(
                round_trip(SettingKind::Bool {
                    val: true,
                    def: None
                }),
                "g:s=on"
            );
            assert_eq!(
                round_trip(SettingKind::Bool {
                    val: false,
                    def: None
                }),
                ""
            );
        }

        #[test]
        fn num() {
            assert_eq!(
                round_trip(SettingKind::Num {
                    val: -12,
                    def: None,
                    min: -20,
                    max: 20
                }),
                "g:s=-12"
            );
        }

        #[test]
        fn oneof_yields_index() {
            assert_eq!(
                round_trip(SettingKind::OneOf {
                    val: 2,
                    def: None,
                    options: vec!["low".into(), "mid".into(), "high".into()]
                }),
                "g:s=2"
            );
        }

        #[test]
        fn text() {
            assert_eq!(
                round_trip(SettingKind::Text {
                    val: "board-1".into(),
                    def: None,
                    len: 32
                }),
                "g:s=board-1"
            );
        }

        #[test]
        fn time_date_and_datetime() {
            assert_eq!(
                round_trip(SettingKind::Time(TimeOfDay { hh: 9, mm: 5 })),
                "g:s=09:05"
            );
            assert_eq!(
                round_trip(SettingKind::Date(CalendarDate {
                    year: 2024,
                    month: 3,
                    day: 7
                })),
                "g:s=2024-03-07"
            );
            assert_eq!(
                round_trip(SettingKind::DateTime(DateTime {
                    year: 2024,
                    month: 3,
                    day: 7,
                    hh: 9,
                    mm: 5
                })),
                "g:s=2024-03-07T09:05"
            );
        }

        #[test]
        fn timezone_from_list() {
            assert_eq!(
                round_trip(SettingKind::Timezone {
                    val: "Europe/Berlin".into(),
                    def: None,
                    len: None
                }),
                "g:s=Europe/Berlin"
            );
        }

        #[test]
        fn timezone_missing_from_list() {
            assert_eq!(
                round_trip(SettingKind::Timezone {
                    val: "America/New_York".into(),
                    def: None,
                    len: None
                }),
                "g:s=America/New_York"
            );
        }

        #[test]
        fn color() {
            assert_eq!(
                round_trip(SettingKind::Color {
                    val: "#12ab9f".into()
                }),
                "g:s=#12ab9f"
            );
        }
    }

    mod build {
        use super::*;

        #[test]
        fn unknown_kind_is_skipped_and_rest_renders() {
            let state = form().build(&schema(vec![
                setting("a", SettingKind::Unknown),
                setting(
                    "b",
                    SettingKind::Bool {
                        val: true,
                        def: None,
                    },
                ),
            ]));
            let names: Vec<_> = state.controls().map(|c| c.name.as_str()).collect();
            assert_eq!(names, vec!["g:b"]);
        }

        #[test]
        fn controls_follow_schema_order() {
            let state = form().build(&schema(vec![
                setting(
                    "z",
                    SettingKind::Color {
                        val: "#000000".into(),
                    },
                ),
                setting(
                    "a",
                    SettingKind::Text {
                        val: String::new(),
                        def: None,
                        len: 4,
                    },
                ),
            ]));
            let names: Vec<_> = state.controls().map(|c| c.name.as_str()).collect();
            assert_eq!(names, vec!["g:z", "g:a"]);
        }

        #[test]
        fn oneof_options_keep_schema_order_and_labels() {
            let state = form().build(&schema(vec![setting(
                "m",
                SettingKind::OneOf {
                    val: 0,
                    def: Some(1),
                    options: vec!["slow".into(), "fast".into()],
                },
            )]));
            let control = state.control("g:m").expect("control exists");
            let ControlKind::Select { options, .. } = &control.kind else {
                panic!("expected select");
            };
            assert_eq!(options[0].label, "slow");
            assert_eq!(options[0].value, "0");
            assert_eq!(options[1].label, "fast");
            assert_eq!(options[1].value, "1");
            assert_eq!(control.default_hint.as_deref(), Some("fast"));
        }

        #[test]
        fn timezone_options_come_from_configured_list() {
            let state = form().build(&schema(vec![setting(
                "tz",
                SettingKind::Timezone {
                    val: "Europe/Rome".into(),
                    def: None,
                    len: Some(32),
                },
            )]));
            let ControlKind::Select { options, .. } =
                &state.control("g:tz").expect("control exists").kind
            else {
                panic!("expected select");
            };
            let values: Vec<_> = options.iter().map(|o| o.value.as_str()).collect();
            assert_eq!(values, vec!["Europe/London", "Europe/Berlin", "Europe/Rome"]);
            assert!(options[2].selected);
        }
    }

    mod render {
        use super::*;

        #[test]
        fn form_has_section_per_group_and_actions() {
            let schema = Schema {
                groups: vec![
                    Group {
                        id: "wifi".into(),
                        label: "Wi-Fi".into(),
                        settings: vec![setting(
                            "enabled",
                            SettingKind::Bool {
                                val: true,
                                def: None,
                            },
                        )],
                    },
                    Group {
                        id: "clock".into(),
                        label: "Clock".into(),
                        settings: vec![setting("alarm", SettingKind::Time(TimeOfDay { hh: 6, mm: 0 }))],
                    },
                ],
            };
            let form = form();
            let html = form.render(&form.build(&schema)).to_string();

            assert!(html.starts_with(r#"<form id="settings-form" method="post" action="/settings">"#));
            assert_eq!(html.matches("<fieldset>").count(), 2);
            assert!(html.contains("<legend>Wi-Fi</legend>"));
            assert!(html.contains(
                r#"<input type="time" name="clock:alarm" id="clock:alarm" min="00:00" max="23:59" value="06:00">"#
            ));
            assert!(html.contains(r#"href="/settings/defaults""#));
            assert!(html.contains(r#"href="/settings/restart""#));
        }

        #[test]
        fn text_input_carries_maxlength() {
            let form = form();
            let state = form.build(&schema(vec![setting(
                "name",
                SettingKind::Text {
                    val: "x".into(),
                    def: None,
                    len: 16,
                },
            )]));
            let html = form.render(&state).to_string();
            assert!(html.contains(r#"type="text" name="g:name" id="g:name" maxlength="16" value="x""#));
        }

        #[test]
        fn device_strings_are_escaped() {
            let form = form();
            let state = form.build(&Schema {
                groups: vec![Group {
                    id: "g".into(),
                    label: "<b>group</b>".into(),
                    settings: vec![Setting {
                        id: "t".into(),
                        label: "<script>alert(1)</script>".into(),
                        kind: SettingKind::Text {
                            val: "\"><img src=x>".into(),
                            def: None,
                            len: 64,
                        },
                    }],
                }],
            });
            let html = form.render(&state).to_string();
            assert!(!html.contains("<script>"));
            assert!(!html.contains("<b>group"));
            assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
            assert!(html.contains(r#"value="&quot;&gt;&lt;img src=x&gt;""#));
        }
    }
}
