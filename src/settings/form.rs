//! Editable form state
//!
//! A [`FormState`] is the structured equivalent of the rendered settings
//! form: the controls in document order with their current values. It is
//! rendered to markup, updated from a browser submission and serialized
//! into the payload sent to the device.

use super::payload::FormPayload;
use crate::markup::Element;

/// Value a checkbox submits when checked and no explicit value is set
const CHECKBOX_ON: &str = "on";

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputType {
    Number,
    Text,
    Time,
    Date,
    DateTimeLocal,
    Color,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Number => "number",
            InputType::Text => "text",
            InputType::Time => "time",
            InputType::Date => "date",
            InputType::DateTimeLocal => "datetime-local",
            InputType::Color => "color",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ControlKind {
    Checkbox { checked: bool },
    Radio { value: String, checked: bool },
    Input { input_type: InputType, value: String },
    Select { options: Vec<SelectOption>, multiple: bool },
    File,
    Reset,
    Submit { value: String },
    Button { value: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormControl {
    pub name: String,
    pub label: String,
    pub kind: ControlKind,
    pub disabled: bool,
    /// Extra attributes such as `min`, `max` or `maxlength`
    pub constraints: Vec<(&'static str, String)>,
    /// Factory default shown as a tooltip
    pub default_hint: Option<String>,
}

impl FormControl {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: ControlKind) -> Self {
        FormControl {
            name: name.into(),
            label: label.into(),
            kind,
            disabled: false,
            constraints: Vec::new(),
            default_hint: None,
        }
    }

    pub fn constraint(mut self, attribute: &'static str, value: impl ToString) -> Self {
        self.constraints.push((attribute, value.to_string()));
        self
    }

    pub fn default_hint(mut self, hint: Option<String>) -> Self {
        self.default_hint = hint;
        self
    }

    /// Pairs this control contributes to a submission
    fn submitted_pairs(&self) -> Vec<(String, String)> {
        if self.name.is_empty() || self.disabled {
            return Vec::new();
        }

        let pair = |value: &str| (self.name.clone(), value.to_string());

        match &self.kind {
            ControlKind::Checkbox { checked } => {
                if *checked {
                    vec![pair(CHECKBOX_ON)]
                } else {
                    Vec::new()
                }
            }
            ControlKind::Radio { value, checked } => {
                if *checked {
                    vec![pair(value)]
                } else {
                    Vec::new()
                }
            }
            ControlKind::Input { value, .. } => vec![pair(value)],
            ControlKind::Select {
                options,
                multiple: true,
            } => options
                .iter()
                .filter(|option| option.selected)
                .map(|option| pair(&option.value))
                .collect(),
            ControlKind::Select {
                options,
                multiple: false,
            } => options
                .iter()
                .find(|option| option.selected)
                .or_else(|| options.first())
                .map(|option| vec![pair(&option.value)])
                .unwrap_or_default(),
            ControlKind::File
            | ControlKind::Reset
            | ControlKind::Submit { .. }
            | ControlKind::Button { .. } => Vec::new(),
        }
    }

    /// Take over the value the browser submitted for this control
    fn apply(&mut self, submitted: &FormPayload) {
        if self.name.is_empty() || self.disabled {
            return;
        }

        match &mut self.kind {
            ControlKind::Checkbox { checked } => *checked = submitted.contains(&self.name),
            ControlKind::Radio { value, checked } => {
                *checked = submitted.get_all(&self.name).any(|v| v == value.as_str())
            }
            ControlKind::Input { value, .. } => {
                if let Some(new_value) = submitted.get(&self.name) {
                    *value = new_value.to_string();
                }
            }
            ControlKind::Select {
                options,
                multiple: true,
            } => {
                for option in options.iter_mut() {
                    option.selected = submitted.get_all(&self.name).any(|v| v == option.value);
                }
            }
            ControlKind::Select {
                options,
                multiple: false,
            } => {
                let Some(new_value) = submitted.get(&self.name) else {
                    return;
                };
                if options.iter().any(|option| option.value == new_value) {
                    for option in options.iter_mut() {
                        option.selected = option.value == new_value;
                    }
                }
            }
            ControlKind::File
            | ControlKind::Reset
            | ControlKind::Submit { .. }
            | ControlKind::Button { .. } => {}
        }
    }

    pub fn to_element(&self) -> Element {
        let control = match &self.kind {
            ControlKind::Checkbox { checked } => {
                let input = self.with_hint(self.input("checkbox").flag_if("checked", *checked));
                return Element::new("div").attr("class", "setting").child(
                    Element::new("label")
                        .attr("class", "label-check")
                        .child(input)
                        .text(format!(" {}", self.label)),
                );
            }
            ControlKind::Radio { value, checked } => self
                .input("radio")
                .attr("value", value.as_str())
                .flag_if("checked", *checked),
            ControlKind::Input { input_type, value } => {
                self.input(input_type.as_str()).attr("value", value.as_str())
            }
            ControlKind::Select { options, multiple } => Element::new("select")
                .attr("name", self.name.as_str())
                .attr("id", self.name.as_str())
                .flag_if("multiple", *multiple)
                .flag_if("disabled", self.disabled)
                .children(options.iter().map(|option| {
                    Element::new("option")
                        .attr("value", option.value.as_str())
                        .flag_if("selected", option.selected)
                        .text(option.label.as_str())
                })),
            ControlKind::File => self.input("file"),
            ControlKind::Reset => self.input("reset"),
            ControlKind::Submit { value } => self.input("submit").attr("value", value.as_str()),
            ControlKind::Button { value } => self.input("button").attr("value", value.as_str()),
        };

        Element::new("div")
            .attr("class", "setting")
            .child(
                Element::new("label")
                    .attr("class", "label-inline")
                    .attr("for", self.name.as_str())
                    .text(self.label.as_str()),
            )
            .child(self.with_hint(control))
    }

    fn with_hint(&self, control: Element) -> Element {
        match &self.default_hint {
            Some(hint) => control.attr("title", format!("default: {hint}")),
            None => control,
        }
    }

    fn input(&self, input_type: &'static str) -> Element {
        let input = Element::new("input")
            .attr("type", input_type)
            .attr("name", self.name.as_str())
            .attr("id", self.name.as_str())
            .flag_if("disabled", self.disabled);

        self.constraints
            .iter()
            .fold(input, |input, (attribute, value)| {
                input.attr(*attribute, value.as_str())
            })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormSection {
    pub label: String,
    pub controls: Vec<FormControl>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormState {
    pub sections: Vec<FormSection>,
}

impl FormState {
    pub fn controls(&self) -> impl Iterator<Item = &FormControl> {
        self.sections.iter().flat_map(|section| section.controls.iter())
    }

    pub fn control(&self, name: &str) -> Option<&FormControl> {
        self.controls().find(|control| control.name == name)
    }

    /// Serialize the form the way a browser submits it
    ///
    /// Covers every named, enabled control except file, reset, submit and
    /// button controls. Checkboxes and radios contribute only when checked,
    /// multi-selects once per selected option.
    pub fn serialize(&self) -> FormPayload {
        self.controls()
            .flat_map(FormControl::submitted_pairs)
            .collect::<Vec<_>>()
            .into()
    }

    /// Plain text inputs holding a submission when no form is known to apply it to
    pub fn from_submission(label: &str, submitted: &FormPayload) -> Self {
        let controls = submitted
            .pairs()
            .iter()
            .map(|(name, value)| {
                FormControl::new(
                    name.as_str(),
                    name.as_str(),
                    ControlKind::Input {
                        input_type: InputType::Text,
                        value: value.clone(),
                    },
                )
            })
            .collect();

        FormState {
            sections: vec![FormSection {
                label: label.to_string(),
                controls,
            }],
        }
    }

    /// Update every control from a browser submission; unknown names are ignored
    pub fn apply(&mut self, submitted: &FormPayload) {
        for section in &mut self.sections {
            for control in &mut section.controls {
                control.apply(submitted);
            }
        }
    }
}
