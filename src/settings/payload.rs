//! Flat `key=value&...` payload exchanged with the device
//!
//! The device splits request bodies on `&` and `=` and does not percent-decode
//! values, so keys and values go out literally. Only spaces (as `+`), the
//! framing characters `&`, `=`, `+`, `%` and control characters are escaped.
//! The wifi connect handler does not even reverse that, so its pairs go out
//! verbatim through [`FormPayload::encode_literal`].

use std::fmt::{self, Display, Formatter, Write};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormPayload {
    pairs: Vec<(String, String)>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// First value submitted under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value submitted under `key`, in submission order
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Body as sent to the device settings handler
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Pairs joined without any escaping
    ///
    /// Values must not contain `&`.
    pub fn encode_literal(&self) -> String {
        self.pairs
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl From<Vec<(String, String)>> for FormPayload {
    fn from(pairs: Vec<(String, String)>) -> Self {
        FormPayload { pairs }
    }
}

impl Display for FormPayload {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_char('&')?;
            }
            write_component(f, key)?;
            f.write_char('=')?;
            write_component(f, value)?;
        }
        Ok(())
    }
}

fn write_component(f: &mut Formatter<'_>, component: &str) -> fmt::Result {
    for c in component.chars() {
        match c {
            ' ' => f.write_char('+')?,
            '&' | '=' | '+' | '%' => write!(f, "%{:02X}", c as u32)?,
            c if c.is_control() => {
                let mut buf = [0; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    write!(f, "%{byte:02X}")?;
                }
            }
            c => f.write_char(c)?,
        }
    }
    Ok(())
}
