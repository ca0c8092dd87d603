use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;

/// What kind of input a form field collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    LongText,
    Date,
    /// Integer input that must parse and be greater than zero.
    PositiveInt,
    /// One of a fixed set of values.
    Choice(&'static [&'static str]),
    Flag,
}

/// Describes one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Initial value for text and choice fields in create mode.
    pub default: &'static str,
}

impl FieldSpec {
    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
            required: true,
            default: "",
        }
    }

    pub const fn long_text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::LongText,
            required: false,
            default: "",
        }
    }

    pub const fn date(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Date,
            required: true,
            default: "",
        }
    }

    pub const fn positive_int(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::PositiveInt,
            required: true,
            default: "",
        }
    }

    pub const fn choice(
        name: &'static str,
        label: &'static str,
        options: &'static [&'static str],
        default: &'static str,
    ) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Choice(options),
            required: true,
            default,
        }
    }

    pub const fn flag(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Flag,
            required: false,
            default: "",
        }
    }

    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn default_value(&self) -> FieldValue {
        match self.kind {
            FieldKind::Date => FieldValue::Date(None),
            FieldKind::Flag => FieldValue::Flag(false),
            _ => FieldValue::Text(self.default.to_string()),
        }
    }
}

/// Raw value held by a form field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Date(Option<NaiveDate>),
    Flag(bool),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Field values keyed by field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldValues(BTreeMap<&'static str, FieldValue>);

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults for every field in `specs`.
    pub fn defaults(specs: &[FieldSpec]) -> Self {
        Self(specs.iter().map(|s| (s.name, s.default_value())).collect())
    }

    pub fn with_text(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.0.insert(name, FieldValue::Text(value.into()));
        self
    }

    pub fn with_date(mut self, name: &'static str, value: NaiveDate) -> Self {
        self.0.insert(name, FieldValue::Date(Some(value)));
        self
    }

    pub fn with_flag(mut self, name: &'static str, value: bool) -> Self {
        self.0.insert(name, FieldValue::Flag(value));
        self
    }

    pub fn insert(&mut self, name: &'static str, value: FieldValue) {
        self.0.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn text(&self, name: &str) -> &str {
        self.get(name).and_then(FieldValue::as_text).unwrap_or("")
    }

    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        match self.get(name) {
            Some(FieldValue::Date(d)) => *d,
            _ => None,
        }
    }

    pub fn flag(&self, name: &str) -> bool {
        matches!(self.get(name), Some(FieldValue::Flag(true)))
    }
}

/// A record's field set without its identifier, as collected by a form.
pub trait FormDraft: Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    const FIELDS: &'static [FieldSpec];

    fn to_values(&self) -> FieldValues;

    /// Builds a draft from values that already passed form validation.
    /// Returns `None` when a value still cannot be interpreted.
    fn from_values(values: &FieldValues) -> Option<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATES: &[&str] = &["a", "b"];

    #[test]
    fn defaults_follow_field_kind() {
        let specs = [
            FieldSpec::text("name", "Name"),
            FieldSpec::date("when", "When"),
            FieldSpec::flag("done", "Done"),
            FieldSpec::choice("state", "State", STATES, "b"),
        ];
        let values = FieldValues::defaults(&specs);
        assert_eq!(values.text("name"), "");
        assert_eq!(values.date("when"), None);
        assert!(!values.flag("done"));
        assert_eq!(values.text("state"), "b");
    }

    #[test]
    fn optional_clears_required() {
        let spec = FieldSpec::text("notes", "Notes").optional();
        assert!(!spec.required);
    }
}
