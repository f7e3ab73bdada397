use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

fn default_required() -> bool {
    true
}

impl FieldSpec {
    pub fn required(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            required: true,
            hint: None,
        }
    }

    pub fn optional(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            required: false,
            ..Self::required(name, label)
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSchema {
    pub fields: Vec<FieldSpec>,
}

impl FormSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// The eight diabetes features, in the order the scoring service reads them.
    pub fn diabetes() -> Self {
        Self::new(vec![
            FieldSpec::required("pregnancies", "Pregnancies"),
            FieldSpec::required("glucose", "Glucose (mg/dL)")
                .with_hint("Normal fasting glucose is 70-100 mg/dL"),
            FieldSpec::required("bloodPressure", "Blood Pressure (mm Hg)")
                .with_hint("Normal blood pressure is below 120/80 mm Hg"),
            FieldSpec::required("skinThickness", "Skin Thickness (mm)"),
            FieldSpec::required("insulin", "Insulin (mu U/ml)"),
            FieldSpec::required("bmi", "BMI").with_hint("Normal BMI range is 18.5-24.9"),
            FieldSpec::required("diabetesPedigree", "Diabetes Pedigree Function"),
            FieldSpec::required("age", "Age").with_hint("Enter age in years"),
        ])
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    pub fn next_field(&self, name: &str) -> Option<&FieldSpec> {
        let index = self.position(name)?;
        self.fields.get(index + 1)
    }

    pub fn is_terminal(&self, name: &str) -> bool {
        self.position(name)
            .is_some_and(|index| index + 1 == self.fields.len())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }
}

impl Default for FormSchema {
    fn default() -> Self {
        Self::diabetes()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormState {
    values: BTreeMap<String, String>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.values.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn is_filled(&self, field: &str) -> bool {
        self.get(field).is_some_and(|value| !value.trim().is_empty())
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values.values().all(|value| value.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(field, value)| (field.as_str(), value.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for FormState
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut state = Self::new();
        for (field, value) in iter {
            state.set(field, value);
        }
        state
    }
}
