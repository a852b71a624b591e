use std::collections::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use super::errors::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text { placeholder: String },
    Select { options: Vec<String> },
    MultiSelect { options: Vec<String> },
}

impl FieldKind {
    pub fn options(&self) -> Option<&[String]> {
        match self {
            FieldKind::Text { .. } => None,
            FieldKind::Select { options } | FieldKind::MultiSelect { options } => Some(options),
        }
    }

    pub fn is_multi_select(&self) -> bool {
        matches!(self, FieldKind::MultiSelect { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub id: String,
    pub label: String,
    pub kind: FieldKind,
}

impl FieldDef {
    pub fn text(id: &str, label: &str, placeholder: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind: FieldKind::Text {
                placeholder: placeholder.to_string(),
            },
        }
    }

    pub fn select(id: &str, label: &str, options: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind: FieldKind::Select {
                options: options.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    pub fn multi_select(id: &str, label: &str, options: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind: FieldKind::MultiSelect {
                options: options.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    /// Whether `advance` requires a non-empty value for this field.
    ///
    /// Multi-select fields have no minimum-selection constraint and may be
    /// left empty; every other kind must hold a non-empty value.
    pub fn requires_input(&self) -> bool {
        !self.kind.is_multi_select()
    }
}

/// Ordered, immutable declaration of the wizard's fields, one per step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormTemplate {
    pub title: String,
    pub fields: Vec<FieldDef>,
}

impl FormTemplate {
    /// The recruitment form this application ships with.
    pub fn recruitment() -> Self {
        Self {
            title: "GirlUp Recruitments".to_string(),
            fields: vec![
                FieldDef::text("Name", "Name", "Enter your full name"),
                FieldDef::select("Year", "Year", &["1st", "2nd"]),
                FieldDef::text("Phone number", "Phone Number", "Enter your phone number"),
                FieldDef::text("Roll no.", "Roll Number", "Enter your roll number"),
                FieldDef::text("Email id", "Email", "Enter your email address"),
                FieldDef::multi_select(
                    "Department",
                    "Department",
                    &[
                        "Creativity",
                        "Designing",
                        "Technical",
                        "Logistics",
                        "Content",
                        "Marketing and PR",
                    ],
                ),
            ],
        }
    }

    pub fn field(&self, step: usize) -> &FieldDef {
        &self.fields[step]
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Scalar(String),
    Selection(HashSet<String>),
}

/// The applicant's answers, keyed by field identifier.
///
/// Scalar fields are absent until the user provides a value; every
/// multi-select field always holds a set, initialized empty. Accessors
/// panic on an identifier missing from the declaring template, since that
/// is a caller bug rather than a runtime condition.
#[derive(Debug, Clone, PartialEq)]
pub struct FormRecord {
    declared: HashSet<String>,
    values: HashMap<String, FieldValue>,
}

impl FormRecord {
    pub fn new(template: &FormTemplate) -> Self {
        let mut values = HashMap::new();
        for field in &template.fields {
            if field.kind.is_multi_select() {
                values.insert(field.id.clone(), FieldValue::Selection(HashSet::new()));
            }
        }
        Self {
            declared: template.fields.iter().map(|f| f.id.clone()).collect(),
            values,
        }
    }

    /// Replaces the stored value of a scalar (text or select) field.
    ///
    /// # Panics
    ///
    /// Panics if `field_id` is undeclared or names a multi-select field.
    pub fn set_scalar(&mut self, field_id: &str, value: String) {
        self.assert_declared(field_id);
        match self.values.get_mut(field_id) {
            Some(FieldValue::Selection(_)) => {
                panic!(
                    "{}",
                    DomainError::WrongKind {
                        field: field_id.to_string(),
                        expected: "scalar",
                    }
                )
            }
            Some(FieldValue::Scalar(existing)) => *existing = value,
            None => {
                self.values
                    .insert(field_id.to_string(), FieldValue::Scalar(value));
            }
        }
    }

    /// Adds or removes one option from a multi-select field's set.
    ///
    /// Idempotent in both directions: adding a present option and removing
    /// an absent one leave the set unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `field_id` is undeclared or does not name a multi-select
    /// field.
    pub fn toggle(&mut self, field_id: &str, option: &str, selected: bool) {
        self.assert_declared(field_id);
        match self.values.get_mut(field_id) {
            Some(FieldValue::Selection(set)) => {
                if selected {
                    set.insert(option.to_string());
                } else {
                    set.remove(option);
                }
            }
            _ => panic!(
                "{}",
                DomainError::WrongKind {
                    field: field_id.to_string(),
                    expected: "selection set",
                }
            ),
        }
    }

    /// Current value of a scalar field, or `None` while unanswered.
    ///
    /// # Panics
    ///
    /// Panics if `field_id` is undeclared.
    pub fn scalar(&self, field_id: &str) -> Option<&str> {
        self.assert_declared(field_id);
        match self.values.get(field_id) {
            Some(FieldValue::Scalar(value)) => Some(value),
            _ => None,
        }
    }

    /// Selected options of a multi-select field.
    ///
    /// # Panics
    ///
    /// Panics if `field_id` is undeclared or does not name a multi-select
    /// field.
    pub fn selection(&self, field_id: &str) -> &HashSet<String> {
        self.assert_declared(field_id);
        match self.values.get(field_id) {
            Some(FieldValue::Selection(set)) => set,
            _ => panic!(
                "{}",
                DomainError::WrongKind {
                    field: field_id.to_string(),
                    expected: "selection set",
                }
            ),
        }
    }

    /// Whether the field meets its required-input constraint.
    pub fn is_satisfied(&self, field: &FieldDef) -> bool {
        if !field.requires_input() {
            return true;
        }
        self.scalar(&field.id).is_some_and(|value| !value.is_empty())
    }

    fn assert_declared(&self, field_id: &str) {
        if !self.declared.contains(field_id) {
            panic!("{}", DomainError::UnknownField(field_id.to_string()));
        }
    }
}
