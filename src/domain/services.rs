//! Submission assembly services for the terminal form wizard.
//!
//! This module turns the in-memory answer record into the flat,
//! wire-ready representation the remote endpoint expects.

use super::models::{FieldKind, FormRecord, FormTemplate};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Delimiter between selected options of a multi-select field.
pub const OPTION_DELIMITER: &str = ", ";

/// A flat, ordered view of a completed (or partially completed) form.
///
/// Entries appear in field declaration order. Serializes as a single JSON
/// object, matching the payload shape the endpoint consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRecord {
    entries: Vec<(String, String)>,
}

impl SubmissionRecord {
    pub fn get(&self, field_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(id, _)| id == field_id)
            .map(|(_, value)| value.as_str())
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }
}

impl Serialize for SubmissionRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field_id, value) in &self.entries {
            map.serialize_entry(field_id, value)?;
        }
        map.end()
    }
}

/// Assembles submission records from a template and an answer record.
///
/// Scalar fields contribute their stored value, or the empty string while
/// unanswered. The multi-select field contributes its selected options
/// joined by `", "` in declared option order, so the serialized record is
/// identical for identical selections no matter in which order the user
/// checked them.
///
/// # Examples
///
/// ```
/// use tforms::domain::{FormRecord, FormTemplate, RecordAssembler};
///
/// let template = FormTemplate::recruitment();
/// let mut record = FormRecord::new(&template);
/// record.set_scalar("Name", "Asha Rao".to_string());
/// record.toggle("Department", "Content", true);
/// record.toggle("Department", "Technical", true);
///
/// let submission = RecordAssembler::new(&template).assemble(&record);
/// assert_eq!(submission.get("Name"), Some("Asha Rao"));
/// assert_eq!(submission.get("Department"), Some("Technical, Content"));
/// ```
pub struct RecordAssembler<'a> {
    template: &'a FormTemplate,
}

impl<'a> RecordAssembler<'a> {
    pub fn new(template: &'a FormTemplate) -> Self {
        Self { template }
    }

    pub fn assemble(&self, record: &FormRecord) -> SubmissionRecord {
        let entries = self
            .template
            .fields
            .iter()
            .map(|field| {
                let value = match &field.kind {
                    FieldKind::MultiSelect { options } => {
                        let selected = record.selection(&field.id);
                        options
                            .iter()
                            .filter(|option| selected.contains(*option))
                            .cloned()
                            .collect::<Vec<_>>()
                            .join(OPTION_DELIMITER)
                    }
                    _ => record.scalar(&field.id).unwrap_or("").to_string(),
                };
                (field.id.clone(), value)
            })
            .collect();

        SubmissionRecord { entries }
    }
}
