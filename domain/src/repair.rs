//! Bring legacy stored link records in line with the current processing rules.
//!
//! Older records may carry arbitrary keys in `meta`, a stale `url`, or an
//! activation flag that ignores completeness. A record is re-derived from its
//! cleaned `meta.rawInput` and the differences are reported field by field.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::processor::process_link;
use crate::{CoreError, LinkInput, LinkMeta, LinkType, ProcessedLink};

/// A record that could not be repaired. The rest of the run is unaffected.
#[derive(Debug, Error)]
pub enum RepairError {
    #[error("malformed record: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Loosely typed link row as found in storage. The type is kept as stored,
/// since rows may predate the removal of a link type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyLinkRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub link_type: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub order_index: Option<u32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default = "default_true")]
    pub is_incomplete: bool,
    #[serde(default)]
    pub meta: Option<Value>,
}

fn default_true() -> bool {
    true
}

/// One field that differs between the stored record and its repaired form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "field", rename_all = "camelCase")]
pub enum FieldChange {
    Meta {
        /// Unknown keys or a non-string `rawInput` were dropped.
        cleaned: bool,
        /// Validation results changed.
        revalidated: bool,
    },
    IsIncomplete { from: bool, to: bool },
    Url { from: Option<String>, to: Option<String> },
    IsActive { from: bool, to: bool },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairReport {
    pub id: String,
    pub link: ProcessedLink,
    pub changes: Vec<FieldChange>,
}

impl RepairReport {
    pub fn needs_update(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Keep only a string `rawInput` (trimmed); anything else becomes empty.
pub fn clean_meta(meta: Option<&Value>) -> LinkMeta {
    let raw_input = meta
        .and_then(|m| m.get("rawInput"))
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    LinkMeta {
        raw_input,
        validation_errors: None,
    }
}

fn meta_value(meta: &LinkMeta) -> Value {
    serde_json::to_value(meta).unwrap_or(Value::Null)
}

/// Id of a raw record for logging, even when the record is malformed.
pub fn record_id(value: &Value) -> &str {
    value.get("id").and_then(Value::as_str).unwrap_or("<unknown>")
}

/// Decode a raw stored row and repair it.
pub fn repair_value(value: &Value) -> Result<RepairReport, RepairError> {
    let record = LegacyLinkRecord::deserialize(value)?;
    repair_record(&record)
}

pub fn repair_record(record: &LegacyLinkRecord) -> Result<RepairReport, RepairError> {
    let link_type: LinkType = record.link_type.parse()?;
    let cleaned = clean_meta(record.meta.as_ref());
    let link = process_link(&LinkInput {
        link_type,
        title: record.title.clone(),
        raw_input: cleaned.raw_input.clone(),
        order_index: record.order_index,
        is_active: Some(record.is_active),
    });

    let mut changes = Vec::new();

    let cleaned_value = meta_value(&cleaned);
    let meta_cleaned = record.meta.as_ref() != Some(&cleaned_value);
    let meta_revalidated = meta_value(&link.meta) != cleaned_value;
    if meta_cleaned || meta_revalidated {
        changes.push(FieldChange::Meta {
            cleaned: meta_cleaned,
            revalidated: meta_revalidated,
        });
    }
    if record.is_incomplete != link.is_incomplete {
        changes.push(FieldChange::IsIncomplete {
            from: record.is_incomplete,
            to: link.is_incomplete,
        });
    }
    if record.url != link.url {
        changes.push(FieldChange::Url {
            from: record.url.clone(),
            to: link.url.clone(),
        });
    }
    if record.is_active != link.is_active {
        changes.push(FieldChange::IsActive {
            from: record.is_active,
            to: link.is_active,
        });
    }

    Ok(RepairReport {
        id: record.id.clone(),
        link,
        changes,
    })
}

/// Totals over a repair run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairSummary {
    pub processed: usize,
    pub updated: usize,
    pub errors: usize,
}

impl RepairSummary {
    pub fn record(&mut self, report: &RepairReport) {
        self.processed += 1;
        if report.needs_update() {
            self.updated += 1;
        }
    }

    pub fn record_error(&mut self) {
        self.processed += 1;
        self.errors += 1;
    }
}
