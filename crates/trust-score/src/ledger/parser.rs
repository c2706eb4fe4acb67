use super::domain::{RecordDefect, TransactionCategory, TransactionRecord, TransactionStatus};
use super::mapping::{field_for_key, Field};
use super::normalizer::{
    normalize_handle, parse_amount, parse_category, parse_direction_hint, parse_status,
    parse_timestamp, DirectionHint,
};
use serde_json::Value;
use std::collections::HashMap;
use std::io::Read;

/// Loosely typed record keyed by canonical field. Values keep their source text
/// so every shape funnels through the same normalization.
#[derive(Debug, Default)]
pub(crate) struct RawRecord {
    fields: HashMap<Field, RawValue>,
}

#[derive(Debug, Clone)]
enum RawValue {
    Text(String),
    Other,
}

impl RawRecord {
    fn insert(&mut self, field: Field, value: RawValue) {
        // First non-empty occurrence wins when a payload carries aliases twice.
        let keep_existing = matches!(self.fields.get(&field), Some(RawValue::Text(text)) if !text.trim().is_empty());
        if !keep_existing {
            self.fields.insert(field, value);
        }
    }

    fn text(&self, field: Field) -> Option<&str> {
        match self.fields.get(&field) {
            Some(RawValue::Text(text)) if !text.trim().is_empty() => Some(text.as_str()),
            _ => None,
        }
    }

    fn has(&self, field: Field) -> bool {
        match self.fields.get(&field) {
            Some(RawValue::Text(text)) => !text.trim().is_empty(),
            Some(RawValue::Other) => true,
            None => false,
        }
    }

    fn require(&self, field: Field) -> Result<&str, RecordDefect> {
        self.text(field)
            .ok_or_else(|| RecordDefect::MissingField(field.name().to_string()))
    }

    /// Resolve the record into canonical form from the subject's perspective.
    pub(crate) fn into_transaction(
        self,
        subject_id: Option<&str>,
    ) -> Result<TransactionRecord, RecordDefect> {
        let raw_timestamp = self.require(Field::Timestamp)?;
        let timestamp = parse_timestamp(raw_timestamp)
            .ok_or_else(|| RecordDefect::InvalidTimestamp(raw_timestamp.to_string()))?;

        let amount = match self.fields.get(&Field::Amount) {
            Some(RawValue::Text(text)) if !text.trim().is_empty() => {
                parse_amount(text).ok_or_else(|| RecordDefect::InvalidAmount(text.clone()))?
            }
            Some(RawValue::Other) => {
                return Err(RecordDefect::InvalidAmount("non-scalar value".to_string()))
            }
            _ => return Err(RecordDefect::MissingField(Field::Amount.name().to_string())),
        };

        let status = match self.fields.get(&Field::Status) {
            Some(RawValue::Text(text)) if !text.trim().is_empty() => parse_status(text),
            Some(_) => return Err(RecordDefect::InvalidStatus),
            // Ledger exports list settled entries only and carry no status column.
            None => TransactionStatus::Success,
        };

        let category = self
            .text(Field::Category)
            .map(parse_category)
            .unwrap_or(TransactionCategory::Other);

        let (sender_id, receiver_id) = self.resolve_parties(subject_id)?;

        Ok(TransactionRecord {
            reference: self.text(Field::Reference).map(|value| value.trim().to_string()),
            timestamp,
            sender_id,
            receiver_id,
            amount,
            status,
            category,
        })
    }

    fn resolve_parties(&self, subject_id: Option<&str>) -> Result<(String, String), RecordDefect> {
        let sender = self.text(Field::Sender).map(normalize_handle);
        let receiver = self.text(Field::Receiver).map(normalize_handle);
        if let (Some(sender), Some(receiver)) = (&sender, &receiver) {
            return Ok((sender.clone(), receiver.clone()));
        }

        // One side missing: the declared direction plus the subject fills the gap.
        let hint = self.text(Field::DirectionHint).and_then(parse_direction_hint);
        let subject = subject_id.map(normalize_handle);
        let counterparty = self.text(Field::Counterparty).map(normalize_handle);

        match (hint, subject) {
            (Some(DirectionHint::Sent), Some(subject)) => {
                let other = receiver.or(counterparty).ok_or(RecordDefect::UnresolvedParties)?;
                Ok((sender.unwrap_or(subject), other))
            }
            (Some(DirectionHint::Received), Some(subject)) => {
                let other = sender.or(counterparty).ok_or(RecordDefect::UnresolvedParties)?;
                Ok((other, receiver.unwrap_or(subject)))
            }
            _ if !self.has(Field::Sender) => {
                Err(RecordDefect::MissingField(Field::Sender.name().to_string()))
            }
            _ if !self.has(Field::Receiver) => {
                Err(RecordDefect::MissingField(Field::Receiver.name().to_string()))
            }
            _ => Err(RecordDefect::UnresolvedParties),
        }
    }
}

pub(crate) fn raw_from_json(value: &Value) -> Result<RawRecord, RecordDefect> {
    let object = value.as_object().ok_or(RecordDefect::NotAnObject)?;
    let mut raw = RawRecord::default();

    for (key, value) in object {
        let Some(field) = field_for_key(key) else {
            continue;
        };
        let value = match value {
            Value::String(text) => RawValue::Text(text.clone()),
            Value::Number(number) => RawValue::Text(number.to_string()),
            Value::Null => continue,
            _ => RawValue::Other,
        };
        raw.insert(field, value);
    }

    Ok(raw)
}

/// Read every CSV data row, mapping headers onto canonical fields.
pub(crate) fn raw_from_csv<R: Read>(reader: R) -> Result<Vec<RawRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<Option<Field>> = csv_reader
        .headers()?
        .iter()
        .map(field_for_key)
        .collect();

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        let mut raw = RawRecord::default();
        for (column, value) in columns.iter().zip(row.iter()) {
            if let Some(field) = column {
                raw.insert(*field, RawValue::Text(value.to_string()));
            }
        }
        records.push(raw);
    }

    Ok(records)
}
