use super::normalizer::normalize_key;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Canonical transaction fields recognised across the supported payload shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Field {
    Reference,
    Timestamp,
    Sender,
    Receiver,
    Counterparty,
    Amount,
    Status,
    DirectionHint,
    Category,
}

impl Field {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Field::Reference => "reference",
            Field::Timestamp => "timestamp",
            Field::Sender => "sender",
            Field::Receiver => "receiver",
            Field::Counterparty => "counterparty",
            Field::Amount => "amount",
            Field::Status => "status",
            Field::DirectionHint => "type",
            Field::Category => "category",
        }
    }
}

static FIELD_ALIASES: OnceLock<HashMap<String, Field>> = OnceLock::new();

pub(crate) fn field_for_key(key: &str) -> Option<Field> {
    field_aliases().get(&normalize_key(key)).copied()
}

fn field_aliases() -> &'static HashMap<String, Field> {
    FIELD_ALIASES.get_or_init(|| {
        const KEY_TO_FIELD: &[(&str, Field)] = &[
            // Remote scoring API / UPI statement export
            ("Timestamp", Field::Timestamp),
            ("Sender UPI ID", Field::Sender),
            ("Receiver UPI ID", Field::Receiver),
            ("Amount (INR)", Field::Amount),
            ("Status", Field::Status),
            ("Type", Field::DirectionHint),
            ("To Type", Field::Category),
            ("transaction_ref", Field::Reference),
            ("transaction_date", Field::Timestamp),
            ("sender_upi_id", Field::Sender),
            ("receiver_upi_id", Field::Receiver),
            // In-app mock ledger
            ("id", Field::Reference),
            ("date", Field::Timestamp),
            ("merchant", Field::Counterparty),
            ("amount", Field::Amount),
            // Canonical names, so serialized records round back in
            ("reference", Field::Reference),
            ("sender_id", Field::Sender),
            ("receiver_id", Field::Receiver),
            ("category", Field::Category),
            ("direction", Field::DirectionHint),
            ("counterparty", Field::Counterparty),
            // Common variants seen in bank exports
            ("Transaction ID", Field::Reference),
            ("Transaction Date", Field::Timestamp),
            ("Created At", Field::Timestamp),
            ("Sender", Field::Sender),
            ("From", Field::Sender),
            ("Receiver", Field::Receiver),
            ("To", Field::Receiver),
            ("Payee", Field::Counterparty),
            ("Value", Field::Amount),
        ];

        let mut map = HashMap::with_capacity(KEY_TO_FIELD.len());
        for (key, field) in KEY_TO_FIELD {
            map.insert(normalize_key(key), *field);
        }
        map
    })
}
