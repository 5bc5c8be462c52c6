//! Transaction models

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Identifier of a transaction as emitted by the backend.
///
/// The backend sends UUID strings, but numeric ids are accepted and written
/// back unchanged so a record posted for SAR generation matches what was received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransactionId {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionId::Text(id) => write!(f, "{}", id),
            TransactionId::Number(id) => write!(f, "{}", id),
        }
    }
}

impl From<&str> for TransactionId {
    fn from(id: &str) -> Self {
        TransactionId::Text(id.to_string())
    }
}

impl From<u64> for TransactionId {
    fn from(id: u64) -> Self {
        TransactionId::Number(id.into())
    }
}

/// Transaction category. Unrecognized categories keep their raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionType {
    Payment,
    Transfer,
    CashIn,
    CashOut,
    Debit,
    Other(String),
}

impl TransactionType {
    const DEFAULT_ICON: &'static str = "💵";

    pub fn parse(raw: &str) -> Self {
        match raw {
            "PAYMENT" => TransactionType::Payment,
            "TRANSFER" => TransactionType::Transfer,
            "CASH_IN" => TransactionType::CashIn,
            "CASH_OUT" => TransactionType::CashOut,
            "DEBIT" => TransactionType::Debit,
            other => TransactionType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TransactionType::Payment => "PAYMENT",
            TransactionType::Transfer => "TRANSFER",
            TransactionType::CashIn => "CASH_IN",
            TransactionType::CashOut => "CASH_OUT",
            TransactionType::Debit => "DEBIT",
            TransactionType::Other(raw) => raw,
        }
    }

    /// Icon shown next to the transaction in the live list
    pub fn icon(&self) -> &'static str {
        match self {
            TransactionType::Payment | TransactionType::Debit => "💳",
            TransactionType::Transfer => "📤",
            TransactionType::CashIn => "📥",
            TransactionType::CashOut => Self::DEFAULT_ICON,
            TransactionType::Other(_) => Self::DEFAULT_ICON,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TransactionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TransactionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(TransactionType::parse(&raw))
    }
}

/// A single record pushed by the monitoring stream.
///
/// Records are never mutated after receipt. Fields the dashboard does not
/// display are kept in `extra` and serialized back verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    #[serde(rename = "nameDest", default)]
    pub name_dest: String,
    #[serde(default)]
    pub is_anomaly: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anomaly_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(rename = "oldbalanceOrg", default, skip_serializing_if = "Option::is_none")]
    pub old_balance_orig: Option<f64>,
    #[serde(rename = "newbalanceOrg", default, skip_serializing_if = "Option::is_none")]
    pub new_balance_orig: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
impl Transaction {
    /// Minimal record for fixtures
    pub fn new(id: impl Into<TransactionId>, kind: TransactionType, amount: f64) -> Self {
        Self {
            id: id.into(),
            kind,
            amount,
            name_dest: String::new(),
            is_anomaly: false,
            anomaly_score: None,
            explanation: None,
            old_balance_orig: None,
            new_balance_orig: None,
            extra: Map::new(),
        }
    }

    pub fn flagged(mut self, score: f64, explanation: &str) -> Self {
        self.is_anomaly = true;
        self.anomaly_score = Some(score);
        self.explanation = Some(explanation.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_backend_record() {
        let raw = json!({
            "id": "1b4e28ba-2fa1-11d2-883f-0016d3cca427",
            "type": "TRANSFER",
            "amount": 181.0,
            "oldbalanceOrg": 181.0,
            "newbalanceOrg": 0.0,
            "nameDest": "C553264065",
            "anomaly_score": -0.0731,
            "is_anomaly": true,
            "explanation": "Transaksi mengosongkan seluruh saldo akun."
        });

        let tx: Transaction = serde_json::from_value(raw).unwrap();
        assert_eq!(tx.id, TransactionId::from("1b4e28ba-2fa1-11d2-883f-0016d3cca427"));
        assert_eq!(tx.kind, TransactionType::Transfer);
        assert_eq!(tx.name_dest, "C553264065");
        assert!(tx.is_anomaly);
        assert_eq!(tx.anomaly_score, Some(-0.0731));
        assert_eq!(tx.old_balance_orig, Some(181.0));
        assert!(tx.extra.is_empty());
    }

    #[test]
    fn test_parses_minimal_record_with_numeric_id() {
        let tx: Transaction = serde_json::from_str(
            r#"{"id":1,"type":"PAYMENT","amount":100,"is_anomaly":false}"#,
        )
        .unwrap();

        assert_eq!(tx.id, TransactionId::from(1u64));
        assert_eq!(tx.id.to_string(), "1");
        assert_eq!(tx.kind, TransactionType::Payment);
        assert_eq!(tx.amount, 100.0);
        assert!(!tx.is_anomaly);
        assert_eq!(tx.anomaly_score, None);
    }

    #[test]
    fn test_unknown_fields_survive_serialization() {
        let tx: Transaction = serde_json::from_value(json!({
            "id": 7,
            "type": "WIRE",
            "amount": 5.5,
            "is_anomaly": true,
            "step": 743,
            "nameOrig": "C1"
        }))
        .unwrap();

        assert_eq!(tx.kind, TransactionType::Other("WIRE".to_string()));

        let back = serde_json::to_value(&tx).unwrap();
        assert_eq!(back["id"], json!(7));
        assert_eq!(back["type"], json!("WIRE"));
        assert_eq!(back["step"], json!(743));
        assert_eq!(back["nameOrig"], json!("C1"));
        assert!(back.get("anomaly_score").is_none());
    }

    #[test]
    fn test_icon_lookup_falls_back_to_default() {
        assert_eq!(TransactionType::Payment.icon(), TransactionType::Debit.icon());
        assert_eq!(TransactionType::parse("CASH_OUT").icon(), "💵");
        assert_eq!(TransactionType::parse("SOMETHING_NEW").icon(), "💵");
        assert_ne!(TransactionType::Transfer.icon(), TransactionType::CashIn.icon());
    }
}
