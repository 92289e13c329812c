//! Revolut webhook payloads and signature verification

use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use serde::Deserialize;
use sha2::Sha256;
use std::str::FromStr;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

pub const PROVIDER: &str = "revolut";

/// Header carrying the payload signature
pub const SIGNATURE_HEADER: &str = "revolut-signature";

/// Identifies one provider event for one order. A delivery is applied at
/// most once per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeliveryKey {
    pub provider: String,
    pub order_id: String,
    pub event_type: String,
}

impl DeliveryKey {
    pub fn revolut(order_id: &str, event_type: &str) -> Self {
        Self {
            provider: PROVIDER.to_string(),
            order_id: order_id.to_string(),
            event_type: event_type.to_string(),
        }
    }
}

/// Hex HMAC-SHA256 of `body` under `secret`
pub fn sign(secret: &[u8], body: &[u8]) -> String {
    match HmacSha256::new_from_slice(secret) {
        Ok(mut mac) => {
            mac.update(body);
            hex::encode(mac.finalize().into_bytes())
        }
        Err(_) => String::new(),
    }
}

/// Check a `Revolut-Signature` header against the raw body.
///
/// The header may hold several comma separated signatures, each optionally
/// prefixed with `v1=`. Comparison is constant time.
pub fn verify_signature(secret: &[u8], body: &[u8], header: &str) -> bool {
    header
        .split(',')
        .map(str::trim)
        .map(|entry| entry.strip_prefix("v1=").unwrap_or(entry))
        .filter_map(|entry| hex::decode(entry).ok())
        .any(|expected| {
            let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
                return false;
            };
            mac.update(body);
            mac.verify_slice(&expected).is_ok()
        })
}

/// Constant time equality of two shared secrets, compared through their HMACs
pub fn secrets_equal(expected: &str, provided: &str) -> bool {
    const CONTEXT: &[u8] = b"shared-secret";
    let (Ok(mut ours), Ok(mut theirs)) = (
        HmacSha256::new_from_slice(expected.as_bytes()),
        HmacSha256::new_from_slice(provided.as_bytes()),
    ) else {
        return false;
    };
    ours.update(CONTEXT);
    theirs.update(CONTEXT);
    ours.verify_slice(&theirs.finalize().into_bytes()).is_ok()
}

/// How the service reacts to an event type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventClass {
    /// Payment captured or authorised: activate what was paid for
    PaymentSucceeded,
    /// Cancelled, declined or failed: record only
    PaymentFailed,
    Unhandled,
}

pub fn classify_event(event: &str) -> EventClass {
    match event {
        "ORDER_COMPLETED" | "ORDER_AUTHORISED" => EventClass::PaymentSucceeded,
        "ORDER_CANCELLED" | "ORDER_PAYMENT_DECLINED" | "ORDER_PAYMENT_FAILED" => {
            EventClass::PaymentFailed
        }
        _ => EventClass::Unhandled,
    }
}

/// Webhook body as sent by Revolut
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub data: Option<OrderData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderData {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub metadata: OrderMetadata,
}

/// Metadata attached to the order at checkout
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderMetadata {
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub plan_id: Option<String>,
    #[serde(default)]
    pub billing: Option<String>,
    #[serde(default)]
    pub original_amount: Option<serde_json::Value>,
    #[serde(default)]
    pub top_up_amount: Option<serde_json::Value>,
}

impl WebhookPayload {
    /// Order id from `data.id`, falling back to the top level `order_id`
    pub fn order_id(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|d| d.id.as_deref())
            .or(self.order_id.as_deref())
            .filter(|id| !id.is_empty())
    }

    pub fn metadata(&self) -> OrderMetadata {
        self.data
            .as_ref()
            .map(|d| d.metadata.clone())
            .unwrap_or_default()
    }

    pub fn state(&self) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.state.as_deref())
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.failure_reason.as_deref())
    }
}

/// Amounts arrive either as JSON numbers or strings
pub fn decimal_from_json(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        serde_json::Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}
