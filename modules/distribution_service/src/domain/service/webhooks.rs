//! Revolut payment webhooks

use super::{recover, Service};
use crate::contract::{
    BillingCycle, DistributionError, TransactionKind, WebhookLog, WebhookOutcome, WebhookReceipt,
};
use crate::domain::webhook::{self, DeliveryKey, EventClass, OrderMetadata, WebhookPayload};
use crate::domain::wallet::LedgerPosting;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

impl Service {
    /// Append a row to `webhook_logs`; failures are logged only
    async fn log_webhook(
        &self,
        event_type: &str,
        order_id: Option<&str>,
        status: &str,
        data: serde_json::Value,
    ) {
        let log = WebhookLog {
            id: Uuid::new_v4(),
            provider: webhook::PROVIDER.to_string(),
            event_type: event_type.to_string(),
            order_id: order_id.map(str::to_string),
            status: status.to_string(),
            data,
            created_at: Utc::now(),
        };
        if let Err(e) = self.repos.audit.record_webhook(&log).await {
            tracing::warn!(event_type, status, error = %e, "failed to write webhook log");
        }
    }

    /// Verify, deduplicate and apply a Revolut webhook delivery.
    ///
    /// Processing failures after verification are acknowledged (logged as
    /// `failed`) so the provider does not retry.
    pub async fn handle_revolut_webhook(
        &self,
        raw_body: &[u8],
        signature: Option<&str>,
    ) -> Result<WebhookReceipt, DistributionError> {
        if raw_body.is_empty() {
            tracing::error!("empty webhook body received");
            return Err(DistributionError::validation("Empty request body"));
        }

        // best effort labels for rejected deliveries; trusted only after verification
        let peek = serde_json::from_slice::<WebhookPayload>(raw_body).ok();
        let peek_event = peek
            .as_ref()
            .map(|p| p.event.clone())
            .unwrap_or_else(|| "unknown".to_string());
        let peek_order = peek.as_ref().and_then(|p| p.order_id().map(str::to_string));

        let Some(signature) = signature.filter(|s| !s.trim().is_empty()) else {
            tracing::error!("missing Revolut signature header");
            self.log_webhook(
                &peek_event,
                peek_order.as_deref(),
                "failed",
                json!({"error": "Missing signature"}),
            )
            .await;
            return Err(DistributionError::InvalidSignature {
                reason: "Missing signature".to_string(),
            });
        };

        let Some(secret) = self.settings.revolut_webhook_secret.as_deref() else {
            tracing::error!("Revolut webhook secret not configured");
            self.log_webhook(
                &peek_event,
                peek_order.as_deref(),
                "failed",
                json!({"error": "Webhook secret not configured"}),
            )
            .await;
            return Err(DistributionError::Internal);
        };

        if !webhook::verify_signature(secret.as_bytes(), raw_body, signature) {
            tracing::error!(event = %peek_event, "invalid webhook signature");
            self.log_webhook(
                &peek_event,
                peek_order.as_deref(),
                "failed",
                json!({"error": "Invalid signature"}),
            )
            .await;
            return Err(DistributionError::InvalidSignature {
                reason: "Invalid signature".to_string(),
            });
        }

        let payload: WebhookPayload = serde_json::from_slice(raw_body).map_err(|e| {
            tracing::error!(error = %e, "invalid JSON in webhook body");
            DistributionError::validation("Invalid JSON")
        })?;
        let event = payload.event.clone();

        let Some(order_id) = payload.order_id().map(str::to_string) else {
            tracing::error!(event = %event, "no order id in webhook data");
            self.log_webhook(&event, None, "failed", json!({"error": "No order ID"}))
                .await;
            return Err(DistributionError::validation("No order ID in webhook data"));
        };

        let receipt = |outcome: WebhookOutcome, message: &str| WebhookReceipt {
            outcome,
            event: event.clone(),
            order_id: order_id.clone(),
            message: message.to_string(),
        };

        let class = webhook::classify_event(&event);
        if class == EventClass::Unhandled {
            tracing::info!(
                event = %event,
                order_id = %order_id,
                "ignoring unhandled webhook event"
            );
            self.log_webhook(
                &event,
                Some(&order_id),
                "ignored",
                json!({"reason": "Unhandled event type"}),
            )
            .await;
            return Ok(receipt(WebhookOutcome::Ignored, "Event ignored"));
        }

        match self
            .repos
            .audit
            .webhook_processed(webhook::PROVIDER, &order_id, &event)
            .await
        {
            Ok(true) => {
                tracing::info!(event = %event, order_id = %order_id, "duplicate webhook delivery");
                self.log_webhook(&event, Some(&order_id), "duplicate", json!({}))
                    .await;
                return Ok(receipt(WebhookOutcome::Duplicate, "Event already processed"));
            }
            Ok(false) => {}
            Err(e) => {
                tracing::error!(error = %e, "failed to check webhook log");
                return Err(DistributionError::Internal);
            }
        }

        tracing::info!(
            event = %event,
            order_id = %order_id,
            state = ?payload.state(),
            "processing webhook event"
        );

        if class == EventClass::PaymentFailed {
            tracing::warn!(
                event = %event,
                order_id = %order_id,
                reason = ?payload.failure_reason(),
                "payment not completed"
            );
            self.log_webhook(
                &event,
                Some(&order_id),
                "processed",
                json!({
                    "orderState": payload.state(),
                    "failureReason": payload.failure_reason(),
                }),
            )
            .await;
            return Ok(receipt(WebhookOutcome::Processed, "Webhook processed successfully"));
        }

        let key = DeliveryKey::revolut(&order_id, &event);
        match self.apply_payment(&key, payload.metadata()).await {
            Ok(None) => {
                tracing::info!(event = %event, order_id = %order_id, "delivery already applied");
                self.log_webhook(&event, Some(&order_id), "duplicate", json!({}))
                    .await;
                Ok(receipt(WebhookOutcome::Duplicate, "Event already processed"))
            }
            Ok(Some(result)) => {
                self.log_webhook(
                    &event,
                    Some(&order_id),
                    "processed",
                    json!({"orderState": payload.state(), "processingResult": result}),
                )
                .await;
                Ok(receipt(WebhookOutcome::Processed, "Webhook processed successfully"))
            }
            Err(e) => {
                tracing::error!(
                    event = %event,
                    order_id = %order_id,
                    error = %e,
                    "payment processing failed"
                );
                self.log_webhook(
                    &event,
                    Some(&order_id),
                    "failed",
                    json!({"error": e.to_string(), "orderState": payload.state()}),
                )
                .await;
                Ok(receipt(
                    WebhookOutcome::Failed,
                    "Webhook received but processing failed",
                ))
            }
        }
    }

    /// Activate the paid plan, or credit a wallet top up. Each effect claims
    /// `key` in its own transaction; `None` means the key was claimed before.
    async fn apply_payment(
        &self,
        key: &DeliveryKey,
        metadata: OrderMetadata,
    ) -> Result<Option<serde_json::Value>, DistributionError> {
        let Some(user_id) = metadata.user_id else {
            tracing::warn!(order_id = %key.order_id, "no user in order metadata, nothing to apply");
            return Ok(Some(json!({"message": "No subscription or top up to process"})));
        };

        if let Some(plan_id) = metadata.plan_id.as_deref() {
            let cycle = metadata
                .billing
                .as_deref()
                .map(str::parse::<BillingCycle>)
                .transpose()?
                .unwrap_or(BillingCycle::Monthly);
            let amount = metadata
                .original_amount
                .as_ref()
                .and_then(webhook::decimal_from_json);

            let activated = self
                .activate_subscription_from_payment(user_id, plan_id, cycle, amount, Some(key))
                .await?;
            return Ok(activated.map(|(subscription, action)| {
                json!({
                    "subscription": {
                        "id": subscription.id,
                        "tier": subscription.tier,
                        "action": action.as_str(),
                    }
                })
            }));
        }

        if let Some(raw) = metadata.top_up_amount.as_ref() {
            let amount = webhook::decimal_from_json(raw)
                .filter(|a| a.is_sign_positive() && !a.is_zero())
                .ok_or_else(|| DistributionError::validation("Invalid top up amount"))?;

            let posting = LedgerPosting::credit(
                user_id,
                amount,
                TransactionKind::TopUp,
                &self.settings.default_currency,
            )
            .with_description("Wallet top-up via Revolut")
            .with_reference(&key.order_id);

            let Some(transactions) = self
                .repos
                .finance
                .post_entries_once(key, std::slice::from_ref(&posting))
                .await
                .map_err(recover("wallet top up"))?
            else {
                return Ok(None);
            };
            self.wallet_posted(&transactions).await;

            let balance = transactions.first().map(|t| t.balance_after);
            return Ok(Some(json!({
                "wallet": {
                    "action": "topped_up",
                    "topUpAmount": amount,
                    "walletBalance": balance,
                }
            })));
        }

        Ok(Some(json!({"message": "No subscription or top up to process"})))
    }
}
