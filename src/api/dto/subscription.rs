//! DTOs for subscription CRUD endpoints.

use chrono::NaiveDate;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::entities::NewSubscription;

const BILLING_CYCLES: [&str; 3] = ["weekly", "monthly", "yearly"];

/// Create/update payload for a subscription record.
#[derive(Debug, Deserialize, Validate)]
pub struct SubscriptionRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(length(min = 1, max = 100))]
    pub category: String,

    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: f64,

    #[validate(custom(function = "validate_billing_cycle"))]
    pub billing_cycle: String,

    pub next_billing_date: NaiveDate,
}

impl From<SubscriptionRequest> for NewSubscription {
    fn from(req: SubscriptionRequest) -> Self {
        Self {
            name: req.name,
            category: req.category,
            price: req.price,
            billing_cycle: req.billing_cycle,
            next_billing_date: req.next_billing_date,
        }
    }
}

fn validate_billing_cycle(value: &str) -> Result<(), ValidationError> {
    if BILLING_CYCLES.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new("billing_cycle")
            .with_message("Billing cycle must be weekly, monthly, or yearly".into()))
    }
}
