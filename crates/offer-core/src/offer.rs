//! The offer decision record
//!
//! An [`Offer`] carries one evaluation request and its outcome.
//! Input fields are set at construction; output fields are written
//! only by rule evaluation and reset to their defaults before every
//! run. The record lives for exactly one request: built by the
//! service, passed by `&mut` into a single evaluation call, read
//! back, then dropped.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// One offer evaluation request/response pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    // ---- input (caller supplied, never touched by rules) ----
    /// Offer identifier
    pub offer_id: String,

    /// Customer identifier
    pub customer_id: String,

    /// Customer segment tag (e.g. "PREMIUM", "REGULAR")
    pub customer_segment: String,

    /// Order amount, non-negative
    pub order_amount: Decimal,

    /// Product category tag
    pub product_category: String,

    /// Whether this is the customer's first interaction
    pub first_time_customer: bool,

    /// Optional expiry date of the offer
    pub valid_until: Option<NaiveDate>,

    // ---- output (written only by rule evaluation) ----
    /// Whether any offer applies
    pub offer_applicable: bool,

    /// Discount percentage granted, 0 when not applicable
    pub discount_percentage: Decimal,

    /// Absolute discount amount, 0 when not applicable
    pub discount_amount: Decimal,

    /// Type of the offer that fired, if any
    pub applied_offer_type: Option<String>,

    /// Why no offer applies, if the rules rejected it explicitly
    pub rejection_reason: Option<String>,
}

impl Offer {
    /// Create an offer with output fields at their defaults
    pub fn new(
        offer_id: impl Into<String>,
        customer_id: impl Into<String>,
        customer_segment: impl Into<String>,
        order_amount: Decimal,
        product_category: impl Into<String>,
    ) -> Self {
        Self {
            offer_id: offer_id.into(),
            customer_id: customer_id.into(),
            customer_segment: customer_segment.into(),
            order_amount,
            product_category: product_category.into(),
            first_time_customer: false,
            valid_until: None,
            offer_applicable: false,
            discount_percentage: Decimal::ZERO,
            discount_amount: Decimal::ZERO,
            applied_offer_type: None,
            rejection_reason: None,
        }
    }

    /// Mark the offer as the customer's first interaction
    pub fn with_first_time_customer(mut self, first_time: bool) -> Self {
        self.first_time_customer = first_time;
        self
    }

    /// Set the expiry date
    pub fn with_valid_until(mut self, date: NaiveDate) -> Self {
        self.valid_until = Some(date);
        self
    }

    /// Reset all output fields to their pre-evaluation defaults
    pub fn reset_outputs(&mut self) {
        self.offer_applicable = false;
        self.discount_percentage = Decimal::ZERO;
        self.discount_amount = Decimal::ZERO;
        self.applied_offer_type = None;
        self.rejection_reason = None;
    }

    /// Whether the offer has expired as of `today`
    pub fn is_expired_at(&self, today: NaiveDate) -> bool {
        matches!(self.valid_until, Some(until) if until < today)
    }

    /// Amount payable after any discount; never negative
    pub fn final_amount(&self) -> Decimal {
        let amount = if self.offer_applicable {
            self.order_amount - self.discount_amount
        } else {
            self.order_amount
        };
        amount.max(Decimal::ZERO)
    }

    /// Final amount rounded to 2 fraction digits, half-up
    pub fn final_amount_rounded(&self) -> Decimal {
        round_money(self.final_amount())
    }

    /// Check the output invariant:
    /// not applicable => both discounts zero;
    /// applicable => some discount granted and it never exceeds the
    /// order amount.
    pub fn outputs_consistent(&self) -> bool {
        if self.offer_applicable {
            (!self.discount_percentage.is_zero() || !self.discount_amount.is_zero())
                && self.discount_amount <= self.order_amount
        } else {
            self.discount_percentage.is_zero() && self.discount_amount.is_zero()
        }
    }
}

/// Round a monetary value to 2 fraction digits, half-up
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn premium_offer() -> Offer {
        Offer::new("OFF-1", "CUST-1", "PREMIUM", dec!(1500.00), "ELECTRONICS")
    }

    #[test]
    fn test_new_offer_outputs_defaulted() {
        let offer = premium_offer();
        assert!(!offer.offer_applicable);
        assert_eq!(offer.discount_percentage, Decimal::ZERO);
        assert_eq!(offer.discount_amount, Decimal::ZERO);
        assert!(offer.applied_offer_type.is_none());
        assert!(offer.rejection_reason.is_none());
    }

    #[test]
    fn test_final_amount_not_applicable() {
        let offer = premium_offer();
        assert_eq!(offer.final_amount(), dec!(1500.00));
    }

    #[test]
    fn test_final_amount_with_discount() {
        let mut offer = premium_offer();
        offer.offer_applicable = true;
        offer.discount_percentage = dec!(20);
        offer.discount_amount = dec!(300.00);
        assert_eq!(offer.final_amount(), dec!(1200.00));
    }

    #[test]
    fn test_final_amount_never_negative() {
        let mut offer = Offer::new("OFF-2", "CUST-2", "REGULAR", dec!(10.00), "BOOKS");
        offer.offer_applicable = true;
        offer.discount_amount = dec!(15.00);
        assert_eq!(offer.final_amount(), Decimal::ZERO);
    }

    #[test]
    fn test_reset_outputs() {
        let mut offer = premium_offer();
        offer.offer_applicable = true;
        offer.discount_percentage = dec!(20);
        offer.discount_amount = dec!(300.00);
        offer.applied_offer_type = Some("PREMIUM_VOLUME".to_string());

        offer.reset_outputs();
        assert!(!offer.offer_applicable);
        assert_eq!(offer.discount_amount, Decimal::ZERO);
        assert!(offer.applied_offer_type.is_none());
    }

    #[test]
    fn test_is_expired_at() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let expired = premium_offer()
            .with_valid_until(NaiveDate::from_ymd_opt(2025, 6, 14).unwrap());
        let valid = premium_offer()
            .with_valid_until(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
        let open_ended = premium_offer();

        assert!(expired.is_expired_at(today));
        assert!(!valid.is_expired_at(today));
        assert!(!open_ended.is_expired_at(today));
    }

    #[test]
    fn test_outputs_consistent() {
        let mut offer = premium_offer();
        assert!(offer.outputs_consistent());

        // applicable with no discount granted is inconsistent
        offer.offer_applicable = true;
        assert!(!offer.outputs_consistent());

        offer.discount_percentage = dec!(20);
        offer.discount_amount = dec!(300.00);
        assert!(offer.outputs_consistent());

        // discount exceeding the order amount is inconsistent
        offer.discount_amount = dec!(2000.00);
        assert!(!offer.outputs_consistent());

        // not applicable with a residual discount is inconsistent
        offer.offer_applicable = false;
        offer.discount_amount = dec!(1.00);
        assert!(!offer.outputs_consistent());
    }

    #[test]
    fn test_round_money_half_up() {
        assert_eq!(round_money(dec!(10.005)), dec!(10.01));
        assert_eq!(round_money(dec!(10.004)), dec!(10.00));
        assert_eq!(round_money(dec!(1200)), dec!(1200.00));
    }
}
