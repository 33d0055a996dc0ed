//! Compiled ruleset interpreter
//!
//! The concrete [`RulePackage`] shipped with the runtime: a
//! declarative set of condition/action rules parsed from the YAML
//! artifact fetched from the registry. Rules are grouped into named
//! entry points; within a group the highest-salience matching rule
//! fires (document order breaks ties) and writes the offer's output
//! fields.
//!
//! # Artifact format
//!
//! ```yaml
//! name: offer-rules
//! groups:
//!   - name: offer-session
//!     rules:
//!       - name: premium-large-order
//!         salience: 20
//!         when:
//!           customer_segment: PREMIUM
//!           min_order_amount: "1000"
//!         then:
//!           discount_percentage: "20"
//!           offer_type: PREMIUM_VOLUME
//! ```
//!
//! Monetary values are YAML strings so they parse as exact decimals.

use crate::error::{EvaluationError, PackageError};
use crate::offer::Offer;
use crate::package::RulePackage;
use rust_decimal::Decimal;
use serde::Deserialize;

/// A parsed, verified rule package
#[derive(Debug, Clone, Deserialize)]
pub struct CompiledRuleset {
    /// Package name, informational only
    pub name: String,

    /// Named rule groups; each group is an evaluation entry point
    pub groups: Vec<RuleGroup>,
}

/// A named grouping of rules (one evaluation entry point)
#[derive(Debug, Clone, Deserialize)]
pub struct RuleGroup {
    pub name: String,
    pub rules: Vec<Rule>,
}

/// One condition/action rule
#[derive(Debug, Clone, Deserialize)]
pub struct Rule {
    pub name: String,

    /// Higher salience fires first; ties keep document order
    #[serde(default)]
    pub salience: i32,

    #[serde(default)]
    pub when: Conditions,

    pub then: Actions,
}

/// Conditions a rule matches against the offer's input fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Conditions {
    #[serde(default)]
    pub customer_segment: Option<String>,

    #[serde(default)]
    pub product_category: Option<String>,

    #[serde(default)]
    pub min_order_amount: Option<Decimal>,

    #[serde(default)]
    pub max_order_amount: Option<Decimal>,

    #[serde(default)]
    pub first_time_customer: Option<bool>,

    /// `true` matches only unexpired offers, `false` only expired ones
    #[serde(default)]
    pub unexpired: Option<bool>,
}

/// Output fields a rule writes when it fires.
///
/// Exactly one of `discount_percentage`, `discount_amount` or
/// `rejection_reason` must be set, and `offer_type` may only
/// accompany a discount; enforced at load time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Actions {
    #[serde(default)]
    pub discount_percentage: Option<Decimal>,

    #[serde(default)]
    pub discount_amount: Option<Decimal>,

    #[serde(default)]
    pub offer_type: Option<String>,

    #[serde(default)]
    pub rejection_reason: Option<String>,
}

impl CompiledRuleset {
    /// Parse and verify a rule package from YAML artifact content
    pub fn from_yaml(content: &str) -> Result<Self, PackageError> {
        let mut ruleset: CompiledRuleset = serde_yaml::from_str(content)?;
        ruleset.verify()?;

        // Pre-sort so evaluation is a single ordered scan. The sort is
        // stable, so equal salience keeps document order.
        for group in &mut ruleset.groups {
            group.rules.sort_by_key(|rule| std::cmp::Reverse(rule.salience));
        }

        Ok(ruleset)
    }

    /// Names of the rule groups in this package
    pub fn group_names(&self) -> Vec<String> {
        self.groups.iter().map(|g| g.name.clone()).collect()
    }

    fn verify(&self) -> Result<(), PackageError> {
        if self.groups.is_empty() {
            return Err(PackageError::Invalid(
                "package contains no rule groups".to_string(),
            ));
        }

        for group in &self.groups {
            if group.name.trim().is_empty() {
                return Err(PackageError::Invalid(
                    "rule group with empty name".to_string(),
                ));
            }

            for rule in &group.rules {
                if rule.name.trim().is_empty() {
                    return Err(PackageError::Invalid(format!(
                        "rule with empty name in group '{}'",
                        group.name
                    )));
                }
                rule.then.verify(&rule.name)?;
            }
        }

        let mut names: Vec<&str> = self.groups.iter().map(|g| g.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        if names.len() != self.groups.len() {
            return Err(PackageError::Invalid(
                "duplicate rule group names".to_string(),
            ));
        }

        Ok(())
    }
}

impl Actions {
    fn verify(&self, rule_name: &str) -> Result<(), PackageError> {
        let set = [
            self.discount_percentage.is_some(),
            self.discount_amount.is_some(),
            self.rejection_reason.is_some(),
        ]
        .iter()
        .filter(|&&s| s)
        .count();

        if set != 1 {
            return Err(PackageError::Invalid(format!(
                "rule '{}' must set exactly one of discount_percentage, \
                 discount_amount or rejection_reason",
                rule_name
            )));
        }

        // a rejection carries no offer type; firing would drop it
        if self.rejection_reason.is_some() && self.offer_type.is_some() {
            return Err(PackageError::Invalid(format!(
                "rule '{}' sets offer_type together with rejection_reason",
                rule_name
            )));
        }

        if let Some(pct) = self.discount_percentage {
            if pct <= Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
                return Err(PackageError::Invalid(format!(
                    "rule '{}' has discount_percentage outside (0, 100]",
                    rule_name
                )));
            }
        }

        if let Some(amount) = self.discount_amount {
            if amount <= Decimal::ZERO {
                return Err(PackageError::Invalid(format!(
                    "rule '{}' has non-positive discount_amount",
                    rule_name
                )));
            }
        }

        Ok(())
    }
}

impl Rule {
    fn matches(&self, offer: &Offer, today: chrono::NaiveDate) -> bool {
        let when = &self.when;

        if let Some(segment) = &when.customer_segment {
            if offer.customer_segment != *segment {
                return false;
            }
        }
        if let Some(category) = &when.product_category {
            if offer.product_category != *category {
                return false;
            }
        }
        if let Some(min) = when.min_order_amount {
            if offer.order_amount < min {
                return false;
            }
        }
        if let Some(max) = when.max_order_amount {
            if offer.order_amount > max {
                return false;
            }
        }
        if let Some(first_time) = when.first_time_customer {
            if offer.first_time_customer != first_time {
                return false;
            }
        }
        if let Some(unexpired) = when.unexpired {
            if offer.is_expired_at(today) == unexpired {
                return false;
            }
        }

        true
    }

    fn fire(&self, offer: &mut Offer) {
        let then = &self.then;

        if let Some(reason) = &then.rejection_reason {
            offer.offer_applicable = false;
            offer.rejection_reason = Some(reason.clone());
            return;
        }

        offer.offer_applicable = true;
        offer.applied_offer_type = then.offer_type.clone();

        if let Some(pct) = then.discount_percentage {
            offer.discount_percentage = pct;
            offer.discount_amount = offer.order_amount * pct / Decimal::ONE_HUNDRED;
        } else if let Some(amount) = then.discount_amount {
            // A fixed discount never exceeds what is owed
            offer.discount_amount = amount.min(offer.order_amount);
        }
    }
}

impl RulePackage for CompiledRuleset {
    fn evaluate(&self, entry_point: &str, offer: &mut Offer) -> Result<(), EvaluationError> {
        let group = self
            .groups
            .iter()
            .find(|g| g.name == entry_point)
            .ok_or_else(|| EvaluationError::UnknownEntryPoint(entry_point.to_string()))?;

        offer.reset_outputs();

        let today = chrono::Utc::now().date_naive();
        if let Some(rule) = group.rules.iter().find(|r| r.matches(offer, today)) {
            rule.fire(offer);
        }

        Ok(())
    }

    fn entry_points(&self) -> Vec<String> {
        self.group_names()
    }
}
