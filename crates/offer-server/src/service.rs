//! Offer evaluation service
//!
//! Thin mapping layer between the REST DTOs and the runtime
//! container: build the offer record, run it through one evaluation
//! session, read the mutated outputs back. No business logic beyond
//! field mapping and money rounding lives here.

use crate::api::rest::types::{OfferRequestPayload, OfferResponsePayload};
use crate::error::ServerError;
use offer_core::offer::round_money;
use offer_core::Offer;
use offer_runtime::RuntimeContainer;
use tracing::info;

/// Evaluate one offer request against the active rule package
pub fn evaluate_offer(
    container: &RuntimeContainer,
    request: OfferRequestPayload,
) -> Result<OfferResponsePayload, ServerError> {
    if request.order_amount.is_sign_negative() {
        return Err(ServerError::InvalidRequest(
            "order_amount must not be negative".to_string(),
        ));
    }

    info!(
        offer_id = %request.offer_id,
        customer_id = %request.customer_id,
        "Evaluating offer"
    );

    let mut offer = map_to_offer(request);

    let session = container.new_session()?;
    session.evaluate(&mut offer)?;

    info!(
        offer_id = %offer.offer_id,
        applicable = offer.offer_applicable,
        discount_percentage = %offer.discount_percentage,
        version = %session.version(),
        "Rules executed"
    );

    Ok(map_to_response(offer))
}

/// Map the request DTO to the domain record, output fields defaulted
fn map_to_offer(request: OfferRequestPayload) -> Offer {
    let mut offer = Offer::new(
        request.offer_id,
        request.customer_id,
        request.customer_segment,
        request.order_amount,
        request.product_category,
    )
    .with_first_time_customer(request.is_first_time_customer.unwrap_or(false));

    if let Some(valid_until) = request.offer_valid_until {
        offer = offer.with_valid_until(valid_until);
    }

    offer
}

/// Map the mutated record to the response DTO, money rounded to
/// 2 fraction digits, half-up
fn map_to_response(offer: Offer) -> OfferResponsePayload {
    OfferResponsePayload {
        final_amount: offer.final_amount_rounded(),
        offer_id: offer.offer_id,
        offer_applicable: offer.offer_applicable,
        discount_percentage: offer.discount_percentage,
        discount_amount: round_money(offer.discount_amount),
        applied_offer_type: offer.applied_offer_type,
        rejection_reason: offer.rejection_reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use offer_core::{Coordinate, VersionId};
    use offer_registry::CompiledArtifact;
    use offer_runtime::{compile_artifact, ContainerSettings};
    use rust_decimal_macros::dec;

    const RULES: &str = r#"
name: offer-rules
groups:
  - name: offer-session
    rules:
      - name: premium-large-order
        salience: 20
        when:
          customer_segment: PREMIUM
          min_order_amount: "1000"
        then:
          discount_percentage: "20"
          offer_type: PREMIUM_VOLUME
"#;

    fn loaded_container() -> RuntimeContainer {
        let container = RuntimeContainer::new(
            Coordinate::new("io.shaama", "offer-rules"),
            ContainerSettings::new("offer-session"),
        );
        let artifact = CompiledArtifact::new(VersionId::new("1.0.0"), RULES);
        container.swap(compile_artifact(&artifact).unwrap(), artifact.version);
        container
    }

    fn premium_request() -> OfferRequestPayload {
        OfferRequestPayload {
            offer_id: "OFF-1".to_string(),
            customer_id: "CUST-1".to_string(),
            customer_segment: "PREMIUM".to_string(),
            order_amount: dec!(1500.00),
            product_category: "ELECTRONICS".to_string(),
            is_first_time_customer: None,
            offer_valid_until: None,
        }
    }

    #[test]
    fn test_evaluate_premium_offer() {
        let container = loaded_container();
        let response = evaluate_offer(&container, premium_request()).unwrap();

        assert!(response.offer_applicable);
        assert_eq!(response.discount_percentage, dec!(20));
        assert_eq!(response.discount_amount, dec!(300.00));
        assert_eq!(response.final_amount, dec!(1200.00));
        assert_eq!(response.applied_offer_type.as_deref(), Some("PREMIUM_VOLUME"));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let container = loaded_container();
        let mut request = premium_request();
        request.order_amount = dec!(-1.00);

        let err = evaluate_offer(&container, request).unwrap_err();
        assert!(matches!(err, ServerError::InvalidRequest(_)));
    }

    #[test]
    fn test_not_ready_container() {
        let container = RuntimeContainer::new(
            Coordinate::new("io.shaama", "offer-rules"),
            ContainerSettings::new("offer-session"),
        );

        let err = evaluate_offer(&container, premium_request()).unwrap_err();
        assert!(matches!(err, ServerError::NotReady));
    }

    #[test]
    fn test_response_amounts_rounded_half_up() {
        let container = loaded_container();
        let mut request = premium_request();
        // 20% of 1000.03 = 200.006 -> 200.01 after rounding
        request.order_amount = dec!(1000.03);

        let response = evaluate_offer(&container, request).unwrap();
        assert_eq!(response.discount_amount, dec!(200.01));
        assert_eq!(response.final_amount, dec!(800.02));
    }
}
