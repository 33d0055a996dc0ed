//! Integration tests for the runtime container, sessions and poller

use async_trait::async_trait;
use offer_core::{Coordinate, Offer, VersionId};
use offer_registry::{
    ArtifactResolver, CompiledArtifact, InMemoryRegistry, RegistryError, RegistryResult,
};
use offer_runtime::{ContainerSettings, RuntimeContainer, RuntimeError, VersionPoller};
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// 20% premium discount
const RULES_V1: &str = r#"
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
      - name: first-time-customer
        salience: 10
        when:
          first_time_customer: true
          min_order_amount: "500"
        then:
          discount_percentage: "15"
          offer_type: WELCOME
"#;

/// Same rules with the premium discount raised to 25%
const RULES_V2: &str = r#"
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
          discount_percentage: "25"
          offer_type: PREMIUM_VOLUME
"#;

fn coordinate() -> Coordinate {
    Coordinate::new("io.shaama", "offer-rules")
}

fn premium_offer() -> Offer {
    Offer::new("OFF-A", "CUST-1", "PREMIUM", dec!(1500.00), "ELECTRONICS")
}

async fn loaded_container(registry: &InMemoryRegistry) -> Arc<RuntimeContainer> {
    let container = Arc::new(RuntimeContainer::new(
        coordinate(),
        ContainerSettings::new("offer-session"),
    ));
    container.load_initial(registry).await.unwrap();
    container
}

#[tokio::test]
async fn test_initial_load_and_evaluation() {
    let registry = InMemoryRegistry::new();
    registry.publish("1.0.0", RULES_V1);

    let container = loaded_container(&registry).await;
    assert_eq!(container.active_version(), Some(VersionId::new("1.0.0")));

    let session = container.new_session().unwrap();
    let mut offer = premium_offer();
    session.evaluate(&mut offer).unwrap();

    assert!(offer.offer_applicable);
    assert_eq!(offer.discount_percentage, dec!(20));
    assert_eq!(offer.discount_amount, dec!(300.00));
    assert_eq!(offer.final_amount(), dec!(1200.00));
}

#[tokio::test]
async fn test_initial_load_failure_is_fatal() {
    let registry = InMemoryRegistry::new(); // nothing published
    let container = RuntimeContainer::new(coordinate(), ContainerSettings::new("offer-session"));

    let err = container.load_initial(&registry).await.unwrap_err();
    assert!(matches!(err, RuntimeError::LoadFailed(_)));
    assert!(!container.is_ready());
    assert!(matches!(
        container.new_session().unwrap_err(),
        RuntimeError::NotReady
    ));
}

#[tokio::test]
async fn test_in_flight_session_survives_swap() {
    let registry = Arc::new(InMemoryRegistry::new());
    registry.publish("1.0.0", RULES_V1);

    let container = loaded_container(&registry).await;
    let poller = VersionPoller::new(container.clone(), registry.clone());

    // session created before the swap stays bound to 1.0.0
    let old_session = container.new_session().unwrap();

    // publish a newer version and let the poller promote it
    registry.publish("1.1.0", RULES_V2);
    poller.check_once().await;
    assert_eq!(container.active_version(), Some(VersionId::new("1.1.0")));

    // scenario D: in-flight evaluation still sees the 20% rules
    let mut old_offer = premium_offer();
    old_session.evaluate(&mut old_offer).unwrap();
    assert_eq!(old_offer.discount_amount, dec!(300.00));
    assert_eq!(old_offer.final_amount(), dec!(1200.00));
    assert_eq!(old_session.version(), &VersionId::new("1.0.0"));

    // a fresh session sees the 25% rules
    let new_session = container.new_session().unwrap();
    let mut new_offer = premium_offer();
    new_session.evaluate(&mut new_offer).unwrap();
    assert_eq!(new_offer.discount_percentage, dec!(25));
    assert_eq!(new_offer.discount_amount, dec!(375.00));
    assert_eq!(new_offer.final_amount(), dec!(1125.00));
}

#[tokio::test]
async fn test_broken_artifact_keeps_current_version() {
    let registry = Arc::new(InMemoryRegistry::new());
    registry.publish("1.0.0", RULES_V1);

    let container = loaded_container(&registry).await;
    let poller = VersionPoller::new(container.clone(), registry.clone());

    registry.publish("1.1.0", "groups: [not, valid, rules");
    poller.check_once().await;

    // still serving 1.0.0, and evaluation still works
    assert_eq!(container.active_version(), Some(VersionId::new("1.0.0")));
    let mut offer = premium_offer();
    container.new_session().unwrap().evaluate(&mut offer).unwrap();
    assert_eq!(offer.discount_amount, dec!(300.00));

    // a fixed artifact is picked up on a later tick
    registry.publish("1.2.0", RULES_V2);
    poller.check_once().await;
    assert_eq!(container.active_version(), Some(VersionId::new("1.2.0")));
}

/// Resolver that fails its first polls, then delegates
struct FlakyResolver {
    inner: Arc<InMemoryRegistry>,
    failures_left: AtomicUsize,
}

#[async_trait]
impl ArtifactResolver for FlakyResolver {
    async fn fetch_latest(
        &self,
        coordinate: &Coordinate,
        selector: &offer_core::VersionSelector,
    ) -> RegistryResult<CompiledArtifact> {
        self.inner.fetch_latest(coordinate, selector).await
    }

    async fn poll_newer(
        &self,
        coordinate: &Coordinate,
        current: &VersionId,
    ) -> RegistryResult<Option<CompiledArtifact>> {
        let remaining = self.failures_left.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_left.store(remaining - 1, Ordering::SeqCst);
            return Err(RegistryError::ApiError("connection refused".to_string()));
        }
        self.inner.poll_newer(coordinate, current).await
    }
}

#[tokio::test]
async fn test_poll_failures_are_retried() {
    let registry = Arc::new(InMemoryRegistry::new());
    registry.publish("1.0.0", RULES_V1);
    registry.publish("1.1.0", RULES_V2);

    let container = Arc::new(RuntimeContainer::new(
        coordinate(),
        ContainerSettings::new("offer-session")
            .with_selector(offer_core::VersionSelector::Exact(VersionId::new("1.0.0"))),
    ));
    container.load_initial(registry.as_ref()).await.unwrap();

    let resolver = Arc::new(FlakyResolver {
        inner: registry,
        failures_left: AtomicUsize::new(2),
    });
    let poller = VersionPoller::new(container.clone(), resolver);

    // two failing ticks leave the container untouched
    poller.check_once().await;
    poller.check_once().await;
    assert_eq!(container.active_version(), Some(VersionId::new("1.0.0")));

    // the next tick succeeds and promotes 1.1.0
    poller.check_once().await;
    assert_eq!(container.active_version(), Some(VersionId::new("1.1.0")));
}

#[tokio::test]
async fn test_spawned_poller_promotes_and_shuts_down() {
    let registry = Arc::new(InMemoryRegistry::new());
    registry.publish("1.0.0", RULES_V1);

    let container = Arc::new(RuntimeContainer::new(
        coordinate(),
        ContainerSettings::new("offer-session").with_poll_interval(Duration::from_millis(20)),
    ));
    container.load_initial(registry.as_ref()).await.unwrap();

    let handle = VersionPoller::new(container.clone(), registry.clone()).spawn();

    registry.publish("1.1.0", RULES_V2);

    // wait for the poller to pick it up, bounded
    let mut promoted = false;
    for _ in 0..50 {
        if container.active_version() == Some(VersionId::new("1.1.0")) {
            promoted = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(promoted, "poller never promoted the new version");

    // shutdown is bounded by roughly one tick
    tokio::time::timeout(Duration::from_secs(1), handle.shutdown())
        .await
        .expect("poller did not stop promptly");
}

#[tokio::test]
async fn test_dropped_handle_stops_poller() {
    let registry = Arc::new(InMemoryRegistry::new());
    registry.publish("1.0.0", RULES_V1);

    let container = Arc::new(RuntimeContainer::new(
        coordinate(),
        ContainerSettings::new("offer-session").with_poll_interval(Duration::from_millis(20)),
    ));
    container.load_initial(registry.as_ref()).await.unwrap();

    let handle = VersionPoller::new(container.clone(), registry.clone()).spawn();
    drop(handle);

    // the loop must have exited: a version published after the drop
    // is never promoted, even across many would-be ticks
    registry.publish("1.1.0", RULES_V2);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(container.active_version(), Some(VersionId::new("1.0.0")));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_swap_is_atomic_under_concurrent_evaluation() {
    let registry = Arc::new(InMemoryRegistry::new());
    registry.publish("1.0.0", RULES_V1);

    let container = loaded_container(&registry).await;
    let stop = Arc::new(AtomicBool::new(false));

    let mut workers = Vec::new();
    for _ in 0..4 {
        let container = container.clone();
        let stop = stop.clone();
        workers.push(tokio::spawn(async move {
            while !stop.load(Ordering::Relaxed) {
                let session = container.new_session().unwrap();
                let mut offer = premium_offer();
                session.evaluate(&mut offer).unwrap();

                // every result must come wholly from one version:
                // 20%/300.00 or 25%/375.00, never a mix
                let v1 = offer.discount_percentage == dec!(20)
                    && offer.discount_amount == dec!(300.00);
                let v2 = offer.discount_percentage == dec!(25)
                    && offer.discount_amount == dec!(375.00);
                assert!(
                    v1 || v2,
                    "mixed-version result: {}% / {}",
                    offer.discount_percentage,
                    offer.discount_amount
                );
                tokio::task::yield_now().await;
            }
        }));
    }

    // swap back and forth while the workers hammer the container
    let v1_artifact = CompiledArtifact::new(VersionId::new("1.0.0"), RULES_V1);
    let v2_artifact = CompiledArtifact::new(VersionId::new("1.1.0"), RULES_V2);
    for _ in 0..100 {
        let pkg = offer_runtime::compile_artifact(&v2_artifact).unwrap();
        container.swap(pkg, v2_artifact.version.clone());
        tokio::task::yield_now().await;
        let pkg = offer_runtime::compile_artifact(&v1_artifact).unwrap();
        container.swap(pkg, v1_artifact.version.clone());
        tokio::task::yield_now().await;
    }

    stop.store(true, Ordering::Relaxed);
    for worker in workers {
        worker.await.unwrap();
    }
}
