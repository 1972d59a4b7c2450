//! Pipeline tests with spy probes and fake dialers; no real services involved

use super::*;
use crate::env::MapEnv;
use crate::gate::GateError;
use crate::services::{unique_name, Endpoint, ProbeDescriptor};
use async_trait::async_trait;
use schema::{Status, Summary};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct AlwaysUp;

#[async_trait]
impl Dialer for AlwaysUp {
    async fn dial(&self, _host: &str, _port: u16, _timeout: Duration) -> Result<(), GateError> {
        Ok(())
    }
}

struct AlwaysDown;

#[async_trait]
impl Dialer for AlwaysDown {
    async fn dial(&self, _host: &str, _port: u16, _timeout: Duration) -> Result<(), GateError> {
        Err(GateError::Tcp(std::io::Error::from(
            std::io::ErrorKind::ConnectionRefused,
        )))
    }
}

/// Records whether its round-trip ran
struct SpyProbe {
    descriptor: ProbeDescriptor,
    calls: Arc<AtomicUsize>,
    fail_with: Option<&'static str>,
}

impl SpyProbe {
    fn new(flag: &'static str, default_enabled: bool) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let probe = Self {
            descriptor: ProbeDescriptor {
                service: "Spy",
                client: "spy-client",
                enable_flag: flag,
                default_enabled,
            },
            calls: Arc::clone(&calls),
            fail_with: None,
        };
        (probe, calls)
    }

    fn failing(mut self, message: &'static str) -> Self {
        self.fail_with = Some(message);
        self
    }
}

#[async_trait]
impl ServiceProbe for SpyProbe {
    fn descriptor(&self) -> ProbeDescriptor {
        self.descriptor
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::new("spy.local", 4242)
    }

    async fn round_trip(&self) -> Result<String, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fail_with {
            Some(message) => Err(ProbeError::Verification(message.to_string())),
            None => Ok(format!("wrote {}", unique_name("spy"))),
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_unreachable_service_never_runs_probe_body() {
    let harness = Harness::default()
        .with_env(MapEnv::new().with("ENABLE_SPY", "true"))
        .with_dialer(AlwaysDown);
    let (probe, calls) = SpyProbe::new("ENABLE_SPY", false);

    let result = harness.check(&probe).await;

    assert_eq!(result.status(), Status::Fail);
    assert!(result.detail().contains("spy.local:4242"));
    assert!(result.detail().contains("is not reachable"));
    assert_eq!(result.duration_ms(), 0);
    assert_eq!(calls.load(Ordering::SeqCst), 0, "probe body must not run");
}

#[tokio::test(start_paused = true)]
async fn test_disabled_service_never_runs_probe_body() {
    let harness = Harness::default()
        .with_env(MapEnv::new().with("ENABLE_SPY", "off"))
        .with_dialer(AlwaysUp);
    let (probe, calls) = SpyProbe::new("ENABLE_SPY", true);

    let result = harness.check(&probe).await;

    assert_eq!(result.status(), Status::Skip);
    assert_eq!(result.detail(), "ENABLE_SPY=false -> service intentionally disabled");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_reachable_service_runs_probe() {
    let harness = Harness::default()
        .with_env(MapEnv::new())
        .with_dialer(AlwaysUp);
    let (probe, calls) = SpyProbe::new("ENABLE_SPY", true);

    let result = harness.check(&probe).await;

    assert_eq!(result.status(), Status::Pass);
    assert_eq!(result.service(), "Spy");
    assert_eq!(result.client(), "spy-client");
    assert!(result.detail().starts_with("wrote spy-"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_repeated_runs_use_distinct_identifiers() {
    let harness = Harness::default()
        .with_env(MapEnv::new())
        .with_dialer(AlwaysUp);
    let (probe, calls) = SpyProbe::new("ENABLE_SPY", true);

    let first = harness.check(&probe).await;
    let second = harness.check(&probe).await;

    assert_eq!(first.status(), Status::Pass);
    assert_eq!(second.status(), Status::Pass);
    assert_ne!(first.detail(), second.detail());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_failing_probe_does_not_abort_the_rest() {
    let harness = Harness::default()
        .with_env(MapEnv::new())
        .with_dialer(AlwaysUp);
    let (broken, broken_calls) = SpyProbe::new("ENABLE_SPY", true);
    let (healthy, healthy_calls) = SpyProbe::new("ENABLE_SPY", true);
    let probes: Vec<Box<dyn ServiceProbe>> = vec![
        Box::new(broken.failing("connection reset by peer")),
        Box::new(healthy),
    ];

    let results = harness.run_probes(&probes).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].status(), Status::Fail);
    assert_eq!(results[0].detail(), "connection reset by peer");
    assert_eq!(results[1].status(), Status::Pass);
    assert_eq!(broken_calls.load(Ordering::SeqCst), 1);
    assert_eq!(healthy_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_all_services_disabled_yields_six_skips() {
    let env: MapEnv = [
        "ENABLE_POSTGRES",
        "ENABLE_MYSQL",
        "ENABLE_VALKEY",
        "ENABLE_KAFKA",
        "ENABLE_OPENSEARCH",
        "ENABLE_MINIO",
    ]
    .into_iter()
    .map(|flag| (flag, "false"))
    .collect();
    let harness = Harness::default().with_env(env).with_dialer(AlwaysDown);

    let results = harness.run_all().await;
    let summary = Summary::from_results(&results);

    assert_eq!(summary, Summary { passed: 0, failed: 0, skipped: 6 });
    assert_eq!(summary.exit_code(), 0);
    assert!(results.iter().all(|r| r.duration_ms() == 0));
}

#[tokio::test(start_paused = true)]
async fn test_default_policy_with_nothing_reachable() {
    // Postgres and MinIO are enabled by default; the rest skip.
    let harness = Harness::default()
        .with_env(MapEnv::new())
        .with_dialer(AlwaysDown);

    let results = harness.run_all().await;
    let statuses: Vec<_> = results.iter().map(|r| (r.service(), r.status())).collect();

    assert_eq!(
        statuses,
        vec![
            ("PostgreSQL", Status::Fail),
            ("MySQL", Status::Skip),
            ("Valkey", Status::Skip),
            ("Kafka", Status::Skip),
            ("OpenSearch", Status::Skip),
            ("MinIO", Status::Fail),
        ]
    );
    assert_eq!(results[0].detail(), "postgres:5432 is not reachable");
    assert_eq!(results[5].detail(), "minio:9000 is not reachable");

    let summary = Summary::from_results(&results);
    assert_eq!(summary.total(), 6);
    assert_eq!(summary.exit_code(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_operation_timeout_applies_to_probes() {
    struct Stalled;

    #[async_trait]
    impl ServiceProbe for Stalled {
        fn descriptor(&self) -> ProbeDescriptor {
            ProbeDescriptor {
                service: "Stalled",
                client: "stalled-client",
                enable_flag: "ENABLE_STALLED",
                default_enabled: true,
            }
        }

        fn endpoint(&self) -> Endpoint {
            Endpoint::new("stalled.local", 1)
        }

        async fn round_trip(&self) -> Result<String, ProbeError> {
            tokio::time::sleep(Duration::from_secs(600)).await;
            Ok("unreachable".to_string())
        }
    }

    let config = HarnessConfig {
        operation_timeout: Some(Duration::from_secs(3)),
        ..HarnessConfig::default()
    };
    let harness = Harness::new(config).with_env(MapEnv::new()).with_dialer(AlwaysUp);

    let result = harness.check(&Stalled).await;

    assert_eq!(result.status(), Status::Fail);
    assert_eq!(result.detail(), "operation timed out after 3000 ms");
    assert_eq!(result.duration_ms(), 3000);
}

#[test]
fn test_env_accessors_use_injected_source() {
    let harness = Harness::default().with_env(MapEnv::new().with("KAFKA_PORT", "9092"));
    assert_eq!(harness.get_env_u16("KAFKA_PORT", 29092), 9092);
    assert_eq!(harness.get_env("KAFKA_HOST", "kafka"), "kafka");
}
