use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use netident_engine::{
    AddressResult, ClientHints, DeviceSettings, EngineConfig, EngineEvent, EngineHandle,
    Endpoints, FailureKind, FetchError, FetchOutput, Fetcher, IpFamily, LookupJob, ProviderResult,
};
use pretty_assertions::assert_eq;

/// Answers from a fixed table; unknown URLs fail name resolution.
struct TableFetcher {
    responses: HashMap<String, (u16, String)>,
    delays: HashMap<String, Duration>,
}

#[async_trait::async_trait]
impl Fetcher for TableFetcher {
    async fn get(&self, url: &str) -> Result<FetchOutput, FetchError> {
        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }
        match self.responses.get(url) {
            Some((status, body)) => Ok(FetchOutput {
                status: *status,
                content_type: None,
                body: body.clone().into_bytes(),
            }),
            None => Err(FetchError {
                kind: FailureKind::NameResolution,
                message: format!("dns error: {url}"),
            }),
        }
    }
}

fn endpoints() -> Endpoints {
    Endpoints {
        ipv4: "http://v4.test/".into(),
        ipv6: "http://v6.test/".into(),
        geolocation: "http://geo.test/".into(),
        hostname: "http://host.test/".into(),
    }
}

fn config() -> EngineConfig {
    EngineConfig {
        endpoints: endpoints(),
        device: DeviceSettings {
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".into(),
            client_hints: ClientHints::Absent,
            ..DeviceSettings::default()
        },
        ..EngineConfig::default()
    }
}

fn collect(engine: &EngineHandle, expected: usize) -> Vec<EngineEvent> {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut events = Vec::new();
    while events.len() < expected && Instant::now() < deadline {
        if let Some(event) = engine.recv_timeout(Duration::from_millis(50)) {
            events.push(event);
        }
    }
    events
}

#[test]
fn every_job_reports_exactly_once() {
    let responses = HashMap::from([
        ("http://v4.test/".to_string(), (200, "198.51.100.7\n".to_string())),
        (
            "http://geo.test/".to_string(),
            (200, r#"{"success":true,"city":"Oslo","country":"Norway","country_code":"NO"}"#.to_string()),
        ),
        (
            "http://host.test/".to_string(),
            (200, r#"{"hostname":"cm-84.208.1.2.getinternet.no"}"#.to_string()),
        ),
    ]);
    let fetcher = Arc::new(TableFetcher {
        responses,
        delays: HashMap::new(),
    });
    let engine = EngineHandle::with_fetcher(config(), fetcher).expect("engine");

    for job in [
        LookupJob::Ipv4,
        LookupJob::Ipv6,
        LookupJob::Geolocation,
        LookupJob::Provider,
        LookupJob::Device,
    ] {
        engine.enqueue(job).expect("engine running");
    }

    let events = collect(&engine, 5);
    assert_eq!(events.len(), 5, "{events:?}");
    assert!(events.contains(&EngineEvent::AddressResolved {
        family: IpFamily::V4,
        result: AddressResult::Found("198.51.100.7".into()),
    }));
    assert!(events.contains(&EngineEvent::AddressResolved {
        family: IpFamily::V6,
        result: AddressResult::DnsUnavailable,
    }));
    let location = events.iter().find_map(|event| match event {
        EngineEvent::LocationResolved(Ok(location)) => Some(location.display()),
        _ => None,
    });
    assert_eq!(location.as_deref(), Some("Oslo, Norway"));
    assert!(events
        .iter()
        .any(|event| matches!(event, EngineEvent::ProviderResolved(Ok(ProviderResult::Named(_))))));
    assert!(events
        .iter()
        .any(|event| matches!(event, EngineEvent::DeviceIdentified(Ok(_)))));

    assert_eq!(engine.try_recv(), None);
}

#[test]
fn slow_lookup_does_not_hold_back_fast_ones() {
    let responses = HashMap::from([
        ("http://v4.test/".to_string(), (200, "198.51.100.7".to_string())),
        (
            "http://geo.test/".to_string(),
            (200, r#"{"success":true,"country":"Norway"}"#.to_string()),
        ),
    ]);
    let delays = HashMap::from([("http://v4.test/".to_string(), Duration::from_millis(400))]);
    let engine = EngineHandle::with_fetcher(config(), Arc::new(TableFetcher { responses, delays }))
        .expect("engine");

    engine.enqueue(LookupJob::Ipv4).expect("engine running");
    engine.enqueue(LookupJob::Geolocation).expect("engine running");

    let events = collect(&engine, 2);
    assert!(matches!(events[0], EngineEvent::LocationResolved(Ok(_))), "{events:?}");
    assert!(matches!(events[1], EngineEvent::AddressResolved { family: IpFamily::V4, .. }));
}
