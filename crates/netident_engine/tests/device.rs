use netident_engine::{
    identify, BrandVersion, ClientHints, ClientHintsSource, DeviceError, DeviceHints,
    DeviceSource, DeviceSourceError, HighEntropyValues, UserAgentSource,
};
use pretty_assertions::assert_eq;

const CHROME_WIN: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.6367.91 Safari/537.36";

struct FixedSource(DeviceHints);

#[async_trait::async_trait]
impl DeviceSource for FixedSource {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn query(&self) -> Result<DeviceHints, DeviceSourceError> {
        Ok(self.0.clone())
    }
}

fn granted(platform: &str, version: &str, brands: &[(&str, &str)]) -> ClientHints {
    ClientHints::Granted(HighEntropyValues {
        platform: Some(platform.to_string()),
        platform_version: Some(version.to_string()),
        full_version_list: brands
            .iter()
            .map(|(brand, version)| BrandVersion {
                brand: brand.to_string(),
                version: version.to_string(),
            })
            .collect(),
    })
}

#[tokio::test]
async fn client_hints_win_and_skip_placeholder_brand() {
    let sources: Vec<Box<dyn DeviceSource>> = vec![
        Box::new(ClientHintsSource::new(granted(
            "Windows",
            "15.0.0",
            &[("Not A Brand", "99.0.0.0"), ("Google Chrome", "124.0.6367.91")],
        ))),
        Box::new(UserAgentSource::new(CHROME_WIN)),
    ];

    let identity = identify(&sources).await.expect("identified");
    assert_eq!(identity.browser_display(), "Google Chrome 124.0.6367.91");
    assert_eq!(identity.os_display(), "Windows 15.0.0");
}

#[tokio::test]
async fn user_agent_fills_fields_left_open() {
    let hints = ClientHints::Granted(HighEntropyValues {
        platform: Some("Windows".to_string()),
        platform_version: Some("15.0.0".to_string()),
        full_version_list: Vec::new(),
    });
    let sources: Vec<Box<dyn DeviceSource>> = vec![
        Box::new(ClientHintsSource::new(hints)),
        Box::new(UserAgentSource::new(CHROME_WIN)),
    ];

    let identity = identify(&sources).await.expect("identified");
    assert_eq!(identity.hints.browser_name.as_deref(), Some("Chrome"));
    assert_eq!(identity.hints.browser_version.as_deref(), Some("124.0.6367.91"));
    assert_eq!(identity.os_display(), "Windows 15.0.0");
}

#[tokio::test]
async fn absent_or_denied_hints_fall_back_to_user_agent() {
    for hints in [ClientHints::Absent, ClientHints::Denied("permission denied".into())] {
        let sources: Vec<Box<dyn DeviceSource>> = vec![
            Box::new(ClientHintsSource::new(hints)),
            Box::new(UserAgentSource::new(CHROME_WIN)),
        ];
        let identity = identify(&sources).await.expect("identified");
        assert_eq!(identity.hints.browser_name.as_deref(), Some("Chrome"));
        assert!(identity.hints.os_name.is_some());
    }
}

#[tokio::test]
async fn missing_parser_is_a_distinct_error() {
    let sources: Vec<Box<dyn DeviceSource>> =
        vec![Box::new(ClientHintsSource::new(ClientHints::Absent))];
    assert_eq!(identify(&sources).await, Err(DeviceError::ParserUnavailable));
}

#[tokio::test]
async fn complete_hints_need_no_parser() {
    let sources: Vec<Box<dyn DeviceSource>> = vec![Box::new(ClientHintsSource::new(granted(
        "macOS",
        "14.4.1",
        &[("Chromium", "124.0.0.0"), ("Opera", "110.0.0.0")],
    )))];
    let identity = identify(&sources).await.expect("identified");
    assert_eq!(identity.browser_display(), "Opera 110.0.0.0");
    assert_eq!(identity.os_display(), "macOS 14.4.1");
}

#[tokio::test]
async fn unknown_fields_display_as_unknown() {
    let sources: Vec<Box<dyn DeviceSource>> = vec![
        Box::new(FixedSource(DeviceHints::default())),
        Box::new(UserAgentSource::new("")),
    ];
    let identity = identify(&sources).await.expect("parser configured");
    assert_eq!(identity.browser_display(), "Unknown");
    assert_eq!(identity.os_display(), "Unknown");
}
