use engine_logging::{engine_error, engine_info};
use serde::{Deserialize, Deserializer};

use crate::{FailureKind, FetchError, Fetcher};

/// Code point of REGIONAL INDICATOR SYMBOL LETTER A.
const REGIONAL_INDICATOR_A: u32 = 0x1F1E6;

/// Fields tolerate any JSON type; a value of the wrong type reads as absent.
#[derive(Debug, Default, Deserialize)]
struct GeoPayload {
    #[serde(default, deserialize_with = "lenient_flag")]
    success: Option<bool>,
    #[serde(default, deserialize_with = "lenient_text")]
    message: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    city: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    country: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    country_code: Option<String>,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_string))
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_bool())
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub city: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub flag: Option<String>,
}

impl Location {
    /// "City, Country", whichever half is present, or "N/A".
    pub fn display(&self) -> String {
        let city = self.city.as_deref().filter(|s| !s.is_empty());
        let country = self.country.as_deref().filter(|s| !s.is_empty());
        match (city, country) {
            (Some(city), Some(country)) => format!("{city}, {country}"),
            (Some(city), None) => city.to_string(),
            (None, Some(country)) => country.to_string(),
            (None, None) => "N/A".to_string(),
        }
    }
}

/// Two ASCII letters become a pair of regional indicator symbols; anything else
/// has no flag.
pub fn flag_glyph(country_code: &str) -> Option<String> {
    let bytes = country_code.as_bytes();
    if bytes.len() != 2 || !bytes.iter().all(u8::is_ascii_alphabetic) {
        return None;
    }
    bytes
        .iter()
        .map(|b| char::from_u32(REGIONAL_INDICATOR_A + u32::from(b.to_ascii_uppercase() - b'A')))
        .collect()
}

pub async fn resolve_location(fetcher: &dyn Fetcher, url: &str) -> Result<Location, FetchError> {
    match fetch_location(fetcher, url).await {
        Ok(location) => {
            engine_info!("Location resolved via {}", url);
            Ok(location)
        }
        Err(err) => {
            engine_error!("Error fetching geo data from {}: {}", url, err);
            Err(err)
        }
    }
}

async fn fetch_location(fetcher: &dyn Fetcher, url: &str) -> Result<Location, FetchError> {
    let payload: GeoPayload = fetcher.get(url).await?.ensure_success()?.json()?;

    if payload.success == Some(false) {
        let message = payload
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "API error".to_string());
        return Err(FetchError::new(FailureKind::Api, message));
    }

    let flag = payload.country_code.as_deref().and_then(flag_glyph);
    Ok(Location {
        city: payload.city.filter(|s| !s.is_empty()),
        country: payload.country.filter(|s| !s.is_empty()),
        country_code: payload.country_code,
        flag,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_maps_letters_to_regional_indicators() {
        assert_eq!(flag_glyph("UA").as_deref(), Some("\u{1F1FA}\u{1F1E6}"));
        assert_eq!(flag_glyph("de").as_deref(), Some("\u{1F1E9}\u{1F1EA}"));
        assert_eq!(flag_glyph("Az").as_deref(), Some("\u{1F1E6}\u{1F1FF}"));
        assert_eq!(flag_glyph("UA"), flag_glyph("ua"));
    }

    #[test]
    fn flag_has_two_code_points_for_every_pair() {
        for first in b'A'..=b'Z' {
            for second in b'A'..=b'Z' {
                let code = String::from_utf8(vec![first, second]).unwrap();
                let glyph = flag_glyph(&code).unwrap();
                let points: Vec<u32> = glyph.chars().map(u32::from).collect();
                assert_eq!(
                    points,
                    vec![
                        REGIONAL_INDICATOR_A + u32::from(first - b'A'),
                        REGIONAL_INDICATOR_A + u32::from(second - b'A'),
                    ]
                );
            }
        }
    }

    #[test]
    fn flag_rejects_anything_but_two_letters() {
        for code in ["", "U", "USA", "U1", "1A", "Ü", "ÜA", " U"] {
            assert_eq!(flag_glyph(code), None, "{code:?}");
        }
    }

    #[test]
    fn payload_ignores_non_string_fields() {
        let payload: GeoPayload = serde_json::from_str(
            r#"{"success":true,"city":{},"country":"Ukraine","country_code":804,"message":null}"#,
        )
        .unwrap();
        assert_eq!(payload.city, None);
        assert_eq!(payload.country.as_deref(), Some("Ukraine"));
        assert_eq!(payload.country_code, None);
        assert_eq!(payload.message, None);
    }

    #[test]
    fn display_prefers_city_and_country() {
        let mut location = Location {
            city: Some("Lviv".into()),
            country: Some("Ukraine".into()),
            ..Location::default()
        };
        assert_eq!(location.display(), "Lviv, Ukraine");
        location.country = None;
        assert_eq!(location.display(), "Lviv");
        location.city = None;
        location.country = Some("Ukraine".into());
        assert_eq!(location.display(), "Ukraine");
        location.country = None;
        assert_eq!(location.display(), "N/A");
    }
}
