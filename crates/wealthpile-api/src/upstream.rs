//! Third-party billionaire data API.
//!
//! Responses from these services are loosely shaped: the person may be the
//! root object, the first element of an array, or nested under a container
//! key, and net worth shows up under several names in either billions or
//! millions. Extraction walks [`NET_WORTH_EXTRACTORS`] in order and keeps the
//! first field that yields a usable figure.

use crate::config::{ApiConfig, UpstreamSettings};
use crate::error::{Error, Result};
use crate::models::BillionaireRecord;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use wealthpile_growth::BILLIONAIRE_ID;

/// Label stored as the `source` of fetched records.
pub const UPSTREAM_SOURCE: &str = "billionaires-api";

/// Keys under which a response may nest the person record.
const CONTAINER_KEYS: &[&str] = &["data", "person", "personList", "personsLists", "results"];

const NAME_KEYS: &[&str] = &["name", "personName", "fullName"];

const TRACKED_NAME: &str = "musk";

/// Unit a raw figure is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Magnitude {
    Billions,
    Millions,
}

impl Magnitude {
    /// Dollars per quoted unit.
    pub fn multiplier(self) -> f64 {
        match self {
            Magnitude::Billions => 1e9,
            Magnitude::Millions => 1e6,
        }
    }
}

/// One candidate location of the net worth figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetWorthField {
    pub name: &'static str,
    pub magnitude: Magnitude,
}

impl NetWorthField {
    const fn new(name: &'static str, magnitude: Magnitude) -> Self {
        Self { name, magnitude }
    }

    /// Dollars held in this field, if present and positive.
    ///
    /// Strings such as `"$245.6B"` are accepted; an explicit suffix overrides
    /// the field's default magnitude.
    pub fn extract(&self, record: &Map<String, Value>) -> Option<f64> {
        let (amount, magnitude) = match record.get(self.name)? {
            Value::Number(n) => (n.as_f64()?, self.magnitude),
            Value::String(s) => parse_amount(s, self.magnitude)?,
            _ => return None,
        };

        let dollars = amount * magnitude.multiplier();
        (dollars.is_finite() && dollars > 0.0).then_some(dollars)
    }
}

/// Candidate net worth fields, highest priority first.
pub const NET_WORTH_EXTRACTORS: &[NetWorthField] = &[
    NetWorthField::new("netWorth", Magnitude::Billions),
    NetWorthField::new("net_worth", Magnitude::Billions),
    NetWorthField::new("worth", Magnitude::Billions),
    NetWorthField::new("finalWorth", Magnitude::Millions),
    NetWorthField::new("realTimeWorth", Magnitude::Millions),
    NetWorthField::new("estWorthPrev", Magnitude::Millions),
];

fn parse_amount(raw: &str, default: Magnitude) -> Option<(f64, Magnitude)> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect::<String>()
        .to_ascii_lowercase();

    let (number, magnitude) = if let Some(n) = cleaned
        .strip_suffix("billion")
        .or_else(|| cleaned.strip_suffix('b'))
    {
        (n, Magnitude::Billions)
    } else if let Some(n) = cleaned
        .strip_suffix("million")
        .or_else(|| cleaned.strip_suffix('m'))
    {
        (n, Magnitude::Millions)
    } else {
        (cleaned.as_str(), default)
    };

    number.parse().ok().map(|n| (n, magnitude))
}

/// First extractor hit, in priority order.
pub fn extract_net_worth(record: &Map<String, Value>) -> Option<f64> {
    NET_WORTH_EXTRACTORS.iter().find_map(|field| field.extract(record))
}

fn has_net_worth_field(record: &Map<String, Value>) -> bool {
    NET_WORTH_EXTRACTORS.iter().any(|f| record.contains_key(f.name))
}

fn record_name(record: &Map<String, Value>) -> Option<&str> {
    NAME_KEYS
        .iter()
        .find_map(|key| record.get(*key).and_then(Value::as_str))
}

/// Find the person record inside a response.
///
/// Lists must name the tracked person somewhere; an unmatched list fails with
/// the fields of its first record rather than borrowing someone else's figure.
pub fn locate_record(value: &Value) -> Result<&Map<String, Value>> {
    match value {
        Value::Array(items) => {
            let objects = || items.iter().filter_map(Value::as_object);
            if let Some(record) = objects().find(|o| {
                record_name(o)
                    .map(|n| n.to_ascii_lowercase().contains(TRACKED_NAME))
                    .unwrap_or(false)
            }) {
                return Ok(record);
            }
            Err(Error::ParseFailure {
                message: format!("no record in list names {}", TRACKED_NAME),
                fields: objects()
                    .next()
                    .map(|o| o.keys().cloned().collect())
                    .unwrap_or_default(),
            })
        }
        Value::Object(map) => {
            if has_net_worth_field(map) {
                return Ok(map);
            }
            let mut unmatched = None;
            for nested in CONTAINER_KEYS.iter().filter_map(|key| map.get(*key)) {
                match locate_record(nested) {
                    Ok(record) => return Ok(record),
                    Err(e @ Error::ParseFailure { .. }) if nested.is_array() => {
                        unmatched.get_or_insert(e);
                    }
                    Err(_) => {}
                }
            }
            match unmatched {
                Some(e) => Err(e),
                None => Ok(map),
            }
        }
        _ => Err(Error::ParseFailure {
            message: "response holds no billionaire record".to_string(),
            fields: Vec::new(),
        }),
    }
}

/// Turn a raw response into a cache record.
pub fn parse_record(value: &Value, now: DateTime<Utc>) -> Result<BillionaireRecord> {
    let record = locate_record(value)?;

    let net_worth = extract_net_worth(record).ok_or_else(|| Error::ParseFailure {
        message: "no usable net worth field".to_string(),
        fields: record.keys().cloned().collect(),
    })?;

    let rank = record
        .get("rank")
        .and_then(Value::as_u64)
        .and_then(|r| u32::try_from(r).ok());

    Ok(BillionaireRecord {
        id: BILLIONAIRE_ID.to_string(),
        name: record_name(record).unwrap_or("Elon Musk").to_string(),
        net_worth,
        rank,
        source: UPSTREAM_SOURCE.to_string(),
        last_updated: now,
    })
}

/// HTTP client for the billionaire data API.
pub struct BillionaireApi {
    client: reqwest::Client,
    settings: Option<UpstreamSettings>,
}

impl BillionaireApi {
    /// Create a client from service configuration.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            settings: config.upstream.clone(),
        })
    }

    /// Fetch the raw JSON response.
    pub async fn fetch_raw(&self) -> Result<Value> {
        let settings = self
            .settings
            .as_ref()
            .ok_or(Error::ConfigurationMissing("BILLIONAIRES_API_URL"))?;

        let mut request = self.client.get(&settings.url);
        if let Some(key) = &settings.api_key {
            request = request.header("x-rapidapi-key", key);
        }
        if let Some(host) = &settings.api_host {
            request = request.header("x-rapidapi-host", host);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::RemoteFetchFailed(format!(
                "{} returned {}",
                settings.url, status
            )));
        }
        Ok(response.json().await?)
    }

    /// Fetch and parse the current record.
    pub async fn fetch_record(&self) -> Result<BillionaireRecord> {
        let raw = self.fetch_raw().await?;
        let record = parse_record(&raw, Utc::now())?;
        tracing::debug!("Upstream reports net worth {} for {}", record.net_worth, record.name);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn billions_field_wins_over_millions() {
        let record = obj(json!({ "finalWorth": 400_000.0, "netWorth": 420.5 }));
        assert_eq!(extract_net_worth(&record), Some(420.5e9));
    }

    #[test]
    fn falls_through_to_millions() {
        let record = obj(json!({ "finalWorth": 398_500 }));
        assert_eq!(extract_net_worth(&record), Some(398_500e6));
    }

    #[test]
    fn skips_unusable_candidates() {
        let record = obj(json!({ "netWorth": null, "worth": "n/a", "realTimeWorth": 1000 }));
        assert_eq!(extract_net_worth(&record), Some(1e9));
    }

    #[test]
    fn zero_is_not_a_figure() {
        let record = obj(json!({ "netWorth": 0, "finalWorth": 2 }));
        assert_eq!(extract_net_worth(&record), Some(2e6));
    }

    #[test]
    fn string_amounts_with_suffix() {
        let field = NetWorthField::new("worth", Magnitude::Billions);
        assert_eq!(field.extract(&obj(json!({ "worth": "$245.5B" }))), Some(245.5e9));
        assert_eq!(field.extract(&obj(json!({ "worth": "1,500 million" }))), Some(1.5e9));
        assert_eq!(field.extract(&obj(json!({ "worth": "12" }))), Some(12e9));
    }

    #[test]
    fn extractor_priority_is_stable() {
        let names: Vec<_> = NET_WORTH_EXTRACTORS.iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            ["netWorth", "net_worth", "worth", "finalWorth", "realTimeWorth", "estWorthPrev"]
        );
    }

    #[test]
    fn locates_person_in_array() {
        let value = json!([
            { "personName": "Someone Else", "finalWorth": 1 },
            { "personName": "Elon Musk", "finalWorth": 2, "rank": 1 },
        ]);
        let record = parse_record(&value, Utc::now()).unwrap();
        assert_eq!(record.name, "Elon Musk");
        assert_eq!(record.net_worth, 2e6);
        assert_eq!(record.rank, Some(1));
        assert_eq!(record.id, "elon-musk");
    }

    #[test]
    fn locates_person_in_container() {
        let value = json!({ "data": { "name": "Elon Musk", "netWorth": 430 } });
        let record = parse_record(&value, Utc::now()).unwrap();
        assert_eq!(record.net_worth, 430e9);
        assert_eq!(record.source, UPSTREAM_SOURCE);
    }

    #[test]
    fn parse_failure_reports_fields() {
        let value = json!({ "name": "Elon Musk", "wealth": 1, "country": "US" });
        match parse_record(&value, Utc::now()) {
            Err(Error::ParseFailure { fields, .. }) => {
                assert!(fields.contains(&"wealth".to_string()));
                assert!(fields.contains(&"country".to_string()));
            }
            other => panic!("expected parse failure, got {:?}", other),
        }
    }

    #[test]
    fn list_without_tracked_person_is_rejected() {
        let value = json!([
            { "personName": "Someone Else", "finalWorth": 1, "countryOfCitizenship": "FR" },
            { "personName": "Another Person", "finalWorth": 2 },
        ]);
        match parse_record(&value, Utc::now()) {
            Err(Error::ParseFailure { fields, .. }) => {
                assert!(fields.contains(&"personName".to_string()));
                assert!(fields.contains(&"countryOfCitizenship".to_string()));
            }
            other => panic!("expected parse failure, got {:?}", other),
        }
    }

    #[test]
    fn nested_list_without_tracked_person_is_rejected() {
        let value = json!({ "data": [{ "name": "Someone Else", "netWorth": 100 }] });
        assert!(matches!(
            parse_record(&value, Utc::now()),
            Err(Error::ParseFailure { fields, .. }) if fields.contains(&"name".to_string())
        ));
    }

    #[test]
    fn scalar_response_is_unparseable() {
        assert!(matches!(
            parse_record(&json!(42), Utc::now()),
            Err(Error::ParseFailure { .. })
        ));
    }

    async fn spawn_upstream(body: Value) -> String {
        let app = Router::new().route(
            "/person",
            get(move || {
                let body = body.clone();
                async move { Json(body) }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/person", addr)
    }

    #[tokio::test]
    async fn fetch_record_from_server() {
        let url = spawn_upstream(json!({ "personName": "Elon Musk", "finalWorth": 421_000 })).await;
        let config = ApiConfig {
            upstream: Some(UpstreamSettings {
                url,
                api_key: Some("k".into()),
                api_host: None,
            }),
            ..ApiConfig::default()
        };

        let api = BillionaireApi::from_config(&config).unwrap();
        let record = api.fetch_record().await.unwrap();
        assert_eq!(record.net_worth, 421e9);
    }

    #[tokio::test]
    async fn missing_upstream_config() {
        let api = BillionaireApi::from_config(&ApiConfig::default()).unwrap();
        assert!(matches!(
            api.fetch_raw().await,
            Err(Error::ConfigurationMissing(_))
        ));
    }
}
