use crate::core::{University, UniversityDirectory};
use crate::utils::error::{Result, UnifinderError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::{Map, Value};
use url::{form_urlencoded, Url};

pub const DEFAULT_BASE_URL: &str = "http://universities.hipolabs.com";

/// Client for the university lookup service.
///
/// Every call is a single GET with no retries or caching. The whole
/// response body is buffered and parsed at once.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    client: Client,
    base_url: String,
}

impl DirectoryClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Url::parse(base_url).map_err(|e| UnifinderError::InvalidConfigValueError {
            field: "directory.base_url".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;
        Ok(Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn search_request(&self, country: Option<&str>) -> RequestBuilder {
        let endpoint = match country {
            Some(country) => format!(
                "{}/search?country={}",
                self.base_url,
                encode_query_value(country)
            ),
            None => format!("{}/search", self.base_url),
        };
        self.client.get(endpoint)
    }

    async fn fetch(&self, request: RequestBuilder) -> Result<Vec<University>> {
        let response = request.send().await.map_err(|e| {
            tracing::error!("Directory request failed: {}", e);
            UnifinderError::ApiError(e)
        })?;

        let status = response.status();
        tracing::debug!(
            "Directory response from {}: {}",
            response.url(),
            status
        );
        if !status.is_success() {
            tracing::error!("Directory service returned HTTP {}", status.as_u16());
            return Err(UnifinderError::RemoteServiceError {
                status_code: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let universities = parse_universities(&body)?;
        tracing::debug!("Parsed {} universities", universities.len());
        Ok(universities)
    }
}

impl Default for DirectoryClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UniversityDirectory for DirectoryClient {
    async fn search_by_country(&self, country: &str) -> Result<Vec<University>> {
        tracing::debug!("Searching universities in {}", country);
        self.fetch(self.search_request(Some(country))).await
    }

    async fn fetch_all(&self) -> Result<Vec<University>> {
        tracing::debug!("Fetching all universities");
        self.fetch(self.search_request(None)).await
    }
}

/// Percent-encodes a query value, spaces as `%20` rather than `+`.
fn encode_query_value(value: &str) -> String {
    // Form encoding escapes a literal '+' as %2B, so any '+' left is a space.
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Maps a response body onto universities.
///
/// The body must be a JSON array. Elements without a non-empty `name` and
/// `country` are skipped; missing `domains`/`web_pages` become empty and a
/// missing `state_province` becomes `None`.
pub fn parse_universities(body: &[u8]) -> Result<Vec<University>> {
    let json_data: Value =
        serde_json::from_slice(body).map_err(|e| UnifinderError::MalformedResponseError {
            message: format!("body is not valid JSON: {}", e),
        })?;

    let items = match json_data {
        Value::Array(items) => items,
        other => {
            return Err(UnifinderError::MalformedResponseError {
                message: format!("expected a JSON array, got {}", json_kind(&other)),
            })
        }
    };

    let mut universities = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(obj) => match university_from_object(&obj) {
                Some(university) => universities.push(university),
                None => tracing::warn!(
                    "Skipping directory entry {} without name or country",
                    index
                ),
            },
            other => tracing::warn!(
                "Skipping directory entry {}: expected an object, got {}",
                index,
                json_kind(&other)
            ),
        }
    }
    Ok(universities)
}

fn university_from_object(obj: &Map<String, Value>) -> Option<University> {
    let name = non_empty_str(obj, "name")?;
    let country = non_empty_str(obj, "country")?;

    Some(University {
        name,
        country,
        alpha_two_code: obj
            .get("alpha_two_code")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        domains: string_list(obj, "domains"),
        web_pages: string_list(obj, "web_pages"),
        // The live service spells this key with a hyphen.
        state_province: ["state_province", "state-province"]
            .iter()
            .find_map(|field| obj.get(*field).and_then(|v| v.as_str()))
            .map(str::to_string),
    })
}

fn non_empty_str(obj: &Map<String, Value>, field: &str) -> Option<String> {
    obj.get(field)
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn string_list(obj: &Map<String, Value>, field: &str) -> Vec<String> {
    obj.get(field)
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
