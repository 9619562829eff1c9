// Generic REST client for the PartyWave entity collections.
//
// Every entity is served by the same CRUD contract under `api/<entities>`,
// so a single `Resource<E>` parameterized by the entity type covers all
// twelve collections. Mutation responses carry alert headers that are
// surfaced as `Alert`s; error responses are decoded into `ApiError::Status`.

use std::marker::PhantomData;
use std::time::Duration;

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::model::{Entity, EntityId, EntityKind};
use crate::pagination::{parse_link_header, parse_total_count, Links};
use crate::query::ListQuery;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MERGE_PATCH_CONTENT_TYPE: &str = "application/merge-patch+json";
const TOTAL_COUNT_HEADER: &str = "x-total-count";
const LINK_HEADER: &str = "link";

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Mutation notification carried in the `X-<app>-alert` / `X-<app>-params`
/// response headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// e.g. `partywaveApp.room.created`
    pub key: String,
    /// Usually the affected record's id.
    pub param: Option<String>,
}

impl Alert {
    /// Human-readable notice for the status bar.
    pub fn message(&self) -> String {
        let mut segments = self.key.rsplit('.');
        let action = segments.next().unwrap_or_default();
        let entity = segments
            .next()
            .and_then(EntityKind::from_entity_name)
            .map(|k| k.singular());
        let param = self.param.as_deref().unwrap_or_default();

        match (entity, action) {
            (Some(entity), "created") => {
                format!("A new {entity} is created with identifier {param}")
            }
            (Some(entity), "updated") => format!("A {entity} is updated with identifier {param}"),
            (Some(entity), "deleted") => format!("A {entity} is deleted with identifier {param}"),
            _ if param.is_empty() => self.key.clone(),
            _ => format!("{} ({param})", self.key),
        }
    }
}

/// One page (or the whole set) of a list request.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<E> {
    pub items: Vec<E>,
    /// `X-Total-Count`, or the item count when the header is absent.
    pub total_items: u64,
    pub links: Links,
}

/// Result of a create/update/patch.
#[derive(Debug, Clone, PartialEq)]
pub struct Saved<E> {
    pub entity: E,
    pub alert: Option<Alert>,
}

/// problem+json error body; every member is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProblemBody {
    title: Option<String>,
    detail: Option<String>,
    message: Option<String>,
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// Shared HTTP state: connection pool, base URL and credentials. Cheap to
/// clone; request tasks each take their own copy.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    application_name: String,
    bearer_token: Option<String>,
}

impl ApiClient {
    /// Build a client from the loaded configuration.
    pub fn new(config: &Config) -> ApiResult<Self> {
        let token = config
            .credentials
            .bearer_token
            .clone()
            .filter(|t| !t.trim().is_empty());
        Self::with_options(
            &config.api.base_url,
            &config.api.application_name,
            token,
            Duration::from_secs(config.api.timeout_secs),
        )
    }

    pub fn with_options(
        base_url: &str,
        application_name: &str,
        bearer_token: Option<String>,
        timeout: Duration,
    ) -> ApiResult<Self> {
        let mut normalized = base_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base_url = Url::parse(&normalized).map_err(|e| ApiError::InvalidUrl {
            url: normalized.clone(),
            message: e.to_string(),
        })?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            application_name: application_name.to_string(),
            bearer_token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Typed handle for one entity collection.
    pub fn resource<E: Entity>(&self) -> Resource<E> {
        Resource {
            client: self.clone(),
            _entity: PhantomData,
        }
    }

    fn url(&self, path: &str) -> ApiResult<Url> {
        self.base_url.join(path).map_err(|e| ApiError::InvalidUrl {
            url: format!("{}{path}", self.base_url),
            message: e.to_string(),
        })
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.bearer_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Pass successful responses through; decode everything else into
    /// `ApiError::Status`.
    async fn check(&self, response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let header_key = header_str(
            response.headers(),
            &format!("x-{}-error", self.application_name),
        );
        let body = response.text().await.unwrap_or_default();
        let problem: ProblemBody = serde_json::from_str(&body).unwrap_or_default();

        let key = header_key.or_else(|| {
            problem
                .message
                .clone()
                .filter(|m| m.starts_with("error."))
        });
        let message = problem
            .detail
            .or(problem.title)
            .or(problem.message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });

        warn!(status = status.as_u16(), %message, "backend returned an error");
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
            key,
        })
    }

    fn alert(&self, headers: &HeaderMap) -> Option<Alert> {
        let key = header_str(headers, &format!("x-{}-alert", self.application_name))?;
        let param = header_str(headers, &format!("x-{}-params", self.application_name))
            .map(|p| percent_decode(&p));
        Some(Alert { key, param })
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Decode the form-urlencoded alert parameter (`+` for spaces, `%XX`).
fn percent_decode(input: &str) -> String {
    form_urlencoded::parse(input.as_bytes())
        .map(|(key, value)| {
            if value.is_empty() {
                key.into_owned()
            } else {
                format!("{key}={value}")
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Drop keys whose value is null or a relation placeholder (`{"id": ""}` or
/// `{"id": -1}`) so unset relations are not sent to the backend.
pub fn clean_entity(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| match v {
                    Value::Null => false,
                    Value::Object(inner) => !matches!(
                        inner.get("id"),
                        Some(Value::String(s)) if s.is_empty()
                    ) && inner.get("id").and_then(Value::as_i64) != Some(-1),
                    _ => true,
                })
                .collect(),
        ),
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Resource<E>
// ---------------------------------------------------------------------------

/// CRUD operations for one entity collection.
#[derive(Debug, Clone)]
pub struct Resource<E> {
    client: ApiClient,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Resource<E> {
    pub fn kind(&self) -> EntityKind {
        E::KIND
    }

    fn collection_url(&self) -> ApiResult<Url> {
        self.client.url(E::KIND.api_path())
    }

    fn item_url(&self, id: &EntityId) -> ApiResult<Url> {
        self.client.url(&format!("{}/{id}", E::KIND.api_path()))
    }

    /// `GET api/<entities>` with sort/page parameters from `query`.
    pub async fn list(&self, query: &ListQuery) -> ApiResult<Page<E>> {
        let url = self.collection_url()?;
        let pairs = query.to_pairs();
        debug!(entity = E::KIND.entity_name(), ?pairs, "list");

        let response = self
            .client
            .request(Method::GET, url)
            .query(&pairs)
            .send()
            .await?;
        let response = self.client.check(response).await?;

        let headers = response.headers().clone();
        let items: Vec<E> = serde_json::from_slice(&response.bytes().await?)?;
        let total_items = parse_total_count(
            headers
                .get(TOTAL_COUNT_HEADER)
                .and_then(|v| v.to_str().ok()),
            items.len(),
        );
        let links = headers
            .get(LINK_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(parse_link_header)
            .unwrap_or_default();

        Ok(Page {
            items,
            total_items,
            links,
        })
    }

    /// `GET api/<entities>/{id}`
    pub async fn get(&self, id: &EntityId) -> ApiResult<E> {
        let url = self.item_url(id)?;
        debug!(entity = E::KIND.entity_name(), %id, "get");
        let response = self.client.request(Method::GET, url).send().await?;
        let response = self.client.check(response).await?;
        Ok(serde_json::from_slice(&response.bytes().await?)?)
    }

    /// `POST api/<entities>`; any id on `entity` is stripped.
    pub async fn create(&self, entity: &E) -> ApiResult<Saved<E>> {
        let mut body = clean_entity(serde_json::to_value(entity)?);
        if let Value::Object(map) = &mut body {
            map.remove("id");
        }
        let url = self.collection_url()?;
        debug!(entity = E::KIND.entity_name(), "create");
        let request = self.client.request(Method::POST, url).json(&body);
        self.send_saved(request).await
    }

    /// `PUT api/<entities>/{id}` with the full record.
    pub async fn update(&self, entity: &E) -> ApiResult<Saved<E>> {
        let id = entity.id().ok_or(ApiError::MissingId {
            entity: E::KIND.entity_name(),
        })?;
        let body = clean_entity(serde_json::to_value(entity)?);
        let url = self.item_url(id)?;
        debug!(entity = E::KIND.entity_name(), %id, "update");
        let request = self.client.request(Method::PUT, url).json(&body);
        self.send_saved(request).await
    }

    /// `PATCH api/<entities>/{id}` as a JSON merge patch. `fields` holds only
    /// the changed attributes; the id is added to the body. A `null` field is
    /// sent as-is and clears the attribute on the backend.
    pub async fn partial_update(
        &self,
        id: Option<&EntityId>,
        fields: serde_json::Map<String, Value>,
    ) -> ApiResult<Saved<E>> {
        let id = id.ok_or(ApiError::MissingId {
            entity: E::KIND.entity_name(),
        })?;
        let mut body = fields;
        body.insert("id".to_string(), serde_json::to_value(id)?);
        let url = self.item_url(id)?;
        debug!(entity = E::KIND.entity_name(), %id, "partial update");
        let request = self
            .client
            .request(Method::PATCH, url)
            .header(CONTENT_TYPE, MERGE_PATCH_CONTENT_TYPE)
            .body(serde_json::to_vec(&body)?);
        self.send_saved(request).await
    }

    /// `DELETE api/<entities>/{id}`
    pub async fn delete(&self, id: &EntityId) -> ApiResult<Option<Alert>> {
        let url = self.item_url(id)?;
        debug!(entity = E::KIND.entity_name(), %id, "delete");
        let response = self.client.request(Method::DELETE, url).send().await?;
        let response = self.client.check(response).await?;
        Ok(self.client.alert(response.headers()))
    }

    async fn send_saved(&self, request: RequestBuilder) -> ApiResult<Saved<E>> {
        let response = request.send().await?;
        let response = self.client.check(response).await?;
        let alert = self.client.alert(response.headers());
        let entity: E = serde_json::from_slice(&response.bytes().await?)?;
        Ok(Saved { entity, alert })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn alert_messages_name_the_entity() {
        let created = Alert {
            key: "partywaveApp.room.created".into(),
            param: Some("7".into()),
        };
        assert_eq!(created.message(), "A new Room is created with identifier 7");

        let deleted = Alert {
            key: "partywaveApp.roomMember.deleted".into(),
            param: Some("3".into()),
        };
        assert_eq!(deleted.message(), "A Room Member is deleted with identifier 3");

        let unknown = Alert {
            key: "partywaveApp.somethingElse".into(),
            param: None,
        };
        assert_eq!(unknown.message(), "partywaveApp.somethingElse");
    }

    #[test]
    fn percent_decoding() {
        assert_eq!(percent_decode("Friday+Mix%21"), "Friday Mix!");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("42"), "42");
    }

    #[test]
    fn percent_decoding_multibyte_utf8() {
        assert_eq!(percent_decode("Caf%C3%A9+Night"), "Café Night");
        assert_eq!(percent_decode("%F0%9F%8E%B5"), "🎵");
        assert_eq!(percent_decode("a%3Db%26c"), "a=b&c");
    }

    #[test]
    fn clean_entity_drops_placeholders() {
        let cleaned = clean_entity(json!({
            "name": "Lobby",
            "room": { "id": "" },
            "voter": { "id": -1 },
            "sender": { "id": 4 },
            "tags": [],
            "description": null
        }));
        assert_eq!(
            cleaned,
            json!({ "name": "Lobby", "sender": { "id": 4 }, "tags": [] })
        );
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let client =
            ApiClient::with_options("http://localhost:8080", "partywaveApp", None, Duration::from_secs(5))
                .unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8080/");
        assert_eq!(
            client.url("api/rooms").unwrap().as_str(),
            "http://localhost:8080/api/rooms"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = ApiClient::with_options("not a url", "partywaveApp", None, Duration::from_secs(5))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl { .. }));
    }
}
