use crate::{
    error::{Error, Result},
    method::Method,
    models::AccountDetails,
    response::ApiResponse,
};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT},
    Url,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;

const ENDPOINT_TEMPLATE: &str = "https://{dc}.api.mailchimp.com/3.0/";
const MEDIA_TYPE: &str = "application/vnd.api+json";
const CLIENT_USER_AGENT: &str = concat!("mailchimp-v3-rs/", env!("CARGO_PKG_VERSION"));

/// Parameters of a call: a query string for GET and DELETE, a JSON body otherwise.
pub type Params = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Timeout(Duration);

impl Default for Timeout {
    fn default() -> Self {
        Self(Duration::from_secs(10))
    }
}

/// A MailChimp v3 API client.
///
/// Every operation issues its requests one after the other and never retries.
/// The error captured for a call travels with its [`ApiResponse`], so a client
/// can be cloned and shared freely.
#[derive(Clone)]
pub struct Client {
    endpoint: Url,
    api_key: String,
    http: reqwest::Client,
    timeout: Timeout,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint.as_str())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Initializes a client against the datacenter encoded in the API key
    /// (`<key>-<dc>` targets `https://<dc>.api.mailchimp.com/3.0/`).
    ///
    /// ## Example
    ///
    /// ```
    /// use mailchimp_v3::Client;
    ///
    /// let client = Client::new("abc123-us6").unwrap();
    /// assert_eq!(client.endpoint().as_str(), "https://us6.api.mailchimp.com/3.0/");
    /// ```
    pub fn new<S: Into<String>>(api_key: S) -> Result<Self> {
        let api_key = api_key.into();
        let endpoint = endpoint_for(&api_key)?;
        Self::with_endpoint(endpoint.as_str(), api_key)
    }

    /// Initializes a client against an explicit base URL, e.g. a proxy or a
    /// local test server.
    pub fn with_endpoint<U: AsRef<str>, S: Into<String>>(endpoint: U, api_key: S) -> Result<Self> {
        let api_key = api_key.into();
        let mut endpoint = Url::parse(endpoint.as_ref())?;
        if endpoint.cannot_be_a_base() {
            return Err(Error::InvalidEndpoint(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(MEDIA_TYPE));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(MEDIA_TYPE));
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
        let mut auth = HeaderValue::from_str(&format!("apikey {api_key}"))
            .map_err(|_| Error::InvalidApiKey)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let timeout = Timeout::default();
        let http = reqwest::Client::builder()
            .timeout(timeout.0)
            .default_headers(headers)
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            endpoint,
            api_key,
            http,
            timeout,
        })
    }

    /// Replaces the timeout used by the verb helpers and domain operations.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Timeout(timeout);
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout.0
    }

    /// Sends a single request to `path` (relative to the endpoint).
    ///
    /// The API key is always added to `params` as `apikey`. Any HTTP answer,
    /// whatever its status, is returned as an [`ApiResponse`]; interpreting the
    /// status is up to the caller. Only a call that got no answer at all fails,
    /// with [`Error::Connectivity`].
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        mut params: Params,
        timeout: Duration,
    ) -> Result<ApiResponse> {
        params.insert("apikey".to_string(), Value::String(self.api_key.clone()));
        let url = self.endpoint.join(path)?;

        tracing::debug!(%method, path, "Mailchimp API request");

        let req = self.http.request(method.into(), url).timeout(timeout);
        let req = if method.sends_json_body() {
            req.body(serde_json::to_vec(&params)?)
        } else {
            req.query(&query_pairs(&params))
        };

        let resp = req.send().await.map_err(Error::Connectivity)?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(Error::Connectivity)?;
        let response = ApiResponse::new(status, body);

        match response.error() {
            Some(err) => tracing::warn!(%method, path, status, "Mailchimp API error: {err}"),
            None => tracing::debug!(%method, path, status, "Mailchimp API response"),
        }

        Ok(response)
    }

    pub async fn get(&self, path: &str, params: Params) -> Result<ApiResponse> {
        self.call(Method::Get, path, params, self.timeout.0).await
    }

    pub async fn post(&self, path: &str, params: Params) -> Result<ApiResponse> {
        self.call(Method::Post, path, params, self.timeout.0).await
    }

    pub async fn patch(&self, path: &str, params: Params) -> Result<ApiResponse> {
        self.call(Method::Patch, path, params, self.timeout.0).await
    }

    pub async fn put(&self, path: &str, params: Params) -> Result<ApiResponse> {
        self.call(Method::Put, path, params, self.timeout.0).await
    }

    pub async fn delete(&self, path: &str, params: Params) -> Result<ApiResponse> {
        self.call(Method::Delete, path, params, self.timeout.0).await
    }

    /// Returns `true` iff the API root answers with a 200. Never fails.
    pub async fn validate_api_key(&self) -> bool {
        match self.get("", Params::new()).await {
            Ok(resp) => resp.is_status(200),
            Err(err) => {
                tracing::warn!("Could not validate API key: {err}");
                false
            }
        }
    }

    /// Fetches the account details from the API root.
    ///
    /// Yields `None` when no response could be obtained at all.
    pub async fn get_account_details(&self) -> Result<Option<AccountDetails>> {
        match self.get("", Params::new()).await {
            Ok(resp) => Ok(Some(resp.json()?)),
            Err(err) if err.is_connectivity() => {
                tracing::warn!("Could not fetch account details: {err}");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Fails with [`Error::Fetch`] unless `resp` has exactly `status`.
    pub(crate) fn expect_status(
        resource: &'static str,
        resp: ApiResponse,
        status: u16,
    ) -> Result<ApiResponse> {
        if resp.is_status(status) {
            return Ok(resp);
        }

        Err(Error::Fetch {
            resource,
            status: resp.status(),
            error: resp.into_error(),
        })
    }
}

/// Turns a serializable request body into call parameters.
pub(crate) fn params<T: Serialize>(body: &T) -> Result<Params> {
    match serde_json::to_value(body)? {
        Value::Object(map) => Ok(map),
        _ => Err(Error::InvalidParams),
    }
}

/// Joins path segments, percent-encoding each so ids can't escape their segment.
pub(crate) fn resource_path(segments: &[&str]) -> String {
    segments
        .iter()
        .map(|segment| urlencoding::encode(segment))
        .collect::<Vec<_>>()
        .join("/")
}

fn endpoint_for(api_key: &str) -> Result<Url> {
    let dc = api_key
        .split('-')
        .nth(1)
        .filter(|dc| !dc.is_empty())
        .ok_or(Error::InvalidApiKey)?;
    Ok(Url::parse(&ENDPOINT_TEMPLATE.replace("{dc}", dc))?)
}

fn query_pairs(params: &Params) -> Vec<(&str, String)> {
    params
        .iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((key.as_str(), value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn derives_the_endpoint_from_the_datacenter() {
        let client = Client::new("abc123-us6").unwrap();
        assert_eq!(client.endpoint().as_str(), "https://us6.api.mailchimp.com/3.0/");
        assert_eq!(client.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn rejects_keys_without_a_datacenter() {
        assert!(matches!(Client::new("abc123"), Err(Error::InvalidApiKey)));
        assert!(matches!(Client::new("abc123-"), Err(Error::InvalidApiKey)));
    }

    #[test]
    fn explicit_endpoints_get_a_trailing_slash() {
        let client = Client::with_endpoint("http://localhost:8080/3.0", "abc-us1").unwrap();
        assert_eq!(client.endpoint().as_str(), "http://localhost:8080/3.0/");
        assert_eq!(
            client.endpoint().join("lists/l1/members").unwrap().as_str(),
            "http://localhost:8080/3.0/lists/l1/members"
        );
    }

    #[test]
    fn malformed_endpoints_are_invalid_endpoints() {
        assert!(matches!(
            Client::with_endpoint("not a url", "abc-us1"),
            Err(Error::InvalidEndpoint(_))
        ));
        assert!(matches!(
            Client::with_endpoint("mailto:ops@example.org", "abc-us1"),
            Err(Error::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn params_require_an_object() {
        let map = params(&json!({"status": "unsubscribed"})).unwrap();
        assert_eq!(map["status"], "unsubscribed");
        assert!(matches!(params(&vec![1, 2]), Err(Error::InvalidParams)));
        assert!(matches!(params(&"status"), Err(Error::InvalidParams)));
    }

    #[test]
    fn resource_paths_escape_each_segment() {
        assert_eq!(
            resource_path(&["lists", "l1", "merge-fields"]),
            "lists/l1/merge-fields"
        );
        assert_eq!(
            resource_path(&["lists", "a/b?c#d", "members"]),
            "lists/a%2Fb%3Fc%23d/members"
        );
        let client = Client::new("abc123-us6").unwrap();
        let url = client
            .endpoint()
            .join(&resource_path(&["lists", "../x?y", "members"]))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://us6.api.mailchimp.com/3.0/lists/..%2Fx%3Fy/members"
        );
    }

    #[test]
    fn debug_output_hides_the_key() {
        let client = Client::new("secret-us6").unwrap();
        assert!(!format!("{client:?}").contains("secret"));
    }

    #[test]
    fn query_pairs_stringify_scalars_and_drop_nulls() {
        let params = json!({"offset": 0, "fields": "", "flag": true, "gone": null});
        let mut pairs = query_pairs(params.as_object().unwrap());
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("fields", "".to_string()),
                ("flag", "true".to_string()),
                ("offset", "0".to_string()),
            ]
        );
    }
}
