//! In-page API request marshaling.
//!
//! The logged-out scenarios assert on the app's JSON API directly. Requests
//! run as `fetch` calls inside the page's execution context so they carry the
//! page's cookies and origin, which is the whole point: the server must see
//! exactly what a browser-resident script would send.

use serde_json::Value;

/// HTTP method for an in-page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET request
    Get,
    /// POST request
    Post,
}

impl Method {
    /// The method name as it appears in the fetch init object
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// A request to run inside the page via `fetch`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Path relative to the page origin (e.g., "/api/blogs")
    pub path: String,
    /// JSON body for POST requests
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Build a GET request
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    /// Build a POST request with a JSON body
    #[must_use]
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
        }
    }

    /// The fetch expression for this request, resolving to parsed JSON.
    ///
    /// Credentials are same-origin so the session cookies ride along; the
    /// body embeds as a JSON literal, which is valid JavaScript for any
    /// serde_json value.
    #[must_use]
    pub fn to_fetch_script(&self) -> String {
        let body = self.body.as_ref().map_or(String::new(), |b| {
            format!(", body: JSON.stringify({b})")
        });
        format!(
            "fetch({path:?}, {{ method: {method:?}, credentials: 'same-origin', \
             headers: {{ 'Content-Type': 'application/json' }}{body} }}).then(res => res.json())",
            path = self.path,
            method = self.method.as_str(),
        )
    }
}

/// A script resolving to the responses of all requests, in order
#[must_use]
pub fn batch_script(requests: &[ApiRequest]) -> String {
    let scripts: Vec<String> = requests.iter().map(ApiRequest::to_fetch_script).collect();
    format!("Promise.all([{}])", scripts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_has_no_body() {
        let req = ApiRequest::get("/api/blogs");
        let script = req.to_fetch_script();
        assert!(script.starts_with("fetch(\"/api/blogs\""));
        assert!(script.contains("method: \"GET\""));
        assert!(!script.contains("body:"));
    }

    #[test]
    fn test_post_embeds_json_body() {
        let req = ApiRequest::post("/api/blogs", json!({ "title": "T", "content": "C" }));
        let script = req.to_fetch_script();
        assert!(script.contains("method: \"POST\""));
        assert!(script.contains("body: JSON.stringify({\"content\":\"C\",\"title\":\"T\"})"));
    }

    #[test]
    fn test_requests_are_same_origin() {
        let script = ApiRequest::get("/api/current_user").to_fetch_script();
        assert!(script.contains("credentials: 'same-origin'"));
        assert!(script.contains("'Content-Type': 'application/json'"));
    }

    #[test]
    fn test_responses_parse_as_json() {
        let script = ApiRequest::get("/api/blogs").to_fetch_script();
        assert!(script.ends_with(".then(res => res.json())"));
    }

    #[test]
    fn test_batch_preserves_order() {
        let reqs = [
            ApiRequest::post("/api/blogs", json!({ "title": "T" })),
            ApiRequest::get("/api/blogs"),
        ];
        let script = batch_script(&reqs);
        assert!(script.starts_with("Promise.all(["));
        let post_at = script.find("POST").unwrap();
        let get_at = script.find("GET").unwrap();
        assert!(post_at < get_at);
    }

    #[test]
    fn test_batch_of_one() {
        let script = batch_script(&[ApiRequest::get("/api/blogs")]);
        assert!(script.contains("fetch(\"/api/blogs\""));
        assert!(!script.contains(", fetch"));
    }
}
