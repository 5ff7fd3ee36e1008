//! Hosted leaderboard table (PostgREST over `fetch`)
//!
//! Each leaderboard variant owns one table with `username`, `score` and
//! `created_at` columns. Queries are plain PostgREST parameters; only the
//! browser build encodes and sends them.

/// Where the hosted table lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Project URL, without a trailing slash
    pub url: String,
    /// Public (anon) API key
    pub anon_key: String,
}

impl RemoteConfig {
    /// `None` if either part is blank
    pub fn new(url: &str, anon_key: &str) -> Option<Self> {
        let url = url.trim().trim_end_matches('/');
        let anon_key = anon_key.trim();
        if url.is_empty() || anon_key.is_empty() {
            return None;
        }
        Some(Self {
            url: url.to_string(),
            anon_key: anon_key.to_string(),
        })
    }

    /// Baked in at compile time for the browser build
    #[cfg(target_arch = "wasm32")]
    pub fn from_env() -> Option<Self> {
        Self::new(option_env!("ARCADE_SUPABASE_URL")?, option_env!("ARCADE_SUPABASE_ANON_KEY")?)
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.url, table)
    }
}

/// A read against the scores table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreQuery<'a> {
    /// Best scores, optionally created at or after an ISO-8601 instant
    Top { since: Option<&'a str>, limit: usize },
    /// Rows with exactly this username
    Username(&'a str),
}

impl ScoreQuery<'_> {
    /// PostgREST parameters, not yet URL-encoded
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            ScoreQuery::Top { since, limit } => {
                let mut params = vec![
                    ("select", "*".to_string()),
                    ("order", "score.desc".to_string()),
                    ("limit", limit.to_string()),
                ];
                if let Some(since) = since {
                    params.push(("created_at", format!("gte.{}", since)));
                }
                params
            }
            ScoreQuery::Username(username) => vec![
                ("select", "username".to_string()),
                ("username", format!("eq.{}", username)),
            ],
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::RestStore;

#[cfg(target_arch = "wasm32")]
mod browser {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Headers, Request, RequestInit, Response};

    use super::{RemoteConfig, ScoreQuery};
    use crate::error::HighScoreError;
    use crate::highscores::{NewScore, ScoreRow, ScoreStore};

    fn js_err(err: JsValue) -> HighScoreError {
        HighScoreError::Request(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
    }

    /// `key=value&...` with every value passed through `encodeURIComponent`
    fn query_string(query: ScoreQuery<'_>) -> String {
        query
            .params()
            .into_iter()
            .map(|(key, value)| {
                let value: String = js_sys::encode_uri_component(&value).into();
                format!("{}={}", key, value)
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// `ScoreStore` backed by the hosted table
    #[derive(Debug, Clone)]
    pub struct RestStore {
        config: RemoteConfig,
        table: String,
    }

    impl RestStore {
        pub fn new(config: RemoteConfig, table: &str) -> Self {
            Self {
                config,
                table: table.to_string(),
            }
        }

        /// Store for `table` using the compiled-in project settings
        pub fn from_env(table: &str) -> Result<Self, HighScoreError> {
            RemoteConfig::from_env()
                .map(|config| Self::new(config, table))
                .ok_or(HighScoreError::NotConfigured)
        }

        fn headers(&self) -> Result<Headers, HighScoreError> {
            let headers = Headers::new().map_err(js_err)?;
            headers.set("apikey", &self.config.anon_key).map_err(js_err)?;
            headers
                .set("Authorization", &format!("Bearer {}", self.config.anon_key))
                .map_err(js_err)?;
            headers.set("Content-Type", "application/json").map_err(js_err)?;
            Ok(headers)
        }

        /// Send a request and return the response body
        async fn send(&self, method: &str, url: &str, body: Option<String>) -> Result<String, HighScoreError> {
            let window = web_sys::window().ok_or_else(|| HighScoreError::Request("no window".into()))?;

            let headers = self.headers()?;
            if body.is_some() {
                headers.set("Prefer", "return=minimal").map_err(js_err)?;
            }
            let init = RequestInit::new();
            init.set_method(method);
            init.set_headers(&headers);
            if let Some(body) = &body {
                init.set_body(&JsValue::from_str(body));
            }

            let request = Request::new_with_str_and_init(url, &init).map_err(js_err)?;
            let response: Response = JsFuture::from(window.fetch_with_request(&request))
                .await
                .map_err(js_err)?
                .dyn_into()
                .map_err(js_err)?;
            if !response.ok() {
                return Err(HighScoreError::Status(response.status()));
            }

            let text = JsFuture::from(response.text().map_err(js_err)?)
                .await
                .map_err(js_err)?;
            Ok(text.as_string().unwrap_or_default())
        }

        async fn select(&self, query: ScoreQuery<'_>) -> Result<Vec<ScoreRow>, HighScoreError> {
            let url = format!("{}?{}", self.config.table_url(&self.table), query_string(query));
            log::debug!("GET {}", url);
            let body = self.send("GET", &url, None).await?;
            Ok(serde_json::from_str(&body)?)
        }
    }

    impl ScoreStore for RestStore {
        async fn top_scores(
            &self,
            since: Option<&str>,
            limit: usize,
        ) -> Result<Vec<ScoreRow>, HighScoreError> {
            self.select(ScoreQuery::Top { since, limit }).await
        }

        async fn rows_for_username(&self, username: &str) -> Result<Vec<ScoreRow>, HighScoreError> {
            self.select(ScoreQuery::Username(username)).await
        }

        async fn insert(&self, score: &NewScore) -> Result<(), HighScoreError> {
            let body = serde_json::to_string(score)?;
            self.send("POST", &self.config.table_url(&self.table), Some(body))
                .await
                .map(|_| ())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_rejects_blanks() {
        assert_eq!(RemoteConfig::new("", "key"), None);
        assert_eq!(RemoteConfig::new("https://x.supabase.co", "  "), None);

        let config = RemoteConfig::new("https://x.supabase.co/", "key").unwrap();
        assert_eq!(
            config.table_url("azalea_runner_scores"),
            "https://x.supabase.co/rest/v1/azalea_runner_scores"
        );
    }

    #[test]
    fn test_top_params() {
        let all = ScoreQuery::Top {
            since: None,
            limit: 10,
        };
        assert_eq!(
            all.params(),
            vec![
                ("select", "*".to_string()),
                ("order", "score.desc".to_string()),
                ("limit", "10".to_string()),
            ]
        );

        let daily = ScoreQuery::Top {
            since: Some("2023-11-13T22:13:20.000Z"),
            limit: 10,
        };
        assert_eq!(
            daily.params().last(),
            Some(&("created_at", "gte.2023-11-13T22:13:20.000Z".to_string()))
        );
    }

    #[test]
    fn test_username_params_keep_raw_value() {
        let query = ScoreQuery::Username("a&b c");
        assert_eq!(
            query.params(),
            vec![
                ("select", "username".to_string()),
                ("username", "eq.a&b c".to_string()),
            ]
        );
    }
}
