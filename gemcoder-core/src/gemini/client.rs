use super::models::{GenerateContentRequest, GenerateContentResponse};
use crate::config::constants::urls;
use crate::llm::AdapterError;
use reqwest::Url;
use tracing::debug;

#[derive(Clone)]
pub struct Client {
    api_key: String,
    base_url: String,
    http: reqwest::Client,
}

impl Client {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, urls::GEMINI_API_BASE.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, model: &str) -> Result<Url, AdapterError> {
        let model = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        };
        let url = format!("{}/{}:generateContent", self.base_url, model);
        Url::parse(&url)
            .map_err(|err| AdapterError::Transport(format!("invalid Gemini endpoint URL: {err}")))
    }

    pub async fn generate_content(
        &self,
        model: &str,
        req: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, AdapterError> {
        let url = self.endpoint(model)?;
        debug!(model, contents = req.contents.len(), "sending generateContent");
        let resp = self
            .http
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(req)
            .send()
            .await
            .map_err(|err| AdapterError::Transport(err.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AdapterError::Http {
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<GenerateContentResponse>()
            .await
            .map_err(|err| AdapterError::InvalidResponse(err.to_string()))
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_prefixes_models_path() {
        let client = Client::with_base_url("k".into(), "http://localhost:9/v1beta/".into());
        let url = client.endpoint("gemini-2.5-flash").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9/v1beta/models/gemini-2.5-flash:generateContent"
        );
        let url = client.endpoint("models/gemini-2.5-pro").unwrap();
        assert!(url.path().ends_with("models/gemini-2.5-pro:generateContent"));
    }
}
