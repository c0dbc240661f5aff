use async_trait::async_trait;
use reqwest::Client;

use super::{QuestionSource, SourceError};

/// Question bank served over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    name: String,
    url: String,
}

impl HttpSource {
    #[must_use]
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            client,
            name: url.clone(),
            url,
        }
    }

    /// Source for `file_name` under `base_url`, named after the file.
    #[must_use]
    pub fn under(client: Client, base_url: &str, file_name: &str) -> Self {
        Self {
            client,
            name: file_name.to_string(),
            url: format!("{}/{}", base_url.trim_end_matches('/'), file_name),
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl QuestionSource for HttpSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<String, SourceError> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(SourceError::HttpStatus(response.status()));
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_base_url_and_file_name() {
        let source = HttpSource::under(Client::new(), "https://quiz.example/banks/", "Questions-Set-1.json");
        assert_eq!(source.url(), "https://quiz.example/banks/Questions-Set-1.json");
        assert_eq!(source.name(), "Questions-Set-1.json");
    }
}
