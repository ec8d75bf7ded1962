use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

pub struct FetchedMedia {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

/// Re-fetches stored media by its public address.
#[derive(Clone, Default)]
pub struct MediaFetcher {
    client: Client,
}

impl MediaFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn fetch(&self, url: &str) -> Result<FetchedMedia, reqwest::Error> {
        let response = self.client.get(url).send().await?.error_for_status()?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;

        Ok(FetchedMedia { bytes, content_type })
    }
}
