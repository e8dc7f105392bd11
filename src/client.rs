use const_format::concatcp;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::{
    traits::AuthorApi,
    types::{
        author::{Author, AuthorList, AuthorUpdate, NewAuthor},
        guid::Guid,
    },
};

pub const USER_AGENT: &str = concatcp!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Path of the author resource below the base url.
const RESOURCE: [&str; 2] = ["api", "Autor"];
const BY_NAME: &str = "nombre";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server answered {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("malformed payload at `{}`: {}", .0.path(), .0.inner())]
    Decode(#[from] serde_path_to_error::Error<serde_json::Error>),
    #[error("base url `{0}` cannot take path segments")]
    BaseUrl(String),
}

/// [AuthorApi] over HTTP.
#[derive(Clone, Debug)]
pub struct HttpAuthorApi {
    client:   Client,
    base_url: Url,
}

impl HttpAuthorApi {
    pub fn new(base_url: Url) -> Result<Self, ApiError> {
        if base_url.cannot_be_a_base() {
            return Err(ApiError::BaseUrl(base_url.to_string()));
        }
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/api/Autor/{segments..}`, each segment percent-encoded on its own.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::BaseUrl(self.base_url.to_string()))?;
            path.pop_if_empty().extend(RESOURCE).extend(segments);
        }
        Ok(url)
    }
}

async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status { status, body })
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let de = &mut serde_json::Deserializer::from_str(body);
    Ok(serde_path_to_error::deserialize(de)?)
}

impl AuthorApi for HttpAuthorApi {
    async fn list(&self) -> Result<Vec<Author>, ApiError> {
        let url = self.endpoint(&[])?;
        debug!("GET {url}");
        let body = check(self.client.get(url).send().await?).await?.text().await?;
        decode(&body)
    }

    async fn search_by_name(&self, name: &str) -> Result<Vec<Author>, ApiError> {
        let url = self.endpoint(&[BY_NAME, name])?;
        debug!("GET {url}");
        let body = check(self.client.get(url).send().await?).await?.text().await?;
        Ok(AuthorList::from_value(decode(&body)?)?.into_vec())
    }

    async fn create(&self, author: &NewAuthor) -> Result<(), ApiError> {
        let url = self.endpoint(&[])?;
        debug!("POST {url}");
        check(self.client.post(url).json(author).send().await?).await?;
        Ok(())
    }

    async fn update(&self, guid: &Guid, author: &AuthorUpdate) -> Result<(), ApiError> {
        let url = self.endpoint(&[guid.as_str()])?;
        debug!("PUT {url}");
        check(self.client.put(url).json(author).send().await?).await?;
        Ok(())
    }

    async fn delete(&self, guid: &Guid) -> Result<(), ApiError> {
        let url = self.endpoint(&[guid.as_str()])?;
        debug!("DELETE {url}");
        check(self.client.delete(url).send().await?).await?;
        Ok(())
    }
}
