use serde::{Deserialize, Serialize};
use snip_core::ShortLink;

#[derive(Debug, Deserialize)]
pub struct SourceRequest {
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub start: Option<String>,
    pub count: Option<String>,
}

/// Wire form of a short link. The code is exposed as `short`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkResponse {
    pub id: u64,
    pub source: String,
    pub short: String,
}

impl From<ShortLink> for LinkResponse {
    fn from(link: ShortLink) -> Self {
        Self {
            id: link.id,
            source: link.source,
            short: link.code.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteLinkResponse {
    pub result: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
