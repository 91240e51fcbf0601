// Remote I/O: the track list endpoint and album cover images.
// Everything here is async and runs inside iced Tasks on the tokio executor.

use image::imageops::FilterType;
use url::Url;

use crate::config::HttpSettings;
use crate::library::{Library, TrackEntry};

#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    #[error("Client error: {0}")]
    Client(String),
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Server error: HTTP {0}")]
    Status(u16),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Image decode error: {0}")]
    Decode(String),
}

/// Decoded, resized cover art as straight RGBA8 pixels.
#[derive(Debug, Clone)]
pub struct CoverImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

fn client(settings: &HttpSettings) -> Result<reqwest::Client, FetchError> {
    let mut builder = reqwest::Client::builder().user_agent(settings.user_agent.as_str());
    if let Some(timeout) = settings.timeout {
        builder = builder.timeout(timeout);
    }
    if !settings.use_system_proxy {
        builder = builder.no_proxy();
    }
    builder.build().map_err(|e| FetchError::Client(e.to_string()))
}

/// GET `url`, failing on any non-success status.
async fn get(settings: &HttpSettings, url: Url) -> Result<reqwest::Response, FetchError> {
    let response = client(settings)?
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::Request(e.to_string()))?;

    if !response.status().is_success() {
        return Err(FetchError::Status(response.status().as_u16()));
    }

    Ok(response)
}

/// Fetch the full track list.
pub async fn fetch_tracks(endpoint: Url, settings: HttpSettings) -> Result<Library, FetchError> {
    log::info!("Fetching track list from {endpoint}");

    let entries: Vec<TrackEntry> = get(&settings, endpoint)
        .await?
        .json()
        .await
        .map_err(|e| {
            if e.is_decode() {
                FetchError::Parse(e.to_string())
            } else {
                FetchError::Request(e.to_string())
            }
        })?;
    let library = Library::new(entries);

    log::info!("Fetched {} tracks", library.len());
    Ok(library)
}

/// Fetch, decode and resize one cover image to `size`×`size`.
pub async fn fetch_cover(
    url: String,
    size: u32,
    settings: HttpSettings,
) -> Result<CoverImage, FetchError> {
    let url = Url::parse(&url).map_err(|e| FetchError::Request(format!("{url}: {e}")))?;
    log::debug!("Fetching cover {url}");

    let bytes = get(&settings, url)
        .await?
        .bytes()
        .await
        .map_err(|e| FetchError::Request(e.to_string()))?;
    decode_cover(&bytes, size)
}

/// Decode any format the `image` crate recognises and stretch it to a
/// square thumbnail.
pub fn decode_cover(bytes: &[u8], size: u32) -> Result<CoverImage, FetchError> {
    let img = image::load_from_memory(bytes).map_err(|e| FetchError::Decode(e.to_string()))?;
    let rgba = img.resize_exact(size, size, FilterType::Lanczos3).to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(CoverImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}
