//! Video and audio stream URL derivation
//!
//! The camera and microphone feeds live next to the telemetry route on the
//! same device: `/data` becomes `/video_feed` and `/audio_feed`. Decoding the
//! streams is left to the viewer; this module only hands out URLs.

use reqwest::Url;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StreamUrlError {
    #[error("Invalid endpoint URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Endpoint URL '{0}' has no path to derive stream routes from")]
    NotHierarchical(String),
}

/// Stream URLs derived from the telemetry endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamEndpoints {
    /// MJPEG camera feed with a cache-busting `t` query parameter
    pub video_url: String,
    /// Live audio feed
    pub audio_url: String,
}

impl StreamEndpoints {
    /// Derive both stream URLs from the telemetry endpoint.
    ///
    /// `now_ms` is appended to the video URL so a reopened viewer never
    /// shows a cached frame.
    pub fn derive(endpoint: &str, now_ms: i64) -> Result<Self, StreamUrlError> {
        let base = Url::parse(endpoint).map_err(|e| StreamUrlError::InvalidUrl {
            url: endpoint.to_string(),
            message: e.to_string(),
        })?;

        let mut video = with_feed(&base, "video_feed")?;
        video
            .query_pairs_mut()
            .append_pair("t", &now_ms.to_string());
        let audio = with_feed(&base, "audio_feed")?;

        Ok(Self {
            video_url: video.to_string(),
            audio_url: audio.to_string(),
        })
    }
}

fn with_feed(base: &Url, feed: &str) -> Result<Url, StreamUrlError> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);

    let ends_in_data = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .is_some_and(|last| last == "data");

    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| StreamUrlError::NotHierarchical(base.to_string()))?;
        segments.pop_if_empty();
        if ends_in_data {
            segments.pop();
        }
        segments.push(feed);
    }

    Ok(url)
}
