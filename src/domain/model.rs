//! Response shapes of the content APIs.
//!
//! Only the fields the crate reads are typed; everything else is kept in
//! `extra` so a payload re-serializes without loss.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Paginated list envelope used by the consumet routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumetResponse<T> {
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEpisode {
    pub id: String,
    #[serde(default)]
    pub episode_id: Option<String>,
    #[serde(default)]
    pub episode_number: Option<f64>,
    #[serde(default)]
    pub title: Value,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Popular {
    pub id: String,
    #[serde(default)]
    pub title: Value,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Search {
    pub id: String,
    #[serde(default)]
    pub title: Value,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeInfo {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub other_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub total_episodes: Option<u32>,
    #[serde(default)]
    pub episodes: Vec<Episode>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnimeInfo {
    /// `title`, else `other_name`. Blank strings count as missing.
    pub fn display_title(&self) -> Option<&str> {
        [self.title.as_deref(), self.other_name.as_deref()]
            .into_iter()
            .flatten()
            .find(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    pub number: f64,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesResponse {
    #[serde(default)]
    pub headers: Map<String, Value>,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub download: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub url: String,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default, rename = "isM3U8")]
    pub is_m3u8: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Anify seasonal listing. Each bucket holds loosely shaped media entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeasonalResponse {
    #[serde(default)]
    pub trending: Vec<Value>,
    #[serde(default)]
    pub seasonal: Vec<Value>,
    #[serde(default)]
    pub popular: Vec<Value>,
    #[serde(default)]
    pub top: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_anime_info_keeps_unknown_fields() {
        let raw = json!({
            "id": "one-piece",
            "title": "One Piece",
            "status": "Ongoing",
            "episodes": [{"id": "one-piece-episode-1", "number": 1, "isFiller": false}]
        });

        let info: AnimeInfo = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(info.episodes.len(), 1);
        assert_eq!(info.extra.get("status"), Some(&json!("Ongoing")));

        let back = serde_json::to_value(&info).unwrap();
        assert_eq!(back["status"], raw["status"]);
        assert_eq!(back["episodes"][0]["isFiller"], json!(false));
    }

    #[test]
    fn test_display_title_falls_back_to_other_name() {
        let info: AnimeInfo = serde_json::from_value(json!({
            "id": "x",
            "title": "  ",
            "otherName": "Wan Pisu"
        }))
        .unwrap();
        assert_eq!(info.display_title(), Some("Wan Pisu"));
    }

    #[test]
    fn test_sources_m3u8_flag() {
        let sources: SourcesResponse = serde_json::from_value(json!({
            "headers": {"Referer": "https://example.org"},
            "sources": [{"url": "https://cdn/a.m3u8", "quality": "1080p", "isM3U8": true}]
        }))
        .unwrap();
        assert!(sources.sources[0].is_m3u8);
        assert_eq!(sources.sources[0].quality.as_deref(), Some("1080p"));
    }
}
