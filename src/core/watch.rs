//! Loader for `/watch/<anime-id>/<anilist-id>/<episode>`.

use crate::domain::model::{AnimeInfo, SourcesResponse};
use crate::domain::ports::AnimeCatalog;
use crate::utils::error::{AppError, Result};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchParams {
    pub anime_id: String,
    pub anilist_id: String,
    pub episode_number: u32,
}

impl WatchParams {
    /// Parses the catch-all route segments. Extra trailing segments are ignored.
    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Result<Self> {
        let [anime_id, anilist_id, episode, ..] = segments else {
            return Err(AppError::InvalidParams {
                message: format!("expected 3 route segments, got {}", segments.len()),
            });
        };

        let anime_id = anime_id.as_ref().trim();
        if anime_id.is_empty() {
            return Err(AppError::InvalidParams {
                message: "anime id is empty".to_string(),
            });
        }

        let episode = episode.as_ref().trim();
        let episode_number = episode
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| AppError::InvalidParams {
                message: format!("episode number '{}' is not a positive integer", episode),
            })?;

        Ok(Self {
            anime_id: anime_id.to_string(),
            anilist_id: anilist_id.as_ref().trim().to_string(),
            episode_number,
        })
    }

    pub fn episode_id(&self) -> String {
        episode_id(&self.anime_id, self.episode_number)
    }
}

pub fn episode_id(anime_id: &str, episode_number: u32) -> String {
    format!("{}-episode-{}", anime_id, episode_number)
}

fn position_of(anime: &AnimeInfo, episode_number: u32) -> Option<usize> {
    anime
        .episodes
        .iter()
        .position(|ep| ep.number == f64::from(episode_number))
}

/// Episode to link as "next". Stays on the last episode; unknown episodes
/// point back to the first.
pub fn next_episode(anime: &AnimeInfo, episode_number: u32) -> u32 {
    if episode_number as usize == anime.episodes.len() {
        return episode_number;
    }

    match position_of(anime, episode_number) {
        Some(index) => index as u32 + 2,
        None => 1,
    }
}

/// Episode to link as "previous". Never goes below 1; unknown episodes stay put.
pub fn prev_episode(anime: &AnimeInfo, episode_number: u32) -> u32 {
    if episode_number == 1 {
        return 1;
    }

    match position_of(anime, episode_number) {
        Some(index) => (index as u32).max(1),
        None => episode_number,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WatchPage {
    pub anime_id: String,
    pub anilist_id: String,
    pub episode_number: u32,
    pub episode_id: String,
    pub title: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub next_episode: u32,
    pub prev_episode: u32,
    pub episodes_total: usize,
    pub share_url: String,
    pub sources: SourcesResponse,
}

pub struct WatchLoader<'a, C: AnimeCatalog + ?Sized> {
    catalog: &'a C,
    app_url: String,
}

impl<'a, C: AnimeCatalog + ?Sized> WatchLoader<'a, C> {
    pub fn new(catalog: &'a C, app_url: impl Into<String>) -> Self {
        Self {
            catalog,
            app_url: app_url.into(),
        }
    }

    pub fn share_url(&self, params: &WatchParams) -> String {
        format!(
            "{}/watch/{}/{}/{}",
            self.app_url.trim_end_matches('/'),
            params.anime_id,
            params.anilist_id,
            params.episode_number
        )
    }

    /// Loads info and sources concurrently and derives the episode navigation.
    pub async fn load(&self, params: &WatchParams) -> Result<WatchPage> {
        let episode_id = params.episode_id();
        tracing::debug!(anime_id = %params.anime_id, %episode_id, "loading watch page");

        let (anime, sources) = tokio::try_join!(
            self.catalog.anime_info(&params.anime_id),
            self.catalog.watch(&episode_id)
        )?;

        let next_episode = next_episode(&anime, params.episode_number);
        let prev_episode = prev_episode(&anime, params.episode_number);
        let title = anime
            .display_title()
            .unwrap_or(&params.anime_id)
            .to_string();

        Ok(WatchPage {
            anime_id: params.anime_id.clone(),
            anilist_id: params.anilist_id.clone(),
            episode_number: params.episode_number,
            episode_id,
            title,
            image: anime.image.clone(),
            description: anime.description.clone(),
            next_episode,
            prev_episode,
            episodes_total: anime.episodes.len(),
            share_url: self.share_url(params),
            sources,
        })
    }
}
