pub mod consumet;
pub mod read_through;
pub mod watch;

pub use crate::domain::model::{AnimeInfo, ConsumetResponse, SeasonalResponse, SourcesResponse};
pub use crate::domain::ports::{AnimeCatalog, CacheStore, ConfigProvider};
pub use crate::utils::error::Result;
