mod technews;
mod whoami;

pub use technews::{technews_latest_get, LatestTechNews, NO_TECHNEWS};
pub use whoami::whoami_get;
