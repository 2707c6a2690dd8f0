mod technews;

pub use technews::{latest_technews_key, technews_post, TechNewsSummary, TECHNEWS_TTL};
