//! 学习资源排序：hands-on 评分、关键词提取、RepositoryRanker

pub mod ranker;
pub mod score;

pub use ranker::{rank, RepositoryRanker};
pub use score::{analyze, extract_keywords, hands_on_score, Recommendation, MAX_SCORE};
