//! Hands-on 评分与关键词提取
//!
//! score = min(stars/100, 50) + min(forks/100, 20)
//!       + 5 × 描述中出现的 hands-on 关键词数
//!       + 5 (has_wiki) + 5 (描述含 "readme"，不区分大小写)
//! 上限 115。

use serde::{Deserialize, Serialize};

use crate::integrations::RepositoryRecord;

pub const HANDS_ON_KEYWORDS: [&str; 7] = [
    "tutorial",
    "example",
    "hands-on",
    "practical",
    "guide",
    "workshop",
    "project",
];

pub const TECH_KEYWORDS: [&str; 19] = [
    "python",
    "javascript",
    "java",
    "react",
    "node",
    "ai",
    "ml",
    "agent",
    "llm",
    "langchain",
    "api",
    "web",
    "cloud",
    "docker",
    "kubernetes",
    "tensorflow",
    "pytorch",
    "django",
    "flask",
];

const STAR_CAP: f64 = 50.0;
const FORK_CAP: f64 = 20.0;
const BONUS: f64 = 5.0;

pub const MAX_SCORE: f64 = STAR_CAP + FORK_CAP + BONUS * (HANDS_ON_KEYWORDS.len() as f64 + 2.0);

/// 一条推荐：按 score 降序展示给模型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    pub stars: u64,
    pub score: f64,
    pub language: Option<String>,
}

pub fn hands_on_score(
    stars: u64,
    forks: u64,
    description: Option<&str>,
    has_wiki: bool,
) -> f64 {
    let mut score = (stars as f64 / 100.0).min(STAR_CAP) + (forks as f64 / 100.0).min(FORK_CAP);

    let description = description.unwrap_or_default().to_lowercase();
    score += HANDS_ON_KEYWORDS
        .iter()
        .filter(|kw| description.contains(*kw))
        .count() as f64
        * BONUS;

    if has_wiki {
        score += BONUS;
    }
    if description.contains("readme") {
        score += BONUS;
    }
    score
}

/// 单个仓库评分
pub fn analyze(repo: &RepositoryRecord) -> Recommendation {
    Recommendation {
        name: repo.full_name.clone(),
        url: repo.html_url.clone(),
        description: repo.description.clone(),
        stars: repo.stargazers_count,
        score: hands_on_score(
            repo.stargazers_count,
            repo.forks_count,
            repo.description.as_deref(),
            repo.has_wiki,
        ),
        language: repo.language.clone(),
    }
}

/// 标题中出现的技术关键词（子串匹配，按目录顺序）
pub fn extract_keywords(title: &str) -> Vec<String> {
    let lower = title.to_lowercase();
    TECH_KEYWORDS
        .iter()
        .filter(|kw| lower.contains(*kw))
        .map(|kw| kw.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn caps_apply_to_popularity() {
        assert_eq!(hands_on_score(250, 50, None, false), 3.0);
        assert_eq!(hands_on_score(1_000_000, 1_000_000, None, false), 70.0);
    }

    #[test]
    fn maximum_with_every_signal() {
        let desc = "Tutorial example hands-on practical guide workshop project, see README";
        assert_eq!(hands_on_score(10_000, 5_000, Some(desc), true), MAX_SCORE);
        assert_eq!(MAX_SCORE, 115.0);
    }

    #[test]
    fn readme_is_case_insensitive() {
        assert_eq!(hands_on_score(0, 0, Some("ReadMe driven"), false), 5.0);
    }

    #[test]
    fn keywords_follow_catalogue_order() {
        assert_eq!(extract_keywords("Intro to Kubernetes"), vec!["kubernetes"]);
        // "javascript" also contains "java"
        assert_eq!(
            extract_keywords("JavaScript and Docker"),
            vec!["javascript", "java", "docker"]
        );
        assert!(extract_keywords("Team standup").is_empty());
    }

    #[test]
    fn analyze_carries_display_fields() {
        let repo = RepositoryRecord {
            full_name: "kelseyhightower/kubernetes-the-hard-way".to_string(),
            html_url: "https://github.com/kelseyhightower/kubernetes-the-hard-way".to_string(),
            description: Some("Bootstrap Kubernetes the hard way. A tutorial.".to_string()),
            stargazers_count: 40_000,
            forks_count: 14_000,
            language: None,
            has_wiki: false,
            updated_at: None,
        };
        let rec = analyze(&repo);
        assert_eq!(rec.name, repo.full_name);
        assert_eq!(rec.stars, 40_000);
        assert_eq!(rec.score, 75.0);
    }

    proptest! {
        #[test]
        fn stars_are_monotonic(a in 0u64..10_000, b in 0u64..10_000, forks in 0u64..5_000, wiki: bool) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(hands_on_score(lo, forks, None, wiki) <= hands_on_score(hi, forks, None, wiki));
        }

        #[test]
        fn forks_are_monotonic(a in 0u64..5_000, b in 0u64..5_000, stars in 0u64..10_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(hands_on_score(stars, lo, None, false) <= hands_on_score(stars, hi, None, false));
        }

        #[test]
        fn each_keyword_adds_five(idx in 0usize..HANDS_ON_KEYWORDS.len(), stars in 0u64..10_000) {
            let kw = HANDS_ON_KEYWORDS[idx];
            let base = hands_on_score(stars, 0, Some("plain text"), false);
            let with = hands_on_score(stars, 0, Some(&format!("plain text {kw}")), false);
            prop_assert!((with - base - 5.0).abs() < 1e-9);
        }

        #[test]
        fn score_is_bounded(stars: u64, forks: u64, desc in ".{0,80}", wiki: bool) {
            let s = hands_on_score(stars, forks, Some(&desc), wiki);
            prop_assert!((0.0..=MAX_SCORE).contains(&s));
        }
    }
}
