//! 票房页面解析，得到主数据源记录

use serde::Deserialize;

use super::extractor::RuleSet;
use super::normalizer;
use super::rules::{PageRules, MAOYAN_PAGE_RULES};
use crate::models::{placeholder, BasicInfo, RatingInfo};

/// 从 HTML 页面得到的主记录
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryRecord {
    pub basic: BasicInfo,
    pub rating: RatingInfo,
}

/// 旧版页面在 script 中内嵌的影片对象
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmbeddedMovie {
    movie_name: Option<String>,
    movie_en_name: Option<String>,
    movie_img: Option<String>,
    director: Option<String>,
    category: Option<String>,
    release_date: Option<String>,
}

pub fn parse_box_office_page(html: &str, movie_id: &str) -> PrimaryRecord {
    parse_with_rules(&MAOYAN_PAGE_RULES, html, movie_id)
}

pub fn parse_with_rules(rules: &PageRules, html: &str, movie_id: &str) -> PrimaryRecord {
    let embedded = embedded_movie(rules, html).unwrap_or_default();

    // 内嵌对象里的值优先，其次按规则表提取
    let field = |embedded_value: Option<String>, set: &RuleSet| -> Option<String> {
        embedded_value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .or_else(|| set.extract(html).into_option())
    };

    let basic = BasicInfo {
        movie_id: movie_id.to_string(),
        movie_name: field(embedded.movie_name, &rules.movie_name)
            .unwrap_or_else(|| placeholder::MOVIE_NAME.to_string()),
        movie_en_name: field(embedded.movie_en_name, &rules.movie_en_name).unwrap_or_default(),
        movie_img: field(embedded.movie_img, &rules.movie_img)
            .map(|url| normalizer::format_image_url(&url))
            .unwrap_or_default(),
        director: field(embedded.director, &rules.director)
            .unwrap_or_else(|| placeholder::DIRECTOR.to_string()),
        category: field(embedded.category, &rules.category)
            .unwrap_or_else(|| placeholder::CATEGORY.to_string()),
        release_date: field(embedded.release_date, &rules.release_date)
            .map(|raw| normalizer::normalize_date(&raw))
            .unwrap_or_else(|| placeholder::RELEASE_DATE.to_string()),
        box_office: normalizer::box_office_or_placeholder(rules.box_office.extract(html).into_option()),
        duration: rules.duration.extract(html).into_option(),
        region: rules
            .region
            .extract(html)
            .or_placeholder(placeholder::REGION),
    };

    let rating = RatingInfo {
        maoyan_rating: rules.maoyan_rating.extract(html).into_option(),
        imdb_rating: rules.imdb_rating.extract(html).into_option(),
    };

    tracing::debug!(
        "Parsed box office page for {}: name={}, box_office={}",
        movie_id,
        basic.movie_name,
        basic.box_office
    );

    PrimaryRecord { basic, rating }
}

fn embedded_movie(rules: &PageRules, html: &str) -> Option<EmbeddedMovie> {
    let json = rules.embedded_json.extract(html).into_option()?;
    match serde_json::from_str::<EmbeddedMovie>(&json) {
        Ok(movie) if movie.movie_name.as_deref().is_some_and(|n| !n.trim().is_empty()) => Some(movie),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("Embedded movie object is not valid JSON: {}", e);
            None
        }
    }
}
