// 猫眼票房页面的字段提取规则
//
// 每个字段的规则按可靠程度排列：先匹配当前页面结构，再匹配旧版页面，
// 最后是宽松的文本兜底。页面改版时只需要在这里增删规则。

use regex::Captures;

use super::extractor::{Capture, Rule, RuleSet};
use super::normalizer;

/// 票房页面全部字段的规则表
#[derive(Debug)]
pub struct PageRules {
    pub embedded_json: RuleSet,
    pub movie_name: RuleSet,
    pub movie_en_name: RuleSet,
    pub movie_img: RuleSet,
    pub director: RuleSet,
    pub category: RuleSet,
    pub release_date: RuleSet,
    pub box_office: RuleSet,
    pub duration: RuleSet,
    pub region: RuleSet,
    pub maoyan_rating: RuleSet,
    pub imdb_rating: RuleSet,
}

lazy_static::lazy_static! {
    pub static ref MAOYAN_PAGE_RULES: PageRules =
        PageRules::maoyan().expect("票房页面提取规则编译失败");
}

/// 页面内嵌 JSON 形式的票房，如 `"boxOffice":"12.3亿"`
fn embedded_box_office(caps: &Captures<'_>) -> Option<String> {
    let raw = caps.get(1)?.as_str();
    normalizer::format_box_office_text(raw).or_else(|| Some(raw.to_string()))
}

const AMOUNT: Capture = Capture::Amount { value: 1, unit: 2 };

impl PageRules {
    pub fn maoyan() -> Result<Self, regex::Error> {
        Ok(Self {
            embedded_json: RuleSet::new(
                "embeddedJson",
                vec![Rule::first_group(
                    "script-movie-object",
                    r#"<script[^>]*>[^<]*?(\{[^{}]*"movieId"\s*:\s*[0-9]+[^{}]*"movieName"\s*:[^{}]*\})"#,
                )?],
            ),
            movie_name: RuleSet::new(
                "movieName",
                vec![
                    Rule::first_group(
                        "h1-navbar-title",
                        r#"<h1[^>]*class="[^"]*navBarTitle[^"]*"[^>]*>([^<]+)</h1>"#,
                    )?,
                    Rule::first_group(
                        "h1-movie-name",
                        r#"<h1[^>]*class="[^"]*movie-name[^"]*"[^>]*>([^<]+)</h1>"#,
                    )?,
                    Rule::first_group("h1-name", r#"<h1[^>]*class="[^"]*name[^"]*"[^>]*>([^<]+)</h1>"#)?,
                    Rule::first_group(
                        "info-title-content",
                        r#"<span[^>]*class="[^"]*info-title-content[^"]*"[^>]*>([^<]+)</span>"#,
                    )?,
                    Rule::first_group(
                        "brief-container-h1",
                        r#"<div[^>]*class="[^"]*movie-brief-container[^"]*"[^>]*>[\s\S]*?<h1[^>]*>([^<]+)</h1>"#,
                    )?,
                ],
            ),
            movie_en_name: RuleSet::new(
                "movieEnName",
                vec![
                    Rule::first_group(
                        "info-etitle-content",
                        r#"<span[^>]*class="[^"]*info-etitle-content[^"]*"[^>]*>([^<]+)</span>"#,
                    )?,
                    Rule::first_group("json-en-name", r#""movieEnName"\s*:\s*"([^"]+)""#)?,
                ],
            ),
            movie_img: RuleSet::new(
                "movieImg",
                vec![
                    Rule::first_group(
                        "need-handle-pic",
                        r#"<img[^>]*src="([^"]+)"[^>]*alt="[^"]*"[^>]*class="need-handle-pic""#,
                    )?,
                    Rule::first_group("og-image", r#"<meta[^>]*property="og:image"[^>]*content="([^"]+)""#)?,
                    Rule::first_group("avatar", r#"<img[^>]*class="[^"]*avatar[^"]*"[^>]*src="([^"]+)""#)?,
                ],
            ),
            director: RuleSet::new(
                "director",
                vec![
                    Rule::first_group("json-director", r#""director"\s*:\s*"([^"]+)""#)?,
                    Rule::first_group("label-inline", r"导演[：:]\s*([^<\n]+)")?,
                    Rule::first_group("label-next-tag", r"导演</[^>]+>\s*<[^>]+>([^<]+)")?,
                ],
            ),
            category: RuleSet::new(
                "category",
                vec![
                    Rule::first_group("info-category", r#"<p class="info-category">\s*([^<\s]+)"#)?,
                    Rule::first_group("json-category", r#""category"\s*:\s*"([^"]+)""#)?,
                ],
            ),
            release_date: RuleSet::new(
                "releaseDate",
                vec![
                    Rule::first_group("json-release-date", r#""releaseDate"\s*:\s*"([^"]+)""#)?,
                    Rule::first_group(
                        "release-text",
                        r"([0-9]{4}[-/年][0-9]{1,2}[-/月][0-9]{1,2}日?)[^<]{0,12}上映",
                    )?,
                ],
            ),
            box_office: RuleSet::new(
                "boxOffice",
                vec![
                    Rule::new(
                        "detail-block",
                        r#"(?i)累计票房\s*</p>\s*<p[^>]*>\s*<span[^>]*class="[^"]*detail-num[^"]*"[^>]*>([\d.,]+)</span>[\s\S]*?<span[^>]*class="[^"]*detail-unit[^"]*"[^>]*>([^<]+)</span>"#,
                        AMOUNT,
                    )?,
                    Rule::new(
                        "detail-content",
                        r#"累计票房[\s\S]*?</p>\s*<p[^>]*class="info-detail-content"[^>]*>\s*<span[^>]*class="detail-num"[^>]*>([^<]+)</span>[\s\S]*?<span[^>]*class="detail-unit"[^>]*>([^<]+)</span>"#,
                        AMOUNT,
                    )?,
                    Rule::new(
                        "detail-num-unit",
                        r"(?i)累计票房[\s\S]*?detail-num[^>]*>([\d.,]+)</span>[\s\S]*?detail-unit[^>]*>([^<]+)</span>",
                        AMOUNT,
                    )?,
                    Rule::new(
                        "adjacent-spans",
                        r"累计票房[\s\S]{0,200}?<span[^>]*>([0-9.,]+)</span>[\s\S]{0,50}?<span[^>]*>([万亿]+)</span>",
                        AMOUNT,
                    )?,
                    Rule::new(
                        "json-box-office",
                        r#""boxOffice"\s*:\s*"([^"]+)""#,
                        Capture::Custom(embedded_box_office),
                    )?,
                    Rule::new(
                        "json-total-box-office",
                        r#""totalBoxOffice"\s*:\s*"([^"]+)""#,
                        Capture::Custom(embedded_box_office),
                    )?,
                    Rule::new(
                        "loose-text",
                        r"累计票房[\s\S]{0,300}?([0-9][0-9.,]*)\s*([万亿]元?)",
                        AMOUNT,
                    )?,
                ],
            ),
            duration: RuleSet::new("duration", vec![Rule::first_group("minutes-text", r"([0-9]+分钟)")?]),
            region: RuleSet::new(
                "region",
                vec![Rule::first_group(
                    "known-region",
                    r"(中国大陆|中国香港|中国台湾|美国|日本|韩国|英国|法国)",
                )?],
            ),
            maoyan_rating: RuleSet::new(
                "MaoYanRating",
                vec![
                    Rule::first_group("rating-num", r#"<span class="rating-num">([0-9]+(?:\.[0-9]+)?)</span>"#)?,
                    Rule::first_group(
                        "rating-num-loose",
                        r#"class="[^"]*rating-num[^"]*"[^>]*>\s*([0-9]+(?:\.[0-9]+)?)"#,
                    )?,
                ],
            ),
            imdb_rating: RuleSet::new(
                "IMDBRating",
                vec![Rule::first_group("imdb-text", r"IMDb\s+([0-9]+(?:\.[0-9]+)?)")?],
            ),
        })
    }
}
