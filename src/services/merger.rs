//! 主副数据源合并
//!
//! 默认规则：副数据源（API）中非空的字段覆盖主数据源（票房页面），
//! 其余字段保留主数据源的值或占位值。单个字段可以配置为主数据源优先。

use std::collections::HashSet;

use super::normalizer;
use super::page_parser::PrimaryRecord;
use crate::models::{
    placeholder, AwardsInfo, BasicInfo, CastCrewInfo, CatalogMovie, MovieRecord, PlotInfo,
    RatingInfo, RecordMeta,
};

/// 参与合并的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeField {
    MovieId,
    MovieName,
    MovieEnName,
    MovieImg,
    Director,
    Category,
    ReleaseDate,
    BoxOffice,
    Duration,
    Region,
    PlotSummary,
}

impl MergeField {
    pub const ALL: [MergeField; 11] = [
        MergeField::MovieId,
        MergeField::MovieName,
        MergeField::MovieEnName,
        MergeField::MovieImg,
        MergeField::Director,
        MergeField::Category,
        MergeField::ReleaseDate,
        MergeField::BoxOffice,
        MergeField::Duration,
        MergeField::Region,
        MergeField::PlotSummary,
    ];

    /// 与 JSON 输出一致的字段名
    pub fn name(self) -> &'static str {
        match self {
            MergeField::MovieId => "movieId",
            MergeField::MovieName => "movieName",
            MergeField::MovieEnName => "movieEnName",
            MergeField::MovieImg => "movieImg",
            MergeField::Director => "director",
            MergeField::Category => "category",
            MergeField::ReleaseDate => "releaseDate",
            MergeField::BoxOffice => "boxOffice",
            MergeField::Duration => "duration",
            MergeField::Region => "region",
            MergeField::PlotSummary => "plotSummary",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name().eq_ignore_ascii_case(name))
    }

    /// 该字段的占位值，没有占位值的字段返回空串
    pub fn placeholder(self) -> &'static str {
        match self {
            MergeField::MovieName => placeholder::MOVIE_NAME,
            MergeField::Director => placeholder::DIRECTOR,
            MergeField::Category => placeholder::CATEGORY,
            MergeField::ReleaseDate => placeholder::RELEASE_DATE,
            MergeField::BoxOffice => placeholder::BOX_OFFICE,
            MergeField::Region => placeholder::REGION,
            MergeField::MovieId
            | MergeField::MovieEnName
            | MergeField::MovieImg
            | MergeField::Duration
            | MergeField::PlotSummary => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precedence {
    /// 副数据源非空时覆盖主数据源
    PreferSecondary,
    /// 主数据源为空或占位值时才使用副数据源
    PreferPrimary,
}

/// 逐字段的合并优先级
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergePolicy {
    prefer_primary: HashSet<MergeField>,
}

impl MergePolicy {
    pub fn prefer_primary(mut self, field: MergeField) -> Self {
        self.prefer_primary.insert(field);
        self
    }

    pub fn precedence(&self, field: MergeField) -> Precedence {
        if self.prefer_primary.contains(&field) {
            Precedence::PreferPrimary
        } else {
            Precedence::PreferSecondary
        }
    }

    fn pick(&self, field: MergeField, primary: String, secondary: Option<&str>) -> String {
        self.pick_optional(field, Some(primary), secondary)
            .unwrap_or_default()
    }

    fn pick_optional(
        &self,
        field: MergeField,
        primary: Option<String>,
        secondary: Option<&str>,
    ) -> Option<String> {
        let secondary = secondary.map(str::trim).filter(|v| !v.is_empty());
        match self.precedence(field) {
            Precedence::PreferSecondary => secondary.map(str::to_string).or(primary),
            Precedence::PreferPrimary => {
                let primary_missing = primary
                    .as_deref()
                    .map(|v| v.trim().is_empty() || v == field.placeholder())
                    .unwrap_or(true);
                if primary_missing {
                    secondary.map(str::to_string).or(primary)
                } else {
                    primary
                }
            }
        }
    }
}

/// 由 API 得到的副记录，字段都已规范化
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecondaryRecord {
    pub movie_id: Option<String>,
    pub movie_name: Option<String>,
    pub movie_en_name: Option<String>,
    pub movie_img: Option<String>,
    pub director: Option<String>,
    pub category: Option<String>,
    pub release_date: Option<String>,
    pub box_office: Option<String>,
    pub duration: Option<String>,
    pub region: Option<String>,
    pub plot_summary: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl SecondaryRecord {
    pub fn from_catalog(movie: CatalogMovie) -> Self {
        Self {
            movie_id: non_empty(movie.id),
            movie_name: non_empty(movie.nm),
            movie_en_name: non_empty(movie.enm),
            movie_img: non_empty(movie.img).map(|url| normalizer::format_image_url(&url)),
            director: None,
            category: non_empty(movie.cat),
            // rt 形如 "2019-07-26 08:00"，只取日期部分
            release_date: non_empty(movie.rt)
                .and_then(|rt| rt.split_whitespace().next().map(normalizer::normalize_date)),
            box_office: None,
            duration: movie.dur.and_then(normalizer::format_duration),
            region: non_empty(movie.src),
            plot_summary: non_empty(movie.dra),
        }
    }

    pub fn get(&self, field: MergeField) -> Option<&str> {
        let value = match field {
            MergeField::MovieId => &self.movie_id,
            MergeField::MovieName => &self.movie_name,
            MergeField::MovieEnName => &self.movie_en_name,
            MergeField::MovieImg => &self.movie_img,
            MergeField::Director => &self.director,
            MergeField::Category => &self.category,
            MergeField::ReleaseDate => &self.release_date,
            MergeField::BoxOffice => &self.box_office,
            MergeField::Duration => &self.duration,
            MergeField::Region => &self.region,
            MergeField::PlotSummary => &self.plot_summary,
        };
        value.as_deref()
    }
}

/// 合并结果，还没有来源信息
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRecord {
    pub basic: BasicInfo,
    pub rating: RatingInfo,
    pub plot: PlotInfo,
    pub has_data: bool,
}

impl MergedRecord {
    /// 顶层 movieId 始终是请求中的 id，`basic.movieId` 按合并策略取值
    pub fn into_record(self, movie_id: impl Into<String>, meta: RecordMeta) -> MovieRecord {
        MovieRecord {
            movie_id: movie_id.into(),
            basic: self.basic,
            rating: self.rating,
            cast_crew: CastCrewInfo::default(),
            plot: self.plot,
            awards: AwardsInfo::default(),
            has_data: self.has_data,
            meta,
        }
    }
}

/// 按策略合并主副记录
///
/// 副记录缺失时结果等于主记录，并在 `plot.error` 中标注
pub fn merge(policy: &MergePolicy, primary: PrimaryRecord, secondary: Option<&SecondaryRecord>) -> MergedRecord {
    let PrimaryRecord { basic: p, rating } = primary;

    let Some(s) = secondary else {
        let has_data = p.has_usable_name();
        return MergedRecord {
            basic: p,
            rating,
            plot: PlotInfo {
                summary: None,
                error: Some(placeholder::SECONDARY_MISSING.to_string()),
            },
            has_data,
        };
    };

    let basic = BasicInfo {
        movie_id: policy.pick(MergeField::MovieId, p.movie_id, s.get(MergeField::MovieId)),
        movie_name: policy.pick(MergeField::MovieName, p.movie_name, s.get(MergeField::MovieName)),
        movie_en_name: policy.pick(MergeField::MovieEnName, p.movie_en_name, s.get(MergeField::MovieEnName)),
        movie_img: policy.pick(MergeField::MovieImg, p.movie_img, s.get(MergeField::MovieImg)),
        director: policy.pick(MergeField::Director, p.director, s.get(MergeField::Director)),
        category: policy.pick(MergeField::Category, p.category, s.get(MergeField::Category)),
        release_date: policy.pick(MergeField::ReleaseDate, p.release_date, s.get(MergeField::ReleaseDate)),
        box_office: policy.pick(MergeField::BoxOffice, p.box_office, s.get(MergeField::BoxOffice)),
        duration: policy.pick_optional(MergeField::Duration, p.duration, s.get(MergeField::Duration)),
        region: policy.pick(MergeField::Region, p.region, s.get(MergeField::Region)),
    };

    let summary = policy.pick_optional(MergeField::PlotSummary, None, s.get(MergeField::PlotSummary));
    let has_data = basic.has_usable_name();

    MergedRecord {
        basic,
        rating,
        plot: PlotInfo { summary, error: None },
        has_data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn primary() -> PrimaryRecord {
        let mut basic = BasicInfo::unknown("1413252");
        basic.movie_name = "页面片名".to_string();
        basic.director = "郭帆".to_string();
        basic.box_office = "46.86亿".to_string();
        basic.region = "中国大陆".to_string();
        PrimaryRecord {
            basic,
            rating: RatingInfo {
                maoyan_rating: Some("9.4".to_string()),
                imdb_rating: None,
            },
        }
    }

    fn catalog() -> CatalogMovie {
        CatalogMovie {
            id: Some("1413252".to_string()),
            nm: Some("流浪地球2".to_string()),
            enm: Some("The Wandering Earth II".to_string()),
            img: Some("//p0.pipi.cn/poster.jpg".to_string()),
            cat: Some("科幻,冒险,灾难".to_string()),
            rt: Some("2023-01-22 08:00".to_string()),
            dur: Some(173),
            src: Some("".to_string()),
            dra: Some("太阳即将毁灭……".to_string()),
        }
    }

    #[test]
    fn test_secondary_overrides_non_empty_fields() {
        let secondary = SecondaryRecord::from_catalog(catalog());
        let merged = merge(&MergePolicy::default(), primary(), Some(&secondary));

        assert_eq!(merged.basic.movie_id, "1413252");
        assert_eq!(merged.basic.movie_name, "流浪地球2");
        assert_eq!(merged.basic.movie_en_name, "The Wandering Earth II");
        assert_eq!(merged.basic.movie_img, "https://p0.pipi.cn/poster.jpg");
        assert_eq!(merged.basic.category, "科幻,冒险,灾难");
        assert_eq!(merged.basic.release_date, "2023-01-22");
        assert_eq!(merged.basic.duration.as_deref(), Some("173分钟"));
        // API 没有的字段保留页面的值
        assert_eq!(merged.basic.director, "郭帆");
        assert_eq!(merged.basic.box_office, "46.86亿");
        // API 中为空串的字段不覆盖
        assert_eq!(merged.basic.region, "中国大陆");
        assert_eq!(merged.plot.summary.as_deref(), Some("太阳即将毁灭……"));
        assert!(merged.plot.error.is_none());
        assert_eq!(merged.rating.maoyan_rating.as_deref(), Some("9.4"));
        assert!(merged.has_data);
    }

    #[test]
    fn test_missing_secondary_keeps_primary() {
        let merged = merge(&MergePolicy::default(), primary(), None);
        assert_eq!(merged.basic, primary().basic);
        assert_eq!(merged.rating, primary().rating);
        assert_eq!(merged.plot.error.as_deref(), Some(placeholder::SECONDARY_MISSING));
        assert!(merged.plot.summary.is_none());
        assert!(merged.has_data);
    }

    #[test]
    fn test_secondary_rescues_unknown_name() {
        let mut page = primary();
        page.basic.movie_name = placeholder::MOVIE_NAME.to_string();
        let secondary = SecondaryRecord::from_catalog(catalog());

        let merged = merge(&MergePolicy::default(), page.clone(), Some(&secondary));
        assert!(merged.has_data);

        let without_api = merge(&MergePolicy::default(), page, None);
        assert!(!without_api.has_data);
    }

    #[test]
    fn test_prefer_primary_policy() {
        let policy = MergePolicy::default()
            .prefer_primary(MergeField::MovieName)
            .prefer_primary(MergeField::Category);
        let secondary = SecondaryRecord::from_catalog(catalog());
        let merged = merge(&policy, primary(), Some(&secondary));

        assert_eq!(merged.basic.movie_name, "页面片名");
        // 主数据源是占位值，仍然使用 API 的值
        assert_eq!(merged.basic.category, "科幻,冒险,灾难");
        assert_eq!(merged.basic.movie_en_name, "The Wandering Earth II");
    }

    #[test]
    fn test_request_id_and_api_id_differ() {
        let mut page = primary();
        page.basic.movie_id = "01413252".to_string();
        let movie: CatalogMovie =
            serde_json::from_value(serde_json::json!({ "id": 1413252, "nm": "流浪地球2" })).unwrap();
        let secondary = SecondaryRecord::from_catalog(movie);

        let record = merge(&MergePolicy::default(), page, Some(&secondary))
            .into_record("01413252", RecordMeta::fresh(1, vec![]));

        assert_eq!(record.basic.movie_id, "1413252");
        assert_eq!(record.movie_id, "01413252");
        assert_eq!(record.cast_crew, CastCrewInfo::default());
        assert_eq!(record.awards, AwardsInfo::default());
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in MergeField::ALL {
            assert_eq!(MergeField::from_name(field.name()), Some(field));
        }
        assert_eq!(MergeField::from_name("MOVIENAME"), Some(MergeField::MovieName));
        assert_eq!(MergeField::from_name("unknown"), None);
    }

    proptest! {
        #[test]
        fn prop_secondary_precedence(
            page_name in "[a-z]{0,6}",
            api_name in proptest::option::of("[a-z ]{0,6}"),
            page_region in "[a-z]{0,6}",
            api_region in proptest::option::of("[a-z ]{0,6}"),
        ) {
            let mut page = primary();
            page.basic.movie_name = page_name.clone();
            page.basic.region = page_region.clone();
            let secondary = SecondaryRecord {
                movie_name: api_name.clone(),
                region: api_region.clone(),
                ..SecondaryRecord::default()
            };

            let merged = merge(&MergePolicy::default(), page, Some(&secondary));

            let expect = |api: &Option<String>, page: &String| match api.as_deref().map(str::trim) {
                Some(v) if !v.is_empty() => v.to_string(),
                _ => page.clone(),
            };
            prop_assert_eq!(merged.basic.movie_name, expect(&api_name, &page_name));
            prop_assert_eq!(merged.basic.region, expect(&api_region, &page_region));
            prop_assert_eq!(merged.basic.movie_id, "1413252");
        }
    }
}
