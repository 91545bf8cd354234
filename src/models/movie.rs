use chrono::{Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// 字段无法解析时使用的占位值
pub mod placeholder {
    pub const MOVIE_NAME: &str = "未知电影";
    pub const DIRECTOR: &str = "未知";
    pub const CATEGORY: &str = "未知类型";
    pub const RELEASE_DATE: &str = "未知日期";
    pub const BOX_OFFICE: &str = "未找到票房数据";
    pub const REGION: &str = "未知地区";
    /// 副数据源（API）缺失时写入 plot.error 的说明
    pub const SECONDARY_MISSING: &str = "API数据获取失败";
    pub const CAST_CREW_NOTE: &str = "受数据源限制，演员详细信息暂不可用";
    pub const AWARDS_NOTE: &str = "受数据源限制，奖项信息暂不可用";
    pub const SOURCE_LIMITATION: &str = "已测试多个API接口，均返回404错误";
}

/// 合并后的完整电影记录，也是缓存中保存的内容
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecord {
    pub movie_id: String,
    pub basic: BasicInfo,
    pub rating: RatingInfo,
    #[serde(default)]
    pub cast_crew: CastCrewInfo,
    pub plot: PlotInfo,
    #[serde(default)]
    pub awards: AwardsInfo,
    pub has_data: bool,
    #[serde(rename = "_meta")]
    pub meta: RecordMeta,
}

/// 基础信息
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BasicInfo {
    pub movie_id: String,
    pub movie_name: String,
    pub movie_en_name: String,
    pub movie_img: String,
    pub director: String,
    pub category: String,
    pub release_date: String,
    pub box_office: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    pub region: String,
}

impl BasicInfo {
    /// 全部字段都是占位值的基础信息
    pub fn unknown(movie_id: impl Into<String>) -> Self {
        Self {
            movie_id: movie_id.into(),
            movie_name: placeholder::MOVIE_NAME.to_string(),
            movie_en_name: String::new(),
            movie_img: String::new(),
            director: placeholder::DIRECTOR.to_string(),
            category: placeholder::CATEGORY.to_string(),
            release_date: placeholder::RELEASE_DATE.to_string(),
            box_office: placeholder::BOX_OFFICE.to_string(),
            duration: None,
            region: placeholder::REGION.to_string(),
        }
    }

    /// 片名是否可用（非空且不是占位值）
    pub fn has_usable_name(&self) -> bool {
        let name = self.movie_name.trim();
        !name.is_empty() && name != placeholder::MOVIE_NAME
    }
}

/// 评分，只来自票房页面
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RatingInfo {
    #[serde(rename = "MaoYanRating")]
    pub maoyan_rating: Option<String>,
    #[serde(rename = "IMDBRating")]
    pub imdb_rating: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlotInfo {
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 演职员，两个数据源都拿不到，只给出说明
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastCrewInfo {
    pub actors: Vec<String>,
    pub note: String,
    pub limitation: String,
}

impl Default for CastCrewInfo {
    fn default() -> Self {
        Self {
            actors: Vec::new(),
            note: placeholder::CAST_CREW_NOTE.to_string(),
            limitation: placeholder::SOURCE_LIMITATION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AwardsInfo {
    pub list: Vec<String>,
    pub note: String,
    pub limitation: String,
}

impl Default for AwardsInfo {
    fn default() -> Self {
        Self {
            list: Vec::new(),
            note: placeholder::AWARDS_NOTE.to_string(),
            limitation: placeholder::SOURCE_LIMITATION.to_string(),
        }
    }
}

/// 来源信息，不参与记录本身的身份
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordMeta {
    pub request_time: String,
    pub data_type: String,
    pub version: String,
    pub from_cache: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_time: Option<String>,
    /// 毫秒
    pub processing_time: u64,
    pub data_sources: Vec<String>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_error: Option<String>,
}

impl RecordMeta {
    pub fn fresh(processing_time: u64, data_sources: Vec<String>) -> Self {
        Self {
            request_time: utc8_timestamp(),
            data_type: "complete".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            from_cache: false,
            cache_time: None,
            processing_time,
            data_sources,
            success: true,
            secondary_error: None,
        }
    }

    /// 缓存命中时刷新来源字段
    pub fn mark_cached(&mut self) {
        self.from_cache = true;
        self.cache_time = Some(utc_timestamp());
    }
}

/// 请求失败时返回的记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    pub success: bool,
    pub error: String,
    pub movie_id: String,
    pub has_data: bool,
    pub timestamp: String,
    pub version: String,
}

impl ErrorRecord {
    pub fn new(movie_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            movie_id: movie_id.into(),
            has_data: false,
            timestamp: utc_timestamp(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// 北京时间，格式 `2024-03-08T20:15:00.123 UTC+8`
pub fn utc8_timestamp() -> String {
    (Utc::now() + Duration::hours(8))
        .format("%Y-%m-%dT%H:%M:%S%.3f UTC+8")
        .to_string()
}

pub fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
