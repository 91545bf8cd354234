use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 猫眼影片 API（mmdb/movie/v3）响应
///
/// 只声明用得到的字段，其余字段忽略
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogResponse {
    #[serde(default)]
    pub data: Option<CatalogData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogData {
    #[serde(default)]
    pub movie: Option<CatalogMovie>,
}

/// API 中的影片对象，字段名沿用接口的缩写
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogMovie {
    /// 影片 ID，接口有时给数字有时给字符串
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    /// 中文片名
    pub nm: Option<String>,
    /// 英文片名
    pub enm: Option<String>,
    /// 海报
    pub img: Option<String>,
    /// 类型，逗号分隔
    pub cat: Option<String>,
    /// 上映时间，形如 "2019-07-26 08:00"
    pub rt: Option<String>,
    /// 时长（分钟）
    #[serde(default, deserialize_with = "lenient_minutes")]
    pub dur: Option<u32>,
    /// 制片地区
    pub src: Option<String>,
    /// 剧情简介
    pub dra: Option<String>,
}

// 数字或非空字符串都接受，其它类型当作缺失
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    })
}

fn lenient_minutes<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

impl CatalogResponse {
    /// 取出影片对象，没有 `data.movie` 时返回 None
    pub fn into_movie(self) -> Option<CatalogMovie> {
        self.data.and_then(|data| data.movie)
    }
}
