// 字段规范化：日期、票房、图片地址、时长

use chrono::NaiveDate;
use regex::{Captures, Regex};

use crate::models::placeholder;

/// 站内相对图片地址补全时使用的站点
pub const IMAGE_ORIGIN: &str = "https://piaofang.maoyan.com";

lazy_static::lazy_static! {
    static ref ISO_DATE: Regex = Regex::new(r"([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})")
        .expect("日期正则表达式编译失败");
    static ref SLASH_DATE: Regex = Regex::new(r"([0-9]{4})/([0-9]{1,2})/([0-9]{1,2})")
        .expect("日期正则表达式编译失败");
    static ref CN_DATE: Regex = Regex::new(r"([0-9]{4})年([0-9]{1,2})月([0-9]{1,2})日")
        .expect("日期正则表达式编译失败");
    static ref EN_DATE: Regex = Regex::new(
        r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+([0-9]{1,2}),?\s+([0-9]{4})"
    )
    .expect("日期正则表达式编译失败");
    static ref AMOUNT_IN_TEXT: Regex = Regex::new(
        r"([0-9][0-9,，]*(?:\.[0-9]+)?)\s*((?:万|亿)元?|元)"
    )
    .expect("票房正则表达式编译失败");
}

/// 日期统一为 `YYYY-MM-DD`
///
/// 支持 `2023-05-20`、`2023/05/20`、`2023年5月20日`、`March 8, 2024`。
/// 无法识别或日历上不存在的日期原样返回，空输入返回占位值。
pub fn normalize_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return placeholder::RELEASE_DATE.to_string();
    }

    let numeric = [&*ISO_DATE, &*SLASH_DATE, &*CN_DATE]
        .into_iter()
        .find_map(|re| re.captures(raw))
        .map(|caps| (number(&caps, 1), number(&caps, 2), number(&caps, 3)));

    let parts = numeric.or_else(|| {
        EN_DATE.captures(raw).map(|caps| {
            let month = caps.get(1).and_then(|m| month_number(m.as_str()));
            (number(&caps, 3), month, number(&caps, 2))
        })
    });

    match parts {
        Some((Some(year), Some(month), Some(day))) => iso_date(year, month, day).unwrap_or_else(|| raw.to_string()),
        _ => raw.to_string(),
    }
}

fn number(caps: &Captures<'_>, index: usize) -> Option<u32> {
    caps.get(index)?.as_str().parse().ok()
}

fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_ascii_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn iso_date(year: u32, month: u32, day: u32) -> Option<String> {
    let year = i32::try_from(year).ok()?;
    NaiveDate::from_ymd_opt(year, month, day).map(|d| d.format("%Y-%m-%d").to_string())
}

/// 数值 + 单位拼成票房展示字符串，去掉千分位分隔符
///
/// 数值中没有数字或单位为空时返回 None
pub fn format_box_office(value: &str, unit: &str) -> Option<String> {
    let value: String = value
        .chars()
        .filter(|c| !matches!(c, ',' | '，') && !c.is_whitespace())
        .collect();
    let unit = unit.trim();
    if unit.is_empty() || !value.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(format!("{}{}", value, unit))
}

/// 在一段文本中找 “数值 + 万/亿/元” 并规范化
pub fn format_box_office_text(text: &str) -> Option<String> {
    let caps = AMOUNT_IN_TEXT.captures(text)?;
    format_box_office(caps.get(1)?.as_str(), caps.get(2)?.as_str())
}

/// 未取到票房时使用占位值
pub fn box_office_or_placeholder(value: Option<String>) -> String {
    value.unwrap_or_else(|| placeholder::BOX_OFFICE.to_string())
}

/// 补全图片地址
///
/// `//host/a.jpg` 补 `https:`，`/a.jpg` 补站点前缀，绝对地址原样返回
pub fn format_image_url(url: &str) -> String {
    let url = url.trim();
    if url.is_empty() {
        String::new()
    } else if url.starts_with("//") {
        format!("https:{}", url)
    } else if url.starts_with('/') {
        format!("{}{}", IMAGE_ORIGIN, url)
    } else {
        url.to_string()
    }
}

/// API 时长（分钟）转展示字符串，0 视为缺失
pub fn format_duration(minutes: u32) -> Option<String> {
    (minutes > 0).then(|| format!("{}分钟", minutes))
}
