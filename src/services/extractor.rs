//! 有序正则规则提取器
//!
//! 每个字段对应一组按优先级排列的 `(正则, 捕获方式)` 规则。
//! 靠前的规则匹配更具体、更可靠的页面结构，靠后的是宽松的兜底。
//! 没有任何规则命中只代表缺少数据，不是错误。

use regex::{Captures, Regex};

use super::normalizer;

/// 从一次匹配中取值的方式
#[derive(Clone, Copy)]
pub enum Capture {
    /// 取指定捕获组
    Group(usize),
    /// 数值组 + 单位组，拼成票房展示字符串
    Amount { value: usize, unit: usize },
    /// 自定义取值函数
    Custom(fn(&Captures<'_>) -> Option<String>),
}

impl Capture {
    fn take(&self, caps: &Captures<'_>) -> Option<String> {
        match *self {
            Capture::Group(index) => caps.get(index).map(|m| m.as_str().to_string()),
            Capture::Amount { value, unit } => {
                let value = caps.get(value)?.as_str();
                let unit = caps.get(unit)?.as_str();
                normalizer::format_box_office(value, unit)
            }
            Capture::Custom(f) => f(caps),
        }
    }
}

/// 单条提取规则
pub struct Rule {
    name: &'static str,
    regex: Regex,
    capture: Capture,
}

impl Rule {
    pub fn new(name: &'static str, pattern: &str, capture: Capture) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            regex: Regex::new(pattern)?,
            capture,
        })
    }

    /// 取第一个捕获组的规则
    pub fn first_group(name: &'static str, pattern: &str) -> Result<Self, regex::Error> {
        Self::new(name, pattern, Capture::Group(1))
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 规则命中且取到非空值时返回去掉首尾空白的值
    pub fn apply(&self, text: &str) -> Option<String> {
        let caps = self.regex.captures(text)?;
        let value = self.capture.take(&caps)?;
        let value = value.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("pattern", &self.regex.as_str())
            .finish()
    }
}

/// 提取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    Found { rule: &'static str, value: String },
    NotFound,
}

impl Extracted {
    pub fn is_found(&self) -> bool {
        matches!(self, Extracted::Found { .. })
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Extracted::Found { value, .. } => Some(value),
            Extracted::NotFound => None,
        }
    }

    pub fn into_option(self) -> Option<String> {
        match self {
            Extracted::Found { value, .. } => Some(value),
            Extracted::NotFound => None,
        }
    }

    /// 未命中时使用占位值
    pub fn or_placeholder(self, placeholder: &str) -> String {
        self.into_option().unwrap_or_else(|| placeholder.to_string())
    }
}

/// 某个字段的有序规则列表
#[derive(Debug)]
pub struct RuleSet {
    field: &'static str,
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(field: &'static str, rules: Vec<Rule>) -> Self {
        Self { field, rules }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// 按顺序尝试每条规则，返回第一个命中的结果
    pub fn extract(&self, text: &str) -> Extracted {
        for rule in &self.rules {
            if let Some(value) = rule.apply(text) {
                tracing::trace!("{} matched by rule {}", self.field, rule.name);
                return Extracted::Found {
                    rule: rule.name,
                    value,
                };
            }
        }
        tracing::trace!("{} not found ({} rules tried)", self.field, self.rules.len());
        Extracted::NotFound
    }
}
