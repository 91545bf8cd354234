// 猫眼电影票房查询服务
//
// 本库提供服务的核心功能，包括：
// - API 路由
// - 票房页面规则提取与字段规范化
// - 主副数据源合并
// - 缓存闸门

pub mod api;
pub mod config;
pub mod external;
pub mod models;
pub mod services;
