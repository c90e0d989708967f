//! # 批量处理模块
//!
//! 提供统一的文件批量预编译能力。
//!
//! ## 功能
//! - 自动检测输入类型（文件/目录）
//! - 递归收集 `.gno` 文件
//! - 顺序处理，按来源区分失败策略
//! - 进度反馈与失败统计
//!
//! ## 依赖关系
//! - 被 `commands/precompile.rs` 使用
//! - 使用 `walkdir` 遍历目录
//! - 使用 `indicatif` 显示进度

pub mod collector;
pub mod runner;

pub use runner::{BatchRunner, PipelineOptions};
