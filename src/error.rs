//! # 统一错误处理模块
//!
//! 定义 gnodev 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// gnodev 统一错误类型
#[derive(Error, Debug)]
pub enum GnodevError {
    // ─────────────────────────────────────────────────────────────
    // 参数 / 路径错误（立即终止整个调用）
    // ─────────────────────────────────────────────────────────────
    #[error("invalid args: {0}")]
    Usage(String),

    #[error("invalid file or package path: {path}: {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{root}: walk dir: {source}")]
    WalkDir {
        root: String,
        #[source]
        source: walkdir::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 单文件流水线各阶段
    // ─────────────────────────────────────────────────────────────
    #[error("read: {source}")]
    FileReadError {
        #[source]
        source: std::io::Error,
    },

    #[error("transform: {source}")]
    Transform {
        #[source]
        source: Box<GnodevError>,
    },

    #[error("write .go file: {path}: {source}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("check .go file: {source}")]
    Check {
        #[source]
        source: Box<GnodevError>,
    },

    // ─────────────────────────────────────────────────────────────
    // 预编译错误
    // ─────────────────────────────────────────────────────────────
    #[error("parse: {line}: {reason}")]
    ParseError { line: usize, reason: String },

    #[error("import \"{import}\" is not in the whitelist")]
    ImportNotAllowed { import: String },

    // ─────────────────────────────────────────────────────────────
    // 外部命令错误
    // ─────────────────────────────────────────────────────────────
    #[error("external command '{command}' not found in PATH")]
    CommandNotFound { command: String },

    #[error("{command}: {stderr}")]
    CommandFailed { command: String, stderr: String },

    // ─────────────────────────────────────────────────────────────
    // 汇总
    // ─────────────────────────────────────────────────────────────
    #[error("{path}: precompile: {source}")]
    Precompile {
        path: String,
        #[source]
        source: Box<GnodevError>,
    },

    #[error("{0} precompile errors")]
    ErrorCount(usize),
}

impl GnodevError {
    /// 以文件路径包装单文件流水线错误
    pub fn precompile(path: &std::path::Path, source: GnodevError) -> Self {
        GnodevError::Precompile {
            path: path.display().to_string(),
            source: Box::new(source),
        }
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, GnodevError>;
