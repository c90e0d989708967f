//! # 预编译模块
//!
//! 定义单文件流水线依赖的两个外部能力：源码转换与格式校验。
//!
//! ## 功能
//! - `Transform`: `.gno` 源码 -> Go 源码
//! - `Verify`: 调用外部格式化工具检查生成文件
//! - 生成文件路径约定 (`foo.gno` -> `foo.gno.gen.go`)
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 使用
//! - 子模块: transform, verify

pub mod transform;
pub mod verify;

pub use transform::Precompiler;
pub use verify::ExternalFormatter;

use crate::error::Result;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// 可识别的源文件扩展名
pub const SOURCE_EXT: &str = ".gno";

/// 生成文件后缀（固定约定，不可配置）
pub const GENERATED_SUFFIX: &str = ".gno.gen.go";

/// 源码转换能力
pub trait Transform {
    /// 将源码文本转换为生成代码
    ///
    /// `path` 仅作为提示（如识别测试文件），实现不应重新读取文件。
    fn transform(&self, path: &Path, source: &str) -> Result<String>;
}

/// 生成文件校验能力
pub trait Verify {
    /// 使用 `formatter` 检查 `path` 处文件的语法
    fn verify(&self, path: &Path, formatter: &str) -> Result<()>;
}

/// 计算生成文件路径
///
/// 以 `.gno` 结尾时替换为 `.gno.gen.go`，否则直接追加后缀。
/// 按字节比较，非 UTF-8 文件名同样适用。
pub fn target_path(src: &Path) -> PathBuf {
    let bytes = src.as_os_str().as_encoded_bytes();
    let stem = bytes.strip_suffix(SOURCE_EXT.as_bytes()).unwrap_or(bytes);

    let mut target = Vec::with_capacity(stem.len() + GENERATED_SUFFIX.len());
    target.extend_from_slice(stem);
    target.extend_from_slice(GENERATED_SUFFIX.as_bytes());

    // SAFETY: `stem` 来自合法的 OsStr，只在 ASCII 后缀处切开，再拼接 ASCII 文本
    PathBuf::from(unsafe { OsString::from_encoded_bytes_unchecked(target) })
}
