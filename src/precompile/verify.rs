//! # 外部格式化工具校验
//!
//! 调用 `gofmt -l -e <file>` 检查生成的 Go 文件语法。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 通过 `Verify` trait 调用
//! - 使用 `std::process::Command` 阻塞执行外部命令

use super::Verify;
use crate::error::{GnodevError, Result};

use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

/// 基于外部进程的格式校验器
#[derive(Debug, Default, Clone, Copy)]
pub struct ExternalFormatter;

impl Verify for ExternalFormatter {
    fn verify(&self, path: &Path, formatter: &str) -> Result<()> {
        // 允许 "gofmt -s" 这类带参数的写法
        let mut words = formatter.split_whitespace();
        let program = words.next().ok_or_else(|| GnodevError::CommandNotFound {
            command: formatter.to_string(),
        })?;

        let output = Command::new(program)
            .args(words)
            .args(["-l", "-e"])
            .arg(path)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => GnodevError::CommandNotFound {
                    command: program.to_string(),
                },
                _ => GnodevError::CommandFailed {
                    command: formatter.to_string(),
                    stderr: e.to_string(),
                },
            })?;

        if output.status.success() {
            return Ok(());
        }

        let mut stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            if !stderr.is_empty() {
                stderr.push('\n');
            }
            stderr.push_str(stdout.trim());
        }
        if stderr.is_empty() {
            stderr = output.status.to_string();
        }

        Err(GnodevError::CommandFailed {
            command: formatter.to_string(),
            stderr,
        })
    }
}
