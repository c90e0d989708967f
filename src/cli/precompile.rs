//! # precompile 子命令 CLI 定义
//!
//! 预编译 .gno 文件或包目录
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/precompile.rs`

use crate::batch::PipelineOptions;
use clap::Args;
use std::path::PathBuf;

/// precompile 子命令参数
#[derive(Args, Debug)]
pub struct PrecompileArgs {
    /// Files or package directories to precompile
    #[arg(value_name = "PATHS")]
    pub paths: Vec<PathBuf>,

    /// Print each file as it is processed
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Do not check syntax of generated .go files
    #[arg(long, default_value_t = false)]
    pub skip_fmt: bool,

    /// Go binary to use for building
    #[arg(long, env = "GNODEV_GO_BINARY", default_value = "go")]
    pub go_binary: String,

    /// Gofmt binary to use for syntax checking
    #[arg(long, env = "GNODEV_GOFMT_BINARY", default_value = "gofmt")]
    pub gofmt_binary: String,
}

impl PrecompileArgs {
    /// 转换为流水线配置
    pub fn options(&self) -> PipelineOptions {
        PipelineOptions {
            verbose: self.verbose,
            skip_fmt: self.skip_fmt,
            go_binary: self.go_binary.clone(),
            gofmt_binary: self.gofmt_binary.clone(),
        }
    }
}
