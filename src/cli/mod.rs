//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `precompile`: 将 `.gno` 文件预编译为 `.gno.gen.go`
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: precompile

pub mod precompile;

use clap::{Parser, Subcommand};

/// gnodev - gno 包开发工具
#[derive(Parser)]
#[command(name = "gnodev")]
#[command(version)]
#[command(about = "Development toolkit for gno packages", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Precompile .gno files (or packages) into .gno.gen.go files
    Precompile(precompile::PrecompileArgs),
}
