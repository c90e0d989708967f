//! # gnodev - gno 包开发工具
//!
//! 将 `.gno` 源文件批量预编译为 Go 文件，并可选地用 gofmt 检查语法。
//!
//! ## 子命令
//! - `precompile` - 预编译文件或包目录 (`foo.gno` -> `foo.gno.gen.go`)
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/      (路径解析与批量执行)
//!   │     └── precompile/ (转换器与格式校验)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod precompile;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
