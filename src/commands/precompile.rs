//! # precompile 命令实现
//!
//! 将 .gno 文件预编译为 .gno.gen.go，并可选地用 gofmt 检查生成结果。
//!
//! ## 功能
//! - 接受多个文件或包目录参数
//! - 显式文件失败立即终止；目录中的失败汇总后报告数量
//! - `--skip-fmt` 跳过语法检查
//!
//! ## 依赖关系
//! - 使用 `cli/precompile.rs` 定义的参数
//! - 使用 `batch/`, `precompile/`
//! - 使用 `utils/output.rs`

use crate::batch::BatchRunner;
use crate::cli::precompile::PrecompileArgs;
use crate::error::{GnodevError, Result};
use crate::precompile::{ExternalFormatter, Precompiler};
use crate::utils::output;

const USAGE: &str = "usage: gnodev precompile [flags] <file-or-package>...";

/// 执行 precompile 命令
pub fn execute(args: PrecompileArgs) -> Result<()> {
    // 无参数时在访问文件系统之前报错
    if args.paths.is_empty() {
        return Err(GnodevError::Usage(USAGE.to_string()));
    }

    let options = args.options();
    if options.verbose {
        let gofmt = if options.skip_fmt {
            "skipped"
        } else {
            options.gofmt_binary.as_str()
        };
        output::print_info(&format!(
            "go binary: {}, gofmt: {}",
            options.go_binary, gofmt
        ));
    }

    let runner = BatchRunner::new(&options, &Precompiler, &ExternalFormatter).with_progress();
    let batch = runner.run(&args.paths)?;

    output::print_done(&format!("Precompiled {} file(s)", batch.success));

    Ok(())
}
