//! # 批量执行器
//!
//! 顺序执行单文件预编译流水线，隔离并统计失败。
//!
//! ## 功能
//! - 单文件流水线：读取 -> 转换 -> 写入 -> （可选）格式校验
//! - 显式文件失败立即终止整个调用
//! - 目录中发现的文件失败时打印诊断、计数并继续
//! - spinner 显示当前文件
//!
//! ## 依赖关系
//! - 被 `commands/precompile.rs` 调用
//! - 使用 `batch/collector.rs` 解析路径
//! - 使用 `precompile/` 的 `Transform` / `Verify`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use super::collector::{Candidate, Origin, PathResolver, Resolved};
use crate::error::{GnodevError, Result};
use crate::precompile::{self, Transform, Verify};
use crate::utils::{output, progress};

use indicatif::ProgressBar;
use std::fs;
use std::path::{Path, PathBuf};

/// 流水线配置，单次调用内只读
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// 每处理一个文件打印其路径
    pub verbose: bool,
    /// 跳过生成文件的格式校验
    pub skip_fmt: bool,
    /// go 可执行文件（转换在进程内完成，仅作展示）
    pub go_binary: String,
    /// 用于语法检查的 gofmt 可执行文件
    pub gofmt_binary: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions {
            verbose: false,
            skip_fmt: false,
            go_binary: "go".to_string(),
            gofmt_binary: "gofmt".to_string(),
        }
    }
}

/// 单个文件处理结果，合并后即丢弃
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessResult {
    /// 处理成功
    Success,
    /// 处理失败（诊断已打印）
    Failed,
}

/// 批量处理结果统计
#[derive(Debug, Default)]
pub struct BatchResult {
    /// 成功数量
    pub success: usize,
    /// 失败数量
    pub failed: usize,
}

impl BatchResult {
    /// 合并处理结果
    pub fn merge(&mut self, result: ProcessResult) {
        match result {
            ProcessResult::Success => self.success += 1,
            ProcessResult::Failed => self.failed += 1,
        }
    }
}

/// 批量执行器
pub struct BatchRunner<'a> {
    options: &'a PipelineOptions,
    resolver: PathResolver,
    transform: &'a dyn Transform,
    verify: &'a dyn Verify,
    progress: ProgressBar,
}

impl<'a> BatchRunner<'a> {
    /// 创建新的批量执行器
    pub fn new(
        options: &'a PipelineOptions,
        transform: &'a dyn Transform,
        verify: &'a dyn Verify,
    ) -> Self {
        Self {
            options,
            resolver: PathResolver::new(),
            transform,
            verify,
            progress: ProgressBar::hidden(),
        }
    }

    /// 启用 spinner
    pub fn with_progress(mut self) -> Self {
        self.progress = progress::create_spinner("Precompiling");
        self
    }

    /// 按参数顺序处理所有路径
    ///
    /// 目录中出现失败时返回 `ErrorCount`，否则返回统计结果。
    pub fn run(&self, args: &[PathBuf]) -> Result<BatchResult> {
        let result = self.run_args(args);
        self.progress.finish_and_clear();

        let batch = result?;
        if batch.failed > 0 {
            return Err(GnodevError::ErrorCount(batch.failed));
        }
        Ok(batch)
    }

    fn run_args(&self, args: &[PathBuf]) -> Result<BatchResult> {
        let mut batch = BatchResult::default();

        for arg in args {
            match self.resolver.resolve(arg)? {
                Resolved::File(candidate) => batch.merge(self.run_candidate(&candidate)?),
                Resolved::Directory(walk) => self.run_walk(walk, &mut batch)?,
            }
        }

        Ok(batch)
    }

    /// 处理目录遍历序列；遍历出错时立即终止，不计入失败数
    fn run_walk<I>(&self, walk: I, batch: &mut BatchResult) -> Result<()>
    where
        I: IntoIterator<Item = Result<Candidate>>,
    {
        for candidate in walk {
            batch.merge(self.run_candidate(&candidate?)?);
        }
        Ok(())
    }

    /// 按候选文件来源选择失败处理方式
    fn run_candidate(&self, candidate: &Candidate) -> Result<ProcessResult> {
        self.progress.set_message(candidate.path.display().to_string());

        let err = match self.process_one(&candidate.path) {
            Ok(_) => return Ok(ProcessResult::Success),
            Err(e) => GnodevError::precompile(&candidate.path, e),
        };

        match candidate.origin {
            Origin::ExplicitFile => Err(err),
            Origin::DiscoveredInDirectory => {
                self.progress.suspend(|| output::print_error(&err.to_string()));
                Ok(ProcessResult::Failed)
            }
        }
    }

    /// 单文件流水线，成功时返回生成文件路径
    pub fn process_one(&self, path: &Path) -> Result<PathBuf> {
        if self.options.verbose {
            self.progress.suspend(|| output::print_path(path));
        }

        let source =
            fs::read_to_string(path).map_err(|e| GnodevError::FileReadError { source: e })?;

        let transformed = self
            .transform
            .transform(path, &source)
            .map_err(|e| GnodevError::Transform {
                source: Box::new(e),
            })?;

        let target = precompile::target_path(path);
        fs::write(&target, transformed).map_err(|e| GnodevError::FileWriteError {
            path: target.display().to_string(),
            source: e,
        })?;

        if !self.options.skip_fmt {
            self.verify
                .verify(&target, &self.options.gofmt_binary)
                .map_err(|e| GnodevError::Check {
                    source: Box::new(e),
                })?;
        }

        Ok(target)
    }
}
