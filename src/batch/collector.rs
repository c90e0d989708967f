//! # 路径解析器
//!
//! 将命令行参数解析为待预编译的候选文件序列，不读取文件内容。
//!
//! ## 功能
//! - 区分单文件和目录参数
//! - 显式指定的文件不做扩展名过滤
//! - 目录参数递归遍历，按扩展名惰性产出候选文件
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 调用
//! - 使用 `walkdir` 遍历目录

use crate::error::{GnodevError, Result};
use crate::precompile::SOURCE_EXT;

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// 候选文件的来源，决定失败时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// 命令行显式指定的文件：失败立即终止
    ExplicitFile,
    /// 遍历目录得到的文件：失败计数后继续
    DiscoveredInDirectory,
}

/// 候选文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub origin: Origin,
}

/// 参数类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Directory,
}

/// 单个参数的解析结果
pub enum Resolved {
    File(Candidate),
    Directory(DirectoryWalk),
}

/// 路径解析器
pub struct PathResolver {
    /// 可识别的源文件扩展名
    extension: String,
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PathResolver {
    /// 创建新的路径解析器（默认识别 `.gno`）
    pub fn new() -> Self {
        Self {
            extension: SOURCE_EXT.to_string(),
        }
    }

    /// 判断参数是文件还是目录
    pub fn classify(&self, arg: &Path) -> Result<PathKind> {
        let meta = fs::metadata(arg).map_err(|e| GnodevError::InvalidPath {
            path: arg.display().to_string(),
            source: e,
        })?;

        Ok(if meta.is_dir() {
            PathKind::Directory
        } else {
            PathKind::File
        })
    }

    /// 显式文件参数本身即唯一候选
    pub fn resolve_file(&self, arg: &Path) -> Candidate {
        Candidate {
            path: arg.to_path_buf(),
            origin: Origin::ExplicitFile,
        }
    }

    /// 递归遍历目录，惰性产出匹配扩展名的普通文件
    pub fn resolve_directory(&self, root: &Path) -> DirectoryWalk {
        DirectoryWalk {
            root: root.display().to_string(),
            extension: self.extension.clone(),
            walker: WalkDir::new(root).sort_by_file_name().into_iter(),
        }
    }

    /// 解析单个参数
    pub fn resolve(&self, arg: &Path) -> Result<Resolved> {
        Ok(match self.classify(arg)? {
            PathKind::File => Resolved::File(self.resolve_file(arg)),
            PathKind::Directory => Resolved::Directory(self.resolve_directory(arg)),
        })
    }
}

/// 目录遍历产生的候选文件序列（单次遍历，不可重启）
pub struct DirectoryWalk {
    root: String,
    extension: String,
    walker: walkdir::IntoIter,
}

impl Iterator for DirectoryWalk {
    type Item = Result<Candidate>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    return Some(Err(GnodevError::WalkDir {
                        root: self.root.clone(),
                        source: e,
                    }))
                }
            };

            if is_source_file(&entry, &self.extension) {
                return Some(Ok(Candidate {
                    path: entry.into_path(),
                    origin: Origin::DiscoveredInDirectory,
                }));
            }
        }
    }
}

/// 是否为匹配扩展名的普通文件
pub fn is_source_file(entry: &DirEntry, extension: &str) -> bool {
    entry.file_type().is_file()
        && entry
            .file_name()
            .as_encoded_bytes()
            .ends_with(extension.as_bytes())
}
