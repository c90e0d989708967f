//! # gno -> Go 预编译器
//!
//! 进程内实现的源码转换。不理解 Go 语义，只做两件事：
//! - 浅层词法检查（package 声明、括号配对、字面量与注释闭合）
//! - 改写 import 段中的包路径，并检查白名单
//!
//! 输出为输入的纯函数，重复执行结果逐字节一致。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 通过 `Transform` trait 调用
//! - 使用 `regex` 匹配 import 语句

use super::Transform;
use crate::error::{GnodevError, Result};

use regex::Regex;
use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;
use std::sync::LazyLock;

const GENERATED_HEADER: &str = "// Code generated by github.com/gnolang/gno. DO NOT EDIT.\n\n//go:build gno\n// +build gno\n\n";

const GNO_STD_PKG: &str = "std";
const GNO_STD_PKG_AFTER: &str = "github.com/gnolang/gno/stdlibs/stdshim";
const GNO_REALM_PREFIX: &str = "gno.land/r/";
const GNO_REALM_PREFIX_AFTER: &str = "github.com/gnolang/gno/examples/gno.land/r/";
const GNO_PACKAGE_PREFIX: &str = "gno.land/p/";
const GNO_PACKAGE_PREFIX_AFTER: &str = "github.com/gnolang/gno/examples/gno.land/p/";

const IMPORT_PREFIX_WHITELIST: &[&str] = &["github.com/gnolang/gno/_test"];

const STDLIB_WHITELIST: &[&str] = &[
    "bufio",
    "bytes",
    "compress/gzip",
    "context",
    "crypto/md5",
    "crypto/sha1",
    "encoding/binary",
    "encoding/base64",
    "encoding/json",
    "encoding/xml",
    "errors",
    "flag",
    "fmt",
    "io",
    "io/util",
    "math",
    "math/big",
    "math/rand",
    "regexp",
    "sort",
    "strconv",
    "strings",
    "text/template",
    "time",
    "unicode/utf8",
    "internal/os_test",
    "std",
];

static IMPORT_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*import\b").expect("valid import regex"));

static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"\\]*)""#).expect("valid quoted regex"));

static IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}_][\p{L}\p{Nd}_]*$").expect("valid ident regex"));

/// gno 预编译器
#[derive(Debug, Default, Clone, Copy)]
pub struct Precompiler;

impl Transform for Precompiler {
    fn transform(&self, path: &Path, source: &str) -> Result<String> {
        check_syntax(source)?;

        // 测试文件允许导入任意包
        let check_whitelist = !is_test_file(path);
        let body = rewrite_imports(source, check_whitelist)?;

        Ok(format!("{}{}", GENERATED_HEADER, body))
    }
}

/// 是否为测试文件 (`_test.gno` / `_filetest.gno`)
fn is_test_file(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.as_encoded_bytes())
        .is_some_and(|n| n.ends_with(b"_test.gno") || n.ends_with(b"_filetest.gno"))
}

fn parse_error(line: usize, reason: impl Into<String>) -> GnodevError {
    GnodevError::ParseError {
        line,
        reason: reason.into(),
    }
}

// ─────────────────────────────────────────────────────────────
// 词法检查
// ─────────────────────────────────────────────────────────────

fn closing(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

/// 检查 package 声明、括号配对以及字面量和注释是否闭合
fn check_syntax(source: &str) -> Result<()> {
    let mut chars = source.chars().peekable();
    let mut line = 1;
    let mut stack: Vec<(char, usize)> = Vec::new();
    // 去掉注释、字面量替换为空格后的代码文本
    let mut code = String::with_capacity(source.len());
    let mut first_line = None;

    while let Some(c) = chars.next() {
        if c == '/' && chars.peek() == Some(&'/') {
            while chars.peek().is_some_and(|&n| n != '\n') {
                chars.next();
            }
            continue;
        }
        if c == '/' && chars.peek() == Some(&'*') {
            chars.next();
            let start = line;
            let mut closed = false;
            while let Some(n) = chars.next() {
                if n == '\n' {
                    line += 1;
                    code.push('\n');
                } else if n == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    closed = true;
                    break;
                }
            }
            if !closed {
                return Err(parse_error(start, "comment not terminated"));
            }
            code.push(' ');
            continue;
        }

        if c == '\n' {
            line += 1;
            code.push('\n');
            continue;
        }
        if !c.is_whitespace() {
            first_line.get_or_insert(line);
        }

        match c {
            '"' => {
                skip_quoted(&mut chars, '"', line, "string literal not terminated")?;
                code.push(' ');
            }
            '\'' => {
                skip_quoted(&mut chars, '\'', line, "rune literal not terminated")?;
                code.push(' ');
            }
            '`' => {
                let start = line;
                let mut closed = false;
                for n in chars.by_ref() {
                    if n == '\n' {
                        line += 1;
                        code.push('\n');
                    } else if n == '`' {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err(parse_error(start, "raw string literal not terminated"));
                }
                code.push(' ');
            }
            '(' | '[' | '{' => {
                stack.push((c, line));
                code.push(c);
            }
            ')' | ']' | '}' => {
                match stack.pop() {
                    Some((open, _)) if closing(open) == c => {}
                    Some((open, _)) => {
                        return Err(parse_error(
                            line,
                            format!("unexpected '{}', expected '{}'", c, closing(open)),
                        ));
                    }
                    None => return Err(parse_error(line, format!("unexpected '{}'", c))),
                }
                code.push(c);
            }
            _ => code.push(c),
        }
    }

    if let Some((open, open_line)) = stack.pop() {
        return Err(parse_error(open_line, format!("'{}' is never closed", open)));
    }

    check_package_clause(&code, first_line.unwrap_or(1))
}

/// 跳过单行字面量（字符串或 rune），支持反斜杠转义
fn skip_quoted(
    chars: &mut Peekable<Chars<'_>>,
    quote: char,
    line: usize,
    reason: &str,
) -> Result<()> {
    while let Some(n) = chars.next() {
        match n {
            '\n' => break,
            '\\' => {
                chars.next();
            }
            _ if n == quote => return Ok(()),
            _ => {}
        }
    }
    Err(parse_error(line, reason))
}

fn check_package_clause(code: &str, line: usize) -> Result<()> {
    let mut words = code.split_whitespace();

    match words.next() {
        Some("package") => {}
        Some(other) => {
            return Err(parse_error(
                line,
                format!("expected 'package', found '{}'", other),
            ))
        }
        None => return Err(parse_error(line, "expected 'package', found 'EOF'")),
    }

    match words.next().map(|w| w.trim_end_matches(';')) {
        Some(name) if IDENT.is_match(name) => Ok(()),
        Some(other) => Err(parse_error(
            line,
            format!("expected package name, found '{}'", other),
        )),
        None => Err(parse_error(line, "expected package name, found 'EOF'")),
    }
}

// ─────────────────────────────────────────────────────────────
// import 改写
// ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Imports,
    ImportBlock,
    Body,
}

/// 将注释内容替换为空格，保留换行和字面量，字节偏移与原文一致
fn mask_comments(source: &str) -> String {
    let bytes = source.as_bytes();
    let mut out = bytes.to_vec();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    out[i] = b' ';
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = source[i + 2..]
                    .find("*/")
                    .map_or(bytes.len(), |pos| i + 2 + pos + 2);
                for (masked, &b) in out[i..end].iter_mut().zip(&bytes[i..end]) {
                    if b != b'\n' {
                        *masked = b' ';
                    }
                }
                i = end;
            }
            quote @ (b'"' | b'\'') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote && bytes[i] != b'\n' {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
                i += 1;
            }
            b'`' => {
                i += 1;
                while i < bytes.len() && bytes[i] != b'`' {
                    i += 1;
                }
                i += 1;
            }
            _ => i += 1,
        }
    }

    // 注释边界都是 ASCII，整段替换后仍是合法 UTF-8
    String::from_utf8(out).unwrap_or_else(|_| source.to_string())
}

/// 改写 import 段中的包路径，其余文本原样保留
///
/// 段落判断基于去掉注释后的文本，改写落在原文的相同偏移上。
fn rewrite_imports(source: &str, check_whitelist: bool) -> Result<String> {
    let masked = mask_comments(source);
    let mut out = String::with_capacity(source.len() + 64);
    let mut section = Section::Preamble;

    for (line, code) in source
        .split_inclusive('\n')
        .zip(masked.split_inclusive('\n'))
    {
        let trimmed = code.trim();
        if section == Section::Body || trimmed.is_empty() {
            out.push_str(line);
            continue;
        }

        match section {
            Section::Preamble => {
                if trimmed.starts_with("package") {
                    section = Section::Imports;
                }
                out.push_str(line);
            }
            Section::Imports if IMPORT_KEYWORD.is_match(code) => {
                if let Some(open) = code.find('(') {
                    if !code[open..].contains(')') {
                        section = Section::ImportBlock;
                    }
                }
                out.push_str(&rewrite_quoted(line, code, check_whitelist)?);
            }
            Section::ImportBlock => {
                if code.contains(')') {
                    section = Section::Imports;
                }
                out.push_str(&rewrite_quoted(line, code, check_whitelist)?);
            }
            _ => {
                section = Section::Body;
                out.push_str(line);
            }
        }
    }

    Ok(out)
}

/// 在去注释的 `code` 中查找 import 路径，替换到原文 `line` 上
fn rewrite_quoted(line: &str, code: &str, check_whitelist: bool) -> Result<String> {
    let mut out = String::with_capacity(line.len() + 32);
    let mut last = 0;

    for caps in QUOTED.captures_iter(code) {
        let (Some(whole), Some(import)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let import = import.as_str();

        if check_whitelist && !is_whitelisted(import) {
            return Err(GnodevError::ImportNotAllowed {
                import: import.to_string(),
            });
        }

        out.push_str(&line[last..whole.start()]);
        out.push('"');
        out.push_str(&rewrite_import_path(import));
        out.push('"');
        last = whole.end();
    }

    out.push_str(&line[last..]);
    Ok(out)
}

fn is_whitelisted(import: &str) -> bool {
    import.starts_with(GNO_REALM_PREFIX)
        || import.starts_with(GNO_PACKAGE_PREFIX)
        || IMPORT_PREFIX_WHITELIST
            .iter()
            .any(|prefix| import.starts_with(prefix))
        || STDLIB_WHITELIST.contains(&import)
}

fn rewrite_import_path(import: &str) -> String {
    if import == GNO_STD_PKG {
        return GNO_STD_PKG_AFTER.to_string();
    }
    if let Some(rest) = import.strip_prefix(GNO_REALM_PREFIX) {
        return format!("{}{}", GNO_REALM_PREFIX_AFTER, rest);
    }
    if let Some(rest) = import.strip_prefix(GNO_PACKAGE_PREFIX) {
        return format!("{}{}", GNO_PACKAGE_PREFIX_AFTER, rest);
    }
    import.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn precompile(name: &str, source: &str) -> Result<String> {
        Precompiler.transform(Path::new(name), source)
    }

    #[test]
    fn test_header_and_body_preserved() {
        let source = "package foo\n\nfunc Hello() string {\n\treturn \"hi\"\n}\n";
        let out = precompile("foo.gno", source).unwrap();
        assert!(out.starts_with("// Code generated by github.com/gnolang/gno. DO NOT EDIT."));
        assert!(out.contains("//go:build gno\n// +build gno\n"));
        assert!(out.ends_with(source));
    }

    #[test]
    fn test_rewrite_import_block() {
        let source = r#"package foo

import (
	"std"
	"strings" // comment with "quotes"

	avl "gno.land/p/demo/avl"
	"gno.land/r/demo/users"
)

func F() {}
"#;
        let out = precompile("foo.gno", source).unwrap();
        assert!(out.contains("\t\"github.com/gnolang/gno/stdlibs/stdshim\"\n"));
        assert!(out.contains("\t\"strings\" // comment with \"quotes\"\n"));
        assert!(out.contains("avl \"github.com/gnolang/gno/examples/gno.land/p/demo/avl\""));
        assert!(out.contains("\"github.com/gnolang/gno/examples/gno.land/r/demo/users\""));
    }

    #[test]
    fn test_rewrite_single_imports() {
        let source = "package foo\n\nimport \"std\"\nimport u \"gno.land/r/demo/users\"\n\nvar x = 1\n";
        let out = precompile("foo.gno", source).unwrap();
        assert!(out.contains("import \"github.com/gnolang/gno/stdlibs/stdshim\"\n"));
        assert!(out.contains("import u \"github.com/gnolang/gno/examples/gno.land/r/demo/users\"\n"));
    }

    #[test]
    fn test_body_strings_untouched() {
        let source = "package foo\n\nvar s = \"gno.land/p/demo/avl\"\n";
        let out = precompile("foo.gno", source).unwrap();
        assert!(out.contains("var s = \"gno.land/p/demo/avl\"\n"));
    }

    #[test]
    fn test_import_not_whitelisted() {
        let source = "package foo\n\nimport \"os\"\n";
        let err = precompile("foo.gno", source).unwrap_err();
        assert!(matches!(err, GnodevError::ImportNotAllowed { ref import } if import == "os"));
    }

    #[test]
    fn test_test_file_skips_whitelist() {
        let source = "package foo\n\nimport (\n\t\"os\"\n\t\"testing\"\n)\n";
        assert!(precompile("foo_test.gno", source).is_ok());
        assert!(precompile("foo_filetest.gno", source).is_ok());
    }

    #[test]
    fn test_block_comment_after_package_keeps_import_section() {
        let source = "package foo /* doc\n   continues */\n\nimport \"std\"\nimport \"os\"\n";
        let err = precompile("foo.gno", source).unwrap_err();
        assert!(matches!(err, GnodevError::ImportNotAllowed { ref import } if import == "os"));

        let source = "package foo /* doc\n   continues */\n\nimport \"std\"\n";
        let out = precompile("foo.gno", source).unwrap();
        assert!(out.contains("import \"github.com/gnolang/gno/stdlibs/stdshim\"\n"));
        assert!(out.contains("package foo /* doc\n   continues */\n"));
    }

    #[test]
    fn test_inline_block_comment_before_import() {
        let err = precompile("foo.gno", "package foo\n\n/* x */ import \"os\"\n").unwrap_err();
        assert!(matches!(err, GnodevError::ImportNotAllowed { ref import } if import == "os"));

        let out = precompile("foo.gno", "package foo\n\n/* x */ import \"std\"\n").unwrap();
        assert!(out.ends_with("/* x */ import \"github.com/gnolang/gno/stdlibs/stdshim\"\n"));
    }

    #[test]
    fn test_quotes_in_comments_are_not_imports() {
        let source = "package foo\n\nimport (\n\t/* \"os\" */ \"fmt\" // \"net\"\n)\n";
        let out = precompile("foo.gno", source).unwrap();
        assert!(out.contains("\t/* \"os\" */ \"fmt\" // \"net\"\n"));
    }

    #[test]
    fn test_missing_package_clause() {
        let err = precompile("foo.gno", "// leading comment\nfunc F() {}\n").unwrap_err();
        match err {
            GnodevError::ParseError { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("expected 'package'"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unbalanced_brace() {
        let err = precompile("foo.gno", "package foo\n\nfunc F() {\n").unwrap_err();
        assert!(matches!(err, GnodevError::ParseError { line: 3, .. }));
    }

    #[test]
    fn test_unterminated_string() {
        let err = precompile("foo.gno", "package foo\n\nvar s = \"abc\n").unwrap_err();
        assert!(matches!(err, GnodevError::ParseError { line: 3, .. }));
    }

    #[test]
    fn test_brackets_inside_literals_ignored() {
        let source = "package foo\n\n// ( [ {\nvar a = \"}\"\nvar b = '{'\nvar c = `\n)\n`\n/* ] */\n";
        assert!(precompile("foo.gno", source).is_ok());
    }

    #[test]
    fn test_deterministic_output() {
        let source = "package foo\n\nimport \"std\"\n\nfunc F() {}\n";
        let first = precompile("foo.gno", source).unwrap();
        let second = precompile("foo.gno", source).unwrap();
        assert_eq!(first.as_bytes(), second.as_bytes());
    }
}
