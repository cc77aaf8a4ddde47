use std::fmt::Display;
use std::sync::LazyLock;

use anyhow::Result;
use anyhow::bail;
use regex::Regex;
use serde::Serialize;

/// `XY PATH`, where X is the index status and Y the worktree status.
static PORCELAIN_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.)(.) (.+)$").expect("porcelain regex is valid"));

/// Parsed output of `git status --porcelain`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WorkingTreeStatus {
    pub entries: Vec<StatusEntry>,
}

/// A single porcelain v1 entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEntry {
    pub index: char,
    pub worktree: char,
    pub path: String,
    /// Source path of a rename or copy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_path: Option<String>,
}

impl WorkingTreeStatus {
    pub fn parse(porcelain: &str) -> Result<Self> {
        let mut entries = Vec::new();

        for line in porcelain.lines() {
            if line.trim().is_empty() {
                continue;
            }

            let Some(caps) = PORCELAIN_LINE.captures(line) else {
                bail!("Unexpected git status line: {line:?}");
            };
            let index = caps[1].chars().next().unwrap_or(' ');
            let worktree = caps[2].chars().next().unwrap_or(' ');
            let rest = &caps[3];

            let (original_path, path) = match (index, rest.split_once(" -> ")) {
                ('R' | 'C', Some((from, to))) => (Some(unquote(from)), unquote(to)),
                _ => (None, unquote(rest)),
            };

            entries.push(StatusEntry {
                index,
                worktree,
                path,
                original_path,
            });
        }

        Ok(Self { entries })
    }

    pub fn is_clean(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn untracked(&self) -> impl Iterator<Item = &StatusEntry> {
        self.entries.iter().filter(|e| e.is_untracked())
    }
}

impl StatusEntry {
    pub fn is_untracked(&self) -> bool {
        self.index == '?' && self.worktree == '?'
    }

    /// Human readable kind of change, preferring the staged side.
    pub fn kind(&self) -> &'static str {
        if self.is_untracked() {
            return "untracked";
        }
        if self.index == 'U' || self.worktree == 'U' {
            return "conflicted";
        }
        let code = if self.index != ' ' {
            self.index
        } else {
            self.worktree
        };
        match code {
            'M' | 'T' => "modified",
            'A' => "added",
            'D' => "deleted",
            'R' => "renamed",
            'C' => "copied",
            '!' => "ignored",
            _ => "changed",
        }
    }
}

impl Display for StatusEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.original_path {
            Some(from) => write!(f, "{}{} {} -> {}", self.index, self.worktree, from, self.path),
            None => write!(f, "{}{} {}", self.index, self.worktree, self.path),
        }
    }
}

/// Undo git's C-style quoting of paths with unusual characters.
fn unquote(path: &str) -> String {
    let Some(inner) = path
        .strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
    else {
        return path.to_string();
    };

    // Escapes encode raw bytes, e.g. `\303\251` for "é"
    let mut out: Vec<u8> = Vec::with_capacity(inner.len());
    let mut bytes = inner.bytes().peekable();
    while let Some(b) = bytes.next() {
        if b != b'\\' {
            out.push(b);
            continue;
        }
        match bytes.next() {
            Some(d @ b'0'..=b'7') => {
                let mut value = u32::from(d - b'0');
                for _ in 0..2 {
                    match bytes.peek() {
                        Some(&next @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(next - b'0');
                            bytes.next();
                        }
                        _ => break,
                    }
                }
                out.push((value & 0xff) as u8);
            }
            Some(b'a') => out.push(0x07),
            Some(b'b') => out.push(0x08),
            Some(b'f') => out.push(0x0c),
            Some(b'n') => out.push(b'\n'),
            Some(b'r') => out.push(b'\r'),
            Some(b't') => out.push(b'\t'),
            Some(b'v') => out.push(0x0b),
            Some(other) => out.push(other),
            None => out.push(b'\\'),
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}
