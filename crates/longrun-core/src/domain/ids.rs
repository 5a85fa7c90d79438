//! Task identifier.
//!
//! # ULID ベースの ID
//! 新規タスクの ID は `IdGenerator` が ULID から生成します（時刻でソート可能、
//! 調整なしで生成可能）。一方で、呼び出し側から見た ID は不透明な文字列です。
//! HTTP 層などから届いた任意の文字列でも検索はでき、存在しなければ NotFound に
//! なるだけなので、パースエラーという概念は持ちません。

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use ulid::Ulid;

/// Identifier of a task. Immutable once created, never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wrap an arbitrary string (e.g. a path segment) for lookup.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// ULID から TaskId を作成
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Ulid> for TaskId {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Borrow<str> for TaskId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
