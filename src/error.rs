//! Error types for the alarm ringing session.
//!
//! The state machine itself never fails: undeclared events are ignored and
//! playback commands to an unbound connection are dropped. The errors here
//! cover session start-up, configuration and simulator scripts.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::AlarmId;

/// Errors that can occur around a ringing session.
#[derive(Debug, Error)]
pub enum RingingError {
    /// The alarm could not be resolved from storage.
    #[error("アラームが見つかりません: {0}")]
    AlarmNotFound(AlarmId),

    /// The configuration values are out of range.
    #[error("設定が不正です: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be read.
    #[error("設定ファイルを読み込めません: {path}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON.
    #[error("設定ファイルの形式が不正です: {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A simulator script could not be used.
    #[error("スクリプトが不正です: {0}")]
    InvalidScript(String),
}

impl RingingError {
    /// Returns true if the session cannot proceed at all.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::AlarmNotFound(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::AlarmNotFound(_) => "アラームが削除されていないか確認してください",
            Self::InvalidConfig(_) => "鳴動時間は0-86400000ミリ秒の範囲で指定してください",
            Self::ConfigIo { .. } => "設定ファイルのパスと権限を確認してください",
            Self::ConfigParse { .. } => "設定ファイルのJSON形式を確認してください",
            Self::InvalidScript(_) => "スクリプトの各ステップを確認してください",
        }
    }
}
