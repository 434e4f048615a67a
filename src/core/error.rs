//! Error handling for component publishing
//!
//! This module provides the error taxonomy for the publish pipeline with
//! recovery guidance, using the thiserror crate for ergonomic error handling.

use thiserror::Error;

/// Main error type for component publishing operations
#[derive(Error, Debug)]
pub enum PublishError {
    // Endpoint resolution errors
    #[error("レジストリの解決に失敗しました: {message}")]
    RegistryResolution { message: String },

    // Packaging / compression errors
    #[error("パッケージの作成に失敗しました: {message}")]
    Packaging { message: String },

    // Authentication errors
    #[error("認証情報が無効です: {route}")]
    InvalidCredentials { route: String },

    // Version negotiation errors reported by the registry
    #[error("CLIのバージョンが古いため公開できません。{suggested_version} へアップグレードしてください")]
    CliVersionMismatch { suggested_version: String },

    #[error("ランタイムのバージョンが要件を満たしていません。推奨バージョン: {suggested_version}")]
    RuntimeVersionMismatch { suggested_version: String },

    // Network / registry errors
    #[error("[{route}] 公開処理に失敗しました: {message}")]
    NetworkOrRegistry { route: String, message: String },

    // Cleanup errors
    #[error("一時アーティファクトの削除に失敗しました ({path}): {message}")]
    Cleanup { path: String, message: String },
}

impl PublishError {
    /// Get error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::RegistryResolution { .. } => "REGISTRY_RESOLUTION_FAILED",
            Self::Packaging { .. } => "PACKAGING_FAILED",
            Self::InvalidCredentials { .. } => "INVALID_CREDENTIALS",
            Self::CliVersionMismatch { .. } => "CLI_VERSION_NOT_VALID",
            Self::RuntimeVersionMismatch { .. } => "NODE_VERSION_NOT_VALID",
            Self::NetworkOrRegistry { .. } => "NETWORK_OR_REGISTRY_ERROR",
            Self::Cleanup { .. } => "CLEANUP_FAILED",
        }
    }

    /// Get suggested actions for this error
    pub fn suggested_actions(&self) -> Vec<&'static str> {
        match self {
            Self::RegistryResolution { .. } => vec![
                ".publish-registries.yaml を確認してください",
                "少なくとも1つのレジストリURLを設定してください",
            ],
            Self::Packaging { .. } => vec![
                "component.json の name / version を確認してください",
                "コンポーネントディレクトリの権限を確認してください",
            ],
            Self::InvalidCredentials { .. } => vec![
                "ユーザー名とパスワードを確認してください",
                "レジストリのアカウント権限を確認してください",
            ],
            Self::CliVersionMismatch { .. } => vec![
                "表示されたバージョンへCLIをアップグレードしてください",
            ],
            Self::RuntimeVersionMismatch { .. } => vec![
                "推奨バージョンのランタイムをインストールしてください",
            ],
            Self::NetworkOrRegistry { .. } => vec![
                "ネットワーク接続を確認してください",
                "レジストリのステータスを確認してください",
            ],
            Self::Cleanup { .. } => vec![
                "ファイルを手動で削除してください",
            ],
        }
    }

    /// Whether the failure happened before any network activity
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::RegistryResolution { .. } | Self::Packaging { .. } | Self::Cleanup { .. }
        )
    }
}
