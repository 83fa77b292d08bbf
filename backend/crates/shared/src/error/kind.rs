//! Error Kind - Classification of errors
//!
//! Defines the [`ErrorKind`] enum shared by every crate in the workspace.

/// エラー種別の列挙体
///
/// 接続処理で発生しうる失敗を分類します。
/// 各クレートのエラー型は `kind()` でこの分類に写像され、
/// ログレベルや接続の扱いはこの分類だけで決まります。
///
/// ## Notes
/// * `non_exhaustive` - 将来的に列挙子が追加される可能性があることを示す
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::Timeout;
/// assert!(kind.is_expected());
/// assert_eq!(kind.as_str(), "Timeout");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// 接続・送受信の失敗 (dial / accept / read / write)
    Transport,
    /// プロトコル違反 (不正な解、未登録のハンドラ、短い読み込み)
    Protocol,
    /// 期限切れ
    Timeout,
    /// リソースが見つからない (例: 引用が空)
    NotFound,
    /// 設定値が不正
    InvalidConfig,
    /// 探索の上限に到達
    Exhausted,
    /// 内部エラー
    Internal,
}

impl ErrorKind {
    /// ユーザー向けの文字列表現を取得
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::InvalidConfig.as_str(), "Invalid Config");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Transport => "Transport",
            ErrorKind::Protocol => "Protocol",
            ErrorKind::Timeout => "Timeout",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::InvalidConfig => "Invalid Config",
            ErrorKind::Exhausted => "Exhausted",
            ErrorKind::Internal => "Internal",
        }
    }

    /// 想定内の結果かどうかを判定
    ///
    /// 相手に報告されるだけでエスカレーションされない結果は `true` を返します。
    /// これらは `warn` で記録します。
    #[inline]
    pub const fn is_expected(&self) -> bool {
        matches!(
            self,
            ErrorKind::Protocol | ErrorKind::Timeout | ErrorKind::NotFound
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
