//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::error::ValueObjectError;

/// Maximum length of a display name, in characters.
pub const DISPLAY_NAME_MAX_CHARS: usize = 100;

/// User identifier value object.
///
/// Shared by the registry and the chat room. `0` is reserved for
/// system-authored chat events and is never a valid user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(i64);

impl UserId {
    /// First id issued by the registry
    pub const FIRST: Self = Self(1);

    /// Create a new UserId.
    ///
    /// # Arguments
    ///
    /// * `id` - The numeric identifier
    ///
    /// # Returns
    ///
    /// A Result containing the UserId or an error if `id` is not positive
    pub fn new(id: i64) -> Result<Self, ValueObjectError> {
        if id <= 0 {
            return Err(ValueObjectError::UserIdNotPositive(id));
        }
        Ok(Self(id))
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }

    /// The id issued after this one
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl TryFrom<i64> for UserId {
    type Error = ValueObjectError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display name of a chat participant.
///
/// Trusted as supplied by the client on join; only emptiness and length are checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayName(String);

impl DisplayName {
    /// Create a new DisplayName.
    ///
    /// Leading and trailing whitespace is not significant: a name made only of
    /// whitespace is rejected as empty.
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        if name.trim().is_empty() {
            return Err(ValueObjectError::DisplayNameEmpty);
        }
        let len = name.chars().count();
        if len > DISPLAY_NAME_MAX_CHARS {
            return Err(ValueObjectError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX_CHARS,
                actual: len,
            });
        }
        Ok(Self(name))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in seconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp from Unix seconds.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        Self(yoriai_shared::time::now_epoch_seconds())
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies one physical chat connection.
///
/// A user id can be re-bound to a newer connection (last join wins); the
/// connection id tells the sessions apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_new_success() {
        // テスト項目: 正の数値からユーザー ID を作成できる
        // when (操作):
        let result = UserId::new(42);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().value(), 42);
    }

    #[test]
    fn test_user_id_new_zero_fails() {
        // テスト項目: 0 はシステム用に予約されているためユーザー ID にできない
        // when (操作):
        let result = UserId::new(0);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::UserIdNotPositive(0)));
    }

    #[test]
    fn test_user_id_new_negative_fails() {
        // テスト項目: 負の数値はユーザー ID にできない
        // when (操作):
        let result = UserId::try_from(-7);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::UserIdNotPositive(-7)));
    }

    #[test]
    fn test_user_id_ordering() {
        // テスト項目: ユーザー ID は数値順に並ぶ
        // given (前提条件):
        let mut ids = vec![
            UserId::new(3).unwrap(),
            UserId::new(1).unwrap(),
            UserId::new(2).unwrap(),
        ];

        // when (操作):
        ids.sort();

        // then (期待する結果):
        let values: Vec<i64> = ids.iter().map(UserId::value).collect();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn test_display_name_new_success() {
        // テスト項目: 有効な表示名を作成できる
        // when (操作):
        let result = DisplayName::new("alice".to_string());

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "alice");
    }

    #[test]
    fn test_display_name_whitespace_only_fails() {
        // テスト項目: 空白のみの表示名は作成できない
        // when (操作):
        let result = DisplayName::new("   ".to_string());

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::DisplayNameEmpty));
    }

    #[test]
    fn test_display_name_too_long_fails() {
        // テスト項目: 101 文字以上の表示名は作成できない（文字数はバイトではなく文字で数える）
        // given (前提条件):
        let name = "あ".repeat(101);

        // when (操作):
        let result = DisplayName::new(name);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ValueObjectError::DisplayNameTooLong {
                max: 100,
                actual: 101
            })
        );
    }

    #[test]
    fn test_display_name_multibyte_within_limit() {
        // テスト項目: マルチバイト文字 100 文字は上限内として扱われる
        // when (操作):
        let result = DisplayName::new("あ".repeat(100));

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[test]
    fn test_timestamp_ordering() {
        // テスト項目: タイムスタンプは順序付けできる
        // given (前提条件):
        let ts1 = Timestamp::new(1000);
        let ts2 = Timestamp::new(2000);

        // then (期待する結果):
        assert!(ts1 < ts2);
        assert_eq!(ts2.value(), 2000);
    }
}
