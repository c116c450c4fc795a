//! UseCase: ユーザー登録簿（作成・取得・更新・削除・一覧）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - 入力検証（空の名前・メールアドレス、0 以下の ID）は Repository を呼ばずに弾く
//! - 部分更新の正規化（空文字列・0 以下の年齢は「変更なし」）
//! - ページング引数の既定値と上限
//! - RepositoryError から UserUseCaseError への変換
//!
//! Repository は mockall のモックに差し替えてテストします。

use std::sync::Arc;

use crate::domain::{NewUser, User, UserId, UserRepository, UserUpdate};

use super::error::UserUseCaseError;

/// Default page size for listing users
pub const DEFAULT_PAGE_SIZE: i32 = 10;

/// Upper bound for the requested page size
pub const MAX_PAGE_SIZE: i32 = 100;

/// One page of users
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListUsersPage {
    pub users: Vec<User>,
    /// Number of users in the registry, across all pages
    pub total: usize,
    pub page: i32,
    pub page_size: i32,
}

/// ユーザー登録簿のユースケース
pub struct UserRegistryUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn UserRepository>,
}

impl UserRegistryUseCase {
    /// 新しい UserRegistryUseCase を作成
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// ユーザーを作成
    ///
    /// # Errors
    ///
    /// * `InvalidArgument` - 名前またはメールアドレスが空
    /// * `EmailAlreadyExists` - メールアドレスが既に使われている
    pub async fn create(&self, new_user: NewUser) -> Result<User, UserUseCaseError> {
        if new_user.name.trim().is_empty() {
            return Err(UserUseCaseError::InvalidArgument(
                "name cannot be empty".to_string(),
            ));
        }
        if new_user.email.trim().is_empty() {
            return Err(UserUseCaseError::InvalidArgument(
                "email cannot be empty".to_string(),
            ));
        }

        let user = self.repository.create(new_user).await?;
        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// ユーザーを取得
    pub async fn get(&self, id: i64) -> Result<User, UserUseCaseError> {
        let id = UserId::new(id)?;
        Ok(self.repository.get(id).await?)
    }

    /// ユーザーを部分更新
    ///
    /// 空文字列のフィールドと 0 以下の年齢は「変更なし」として扱います。
    pub async fn update(&self, id: i64, update: UserUpdate) -> Result<User, UserUseCaseError> {
        let id = UserId::new(id)?;
        let update = UserUpdate {
            name: update.name.filter(|s| !s.is_empty()),
            email: update.email.filter(|s| !s.is_empty()),
            age: update.age.filter(|age| *age > 0),
            phone: update.phone.filter(|s| !s.is_empty()),
        };

        let user = self.repository.update(id, update).await?;
        tracing::info!(user_id = %user.id, "User updated");
        Ok(user)
    }

    /// ユーザーを削除
    pub async fn delete(&self, id: i64) -> Result<(), UserUseCaseError> {
        let id = UserId::new(id)?;
        self.repository.delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// ユーザー一覧を取得
    ///
    /// `page` は 1 始まり。0 以下なら 1、`page_size` は 0 以下なら 10、上限 100。
    pub async fn list(&self, page: i32, page_size: i32) -> ListUsersPage {
        let page = page.max(1);
        let page_size = if page_size <= 0 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size.min(MAX_PAGE_SIZE)
        };

        let offset = (page as usize - 1).saturating_mul(page_size as usize);
        let (users, total) = self.repository.list(offset, page_size as usize).await;

        ListUsersPage {
            users,
            total,
            page,
            page_size,
        }
    }
}
