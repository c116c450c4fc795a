//! InMemory User Repository 実装
//!
//! ドメイン層が定義する UserRepository trait の具体的な実装。
//! ID の採番とメールアドレスの一意性チェックは、同じロックの中で行います。

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{NewUser, RepositoryError, Timestamp, User, UserId, UserRepository, UserUpdate};

struct UserStore {
    /// ID 順に並ぶユーザー一覧
    users: BTreeMap<UserId, User>,
    /// 次に払い出す ID
    next_id: UserId,
}

/// インメモリ User Repository 実装
pub struct InMemoryUserRepository {
    store: RwLock<UserStore>,
}

impl InMemoryUserRepository {
    /// 新しい InMemoryUserRepository を作成（ID は 1 から採番）
    pub fn new() -> Self {
        Self {
            store: RwLock::new(UserStore {
                users: BTreeMap::new(),
                next_id: UserId::FIRST,
            }),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore {
    fn email_taken_by_other(&self, email: &str, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let mut store = self.store.write().await;

        if store.email_taken_by_other(&new_user.email, None) {
            return Err(RepositoryError::EmailAlreadyExists(new_user.email));
        }

        let id = store.next_id;
        let now = Timestamp::now();
        let user = User {
            id,
            name: new_user.name,
            email: new_user.email,
            age: new_user.age,
            phone: new_user.phone,
            created_at: now,
            updated_at: now,
        };

        store.users.insert(id, user.clone());
        store.next_id = id.next();

        Ok(user)
    }

    async fn get(&self, id: UserId) -> Result<User, RepositoryError> {
        let store = self.store.read().await;
        store
            .users
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::UserNotFound(id))
    }

    async fn update(&self, id: UserId, update: UserUpdate) -> Result<User, RepositoryError> {
        let mut store = self.store.write().await;

        if !store.users.contains_key(&id) {
            return Err(RepositoryError::UserNotFound(id));
        }
        if let Some(email) = &update.email
            && store.email_taken_by_other(email, Some(id))
        {
            return Err(RepositoryError::EmailAlreadyExists(email.clone()));
        }

        let user = store
            .users
            .get_mut(&id)
            .ok_or(RepositoryError::UserNotFound(id))?;
        user.apply(update, Timestamp::now());

        Ok(user.clone())
    }

    async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        let mut store = self.store.write().await;
        store
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::UserNotFound(id))
    }

    async fn list(&self, offset: usize, limit: usize) -> (Vec<User>, usize) {
        let store = self.store.read().await;
        let users = store
            .users
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        (users, store.users.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryUserRepository の CRUD 操作
    // - ID が 1 から連番で払い出されること（削除後も再利用しない）
    // - メールアドレスの一意性
    // - ページング（offset / limit）と ID 順
    // ========================================

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
            age: 25,
            phone: "13800138000".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        // テスト項目: ID が 1 から順に払い出される
        // given (前提条件):
        let repo = InMemoryUserRepository::new();

        // when (操作):
        let alice = repo.create(new_user("alice", "a@example.com")).await.unwrap();
        let bob = repo.create(new_user("bob", "b@example.com")).await.unwrap();

        // then (期待する結果):
        assert_eq!(alice.id.value(), 1);
        assert_eq!(bob.id.value(), 2);
        assert_eq!(alice.created_at, alice.updated_at);
    }

    #[tokio::test]
    async fn test_create_duplicate_email_fails() {
        // テスト項目: 既に使われているメールアドレスでは作成できない
        // given (前提条件):
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("alice", "a@example.com")).await.unwrap();

        // when (操作):
        let result = repo.create(new_user("alice2", "a@example.com")).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::EmailAlreadyExists("a@example.com".to_string()))
        );
        assert_eq!(repo.list(0, 100).await.1, 1);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        // テスト項目: 削除後も ID は再利用されない
        // given (前提条件):
        let repo = InMemoryUserRepository::new();
        let alice = repo.create(new_user("alice", "a@example.com")).await.unwrap();
        repo.delete(alice.id).await.unwrap();

        // when (操作):
        let bob = repo.create(new_user("bob", "a@example.com")).await.unwrap();

        // then (期待する結果): 削除済みユーザーのメールアドレスは再利用できる
        assert_eq!(bob.id.value(), 2);
    }

    #[tokio::test]
    async fn test_get_nonexistent_user() {
        // テスト項目: 存在しないユーザーの取得は UserNotFound になる
        // given (前提条件):
        let repo = InMemoryUserRepository::new();
        let id = UserId::new(99).unwrap();

        // when (操作):
        let result = repo.get(id).await;

        // then (期待する結果):
        assert_eq!(result, Err(RepositoryError::UserNotFound(id)));
    }

    #[tokio::test]
    async fn test_update_email_conflict() {
        // テスト項目: 他のユーザーが使っているメールアドレスへの変更は失敗する
        // given (前提条件):
        let repo = InMemoryUserRepository::new();
        let alice = repo.create(new_user("alice", "a@example.com")).await.unwrap();
        repo.create(new_user("bob", "b@example.com")).await.unwrap();

        // when (操作):
        let result = repo
            .update(
                alice.id,
                UserUpdate {
                    email: Some("b@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::EmailAlreadyExists("b@example.com".to_string()))
        );
        assert_eq!(repo.get(alice.id).await.unwrap().email, "a@example.com");
    }

    #[tokio::test]
    async fn test_update_own_email_is_allowed() {
        // テスト項目: 自分自身のメールアドレスを指定した更新は成功する
        // given (前提条件):
        let repo = InMemoryUserRepository::new();
        let alice = repo.create(new_user("alice", "a@example.com")).await.unwrap();

        // when (操作):
        let result = repo
            .update(
                alice.id,
                UserUpdate {
                    name: Some("alice liddell".to_string()),
                    email: Some("a@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await;

        // then (期待する結果):
        let updated = result.unwrap();
        assert_eq!(updated.name, "alice liddell");
        assert_eq!(updated.email, "a@example.com");
    }

    #[tokio::test]
    async fn test_delete_nonexistent_user() {
        // テスト項目: 存在しないユーザーの削除は UserNotFound になる
        // given (前提条件):
        let repo = InMemoryUserRepository::new();
        let id = UserId::new(1).unwrap();

        // when (操作):
        let result = repo.delete(id).await;

        // then (期待する結果):
        assert_eq!(result, Err(RepositoryError::UserNotFound(id)));
    }

    #[tokio::test]
    async fn test_list_pagination_in_id_order() {
        // テスト項目: ID 順にページングされ、総数が返される
        // given (前提条件):
        let repo = InMemoryUserRepository::new();
        for i in 1..=5 {
            repo.create(new_user(&format!("user{i}"), &format!("u{i}@example.com")))
                .await
                .unwrap();
        }

        // when (操作):
        let (page, total) = repo.list(2, 2).await;

        // then (期待する結果):
        assert_eq!(total, 5);
        let ids: Vec<i64> = page.iter().map(|u| u.id.value()).collect();
        assert_eq!(ids, vec![3, 4]);

        // 範囲外は空
        let (empty, total) = repo.list(10, 2).await;
        assert!(empty.is_empty());
        assert_eq!(total, 5);
    }
}
