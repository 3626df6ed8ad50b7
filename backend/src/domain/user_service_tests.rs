//! Tests for the user service: caching, login, authorization levels and the
//! transactional role change.

use std::sync::{Arc, Mutex, MutexGuard};

use mockall::{Sequence, predicate::eq};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::cache_aside::DEFAULT_CACHE_TTL;
use crate::domain::ports::{
    MockCache, MockPasswordHasher, MockTokenIssuer, MockUserRepository, StoreError,
};
use crate::domain::{
    Email, ErrorCode, Password, PasswordHash, Role, RoleChangeAction, RoleChangeItem, RoleId,
    RoleName, TodoId, UserCredentials, Username,
};
use crate::test_support::{MutableClock, fixture_timestamp};

const DUMMY_HASH: &str = "$argon2id$dummy";
const REAL_HASH: &str = "$argon2id$real";

#[derive(Debug, Default)]
struct TxLog {
    roles_looked_up: Vec<RoleId>,
    attached: Vec<RoleId>,
    detached: Vec<RoleId>,
    committed: bool,
    rolled_back: bool,
}

#[derive(Clone, Default)]
struct StubUserRoleStore {
    user_exists: bool,
    known_roles: Vec<RoleId>,
    fail_attach: bool,
    log: Arc<Mutex<TxLog>>,
}

impl StubUserRoleStore {
    fn with_user(known_roles: Vec<RoleId>) -> Self {
        Self {
            user_exists: true,
            known_roles,
            ..Self::default()
        }
    }

    fn log(&self) -> MutexGuard<'_, TxLog> {
        self.log.lock().expect("tx log lock")
    }
}

#[async_trait]
impl UserRoleStore for StubUserRoleStore {
    async fn begin(&self) -> Result<Box<dyn UserRoleTransaction>, StoreError> {
        Ok(Box::new(self.clone()))
    }
}

#[async_trait]
impl UserRoleTransaction for StubUserRoleStore {
    async fn find_user(&mut self, id: &UserId) -> Result<Option<User>, StoreError> {
        Ok(self.user_exists.then(|| sample_user(*id)))
    }

    async fn find_role(&mut self, id: &RoleId) -> Result<Option<Role>, StoreError> {
        self.log().roles_looked_up.push(*id);
        Ok(self.known_roles.contains(id).then(|| Role {
            id: *id,
            name: RoleName::new("role").expect("valid name"),
            auth_level: AuthLevel::new(1).expect("valid level"),
            created_at: fixture_timestamp(),
            updated_at: fixture_timestamp(),
        }))
    }

    async fn attach_roles(&mut self, _user: &UserId, roles: &[RoleId]) -> Result<(), StoreError> {
        if self.fail_attach {
            return Err(StoreError::query("insert failed"));
        }
        self.log().attached.extend_from_slice(roles);
        Ok(())
    }

    async fn detach_roles(&mut self, _user: &UserId, roles: &[RoleId]) -> Result<(), StoreError> {
        self.log().detached.extend_from_slice(roles);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.log().committed = true;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        self.log().rolled_back = true;
        Ok(())
    }
}

struct Collaborators {
    users: MockUserRepository,
    cache: MockCache,
    hasher: MockPasswordHasher,
    tokens: MockTokenIssuer,
}

impl Collaborators {
    fn new() -> Self {
        Self {
            users: MockUserRepository::new(),
            cache: MockCache::new(),
            hasher: MockPasswordHasher::new(),
            tokens: MockTokenIssuer::new(),
        }
    }

    fn into_service(
        self,
        store: StubUserRoleStore,
    ) -> UserService<MockUserRepository, StubUserRoleStore> {
        UserService::new(
            Arc::new(self.users),
            Arc::new(store),
            CacheAside::new(Arc::new(self.cache), DEFAULT_CACHE_TTL),
            CredentialServices {
                hasher: Arc::new(self.hasher),
                tokens: Arc::new(self.tokens),
            },
            Arc::new(MutableClock::default()),
        )
    }

    fn build(self) -> UserService<MockUserRepository, StubUserRoleStore> {
        self.into_service(StubUserRoleStore::default())
    }
}

#[fixture]
fn deps() -> Collaborators {
    Collaborators::new()
}

fn sample_user(id: UserId) -> User {
    User {
        id,
        username: Username::new("ada").expect("valid username"),
        email: Email::new("ada@example.com").expect("valid email"),
        created_at: fixture_timestamp(),
        updated_at: fixture_timestamp(),
    }
}

fn new_user() -> NewUser {
    NewUser {
        username: Username::new("ada").expect("valid username"),
        email: Email::new("ada@example.com").expect("valid email"),
        password: Password::new("correct horse").expect("valid password"),
    }
}

fn credentials(email: &str, password: &str) -> LoginCredentials {
    LoginCredentials::try_from_parts(email, password).expect("credentials shape")
}

fn expect_invalidation(cache: &mut MockCache, keys: Vec<CacheKey>) {
    let mut seq = Sequence::new();
    for key in keys {
        cache
            .expect_delete()
            .with(eq(key))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
    }
}

#[rstest]
#[tokio::test]
async fn create_user_stores_a_hash_and_invalidates_the_collection(mut deps: Collaborators) {
    deps.hasher
        .expect_hash()
        .withf(|password| password.expose() == "correct horse")
        .times(1)
        .returning(|_| Ok(PasswordHash::new(REAL_HASH)));
    deps.users
        .expect_insert()
        .withf(|user, hash| user.username.as_ref() == "ada" && hash.as_str() == REAL_HASH)
        .times(1)
        .returning(|_, _| Ok(()));
    expect_invalidation(&mut deps.cache, vec![CacheKey::collection(CacheNamespace::Users)]);

    let user = deps
        .build()
        .create_user(new_user())
        .await
        .expect("user created");

    assert_eq!(user.email.as_ref(), "ada@example.com");
    assert_eq!(user.created_at, fixture_timestamp());
}

#[rstest]
#[tokio::test]
async fn create_user_reports_duplicate_email_as_conflict(mut deps: Collaborators) {
    deps.hasher
        .expect_hash()
        .returning(|_| Ok(PasswordHash::new(REAL_HASH)));
    deps.users
        .expect_insert()
        .returning(|_, _| Err(StoreError::conflict("email")));
    deps.cache.expect_delete().never();

    let err = deps
        .build()
        .create_user(new_user())
        .await
        .expect_err("duplicate email");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), "email already exists");
}

#[rstest]
#[tokio::test]
async fn update_user_changes_only_supplied_fields(mut deps: Collaborators) {
    let id = UserId::generate();
    deps.users
        .expect_find_by_id()
        .with(eq(id))
        .return_once(move |_| Ok(Some(sample_user(id))));
    deps.hasher.expect_hash().never();
    deps.users
        .expect_update()
        .withf(|user, hash| {
            user.username.as_ref() == "ada"
                && user.email.as_ref() == "lovelace@example.com"
                && hash.is_none()
        })
        .times(1)
        .returning(|_, _| Ok(true));
    expect_invalidation(
        &mut deps.cache,
        vec![
            CacheKey::entity(CacheNamespace::Users, id),
            CacheKey::collection(CacheNamespace::Users),
        ],
    );

    let user = deps
        .build()
        .update_user(
            &id,
            UserChanges {
                email: Some(Email::new("lovelace@example.com").expect("valid email")),
                ..UserChanges::default()
            },
        )
        .await
        .expect("user updated");

    assert_eq!(user.email.as_ref(), "lovelace@example.com");
}

#[rstest]
#[tokio::test]
async fn update_user_rehashes_a_new_password(mut deps: Collaborators) {
    let id = UserId::generate();
    deps.users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(sample_user(id))));
    deps.hasher
        .expect_hash()
        .withf(|password| password.expose() == "new secret")
        .times(1)
        .returning(|_| Ok(PasswordHash::new("$argon2id$new")));
    deps.users
        .expect_update()
        .withf(|_, hash| {
            hash.as_ref()
                .is_some_and(|value| value.as_str() == "$argon2id$new")
        })
        .times(1)
        .returning(|_, _| Ok(true));
    deps.cache.expect_delete().returning(|_| Ok(()));

    deps.build()
        .update_user(
            &id,
            UserChanges {
                password: Some(Password::new("new secret").expect("valid password")),
                ..UserChanges::default()
            },
        )
        .await
        .expect("password updated");
}

#[rstest]
#[tokio::test]
async fn delete_user_clears_their_todo_collections(mut deps: Collaborators) {
    let id = UserId::generate();
    let todos = [TodoId::generate(), TodoId::generate()];
    deps.users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(sample_user(id))));
    deps.users
        .expect_todo_ids()
        .with(eq(id))
        .return_once(move |_| Ok(todos.to_vec()));
    deps.users.expect_delete().times(1).returning(|_| Ok(true));
    expect_invalidation(
        &mut deps.cache,
        vec![
            CacheKey::entity(CacheNamespace::Users, id),
            CacheKey::collection(CacheNamespace::Users),
            CacheKey::collection(CacheNamespace::Todos),
            CacheKey::owned_collection(CacheNamespace::Todos, id),
            CacheKey::entity(CacheNamespace::Todos, todos[0]),
            CacheKey::entity(CacheNamespace::Todos, todos[1]),
        ],
    );

    deps.build().delete_user(&id).await.expect("user deleted");
}

#[rstest]
#[tokio::test]
async fn get_user_reports_missing_users(mut deps: Collaborators) {
    deps.users.expect_find_by_id().return_once(|_| Ok(None));
    deps.cache.expect_get().return_once(|_| None);
    deps.cache.expect_set().never();

    let err = deps
        .build()
        .get_user(&UserId::generate())
        .await
        .expect_err("missing user");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn login_with_unknown_email_still_verifies_against_the_dummy_hash(
    mut deps: Collaborators,
) {
    deps.users
        .expect_find_credentials_by_email()
        .return_once(|_| Ok(None));
    deps.hasher
        .expect_dummy_hash()
        .times(1)
        .returning(|| PasswordHash::new(DUMMY_HASH));
    deps.hasher
        .expect_verify()
        .withf(|_, hash| hash.as_str() == DUMMY_HASH)
        .times(1)
        .returning(|_, _| Ok(false));
    deps.tokens.expect_issue().never();

    let err = deps
        .build()
        .login(&credentials("nonexistent@x.com", "anything"))
        .await
        .expect_err("unknown email rejected");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), "invalid email or password");
}

#[rstest]
#[case::wrong_password(Ok(false))]
#[case::unreadable_hash(Err(crate::domain::ports::PasswordHasherError::malformed_hash("bad")))]
#[tokio::test]
async fn login_failures_are_indistinguishable_from_unknown_emails(
    mut deps: Collaborators,
    #[case] outcome: Result<bool, crate::domain::ports::PasswordHasherError>,
) {
    let id = UserId::generate();
    deps.users
        .expect_find_credentials_by_email()
        .return_once(move |_| {
            Ok(Some(UserCredentials {
                user: sample_user(id),
                password_hash: PasswordHash::new(REAL_HASH),
            }))
        });
    deps.hasher.expect_dummy_hash().never();
    deps.hasher
        .expect_verify()
        .withf(|_, hash| hash.as_str() == REAL_HASH)
        .return_once(move |_, _| outcome);
    deps.tokens.expect_issue().never();

    let err = deps
        .build()
        .login(&credentials("real@x.com", "wrongpassword"))
        .await
        .expect_err("wrong password rejected");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), "invalid email or password");
}

#[rstest]
#[tokio::test]
async fn login_issues_a_token_expiring_in_a_day(mut deps: Collaborators) {
    let id = UserId::generate();
    deps.users
        .expect_find_credentials_by_email()
        .withf(|email| email.as_ref() == "ada@example.com")
        .return_once(move |_| {
            Ok(Some(UserCredentials {
                user: sample_user(id),
                password_hash: PasswordHash::new(REAL_HASH),
            }))
        });
    deps.hasher.expect_verify().returning(|_, _| Ok(true));
    let expected_expiry = fixture_timestamp() + TimeDelta::hours(24);
    deps.tokens
        .expect_issue()
        .withf(move |claims| {
            claims.user_id == id
                && claims.username.as_ref() == "ada"
                && claims.expires_at == expected_expiry
        })
        .times(1)
        .returning(|_| Ok(AccessToken::new("signed")));

    let token = deps
        .build()
        .login(&credentials("ada@example.com", "correct horse"))
        .await
        .expect("login succeeds");

    assert_eq!(token.as_str(), "signed");
}

#[rstest]
#[case(None, 0)]
#[case(Some(3), 3)]
#[tokio::test]
async fn effective_auth_level_defaults_to_none(
    mut deps: Collaborators,
    #[case] stored: Option<i32>,
    #[case] expected: i32,
) {
    deps.users.expect_max_auth_level().return_once(move |_| {
        Ok(stored.map(|level| AuthLevel::new(level).expect("valid level")))
    });
    deps.cache.expect_get().never();

    let level = deps
        .build()
        .effective_auth_level(&UserId::generate())
        .await
        .expect("level resolves");

    assert_eq!(level.value(), expected);
}

fn change_request(user_id: UserId, items: &[(RoleId, RoleChangeAction)]) -> ChangeRoleRequest {
    ChangeRoleRequest {
        user_id,
        items: items
            .iter()
            .map(|(role_id, action)| RoleChangeItem {
                role_id: *role_id,
                action: *action,
            })
            .collect(),
    }
}

#[rstest]
#[tokio::test]
async fn change_roles_attaches_and_detaches_then_commits(deps: Collaborators) {
    let (add, remove) = (RoleId::generate(), RoleId::generate());
    let store = StubUserRoleStore::with_user(vec![add, remove]);
    let request = change_request(
        UserId::generate(),
        &[(add, RoleChangeAction::Add), (remove, RoleChangeAction::Remove)],
    );

    deps.into_service(store.clone())
        .change_roles(request)
        .await
        .expect("roles changed");

    let log = store.log();
    assert_eq!(log.attached, vec![add]);
    assert_eq!(log.detached, vec![remove]);
    assert!(log.committed);
    assert!(!log.rolled_back);
}

#[rstest]
#[tokio::test]
async fn change_roles_rolls_back_when_a_role_is_missing(deps: Collaborators) {
    let (valid, missing) = (RoleId::generate(), RoleId::generate());
    let store = StubUserRoleStore::with_user(vec![valid]);
    let request = change_request(
        UserId::generate(),
        &[(valid, RoleChangeAction::Add), (missing, RoleChangeAction::Add)],
    );

    let err = deps
        .into_service(store.clone())
        .change_roles(request)
        .await
        .expect_err("missing role aborts");

    assert_eq!(err.code(), ErrorCode::NotFound);
    let log = store.log();
    assert!(log.attached.is_empty());
    assert!(log.rolled_back);
    assert!(!log.committed);
}

#[rstest]
#[tokio::test]
async fn change_roles_stops_before_role_lookups_when_the_user_is_missing(deps: Collaborators) {
    let role = RoleId::generate();
    let store = StubUserRoleStore {
        known_roles: vec![role],
        ..StubUserRoleStore::default()
    };
    let request = change_request(UserId::generate(), &[(role, RoleChangeAction::Add)]);

    let err = deps
        .into_service(store.clone())
        .change_roles(request)
        .await
        .expect_err("missing user aborts");

    assert_eq!(err.code(), ErrorCode::NotFound);
    let log = store.log();
    assert!(log.roles_looked_up.is_empty());
    assert!(log.rolled_back);
}

#[rstest]
#[tokio::test]
async fn change_roles_rolls_back_when_attaching_fails(deps: Collaborators) {
    let (add, remove) = (RoleId::generate(), RoleId::generate());
    let store = StubUserRoleStore {
        fail_attach: true,
        ..StubUserRoleStore::with_user(vec![add, remove])
    };
    let request = change_request(
        UserId::generate(),
        &[(add, RoleChangeAction::Add), (remove, RoleChangeAction::Remove)],
    );

    let err = deps
        .into_service(store.clone())
        .change_roles(request)
        .await
        .expect_err("attach failure aborts");

    assert_eq!(err.code(), ErrorCode::InternalError);
    let log = store.log();
    assert!(log.detached.is_empty());
    assert!(log.rolled_back);
    assert!(!log.committed);
}
