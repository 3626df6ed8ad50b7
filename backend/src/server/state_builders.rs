//! Wiring of stores, cache and credential adapters into the HTTP state.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::warn;

use todo_backend::domain::ports::{
    Cache, PasswordHasherError, RoleRepository, TodoRepository, UserRepository, UserRoleStore,
};
use todo_backend::domain::{
    AuthLevel, CacheAside, CredentialServices, RoleService, TodoService, UserService,
};
use todo_backend::inbound::http::state::{HttpState, HttpStatePorts};
use todo_backend::outbound::cache::InMemoryCache;
use todo_backend::outbound::memory::InMemoryStore;
use todo_backend::outbound::persistence::{
    DieselRoleRepository, DieselTodoRepository, DieselUserRepository, DieselUserRoleStore,
};
use todo_backend::outbound::security::{Argon2PasswordHasher, JwtTokenIssuer};

use super::ServerConfig;

/// Store adapters backing the three services.
struct Stores<U, S, R, T> {
    users: Arc<U>,
    user_roles: Arc<S>,
    roles: Arc<R>,
    todos: Arc<T>,
}

fn build_services<U, S, R, T>(
    stores: Stores<U, S, R, T>,
    cache: CacheAside,
    credentials: CredentialServices,
    clock: Arc<dyn Clock>,
    admin_level: AuthLevel,
) -> HttpState
where
    U: UserRepository + 'static,
    S: UserRoleStore + 'static,
    R: RoleRepository + 'static,
    T: TodoRepository + 'static,
{
    let tokens = credentials.tokens.clone();
    let users = Arc::new(UserService::new(
        stores.users,
        stores.user_roles,
        cache.clone(),
        credentials,
        clock.clone(),
    ));
    let roles = Arc::new(RoleService::new(stores.roles, cache.clone(), clock.clone()));
    let todos = Arc::new(TodoService::new(stores.todos, cache, clock));

    HttpState::new(
        HttpStatePorts {
            login: users.clone(),
            authorization: users.clone(),
            tokens,
            users: users.clone(),
            users_command: users,
            roles: roles.clone(),
            roles_command: roles,
            todos: todos.clone(),
            todos_command: todos,
        },
        admin_level,
    )
}

/// Build the HTTP state from the configured backends.
///
/// # Errors
///
/// Fails when the password hasher cannot be initialised.
pub(crate) fn build_http_state(config: &ServerConfig) -> Result<HttpState, PasswordHasherError> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let cache: Arc<dyn Cache> = match &config.redis {
        Some(redis) => Arc::new(redis.clone()),
        None => {
            warn!("no Redis URL configured; using the in-memory cache (development only)");
            Arc::new(InMemoryCache::new(clock.clone()))
        }
    };
    let cache = CacheAside::new(cache, config.cache_ttl);

    let credentials = CredentialServices {
        hasher: Arc::new(Argon2PasswordHasher::new()?),
        tokens: Arc::new(JwtTokenIssuer::new(&config.jwt_secret, clock.clone())),
    };

    let state = match &config.db_pool {
        Some(pool) => build_services(
            Stores {
                users: Arc::new(DieselUserRepository::new(pool.clone())),
                user_roles: Arc::new(DieselUserRoleStore::new(pool.clone())),
                roles: Arc::new(DieselRoleRepository::new(pool.clone())),
                todos: Arc::new(DieselTodoRepository::new(pool.clone())),
            },
            cache,
            credentials,
            clock,
            config.admin_level,
        ),
        None => {
            warn!("no database URL configured; using the in-memory store (development only)");
            let store = Arc::new(InMemoryStore::new());
            build_services(
                Stores {
                    users: store.clone(),
                    user_roles: store.clone(),
                    roles: store.clone(),
                    todos: store,
                },
                cache,
                credentials,
                clock,
                config.admin_level,
            )
        }
    };
    Ok(state)
}
