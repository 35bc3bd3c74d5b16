use anyhow::Context;
use diesel::{
    ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl, SelectableHelper,
    SqliteConnection,
    result::{DatabaseErrorKind, Error as DieselError},
};
use tracing::{debug, info, warn};

use crate::{
    app_error::AppError,
    auth,
    models::{AccountEntity, AccountSummary, CreateAccountEntity, Role},
    schema::accounts,
    validation::Credentials,
};

/// Create a staff account.
///
/// A taken username yields `AppError::DuplicateUsername` and leaves the
/// existing row untouched.
pub fn register(
    conn: &mut SqliteConnection,
    username: &str,
    password: &str,
    role: Role,
) -> Result<AccountEntity, AppError> {
    let credentials = Credentials::new(username, password)?;
    let password_hash = auth::hash_password(credentials.password)?;

    let account: Result<AccountEntity, DieselError> = diesel::insert_into(accounts::table)
        .values(CreateAccountEntity {
            username: credentials.username,
            password_hash: &password_hash,
            role,
        })
        .returning(AccountEntity::as_returning())
        .get_result(conn);

    match account {
        Ok(account) => {
            info!("Account '{}' created with role {}", account.username, account.role);
            Ok(account)
        }
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            warn!("Signup refused: username '{}' already exists", credentials.username);
            Err(AppError::DuplicateUsername(credentials.username.to_string()))
        }
        Err(err) => Err(AppError::Other(
            anyhow::Error::new(err).context("Failed to create account"),
        )),
    }
}

/// Look up an account by username and check its password.
///
/// Unknown usernames and wrong passwords both come back as `None`.
pub fn authenticate(
    conn: &mut SqliteConnection,
    username: &str,
    password: &str,
) -> Result<Option<AccountEntity>, AppError> {
    let credentials = Credentials::new(username, password)?;

    let account: Option<AccountEntity> = accounts::table
        .filter(accounts::username.eq(credentials.username))
        .select(AccountEntity::as_select())
        .first(conn)
        .optional()
        .context("Failed to look up account")?;

    let Some(account) = account else {
        debug!("Login failed: no account named '{}'", credentials.username);
        return Ok(None);
    };

    if auth::verify_password(credentials.password, &account.password_hash)? {
        info!("Account '{}' logged in", account.username);
        Ok(Some(account))
    } else {
        debug!("Login failed: wrong password for '{}'", account.username);
        Ok(None)
    }
}

/// Fetch all registered staff, oldest first.
pub fn list_accounts(conn: &mut SqliteConnection) -> Result<Vec<AccountSummary>, AppError> {
    let accounts = accounts::table
        .order_by(accounts::id.asc())
        .select(AccountSummary::as_select())
        .load(conn)
        .context("Failed to get accounts")?;

    Ok(accounts)
}
