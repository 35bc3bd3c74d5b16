use cafe_pos::{app_error::AppError, models::Role, store::accounts};
use diesel::SqliteConnection;

use super::output::Output;

pub fn signup(
    conn: &mut SqliteConnection,
    out: &Output,
    username: &str,
    password: &str,
    role: Role,
) -> Result<(), AppError> {
    let account = accounts::register(conn, username, password, role)?;
    out.emit(&account, |out| {
        out.message(&format!(
            "Account #{} '{}' created ({})",
            account.id, account.username, account.role
        ))
    })
}

pub fn staff(conn: &mut SqliteConnection, out: &Output) -> Result<(), AppError> {
    let accounts = accounts::list_accounts(conn)?;
    out.emit(&accounts, |out| {
        let rows = accounts
            .iter()
            .map(|a| vec![a.id.to_string(), a.username.clone(), a.role.to_string()])
            .collect();
        out.table(&["ID", "Username", "Role"], rows);
    })
}
