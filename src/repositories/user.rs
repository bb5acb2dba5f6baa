use deadpool_postgres::{Pool, Transaction};
use crate::{
    error::{AppError, Result},
    models::user::User,
};

/// Inserts a new user inside the registration transaction.
pub async fn insert(
    tx: &Transaction<'_>,
    dni: &str,
    email: &str,
    password_hash: &str,
    name: &str,
    profile_picture: Option<&str>,
) -> Result<User> {
    let row = tx
        .query_one(
            r#"
            INSERT INTO users (dni, email, password, name, profile_picture)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, dni, email, password, name, profile_picture, created_at
            "#,
            &[&dni, &email, &password_hash, &name, &profile_picture],
        )
        .await
        .map_err(|e| {
            AppError::from_constraint(e, "DNI or email already registered", "Invalid user data")
        })?;
    Ok(User::try_from(&row)?)
}

/// Finds a user by their ID.
pub async fn find_by_id(pool: &Pool, user_id: i64) -> Result<Option<User>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT id, dni, email, password, name, profile_picture, created_at
            FROM users
            WHERE id = $1
            "#,
            &[&user_id],
        )
        .await?;
    row.map(|r| User::try_from(&r).map_err(AppError::from)).transpose()
}

/// Finds a user by their national ID.
pub async fn find_by_dni(pool: &Pool, dni: &str) -> Result<Option<User>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT id, dni, email, password, name, profile_picture, created_at
            FROM users
            WHERE dni = $1
            "#,
            &[&dni],
        )
        .await?;
    row.map(|r| User::try_from(&r).map_err(AppError::from)).transpose()
}

/// Updates the profile fields that are `Some`, leaving the rest untouched.
pub async fn update_profile(
    pool: &Pool,
    user_id: i64,
    email: Option<&str>,
    name: Option<&str>,
    profile_picture: Option<&str>,
) -> Result<()> {
    let client = pool.get().await?;
    let updated = client
        .execute(
            r#"
            UPDATE users
            SET
                email = COALESCE($1, email),
                name = COALESCE($2, name),
                profile_picture = COALESCE($3, profile_picture)
            WHERE id = $4
            "#,
            &[&email, &name, &profile_picture, &user_id],
        )
        .await
        .map_err(|e| AppError::from_constraint(e, "Email already registered", "Invalid user data"))?;

    if updated == 0 {
        return Err(AppError::NotFound("User not found"));
    }
    Ok(())
}

/// Replaces a user's password hash.
pub async fn update_password(tx: &Transaction<'_>, user_id: i64, password_hash: &str) -> Result<()> {
    let updated = tx
        .execute(
            "UPDATE users SET password = $1 WHERE id = $2",
            &[&password_hash, &user_id],
        )
        .await?;

    if updated == 0 {
        return Err(AppError::NotFound("User not found"));
    }
    Ok(())
}

/// Deletes a user; their sessions go with them (`ON DELETE CASCADE`).
pub async fn delete(pool: &Pool, user_id: i64) -> Result<()> {
    let client = pool.get().await?;
    let deleted = client
        .execute("DELETE FROM users WHERE id = $1", &[&user_id])
        .await?;

    if deleted == 0 {
        return Err(AppError::NotFound("User not found"));
    }
    Ok(())
}
