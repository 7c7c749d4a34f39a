// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use crate::app::errors::{AppError, AppErrorKind, AppResult};
use crate::app::services::{password, validation};
use crate::app::types::{NewUser, UserFilter, UserRecord};

use super::UseCases;

/// Values for `user configure`. Unset name fields keep their stored value
/// on reconfigure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserConfiguration {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub institution: Option<String>,
    /// Plain-text password to hash. `None` leaves the password untouched.
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ConfigureUserOutcome {
    pub user: UserRecord,
    pub already_present: bool,
}

impl UseCases {
    /// Builds an unsaved user. Uniqueness is only checked by [`Self::store_user`].
    pub fn create_user(&self, email: &str) -> NewUser {
        NewUser::new(email.trim())
    }

    pub async fn store_user(&self, user: &NewUser) -> AppResult<UserRecord> {
        let email = validation::validate_email(&user.email)?;
        let mut user = user.clone();
        user.email = email;
        let id = self.users.insert_user(&user).await?;
        log::debug!("stored user id={id} email={}", user.email);
        self.find_users(None, Some(id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::internal(format!("user {id} vanished after insert")))
    }

    /// Exactly one user with this email.
    pub async fn get_user(&self, email: &str) -> AppResult<UserRecord> {
        let mut matches = self.find_users(Some(email), None).await?;
        match matches.len() {
            0 => Err(AppError::not_existent(format!(
                "No user with email '{email}' found"
            ))),
            1 => Ok(matches.remove(0)),
            n => Err(AppError::multiple_objects(format!(
                "{n} users found with email '{email}'"
            ))),
        }
    }

    /// Zero or more matches; never fails on an empty result.
    pub async fn find_users(
        &self,
        email: Option<&str>,
        id: Option<i64>,
    ) -> AppResult<Vec<UserRecord>> {
        self.users
            .find_users(&UserFilter {
                email: email.map(|value| value.trim().to_string()),
                id,
            })
            .await
    }

    pub async fn all_users(&self) -> AppResult<Vec<UserRecord>> {
        self.users.find_users(&UserFilter::default()).await
    }

    /// The user named by the configured default email, or `None` when unset
    /// or not resolvable to exactly one user.
    pub async fn get_automatic_user(&self) -> AppResult<Option<UserRecord>> {
        let Some(email) = self.default_user_email.as_deref() else {
            return Ok(None);
        };
        match self.get_user(email).await {
            Ok(user) => Ok(Some(user)),
            Err(err)
                if matches!(
                    err.kind(),
                    AppErrorKind::NotExistent | AppErrorKind::MultipleObjects
                ) =>
            {
                log::debug!("automatic user unavailable: {err}");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// `email` when given, otherwise the automatic user.
    pub async fn resolve_user(&self, email: Option<&str>) -> AppResult<UserRecord> {
        if let Some(email) = email {
            return self.get_user(email).await;
        }
        self.get_automatic_user().await?.ok_or_else(|| {
            AppError::not_existent(
                "no default user is configured; set default_user_email or pass --user",
            )
        })
    }

    /// Creates or updates a user. An existing user is only updated when
    /// `allow_existing` is set; otherwise this is a uniqueness error.
    pub async fn configure_user(
        &self,
        config: &UserConfiguration,
        allow_existing: bool,
    ) -> AppResult<ConfigureUserOutcome> {
        let email = validation::validate_email(&config.email)?;
        let password_hash = config
            .password
            .as_deref()
            .map(password::hash_password)
            .transpose()?;
        let existing = self.find_users(Some(&email), None).await?.into_iter().next();

        match existing {
            Some(current) => {
                if !allow_existing {
                    return Err(AppError::uniqueness(format!(
                        "User '{email}' is already present; pass --force-reconfigure to update it"
                    )));
                }
                let update = NewUser {
                    email: email.clone(),
                    first_name: config
                        .first_name
                        .clone()
                        .unwrap_or_else(|| current.first_name.clone()),
                    last_name: config
                        .last_name
                        .clone()
                        .unwrap_or_else(|| current.last_name.clone()),
                    institution: config
                        .institution
                        .clone()
                        .unwrap_or_else(|| current.institution.clone()),
                    password_hash: password_hash.or_else(|| current.password_hash.clone()),
                    is_active: current.is_active,
                };
                self.users.update_user(current.id, &update).await?;
                let user = self.get_user(&email).await?;
                Ok(ConfigureUserOutcome {
                    user,
                    already_present: true,
                })
            }
            None => {
                let mut new_user = self.create_user(&email);
                new_user.first_name = config.first_name.clone().unwrap_or_default();
                new_user.last_name = config.last_name.clone().unwrap_or_default();
                new_user.institution = config.institution.clone().unwrap_or_default();
                new_user.password_hash = password_hash;
                let user = self.store_user(&new_user).await?;
                Ok(ConfigureUserOutcome {
                    user,
                    already_present: false,
                })
            }
        }
    }
}
