// User service: approval administration and admin bootstrap
// Decision: Employee numbers are exactly six ASCII alphanumerics

use crate::storage::{CreateUserRow, StorageBackend, UserRow};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use teamcal_core::{ApprovalStatus, Role, User};

use super::error::{ServiceError, ServiceResult};

static EMPLOYEE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{6}$").expect("valid employee number pattern"));

pub fn is_valid_employee_number(value: &str) -> bool {
    EMPLOYEE_NUMBER.is_match(value)
}

pub struct UserService {
    db: Arc<StorageBackend>,
}

impl UserService {
    pub fn new(db: Arc<StorageBackend>) -> Self {
        Self { db }
    }

    pub async fn list(&self, status: Option<ApprovalStatus>) -> ServiceResult<Vec<User>> {
        let status = status.map(|s| s.to_string());
        let rows = self.db.list_users(status.as_deref()).await?;
        Ok(rows.into_iter().map(Self::row_to_user).collect())
    }

    pub async fn update_status(&self, id: i64, status: ApprovalStatus) -> ServiceResult<User> {
        let row = self
            .db
            .update_user_status(id, &status.to_string())
            .await?
            .ok_or(ServiceError::NotFound("user"))?;

        tracing::info!(user_id = id, status = %status, "User status updated");
        Ok(Self::row_to_user(row))
    }

    /// Make sure an approved admin account exists for the given employee number.
    pub async fn ensure_admin(&self, employee_number: &str, name: &str) -> ServiceResult<User> {
        let employee_number = employee_number.trim();
        if !is_valid_employee_number(employee_number) {
            return Err(ServiceError::validation(format!(
                "employeeNumber must be 6 letters or digits (got '{employee_number}')"
            )));
        }

        if let Some(mut existing) = self.db.get_user_by_employee_number(employee_number).await? {
            if Role::from(existing.role.as_str()) != Role::Admin {
                existing = self
                    .db
                    .update_user_role(existing.id, &Role::Admin.to_string())
                    .await?
                    .ok_or(ServiceError::NotFound("user"))?;
                tracing::warn!(user_id = existing.id, "Bootstrap promoted existing user to admin");
            }
            if ApprovalStatus::from(existing.status.as_str()) != ApprovalStatus::Approved {
                return self.update_status(existing.id, ApprovalStatus::Approved).await;
            }
            return Ok(Self::row_to_user(existing));
        }

        let row = self
            .db
            .create_user(CreateUserRow {
                employee_number: employee_number.to_string(),
                name: name.to_string(),
                role: Role::Admin.to_string(),
                status: ApprovalStatus::Approved.to_string(),
            })
            .await?
            .ok_or_else(|| ServiceError::conflict("Employee number already registered"))?;

        tracing::info!(user_id = row.id, "Bootstrap admin created");
        Ok(Self::row_to_user(row))
    }

    fn row_to_user(row: UserRow) -> User {
        User {
            id: row.id,
            employee_number: row.employee_number,
            name: row.name,
            role: Role::from(row.role.as_str()),
            status: ApprovalStatus::from(row.status.as_str()),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
