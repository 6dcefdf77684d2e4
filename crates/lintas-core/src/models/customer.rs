//! Customer (subscriber) domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{LintasError, LintasResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    Active,
    Inactive,
    Suspended,
}

/// A subscriber on the LINTAS network.
///
/// Customers may carry a RouterOS account (`mikrotik_username`); only
/// those take part in usage sync and monthly billing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    /// Unique contact address; doubles as the login identity in the
    /// customer portal.
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: CustomerStatus,
    /// PPPoE/hotspot username on the RouterOS side.
    pub mikrotik_username: Option<String>,
    /// Subscribed package tier (e.g., `Standard 25Mbps`).
    pub package: Option<String>,
    /// When usage was last pulled from the router for this customer.
    pub last_usage_sync: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCustomer {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Defaults to [`CustomerStatus::Active`] when omitted.
    #[serde(default)]
    pub status: Option<CustomerStatus>,
    #[serde(default)]
    pub mikrotik_username: Option<String>,
    #[serde(default)]
    pub package: Option<String>,
}

/// Fields that can be updated on an existing customer.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateCustomer {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: Option<CustomerStatus>,
    pub mikrotik_username: Option<String>,
    pub package: Option<String>,
    pub last_usage_sync: Option<DateTime<Utc>>,
}

impl CreateCustomer {
    pub fn validate(&self) -> LintasResult<()> {
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        validate_optional_lengths(
            self.phone.as_deref(),
            self.mikrotik_username.as_deref(),
            self.package.as_deref(),
        )
    }
}

impl UpdateCustomer {
    pub fn validate(&self) -> LintasResult<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        validate_optional_lengths(
            self.phone.as_deref(),
            self.mikrotik_username.as_deref(),
            self.package.as_deref(),
        )
    }
}

fn validate_name(name: &str) -> LintasResult<()> {
    if name.trim().is_empty() {
        return Err(LintasError::validation("name", "name is required"));
    }
    if name.len() > 255 {
        return Err(LintasError::validation(
            "name",
            "name must not exceed 255 characters",
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> LintasResult<()> {
    if email.len() > 255 {
        return Err(LintasError::validation(
            "email",
            "email must not exceed 255 characters",
        ));
    }
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    };
    if !valid {
        return Err(LintasError::validation(
            "email",
            "must be a valid email address",
        ));
    }
    Ok(())
}

fn validate_optional_lengths(
    phone: Option<&str>,
    mikrotik_username: Option<&str>,
    package: Option<&str>,
) -> LintasResult<()> {
    if phone.is_some_and(|p| p.len() > 20) {
        return Err(LintasError::validation(
            "phone",
            "phone must not exceed 20 characters",
        ));
    }
    if mikrotik_username.is_some_and(|u| u.len() > 255) {
        return Err(LintasError::validation(
            "mikrotik_username",
            "mikrotik_username must not exceed 255 characters",
        ));
    }
    if package.is_some_and(|p| p.len() > 255) {
        return Err(LintasError::validation(
            "package",
            "package must not exceed 255 characters",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> CreateCustomer {
        CreateCustomer {
            name: "Budi Santoso".into(),
            email: "budi@example.com".into(),
            phone: None,
            address: None,
            status: None,
            mikrotik_username: None,
            package: None,
        }
    }

    #[test]
    fn valid_input_passes() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut c = input();
        c.name = "  ".into();
        let err = c.validate().unwrap_err();
        assert!(matches!(err, LintasError::Validation { field, .. } if field == "name"));
    }

    #[test]
    fn malformed_email_is_rejected() {
        for bad in ["not-an-email", "@example.com", "budi@nodot"] {
            let mut c = input();
            c.email = bad.into();
            let err = c.validate().unwrap_err();
            assert!(
                matches!(err, LintasError::Validation { field, .. } if field == "email"),
                "expected email validation error for {bad:?}"
            );
        }
    }

    #[test]
    fn update_only_checks_provided_fields() {
        let update = UpdateCustomer::default();
        assert!(update.validate().is_ok());

        let update = UpdateCustomer {
            email: Some("broken".into()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn status_uses_lowercase_wire_form() {
        let json = serde_json::to_string(&CustomerStatus::Suspended).unwrap();
        assert_eq!(json, "\"suspended\"");
        let back: CustomerStatus = serde_json::from_str("\"active\"").unwrap();
        assert_eq!(back, CustomerStatus::Active);
    }
}
