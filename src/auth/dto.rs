use serde::{Deserialize, Serialize};

use crate::validation::{check_email, FieldError, Validate};

fn default_true() -> bool {
    true
}

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    /// Plaintext; older clients send it as `password_hash`.
    #[serde(alias = "password_hash")]
    pub password: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), FieldError> {
        check_email("email", self.email.trim())?;
        if self.password.is_empty() {
            return Err(FieldError::new("password", "must not be empty"));
        }
        Ok(())
    }
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), FieldError> {
        Ok(())
    }
}

/// Returned after register or login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".into(),
        }
    }
}

/// Surrounding whitespace only; case is kept as submitted.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_accepts_legacy_password_field() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"name":"A","email":"a@x.com","password_hash":"pw"}"#,
        )
        .unwrap();
        assert_eq!(req.password, "pw");
        assert!(req.is_active);
    }

    #[test]
    fn register_rejects_bad_email() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"name":"A","email":"nope","password":"pw"}"#).unwrap();
        assert_eq!(req.validate().unwrap_err().field, "email");
    }

    #[test]
    fn token_response_is_bearer() {
        let json = serde_json::to_value(TokenResponse::bearer("t".into())).unwrap();
        assert_eq!(json["token_type"], "bearer");
        assert_eq!(json["access_token"], "t");
    }

    #[test]
    fn emails_are_trimmed_but_keep_case() {
        assert_eq!(normalize_email("  Alice@Example.com "), "Alice@Example.com");
    }
}
