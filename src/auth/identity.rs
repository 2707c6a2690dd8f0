use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimKind {
    Subject,
    Email,
    Name,
    IsAdmin,
    Custom(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub kind: ClaimKind,
    pub value: String,
}

impl Claim {
    pub fn new(kind: ClaimKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Authenticated caller. Built once by a strategy, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    scheme: String,
    claims: Vec<Claim>,
}

/// Profile returned by the user service for a valid token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub user_id: Uuid,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl Identity {
    pub fn new(scheme: impl Into<String>, claims: Vec<Claim>) -> Self {
        Self {
            scheme: scheme.into(),
            claims,
        }
    }

    pub fn from_user(scheme: impl Into<String>, user: &UserInfo) -> Self {
        Self::new(
            scheme,
            vec![
                Claim::new(ClaimKind::Subject, user.user_id.to_string()),
                Claim::new(ClaimKind::Email, user.email.clone()),
                Claim::new(ClaimKind::Name, user.username.clone()),
                Claim::new(ClaimKind::IsAdmin, user.is_admin.to_string()),
            ],
        )
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    pub fn find(&self, kind: &ClaimKind) -> Option<&str> {
        self.claims
            .iter()
            .find(|claim| &claim.kind == kind)
            .map(|claim| claim.value.as_str())
    }

    pub fn subject_id(&self) -> Option<&str> {
        self.find(&ClaimKind::Subject)
    }

    pub fn email(&self) -> Option<&str> {
        self.find(&ClaimKind::Email)
    }

    pub fn name(&self) -> Option<&str> {
        self.find(&ClaimKind::Name)
    }

    pub fn is_admin(&self) -> bool {
        self.find(&ClaimKind::IsAdmin)
            .map(|value| value.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }
}
