//! Caller identity and capability checks.
//!
//! Tokens are minted by the external identity provider; this service only
//! verifies them and reads the capability claims.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Named permission an actor must hold for a gated mutating operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ManageBooks,
    ManageAuthors,
    ManageTags,
    ManageStudents,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ManageBooks => "manage_books",
            Capability::ManageAuthors => "manage_authors",
            Capability::ManageTags => "manage_tags",
            Capability::ManageStudents => "manage_students",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manage_books" => Ok(Capability::ManageBooks),
            "manage_authors" => Ok(Capability::ManageAuthors),
            "manage_tags" => Ok(Capability::ManageTags),
            "manage_students" => Ok(Capability::ManageStudents),
            _ => Err(format!("Invalid capability: {}", s)),
        }
    }
}

/// JWT claims presented by a caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorClaims {
    pub sub: String,
    #[serde(default)]
    pub capabilities: Vec<Capability>,
    pub exp: i64,
    pub iat: i64,
}

impl ActorClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}

/// Explicit authorization check: does `actor` hold `capability`?
pub fn authorize(actor: &ActorClaims, capability: Capability) -> bool {
    actor.capabilities.contains(&capability)
}

/// Authorization check for the top of gated handlers
pub fn require(actor: &ActorClaims, capability: Capability) -> Result<(), AppError> {
    if authorize(actor, capability) {
        Ok(())
    } else {
        Err(AppError::PermissionDenied(format!(
            "Missing capability: {}",
            capability
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(capabilities: Vec<Capability>) -> ActorClaims {
        ActorClaims {
            sub: "librarian".to_string(),
            capabilities,
            exp: 4102444800,
            iat: 0,
        }
    }

    #[test]
    fn authorize_accepts_a_held_capability() {
        let actor = actor(vec![Capability::ManageBooks, Capability::ManageAuthors]);
        assert!(authorize(&actor, Capability::ManageBooks));
        assert!(authorize(&actor, Capability::ManageAuthors));
    }

    #[test]
    fn authorize_denies_an_absent_capability() {
        let actor = actor(vec![Capability::ManageBooks]);
        assert!(!authorize(&actor, Capability::ManageAuthors));
        assert!(!authorize(&actor, Capability::ManageTags));
    }

    #[test]
    fn require_maps_a_denial_to_permission_denied() {
        let actor = actor(vec![]);
        let err = require(&actor, Capability::ManageBooks).unwrap_err();
        assert!(matches!(err, crate::error::AppError::PermissionDenied(_)));
    }

    #[test]
    fn capability_slug_round_trips() {
        for cap in [
            Capability::ManageBooks,
            Capability::ManageAuthors,
            Capability::ManageTags,
            Capability::ManageStudents,
        ] {
            assert_eq!(cap.as_str().parse::<Capability>().unwrap(), cap);
        }
        assert!("manage_everything".parse::<Capability>().is_err());
    }

    #[test]
    fn token_round_trips_with_matching_secret() {
        let claims = actor(vec![Capability::ManageBooks]);
        let token = claims.create_token("test-secret").unwrap();
        let parsed = ActorClaims::from_token(&token, "test-secret").unwrap();
        assert_eq!(parsed.sub, "librarian");
        assert_eq!(parsed.capabilities, vec![Capability::ManageBooks]);
        assert!(ActorClaims::from_token(&token, "other-secret").is_err());
    }
}
