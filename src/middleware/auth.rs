use std::fmt;
use std::str::FromStr;

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Candidate,
    Company,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Candidate => "candidate",
            Role::Company => "company",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Role::Candidate, Role::Company, Role::Admin]
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown role '{}'", s))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub role: Option<String>,
}

/// Caller identity resolved from a verified bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

impl TryFrom<Claims> for AuthUser {
    type Error = Error;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&claims.sub)
            .map_err(|_| Error::Unauthorized("Token subject is not a valid id".to_string()))?;
        let role = claims
            .role
            .as_deref()
            .ok_or_else(|| Error::Unauthorized("Token carries no role".to_string()))?
            .parse::<Role>()
            .map_err(Error::Unauthorized)?;
        Ok(Self { id, role })
    }
}

/// Verifies an HS256 token and resolves the caller.
pub fn decode_claims(token: &str, secret: &str) -> Result<AuthUser, Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "rejected bearer token");
        Error::Unauthorized("Invalid or expired token".to_string())
    })?;
    AuthUser::try_from(data.claims)
}

fn authenticate(req: &Request) -> Result<AuthUser, Error> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| Error::Unauthorized("Missing authorization header".to_string()))?;
    let auth_str = auth_header
        .to_str()
        .map_err(|_| Error::Unauthorized("Malformed authorization header".to_string()))?;
    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| Error::Unauthorized("Unsupported authorization scheme".to_string()))?;

    let config = crate::config::get_config();
    decode_claims(token, &config.jwt_secret)
}

/// Authenticates the caller and, when `allowed` is non-empty, checks the role.
pub async fn require_roles(mut req: Request, next: Next, allowed: &[Role]) -> Response {
    let user = match authenticate(&req) {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };
    if !allowed.is_empty() && !allowed.contains(&user.role) {
        return Error::Forbidden(format!("This endpoint is not available to {} accounts", user.role))
            .into_response();
    }
    req.extensions_mut().insert(user);
    next.run(req).await
}

pub async fn require_bearer_auth(req: Request, next: Next) -> Response {
    require_roles(req, next, &[]).await
}

pub async fn require_candidate(req: Request, next: Next) -> Response {
    require_roles(req, next, &[Role::Candidate]).await
}

pub async fn require_company(req: Request, next: Next) -> Response {
    require_roles(req, next, &[Role::Company]).await
}

pub async fn require_admin(req: Request, next: Next) -> Response {
    require_roles(req, next, &[Role::Admin]).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "unit-test-secret";

    fn token(sub: &str, role: Option<&str>, exp_offset: i64, secret: &str) -> String {
        let exp = (chrono::Utc::now().timestamp() + exp_offset) as usize;
        let claims = Claims {
            sub: sub.to_string(),
            exp,
            role: role.map(str::to_string),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn valid_token_resolves_user() {
        let id = Uuid::new_v4();
        let user = decode_claims(&token(&id.to_string(), Some("Company"), 600, SECRET), SECRET).unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.role, Role::Company);
    }

    #[test]
    fn expired_or_foreign_tokens_are_rejected() {
        let id = Uuid::new_v4().to_string();
        let expired = token(&id, Some("candidate"), -3600, SECRET);
        assert!(matches!(decode_claims(&expired, SECRET), Err(Error::Unauthorized(_))));

        let foreign = token(&id, Some("candidate"), 600, "someone-else");
        assert!(matches!(decode_claims(&foreign, SECRET), Err(Error::Unauthorized(_))));
    }

    #[test]
    fn subject_and_role_must_be_well_formed() {
        let bad_sub = token("42", Some("admin"), 600, SECRET);
        assert!(decode_claims(&bad_sub, SECRET).is_err());

        let id = Uuid::new_v4().to_string();
        assert!(decode_claims(&token(&id, None, 600, SECRET), SECRET).is_err());
        assert!(decode_claims(&token(&id, Some("hr"), 600, SECRET), SECRET).is_err());
    }
}
