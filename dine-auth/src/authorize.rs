// Role gate for privileged operations.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::identity::{extract_bearer_token, AuthError, Identity};
use crate::jwt::IdentityResolver;

pub const SUPER_ADMIN_ROLE: &str = "super_admin";

/// Answers whether a user holds a role, from wherever roles are stored.
#[async_trait]
pub trait RoleLookup: Send + Sync {
    async fn has_role(&self, user_id: &str, role: &str) -> anyhow::Result<bool>;
}

/// Resolve the caller behind the `Authorization` header.
pub async fn authenticate_headers(
    resolver: &dyn IdentityResolver,
    headers: &HashMap<String, String>,
) -> Result<Identity, AuthError> {
    let token = extract_bearer_token(headers).ok_or(AuthError::NotAuthenticated)?;
    resolver
        .resolve(&token)
        .await
        .map_err(|_| AuthError::NotAuthenticated)
}

/// Authenticate the caller, then require `role`.
///
/// Each step returns on failure: no identity is `NotAuthenticated`, a
/// failed role read is `Upstream`, no matching role row is `Forbidden`.
pub async fn authorize(
    resolver: &dyn IdentityResolver,
    roles: &dyn RoleLookup,
    headers: &HashMap<String, String>,
    role: &str,
) -> Result<Identity, AuthError> {
    let identity = authenticate_headers(resolver, headers).await?;

    let allowed = roles
        .has_role(&identity.user_id, role)
        .await
        .map_err(AuthError::Upstream)?;

    if !allowed {
        tracing::info!(user = %identity.user_id, role, "role check denied");
        return Err(AuthError::Forbidden);
    }

    Ok(identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::JwtIdentityResolver;
    use crate::options::JwtOptions;

    struct Roles(Vec<(&'static str, &'static str)>);

    #[async_trait]
    impl RoleLookup for Roles {
        async fn has_role(&self, user_id: &str, role: &str) -> anyhow::Result<bool> {
            Ok(self.0.iter().any(|(u, r)| *u == user_id && *r == role))
        }
    }

    struct Broken;

    #[async_trait]
    impl RoleLookup for Broken {
        async fn has_role(&self, _user_id: &str, _role: &str) -> anyhow::Result<bool> {
            Err(anyhow::anyhow!("relation \"user_roles\" does not exist"))
        }
    }

    fn bearer(resolver: &JwtIdentityResolver, user: &str) -> HashMap<String, String> {
        let token = resolver.sign(user, None, 600).unwrap();
        HashMap::from([("authorization".to_string(), format!("Bearer {token}"))])
    }

    #[tokio::test]
    async fn gate_checks_identity_then_role() {
        let resolver = JwtIdentityResolver::new(JwtOptions::default());
        let roles = Roles(vec![("admin-1", SUPER_ADMIN_ROLE), ("owner-1", "owner")]);

        let missing = authorize(&resolver, &roles, &HashMap::new(), SUPER_ADMIN_ROLE).await;
        assert!(matches!(missing, Err(AuthError::NotAuthenticated)));

        let owner = authorize(&resolver, &roles, &bearer(&resolver, "owner-1"), SUPER_ADMIN_ROLE).await;
        assert!(matches!(owner, Err(AuthError::Forbidden)));

        let admin = authorize(&resolver, &roles, &bearer(&resolver, "admin-1"), SUPER_ADMIN_ROLE)
            .await
            .unwrap();
        assert_eq!(admin.user_id, "admin-1");
    }

    #[tokio::test]
    async fn role_read_failures_are_upstream_errors() {
        let resolver = JwtIdentityResolver::new(JwtOptions::default());
        let err = authorize(&resolver, &Broken, &bearer(&resolver, "u"), SUPER_ADMIN_ROLE)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Upstream(_)));
        assert!(err.to_string().contains("user_roles"));
    }
}
