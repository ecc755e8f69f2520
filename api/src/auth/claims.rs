use serde::{Deserialize, Serialize};

/// JWT claims. `sub` is the caller's actor id, recorded on verifications and corrections.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn actor(&self) -> &str {
        &self.0.sub
    }
}
