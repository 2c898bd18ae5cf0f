// src/services/auth.rs

use bcrypt::verify;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    models::auth::{Claims, Role},
};

const TOKEN_HOURS: i64 = 12;

#[derive(Clone)]
pub struct AuthService {
    // Sem hash configurado, as rotas de admin ficam fechadas
    admin_password_hash: Option<String>,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(admin_password_hash: Option<String>, jwt_secret: String) -> Self {
        Self {
            admin_password_hash,
            jwt_secret,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.admin_password_hash.is_some()
    }

    pub async fn login_admin(&self, password: &str) -> Result<String, AppError> {
        let hash = self
            .admin_password_hash
            .clone()
            .ok_or(AppError::AdminNotConfigured)?;

        let password_clone = password.to_owned();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &hash))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            tracing::warn!("Tentativa de login admin com senha errada");
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(Role::Admin)
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        if !self.is_configured() {
            return Err(AppError::AdminNotConfigured);
        }

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        Ok(token_data.claims)
    }

    fn create_token(&self, role: Role) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::hours(TOKEN_HOURS);

        let claims = Claims {
            sub: "admin".to_string(),
            role,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
