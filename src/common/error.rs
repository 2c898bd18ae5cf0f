use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::middleware::i18n::Locale;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Quantidade inválida")]
    InvalidQuantity,

    // A operação deixaria o campo abaixo de zero
    #[error("Quantidade negativa no campo {0}")]
    NegativeQuantity(&'static str),

    #[error("Carrinho vazio")]
    EmptyCart,

    #[error("Item não encontrado")]
    ItemNotFound,

    #[error("Pedido não encontrado")]
    OrderNotFound,

    #[error("Linha de pedido não encontrada")]
    LineNotFound,

    #[error("Linha de pedido já recebida")]
    LineAlreadyArrived,

    #[error("Nenhuma linha selecionada")]
    NoLinesSelected,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso admin não configurado")]
    AdminNotConfigured,

    // Mensagem do store repassada literalmente
    #[error("Erro do store: {0}")]
    StoreError(String),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Erro ao gerar PDF: {0}")]
    PdfError(String),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(db_err) => AppError::StoreError(db_err.message().to_string()),
            other => AppError::StoreError(other.to_string()),
        }
    }
}

impl From<genpdf::error::Error> for AppError {
    fn from(e: genpdf::error::Error) -> Self {
        AppError::PdfError(e.to_string())
    }
}

// O erro que chega ao cliente, já traduzido
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidQuantity
            | AppError::NegativeQuantity(_)
            | AppError::EmptyCart
            | AppError::LineAlreadyArrived
            | AppError::NoLinesSelected => StatusCode::BAD_REQUEST,
            AppError::ItemNotFound | AppError::OrderNotFound | AppError::LineNotFound => {
                StatusCode::NOT_FOUND
            }
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::AdminNotConfigured => StatusCode::FORBIDDEN,
            AppError::StoreError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self, locale: &Locale) -> String {
        let it = locale.is_italian();
        let text = match self {
            AppError::ValidationError(_) => {
                if it { "Uno o più campi non sono validi." } else { "One or more fields are invalid." }
            }
            AppError::InvalidQuantity => {
                if it { "Inserisci una quantità valida." } else { "Enter a valid quantity." }
            }
            AppError::NegativeQuantity(_) => {
                if it { "Non puoi andare sotto zero." } else { "Quantity cannot go below zero." }
            }
            AppError::EmptyCart => {
                if it { "Il carrello è vuoto." } else { "The cart is empty." }
            }
            AppError::ItemNotFound => {
                if it { "Articolo non trovato." } else { "Item not found." }
            }
            AppError::OrderNotFound => {
                if it { "Ordine non trovato." } else { "Order not found." }
            }
            AppError::LineNotFound => {
                if it { "Riga d'ordine non trovata." } else { "Order line not found." }
            }
            AppError::LineAlreadyArrived => {
                if it { "Riga d'ordine già arrivata." } else { "Order line already arrived." }
            }
            AppError::NoLinesSelected => {
                if it { "Seleziona almeno una riga." } else { "Select at least one line." }
            }
            AppError::InvalidCredentials => {
                if it { "Password non valida." } else { "Invalid password." }
            }
            AppError::InvalidToken => {
                if it { "Token di accesso non valido o mancante." } else { "Missing or invalid access token." }
            }
            AppError::AdminNotConfigured => {
                if it { "Accesso amministratore non configurato." } else { "Admin access is not configured." }
            }
            // Erros do store são mostrados como vieram
            AppError::StoreError(msg) => return msg.clone(),
            AppError::FontNotFound(_) | AppError::PdfError(_) => {
                if it { "Impossibile generare il PDF." } else { "Could not generate the PDF." }
            }
            _ => {
                if it { "Si è verificato un errore imprevisto." } else { "An unexpected error occurred." }
            }
        };
        text.to_string()
    }

    fn details(&self) -> Option<Value> {
        match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| match &e.message {
                            Some(m) => m.to_string(),
                            None => e.code.to_string(),
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                Some(json!(details))
            }
            AppError::NegativeQuantity(field) => Some(json!({ "field": field })),
            _ => None,
        }
    }

    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Erro no servidor: {}", self);
        }
        ApiError {
            status,
            error: self.message(locale),
            details: self.details(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_keep_the_original_message() {
        let err = AppError::StoreError("duplicate key value violates unique constraint".into());
        let api = err.to_api_error(&Locale("it".into()));
        assert_eq!(api.status, StatusCode::BAD_GATEWAY);
        assert_eq!(api.error, "duplicate key value violates unique constraint");
    }

    #[test]
    fn messages_follow_the_locale() {
        let it = AppError::NegativeQuantity("onHand").to_api_error(&Locale("it".into()));
        let en = AppError::NegativeQuantity("onHand").to_api_error(&Locale("en".into()));
        assert_eq!(it.error, "Non puoi andare sotto zero.");
        assert_eq!(en.error, "Quantity cannot go below zero.");
        assert_eq!(it.status, StatusCode::BAD_REQUEST);
        assert_eq!(it.details, Some(json!({ "field": "onHand" })));
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(AppError::ItemNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::AdminNotConfigured.status(), StatusCode::FORBIDDEN);
    }
}
