// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, uri::PathAndQuery, Uri},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::{common::error::AppError, config::AppState, models::auth::AuthContext};

/// Nomes aceitos para o parâmetro de empresa na query string.
const COMPANY_QUERY_KEYS: [&str; 3] = ["company_id", "companyId", "empresa_id"];

// O middleware em si
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Cabeçalho ausente ou malformado: os dois casos são 401.
    let bearer = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AppError::Unauthorized)?;

    let context = app_state.auth_service.authenticate(bearer.token()).await?;

    // Quem manda a empresa é o token: sobrescreve o que vier na query.
    let rewritten = rewrite_company_query(request.uri(), context.company_id)?;
    *request.uri_mut() = rewritten;

    // Insere o contexto nos "extensions" da requisição
    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

/// Remove qualquer `company_id`/`empresa_id` da query e acrescenta o do token.
pub fn rewrite_company_query(uri: &Uri, company_id: i64) -> Result<Uri, AppError> {
    let mut pairs: Vec<&str> = uri
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| {
            let key = pair.split('=').next().unwrap_or_default();
            !COMPANY_QUERY_KEYS.contains(&key)
        })
        .collect();
    let forced = format!("company_id={company_id}");
    pairs.push(&forced);

    let path_and_query = format!("{}?{}", uri.path(), pairs.join("&"));

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(
        PathAndQuery::try_from(path_and_query)
            .map_err(|e| anyhow::anyhow!("Falha ao reescrever a URI: {}", e))?,
    );
    Uri::from_parts(parts).map_err(|e| anyhow::anyhow!("Falha ao reescrever a URI: {}", e).into())
}

// Extrator para obter o contexto autenticado diretamente nos handlers
pub struct AuthenticatedUser(pub AuthContext);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_supplied_company_is_replaced() {
        let uri: Uri = "/api/products?empresa_id=99&includeDisabled=true&company_id=98".parse().unwrap();
        let rewritten = rewrite_company_query(&uri, 7).unwrap();
        assert_eq!(rewritten.path(), "/api/products");
        assert_eq!(rewritten.query(), Some("includeDisabled=true&company_id=7"));
    }

    #[test]
    fn company_is_added_when_query_is_empty() {
        let uri: Uri = "/api/sales".parse().unwrap();
        let rewritten = rewrite_company_query(&uri, 3).unwrap();
        assert_eq!(rewritten.query(), Some("company_id=3"));
    }
}
