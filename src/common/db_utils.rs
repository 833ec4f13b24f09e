use crate::common::error::AppError;

// ---
// Helpers da fronteira com o driver
// ---

/// Converte uma violação de UNIQUE em `Conflict`, identificando o campo.
///
/// O SQLite não expõe o nome da constraint, então quem chama informa qual
/// campo único aquela escrita pode violar.
pub(crate) fn unique_violation(field: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return AppError::Conflict { field };
            }
        }
        e.into()
    }
}

/// Trata campos de texto opcionais: vazio ou só espaços vira `None`.
pub(crate) fn blank_to_none(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
