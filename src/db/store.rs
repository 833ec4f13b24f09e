// src/db/store.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tokio::sync::Mutex;

use crate::common::error::AppError;

static GLOBAL_MIGRATOR: Migrator = sqlx::migrate!("./migrations/global");
static TENANT_MIGRATOR: Migrator = sqlx::migrate!("./migrations/tenant");

/// Abre (criando se preciso) um arquivo SQLite em modo WAL.
pub async fn open_sqlite(path: &Path, max_connections: u32) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        // Em conflito de escrita, espera em vez de falhar na hora.
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Abre o registro global (planos, empresas, usuários) e aplica o esquema.
pub async fn open_global_store(data_dir: &Path) -> Result<SqlitePool, AppError> {
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("Falha ao criar o diretório de dados {}: {}", data_dir.display(), e))?;

    let pool = open_sqlite(&data_dir.join("global.db"), 4).await?;
    GLOBAL_MIGRATOR.run(&pool).await?;

    tracing::info!("✅ Registro global pronto em {}", data_dir.display());
    Ok(pool)
}

/// Aceita apenas identificadores de empresa positivos.
pub fn validate_tenant_id(tenant_id: i64) -> Result<i64, AppError> {
    if tenant_id <= 0 {
        return Err(AppError::InvalidTenant(tenant_id.to_string()));
    }
    Ok(tenant_id)
}

/// Registro de bancos por empresa.
///
/// Cada empresa tem o seu arquivo `company_<id>.db`, criado na primeira vez
/// que alguém pede por ele. O cache de pools vive aqui (não num global do
/// processo) e a criação é serializada por empresa: duas requisições
/// simultâneas para uma empresa nova resultam em um único arquivo e um único pool.
pub struct TenantRegistry {
    data_dir: PathBuf,
    pool_size: u32,
    stores: DashMap<i64, SqlitePool>,
    creation_locks: DashMap<i64, Arc<Mutex<()>>>,
}

impl TenantRegistry {
    pub fn new(data_dir: impl Into<PathBuf>, pool_size: u32) -> Self {
        Self {
            data_dir: data_dir.into(),
            pool_size: pool_size.max(1),
            stores: DashMap::new(),
            creation_locks: DashMap::new(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn store_path(&self, tenant_id: i64) -> PathBuf {
        self.data_dir.join(format!("company_{tenant_id}.db"))
    }

    /// Devolve o pool da empresa, criando o arquivo e o esquema se necessário.
    pub async fn store(&self, tenant_id: i64) -> Result<SqlitePool, AppError> {
        let tenant_id = validate_tenant_id(tenant_id)?;

        if let Some(pool) = self.cached(tenant_id) {
            return Ok(pool);
        }

        // A Ref do DashMap não pode atravessar o `.await`: clonamos o Arc e soltamos.
        let lock = self.creation_locks.entry(tenant_id).or_default().clone();
        let _guard = lock.lock().await;

        // Outra requisição pode ter criado enquanto esperávamos a trava.
        if let Some(pool) = self.cached(tenant_id) {
            return Ok(pool);
        }

        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| anyhow::anyhow!("Falha ao criar o diretório de dados: {}", e))?;

        let path = self.store_path(tenant_id);
        let pool = open_sqlite(&path, self.pool_size).await?;
        // Idempotente: só aplica o que ainda não foi aplicado neste arquivo.
        TENANT_MIGRATOR.run(&pool).await?;

        self.stores.insert(tenant_id, pool.clone());
        tracing::info!(tenant_id, path = %path.display(), "🗄️ Banco da empresa aberto");

        Ok(pool)
    }

    fn cached(&self, tenant_id: i64) -> Option<SqlitePool> {
        self.stores.get(&tenant_id).map(|entry| entry.value().clone())
    }

    pub fn open_count(&self) -> usize {
        self.stores.len()
    }

    /// Fecha todos os pools abertos (desligamento do processo).
    pub async fn close_all(&self) {
        let pools: Vec<(i64, SqlitePool)> = self
            .stores
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        self.stores.clear();

        for (tenant_id, pool) in pools {
            pool.close().await;
            tracing::debug!(tenant_id, "Banco da empresa fechado");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_tenant_ids() {
        assert!(matches!(validate_tenant_id(0), Err(AppError::InvalidTenant(_))));
        assert!(matches!(validate_tenant_id(-3), Err(AppError::InvalidTenant(_))));
        assert_eq!(validate_tenant_id(42).unwrap(), 42);
    }

    #[test]
    fn store_file_is_named_after_the_company() {
        let registry = TenantRegistry::new("/tmp/pdv", 1);
        assert_eq!(registry.store_path(7), PathBuf::from("/tmp/pdv/company_7.db"));
    }
}
