use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::api::{FazendaCreateRequest, FazendaResponse, FazendaUpdateRequest, Page, PageRequest};
use crate::cache::{fazenda_key, CacheError, ResponseCache};
use crate::config::AppConfig;
use crate::database::FazendaRepository;
use crate::error::ApiError;

/// Farm CRUD and search, with an optional read-through cache for single lookups.
pub struct FazendaService {
    repo: Arc<dyn FazendaRepository>,
    cache: Option<Arc<dyn ResponseCache>>,
    cache_ttl: Duration,
    default_page_size: u32,
    max_page_size: u32,
    /// Bumped after every committed update. A read that started before the bump
    /// must not leave its copy in the cache.
    write_epoch: AtomicU64,
}

/// Liveness of the backing stores, reported by `/health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub database: String,
    pub cache: String,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.database == "ok" && self.cache != "error"
    }
}

impl FazendaService {
    pub fn new(repo: Arc<dyn FazendaRepository>, cache: Option<Arc<dyn ResponseCache>>, config: &AppConfig) -> Self {
        Self {
            repo,
            cache,
            cache_ttl: Duration::from_secs(config.cache.ttl_secs),
            default_page_size: config.api.default_page_size,
            max_page_size: config.api.max_page_size,
            write_epoch: AtomicU64::new(0),
        }
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Farms ordered by id. Without `page` and `size` the whole table comes back as one page.
    pub async fn list(&self, request: PageRequest) -> Result<Page<FazendaResponse>, ApiError> {
        if request.page.is_none() && request.size.is_none() {
            let content = self.repo.find_page(0, None).await?;
            let total = content.len() as i64;
            let size = content.len() as u32;
            return Ok(Page::new(content, 0, size, total).map(FazendaResponse::from));
        }

        let size = match request.size {
            Some(0) => return Err(ApiError::bad_request("size must be at least 1")),
            Some(size) => size.min(self.max_page_size),
            None => self.default_page_size,
        };
        let page = request.page.unwrap_or(0);
        let offset = page as i64 * size as i64;

        let content = self.repo.find_page(offset, Some(size as i64)).await?;
        let total = self.repo.count().await?;
        debug!(page, size, total, "Listed fazendas");

        Ok(Page::new(content, page, size, total).map(FazendaResponse::from))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<FazendaResponse>, ApiError> {
        let key = fazenda_key(id);

        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&key).await? {
                debug!(id, "Cache hit");
                let response = serde_json::from_str(&hit).map_err(CacheError::from)?;
                return Ok(Some(response));
            }
        }

        let epoch = self.write_epoch.load(Ordering::SeqCst);
        let Some(fazenda) = self.repo.find_by_id(id).await? else {
            return Ok(None);
        };
        let response = FazendaResponse::from(fazenda);
        self.cache_response(&key, &response, epoch).await?;

        Ok(Some(response))
    }

    /// Store a freshly loaded row unless an update committed since `epoch` was read.
    /// The post-write check catches an update whose eviction ran before our `set`.
    async fn cache_response(&self, key: &str, response: &FazendaResponse, epoch: u64) -> Result<(), ApiError> {
        let Some(cache) = &self.cache else {
            return Ok(());
        };
        if self.write_epoch.load(Ordering::SeqCst) != epoch {
            debug!(key, "Skipped caching a read that raced an update");
            return Ok(());
        }

        let value = serde_json::to_string(response).map_err(CacheError::from)?;
        cache.set(key, value, self.cache_ttl).await?;

        if self.write_epoch.load(Ordering::SeqCst) != epoch {
            cache.delete(key).await?;
            debug!(key, "Dropped cached copy that raced an update");
        } else {
            debug!(key, "Cached fazenda");
        }
        Ok(())
    }

    pub async fn create(&self, request: FazendaCreateRequest) -> Result<FazendaResponse, ApiError> {
        request.validate()?;
        let fazenda = self.repo.insert(request.into_new()).await?;
        info!(id = fazenda.id, "Created fazenda");
        Ok(fazenda.into())
    }

    /// Apply the supplied fields and evict the cached copy. `None` when the farm does not exist.
    pub async fn update(&self, id: i64, request: FazendaUpdateRequest) -> Result<Option<FazendaResponse>, ApiError> {
        request.validate()?;

        let Some(mut fazenda) = self.repo.find_by_id(id).await? else {
            return Ok(None);
        };
        request.apply_to(&mut fazenda);

        let Some(saved) = self.repo.update(&fazenda).await? else {
            return Ok(None);
        };
        self.write_epoch.fetch_add(1, Ordering::SeqCst);

        if let Some(cache) = &self.cache {
            cache.delete(&fazenda_key(id)).await?;
        }
        info!(id, "Updated fazenda");
        Ok(Some(saved.into()))
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let removed = self.repo.delete_by_id(id).await?;
        info!(id, removed, "Deleted fazenda");
        Ok(())
    }

    pub async fn find_by_nome(&self, nome: &str) -> Result<Option<FazendaResponse>, ApiError> {
        Ok(self.repo.find_by_nome_ignore_case(nome).await?.map(Into::into))
    }

    pub async fn find_by_localizacao(&self, localizacao: &str) -> Result<Vec<FazendaResponse>, ApiError> {
        let rows = self.repo.find_by_localizacao_containing(localizacao).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn find_by_vacas_min(&self, quantidade: i32) -> Result<Vec<FazendaResponse>, ApiError> {
        let rows = self.repo.find_by_quantidade_vacas_min(quantidade).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn find_by_vacas_range(&self, min: i32, max: i32) -> Result<Vec<FazendaResponse>, ApiError> {
        if min > max {
            return Ok(Vec::new());
        }
        let rows = self.repo.find_by_quantidade_vacas_between(min, max).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn exists_by_nome(&self, nome: &str) -> Result<bool, ApiError> {
        Ok(self.repo.exists_by_nome_ignore_case(nome).await?)
    }

    pub async fn count(&self) -> Result<i64, ApiError> {
        Ok(self.repo.count().await?)
    }

    pub async fn health(&self) -> HealthReport {
        let database = match self.repo.ping().await {
            Ok(()) => "ok".to_string(),
            Err(e) => {
                tracing::error!("Database health check failed: {}", e);
                "error".to_string()
            }
        };
        let cache = match &self.cache {
            None => "disabled".to_string(),
            Some(cache) => match cache.ping().await {
                Ok(()) => "ok".to_string(),
                Err(e) => {
                    tracing::error!("Cache health check failed: {}", e);
                    "error".to_string()
                }
            },
        };
        HealthReport { database, cache }
    }
}
