use crate::config::ReentrancyConfig;
use crate::counter::{max_reentry_counts, ReentryThresholds};
use crate::findings::{build_findings, build_reentry_findings, ReentrancyFinding, ReentryFinding};
use crate::scanner::scan_many;
use crate::trace::parse_transaction_traces;
use async_trait::async_trait;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;
use vigia_core::traits::{TraceSource, TransactionDetector};
use vigia_core::{utils, Error, Result, TransactionHash};

/// Capacidade do cache de traces brutos por agente
const TRACE_CACHE_SIZE: usize = 1024;

/// Bot de detecção de reentrância por seletor sensível
pub struct ReentrancyAgent {
    config: ReentrancyConfig,
    source: Arc<dyn TraceSource>,
    trace_cache: Mutex<LruCache<TransactionHash, Vec<u8>>>,
}

impl ReentrancyAgent {
    /// Cria um agente; configuração inválida é um erro fatal
    pub fn new(config: ReentrancyConfig, source: Arc<dyn TraceSource>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            source,
            trace_cache: Mutex::new(LruCache::new(NonZeroUsize::new(TRACE_CACHE_SIZE).unwrap())),
        })
    }

    /// Obtém os bytes brutos do trace, pelo cache quando possível
    async fn cached_traces(&self, tx_hash: TransactionHash) -> Result<Vec<u8>> {
        if let Some(raw) = self.trace_cache.lock().get(&tx_hash) {
            return Ok(raw.clone());
        }

        let raw = self.source.transaction_traces(tx_hash).await?;
        self.trace_cache.lock().put(tx_hash, raw.clone());
        Ok(raw)
    }

    /// Busca, valida e examina o trace de uma transação
    pub async fn process_transaction(
        &self,
        tx_hash: TransactionHash,
    ) -> Result<Vec<ReentrancyFinding>> {
        let raw = self.cached_traces(tx_hash).await?;
        let events = parse_transaction_traces(&raw)?;
        let matches = scan_many(&events, &self.config);
        Ok(build_findings(tx_hash, &matches, &events))
    }

    /// Processa um lote de transações em paralelo.
    ///
    /// Erros por transação (busca, decodificação, estrutura do trace) são
    /// registrados e a transação é pulada; o lote retorna os findings das
    /// demais.
    pub async fn process_batch(
        &self,
        tx_hashes: &[TransactionHash],
    ) -> Result<Vec<ReentrancyFinding>> {
        let futures: Vec<_> = tx_hashes.iter().map(|&tx| self.process_transaction(tx)).collect();
        let results = futures::future::join_all(futures).await;

        let mut findings = Vec::new();
        for (tx_hash, result) in tx_hashes.iter().zip(results) {
            match result {
                Ok(mut tx_findings) => findings.append(&mut tx_findings),
                Err(e) => tracing::warn!(
                    "Erro ao processar transação {}: {}",
                    utils::format_h256(tx_hash),
                    e
                ),
            }
        }

        Ok(findings)
    }
}

#[async_trait]
impl TransactionDetector for ReentrancyAgent {
    fn name(&self) -> &str {
        "ReentrancyAgent"
    }

    async fn detect_transaction(&self, tx_hash: TransactionHash) -> Result<Vec<u8>> {
        let findings = self.process_transaction(tx_hash).await?;
        serde_json::to_vec(&findings)
            .map_err(|e| Error::EncodeError(format!("Falha ao serializar findings: {}", e)))
    }
}

/// Bot de contagem de profundidade de reentrância por contrato
pub struct ReentryCounterAgent {
    thresholds: ReentryThresholds,
    source: Arc<dyn TraceSource>,
}

impl ReentryCounterAgent {
    pub fn new(thresholds: ReentryThresholds, source: Arc<dyn TraceSource>) -> Self {
        Self { thresholds, source }
    }

    /// Busca o trace e classifica as contagens por contrato
    pub async fn process_transaction(
        &self,
        tx_hash: TransactionHash,
    ) -> Result<Vec<ReentryFinding>> {
        let raw = self.source.transaction_traces(tx_hash).await?;
        let events = parse_transaction_traces(&raw)?;
        let counts = max_reentry_counts(&events);
        Ok(build_reentry_findings(tx_hash, &counts, &self.thresholds))
    }

    /// Processa um lote de transações em paralelo, pulando as que falharem
    pub async fn process_batch(
        &self,
        tx_hashes: &[TransactionHash],
    ) -> Result<Vec<ReentryFinding>> {
        let futures: Vec<_> = tx_hashes.iter().map(|&tx| self.process_transaction(tx)).collect();
        let results = futures::future::join_all(futures).await;

        let mut findings = Vec::new();
        for (tx_hash, result) in tx_hashes.iter().zip(results) {
            match result {
                Ok(mut tx_findings) => findings.append(&mut tx_findings),
                Err(e) => tracing::warn!(
                    "Erro ao processar transação {}: {}",
                    utils::format_h256(tx_hash),
                    e
                ),
            }
        }

        Ok(findings)
    }
}

#[async_trait]
impl TransactionDetector for ReentryCounterAgent {
    fn name(&self) -> &str {
        "ReentryCounterAgent"
    }

    async fn detect_transaction(&self, tx_hash: TransactionHash) -> Result<Vec<u8>> {
        let findings = self.process_transaction(tx_hash).await?;
        serde_json::to_vec(&findings)
            .map_err(|e| Error::EncodeError(format!("Falha ao serializar findings: {}", e)))
    }
}
