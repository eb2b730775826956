/*!
 * Vigia Traits
 *
 * Traits comuns usados em toda a workspace Vigia
 */

use async_trait::async_trait;
use crate::error::Result;
use crate::types::TransactionHash;

/// Trait para fontes de traces de transação
#[async_trait]
pub trait TraceSource: Send + Sync {
    /// Obtém os traces flat de uma transação (JSON bruto do provedor)
    async fn transaction_traces(&self, tx_hash: TransactionHash) -> Result<Vec<u8>>;
}

/// Trait para bots de detecção por transação
#[async_trait]
pub trait TransactionDetector: Send + Sync {
    /// Nome do detector
    fn name(&self) -> &str;

    /// Analisa uma transação e retorna os findings serializados
    async fn detect_transaction(&self, tx_hash: TransactionHash) -> Result<Vec<u8>>;
}
