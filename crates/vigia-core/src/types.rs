/*!
 * Vigia Types
 *
 * Tipos comuns usados em toda a workspace Vigia
 */

use ethereum_types::H256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Alias para hash de transação
pub type TransactionHash = H256;

/// Seletor de função: os primeiros 4 bytes do calldata
pub type Selector = [u8; 4];

/// Severidade de um finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}
