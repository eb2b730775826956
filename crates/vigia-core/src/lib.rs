/*!
 * Vigia Core
 *
 * Tipos e utilitários compartilhados para a workspace Vigia
 */

pub mod types;
pub mod traits;
pub mod utils;
pub mod error;

// Re-exportações públicas
pub use error::{Error, Result};
pub use types::*;
