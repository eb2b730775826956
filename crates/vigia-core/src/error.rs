use thiserror::Error;

/// Erros comuns da biblioteca Vigia
#[derive(Error, Debug)]
pub enum Error {
    /// Erro de comunicação com a fonte de traces
    #[error("Erro de RPC: {0}")]
    RpcError(String),

    /// Erro de decodificação de dados
    #[error("Erro de decodificação: {0}")]
    DecodeError(String),

    /// Erro de codificação de dados
    #[error("Erro de codificação: {0}")]
    EncodeError(String),

    /// Erro de validação de configuração
    #[error("Erro de validação: {0}")]
    ValidationError(String),

    /// Lista de traces fora da ordem pré-ordem esperada
    #[error("Trace estruturalmente inválido no índice {index}: {reason}")]
    StructuralTraceError { index: usize, reason: String },

    /// Erro genérico
    #[error("{0}")]
    Other(String),
}

/// Tipo de resultado usado em toda a biblioteca
pub type Result<T> = std::result::Result<T, Error>;
