use super::path::TracePath;
use ethereum_types::Address;
use serde::Deserialize;
use vigia_core::{utils, Error, Result, Selector};

/// Uma linha do trace flat de uma transação, em ordem de emissão (pré-ordem)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallTraceEvent {
    /// Posição da chamada na árvore de execução
    pub path: TracePath,
    /// Endereço chamado
    pub target: Address,
    /// Calldata bruto da chamada
    pub input: Vec<u8>,
}

impl CallTraceEvent {
    pub fn new(path: TracePath, target: Address, input: Vec<u8>) -> Self {
        Self { path, target, input }
    }

    /// Seletor de função da chamada, quando o calldata o contém
    pub fn selector(&self) -> Option<Selector> {
        extract_selector(&self.input)
    }
}

/// Extrai o seletor dos primeiros 4 bytes do calldata.
///
/// Calldata com menos de 4 bytes (transferências simples de valor, por
/// exemplo) não tem seletor e retorna `None`; nunca é um erro.
pub fn extract_selector(input: &[u8]) -> Option<Selector> {
    if input.len() >= 4 {
        Some([input[0], input[1], input[2], input[3]])
    } else {
        None
    }
}

/// Linha do trace flat no formato do provedor (trace_transaction)
#[derive(Debug, Clone, Deserialize)]
pub struct RawTrace {
    pub action: RawAction,
    #[serde(rename = "traceAddress")]
    pub trace_address: Vec<usize>,
}

/// Campos da ação de uma linha de trace.
///
/// Linhas `create` e `suicide` não trazem `to`/`input`; os demais campos do
/// provedor (gas, value, result) são ignorados.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAction {
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub input: Option<String>,
}

impl TryFrom<RawTrace> for CallTraceEvent {
    type Error = Error;

    fn try_from(raw: RawTrace) -> Result<Self> {
        // Linhas sem `to` ficam com o endereço zero: descartá-las deslocaria
        // as fronteiras de irmãos no trace.
        let target = match raw.action.to.as_deref() {
            Some(to) => utils::hex_to_address(to)
                .ok_or_else(|| Error::DecodeError(format!("Endereço inválido: {}", to)))?,
            None => Address::zero(),
        };

        let input = match raw.action.input.as_deref() {
            Some(input) => hex::decode(input.trim_start_matches("0x"))
                .map_err(|_| Error::DecodeError(format!("Input inválido: {}", input)))?,
            None => Vec::new(),
        };

        Ok(Self {
            path: raw.trace_address.into(),
            target,
            input,
        })
    }
}

/// Deserializa e valida o trace flat de uma transação
pub fn parse_transaction_traces(raw: &[u8]) -> Result<Vec<CallTraceEvent>> {
    let rows: Vec<RawTrace> = serde_json::from_slice(raw)
        .map_err(|e| Error::DecodeError(format!("Falha ao deserializar traces: {}", e)))?;

    let mut events = Vec::with_capacity(rows.len());
    for row in rows {
        events.push(CallTraceEvent::try_from(row)?);
    }

    validate_preorder(&events)?;
    Ok(events)
}

/// Valida a estrutura pré-ordem da lista de eventos.
///
/// Entre eventos consecutivos a profundidade só pode crescer de um em um, e
/// quando cresce o caminho anterior tem de ser ancestral estrito do atual.
/// A lista pode começar abaixo da raiz; apenas a estrutura relativa importa.
pub fn validate_preorder(events: &[CallTraceEvent]) -> Result<()> {
    for index in 1..events.len() {
        let prev = &events[index - 1];
        let cur = &events[index];

        let prev_depth = prev.path.depth();
        let cur_depth = cur.path.depth();

        if cur_depth > prev_depth {
            if cur_depth != prev_depth + 1 {
                return Err(Error::StructuralTraceError {
                    index,
                    reason: format!("profundidade saltou de {} para {}", prev_depth, cur_depth),
                });
            }
            if !prev.path.is_strict_ancestor_of(&cur.path) {
                return Err(Error::StructuralTraceError {
                    index,
                    reason: "caminho não estende o do evento anterior".to_string(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_selector() {
        assert_eq!(extract_selector(&[0xa9, 0x05, 0x9c, 0xbb]), Some([0xa9, 0x05, 0x9c, 0xbb]));
        assert_eq!(
            extract_selector(&[0xa9, 0x05, 0x9c, 0xbb, 0x00, 0x01]),
            Some([0xa9, 0x05, 0x9c, 0xbb]),
        );
        assert_eq!(extract_selector(&[]), None);
        assert_eq!(extract_selector(&[0xa9]), None);
        assert_eq!(extract_selector(&[0xa9, 0x05, 0x9c]), None);
    }

    #[test]
    fn test_raw_trace_without_to_keeps_position() {
        let raw = RawTrace {
            action: RawAction { to: None, input: None },
            trace_address: vec![0, 2],
        };
        let event = CallTraceEvent::try_from(raw).unwrap();
        assert_eq!(event.target, Address::zero());
        assert!(event.input.is_empty());
        assert_eq!(event.path, TracePath::new(vec![0, 2]));
    }

    #[test]
    fn test_raw_trace_invalid_address() {
        let raw = RawTrace {
            action: RawAction { to: Some("0x123".to_string()), input: None },
            trace_address: vec![],
        };
        assert!(matches!(CallTraceEvent::try_from(raw), Err(Error::DecodeError(_))));
    }

    #[test]
    fn test_raw_trace_invalid_input_hex() {
        let raw = RawTrace {
            action: RawAction {
                to: Some("0x0000000000000000000000000000000000000001".to_string()),
                input: Some("0xzz".to_string()),
            },
            trace_address: vec![],
        };
        assert!(matches!(CallTraceEvent::try_from(raw), Err(Error::DecodeError(_))));
    }
}
