use crate::config::{ReentrancyConfig, SelectorSet};
use crate::trace::CallTraceEvent;
use ethereum_types::Address;
use serde::{Deserialize, Serialize};
use vigia_core::Selector;

/// Par de chamadas reentrantes encontrado em um trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReentrancyMatch {
    /// Índice da ocorrência externa na lista de eventos
    pub outer_index: usize,
    /// Índice da chamada reentrante dentro da subárvore da ocorrência externa
    pub inner_index: usize,
    /// Seletor sensível da chamada interna
    pub selector: Selector,
}

/// Limite exclusivo da subárvore dinâmica do evento em `start`.
///
/// A subárvore termina no primeiro evento posterior com profundidade menor
/// ou igual à do evento inicial; sem tal evento, vai até o fim da lista.
fn subtree_end(events: &[CallTraceEvent], start: usize) -> usize {
    let depth = events[start].path.depth();
    events[start + 1..]
        .iter()
        .position(|event| event.path.depth() <= depth)
        .map(|offset| start + 1 + offset)
        .unwrap_or(events.len())
}

/// Procura chamadas reentrantes a `monitored` através de seletores sensíveis.
///
/// Cada ocorrência externa é examinada de forma independente, inclusive as
/// aninhadas dentro de subárvores já examinadas, e todas as chamadas internas
/// qualificadas são reportadas. O resultado sai em ordem de descoberta:
/// `outer_index` crescente e, dentro dele, `inner_index` crescente.
pub fn scan(
    events: &[CallTraceEvent],
    monitored: Address,
    sensitive: &SelectorSet,
) -> Vec<ReentrancyMatch> {
    let mut matches = Vec::new();

    for (i, outer) in events.iter().enumerate() {
        if outer.target != monitored {
            continue;
        }

        let end = subtree_end(events, i);
        for (j, inner) in events.iter().enumerate().take(end).skip(i + 1) {
            if inner.target != monitored {
                continue;
            }
            if let Some(selector) = inner.selector() {
                if sensitive.contains(&selector) {
                    matches.push(ReentrancyMatch { outer_index: i, inner_index: j, selector });
                }
            }
        }
    }

    matches
}

/// Executa `scan` para cada contrato monitorado da configuração
pub fn scan_many(events: &[CallTraceEvent], config: &ReentrancyConfig) -> Vec<ReentrancyMatch> {
    let mut matches: Vec<ReentrancyMatch> = config
        .monitored
        .iter()
        .flat_map(|&address| scan(events, address, &config.sensitive))
        .collect();
    matches.sort_by_key(|m| (m.outer_index, m.inner_index));
    matches
}
