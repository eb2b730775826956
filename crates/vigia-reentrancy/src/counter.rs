use crate::trace::CallTraceEvent;
use ethereum_types::Address;
use std::collections::HashMap;
use vigia_core::{Error, Result, Severity};

/// Escada de severidade por contagem de chamadas reentrantes
#[derive(Debug, Clone)]
pub struct ReentryThresholds(Vec<(usize, Severity)>);

impl Default for ReentryThresholds {
    fn default() -> Self {
        Self(vec![
            (3, Severity::Info),
            (5, Severity::Low),
            (7, Severity::Medium),
            (9, Severity::High),
            (11, Severity::Critical),
        ])
    }
}

impl ReentryThresholds {
    /// Cria uma escada validada de limiares estritamente crescentes
    pub fn new(ladder: Vec<(usize, Severity)>) -> Result<Self> {
        if ladder.is_empty() {
            return Err(Error::ValidationError("escada de limiares é obrigatória".to_string()));
        }
        if !ladder.windows(2).all(|pair| pair[0].0 < pair[1].0) {
            return Err(Error::ValidationError(
                "limiares devem ser estritamente crescentes".to_string(),
            ));
        }
        Ok(Self(ladder))
    }

    /// Classifica uma contagem no degrau mais alto cujo limiar foi atingido.
    ///
    /// Contagens abaixo do primeiro degrau não são reportáveis.
    pub fn classify(&self, count: usize) -> Option<Severity> {
        self.0
            .iter()
            .rev()
            .find(|(threshold, _)| count >= *threshold)
            .map(|(_, severity)| *severity)
    }
}

/// Peso de confiança associado a cada severidade
pub fn confidence_for(severity: Severity) -> f64 {
    match severity {
        Severity::Info => 0.3,
        Severity::Low => 0.4,
        Severity::Medium => 0.5,
        Severity::High => 0.6,
        Severity::Critical => 0.7,
    }
}

/// Contagem máxima de chamadas simultaneamente abertas por endereço.
///
/// Percorre a lista em ordem de emissão mantendo a pilha de ancestrais; a
/// contagem de um endereço é o número de ocorrências dele na pilha em um
/// dado momento, e o máximo observado é reportado por endereço. Todo
/// endereço chamado aparece no resultado com contagem de pelo menos 1.
pub fn max_reentry_counts(events: &[CallTraceEvent]) -> HashMap<Address, usize> {
    let mut stack: Vec<(usize, Address)> = Vec::new();
    let mut open: HashMap<Address, usize> = HashMap::new();
    let mut maxima: HashMap<Address, usize> = HashMap::new();

    for event in events {
        let depth = event.path.depth();

        // Fecha as chamadas que não são ancestrais deste evento
        while stack.last().map_or(false, |&(d, _)| d >= depth) {
            if let Some((_, popped)) = stack.pop() {
                if let Some(count) = open.get_mut(&popped) {
                    *count -= 1;
                }
            }
        }

        let count = open.entry(event.target).or_insert(0);
        *count += 1;
        let max = maxima.entry(event.target).or_insert(0);
        if *count > *max {
            *max = *count;
        }
        stack.push((depth, event.target));
    }

    maxima
}
