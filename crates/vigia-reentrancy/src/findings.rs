use crate::counter::{confidence_for, ReentryThresholds};
use crate::scanner::ReentrancyMatch;
use crate::trace::CallTraceEvent;
use chrono::{DateTime, Utc};
use ethereum_types::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vigia_core::{utils, Severity, TransactionHash};

/// Finding de chamada reentrante através de seletor sensível
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReentrancyFinding {
    pub tx_hash: TransactionHash,
    pub contract: Address,
    pub selector: String,
    pub outer_index: usize,
    pub inner_index: usize,
    pub depth_delta: usize,
    pub severity: Severity,
    pub description: String,
    pub detected_at: DateTime<Utc>,
}

/// Constrói um finding por match, na mesma ordem dos matches.
///
/// Os índices dos matches referem-se a `events`, que tem de ser a mesma
/// lista examinada pelo scan que os produziu.
pub fn build_findings(
    tx_hash: TransactionHash,
    matches: &[ReentrancyMatch],
    events: &[CallTraceEvent],
) -> Vec<ReentrancyFinding> {
    matches
        .iter()
        .map(|m| {
            let contract = events[m.outer_index].target;
            let depth_delta =
                events[m.inner_index].path.depth() - events[m.outer_index].path.depth();
            ReentrancyFinding {
                tx_hash,
                contract,
                selector: utils::format_selector(&m.selector),
                outer_index: m.outer_index,
                inner_index: m.inner_index,
                depth_delta,
                severity: Severity::Critical,
                description: format!(
                    "Chamada reentrante ao contrato {} através do seletor {}",
                    utils::format_address(&contract),
                    utils::format_selector(&m.selector),
                ),
                detected_at: Utc::now(),
            }
        })
        .collect()
}

/// Finding de profundidade de reentrância por contagem de chamadas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReentryFinding {
    pub tx_hash: TransactionHash,
    pub contract: Address,
    pub count: usize,
    pub severity: Severity,
    pub confidence: f64,
    pub description: String,
    pub detected_at: DateTime<Utc>,
}

/// Constrói findings para os endereços cuja contagem atinge a escada
pub fn build_reentry_findings(
    tx_hash: TransactionHash,
    counts: &HashMap<Address, usize>,
    thresholds: &ReentryThresholds,
) -> Vec<ReentryFinding> {
    let mut findings: Vec<ReentryFinding> = counts
        .iter()
        .filter_map(|(&contract, &count)| {
            thresholds.classify(count).map(|severity| ReentryFinding {
                tx_hash,
                contract,
                count,
                severity,
                confidence: confidence_for(severity),
                description: format!(
                    "{} chamadas simultâneas ao contrato {} na mesma transação",
                    count,
                    utils::format_address(&contract),
                ),
                detected_at: Utc::now(),
            })
        })
        .collect();

    // HashMap não itera em ordem estável
    findings.sort_by(|a, b| b.count.cmp(&a.count).then(a.contract.cmp(&b.contract)));
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::TracePath;
    use ethereum_types::H256;

    fn addr(n: u64) -> Address {
        Address::from_low_u64_be(n)
    }

    fn ev(path: &[usize], target: Address) -> CallTraceEvent {
        CallTraceEvent::new(TracePath::new(path.to_vec()), target, Vec::new())
    }

    #[test]
    fn test_build_findings_one_per_match() {
        let events = vec![
            ev(&[], addr(1)),
            ev(&[0], addr(7)),
            ev(&[0, 0], addr(7)),
        ];
        let matches = vec![ReentrancyMatch {
            outer_index: 1,
            inner_index: 2,
            selector: [0xaa, 0xbb, 0xcc, 0xdd],
        }];

        let findings = build_findings(H256::from_low_u64_be(9), &matches, &events);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].contract, addr(7));
        assert_eq!(findings[0].selector, "0xaabbccdd");
        assert_eq!(findings[0].depth_delta, 1);
        assert_eq!(findings[0].severity, Severity::Critical);
        assert!(findings[0].description.contains("0xaabbccdd"));
    }

    #[test]
    fn test_build_reentry_findings_filters_and_orders() {
        let mut counts = HashMap::new();
        counts.insert(addr(1), 1);
        counts.insert(addr(2), 3);
        counts.insert(addr(3), 6);

        let findings =
            build_reentry_findings(H256::zero(), &counts, &ReentryThresholds::default());
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].contract, addr(3));
        assert_eq!(findings[0].count, 6);
        assert_eq!(findings[0].severity, Severity::Low);
        assert!((findings[0].confidence - 0.4).abs() < f64::EPSILON);
        assert_eq!(findings[1].contract, addr(2));
        assert_eq!(findings[1].severity, Severity::Info);
    }
}
