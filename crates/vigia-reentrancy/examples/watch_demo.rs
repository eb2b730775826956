use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;
use vigia_core::traits::TraceSource;
use vigia_core::types::TransactionHash;
use vigia_core::{utils, Error, Result};
use vigia_reentrancy::{ReentrancyAgent, ReentrancyConfig, ReentryCounterAgent, ReentryThresholds};

const MONITORED: &str = "0x00000000000000000000000000000000000000c7";
const CALLER: &str = "0x00000000000000000000000000000000000000ee";

/// Fonte de traces em memória para demonstração
struct StaticTraceSource {
    responses: HashMap<TransactionHash, Vec<u8>>,
}

#[async_trait]
impl TraceSource for StaticTraceSource {
    async fn transaction_traces(&self, tx_hash: TransactionHash) -> Result<Vec<u8>> {
        self.responses
            .get(&tx_hash)
            .cloned()
            .ok_or_else(|| Error::RpcError(format!("trace não disponível: {:?}", tx_hash)))
    }
}

fn row(path: &[usize], to: &str, input: &str) -> serde_json::Value {
    json!({
        "action": {
            "callType": "call",
            "from": CALLER,
            "gas": "0x2dc6c0",
            "input": input,
            "to": to,
            "value": "0x0"
        },
        "result": { "gasUsed": "0x5208", "output": "0x" },
        "subtraces": 0,
        "traceAddress": path,
        "type": "call"
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let withdraw = format!("0x{}", hex::encode(utils::function_selector("withdraw(uint256)")));

    // Transação com cadeia reentrante: o contrato monitorado chega a três
    // chamadas abertas e duas delas passam pelo seletor de withdraw
    let reentrant_tx = TransactionHash::from_low_u64_be(1);
    let reentrant_trace = serde_json::to_vec(&vec![
        row(&[], MONITORED, "0xdeadbeef"),
        row(&[0], CALLER, "0x"),
        row(&[0, 0], MONITORED, &withdraw),
        row(&[0, 0, 0], CALLER, "0x"),
        row(&[0, 0, 0, 0], MONITORED, &withdraw),
    ])?;

    // Transação com trace corrompido, pulada com aviso durante o lote
    let broken_tx = TransactionHash::from_low_u64_be(2);
    let broken_trace =
        serde_json::to_vec(&vec![row(&[], MONITORED, "0x"), row(&[0, 0], CALLER, "0x")])?;

    let source = Arc::new(StaticTraceSource {
        responses: HashMap::from([(reentrant_tx, reentrant_trace), (broken_tx, broken_trace)]),
    });

    let config = ReentrancyConfig::builder()
        .monitored_address(utils::hex_to_address(MONITORED).expect("endereço fixo"))
        .sensitive_signature("withdraw(uint256)")
        .build()?;
    let agent = ReentrancyAgent::new(config, source.clone())?;

    info!("Processando lote de {} transações...", 2);
    let findings = agent.process_batch(&[reentrant_tx, broken_tx]).await?;

    println!("🔍 Findings de reentrância: {}", findings.len());
    for finding in &findings {
        println!(
            "- tx {} contrato {} seletor {} (outer {} -> inner {}, severidade {})",
            utils::format_h256(&finding.tx_hash),
            utils::format_address(&finding.contract),
            finding.selector,
            finding.outer_index,
            finding.inner_index,
            finding.severity
        );
    }

    let counter = ReentryCounterAgent::new(ReentryThresholds::default(), source);
    let reentry = counter.process_batch(&[reentrant_tx, broken_tx]).await?;

    println!("🔍 Findings de profundidade de reentrância: {}", reentry.len());
    for finding in &reentry {
        println!(
            "- contrato {} com {} chamadas abertas (severidade {}, confiança {:.2})",
            utils::format_address(&finding.contract),
            finding.count,
            finding.severity,
            finding.confidence
        );
    }

    Ok(())
}
