use std::env;
use std::fs;

use vigia_core::utils;
use vigia_reentrancy::{build_findings, parse_transaction_traces, scan_many, ReentrancyConfig};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // Leitura simples dos argumentos de linha de comando
    let args: Vec<String> = env::args().collect();
    if args.len() < 5 {
        eprintln!("Uso: {} <ARQUIVO_TRACES_JSON> <TX_HASH> <CONTRATO> <ASSINATURA>...", args[0]);
        eprintln!(
            "Exemplo: {} traces.json 0x9c82...01ab 0x4b3a...90ef 'withdraw(uint256)'",
            args[0]
        );
        std::process::exit(1);
    }

    let raw = fs::read(&args[1])?;
    let tx_hash = utils::hex_to_h256(&args[2])
        .ok_or_else(|| anyhow::anyhow!("hash de transação inválido: {}", args[2]))?;
    let contract = utils::hex_to_address(&args[3])
        .ok_or_else(|| anyhow::anyhow!("endereço inválido: {}", args[3]))?;

    // Monta a configuração a partir das assinaturas informadas
    let mut builder = ReentrancyConfig::builder().monitored_address(contract);
    for signature in &args[4..] {
        builder = builder.sensitive_signature(signature);
    }
    let config = builder.build()?;

    let events = parse_transaction_traces(&raw)?;
    println!(
        "🔍 Examinando {} eventos de trace da transação {}...",
        events.len(),
        utils::format_h256(&tx_hash)
    );

    let matches = scan_many(&events, &config);
    let findings = build_findings(tx_hash, &matches, &events);

    if findings.is_empty() {
        println!("Nenhuma chamada reentrante encontrada.");
    } else {
        println!("Chamadas reentrantes encontradas:");
        for finding in &findings {
            println!(
                "- evento {} dentro da subárvore do evento {} via {} (severidade {})",
                finding.inner_index, finding.outer_index, finding.selector, finding.severity
            );
        }
    }

    Ok(())
}
