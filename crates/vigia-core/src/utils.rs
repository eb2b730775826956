/*!
 * Vigia Utils
 *
 * Utilitários comuns usados em toda a workspace Vigia
 */

use crate::types::Selector;
use ethereum_types::{Address, H256};
use std::str::FromStr;
use tiny_keccak::{Hasher, Keccak};

/// Converte uma string hexadecimal para Address
pub fn hex_to_address(hex: &str) -> Option<Address> {
    let hex_str = if hex.starts_with("0x") { &hex[2..] } else { hex };
    Address::from_str(hex_str).ok()
}

/// Converte uma string hexadecimal para H256
pub fn hex_to_h256(hex: &str) -> Option<H256> {
    let hex_str = if hex.starts_with("0x") { &hex[2..] } else { hex };
    H256::from_str(hex_str).ok()
}

/// Formata um Address para exibição
pub fn format_address(address: &Address) -> String {
    format!("0x{:x}", address)
}

/// Formata um H256 para exibição
pub fn format_h256(hash: &H256) -> String {
    format!("0x{:x}", hash)
}

/// Formata um seletor para exibição
pub fn format_selector(selector: &Selector) -> String {
    format!("0x{}", hex::encode(selector))
}

/// Calcula o hash Keccak-256 de dados
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut result = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut result);
    result
}

/// Deriva o seletor de 4 bytes a partir da assinatura canônica de uma função
pub fn function_selector(signature: &str) -> Selector {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}
