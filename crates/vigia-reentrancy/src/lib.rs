/*!
 * Vigia Reentrancy
 *
 * Detecção de reentrância em call traces de transações EVM. Reconstrói a
 * relação ancestral/descendente a partir do trace flat do provedor e procura,
 * dentro da subárvore dinâmica de cada chamada a um contrato monitorado,
 * chamadas reentrantes através de funções sensíveis, além de medir a
 * profundidade de reentrância por contrato.
 */

mod agent;
mod config;
mod counter;
mod findings;
mod scanner;
mod trace;

// Re-exportações públicas
pub use agent::*;
pub use config::*;
pub use counter::*;
pub use findings::*;
pub use scanner::*;
pub use trace::*;
