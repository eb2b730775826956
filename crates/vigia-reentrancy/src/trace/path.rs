use serde::{Deserialize, Serialize};

/// Posição de uma chamada na árvore de execução.
///
/// Cada elemento é o índice ordinal do filho dentro do pai; a raiz da
/// transação tem o caminho vazio. O comprimento do caminho é a profundidade
/// de aninhamento da chamada.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TracePath(pub Vec<usize>);

impl TracePath {
    /// Cria um caminho a partir dos índices ordinais
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// Profundidade de aninhamento da chamada
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Verifica se este caminho é prefixo do outro
    pub fn is_prefix_of(&self, other: &TracePath) -> bool {
        self.0.len() <= other.0.len() && self.0.iter().zip(other.0.iter()).all(|(a, b)| a == b)
    }

    /// Verifica se este caminho é ancestral estrito do outro
    pub fn is_strict_ancestor_of(&self, other: &TracePath) -> bool {
        self.is_prefix_of(other) && self.0.len() < other.0.len()
    }
}

impl From<Vec<usize>> for TracePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}
