use ethereum_types::Address;
use std::collections::HashSet;
use vigia_core::{utils, Error, Result, Selector};

/// Conjunto imutável de seletores de funções sensíveis
#[derive(Debug, Clone, Default)]
pub struct SelectorSet(HashSet<Selector>);

impl SelectorSet {
    pub fn new() -> Self {
        Self(HashSet::new())
    }

    /// Insere um seletor no conjunto
    pub fn insert(&mut self, selector: Selector) {
        self.0.insert(selector);
    }

    /// Verifica se o seletor pertence ao conjunto
    pub fn contains(&self, selector: &Selector) -> bool {
        self.0.contains(selector)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<Selector> for SelectorSet {
    fn from_iter<I: IntoIterator<Item = Selector>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Configuração do detector de reentrância
#[derive(Debug, Clone)]
pub struct ReentrancyConfig {
    /// Contratos monitorados, sem duplicatas, em ordem de configuração
    pub monitored: Vec<Address>,
    /// Seletores considerados sensíveis para os contratos monitorados
    pub sensitive: SelectorSet,
}

impl ReentrancyConfig {
    pub fn builder() -> ReentrancyConfigBuilder {
        ReentrancyConfigBuilder::default()
    }

    /// Valida as condições fatais de configuração
    pub fn validate(&self) -> Result<()> {
        if self.monitored.is_empty() {
            return Err(Error::ValidationError("contrato monitorado é obrigatório".to_string()));
        }
        if self.monitored.contains(&Address::zero()) {
            return Err(Error::ValidationError(
                "contrato monitorado não pode ser o endereço zero".to_string(),
            ));
        }
        if self.sensitive.is_empty() {
            return Err(Error::ValidationError(
                "conjunto de seletores sensíveis é obrigatório".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder para ReentrancyConfig
#[derive(Debug, Default)]
pub struct ReentrancyConfigBuilder {
    monitored: Vec<Address>,
    sensitive: SelectorSet,
}

impl ReentrancyConfigBuilder {
    /// Adiciona um contrato monitorado
    pub fn monitored_address(mut self, address: Address) -> Self {
        self.monitored.push(address);
        self
    }

    /// Adiciona um seletor sensível
    pub fn sensitive_selector(mut self, selector: Selector) -> Self {
        self.sensitive.insert(selector);
        self
    }

    /// Adiciona o seletor derivado da assinatura canônica de uma função
    pub fn sensitive_signature(mut self, signature: &str) -> Self {
        self.sensitive.insert(utils::function_selector(signature));
        self
    }

    /// Valida e constrói a configuração
    pub fn build(self) -> Result<ReentrancyConfig> {
        let mut seen = HashSet::new();
        let monitored: Vec<Address> =
            self.monitored.into_iter().filter(|address| seen.insert(*address)).collect();

        let config = ReentrancyConfig { monitored, sensitive: self.sensitive };
        config.validate()?;
        Ok(config)
    }
}
