use serde::{Deserialize, Serialize};

use crate::types::HashAlgorithm;

/// What happens to a swap identifier once its swap has settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdReusePolicy {
    /// A settled identifier may be initiated again with identical parameters.
    #[default]
    AllowAfterSettlement,
    /// Settled identifiers are retired forever.
    Forbid,
}

/// Escrow engine parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowConfig {
    #[serde(default)]
    pub id_reuse: IdReusePolicy,
    /// Digest applied to secrets for swaps created under this config.
    #[serde(default)]
    pub hash_algorithm: HashAlgorithm,
    #[serde(default = "default_max_destination_data_len")]
    pub max_destination_data_len: usize,
    /// Native units charged to the rent sponsor per pending record.
    #[serde(default)]
    pub rent_per_record: u64,
}

fn default_max_destination_data_len() -> usize {
    1024
}

impl Default for EscrowConfig {
    fn default() -> Self {
        Self {
            id_reuse: IdReusePolicy::default(),
            hash_algorithm: HashAlgorithm::default(),
            max_destination_data_len: default_max_destination_data_len(),
            rent_per_record: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EscrowConfig::default();
        assert_eq!(config.id_reuse, IdReusePolicy::AllowAfterSettlement);
        assert_eq!(config.hash_algorithm, HashAlgorithm::Sha256);
        assert_eq!(config.max_destination_data_len, 1024);
        assert_eq!(config.rent_per_record, 0);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: EscrowConfig = toml::from_str(
            r#"
            id_reuse = "forbid"
            rent_per_record = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.id_reuse, IdReusePolicy::Forbid);
        assert_eq!(config.rent_per_record, 5);
        assert_eq!(config.max_destination_data_len, 1024);
        assert_eq!(config.hash_algorithm, HashAlgorithm::Sha256);
    }
}
