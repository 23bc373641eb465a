use serde::{Deserialize, Serialize};

/// Opaque genetic payload carried by a cell.
///
/// Genes take values in the full `u8` domain. The simulation never interprets
/// them beyond copying them into offspring and mutating them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Genome {
    pub genes: Vec<u8>,
}

impl Genome {
    /// Number of genes a freshly created brain starts with.
    pub const BRAIN_GENE_COUNT: usize = 3;

    #[must_use]
    pub fn new(genes: Vec<u8>) -> Self {
        Self { genes }
    }

    /// All-zero genome for a founder brain.
    #[must_use]
    pub fn founder() -> Self {
        Self {
            genes: vec![0; Self::BRAIN_GENE_COUNT],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}
