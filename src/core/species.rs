//! Closed sets of labels indexing the flavour state.

use serde::{Deserialize, Serialize};

/// Number of flavours.
pub const NF: usize = 2;
/// Number of species (neutrinos and antineutrinos).
pub const NM: usize = 2;
/// Number of solution branches.
pub const NS: usize = 2;

/// Particle or antiparticle track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Matter,
    Antimatter,
}

impl Species {
    pub const ALL: [Species; NM] = [Species::Matter, Species::Antimatter];

    pub const fn index(self) -> usize {
        match self {
            Species::Matter => 0,
            Species::Antimatter => 1,
        }
    }
}

/// Interaction eigenstates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flavor {
    E,
    Mu,
}

impl Flavor {
    pub const ALL: [Flavor; NF] = [Flavor::E, Flavor::Mu];

    pub const fn index(self) -> usize {
        match self {
            Flavor::E => 0,
            Flavor::Mu => 1,
        }
    }
}

/// The two independently parametrised factors of the evolution operator.
/// The matter-driven S-matrix is applied first, the self-interaction one on
/// top of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Branch {
    Msw,
    Si,
}

impl Branch {
    pub const ALL: [Branch; NS] = [Branch::Msw, Branch::Si];

    pub const fn index(self) -> usize {
        match self {
            Branch::Msw => 0,
            Branch::Si => 1,
        }
    }
}
