use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Detector region of a single muon by |eta|.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Barrel,
    Overlap,
    Endcap,
}

/// Pairing of the two dimuon-candidate muons' detector regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display)]
pub enum MuonGeometry {
    BB,
    OO,
    EE,
    BO,
    BE,
    OE,
}

impl MuonGeometry {
    /// Registry key of the region, e.g. `c_BB`.
    pub fn key(&self) -> String {
        format!("c_{}", self)
    }

    pub fn all() -> impl Iterator<Item = MuonGeometry> {
        MuonGeometry::iter()
    }
}

/// Barrel/overlap boundaries in |eta|.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryCuts {
    pub barrel_max: f64,
    pub overlap_max: f64,
}

impl GeometryCuts {
    pub fn new(barrel_max: f64, overlap_max: f64) -> Self {
        Self {
            barrel_max,
            overlap_max,
        }
    }

    /// NaN falls in no zone.
    pub fn zone(&self, eta: f64) -> Option<Zone> {
        let a = eta.abs();
        if a < self.barrel_max {
            Some(Zone::Barrel)
        } else if a >= self.barrel_max && a < self.overlap_max {
            Some(Zone::Overlap)
        } else if a >= self.overlap_max {
            Some(Zone::Endcap)
        } else {
            None
        }
    }

    /// Unordered zone pair of the two muons; every finite (eta1, eta2) maps to exactly one region.
    pub fn classify(&self, eta1: f64, eta2: f64) -> Option<MuonGeometry> {
        use Zone::*;
        let region = match (self.zone(eta1)?, self.zone(eta2)?) {
            (Barrel, Barrel) => MuonGeometry::BB,
            (Overlap, Overlap) => MuonGeometry::OO,
            (Endcap, Endcap) => MuonGeometry::EE,
            (Barrel, Overlap) | (Overlap, Barrel) => MuonGeometry::BO,
            (Barrel, Endcap) | (Endcap, Barrel) => MuonGeometry::BE,
            (Overlap, Endcap) | (Endcap, Overlap) => MuonGeometry::OE,
        };
        Some(region)
    }
}

impl Default for GeometryCuts {
    fn default() -> Self {
        Self::new(0.8, 1.6)
    }
}
