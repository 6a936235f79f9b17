//! Per-event physics objects and the read-only accessor the categorizers consume.

use crate::config::JetCuts;
use crate::error::{DfResult, DimuForgeError};
use crate::selection::JetCleaner;
use serde::{Deserialize, Serialize};
use std::ops::Add;

/// Massive four-vector in (pt, eta, phi, m) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FourVector {
    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
    pub m: f64,
}

impl FourVector {
    pub fn new(pt: f64, eta: f64, phi: f64, m: f64) -> Self {
        Self { pt, eta, phi, m }
    }

    pub fn px(&self) -> f64 {
        self.pt * self.phi.cos()
    }

    pub fn py(&self) -> f64 {
        self.pt * self.phi.sin()
    }

    pub fn pz(&self) -> f64 {
        self.pt * self.eta.sinh()
    }

    pub fn e(&self) -> f64 {
        let p = self.pt * self.eta.cosh();
        (p * p + self.m * self.m).sqrt()
    }

    pub fn mass(&self) -> f64 {
        self.m
    }

    // negative m² from rounding clamps to zero
    fn from_cartesian(px: f64, py: f64, pz: f64, e: f64) -> Self {
        let pt = px.hypot(py);
        let m2 = e * e - px * px - py * py - pz * pz;
        let m = if m2 > 0.0 { m2.sqrt() } else { 0.0 };
        let eta = if pt > 0.0 {
            (pz / pt).asinh()
        } else if pz > 0.0 {
            f64::INFINITY
        } else if pz < 0.0 {
            f64::NEG_INFINITY
        } else {
            0.0
        };
        let phi = if pt > 0.0 { py.atan2(px) } else { 0.0 };
        Self { pt, eta, phi, m }
    }
}

impl Add for FourVector {
    type Output = FourVector;

    fn add(self, rhs: FourVector) -> FourVector {
        FourVector::from_cartesian(
            self.px() + rhs.px(),
            self.py() + rhs.py(),
            self.pz() + rhs.pz(),
            self.e() + rhs.e(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Muon {
    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Jet {
    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
    pub mass: f64,
    /// b-tag discriminant
    pub csv: f64,
}

impl Jet {
    pub fn four_vector(&self) -> FourVector {
        FourVector::new(self.pt, self.eta, self.phi, self.mass)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Electron {
    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
}

/// Indices into the event's muon collection plus the pair kinematics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DimuonCandidate {
    pub i_mu1: usize,
    pub i_mu2: usize,
    pub mass: f64,
    pub pt: f64,
    pub eta: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Met {
    pub pt: f64,
}

/// One event as read from a sample file. Extra muons and electrons are the
/// already-selected leptons beyond the dimuon candidate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventRecord {
    pub muons: Vec<Muon>,
    pub dimuon: DimuonCandidate,
    pub met: Met,
    pub jets: Vec<Jet>,
    pub extra_muons: Vec<Muon>,
    pub electrons: Vec<Electron>,
    pub n_vertices: u32,
    #[serde(default = "unit_weight")]
    pub weight: f64,
    pub bdt_score: Option<f64>,
}

fn unit_weight() -> f64 {
    1.0
}

/// Read-only view of one event plus its derived object collections.
#[derive(Debug, Clone)]
pub struct VarSet<'a> {
    pub muons: &'a [Muon],
    pub dimuon: &'a DimuonCandidate,
    pub met: &'a Met,
    pub jets: &'a [Jet],
    pub valid_jets: Vec<FourVector>,
    pub valid_bjets: Vec<FourVector>,
    pub valid_extra_muons: &'a [Muon],
    pub valid_electrons: &'a [Electron],
    pub n_vertices: u32,
    pub weight: f64,
    pub bdt_score: Option<f64>,
}

impl<'a> VarSet<'a> {
    pub fn new(event: &'a EventRecord, cleaner: &JetCleaner) -> Self {
        let (valid_jets, valid_bjets) = cleaner.clean(&event.jets);
        Self {
            muons: &event.muons,
            dimuon: &event.dimuon,
            met: &event.met,
            jets: &event.jets,
            valid_jets,
            valid_bjets,
            valid_extra_muons: &event.extra_muons,
            valid_electrons: &event.electrons,
            n_vertices: event.n_vertices,
            weight: event.weight,
            bdt_score: event.bdt_score,
        }
    }

    /// Builds a view with the default jet cleaning.
    pub fn from_event(event: &'a EventRecord) -> Self {
        Self::new(event, &JetCleaner::new(JetCuts::default()))
    }

    /// First muon of the dimuon candidate. Panics when the index is out of range.
    pub fn mu1(&self) -> &Muon {
        &self.muons[self.dimuon.i_mu1]
    }

    /// Second muon of the dimuon candidate. Panics when the index is out of range.
    pub fn mu2(&self) -> &Muon {
        &self.muons[self.dimuon.i_mu2]
    }

    pub fn n_extra_leptons(&self) -> usize {
        self.valid_extra_muons.len() + self.valid_electrons.len()
    }

    /// Sum of the two leading valid jets, if there are two.
    pub fn leading_dijet(&self) -> Option<(FourVector, FourVector, FourVector)> {
        match self.valid_jets.as_slice() {
            [j0, j1, ..] => Some((*j0, *j1, *j0 + *j1)),
            _ => None,
        }
    }

    /// Resolves a named scalar for the current event.
    pub fn value(&self, name: &str) -> DfResult<f64> {
        let v = match name {
            "dimu_mass" => self.dimuon.mass,
            "dimu_pt" => self.dimuon.pt,
            "dimu_eta" => self.dimuon.eta,
            "dimu_max_abs_eta" => self.mu1().eta.abs().max(self.mu2().eta.abs()),
            "dimu_min_abs_eta" => self.mu1().eta.abs().min(self.mu2().eta.abs()),
            "mu1_pt" => self.mu1().pt,
            "mu2_pt" => self.mu2().pt,
            "mu1_eta" => self.mu1().eta,
            "mu2_eta" => self.mu2().eta,
            "met" => self.met.pt,
            "nvalid_jets" => self.valid_jets.len() as f64,
            "nvalid_bjets" => self.valid_bjets.len() as f64,
            "nvalid_extra_muons" => self.valid_extra_muons.len() as f64,
            "nvalid_electrons" => self.valid_electrons.len() as f64,
            "m_jj" => self.leading_dijet().map_or(0.0, |(_, _, jj)| jj.mass()),
            "dEta_jj" => self
                .leading_dijet()
                .map_or(0.0, |(j0, j1, _)| j0.eta - j1.eta),
            "n_vertices" => self.n_vertices as f64,
            "bdt_score" => self
                .bdt_score
                .ok_or_else(|| DimuForgeError::Validation("event has no bdt_score".into()))?,
            _ => return Err(DimuForgeError::UnknownVariable(name.to_string())),
        };
        Ok(v)
    }

    /// Like [`VarSet::value`] but fails loudly. Categorizers only ask for names
    /// fixed at construction, so a miss is a configuration error.
    pub fn get_value(&self, name: &str) -> f64 {
        match self.value(name) {
            Ok(v) => v,
            Err(e) => panic!("cannot resolve variable '{}': {}", name, e),
        }
    }
}
