use crate::config::JetCuts;
use crate::vars::{FourVector, Jet};

/// Splits a raw jet collection into valid jets and the b-tagged subset.
#[derive(Debug, Clone)]
pub struct JetCleaner {
    pub cuts: JetCuts,
}

impl JetCleaner {
    pub fn new(cuts: JetCuts) -> Self {
        Self { cuts }
    }

    pub fn is_valid(&self, jet: &Jet) -> bool {
        jet.pt > self.cuts.jet_pt_min && jet.eta.abs() < self.cuts.jet_eta_max
    }

    /// b-jets need the tracker, hence the tighter eta cut on top of a valid jet.
    pub fn is_bjet(&self, jet: &Jet) -> bool {
        self.is_valid(jet) && jet.csv > self.cuts.btag_min && jet.eta.abs() < self.cuts.bjet_eta_max
    }

    /// Input order is preserved, so a pt-ordered input gives pt-ordered outputs.
    pub fn clean(&self, jets: &[Jet]) -> (Vec<FourVector>, Vec<FourVector>) {
        let mut valid = Vec::with_capacity(jets.len());
        let mut bjets = Vec::new();
        for jet in jets.iter().filter(|j| self.is_valid(j)) {
            let p4 = jet.four_vector();
            valid.push(p4);
            if self.is_bjet(jet) {
                bjets.push(p4);
            }
        }
        (valid, bjets)
    }
}

impl Default for JetCleaner {
    fn default() -> Self {
        Self::new(JetCuts::default())
    }
}
