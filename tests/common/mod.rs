#![allow(dead_code)]

use dimuforge::category::Categorizer;
use dimuforge::vars::{DimuonCandidate, Electron, EventRecord, Jet, Met, Muon, VarSet};

/// Builds events with a central, low-pt dimuon and nothing else by default.
pub struct EventBuilder {
    event: EventRecord,
}

impl EventBuilder {
    pub fn new() -> Self {
        let muons = vec![
            Muon {
                pt: 40.0,
                eta: 0.1,
                phi: 0.0,
            },
            Muon {
                pt: 30.0,
                eta: 0.2,
                phi: 3.0,
            },
        ];
        Self {
            event: EventRecord {
                muons,
                dimuon: DimuonCandidate {
                    i_mu1: 0,
                    i_mu2: 1,
                    mass: 125.0,
                    pt: 10.0,
                    eta: 0.0,
                },
                weight: 1.0,
                ..Default::default()
            },
        }
    }

    pub fn muon_etas(mut self, eta1: f64, eta2: f64) -> Self {
        self.event.muons[0].eta = eta1;
        self.event.muons[1].eta = eta2;
        self
    }

    pub fn dimu_mass(mut self, mass: f64) -> Self {
        self.event.dimuon.mass = mass;
        self
    }

    pub fn dimu_pt(mut self, pt: f64) -> Self {
        self.event.dimuon.pt = pt;
        self
    }

    pub fn dimu_eta(mut self, eta: f64) -> Self {
        self.event.dimuon.eta = eta;
        self
    }

    pub fn met(mut self, pt: f64) -> Self {
        self.event.met = Met { pt };
        self
    }

    pub fn jet(self, pt: f64, eta: f64, phi: f64) -> Self {
        self.tagged_jet(pt, eta, phi, 0.0)
    }

    pub fn bjet(self, pt: f64, eta: f64, phi: f64) -> Self {
        self.tagged_jet(pt, eta, phi, 0.95)
    }

    pub fn tagged_jet(mut self, pt: f64, eta: f64, phi: f64, csv: f64) -> Self {
        self.event.jets.push(Jet {
            pt,
            eta,
            phi,
            mass: 0.0,
            csv,
        });
        self
    }

    pub fn electrons(mut self, n: usize) -> Self {
        for _ in 0..n {
            self.event.electrons.push(Electron {
                pt: 20.0,
                eta: 0.5,
                phi: 1.0,
            });
        }
        self
    }

    pub fn extra_muons(mut self, n: usize) -> Self {
        for _ in 0..n {
            self.event.extra_muons.push(Muon {
                pt: 20.0,
                eta: -0.5,
                phi: -1.0,
            });
        }
        self
    }

    pub fn bdt(mut self, score: f64) -> Self {
        self.event.bdt_score = Some(score);
        self
    }

    pub fn weight(mut self, w: f64) -> Self {
        self.event.weight = w;
        self
    }

    pub fn build(self) -> EventRecord {
        self.event
    }
}

/// Two jets passing every VBF-tight cut: mjj ~ 858, |dEta| = 4.5.
pub fn vbf_tight_jets(b: EventBuilder) -> EventBuilder {
    b.jet(100.0, 2.5, 0.0).jet(80.0, -2.0, std::f64::consts::PI)
}

/// Reset, evaluate, and return the active keys.
pub fn categorize(c: &mut dyn Categorizer, event: &EventRecord) -> Vec<String> {
    let vars = VarSet::from_event(event);
    c.reset();
    c.evaluate(&vars);
    c.categories()
        .active_keys()
        .into_iter()
        .map(str::to_string)
        .collect()
}

pub fn has(keys: &[String], key: &str) -> bool {
    keys.iter().any(|k| k == key)
}
