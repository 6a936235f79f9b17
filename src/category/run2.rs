use super::geometry::{GeometryCuts, MuonGeometry};
use super::registry::CategoryMap;
use super::Categorizer;
use crate::config::Run2Cuts;
use crate::vars::VarSet;

/// Run-2 hierarchy.
///
/// ```text
/// c_ALL
/// ├── c_{BB,OO,EE,BO,BE,OE}            muon geometry (hidden)
/// ├── c_Preselection_Fail              too many extra leptons
/// └── c_Preselection_Pass
///     ├── c_1b                         >= 1 b-jet
///     │   ├── c_1b_TTH                 2 extra leptons
///     │   ├── c_1b_TTH_BBH             0 extra leptons
///     │   └── c_1b_Leftovers
///     └── c_0b
///         ├── c_0b_VlH                 >= 1 extra lepton
///         │   └── We / Wmu / Ztautau (high MET), Zmumu / Zee (low MET), Leftovers
///         └── c_0b_nonVlH
///             ├── _2j                  VBF_Tight, VBF_Loose, V_Hadronic_H, gF
///             └── _01j                 ZvvH, gF_Tight_<geo>, gF_Loose_<geo>
/// ```
#[derive(Debug, Clone)]
pub struct Run2Categorizer {
    pub cuts: Run2Cuts,
    pub geometry: GeometryCuts,
    pub categories: CategoryMap,
    geo_keys: Vec<String>,
    gf_tight_geo_keys: Vec<String>,
    gf_loose_geo_keys: Vec<String>,
}

impl Run2Categorizer {
    pub fn new(cuts: Run2Cuts) -> Self {
        let geometry = GeometryCuts::new(cuts.geo_barrel_max, cuts.geo_overlap_max);
        let mut c = CategoryMap::new();

        // === INCLUSIVE ===
        c.register("c_ALL", false, false);

        // === GEOMETRY ===
        for key in ["c_BB", "c_BO", "c_BE", "c_OO", "c_OE", "c_EE"] {
            c.register(key, true, false);
        }

        // === PRESELECTION ===
        c.register("c_Preselection_Pass", false, false);

        // >= 1 b-jet
        c.register("c_1b", false, false);
        c.register("c_1b_TTH", false, false);
        c.register("c_1b_TTH_2e", true, false);
        c.register("c_1b_TTH_1e_1mu", true, false);
        c.register("c_1b_TTH_2mu", true, false);
        c.register("c_1b_TTH_BBH", false, false);
        c.register("c_1b_TTH_BBH_Tight", true, false);
        c.register("c_1b_TTH_BBH_V_Hadronic_H", true, false);
        c.register("c_1b_Leftovers", false, false);

        // no b-jets
        c.register("c_0b", false, false);
        c.register("c_0b_nonVlH", false, false);

        c.register("c_0b_nonVlH_2j", false, false);
        c.register("c_0b_nonVlH_2j_VBF_Tight", false, false);
        c.register("c_0b_nonVlH_2j_VBF_Loose", false, false);
        c.register("c_0b_nonVlH_2j_V_Hadronic_H", false, false);
        c.register("c_0b_nonVlH_2j_gF", false, false);

        c.register("c_0b_nonVlH_01j", false, false);
        c.register("c_0b_nonVlH_01j_ZvvH", false, false);

        let gf_keys = |tier: &str| -> Vec<String> {
            ["BB", "BO", "BE", "OO", "OE", "EE"]
                .iter()
                .map(|g| format!("c_0b_nonVlH_01j_gF_{}_{}", tier, g))
                .collect()
        };
        c.register("c_0b_nonVlH_01j_gF_Tight", false, false);
        for k in gf_keys("Tight") {
            c.register(&k, false, false);
        }
        c.register("c_0b_nonVlH_01j_gF_Loose", false, false);
        for k in gf_keys("Loose") {
            c.register(&k, false, false);
        }

        c.register("c_0b_VlH", false, false);
        for decay in ["We", "Wmu", "Ztautau", "Zmumu", "Zee", "Leftovers"] {
            c.register(&format!("c_0b_VlH_{}", decay), false, false);
        }

        c.register("c_Preselection_Fail", false, false);

        // lookup tables indexed by MuonGeometry discriminant
        let geo_keys = MuonGeometry::all().map(|g| g.key()).collect();
        let gf_tight_geo_keys = MuonGeometry::all()
            .map(|g| format!("c_0b_nonVlH_01j_gF_Tight_{}", g))
            .collect();
        let gf_loose_geo_keys = MuonGeometry::all()
            .map(|g| format!("c_0b_nonVlH_01j_gF_Loose_{}", g))
            .collect();

        Self {
            cuts,
            geometry,
            categories: c,
            geo_keys,
            gf_tight_geo_keys,
            gf_loose_geo_keys,
        }
    }

    fn evaluate_muon_geometry(&mut self, vars: &VarSet) -> Option<MuonGeometry> {
        let region = self.geometry.classify(vars.mu1().eta, vars.mu2().eta);
        if let Some(g) = region {
            self.categories.set(&self.geo_keys[g as usize]);
        }
        region
    }

    fn evaluate_1b(&mut self, vars: &VarSet) {
        let n_extra = vars.n_extra_leptons();
        if n_extra == self.cuts.tth_extra_leptons {
            self.categories.set("c_1b_TTH");
        } else if n_extra == self.cuts.tth_bbh_extra_leptons {
            self.categories.set("c_1b_TTH_BBH");
        } else {
            self.categories.set("c_1b_Leftovers");
        }
    }

    fn evaluate_vlh(&mut self, vars: &VarSet) {
        let sig = self.cuts.signatures;
        let counts = (vars.valid_electrons.len(), vars.valid_extra_muons.len());

        let key = if vars.met.pt >= self.cuts.vlh_met_min {
            if counts == sig.we {
                "c_0b_VlH_We"
            } else if counts == sig.wmu {
                "c_0b_VlH_Wmu"
            } else if counts == sig.ztautau {
                "c_0b_VlH_Ztautau"
            } else {
                "c_0b_VlH_Leftovers"
            }
        } else if counts == sig.zmumu {
            "c_0b_VlH_Zmumu"
        } else if counts == sig.zee {
            "c_0b_VlH_Zee"
        } else {
            "c_0b_VlH_Leftovers"
        };
        self.categories.set(key);
    }

    fn evaluate_nonvlh_2j(&mut self, vars: &VarSet) {
        let c = &self.cuts;
        let (lead, sublead, dijet) = match vars.leading_dijet() {
            Some(jets) => jets,
            None => panic!(
                "2-jet branch reached with {} valid jets",
                vars.valid_jets.len()
            ),
        };

        let deta = (lead.eta - sublead.eta).abs();
        let mjj = dijet.mass();
        let deta_jj_mumu = (dijet.eta - vars.dimuon.eta).abs();

        let key = if mjj > c.run2_vbf_tight_mjj_min && deta > c.run2_vbf_tight_deta_min {
            "c_0b_nonVlH_2j_VBF_Tight"
        } else if mjj > c.run2_vbf_loose_mjj_min && deta > c.run2_vbf_loose_deta_min {
            "c_0b_nonVlH_2j_VBF_Loose"
        } else if mjj > c.vhad_mjj_min && mjj < c.vhad_mjj_max && deta_jj_mumu < c.vhad_deta_jj_mumu_max {
            "c_0b_nonVlH_2j_V_Hadronic_H"
        } else {
            "c_0b_nonVlH_2j_gF"
        };
        self.categories.set(key);
    }

    fn evaluate_nonvlh_01j(&mut self, vars: &VarSet, region: Option<MuonGeometry>) {
        if vars.met.pt > self.cuts.zvvh_met_min {
            self.categories.set("c_0b_nonVlH_01j_ZvvH");
            return;
        }

        let leaves = if vars.dimuon.pt >= self.cuts.gf_tight_dimu_pt_min {
            self.categories.set("c_0b_nonVlH_01j_gF_Tight");
            &self.gf_tight_geo_keys
        } else {
            self.categories.set("c_0b_nonVlH_01j_gF_Loose");
            &self.gf_loose_geo_keys
        };
        if let Some(g) = region {
            self.categories.set(&leaves[g as usize]);
        }
    }
}

impl Default for Run2Categorizer {
    fn default() -> Self {
        Self::new(Run2Cuts::default())
    }
}

impl Categorizer for Run2Categorizer {
    fn categories(&self) -> &CategoryMap {
        &self.categories
    }

    fn categories_mut(&mut self) -> &mut CategoryMap {
        &mut self.categories
    }

    fn evaluate(&mut self, vars: &VarSet) {
        self.categories.set("c_ALL");
        let region = self.evaluate_muon_geometry(vars);

        let n_extra = vars.n_extra_leptons();
        if n_extra > self.cuts.pre_extra_leptons_max {
            self.categories.set("c_Preselection_Fail");
            return;
        }
        self.categories.set("c_Preselection_Pass");

        if vars.valid_bjets.len() >= self.cuts.pre_bjets_min {
            self.categories.set("c_1b");
            self.evaluate_1b(vars);
            return;
        }

        self.categories.set("c_0b");
        if n_extra >= self.cuts.vlh_extra_leptons_min {
            self.categories.set("c_0b_VlH");
            self.evaluate_vlh(vars);
        } else {
            self.categories.set("c_0b_nonVlH");
            if vars.valid_jets.len() >= self.cuts.nonvlh_jets_min {
                self.categories.set("c_0b_nonVlH_2j");
                self.evaluate_nonvlh_2j(vars);
            } else {
                self.categories.set("c_0b_nonVlH_01j");
                self.evaluate_nonvlh_01j(vars, region);
            }
        }
    }
}
