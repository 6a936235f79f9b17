use super::geometry::{GeometryCuts, MuonGeometry};
use super::registry::CategoryMap;
use super::Categorizer;
use crate::config::Run1Cuts;
use crate::vars::{FourVector, VarSet};

/// Outcome of the dijet scan for events that pass the 2-jet preselection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DijetClass {
    VbfTight,
    GgfTight,
    VbfLoose,
}

/// Scans jet pairs whose first jet clears the lead-pt cut. The first pair passing the
/// VBF-tight mass and |dEta| cuts wins immediately; otherwise the largest dijet mass
/// decides between GGF-tight and VBF-loose.
pub fn classify_dijets(jets: &[FourVector], dimu_pt: f64, cuts: &Run1Cuts) -> DijetClass {
    let mut mjj_max = -1.0_f64;

    for (i, ji) in jets.iter().enumerate() {
        if !(ji.pt > cuts.lead_pt_min) {
            break;
        }
        for jj in &jets[i + 1..] {
            let deta = ji.eta - jj.eta;
            let mjj = (*ji + *jj).mass();
            if mjj > mjj_max {
                mjj_max = mjj;
            }
            if mjj > cuts.vbf_tight_mjj_min && deta.abs() > cuts.vbf_tight_deta_min {
                return DijetClass::VbfTight;
            }
        }
    }

    if mjj_max > cuts.ggf_tight_mjj_min && dimu_pt > cuts.ggf_tight_dimu_pt_min {
        DijetClass::GgfTight
    } else {
        DijetClass::VbfLoose
    }
}

pub(crate) fn dijet_key(class: DijetClass) -> &'static str {
    match class {
        DijetClass::VbfTight => "c_2_Jet_VBF_Tight",
        DijetClass::GgfTight => "c_2_Jet_GGF_Tight",
        DijetClass::VbfLoose => "c_2_Jet_VBF_Loose",
    }
}

/// Run-1 style hierarchy: muon geometry, then 2-jet (VBF/GGF) or 0/1-jet
/// categories, the latter crossed with the geometry.
#[derive(Debug, Clone)]
pub struct Run1Categorizer {
    pub cuts: Run1Cuts,
    pub geometry: GeometryCuts,
    pub categories: CategoryMap,
    geo_keys: Vec<String>,
    tight_geo_keys: Vec<String>,
    loose_geo_keys: Vec<String>,
}

impl Run1Categorizer {
    pub fn new(cuts: Run1Cuts) -> Self {
        let geometry = GeometryCuts::new(cuts.run1_barrel_max, cuts.run1_overlap_max);
        let mut categories = CategoryMap::new();

        categories.register("c_ALL", false, false);

        categories.register("c_2_Jet", false, false);
        categories.register("c_01_Jet", false, false);

        categories.register("c_2_Jet_VBF_Tight", false, true);
        categories.register("c_2_Jet_VBF_Loose", false, true);
        categories.register("c_2_Jet_GGF_Tight", false, true);
        categories.register("c_01_Jet_Tight", false, false);
        categories.register("c_01_Jet_Loose", false, false);

        let geo_keys: Vec<String> = MuonGeometry::all().map(|g| g.key()).collect();
        for k in &geo_keys {
            categories.register(k, true, false);
        }

        let tight_geo_keys: Vec<String> = MuonGeometry::all()
            .map(|g| format!("c_01_Jet_Tight_{}", g))
            .collect();
        let loose_geo_keys: Vec<String> = MuonGeometry::all()
            .map(|g| format!("c_01_Jet_Loose_{}", g))
            .collect();
        for k in tight_geo_keys.iter().chain(&loose_geo_keys) {
            categories.register(k, false, true);
        }

        Self {
            cuts,
            geometry,
            categories,
            geo_keys,
            tight_geo_keys,
            loose_geo_keys,
        }
    }

    fn passes_2jet_preselection(&self, vars: &VarSet) -> bool {
        match vars.valid_jets.as_slice() {
            [lead, sublead, ..] => {
                lead.pt > self.cuts.lead_pt_min
                    && sublead.pt > self.cuts.sublead_pt_min
                    && vars.met.pt < self.cuts.met_max
            }
            _ => false,
        }
    }
}

impl Default for Run1Categorizer {
    fn default() -> Self {
        Self::new(Run1Cuts::default())
    }
}

impl Categorizer for Run1Categorizer {
    fn categories(&self) -> &CategoryMap {
        &self.categories
    }

    fn categories_mut(&mut self) -> &mut CategoryMap {
        &mut self.categories
    }

    fn evaluate(&mut self, vars: &VarSet) {
        self.categories.set("c_ALL");

        let region = self.geometry.classify(vars.mu1().eta, vars.mu2().eta);
        if let Some(g) = region {
            self.categories.set(&self.geo_keys[g as usize]);
        }

        if self.passes_2jet_preselection(vars) {
            self.categories.set("c_2_Jet");
            let class = classify_dijets(&vars.valid_jets, vars.dimuon.pt, &self.cuts);
            self.categories.set(dijet_key(class));
            return;
        }

        self.categories.set("c_01_Jet");
        let tight = vars.dimuon.pt > self.cuts.tight_01jet_dimu_pt_min;
        let geo_leaves = if tight {
            self.categories.set("c_01_Jet_Tight");
            &self.tight_geo_keys
        } else {
            self.categories.set("c_01_Jet_Loose");
            &self.loose_geo_keys
        };
        if let Some(g) = region {
            self.categories.set(&geo_leaves[g as usize]);
        }
    }
}
