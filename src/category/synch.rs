use super::registry::CategoryMap;
use super::run1::{classify_dijets, dijet_key};
use super::Categorizer;
use crate::config::Run1Cuts;
use crate::vars::VarSet;

/// Run-1 jet categories used for cross-group synchronisation: no MET veto,
/// a b-jet veto instead, and no geometric split.
#[derive(Debug, Clone)]
pub struct SynchCategorizer {
    pub cuts: Run1Cuts,
    pub categories: CategoryMap,
}

impl SynchCategorizer {
    pub fn new(cuts: Run1Cuts) -> Self {
        let mut categories = CategoryMap::new();
        categories.register("c_ALL", false, false);

        categories.register("c_2_Jet", true, false);
        categories.register("c_01_Jet", true, false);

        categories.register("c_2_Jet_VBF_Tight", false, false);
        categories.register("c_2_Jet_VBF_Loose", false, false);
        categories.register("c_2_Jet_GGF_Tight", false, false);
        categories.register("c_01_Jet_Tight", false, false);
        categories.register("c_01_Jet_Loose", false, false);

        Self { cuts, categories }
    }
}

impl Default for SynchCategorizer {
    fn default() -> Self {
        Self::new(Run1Cuts::default())
    }
}

impl Categorizer for SynchCategorizer {
    fn categories(&self) -> &CategoryMap {
        &self.categories
    }

    fn categories_mut(&mut self) -> &mut CategoryMap {
        &mut self.categories
    }

    fn evaluate(&mut self, vars: &VarSet) {
        self.categories.set("c_ALL");

        let two_jet = match vars.valid_jets.as_slice() {
            [lead, sublead, ..] => {
                lead.pt > self.cuts.lead_pt_min
                    && sublead.pt > self.cuts.sublead_pt_min
                    && vars.valid_bjets.is_empty()
            }
            _ => false,
        };

        if two_jet {
            self.categories.set("c_2_Jet");
            let class = classify_dijets(&vars.valid_jets, vars.dimuon.pt, &self.cuts);
            self.categories.set(dijet_key(class));
            return;
        }

        self.categories.set("c_01_Jet");
        if vars.dimuon.pt > self.cuts.tight_01jet_dimu_pt_min {
            self.categories.set("c_01_Jet_Tight");
        } else {
            self.categories.set("c_01_Jet_Loose");
        }
    }
}
