use super::registry::CategoryMap;
use super::Categorizer;
use crate::config::FewzCuts;
use crate::vars::VarSet;

const CROSSED: [&str; 3] = ["c_Central_Central", "c_Central_Not_Central", "c_1Jet"];

/// Mass-window and muon-centrality categories for comparing Drell-Yan
/// simulation against the FEWZ prediction.
#[derive(Debug, Clone)]
pub struct FewzCategorizer {
    pub cuts: FewzCuts,
    pub categories: CategoryMap,
}

impl FewzCategorizer {
    pub fn new(cuts: FewzCuts) -> Self {
        let mut categories = CategoryMap::new();
        categories.register("c_Wide", false, false);
        categories.register("c_Narrow", false, false);

        categories.register("c_Central_Central", true, false);
        categories.register("c_Central_Not_Central", true, false);

        categories.register("c_1Jet", false, false);
        for window in ["Wide", "Narrow"] {
            for base in CROSSED {
                categories.register(&format!("{}_{}", base, window), false, false);
            }
        }

        Self { cuts, categories }
    }
}

impl Default for FewzCategorizer {
    fn default() -> Self {
        Self::new(FewzCuts::default())
    }
}

impl Categorizer for FewzCategorizer {
    fn categories(&self) -> &CategoryMap {
        &self.categories
    }

    fn categories_mut(&mut self) -> &mut CategoryMap {
        &mut self.categories
    }

    fn evaluate(&mut self, vars: &VarSet) {
        let c = &self.cuts;
        let eta0 = vars.mu1().eta.abs();
        let eta1 = vars.mu2().eta.abs();

        // every event reaching this point is inside the wide window
        self.categories.set("c_Wide");
        let narrow = vars.dimuon.mass < c.mass_split;
        if narrow {
            self.categories.set("c_Narrow");
        }

        if eta0 < c.eta_central_max && eta1 < c.eta_central_max {
            self.categories.set("c_Central_Central");
        } else if eta0 < c.eta_central_max || eta1 < c.eta_central_max {
            self.categories.set("c_Central_Not_Central");
        }

        if vars.valid_jets.len() == 1 {
            self.categories.set("c_1Jet");
        }

        let crossings = [
            ("c_Central_Central", "c_Central_Central_Wide", "c_Central_Central_Narrow"),
            (
                "c_Central_Not_Central",
                "c_Central_Not_Central_Wide",
                "c_Central_Not_Central_Narrow",
            ),
            ("c_1Jet", "c_1Jet_Wide", "c_1Jet_Narrow"),
        ];
        for (base, wide, narrow_key) in crossings {
            if self.categories.is_in(base) {
                self.categories.set(wide);
                if narrow {
                    self.categories.set(narrow_key);
                }
            }
        }
    }
}
