use super::registry::CategoryMap;
use super::Categorizer;
use crate::vars::VarSet;

/// Score boundaries of the fifteen bins.
pub const SCORE_CUTS: [f64; 6] = [-0.4, 0.05, 0.25, 0.4, 0.65, 0.73];
/// Max |eta| boundaries splitting the four middle score bands.
pub const ETA_CUTS: [f64; 2] = [0.9, 1.9];

pub const N_BINS: usize = 15;

/// Bins events by BDT score and the larger |eta| of the two muons.
///
/// Below -0.4 is `c0`. The bands [-0.4, 0.05), [0.05, 0.25), [0.25, 0.4)
/// and [0.4, 0.65) each split three ways by max |eta|, forward first:
/// `>= 1.9`, `[0.9, 1.9)`, `< 0.9`. [0.65, 0.73) is `c13` and the rest `c14`.
#[derive(Debug, Clone)]
pub struct BdtCategorizer {
    pub categories: CategoryMap,
    keys: Vec<String>,
}

impl BdtCategorizer {
    pub fn new() -> Self {
        let mut categories = CategoryMap::new();
        categories.register("cAll", false, false);
        let keys: Vec<String> = (0..N_BINS).map(|i| format!("c{}", i)).collect();
        for k in &keys {
            categories.register(k, false, true);
        }
        Self { categories, keys }
    }

    /// Index of the bin a (score, max |eta|) pair falls into.
    pub fn bin(score: f64, max_eta: f64) -> usize {
        let [s0, s1, s2, s3, s4, s5] = SCORE_CUTS;
        let [e_lo, e_hi] = ETA_CUTS;

        let band_first = if score < s0 {
            return 0;
        } else if score < s1 {
            1
        } else if score < s2 {
            4
        } else if score < s3 {
            7
        } else if score < s4 {
            10
        } else if score < s5 {
            return 13;
        } else {
            return 14;
        };

        if max_eta >= e_hi {
            band_first
        } else if max_eta >= e_lo {
            band_first + 1
        } else {
            band_first + 2
        }
    }
}

impl Default for BdtCategorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Categorizer for BdtCategorizer {
    fn categories(&self) -> &CategoryMap {
        &self.categories
    }

    fn categories_mut(&mut self) -> &mut CategoryMap {
        &mut self.categories
    }

    fn evaluate(&mut self, vars: &VarSet) {
        let score = vars.get_value("bdt_score");
        let max_eta = vars.get_value("dimu_max_abs_eta");

        self.categories.set("cAll");
        let bin = Self::bin(score, max_eta);
        self.categories.set(&self.keys[bin]);
    }
}
