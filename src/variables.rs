use crate::vars::VarSet;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Quantities the driver can histogram per category.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PlotVariable {
    DimuMass,
    DimuPt,
    MuPt,
    MuEta,
    Npv,
    JetPt,
    JetEta,
    NValidJets,
    MJj,
    DetaJj,
}

/// Alternative mass ranges for `dimu_mass`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, EnumString, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MassBinning {
    #[default]
    Default,
    /// 110 to 160, used for limit setting
    Limit,
    Wide,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Binning {
    pub bins: usize,
    pub min: f64,
    pub max: f64,
}

impl Binning {
    const fn new(bins: usize, min: f64, max: f64) -> Self {
        Self { bins, min, max }
    }
}

impl PlotVariable {
    pub fn binning(&self, mass_binning: MassBinning) -> Binning {
        match self {
            Self::DimuMass => match mass_binning {
                MassBinning::Default => Binning::new(150, 50.0, 200.0),
                MassBinning::Limit => Binning::new(50, 110.0, 160.0),
                MassBinning::Wide => Binning::new(100, 110.0, 310.0),
            },
            Self::DimuPt => Binning::new(200, 0.0, 100.0),
            Self::MuPt => Binning::new(200, 0.0, 150.0),
            Self::MuEta => Binning::new(100, -2.5, 2.5),
            Self::Npv => Binning::new(50, 0.0, 50.0),
            Self::JetPt => Binning::new(200, 0.0, 200.0),
            Self::JetEta => Binning::new(100, -5.0, 5.0),
            Self::NValidJets => Binning::new(11, 0.0, 11.0),
            Self::MJj => Binning::new(200, 0.0, 2000.0),
            Self::DetaJj => Binning::new(100, -10.0, 10.0),
        }
    }

    /// Values to fill for one event; per-object variables give one value per object.
    pub fn values(&self, vars: &VarSet) -> Vec<f64> {
        match self {
            Self::DimuMass => vec![vars.dimuon.mass],
            Self::DimuPt => vec![vars.dimuon.pt],
            Self::MuPt => vec![vars.mu1().pt, vars.mu2().pt],
            Self::MuEta => vec![vars.mu1().eta, vars.mu2().eta],
            Self::Npv => vec![vars.n_vertices as f64],
            Self::JetPt => vars.valid_jets.iter().map(|j| j.pt).collect(),
            Self::JetEta => vars.valid_jets.iter().map(|j| j.eta).collect(),
            Self::NValidJets => vec![vars.valid_jets.len() as f64],
            Self::MJj => vars
                .leading_dijet()
                .map(|(_, _, jj)| vec![jj.mass()])
                .unwrap_or_default(),
            Self::DetaJj => vars
                .leading_dijet()
                .map(|(j0, j1, _)| vec![j0.eta - j1.eta])
                .unwrap_or_default(),
        }
    }
}
