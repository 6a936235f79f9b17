use crate::error::DfResult;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Every cut used by the categorizers and the object cleaning, grouped by consumer.
#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CutConfig {
    #[command(flatten)]
    pub run1: Run1Cuts,
    #[command(flatten)]
    pub run2: Run2Cuts,
    #[command(flatten)]
    pub fewz: FewzCuts,
    #[command(flatten)]
    pub jets: JetCuts,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Run1Cuts {
    // === 2-JET PRESELECTION ===
    #[arg(long, default_value_t = 40.0)]
    pub lead_pt_min: f64,
    #[arg(long, default_value_t = 30.0)]
    pub sublead_pt_min: f64,
    #[arg(long, default_value_t = 40.0)]
    pub met_max: f64,

    // === VBF TIGHT ===
    #[arg(long, default_value_t = 650.0)]
    pub vbf_tight_mjj_min: f64,
    #[arg(long, default_value_t = 3.5)]
    pub vbf_tight_deta_min: f64,

    // === GGF TIGHT ===
    #[arg(long, default_value_t = 250.0)]
    pub ggf_tight_mjj_min: f64,
    #[arg(long, default_value_t = 50.0)]
    pub ggf_tight_dimu_pt_min: f64,

    // === 01-JET ===
    #[arg(long, default_value_t = 25.0)]
    pub tight_01jet_dimu_pt_min: f64,

    // === GEOMETRY ===
    #[arg(long, default_value_t = 0.8)]
    pub run1_barrel_max: f64,
    #[arg(long, default_value_t = 1.6)]
    pub run1_overlap_max: f64,
}

impl Default for Run1Cuts {
    fn default() -> Self {
        Self {
            lead_pt_min: 40.0,
            sublead_pt_min: 30.0,
            met_max: 40.0,
            vbf_tight_mjj_min: 650.0,
            vbf_tight_deta_min: 3.5,
            ggf_tight_mjj_min: 250.0,
            ggf_tight_dimu_pt_min: 50.0,
            tight_01jet_dimu_pt_min: 25.0,
            run1_barrel_max: 0.8,
            run1_overlap_max: 1.6,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Run2Cuts {
    // === PRESELECTION ===
    #[arg(long, default_value_t = 2)]
    pub pre_extra_leptons_max: usize,
    #[arg(long, default_value_t = 1)]
    pub pre_bjets_min: usize,

    // === 1B ===
    #[arg(long, default_value_t = 2)]
    pub tth_extra_leptons: usize,
    #[arg(long, default_value_t = 0)]
    pub tth_bbh_extra_leptons: usize,

    // === 0B ===
    #[arg(long, default_value_t = 1)]
    pub vlh_extra_leptons_min: usize,
    #[arg(long, default_value_t = 2)]
    pub nonvlh_jets_min: usize,

    // 2-jet
    #[arg(long, default_value_t = 500.0)]
    pub run2_vbf_tight_mjj_min: f64,
    #[arg(long, default_value_t = 2.5)]
    pub run2_vbf_tight_deta_min: f64,
    #[arg(long, default_value_t = 250.0)]
    pub run2_vbf_loose_mjj_min: f64,
    #[arg(long, default_value_t = 2.5)]
    pub run2_vbf_loose_deta_min: f64,
    #[arg(long, default_value_t = 60.0)]
    pub vhad_mjj_min: f64,
    #[arg(long, default_value_t = 110.0)]
    pub vhad_mjj_max: f64,
    #[arg(long, default_value_t = 1.5)]
    pub vhad_deta_jj_mumu_max: f64,

    // 01-jet
    #[arg(long, default_value_t = 40.0)]
    pub zvvh_met_min: f64,
    #[arg(long, default_value_t = 25.0)]
    pub gf_tight_dimu_pt_min: f64,

    // V(lept)H
    #[arg(long, default_value_t = 40.0)]
    pub vlh_met_min: f64,

    // === GEOMETRY ===
    #[arg(long, default_value_t = 0.8)]
    pub geo_barrel_max: f64,
    #[arg(long, default_value_t = 1.6)]
    pub geo_overlap_max: f64,
    #[arg(long, default_value_t = 2.4)]
    pub geo_endcap_max: f64,

    // === LEPTON SIGNATURES (electrons, muons) ===
    #[arg(skip = LeptonSignatures::default())]
    pub signatures: LeptonSignatures,
}

impl Default for Run2Cuts {
    fn default() -> Self {
        Self {
            pre_extra_leptons_max: 2,
            pre_bjets_min: 1,
            tth_extra_leptons: 2,
            tth_bbh_extra_leptons: 0,
            vlh_extra_leptons_min: 1,
            nonvlh_jets_min: 2,
            run2_vbf_tight_mjj_min: 500.0,
            run2_vbf_tight_deta_min: 2.5,
            run2_vbf_loose_mjj_min: 250.0,
            run2_vbf_loose_deta_min: 2.5,
            vhad_mjj_min: 60.0,
            vhad_mjj_max: 110.0,
            vhad_deta_jj_mumu_max: 1.5,
            zvvh_met_min: 40.0,
            gf_tight_dimu_pt_min: 25.0,
            vlh_met_min: 40.0,
            geo_barrel_max: 0.8,
            geo_overlap_max: 1.6,
            geo_endcap_max: 2.4,
            signatures: LeptonSignatures::default(),
        }
    }
}

/// Exact (electron, muon) multiplicities naming each V(lept)H decay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeptonSignatures {
    pub we: (usize, usize),
    pub wmu: (usize, usize),
    pub ztautau: (usize, usize),
    pub zmumu: (usize, usize),
    pub zee: (usize, usize),
}

impl Default for LeptonSignatures {
    fn default() -> Self {
        Self {
            we: (1, 0),
            wmu: (0, 1),
            ztautau: (1, 1),
            zmumu: (0, 2),
            zee: (2, 0),
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FewzCuts {
    #[arg(long, default_value_t = 160.0)]
    pub mass_split: f64,
    #[arg(long, default_value_t = 0.8)]
    pub eta_central_max: f64,
}

impl Default for FewzCuts {
    fn default() -> Self {
        Self {
            mass_split: 160.0,
            eta_central_max: 0.8,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JetCuts {
    #[arg(long, default_value_t = 30.0)]
    pub jet_pt_min: f64,
    #[arg(long, default_value_t = 4.7)]
    pub jet_eta_max: f64,
    #[arg(long, default_value_t = 0.8484)]
    pub btag_min: f64,
    #[arg(long, default_value_t = 2.4)]
    pub bjet_eta_max: f64,
}

impl Default for JetCuts {
    fn default() -> Self {
        Self {
            jet_pt_min: 30.0,
            jet_eta_max: 4.7,
            btag_min: 0.8484,
            bjet_eta_max: 2.4,
        }
    }
}

impl CutConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> DfResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Overwrites fields with values the user typed on the command line.
    /// Defaults filled in by clap never override values read from a file.
    pub fn merge_from_cli(&mut self, cli: &CutConfig, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($group:ident, $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$group.$field = cli.$group.$field.clone();
                }
            };
        }

        update_if_present!(run1, lead_pt_min);
        update_if_present!(run1, sublead_pt_min);
        update_if_present!(run1, met_max);
        update_if_present!(run1, vbf_tight_mjj_min);
        update_if_present!(run1, vbf_tight_deta_min);
        update_if_present!(run1, ggf_tight_mjj_min);
        update_if_present!(run1, ggf_tight_dimu_pt_min);
        update_if_present!(run1, tight_01jet_dimu_pt_min);
        update_if_present!(run1, run1_barrel_max);
        update_if_present!(run1, run1_overlap_max);

        update_if_present!(run2, pre_extra_leptons_max);
        update_if_present!(run2, pre_bjets_min);
        update_if_present!(run2, tth_extra_leptons);
        update_if_present!(run2, tth_bbh_extra_leptons);
        update_if_present!(run2, vlh_extra_leptons_min);
        update_if_present!(run2, nonvlh_jets_min);
        update_if_present!(run2, run2_vbf_tight_mjj_min);
        update_if_present!(run2, run2_vbf_tight_deta_min);
        update_if_present!(run2, run2_vbf_loose_mjj_min);
        update_if_present!(run2, run2_vbf_loose_deta_min);
        update_if_present!(run2, vhad_mjj_min);
        update_if_present!(run2, vhad_mjj_max);
        update_if_present!(run2, vhad_deta_jj_mumu_max);
        update_if_present!(run2, zvvh_met_min);
        update_if_present!(run2, gf_tight_dimu_pt_min);
        update_if_present!(run2, vlh_met_min);
        update_if_present!(run2, geo_barrel_max);
        update_if_present!(run2, geo_overlap_max);
        update_if_present!(run2, geo_endcap_max);

        update_if_present!(fewz, mass_split);
        update_if_present!(fewz, eta_central_max);

        update_if_present!(jets, jet_pt_min);
        update_if_present!(jets, jet_eta_max);
        update_if_present!(jets, btag_min);
        update_if_present!(jets, bjet_eta_max);
    }
}
