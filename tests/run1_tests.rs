use dimuforge::category::run1::{classify_dijets, DijetClass};
use dimuforge::category::{Categorizer, GeometryCuts, MuonGeometry, Run1Categorizer, SynchCategorizer};
use dimuforge::config::Run1Cuts;
use dimuforge::vars::FourVector;
use proptest::prelude::*;
use rstest::rstest;
use std::f64::consts::PI;

mod common;
use common::{categorize, has, vbf_tight_jets, EventBuilder};

// === GEOMETRY ===

#[rstest]
#[case(0.1, 0.7, MuonGeometry::BB)]
#[case(0.8, 1.59, MuonGeometry::OO)] // 0.8 is already overlap
#[case(-1.6, 2.3, MuonGeometry::EE)]
#[case(0.3, -1.2, MuonGeometry::BO)]
#[case(2.1, 0.0, MuonGeometry::BE)]
#[case(-1.0, 1.7, MuonGeometry::OE)]
fn test_geometry_classification(#[case] eta1: f64, #[case] eta2: f64, #[case] expected: MuonGeometry) {
    let cuts = GeometryCuts::default();
    assert_eq!(cuts.classify(eta1, eta2), Some(expected));
    assert_eq!(cuts.classify(eta2, eta1), Some(expected));
}

#[test]
fn test_geometry_nan_has_no_region() {
    assert_eq!(GeometryCuts::default().classify(f64::NAN, 0.1), None);
}

#[test]
fn test_geometry_keys() {
    let keys: Vec<String> = MuonGeometry::all().map(|g| g.key()).collect();
    assert_eq!(keys, vec!["c_BB", "c_OO", "c_EE", "c_BO", "c_BE", "c_OE"]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_geometry_partition(eta1 in -3.0..3.0f64, eta2 in -3.0..3.0f64) {
        let mut c = Run1Categorizer::default();
        let event = EventBuilder::new().muon_etas(eta1, eta2).build();
        let keys = categorize(&mut c, &event);

        let n_geo = MuonGeometry::all().filter(|g| has(&keys, &g.key())).count();
        prop_assert_eq!(n_geo, 1);
        prop_assert_eq!(
            GeometryCuts::default().classify(eta1, eta2),
            GeometryCuts::default().classify(eta2, eta1)
        );
    }

    #[test]
    fn prop_single_jet_class(dimu_pt in 0.0..200.0f64, pt1 in 41.0..300.0f64, pt2 in 31.0..200.0f64, eta1 in -4.5..4.5f64, eta2 in -4.5..4.5f64) {
        let mut c = Run1Categorizer::default();
        let event = EventBuilder::new().dimu_pt(dimu_pt).jet(pt1, eta1, 0.0).jet(pt2, eta2, 2.0).build();
        let keys = categorize(&mut c, &event);

        let n_classes = ["c_2_Jet_VBF_Tight", "c_2_Jet_GGF_Tight", "c_2_Jet_VBF_Loose"]
            .iter()
            .filter(|k| has(&keys, k))
            .count();
        prop_assert_eq!(n_classes, 1);
        prop_assert!(!has(&keys, "c_01_Jet"));
    }
}

// === DIJET SCAN ===

#[test]
fn test_scan_stops_at_first_tight_pair() {
    let cuts = Run1Cuts::default();
    let jets = vec![
        FourVector::new(100.0, 2.5, 0.0, 0.0),
        FourVector::new(80.0, -2.0, PI, 0.0),
        FourVector::new(60.0, 0.0, 1.0, 0.0),
    ];
    assert_eq!(classify_dijets(&jets, 0.0, &cuts), DijetClass::VbfTight);
}

#[test]
fn test_scan_ignores_pairs_led_by_soft_jets() {
    let cuts = Run1Cuts::default();
    // only the second jet would make a tight pair with the third, but it fails the lead cut
    let jets = vec![
        FourVector::new(45.0, 0.0, 0.0, 0.0),
        FourVector::new(35.0, 2.5, 0.0, 0.0),
        FourVector::new(34.0, -2.5, PI, 0.0),
    ];
    assert_eq!(classify_dijets(&jets, 0.0, &cuts), DijetClass::VbfLoose);
}

#[rstest]
#[case(60.0, DijetClass::GgfTight)]
#[case(50.0, DijetClass::VbfLoose)] // strict dimuon pt cut
#[case(40.0, DijetClass::VbfLoose)]
fn test_ggf_needs_dimuon_pt(#[case] dimu_pt: f64, #[case] expected: DijetClass) {
    let cuts = Run1Cuts::default();
    // mjj ~ 293, |dEta| = 2
    let jets = vec![
        FourVector::new(100.0, 1.0, 0.0, 0.0),
        FourVector::new(90.0, -1.0, PI, 0.0),
    ];
    assert_eq!(classify_dijets(&jets, dimu_pt, &cuts), expected);
}

/// Back-to-back pair with |dEta| = `eta1 - eta2`, heavy enough that only the dEta cut matters.
fn wide_pair(eta1: f64, eta2: f64) -> Vec<FourVector> {
    vec![
        FourVector::new(200.0, eta1, 0.0, 0.0),
        FourVector::new(150.0, eta2, PI, 0.0),
    ]
}

#[rstest]
#[case(2.0, -1.5, DijetClass::VbfLoose)] // |dEta| == 3.5 is not tight
#[case(2.1, -1.5, DijetClass::VbfTight)] // 3.6
#[case(-1.5, 2.0, DijetClass::VbfLoose)]
#[case(-1.5, 2.1, DijetClass::VbfTight)]
fn test_vbf_tight_deta_is_strict(#[case] eta1: f64, #[case] eta2: f64, #[case] expected: DijetClass) {
    let cuts = Run1Cuts::default();
    let jets = wide_pair(eta1, eta2);
    assert!((jets[0] + jets[1]).mass() > cuts.vbf_tight_mjj_min + 100.0);
    assert_eq!(classify_dijets(&jets, 0.0, &cuts), expected);
}

#[rstest]
#[case(0.0, DijetClass::GgfTight)] // mjj == cut is not tight
#[case(1.0, DijetClass::VbfTight)] // mjj == cut + 1
#[case(-1.0, DijetClass::GgfTight)]
fn test_vbf_tight_mjj_is_strict(#[case] above_cut: f64, #[case] expected: DijetClass) {
    let jets = wide_pair(2.5, -1.5);
    let mjj = (jets[0] + jets[1]).mass();
    let cuts = Run1Cuts {
        vbf_tight_mjj_min: mjj - above_cut,
        ..Run1Cuts::default()
    };
    assert_eq!(classify_dijets(&jets, 60.0, &cuts), expected);
}

// === FULL HIERARCHY ===

#[test]
fn test_vbf_tight_event() {
    let mut c = Run1Categorizer::default();
    let event = vbf_tight_jets(EventBuilder::new()).build();
    let keys = categorize(&mut c, &event);
    assert_eq!(keys, vec!["c_ALL", "c_2_Jet", "c_2_Jet_VBF_Tight", "c_BB"]);
}

#[rstest]
#[case(2.1, "c_2_Jet_VBF_Tight")]
#[case(2.0, "c_2_Jet_GGF_Tight")] // |dEta| == 3.5 falls through to the GGF check
fn test_vbf_tight_edge_in_hierarchy(#[case] eta1: f64, #[case] leaf: &str) {
    let mut c = Run1Categorizer::default();
    let event = EventBuilder::new()
        .dimu_pt(60.0)
        .jet(200.0, eta1, 0.0)
        .jet(150.0, -1.5, PI)
        .build();
    let keys = categorize(&mut c, &event);

    assert!(has(&keys, "c_2_Jet"));
    assert!(has(&keys, leaf));
    assert_eq!(keys.iter().filter(|k| k.starts_with("c_2_Jet_")).count(), 1);
    assert!(keys.iter().all(|k| !k.starts_with("c_01_Jet")));
}

#[test]
fn test_met_veto_sends_to_01_jet() {
    let mut c = Run1Categorizer::default();
    let event = vbf_tight_jets(EventBuilder::new()).met(40.0).dimu_pt(30.0).build();
    let keys = categorize(&mut c, &event);
    assert!(has(&keys, "c_01_Jet"));
    assert!(has(&keys, "c_01_Jet_Tight_BB"));
    assert!(!has(&keys, "c_2_Jet"));
}

#[test]
fn test_01_jet_tight_bb() {
    let mut c = Run1Categorizer::default();
    let event = EventBuilder::new().dimu_pt(30.0).muon_etas(0.1, 0.2).build();
    let keys = categorize(&mut c, &event);
    assert_eq!(
        keys,
        vec!["c_ALL", "c_01_Jet", "c_01_Jet_Tight", "c_BB", "c_01_Jet_Tight_BB"]
    );
}

#[rstest]
#[case(25.0, "c_01_Jet_Loose_OE")] // strict pt cut
#[case(25.1, "c_01_Jet_Tight_OE")]
fn test_01_jet_tiers(#[case] dimu_pt: f64, #[case] leaf: &str) {
    let mut c = Run1Categorizer::default();
    let event = EventBuilder::new()
        .dimu_pt(dimu_pt)
        .muon_etas(1.0, -2.0)
        .jet(50.0, 0.0, 0.0)
        .build();
    let keys = categorize(&mut c, &event);
    assert!(has(&keys, leaf), "{:?}", keys);
    assert!(has(&keys, "c_OE"));
}

#[test]
fn test_geometry_categories_are_hidden() {
    let c = Run1Categorizer::default();
    for g in MuonGeometry::all() {
        assert!(c.categories().get(&g.key()).unwrap().hide);
    }
    assert_eq!(c.categories().iter().filter(|x| x.is_terminal).count(), 15);
}

// === SYNCHRONISATION ===

#[test]
fn test_synch_ignores_met() {
    let mut c = SynchCategorizer::default();
    let event = vbf_tight_jets(EventBuilder::new()).met(120.0).build();
    let keys = categorize(&mut c, &event);
    assert_eq!(keys, vec!["c_ALL", "c_2_Jet", "c_2_Jet_VBF_Tight"]);
}

#[test]
fn test_synch_vetoes_bjets() {
    let mut c = SynchCategorizer::default();
    let event = vbf_tight_jets(EventBuilder::new())
        .bjet(40.0, 0.5, 1.0)
        .dimu_pt(5.0)
        .build();
    let keys = categorize(&mut c, &event);
    assert_eq!(keys, vec!["c_ALL", "c_01_Jet", "c_01_Jet_Loose"]);
}

#[test]
fn test_synch_registry() {
    let c = SynchCategorizer::default();
    assert!(c.categories().get("c_2_Jet").unwrap().hide);
    assert!(c.categories().get("c_01_Jet").unwrap().hide);
    assert_eq!(c.categories().len(), 8);
    assert!(MuonGeometry::all().all(|g| !c.categories().contains(&g.key())));
}
