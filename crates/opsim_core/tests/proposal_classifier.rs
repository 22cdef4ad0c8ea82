use opsim_core::model::proposal::proposal_rows;
use opsim_core::{classify_proposals, ClassifyError, ProposalCategory, ProposalIds, ProposalRow};
use opsim_core::{Table, Value};

#[test]
fn universal_and_ddcosmology_rows_are_classified() {
    let rows = vec![
        ProposalRow::new(1, "Universal-18"),
        ProposalRow::new(2, "ddCosmology-Deep"),
    ];

    let ids = classify_proposals(&rows).unwrap();

    assert_eq!(ids, ProposalIds { wfd: 1, ddf: 2 });
    assert_eq!(
        serde_json::to_value(ids).unwrap(),
        serde_json::json!({"wfd": 1, "ddf": 2})
    );
}

#[test]
fn unrelated_proposals_are_ignored() {
    let rows = vec![
        ProposalRow::new(52, "conf/survey/GalacticPlaneProp.conf"),
        ProposalRow::new(53, "conf/survey/SouthCelestialPole-18.conf"),
        ProposalRow::new(54, "conf/survey/Universal-18-0824B.conf"),
        ProposalRow::new(55, "conf/survey/NorthEclipticSpur-18c.conf"),
        ProposalRow::new(56, "conf/survey/DDcosmology1.conf"),
    ];

    let ids = classify_proposals(&rows).unwrap();

    assert_eq!(ids.get(ProposalCategory::Wfd), 54);
    assert_eq!(ids.get(ProposalCategory::Ddf), 56);
}

#[test]
fn second_wfd_row_is_rejected() {
    let rows = vec![
        ProposalRow::new(1, "Universal-18"),
        ProposalRow::new(2, "DDcosmology"),
        ProposalRow::new(3, "UNIVERSAL-north"),
    ];

    let err = classify_proposals(&rows).unwrap_err();

    assert_eq!(
        err,
        ClassifyError::DuplicateCategory {
            category: ProposalCategory::Wfd,
            first: 1,
            second: 3,
        }
    );
    assert!(err.to_string().contains("multiple propIDs for WFD"));
}

#[test]
fn second_ddf_row_is_rejected() {
    let rows = vec![
        ProposalRow::new(7, "DDcosmology1"),
        ProposalRow::new(8, "ddcosmology2"),
        ProposalRow::new(9, "Universal"),
    ];

    let err = classify_proposals(&rows).unwrap_err();

    assert!(matches!(
        err,
        ClassifyError::DuplicateCategory {
            category: ProposalCategory::Ddf,
            first: 7,
            second: 8,
        }
    ));
}

#[test]
fn missing_category_is_rejected() {
    let only_wfd = vec![ProposalRow::new(1, "Universal-18")];
    assert_eq!(
        classify_proposals(&only_wfd).unwrap_err(),
        ClassifyError::UnexpectedClassification {
            wfd: Some(1),
            ddf: None,
        }
    );

    let err = classify_proposals(&[]).unwrap_err();
    assert_eq!(
        err,
        ClassifyError::UnexpectedClassification {
            wfd: None,
            ddf: None,
        }
    );
    assert!(err.to_string().contains("wfd=missing ddf=missing"));
}

#[test]
fn classification_reads_a_loaded_proposal_table() {
    let mut table = Table::new(
        "Proposal",
        vec!["propID".to_string(), "propConf".to_string()],
    );
    table
        .push_row(vec![Value::Integer(10), Value::from("ddCosmology-Deep")])
        .unwrap();
    table
        .push_row(vec![Value::Integer(20), Value::from("Universal-18")])
        .unwrap();

    let ids = classify_proposals(&proposal_rows(&table).unwrap()).unwrap();

    assert_eq!(ids, ProposalIds { wfd: 20, ddf: 10 });
}
