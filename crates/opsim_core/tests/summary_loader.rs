use opsim_core::{
    ClassifyError, DbError, LoadError, OpSimOutput, ProposalIds, SelectionError, Subset,
    SummaryTable, Value,
};
use rusqlite::Connection;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const FIXTURE_SCHEMA: &str = "
    CREATE TABLE Proposal (
        propID INTEGER PRIMARY KEY,
        propConf TEXT NOT NULL,
        propName TEXT
    );
    CREATE TABLE Summary (
        obsHistID INTEGER NOT NULL,
        sessionID INTEGER,
        PROPID INTEGER,
        fieldID INTEGER,
        filter TEXT,
        expMJD REAL
    );";

/// Three proposals (WFD=1, DDF=2, galactic plane=3). Observation 100 is
/// credited to both WFD and DDF; observation 103 is stored twice.
fn create_opsim_db(dir: &Path) -> PathBuf {
    let path = dir.join("opsim_fixture.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(FIXTURE_SCHEMA).unwrap();
    conn.execute_batch(
        "INSERT INTO Proposal VALUES (1, 'conf/survey/Universal-18-0824B.conf', 'WFD');
         INSERT INTO Proposal VALUES (2, 'conf/survey/DDcosmology1.conf', 'DD');
         INSERT INTO Proposal VALUES (3, 'conf/survey/GalacticPlaneProp.conf', 'GP');

         INSERT INTO Summary VALUES (100, 1000, 1, 316, 'r', 59580.03);
         INSERT INTO Summary VALUES (100, 1000, 2, 316, 'r', 59580.03);
         INSERT INTO Summary VALUES (101, 1000, 1, 317, 'g', 59580.04);
         INSERT INTO Summary VALUES (102, 1000, 3, 318, 'i', 59580.05);
         INSERT INTO Summary VALUES (103, 1000, 2, 290, 'z', 59580.06);
         INSERT INTO Summary VALUES (103, 1000, 2, 290, 'z', 59580.06);
         INSERT INTO Summary VALUES (104, 1000, 3, 319, 'y', 59580.07);",
    )
    .unwrap();
    path
}

fn db_name(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn load(path: &Path, subset: &str) -> OpSimOutput {
    OpSimOutput::from_opsim_db(db_name(path), subset).unwrap()
}

#[test]
fn combined_keeps_wfd_and_ddf_rows_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_opsim_db(dir.path());

    let output = load(&path, "combined");

    assert_eq!(output.subset(), Subset::Combined);
    assert_eq!(output.prop_ids(), &ProposalIds { wfd: 1, ddf: 2 });
    assert_eq!(output.summary().index(), &[100, 101, 103]);
    assert!(output.summary().is_unique());
    assert_eq!(output.summary().value(100, "PROPID"), Some(&Value::Integer(1)));

    let allowed = HashSet::from([1, 2]);
    for prop_id in output.summary().integer_column("PROPID").unwrap() {
        assert!(allowed.contains(&prop_id));
    }
}

#[test]
fn wfd_and_ddf_select_single_proposals() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_opsim_db(dir.path());

    let wfd = load(&path, "WFD");
    assert_eq!(wfd.summary().index(), &[100, 101]);
    assert!(wfd
        .summary()
        .integer_column("PROPID")
        .unwrap()
        .iter()
        .all(|&prop_id| prop_id == wfd.prop_ids().wfd));

    let ddf = load(&path, "ddf");
    assert_eq!(ddf.summary().index(), &[100, 103]);
    assert!(ddf
        .summary()
        .integer_column("PROPID")
        .unwrap()
        .iter()
        .all(|&prop_id| prop_id == ddf.prop_ids().ddf));
}

#[test]
fn all_subset_preserves_duplicates() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_opsim_db(dir.path());

    let output = load(&path, "_all");

    assert_eq!(output.summary().index(), &[100, 100, 101, 102, 103, 103, 104]);
    assert!(!output.summary().is_unique());
    let rows = output.summary().rows();
    assert_eq!(rows[4], rows[5]);
    assert_ne!(rows[0], rows[1]);
}

#[test]
fn unique_all_keeps_first_row_per_observation() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_opsim_db(dir.path());

    let output = load(&path, "unique_all");

    assert_eq!(output.summary().index(), &[100, 101, 102, 103, 104]);
    assert_eq!(output.summary().value(100, "PROPID"), Some(&Value::Integer(1)));
    assert_eq!(
        output.summary().columns(),
        &["sessionID", "PROPID", "fieldID", "filter", "expMJD"]
    );
}

#[test]
fn repeated_loads_yield_the_same_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_opsim_db(dir.path());

    let first = load(&path, "combined");
    let second = load(&path, "combined");

    assert_eq!(first.summary(), second.summary());
    assert_eq!(first.proposal_table(), second.proposal_table());
}

#[test]
fn deduplicating_a_loaded_subset_again_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_opsim_db(dir.path());

    for subset in ["unique_all", "wfd", "ddf", "combined"] {
        let summary = load(&path, subset).summary().clone();

        let again = SummaryTable::from_table(summary.to_table(), true).unwrap();

        assert_eq!(again, summary, "subset {subset}");
    }
}

#[test]
fn proposal_table_is_returned_in_full() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_opsim_db(dir.path());

    let output = load(&path, "wfd");

    let proposals = output.proposal_table();
    assert_eq!(proposals.columns, vec!["propID", "propConf", "propName"]);
    assert_eq!(proposals.len(), 3);
}

#[test]
fn duplicated_observation_example_reduces_to_two_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("small.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE Proposal (propID INTEGER, propConf TEXT);
         INSERT INTO Proposal VALUES (1, 'Universal-18');
         INSERT INTO Proposal VALUES (2, 'ddCosmology-Deep');
         CREATE TABLE Summary (obsHistID INTEGER, PROPID INTEGER);
         INSERT INTO Summary VALUES (100, 1);
         INSERT INTO Summary VALUES (100, 1);
         INSERT INTO Summary VALUES (200, 2);",
    )
    .unwrap();
    drop(conn);

    let output = load(&path, "combined");

    assert_eq!(output.summary().len(), 2);
    let ids: HashSet<_> = output.summary().index().iter().copied().collect();
    assert_eq!(ids, HashSet::from([100, 200]));
}

#[test]
fn sqlite_url_is_accepted_as_is() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_opsim_db(dir.path());
    let url = format!("sqlite:///{}", db_name(&path));

    let output = OpSimOutput::from_opsim_db(&url, "combined").unwrap();

    assert_eq!(output.summary().len(), 3);
}

#[test]
fn unknown_subset_fails_before_connecting() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("never_created.db");

    let err = OpSimOutput::from_opsim_db(db_name(&path), "bogus").unwrap_err();

    assert!(matches!(
        err,
        LoadError::Selection(SelectionError::UnsupportedSubset(ref name)) if name == "bogus"
    ));
    assert!(!path.exists());
}

#[test]
fn missing_database_file_is_a_data_source_fault() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.db");

    let err = OpSimOutput::from_opsim_db(db_name(&path), "combined").unwrap_err();

    assert!(matches!(err, LoadError::Db(DbError::Sqlite(_))));
    assert!(!path.exists());
}

#[test]
fn missing_summary_table_propagates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("proposals_only.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE Proposal (propID INTEGER, propConf TEXT);
         INSERT INTO Proposal VALUES (1, 'Universal-18');
         INSERT INTO Proposal VALUES (2, 'DDcosmology');",
    )
    .unwrap();
    drop(conn);

    let err = OpSimOutput::from_opsim_db(db_name(&path), "wfd").unwrap_err();

    assert!(matches!(err, LoadError::Db(DbError::Sqlite(_))));
    assert!(err.to_string().contains("no such table"));
}

#[test]
fn ambiguous_proposals_abort_the_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ambiguous.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(FIXTURE_SCHEMA).unwrap();
    conn.execute_batch(
        "INSERT INTO Proposal VALUES (1, 'Universal-18', 'WFD');
         INSERT INTO Proposal VALUES (2, 'Universal-north', 'WFD2');
         INSERT INTO Proposal VALUES (3, 'DDcosmology', 'DD');",
    )
    .unwrap();
    drop(conn);

    let err = OpSimOutput::from_opsim_db(db_name(&path), "combined").unwrap_err();

    assert!(matches!(
        err,
        LoadError::Classify(ClassifyError::DuplicateCategory { first: 1, second: 2, .. })
    ));
}
