//! Each injected design defect must surface as its own finding category.

use rtlcheck_common::{OpKind, Operation, StructureKind};
use rtlcheck_config::{Defect, SessionConfig};
use rtlcheck_conformance::{make_config_with, run_random, run_script};
use rtlcheck_scoreboard::{Field, MismatchKind, Verdict};
use rtlcheck_session::SessionError;
use rtlcheck_stimulus::SequenceBuilder;

#[test]
fn dropped_fault_on_fifo_is_a_missing_fault() {
    let config = make_config_with("kind = \"fifo\"\ndepth = 4", None, &[Defect::DropFault]);
    let ops = SequenceBuilder::new()
        .enqueue_all(1..=6)
        .dequeue(5)
        .build();
    let result = run_script(&config, &ops);
    assert_eq!(result.report.verdict, Verdict::Fail);
    assert_eq!(result.report.count(MismatchKind::MissingFault), 3);
    assert_eq!(result.report.count(MismatchKind::SpuriousFault), 0);
    // Stored data is still right; only the error reporting is broken.
    assert_eq!(result.values(OpKind::Dequeue)[..4], [1, 2, 3, 4]);
}

#[test]
fn dropped_fault_on_hash_table_is_a_missing_fault() {
    let config = make_config_with("kind = \"hash_table\"", None, &[Defect::DropFault]);
    let ops = SequenceBuilder::new()
        .insert(5, 50)
        .search(5)
        .search(6)
        .delete_key(7)
        .build();
    let result = run_script(&config, &ops);
    assert_eq!(result.report.count(MismatchKind::MissingFault), 2);
    let ops_hit: Vec<OpKind> = result.report.mismatches.iter().map(|m| m.op_kind).collect();
    assert_eq!(ops_hit, vec![OpKind::Search, OpKind::DeleteKey]);
}

#[test]
fn corrupted_data_is_a_value_mismatch() {
    let config = make_config_with("kind = \"lifo\"", None, &[Defect::CorruptData]);
    let ops = SequenceBuilder::new().push_all([2, 4, 6]).pop(3).build();
    let result = run_script(&config, &ops);
    assert_eq!(result.report.count(MismatchKind::ValueMismatch), 3);
    for m in &result.report.mismatches {
        assert_eq!(m.field, Field::Value);
        assert_eq!(m.op_kind, OpKind::Pop);
    }
    assert_eq!(result.report.mismatches[0].expected, "6");
    assert_eq!(result.report.mismatches[0].actual, "7");
}

#[test]
fn corrupted_list_reads_are_value_mismatches() {
    let config = make_config_with("kind = \"list\"", None, &[Defect::CorruptData]);
    let ops = SequenceBuilder::new()
        .insert_at_index(0, 10)
        .insert_at_index(1, 20)
        .read(0)
        .read(1)
        .read(2)
        .build();
    let result = run_script(&config, &ops);
    assert_eq!(result.report.count(MismatchKind::ValueMismatch), 2);
    assert_eq!(result.report.count(MismatchKind::MissingFault), 0);
}

#[test]
fn early_full_fifo_is_a_spurious_fault() {
    let config = make_config_with("kind = \"fifo\"\ndepth = 4", None, &[Defect::EarlyFull]);
    let ops = SequenceBuilder::new().enqueue_all(1..=4).build();
    let result = run_script(&config, &ops);
    assert_eq!(result.report.count(MismatchKind::SpuriousFault), 1);
    let spurious = result
        .report
        .mismatches
        .iter()
        .find(|m| m.kind == MismatchKind::SpuriousFault)
        .unwrap();
    assert_eq!(spurious.op_kind, OpKind::Enqueue);
    assert_eq!(spurious.field, Field::Fault);
}

#[test]
fn never_done_times_out_on_handshake_designs() {
    for structure in [
        "kind = \"singly_linked_list\"",
        "kind = \"doubly_linked_list\"",
        "kind = \"hash_table\"",
        "kind = \"list\"",
    ] {
        let config = make_config_with(structure, None, &[Defect::NeverDone]);
        let result = run_script(&config, &[first_op(&config)]);
        assert!(
            matches!(result.error, Some(SessionError::Timeout { cycles: 50, .. })),
            "{structure}: {:?}",
            result.error.as_ref().map(ToString::to_string)
        );
        assert_eq!(result.report.count(MismatchKind::Timeout), 1, "{structure}");
        assert!(result.transactions.is_empty(), "{structure}");
    }
}

#[test]
fn undriven_status_outputs_are_value_mismatches() {
    let config = make_config_with(
        "kind = \"doubly_linked_list\"",
        None,
        &[Defect::UndrivenStatus],
    );
    let ops = SequenceBuilder::new().insert_at_index(0, 3).read(0).build();
    let result = run_script(&config, &ops);
    assert_eq!(result.report.verdict, Verdict::Fail);
    let first: Vec<(Field, &str)> = result
        .report
        .mismatches
        .iter()
        .filter(|m| m.seq == 0)
        .map(|m| (m.field, m.actual.as_str()))
        .collect();
    assert_eq!(
        first,
        vec![
            (Field::Length, "x"),
            (Field::Head, "x"),
            (Field::Tail, "x"),
            (Field::Full, "x"),
            (Field::Empty, "x"),
        ]
    );
    // Data outputs are unaffected.
    assert_eq!(result.values(OpKind::Read), vec![3]);
    assert_eq!(result.report.count(MismatchKind::MissingFault), 0);
}

#[test]
fn random_runs_catch_every_defect() {
    let cases = [
        ("kind = \"fifo\"\ndepth = 4", Defect::DropFault, MismatchKind::MissingFault),
        ("kind = \"lifo\"\ndepth = 4", Defect::CorruptData, MismatchKind::ValueMismatch),
        ("kind = \"lifo\"\ndepth = 4", Defect::EarlyFull, MismatchKind::SpuriousFault),
        ("kind = \"hash_table\"", Defect::NeverDone, MismatchKind::Timeout),
        ("kind = \"hash_table\"", Defect::UndrivenStatus, MismatchKind::ValueMismatch),
    ];
    for (structure, defect, expected) in cases {
        let config = make_config_with(structure, Some(21), &[defect]);
        let report = run_random(&config, 300);
        assert_eq!(report.verdict, Verdict::Fail, "{defect} went unnoticed");
        assert!(report.count(expected) > 0, "{defect}: {:?}", report.mismatches_by_kind);
    }
}

/// An operation that needs the done handshake on each design.
fn first_op(config: &SessionConfig) -> Operation {
    match config.structure.kind() {
        StructureKind::HashTable => Operation::Search { key: 1 },
        StructureKind::List => Operation::Sum,
        _ => Operation::Read { target: 0 },
    }
}
