//! Directed scenarios run end to end: stimulus, behavioural design, agents,
//! and scoreboard. Each checks both the verdict and the observed responses.

use rtlcheck_common::{Edge, OpKind, Operation, Response};
use rtlcheck_conformance::{make_config, run_script};
use rtlcheck_stimulus::SequenceBuilder;

#[test]
fn doubly_linked_list_inserts_deletes_and_reads() {
    let config = make_config("kind = \"doubly_linked_list\"");
    let ops = SequenceBuilder::new()
        .insert_at_index(0, 3)
        .insert_at_index(0, 0)
        .insert_at_index(4, 5)
        .delete_by_value(0)
        .read(5)
        .read(0)
        .build();
    let result = run_script(&config, &ops);
    assert!(result.report.passed(), "{:?}", result.report.mismatches);
    assert_eq!(result.report.transactions, 6);
    assert_eq!(result.report.expected_faults, 1);

    // Value 3 took address 0, value 0 address 1, value 5 address 2.
    let reads = result.responses(OpKind::Read);
    assert!(reads[0].fault, "address 5 holds no node");
    assert_eq!(reads[1].value, Some(3));
    assert_eq!(reads[1].prev, Some(8));
    assert_eq!(reads[1].next, Some(2));

    let last = &result.transactions[5].status;
    assert_eq!(last.length, Some(2));
    assert_eq!(last.head, Some(0));
    assert_eq!(last.tail, Some(2));
}

#[test]
fn singly_linked_list_reads_only_next() {
    let config = make_config("kind = \"singly_linked_list\"");
    let ops = SequenceBuilder::new()
        .insert_at_addr(8, 10)
        .insert_at_addr(8, 20)
        .insert_at_addr(1, 15)
        .read(2)
        .build();
    let result = run_script(&config, &ops);
    assert!(result.report.passed(), "{:?}", result.report.mismatches);
    let read = result.responses(OpKind::Read)[0];
    assert_eq!(read.value, Some(15));
    assert_eq!(read.next, Some(1));
    assert_eq!(read.prev, None);
}

#[test]
fn fifo_overfill_then_drain() {
    let config = make_config("kind = \"fifo\"\ndepth = 12");
    let ops = SequenceBuilder::new()
        .enqueue_all(0..15)
        .dequeue(15)
        .build();
    let result = run_script(&config, &ops);
    assert!(result.report.passed(), "{:?}", result.report.mismatches);

    let writes = result.faults(OpKind::Enqueue);
    assert!(writes[..12].iter().all(|f| !f));
    assert!(writes[12..].iter().all(|f| *f));
    assert_eq!(result.values(OpKind::Dequeue), (0..12).collect::<Vec<_>>());
    assert!(result.faults(OpKind::Dequeue)[12..].iter().all(|f| *f));
    assert_eq!(result.report.expected_faults, 6);

    let enqueues: Vec<_> = result
        .transactions
        .iter()
        .filter(|t| t.operation.kind() == OpKind::Enqueue)
        .collect();
    assert_eq!(enqueues[11].status.full, Some(true));
    assert_eq!(enqueues[10].status.full, Some(false));
    let dequeues: Vec<_> = result
        .transactions
        .iter()
        .filter(|t| t.operation.kind() == OpKind::Dequeue)
        .collect();
    assert_eq!(dequeues[11].status.empty, Some(true));
    assert_eq!(dequeues[10].status.empty, Some(false));
}

#[test]
fn lifo_pops_in_reverse_with_bypass() {
    let config = make_config("kind = \"lifo\"\ndepth = 4");
    let ops = SequenceBuilder::new()
        .push_all([1, 2, 3, 4, 5])
        .op(Operation::PushPop { value: 9 })
        .pop(5)
        .build();
    let result = run_script(&config, &ops);
    assert!(result.report.passed(), "{:?}", result.report.mismatches);
    assert_eq!(result.faults(OpKind::Push), vec![false, false, false, false, true]);
    assert_eq!(result.values(OpKind::PushPop), vec![9]);
    assert_eq!(result.values(OpKind::Pop), vec![4, 3, 2, 1]);
    assert!(result.faults(OpKind::Pop)[4]);
}

#[test]
fn hash_table_bucket_overflow_and_lookup() {
    let config = make_config(
        "kind = \"hash_table\"\ntotal_index = 8\nchaining_size = 4\nhash_algorithm = \"modulus\"",
    );
    let mut seq = SequenceBuilder::new();
    for key in [1, 3, 11, 19, 27, 35, 43] {
        seq = seq.insert(key, key * 10);
    }
    let ops = seq.delete_key(1).search(1).search(3).build();
    let result = run_script(&config, &ops);
    assert!(result.report.passed(), "{:?}", result.report.mismatches);

    // Keys 3, 11, 19, 27 fill bucket 3; 35 and 43 overflow it.
    assert_eq!(
        result.faults(OpKind::Insert),
        vec![false, false, false, false, false, true, true]
    );
    assert_eq!(result.faults(OpKind::DeleteKey), vec![false]);
    let searches = result.responses(OpKind::Search);
    assert!(searches[0].fault);
    assert_eq!(*searches[1], Response::value(30));
    let last = result.transactions.last().unwrap();
    assert_eq!(last.status.collision_count, Some(3));
}

#[test]
fn list_sum_sort_and_find() {
    let config = make_config("kind = \"list\"\nlength = 8");
    let mut seq = SequenceBuilder::new();
    for value in [7, 2, 9, 4, 2] {
        seq = seq.insert_at_index(7, value);
    }
    let ops = seq
        .op(Operation::Sum)
        .op(Operation::SortAscending)
        .extend((0..5).map(|target| Operation::Read { target }))
        .op(Operation::FindFirst { value: 7 })
        .op(Operation::FindFirst { value: 5 })
        .op(Operation::FindAll { value: 2 })
        .op(Operation::SortDescending)
        .extend((0..5).map(|target| Operation::Read { target }))
        .build();
    let result = run_script(&config, &ops);
    assert!(result.report.passed(), "{:?}", result.report.mismatches);

    assert_eq!(result.values(OpKind::Sum), vec![24]);
    let reads = result.values(OpKind::Read);
    assert_eq!(reads[..5], [2, 2, 4, 7, 9]);
    assert_eq!(reads[5..], [9, 7, 4, 2, 2]);
    assert_eq!(result.faults(OpKind::FindFirst), vec![false, true]);
    assert_eq!(result.values(OpKind::FindFirst), vec![3]);
    assert_eq!(result.responses(OpKind::FindAll)[0].values, vec![0, 1]);
}

#[test]
fn table_reads_before_same_cycle_write() {
    let config = make_config("kind = \"table\"");
    let ops = SequenceBuilder::new()
        .write_slot(2, 55)
        .read_slots(vec![2])
        .op(Operation::TableAccess {
            writes: vec![rtlcheck_common::LaneWrite { index: 2, value: 66 }],
            reads: vec![2],
        })
        .read_slots(vec![2])
        .build();
    let result = run_script(&config, &ops);
    assert!(result.report.passed(), "{:?}", result.report.mismatches);
    let reads: Vec<Vec<u64>> = result
        .transactions
        .iter()
        .filter(|t| !t.response.values.is_empty())
        .map(|t| t.response.values.clone())
        .collect();
    assert_eq!(reads, vec![vec![55], vec![55], vec![66]]);
}

#[test]
fn dual_edge_latches_on_both_edges() {
    let config = make_config("kind = \"dual_edge_ff\"");
    let ops = SequenceBuilder::new()
        .latch(Edge::Rising, 0xff, 0x0f)
        .latch(Edge::Falling, 0xa0, 0xf0)
        .latch(Edge::Rising, 0x00, 0x01)
        .build();
    let result = run_script(&config, &ops);
    assert!(result.report.passed(), "{:?}", result.report.mismatches);
    assert_eq!(result.values(OpKind::EdgeLatch), vec![0x0f, 0xaf, 0xae]);
}
