//! Singly- and doubly-linked list model.
//!
//! Nodes are kept in list order as `(address, value)` pairs. Addresses are
//! allocated as the smallest non-negative integer not held by a live node and
//! freed on delete. The null address equals `max_node`.
//!
//! | operation | condition | fault | effect |
//! |---|---|---|---|
//! | `InsertAtAddr(a, v)` | list full | yes | none |
//! | | `a > null` | yes | none |
//! | | `a` live | no | insert before node `a` |
//! | | `a <= null`, not live | no | append at tail |
//! | `InsertAtIndex(i, v)` | list full | yes | none |
//! | | `i > null` | yes | none |
//! | | `i >= length` | no | append at tail |
//! | | otherwise | no | insert at position `i` |
//! | `DeleteByValue(v)` | `v` absent | yes | none |
//! | `DeleteAtAddr(a)` | `a` not live | yes | none |
//! | `DeleteAtIndex(i)` | `i >= length` | yes | none |
//! | `Read(a)` | `a` not live | yes | none |
//! | | live | no | value, next (and prev when doubly linked) |

use crate::{unsupported, value_mask, ReferenceModel};
use rtlcheck_common::{Operation, Response, Status, StructureKind};
use rtlcheck_config::LinkedListParams;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Node {
    addr: u64,
    value: u64,
}

/// Reference model of a linked list with hardware-style node addresses.
#[derive(Clone, Debug)]
pub struct LinkedListModel {
    kind: StructureKind,
    max_node: u64,
    data_mask: u64,
    nodes: Vec<Node>,
}

impl LinkedListModel {
    /// Creates an empty list. `kind` selects singly or doubly linked reads.
    pub fn new(kind: StructureKind, params: &LinkedListParams) -> Self {
        Self {
            kind,
            max_node: params.max_node,
            data_mask: value_mask(params.data_width),
            nodes: Vec::new(),
        }
    }

    /// The null address.
    pub fn null_addr(&self) -> u64 {
        self.max_node
    }

    /// Node values in list order.
    pub fn values(&self) -> Vec<u64> {
        self.nodes.iter().map(|n| n.value).collect()
    }

    /// Node addresses in list order.
    pub fn addrs(&self) -> Vec<u64> {
        self.nodes.iter().map(|n| n.addr).collect()
    }

    fn is_full(&self) -> bool {
        self.nodes.len() as u64 >= self.max_node
    }

    fn position(&self, addr: u64) -> Option<usize> {
        self.nodes.iter().position(|n| n.addr == addr)
    }

    fn alloc_addr(&self) -> u64 {
        (0..).find(|a| self.position(*a).is_none()).unwrap_or(0)
    }

    fn addr_at(&self, pos: Option<usize>) -> u64 {
        pos.and_then(|p| self.nodes.get(p))
            .map_or(self.null_addr(), |n| n.addr)
    }

    fn insert(&mut self, pos: Option<usize>, value: u64) -> Response {
        let node = Node {
            addr: self.alloc_addr(),
            value: value & self.data_mask,
        };
        match pos {
            Some(p) => self.nodes.insert(p, node),
            None => self.nodes.push(node),
        }
        Response::ok()
    }

    fn remove(&mut self, pos: Option<usize>) -> Response {
        match pos {
            Some(p) => {
                self.nodes.remove(p);
                Response::ok()
            }
            None => Response::fault(),
        }
    }

    fn read(&self, addr: u64) -> Response {
        let Some(pos) = self.position(addr) else {
            return Response::fault();
        };
        let prev = match self.kind {
            StructureKind::DoublyLinkedList => Some(self.addr_at(pos.checked_sub(1))),
            _ => None,
        };
        Response {
            value: Some(self.nodes[pos].value),
            next: Some(self.addr_at(Some(pos + 1))),
            prev,
            ..Response::ok()
        }
    }
}

impl ReferenceModel for LinkedListModel {
    fn kind(&self) -> StructureKind {
        self.kind
    }

    fn apply(&mut self, op: &Operation) -> Response {
        let null = self.null_addr();
        match op {
            Operation::Read { target } => self.read(*target),
            Operation::InsertAtAddr { addr, value } => {
                if self.is_full() || *addr > null {
                    return Response::fault();
                }
                let pos = self.position(*addr);
                self.insert(pos, *value)
            }
            Operation::InsertAtIndex { index, value } => {
                if self.is_full() || *index > null {
                    return Response::fault();
                }
                let pos = usize::try_from(*index)
                    .ok()
                    .filter(|i| *i < self.nodes.len());
                self.insert(pos, *value)
            }
            Operation::DeleteByValue { value } => {
                let value = value & self.data_mask;
                let pos = self.nodes.iter().position(|n| n.value == value);
                self.remove(pos)
            }
            Operation::DeleteAtAddr { addr } => {
                let pos = self.position(*addr);
                self.remove(pos)
            }
            Operation::DeleteAtIndex { index } => {
                let pos = usize::try_from(*index)
                    .ok()
                    .filter(|i| *i < self.nodes.len());
                self.remove(pos)
            }
            Operation::Idle => Response::ok(),
            other => unsupported(self.kind, other),
        }
    }

    fn snapshot(&self) -> Status {
        let len = self.nodes.len() as u64;
        Status {
            length: Some(len),
            head: Some(self.addr_at(Some(0))),
            tail: Some(self.addr_at(self.nodes.len().checked_sub(1))),
            full: Some(self.is_full()),
            empty: Some(len == 0),
            ..Status::default()
        }
    }

    fn reset(&mut self) {
        self.nodes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dll() -> LinkedListModel {
        LinkedListModel::new(StructureKind::DoublyLinkedList, &LinkedListParams::default())
    }

    fn sll() -> LinkedListModel {
        LinkedListModel::new(StructureKind::SinglyLinkedList, &LinkedListParams::default())
    }

    #[test]
    fn empty_list_status_uses_null() {
        let m = dll();
        let s = m.snapshot();
        assert_eq!(s.length, Some(0));
        assert_eq!(s.head, Some(8));
        assert_eq!(s.tail, Some(8));
        assert_eq!(s.empty, Some(true));
        assert_eq!(s.full, Some(false));
    }

    #[test]
    fn insert_at_index_zero_prepends() {
        let mut m = dll();
        m.apply(&Operation::InsertAtIndex { index: 0, value: 3 });
        m.apply(&Operation::InsertAtIndex { index: 0, value: 0 });
        assert_eq!(m.values(), vec![0, 3]);
        assert_eq!(m.addrs(), vec![1, 0]);
    }

    #[test]
    fn insert_past_length_appends() {
        let mut m = dll();
        m.apply(&Operation::InsertAtIndex { index: 0, value: 3 });
        let r = m.apply(&Operation::InsertAtIndex { index: 4, value: 5 });
        assert!(!r.fault);
        assert_eq!(m.values(), vec![3, 5]);
    }

    #[test]
    fn insert_index_beyond_null_faults() {
        let mut m = dll();
        let r = m.apply(&Operation::InsertAtIndex { index: 9, value: 5 });
        assert!(r.fault);
        assert_eq!(m.snapshot().length, Some(0));
    }

    #[test]
    fn insert_at_live_addr_goes_before() {
        let mut m = dll();
        m.apply(&Operation::InsertAtAddr { addr: 8, value: 10 }); // addr 0
        m.apply(&Operation::InsertAtAddr { addr: 8, value: 20 }); // addr 1
        m.apply(&Operation::InsertAtAddr { addr: 1, value: 15 }); // addr 2 before addr 1
        assert_eq!(m.values(), vec![10, 15, 20]);
        assert_eq!(m.addrs(), vec![0, 2, 1]);
    }

    #[test]
    fn insert_at_dead_addr_appends() {
        let mut m = dll();
        m.apply(&Operation::InsertAtAddr { addr: 8, value: 10 });
        let r = m.apply(&Operation::InsertAtAddr { addr: 5, value: 11 });
        assert!(!r.fault);
        assert_eq!(m.values(), vec![10, 11]);
    }

    #[test]
    fn insert_at_out_of_range_addr_faults() {
        let mut m = dll();
        assert!(m.apply(&Operation::InsertAtAddr { addr: 9, value: 1 }).fault);
        assert_eq!(m.snapshot().length, Some(0));
    }

    #[test]
    fn full_list_rejects_inserts() {
        let mut m = dll();
        for v in 0..8 {
            assert!(!m.apply(&Operation::InsertAtIndex { index: 8, value: v }).fault);
        }
        assert_eq!(m.snapshot().full, Some(true));
        assert!(m.apply(&Operation::InsertAtIndex { index: 0, value: 9 }).fault);
        assert!(m.apply(&Operation::InsertAtAddr { addr: 0, value: 9 }).fault);
        assert_eq!(m.snapshot().length, Some(8));
    }

    #[test]
    fn freed_addresses_are_reused_smallest_first() {
        let mut m = dll();
        for v in 0..4 {
            m.apply(&Operation::InsertAtIndex { index: 8, value: v });
        }
        m.apply(&Operation::DeleteAtAddr { addr: 2 });
        m.apply(&Operation::DeleteAtAddr { addr: 1 });
        m.apply(&Operation::InsertAtIndex { index: 8, value: 9 });
        assert_eq!(m.addrs(), vec![0, 3, 1]);
    }

    #[test]
    fn delete_tail_by_addr_removes_tail() {
        let mut m = dll();
        for v in [1, 2, 3] {
            m.apply(&Operation::InsertAtIndex { index: 8, value: v });
        }
        let r = m.apply(&Operation::DeleteAtAddr { addr: 2 });
        assert!(!r.fault);
        assert_eq!(m.values(), vec![1, 2]);
        assert_eq!(m.snapshot().tail, Some(1));
    }

    #[test]
    fn delete_missing_targets_fault() {
        let mut m = dll();
        m.apply(&Operation::InsertAtIndex { index: 0, value: 1 });
        assert!(m.apply(&Operation::DeleteByValue { value: 7 }).fault);
        assert!(m.apply(&Operation::DeleteAtAddr { addr: 3 }).fault);
        assert!(m.apply(&Operation::DeleteAtIndex { index: 1 }).fault);
        assert_eq!(m.values(), vec![1]);
    }

    #[test]
    fn delete_by_value_removes_first_match() {
        let mut m = dll();
        for v in [4, 7, 4] {
            m.apply(&Operation::InsertAtIndex { index: 8, value: v });
        }
        m.apply(&Operation::DeleteByValue { value: 4 });
        assert_eq!(m.values(), vec![7, 4]);
        assert_eq!(m.addrs(), vec![1, 2]);
    }

    #[test]
    fn doubly_read_reports_neighbours() {
        let mut m = dll();
        for v in [10, 20, 30] {
            m.apply(&Operation::InsertAtIndex { index: 8, value: v });
        }
        let mid = m.apply(&Operation::Read { target: 1 });
        assert_eq!(mid.value, Some(20));
        assert_eq!(mid.prev, Some(0));
        assert_eq!(mid.next, Some(2));
        let head = m.apply(&Operation::Read { target: 0 });
        assert_eq!(head.prev, Some(8));
        let tail = m.apply(&Operation::Read { target: 2 });
        assert_eq!(tail.next, Some(8));
    }

    #[test]
    fn singly_read_has_no_prev() {
        let mut m = sll();
        m.apply(&Operation::InsertAtIndex { index: 0, value: 10 });
        let r = m.apply(&Operation::Read { target: 0 });
        assert_eq!(r.value, Some(10));
        assert_eq!(r.prev, None);
        assert_eq!(r.next, Some(8));
    }

    #[test]
    fn read_of_dead_addr_faults_with_no_value() {
        let mut m = dll();
        let r = m.apply(&Operation::Read { target: 5 });
        assert!(r.fault);
        assert_eq!(r.value, None);
    }

    #[test]
    fn values_are_masked_to_data_width() {
        let mut m = dll();
        m.apply(&Operation::InsertAtIndex {
            index: 0,
            value: 0x1ff,
        });
        assert_eq!(m.values(), vec![0xff]);
    }

    #[test]
    fn reset_clears() {
        let mut m = dll();
        m.apply(&Operation::InsertAtIndex { index: 0, value: 1 });
        m.reset();
        assert_eq!(m.snapshot().length, Some(0));
    }
}
