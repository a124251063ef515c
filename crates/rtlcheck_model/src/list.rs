//! Indexable list model with sort, sum, and find.
//!
//! | operation | condition | fault | effect |
//! |---|---|---|---|
//! | `Read(i)` | `i >= length` | yes | none |
//! | `InsertAtIndex(i, v)` | list full or `i >= LENGTH` | yes | none |
//! | | `length <= i < LENGTH` | no | append |
//! | | otherwise | no | insert at `i` |
//! | `DeleteAtIndex(i)` | `i >= length` | yes | none |
//! | `FindFirst(v)` / `FindAll(v)` | `v` absent | yes | none |
//! | `Sum`, `SortAscending`, `SortDescending` | never | no | |
//!
//! The sum is truncated to the data output width, which is the data width
//! plus the index width.

use crate::{unsupported, value_mask, ReferenceModel};
use rtlcheck_common::{Operation, Response, Status, StructureKind};
use rtlcheck_config::ListParams;

/// Reference model of an indexable list.
#[derive(Clone, Debug)]
pub struct ListModel {
    length: u64,
    data_mask: u64,
    sum_mask: u64,
    items: Vec<u64>,
}

impl ListModel {
    /// Creates an empty list.
    pub fn new(params: &ListParams) -> Self {
        Self {
            length: params.length,
            data_mask: value_mask(params.data_width),
            sum_mask: value_mask(params.out_width()),
            items: Vec::new(),
        }
    }

    /// Stored elements in order.
    pub fn items(&self) -> &[u64] {
        &self.items
    }

    fn is_full(&self) -> bool {
        self.items.len() as u64 >= self.length
    }

    fn live_index(&self, index: u64) -> Option<usize> {
        usize::try_from(index).ok().filter(|i| *i < self.items.len())
    }

    fn matches(&self, value: u64) -> Vec<u64> {
        let value = value & self.data_mask;
        self.items
            .iter()
            .enumerate()
            .filter(|(_, v)| **v == value)
            .map(|(i, _)| i as u64)
            .collect()
    }
}

impl ReferenceModel for ListModel {
    fn kind(&self) -> StructureKind {
        StructureKind::List
    }

    fn apply(&mut self, op: &Operation) -> Response {
        match op {
            Operation::Read { target } => self
                .live_index(*target)
                .map_or_else(Response::fault, |i| Response::value(self.items[i])),
            Operation::InsertAtIndex { index, value } => {
                if self.is_full() || *index >= self.length {
                    return Response::fault();
                }
                let value = value & self.data_mask;
                match self.live_index(*index) {
                    Some(i) => self.items.insert(i, value),
                    None => self.items.push(value),
                }
                Response::ok()
            }
            Operation::DeleteAtIndex { index } => match self.live_index(*index) {
                Some(i) => {
                    self.items.remove(i);
                    Response::ok()
                }
                None => Response::fault(),
            },
            Operation::FindFirst { value } => self
                .matches(*value)
                .first()
                .copied()
                .map_or_else(Response::fault, Response::value),
            Operation::FindAll { value } => {
                let found = self.matches(*value);
                if found.is_empty() {
                    Response::fault()
                } else {
                    Response::values(found)
                }
            }
            Operation::Sum => {
                let sum = self
                    .items
                    .iter()
                    .fold(0u64, |acc, v| acc.wrapping_add(*v));
                Response::value(sum & self.sum_mask)
            }
            Operation::SortAscending => {
                self.items.sort_unstable();
                Response::ok()
            }
            Operation::SortDescending => {
                self.items.sort_unstable_by(|a, b| b.cmp(a));
                Response::ok()
            }
            Operation::Idle => Response::ok(),
            other => unsupported(StructureKind::List, other),
        }
    }

    fn snapshot(&self) -> Status {
        Status {
            length: Some(self.items.len() as u64),
            full: Some(self.is_full()),
            empty: Some(self.items.is_empty()),
            ..Status::default()
        }
    }

    fn reset(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(values: &[u64]) -> ListModel {
        let mut m = ListModel::new(&ListParams::default());
        for v in values {
            m.apply(&Operation::InsertAtIndex {
                index: 7,
                value: *v,
            });
        }
        m
    }

    #[test]
    fn sum_of_five() {
        let mut m = filled(&[10, 20, 30, 40, 50]);
        assert_eq!(m.apply(&Operation::Sum), Response::value(150));
    }

    #[test]
    fn sum_of_empty_is_zero() {
        let mut m = filled(&[]);
        assert_eq!(m.apply(&Operation::Sum), Response::value(0));
    }

    #[test]
    fn sort_both_ways() {
        let mut m = filled(&[5, 1, 4, 1]);
        m.apply(&Operation::SortAscending);
        assert_eq!(m.items(), &[1, 1, 4, 5]);
        m.apply(&Operation::SortDescending);
        assert_eq!(m.items(), &[5, 4, 1, 1]);
    }

    #[test]
    fn find_first_and_all() {
        let mut m = filled(&[7, 3, 7, 9]);
        assert_eq!(m.apply(&Operation::FindFirst { value: 7 }).value, Some(0));
        assert_eq!(m.apply(&Operation::FindFirst { value: 9 }).value, Some(3));
        assert!(m.apply(&Operation::FindFirst { value: 8 }).fault);
        assert_eq!(
            m.apply(&Operation::FindAll { value: 7 }).values,
            vec![0, 2]
        );
        assert!(m.apply(&Operation::FindAll { value: 8 }).fault);
    }

    #[test]
    fn insert_positions() {
        let mut m = filled(&[1, 2]);
        m.apply(&Operation::InsertAtIndex { index: 1, value: 9 });
        assert_eq!(m.items(), &[1, 9, 2]);
        m.apply(&Operation::InsertAtIndex { index: 6, value: 8 });
        assert_eq!(m.items(), &[1, 9, 2, 8]);
        assert!(m.apply(&Operation::InsertAtIndex { index: 8, value: 0 }).fault);
    }

    #[test]
    fn full_rejects_insert() {
        let mut m = filled(&[0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(m.snapshot().full, Some(true));
        assert!(m.apply(&Operation::InsertAtIndex { index: 0, value: 1 }).fault);
        assert_eq!(m.items().len(), 8);
    }

    #[test]
    fn read_and_delete_bounds() {
        let mut m = filled(&[4, 5]);
        assert_eq!(m.apply(&Operation::Read { target: 1 }).value, Some(5));
        assert!(m.apply(&Operation::Read { target: 2 }).fault);
        assert!(m.apply(&Operation::DeleteAtIndex { index: 2 }).fault);
        assert!(!m.apply(&Operation::DeleteAtIndex { index: 0 }).fault);
        assert_eq!(m.items(), &[5]);
    }

    #[test]
    fn sum_truncates_to_output_width() {
        let mut m = ListModel::new(&ListParams {
            data_width: 4,
            length: 3,
            ..ListParams::default()
        });
        for _ in 0..3 {
            m.apply(&Operation::InsertAtIndex {
                index: 0,
                value: 15,
            });
        }
        // out width = 2 + 4 bits
        assert_eq!(m.apply(&Operation::Sum).value, Some(45));
    }
}
