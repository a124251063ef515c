//! Opcode tables for designs with an operation-select bus.
//!
//! Each table maps a code to the operation kind and a constructor that
//! rebuilds the full [`Operation`] from the sampled input fields. Adding a
//! structure with an opcode bus means adding a table here.

use rtlcheck_common::{OpKind, Operation, StructureKind};

/// Input fields sampled alongside an opcode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Fields {
    /// Address or index bus.
    pub addr: u64,
    /// Data bus.
    pub data: u64,
    /// Key bus.
    pub key: u64,
}

/// One row of an opcode table.
#[derive(Clone, Copy, Debug)]
pub struct OpcodeEntry {
    /// Bus value.
    pub code: u64,
    /// Operation kind selected by the code.
    pub kind: OpKind,
    /// Rebuilds the operation from sampled fields.
    pub build: fn(&Fields) -> Operation,
}

/// Opcode table of one structure kind.
#[derive(Debug)]
pub struct OpcodeTable {
    /// Width of the opcode bus.
    pub width: u32,
    /// Rows in code order.
    pub entries: &'static [OpcodeEntry],
}

impl OpcodeTable {
    /// Returns the code for an operation kind.
    pub fn code_of(&self, kind: OpKind) -> Option<u64> {
        self.entries.iter().find(|e| e.kind == kind).map(|e| e.code)
    }

    /// Rebuilds the operation for a code. Codes outside the table decode to
    /// [`Operation::Idle`].
    pub fn decode(&self, code: u64, fields: &Fields) -> Operation {
        match self.entries.iter().find(|e| e.code == code) {
            Some(entry) => (entry.build)(fields),
            None => Operation::Idle,
        }
    }
}

static LINKED_LIST_OPCODES: OpcodeTable = OpcodeTable {
    width: 3,
    entries: &[
        OpcodeEntry {
            code: 0b000,
            kind: OpKind::Read,
            build: |f| Operation::Read { target: f.addr },
        },
        OpcodeEntry {
            code: 0b001,
            kind: OpKind::InsertAtAddr,
            build: |f| Operation::InsertAtAddr {
                addr: f.addr,
                value: f.data,
            },
        },
        OpcodeEntry {
            code: 0b010,
            kind: OpKind::DeleteByValue,
            build: |f| Operation::DeleteByValue { value: f.data },
        },
        OpcodeEntry {
            code: 0b011,
            kind: OpKind::DeleteAtAddr,
            build: |f| Operation::DeleteAtAddr { addr: f.addr },
        },
        OpcodeEntry {
            code: 0b100,
            kind: OpKind::Idle,
            build: |_| Operation::Idle,
        },
        OpcodeEntry {
            code: 0b101,
            kind: OpKind::InsertAtIndex,
            build: |f| Operation::InsertAtIndex {
                index: f.addr,
                value: f.data,
            },
        },
        OpcodeEntry {
            code: 0b111,
            kind: OpKind::DeleteAtIndex,
            build: |f| Operation::DeleteAtIndex { index: f.addr },
        },
    ],
};

static HASH_TABLE_OPCODES: OpcodeTable = OpcodeTable {
    width: 2,
    entries: &[
        OpcodeEntry {
            code: 0b00,
            kind: OpKind::Insert,
            build: |f| Operation::Insert {
                key: f.key,
                value: f.data,
            },
        },
        OpcodeEntry {
            code: 0b01,
            kind: OpKind::DeleteKey,
            build: |f| Operation::DeleteKey { key: f.key },
        },
        OpcodeEntry {
            code: 0b10,
            kind: OpKind::Search,
            build: |f| Operation::Search { key: f.key },
        },
    ],
};

static LIST_OPCODES: OpcodeTable = OpcodeTable {
    width: 3,
    entries: &[
        OpcodeEntry {
            code: 0,
            kind: OpKind::Read,
            build: |f| Operation::Read { target: f.addr },
        },
        OpcodeEntry {
            code: 1,
            kind: OpKind::InsertAtIndex,
            build: |f| Operation::InsertAtIndex {
                index: f.addr,
                value: f.data,
            },
        },
        OpcodeEntry {
            code: 2,
            kind: OpKind::FindAll,
            build: |f| Operation::FindAll { value: f.data },
        },
        OpcodeEntry {
            code: 3,
            kind: OpKind::FindFirst,
            build: |f| Operation::FindFirst { value: f.data },
        },
        OpcodeEntry {
            code: 4,
            kind: OpKind::Sum,
            build: |_| Operation::Sum,
        },
        OpcodeEntry {
            code: 5,
            kind: OpKind::SortAscending,
            build: |_| Operation::SortAscending,
        },
        OpcodeEntry {
            code: 6,
            kind: OpKind::SortDescending,
            build: |_| Operation::SortDescending,
        },
        OpcodeEntry {
            code: 7,
            kind: OpKind::DeleteAtIndex,
            build: |f| Operation::DeleteAtIndex { index: f.addr },
        },
    ],
};

/// Returns the opcode table of a structure, or `None` for enable-driven designs.
pub fn opcode_table(kind: StructureKind) -> Option<&'static OpcodeTable> {
    match kind {
        StructureKind::SinglyLinkedList | StructureKind::DoublyLinkedList => {
            Some(&LINKED_LIST_OPCODES)
        }
        StructureKind::HashTable => Some(&HASH_TABLE_OPCODES),
        StructureKind::List => Some(&LIST_OPCODES),
        StructureKind::Fifo | StructureKind::Lifo | StructureKind::Table | StructureKind::DualEdgeFf => {
            None
        }
    }
}
