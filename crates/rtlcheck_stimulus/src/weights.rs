//! Operation mix for random generation.

use crate::error::StimulusError;
use rtlcheck_common::{OpKind, StructureKind};
use std::collections::BTreeMap;

/// Linked-list mix: inserts and reads dominate so the list fills up.
const LINKED_LIST_WEIGHTS: &[(OpKind, u32)] = &[
    (OpKind::Read, 20),
    (OpKind::InsertAtAddr, 20),
    (OpKind::InsertAtIndex, 20),
    (OpKind::DeleteByValue, 10),
    (OpKind::DeleteAtAddr, 15),
    (OpKind::DeleteAtIndex, 10),
    (OpKind::Idle, 5),
];

/// Built-in weight of an operation that has no specific mix.
pub const EQUAL_WEIGHT: u32 = 10;

/// Built-in mix for a structure.
pub fn default_weights(kind: StructureKind) -> Vec<(OpKind, u32)> {
    match kind {
        StructureKind::SinglyLinkedList | StructureKind::DoublyLinkedList => {
            LINKED_LIST_WEIGHTS.to_vec()
        }
        _ => kind
            .supported_ops()
            .iter()
            .map(|op| (*op, EQUAL_WEIGHT))
            .collect(),
    }
}

/// Applies configured overrides, keyed by operation name, to the built-in
/// mix. Operations left at weight zero are dropped.
pub fn resolve_weights(
    kind: StructureKind,
    overrides: &BTreeMap<String, u32>,
) -> Result<Vec<(OpKind, u32)>, StimulusError> {
    let mut weights: BTreeMap<OpKind, u32> = default_weights(kind).into_iter().collect();
    for (name, weight) in overrides {
        let op: OpKind = name
            .parse()
            .map_err(|_| StimulusError::UnknownOperation(name.clone()))?;
        if !kind.supports(op) {
            return Err(StimulusError::UnsupportedOperation { op, kind });
        }
        weights.insert(op, *weight);
    }
    let resolved: Vec<(OpKind, u32)> = weights.into_iter().filter(|(_, w)| *w > 0).collect();
    if resolved.is_empty() {
        return Err(StimulusError::NoEnabledOperations(kind));
    }
    Ok(resolved)
}
