//! Session file loading and validation.

use crate::error::ConfigError;
use crate::types::{SessionConfig, StructureConfig};
use rtlcheck_common::{bits_for, OpKind, MAX_SIGNAL_WIDTH};
use std::path::Path;

/// File name looked up when a directory is given to [`load_config`].
pub const CONFIG_FILE_NAME: &str = "rtlcheck.toml";

/// Widest value a single field may carry.
const MAX_FIELD_WIDTH: u32 = 64;

/// Most elements any simulated structure may hold.
pub const MAX_CAPACITY: u64 = 1 << 16;

/// Loads and validates a session configuration.
///
/// `path` may name the file itself or a directory containing `rtlcheck.toml`.
pub fn load_config(path: &Path) -> Result<SessionConfig, ConfigError> {
    let file = if path.is_dir() {
        path.join(CONFIG_FILE_NAME)
    } else {
        path.to_path_buf()
    };
    let content = std::fs::read_to_string(&file)?;
    load_config_from_str(&content)
}

/// Parses and validates a session configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<SessionConfig, ConfigError> {
    let config: SessionConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks field presence, widths, capacities, and weight names.
pub fn validate_config(config: &SessionConfig) -> Result<(), ConfigError> {
    if config.session.name.trim().is_empty() {
        return Err(ConfigError::MissingField("session.name".to_string()));
    }
    if config.session.timeout_cycles == 0 {
        return Err(invalid("session.timeout_cycles must be at least 1"));
    }
    if config.dut.latency == 0 {
        return Err(invalid("dut.latency must be at least 1"));
    }
    for (name, clock) in &config.clocks {
        if clock.period_ns == 0 {
            return Err(invalid(format!("clock '{name}' has a zero period")));
        }
    }
    validate_structure(&config.structure)?;

    let kind = config.structure.kind();
    for name in config.stimulus.weights.keys() {
        let op: OpKind = name
            .parse()
            .map_err(|e| invalid(format!("stimulus.weights: {e}")))?;
        if !kind.supports(op) {
            return Err(invalid(format!(
                "stimulus.weights: '{op}' is not an operation of {kind}"
            )));
        }
    }
    Ok(())
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(msg.into())
}

fn check_width(field: &str, width: u32) -> Result<(), ConfigError> {
    if width == 0 || width > MAX_FIELD_WIDTH {
        return Err(invalid(format!(
            "{field} must be between 1 and {MAX_FIELD_WIDTH}, got {width}"
        )));
    }
    Ok(())
}

fn check_nonzero(field: &str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(invalid(format!("{field} must be at least 1")));
    }
    Ok(())
}

fn check_capacity(field: &str, value: u64) -> Result<(), ConfigError> {
    check_nonzero(field, value)?;
    if value > MAX_CAPACITY {
        return Err(invalid(format!(
            "{field} must be at most {MAX_CAPACITY}, got {value}"
        )));
    }
    Ok(())
}

fn check_bus(field: &str, width: u32) -> Result<(), ConfigError> {
    if width > MAX_SIGNAL_WIDTH {
        return Err(invalid(format!(
            "{field} bus is {width} bits wide, limit is {MAX_SIGNAL_WIDTH}"
        )));
    }
    Ok(())
}

fn validate_structure(structure: &StructureConfig) -> Result<(), ConfigError> {
    match structure {
        StructureConfig::SinglyLinkedList(p) | StructureConfig::DoublyLinkedList(p) => {
            check_width("structure.data_width", p.data_width)?;
            check_capacity("structure.max_node", p.max_node)?;
        }
        StructureConfig::Fifo(p) => {
            check_width("structure.data_width", p.data_width)?;
            check_capacity("structure.depth", p.depth)?;
        }
        StructureConfig::Lifo(p) => {
            check_width("structure.data_width", p.data_width)?;
            check_capacity("structure.depth", p.depth)?;
        }
        StructureConfig::HashTable(p) => {
            check_width("structure.key_width", p.key_width)?;
            check_width("structure.value_width", p.value_width)?;
            check_capacity("structure.total_index", p.total_index)?;
            check_nonzero("structure.chaining_size", p.chaining_size)?;
            let slots = p
                .total_index
                .checked_mul(p.chaining_size)
                .unwrap_or(u64::MAX);
            check_capacity("structure.total_index * structure.chaining_size", slots)?;
        }
        StructureConfig::List(p) => {
            check_width("structure.data_width", p.data_width)?;
            check_capacity("structure.length", p.length)?;
            check_width("list data_out", p.out_width())?;
        }
        StructureConfig::Table(p) => {
            check_width("structure.data_width", p.data_width)?;
            check_capacity("structure.table_size", p.table_size)?;
            check_nonzero("structure.input_rate", u64::from(p.input_rate))?;
            check_nonzero("structure.output_rate", u64::from(p.output_rate))?;
            if p.data_width < 64 && p.reset_value >> p.data_width != 0 {
                return Err(invalid(format!(
                    "structure.reset_value {:#x} does not fit {} bits",
                    p.reset_value, p.data_width
                )));
            }
            let index_width = bits_for(p.table_size.saturating_sub(1));
            check_bus("data_wr", p.input_rate.saturating_mul(p.data_width))?;
            check_bus("index_wr", p.input_rate.saturating_mul(index_width))?;
            check_bus("data_rd", p.output_rate.saturating_mul(p.data_width))?;
            check_bus("index_rd", p.output_rate.saturating_mul(index_width))?;
        }
        StructureConfig::DualEdgeFf(p) => {
            check_width("structure.data_width", p.data_width)?;
        }
    }
    Ok(())
}
