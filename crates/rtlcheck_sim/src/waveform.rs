//! Waveform recording of design ports.
//!
//! The [`TraceRecorder`] trait abstracts trace output. [`VcdRecorder`]
//! writes the IEEE 1364 Value Change Dump format, viewable in GTKWave,
//! Surfer, or other waveform viewers.

use std::io::Write;

use rtlcheck_common::SignalValue;

use crate::error::SimError;

/// Trait for recording port waveforms.
pub trait TraceRecorder {
    /// Registers a signal under a harness-chosen ID.
    fn register_signal(&mut self, id: usize, name: &str, width: u32) -> Result<(), SimError>;

    /// Opens a new scope (hierarchy level).
    fn begin_scope(&mut self, name: &str) -> Result<(), SimError>;

    /// Closes the current scope.
    fn end_scope(&mut self) -> Result<(), SimError>;

    /// Records a value change at the given time (in femtoseconds).
    fn record_change(&mut self, time_fs: u64, id: usize, value: &SignalValue)
        -> Result<(), SimError>;

    /// Flushes the output.
    fn finalize(&mut self) -> Result<(), SimError>;
}

/// Where the recorder is in the VCD file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    /// Nothing written yet.
    Empty,
    /// Header written; scopes and variables may follow.
    Definitions,
    /// Value changes are being dumped; holds the last timestamp.
    Dump(u64),
}

/// A registered signal.
struct Traced {
    id: usize,
    code: String,
    width: u32,
}

/// VCD format recorder.
///
/// Identifier codes are short strings of printable ASCII (`!` to `~`).
pub struct VcdRecorder<W: Write> {
    writer: W,
    signals: Vec<Traced>,
    section: Section,
}

impl<W: Write> VcdRecorder<W> {
    /// Creates a recorder writing to the given output.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            signals: Vec::new(),
            section: Section::Empty,
        }
    }

    /// Consumes the recorder and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn ensure_header(&mut self) -> Result<(), SimError> {
        if self.section == Section::Empty {
            write!(
                self.writer,
                "$version\n  rtlcheck {}\n$end\n$timescale\n  1fs\n$end\n",
                env!("CARGO_PKG_VERSION")
            )?;
            self.section = Section::Definitions;
        }
        Ok(())
    }

    fn close_definitions(&mut self) -> Result<(), SimError> {
        self.ensure_header()?;
        if self.section == Section::Definitions {
            writeln!(self.writer, "$enddefinitions $end")?;
        }
        Ok(())
    }

    /// Identifier code of the `index`th registered signal, base 94.
    fn id_code(index: usize) -> String {
        let mut code = String::new();
        let mut rest = index;
        loop {
            code.push(char::from(b'!' + (rest % 94) as u8));
            rest /= 94;
            if rest == 0 {
                return code;
            }
            rest -= 1;
        }
    }
}

impl<W: Write> TraceRecorder for VcdRecorder<W> {
    fn register_signal(&mut self, id: usize, name: &str, width: u32) -> Result<(), SimError> {
        self.ensure_header()?;
        let code = Self::id_code(self.signals.len());
        writeln!(self.writer, "$var wire {width} {code} {name} $end")?;
        self.signals.push(Traced { id, code, width });
        Ok(())
    }

    fn begin_scope(&mut self, name: &str) -> Result<(), SimError> {
        self.ensure_header()?;
        writeln!(self.writer, "$scope module {name} $end")?;
        Ok(())
    }

    fn end_scope(&mut self) -> Result<(), SimError> {
        writeln!(self.writer, "$upscope $end")?;
        Ok(())
    }

    fn record_change(
        &mut self,
        time_fs: u64,
        id: usize,
        value: &SignalValue,
    ) -> Result<(), SimError> {
        match self.section {
            Section::Dump(last) if last == time_fs => {}
            Section::Dump(_) => writeln!(self.writer, "#{time_fs}")?,
            Section::Empty | Section::Definitions => {
                self.close_definitions()?;
                writeln!(self.writer, "$dumpvars\n#{time_fs}")?;
            }
        }
        self.section = Section::Dump(time_fs);

        let signal = self
            .signals
            .iter()
            .find(|s| s.id == id)
            .ok_or(SimError::UnregisteredTraceSignal(id))?;
        if signal.width == 1 {
            writeln!(self.writer, "{}{}", value.bit_char(0), signal.code)?;
        } else {
            writeln!(self.writer, "b{} {}", value.to_binary_string(), signal.code)?;
        }
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), SimError> {
        self.close_definitions()?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_recorder() -> VcdRecorder<Vec<u8>> {
        VcdRecorder::new(Vec::new())
    }

    fn output(rec: VcdRecorder<Vec<u8>>) -> String {
        String::from_utf8(rec.into_inner()).unwrap()
    }

    #[test]
    fn id_codes() {
        assert_eq!(VcdRecorder::<Vec<u8>>::id_code(0), "!");
        assert_eq!(VcdRecorder::<Vec<u8>>::id_code(93), "~");
        assert_eq!(VcdRecorder::<Vec<u8>>::id_code(94), "!!");
    }

    #[test]
    fn register_signal_writes_var() {
        let mut rec = make_recorder();
        rec.begin_scope("fifo").unwrap();
        rec.register_signal(0, "wr_clk", 1).unwrap();
        rec.register_signal(1, "data_wr", 8).unwrap();
        rec.end_scope().unwrap();

        let out = output(rec);
        assert!(out.contains("$scope module fifo $end"));
        assert!(out.contains("$var wire 1 ! wr_clk $end"));
        assert!(out.contains("$var wire 8 \" data_wr $end"));
        assert!(out.contains("$upscope $end"));
    }

    #[test]
    fn records_changes_with_timestamps() {
        let mut rec = make_recorder();
        rec.begin_scope("top").unwrap();
        rec.register_signal(0, "clk", 1).unwrap();
        rec.register_signal(1, "data", 4).unwrap();
        rec.end_scope().unwrap();

        rec.record_change(0, 0, &SignalValue::from_bool(false)).unwrap();
        rec.record_change(0, 1, &SignalValue::unknown(4)).unwrap();
        rec.record_change(5_000_000, 0, &SignalValue::from_bool(true))
            .unwrap();
        rec.record_change(5_000_000, 1, &SignalValue::from_u64(0b1010, 4))
            .unwrap();
        rec.finalize().unwrap();

        let out = output(rec);
        assert!(out.contains("$dumpvars"));
        assert!(out.contains("#0\n0!\nbxxxx \""));
        assert!(out.contains("#5000000\n1!\nb1010 \""));
        assert_eq!(out.matches("#5000000").count(), 1);
    }

    #[test]
    fn unregistered_signal_errors() {
        let mut rec = make_recorder();
        let err = rec
            .record_change(0, 3, &SignalValue::from_bool(true))
            .unwrap_err();
        assert!(matches!(err, SimError::UnregisteredTraceSignal(3)));
    }

    #[test]
    fn header_names_tool() {
        let mut rec = make_recorder();
        rec.finalize().unwrap();
        let out = output(rec);
        assert!(out.contains("$version\n  rtlcheck"));
        assert!(out.contains("$timescale\n  1fs"));
        assert!(out.contains("$enddefinitions $end"));
    }
}
