//! One verification run: a design, its agents, and the checker.
//!
//! A [`Session`] owns the harness with the behavioural design, one driver
//! and one monitor per interface of the design, and the scoreboard with its
//! reference model. Every clock edge goes to the monitors, then to the
//! drivers. Completed operations from the checked agents are reordered into
//! sampling order before the scoreboard sees them.

use crate::error::SessionError;
use crate::ordered::OrderedQueue;
use rtlcheck_codec::{BusLayout, Codec, CodecError, Port};
use rtlcheck_common::{Operation, SignalValue, SimTime, StructureKind, Transaction};
use rtlcheck_config::{validate_config, CheckSource, SessionConfig, StructureConfig};
use rtlcheck_model::build_model;
use rtlcheck_scoreboard::{Report, Scoreboard};
use rtlcheck_sim::{
    build_dut, Agent, AgentRole, Driver, EdgeEvent, Harness, Monitor, SimError, VcdRecorder,
};
use rtlcheck_stimulus::RandomGenerator;
use std::fs::File;
use std::io::BufWriter;

/// A configured design under verification.
pub struct Session {
    config: SessionConfig,
    codec: Codec,
    roles: Vec<AgentRole>,
    harness: Harness,
    scoreboard: Scoreboard,
    drivers: Vec<Driver>,
    monitors: Vec<Monitor>,
    queue: OrderedQueue,
    history: Vec<Transaction>,
}

impl Session {
    /// Builds the design, agents, and checker for a configuration and
    /// resets the design.
    pub fn new(config: &SessionConfig) -> Result<Self, SessionError> {
        validate_config(config)?;
        let codec = Codec::new(BusLayout::new(&config.structure));
        let dut = build_dut(
            &config.structure,
            codec.layout(),
            config.dut.latency,
            &config.dut.defects,
        );
        let mut harness = Harness::from_config(dut, config);
        if let Some(path) = &config.dut.vcd {
            let file = File::create(path).map_err(SimError::from)?;
            harness.attach_trace(Box::new(VcdRecorder::new(BufWriter::new(file))))?;
            tracing::info!(path = %path, "recording trace");
        }

        let read_buffer = matches!(&config.structure, StructureConfig::Fifo(p) if p.rd_buffer);
        let timeout = config.session.timeout_cycles;
        let roles = AgentRole::for_structure(config.structure.kind());
        let drivers = roles
            .iter()
            .map(|role| Driver::new(role.clone(), codec.clone(), timeout, read_buffer))
            .collect();
        let monitors = roles
            .iter()
            .map(|role| Monitor::new(role.clone(), codec.clone(), timeout, read_buffer))
            .collect();

        let mut session = Self {
            config: config.clone(),
            codec,
            roles,
            harness,
            scoreboard: Scoreboard::new(build_model(&config.structure)),
            drivers,
            monitors,
            queue: OrderedQueue::new(),
            history: Vec::new(),
        };
        tracing::info!(
            name = %config.session.name,
            kind = %config.structure.kind(),
            defects = ?config.dut.defects,
            check_source = ?config.session.check_source,
            "session ready"
        );
        session.reset()?;
        Ok(session)
    }

    /// The configuration the session was built from.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Structure under verification.
    pub fn kind(&self) -> StructureKind {
        self.codec.layout().kind
    }

    /// The harness, for inspection.
    pub fn harness(&self) -> &Harness {
        &self.harness
    }

    /// The scoreboard, for inspection.
    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    /// Every transaction checked since the last reset, in check order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.history
    }

    /// Current simulation time.
    pub fn time(&self) -> SimTime {
        self.harness.time()
    }

    /// Resets the design and the reference model. Findings are kept.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.release_inputs()?;
        self.harness.reset(self.config.session.reset_cycles)?;
        self.abort_agents();
        self.queue.clear();
        self.history.clear();
        self.scoreboard.reset_model();
        Ok(())
    }

    /// Runs operations in program order.
    ///
    /// Consecutive operations on the same interface are driven back to
    /// back; when the interface changes, the previous one is drained first.
    /// An idle operation belongs to the interface of the operation before
    /// it.
    pub fn run(&mut self, ops: &[Operation]) -> Result<(), SessionError> {
        let routed = self.route(ops)?;
        for phase in routed.chunk_by(|a, b| a.0 == b.0) {
            let role = phase[0].0;
            tracing::debug!(agent = self.roles[role].name, ops = phase.len(), "phase");
            self.drivers[role].extend(phase.iter().map(|(_, op)| op.clone()));
            self.pump()?;
        }
        Ok(())
    }

    /// Runs operations with every interface driven at once.
    ///
    /// Each interface keeps its own program order; across interfaces the
    /// design's clocks decide. Single-interface designs behave as in
    /// [`run`](Self::run).
    pub fn run_concurrent(&mut self, ops: &[Operation]) -> Result<(), SessionError> {
        for (role, op) in self.route(ops)? {
            self.drivers[role].push(op);
        }
        self.pump()
    }

    /// Runs `count` random operations from the configured mix and seed.
    /// Designs with several interfaces are driven concurrently.
    pub fn run_random(&mut self, count: usize) -> Result<(), SessionError> {
        let ops = RandomGenerator::from_config(&self.config)?.generate(count);
        tracing::info!(count, seed = ?self.config.session.seed, "random stimulus");
        if self.roles.len() > 1 {
            self.run_concurrent(&ops)
        } else {
            self.run(&ops)
        }
    }

    /// Summarizes the run so far.
    pub fn report(&self) -> Report {
        self.scoreboard.report(&self.config.session.name)
    }

    /// Closes the trace, if any, and returns the report.
    pub fn finish(&mut self) -> Result<Report, SessionError> {
        self.harness.finish_trace()?;
        let report = self.report();
        tracing::info!(
            verdict = %report.verdict,
            transactions = report.transactions,
            mismatches = report.mismatches.len(),
            "session finished"
        );
        Ok(report)
    }

    /// Pairs each operation with the interface that carries it.
    fn route(&self, ops: &[Operation]) -> Result<Vec<(usize, Operation)>, SessionError> {
        let kind = self.kind();
        let mut last = 0;
        ops.iter()
            .map(|op| {
                if !kind.supports(op.kind()) {
                    return Err(CodecError::Unsupported {
                        op: op.kind(),
                        kind,
                    }
                    .into());
                }
                if !op.is_idle() {
                    last = self
                        .roles
                        .iter()
                        .position(|role| role.carries(op.kind()))
                        .unwrap_or(0);
                }
                Ok((last, op.clone()))
            })
            .collect()
    }

    /// Advances the clocks until every agent is idle.
    fn pump(&mut self) -> Result<(), SessionError> {
        while !self.is_quiet() {
            let event = self.harness.step()?;
            if let Err(err) = self.dispatch(&event) {
                return Err(self.abandon(err));
            }
            let horizon = self.horizon();
            self.check_ready(horizon);
        }
        self.check_ready(None);
        Ok(())
    }

    fn dispatch(&mut self, event: &EdgeEvent) -> Result<(), SimError> {
        let from_monitor = self.config.session.check_source == CheckSource::Monitor;
        for monitor in &mut self.monitors {
            let captures = monitor.on_event(&mut self.harness, event)?;
            if from_monitor {
                for capture in captures {
                    self.queue.push(capture);
                }
            }
        }
        for driver in &mut self.drivers {
            let captures = driver.on_event(&mut self.harness, event)?;
            if !from_monitor {
                for capture in captures {
                    self.queue.push(capture);
                }
            }
        }
        Ok(())
    }

    /// Oldest sampling edge still held by a checked agent.
    fn horizon(&self) -> Option<u64> {
        match self.config.session.check_source {
            CheckSource::Monitor => self
                .monitors
                .iter()
                .filter_map(|m| m.in_flight_since())
                .min(),
            CheckSource::Driver => self
                .drivers
                .iter()
                .filter_map(|d| d.in_flight_since())
                .min(),
        }
    }

    fn check_ready(&mut self, horizon: Option<u64>) {
        for capture in self.queue.release(horizon) {
            let txn = capture.into_transaction(self.scoreboard.next_seq());
            self.scoreboard.check(&txn);
            self.history.push(txn);
        }
    }

    fn is_quiet(&self) -> bool {
        self.drivers.iter().all(|d| d.is_quiet()) && self.monitors.iter().all(|m| m.is_quiet())
    }

    /// Checks what already completed, records a timeout, and stops every
    /// agent.
    fn abandon(&mut self, err: SimError) -> SessionError {
        self.check_ready(None);
        if let SimError::Timeout { op, cycles, time } = &err {
            tracing::warn!(%op, cycles, %time, "design stopped responding, abandoning scenario");
            self.scoreboard.record_timeout(op, *cycles, *time);
        }
        self.abort_agents();
        if let Err(e) = self.release_inputs() {
            tracing::warn!(error = %e, "could not release inputs");
        }
        err.into()
    }

    fn abort_agents(&mut self) {
        for driver in &mut self.drivers {
            driver.abort(&self.harness);
        }
        for monitor in &mut self.monitors {
            monitor.abort(&self.harness);
        }
    }

    /// Drives every input except reset low.
    fn release_inputs(&mut self) -> Result<(), SimError> {
        let idle: Vec<(Port, SignalValue)> = self
            .codec
            .layout()
            .inputs()
            .filter(|spec| spec.port != Port::Reset)
            .map(|spec| (spec.port, SignalValue::from_u64(0, spec.width)))
            .collect();
        self.harness.apply(&idle)
    }
}
