//! Discovery/replay driver

use crate::accel::config::AccelConfig;
use crate::accel::discovery::{discover, Discovery};
use crate::accel::library::PatternLibrary;
use crate::accel::replay::fast_run;
use crate::accel::result::{DriverReport, RunStatistics};
use crate::error::EngineError;
use crate::ir::Program;
use crate::semantics::ConcreteState;
use std::time::Instant;
use tracing::{debug, info};

/// Owns a program and its pattern library for the length of a run
pub struct Driver {
    program: Program,
    config: AccelConfig,
    library: PatternLibrary,
    statistics: RunStatistics,
}

impl Driver {
    pub fn new(program: Program, config: AccelConfig) -> Self {
        Self {
            program,
            config,
            library: PatternLibrary::new(),
            statistics: RunStatistics::new(),
        }
    }

    pub fn library(&self) -> &PatternLibrary {
        &self.library
    }

    /// Probe from `state` and add any new pattern to the library
    pub fn discover_once(&mut self, state: &ConcreteState) -> Result<Discovery, EngineError> {
        let discovery = discover(&self.program, state, &self.config, &mut self.statistics)?;
        if let Some(pattern) = &discovery.pattern {
            if self.library.insert(pattern.clone()) {
                self.statistics.patterns_found += 1;
                info!(
                    library_size = self.library.len(),
                    %pattern,
                    "pattern added to library"
                );
            }
        }
        Ok(discovery)
    }

    /// Alternate discovery and fast replay for up to `cycles` rounds, stopping
    /// once the program halts
    pub fn run(&mut self, mut state: ConcreteState) -> Result<DriverReport, EngineError> {
        let started = Instant::now();
        let ip_register = self.program.ip_register();
        let mut cycles = 0;

        while cycles < self.config.cycles && self.program.contains(state[ip_register]) {
            self.discover_once(&state)?;
            state = fast_run(
                &self.program,
                state,
                &self.library,
                &self.config,
                &mut self.statistics,
            )?;
            cycles += 1;

            debug!(
                cycle = cycles,
                %state,
                patterns = self.library.len(),
                concrete_steps = self.statistics.concrete_steps,
                jumps = self.statistics.jumps_taken,
                "cycle finished"
            );
        }

        self.statistics.elapsed_time += started.elapsed();
        Ok(DriverReport {
            halted: !self.program.contains(state[ip_register]),
            state,
            cycles,
            statistics: self.statistics.clone(),
        })
    }
}
