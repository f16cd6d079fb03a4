use super::decision::Block;
use super::request::GatewayRequest;
use super::target::TargetSet;
use crate::logging::BlockLog;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Destination for block records, one JSON document per line.
///
/// Implementations must not panic and must not block for long; a sink
/// that cannot write drops the record.
pub trait DecisionSink: Send + Sync {
    fn emit(&self, line: &str);
}

/// Writes records to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl DecisionSink for StdoutSink {
    fn emit(&self, line: &str) {
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "{}", line);
        let _ = out.flush();
    }
}

/// Keeps records in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn records(&self) -> Vec<BlockLog> {
        self.lines()
            .iter()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }
}

impl DecisionSink for MemorySink {
    fn emit(&self, line: &str) {
        match self.lines.lock() {
            Ok(mut lines) => lines.push(line.to_string()),
            Err(poisoned) => poisoned.into_inner().push(line.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct DecisionLogger {
    sink: Arc<dyn DecisionSink>,
}

impl DecisionLogger {
    pub fn new(sink: Arc<dyn DecisionSink>) -> Self {
        Self { sink }
    }

    pub fn stdout() -> Self {
        Self::new(Arc::new(StdoutSink))
    }

    /// Emit the record for a block and return it.
    pub fn log_block(&self, block: &Block, request: &GatewayRequest, targets: &TargetSet) -> BlockLog {
        let record = BlockLog::new(
            block.rule_id.clone(),
            block.rule_name.clone(),
            block.severity,
            request.method().to_string(),
            targets.path.clone(),
            &targets.query,
            request.source_ip().to_string(),
            &targets.useragent,
        );
        self.sink.emit(&record.to_json());
        record
    }
}

impl Default for DecisionLogger {
    fn default() -> Self {
        Self::stdout()
    }
}

impl std::fmt::Debug for DecisionLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionLogger").finish_non_exhaustive()
    }
}
