//! Tracing of program evaluation.
//!
//! Records what the driver did (modules loaded, globals bound, segments
//! shifted) into a bounded ring buffer. Tracing costs a single branch when
//! disabled.

use std::collections::VecDeque;
use std::fmt;
use std::io::{self, Write};

use crate::config::TraceConfig;

// =============================================================================
// Trace Events
// =============================================================================

/// Something the driver did.
///
/// Events carry rendered strings so that records stay readable after the
/// interner or the modules they describe have moved on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TraceEvent {
    /// A module was created for a newly loaded source.
    ModuleLoaded {
        /// Module number.
        module: u32,
        /// Source name.
        name: String,
    },
    /// A global operator binding was registered.
    GlobalBound {
        /// Rendered key.
        key: String,
        /// Operator name.
        operator: String,
    },
    /// A module received its source node.
    ModuleInitialized {
        /// Module number.
        module: u32,
        /// Source name.
        name: String,
    },
    /// A segment was shifted off a module queue and handed to its operator.
    SegmentShifted {
        /// Module number.
        module: u32,
        /// Operator name.
        operator: String,
        /// Rendered key.
        key: String,
        /// First offset of the segment.
        start: usize,
        /// One past the last offset of the segment.
        end: usize,
        /// Number of nodes handed over.
        nodes: usize,
    },
    /// A module finished with nodes no operator claimed.
    Unresolved {
        /// Module number.
        module: u32,
        /// Number of keys with leftovers.
        keys: usize,
        /// Total number of leftover nodes.
        nodes: usize,
    },
}

impl TraceEvent {
    /// Returns a short name for the event type.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::ModuleLoaded { .. } => "module_loaded",
            Self::GlobalBound { .. } => "global_bound",
            Self::ModuleInitialized { .. } => "module_initialized",
            Self::SegmentShifted { .. } => "segment_shifted",
            Self::Unresolved { .. } => "unresolved",
        }
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModuleLoaded { module, name } => write!(f, "load module#{module} `{name}`"),
            Self::GlobalBound { key, operator } => write!(f, "global {key} -> {operator}"),
            Self::ModuleInitialized { module, name } => {
                write!(f, "init module#{module} `{name}`")
            }
            Self::SegmentShifted {
                module,
                operator,
                key,
                start,
                end,
                nodes,
            } => write!(
                f,
                "shift module#{module} {key} [{start}, {end}) x{nodes} -> {operator}"
            ),
            Self::Unresolved {
                module,
                keys,
                nodes,
            } => write!(f, "unresolved module#{module}: {nodes} node(s) under {keys} key(s)"),
        }
    }
}

/// A single recorded event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Monotonically increasing record id.
    pub id: u64,
    /// Evaluation step the event happened in.
    pub step: usize,
    /// The event itself.
    pub event: TraceEvent,
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{:04} [{:06}] {}", self.step, self.id, self.event)
    }
}

// =============================================================================
// Tracer
// =============================================================================

/// Records driver events into a bounded buffer, oldest evicted first.
#[derive(Clone, Debug)]
pub struct Tracer {
    config: TraceConfig,
    records: VecDeque<TraceRecord>,
    next_id: u64,
    step: usize,
}

impl Tracer {
    /// Creates a tracer with the given configuration.
    #[must_use]
    pub fn new(config: TraceConfig) -> Self {
        Self {
            records: VecDeque::with_capacity(config.buffer_size.min(1024)),
            config,
            next_id: 0,
            step: 0,
        }
    }

    /// Creates a disabled tracer.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(TraceConfig::default())
    }

    /// Returns whether tracing is enabled.
    #[must_use]
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Enables tracing.
    pub fn enable(&mut self) {
        self.config.enabled = true;
    }

    /// Disables tracing.
    pub fn disable(&mut self) {
        self.config.enabled = false;
    }

    /// Sets the step number stamped on subsequent records.
    pub fn set_step(&mut self, step: usize) {
        self.step = step;
    }

    /// Records an event.
    #[inline]
    pub fn record(&mut self, event: TraceEvent) {
        if !self.config.enabled {
            return;
        }
        self.push(event);
    }

    /// Records the event built by `make`, which only runs when enabled.
    #[inline]
    pub fn record_with(&mut self, make: impl FnOnce() -> TraceEvent) {
        if !self.config.enabled {
            return;
        }
        self.push(make());
    }

    fn push(&mut self, event: TraceEvent) {
        let record = TraceRecord {
            id: self.next_id,
            step: self.step,
            event,
        };
        self.next_id += 1;

        if self.config.to_stderr {
            // Tracing must never fail evaluation.
            let _ = writeln!(io::stderr().lock(), "{record}");
        }

        self.records.push_back(record);
        while self.records.len() > self.config.buffer_size {
            self.records.pop_front();
        }
    }

    /// Returns all buffered records, oldest first.
    pub fn records(&self) -> impl Iterator<Item = &TraceRecord> {
        self.records.iter()
    }

    /// Returns the number of buffered records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the most recent `count` records, oldest first.
    #[must_use]
    pub fn recent(&self, count: usize) -> Vec<&TraceRecord> {
        let skip = self.records.len().saturating_sub(count);
        self.records.iter().skip(skip).collect()
    }

    /// Drops all buffered records. Record ids keep increasing.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::disabled()
    }
}
