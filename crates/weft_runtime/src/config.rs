//! Configuration for program evaluation.

use std::path::PathBuf;

use weft_language::DEFAULT_TAB_WIDTH;

/// Default kill switch for evaluation steps.
pub const DEFAULT_MAX_STEPS: usize = 100_000;

/// Default number of trace records kept.
pub const DEFAULT_TRACE_BUFFER: usize = 10_000;

/// Configuration for the tracer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceConfig {
    /// Whether tracing is enabled.
    pub enabled: bool,
    /// Maximum records to keep in the buffer.
    pub buffer_size: usize,
    /// Whether records are echoed to stderr.
    pub to_stderr: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            buffer_size: DEFAULT_TRACE_BUFFER,
            to_stderr: false,
        }
    }
}

impl TraceConfig {
    /// Creates a new (disabled) tracer configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to enable tracing.
    #[must_use]
    pub fn enabled(mut self) -> Self {
        self.enabled = true;
        self
    }

    /// Builder method to set buffer size.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Builder method to echo records to stderr.
    #[must_use]
    pub fn to_stderr(mut self) -> Self {
        self.to_stderr = true;
        self
    }
}

/// Configuration for a [`Program`](crate::Program).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalConfig {
    /// Maximum number of segments applied in one `evaluate` call.
    pub max_steps: usize,
    /// Tab width used for column computation.
    pub tab_width: u32,
    /// Directory relative file loads resolve against.
    pub base_path: PathBuf,
    /// Tracer configuration.
    pub trace: TraceConfig,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            tab_width: DEFAULT_TAB_WIDTH,
            base_path: PathBuf::from("."),
            trace: TraceConfig::default(),
        }
    }
}

impl EvalConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration for debugging: tracing on, echoed to stderr.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            trace: TraceConfig::new().enabled().to_stderr(),
            ..Self::default()
        }
    }

    /// Builder method to set the step kill switch.
    #[must_use]
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Builder method to set the tab width.
    #[must_use]
    pub fn with_tab_width(mut self, tab_width: u32) -> Self {
        self.tab_width = tab_width;
        self
    }

    /// Builder method to set the base path.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = path.into();
        self
    }

    /// Builder method to set the tracer configuration.
    #[must_use]
    pub fn with_trace(mut self, trace: TraceConfig) -> Self {
        self.trace = trace;
        self
    }
}
