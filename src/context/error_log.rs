//! Error Reporting
//!
//! Out-of-band error channel shared by every extension facade.
//!
//! Reports never alter control flow: the facade still returns its neutral
//! value (null handle, `false`, nothing). The default sink, [`ErrorLog`],
//! follows WebGL `getError` semantics and rate-limits its log output.

use std::collections::VecDeque;
use std::fmt;

use crate::settings::ErrorLogSettings;

/// WebGL error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NoError,
    InvalidEnum,
    InvalidValue,
    InvalidOperation,
    OutOfMemory,
    ContextLostWebgl,
}

impl ErrorCode {
    /// The GL enum value of this code.
    #[must_use]
    pub const fn as_raw(self) -> u32 {
        match self {
            Self::NoError => 0,
            Self::InvalidEnum => 0x0500,
            Self::InvalidValue => 0x0501,
            Self::InvalidOperation => 0x0502,
            Self::OutOfMemory => 0x0505,
            Self::ContextLostWebgl => 0x9242,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoError => "NO_ERROR",
            Self::InvalidEnum => "INVALID_ENUM",
            Self::InvalidValue => "INVALID_VALUE",
            Self::InvalidOperation => "INVALID_OPERATION",
            Self::OutOfMemory => "OUT_OF_MEMORY",
            Self::ContextLostWebgl => "CONTEXT_LOST_WEBGL",
        };
        f.write_str(name)
    }
}

/// What kind of misuse or failure produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorReason {
    /// The call was made on a lost context.
    ContextLost,
    /// A non-null handle that is not live in this context.
    InvalidHandle,
    /// The device refused an allocation.
    ResourceExhaustion,
    /// The call makes no sense in the context's current state.
    InvalidState,
}

/// A single error reported by a facade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub reason: ErrorReason,
    /// API entry point, e.g. `"bindVertexArrayOES"`
    pub operation: &'static str,
    pub message: String,
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.operation, self.code, self.message)
    }
}

/// Receiver of facade error reports.
pub trait ErrorSink {
    fn report_error(&mut self, report: ErrorReport);

    /// Returns and clears the oldest unread error code.
    fn take_error(&mut self) -> ErrorCode {
        ErrorCode::NoError
    }
}

impl<F> ErrorSink for F
where
    F: FnMut(ErrorReport),
{
    fn report_error(&mut self, report: ErrorReport) {
        self(report);
    }
}

/// Default [`ErrorSink`] with `getError` semantics.
#[derive(Debug, Default)]
pub struct ErrorLog {
    pending: Option<ErrorCode>,
    /// Most recent reports, oldest first
    history: VecDeque<ErrorReport>,
    warnings_emitted: u32,
    settings: ErrorLogSettings,
}

impl ErrorLog {
    #[must_use]
    pub fn new(settings: ErrorLogSettings) -> Self {
        Self {
            pending: None,
            history: VecDeque::new(),
            warnings_emitted: 0,
            settings,
        }
    }

    /// The last `max_history` reports (empty when history is disabled).
    #[must_use]
    pub fn history(&self) -> &VecDeque<ErrorReport> {
        &self.history
    }

    /// Drains the report history.
    pub fn take_history(&mut self) -> Vec<ErrorReport> {
        std::mem::take(&mut self.history).into()
    }

    fn record(&mut self, report: ErrorReport) {
        let limit = self.settings.max_history;
        if !self.settings.keep_history || limit == 0 {
            return;
        }
        while self.history.len() >= limit {
            self.history.pop_front();
        }
        self.history.push_back(report);
    }

    #[inline]
    #[must_use]
    pub fn pending(&self) -> Option<ErrorCode> {
        self.pending
    }

    fn emit_warning(&mut self, report: &ErrorReport) {
        let max = self.settings.max_warnings;
        if self.warnings_emitted < max {
            log::warn!("WebGL warning: {report}");
        } else if self.warnings_emitted == max {
            log::warn!("WebGL: No further warnings will be reported for this context (limit: {max})");
        } else {
            return;
        }
        self.warnings_emitted += 1;
    }
}

impl ErrorSink for ErrorLog {
    fn report_error(&mut self, report: ErrorReport) {
        // Only the first code since the last query is kept.
        if self.pending.is_none() {
            self.pending = Some(report.code);
        }
        self.emit_warning(&report);
        self.record(report);
    }

    fn take_error(&mut self) -> ErrorCode {
        self.pending.take().unwrap_or(ErrorCode::NoError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(code: ErrorCode, operation: &'static str) -> ErrorReport {
        ErrorReport {
            code,
            reason: ErrorReason::InvalidHandle,
            operation,
            message: "test".to_string(),
        }
    }

    #[test]
    fn test_first_error_wins_until_taken() {
        let mut log = ErrorLog::default();
        log.report_error(report(ErrorCode::InvalidOperation, "a"));
        log.report_error(report(ErrorCode::OutOfMemory, "b"));

        assert_eq!(log.take_error(), ErrorCode::InvalidOperation);
        assert_eq!(log.take_error(), ErrorCode::NoError);
        assert_eq!(log.history().len(), 2);
    }

    #[test]
    fn test_history_can_be_disabled() {
        let mut log = ErrorLog::new(ErrorLogSettings {
            keep_history: false,
            ..Default::default()
        });
        log.report_error(report(ErrorCode::InvalidOperation, "a"));

        assert!(log.history().is_empty());
        assert_eq!(log.pending(), Some(ErrorCode::InvalidOperation));
    }

    #[test]
    fn test_warning_budget_saturates() {
        let mut log = ErrorLog::new(ErrorLogSettings {
            max_warnings: 2,
            keep_history: false,
            ..Default::default()
        });
        for _ in 0..10 {
            log.report_error(report(ErrorCode::InvalidOperation, "a"));
        }
        // Two warnings plus the "no further warnings" line.
        assert_eq!(log.warnings_emitted, 3);
    }

    #[test]
    fn test_history_keeps_most_recent_reports() {
        let mut log = ErrorLog::new(ErrorLogSettings {
            max_warnings: 0,
            max_history: 4,
            ..Default::default()
        });
        for operation in ["a", "b", "c", "d", "e", "f"] {
            log.report_error(report(ErrorCode::InvalidOperation, operation));
        }

        let kept: Vec<_> = log.history().iter().map(|r| r.operation).collect();
        assert_eq!(kept, vec!["c", "d", "e", "f"]);
    }

    #[test]
    fn test_zero_history_limit_keeps_nothing() {
        let mut log = ErrorLog::new(ErrorLogSettings {
            max_history: 0,
            ..Default::default()
        });
        log.report_error(report(ErrorCode::InvalidOperation, "a"));
        assert!(log.history().is_empty());
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |r: ErrorReport| seen.push(r.operation);
            sink.report_error(report(ErrorCode::InvalidOperation, "isVertexArrayOES"));
            assert_eq!(sink.take_error(), ErrorCode::NoError);
        }
        assert_eq!(seen, vec!["isVertexArrayOES"]);
    }

    #[test]
    fn test_raw_codes() {
        assert_eq!(ErrorCode::InvalidOperation.as_raw(), 0x0502);
        assert_eq!(ErrorCode::ContextLostWebgl.as_raw(), 0x9242);
    }
}
