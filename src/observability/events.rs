//! Observable events
//!
//! Events are explicit and typed; each has a stable upper-snake name.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Engine configuration loaded
    ConfigLoaded,

    // Query
    /// Query received
    QueryBegin,
    /// Query produced its records
    QueryComplete,
    /// Query rejected with an error
    QueryRejected,

    // Data
    /// Insert batch acknowledged
    EntitiesInserted,
    /// Growing data sealed into a segment
    SegmentFlushed,
    /// Collection or partitions loaded into the serving path
    CollectionLoaded,
    /// Collection released from the serving path
    CollectionReleased,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::QueryBegin => "QUERY_BEGIN",
            Event::QueryComplete => "QUERY_COMPLETE",
            Event::QueryRejected => "QUERY_REJECTED",
            Event::EntitiesInserted => "ENTITIES_INSERTED",
            Event::SegmentFlushed => "SEGMENT_FLUSHED",
            Event::CollectionLoaded => "COLLECTION_LOADED",
            Event::CollectionReleased => "COLLECTION_RELEASED",
        }
    }

    /// Severity used when the event is logged without an explicit one
    pub fn severity(&self) -> Severity {
        match self {
            Event::QueryRejected => Severity::Warn,
            Event::QueryBegin => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
