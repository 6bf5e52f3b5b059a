use serde::Serialize;
use serde_json::Value;

pub const STATUS_PROCESSED: &str = "processed";

/// What the downstream endpoint answered for one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayResponse {
    pub status_code: u16,
    /// Parsed JSON body, `None` when the body was empty
    pub body: Option<Value>,
}

/// Per-segment result, serialized as either
/// `{segment, status_code, response}` or `{segment, error}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RelayOutcome {
    Delivered {
        segment: usize,
        status_code: u16,
        response: Option<Value>,
    },
    Failed {
        segment: usize,
        error: String,
    },
}

impl RelayOutcome {
    pub fn delivered(segment: usize, response: RelayResponse) -> Self {
        RelayOutcome::Delivered {
            segment,
            status_code: response.status_code,
            response: response.body,
        }
    }

    pub fn failed(segment: usize, error: impl ToString) -> Self {
        RelayOutcome::Failed {
            segment,
            error: error.to_string(),
        }
    }

    pub fn segment(&self) -> usize {
        match self {
            RelayOutcome::Delivered { segment, .. } | RelayOutcome::Failed { segment, .. } => {
                *segment
            }
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, RelayOutcome::Delivered { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedReport {
    pub status: &'static str,
    pub results: Vec<RelayOutcome>,
}

impl AggregatedReport {
    pub fn processed(results: Vec<RelayOutcome>) -> Self {
        Self {
            status: STATUS_PROCESSED,
            results,
        }
    }
}
