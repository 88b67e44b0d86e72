use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Ok,
    Muted,
    Error,
}
impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Ok => "ok",
            Severity::Muted => "muted",
            Severity::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub severity: Severity,
}

/// Receives progress and error messages meant for a human. Never feeds back into control flow.
pub trait StatusReporter: Send + Sync {
    fn report(&self, severity: Severity, message: &str);
}

/// Sends every status line into the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingStatus;

impl StatusReporter for TracingStatus {
    fn report(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Error => error!(status = severity.as_str(), "{}", message),
            _ => info!(status = severity.as_str(), "{}", message),
        }
    }
}

// A closed receiver just means nobody is listening anymore
impl StatusReporter for UnboundedSender<Status> {
    fn report(&self, severity: Severity, message: &str) {
        let _ = self.send(Status { message: message.to_owned(), severity });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn channel_reporter_forwards_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel::<Status>();
        tx.report(Severity::Muted, "Loading inventory… (count=2000)");
        tx.report(Severity::Ok, "done");

        assert_eq!(rx.try_recv().unwrap(), Status { message: "Loading inventory… (count=2000)".into(), severity: Severity::Muted });
        assert_eq!(rx.try_recv().unwrap().severity, Severity::Ok);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_channel_is_ignored() {
        let (tx, rx) = mpsc::unbounded_channel::<Status>();
        drop(rx);
        tx.report(Severity::Error, "nobody hears this");
    }
}
