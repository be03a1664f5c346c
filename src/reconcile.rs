use log::{error, info, warn};

use crate::api::LiveDnsClient;
use crate::api::model::RecordState;
use crate::config::RecordDefinition;

/// Terminal state of one record after a reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The provider already publishes the resolved IP; no write was issued.
    Unchanged,
    Created,
    Updated,
    /// Fetch or write failed; logged and skipped, never fatal to the run.
    Failed,
}

/// Compares every record against the resolved `ip` and issues the minimal create/update calls.
///
/// Strictly sequential: one record at a time, a read followed by at most one write. Returns one
/// outcome per record, in input order. A failing record is logged and skipped so the remaining
/// records still get their turn.
pub async fn reconcile(
    client: &LiveDnsClient,
    ip: &str,
    records: &[RecordDefinition],
) -> Vec<Outcome> {
    let mut outcomes = Vec::with_capacity(records.len());
    for record in records {
        outcomes.push(reconcile_one(client, ip, record).await);
    }
    outcomes
}

async fn reconcile_one(client: &LiveDnsClient, ip: &str, record: &RecordDefinition) -> Outcome {
    info!(
        "[{}] record {} ({}) for domain {}",
        record.section, record.record_name, record.record_type, record.domain
    );

    let state = match client.fetch_record(record).await {
        Ok(state) => state,
        Err(err) => {
            // Unknown remote state; writing now could recreate a record that still exists.
            warn!("[{}] could not check current state, leaving record alone: {err}", record.section);
            return Outcome::Failed;
        },
    };

    let (written, applied) = match state {
        RecordState::Present(rrset) if rrset.current_value() == Some(ip) => {
            info!("[{}] no IP change, nothing to do", record.section);
            return Outcome::Unchanged;
        },
        RecordState::Present(_) => {
            info!("[{}] IP change detected, updating", record.section);
            (client.update_record(record, ip).await, Outcome::Updated)
        },
        RecordState::Absent => {
            info!("[{}] record does not exist, creating it", record.section);
            (client.create_record(record, ip).await, Outcome::Created)
        },
    };

    match written {
        Ok(()) => {
            info!("[{}] zone record written", record.section);
            applied
        },
        Err(err) => {
            error!("[{}] record write failed: {err}", record.section);
            Outcome::Failed
        },
    }
}
