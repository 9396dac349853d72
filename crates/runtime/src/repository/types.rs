//! Combat log entry stored by [`CombatLogRepository`](super::CombatLogRepository).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use game_core::{SessionId, TurnRecord};

/// One persisted combat log line.
///
/// `digest` is the hex SHA-256 chain value after this record, so a reader can
/// verify the log against the session's `log_digest` without trusting order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatLogEntry {
    pub session: SessionId,
    /// Position in the session's log, starting at 0.
    pub sequence: u64,
    pub recorded_at: DateTime<Utc>,
    pub record: TurnRecord,
    pub digest: String,
}

impl CombatLogEntry {
    pub fn new(
        session: SessionId,
        sequence: u64,
        record: TurnRecord,
        digest: [u8; 32],
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            session,
            sequence,
            recorded_at,
            record,
            digest: hex::encode(digest),
        }
    }

    /// Chains `records` onto `previous`, numbering them from `first_sequence`.
    ///
    /// Returns the entries and the final digest.
    pub fn chain(
        session: SessionId,
        first_sequence: u64,
        previous: [u8; 32],
        records: &[TurnRecord],
        recorded_at: DateTime<Utc>,
    ) -> (Vec<Self>, [u8; 32]) {
        let mut digest = previous;
        let entries = records
            .iter()
            .zip(first_sequence..)
            .map(|(record, sequence)| {
                digest = record.chain_digest(&digest);
                Self::new(session, sequence, record.clone(), digest, recorded_at)
            })
            .collect();
        (entries, digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::engine::RecordedAction;

    #[test]
    fn chain_numbers_and_links_entries() {
        let records = vec![
            TurnRecord::new(0, 1, RecordedAction::Start),
            TurnRecord::new(1, 1, RecordedAction::RollDice),
        ];
        let (entries, last) = CombatLogEntry::chain(SessionId(4), 7, [0; 32], &records, Utc::now());

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].sequence, 7);
        assert_eq!(entries[1].sequence, 8);
        let first = records[0].chain_digest(&[0; 32]);
        assert_eq!(entries[0].digest, hex::encode(first));
        assert_eq!(last, records[1].chain_digest(&first));
        assert_eq!(entries[1].digest, hex::encode(last));
    }
}
