//! Append-only diplomatic event log

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::types::{FactionId, SimDay};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiplomaticEventType {
    WarDeclared,
    WarEnded,
    PeaceProposed,
    PeaceResponse,
    PeaceAccepted,
    PeaceRejected,
    SanctionApplied,
    SanctionLifted,
    AllianceFormed,
    AllianceDissolved,
    CallToArms,
    ProxyWarLaunched,
    ProxyWarExposed,
    ProxyWarConcluded,
}

/// One diplomatic occurrence. `data` is an opaque payload for whatever the
/// recording subsystem wants to attach.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiplomaticEvent {
    pub id: Uuid,
    pub event_type: DiplomaticEventType,
    pub factions: Vec<FactionId>,
    pub data: serde_json::Value,
    pub timestamp: SimDay,
}

/// The full event history. Events are appended and never removed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiplomaticEventLog {
    events: Vec<DiplomaticEvent>,
}

impl DiplomaticEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        event_type: DiplomaticEventType,
        factions: Vec<FactionId>,
        data: serde_json::Value,
        timestamp: SimDay,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.events.push(DiplomaticEvent {
            id,
            event_type,
            factions,
            data,
            timestamp,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiplomaticEvent> {
        self.events.iter()
    }

    /// Filtered read. All filters are optional and combine conjunctively;
    /// the time range is inclusive on both ends.
    pub fn query(
        &self,
        faction: Option<FactionId>,
        event_type: Option<DiplomaticEventType>,
        start: Option<SimDay>,
        end: Option<SimDay>,
    ) -> Vec<&DiplomaticEvent> {
        self.events
            .iter()
            .filter(|e| faction.map_or(true, |f| e.factions.contains(&f)))
            .filter(|e| event_type.map_or(true, |t| e.event_type == t))
            .filter(|e| start.map_or(true, |s| e.timestamp >= s))
            .filter(|e| end.map_or(true, |s| e.timestamp <= s))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_log() -> DiplomaticEventLog {
        let mut log = DiplomaticEventLog::new();
        log.record(
            DiplomaticEventType::WarDeclared,
            vec![FactionId(1), FactionId(2)],
            serde_json::json!({"cause": "border"}),
            10,
        );
        log.record(
            DiplomaticEventType::SanctionApplied,
            vec![FactionId(3), FactionId(1)],
            serde_json::Value::Null,
            20,
        );
        log.record(
            DiplomaticEventType::WarEnded,
            vec![FactionId(1), FactionId(2)],
            serde_json::Value::Null,
            50,
        );
        log
    }

    #[test]
    fn test_filter_by_faction() {
        let log = seeded_log();
        assert_eq!(log.query(Some(FactionId(2)), None, None, None).len(), 2);
        assert_eq!(log.query(Some(FactionId(9)), None, None, None).len(), 0);
    }

    #[test]
    fn test_filter_by_type_and_range() {
        let log = seeded_log();
        let hits = log.query(None, Some(DiplomaticEventType::SanctionApplied), None, None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].factions, vec![FactionId(3), FactionId(1)]);

        assert_eq!(log.query(None, None, Some(15), Some(50)).len(), 2);
        assert_eq!(log.query(None, None, Some(51), None).len(), 0);
    }

    #[test]
    fn test_filters_combine() {
        let log = seeded_log();
        let hits = log.query(Some(FactionId(1)), Some(DiplomaticEventType::WarEnded), Some(40), None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].timestamp, 50);
    }
}
