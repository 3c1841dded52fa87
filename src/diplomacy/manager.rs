//! Diplomatic state ownership: peace attempts, sanctions, alliances,
//! proxy wars, and the event log
//!
//! The manager validates before mutating and records an event for every
//! state change. Formulas live in the sibling algorithm modules.

use ahash::AHashMap;
use rand::Rng;
use std::collections::HashMap;
use uuid::Uuid;

use crate::core::config::{AllianceConfig, DiplomacyConfig, ProxyWarConfig};
use crate::core::error::{Result, StrifeError};
use crate::core::types::{FactionId, SimDay, WarId};
use crate::diplomacy::alliance::{
    self, Alliance, AllianceBenefits, AllianceEvent, AllianceStability, AllianceStrength,
    AllianceType, ConflictContext,
};
use crate::diplomacy::events::{DiplomaticEvent, DiplomaticEventLog, DiplomaticEventType};
use crate::diplomacy::peace::{
    acceptance_chance, PeaceBrokeringAttempt, PeaceResponseKind, PeaceResponseRecord, PeaceStatus,
    PeaceTerms,
};
use crate::diplomacy::proxy::{
    self, ProxyWar, ProxyWarOutcome, ProxyWarStatus, ProxyWarType,
};
use crate::diplomacy::sanction::{Sanction, SanctionStatus, SanctionType};
use crate::war::state::CallToArmsRecord;
use crate::world::{FactionProfile, RegionState};

#[derive(Debug, Clone)]
pub struct DiplomaticManager {
    diplomacy_config: DiplomacyConfig,
    alliance_config: AllianceConfig,
    proxy_config: ProxyWarConfig,
    attempts: AHashMap<Uuid, PeaceBrokeringAttempt>,
    sanctions: AHashMap<Uuid, Sanction>,
    alliances: AHashMap<Uuid, Alliance>,
    proxy_wars: AHashMap<Uuid, ProxyWar>,
    events: DiplomaticEventLog,
}

impl DiplomaticManager {
    pub fn new(
        diplomacy_config: DiplomacyConfig,
        alliance_config: AllianceConfig,
        proxy_config: ProxyWarConfig,
    ) -> Result<Self> {
        diplomacy_config.validate()?;
        alliance_config.validate()?;
        proxy_config.validate()?;
        Ok(Self {
            diplomacy_config,
            alliance_config,
            proxy_config,
            attempts: AHashMap::new(),
            sanctions: AHashMap::new(),
            alliances: AHashMap::new(),
            proxy_wars: AHashMap::new(),
            events: DiplomaticEventLog::new(),
        })
    }

    // === Peace brokering ===

    /// Open a brokered negotiation over a war. The broker must be a third
    /// party. Acceptance chances are computed once, from terms favorability
    /// and the incentives offered to each side.
    pub fn broker_peace(
        &mut self,
        war_id: WarId,
        broker: FactionId,
        warring: (FactionId, FactionId),
        proposed_terms: PeaceTerms,
        incentives: HashMap<FactionId, f64>,
        day: SimDay,
    ) -> Result<Uuid> {
        let (a, b) = warring;
        if a == b {
            return Err(StrifeError::Validation(
                "warring factions must be distinct".into(),
            ));
        }
        if broker == a || broker == b {
            return Err(StrifeError::Validation(format!(
                "broker {:?} is a belligerent in war {:?}",
                broker, war_id
            )));
        }

        let mut chances = HashMap::new();
        for (faction, opponent) in [(a, b), (b, a)] {
            let incentive = incentives.get(&faction).copied().unwrap_or(0.0);
            chances.insert(
                faction,
                acceptance_chance(
                    &proposed_terms,
                    faction,
                    opponent,
                    incentive,
                    &self.diplomacy_config,
                ),
            );
        }

        let id = Uuid::new_v4();
        let mut attempt = PeaceBrokeringAttempt {
            id,
            war_id,
            broker_faction_id: broker,
            faction_a_id: a,
            faction_b_id: b,
            proposed_terms,
            incentives,
            acceptance_chance: chances,
            responses: HashMap::new(),
            status: PeaceStatus::Proposed,
            history: Vec::new(),
        };
        attempt.push_history(day, format!("proposed by broker {:?}", broker));
        self.attempts.insert(id, attempt);

        self.events.record(
            DiplomaticEventType::PeaceProposed,
            vec![broker, a, b],
            serde_json::json!({ "war_id": war_id.0 }),
            day,
        );
        tracing::info!(attempt = %id, war = war_id.0, "peace brokering opened");
        Ok(id)
    }

    /// Record a faction's response to a peace attempt. Both-accept yields
    /// `Accepted`; any counter yields `Countered` (which may be
    /// re-responded); any reject yields `Rejected`. Terminal attempts take
    /// no further responses.
    pub fn respond_to_peace_brokering(
        &mut self,
        attempt_id: Uuid,
        faction: FactionId,
        response: PeaceResponseKind,
        counter_terms: Option<PeaceTerms>,
        details: Option<String>,
        day: SimDay,
    ) -> Result<PeaceStatus> {
        let attempt = self
            .attempts
            .get_mut(&attempt_id)
            .ok_or_else(|| StrifeError::NotFound(format!("peace attempt {}", attempt_id)))?;
        if !attempt.involves(faction) {
            return Err(StrifeError::Validation(format!(
                "{:?} is not party to the war under negotiation",
                faction
            )));
        }
        if attempt.status.is_terminal() {
            return Err(StrifeError::InvalidState(format!(
                "peace attempt {} is already {:?}",
                attempt_id, attempt.status
            )));
        }
        if response == PeaceResponseKind::Counter && counter_terms.is_none() {
            return Err(StrifeError::Validation(
                "a counter response requires counter terms".into(),
            ));
        }

        attempt.responses.insert(
            faction,
            PeaceResponseRecord {
                response,
                counter_terms,
                details,
                day,
            },
        );
        attempt.push_history(day, format!("{:?} responded {:?}", faction, response));

        attempt.status = match response {
            PeaceResponseKind::Reject => PeaceStatus::Rejected,
            PeaceResponseKind::Counter => PeaceStatus::Countered,
            PeaceResponseKind::Accept if attempt.both_accepted() => PeaceStatus::Accepted,
            PeaceResponseKind::Accept => attempt.status,
        };
        let status = attempt.status;
        let participants = vec![attempt.faction_a_id, attempt.faction_b_id];

        self.events.record(
            DiplomaticEventType::PeaceResponse,
            vec![faction],
            serde_json::json!({ "attempt": attempt_id.to_string(), "response": format!("{:?}", response) }),
            day,
        );
        match status {
            PeaceStatus::Accepted => {
                self.events.record(
                    DiplomaticEventType::PeaceAccepted,
                    participants,
                    serde_json::json!({ "attempt": attempt_id.to_string() }),
                    day,
                );
            }
            PeaceStatus::Rejected => {
                self.events.record(
                    DiplomaticEventType::PeaceRejected,
                    participants,
                    serde_json::json!({ "attempt": attempt_id.to_string() }),
                    day,
                );
            }
            _ => {}
        }
        Ok(status)
    }

    pub fn get_peace_attempt(&self, id: Uuid) -> Option<&PeaceBrokeringAttempt> {
        self.attempts.get(&id)
    }

    pub fn get_peace_attempts_for_war(&self, war_id: WarId) -> Vec<&PeaceBrokeringAttempt> {
        self.attempts.values().filter(|a| a.war_id == war_id).collect()
    }

    pub fn get_peace_attempts_by_broker(&self, broker: FactionId) -> Vec<&PeaceBrokeringAttempt> {
        self.attempts
            .values()
            .filter(|a| a.broker_faction_id == broker)
            .collect()
    }

    pub fn get_peace_attempts_involving(&self, faction: FactionId) -> Vec<&PeaceBrokeringAttempt> {
        self.attempts.values().filter(|a| a.involves(faction)).collect()
    }

    // === Sanctions ===

    /// Apply sanctions from `issuer` against `target`. Impact is computed
    /// over the duration expressed in months.
    pub fn apply_economic_sanctions(
        &mut self,
        issuer: &FactionProfile,
        target: &FactionProfile,
        sanction_type: SanctionType,
        duration_days: u64,
        reason: impl Into<String>,
        day: SimDay,
    ) -> Result<Uuid> {
        if issuer.id == target.id {
            return Err(StrifeError::Validation(
                "a faction cannot sanction itself".into(),
            ));
        }

        let duration_months = duration_days as f64 / 30.0;
        let impact =
            alliance::evaluate_sanction_impact(sanction_type, target, issuer, duration_months);

        let id = Uuid::new_v4();
        self.sanctions.insert(
            id,
            Sanction {
                id,
                sanctioning_faction_id: issuer.id,
                target_faction_id: target.id,
                sanction_type,
                duration_days,
                reason: reason.into(),
                impact,
                status: SanctionStatus::Active,
                applied_at: day,
                lifted_reason: None,
                lifted_at: None,
            },
        );
        self.events.record(
            DiplomaticEventType::SanctionApplied,
            vec![issuer.id, target.id],
            serde_json::json!({ "sanction": id.to_string(), "type": format!("{:?}", sanction_type) }),
            day,
        );
        tracing::info!(sanction = %id, issuer = issuer.id.0, target = target.id.0, "sanctions applied");
        Ok(id)
    }

    /// Lift an active sanction. Lifting twice is an error and leaves the
    /// record unchanged.
    pub fn lift_economic_sanctions(
        &mut self,
        id: Uuid,
        reason: impl Into<String>,
        day: SimDay,
    ) -> Result<()> {
        let sanction = self
            .sanctions
            .get_mut(&id)
            .ok_or_else(|| StrifeError::NotFound(format!("sanction {}", id)))?;
        if sanction.status == SanctionStatus::Lifted {
            return Err(StrifeError::InvalidState(format!(
                "sanction {} is already lifted",
                id
            )));
        }
        sanction.status = SanctionStatus::Lifted;
        sanction.lifted_reason = Some(reason.into());
        sanction.lifted_at = Some(day);

        let participants = vec![sanction.sanctioning_faction_id, sanction.target_faction_id];
        self.events.record(
            DiplomaticEventType::SanctionLifted,
            participants,
            serde_json::json!({ "sanction": id.to_string() }),
            day,
        );
        Ok(())
    }

    pub fn get_sanction(&self, id: Uuid) -> Option<&Sanction> {
        self.sanctions.get(&id)
    }

    pub fn get_sanctions_against(&self, target: FactionId) -> Vec<&Sanction> {
        self.sanctions
            .values()
            .filter(|s| s.target_faction_id == target)
            .collect()
    }

    pub fn get_sanctions_by(&self, issuer: FactionId) -> Vec<&Sanction> {
        self.sanctions
            .values()
            .filter(|s| s.sanctioning_faction_id == issuer)
            .collect()
    }

    // === Alliances ===

    /// Form an alliance between two factions. Terms are generated from their
    /// compatibility; the initial stability score is the compatibility
    /// itself.
    pub fn form_alliance(
        &mut self,
        a: &FactionProfile,
        b: &FactionProfile,
        alliance_type: AllianceType,
        current_tension: f64,
        day: SimDay,
    ) -> Result<Uuid> {
        if a.id == b.id {
            return Err(StrifeError::Validation(
                "an alliance requires two distinct factions".into(),
            ));
        }

        let compatibility =
            alliance::evaluate_alliance_compatibility(a, b, current_tension, &self.alliance_config);
        let terms =
            alliance::generate_alliance_terms(a, b, alliance_type, compatibility, &self.alliance_config);

        let id = Uuid::new_v4();
        let duration_months = terms.duration_months;
        self.alliances.insert(
            id,
            Alliance {
                id,
                alliance_type,
                members: vec![a.id, b.id],
                terms,
                duration_months,
                formed_at: day,
                stability_score: compatibility,
            },
        );
        self.events.record(
            DiplomaticEventType::AllianceFormed,
            vec![a.id, b.id],
            serde_json::json!({ "alliance": id.to_string(), "type": format!("{:?}", alliance_type) }),
            day,
        );
        tracing::info!(alliance = %id, a = a.id.0, b = b.id.0, ?alliance_type, "alliance formed");
        Ok(id)
    }

    pub fn get_alliance(&self, id: Uuid) -> Option<&Alliance> {
        self.alliances.get(&id)
    }

    pub fn get_alliances_for(&self, faction: FactionId) -> Vec<&Alliance> {
        self.alliances.values().filter(|a| a.is_member(faction)).collect()
    }

    /// Aggregate strength assessment of an alliance from its members'
    /// current profiles
    pub fn alliance_strength(
        &self,
        id: Uuid,
        members: &[&FactionProfile],
    ) -> Result<AllianceStrength> {
        let alliance = self
            .alliances
            .get(&id)
            .ok_or_else(|| StrifeError::NotFound(format!("alliance {}", id)))?;
        Ok(alliance::evaluate_alliance_strength(alliance, members))
    }

    /// Benefit flags and bonuses the alliance grants its members
    pub fn alliance_benefits(&self, id: Uuid) -> Result<AllianceBenefits> {
        let alliance = self
            .alliances
            .get(&id)
            .ok_or_else(|| StrifeError::NotFound(format!("alliance {}", id)))?;
        Ok(alliance::calculate_alliance_benefits(alliance))
    }

    /// Re-derive an alliance's stability from age, member tension, and
    /// recent events, and store the new score on the record.
    pub fn reassess_alliance_stability(
        &mut self,
        id: Uuid,
        max_member_tension: f64,
        recent_events: &[AllianceEvent],
        now: SimDay,
    ) -> Result<AllianceStability> {
        let alliance = self
            .alliances
            .get_mut(&id)
            .ok_or_else(|| StrifeError::NotFound(format!("alliance {}", id)))?;
        let stability =
            alliance::evaluate_alliance_stability(alliance, max_member_tension, recent_events, now);
        alliance.stability_score = stability.score;
        Ok(stability)
    }

    /// Roll an ally's answer to a call to arms. The record is returned for
    /// the caller to attach to the war.
    pub fn request_call_to_arms(
        &mut self,
        alliance_id: Uuid,
        requester: FactionId,
        responder: &FactionProfile,
        conflict: &ConflictContext,
        day: SimDay,
        rng: &mut impl Rng,
    ) -> Result<CallToArmsRecord> {
        let alliance = self
            .alliances
            .get(&alliance_id)
            .ok_or_else(|| StrifeError::NotFound(format!("alliance {}", alliance_id)))?;
        if !alliance.is_member(requester) || !alliance.is_member(responder.id) {
            return Err(StrifeError::Validation(
                "call to arms requires both factions to be alliance members".into(),
            ));
        }

        let chance = alliance::calculate_call_to_arms_chance(
            alliance,
            requester,
            responder,
            conflict,
            &self.alliance_config,
        );
        let joined = rng.gen::<f64>() < chance;
        self.events.record(
            DiplomaticEventType::CallToArms,
            vec![requester, responder.id],
            serde_json::json!({ "joined": joined }),
            day,
        );
        Ok(CallToArmsRecord {
            ally: responder.id,
            requested_by: requester,
            chance,
            joined,
            day,
        })
    }

    // === Proxy wars ===

    /// Launch a sponsored proxy war. Sponsor, target, and proxy must be
    /// three distinct factions; funding and intensity live in [0, 1].
    #[allow(clippy::too_many_arguments)]
    pub fn launch_proxy_war(
        &mut self,
        sponsor: FactionId,
        target: FactionId,
        proxy_faction: FactionId,
        region: &RegionState,
        war_type: ProxyWarType,
        funding_level: f64,
        intensity: f64,
        day: SimDay,
        rng: &mut impl Rng,
    ) -> Result<Uuid> {
        if sponsor == target || sponsor == proxy_faction || target == proxy_faction {
            return Err(StrifeError::Validation(
                "sponsor, target, and proxy must be distinct factions".into(),
            ));
        }
        for (name, value) in [("funding_level", funding_level), ("intensity", intensity)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(StrifeError::Validation(format!(
                    "{} ({}) must lie within [0, 1]",
                    name, value
                )));
            }
        }

        let id = Uuid::new_v4();
        let group_name = proxy::generate_proxy_group_name(region, rng);
        self.proxy_wars.insert(
            id,
            ProxyWar {
                id,
                sponsor_faction_id: sponsor,
                target_faction_id: target,
                proxy_faction_id: proxy_faction,
                region_id: region.id,
                war_type,
                status: ProxyWarStatus::Active,
                start_date: day,
                funding_level,
                intensity,
                group_name,
            },
        );
        // The sponsor's hand stays out of the public record until discovery
        self.events.record(
            DiplomaticEventType::ProxyWarLaunched,
            vec![proxy_faction, target],
            serde_json::json!({ "proxy_war": id.to_string(), "type": format!("{:?}", war_type) }),
            day,
        );
        Ok(id)
    }

    /// Run one resolution pass over an active proxy war: independent draws
    /// for success and discovery. Discovery exposes the sponsor; success
    /// concludes the operation. A failed, undiscovered operation stays
    /// active.
    #[allow(clippy::too_many_arguments)]
    pub fn resolve_proxy_war(
        &mut self,
        id: Uuid,
        sponsor: &FactionProfile,
        target: &FactionProfile,
        proxy_faction: &FactionProfile,
        region: &RegionState,
        day: SimDay,
        rng: &mut impl Rng,
    ) -> Result<ProxyWarOutcome> {
        let proxy_war = self
            .proxy_wars
            .get_mut(&id)
            .ok_or_else(|| StrifeError::NotFound(format!("proxy war {}", id)))?;
        if proxy_war.status != ProxyWarStatus::Active {
            return Err(StrifeError::InvalidState(format!(
                "proxy war {} is {:?}",
                id, proxy_war.status
            )));
        }

        let outcome = proxy::simulate_proxy_war(
            proxy_war,
            sponsor,
            target,
            proxy_faction,
            region,
            &self.proxy_config,
            rng,
        );

        if outcome.discovered {
            proxy_war.status = ProxyWarStatus::Exposed;
            let participants = vec![proxy_war.sponsor_faction_id, proxy_war.target_faction_id];
            self.events.record(
                DiplomaticEventType::ProxyWarExposed,
                participants,
                serde_json::json!({ "proxy_war": id.to_string() }),
                day,
            );
            tracing::info!(proxy_war = %id, "sponsor exposed");
        } else if outcome.succeeded {
            proxy_war.status = ProxyWarStatus::Concluded;
            let participants = vec![proxy_war.proxy_faction_id, proxy_war.target_faction_id];
            self.events.record(
                DiplomaticEventType::ProxyWarConcluded,
                participants,
                serde_json::json!({ "proxy_war": id.to_string() }),
                day,
            );
        }
        Ok(outcome)
    }

    pub fn get_proxy_war(&self, id: Uuid) -> Option<&ProxyWar> {
        self.proxy_wars.get(&id)
    }

    pub fn get_proxy_wars_by_sponsor(&self, sponsor: FactionId) -> Vec<&ProxyWar> {
        self.proxy_wars
            .values()
            .filter(|p| p.sponsor_faction_id == sponsor)
            .collect()
    }

    // === Event log ===

    pub fn record_diplomatic_event(
        &mut self,
        event_type: DiplomaticEventType,
        factions: Vec<FactionId>,
        data: serde_json::Value,
        day: SimDay,
    ) -> Uuid {
        self.events.record(event_type, factions, data, day)
    }

    pub fn get_diplomatic_events(
        &self,
        faction: Option<FactionId>,
        event_type: Option<DiplomaticEventType>,
        start: Option<SimDay>,
        end: Option<SimDay>,
    ) -> Vec<&DiplomaticEvent> {
        self.events.query(faction, event_type, start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn manager() -> DiplomaticManager {
        DiplomaticManager::new(
            DiplomacyConfig::default(),
            AllianceConfig::default(),
            ProxyWarConfig::default(),
        )
        .unwrap()
    }

    fn profile(id: u32) -> FactionProfile {
        FactionProfile::new(FactionId(id), format!("Faction {}", id))
    }

    fn open_attempt(m: &mut DiplomaticManager) -> Uuid {
        m.broker_peace(
            WarId(1),
            FactionId(3),
            (FactionId(1), FactionId(2)),
            PeaceTerms::default(),
            HashMap::new(),
            10,
        )
        .unwrap()
    }

    #[test]
    fn test_broker_must_be_third_party() {
        let mut m = manager();
        let err = m.broker_peace(
            WarId(1),
            FactionId(1),
            (FactionId(1), FactionId(2)),
            PeaceTerms::default(),
            HashMap::new(),
            0,
        );
        assert!(matches!(err, Err(StrifeError::Validation(_))));
    }

    #[test]
    fn test_peace_accepted_only_when_both_accept() {
        let mut m = manager();
        let id = open_attempt(&mut m);

        let status = m
            .respond_to_peace_brokering(id, FactionId(1), PeaceResponseKind::Accept, None, None, 11)
            .unwrap();
        assert_eq!(status, PeaceStatus::Proposed);

        let status = m
            .respond_to_peace_brokering(id, FactionId(2), PeaceResponseKind::Accept, None, None, 12)
            .unwrap();
        assert_eq!(status, PeaceStatus::Accepted);

        // Terminal: further responses error
        let err =
            m.respond_to_peace_brokering(id, FactionId(1), PeaceResponseKind::Reject, None, None, 13);
        assert!(matches!(err, Err(StrifeError::InvalidState(_))));
    }

    #[test]
    fn test_counter_then_accept_flow() {
        let mut m = manager();
        let id = open_attempt(&mut m);

        let status = m
            .respond_to_peace_brokering(
                id,
                FactionId(1),
                PeaceResponseKind::Counter,
                Some(PeaceTerms::default()),
                Some("more reparations".to_string()),
                11,
            )
            .unwrap();
        assert_eq!(status, PeaceStatus::Countered);

        // Countered attempts can be re-responded into acceptance
        m.respond_to_peace_brokering(id, FactionId(1), PeaceResponseKind::Accept, None, None, 12)
            .unwrap();
        let status = m
            .respond_to_peace_brokering(id, FactionId(2), PeaceResponseKind::Accept, None, None, 13)
            .unwrap();
        assert_eq!(status, PeaceStatus::Accepted);

        let attempt = m.get_peace_attempt(id).unwrap();
        assert!(attempt.history.len() >= 4);
    }

    #[test]
    fn test_counter_requires_terms() {
        let mut m = manager();
        let id = open_attempt(&mut m);
        let err =
            m.respond_to_peace_brokering(id, FactionId(1), PeaceResponseKind::Counter, None, None, 11);
        assert!(matches!(err, Err(StrifeError::Validation(_))));
    }

    #[test]
    fn test_outsider_cannot_respond() {
        let mut m = manager();
        let id = open_attempt(&mut m);
        let err =
            m.respond_to_peace_brokering(id, FactionId(9), PeaceResponseKind::Accept, None, None, 11);
        assert!(matches!(err, Err(StrifeError::Validation(_))));
        assert_eq!(m.get_peace_attempt(id).unwrap().status, PeaceStatus::Proposed);
    }

    #[test]
    fn test_reject_is_terminal() {
        let mut m = manager();
        let id = open_attempt(&mut m);
        let status = m
            .respond_to_peace_brokering(id, FactionId(2), PeaceResponseKind::Reject, None, None, 11)
            .unwrap();
        assert_eq!(status, PeaceStatus::Rejected);

        let err =
            m.respond_to_peace_brokering(id, FactionId(1), PeaceResponseKind::Accept, None, None, 12);
        assert!(matches!(err, Err(StrifeError::InvalidState(_))));
    }

    #[test]
    fn test_peace_queries() {
        let mut m = manager();
        let id = open_attempt(&mut m);
        assert_eq!(m.get_peace_attempts_for_war(WarId(1)).len(), 1);
        assert_eq!(m.get_peace_attempts_by_broker(FactionId(3)).len(), 1);
        assert_eq!(m.get_peace_attempts_involving(FactionId(2)).len(), 1);
        assert!(m.get_peace_attempts_involving(FactionId(3)).is_empty());
        assert!(m.get_peace_attempt(id).is_some());
    }

    #[test]
    fn test_sanction_lifecycle_and_double_lift() {
        let mut m = manager();
        let issuer = profile(1);
        let target = profile(2);
        let id = m
            .apply_economic_sanctions(&issuer, &target, SanctionType::TradeEmbargo, 365, "dumping", 5)
            .unwrap();

        let sanction = m.get_sanction(id).unwrap();
        assert_eq!(sanction.status, SanctionStatus::Active);
        assert!(sanction.impact.economic_impact > 0.0);

        m.lift_economic_sanctions(id, "negotiated", 100).unwrap();
        let err = m.lift_economic_sanctions(id, "again", 101);
        assert!(matches!(err, Err(StrifeError::InvalidState(_))));
        // Status unchanged by the failed second lift
        let sanction = m.get_sanction(id).unwrap();
        assert_eq!(sanction.status, SanctionStatus::Lifted);
        assert_eq!(sanction.lifted_at, Some(100));
    }

    #[test]
    fn test_lift_unknown_sanction() {
        let mut m = manager();
        let err = m.lift_economic_sanctions(Uuid::new_v4(), "noop", 0);
        assert!(matches!(err, Err(StrifeError::NotFound(_))));
    }

    #[test]
    fn test_alliance_formation_and_call_to_arms() {
        let mut m = manager();
        let a = profile(1);
        let b = profile(2);
        let id = m
            .form_alliance(&a, &b, AllianceType::Military, -40.0, 0)
            .unwrap();

        let alliance = m.get_alliance(id).unwrap();
        assert_eq!(alliance.members, vec![FactionId(1), FactionId(2)]);
        assert!(alliance.stability_score > 0.0);
        assert_eq!(m.get_alliances_for(FactionId(2)).len(), 1);

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let record = m
            .request_call_to_arms(
                id,
                FactionId(1),
                &b,
                &ConflictContext {
                    strategic_importance: 0.8,
                    severity: 0.6,
                },
                20,
                &mut rng,
            )
            .unwrap();
        assert_eq!(record.ally, FactionId(2));
        assert!(record.chance > 0.0);

        let err = m.request_call_to_arms(
            id,
            FactionId(9),
            &b,
            &ConflictContext::default(),
            21,
            &mut rng,
        );
        assert!(matches!(err, Err(StrifeError::Validation(_))));
    }

    #[test]
    fn test_alliance_assessments() {
        use crate::diplomacy::alliance::AllianceEventKind;

        let mut m = manager();
        let a = profile(1);
        let b = profile(2);
        let id = m.form_alliance(&a, &b, AllianceType::Full, -20.0, 0).unwrap();

        let strength = m.alliance_strength(id, &[&a, &b]).unwrap();
        assert!(strength.overall_rating > 0.0);

        let benefits = m.alliance_benefits(id).unwrap();
        assert!(benefits.per_member[&FactionId(1)].technology_sharing);

        let stability = m
            .reassess_alliance_stability(
                id,
                0.0,
                &[AllianceEvent {
                    kind: AllianceEventKind::BrokenPromise,
                    day: 5,
                }],
                30,
            )
            .unwrap();
        assert_eq!(m.get_alliance(id).unwrap().stability_score, stability.score);

        let err = m.alliance_benefits(Uuid::new_v4());
        assert!(matches!(err, Err(StrifeError::NotFound(_))));
    }

    #[test]
    fn test_proxy_war_lifecycle() {
        let mut m = manager();
        let region = RegionState::new(crate::core::types::RegionId(7), "Blackfen");
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let err = m.launch_proxy_war(
            FactionId(1),
            FactionId(1),
            FactionId(3),
            &region,
            ProxyWarType::Insurgency,
            0.5,
            0.5,
            0,
            &mut rng,
        );
        assert!(matches!(err, Err(StrifeError::Validation(_))));

        let id = m
            .launch_proxy_war(
                FactionId(1),
                FactionId(2),
                FactionId(3),
                &region,
                ProxyWarType::Insurgency,
                0.5,
                0.5,
                0,
                &mut rng,
            )
            .unwrap();
        let proxy_war = m.get_proxy_war(id).unwrap();
        assert_eq!(proxy_war.status, ProxyWarStatus::Active);
        assert!(!proxy_war.group_name.is_empty());
        assert_eq!(m.get_proxy_wars_by_sponsor(FactionId(1)).len(), 1);

        // Drive resolution until the operation leaves the Active state
        let sponsor = profile(1);
        let target = profile(2);
        let proxy_faction = profile(3);
        loop {
            let outcome = m
                .resolve_proxy_war(id, &sponsor, &target, &proxy_faction, &region, 1, &mut rng)
                .unwrap();
            let status = m.get_proxy_war(id).unwrap().status;
            if outcome.discovered {
                assert_eq!(status, ProxyWarStatus::Exposed);
                break;
            }
            if outcome.succeeded {
                assert_eq!(status, ProxyWarStatus::Concluded);
                break;
            }
            assert_eq!(status, ProxyWarStatus::Active);
        }

        // Non-active operations refuse further resolution
        let err = m.resolve_proxy_war(id, &sponsor, &target, &proxy_faction, &region, 2, &mut rng);
        assert!(matches!(err, Err(StrifeError::InvalidState(_))));
    }

    #[test]
    fn test_event_log_filters() {
        let mut m = manager();
        let issuer = profile(1);
        let target = profile(2);
        m.apply_economic_sanctions(&issuer, &target, SanctionType::Full, 90, "war supplies", 5)
            .unwrap();
        open_attempt(&mut m);

        let sanction_events = m.get_diplomatic_events(
            None,
            Some(DiplomaticEventType::SanctionApplied),
            None,
            None,
        );
        assert_eq!(sanction_events.len(), 1);

        let for_faction_2 = m.get_diplomatic_events(Some(FactionId(2)), None, None, None);
        assert_eq!(for_faction_2.len(), 2);

        let early = m.get_diplomatic_events(None, None, None, Some(6));
        assert_eq!(early.len(), 1);
    }
}
