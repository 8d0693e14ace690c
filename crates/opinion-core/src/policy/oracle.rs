//! Oracle Credibility Policy
//!
//! Agents pass rephrased news text. A recipient keeps the first text it hears
//! and asks a credibility oracle whether it is fake; knowledgeable agents get
//! the fact as a reference.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use opinion_events::Opinion;

use super::{OpinionPolicy, Payload};
use crate::components::agent::Agent;
use crate::config::{NewsConfig, PolicyKind};
use crate::error::{OracleError, PolicyError};

/// External text rephrasing and classification backend.
///
/// Calls may be slow and non-deterministic. They must not touch simulation
/// state and are never retried by the simulation.
pub trait CredibilityOracle {
    /// Restates `text` in other words, keeping its meaning.
    fn rephrase(&mut self, text: &str) -> Result<String, OracleError>;

    /// True when `text` is judged fake, optionally against a known fact.
    fn classify(&mut self, text: &str, fact_hint: Option<&str>) -> Result<bool, OracleError>;
}

/// Maps a backend's free-text answer to a verdict.
///
/// `TRUE` means the statement is accurate, `FAKE` that it is not. `TRUE`
/// wins when both appear. Anything else is unparseable.
pub fn parse_verdict(response: &str) -> Result<bool, OracleError> {
    let upper = response.to_uppercase();
    if upper.contains("TRUE") {
        Ok(false)
    } else if upper.contains("FAKE") {
        Ok(true)
    } else {
        Err(OracleError::Unparseable(response.trim().to_string()))
    }
}

const DEFAULT_FAKE_RATE: f64 = 0.5;

/// Deterministic stand-in for a language-model oracle.
///
/// `rephrase` returns the trimmed text. With a fact hint, `classify` flags
/// any text that differs from the fact. Without one it guesses, flagging text
/// as fake with probability `unaided_fake_rate`.
#[derive(Debug, Clone)]
pub struct ReferenceOracle {
    rng: SmallRng,
    unaided_fake_rate: f64,
}

impl ReferenceOracle {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            unaided_fake_rate: DEFAULT_FAKE_RATE,
        }
    }

    /// Clamped to [0, 1]; a non-finite rate falls back to 0.5.
    pub fn with_fake_rate(mut self, rate: f64) -> Self {
        self.unaided_fake_rate = if rate.is_finite() {
            rate.clamp(0.0, 1.0)
        } else {
            DEFAULT_FAKE_RATE
        };
        self
    }

    pub fn unaided_fake_rate(&self) -> f64 {
        self.unaided_fake_rate
    }
}

fn normalize(text: &str) -> String {
    text.trim()
        .trim_end_matches('.')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl CredibilityOracle for ReferenceOracle {
    fn rephrase(&mut self, text: &str) -> Result<String, OracleError> {
        Ok(text.trim().to_string())
    }

    fn classify(&mut self, text: &str, fact_hint: Option<&str>) -> Result<bool, OracleError> {
        match fact_hint {
            Some(fact) => Ok(normalize(text) != normalize(fact)),
            None => Ok(self.rng.gen_bool(self.unaided_fake_rate)),
        }
    }
}

/// Text payloads judged by a credibility oracle.
pub struct OracleCredibility {
    oracle: Box<dyn CredibilityOracle>,
    claim: String,
    fact: String,
    /// Knowledge above which the fact is passed as a hint
    pub fact_check_knowledge: f64,
}

impl OracleCredibility {
    pub fn new(oracle: Box<dyn CredibilityOracle>, news: &NewsConfig) -> Self {
        Self {
            oracle,
            claim: news.claim.clone(),
            fact: news.fact.clone(),
            fact_check_knowledge: 0.5,
        }
    }

    pub fn with_fact_check_knowledge(mut self, knowledge: f64) -> Self {
        self.fact_check_knowledge = knowledge;
        self
    }

    pub fn claim(&self) -> &str {
        &self.claim
    }

    pub fn fact(&self) -> &str {
        &self.fact
    }
}

impl OpinionPolicy for OracleCredibility {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Oracle
    }

    fn compose_payload(&mut self, agent: &Agent) -> Result<Payload, PolicyError> {
        let source = if agent.opinion == Opinion::Positive {
            &self.claim
        } else {
            &self.fact
        };
        let text = self.oracle.rephrase(source)?;
        Ok(Payload::Message(text))
    }

    fn absorb_payload(&self, agent: &mut Agent, payload: Payload) {
        match payload {
            Payload::Message(text) if !agent.has_heard => agent.pending_message = Some(text),
            Payload::Message(_) => {}
            Payload::Influence(_) => {
                tracing::debug!(agent = agent.id, "oracle policy ignores numeric payload");
            }
        }
    }

    fn decide_opinion(&mut self, agent: &Agent) -> Result<Opinion, PolicyError> {
        if !agent.has_heard {
            return Ok(agent.opinion);
        }
        if agent.involvement == 0.0 {
            return Ok(Opinion::Neutral);
        }

        let message = agent
            .pending_message
            .as_deref()
            .ok_or(PolicyError::MissingMessage { agent: agent.id })?;
        let hint = (agent.knowledge > self.fact_check_knowledge).then_some(self.fact.as_str());

        let is_fake = self.oracle.classify(message, hint)?;
        Ok(if is_fake {
            Opinion::Positive
        } else {
            Opinion::Negative
        })
    }

    fn seed_patient_zero(&self, agent: &mut Agent, news: &NewsConfig) {
        agent.pending_message = Some(news.claim.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays canned answers and records every call.
    #[derive(Default)]
    struct ScriptedOracle {
        verdicts: VecDeque<Result<bool, OracleError>>,
        calls: std::rc::Rc<std::cell::RefCell<Vec<(String, Option<String>)>>>,
    }

    impl CredibilityOracle for ScriptedOracle {
        fn rephrase(&mut self, text: &str) -> Result<String, OracleError> {
            Ok(format!("Reportedly: {}", text))
        }

        fn classify(&mut self, text: &str, fact_hint: Option<&str>) -> Result<bool, OracleError> {
            self.calls
                .borrow_mut()
                .push((text.to_string(), fact_hint.map(str::to_string)));
            self.verdicts.pop_front().unwrap_or(Ok(false))
        }
    }

    fn heard(knowledge: f64, message: &str) -> Agent {
        let mut agent = Agent::new(0, knowledge, 0.3, 0.5);
        agent.has_heard = true;
        agent.pending_message = Some(message.to_string());
        agent
    }

    #[test]
    fn test_parse_verdict() {
        assert_eq!(parse_verdict("TRUE"), Ok(false));
        assert_eq!(parse_verdict("  fake\n"), Ok(true));
        assert_eq!(parse_verdict("TRUE or FAKE"), Ok(false));
        assert!(matches!(
            parse_verdict("I cannot say"),
            Err(OracleError::Unparseable(_))
        ));
    }

    #[test]
    fn test_reference_oracle_with_hint() {
        let news = NewsConfig::default();
        let mut oracle = ReferenceOracle::new(1);

        assert!(oracle.classify(&news.claim, Some(&news.fact)).unwrap());
        let restated = format!("  {}  ", news.fact.to_uppercase());
        assert!(!oracle.classify(&restated, Some(&news.fact)).unwrap());
    }

    #[test]
    fn test_reference_oracle_unaided_rate() {
        let mut always = ReferenceOracle::new(3).with_fake_rate(1.0);
        let mut never = ReferenceOracle::new(3).with_fake_rate(0.0);
        for _ in 0..10 {
            assert!(always.classify("anything", None).unwrap());
            assert!(!never.classify("anything", None).unwrap());
        }
    }

    #[test]
    fn test_reference_oracle_rate_is_sanitized() {
        assert_eq!(ReferenceOracle::new(0).with_fake_rate(1.7).unaided_fake_rate(), 1.0);
        assert_eq!(ReferenceOracle::new(0).with_fake_rate(-2.0).unaided_fake_rate(), 0.0);

        for rate in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut oracle = ReferenceOracle::new(9).with_fake_rate(rate);
            assert_eq!(oracle.unaided_fake_rate(), 0.5);
            // gen_bool panics outside [0, 1]; classification must still answer
            assert!(oracle.classify("anything", None).is_ok());
        }
    }

    #[test]
    fn test_compose_picks_source_by_opinion() {
        let news = NewsConfig::default();
        let mut policy = OracleCredibility::new(Box::new(ScriptedOracle::default()), &news);
        let mut agent = Agent::new(0, 0.0, 0.3, 0.0);

        agent.opinion = Opinion::Positive;
        assert_eq!(
            policy.compose_payload(&agent).unwrap(),
            Payload::Message(format!("Reportedly: {}", news.claim))
        );
        agent.opinion = Opinion::Negative;
        assert_eq!(
            policy.compose_payload(&agent).unwrap(),
            Payload::Message(format!("Reportedly: {}", news.fact))
        );
    }

    #[test]
    fn test_absorb_keeps_first_message() {
        let policy =
            OracleCredibility::new(Box::new(ReferenceOracle::new(0)), &NewsConfig::default());
        let mut agent = Agent::new(0, 0.0, 0.3, 0.0);

        agent.receive_payload(Payload::Message("first".into()), &policy);
        agent.receive_payload(Payload::Message("second".into()), &policy);
        assert_eq!(agent.pending_message.as_deref(), Some("first"));
        assert!(agent.has_heard);
    }

    #[test]
    fn test_decide_passes_hint_to_knowledgeable_agents() {
        let news = NewsConfig::default();
        let oracle = ScriptedOracle {
            verdicts: VecDeque::from([Ok(true), Ok(false)]),
            ..ScriptedOracle::default()
        };
        let calls = oracle.calls.clone();
        let mut policy = OracleCredibility::new(Box::new(oracle), &news);

        assert_eq!(policy.decide_opinion(&heard(0.9, "msg")).unwrap(), Opinion::Positive);
        assert_eq!(policy.decide_opinion(&heard(0.2, "msg")).unwrap(), Opinion::Negative);

        let calls = calls.borrow();
        assert_eq!(calls[0].1.as_deref(), Some(news.fact.as_str()));
        assert_eq!(calls[1].1, None);
    }

    #[test]
    fn test_decide_surfaces_oracle_failure() {
        let oracle = ScriptedOracle {
            verdicts: VecDeque::from([Err(OracleError::Unavailable("down".into()))]),
            ..ScriptedOracle::default()
        };
        let mut policy = OracleCredibility::new(Box::new(oracle), &NewsConfig::default());

        let err = policy.decide_opinion(&heard(0.1, "msg")).unwrap_err();
        assert!(matches!(err, PolicyError::Oracle(OracleError::Unavailable(_))));
    }

    #[test]
    fn test_uninvolved_agent_skips_oracle() {
        let oracle = ScriptedOracle::default();
        let calls = oracle.calls.clone();
        let mut policy = OracleCredibility::new(Box::new(oracle), &NewsConfig::default());
        let mut agent = heard(0.1, "msg");
        agent.involvement = 0.0;

        assert_eq!(policy.decide_opinion(&agent).unwrap(), Opinion::Neutral);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_missing_message_is_an_error() {
        let mut policy =
            OracleCredibility::new(Box::new(ReferenceOracle::new(0)), &NewsConfig::default());
        let mut agent = Agent::new(4, 0.1, 0.3, 0.5);
        agent.has_heard = true;

        assert_eq!(
            policy.decide_opinion(&agent),
            Err(PolicyError::MissingMessage { agent: 4 })
        );
    }
}
