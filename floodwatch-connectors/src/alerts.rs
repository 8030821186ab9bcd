//! Alert gating and message formatting
//!
//! Decides *whether* an alert goes out; the Telegram client decides *how*.
//! The gate enforces three rules:
//!
//! 1. Alerts fire at HIGH and above. With `critical_only` set, only
//!    CRITICAL fires.
//! 2. A cooldown suppresses repeats of the same (or milder) level. A
//!    cooldown of zero disables suppression entirely.
//! 3. Escalation always gets through. If risk jumps from HIGH to CRITICAL
//!    mid-cooldown, waiting out the timer could cost the evacuation window.

use floodwatch_core::prediction::FloodPrediction;
use floodwatch_core::time::Timestamp;
use floodwatch_core::RiskLevel;

/// Alert gating policy
#[derive(Debug, Clone)]
pub struct AlertPolicy {
    /// Minimum minutes between alerts at the same level; 0 disables
    pub cooldown_min: u32,
    /// Alert only on CRITICAL instead of HIGH and above
    pub critical_only: bool,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self {
            cooldown_min: 15,
            critical_only: false,
        }
    }
}

/// Stateful gate applying an [`AlertPolicy`]
#[derive(Debug, Clone)]
pub struct AlertGate {
    policy: AlertPolicy,
    last_alert: Option<(RiskLevel, Timestamp)>,
}

impl AlertGate {
    /// Create a gate with the given policy
    pub fn new(policy: AlertPolicy) -> Self {
        Self {
            policy,
            last_alert: None,
        }
    }

    /// Decide whether an alert at `level` should be sent at time `now`
    pub fn should_alert(&self, level: RiskLevel, now: Timestamp) -> bool {
        let floor = if self.policy.critical_only {
            RiskLevel::Critical
        } else {
            RiskLevel::High
        };
        if level < floor {
            return false;
        }

        match self.last_alert {
            None => true,
            Some((last_level, _)) if level > last_level => true,
            Some((_, last_at)) => {
                if self.policy.cooldown_min == 0 {
                    return true;
                }
                let cooldown_ms = u64::from(self.policy.cooldown_min) * 60_000;
                now.saturating_sub(last_at) >= cooldown_ms
            }
        }
    }

    /// Record that an alert at `level` was sent at time `now`
    pub fn record(&mut self, level: RiskLevel, now: Timestamp) {
        self.last_alert = Some((level, now));
    }

    /// Forget alert history (e.g. after conditions return to normal)
    pub fn reset(&mut self) {
        self.last_alert = None;
    }
}

/// Format the Markdown alert message sent over Telegram
///
/// `timestamp` is the station's wall-clock time, already formatted.
pub fn format_alert(
    device_id: &str,
    timestamp: &str,
    prediction: &FloodPrediction,
    water_level_cm: f32,
    flow_rate_lpm: f32,
    rainfall_mm_per_h: f32,
) -> String {
    let mut message = format!(
        "*FLOOD ALERT: {}*\n\n\
         Water level: {:.1} cm\n\
         Flow rate: {:.1} L/min\n\
         Rainfall: {:.1} mm/h\n\
         Risk score: {:.0}/100\n",
        prediction.risk_level, water_level_cm, flow_rate_lpm, rainfall_mm_per_h,
        prediction.risk_score,
    );

    if let Some(minutes) = prediction.time_to_flood_min {
        message.push_str(&format!("Estimated time to flood: {} minutes\n", minutes));
    }

    message.push_str(&format!(
        "\n{}\n\nStation: {}\nTime: {}",
        prediction.recommendation, device_id, timestamp,
    ));

    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use floodwatch_core::prediction::predict;

    const MIN: u64 = 60_000;

    #[test]
    fn medium_risk_never_alerts() {
        let gate = AlertGate::new(AlertPolicy::default());
        assert!(!gate.should_alert(RiskLevel::Low, 0));
        assert!(!gate.should_alert(RiskLevel::Medium, 0));
        assert!(gate.should_alert(RiskLevel::High, 0));
    }

    #[test]
    fn critical_only_tightens_the_floor() {
        let gate = AlertGate::new(AlertPolicy {
            cooldown_min: 15,
            critical_only: true,
        });
        assert!(!gate.should_alert(RiskLevel::High, 0));
        assert!(gate.should_alert(RiskLevel::Critical, 0));
    }

    #[test]
    fn cooldown_suppresses_repeats() {
        let mut gate = AlertGate::new(AlertPolicy {
            cooldown_min: 15,
            critical_only: false,
        });

        assert!(gate.should_alert(RiskLevel::High, 0));
        gate.record(RiskLevel::High, 0);

        assert!(!gate.should_alert(RiskLevel::High, 5 * MIN));
        assert!(gate.should_alert(RiskLevel::High, 15 * MIN));
    }

    #[test]
    fn escalation_bypasses_cooldown() {
        let mut gate = AlertGate::new(AlertPolicy::default());
        gate.record(RiskLevel::High, 0);

        // One minute later the level jumps; the cooldown must not hold it
        assert!(gate.should_alert(RiskLevel::Critical, MIN));
        // A repeat at the same level is still suppressed
        assert!(!gate.should_alert(RiskLevel::High, MIN));
    }

    #[test]
    fn zero_cooldown_disables_suppression() {
        let mut gate = AlertGate::new(AlertPolicy {
            cooldown_min: 0,
            critical_only: false,
        });
        gate.record(RiskLevel::High, 0);
        assert!(gate.should_alert(RiskLevel::High, 1));
    }

    #[test]
    fn reset_clears_history() {
        let mut gate = AlertGate::new(AlertPolicy::default());
        gate.record(RiskLevel::Critical, 0);
        assert!(!gate.should_alert(RiskLevel::Critical, MIN));

        gate.reset();
        assert!(gate.should_alert(RiskLevel::Critical, MIN));
    }

    #[test]
    fn alert_message_contains_the_essentials() {
        let p = predict(RiskLevel::Critical, 45.0, 32.0, 18.0);
        let msg = format_alert("flood-sensor-001", "2024-01-15 07:30:00", &p, 45.0, 32.0, 18.0);

        assert!(msg.starts_with("*FLOOD ALERT: CRITICAL*"));
        assert!(msg.contains("Water level: 45.0 cm"));
        assert!(msg.contains("Estimated time to flood: 15 minutes"));
        assert!(msg.contains("IMMEDIATE EVACUATION REQUIRED"));
        assert!(msg.contains("Station: flood-sensor-001"));
    }

    #[test]
    fn low_risk_message_omits_time_to_flood() {
        let p = predict(RiskLevel::Low, 10.0, 5.0, 0.0);
        let msg = format_alert("id", "t", &p, 10.0, 5.0, 0.0);
        assert!(!msg.contains("time to flood"));
    }
}
