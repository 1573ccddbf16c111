// self
use crate::obs::{FlowKind, FlowOutcome};

/// Records a flow outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth2_social_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// How the entry point answered a challenge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChallengeMode {
	/// Redirected to the login path.
	Redirect,
	/// Forwarded to the login path; the sub-response was not flagged.
	Forward,
	/// Forwarded to the login path and flagged with `X-Status-Code: 401`.
	ForwardFlagged,
}
impl ChallengeMode {
	/// Returns a stable label suitable for metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ChallengeMode::Redirect => "redirect",
			ChallengeMode::Forward => "forward",
			ChallengeMode::ForwardFlagged => "forward_flagged",
		}
	}
}

/// Counts entry point challenges by response mode.
pub fn record_challenge(mode: ChallengeMode) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("oauth2_social_challenge_total", "mode" => mode.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = mode;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recording_without_a_recorder_is_silent() {
		for kind in [FlowKind::AccessToken, FlowKind::EntryPoint] {
			record_flow_outcome(kind, FlowOutcome::Attempt);
			crate::obs::record_result(kind, &Ok::<_, ()>(()));
			crate::obs::record_result(kind, &Err::<(), _>(()));
		}

		record_challenge(ChallengeMode::ForwardFlagged);

		assert_eq!(ChallengeMode::Forward.as_str(), "forward");
	}
}
