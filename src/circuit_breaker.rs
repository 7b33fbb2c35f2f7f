use failsafe::{backoff, failure_policy, Config, StateMachine};
use std::time::Duration;

/// Circuit breaker type guarding the backend collaborator.
pub type BackendBreaker =
    StateMachine<failure_policy::ConsecutiveFailures<backoff::Exponential>, ()>;

/// Consecutive transport failures that open the circuit.
pub const FAILURE_THRESHOLD: u32 = 5;

/// Creates a circuit breaker for backend API calls.
///
/// # Configuration
///
/// - **Failure threshold**: 5 consecutive failures triggers OPEN state.
/// - **Backoff**: Exponential backoff from 10s to 60s before attempting recovery.
///
/// # States
///
/// - **CLOSED**: Normal operation, requests reach the backend.
/// - **OPEN**: Too many failures, calls are rejected and served from fallback data.
/// - **HALF_OPEN**: Testing if the backend recovered.
pub fn create_backend_circuit_breaker() -> BackendBreaker {
    let backoff_strategy = backoff::exponential(
        Duration::from_secs(10), // Initial delay
        Duration::from_secs(60), // Maximum delay
    );

    let failure_policy = failure_policy::consecutive_failures(FAILURE_THRESHOLD, backoff_strategy);

    Config::new().failure_policy(failure_policy).build()
}
