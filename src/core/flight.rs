/*!
 * In-flight flags
 *
 * Every container that issues backend requests keeps its "in flight" flag
 * inside its observable state. Acquiring the flag is a single check-and-set
 * on the state channel; the returned guard clears it when dropped, whatever
 * path the operation leaves by.
 */

use tokio::sync::watch;

/// Outcome of a guarded operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Rejected because the same operation is already in flight
    Busy,
    /// Rejected locally before any request was issued
    Rejected(String),
    /// Backend confirmed success
    Completed,
    /// Backend answered but reported failure
    SoftFailure(String),
    /// Request pipeline failed (transport, status, decode)
    HardFailure(String),
}

impl Outcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Whether a request reached the backend
    pub fn was_submitted(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::SoftFailure(_) | Self::HardFailure(_)
        )
    }
}

/// Clears an in-flight flag on drop
pub struct FlightGuard<'a, S> {
    state: &'a watch::Sender<S>,
    flag: fn(&mut S) -> &mut bool,
}

impl<'a, S> FlightGuard<'a, S> {
    /// Set the flag selected by `flag` unless it is already set.
    pub fn acquire(state: &'a watch::Sender<S>, flag: fn(&mut S) -> &mut bool) -> Option<Self> {
        let acquired = state.send_if_modified(|s| {
            let in_flight = flag(s);
            if *in_flight {
                false
            } else {
                *in_flight = true;
                true
            }
        });

        acquired.then(|| Self { state, flag })
    }
}

impl<S> Drop for FlightGuard<'_, S> {
    fn drop(&mut self) {
        let flag = self.flag;
        self.state.send_modify(|s| *flag(s) = false);
    }
}
