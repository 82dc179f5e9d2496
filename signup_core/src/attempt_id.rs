use chrono::Utc;
use rand::Rng;
use rand_pcg::Pcg32;
use std::fmt::{self, Display};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

/// Flows created so far in this process.
static FLOWS: AtomicU64 = AtomicU64::new(0);

/// Where flow identifiers start counting from in this process.
static FLOW_BASE: OnceLock<u64> = OnceLock::new();

/// Identifies one submission attempt. The flow half is unique to each flow
/// created in this process, and the sequence half counts up with each
/// attempt, so a late answer for a flow that no longer exists (or for an
/// attempt that was superseded) will not match anything current.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct AttemptId {
    /// Which flow this attempt belongs to
    flow: u64,

    /// Which attempt within the flow this is, starting at 1
    seq: u32,
}

impl AttemptId {
    /// Get an identifier no other flow in this process has. The base is
    /// random so identifiers from separate runs are unlikely to line up in
    /// logs.
    pub(crate) fn new_flow() -> u64 {
        FLOW_BASE
            .get_or_init(random_base)
            .wrapping_add(FLOWS.fetch_add(1, Ordering::Relaxed))
    }

    /// The first attempt for a flow.
    pub(crate) fn first(flow: u64) -> Self {
        Self { flow, seq: 1 }
    }

    /// The attempt after this one, in the same flow.
    #[must_use]
    pub(crate) fn next(self) -> Self {
        Self {
            flow: self.flow,
            seq: self.seq.wrapping_add(1),
        }
    }

    /// Which attempt within the flow this is.
    pub fn seq(&self) -> u32 {
        self.seq
    }
}

/// Pick a starting point based on the current time.
#[expect(clippy::cast_sign_loss)]
fn random_base() -> u64 {
    let seed = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp()) as u64; // we're OK with wrapping pre-1970

    Pcg32::new(seed, 0xa02_bdbf_7bb3_c0a7).random()
}

impl Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}-{}", self.flow, self.seq)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn next_stays_in_flow() {
        let first = AttemptId::first(7);
        let second = first.next();

        assert_ne!(first, second);
        assert_eq!(second.seq(), 2);
        assert_eq!(second.to_string(), "0000000000000007-2");
    }

    #[test]
    fn flows_created_back_to_back_are_distinct() {
        let flows: HashSet<u64> = (0..10_000).map(|_| AttemptId::new_flow()).collect();

        assert_eq!(flows.len(), 10_000);
    }

    #[test]
    fn flows_created_on_many_threads_are_distinct() {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                std::thread::spawn(|| (0..1000).map(|_| AttemptId::new_flow()).collect::<Vec<_>>())
            })
            .collect();

        let flows: HashSet<u64> = handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect();

        assert_eq!(flows.len(), 8000);
    }

    #[test]
    fn same_seq_in_different_flows_differs() {
        assert_ne!(AttemptId::first(1), AttemptId::first(2));
    }
}
