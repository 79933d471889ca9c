use serde::{Deserialize, Serialize};

/// What a vote is cast on.
///
/// A vote belongs to exactly one question or one answer. Modeling the target
/// as a tagged variant makes the "both set" and "neither set" states
/// unrepresentable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum VoteTarget {
    Question(u64),
    Answer(u64),
}

/// A single up- or downvote.
///
/// Invariant (upheld by the store): at most one vote per (user, target) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    /// Unique identifier
    pub id: u64,

    /// Voter
    pub user_id: u64,

    /// Voted entity
    pub target: VoteTarget,

    /// Upvote (+1) or downvote (-1)
    pub is_upvote: bool,
}

impl Vote {
    pub fn new(id: u64, user_id: u64, target: VoteTarget, is_upvote: bool) -> Self {
        Self {
            id,
            user_id,
            target,
            is_upvote,
        }
    }

    /// Contribution of this vote to its target's vote difference
    pub fn weight(&self) -> i64 {
        if self.is_upvote {
            1
        } else {
            -1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_weight() {
        let up = Vote::new(1, 1, VoteTarget::Question(1), true);
        let down = Vote::new(2, 2, VoteTarget::Question(1), false);
        assert_eq!(up.weight(), 1);
        assert_eq!(down.weight(), -1);
    }

    #[test]
    fn test_vote_target_serde_shape() {
        let target = VoteTarget::Answer(42);
        let json = serde_json::to_value(&target).unwrap();
        assert_eq!(json["kind"], "answer");
        assert_eq!(json["id"], 42);
    }
}
