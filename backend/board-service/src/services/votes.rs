/// Vote ledger service - the vote/score reconciliation core
///
/// A caller holds at most one vote per post. Requesting a direction moves
/// that vote through a small state machine (none -> up, up -> down,
/// up -> none, ...), and every transition yields one ledger mutation plus
/// matching deltas for the post score and the caller's peek score. The
/// transition itself is a pure function (`reconcile`); applying it is one
/// transaction with the post row locked, so the stored score always equals
/// the sum of the vote rows.
use crate::db::{peek_repo, post_repo, vote_repo};
use crate::error::{AppError, Result};
use crate::metrics::board::VOTE_TRANSITIONS_TOTAL;
use sqlx::PgPool;
use serde::Serialize;
use uuid::Uuid;

/// Vote direction requested by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// The ledger value for this direction.
    pub fn value(self) -> i16 {
        match self {
            VoteDirection::Up => 1,
            VoteDirection::Down => -1,
        }
    }
}

impl TryFrom<i16> for VoteDirection {
    type Error = AppError;

    fn try_from(raw: i16) -> std::result::Result<Self, Self::Error> {
        match raw {
            1 => Ok(VoteDirection::Up),
            -1 => Ok(VoteDirection::Down),
            other => Err(AppError::ValidationError(format!(
                "vote direction must be 1 or -1, got {}",
                other
            ))),
        }
    }
}

/// The single ledger mutation a transition performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerAction {
    /// First vote: insert a row with the requested value.
    Insert,
    /// Direction flip: update the existing row in place.
    Flip,
    /// Same direction again: toggle off, delete the row.
    Remove,
}

impl LedgerAction {
    pub fn as_str(self) -> &'static str {
        match self {
            LedgerAction::Insert => "inserted",
            LedgerAction::Flip => "flipped",
            LedgerAction::Remove => "removed",
        }
    }
}

/// Outcome of reconciling an existing vote with a requested direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteTransition {
    pub action: LedgerAction,
    pub score_delta: i64,
    pub peek_delta: i64,
    pub resulting_vote: i16,
}

/// The canonical transition table. `existing` is the caller's current vote
/// value (0 for none).
pub fn reconcile(existing: i16, requested: VoteDirection) -> VoteTransition {
    let value = requested.value();
    if existing == 0 {
        VoteTransition {
            action: LedgerAction::Insert,
            score_delta: i64::from(value),
            peek_delta: i64::from(value),
            resulting_vote: value,
        }
    } else if existing == value {
        VoteTransition {
            action: LedgerAction::Remove,
            score_delta: -i64::from(value),
            peek_delta: -i64::from(value),
            resulting_vote: 0,
        }
    } else {
        // Opposite direction: retract the old vote and apply the new one
        // in a single step.
        VoteTransition {
            action: LedgerAction::Flip,
            score_delta: 2 * i64::from(value),
            peek_delta: 2 * i64::from(value),
            resulting_vote: value,
        }
    }
}

/// The applied result returned to the caller so the UI can reconcile
/// without refetching the feed.
#[derive(Debug, Clone, Serialize)]
pub struct VoteOutcome {
    pub post_id: Uuid,
    pub user_vote: i16,
    pub score: i64,
    pub peek_score: i64,
    pub score_delta: i64,
    pub peek_delta: i64,
}

pub struct VoteService {
    pool: PgPool,
}

impl VoteService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply a vote for (post, session). Returns `None` without any
    /// mutation if the post does not exist.
    ///
    /// A serialization/deadlock conflict is retried once; a second failure
    /// surfaces as `Conflict` with no partial score applied.
    pub async fn apply_vote(
        &self,
        post_id: Uuid,
        session_id: &str,
        direction: VoteDirection,
    ) -> Result<Option<VoteOutcome>> {
        match self.try_apply_vote(post_id, session_id, direction).await {
            Err(err) if is_transient_conflict(&err) => {
                tracing::warn!(%post_id, "vote transaction conflicted, retrying once");
                self.try_apply_vote(post_id, session_id, direction)
                    .await
                    .map_err(|retry_err| {
                        if is_transient_conflict(&retry_err) {
                            AppError::Conflict(format!(
                                "concurrent vote on post {} did not settle",
                                post_id
                            ))
                        } else {
                            retry_err.into()
                        }
                    })
            }
            other => other.map_err(Into::into),
        }
    }

    async fn try_apply_vote(
        &self,
        post_id: Uuid,
        session_id: &str,
        direction: VoteDirection,
    ) -> std::result::Result<Option<VoteOutcome>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let Some(_post) = post_repo::find_post_for_update(&mut *tx, post_id).await? else {
            // Voting on a missing post is defined as a no-op, not an error.
            tx.rollback().await?;
            VOTE_TRANSITIONS_TOTAL.with_label_values(&["noop"]).inc();
            return Ok(None);
        };

        let existing = vote_repo::find_vote(&mut *tx, post_id, session_id).await?;
        let existing_value = existing.as_ref().map(|v| v.vote_value).unwrap_or(0);
        let transition = reconcile(existing_value, direction);

        match (transition.action, &existing) {
            (LedgerAction::Insert, _) => {
                vote_repo::insert_vote(&mut *tx, post_id, session_id, transition.resulting_vote)
                    .await?;
            }
            (LedgerAction::Flip, Some(vote)) => {
                vote_repo::update_vote_value(&mut *tx, vote.id, transition.resulting_vote).await?;
            }
            (LedgerAction::Remove, Some(vote)) => {
                vote_repo::delete_vote(&mut *tx, vote.id).await?;
            }
            // reconcile never yields Flip/Remove without an existing row
            (_, None) => unreachable!("ledger action requires an existing vote"),
        }

        let score = post_repo::adjust_score(&mut *tx, post_id, transition.score_delta).await?;
        let peek_score =
            peek_repo::adjust_peek_score(&mut *tx, session_id, transition.peek_delta).await?;

        tx.commit().await?;

        VOTE_TRANSITIONS_TOTAL
            .with_label_values(&[transition.action.as_str()])
            .inc();

        tracing::debug!(
            %post_id,
            action = transition.action.as_str(),
            score_delta = transition.score_delta,
            new_score = score,
            "vote applied"
        );

        Ok(Some(VoteOutcome {
            post_id,
            user_vote: transition.resulting_vote,
            score,
            peek_score,
            score_delta: transition.score_delta,
            peek_delta: transition.peek_delta,
        }))
    }

    /// The caller's peek score (baseline 137 for untouched sessions).
    pub async fn peek_score(&self, session_id: &str) -> Result<i64> {
        let score = peek_repo::get_peek_score(&self.pool, session_id).await?;
        Ok(score)
    }
}

/// Serialization failures and deadlocks are worth one retry; everything
/// else is a real error.
fn is_transient_conflict(err: &sqlx::Error) -> bool {
    matches!(
        err.as_database_error().and_then(|db| db.code()).as_deref(),
        Some("40001") | Some("40P01")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_vote_inserts_and_counts_once() {
        let up = reconcile(0, VoteDirection::Up);
        assert_eq!(up.action, LedgerAction::Insert);
        assert_eq!(up.score_delta, 1);
        assert_eq!(up.peek_delta, 1);
        assert_eq!(up.resulting_vote, 1);

        let down = reconcile(0, VoteDirection::Down);
        assert_eq!(down.action, LedgerAction::Insert);
        assert_eq!(down.score_delta, -1);
        assert_eq!(down.peek_delta, -1);
        assert_eq!(down.resulting_vote, -1);
    }

    #[test]
    fn same_direction_toggles_off() {
        let up_again = reconcile(1, VoteDirection::Up);
        assert_eq!(up_again.action, LedgerAction::Remove);
        assert_eq!(up_again.score_delta, -1);
        assert_eq!(up_again.peek_delta, -1);
        assert_eq!(up_again.resulting_vote, 0);

        let down_again = reconcile(-1, VoteDirection::Down);
        assert_eq!(down_again.action, LedgerAction::Remove);
        assert_eq!(down_again.score_delta, 1);
        assert_eq!(down_again.peek_delta, 1);
        assert_eq!(down_again.resulting_vote, 0);
    }

    #[test]
    fn opposite_direction_flips_with_double_delta() {
        let up_to_down = reconcile(1, VoteDirection::Down);
        assert_eq!(up_to_down.action, LedgerAction::Flip);
        assert_eq!(up_to_down.score_delta, -2);
        assert_eq!(up_to_down.peek_delta, -2);
        assert_eq!(up_to_down.resulting_vote, -1);

        let down_to_up = reconcile(-1, VoteDirection::Up);
        assert_eq!(down_to_up.action, LedgerAction::Flip);
        assert_eq!(down_to_up.score_delta, 2);
        assert_eq!(down_to_up.peek_delta, 2);
        assert_eq!(down_to_up.resulting_vote, 1);
    }

    #[test]
    fn double_vote_is_net_zero() {
        // vote, then the same vote again, must cancel exactly
        let first = reconcile(0, VoteDirection::Up);
        let second = reconcile(first.resulting_vote, VoteDirection::Up);
        assert_eq!(first.score_delta + second.score_delta, 0);
        assert_eq!(first.peek_delta + second.peek_delta, 0);
        assert_eq!(second.resulting_vote, 0);
    }

    #[test]
    fn direction_parses_only_unit_values() {
        assert_eq!(VoteDirection::try_from(1).unwrap(), VoteDirection::Up);
        assert_eq!(VoteDirection::try_from(-1).unwrap(), VoteDirection::Down);
        assert!(VoteDirection::try_from(0).is_err());
        assert!(VoteDirection::try_from(2).is_err());
    }
}
