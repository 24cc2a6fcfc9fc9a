/// Board domain metrics
use lazy_static::lazy_static;
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

lazy_static! {
    /// Vote ledger transitions by outcome (inserted, flipped, removed, noop).
    pub static ref VOTE_TRANSITIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "board_vote_transitions_total",
        "Total vote ledger transitions by outcome",
        &["outcome"]
    )
    .expect("Failed to register vote transitions counter");

    /// Feed requests by sort mode.
    pub static ref FEED_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "board_feed_requests_total",
        "Total feed requests by sort mode",
        &["sort"]
    )
    .expect("Failed to register feed requests counter");

    pub static ref POSTS_CREATED_TOTAL: IntCounter = register_int_counter!(
        "board_posts_created_total",
        "Total posts created"
    )
    .expect("Failed to register posts created counter");

    pub static ref POSTS_DELETED_TOTAL: IntCounter = register_int_counter!(
        "board_posts_deleted_total",
        "Total posts deleted by their owners"
    )
    .expect("Failed to register posts deleted counter");

    pub static ref POSTS_REPORTED_TOTAL: IntCounter = register_int_counter!(
        "board_posts_reported_total",
        "Total post reports acknowledged"
    )
    .expect("Failed to register posts reported counter");

    pub static ref COMMENTS_CREATED_TOTAL: IntCounter = register_int_counter!(
        "board_comments_created_total",
        "Total comments created"
    )
    .expect("Failed to register comments created counter");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_register_and_increment() {
        let before = POSTS_CREATED_TOTAL.get();
        POSTS_CREATED_TOTAL.inc();
        assert_eq!(POSTS_CREATED_TOTAL.get(), before + 1);

        VOTE_TRANSITIONS_TOTAL.with_label_values(&["inserted"]).inc();
        assert!(VOTE_TRANSITIONS_TOTAL.with_label_values(&["inserted"]).get() >= 1);
    }
}
