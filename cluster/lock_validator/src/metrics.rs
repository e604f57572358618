pub use metrics::*;
use std::sync::LazyLock;

/*
 * Cluster lock validation
 */
pub static CLUSTER_LOCK_VALIDATIONS_TOTAL: LazyLock<Result<IntCounterVec>> =
    LazyLock::new(|| {
        try_create_int_counter_vec(
            "cluster_lock_validations_total",
            "Count of cluster lock validations by result",
            &["result"],
        )
    });
pub static CLUSTER_LOCK_VALIDATION_FAILURES_BY_STATE: LazyLock<Result<IntCounterVec>> =
    LazyLock::new(|| {
        try_create_int_counter_vec(
            "cluster_lock_validation_failures_by_state",
            "Count of rejected cluster locks by the last validation stage they passed",
            &["state"],
        )
    });
pub static CLUSTER_LOCK_VALIDATION_SECONDS: LazyLock<Result<Histogram>> = LazyLock::new(|| {
    try_create_histogram(
        "cluster_lock_validation_seconds",
        "Time taken to fully validate a cluster lock.",
    )
});
