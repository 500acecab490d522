pub use {
    anyhow,
    hashbrown,
    itertools,
    log,
    polars,
    pretty_env_logger,
    serde,
    serde_json,
};
