use stacker_api::BlockError;
use stacker_engine::EngineError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Engine(#[from] EngineError),

    #[error("{0}")]
    Block(#[from] BlockError),

    #[error("input ({path}): {source}")]
    Input {
        path: String,
        source: std::io::Error,
    },

    #[error("partition {partition}: {source}")]
    Partition { partition: usize, source: BlockError },

    #[error("output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("output: {0}")]
    Io(#[from] std::io::Error),
}
