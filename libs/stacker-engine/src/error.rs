use stacker_api::BlockError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("config error: {0}")]
    Config(String),

    #[error("input line {line}: {detail}")]
    Input { line: usize, detail: String },

    #[error("block error: {0}")]
    Block(#[from] BlockError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Add context to the error.
    ///
    /// `Config` and `Input` get the context prepended to their message;
    /// wrapped errors are returned as-is.
    pub fn with_context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            EngineError::Config(msg) => EngineError::Config(format!("{ctx}: {msg}")),
            EngineError::Input { line, detail } => EngineError::Input {
                line,
                detail: format!("{ctx}: {detail}"),
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_is_prepended() {
        let err = EngineError::Config("bad value".into()).with_context("stacker.toml");
        assert_eq!(err.to_string(), "config error: stacker.toml: bad value");

        let err = EngineError::Input {
            line: 3,
            detail: "eof".into(),
        }
        .with_context("data.jsonl");
        assert_eq!(err.to_string(), "input line 3: data.jsonl: eof");
    }

    #[test]
    fn wrapped_errors_pass_through() {
        let err = EngineError::from(BlockError::InvalidBlockSize(0)).with_context("ignored");
        assert!(matches!(err, EngineError::Block(BlockError::InvalidBlockSize(0))));
    }
}
