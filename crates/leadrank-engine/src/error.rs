use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("input table not found: {path}")]
    MissingInput { path: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}
