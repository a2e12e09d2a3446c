use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid number {value:?} at record {record}, field {field}")]
    InvalidNumber {
        value: String,
        record: usize,
        field: usize,
    },

    #[error("dataset is empty")]
    EmptyDataset,

    #[error("cluster count must be at least 1")]
    InvalidClusterCount,

    #[error("need at least {needed} points for {needed} clusters, got {got}")]
    NotEnoughPoints { needed: usize, got: usize },

    #[error("data range is too large to plot")]
    UnplottableRange,

    #[error("plot {width}x{height} is too small for padding {padding}")]
    PlotTooSmall {
        width: usize,
        height: usize,
        padding: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
