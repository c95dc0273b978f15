use derive_more::derive::{Display, Error};

/// A specialized `Result` where the error is this crate's `Error` type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Define a unified error type for this crate.
///
/// Nothing here is fatal: the caller retries on the next foreground cycle.
#[allow(missing_docs, reason = "The variants are self-explanatory.")]
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    #[display("task table is full")]
    TaskTableFull,

    #[display("a task with this name is already registered")]
    TaskNameTaken,

    #[display("no task with this name is registered")]
    TaskNameUnknown,

    #[display("task name is too long")]
    TaskNameTooLong,

    #[display("task delay or period is out of range")]
    TaskPeriodInvalid,

    #[display("no decodable IR frame")]
    IrNoFrame,
}
