//! Command argument structures

use clap::Args;

#[derive(Args)]
pub struct ConflictsArgs {
    /// First relationship kind
    pub a: String,

    /// Second relationship kind
    pub b: String,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Relationship kind name
    pub kind: String,
}
