//! Command enum definitions

use crate::args::*;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Display version information
    Version,

    /// List kinds that may be assigned by hand
    Allowed,

    /// Print each kind's inverse
    Inverses,

    /// Check whether two kinds conflict
    Conflicts(ConflictsArgs),

    /// Show problems found while building the catalog
    Report,

    /// Show everything known about one kind
    #[command(
        long_about = r#"
Show everything the catalog knows about one relationship kind:

  • whether it is family-by-blood, animal-only or requires compatibility
  • whether it can be assigned by hand
  • which worker runs it (the kind's default or an overlay's custom type)
  • its inverse, declared or inferred by probing
  • the kinds it conflicts with
  • any issue recorded for it during the build
"#
    )]
    Check(CheckArgs),
}
