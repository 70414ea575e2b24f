//! Command dispatch: bridges CLI args -> core session -> output formatting.

pub mod config_cmd;
pub mod devices;
pub mod dns;
pub mod networks;
pub mod orgs;
pub mod util;
pub mod wizard;

use crate::cli::Command;
use crate::config::Context;
use crate::error::CliError;

/// Dispatch a profile-bound command to the appropriate handler.
///
/// Auth failures surfacing mid-command are tagged with the active profile.
pub async fn dispatch(cmd: Command, ctx: &Context) -> Result<(), CliError> {
    let outcome = match cmd {
        Command::Orgs(args) => orgs::handle(args, ctx).await,
        Command::Networks(args) => networks::handle(args, ctx).await,
        Command::Devices(args) => devices::handle(args, ctx).await,
        Command::Dns(args) => dns::handle(args, ctx).await,
        Command::Wizard => wizard::run(ctx).await,
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal {
            message: "config and completions are handled before dispatch".into(),
        }),
    };
    outcome.map_err(|e| e.with_profile(&ctx.profile_name))
}
