//! Organization command handlers.

use tabled::Tabled;

use merakidns_core::{Dashboard, Organization};

use crate::cli::{OrgsArgs, OrgsCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct OrgRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Dashboard URL")]
    url: String,
}

impl From<&Organization> for OrgRow {
    fn from(o: &Organization) -> Self {
        Self {
            id: o.id.clone(),
            name: o.name.clone(),
            url: o.url.clone().unwrap_or_default(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: OrgsArgs, ctx: &Context) -> Result<(), CliError> {
    match args.command {
        OrgsCommand::List => {
            let session = util::connect(ctx).await?;
            let orgs = session.dashboard().organizations().await?;
            let out = output::render_list(ctx.output, &orgs, |x| OrgRow::from(x), |o| o.id.clone());
            output::print_output(&out, ctx.quiet());
            Ok(())
        }
    }
}
