//! Network command handlers.

use tabled::Tabled;

use merakidns_core::{Dashboard, Network};

use crate::cli::{NetworksArgs, NetworksCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct NetworkRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Products")]
    products: String,
    #[tabled(rename = "Time zone")]
    time_zone: String,
}

impl From<&Network> for NetworkRow {
    fn from(n: &Network) -> Self {
        Self {
            id: n.id.clone(),
            name: n.name.clone(),
            products: n.product_types.join(", "),
            time_zone: n.time_zone.clone().unwrap_or_default(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: NetworksArgs, ctx: &Context) -> Result<(), CliError> {
    match args.command {
        NetworksCommand::List(selector) => {
            let org = ctx.organization(selector.org.as_deref())?;
            let session = util::connect(ctx).await?.select_organization(&org).await?;
            let org_id = session.organization_id().ok_or_else(|| CliError::Internal {
                message: "organization selected but no id recorded".into(),
            })?;

            let nets = session.dashboard().networks(&org_id).await?;
            let out = output::render_list(ctx.output, &nets, |x| NetworkRow::from(x), |n| n.id.clone());
            output::print_output(&out, ctx.quiet());
            Ok(())
        }
    }
}
