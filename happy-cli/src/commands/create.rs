//! Interactive "create orphanage" page

use anyhow::Result;
use clap::Parser;
use happy_core::{FormController, HappyConfig};
use tracing::info;

use crate::tui::{self, App, TuiHost};

#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// API base URL (overrides the config file)
    #[arg(long, env = "HAPPY_API_URL", value_name = "URL")]
    pub api_url: Option<String>,
}

pub async fn run_create(args: CreateArgs) -> Result<()> {
    let config = HappyConfig::load()?;
    let api = super::build_api(&config, args.api_url.as_deref())?;

    let controller = FormController::new(api, TuiHost::default(), config.page.settings());
    let mut app = App::new(controller, config.map.view());

    tui::run(&mut app).await?;

    if let Some(route) = app.navigated_to() {
        info!(route, "left the create page");
        println!("→ {}", route);
    }

    Ok(())
}
