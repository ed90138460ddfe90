pub mod blob;
pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod logging;
pub mod media;
pub mod neis;
pub mod preprocessing;
pub mod session;
pub mod store;
pub mod worksheet;

use crate::cli::{Cli, Commands, ImageCommands, ItemCommands};
use crate::commands::AppState;
use crate::config::Config;
use crate::session::MenuSession;
use anyhow::{anyhow, Context};
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::path::Path;

pub async fn run() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    logging::init(cli.json_logs);

    let config = Config::load(cli.config.as_deref())?;
    let state = AppState::from_config(config).context("building HTTP client")?;

    let output = match cli.command {
        Commands::Refine { raw } => commands::refine(&raw),
        Commands::Schools { query } => commands::search_schools(&state, &query).await,
        Commands::Menu {
            office,
            school,
            name,
            date,
        } => {
            let date = match date {
                Some(date) => NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                    .with_context(|| format!("invalid date {date:?}, expected YYYY-MM-DD"))?,
                None => Local::now().date_naive(),
            };
            let mut session = MenuSession::new(date);
            session.set_school(office, school, name);
            let output = commands::fetch_menu(&state, &mut session).await;
            save_session(&cli.session, &session).await?;
            output
        }
        Commands::Sheet { toggle_tracing } => {
            let mut session = load_session(&cli.session).await?;
            if toggle_tracing {
                let output = commands::toggle_tracing_text(&mut session);
                save_session(&cli.session, &session).await?;
                output
            } else {
                commands::worksheet(&session)
            }
        }
        Commands::Item { action } => {
            let mut session = load_session(&cli.session).await?;
            let output = match action {
                ItemCommands::Rename { item, name } => commands::rename_item(&mut session, &item, &name),
                ItemCommands::Toggle { item } => commands::toggle_item(&mut session, &item),
            };
            save_session(&cli.session, &session).await?;
            output
        }
        Commands::Image { action } => match action {
            ImageCommands::Search { query } => commands::search_images(&state, &query).await,
            ImageCommands::Apply { item, url } => {
                let mut session = load_session(&cli.session).await?;
                let output = commands::apply_image(&state, &mut session, &item, &url).await;
                save_session(&cli.session, &session).await?;
                output
            }
            ImageCommands::Generate { item } => {
                let mut session = load_session(&cli.session).await?;
                let output = commands::generate_image(&state, &mut session, &item).await;
                save_session(&cli.session, &session).await?;
                output
            }
            ImageCommands::Upload { item, file } => {
                let bytes = tokio::fs::read(&file)
                    .await
                    .with_context(|| format!("reading {}", file.display()))?;
                let mut session = load_session(&cli.session).await?;
                let output = commands::upload_image(&state, &mut session, &item, &bytes).await;
                save_session(&cli.session, &session).await?;
                output
            }
        },
    };

    println!("{}", output.map_err(|e| anyhow!(e))?);
    Ok(())
}

async fn load_session(path: &Path) -> anyhow::Result<MenuSession> {
    let raw = tokio::fs::read(path)
        .await
        .with_context(|| format!("no saved menu at {}; run `menutray menu` first", path.display()))?;
    Ok(serde_json::from_slice(&raw)?)
}

async fn save_session(path: &Path, session: &MenuSession) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, serde_json::to_vec_pretty(session)?).await?;
    Ok(())
}
