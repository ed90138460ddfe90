use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// menutray - printable school-lunch tray worksheets
#[derive(Parser)]
#[command(name = "menutray")]
#[command(about = "Fetch a school's daily menu and build a tray worksheet with dish pictures")]
#[command(version)]
pub struct Cli {
    /// TOML configuration file (defaults apply when omitted)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Where the working menu is kept between invocations
    #[arg(long, global = true, default_value = ".menutray/session.json")]
    pub session: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the display name and search keywords for a raw menu line
    Refine {
        /// Raw line as printed by NEIS, e.g. "친환경현미밥(1.2)"
        raw: String,
    },
    /// Search schools by name
    Schools {
        query: String,
    },
    /// Fetch a day's menu, look up images and print the worksheet
    Menu {
        /// Education office code (ATPT_OFCDC_SC_CODE)
        #[arg(long)]
        office: String,
        /// School code (SD_SCHUL_CODE)
        #[arg(long)]
        school: String,
        /// School name printed in the title
        #[arg(long, default_value = "")]
        name: String,
        /// Date as YYYY-MM-DD; today when omitted
        #[arg(long)]
        date: Option<String>,
    },
    /// Print the worksheet for the saved menu
    Sheet {
        /// Flip tracing text under stickers before printing
        #[arg(long)]
        toggle_tracing: bool,
    },
    /// Edit a menu item
    Item {
        #[command(subcommand)]
        action: ItemCommands,
    },
    /// Image search, generation and upload for menu items
    Image {
        #[command(subcommand)]
        action: ImageCommands,
    },
}

#[derive(Subcommand)]
pub enum ItemCommands {
    /// Change the label; an empty name restores the refined one
    Rename {
        /// Item id or 1-based position
        item: String,
        name: String,
    },
    /// Hide or show an item on the worksheet
    Toggle {
        /// Item id or 1-based position
        item: String,
    },
}

#[derive(Subcommand)]
pub enum ImageCommands {
    /// List candidate image URLs for a query
    Search {
        query: String,
    },
    /// Use a candidate URL for an item
    Apply {
        /// Item id or 1-based position
        item: String,
        url: String,
    },
    /// Generate an image for an item
    Generate {
        /// Item id or 1-based position
        item: String,
    },
    /// Upload a local image file for an item
    Upload {
        /// Item id or 1-based position
        item: String,
        file: PathBuf,
    },
}
