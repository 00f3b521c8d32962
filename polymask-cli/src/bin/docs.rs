#![allow(clippy::all)]
use clap::{Parser, Subcommand};

use polymask_cli::{download, draw};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Download(download::DownloadArgs),
    Draw(draw::DrawArgs),
}

fn main() {
    clap_markdown::print_help_markdown::<Cli>();
}
