// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

use clap::{Parser, Subcommand};
use polymask_cli::{download, draw};

#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(arg_required_else_help = true)]
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
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Download(download_args)) => download::download(download_args),
        Some(Commands::Draw(draw_args)) => draw::draw(draw_args),
        None => {}
    }
}
