// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

use std::path::Path;

use clap::Args;

use polymask_core::im::{JobReport, draw_masks};
use polymask_core::ut::track::{progress_log, progress_warn, thousands_format};

#[derive(Debug, Args)]
#[command(about = "Draw polygon masks for an already extracted job directory.")]
pub struct DrawArgs {
    #[arg(
        short = 'i',
        long,
        help = "Job directory holding annotations.xml and images named {id}.{ext}.",
        required = true
    )]
    pub input: Option<String>,

    #[arg(short = 'v', long, help = "Verbose output.")]
    pub verbose: bool,
}

pub fn draw(args: &DrawArgs) {
    let input = args.input.to_owned().unwrap();
    let directory = Path::new(&input);

    if !directory.is_dir() {
        eprintln!(
            "[polymask::draw] ERROR: Input {} is not a directory.",
            directory.display()
        );
        std::process::exit(1);
    }

    let report = draw_masks(directory, args.verbose).unwrap_or_else(|err| {
        eprintln!("[polymask::draw] ERROR: {}", err);
        std::process::exit(1);
    });

    log_report(&report, args.verbose);
}

/// Print the outcome of a processed job
pub(crate) fn log_report(report: &JobReport, verbose: bool) {
    if !report.deletion_failures.is_empty() {
        progress_warn(&format!(
            "{} source images could not be deleted: {:?}",
            thousands_format(report.deletion_failures.len()),
            report.deletion_failures
        ));
    }

    progress_log(
        &format!(
            "Complete. {} masks drawn. {} images without polygons skipped.",
            thousands_format(report.outputs.len()),
            thousands_format(report.skipped)
        ),
        verbose,
    );
}
