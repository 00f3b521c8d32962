// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

use std::path::PathBuf;

use clap::Args;

use polymask_core::im::draw_masks;
use polymask_core::ut::track::{progress_log, thousands_format};
use polymask_data::get_result_dir;
use polymask_data::job::download_job;
use polymask_data::request::{ClientConfig, DEFAULT_MAX_ATTEMPTS};

use crate::draw::log_report;

#[derive(Debug, Args)]
#[command(about = "Download annotated jobs and draw their polygon masks.")]
pub struct DownloadArgs {
    #[arg(help = "Job identifiers, processed in the given order.", required = true)]
    pub jobs: Vec<u64>,

    #[arg(
        short = 'o',
        long,
        help = "Output directory holding one directory per job. Defaults to $POLYMASK_RESULT or ./result."
    )]
    pub output: Option<String>,

    #[arg(long, env = "POLYMASK_API_URL", help = "Base url of the annotation service api.")]
    pub api_url: String,

    #[arg(short = 'u', long, env = "POLYMASK_USERNAME", help = "Account username.")]
    pub username: String,

    #[arg(
        short = 'p',
        long,
        env = "POLYMASK_PASSWORD",
        hide_env_values = true,
        help = "Account password."
    )]
    pub password: String,

    #[arg(
        long,
        default_value_t = DEFAULT_MAX_ATTEMPTS,
        help = "Maximum number of attempts when fetching a job."
    )]
    pub attempts: usize,

    #[arg(short = 'v', long, help = "Verbose output.")]
    pub verbose: bool,
}

pub fn download(args: &DownloadArgs) {
    if args.attempts < 1 {
        eprintln!("[polymask::download] ERROR: Attempts must be set to a positive integer.");
        std::process::exit(1);
    }

    let output = args
        .output
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(get_result_dir);

    if let Err(err) = std::fs::create_dir_all(&output) {
        eprintln!(
            "[polymask::download] ERROR: Could not create output directory {}. {}",
            output.display(),
            err
        );
        std::process::exit(1);
    }

    let mut config = ClientConfig::new(&args.api_url, &args.username, &args.password);
    config.max_attempts = args.attempts;

    let mut failed: Vec<u64> = Vec::new();

    for &job in &args.jobs {
        let result = download_job(&config, job, &output, args.verbose)
            .and_then(|directory| draw_masks(&directory, args.verbose).map_err(Into::into));

        match result {
            Ok(report) => {
                progress_log(&format!("Job {} finished.", job), args.verbose);
                log_report(&report, args.verbose);
            }
            Err(err) => {
                eprintln!("[polymask::download] ERROR: Job {} failed. {:#}", job, err);
                failed.push(job);
            }
        }
    }

    progress_log(
        &format!(
            "Complete. {} of {} jobs processed.",
            thousands_format(args.jobs.len() - failed.len()),
            thousands_format(args.jobs.len())
        ),
        args.verbose,
    );

    if !failed.is_empty() {
        std::process::exit(1);
    }
}
