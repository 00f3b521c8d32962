// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

/// Default directory that job archives are extracted into
pub fn get_result_dir() -> std::path::PathBuf {
    if let Ok(result_dir) = std::env::var("POLYMASK_RESULT") {
        if !result_dir.is_empty() {
            return std::path::PathBuf::from(result_dir);
        }
    }

    if let Ok(current) = std::env::current_dir() {
        return current.join("result");
    }

    std::path::PathBuf::from("result")
}

pub mod job;
pub mod request;
