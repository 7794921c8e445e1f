// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pipeforge init` - write a starter template

use crate::{output, templates};
use std::path::Path;

pub fn handle(template_name: &str, output_path: &Path) -> anyhow::Result<i32> {
    let Some(template) = templates::find(template_name) else {
        eprintln!(
            "{}",
            output::err(&format!(
                "Unknown template '{}'. Available: {}",
                template_name,
                templates::TEMPLATES
                    .iter()
                    .map(|t| t.name)
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        );
        return Ok(1);
    };

    if output_path.exists() {
        eprintln!(
            "{}",
            output::err(&format!(
                "{} already exists; refusing to overwrite",
                output_path.display()
            ))
        );
        return Ok(1);
    }

    std::fs::write(output_path, template.content)?;
    println!(
        "{}",
        output::ok(&format!(
            "Wrote {} template to {}",
            template.name,
            output_path.display()
        ))
    );
    Ok(0)
}
