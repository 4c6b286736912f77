/********************************************************************************
 * Copyright (c) 2025 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

mod report;

use crate::report::{plan_endpoint, render_table, BindingRow, InspectError};
use clap::Parser;
use subject_mesh::config::Config;
use tracing::info;
use uuid::Uuid;

#[derive(Parser)]
#[command(about = "Prints the subjects and routing groups a service instance would bind")]
struct InspectArgs {
    /// json5 service configuration; `SUBJECT_MESH_*` variables are applied on top.
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Endpoint name to expand; may be repeated.
    #[arg(short, long = "endpoint", value_name = "NAME", required = true)]
    endpoints: Vec<String>,

    /// Instance id; overrides the configured one.
    #[arg(short, long, value_name = "ID")]
    instance_id: Option<String>,

    /// Emit JSON instead of a table.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), InspectError> {
    let _ = tracing_subscriber::fmt::try_init();

    let args = InspectArgs::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path).map_err(InspectError::Config)?,
        None => Config::default(),
    }
    .with_environ();

    let instance_id = match args.instance_id.as_deref().filter(|id| !id.is_empty()) {
        Some(id) => id.to_string(),
        None => match config.instance_id() {
            Some(id) => id.to_string(),
            None => {
                let generated = Uuid::new_v4().simple().to_string();
                info!("No instance id configured, using generated id {generated}");
                generated
            }
        },
    };
    let prefix = config.prefix_or_default();
    let topologies = config.sorted_topologies();

    let mut rows: Vec<BindingRow> = Vec::new();
    for endpoint in &args.endpoints {
        rows.extend(plan_endpoint(prefix, endpoint, &topologies, &instance_id)?);
    }

    if args.json {
        let rendered = serde_json::to_string_pretty(&rows).map_err(InspectError::Json)?;
        println!("{rendered}");
    } else {
        print!("{}", render_table(&rows));
    }

    Ok(())
}
