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

use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use subject_mesh::address::{expand, AddressError, Delivery, SEPARATOR};
use subject_mesh::binding::{BindError, Binder};
use subject_mesh::config::ConfigError;
use subject_mesh::observability::fields;

#[derive(Debug)]
pub(crate) enum InspectError {
    Config(ConfigError),
    Address {
        endpoint: String,
        source: AddressError,
    },
    Bind {
        endpoint: String,
        source: BindError,
    },
    Json(serde_json::Error),
}

impl Display for InspectError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InspectError::Config(err) => write!(f, "{err}"),
            InspectError::Address { endpoint, source } => {
                write!(f, "invalid address for endpoint '{endpoint}': {source}")
            }
            InspectError::Bind { endpoint, source } => {
                write!(f, "unable to plan endpoint '{endpoint}': {source}")
            }
            InspectError::Json(err) => write!(f, "unable to serialize report: {err}"),
        }
    }
}

impl Error for InspectError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            InspectError::Config(err) => Some(err),
            InspectError::Address { source, .. } => Some(source),
            InspectError::Bind { source, .. } => Some(source),
            InspectError::Json(err) => Some(err),
        }
    }
}

/// One planned subscription as shown to the operator.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub(crate) struct BindingRow {
    pub(crate) endpoint: String,
    pub(crate) subject: String,
    pub(crate) delivery: Delivery,
    pub(crate) group: String,
    pub(crate) scope: String,
    pub(crate) bus_endpoint: String,
}

pub(crate) fn plan_endpoint(
    prefix: &str,
    endpoint: &str,
    topologies: &[String],
    instance_id: &str,
) -> Result<Vec<BindingRow>, InspectError> {
    let base = format!("{prefix}{SEPARATOR}{endpoint}");
    let descriptors =
        expand(&base, topologies, instance_id).map_err(|source| InspectError::Address {
            endpoint: endpoint.to_string(),
            source,
        })?;
    let bindings =
        Binder::plan(&descriptors, instance_id).map_err(|source| InspectError::Bind {
            endpoint: endpoint.to_string(),
            source,
        })?;

    Ok(bindings
        .into_iter()
        .map(|binding| BindingRow {
            endpoint: endpoint.to_string(),
            subject: binding.subject().to_string(),
            delivery: binding.delivery(),
            group: binding.group().to_string(),
            scope: binding.scope().to_string(),
            bus_endpoint: binding.endpoint_name(),
        })
        .collect())
}

const HEADERS: [&str; 5] = ["ENDPOINT", "SUBJECT", "DELIVERY", "GROUP", "SCOPE"];

/// Left-aligned, space-padded table with one row per binding.
pub(crate) fn render_table(rows: &[BindingRow]) -> String {
    let cells: Vec<[&str; 5]> = rows
        .iter()
        .map(|row| {
            [
                row.endpoint.as_str(),
                row.subject.as_str(),
                row.delivery.as_str(),
                row.group.as_str(),
                fields::format_scope(&row.scope),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    for line in std::iter::once(&HEADERS).chain(cells.iter()) {
        let padded: Vec<String> = line
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        out.push_str(padded.join("  ").trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{plan_endpoint, render_table, InspectError};
    use subject_mesh::address::Delivery;
    use subject_mesh::binding::BindError;

    #[test]
    fn plan_endpoint_prefixes_base_and_assigns_groups() {
        let rows = plan_endpoint("svc", "echo", &["eu".to_string()], "n1").expect("plan");

        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].subject, "svc.echo");
        assert_eq!(rows[0].group, "q");
        let all_eu = rows
            .iter()
            .find(|row| row.subject == "svc.echo.all.eu")
            .expect("scoped broadcast");
        assert_eq!(all_eu.delivery, Delivery::Broadcast);
        assert_eq!(all_eu.group, "id.n1");
        assert_eq!(all_eu.scope, "eu");
        assert_eq!(all_eu.bus_endpoint, "svc-echo-all-eu");
    }

    #[test]
    fn plan_endpoint_reports_invalid_endpoint_name() {
        let err = plan_endpoint("svc", "bad name", &[], "n1").expect_err("whitespace");
        assert!(matches!(err, InspectError::Address { ref endpoint, .. } if endpoint == "bad name"));
    }

    #[test]
    fn plan_endpoint_requires_instance_id_for_broadcast() {
        let err = plan_endpoint("svc", "echo", &[], "").expect_err("no id");
        assert!(matches!(
            err,
            InspectError::Bind {
                source: BindError::MissingInstanceId,
                ..
            }
        ));
    }

    #[test]
    fn render_table_aligns_columns() {
        let rows = plan_endpoint("svc", "echo", &[], "n1").expect("plan");
        let table = render_table(&rows);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("ENDPOINT  SUBJECT"));
        assert_eq!(
            lines[2],
            "echo      svc.echo.all    broadcast      id.n1  none"
        );
    }
}
