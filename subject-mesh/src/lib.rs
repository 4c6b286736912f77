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

//! # subject-mesh
//!
//! `subject-mesh` is the addressing layer of a publish/subscribe service mesh. Given an
//! endpoint base name, the dotted topology labels describing where an instance runs
//! (e.g. `eu.nl.ams`) and a unique instance id, it derives every subject the instance
//! must listen on and binds each one with the right delivery semantics:
//!
//! - `base`, `base.any`, `base.any.<scope>`: exactly one instance receives the message.
//! - `base.all`, `base.all.<scope>`: every live instance receives the message.
//! - `base.id.<instance id>`: only the named instance receives the message.
//!
//! The bus only offers "one subscriber per routing group". Load-balanced subjects share
//! one group across the fleet, broadcast subjects use a group unique to the instance.
//!
//! ```
//! use subject_mesh::address::expand;
//! use subject_mesh::binding::Binder;
//!
//! let descriptors = expand("svc.echo", &["eu.nl"], "n1").unwrap();
//! let bindings = Binder::plan(&descriptors, "n1").unwrap();
//!
//! let all = bindings
//!     .iter()
//!     .find(|binding| binding.subject() == "svc.echo.all.eu")
//!     .unwrap();
//! assert_eq!(all.group().to_string(), "id.n1");
//!
//! let any = bindings
//!     .iter()
//!     .find(|binding| binding.subject() == "svc.echo.any.eu")
//!     .unwrap();
//! assert_eq!(any.group().to_string(), "q");
//! ```
//!
//! ## Internal architecture map
//!
//! - Address: subject grammar and pure topology expansion
//! - Binding: routing-group choice, registration with rollback, release
//! - Transport: the narrow bus seam (`subscribe` / `unsubscribe`)
//! - Service: named handlers registered under a configured prefix and topologies
//!
//! ## Observability model
//!
//! The crate uses `tracing` for logs/events and never installs a global subscriber.
//! Binaries and tests are responsible for one-time `tracing_subscriber` initialization.

pub mod address;
pub mod binding;
pub mod config;
#[doc(hidden)]
pub mod observability;
pub mod service;
pub mod transport;

pub use address::{expand, DescriptorSet, SubjectDescriptor};
pub use binding::{Binder, Binding, RoutingGroup, Subscription};
pub use service::{RunningService, Service, ServiceOptions};
pub use transport::{BusTransport, MessageHandler};
