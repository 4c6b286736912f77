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

//! Service facade: named endpoint handlers registered under every topology subject.

use crate::address::{expand, AddressError, DescriptorSet, SEPARATOR};
use crate::binding::{BindError, Binder, Subscription};
use crate::config::Config;
use crate::observability::{events, fields};
use crate::transport::{BusError, BusTransport, MessageHandler};
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

const COMPONENT: &str = "service";

const DEFAULT_VERSION: &str = "0.0.0";
const META_TOPOLOGIES: &str = "topologies";
const META_VERSION_FULL: &str = "version_full";

#[derive(Debug)]
pub enum ServiceError {
    MissingName,
    DuplicateHandler(String),
    Address {
        endpoint: String,
        source: AddressError,
    },
    Bind {
        endpoint: String,
        source: BindError,
    },
    Release(BusError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::MissingName => write!(f, "service name is required"),
            ServiceError::DuplicateHandler(name) => {
                write!(f, "handler '{name}' is already registered")
            }
            ServiceError::Address { endpoint, source } => {
                write!(f, "invalid address for endpoint '{endpoint}': {source}")
            }
            ServiceError::Bind { endpoint, source } => {
                write!(f, "failed to register endpoint '{endpoint}': {source}")
            }
            ServiceError::Release(err) => write!(f, "failed to release subscriptions: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ServiceError::Address { source, .. } => Some(source),
            ServiceError::Bind { source, .. } => Some(source),
            ServiceError::Release(err) => Some(err),
            ServiceError::MissingName | ServiceError::DuplicateHandler(_) => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ServiceOptions {
    /// Service name (required).
    pub name: String,
    pub description: String,
    /// Must be SemVer compliant if set. Defaults to `0.0.0`.
    pub version_semver: String,
    /// Free-form version; defaults to the SemVer version.
    pub version_full: String,
    pub config: Config,
}

/// Identity and metadata of a started service instance.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ServiceInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub version_full: String,
    pub prefix: String,
    pub topologies: Vec<String>,
    pub metadata: BTreeMap<String, String>,
}

/// One endpoint after successful registration.
#[derive(Debug)]
pub struct BoundEndpoint {
    name: String,
    descriptors: DescriptorSet,
    subscriptions: Vec<Subscription>,
}

impl BoundEndpoint {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptors(&self) -> &DescriptorSet {
        &self.descriptors
    }

    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }
}

///
/// [`Service`] collects named handlers and, on [`Service::start`], registers each of them
/// under `<prefix>.<name>` expanded with the configured topologies.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use subject_mesh::binding::Binding;
/// use subject_mesh::config::Config;
/// use subject_mesh::service::{Service, ServiceOptions};
/// use subject_mesh::transport::{BusError, BusTransport, Message, MessageHandler, SubscriptionId};
///
/// # struct NoopBus;
/// #
/// # #[async_trait]
/// # impl BusTransport for NoopBus {
/// #     async fn subscribe(
/// #         &self,
/// #         _binding: &Binding,
/// #         _handler: Arc<dyn MessageHandler>,
/// #     ) -> Result<SubscriptionId, BusError> {
/// #         Ok(SubscriptionId(0))
/// #     }
/// #
/// #     async fn unsubscribe(&self, _id: SubscriptionId) -> Result<(), BusError> {
/// #         Ok(())
/// #     }
/// # }
/// #
/// struct Echo;
///
/// #[async_trait]
/// impl MessageHandler for Echo {
///     async fn on_receive(&self, _message: Message) {}
/// }
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let options = ServiceOptions {
///     name: "example".to_string(),
///     config: Config {
///         prefix: "example-services".to_string(),
///         topologies: vec!["eu.nl.ams".to_string()],
///         instance_id: Some("abc".to_string()),
///         ..Default::default()
///     },
///     ..Default::default()
/// };
/// let mut service = Service::new(options, Arc::new(NoopBus)).unwrap();
/// service.add_handler("echo", Arc::new(Echo)).unwrap();
///
/// let running = service.start().await.unwrap();
/// assert!(running.subjects().contains(&"example-services.echo.any.eu.nl"));
/// running.stop().await.unwrap();
/// # });
/// ```
pub struct Service {
    options: ServiceOptions,
    config: Config,
    handlers: BTreeMap<String, Arc<dyn MessageHandler>>,
    binder: Binder,
}

impl Service {
    /// Creates a service. The configuration is overlaid with `SUBJECT_MESH_*` environment
    /// variables.
    pub fn new(
        options: ServiceOptions,
        transport: Arc<dyn BusTransport>,
    ) -> Result<Self, ServiceError> {
        if options.name.is_empty() {
            return Err(ServiceError::MissingName);
        }
        let config = options.config.clone().with_environ();

        Ok(Self {
            options,
            config,
            handlers: BTreeMap::new(),
            binder: Binder::new(transport),
        })
    }

    /// Registers a handler under an endpoint name. Only valid before [`Service::start`].
    pub fn add_handler(
        &mut self,
        name: impl Into<String>,
        handler: Arc<dyn MessageHandler>,
    ) -> Result<(), ServiceError> {
        let name = name.into();
        if self.handlers.contains_key(&name) {
            return Err(ServiceError::DuplicateHandler(name));
        }
        self.handlers.insert(name, handler);
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn build_info(&self, id: String, topologies: Vec<String>) -> ServiceInfo {
        let version = if self.options.version_semver.is_empty() {
            DEFAULT_VERSION.to_string()
        } else {
            self.options.version_semver.clone()
        };
        let version_full = if self.options.version_full.is_empty() {
            version.clone()
        } else {
            self.options.version_full.clone()
        };

        let mut metadata = self.config.meta.clone();
        metadata.insert(
            META_TOPOLOGIES.to_string(),
            fields::join_topologies(&topologies),
        );
        metadata.insert(META_VERSION_FULL.to_string(), version_full.clone());

        ServiceInfo {
            id,
            name: self.options.name.clone(),
            description: self.options.description.clone(),
            version,
            version_full,
            prefix: self.config.prefix_or_default().to_string(),
            topologies,
            metadata,
        }
    }

    async fn register_endpoint(
        &self,
        info: &ServiceInfo,
        name: &str,
        handler: Arc<dyn MessageHandler>,
    ) -> Result<BoundEndpoint, ServiceError> {
        let base = format!("{}{SEPARATOR}{name}", info.prefix);
        let descriptors =
            expand(&base, &info.topologies, &info.id).map_err(|source| ServiceError::Address {
                endpoint: name.to_string(),
                source,
            })?;

        debug!(
            event = events::SERVICE_ENDPOINT_EXPANDED,
            component = COMPONENT,
            endpoint = name,
            count = descriptors.len(),
            "expanded endpoint subjects"
        );
        for descriptor in &descriptors {
            info!(
                event = events::SERVICE_ENDPOINT_SUBJECT,
                component = COMPONENT,
                endpoint = name,
                subject = descriptor.full(),
                delivery = %descriptor.delivery(),
                "adding endpoint subject"
            );
        }

        let subscriptions = self
            .binder
            .bind(handler, &descriptors, &info.id)
            .await
            .map_err(|source| ServiceError::Bind {
                endpoint: name.to_string(),
                source,
            })?;

        Ok(BoundEndpoint {
            name: name.to_string(),
            descriptors,
            subscriptions,
        })
    }

    /// Registers every handler. Any endpoint failure releases the endpoints registered
    /// so far and fails the start.
    pub async fn start(self) -> Result<RunningService, ServiceError> {
        let topologies = self.config.sorted_topologies();
        let id = match self.config.instance_id() {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().simple().to_string(),
        };
        let info = self.build_info(id, topologies);

        info!(
            event = events::SERVICE_START,
            component = COMPONENT,
            instance_id = %info.id,
            topologies = %fields::join_topologies(&info.topologies),
            count = self.handlers.len(),
            "starting service"
        );

        let mut endpoints: Vec<BoundEndpoint> = Vec::with_capacity(self.handlers.len());
        for (name, handler) in &self.handlers {
            match self.register_endpoint(&info, name, handler.clone()).await {
                Ok(endpoint) => endpoints.push(endpoint),
                Err(err) => {
                    warn!(
                        event = events::SERVICE_START_FAILED,
                        component = COMPONENT,
                        endpoint = name.as_str(),
                        err = %err,
                        reason = fields::REASON_ROLLBACK_AFTER_START_FAILURE,
                        "endpoint registration failed, releasing registered endpoints"
                    );
                    for endpoint in endpoints {
                        // Failures are logged by the binder; the start error takes precedence.
                        let _ = self.binder.release(endpoint.subscriptions).await;
                    }
                    return Err(err);
                }
            }
        }

        info!(
            event = events::SERVICE_REGISTERED,
            component = COMPONENT,
            instance_id = %info.id,
            topologies = %fields::join_topologies(&info.topologies),
            "services registered"
        );

        Ok(RunningService {
            info,
            endpoints,
            binder: self.binder,
        })
    }
}

/// A started service holding its subscriptions until [`RunningService::stop`].
pub struct RunningService {
    info: ServiceInfo,
    endpoints: Vec<BoundEndpoint>,
    binder: Binder,
}

impl RunningService {
    pub fn info(&self) -> &ServiceInfo {
        &self.info
    }

    pub fn endpoints(&self) -> &[BoundEndpoint] {
        &self.endpoints
    }

    /// Every subject this instance listens on, sorted.
    pub fn subjects(&self) -> Vec<&str> {
        let mut subjects: Vec<&str> = self
            .endpoints
            .iter()
            .flat_map(|endpoint| endpoint.descriptors.full_names())
            .collect();
        subjects.sort_unstable();
        subjects
    }

    /// Releases every subscription; the first bus failure is reported after all
    /// releases were attempted.
    pub async fn stop(self) -> Result<(), ServiceError> {
        let mut first_error: Option<BusError> = None;

        for endpoint in self.endpoints {
            if let Err(err) = self.binder.release(endpoint.subscriptions).await {
                first_error.get_or_insert(err);
            }
        }

        info!(
            event = events::SERVICE_STOPPED,
            component = COMPONENT,
            instance_id = %self.info.id,
            "services stopped"
        );

        match first_error {
            Some(err) => Err(ServiceError::Release(err)),
            None => Ok(()),
        }
    }
}
