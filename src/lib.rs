// Arca - Disaster-Recovery Replicator for Digital Preservation Archives
// Copyright (c) 2025 Arca Contributors
// Licensed under the MIT License

//! # Arca - preservation archive replicator
//!
//! Arca maintains a byte-faithful disaster-recovery mirror of a hosted
//! digital preservation repository. It consumes change notifications from a
//! queue, pulls canonical entity metadata and bitstreams from the upstream
//! API, and writes them into a local versioned object store laid out
//! according to the OCFL specification.
//!
//! ## Overview
//!
//! Each batch of notifications runs through the reconciliation pipeline:
//!
//! - **Dedupe** overlapping notifications by canonical text
//! - **Resolve** each message into DR objects (metadata envelopes and
//!   bitstream payloads) via the upstream entity API
//! - **Classify** candidates against the local store by SHA-256 digest into
//!   missing, changed and unchanged
//! - **Stage** only missing and changed payloads into a temporary area
//! - **Commit** staged files as new OCFL versions, missing before changed
//! - **Notify** downstream consumers with one change event per commit
//! - **Acknowledge** the queue only after commit and publish succeed
//!
//! A crash before acknowledgement causes at-least-once redelivery; the
//! digest-based classifier turns a replay into a no-op, so the pipeline is
//! idempotent at message-batch granularity.
//!
//! ## Architecture
//!
//! Arca follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (pipeline, resolve, compose, paths, stage)
//! - [`adapters`] - External integrations (upstream API, queue, topic,
//!   envelope validation, the OCFL repository)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use arca::adapters::events::SnsEventPublisher;
//! use arca::adapters::ocfl::OcflRepository;
//! use arca::adapters::preservica::RestEntityClient;
//! use arca::adapters::queue::{QueueClient, SqsQueueClient};
//! use arca::adapters::xml::XipValidator;
//! use arca::config::load_config;
//! use arca::core::compose::Composer;
//! use arca::core::pipeline::BatchCoordinator;
//! use arca::core::resolve::EntityResolver;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config("arca.toml")?;
//!
//!     let aws_config =
//!         aws_config::defaults(aws_config::BehaviorVersion::latest()).load().await;
//!
//!     let queue: Arc<dyn QueueClient> =
//!         Arc::new(SqsQueueClient::new(&aws_config, &config.queue));
//!     let publisher = Arc::new(SnsEventPublisher::new(&aws_config, &config.events));
//!     let entity_client = Arc::new(RestEntityClient::new(config.preservica.clone())?);
//!     let store = Arc::new(OcflRepository::open(&config.ocfl)?);
//!
//!     let composer = Composer::new(Arc::new(XipValidator::new()));
//!     let resolver = EntityResolver::new(entity_client.clone(), composer);
//!     let coordinator = BatchCoordinator::new(
//!         queue.clone(),
//!         publisher,
//!         entity_client,
//!         resolver,
//!         store,
//!         false,
//!     );
//!
//!     let carriers = queue.receive().await?;
//!     let summary = coordinator.process(carriers).await?;
//!     summary.log_summary();
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Arca uses the [`domain::ArcaError`] type for all errors. There is no
//! per-object retry inside the coordinator: any failure during resolve,
//! stage, commit or publish aborts the batch before acknowledgement and the
//! queue redelivers the carriers.
//!
//! ## Logging
//!
//! Structured logging uses the `tracing` crate:
//!
//! ```rust,no_run
//! use arca::logging::init_logging;
//! use arca::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Replicator started");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
