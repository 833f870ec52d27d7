// SPDX-FileCopyrightText: Muster Contributors
//
// SPDX-License-Identifier: EUPL-1.2

//! Core library of the *Muster Controller*
//!
//! Organizers publish events, users respond to them. This crate wires the
//! REST API, the settings and the database together; the actual entity
//! queries live in the `db-storage` crate.
//!
//! # Example
//!
//! ```no_run
//! use anyhow::Result;
//! use muster_controller_core::Controller;
//!
//! #[actix_web::main]
//! async fn main() {
//!     muster_controller_core::try_or_exit(run()).await;
//! }
//!
//! async fn run() -> Result<()> {
//!     if let Some(controller) = Controller::create("Muster Controller").await? {
//!         controller.run().await?;
//!     }
//!
//!     Ok(())
//! }
//! ```

use crate::api::v1::response::error::json_error_handler;
use crate::settings::{Settings, SharedSettings};
use crate::storage::ObjectStorage;
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::web::{self, Data};
use actix_web::{App, HttpServer};
use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use database::Db;
use std::net::Ipv6Addr;
use std::sync::Arc;

pub mod api;
mod cli;
pub mod settings;
pub mod storage;
mod trace;

#[derive(Debug, thiserror::Error)]
#[error("Blocking thread has panicked")]
pub struct BlockingError;

/// Custom version of `actix_web::web::block` which retains the current tracing span
pub async fn block<F, R>(f: F) -> Result<R, BlockingError>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let span = tracing::Span::current();

    let fut = actix_rt::task::spawn_blocking(move || span.in_scope(f));

    fut.await.map_err(|_| BlockingError)
}

/// Wrapper of the main function. Correctly outputs the error to the logging utility or stderr.
pub async fn try_or_exit<T, F>(f: F) -> T
where
    F: std::future::Future<Output = Result<T>>,
{
    match f.await {
        Ok(ok) => ok,
        Err(err) => {
            if log::log_enabled!(log::Level::Error) {
                log::error!("Crashed with error: {:?}", err);
            } else {
                eprintln!("Crashed with error: {err:?}");
            }

            std::process::exit(-1);
        }
    }
}

/// Controller main struct, created from the program arguments and settings
pub struct Controller {
    startup_settings: Arc<Settings>,

    /// Settings loaded on startup, reachable from all handlers
    pub shared_settings: SharedSettings,

    db: Arc<Db>,

    storage: Arc<ObjectStorage>,
}

impl Controller {
    /// Creates a new controller from the program arguments and the config file
    ///
    /// Returns `None` when the program should exit without starting the HTTP
    /// server (e.g. when only the migration was requested).
    pub async fn create(program_name: &str) -> Result<Option<Self>> {
        let args = cli::parse_args();

        let settings = settings::load_settings(&args)?;

        trace::init(&settings.logging)?;

        log::info!("Starting {}", program_name);

        db_storage::migrations::migrate_from_url(&settings.database.url)
            .await
            .context("Failed to migrate database")?;

        if args.migrate_only {
            log::info!("Database migration done, exiting");
            return Ok(None);
        }

        let db = Db::connect_url(
            &settings.database.url,
            settings.database.max_connections,
            Some(settings.database.min_idle_connections),
        )
        .context("Failed to create database connection pool")?;

        let storage = ObjectStorage::new(&settings.object_storage)
            .await
            .context("Failed to initialize object storage")?;

        let startup_settings = Arc::new(settings.clone());
        let shared_settings: SharedSettings = Arc::new(ArcSwap::from_pointee(settings));

        Ok(Some(Self {
            startup_settings,
            shared_settings,
            db: Arc::new(db),
            storage: Arc::new(storage),
        }))
    }

    /// Runs the HTTP server until it is shut down
    pub async fn run(self) -> Result<()> {
        let db = Data::from(self.db.clone());
        let storage = Data::from(self.storage.clone());

        let http_server = HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allowed_header(header::CONTENT_TYPE)
                .allowed_header(header::AUTHORIZATION)
                .allowed_methods(["GET", "POST", "PATCH", "PUT", "DELETE"]);

            App::new()
                .wrap(cors)
                .wrap(tracing_actix_web::TracingLogger::default())
                .app_data(db.clone())
                .app_data(storage.clone())
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .service(
                    web::scope("/v1")
                        .wrap(api::v1::middleware::auth::Auth { db: db.clone() })
                        .service(api::v1::events::get_events_all)
                        .service(api::v1::events::get_events_me)
                        .service(api::v1::events::get_event)
                        .service(api::v1::events::new_event)
                        .service(api::v1::events::patch_event)
                        .service(api::v1::events::delete_event)
                        .service(api::v1::events::tags::add_tag_to_event)
                        .service(api::v1::events::tags::remove_tag_from_event)
                        .service(api::v1::events::rsvp::put_rsvp)
                        .service(api::v1::events::rsvp::get_rsvp)
                        .service(api::v1::users::get_me)
                        .service(api::v1::users::patch_me)
                        .service(api::v1::users::get_user)
                        .service(api::v1::profiles::get_my_profile)
                        .service(api::v1::profiles::new_profile)
                        .service(api::v1::profiles::put_avatar)
                        .service(api::v1::profiles::get_profile)
                        .service(api::v1::profiles::patch_profile)
                        .service(api::v1::profiles::delete_profile),
                )
        });

        let address = (Ipv6Addr::UNSPECIFIED, self.startup_settings.http.port);
        let http_server = http_server
            .bind(address)
            .with_context(|| format!("Failed to bind to port {}", address.1))?;

        log::info!("Startup finished");

        http_server.run().await?;

        Ok(())
    }
}
