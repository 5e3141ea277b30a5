use actix_files as fs;
use actix_web::{App, HttpServer, middleware::Logger, web};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use invoice_desk::{
  adapters::http::{
    InvoiceRouteDependencies, RequestIdMiddleware, TemplateEngine, configure_invoice_api_routes,
    configure_invoice_web_routes,
  },
  application::invoice::{
    CreateInvoiceUseCase, DeleteInvoiceUseCase, GetInvoiceUseCase, ListCustomersUseCase,
    ListInvoicesUseCase, UpdateInvoiceUseCase,
  },
  domain::invoice::{InvoiceService, InvoiceServiceDependencies, PageCache},
  infrastructure::{
    cache::{InMemoryPageCache, RedisPageCache},
    config::{CacheBackend, CacheConfig, Config},
    persistence::postgres::{PostgresCustomerRepository, PostgresInvoiceRepository},
  },
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  // Initialize tracing subscriber for logging
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "invoice_desk=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting invoice desk");

  // Load configuration
  let config = Config::load().map_err(|e| {
    tracing::error!("Failed to load configuration: {}", e);
    std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
  })?;
  tracing::info!("Configuration loaded successfully");

  // Set up database connection pool with timeout
  tracing::info!("Connecting to database");

  let db_pool = tokio::time::timeout(
    Duration::from_secs(config.database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect(&config.database.url),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.database.connect_timeout_seconds
    );
    std::io::Error::new(
      std::io::ErrorKind::TimedOut,
      format!(
        "Database connection timed out after {} seconds",
        config.database.connect_timeout_seconds
      ),
    )
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to database: {}", e);
    match e {
      sqlx::Error::Io(_) => std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "Could not connect to database. Is PostgreSQL running?",
      ),
      _ => std::io::Error::other(format!("Database error: {}", e)),
    }
  })?;

  tracing::info!("Database connection pool created");

  // Run database migrations
  tracing::info!("Running database migrations");
  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to run database migrations: {}", e);
      std::io::Error::other(format!("Migration error: {}", e))
    })?;
  tracing::info!("Database migrations completed");

  let page_cache = connect_page_cache(&config.cache).await?;

  // Initialize repositories
  let invoice_repo = Arc::new(PostgresInvoiceRepository::new(db_pool.clone()));
  let customer_repo = Arc::new(PostgresCustomerRepository::new(db_pool.clone()));

  // Initialize domain service
  let invoice_service = Arc::new(InvoiceService::new(InvoiceServiceDependencies {
    invoice_repo,
    customer_repo,
    page_cache: page_cache.clone(),
  }));

  // Initialize use cases
  let create_invoice_use_case = Arc::new(CreateInvoiceUseCase::new(invoice_service.clone()));
  let update_invoice_use_case = Arc::new(UpdateInvoiceUseCase::new(invoice_service.clone()));
  let delete_invoice_use_case = Arc::new(DeleteInvoiceUseCase::new(invoice_service.clone()));
  let get_invoice_use_case = Arc::new(GetInvoiceUseCase::new(invoice_service.clone()));
  let list_invoices_use_case = Arc::new(ListInvoicesUseCase::new(invoice_service.clone()));
  let list_customers_use_case = Arc::new(ListCustomersUseCase::new(invoice_service.clone()));

  // Initialize template engine
  let templates = TemplateEngine::new().map_err(|e| {
    tracing::error!("Failed to load templates: {}", e);
    std::io::Error::other(format!("Template error: {}", e))
  })?;

  let route_deps = InvoiceRouteDependencies {
    templates,
    page_cache,
    create_invoice_use_case,
    update_invoice_use_case,
    delete_invoice_use_case,
    get_invoice_use_case,
    list_invoices_use_case,
    list_customers_use_case,
  };

  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  // Create and start the HTTP server
  HttpServer::new(move || {
    App::new()
      // Add request ID middleware
      .wrap(RequestIdMiddleware::new())
      // Add logging middleware
      .wrap(Logger::default())
      // Configure dashboard routes
      .configure(|cfg| configure_invoice_web_routes(cfg, route_deps.clone()))
      // Configure invoice API routes
      .service(web::scope("/api/v1/invoices").configure(|cfg| {
        configure_invoice_api_routes(
          cfg,
          route_deps.create_invoice_use_case.clone(),
          route_deps.update_invoice_use_case.clone(),
          route_deps.delete_invoice_use_case.clone(),
        )
      }))
      // Static files
      .service(fs::Files::new("/static", "./static"))
      // Health check endpoint
      .route("/health", web::get().to(health_check))
  })
  .bind((server_host.as_str(), server_port))?
  .run()
  .await
}

/// Builds the page cache selected by `cache.backend`
async fn connect_page_cache(config: &CacheConfig) -> std::io::Result<Arc<dyn PageCache>> {
  match config.backend {
    CacheBackend::Memory => {
      tracing::info!("Using in-memory page cache");
      Ok(Arc::new(InMemoryPageCache::new(Duration::from_secs(
        config.ttl_seconds,
      ))))
    }
    CacheBackend::Redis => {
      let redis_url = config.redis_url.clone().ok_or_else(|| {
        tracing::error!("cache.redis_url is required when cache.backend = \"redis\"");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "Missing cache.redis_url")
      })?;

      // Set up Redis connection with timeout
      tracing::info!("Connecting to Redis page cache");

      let redis_client = redis::Client::open(redis_url).map_err(|e| {
        tracing::error!("Failed to create Redis client: {}", e);
        std::io::Error::new(
          std::io::ErrorKind::InvalidInput,
          format!("Invalid Redis URL: {}", e),
        )
      })?;

      let redis_conn = tokio::time::timeout(
        Duration::from_secs(config.connect_timeout_seconds),
        redis_client.get_connection_manager(),
      )
      .await
      .map_err(|_| {
        tracing::error!(
          "Redis connection timed out after {} seconds. Is Redis running?",
          config.connect_timeout_seconds
        );
        std::io::Error::new(
          std::io::ErrorKind::TimedOut,
          format!(
            "Redis connection timed out after {} seconds",
            config.connect_timeout_seconds
          ),
        )
      })?
      .map_err(|e| {
        tracing::error!("Failed to connect to Redis: {}", e);
        std::io::Error::new(
          std::io::ErrorKind::ConnectionRefused,
          "Could not connect to Redis. Is Redis running?",
        )
      })?;

      tracing::info!("Redis connection established");

      Ok(Arc::new(RedisPageCache::new(
        redis_conn,
        config.key_prefix.clone(),
        config.ttl_seconds,
      )))
    }
  }
}

/// Health check endpoint
async fn health_check() -> &'static str {
  "OK"
}
