use std::sync::Arc;

use clap::Parser;
use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;

use media_explorer_backend::api::{AdminApi, AuditApi, AuthApi, HealthApi};
use media_explorer_backend::cli::{self, Cli, Commands};
use media_explorer_backend::config::database::{connect_database, migrate_database};
use media_explorer_backend::config::{init_logging, BootstrapSettings};
use media_explorer_backend::AppData;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging()?;

    let cli = Cli::parse();
    let settings = BootstrapSettings::from_env()?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(settings).await,
        Commands::Migrate => cli::migrate::run_migrations(&settings).await,
        command => {
            let db = connect_database(&settings).await?;
            migrate_database(&db).await?;
            let app_data = AppData::init(db, settings).await?;

            if let Err(e) = cli::execute_command(command, &app_data).await {
                eprintln!("{}", e);
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

async fn serve(settings: BootstrapSettings) -> Result<(), Box<dyn std::error::Error>> {
    let db = connect_database(&settings).await?;
    migrate_database(&db).await?;
    tracing::info!("Database ready: {}", settings.database_url());

    let address = settings.server_address();
    let app_data = Arc::new(AppData::init(db, settings).await?);

    let apis = (
        HealthApi,
        AuthApi::new(app_data.clone()),
        AuditApi::new(app_data.clone()),
        AdminApi::new(app_data.clone()),
    );

    // Create OpenAPI service with API implementation
    let api_service = OpenApiService::new(apis, "Media Explorer API", "1.0.0")
        .server(format!("http://{}/api", address));

    // Generate Swagger UI from OpenAPI service
    let ui = api_service.swagger_ui();

    // Compose routes: nest API service under /api and Swagger UI under /swagger
    let app = Route::new()
        .nest("/api", api_service)
        .nest("/swagger", ui);

    tracing::info!("Starting server on http://{}", address);
    tracing::info!("Swagger UI available at http://{}/swagger", address);

    Server::new(TcpListener::bind(address))
        .run(app)
        .await?;

    Ok(())
}
