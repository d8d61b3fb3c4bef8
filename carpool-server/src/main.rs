use carpool_server::config::AppConfig;
use carpool_server::geo::{FixtureResolver, GeoResolver};
use carpool_server::service::CarpoolService;
use carpool_server::web::{AppState, create_router};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "carpool_server=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = AppConfig::from_env()?;

    // Canned distances replace the live geocoder and router when configured
    let resolver = match &config.geo_fixture {
        Some(path) => {
            let table = FixtureResolver::from_file(path)?;
            warn!(path = %path.display(), pairs = table.len(), "Using fixture distance table");
            GeoResolver::Fixture(table)
        }
        None => GeoResolver::live(config.geo.clone(), &config.cache)?,
    };
    info!(
        resolver = resolver.kind(),
        geocoder = %config.geo.geocoder_url,
        router = %config.geo.router_url,
        nearby_radius_km = config.search.nearby_radius_km,
        "Distance resolver ready"
    );

    let carpool = CarpoolService::new(resolver, config.search.clone());
    let app = create_router(AppState::new(carpool));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Carpool server listening");
    info!("API endpoints:");
    info!("  GET  /health                    - Health check");
    info!("  POST /rides                     - Post a ride");
    info!("  GET  /rides/search              - Search rides");
    info!("  POST /rides/:id/book            - Request seats");
    info!("  GET  /notifications             - Inbox");

    axum::serve(listener, app).await?;
    Ok(())
}
