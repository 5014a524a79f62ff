use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use supplier_tools::SupplierApi;
use topup_engine::{OrderFlowApi, PricingApi, SqliteDatabase};
use xtra_tools::XtraPayApi;

use crate::{
    config::{ServerConfig, ServerOptions},
    errors::ServerError,
    integrations::{SupplierIntegration, XtraGateway},
    routes::{health, CreateOrderRoute, GetGameRoute, GetPricingRoute, SavePricingRoute, VerifyOrderRoute},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let gateway = XtraGateway::new(
        XtraPayApi::new(config.xtra_config.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?,
    );
    let supplier = SupplierIntegration::new(
        SupplierApi::new(config.supplier_config.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?,
    );
    let srv = create_server_instance(config, db, gateway, supplier)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    gateway: XtraGateway,
    supplier: SupplierIntegration,
) -> Result<Server, ServerError> {
    let options = ServerOptions::from_config(&config);
    let srv = HttpServer::new(move || {
        let orders_api = OrderFlowApi::new(db.clone(), gateway.clone(), supplier.clone());
        let pricing_api = PricingApi::new(db.clone(), supplier.clone());
        let api_scope = web::scope("/api")
            .service(CreateOrderRoute::<SqliteDatabase, XtraGateway, SupplierIntegration, SqliteDatabase, SupplierIntegration>::new())
            .service(VerifyOrderRoute::<SqliteDatabase, XtraGateway, SupplierIntegration>::new())
            .service(GetGameRoute::<SqliteDatabase, SupplierIntegration>::new())
            .service(GetPricingRoute::<SqliteDatabase, SupplierIntegration>::new())
            .service(SavePricingRoute::<SqliteDatabase, SupplierIntegration>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("gts::access_log"))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(pricing_api))
            .app_data(web::Data::new(config.auth.clone()))
            .app_data(web::Data::new(options))
            .service(health)
            .service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
