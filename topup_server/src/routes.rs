//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! Every business outcome is reported inside the `{ success, message }` envelope with a 200 status; HTTP
//! error codes are reserved for authentication (401), authorization (403), malformed admin input (400) and
//! faults on our side or upstream (500). The storefront matches on the message strings, so they are part of
//! the API contract.

use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use log::*;
use topup_engine::{
    db_types::{NewOrder, OrderId, PricingConfig, Role},
    helpers::new_order_id,
    traits::{OrderManagement, PaymentGateway, PricingManagement, ProductCatalog, TopupProvider},
    OrderFlowApi,
    OrderFlowError,
    PricingApi,
    PricingApiError,
    VerifyOutcome,
};

use crate::{
    auth::{JwtClaims, MaybeClaims},
    config::ServerOptions,
    data_objects::{
        DataResponse,
        JsonResponse,
        NewOrderRequest,
        OrderCreatedResponse,
        PricingData,
        PricingQuery,
        SavePricingRequest,
        VerifyRequest,
        VerifyResponse,
    },
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------  Checkout  ----------------------------------------------------
route!(create_order => Post "/order/create-gateway-order"
    impl OrderManagement, PaymentGateway, TopupProvider, PricingManagement, ProductCatalog);
/// Creates an order at the trusted server-side price and opens a payment session for it.
///
/// The client's request never carries a price. Whatever amount the storefront displayed, the charge is
/// recomputed here from the catalogs and the caller's role, then frozen on the order.
pub async fn create_order<B, G, F, P, C>(
    claims: JwtClaims,
    body: web::Json<NewOrderRequest>,
    orders: web::Data<OrderFlowApi<B, G, F>>,
    pricing: web::Data<PricingApi<P, C>>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement,
    G: PaymentGateway,
    F: TopupProvider,
    P: PricingManagement,
    C: ProductCatalog,
{
    let req = body.into_inner();
    let (Some(game_slug), Some(item_slug), Some(player_id), Some(zone_id), Some(payment_method)) = (
        present(req.game_slug),
        present(req.item_slug),
        present(req.player_id),
        present(req.zone_id),
        present(req.payment_method),
    ) else {
        return Ok(HttpResponse::Ok().json(JsonResponse::failure("Missing required fields")));
    };
    let email = present(req.email);
    let phone = present(req.phone);
    if email.is_none() && phone.is_none() {
        return Ok(HttpResponse::Ok().json(JsonResponse::failure("Provide email or phone")));
    }

    let price = match pricing.resolve_price(&game_slug, &item_slug, claims.user_type).await {
        Ok(price) => price,
        Err(e @ (PricingApiError::InvalidItem { .. } | PricingApiError::ProductNotFound(_))) => {
            debug!("💻️ Rejecting checkout for {game_slug}/{item_slug}: {e}");
            return Ok(HttpResponse::Ok().json(JsonResponse::failure(e)));
        },
        Err(e) => return Err(ServerError::BackendError(e.to_string())),
    };

    let order = NewOrder {
        order_id: new_order_id(),
        user_id: claims.user_id,
        game_slug,
        item_slug,
        item_name: req.item_name.unwrap_or_default(),
        player_id,
        zone_id,
        payment_method,
        price,
        currency: req.currency,
        email,
        phone,
        expires_at: Utc::now() + options.order_expiry,
    };
    match orders.create_order(order).await {
        Ok(summary) => Ok(HttpResponse::Ok().json(OrderCreatedResponse {
            success: true,
            order_id: summary.order_id.to_string(),
            payment_url: summary.payment_url,
        })),
        Err(OrderFlowError::PaymentInitFailed { order_id, reason }) => {
            warn!("💻️ Gateway would not open a session for [{order_id}]: {reason}");
            Ok(HttpResponse::Ok().json(JsonResponse::failure("Payment gateway error")))
        },
        Err(e) => Err(ServerError::BackendError(e.to_string())),
    }
}

//----------------------------------------------  Verification  ------------------------------------------------
route!(verify_order => Post "/order/verify-topup-payment" impl OrderManagement, PaymentGateway, TopupProvider);
/// Runs one pass of the verification pipeline for an order and reports the outcome. Safe to call repeatedly;
/// completed fulfillments are returned from the order record instead of being re-dispatched.
pub async fn verify_order<B, G, F>(
    claims: JwtClaims,
    body: web::Json<VerifyRequest>,
    orders: web::Data<OrderFlowApi<B, G, F>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement,
    G: PaymentGateway,
    F: TopupProvider,
{
    let Some(order_id) = present(body.into_inner().order_id) else {
        return Ok(HttpResponse::Ok().json(JsonResponse::failure("Missing orderId")));
    };
    let order_id = OrderId(order_id);
    let outcome = match orders.verify_order(&order_id, claims.user_id.as_deref()).await {
        Ok(outcome) => outcome,
        Err(OrderFlowError::OrderNotFound(_)) => {
            return Ok(HttpResponse::Ok().json(JsonResponse::failure("Order not found")));
        },
        Err(OrderFlowError::Forbidden) => return Err(ServerError::Forbidden),
        Err(e) => return Err(ServerError::BackendError(e.to_string())),
    };
    let response = match outcome {
        VerifyOutcome::AlreadyProcessed { topup_response } => {
            VerifyResponse::new(true, "Already processed", topup_response)
        },
        VerifyOutcome::Expired => VerifyResponse::new(false, "Order expired", None),
        VerifyOutcome::PaymentPending => VerifyResponse::new(false, "Payment pending, please wait", None),
        VerifyOutcome::PaymentFailed => VerifyResponse::new(false, "Payment failed", None),
        VerifyOutcome::AmountMismatch => VerifyResponse::new(false, "Payment amount mismatch detected", None),
        VerifyOutcome::TopupAlreadyCompleted { topup_response } => {
            VerifyResponse::new(true, "Topup already completed", topup_response)
        },
        VerifyOutcome::ToppedUp { topup_response } => {
            VerifyResponse::new(true, "Topup successful", Some(topup_response))
        },
        VerifyOutcome::TopupFailed { topup_response } => {
            VerifyResponse::new(false, "Topup failed", Some(topup_response))
        },
    };
    Ok(HttpResponse::Ok().json(response))
}

//----------------------------------------------   Catalog  ----------------------------------------------------
route!(get_game => Get "/games/{slug}" impl PricingManagement, ProductCatalog);
/// The role-priced catalog view of one game. Anonymous callers (and callers with bad tokens) see plain-user
/// prices; the restriction filter applies to everyone.
pub async fn get_game<P, C>(
    claims: MaybeClaims,
    path: web::Path<String>,
    pricing: web::Data<PricingApi<P, C>>,
) -> Result<HttpResponse, ServerError>
where
    P: PricingManagement,
    C: ProductCatalog,
{
    let slug = path.into_inner();
    let role = claims.role();
    debug!("💻️ GET game {slug} priced for {role}");
    match pricing.game_with_pricing(&slug, role).await {
        Ok(Some(game)) => Ok(HttpResponse::Ok().json(DataResponse::new(game))),
        Ok(None) => Ok(HttpResponse::Ok().json(JsonResponse::failure("Game not found"))),
        Err(e) => Err(ServerError::BackendError(e.to_string())),
    }
}

//----------------------------------------------   Pricing  ----------------------------------------------------
route!(get_pricing => Get "/admin/pricing" impl PricingManagement, ProductCatalog);
/// The slab/override lists for a role. Members, admins and the owner may look; members are transparently
/// served the admin record.
pub async fn get_pricing<P, C>(
    claims: JwtClaims,
    query: web::Query<PricingQuery>,
    pricing: web::Data<PricingApi<P, C>>,
) -> Result<HttpResponse, ServerError>
where
    P: PricingManagement,
    C: ProductCatalog,
{
    if !claims.user_type.can_view_pricing() {
        return Err(ServerError::Forbidden);
    }
    let Some(user_type) = query.into_inner().user_type.filter(|s| !s.is_empty()) else {
        return Err(ServerError::BadRequest("userType is required".to_string()));
    };
    let role: Role = user_type.parse().map_err(|_| ServerError::BadRequest("Invalid userType".to_string()))?;
    let config =
        pricing.pricing_for_role(role).await.map_err(|e| ServerError::BackendError(e.to_string()))?;
    Ok(HttpResponse::Ok().json(DataResponse::new(PricingData { slabs: config.slabs, overrides: config.overrides })))
}

route!(save_pricing => Patch "/admin/pricing" impl PricingManagement, ProductCatalog);
/// Replaces the admin pricing record. Owner only; the record may only ever be written for the admin role
/// (members inherit it, and no other role has one).
pub async fn save_pricing<P, C>(
    claims: JwtClaims,
    body: web::Json<SavePricingRequest>,
    pricing: web::Data<PricingApi<P, C>>,
) -> Result<HttpResponse, ServerError>
where
    P: PricingManagement,
    C: ProductCatalog,
{
    if !claims.user_type.can_write_pricing() {
        return Err(ServerError::Forbidden);
    }
    let req = body.into_inner();
    let Some(user_type) = req.user_type.filter(|s| !s.is_empty()) else {
        return Err(ServerError::BadRequest("userType is required".to_string()));
    };
    if user_type != "admin" {
        return Err(ServerError::BadRequest(
            "Pricing can only be set for admin (member inherits it)".to_string(),
        ));
    }
    if req.slabs.iter().any(|s| s.min < 0 || s.min >= s.max || !s.percent.is_finite()) {
        return Err(ServerError::BadRequest("Invalid slab format".to_string()));
    }
    if req.overrides.iter().any(|o| o.game_slug.is_empty() || o.item_slug.is_empty() || o.fixed_price < 0) {
        return Err(ServerError::BadRequest("Invalid override format".to_string()));
    }
    let config = PricingConfig { user_type: Role::Admin, slabs: req.slabs, overrides: req.overrides };
    let saved = pricing.save_pricing(config).await.map_err(|e| ServerError::BackendError(e.to_string()))?;
    info!("💻️ Pricing record replaced by the owner");
    Ok(HttpResponse::Ok().json(DataResponse::new(saved)))
}

/// Treats absent and empty strings the same way, as the storefront does.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
