//! HTTP API server for the Hashlock node.
//!
//! JSON endpoints for the four escrow operations, swap and secret lookup,
//! balances and the event journal.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use hashlock_core::{
    Address, CoreError, EventRecord, HashAlgorithm, InitiateRequest, Secret, SecretHash, Settlement,
    Slot, SwapId, SwapParams, SwapRecord, TokenAmount,
};
use hashlock_crypto::Signature;
use hashlock_escrow::{CommitReceipt, EscrowError};

use crate::config::ClockKind;
use crate::state::NodeState;

const DEFAULT_EVENT_PAGE: usize = 100;
const MAX_EVENT_PAGE: usize = 1000;

// --- Errors ---

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

/// An error rendered as an HTTP response.
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    fn not_found(message: String) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: ErrorResponse {
                error: message,
                kind: "not_found".into(),
            },
        }
    }
}

impl From<EscrowError> for ApiError {
    fn from(err: EscrowError) -> Self {
        Self {
            status: status_for(&err),
            body: ErrorResponse {
                error: err.to_string(),
                kind: err.kind().to_string(),
            },
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        EscrowError::from(err).into()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        EscrowError::Internal(err.to_string()).into()
    }
}

pub fn status_for(err: &EscrowError) -> StatusCode {
    match err {
        EscrowError::Validation(_)
        | EscrowError::InvalidAmount(_)
        | EscrowError::InvalidTimelock { .. }
        | EscrowError::InvalidSecret(_) => StatusCode::BAD_REQUEST,
        EscrowError::Authorization(_) => StatusCode::FORBIDDEN,
        EscrowError::NotFound(_) => StatusCode::NOT_FOUND,
        EscrowError::AlreadyExists(_)
        | EscrowError::Retired(_)
        | EscrowError::Expired { .. }
        | EscrowError::TimelockNotExpired { .. } => StatusCode::CONFLICT,
        EscrowError::InsufficientFunds { .. } | EscrowError::ArithmeticOverflow(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        EscrowError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

// --- Request / response types ---

#[derive(Serialize)]
pub struct StatusResponse {
    pub version: String,
    pub clock: ClockKind,
    pub now: Slot,
    pub pending_swaps: usize,
    pub uptime_secs: u64,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Deserialize)]
pub struct InitiateSwapRequest {
    pub mint: Address,
    pub initiator: Address,
    pub redeemer: Address,
    #[serde(default)]
    pub funder: Option<Address>,
    #[serde(default)]
    pub rent_sponsor: Option<Address>,
    pub secret_hash: SecretHash,
    pub amount: TokenAmount,
    /// Absolute deadline. Exactly one of `timelock` and `expires_in` is set.
    #[serde(default)]
    pub timelock: Option<Slot>,
    /// Deadline relative to the ledger clock.
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Base64.
    #[serde(default)]
    pub destination_data: Option<String>,
}

#[derive(Deserialize)]
pub struct RedeemRequest {
    pub secret: Secret,
}

#[derive(Deserialize)]
pub struct InstantRefundRequest {
    /// Hex-encoded Ed25519 signature by the redeemer.
    pub signature: String,
}

#[derive(Serialize)]
pub struct DeriveIdResponse {
    pub swap_id: SwapId,
}

/// A pending record as served over the wire.
#[derive(Serialize, Deserialize)]
pub struct SwapView {
    pub id: SwapId,
    pub mint: Address,
    pub initiator: Address,
    pub funder: Address,
    pub redeemer: Address,
    pub secret_hash: SecretHash,
    pub amount: TokenAmount,
    pub timelock: Slot,
    pub destination_data: Option<String>,
    pub rent_sponsor: Address,
    pub rent_deposit: u64,
    pub hash_algorithm: HashAlgorithm,
    pub created_at: Slot,
}

impl From<SwapRecord> for SwapView {
    fn from(r: SwapRecord) -> Self {
        Self {
            id: r.id,
            mint: r.mint,
            initiator: r.initiator,
            funder: r.funder,
            redeemer: r.redeemer,
            secret_hash: r.secret_hash,
            amount: r.amount,
            timelock: r.timelock,
            destination_data: r
                .destination_data
                .map(|d| base64::engine::general_purpose::STANDARD.encode(d)),
            rent_sponsor: r.rent_sponsor,
            rent_deposit: r.rent_deposit,
            hash_algorithm: r.hash_algorithm,
            created_at: r.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SwapStatusResponse {
    Pending {
        swap: SwapView,
    },
    Closed {
        settlement: Settlement,
        slot: Slot,
        sequence: u64,
    },
}

#[derive(Serialize)]
pub struct SecretResponse {
    pub secret_hash: SecretHash,
    pub secret: Secret,
}

#[derive(Serialize)]
pub struct BalanceResponse {
    pub owner: Address,
    pub mint: Address,
    pub balance: TokenAmount,
}

#[derive(Serialize)]
pub struct VaultResponse {
    pub mint: Address,
    pub balance: TokenAmount,
}

#[derive(Deserialize)]
pub struct EventsQuery {
    #[serde(default)]
    pub from: u64,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct EventsResponse {
    pub events: Vec<EventRecord>,
    /// Sequence to request next.
    pub next: u64,
}

// --- Handlers ---

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}

async fn handle_status(State(state): State<Arc<NodeState>>) -> ApiResult<StatusResponse> {
    Ok(Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        clock: state.clock_kind,
        now: state.engine.now(),
        pending_swaps: state.engine.pending_count()?,
        uptime_secs: state.start_time.elapsed().as_secs(),
    }))
}

async fn handle_initiate(
    State(state): State<Arc<NodeState>>,
    Json(req): Json<InitiateSwapRequest>,
) -> ApiResult<CommitReceipt> {
    let timelock = match (req.timelock, req.expires_in) {
        (Some(timelock), None) => timelock,
        (None, Some(delta)) => state.engine.deadline_after(delta)?,
        _ => {
            return Err(EscrowError::Validation(
                "exactly one of timelock and expires_in is required".into(),
            )
            .into())
        }
    };

    let mut builder = InitiateRequest::builder()
        .mint(req.mint)
        .initiator(req.initiator)
        .redeemer(req.redeemer)
        .secret_hash(req.secret_hash)
        .amount(req.amount)
        .timelock(timelock);
    if let Some(funder) = req.funder {
        builder = builder.funder(funder);
    }
    if let Some(sponsor) = req.rent_sponsor {
        builder = builder.rent_sponsor(sponsor);
    }
    if let Some(encoded) = req.destination_data {
        let data = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| EscrowError::Validation(format!("destination_data: {}", e)))?;
        builder = builder.destination_data(data);
    }

    Ok(Json(state.engine.initiate(builder.build()?)?))
}

async fn handle_derive_id(Json(params): Json<SwapParams>) -> Json<DeriveIdResponse> {
    Json(DeriveIdResponse {
        swap_id: params.id(),
    })
}

async fn handle_get_swap(
    State(state): State<Arc<NodeState>>,
    Path(id): Path<String>,
) -> ApiResult<SwapStatusResponse> {
    let swap_id: SwapId = id.parse()?;
    match state.engine.find(&swap_id) {
        Ok(record) => Ok(Json(SwapStatusResponse::Pending {
            swap: record.into(),
        })),
        Err(EscrowError::NotFound(_)) => {
            let entry = state
                .settlements
                .get(&swap_id)
                .ok_or(EscrowError::NotFound(swap_id))?;
            Ok(Json(SwapStatusResponse::Closed {
                settlement: entry.settlement,
                slot: entry.slot,
                sequence: entry.sequence,
            }))
        }
        Err(err) => Err(err.into()),
    }
}

async fn handle_redeem(
    State(state): State<Arc<NodeState>>,
    Path(id): Path<String>,
    Json(req): Json<RedeemRequest>,
) -> ApiResult<CommitReceipt> {
    let swap_id: SwapId = id.parse()?;
    Ok(Json(state.engine.redeem(&swap_id, &req.secret)?))
}

async fn handle_refund(
    State(state): State<Arc<NodeState>>,
    Path(id): Path<String>,
) -> ApiResult<CommitReceipt> {
    let swap_id: SwapId = id.parse()?;
    Ok(Json(state.engine.refund(&swap_id)?))
}

async fn handle_instant_refund(
    State(state): State<Arc<NodeState>>,
    Path(id): Path<String>,
    Json(req): Json<InstantRefundRequest>,
) -> ApiResult<CommitReceipt> {
    let swap_id: SwapId = id.parse()?;
    let signature = Signature::from_hex(&req.signature)
        .map_err(|e| EscrowError::Validation(format!("signature: {}", e)))?;
    Ok(Json(state.engine.instant_refund(&swap_id, &signature)?))
}

async fn handle_get_secret(
    State(state): State<Arc<NodeState>>,
    Path(hash): Path<String>,
) -> ApiResult<SecretResponse> {
    let secret_hash: SecretHash = hash.parse()?;
    let secret = state
        .secrets
        .lookup(&secret_hash)
        .ok_or_else(|| ApiError::not_found(format!("no secret revealed for {}", secret_hash)))?;
    Ok(Json(SecretResponse {
        secret_hash,
        secret,
    }))
}

async fn handle_balance(
    State(state): State<Arc<NodeState>>,
    Path((owner, mint)): Path<(String, String)>,
) -> ApiResult<BalanceResponse> {
    let owner: Address = owner.parse()?;
    let mint: Address = mint.parse()?;
    Ok(Json(BalanceResponse {
        owner,
        mint,
        balance: state.engine.balance(&owner, &mint)?,
    }))
}

async fn handle_vault(
    State(state): State<Arc<NodeState>>,
    Path(mint): Path<String>,
) -> ApiResult<VaultResponse> {
    let mint: Address = mint.parse()?;
    Ok(Json(VaultResponse {
        mint,
        balance: state.engine.vault_balance(&mint)?,
    }))
}

async fn handle_events(
    State(state): State<Arc<NodeState>>,
    Query(query): Query<EventsQuery>,
) -> ApiResult<EventsResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_EVENT_PAGE).min(MAX_EVENT_PAGE);
    let events = state.storage.events_from(query.from, limit)?;
    let next = events.last().map(|r| r.sequence + 1).unwrap_or(query.from);
    Ok(Json(EventsResponse { events, next }))
}

// --- Server ---

pub fn build_router(state: Arc<NodeState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(handle_health))
        .route("/api/v1/status", get(handle_status))
        .route("/api/v1/swaps", post(handle_initiate))
        .route("/api/v1/swaps/derive-id", post(handle_derive_id))
        .route("/api/v1/swaps/{id}", get(handle_get_swap))
        .route("/api/v1/swaps/{id}/redeem", post(handle_redeem))
        .route("/api/v1/swaps/{id}/refund", post(handle_refund))
        .route("/api/v1/swaps/{id}/instant-refund", post(handle_instant_refund))
        .route("/api/v1/secrets/{secret_hash}", get(handle_get_secret))
        .route("/api/v1/accounts/{owner}/{mint}", get(handle_balance))
        .route("/api/v1/vault/{mint}", get(handle_vault))
        .route("/api/v1/events", get(handle_events))
        .with_state(state)
}

pub async fn serve(listener: tokio::net::TcpListener, state: Arc<NodeState>) -> anyhow::Result<()> {
    let app = build_router(state);
    tracing::info!(listen_addr = %listener.local_addr()?, "HTTP API server started");
    axum::serve(listener, app).await?;
    Ok(())
}
