use crate::analytics::PredictionResult;
use crate::error::{AppError, AppResult};
use crate::models::{
    ProductDetailsReport, ProductInfo, RegressionReport, ReportPage, SalesOverviewReport, Store,
    StorePerformanceReport, TimeTrendsReport, WarrantyReport,
};
use crate::services::ReportService;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::{Mutex, RwLock};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Requests a dashboard client can send
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsRequest {
    SalesOverview,
    WarrantyAnalysis,
    TimeTrends,
    RegressionAnalysis {
        #[serde(default)]
        price: Option<f64>,
    },
    Predict {
        price: f64,
    },
    StoreList,
    StorePerformance {
        store_name: String,
    },
    ProductList,
    ProductDetails {
        product_name: String,
    },
    RefreshModel,
}

impl WsRequest {
    /// Dashboard page the request belongs to
    pub fn page(&self) -> Option<ReportPage> {
        match self {
            WsRequest::SalesOverview => Some(ReportPage::SalesOverview),
            WsRequest::WarrantyAnalysis => Some(ReportPage::WarrantyAnalysis),
            WsRequest::TimeTrends => Some(ReportPage::TimeTrends),
            WsRequest::RegressionAnalysis { .. } | WsRequest::Predict { .. } => {
                Some(ReportPage::RegressionAnalysis)
            }
            WsRequest::StoreList | WsRequest::StorePerformance { .. } => {
                Some(ReportPage::StorePerformance)
            }
            WsRequest::ProductList | WsRequest::ProductDetails { .. } => {
                Some(ReportPage::ProductDetails)
            }
            WsRequest::RefreshModel => None,
        }
    }
}

/// Messages sent to dashboard clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    Connected {
        client_id: String,
    },
    SalesOverview {
        data: SalesOverviewReport,
    },
    WarrantyAnalysis {
        data: WarrantyReport,
    },
    TimeTrends {
        data: TimeTrendsReport,
    },
    RegressionAnalysis {
        data: RegressionReport,
    },
    Prediction {
        data: PredictionResult,
    },
    StoreList {
        stores: Vec<Store>,
    },
    StorePerformance {
        data: StorePerformanceReport,
    },
    ProductList {
        products: Vec<ProductInfo>,
    },
    ProductDetails {
        data: ProductDetailsReport,
    },
    /// Broadcast to every client after a successful refit
    ModelRefreshed {
        slope: f64,
        intercept: f64,
        points: usize,
        timestamp: i64,
    },
    Error {
        message: String,
        code: u16,
    },
}

impl WsMessage {
    /// Error reply for a failed request
    pub fn from_error(err: &AppError) -> Self {
        WsMessage::Error {
            message: err.to_string(),
            code: err.status_code(),
        }
    }

    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// WebSocket feed serving dashboard datasets
#[derive(Clone)]
pub struct DashboardFeed {
    reports: Arc<ReportService>,
    /// Broadcast sender for messages every client receives
    tx: broadcast::Sender<WsMessage>,
    clients: Arc<RwLock<HashSet<Uuid>>>,
}

impl DashboardFeed {
    /// Create a new feed over the report service
    pub fn new(reports: Arc<ReportService>) -> Self {
        let (tx, _) = broadcast::channel(100);

        Self {
            reports,
            tx,
            clients: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Number of connected clients
    pub async fn client_count(&self) -> usize {
        self.clients.read().await.len()
    }

    /// Answer one request; failures become an `error` reply
    pub async fn dispatch(&self, request: WsRequest) -> WsMessage {
        if let Some(page) = request.page() {
            debug!("Serving {} ({})", page.title(), page.as_str());
        }

        match self.execute(request).await {
            Ok(reply) => reply,
            Err(e) => {
                if e.is_connection_error() {
                    error!("Query executor unavailable: {}", e);
                } else {
                    warn!("Request failed: {}", e);
                }
                WsMessage::from_error(&e)
            }
        }
    }

    async fn execute(&self, request: WsRequest) -> AppResult<WsMessage> {
        let reply = match request {
            WsRequest::SalesOverview => WsMessage::SalesOverview {
                data: self.reports.sales_overview().await?,
            },
            WsRequest::WarrantyAnalysis => WsMessage::WarrantyAnalysis {
                data: self.reports.warranty_analysis().await?,
            },
            WsRequest::TimeTrends => WsMessage::TimeTrends {
                data: self.reports.time_trends().await?,
            },
            WsRequest::RegressionAnalysis { price } => WsMessage::RegressionAnalysis {
                data: self.reports.regression_analysis(price).await?,
            },
            WsRequest::Predict { price } => {
                let regression = self.reports.regression();
                regression.ensure_fitted().await?;
                WsMessage::Prediction {
                    data: regression.predict(price).await?,
                }
            }
            WsRequest::StoreList => WsMessage::StoreList {
                stores: self.reports.store_list().await?,
            },
            WsRequest::StorePerformance { store_name } => WsMessage::StorePerformance {
                data: self.reports.store_performance(&store_name).await?,
            },
            WsRequest::ProductList => WsMessage::ProductList {
                products: self.reports.product_list().await?,
            },
            WsRequest::ProductDetails { product_name } => WsMessage::ProductDetails {
                data: self.reports.product_details(&product_name).await?,
            },
            WsRequest::RefreshModel => {
                let fitted = self.reports.regression().refresh().await?;
                let message = WsMessage::ModelRefreshed {
                    slope: fitted.model.slope,
                    intercept: fitted.model.intercept,
                    points: fitted.point_count,
                    timestamp: fitted.fitted_at.timestamp(),
                };
                self.broadcast(message.clone());
                message
            }
        };
        Ok(reply)
    }

    /// Send a message to every connected client
    pub fn broadcast(&self, message: WsMessage) {
        // Err only means nobody is listening
        if self.tx.send(message).is_err() {
            debug!("Broadcast dropped: no connected clients");
        }
    }

    /// Handle a new WebSocket connection
    pub async fn handle_connection(&self, stream: tokio::net::TcpStream) -> AppResult<()> {
        let ws_stream = accept_async(stream)
            .await
            .map_err(|e| AppError::Message(format!("WebSocket handshake failed: {}", e)))?;

        let (ws_sender, mut ws_receiver) = ws_stream.split();
        let ws_sender = Arc::new(Mutex::new(ws_sender));
        let mut rx = self.tx.subscribe();
        let client_id = Uuid::new_v4();

        let welcome = WsMessage::Connected {
            client_id: client_id.to_string(),
        }
        .to_json()?;

        self.clients.write().await.insert(client_id);
        info!("New dashboard client: {} ({} connected)", client_id, self.client_count().await);

        if let Err(e) = ws_sender.lock().await.send(Message::Text(welcome)).await {
            warn!("Failed to send welcome message: {}", e);
        }

        // Forward broadcasts to this client
        let ws_sender_for_broadcast = ws_sender.clone();
        let forwarder = tokio::spawn(async move {
            loop {
                let msg = match rx.recv().await {
                    Ok(msg) => msg,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Client {} lagged, skipped {} broadcasts", client_id, skipped);
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };

                let json = match msg.to_json() {
                    Ok(json) => json,
                    Err(e) => {
                        error!("Failed to serialize message: {}", e);
                        continue;
                    }
                };

                let mut sender = ws_sender_for_broadcast.lock().await;
                if let Err(e) = sender.send(Message::Text(json)).await {
                    error!("Failed to send message to client {}: {}", client_id, e);
                    break;
                }
            }
        });

        while let Some(msg) = ws_receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    let reply = match serde_json::from_str::<WsRequest>(&text) {
                        Ok(request) => {
                            debug!("Client {} requested {:?}", client_id, request);
                            self.dispatch(request).await
                        }
                        Err(e) => {
                            warn!("Failed to parse message from client {}: {}", client_id, text);
                            WsMessage::from_error(&AppError::Serialization(e))
                        }
                    };

                    let json = match reply.to_json() {
                        Ok(json) => json,
                        Err(e) => {
                            error!("Failed to serialize reply: {}", e);
                            continue;
                        }
                    };
                    let mut sender = ws_sender.lock().await;
                    if let Err(e) = sender.send(Message::Text(json)).await {
                        error!("Failed to reply to client {}: {}", client_id, e);
                        break;
                    }
                }
                Ok(Message::Close(_)) => {
                    info!("Dashboard client disconnected: {}", client_id);
                    break;
                }
                Err(e) => {
                    error!("WebSocket error: {}", e);
                    break;
                }
                _ => {}
            }
        }

        forwarder.abort();
        self.clients.write().await.remove(&client_id);
        Ok(())
    }
}
