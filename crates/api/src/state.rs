use pupero_admin_domain::services::telemetry::TelemetryGuard;

#[derive(Clone)]
pub struct AppState {
    transactions_base: String,
    monero_base: String,
    http: reqwest::Client,
    telemetry: TelemetryGuard,
}

impl AppState {
    pub fn new(
        transactions_base: String,
        monero_base: String,
        http: reqwest::Client,
        telemetry: TelemetryGuard,
    ) -> Self {
        Self {
            transactions_base,
            monero_base,
            http,
            telemetry,
        }
    }

    pub fn transactions_base(&self) -> &str {
        &self.transactions_base
    }

    pub fn monero_base(&self) -> &str {
        &self.monero_base
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn telemetry(&self) -> &TelemetryGuard {
        &self.telemetry
    }
}
