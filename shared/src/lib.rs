pub mod cognito;
pub mod config;
pub mod dynamo;
pub mod telemetry;

use std::sync::Arc;

use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_cognitoidentityprovider::Client as CognitoClient;
use aws_sdk_dynamodb::Client as DynamoClient;
use crewdesk_atoms::Session;
use dashboard_block::Dashboard;
use roster_block::{DirectorySink, Roster};

pub use cognito::{secret_hash, CognitoAuth};
pub use config::{Config, ConfigError};
pub use dynamo::DynamoStore;
pub use telemetry::init_tracing;

/// AWS clients and settings shared by every page.
#[derive(Clone, Debug)]
pub struct AppState {
    pub dynamo_client: DynamoClient,
    pub cognito_client: CognitoClient,
    pub config: Config,
}

impl AppState {
    pub fn new(sdk_config: &SdkConfig, config: Config) -> Self {
        Self {
            dynamo_client: DynamoClient::new(sdk_config),
            cognito_client: CognitoClient::new(sdk_config),
            config,
        }
    }

    /// Loads AWS settings and [`Config`] from the environment.
    pub async fn from_env() -> Self {
        let config = Config::from_env();
        let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        tracing::info!(table_name = %config.table_name, "app state ready");
        Self::new(&sdk_config, config)
    }

    pub fn store(&self) -> Arc<DynamoStore> {
        Arc::new(DynamoStore::new(
            self.dynamo_client.clone(),
            self.config.table_name.clone(),
        ))
    }

    pub fn auth(&self) -> Result<Arc<CognitoAuth>, ConfigError> {
        let client_id = self.config.require_client_id()?;
        Ok(Arc::new(CognitoAuth::new(
            self.cognito_client.clone(),
            client_id,
            self.config.cognito_client_secret.clone(),
        )))
    }

    /// Dashboard wired to DynamoDB, signed in through `auth`.
    pub fn dashboard(&self, auth: Arc<CognitoAuth>) -> Dashboard {
        Dashboard::new(self.store(), auth)
    }

    pub fn roster(&self, session: &Session) -> Roster {
        Roster::new(self.store(), session.user_id.clone())
    }

    pub fn export_sink(&self) -> DirectorySink {
        DirectorySink::new(self.config.export_dir.clone())
    }
}
