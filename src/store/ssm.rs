//! AWS Systems Manager Parameter Store backend
//!
//! Implements `ParamStore` on `aws-sdk-ssm`. Credentials, region and retry
//! policy come from the standard AWS configuration chain.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_ssm::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_ssm::primitives::DateTime as AwsDateTime;
use aws_sdk_ssm::types::ParameterType;
use aws_sdk_ssm::Client;
use chrono::{DateTime, Utc};

use super::{ParamStore, Parameter, PutParameter, StoreError};
use crate::cache::ParamCache;
use crate::config::CacheOptions;
use crate::error::{CacheError, Result};

// == Error Codes ==
const PARAMETER_NOT_FOUND: &str = "ParameterNotFound";

/// Parameter store client backed by SSM.
#[derive(Debug, Clone)]
pub struct SsmParamStore {
    client: Client,
}

impl SsmParamStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Loads the default AWS configuration (environment, profile, IMDS).
    pub async fn from_env() -> Result<Self> {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self::from_conf(&config)
    }

    /// Builds a client from an already loaded configuration.
    ///
    /// Fails if the configuration has no region or behavior version, since
    /// the SDK client cannot be built without them.
    pub fn from_conf(config: &SdkConfig) -> Result<Self> {
        if config.region().is_none() {
            return Err(CacheError::Construction(
                "no AWS region configured".to_string(),
            ));
        }
        if config.behavior_version().is_none() {
            return Err(CacheError::Construction(
                "no AWS behavior version configured".to_string(),
            ));
        }
        Ok(Self::new(Client::new(config)))
    }
}

impl ParamCache<SsmParamStore> {
    /// Creates a cache on SSM, with both cache options and AWS configuration
    /// taken from the environment.
    pub async fn from_aws_env() -> Result<Self> {
        let options = CacheOptions::from_env()?;
        let store = SsmParamStore::from_env().await?;
        Ok(Self::new(store, options))
    }
}

#[async_trait]
impl ParamStore for SsmParamStore {
    async fn fetch(
        &self,
        name: &str,
        with_decryption: bool,
    ) -> std::result::Result<Option<Parameter>, StoreError> {
        let output = match self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(with_decryption)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) if err.code() == Some(PARAMETER_NOT_FOUND) => return Ok(None),
            Err(err) => return Err(map_sdk_error(err)),
        };

        let Some(parameter) = output.parameter() else {
            return Ok(None);
        };
        let last_modified = parameter
            .last_modified_date()
            .and_then(to_utc)
            .ok_or_else(|| StoreError::Other(format!("{name}: missing LastModifiedDate")))?;

        Ok(Some(Parameter {
            value: parameter.value().unwrap_or_default().to_string(),
            last_modified,
        }))
    }

    async fn upsert(&self, request: PutParameter<'_>) -> std::result::Result<(), StoreError> {
        self.client
            .put_parameter()
            .name(request.name)
            .value(request.value)
            .r#type(ParameterType::from(request.kind.as_str()))
            .overwrite(true)
            .set_key_id(request.key_id.map(str::to_string))
            .send()
            .await
            .map_err(map_sdk_error)?;
        Ok(())
    }

    async fn delete(&self, name: &str) -> std::result::Result<(), StoreError> {
        self.client
            .delete_parameter()
            .name(name)
            .send()
            .await
            .map_err(map_sdk_error)?;
        Ok(())
    }
}

// == Conversions ==
fn to_utc(timestamp: &AwsDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())
}

fn map_sdk_error<E, R>(err: SdkError<E, R>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(&err).to_string();
    match &err {
        SdkError::TimeoutError(_) => StoreError::TimedOut,
        SdkError::DispatchFailure(_) => StoreError::Unavailable(message),
        _ => classify(err.code(), message),
    }
}

/// Maps an SSM error code onto the store error taxonomy.
fn classify(code: Option<&str>, message: String) -> StoreError {
    match code {
        Some(
            "AccessDeniedException"
            | "UnrecognizedClientException"
            | "ExpiredTokenException"
            | "InvalidSignatureException"
            | "InvalidKeyId",
        ) => StoreError::AccessDenied(message),
        Some("ThrottlingException" | "TooManyUpdates" | "RequestLimitExceeded") => {
            StoreError::Throttled(message)
        }
        Some("InternalServerError" | "ServiceUnavailable" | "ServiceUnavailableException") => {
            StoreError::Unavailable(message)
        }
        _ => StoreError::Other(message),
    }
}
